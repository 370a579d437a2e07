pub mod error;
pub mod health;
pub mod item;
pub mod ready;

pub use error::*;
pub use health::*;
pub use item::*;
pub use ready::*;
