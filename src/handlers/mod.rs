pub mod health;
pub mod item;
pub mod item_pk;

pub use health::*;
pub use item::*;
