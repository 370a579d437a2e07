pub mod dbitem;

pub use dbitem::{ItemStore, MemoryItemStore, PgItemStore, StoreError};
