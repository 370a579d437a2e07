//! HTTP service exposing a single "Item" resource through five named routes:
//! list, detail, create, delete and update.

pub mod config;
pub mod db;
pub mod docs;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod state;
