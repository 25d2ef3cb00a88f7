pub mod config;
pub mod db;
pub mod logging;
pub mod response;

pub use db::{StoreError, WordStore};
