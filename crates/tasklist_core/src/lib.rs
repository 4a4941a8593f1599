pub mod config;
pub mod draft;
pub mod error;
pub mod model;
pub mod notify;
pub mod store;
