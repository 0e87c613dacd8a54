pub mod auth;
pub mod bench;
pub mod config;
pub mod db;
pub mod error;
pub mod secrets;
pub mod workflows;

pub use error::{SurgeError, SurgeResult};
