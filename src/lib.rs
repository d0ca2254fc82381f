pub mod api;
pub mod clients;
pub mod decoder;
pub mod error;
pub mod types;

pub use error::{AppError, Result};
