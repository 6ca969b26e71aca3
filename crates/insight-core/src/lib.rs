pub mod error;
pub mod repository;
pub mod types;

pub use error::*;
pub use repository::*;
pub use types::*;
