pub mod backend;
pub mod error;

pub use backend::{AnthropicBackend, BackendConfig, GenerativeBackend, GenerativeResponse};
pub use error::{BackendError, BackendResult};
