pub mod session_service;
pub mod validation_service;

pub use session_service::*;
pub use validation_service::*;
