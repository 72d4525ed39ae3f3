pub mod error;
pub mod request_id;

pub use error::error_logging_middleware;
pub use request_id::{REQUEST_ID_HEADER, get_request_id, request_id_middleware};
