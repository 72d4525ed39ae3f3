pub mod dberrors;
pub mod errors;

pub use dberrors::DbError;
pub use errors::{Operation, ServiceError, ServiceResult};
