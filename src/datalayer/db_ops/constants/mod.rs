pub mod constants;
pub mod types;
pub use constants::URL;
pub use types::DbConfig;
