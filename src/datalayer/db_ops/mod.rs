pub mod connection_pool;
pub mod constants;
pub mod db_health;
pub mod db_ops;

pub use crate::datalayer::db_ops::constants::DbConfig;
pub use db_health::{DatabaseHealth, TableVerification, check_database_health, verify_all_tables};
pub use db_ops::{DbManager, initialize_database};
