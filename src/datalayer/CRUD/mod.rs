pub mod bottles;
pub mod helper;
pub mod memory;
pub mod sql_generator;
pub mod store;
pub mod types;

pub use bottles::PgBottleStore;
pub use memory::InMemoryBottleStore;
pub use store::BottleStore;
