pub mod bottles;
pub mod extractors;
pub mod health;
