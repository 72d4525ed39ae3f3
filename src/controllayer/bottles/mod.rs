pub mod bottles_handler;
pub mod bottles_service;
pub mod viewmodels;

pub use bottles_service::BottleService;
pub use viewmodels::{AddBottle, BottleIdentifier, UpdateBottle};
