pub mod bottles;
pub mod envelope;
pub mod health;
pub mod validation;
