pub mod health;
pub mod latest;
