pub mod health;
pub mod reviews;
