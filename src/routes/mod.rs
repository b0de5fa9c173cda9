pub mod health;
pub mod location;
pub mod summary;
pub mod workout;
