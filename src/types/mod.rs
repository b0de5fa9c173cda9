pub mod position;
pub mod workout;
