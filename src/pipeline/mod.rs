pub mod distance;
pub mod record;
pub mod summarize;
