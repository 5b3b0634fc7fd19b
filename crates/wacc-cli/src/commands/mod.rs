pub mod cost;
pub mod structure;
