pub mod detail;
pub mod search;
