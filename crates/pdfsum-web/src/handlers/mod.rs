pub mod extract;
pub mod index;
pub mod summarize;
