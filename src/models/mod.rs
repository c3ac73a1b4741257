pub mod errors;
pub mod recipe;
pub mod shopping;
pub mod user;
