pub mod catalog;
pub mod recipe;
pub mod shopping;
pub mod social;
pub mod user;
