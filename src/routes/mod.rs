pub mod articles;
pub mod catalog;
pub mod health;
pub mod sentiment;
pub mod statistics;
