pub mod awdb;
pub mod clock;
pub mod commands;
pub mod config;
pub mod models;
pub mod streak;
