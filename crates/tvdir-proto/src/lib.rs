pub mod catalog;
pub mod config;
pub mod loader;
pub mod platform;
pub mod source;
