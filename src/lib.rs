pub mod cli;
pub mod client;
pub mod config;
pub mod handlers;
pub mod session;
pub mod store;
pub mod tui;
