// Library interface for the postboard client (shared with the integration tests)
pub mod api;
pub mod app;
pub mod auth;
pub mod components;
pub mod config;

#[macro_use]
pub mod logging;

pub mod session;
pub mod terminal;
pub mod ui;
