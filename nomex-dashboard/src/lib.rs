// Library interface for the Nomex dashboard engine
#[macro_use]
pub mod logging;

pub mod api;
pub mod app;
pub mod auth;
pub mod config;
pub mod formatting;
pub mod session;
