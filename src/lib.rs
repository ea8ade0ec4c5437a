pub mod api;
pub mod config;
pub mod eth;
pub mod models;
pub mod replay;
pub mod session;
