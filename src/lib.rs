pub mod api;
pub mod cache;
pub mod config;
pub mod models;
pub mod openlibrary;
pub mod server;
pub mod services;
pub mod state;
pub mod text;
