//! Minimal static file server with byte-range support and directory listings.

pub mod config;
pub mod handler;
pub mod http;
pub mod logger;
pub mod server;
