//! Request handler module
//!
//! Resolves request paths against the serve root and answers them with
//! file bodies, byte ranges or directory listings.

pub mod directory;
pub mod error;
pub mod listing;
pub mod resource;
pub mod router;
pub mod static_files;

// Re-export main entry point
pub use error::ServeError;
pub use router::handle_request;
