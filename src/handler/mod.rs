//! Request handler module
//!
//! Turns one HTTP request into one response: static assets, the mock API and
//! rendered pages.

mod pages;
pub mod router;
pub mod static_files;

// Re-export main entry point
pub use router::handle_request;
