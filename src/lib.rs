//! Episode Art
//!
//! Dynamic podcast cover-art rendering server.
//! This library exposes modules for integration testing.

pub mod api;
pub mod assets;
pub mod error;
pub mod models;
pub mod rendering;
pub mod server;
pub mod services;
