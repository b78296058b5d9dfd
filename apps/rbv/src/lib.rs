//! # RBV Library
//!
//! This library exposes the RBV application modules for testing and
//! integration.
//!
//! The main binary uses these modules through the `main.rs` entry point.

pub mod api;
pub mod cli;
pub mod config;

// Re-export rbv_core for convenience
pub use rbv_core;
