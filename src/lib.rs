//! SCICALC - Terminal Scientific Calculator Library
//!
//! A terminal-based scientific calculator with exact decimal output, built in Rust.

pub mod domain;
pub mod application;
pub mod infrastructure;
pub mod presentation;

pub use domain::*;
pub use application::*;
