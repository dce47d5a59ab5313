// src/error_handling/mod.rs
//! Error handling for the Banksy client
//!
//! This module provides the crate-wide error type and result alias.

pub mod error_types;

pub use error_types::{BanksyError, Result};
