//! # PHT Common Library
//!
//! Shared code for the phasmo-tourney services:
//! - Error taxonomy and Result alias
//! - Document store abstraction with SQLite and in-memory backends
//! - API token to caller-role resolution
//! - Timestamp helpers

pub mod auth;
pub mod error;
pub mod store;
pub mod time;

pub use error::{Error, Result};
pub use store::{Document, Store};
