//! # OpenNMS Core
//!
//! Core types, domain model, and error definitions for the OpenNMS REST client.
//! This crate provides the foundational abstractions shared by the
//! configuration and data-access crates.

pub mod domain;
pub mod error;
pub mod metadata;
pub mod result;
pub mod telemetry;
pub mod traits;

pub use domain::*;
pub use error::*;
pub use metadata::*;
pub use result::*;
pub use traits::*;

// Re-export shaku for collaborator trait bounds
pub use shaku::Interface;
