//! # OpenNMS Domain
//!
//! Entities and value objects materialized from OpenNMS REST responses.
//! Everything here is a plain data holder; wire-format concerns live in the
//! data-access crate.

pub mod entities;
pub mod value_objects;

pub use entities::*;
pub use value_objects::*;
