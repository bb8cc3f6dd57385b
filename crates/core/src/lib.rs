//! Domain logic for the portfolio data layer.
//!
//! Pure types, validation, and upload path resolution, plus the local media
//! store. Nothing here talks to the database; see `folio-db` for persistence.

pub mod config;
pub mod error;
pub mod media;
pub mod types;
pub mod upload;
pub mod validation;
