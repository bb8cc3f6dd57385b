//! Field validation engine.
//!
//! Provides rule and violation types plus a pure-logic checker used by every
//! entity DTO before it is written. No database dependencies.

pub mod checker;
pub mod rules;

pub use checker::FieldChecker;
pub use rules::{FieldViolation, Rule, ValidationErrors};
