//! # ttugi-types
//!
//! Core type definitions for the ttugi restaurant recommendation engine.
//!
//! This crate is the foundation of the dependency graph. It contains:
//!
//! - **[`error`]** -- [`TtugiError`] and the [`Result`] alias
//! - **[`config`]** -- Configuration schema and the named fallback constants
//! - **[`restaurant`]** -- Restaurant records, areas and categories
//! - **[`criteria`]** -- Structured criteria extracted from user text
//! - **[`situation`]** -- Dining situation tags
//! - **[`session`]** -- Per-session preference memory

pub mod config;
pub mod criteria;
pub mod error;
pub mod restaurant;
pub mod session;
pub mod situation;

pub use error::{Result, TtugiError};
