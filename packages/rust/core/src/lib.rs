//! Core conversion logic for notedown.
//!
//! This crate ties together grouping, composition, and markdown conversion
//! into the end-to-end convert pipeline (`convert_notes`).

pub mod composer;
pub mod grouper;
pub mod pipeline;

// ---------------------------------------------------------------------------
// Fixture-driven integration tests
// ---------------------------------------------------------------------------
