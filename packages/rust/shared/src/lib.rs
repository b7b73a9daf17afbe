//! Shared types, error model, and configuration for notedown.
//!
//! This crate is the foundation depended on by all other notedown crates.
//! It provides:
//! - [`NotedownError`] — the unified error type
//! - Domain types ([`Note`], [`CourseExport`], [`GroupedNotes`], [`CodeLanguage`])
//! - Configuration ([`AppConfig`], [`RenderConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, DefaultsConfig, RenderConfig, config_dir, config_file_path, init_config,
    load_config, load_config_from,
};
pub use error::{NotedownError, Result};
pub use types::{
    Chapter, ChapterLesson, CodeLanguage, CourseExport, GroupedNotes, LessonGroup, LessonItem,
    ModuleGroup, Note, NoteKind, NotesInput, TextMetadata, VideoMetadata,
};
