//! End-to-end convert pipeline: JSON input → compose → Markdown file.
//!
//! The run is sequential: the input is read and parsed in full, the whole
//! document is composed in memory, and only then is the output written.
//! A failure anywhere aborts the run without partial output.

use std::path::PathBuf;
use std::time::Instant;

use tracing::{info, instrument};

use notedown_shared::{NotedownError, NotesInput, RenderConfig, Result};

use crate::{composer, grouper};

/// Configuration for one convert run.
#[derive(Debug, Clone)]
pub struct ConvertJobConfig {
    /// Input JSON file.
    pub input: PathBuf,
    /// Explicit output path; when absent the source-dependent default is
    /// used (`<course>.md` for grouped exports, `default_output` for flat
    /// note arrays).
    pub output: Option<PathBuf>,
    /// Fallback output path for flat note arrays.
    pub default_output: PathBuf,
    /// Rendering options merged from config and CLI flags.
    pub render: RenderConfig,
}

/// Result of one convert run.
#[derive(Debug)]
pub struct ConvertJobResult {
    /// Where the Markdown document was written.
    pub output_path: PathBuf,
    /// Number of notes rendered.
    pub note_count: usize,
    /// Number of modules (or chapters) in the document.
    pub module_count: usize,
    /// Which input schema was detected.
    pub source: SourceKind,
    /// Total elapsed time.
    pub elapsed: std::time::Duration,
}

/// The detected input schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// Pre-grouped course export (chapters → lessons → items).
    Grouped,
    /// Flat note array requiring grouping.
    Flat,
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Grouped => write!(f, "grouped export"),
            Self::Flat => write!(f, "note array"),
        }
    }
}

/// Progress callback for reporting pipeline status.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called after each note is converted.
    fn note_converted(&self, current: usize, total: usize);
    /// Called when the pipeline completes.
    fn done(&self, result: &ConvertJobResult);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn note_converted(&self, _current: usize, _total: usize) {}
    fn done(&self, _result: &ConvertJobResult) {}
}

/// Run the full convert pipeline.
///
/// 1. Pre-flight input existence check
/// 2. Read and parse the JSON (schema auto-detected)
/// 3. Compose the matching Markdown document
/// 4. Write the output file, creating its parent directory
#[instrument(skip_all, fields(input = %config.input.display()))]
pub async fn convert_notes(
    config: &ConvertJobConfig,
    progress: &dyn ProgressReporter,
) -> Result<ConvertJobResult> {
    let start = Instant::now();

    // Report a missing input up front, before any read is attempted.
    if !config.input.exists() {
        return Err(NotedownError::validation(format!(
            "the file at \"{}\" does not exist or is not accessible",
            config.input.display()
        )));
    }

    progress.phase("Reading input");
    let raw = tokio::fs::read_to_string(&config.input)
        .await
        .map_err(|e| NotedownError::io(&config.input, e))?;

    let input: NotesInput = serde_json::from_str(&raw)
        .map_err(|e| NotedownError::parse(format!("{}: {e}", config.input.display())))?;

    progress.phase("Composing Markdown");
    let (markdown, note_count, module_count, source, fallback_output) = match &input {
        NotesInput::Grouped(export) => {
            let note_count = export
                .chapters
                .iter()
                .flat_map(|c| &c.lessons)
                .flat_map(|l| &l.items)
                .filter(|i| i.is_note())
                .count();

            let markdown = composer::compose_course_export(export, config.render.time_links);
            let fallback = PathBuf::from(format!("{}.md", export.course));

            (
                markdown,
                note_count,
                export.chapters.len(),
                SourceKind::Grouped,
                fallback,
            )
        }
        NotesInput::Flat(notes) => {
            if notes.is_empty() {
                return Err(NotedownError::validation("input contains no notes"));
            }

            let grouped = grouper::group(notes)?;
            let markdown = composer::compose(&grouped, &config.render, progress)?;

            (
                markdown,
                notes.len(),
                grouped.modules.len(),
                SourceKind::Flat,
                config.default_output.clone(),
            )
        }
    };

    let output_path = config.output.clone().unwrap_or(fallback_output);

    progress.phase("Writing output");
    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| NotedownError::io(parent, e))?;
        }
    }

    tokio::fs::write(&output_path, &markdown)
        .await
        .map_err(|e| NotedownError::io(&output_path, e))?;

    let result = ConvertJobResult {
        output_path,
        note_count,
        module_count,
        source,
        elapsed: start.elapsed(),
    };

    progress.done(&result);

    info!(
        notes = result.note_count,
        modules = result.module_count,
        source = %result.source,
        output = %result.output_path.display(),
        elapsed_ms = result.elapsed.as_millis(),
        "convert pipeline complete"
    );

    Ok(result)
}
