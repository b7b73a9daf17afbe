//! Markdown document composition.
//!
//! Two document variants: the flat-notes document (grouped by module and
//! lesson, note HTML converted to Markdown) and the grouped-export document
//! (pre-grouped chapters with optional timestamp footnotes).

use notedown_markdown::{convert_note_html, sanitize_highlight};
use notedown_shared::{
    CourseExport, GroupedNotes, Note, NoteKind, NotedownError, RenderConfig, Result,
};

use crate::pipeline::ProgressReporter;

// ---------------------------------------------------------------------------
// Flat-notes document
// ---------------------------------------------------------------------------

/// Compose the full Markdown document for grouped notes.
///
/// Walks the grouped structure in order: course title and link, then
/// `##` module headings, `###` lesson headings with a source link taken
/// from the lesson's first note, then one block per note.
pub fn compose(
    grouped: &GroupedNotes,
    render: &RenderConfig,
    progress: &dyn ProgressReporter,
) -> Result<String> {
    let first = grouped
        .modules
        .iter()
        .flat_map(|m| &m.lessons)
        .flat_map(|l| &l.notes)
        .next()
        .ok_or_else(|| NotedownError::validation("no notes to compose"))?;

    let course_name = first.course_slug.replace('-', " ").to_uppercase();
    let course_url = render
        .course_url_base
        .join(&first.course_slug)
        .map_err(|e| {
            NotedownError::validation(format!(
                "cannot build course URL for '{}': {e}",
                first.course_slug
            ))
        })?;

    let total: usize = grouped
        .modules
        .iter()
        .flat_map(|m| &m.lessons)
        .map(|l| l.notes.len())
        .sum();
    let mut converted = 0usize;

    let mut blocks: Vec<String> = Vec::new();
    blocks.push(format!("# {course_name}"));
    blocks.push(format!("From Course: [{course_name}]({course_url})"));

    for module in &grouped.modules {
        blocks.push(format!("## {}", module.title));

        for lesson in &module.lessons {
            blocks.push(format!("### {}", lesson.title));

            let lead = &lesson.notes[0];
            blocks.push(format!("From [{}]({})", lead.lesson_slug, lead.lesson_href));

            for note in &lesson.notes {
                blocks.push(note_block(note, render)?);
                converted += 1;
                progress.note_converted(converted, total);
            }
        }
    }

    Ok(blocks.join("\n\n"))
}

/// One note's block: a quote or video line, a blank line, then the
/// converted note content.
fn note_block(note: &Note, render: &RenderConfig) -> Result<String> {
    let content = convert_note_html(&note.content, render.code_language)?;

    let header = match &note.kind {
        NoteKind::Video(meta) => format!(
            "- From video: **{}** at {}:",
            meta.video_title,
            convert_seconds(meta.bookmarked_time)
        ),
        NoteKind::Text(meta) => format!("> {}", sanitize_highlight(&meta.highlighted)),
    };

    Ok(format!("{header}\n\n{content}"))
}

/// Format a bookmark position as `MM:SSm`.
///
/// Minutes are floor-divided, the remainder rounds to the nearest second
/// with no carry into the minute component: `3599` → `59:59m`, `3600` →
/// `60:00m`.
pub fn convert_seconds(secs: f64) -> String {
    let minutes = (secs / 60.0).floor() as i64;
    let seconds = (secs % 60.0).round() as i64;
    format!("{minutes:02}:{seconds:02}m")
}

// ---------------------------------------------------------------------------
// Grouped-export document (footnote mode)
// ---------------------------------------------------------------------------

/// Compose the Markdown document for a pre-grouped course export.
///
/// Chapters map to `##` headings and lessons with at least one note to
/// `###` headings. With `time_links`, each note row carries an inline
/// `~ [timestamp]` marker (hard line break) and the document ends with a
/// `---` separator followed by one `[timestamp]: url` footnote per note,
/// in emission order.
pub fn compose_course_export(export: &CourseExport, time_links: bool) -> String {
    let mut body: Vec<String> = Vec::new();
    let mut footnotes: Vec<String> = Vec::new();

    body.push(format!("# {}", export.course));
    body.push(format!("From Course: [{}]({})", export.course, export.url));

    for chapter in &export.chapters {
        body.push(format!("## {}", chapter.chapter));

        for lesson in &chapter.lessons {
            let notes: Vec<_> = lesson.items.iter().filter(|i| i.is_note()).collect();
            if notes.is_empty() {
                continue;
            }

            body.push(format!("### {}", lesson.lesson));

            for note in notes {
                let marker = if time_links {
                    format!("\n~ [{}]  ", note.timestamp)
                } else {
                    String::new()
                };
                body.push(format!("{} {}", note.body, marker));
                footnotes.push(format!("[{}]: {}", note.timestamp, note.url));
            }
        }
    }

    let mut doc = body.join("\n\n");
    if time_links {
        doc.push_str("\n\n---\n\n");
        doc.push_str(&footnotes.join("\n"));
    }
    doc
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
