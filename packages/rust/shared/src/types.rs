//! Core domain types for notedown course exports.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Note (flat export schema)
// ---------------------------------------------------------------------------

/// A single exported annotation from the flat note-array schema.
///
/// The `type` field in the export determines which metadata shape is
/// present; [`NoteKind`] enforces that at deserialization time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    /// Export-assigned note identifier.
    pub id: String,
    /// Raw HTML note body.
    pub content: String,
    /// When the note was created (epoch milliseconds in the export).
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
    /// When the note was last updated.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub updated_at: DateTime<Utc>,
    /// Course identifier, e.g. `"css-for-js"`.
    pub course_slug: String,
    /// Numeric-prefixed module slug, or a non-numeric "project" marker.
    pub module_slug: String,
    /// Human-readable module title.
    pub module_title: String,
    /// Numeric-prefixed lesson slug, optionally dotted (`"1.2-..."`).
    pub lesson_slug: String,
    /// Human-readable lesson title.
    pub lesson_title: String,
    /// Link to the lesson page.
    pub lesson_href: String,
    /// Variant payload discriminated by the export's `type` field.
    #[serde(flatten)]
    pub kind: NoteKind,
}

/// The two note variants and their metadata payloads.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "metadata")]
pub enum NoteKind {
    /// A bookmark taken while watching a lesson video.
    #[serde(rename = "lesson-video")]
    Video(VideoMetadata),
    /// A highlight taken from lesson text.
    #[serde(rename = "lesson-text")]
    Text(TextMetadata),
}

/// Metadata carried by `lesson-video` notes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoMetadata {
    /// Video identifier.
    pub video_id: String,
    /// Title of the video.
    pub video_title: String,
    /// Playback position in seconds where the note was taken.
    pub bookmarked_time: f64,
}

/// Metadata carried by `lesson-text` notes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextMetadata {
    /// Text that was highlighted when taking the note.
    pub highlighted: String,
}

// ---------------------------------------------------------------------------
// Course export (pre-grouped schema)
// ---------------------------------------------------------------------------

/// An already-grouped course export: chapters → lessons → items.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseExport {
    /// Course name.
    pub course: String,
    /// Course page URL.
    pub url: String,
    /// Top-level chapters in course order.
    pub chapters: Vec<Chapter>,
}

/// One chapter of a grouped export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chapter {
    /// Chapter title.
    pub chapter: String,
    /// Lessons within the chapter, in course order.
    pub lessons: Vec<ChapterLesson>,
}

/// One lesson of a grouped export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChapterLesson {
    /// Lesson title.
    pub lesson: String,
    /// Captured items; only `type == "note"` entries are rendered.
    #[serde(default)]
    pub items: Vec<LessonItem>,
}

/// A captured item within a lesson.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LessonItem {
    /// Item kind; notes carry `"note"`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Markdown/plain-text note body.
    #[serde(default)]
    pub body: String,
    /// Video timestamp label, e.g. `"12:34"`.
    #[serde(default)]
    pub timestamp: String,
    /// Deep link to the timestamped video position.
    #[serde(default)]
    pub url: String,
}

impl LessonItem {
    /// Whether this item is a note (the only kind rendered).
    pub fn is_note(&self) -> bool {
        self.kind == "note"
    }
}

// ---------------------------------------------------------------------------
// Input detection
// ---------------------------------------------------------------------------

/// The two supported input documents, auto-detected by shape.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum NotesInput {
    /// Schema (a): pre-grouped course export.
    Grouped(CourseExport),
    /// Schema (b): flat array of [`Note`] records requiring grouping.
    Flat(Vec<Note>),
}

// ---------------------------------------------------------------------------
// Grouped notes
// ---------------------------------------------------------------------------

/// Notes grouped by module and lesson, in rendering order.
#[derive(Debug, Clone)]
pub struct GroupedNotes {
    /// Modules in ascending slug-prefix order, non-numeric last.
    pub modules: Vec<ModuleGroup>,
}

/// One module's worth of grouped notes.
#[derive(Debug, Clone)]
pub struct ModuleGroup {
    /// Derived title, e.g. `"3 - Hooks"` or `"Project - Final"`.
    pub title: String,
    /// Lessons in ascending lesson-slug order.
    pub lessons: Vec<LessonGroup>,
}

/// One lesson's worth of grouped notes.
#[derive(Debug, Clone)]
pub struct LessonGroup {
    /// Lesson title as exported.
    pub title: String,
    /// Notes in lesson-slug order; ties keep input order.
    pub notes: Vec<Note>,
}

// ---------------------------------------------------------------------------
// CodeLanguage
// ---------------------------------------------------------------------------

/// Code-fence language hint for converted `<pre>` blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeLanguage {
    /// JavaScript courses fence as `jsx`.
    Jsx,
    /// Everything else fences as `css`.
    Css,
}

impl CodeLanguage {
    /// Map a `--course` flag value: `"js"` selects `jsx`, anything else `css`.
    pub fn from_course(course: &str) -> Self {
        if course == "js" { Self::Jsx } else { Self::Css }
    }

    /// The fence info string emitted after the opening backticks.
    pub fn fence_info(self) -> &'static str {
        match self {
            Self::Jsx => "jsx",
            Self::Css => "css",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIDEO_NOTE_JSON: &str = r#"{
        "id": "n1",
        "content": "<p>Remember this trick</p>",
        "createdAt": 1700000000000,
        "updatedAt": 1700000000000,
        "type": "lesson-video",
        "courseSlug": "css-for-js",
        "moduleSlug": "3-components",
        "moduleTitle": "Components",
        "lessonSlug": "2-styled-components",
        "lessonTitle": "Styled Components",
        "lessonHref": "https://example.com/lesson",
        "metadata": {
            "videoId": "v123",
            "videoTitle": "Intro to styled-components",
            "bookmarkedTime": 185.5
        }
    }"#;

    const TEXT_NOTE_JSON: &str = r#"{
        "id": "n2",
        "content": "<p>Example</p>",
        "createdAt": 1700000000000,
        "updatedAt": 1700000001000,
        "type": "lesson-text",
        "courseSlug": "css-for-js",
        "moduleSlug": "1-rendering",
        "moduleTitle": "Rendering Logic",
        "lessonSlug": "4-flow-layout",
        "lessonTitle": "Flow Layout",
        "lessonHref": "https://example.com/lesson2",
        "metadata": {
            "highlighted": "Use <select> tags"
        }
    }"#;

    #[test]
    fn video_note_deserializes() {
        let note: Note = serde_json::from_str(VIDEO_NOTE_JSON).expect("parse video note");
        assert_eq!(note.course_slug, "css-for-js");
        match &note.kind {
            NoteKind::Video(meta) => {
                assert_eq!(meta.video_title, "Intro to styled-components");
                assert_eq!(meta.bookmarked_time, 185.5);
            }
            NoteKind::Text(_) => panic!("expected video variant"),
        }
    }

    #[test]
    fn text_note_deserializes() {
        let note: Note = serde_json::from_str(TEXT_NOTE_JSON).expect("parse text note");
        match &note.kind {
            NoteKind::Text(meta) => assert_eq!(meta.highlighted, "Use <select> tags"),
            NoteKind::Video(_) => panic!("expected text variant"),
        }
    }

    #[test]
    fn type_tag_must_match_metadata_shape() {
        // lesson-text tag with video-shaped metadata lacks `highlighted`
        let mismatched = VIDEO_NOTE_JSON.replace("lesson-video", "lesson-text");
        let result: std::result::Result<Note, _> = serde_json::from_str(&mismatched);
        assert!(result.is_err());
    }

    #[test]
    fn note_roundtrip() {
        let note: Note = serde_json::from_str(TEXT_NOTE_JSON).expect("parse");
        let json = serde_json::to_string(&note).expect("serialize");
        let back: Note = serde_json::from_str(&json).expect("reparse");
        assert_eq!(back.lesson_slug, "4-flow-layout");
        assert_eq!(back.created_at, note.created_at);
    }

    #[test]
    fn input_detection_flat_array() {
        let json = format!("[{VIDEO_NOTE_JSON}, {TEXT_NOTE_JSON}]");
        let input: NotesInput = serde_json::from_str(&json).expect("parse input");
        match input {
            NotesInput::Flat(notes) => assert_eq!(notes.len(), 2),
            NotesInput::Grouped(_) => panic!("expected flat input"),
        }
    }

    #[test]
    fn input_detection_grouped_export() {
        let json = r#"{
            "course": "Web Performance",
            "url": "https://example.com/courses/web-perf",
            "chapters": [
                {
                    "chapter": "Metrics",
                    "lessons": [
                        {
                            "lesson": "Core Web Vitals",
                            "items": [
                                {"type": "note", "body": "LCP under 2.5s", "timestamp": "03:12", "url": "https://example.com/v#t=192"},
                                {"type": "transcript", "body": "ignored"}
                            ]
                        },
                        {"lesson": "No items here"}
                    ]
                }
            ]
        }"#;
        let input: NotesInput = serde_json::from_str(json).expect("parse input");
        match input {
            NotesInput::Grouped(export) => {
                assert_eq!(export.course, "Web Performance");
                let lesson = &export.chapters[0].lessons[0];
                assert_eq!(lesson.items.iter().filter(|i| i.is_note()).count(), 1);
                assert!(export.chapters[0].lessons[1].items.is_empty());
            }
            NotesInput::Flat(_) => panic!("expected grouped input"),
        }
    }

    #[test]
    fn code_language_mapping() {
        assert_eq!(CodeLanguage::from_course("js"), CodeLanguage::Jsx);
        assert_eq!(CodeLanguage::from_course("css"), CodeLanguage::Css);
        assert_eq!(CodeLanguage::from_course("animations"), CodeLanguage::Css);
        assert_eq!(CodeLanguage::Jsx.fence_info(), "jsx");
    }

    #[test]
    fn notes_fixture_validates() {
        let fixture = std::fs::read_to_string("../../../fixtures/json/notes.fixture.json")
            .expect("read fixture");
        let notes: Vec<Note> = serde_json::from_str(&fixture).expect("deserialize fixture notes");
        assert!(notes.len() >= 4);
        assert!(notes.iter().any(|n| matches!(n.kind, NoteKind::Video(_))));
        assert!(notes.iter().any(|n| matches!(n.kind, NoteKind::Text(_))));
    }

    #[test]
    fn course_export_fixture_validates() {
        let fixture =
            std::fs::read_to_string("../../../fixtures/json/course-export.fixture.json")
                .expect("read fixture");
        let export: CourseExport =
            serde_json::from_str(&fixture).expect("deserialize fixture export");
        assert!(!export.chapters.is_empty());
    }
}
