//! Note grouping: module and lesson ordering derived from slug prefixes.

use notedown_shared::{GroupedNotes, LessonGroup, ModuleGroup, Note, NotedownError, Result};

/// Sort sentinel for slugs without a numeric prefix. Non-numeric "project"
/// modules sort after every numbered module and render as `Project`.
const NON_NUMERIC_ORDER: f64 = 100.0;

/// Numeric sort key from a slug's leading `-`-separated segment.
///
/// Parsed as a float so dotted lesson slugs (`"1.2-intro"`) order between
/// their whole-numbered neighbors. Non-numeric prefixes take the sentinel.
fn slug_order(slug: &str) -> f64 {
    slug.split('-')
        .next()
        .and_then(|prefix| prefix.parse::<f64>().ok())
        .filter(|n| !n.is_nan())
        .unwrap_or(NON_NUMERIC_ORDER)
}

/// Derived module title: `"{n} - {moduleTitle}"`, or the `Project` label
/// when the slug prefix is non-numeric.
fn module_title(note: &Note) -> String {
    let order = slug_order(&note.module_slug);
    if order == NON_NUMERIC_ORDER {
        format!("Project - {}", note.module_title)
    } else {
        format!("{} - {}", format_order(order), note.module_title)
    }
}

/// Render a slug order without a trailing `.0` for whole numbers.
fn format_order(order: f64) -> String {
    if order.fract() == 0.0 {
        format!("{}", order as i64)
    } else {
        format!("{order}")
    }
}

/// Group notes by module and lesson.
///
/// Module order comes from a stable sort by module-slug prefix (distinct
/// derived titles in first-seen order); lessons fill in from a second
/// stable sort by lesson-slug prefix. Notes sharing both slugs keep their
/// input order.
pub fn group(notes: &[Note]) -> Result<GroupedNotes> {
    // Pass 1: module skeleton.
    let mut by_module: Vec<&Note> = notes.iter().collect();
    by_module.sort_by(|a, b| slug_order(&a.module_slug).total_cmp(&slug_order(&b.module_slug)));

    let mut modules: Vec<ModuleGroup> = Vec::new();
    for note in &by_module {
        let title = module_title(note);
        if !modules.iter().any(|m| m.title == title) {
            modules.push(ModuleGroup {
                title,
                lessons: Vec::new(),
            });
        }
    }

    // Pass 2: lesson assignment.
    let mut by_lesson: Vec<&Note> = notes.iter().collect();
    by_lesson.sort_by(|a, b| slug_order(&a.lesson_slug).total_cmp(&slug_order(&b.lesson_slug)));

    for note in by_lesson {
        let title = module_title(note);
        // Both passes derive the title from the same data, so this lookup
        // should always succeed; a miss means inconsistent slugs and must
        // not drop the note silently.
        let module = modules.iter_mut().find(|m| m.title == title).ok_or_else(|| {
            NotedownError::validation(format!("module '{title}' missing from grouping skeleton"))
        })?;

        match module.lessons.iter_mut().find(|l| l.title == note.lesson_title) {
            Some(lesson) => lesson.notes.push(note.clone()),
            None => module.lessons.push(LessonGroup {
                title: note.lesson_title.clone(),
                notes: vec![note.clone()],
            }),
        }
    }

    Ok(GroupedNotes { modules })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
