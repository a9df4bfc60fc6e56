//! The note list and note cards.

use maud::{Markup, html};
use time::UtcOffset;

use crate::{
    category::Category,
    endpoints::{self, format_endpoint},
    html::{BUTTON_DELETE_STYLE, NEUTRAL_COLOR},
    note::{CategoryFilter, Note, format_display_date, visible_notes},
};

/// The ID of the element holding the list, targeted by the editor and delete buttons.
pub const NOTE_LIST_ID: &str = "note-list";

pub const NO_NOTES_MESSAGE: &str = "No notes yet. Start writing!";
pub const EMPTY_CATEGORY_MESSAGE: &str = "No notes in this category yet";

/// The heading above the list for `filter`.
///
/// A category ID that is not in `categories` gets the same title as all notes.
pub fn list_title(filter: &CategoryFilter, categories: &[Category]) -> String {
    match filter {
        CategoryFilter::All => "My notes".to_owned(),
        CategoryFilter::Uncategorized => "Uncategorized notes".to_owned(),
        CategoryFilter::Category(id) => categories
            .iter()
            .find(|category| category.id == *id)
            .map(|category| format!("Notes: {}", category.name))
            .unwrap_or_else(|| "My notes".to_owned()),
    }
}

/// The link the list uses to reload itself.
pub fn note_list_link(filter: &CategoryFilter) -> String {
    format!("{}?category={filter}", endpoints::NOTES_API)
}

/// The "Created: ..." label of a note card.
///
/// Prefers the stored display date, then the server timestamp, then "Unknown".
pub fn created_label(note: &Note, local_offset: UtcOffset) -> String {
    let date = match (&note.display_date, note.created_at) {
        (Some(display_date), _) if !display_date.trim().is_empty() => display_date.clone(),
        (_, Some(created_at)) => format_display_date(created_at, local_offset),
        _ => "Unknown".to_owned(),
    };

    format!("Created: {date}")
}

/// The list of notes for `filter`, including its title and empty states.
///
/// `notes` is what the query returned. The filter is applied again before
/// rendering, so a note that does not belong under `filter` is never shown.
pub fn note_list(
    notes: &[Note],
    filter: &CategoryFilter,
    categories: &[Category],
    local_offset: UtcOffset,
) -> Markup {
    let visible = visible_notes(notes, filter);

    html! {
        section
            id=(NOTE_LIST_ID)
            class="note-list"
            hx-get=(note_list_link(filter))
            hx-trigger="visibilitychange[document.visibilityState === 'visible'] from:document"
            hx-swap="outerHTML"
            hx-target-error="#alert-container"
        {
            h2 class="note-list-title" { (list_title(filter, categories)) }

            @if notes.is_empty() {
                p class="empty-state" { (NO_NOTES_MESSAGE) }
            } @else if visible.is_empty() {
                p class="empty-state" { (EMPTY_CATEGORY_MESSAGE) }
            } @else {
                @for note in visible {
                    @let category = note
                        .category_id
                        .and_then(|id| categories.iter().find(|category| category.id == id));
                    (note_card(note, category, filter, local_offset))
                }
            }
        }
    }
}

fn note_card(
    note: &Note,
    category: Option<&Category>,
    filter: &CategoryFilter,
    local_offset: UtcOffset,
) -> Markup {
    let color = category
        .map(|category| category.color.as_ref())
        .unwrap_or(NEUTRAL_COLOR);

    html! {
        article class="note-card" style={ "border-left-color: " (color) } data-note-id=(note.id)
        {
            div class="note-header"
            {
                @if let Some(category) = category {
                    span class="category-badge" style={ "background-color: " (color) }
                    {
                        (category.name)
                    }
                }

                button
                    type="button"
                    class=(BUTTON_DELETE_STYLE)
                    title="Delete note"
                    aria-label="Delete note"
                    hx-delete=(format_endpoint(endpoints::DELETE_NOTE, note.id))
                    hx-vals=(format!(r#"{{"current_filter": "{filter}"}}"#))
                    hx-confirm="Delete this note?"
                    hx-target={ "#" (NOTE_LIST_ID) }
                    hx-swap="outerHTML"
                    hx-target-error="#alert-container"
                {
                    "×"
                }
            }

            p class="note-text" { (note.text) }

            p class="note-date" { (created_label(note, local_offset)) }
        }
    }
}
