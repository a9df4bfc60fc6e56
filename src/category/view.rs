//! Category sidebar, category picker and the new category form.

use maud::{Markup, html};

use crate::{
    category::{Category, CategoryColor, CategoryId},
    endpoints::{self, format_endpoint},
    html::{BUTTON_DELETE_STYLE, BUTTON_PRIMARY_STYLE, FORM_TEXT_INPUT_STYLE, loading_spinner},
    note::CategoryFilter,
};

/// The ID of the sidebar element, used for out-of-band swaps.
pub const SIDEBAR_ID: &str = "category-sidebar";
/// The ID of the category picker in the note editor, used for out-of-band swaps.
pub const SELECT_ID: &str = "category-select";

/// The link to the notes page showing `filter`.
pub fn notes_link(filter: &CategoryFilter) -> String {
    format!("{}?category={filter}", endpoints::NOTES_VIEW)
}

/// The list of categories with the two built-in entries first.
///
/// Set `out_of_band` when the sidebar is sent alongside another response.
pub fn category_sidebar(
    categories: &[Category],
    active: &CategoryFilter,
    out_of_band: bool,
) -> Markup {
    let built_in = [
        (CategoryFilter::All, "All notes"),
        (CategoryFilter::Uncategorized, "Uncategorized"),
    ];

    html! {
        nav
            id=(SIDEBAR_ID)
            class="sidebar"
            aria-label="Categories"
            hx-swap-oob=[out_of_band.then_some("true")]
        {
            h2 class="sidebar-title" { "Categories" }

            ul class="category-list"
            {
                @for (filter, label) in &built_in
                {
                    li class="category-item"
                    {
                        (sidebar_link(filter, label, filter == active))
                    }
                }

                @for category in categories
                {
                    @let filter = CategoryFilter::Category(category.id);
                    li
                        class="category-item"
                        style={ "border-left-color: " (category.color.as_ref()) }
                        oncontextmenu="event.preventDefault(); this.querySelector('.btn-delete').click()"
                    {
                        (sidebar_link(&filter, category.name.as_ref(), &filter == active))

                        button
                            type="button"
                            class=(BUTTON_DELETE_STYLE)
                            title={ "Delete " (category.name) }
                            aria-label={ "Delete " (category.name) }
                            hx-delete=(format_endpoint(endpoints::DELETE_CATEGORY, category.id))
                            hx-confirm={
                                "Delete the category \"" (category.name) "\"? "
                                "Its notes will be kept without a category."
                            }
                            hx-vals=(format!(r#"{{"current_filter": "{active}"}}"#))
                            hx-target-error="#alert-container"
                        {
                            "×"
                        }
                    }
                }
            }
        }
    }
}

fn sidebar_link(filter: &CategoryFilter, label: &str, is_active: bool) -> Markup {
    html! {
        a
            href=(notes_link(filter))
            class=(if is_active { "category-link active" } else { "category-link" })
            aria-current=[is_active.then_some("page")]
        {
            (label)
        }
    }
}

/// The category picker in the note editor.
pub fn category_select(
    categories: &[Category],
    selected: Option<CategoryId>,
    out_of_band: bool,
) -> Markup {
    html! {
        select
            id=(SELECT_ID)
            name="category_id"
            class=(FORM_TEXT_INPUT_STYLE)
            aria-label="Category"
            hx-swap-oob=[out_of_band.then_some("true")]
        {
            option value="" selected[selected.is_none()] { "No category" }

            @for category in categories
            {
                option
                    value=(category.id)
                    selected[selected == Some(category.id)]
                {
                    (category.name)
                }
            }
        }
    }
}

/// The form for adding a category, with an optional error under the name field.
pub fn new_category_form(current_filter: &CategoryFilter, error_message: Option<&str>) -> Markup {
    html! {
        form
            id="new-category-form"
            class="new-category-form"
            hx-post=(endpoints::CATEGORIES_API)
            hx-target="this"
            hx-swap="outerHTML"
            hx-target-error="#alert-container"
            hx-disabled-elt="find button"
        {
            input type="hidden" name="current_filter" value=(current_filter);

            div class="new-category-fields"
            {
                input
                    type="text"
                    name="name"
                    placeholder="New category"
                    aria-label="Category name"
                    class=(FORM_TEXT_INPUT_STYLE)
                    required;

                input
                    type="color"
                    name="color"
                    aria-label="Category colour"
                    value=(CategoryColor::default().as_ref())
                    required;

                button type="submit" class=(BUTTON_PRIMARY_STYLE)
                {
                    span class="htmx-indicator" { (loading_spinner()) }
                    "Add"
                }
            }

            @if let Some(error_message) = error_message
            {
                p class="form-error" { (error_message) }
            }
        }
    }
}
