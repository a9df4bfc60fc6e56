//! User-defined categories for grouping notes.

mod create;
mod db;
mod delete;
mod domain;
mod view;

pub use create::{CreateCategoryState, create_category_endpoint};
pub use db::{create_category, create_category_table, get_categories, get_category};
pub use delete::{DeleteCategoryState, delete_category_endpoint};
pub use domain::{Category, CategoryColor, CategoryId, CategoryName};
pub use view::{category_select, category_sidebar, new_category_form, notes_link};
