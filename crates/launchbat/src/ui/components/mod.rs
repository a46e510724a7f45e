//! Collection of reusable TUI components.

pub mod dialogs;
pub mod path_field;
pub mod software_list;
