//! HTML rendering: per-item fragments and the full dashboard page.

pub mod format;
pub mod fragment;
pub mod page;

pub use fragment::{FragmentTemplates, PLACEHOLDER_ICON};
pub use page::{compose_page, PageField, PAGE_FIELDS};
