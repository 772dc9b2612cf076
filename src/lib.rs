//! sensory-survey: Build tactile sensory-evaluation questionnaires, collect
//! yes/no answers per descriptive term, and export them as a spreadsheet.

pub mod collector;
pub mod error;
pub mod export;
pub mod form;
pub mod platform;
pub mod report;
pub mod selection;
pub mod session;
pub mod taxonomy;
pub mod tui;
pub mod types;
