//! Vinetop Library
//!
//! A terminal explorer for a static snapshot of token market metrics. The
//! crate splits into:
//!
//! - `data`: the token dataset model and the one-shot startup fetch
//! - `view_model`: pure filter / sort / search / rank derivation
//! - `ui`: the ratatui presentation layer consuming the derived lists

pub mod data;
pub mod ui;
pub mod view_model;

pub use data::{Dataset, Token};
pub use view_model::{SortField, SortOrder, ViewState};
