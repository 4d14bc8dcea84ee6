//! TUI for Plan View
//!
//! Draws a project's timeline chart in the terminal using ratatui and
//! crossterm, with synchronized horizontal scrolling and a resizable
//! label panel.

pub mod app;
pub mod error;
pub mod event;
pub mod timeline;
pub mod ui;

pub use app::{ActiveTab, App};
pub use error::{TuiError, TuiResult};
pub use timeline::{ChartLayout, ChartMode, ChartView, render_chart};
