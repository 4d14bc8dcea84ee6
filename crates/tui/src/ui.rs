//! UI rendering for the TUI.
//!
//! Provides layout and widget rendering using ratatui.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph, Tabs},
};

use crate::app::{ActiveTab, App};
use crate::timeline::render_chart;

/// Tab titles.
const TAB_TITLES: [&str; 2] = ["Plan View", "Preview"];

/// Legend text for keyboard shortcuts.
const LEGEND: &str = " [j/k] Select  [h/l] Scroll  [Home/End] Jump  [t] Today  [v] View  \
                      [Tab] Tab  [r] Reload  [drag \u{2502}] Resize  [q] Quit ";

/// Draw the entire UI.
pub fn draw(frame: &mut Frame, app: &App) {
    let chunks = create_main_layout(frame.area());

    draw_tabs(frame, chunks[0], app);
    draw_chart(frame, chunks[1], app);
    draw_legend(frame, chunks[2], app.notice());
}

/// Create the main three-part layout: tab bar, chart, legend.
fn create_main_layout(area: Rect) -> Vec<Rect> {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Tab bar
            Constraint::Min(0),    // Chart
            Constraint::Length(1), // Legend bar
        ])
        .split(area)
        .to_vec()
}

/// Area the chart is drawn into for a terminal of size `area`.
pub fn chart_area(area: Rect) -> Rect {
    create_main_layout(area)[1]
}

/// Draw the tab bar with the active view in the title.
fn draw_tabs(frame: &mut Frame, area: Rect, app: &App) {
    let titles: Vec<Line> = TAB_TITLES.iter().map(|t| Line::from(*t)).collect();

    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .title(format!(" {} ", app.timeline().view()))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .select(app.active_tab().index())
        .style(Style::default().fg(Color::White))
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );

    frame.render_widget(tabs, area);
}

fn draw_chart(frame: &mut Frame, area: Rect, app: &App) {
    let view = app.chart_view(area);
    let is_focused = app.active_tab() == ActiveTab::Plan;
    render_chart(frame, area, &view, is_focused);
}

/// Draw the legend bar, or the pending notice in its place.
fn draw_legend(frame: &mut Frame, area: Rect, notice: Option<&str>) {
    let legend = match notice {
        Some(text) => Paragraph::new(format!(" {} ", text))
            .style(Style::default().fg(Color::Black).bg(Color::Yellow)),
        None => Paragraph::new(LEGEND).style(Style::default().fg(Color::Black).bg(Color::Cyan)),
    };

    frame.render_widget(legend, area);
}
