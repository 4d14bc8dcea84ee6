//! Chart widget for the Plan View and Preview tabs.
//!
//! The chart is a fixed label panel on the left and a horizontally
//! scrollable track on the right. Bars and header cells come from the
//! engine as percentages of the axis; this module snaps them to terminal
//! cells. One cell stands for [`CELL_PX`] pixels so the panel resizer and
//! scroll regions keep working in pixel units.
//!
//! Rows of the chart area:
//! - header: label header (fixed) and time header (scrolls)
//! - separator with a tick at every unit boundary
//! - one row per axe group header and per task
//! - scrollbar proxy

use std::ops::Range;

use ratatui::{
    Frame,
    layout::{Margin, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use planview_timeline::{
    ColumnWidths, LayoutRow, PlanLayout, Priority, RegionId, TaskRow, TaskStatus, TimelineView,
};

/// Pixels represented by one terminal cell.
pub const CELL_PX: f64 = 8.0;

/// Narrowest track kept visible next to the label panel.
const MIN_CHART_CELLS: u16 = 10;

/// Text drawn in place of a bar for tasks without a full date range.
const NO_DATES: &str = "no date range";

/// Header cell width for a view, in pixels.
///
/// Wide enough for the longest label of the view plus one cell of
/// separation ("May 27 \u{2013} Jun 2" is 14 cells).
pub fn unit_px(view: TimelineView) -> f64 {
    match view {
        TimelineView::Daily => 56.0,
        TimelineView::Weekly => 128.0,
        TimelineView::Monthly => 96.0,
    }
}

fn px_to_cells(px: f64) -> u16 {
    (px / CELL_PX).round().clamp(0.0, u16::MAX as f64) as u16
}

/// Which tab the chart is drawn for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartMode {
    /// Full chart with the responsible column and a resizable panel.
    Plan,
    /// Compact read-only chart with task names only.
    Preview,
}

/// Cell geometry of a chart drawn into a given area.
///
/// Computed the same way for drawing and for mouse hit testing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartLayout {
    pub mode: ChartMode,
    /// Area inside the border.
    pub inner: Rect,
    pub panel_cells: u16,
    pub name_cells: u16,
    pub responsible_cells: u16,
    /// Column of the panel border, which doubles as the resize handle.
    pub border_x: u16,
    pub chart_x: u16,
    pub chart_cells: u16,
    pub header_y: u16,
    pub body_y: u16,
    pub body_rows: u16,
    pub scrollbar_y: u16,
}

impl ChartLayout {
    /// Lay out a chart in `area` for a label panel `panel_width_px` wide.
    pub fn compute(area: Rect, panel_width_px: f64, mode: ChartMode) -> Self {
        let inner = area.inner(Margin::new(1, 1));
        let widths = ColumnWidths::for_panel(panel_width_px);
        let max_panel = inner.width.saturating_sub(MIN_CHART_CELLS + 1);

        let (panel_cells, name_cells, responsible_cells) = match mode {
            ChartMode::Plan => {
                let panel = px_to_cells(panel_width_px).min(max_panel);
                let name = px_to_cells(widths.task_name).min(panel);
                let responsible =
                    px_to_cells(widths.responsible).min(panel.saturating_sub(name + 1));
                (panel, name, responsible)
            }
            ChartMode::Preview => {
                let panel = px_to_cells(widths.task_name).min(max_panel);
                (panel, panel, 0)
            }
        };

        let border_x = inner.x + panel_cells;
        Self {
            mode,
            inner,
            panel_cells,
            name_cells,
            responsible_cells,
            border_x,
            chart_x: border_x + 1,
            chart_cells: inner.width.saturating_sub(panel_cells + 1),
            header_y: inner.y,
            body_y: inner.y + 2,
            body_rows: inner.height.saturating_sub(3),
            scrollbar_y: inner.y + inner.height.saturating_sub(1),
        }
    }

    /// Width of the visible track, in pixels.
    pub fn visible_px(&self) -> f64 {
        self.chart_cells as f64 * CELL_PX
    }

    /// Full track width for `units` header cells, never narrower than the
    /// visible track.
    pub fn content_px(&self, units: usize, view: TimelineView) -> f64 {
        (units as f64 * unit_px(view)).max(self.visible_px())
    }

    /// How far the track can scroll, in pixels.
    pub fn max_scroll(&self, units: usize, view: TimelineView) -> f64 {
        self.content_px(units, view) - self.visible_px()
    }

    fn contains(&self, column: u16, row: u16) -> bool {
        column >= self.inner.x
            && column < self.inner.right()
            && row >= self.inner.y
            && row < self.inner.bottom()
    }

    /// Whether a pointer at (`column`, `row`) grabs the resize handle.
    pub fn is_on_handle(&self, column: u16, row: u16) -> bool {
        self.mode == ChartMode::Plan && column == self.border_x && self.contains(column, row)
    }

    /// Scroll region under the pointer, if any.
    pub fn region_at(&self, column: u16, row: u16) -> Option<RegionId> {
        if !self.contains(column, row) || column == self.border_x {
            return None;
        }
        if column < self.border_x {
            return (row == self.header_y).then_some(RegionId::LabelHeader);
        }
        if row <= self.header_y + 1 {
            Some(RegionId::TimeHeader)
        } else if row == self.scrollbar_y {
            Some(RegionId::Scrollbar)
        } else {
            Some(RegionId::Content)
        }
    }

    /// Pointer position in pixels from the panel's left edge.
    pub fn pointer_px(&self, column: u16) -> f64 {
        column.saturating_sub(self.inner.x) as f64 * CELL_PX
    }
}

/// Everything needed to draw one chart.
#[derive(Debug, Clone, Copy)]
pub struct ChartView<'a> {
    pub layout: &'a PlanLayout,
    pub geometry: ChartLayout,
    /// Horizontal offsets of the scrolling regions, in pixels.
    pub header_offset: f64,
    pub content_offset: f64,
    pub scrollbar_offset: f64,
    /// Index of the selected task among task rows.
    pub selected: Option<usize>,
    pub is_resizing: bool,
}

impl ChartView<'_> {
    fn track_cells(&self) -> usize {
        let content_px = self
            .geometry
            .content_px(self.layout.units.len(), self.layout.view);
        (content_px / CELL_PX).round() as usize
    }
}

/// Cell range between two percentage edges on a track of `track` cells.
///
/// Always at least one cell wide on a non-empty track.
fn span_cells(left_percent: f64, right_percent: f64, track: usize) -> Range<usize> {
    if track == 0 {
        return 0..0;
    }
    let scale = track as f64 / 100.0;
    let start = ((left_percent * scale).round() as usize).min(track - 1);
    let end = ((right_percent * scale).round() as usize)
        .max(start + 1)
        .min(track);
    start..end
}

/// Flags appended to a task label: `!` for high priority, `!!` for urgent,
/// `*` when the task carries a comment.
fn task_marker(task: &TaskRow) -> String {
    let mut marker = String::new();
    match task.priority {
        Priority::High => marker.push_str(" !"),
        Priority::Urgent => marker.push_str(" !!"),
        Priority::Low | Priority::Medium => {}
    }
    if task.comment.is_some() {
        marker.push_str(" *");
    }
    marker
}

fn offset_cells(offset_px: f64) -> usize {
    (offset_px.max(0.0) / CELL_PX).round() as usize
}

/// Status bar colour.
fn status_color(status: TaskStatus) -> Color {
    match status {
        TaskStatus::Future => Color::Blue,
        TaskStatus::InProgress => Color::Green,
        TaskStatus::Overdue => Color::Red,
        TaskStatus::NoDate => Color::DarkGray,
    }
}

/// Truncate to `width` characters, marking cuts with an ellipsis.
fn fit(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len <= width {
        format!("{:<width$}", text, width = width)
    } else if width == 0 {
        String::new()
    } else {
        let kept: String = text.chars().take(width - 1).collect();
        format!("{}\u{2026}", kept)
    }
}

type Cell = (char, Style);

/// The visible window of a track, padded with blanks past its end.
fn visible(track: &[Cell], scroll: usize, width: usize) -> Vec<Cell> {
    (0..width)
        .map(|i| {
            track
                .get(scroll + i)
                .copied()
                .unwrap_or((' ', Style::default()))
        })
        .collect()
}

/// Merge runs of equally styled cells into spans.
fn to_spans(cells: &[Cell]) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    let mut run = String::new();
    let mut run_style = None;
    for &(c, style) in cells {
        if run_style != Some(style) {
            if let Some(previous) = run_style {
                spans.push(Span::styled(std::mem::take(&mut run), previous));
            }
            run_style = Some(style);
        }
        run.push(c);
    }
    if let Some(style) = run_style {
        spans.push(Span::styled(run, style));
    }
    spans
}

fn border_span(view: &ChartView<'_>, c: char) -> Span<'static> {
    let style = if view.is_resizing {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    Span::styled(c.to_string(), style)
}

/// Header row: fixed column titles, then unit labels.
fn build_header(view: &ChartView<'_>) -> Line<'static> {
    let g = &view.geometry;
    let title_style = Style::default().fg(Color::White).add_modifier(Modifier::BOLD);

    let mut panel = fit("Task", g.name_cells as usize);
    if g.responsible_cells > 0 {
        panel.push(' ');
        panel.push_str(&fit("Responsible", g.responsible_cells as usize));
    }
    let mut spans = vec![
        Span::styled(fit(&panel, g.panel_cells as usize), title_style),
        border_span(view, '\u{2502}'),
    ];

    let layout = view.layout;
    let track_len = view.track_cells();
    let mut track: Vec<Cell> = vec![(' ', Style::default()); track_len];
    for (unit, cell) in layout.units.iter().zip(&layout.unit_geometry) {
        let range = span_cells(
            cell.left_percent,
            cell.left_percent + cell.width_percent,
            track_len,
        );
        let is_current =
            unit.date <= layout.today && layout.today <= unit.last_day(layout.view);
        let style = if is_current {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        // Leave the boundary cell blank so adjacent labels never touch
        let room = range.len().saturating_sub(1);
        for (i, c) in unit.label.chars().take(room).enumerate() {
            track[range.start + i] = (c, style);
        }
    }

    let cells = visible(&track, offset_cells(view.header_offset), g.chart_cells as usize);
    spans.extend(to_spans(&cells));
    Line::from(spans)
}

/// Separator row with a tick at every unit boundary.
fn build_separator(view: &ChartView<'_>) -> Line<'static> {
    let g = &view.geometry;
    let style = Style::default().fg(Color::DarkGray);

    let mut spans = vec![
        Span::styled("\u{2500}".repeat(g.panel_cells as usize), style),
        border_span(view, '\u{253C}'),
    ];

    let layout = view.layout;
    let track_len = view.track_cells();
    let mut track: Vec<Cell> = vec![('\u{2500}', style); track_len];
    for cell in &layout.unit_geometry {
        let range = span_cells(
            cell.left_percent,
            cell.left_percent + cell.width_percent,
            track_len,
        );
        if range.start > 0 {
            track[range.start] = ('\u{252C}', style);
        }
    }

    let cells = visible(&track, offset_cells(view.header_offset), g.chart_cells as usize);
    spans.extend(to_spans(&cells));
    Line::from(spans)
}

/// Empty track with the today marker, if it is on the axis.
fn base_track(view: &ChartView<'_>, track_len: usize) -> Vec<Cell> {
    let mut track: Vec<Cell> = vec![(' ', Style::default()); track_len];
    if let Some(percent) = view.layout.today_marker_percent
        && track_len > 0
    {
        let col = ((percent / 100.0 * track_len as f64) as usize).min(track_len - 1);
        track[col] = ('\u{250A}', Style::default().fg(Color::Red));
    }
    track
}

/// Group header row for an axe.
fn build_axe_line(view: &ChartView<'_>, name: &str, task_count: usize) -> Line<'static> {
    let g = &view.geometry;
    let label = format!("\u{25BE} {} ({})", name, task_count);
    let mut spans = vec![
        Span::styled(
            fit(&label, g.panel_cells as usize),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        border_span(view, '\u{2502}'),
    ];

    let track_len = view.track_cells();
    let track = base_track(view, track_len);
    let cells = visible(&track, offset_cells(view.content_offset), g.chart_cells as usize);
    spans.extend(to_spans(&cells));
    Line::from(spans)
}

/// Task row: labels in the panel and the bar on the track.
fn build_task_line(view: &ChartView<'_>, task: &TaskRow, is_selected: bool) -> Line<'static> {
    let g = &view.geometry;

    let prefix = if is_selected { "\u{25B6} " } else { "  " };
    let name_width = (g.name_cells as usize).saturating_sub(2);
    let marker = task_marker(task);
    let description = fit(&task.description, name_width.saturating_sub(marker.len()));
    let label = format!("{}{}", description.trim_end(), marker);
    let mut panel = format!("{}{}", prefix, fit(&label, name_width));
    if g.responsible_cells > 0 {
        panel.push(' ');
        panel.push_str(&fit(&task.responsible, g.responsible_cells as usize));
    }
    let label_style = if is_selected {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    };
    let mut spans = vec![
        Span::styled(fit(&panel, g.panel_cells as usize), label_style),
        border_span(view, '\u{2502}'),
    ];

    let track_len = view.track_cells();
    let mut track = base_track(view, track_len);
    if let Some(bar) = task.geometry {
        let mut style = Style::default().fg(status_color(task.status));
        if is_selected {
            style = style.add_modifier(Modifier::BOLD | Modifier::REVERSED);
        }
        for cell in &mut track[span_cells(bar.left_percent, bar.right_percent(), track_len)] {
            *cell = ('\u{2588}', style);
        }
    }

    let mut cells = visible(&track, offset_cells(view.content_offset), g.chart_cells as usize);
    if task.geometry.is_none() {
        let style = Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::ITALIC);
        for (cell, c) in cells.iter_mut().skip(1).zip(NO_DATES.chars()) {
            *cell = (c, style);
        }
    }
    spans.extend(to_spans(&cells));
    Line::from(spans)
}

/// Scrollbar proxy: a thumb sized by the visible share of the track.
fn build_scrollbar(view: &ChartView<'_>) -> Line<'static> {
    let g = &view.geometry;
    let layout = view.layout;
    let width = g.chart_cells as usize;

    let mut spans = vec![
        Span::styled(
            fit(&format!(" {} view", layout.view), g.panel_cells as usize),
            Style::default().fg(Color::DarkGray),
        ),
        border_span(view, '\u{2502}'),
    ];
    if width == 0 {
        return Line::from(spans);
    }

    let content_px = g.content_px(layout.units.len(), layout.view);
    let max_scroll = g.max_scroll(layout.units.len(), layout.view);
    let thumb = ((width as f64 * g.visible_px() / content_px).round() as usize).clamp(1, width);
    let start = if max_scroll > 0.0 {
        ((view.scrollbar_offset / max_scroll).clamp(0.0, 1.0) * (width - thumb) as f64).round()
            as usize
    } else {
        0
    };

    let track_style = Style::default().fg(Color::DarkGray);
    let thumb_style = Style::default().fg(Color::Cyan);
    let cells: Vec<Cell> = (0..width)
        .map(|i| {
            if (start..start + thumb).contains(&i) {
                ('\u{2501}', thumb_style)
            } else {
                ('\u{2500}', track_style)
            }
        })
        .collect();
    spans.extend(to_spans(&cells));
    Line::from(spans)
}

/// First body row to draw so the selected row stays visible.
fn first_visible_row(selected_row: Option<usize>, body_rows: usize) -> usize {
    match selected_row {
        Some(row) if body_rows > 0 && row >= body_rows => row + 1 - body_rows,
        _ => 0,
    }
}

/// Index in `layout.rows` of the `task_index`-th task row.
fn row_of_task(layout: &PlanLayout, task_index: usize) -> Option<usize> {
    layout
        .rows
        .iter()
        .enumerate()
        .filter(|(_, row)| matches!(row, LayoutRow::Task(_)))
        .nth(task_index)
        .map(|(i, _)| i)
}

/// Render the chart into `area`.
pub fn render_chart(frame: &mut Frame, area: Rect, view: &ChartView<'_>, is_focused: bool) {
    let layout = view.layout;
    let border_color = if is_focused {
        Color::Yellow
    } else {
        Color::Cyan
    };
    let block = Block::default()
        .title(format!(
            " {} \u{00B7} {} to {} ",
            layout.project, layout.window.start, layout.window.end
        ))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color));

    if layout.rows.is_empty() {
        let paragraph = Paragraph::new("No tasks in plan")
            .block(block)
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(paragraph, area);
        return;
    }

    let g = &view.geometry;
    let mut lines = vec![build_header(view), build_separator(view)];

    let selected_row = view.selected.and_then(|i| row_of_task(layout, i));
    let first = first_visible_row(selected_row, g.body_rows as usize);
    for (index, row) in layout
        .rows
        .iter()
        .enumerate()
        .skip(first)
        .take(g.body_rows as usize)
    {
        lines.push(match row {
            LayoutRow::Axe { name, task_count } => build_axe_line(view, name, *task_count),
            LayoutRow::Task(task) => build_task_line(view, task, selected_row == Some(index)),
        });
    }
    while lines.len() < 2 + g.body_rows as usize {
        lines.push(Line::from(vec![
            Span::raw(" ".repeat(g.panel_cells as usize)),
            border_span(view, '\u{2502}'),
        ]));
    }
    lines.push(build_scrollbar(view));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
