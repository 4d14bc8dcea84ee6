//! Output formatting module for Plan View
//!
//! Provides table formatting and ASCII bar rendering for CLI output.

use chrono::NaiveDate;
use planview_timeline::{PlanLayout, TaskBarGeometry, TaskRow};

use crate::commands::AxeStatusSummary;

/// Maximum width for the task description column before truncation
const MAX_DESCRIPTION_WIDTH: usize = 30;

/// Maximum width for the responsible column before truncation
const MAX_RESPONSIBLE_WIDTH: usize = 20;

/// Truncate a string to the specified maximum width, adding ellipsis if needed.
pub fn truncate(s: &str, max_width: usize) -> String {
    if s.chars().count() <= max_width {
        s.to_string()
    } else if max_width <= 3 {
        s.chars().take(max_width).collect()
    } else {
        let kept: String = s.chars().take(max_width - 3).collect();
        format!("{}...", kept)
    }
}

/// Format a percentage with two decimals.
pub fn format_percent(value: f64) -> String {
    format!("{:.2}", value)
}

/// Format an optional date, using "-" when absent.
pub fn format_date(date: Option<NaiveDate>) -> String {
    date.map_or_else(|| "-".to_string(), |d| d.to_string())
}

/// Render a bar on a character track of `width` cells.
///
/// The bar always occupies at least one cell. Tasks without geometry
/// render as an empty track marker.
pub fn render_bar(geometry: Option<TaskBarGeometry>, width: usize) -> String {
    if width == 0 {
        return String::new();
    }
    let Some(bar) = geometry else {
        return "(no dates)".to_string();
    };

    let scale = width as f64 / 100.0;
    let start = ((bar.left_percent * scale).round() as usize).min(width - 1);
    let len = ((bar.width_percent * scale).round() as usize).max(1);
    let end = (start + len).min(width);

    (0..width)
        .map(|i| if (start..end).contains(&i) { '#' } else { '.' })
        .collect()
}

/// Lay out rows under headers with columns separated by two spaces.
fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(i, header)| {
            rows.iter()
                .map(|row| row[i].chars().count())
                .max()
                .unwrap_or(0)
                .max(header.chars().count())
        })
        .collect();

    let mut output = String::new();
    let header_line: Vec<String> = headers
        .iter()
        .zip(&widths)
        .map(|(h, w)| format!("{:<w$}", h, w = w))
        .collect();
    output.push_str(header_line.join("  ").trim_end());
    output.push('\n');

    let separator: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    output.push_str(&separator.join("  "));
    output.push('\n');

    for row in rows {
        let line: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(cell, w)| format!("{:<w$}", cell, w = w))
            .collect();
        output.push_str(line.join("  ").trim_end());
        output.push('\n');
    }

    // Remove trailing newline
    output.pop();

    output
}

/// Format the header cells of a layout.
///
/// ```text
/// #  Start       End         Label            Left%  Width%
/// -  ----------  ----------  ---------------  -----  ------
/// 0  2024-05-20  2024-05-26  May 20 – 26       0.00   14.29
/// ```
pub fn format_units_table(layout: &PlanLayout) -> String {
    let rows: Vec<Vec<String>> = layout
        .units
        .iter()
        .zip(&layout.unit_geometry)
        .enumerate()
        .map(|(i, (unit, cell))| {
            vec![
                i.to_string(),
                unit.date.to_string(),
                unit.last_day(layout.view).to_string(),
                unit.label.clone(),
                format_percent(cell.left_percent),
                format_percent(cell.width_percent),
            ]
        })
        .collect();

    render_table(&["#", "Start", "End", "Label", "Left%", "Width%"], &rows)
}

/// Format task rows with their geometry, status and an ASCII bar.
pub fn format_bar_table(tasks: &[&TaskRow], chart_width: usize) -> String {
    if tasks.is_empty() {
        return "No tasks found.".to_string();
    }

    let rows: Vec<Vec<String>> = tasks
        .iter()
        .map(|task| {
            let (left, width) = task.geometry.map_or_else(
                || ("-".to_string(), "-".to_string()),
                |g| (format_percent(g.left_percent), format_percent(g.width_percent)),
            );
            vec![
                task.id.clone(),
                truncate(&task.description, MAX_DESCRIPTION_WIDTH),
                truncate(&task.responsible, MAX_RESPONSIBLE_WIDTH),
                task.status.to_string(),
                task.priority.to_string(),
                format_date(task.start_date),
                format_date(task.end_date),
                left,
                width,
                render_bar(task.geometry, chart_width),
            ]
        })
        .collect();

    render_table(
        &[
            "ID",
            "Task",
            "Responsible",
            "Status",
            "Priority",
            "Start",
            "End",
            "Left%",
            "Width%",
            "Bar",
        ],
        &rows,
    )
}

/// Format status counts per axe, with a closing total row.
pub fn format_status_table(summaries: &[AxeStatusSummary]) -> String {
    if summaries.is_empty() {
        return "No axes found.".to_string();
    }

    let mut total = AxeStatusSummary::new("Total");
    let mut rows: Vec<Vec<String>> = Vec::with_capacity(summaries.len() + 1);
    for summary in summaries {
        total.absorb(summary);
        rows.push(status_row(summary));
    }
    rows.push(status_row(&total));

    render_table(
        &["Axe", "Future", "In progress", "Overdue", "No date", "Tasks"],
        &rows,
    )
}

fn status_row(summary: &AxeStatusSummary) -> Vec<String> {
    vec![
        summary.axe.clone(),
        summary.future.to_string(),
        summary.in_progress.to_string(),
        summary.overdue.to_string(),
        summary.no_date.to_string(),
        summary.total().to_string(),
    ]
}
