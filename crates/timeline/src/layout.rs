//! Plan View layout: the engine's single entry point.
//!
//! [`PlanLayout`] is a pure derivation of (project, view, today). The
//! [`Timeline`] controller owns the inputs plus the interactive state
//! (scroll synchronizer, panel resizer) for one chart session.

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashMap;

use crate::models::{PersonnelDirectory, PlanFile, Priority, Project, Task, responsible_label};
use crate::position::{Axis, TaskBarGeometry, UnitGeometry};
use crate::resize::PanelResizer;
use crate::scroll::{RegionId, ScrollSynchronizer, TrackedRegion};
use crate::status::{TaskStatus, classify};
use crate::units::{TimeUnit, generate_units};
use crate::view::TimelineView;
use crate::window::{Window, infer_window};

/// One task as placed on the chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskRow {
    pub id: String,
    pub axe: String,
    pub description: String,
    /// Responsible people, resolved to display names.
    pub responsible: String,
    pub priority: Priority,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    /// `None` renders as a "no date range" placeholder.
    pub geometry: Option<TaskBarGeometry>,
    pub status: TaskStatus,
}

/// A row of the chart, in display order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LayoutRow {
    /// Group header for an axe.
    Axe { name: String, task_count: usize },
    Task(TaskRow),
}

/// Everything a presentation layer needs to draw the chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanLayout {
    pub project: String,
    pub view: TimelineView,
    pub today: NaiveDate,
    pub window: Window,
    pub units: Vec<TimeUnit>,
    /// Header cell placement, parallel to `units`.
    pub unit_geometry: Vec<UnitGeometry>,
    pub today_marker_percent: Option<f64>,
    pub rows: Vec<LayoutRow>,
}

impl PlanLayout {
    /// Lay out `project` at `view` granularity relative to `today`.
    pub fn compute(
        project: &Project,
        view: TimelineView,
        today: NaiveDate,
        directory: &dyn PersonnelDirectory,
    ) -> Self {
        let window = infer_window(project.tasks(), view, today);
        let units = generate_units(&window, view);
        let axis = Axis::new(&window, view, &units);

        let mut rows = Vec::with_capacity(project.axes.len() + project.task_count());
        for axe in &project.axes {
            rows.push(LayoutRow::Axe {
                name: axe.name.clone(),
                task_count: axe.tasks.len(),
            });
            for task in &axe.tasks {
                rows.push(LayoutRow::Task(task_row(
                    task, &axe.name, &axis, today, directory,
                )));
            }
        }

        Self {
            project: project.name.clone(),
            view,
            today,
            window,
            unit_geometry: axis.unit_geometry(&units),
            today_marker_percent: axis.today_marker_percent(today),
            units,
            rows,
        }
    }

    /// Task rows only, skipping axe headers.
    pub fn task_rows(&self) -> impl Iterator<Item = &TaskRow> {
        self.rows.iter().filter_map(|row| match row {
            LayoutRow::Task(task) => Some(task),
            LayoutRow::Axe { .. } => None,
        })
    }

    /// Find a task row by task id.
    pub fn task_row(&self, id: &str) -> Option<&TaskRow> {
        self.task_rows().find(|row| row.id == id)
    }

    /// Number of task rows.
    pub fn task_count(&self) -> usize {
        self.task_rows().count()
    }
}

fn task_row(
    task: &Task,
    axe: &str,
    axis: &Axis,
    today: NaiveDate,
    directory: &dyn PersonnelDirectory,
) -> TaskRow {
    TaskRow {
        id: task.id.clone(),
        axe: axe.to_string(),
        description: task.description.clone(),
        responsible: responsible_label(task, directory),
        priority: task.priority,
        comment: task.comment.clone(),
        start_date: task.start_date,
        end_date: task.end_date,
        geometry: axis.bar(task),
        status: classify(task, today),
    }
}

/// Work done during one animation frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameUpdate {
    /// Regions whose scroll offset was written.
    pub scrolled_regions: usize,
    /// New panel width, if it changed.
    pub panel_width: Option<f64>,
}

impl FrameUpdate {
    pub fn is_idle(&self) -> bool {
        self.scrolled_regions == 0 && self.panel_width.is_none()
    }
}

/// A live chart session: inputs, cached layout and interaction state.
#[derive(Debug)]
pub struct Timeline {
    project: Project,
    personnel: HashMap<String, String>,
    view: TimelineView,
    today: NaiveDate,
    layout: PlanLayout,
    scroll: ScrollSynchronizer<TrackedRegion>,
    resizer: PanelResizer,
}

impl Timeline {
    pub fn new(plan: PlanFile, view: TimelineView, today: NaiveDate) -> Self {
        let layout = PlanLayout::compute(&plan.project, view, today, &plan.personnel);
        let scroll = ScrollSynchronizer::new([
            (RegionId::LabelHeader, TrackedRegion::new(0.0)),
            (RegionId::TimeHeader, TrackedRegion::new(0.0)),
            (RegionId::Content, TrackedRegion::new(0.0)),
            (RegionId::Scrollbar, TrackedRegion::new(0.0)),
        ]);

        Self {
            project: plan.project,
            personnel: plan.personnel,
            view,
            today,
            layout,
            scroll,
            resizer: PanelResizer::default(),
        }
    }

    pub fn layout(&self) -> &PlanLayout {
        &self.layout
    }

    pub fn project(&self) -> &Project {
        &self.project
    }

    pub fn view(&self) -> TimelineView {
        self.view
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn scroll(&self) -> &ScrollSynchronizer<TrackedRegion> {
        &self.scroll
    }

    pub fn scroll_mut(&mut self) -> &mut ScrollSynchronizer<TrackedRegion> {
        &mut self.scroll
    }

    pub fn resizer(&self) -> &PanelResizer {
        &self.resizer
    }

    pub fn resizer_mut(&mut self) -> &mut PanelResizer {
        &mut self.resizer
    }

    /// Switch granularity. Regenerates units and every bar, and scrolls
    /// back to the axis start. Returns `false` if `view` was already active.
    pub fn select_view(&mut self, view: TimelineView) -> bool {
        if view == self.view {
            return false;
        }
        tracing::debug!(from = %self.view, to = %view, "switching timeline view");
        self.view = view;
        self.relayout();
        self.scroll.jump_to(0.0);
        true
    }

    /// Advance to the next view in cycling order.
    pub fn cycle_view(&mut self) -> TimelineView {
        self.select_view(self.view.next());
        self.view
    }

    /// Replace the task set and personnel lookup.
    pub fn replace_plan(&mut self, plan: PlanFile) {
        self.project = plan.project;
        self.personnel = plan.personnel;
        self.relayout();
    }

    /// Move the "today" reference, e.g. after midnight.
    pub fn set_today(&mut self, today: NaiveDate) {
        if today != self.today {
            self.today = today;
            self.relayout();
        }
    }

    /// Set how far the chart can scroll horizontally, in pixels.
    pub fn set_scroll_extent(&mut self, max_scroll: f64) {
        for (id, region) in self.scroll.regions_mut() {
            if id.scrolls_horizontally() {
                region.set_max_scroll(max_scroll);
            }
        }
    }

    /// Run one animation frame of pending interactive work.
    pub fn on_animation_frame(&mut self) -> FrameUpdate {
        FrameUpdate {
            scrolled_regions: self.scroll.on_animation_frame(),
            panel_width: self.resizer.on_animation_frame(),
        }
    }

    fn relayout(&mut self) {
        self.layout = PlanLayout::compute(&self.project, self.view, self.today, &self.personnel);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Axe;
    use crate::scroll::ScrollRegion;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample_plan() -> PlanFile {
        let project = Project::new("Summit")
            .with_axe(
                Axe::new("Venue")
                    .with_task(
                        Task::new("t1", "Book hall")
                            .with_dates(date(2024, 6, 3), date(2024, 6, 5))
                            .with_responsible("p1"),
                    )
                    .with_task(Task::new("t2", "Floor plan")),
            )
            .with_axe(
                Axe::new("Comms").with_task(
                    Task::new("t3", "Press release")
                        .with_dates(date(2024, 6, 10), date(2024, 6, 20))
                        .with_priority(Priority::Urgent),
                ),
            );
        let mut personnel = HashMap::new();
        personnel.insert("p1".to_string(), "Ada".to_string());
        PlanFile { project, personnel }
    }

    #[test]
    fn test_compute_rows_in_axe_order() {
        let plan = sample_plan();
        let layout =
            PlanLayout::compute(&plan.project, TimelineView::Weekly, date(2024, 6, 15), &plan.personnel);

        assert_eq!(layout.rows.len(), 5);
        assert!(matches!(&layout.rows[0], LayoutRow::Axe { name, task_count: 2 } if name == "Venue"));
        assert!(matches!(&layout.rows[3], LayoutRow::Axe { name, task_count: 1 } if name == "Comms"));
        assert_eq!(layout.task_count(), 3);
    }

    #[test]
    fn test_compute_fills_task_rows() {
        let plan = sample_plan();
        let layout =
            PlanLayout::compute(&plan.project, TimelineView::Weekly, date(2024, 6, 15), &plan.personnel);

        let booked = layout.task_row("t1").unwrap();
        assert_eq!(booked.responsible, "Ada");
        assert_eq!(booked.axe, "Venue");
        assert_eq!(booked.status, TaskStatus::Overdue);
        assert!(booked.geometry.is_some());

        let undated = layout.task_row("t2").unwrap();
        assert_eq!(undated.geometry, None);
        assert_eq!(undated.status, TaskStatus::NoDate);
        assert_eq!(undated.responsible, "Unassigned");

        let press = layout.task_row("t3").unwrap();
        assert_eq!(press.status, TaskStatus::InProgress);
        assert_eq!(press.priority, Priority::Urgent);
    }

    #[test]
    fn test_compute_header_matches_units() {
        let plan = sample_plan();
        let layout =
            PlanLayout::compute(&plan.project, TimelineView::Daily, date(2024, 6, 15), &plan.personnel);

        assert_eq!(layout.units.len(), layout.unit_geometry.len());
        assert_eq!(layout.units.first().map(|u| u.date), Some(layout.window.start));
        assert!(layout.today_marker_percent.is_some());
    }

    #[test]
    fn test_layout_serializes_rows_with_kind_tag() {
        let plan = sample_plan();
        let layout =
            PlanLayout::compute(&plan.project, TimelineView::Weekly, date(2024, 6, 15), &plan.personnel);
        let json = serde_json::to_value(&layout).unwrap();

        assert_eq!(json["view"], "weekly");
        assert_eq!(json["rows"][0]["kind"], "axe");
        assert_eq!(json["rows"][1]["kind"], "task");
        assert_eq!(json["rows"][1]["status"], "overdue");
        assert!(json["rows"][2]["geometry"].is_null());
    }

    // =============================================
    // Timeline controller
    // =============================================

    #[test]
    fn test_select_view_relayouts() {
        let mut timeline = Timeline::new(sample_plan(), TimelineView::Weekly, date(2024, 6, 15));
        let weekly_units = timeline.layout().units.len();

        assert!(timeline.select_view(TimelineView::Daily));
        assert_eq!(timeline.layout().view, TimelineView::Daily);
        assert!(timeline.layout().units.len() > weekly_units);
        assert!(!timeline.select_view(TimelineView::Daily));
    }

    #[test]
    fn test_cycle_view() {
        let mut timeline = Timeline::new(sample_plan(), TimelineView::Monthly, date(2024, 6, 15));
        assert_eq!(timeline.cycle_view(), TimelineView::Daily);
        assert_eq!(timeline.cycle_view(), TimelineView::Weekly);
    }

    #[test]
    fn test_select_view_resets_scroll() {
        let mut timeline = Timeline::new(sample_plan(), TimelineView::Weekly, date(2024, 6, 15));
        timeline.set_scroll_extent(1000.0);
        timeline
            .scroll_mut()
            .region_mut(RegionId::Content)
            .unwrap()
            .set_scroll_left(300.0);
        timeline.scroll_mut().on_scroll(RegionId::Content, 300.0);
        timeline.on_animation_frame();

        timeline.select_view(TimelineView::Monthly);
        assert_eq!(timeline.scroll().offset(), 0.0);
        assert_eq!(
            timeline.scroll().region(RegionId::TimeHeader).unwrap().offset(),
            0.0
        );
    }

    #[test]
    fn test_set_today_reclassifies() {
        let mut timeline = Timeline::new(sample_plan(), TimelineView::Weekly, date(2024, 6, 1));
        assert_eq!(timeline.layout().task_row("t1").unwrap().status, TaskStatus::Future);

        timeline.set_today(date(2024, 6, 4));
        assert_eq!(
            timeline.layout().task_row("t1").unwrap().status,
            TaskStatus::InProgress
        );
    }

    #[test]
    fn test_replace_plan() {
        let mut timeline = Timeline::new(sample_plan(), TimelineView::Weekly, date(2024, 6, 15));
        timeline.replace_plan(PlanFile::default());

        assert_eq!(timeline.layout().task_count(), 0);
        assert!(!timeline.layout().units.is_empty());
    }

    #[test]
    fn test_frame_runs_scroll_and_resize() {
        let mut timeline = Timeline::new(sample_plan(), TimelineView::Weekly, date(2024, 6, 15));
        timeline.set_scroll_extent(500.0);
        timeline
            .scroll_mut()
            .region_mut(RegionId::Scrollbar)
            .unwrap()
            .set_scroll_left(50.0);
        timeline.scroll_mut().on_scroll(RegionId::Scrollbar, 50.0);
        timeline.resizer_mut().pointer_down(400.0, 0.0);
        timeline.resizer_mut().pointer_move(600.0);

        let update = timeline.on_animation_frame();
        assert_eq!(update.scrolled_regions, 2);
        assert_eq!(update.panel_width, Some(600.0));
        assert!(timeline.on_animation_frame().is_idle());
    }
}
