//! Main application state and event loop.

use std::io::{self, Stdout};
use std::path::PathBuf;
use std::time::Duration;

use chrono::{Local, NaiveDate};
use crossterm::{
    event::{
        DisableMouseCapture, EnableMouseCapture, KeyEvent, MouseButton, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::Terminal;
use ratatui::prelude::*;

use planview_timeline::{PlanFile, RegionId, ScrollRegion, Timeline, TimelineView};

use crate::error::TuiResult;
use crate::event::{
    Input, is_cycle_view, is_down, is_end, is_escape, is_home, is_left, is_quit, is_reload,
    is_right, is_tab, is_today, is_up, poll_input,
};
use crate::timeline::{ChartLayout, ChartMode, ChartView, unit_px};
use crate::ui;

/// Regions the host reports scroll events for.
const HORIZONTAL_REGIONS: [RegionId; 3] =
    [RegionId::TimeHeader, RegionId::Content, RegionId::Scrollbar];

/// The active tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActiveTab {
    #[default]
    Plan,
    Preview,
}

impl ActiveTab {
    /// Cycle to the next tab.
    pub fn next(self) -> Self {
        match self {
            Self::Plan => Self::Preview,
            Self::Preview => Self::Plan,
        }
    }

    /// Get the index of the current tab (0 or 1).
    pub fn index(self) -> usize {
        match self {
            Self::Plan => 0,
            Self::Preview => 1,
        }
    }

    fn chart_mode(self) -> ChartMode {
        match self {
            Self::Plan => ChartMode::Plan,
            Self::Preview => ChartMode::Preview,
        }
    }
}

/// Main application state.
pub struct App {
    /// Chart session: layout, scroll sync and panel resizer.
    timeline: Timeline,
    /// Plan file to reload from, if the plan came from disk.
    plan_path: Option<PathBuf>,
    /// Whether "today" tracks the system clock.
    follow_clock: bool,
    active_tab: ActiveTab,
    /// Index of the selected task among task rows.
    selected_task: usize,
    running: bool,
    /// Terminal area as of the last draw.
    area: Rect,
    /// Offsets last reported for each horizontal region.
    reported_offsets: [f64; 3],
    /// One-line message shown in place of the key legend.
    notice: Option<String>,
    reload_requested: bool,
}

impl App {
    /// Create an App for an in-memory plan.
    pub fn new(plan: PlanFile, view: TimelineView, today: NaiveDate) -> Self {
        Self {
            timeline: Timeline::new(plan, view, today),
            plan_path: None,
            follow_clock: false,
            active_tab: ActiveTab::default(),
            selected_task: 0,
            running: true,
            area: Rect::default(),
            reported_offsets: [0.0; 3],
            notice: None,
            reload_requested: false,
        }
    }

    /// Load the plan at `path`.
    ///
    /// Without a fixed `today`, the chart follows the system clock.
    ///
    /// # Errors
    ///
    /// Returns `TuiError::Plan` if the file cannot be read or parsed.
    pub async fn load(
        path: PathBuf,
        view: TimelineView,
        today: Option<NaiveDate>,
    ) -> TuiResult<Self> {
        let plan = PlanFile::load(&path).await?;
        let mut app = Self::new(plan, view, today.unwrap_or_else(|| Local::now().date_naive()));
        app.plan_path = Some(path);
        app.follow_clock = today.is_none();
        Ok(app)
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn active_tab(&self) -> ActiveTab {
        self.active_tab
    }

    pub fn selected_task(&self) -> usize {
        self.selected_task
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// Record the terminal area and resize the scroll extent to match.
    pub fn set_area(&mut self, area: Rect) {
        self.area = area;
        self.sync_scroll_extent();
    }

    /// Chart geometry for a chart drawn into `chart_area`.
    pub fn chart_geometry(&self, chart_area: Rect) -> ChartLayout {
        ChartLayout::compute(
            chart_area,
            self.timeline.resizer().width(),
            self.active_tab.chart_mode(),
        )
    }

    /// Everything the chart widget needs to draw into `chart_area`.
    pub fn chart_view(&self, chart_area: Rect) -> ChartView<'_> {
        let offset = |id| {
            self.timeline
                .scroll()
                .region(id)
                .map_or(0.0, |region| region.offset())
        };
        let layout = self.timeline.layout();
        ChartView {
            layout,
            geometry: self.chart_geometry(chart_area),
            header_offset: offset(RegionId::TimeHeader),
            content_offset: offset(RegionId::Content),
            scrollbar_offset: offset(RegionId::Scrollbar),
            selected: (layout.task_count() > 0).then_some(self.selected_task),
            is_resizing: self.timeline.resizer().is_resizing(),
        }
    }

    fn geometry(&self) -> ChartLayout {
        self.chart_geometry(ui::chart_area(self.area))
    }

    fn sync_scroll_extent(&mut self) {
        let layout = self.timeline.layout();
        let max = self.geometry().max_scroll(layout.units.len(), layout.view);
        self.timeline.set_scroll_extent(max);
    }

    fn region_offset(&self, id: RegionId) -> f64 {
        self.timeline
            .scroll()
            .region(id)
            .map_or(0.0, |region| region.offset())
    }

    /// Report every region whose offset moved since the last report, the
    /// way a host fires scroll events for both user and programmatic
    /// scrolling.
    fn report_scroll_events(&mut self) {
        for (index, id) in HORIZONTAL_REGIONS.into_iter().enumerate() {
            let offset = self.region_offset(id);
            if offset != self.reported_offsets[index] {
                self.reported_offsets[index] = offset;
                self.timeline.scroll_mut().on_scroll(id, offset);
            }
        }
    }

    /// Scroll one region by `delta` pixels, as a user gesture on it would.
    fn scroll_region(&mut self, id: RegionId, delta: f64) {
        let current = self.region_offset(id);
        if let Some(region) = self.timeline.scroll_mut().region_mut(id) {
            region.set_scroll_left(current + delta);
        }
    }

    fn jump_to(&mut self, offset: f64) {
        let layout = self.timeline.layout();
        let max = self.geometry().max_scroll(layout.units.len(), layout.view);
        self.timeline.scroll_mut().jump_to(offset.clamp(0.0, max));
    }

    /// Scroll so the today marker sits in the middle of the track.
    fn center_on_today(&mut self) {
        let layout = self.timeline.layout();
        let Some(percent) = layout.today_marker_percent else {
            self.notice = Some(format!("{} is outside the chart", layout.today));
            return;
        };
        let geometry = self.geometry();
        let content = geometry.content_px(layout.units.len(), layout.view);
        let target = percent / 100.0 * content - geometry.visible_px() / 2.0;
        self.jump_to(target);
    }

    fn step_px(&self) -> f64 {
        unit_px(self.timeline.view())
    }

    /// Run one animation frame: deliver pending scroll events, let the
    /// engine propagate, then deliver the echoes of its writes.
    pub fn tick(&mut self) {
        self.report_scroll_events();
        let update = self.timeline.on_animation_frame();
        if let Some(width) = update.panel_width {
            tracing::trace!(width, "panel width applied");
            self.sync_scroll_extent();
        }
        self.report_scroll_events();
    }

    /// Set the selected task, clamped to the task rows.
    fn select_task(&mut self, index: usize) {
        let count = self.timeline.layout().task_count();
        self.selected_task = index.min(count.saturating_sub(1));
    }

    fn select_next(&mut self) {
        self.select_task(self.selected_task + 1);
    }

    fn select_previous(&mut self) {
        self.select_task(self.selected_task.saturating_sub(1));
    }

    /// Replace the plan, keeping selection and scroll in range.
    pub fn replace_plan(&mut self, plan: PlanFile) {
        self.timeline.replace_plan(plan);
        self.select_task(self.selected_task);
        self.sync_scroll_extent();
    }

    /// Handle one keyboard or mouse input.
    pub fn handle_input(&mut self, input: Input) {
        match input {
            Input::Key(key) => self.handle_key(&key),
            Input::Mouse(mouse) => self.handle_mouse(&mouse),
        }
    }

    fn handle_key(&mut self, key: &KeyEvent) {
        self.notice = None;

        if is_quit(key) {
            self.running = false;
        } else if is_escape(key) {
            self.timeline.resizer_mut().cancel();
        } else if is_tab(key) {
            self.active_tab = self.active_tab.next();
            self.sync_scroll_extent();
        } else if is_cycle_view(key) {
            let view = self.timeline.cycle_view();
            self.sync_scroll_extent();
            self.notice = Some(format!("Switched to {} view", view));
        } else if is_down(key) {
            self.select_next();
        } else if is_up(key) {
            self.select_previous();
        } else if is_left(key) {
            self.scroll_region(RegionId::Content, -self.step_px());
        } else if is_right(key) {
            self.scroll_region(RegionId::Content, self.step_px());
        } else if is_home(key) {
            self.jump_to(0.0);
        } else if is_end(key) {
            self.jump_to(f64::MAX);
        } else if is_today(key) {
            self.center_on_today();
        } else if is_reload(key) {
            self.reload_requested = true;
        }
    }

    fn handle_mouse(&mut self, mouse: &MouseEvent) {
        let geometry = self.geometry();
        let (column, row) = (mouse.column, mouse.row);

        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) if geometry.is_on_handle(column, row) => {
                self.timeline
                    .resizer_mut()
                    .pointer_down(geometry.pointer_px(column), 0.0);
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                self.timeline
                    .resizer_mut()
                    .pointer_move(geometry.pointer_px(column));
            }
            MouseEventKind::Up(MouseButton::Left) => {
                self.timeline.resizer_mut().pointer_up();
            }
            MouseEventKind::ScrollDown | MouseEventKind::ScrollUp => {
                let forward = mouse.kind == MouseEventKind::ScrollDown;
                match geometry.region_at(column, row) {
                    Some(id @ (RegionId::TimeHeader | RegionId::Scrollbar)) => {
                        let step = if forward { self.step_px() } else { -self.step_px() };
                        self.scroll_region(id, step);
                    }
                    Some(RegionId::Content) if forward => self.select_next(),
                    Some(RegionId::Content) => self.select_previous(),
                    _ => {}
                }
            }
            MouseEventKind::ScrollLeft | MouseEventKind::ScrollRight => {
                if let Some(id) = geometry.region_at(column, row)
                    && id.scrolls_horizontally()
                {
                    let step = if mouse.kind == MouseEventKind::ScrollRight {
                        self.step_px()
                    } else {
                        -self.step_px()
                    };
                    self.scroll_region(id, step);
                }
            }
            _ => {}
        }
    }

    /// Reload the plan from disk, keeping the current plan on failure.
    async fn reload(&mut self) {
        self.reload_requested = false;
        let Some(path) = self.plan_path.clone() else {
            self.notice = Some("Plan was not loaded from a file".to_string());
            return;
        };
        match PlanFile::load(&path).await {
            Ok(plan) => {
                self.replace_plan(plan);
                self.notice = Some(format!("Reloaded {}", path.display()));
            }
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "plan reload failed");
                self.notice = Some(format!("Reload failed: {}", err));
            }
        }
    }

    /// Run the main event loop.
    pub async fn run(&mut self) -> TuiResult<()> {
        let mut terminal = init_terminal()?;

        // Use scopeguard to ensure terminal cleanup on panic
        let _guard = scopeguard::guard((), |()| {
            let _ = restore_terminal();
        });

        let result = self.event_loop(&mut terminal).await;

        drop(_guard);

        result
    }

    async fn event_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    ) -> TuiResult<()> {
        while self.running {
            let size = terminal.size()?;
            self.set_area(Rect::new(0, 0, size.width, size.height));

            terminal.draw(|frame| ui::draw(frame, self))?;

            if let Some(input) = poll_input(Duration::from_millis(100))? {
                self.handle_input(input);
            }
            self.tick();

            if self.reload_requested {
                self.reload().await;
            }
            if self.follow_clock {
                self.timeline.set_today(Local::now().date_naive());
            }
        }
        Ok(())
    }
}

/// Initialize the terminal for TUI rendering.
fn init_terminal() -> TuiResult<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore the terminal to its original state.
fn restore_terminal() -> TuiResult<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), DisableMouseCapture, LeaveAlternateScreen)?;
    Ok(())
}
