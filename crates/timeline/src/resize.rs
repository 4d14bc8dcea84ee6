//! Drag-to-resize for the fixed task label panel.
//!
//! Pointer moves are coalesced: only the latest width requested since the
//! previous animation frame is applied, so a burst of moves costs one
//! layout pass per frame.

/// Narrowest label panel, in pixels.
pub const MIN_PANEL_WIDTH: f64 = 250.0;
/// Widest label panel, in pixels.
pub const MAX_PANEL_WIDTH: f64 = 800.0;
/// Panel width at the start of a session, in pixels.
pub const DEFAULT_PANEL_WIDTH: f64 = 400.0;

/// Clamp a requested width into the allowed panel range.
pub fn clamp_panel_width(width: f64) -> f64 {
    width.clamp(MIN_PANEL_WIDTH, MAX_PANEL_WIDTH)
}

/// Resizer state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResizeState {
    Idle,
    /// A drag is active; `panel_left` is the panel's left edge in viewport pixels.
    Resizing { panel_left: f64 },
}

/// Cursor shown across the whole viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cursor {
    #[default]
    Default,
    ColResize,
}

/// Viewport-wide style overrides active while dragging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ViewportStyle {
    pub cursor: Cursor,
    pub suppress_text_selection: bool,
    pub pointer_captured: bool,
}

/// Widths of the columns inside the label panel, derived from its live width.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnWidths {
    pub task_name: f64,
    pub responsible: f64,
}

impl ColumnWidths {
    pub fn for_panel(panel_width: f64) -> Self {
        Self {
            task_name: (panel_width * 0.6).max(200.0),
            responsible: (panel_width * 0.35).max(120.0),
        }
    }
}

/// Interactive resizer for the label panel.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelResizer {
    state: ResizeState,
    width: f64,
    pending: Option<f64>,
}

impl Default for PanelResizer {
    fn default() -> Self {
        Self::new(DEFAULT_PANEL_WIDTH)
    }
}

impl PanelResizer {
    /// Create a resizer with an initial width, clamped into range.
    pub fn new(width: f64) -> Self {
        let width = if width.is_finite() {
            clamp_panel_width(width)
        } else {
            DEFAULT_PANEL_WIDTH
        };
        Self {
            state: ResizeState::Idle,
            width,
            pending: None,
        }
    }

    pub fn state(&self) -> ResizeState {
        self.state
    }

    pub fn is_resizing(&self) -> bool {
        matches!(self.state, ResizeState::Resizing { .. })
    }

    /// Current applied panel width in pixels.
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Width waiting for the next animation frame, if any.
    pub fn pending_width(&self) -> Option<f64> {
        self.pending
    }

    pub fn column_widths(&self) -> ColumnWidths {
        ColumnWidths::for_panel(self.width)
    }

    /// Style overrides the viewport should apply right now.
    pub fn viewport_style(&self) -> ViewportStyle {
        if self.is_resizing() {
            ViewportStyle {
                cursor: Cursor::ColResize,
                suppress_text_selection: true,
                pointer_captured: true,
            }
        } else {
            ViewportStyle::default()
        }
    }

    /// Pointer pressed on the resize handle.
    pub fn pointer_down(&mut self, pointer_x: f64, panel_left: f64) {
        if !pointer_x.is_finite() || !panel_left.is_finite() {
            return;
        }
        self.state = ResizeState::Resizing { panel_left };
        tracing::debug!(width = self.width, panel_left, "panel resize started");
    }

    /// Pointer moved. Returns `true` when the caller must request an
    /// animation frame (the first move since the last frame).
    pub fn pointer_move(&mut self, pointer_x: f64) -> bool {
        let ResizeState::Resizing { panel_left } = self.state else {
            return false;
        };
        if !pointer_x.is_finite() {
            return false;
        }
        let needs_frame = self.pending.is_none();
        self.pending = Some(clamp_panel_width(pointer_x - panel_left));
        needs_frame
    }

    /// Apply the coalesced width. Returns the new width if it changed.
    pub fn on_animation_frame(&mut self) -> Option<f64> {
        let width = self.pending.take()?;
        if (width - self.width).abs() < f64::EPSILON {
            return None;
        }
        self.width = width;
        Some(width)
    }

    /// Pointer released: the drag ends. A width still pending is applied
    /// by the next animation frame.
    pub fn pointer_up(&mut self) {
        if self.is_resizing() {
            self.state = ResizeState::Idle;
            tracing::debug!(width = self.pending.unwrap_or(self.width), "panel resize finished");
        }
    }

    /// Abort the gesture without applying pending work, e.g. on unmount.
    pub fn cancel(&mut self) {
        self.state = ResizeState::Idle;
        self.pending = None;
    }
}
