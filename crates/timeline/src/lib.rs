//! Timeline engine for Plan View
//!
//! Infers the visible window from a project's tasks, partitions it into
//! daily, weekly or monthly header cells, maps every task onto the axis as
//! a percentage bar, and drives the two interactive pieces of the chart:
//! horizontal scroll synchronization and label panel resizing.

pub mod date_math;
pub mod error;
pub mod layout;
pub mod models;
pub mod position;
pub mod resize;
pub mod scroll;
pub mod status;
pub mod units;
pub mod view;
pub mod window;

pub use error::{TimelineError, TimelineResult};
pub use layout::{FrameUpdate, LayoutRow, PlanLayout, TaskRow, Timeline};
pub use models::{
    Axe, DEFAULT_PLAN_PATH, NoDirectory, PV_PLAN_PATH_ENV, PV_TODAY_ENV, PV_VIEW_ENV,
    PersonnelDirectory, PlanFile, Priority, Project, Task, find_project_root, resolve_plan_path,
    responsible_label,
};
pub use position::{Axis, TaskBarGeometry, UnitGeometry, map_task};
pub use resize::{
    ColumnWidths, Cursor, DEFAULT_PANEL_WIDTH, MAX_PANEL_WIDTH, MIN_PANEL_WIDTH, PanelResizer,
    ResizeState, ViewportStyle,
};
pub use scroll::{
    RegionId, ScrollOutcome, ScrollRegion, ScrollSynchronizer, SyncState, TrackedRegion,
};
pub use status::{TaskStatus, classify};
pub use units::{TimeUnit, generate_units};
pub use view::{TimelineView, ViewPolicy};
pub use window::{Window, infer_window};

// Ensure layouts and sessions can cross thread boundaries
static_assertions::assert_impl_all!(PlanLayout: Send, Sync);
static_assertions::assert_impl_all!(Timeline: Send);
