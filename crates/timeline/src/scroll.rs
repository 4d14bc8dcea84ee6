//! Horizontal scroll synchronization across the chart regions.
//!
//! The time header, the bar area and the scrollbar proxy all mirror one
//! logical horizontal offset. A scroll event from any of them is copied
//! to the others on the next animation frame. Every programmatic write is
//! remembered per region so the scroll event it provokes is recognised as
//! an echo instead of starting another propagation round.

use std::collections::HashMap;

/// Two offsets closer than this are the same position.
const OFFSET_TOLERANCE: f64 = 0.5;

/// The visual regions sharing the chart's horizontal axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegionId {
    /// Header above the label panel; fixed, never scrolls horizontally.
    LabelHeader,
    /// Sticky header holding the time units.
    TimeHeader,
    /// Scrollable bar area.
    Content,
    /// Thin scrollbar proxy below the chart.
    Scrollbar,
}

impl RegionId {
    /// Whether the region takes part in horizontal synchronization.
    pub fn scrolls_horizontally(self) -> bool {
        !matches!(self, RegionId::LabelHeader)
    }
}

/// Handle to a scrollable region owned by the presentation layer.
pub trait ScrollRegion {
    /// Current horizontal offset, or `None` once the region is detached.
    fn scroll_left(&self) -> Option<f64>;

    /// Assign the horizontal offset. Returns `false` if the region is detached.
    fn set_scroll_left(&mut self, offset: f64) -> bool;
}

/// Plain-data region handle with a scroll limit and mount state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackedRegion {
    offset: f64,
    max_scroll: f64,
    mounted: bool,
}

impl TrackedRegion {
    pub fn new(max_scroll: f64) -> Self {
        Self {
            offset: 0.0,
            max_scroll: max_scroll.max(0.0),
            mounted: true,
        }
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    pub fn max_scroll(&self) -> f64 {
        self.max_scroll
    }

    /// Change the scroll limit, clamping the current offset into it.
    pub fn set_max_scroll(&mut self, max_scroll: f64) {
        self.max_scroll = max_scroll.max(0.0);
        self.offset = self.offset.min(self.max_scroll);
    }

    pub fn unmount(&mut self) {
        self.mounted = false;
    }
}

impl ScrollRegion for TrackedRegion {
    fn scroll_left(&self) -> Option<f64> {
        self.mounted.then_some(self.offset)
    }

    fn set_scroll_left(&mut self, offset: f64) -> bool {
        if !self.mounted {
            return false;
        }
        self.offset = offset.clamp(0.0, self.max_scroll);
        true
    }
}

/// Synchronizer state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SyncState {
    Idle,
    /// A propagation is scheduled for the next animation frame.
    Propagating { source: RegionId, offset: f64 },
}

/// What the synchronizer did with a scroll event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollOutcome {
    /// Propagation scheduled; the caller should request an animation frame.
    Scheduled,
    /// A propagation was already pending; its target was replaced.
    Coalesced,
    /// The event was caused by our own write and was swallowed.
    Echo,
    /// Unknown or fixed region, or a non-finite offset.
    Ignored,
}

/// Keeps peer regions at one shared horizontal offset.
#[derive(Debug)]
pub struct ScrollSynchronizer<R> {
    regions: Vec<(RegionId, R)>,
    state: SyncState,
    offset: f64,
    echo_guard: HashMap<RegionId, f64>,
}

impl<R: ScrollRegion> ScrollSynchronizer<R> {
    /// Create a synchronizer over the injected region handles.
    pub fn new(regions: impl IntoIterator<Item = (RegionId, R)>) -> Self {
        Self {
            regions: regions.into_iter().collect(),
            state: SyncState::Idle,
            offset: 0.0,
            echo_guard: HashMap::new(),
        }
    }

    pub fn state(&self) -> SyncState {
        self.state
    }

    /// Last offset all regions were synchronized to.
    pub fn offset(&self) -> f64 {
        self.offset
    }

    pub fn region(&self, id: RegionId) -> Option<&R> {
        self.regions.iter().find(|(rid, _)| *rid == id).map(|(_, r)| r)
    }

    pub fn region_mut(&mut self, id: RegionId) -> Option<&mut R> {
        self.regions
            .iter_mut()
            .find(|(rid, _)| *rid == id)
            .map(|(_, r)| r)
    }

    /// Every registered region, in registration order.
    pub fn regions_mut(&mut self) -> impl Iterator<Item = (RegionId, &mut R)> {
        self.regions.iter_mut().map(|(id, r)| (*id, r))
    }

    /// Drop a region's handle, e.g. when it unmounts.
    pub fn remove_region(&mut self, id: RegionId) -> Option<R> {
        self.echo_guard.remove(&id);
        let index = self.regions.iter().position(|(rid, _)| *rid == id)?;
        Some(self.regions.remove(index).1)
    }

    /// Move every horizontal region to `offset` at once, dropping any
    /// pending propagation. The writes are guarded like frame writes.
    pub fn jump_to(&mut self, offset: f64) {
        if !offset.is_finite() {
            return;
        }
        self.state = SyncState::Idle;
        self.offset = offset;
        for (id, region) in self.regions.iter_mut() {
            if !id.scrolls_horizontally() {
                continue;
            }
            let Some(current) = region.scroll_left() else {
                continue;
            };
            if (current - offset).abs() >= OFFSET_TOLERANCE && region.set_scroll_left(offset) {
                self.echo_guard
                    .insert(*id, region.scroll_left().unwrap_or(offset));
            }
        }
    }

    /// Handle a scroll event reported by `source`.
    pub fn on_scroll(&mut self, source: RegionId, offset: f64) -> ScrollOutcome {
        if !offset.is_finite()
            || !source.scrolls_horizontally()
            || self.region(source).is_none()
        {
            return ScrollOutcome::Ignored;
        }

        if let Some(expected) = self.echo_guard.remove(&source)
            && (expected - offset).abs() < OFFSET_TOLERANCE
        {
            return ScrollOutcome::Echo;
        }

        match self.state {
            SyncState::Idle => {
                self.state = SyncState::Propagating { source, offset };
                ScrollOutcome::Scheduled
            }
            SyncState::Propagating { .. } => {
                self.state = SyncState::Propagating { source, offset };
                ScrollOutcome::Coalesced
            }
        }
    }

    /// Run the pending propagation, if any. Returns the number of regions written.
    ///
    /// Detached regions are skipped silently.
    pub fn on_animation_frame(&mut self) -> usize {
        let SyncState::Propagating { source, offset } = self.state else {
            return 0;
        };
        self.state = SyncState::Idle;
        self.offset = offset;

        let mut written = 0;
        for (id, region) in self.regions.iter_mut() {
            if *id == source || !id.scrolls_horizontally() {
                continue;
            }
            let Some(current) = region.scroll_left() else {
                continue;
            };
            if (current - offset).abs() < OFFSET_TOLERANCE {
                continue;
            }
            if region.set_scroll_left(offset) {
                let applied = region.scroll_left().unwrap_or(offset);
                self.echo_guard.insert(*id, applied);
                written += 1;
            }
        }

        tracing::trace!(?source, offset, written, "propagated horizontal scroll");
        written
    }
}
