//! Draw list
//!
//! Picks which tracks get an icon this frame and in which order they are
//! painted. Later entries paint over earlier ones, so the list is sorted by
//! ascending altitude and the highest aircraft ends up on top.

use heapless::Vec;

use crate::config::RadarConfig;
use crate::track::{SlotId, Track, TrackStore};

/// Draw list capacity
pub const MAX_DRAW: usize = 99;

/// Slots to paint this frame, in paint order
pub type DrawList = Vec<SlotId, MAX_DRAW>;

/// Selects and orders the tracks to draw
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawListBuilder {
    stale_ms: u64,
    max_draw: usize,
    icon_w: i32,
    icon_h: i32,
    canvas_w: i32,
    canvas_h: i32,
    legend_h: i32,
    status_h: i32,
}

impl DrawListBuilder {
    pub fn new(config: &RadarConfig) -> Self {
        Self {
            stale_ms: u64::from(config.tracks.position_stale_ms),
            max_draw: usize::from(config.tracks.max_draw).min(MAX_DRAW),
            icon_w: i32::from(config.icon.width),
            icon_h: i32::from(config.icon.height),
            canvas_w: i32::from(config.screen.width),
            canvas_h: i32::from(config.screen.height),
            legend_h: i32::from(config.screen.legend_h),
            status_h: i32::from(config.screen.status_h),
        }
    }

    /// Check if `track` may be drawn at `now_ms`
    ///
    /// The track must be fresh and its icon box must stay clear of the
    /// legend bar and the status strip.
    pub fn is_eligible(&self, track: &Track, now_ms: u64) -> bool {
        if track.age_ms(now_ms) > self.stale_ms {
            return false;
        }

        let origin = track.icon_origin(self.icon_w, self.icon_h);
        let (x0, y0) = (origin.x, origin.y);

        if y0 < self.legend_h || y0 + self.icon_h > self.canvas_h - self.status_h {
            return false;
        }

        (-self.icon_w..=self.canvas_w).contains(&x0) && (-self.icon_h..=self.canvas_h).contains(&y0)
    }

    /// Build this frame's draw list
    ///
    /// Eligible tracks are taken in slot order up to the draw limit, then
    /// sorted by altitude with unknown altitudes first. Equal altitudes keep
    /// slot order.
    pub fn select<const N: usize>(&self, store: &TrackStore<N>, now_ms: u64) -> DrawList {
        let mut list = DrawList::new();

        for (slot, track) in store.iter() {
            if list.len() >= self.max_draw {
                break;
            }
            if self.is_eligible(track, now_ms) {
                // Cannot fail: max_draw <= MAX_DRAW
                let _ = list.push(slot);
            }
        }

        list.sort_unstable_by_key(|&slot| (store.get(slot).map(Track::altitude), slot));
        list
    }
}
