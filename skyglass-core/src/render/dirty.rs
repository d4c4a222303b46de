//! Dirty rectangle set

use heapless::Vec;

use skyglass_display::Rect;

use crate::draw::MAX_DRAW;

/// Dirty set capacity: old + new box per drawn track, plus erasures
pub const MAX_DIRTY: usize = 3 * MAX_DRAW;

/// Screen regions to restore and repaint this frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirtySet {
    bounds: Rect,
    rects: Vec<Rect, MAX_DIRTY>,
}

impl DirtySet {
    /// Create an empty set clipped to `bounds`
    pub fn new(bounds: Rect) -> Self {
        Self {
            bounds,
            rects: Vec::new(),
        }
    }

    /// Add a region
    ///
    /// The region is clamped to the bounds; nothing is added if no pixel is
    /// left. When the set is full the region is folded into the first entry.
    pub fn mark(&mut self, rect: Rect) {
        let rect = rect.clamp_to(self.bounds);
        if rect.is_empty() {
            return;
        }
        if let Err(rect) = self.rects.push(rect) {
            if let Some(first) = self.rects.first_mut() {
                *first = first.union(rect);
            }
        }
    }

    /// Union touching regions until every pair is separated by at least one
    /// pixel
    pub fn merge(&mut self) {
        let mut i = 0;
        while i < self.rects.len() {
            let mut grew = false;
            let mut j = i + 1;
            while j < self.rects.len() {
                if self.rects[i].touches(&self.rects[j]) {
                    let other = self.rects.swap_remove(j);
                    self.rects[i] = self.rects[i].union(other);
                    grew = true;
                } else {
                    j += 1;
                }
            }
            // A grown rect may now reach entries already passed
            i = if grew { 0 } else { i + 1 };
        }
    }

    pub fn rects(&self) -> &[Rect] {
        &self.rects
    }

    pub fn len(&self) -> usize {
        self.rects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }
}
