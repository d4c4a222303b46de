//! Dirty-region engine
//!
//! Works out which screen regions changed since the last frame and repaints
//! exactly those: background first, then every icon that reaches into the
//! region, in draw-list order.

use skyglass_display::{Background, DisplayBackend, DisplayError, Rect};

use crate::config::RadarConfig;
use crate::draw::DrawList;
use crate::geo::ScreenPoint;
use crate::track::TrackStore;

use super::dirty::DirtySet;
use super::icon::IconRasterizer;

/// Computes and repaints dirty regions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirtyRegionEngine {
    canvas: Rect,
    icon_w: i32,
    icon_h: i32,
}

impl DirtyRegionEngine {
    pub fn new(config: &RadarConfig) -> Self {
        Self {
            canvas: config.canvas(),
            icon_w: i32::from(config.icon.width),
            icon_h: i32::from(config.icon.height),
        }
    }

    fn icon_at(&self, top_left: ScreenPoint) -> Rect {
        Rect::new(top_left.x, top_left.y, self.icon_w, self.icon_h)
    }

    /// Collect the regions touched by this frame
    ///
    /// Includes icons left behind by removed tracks, the old box of every
    /// drawn track and the new box of every listed track. Tracks whose old
    /// box is marked are no longer considered drawn. The result is not
    /// merged yet.
    pub fn compute<const N: usize>(&self, store: &mut TrackStore<N>, list: &DrawList) -> DirtySet {
        let mut dirty = DirtySet::new(self.canvas);

        for top_left in store.take_erasures() {
            dirty.mark(self.icon_at(top_left));
        }

        for (slot, track) in store.iter_mut() {
            if let Some(old) = track.last_draw() {
                dirty.mark(self.icon_at(old));
                track.clear_drawn();
            }
            if list.contains(&slot) {
                dirty.mark(track.icon_rect(self.icon_w, self.icon_h));
            }
        }

        dirty
    }

    /// Restore and redraw every region of a merged dirty set
    ///
    /// Returns the number of icons painted.
    pub fn repaint<D, B, const N: usize>(
        &self,
        display: &mut D,
        background: &B,
        icons: &IconRasterizer<'_>,
        store: &mut TrackStore<N>,
        list: &DrawList,
        dirty: &DirtySet,
    ) -> Result<usize, DisplayError>
    where
        D: DisplayBackend + ?Sized,
        B: Background,
    {
        let mut painted = 0;

        for region in dirty.rects() {
            background.restore(display, *region)?;

            for &slot in list.iter() {
                let Some(track) = store.get_mut(slot) else {
                    continue;
                };
                let rect = track.icon_rect(self.icon_w, self.icon_h);
                if !rect.overlaps(region) {
                    continue;
                }

                let top_left = ScreenPoint::new(rect.x, rect.y);
                icons.paint(display, top_left, track.heading(), track.color())?;
                track.mark_drawn(top_left);
                painted += 1;

                #[cfg(feature = "defmt")]
                defmt::trace!(
                    "Painted {} at ({}, {}) heading {}",
                    track.id().as_str(),
                    top_left.x,
                    top_left.y,
                    track.heading().degrees()
                );
            }
        }

        Ok(painted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::DrawListBuilder;
    use crate::geo::GeoPoint;
    use crate::render::icon::{HeadingMap, SpriteSheet, SPRITE_COUNT};
    use crate::track::{Altitude, AltitudeBand, Heading, SlotId, TrackId, TrackUpdate};
    use embedded_graphics::pixelcolor::{Rgb565, RgbColor};
    use skyglass_display::mock::{DisplayOp, RecordingDisplay};
    use skyglass_display::SolidBackground;

    static MASKS: [u8; 128] = [0xff; 128];
    static OFFSETS: [u32; SPRITE_COUNT] = [0; SPRITE_COUNT];

    fn icons() -> IconRasterizer<'static> {
        let sheet = SpriteSheet::new(32, 32, &MASKS, &OFFSETS).unwrap();
        IconRasterizer::new(sheet, HeadingMap::default())
    }

    fn update(id: &str, cx: i32, cy: i32) -> TrackUpdate {
        TrackUpdate {
            id: TrackId::new(id).unwrap(),
            label: None,
            position: GeoPoint::new(46.5, 6.5),
            center: ScreenPoint::new(cx, cy),
            heading: Heading::default(),
            altitude: Altitude::Meters(2000),
        }
    }

    struct Frame {
        engine: DirtyRegionEngine,
        builder: DrawListBuilder,
        store: TrackStore<8>,
        display: RecordingDisplay,
    }

    impl Frame {
        fn new() -> Self {
            let config = RadarConfig::default();
            Self {
                engine: DirtyRegionEngine::new(&config),
                builder: DrawListBuilder::new(&config),
                store: TrackStore::new(),
                display: RecordingDisplay::new(480, 320),
            }
        }

        /// One compute + merge + repaint pass, returning the merged rects
        fn render(&mut self, now_ms: u64) -> heapless::Vec<Rect, 16> {
            let list = self.builder.select(&self.store, now_ms);
            let mut dirty = self.engine.compute(&mut self.store, &list);
            dirty.merge();
            self.engine
                .repaint(
                    &mut self.display,
                    &SolidBackground(Rgb565::BLUE),
                    &icons(),
                    &mut self.store,
                    &list,
                    &dirty,
                )
                .unwrap();
            heapless::Vec::from_slice(dirty.rects()).unwrap()
        }
    }

    #[test]
    fn test_move_marks_union_of_old_and_new() {
        let mut frame = Frame::new();
        // Icon top-left (100, 100)
        let slot = frame.store.upsert(update("aaaaaa", 116, 116), 0);
        frame.render(0);
        assert_eq!(
            frame.store.get(slot).unwrap().last_draw(),
            Some(ScreenPoint::new(100, 100))
        );

        // Move ten pixels right
        frame.store.upsert(update("aaaaaa", 126, 116), 1_000);
        let merged = frame.render(1_000);

        assert_eq!(merged.as_slice(), &[Rect::new(100, 100, 42, 32)]);
        assert_eq!(
            frame.store.get(slot).unwrap().last_draw(),
            Some(ScreenPoint::new(110, 100))
        );
        // Old leftmost column restored, new box painted
        assert_eq!(frame.display.pixel(100, 100), Some(Rgb565::BLUE));
        let color = AltitudeBand::of(Altitude::Meters(2000)).color();
        assert_eq!(frame.display.pixel(141, 131), Some(color));
    }

    #[test]
    fn test_unchanged_frame_still_repaints_listed_icons() {
        let mut frame = Frame::new();
        frame.store.upsert(update("aaaaaa", 116, 116), 0);
        frame.render(0);
        frame.display.clear_ops();

        let merged = frame.render(500);

        assert_eq!(merged.as_slice(), &[Rect::new(100, 100, 32, 32)]);
        assert_eq!(frame.display.count(|op| matches!(op, DisplayOp::HLine { .. })), 32);
    }

    #[test]
    fn test_dropped_from_list_is_erased() {
        let mut frame = Frame::new();
        let slot = frame.store.upsert(update("aaaaaa", 116, 116), 0);
        frame.render(0);

        // Past the 10 s staleness threshold but inside the 15 s TTL
        let merged = frame.render(12_000);

        assert_eq!(merged.as_slice(), &[Rect::new(100, 100, 32, 32)]);
        let track = frame.store.get(slot).unwrap();
        assert!(!track.is_drawn());
        assert_eq!(frame.display.pixel(110, 110), Some(Rgb565::BLUE));
    }

    #[test]
    fn test_expired_track_rect_in_next_dirty_set() {
        let mut frame = Frame::new();
        frame.store.upsert(update("aaaaaa", 216, 116), 0);
        frame.render(0);

        assert_eq!(frame.store.expire(20_000, 15_000), 1);
        let merged = frame.render(20_000);

        assert_eq!(merged.as_slice(), &[Rect::new(200, 100, 32, 32)]);
        assert_eq!(frame.display.pixel(216, 116), Some(Rgb565::BLUE));
    }

    #[test]
    fn test_overlapping_neighbour_repainted_in_order() {
        let mut frame = Frame::new();
        let low = frame.store.upsert(update("aaaaaa", 116, 116), 0);
        let mut high = update("bbbbbb", 300, 200);
        high.altitude = Altitude::Meters(11_000);
        let high = frame.store.upsert(high, 0);
        frame.render(0);

        // High track moves on top of the low one
        let mut moved = update("bbbbbb", 126, 116);
        moved.altitude = Altitude::Meters(11_000);
        frame.store.upsert(moved, 100);
        frame.display.clear_ops();
        frame.render(100);

        assert!(frame.store.get(low).unwrap().is_drawn());
        assert!(frame.store.get(high).unwrap().is_drawn());
        // Highest drawn last, so its colour wins where they overlap
        assert_eq!(frame.display.pixel(120, 110), Some(Rgb565::CYAN));
        assert_eq!(frame.display.pixel(101, 110), Some(Rgb565::GREEN));
    }

    #[test]
    fn test_recycled_track_box_restored() {
        const IDS: [&str; 8] = [
            "aaaaa0", "aaaaa1", "aaaaa2", "aaaaa3", "aaaaa4", "aaaaa5", "aaaaa6", "aaaaa7",
        ];
        let mut frame = Frame::new();
        // Boxes at x0 = 20, 60, .. 300 on row y0 = 100, eight pixels apart
        for (i, id) in IDS.iter().enumerate() {
            frame.store.upsert(update(id, 36 + 40 * i as i32, 116), i as u64);
        }
        frame.render(10);
        assert!(frame.store.iter().all(|(_, track)| track.is_drawn()));
        let color = AltitudeBand::of(Altitude::Meters(2000)).color();
        assert_eq!(frame.display.pixel(25, 105), Some(color));

        // Table full: the oldest entry (slot 0) is recycled
        let slot = frame.store.upsert(update("ffffff", 300, 250), 20);
        assert_eq!(slot, SlotId(0));
        let merged = frame.render(20);

        assert!(merged.contains(&Rect::new(20, 100, 32, 32)));
        assert!(merged.contains(&Rect::new(284, 234, 32, 32)));
        assert_eq!(frame.display.pixel(25, 105), Some(Rgb565::BLUE));
        assert!(frame.store.get(slot).unwrap().is_drawn());
        assert_eq!(
            frame.store.get(slot).unwrap().last_draw(),
            Some(ScreenPoint::new(284, 234))
        );
    }

    #[test]
    fn test_offscreen_listed_icon_not_marked_drawn() {
        let mut frame = Frame::new();
        // x0 = 480: eligible, but no pixel on the canvas
        let slot = frame.store.upsert(update("aaaaaa", 496, 116), 0);
        let list = frame.builder.select(&frame.store, 0);
        assert_eq!(list.as_slice(), &[SlotId(0)]);

        let merged = frame.render(0);

        assert!(merged.is_empty());
        assert!(!frame.store.get(slot).unwrap().is_drawn());
    }
}
