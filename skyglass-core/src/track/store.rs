//! Fixed-capacity track table
//!
//! A flat arena of optional tracks, scanned linearly. The table never grows:
//! when every slot is taken the least recently updated track is recycled.

use heapless::Vec;

use crate::geo::ScreenPoint;

use super::types::{SlotId, Track, TrackId, TrackUpdate};

/// Default table capacity
pub const MAX_TRACKS: usize = 200;

/// Track table keyed by identity
///
/// Tracks leaving the table while their icon is on screen (recycled or
/// expired) leave the icon's top-left behind in an erase queue, drained by
/// the dirty-region engine during the next render.
#[derive(Debug, Clone)]
pub struct TrackStore<const N: usize = MAX_TRACKS> {
    slots: [Option<Track>; N],
    erasures: Vec<ScreenPoint, N>,
}

impl<const N: usize> Default for TrackStore<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> TrackStore<N> {
    /// Create an empty table
    pub fn new() -> Self {
        Self {
            slots: core::array::from_fn(|_| None),
            erasures: Vec::new(),
        }
    }

    /// Maximum number of live tracks
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Number of live tracks
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    /// Slot holding `id`, if it is live
    pub fn find(&self, id: &TrackId) -> Option<SlotId> {
        self.slots
            .iter()
            .position(|s| s.as_ref().is_some_and(|t| t.id() == id))
            .map(|i| SlotId(i as u16))
    }

    pub fn get(&self, slot: SlotId) -> Option<&Track> {
        self.slots.get(slot.index()).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, slot: SlotId) -> Option<&mut Track> {
        self.slots.get_mut(slot.index()).and_then(Option::as_mut)
    }

    /// Live tracks in slot order
    pub fn iter(&self) -> impl Iterator<Item = (SlotId, &Track)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.as_ref().map(|t| (SlotId(i as u16), t)))
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = (SlotId, &mut Track)> {
        self.slots
            .iter_mut()
            .enumerate()
            .filter_map(|(i, s)| s.as_mut().map(|t| (SlotId(i as u16), t)))
    }

    /// Insert or refresh a track
    ///
    /// An existing entry for the identity is updated in place. Otherwise the
    /// first free slot is used, or, with the table full, the slot with the
    /// oldest update (lowest index on ties) is recycled.
    pub fn upsert(&mut self, update: TrackUpdate, now_ms: u64) -> SlotId {
        if let Some(slot) = self.find(&update.id) {
            if let Some(track) = self.slots[slot.index()].as_mut() {
                track.apply(update, now_ms);
            }
            return slot;
        }

        let slot = self.allocate();
        if let Some(evicted) = self.slots[slot.index()].take() {
            #[cfg(feature = "defmt")]
            defmt::debug!(
                "Recycling slot {} ({}) for {}",
                slot.0,
                evicted.id().as_str(),
                update.id.as_str()
            );
            self.queue_erase(&evicted);
        }
        self.slots[slot.index()] = Some(Track::from_update(update, now_ms));
        slot
    }

    /// Remove tracks not updated for more than `ttl_ms`
    ///
    /// Returns the number of tracks removed.
    pub fn expire(&mut self, now_ms: u64, ttl_ms: u64) -> usize {
        let mut removed = 0;
        for i in 0..N {
            let stale = self.slots[i]
                .as_ref()
                .is_some_and(|t| t.age_ms(now_ms) > ttl_ms);
            if !stale {
                continue;
            }
            if let Some(track) = self.slots[i].take() {
                self.queue_erase(&track);
                removed += 1;
            }
        }
        removed
    }

    /// Drain the icons left on screen by removed tracks
    pub fn take_erasures(&mut self) -> Vec<ScreenPoint, N> {
        core::mem::take(&mut self.erasures)
    }

    fn queue_erase(&mut self, track: &Track) {
        if let Some(top_left) = track.last_draw() {
            // At most one entry per slot between drains, so this cannot fill
            let _ = self.erasures.push(top_left);
        }
    }

    fn allocate(&self) -> SlotId {
        if let Some(free) = self.slots.iter().position(Option::is_none) {
            return SlotId(free as u16);
        }

        let mut oldest = 0;
        let mut oldest_ms = u64::MAX;
        for (i, track) in self.slots.iter().enumerate() {
            if let Some(track) = track {
                if track.last_update_ms() < oldest_ms {
                    oldest_ms = track.last_update_ms();
                    oldest = i;
                }
            }
        }
        SlotId(oldest as u16)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::GeoPoint;
    use crate::track::{Altitude, Heading};

    fn update(id: &str, x: i32, y: i32) -> TrackUpdate {
        TrackUpdate {
            id: TrackId::new(id).unwrap(),
            label: None,
            position: GeoPoint::new(46.5, 6.5),
            center: ScreenPoint::new(x, y),
            heading: Heading::from_degrees(90.0),
            altitude: Altitude::Meters(3000),
        }
    }

    fn hex(i: usize) -> heapless::String<6> {
        let mut s = heapless::String::new();
        core::fmt::Write::write_fmt(&mut s, format_args!("{:06x}", i)).unwrap();
        s
    }

    #[test]
    fn test_upsert_updates_in_place() {
        let mut store: TrackStore<4> = TrackStore::new();
        let a = store.upsert(update("aaaaaa", 10, 10), 100);
        let b = store.upsert(update("aaaaaa", 20, 20), 200);

        assert_eq!(a, b);
        assert_eq!(store.len(), 1);
        let track = store.get(a).unwrap();
        assert_eq!(track.center(), ScreenPoint::new(20, 20));
        assert_eq!(track.last_update_ms(), 200);
    }

    #[test]
    fn test_update_keeps_render_state() {
        let mut store: TrackStore<4> = TrackStore::new();
        let slot = store.upsert(update("aaaaaa", 10, 10), 0);
        store.get_mut(slot).unwrap().mark_drawn(ScreenPoint::new(-6, -6));

        store.upsert(update("aaaaaa", 30, 30), 1);

        assert_eq!(
            store.get(slot).unwrap().last_draw(),
            Some(ScreenPoint::new(-6, -6))
        );
    }

    #[test]
    fn test_free_slot_reused_first() {
        let mut store: TrackStore<3> = TrackStore::new();
        store.upsert(update("aaaaaa", 0, 0), 0);
        store.upsert(update("bbbbbb", 0, 0), 5_000);
        store.expire(16_000, 15_000);

        let slot = store.upsert(update("cccccc", 0, 0), 16_000);
        assert_eq!(slot, SlotId(0));
    }

    #[test]
    fn test_full_table_recycles_oldest() {
        let mut store = TrackStore::<MAX_TRACKS>::new();
        for i in 0..MAX_TRACKS {
            let slot = store.upsert(update(&hex(i), 100, 100), 1_000 + i as u64);
            store.get_mut(slot).unwrap().mark_drawn(ScreenPoint::new(i as i32, 50));
        }
        assert_eq!(store.len(), MAX_TRACKS);

        let slot = store.upsert(update("ffffff", 200, 200), 10_000);

        assert_eq!(slot, SlotId(0));
        assert_eq!(store.len(), MAX_TRACKS);
        assert!(store.find(&TrackId::new(&hex(0)).unwrap()).is_none());
        assert_eq!(store.find(&TrackId::new("ffffff").unwrap()), Some(slot));
        assert!(!store.get(slot).unwrap().is_drawn());

        let erased = store.take_erasures();
        assert_eq!(erased.as_slice(), &[ScreenPoint::new(0, 50)]);
        assert!(store.take_erasures().is_empty());
    }

    #[test]
    fn test_recycle_ties_pick_lowest_index() {
        let mut store: TrackStore<3> = TrackStore::new();
        store.upsert(update("aaaaaa", 0, 0), 50);
        store.upsert(update("bbbbbb", 0, 0), 10);
        store.upsert(update("cccccc", 0, 0), 10);

        assert_eq!(store.upsert(update("dddddd", 0, 0), 60), SlotId(1));
    }

    #[test]
    fn test_undrawn_recycle_queues_nothing() {
        let mut store: TrackStore<1> = TrackStore::new();
        store.upsert(update("aaaaaa", 0, 0), 0);
        store.upsert(update("bbbbbb", 0, 0), 1);
        assert!(store.take_erasures().is_empty());
    }

    #[test]
    fn test_expire_removes_only_old_tracks() {
        let mut store: TrackStore<4> = TrackStore::new();
        let old = store.upsert(update("aaaaaa", 10, 10), 0);
        store.get_mut(old).unwrap().mark_drawn(ScreenPoint::new(-6, -6));
        store.upsert(update("bbbbbb", 10, 10), 10_000);

        // Exactly at the TTL is still alive
        assert_eq!(store.expire(15_000, 15_000), 0);
        assert_eq!(store.expire(15_001, 15_000), 1);

        assert_eq!(store.len(), 1);
        assert!(store.get(old).is_none());
        assert_eq!(store.take_erasures().as_slice(), &[ScreenPoint::new(-6, -6)]);
    }

    #[test]
    fn test_expire_with_clock_behind_update() {
        let mut store: TrackStore<2> = TrackStore::new();
        store.upsert(update("aaaaaa", 0, 0), 20_000);
        assert_eq!(store.expire(0, 15_000), 0);
        assert_eq!(store.len(), 1);
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_at_most_one_track_per_identity(
                ops in proptest::collection::vec((0usize..12, 0u64..50), 1..200)
            ) {
                let mut store: TrackStore<8> = TrackStore::new();
                let mut now = 0u64;
                for (id, dt) in ops {
                    now += dt;
                    store.upsert(update(&hex(id), 0, 0), now);

                    let mut seen: heapless::Vec<TrackId, 8> = heapless::Vec::new();
                    for (_, track) in store.iter() {
                        prop_assert!(!seen.contains(track.id()));
                        seen.push(track.id().clone()).unwrap();
                    }
                    prop_assert!(store.len() <= store.capacity());
                }
            }
        }
    }
}
