//! Frame summary
//!
//! Statistics over the icons drawn in one frame, formatted for the status
//! line.

use core::fmt::Write;

use heapless::String;

use crate::draw::DrawList;
use crate::feed::FeedCounts;
use crate::geo::{haversine_km, GeoPoint};
use crate::track::{TrackStore, LABEL_LEN};

/// Status text buffer size (the status line shows fewer bytes)
pub const SUMMARY_TEXT_LEN: usize = 128;

/// Closest drawn aircraft
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Nearest {
    /// Callsign, or identity when there is none
    pub name: String<LABEL_LEN>,
    pub distance_km: f64,
}

/// What one frame shows
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FrameSummary {
    pub feed: FeedCounts,
    /// Number of tracks in the draw list
    pub drawn: usize,
    pub nearest: Option<Nearest>,
    pub farthest_km: Option<f64>,
    /// Highest non-negative altitude among drawn tracks
    pub max_altitude_m: Option<i32>,
}

impl FrameSummary {
    /// Summarize the draw list as seen from `home`
    ///
    /// Ties for nearest go to the earlier draw list entry.
    pub fn compute<const N: usize>(
        store: &TrackStore<N>,
        list: &DrawList,
        home: GeoPoint,
        feed: FeedCounts,
    ) -> Self {
        let mut summary = Self {
            feed,
            ..Self::default()
        };

        for track in list.iter().filter_map(|&slot| store.get(slot)) {
            summary.drawn += 1;
            let km = haversine_km(home, track.position());

            let closer = summary
                .nearest
                .as_ref()
                .map_or(true, |n| km < n.distance_km);
            if closer {
                let mut name = String::new();
                // Cannot fail: labels and identities fit LABEL_LEN
                let _ = name.push_str(track.display_name());
                summary.nearest = Some(Nearest {
                    name,
                    distance_km: km,
                });
            }

            if summary.farthest_km.map_or(true, |far| km > far) {
                summary.farthest_km = Some(km);
            }

            if let Some(m) = track.altitude().meters().filter(|&m| m >= 0) {
                if summary.max_altitude_m.map_or(true, |max| m > max) {
                    summary.max_altitude_m = Some(m);
                }
            }
        }

        summary
    }

    /// Status line text
    pub fn status_text(&self) -> String<SUMMARY_TEXT_LEN> {
        let mut line = String::new();
        let FeedCounts {
            total,
            with_position,
        } = self.feed;

        // Writes past the capacity are cut off; the status line truncates anyway
        let _ = write!(line, "Tot {total}  Pos {with_position}  Drw {}", self.drawn);

        match (&self.nearest, self.farthest_km) {
            (Some(near), Some(far)) => {
                let _ = write!(
                    line,
                    " | NEAR {} {:.1}km | FAR {:.1}km",
                    near.name, near.distance_km, far
                );
            }
            _ => {
                let _ = line.push_str(" | NEAR --- --.-km | FAR --.-km");
            }
        }

        let _ = match self.max_altitude_m {
            Some(m) => write!(line, " | MAX ALT {m}m"),
            None => write!(line, " | MAX ALT ---"),
        };

        line
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::ScreenPoint;
    use crate::track::{Altitude, Heading, Label, TrackId, TrackUpdate};

    const HOME: GeoPoint = GeoPoint::new(46.4717185, 6.4767709);

    fn update(
        id: &str,
        label: Option<&str>,
        position: GeoPoint,
        altitude: Altitude,
    ) -> TrackUpdate {
        TrackUpdate {
            id: TrackId::new(id).unwrap(),
            label: label.and_then(Label::new),
            position,
            center: ScreenPoint::new(100, 100),
            heading: Heading::default(),
            altitude,
        }
    }

    fn counts(total: u16, with_position: u16) -> FeedCounts {
        FeedCounts {
            total,
            with_position,
        }
    }

    #[test]
    fn test_empty_frame_text() {
        let store: TrackStore<4> = TrackStore::new();
        let summary = FrameSummary::compute(&store, &DrawList::new(), HOME, counts(12, 7));

        assert_eq!(summary.drawn, 0);
        assert_eq!(
            summary.status_text().as_str(),
            "Tot 12  Pos 7  Drw 0 | NEAR --- --.-km | FAR --.-km | MAX ALT ---"
        );
    }

    #[test]
    fn test_nearest_farthest_and_max_altitude() {
        let mut store: TrackStore<4> = TrackStore::new();
        let mut list = DrawList::new();
        list.push(store.upsert(
            update("aaaaaa", Some("SWR12"), GeoPoint::new(47.0, 7.0), Altitude::Meters(3000)),
            0,
        ))
        .unwrap();
        list.push(store.upsert(
            update("bbbbbb", None, GeoPoint::new(46.4717185, 6.5), Altitude::Meters(-30)),
            0,
        ))
        .unwrap();
        list.push(store.upsert(
            update("cccccc", Some("EZY9"), GeoPoint::new(46.5, 6.5), Altitude::Unknown),
            0,
        ))
        .unwrap();

        let summary = FrameSummary::compute(&store, &list, HOME, counts(5, 3));

        assert_eq!(summary.drawn, 3);
        let near = summary.nearest.as_ref().unwrap();
        assert_eq!(near.name.as_str(), "bbbbbb");
        assert!((near.distance_km - 1.78).abs() < 0.01, "{}", near.distance_km);
        assert!((summary.farthest_km.unwrap() - 70.997).abs() < 0.01);
        assert_eq!(summary.max_altitude_m, Some(3000));
        assert_eq!(
            summary.status_text().as_str(),
            "Tot 5  Pos 3  Drw 3 | NEAR bbbbbb 1.8km | FAR 71.0km | MAX ALT 3000m"
        );
    }

    #[test]
    fn test_unknown_altitudes_show_dashes() {
        let mut store: TrackStore<4> = TrackStore::new();
        let mut list = DrawList::new();
        list.push(store.upsert(
            update("aaaaaa", Some("HBZZZ"), GeoPoint::new(46.5, 6.5), Altitude::Unknown),
            0,
        ))
        .unwrap();

        let text = FrameSummary::compute(&store, &list, HOME, counts(1, 1)).status_text();
        assert!(text.starts_with("Tot 1  Pos 1  Drw 1 | NEAR HBZZZ "));
        assert!(text.ends_with("km | MAX ALT ---"));
    }
}
