//! Refresh-cycle context
//!
//! [`Radar`] owns everything that has to survive from one refresh to the
//! next: the track table, the previous status text and the refresh gate. A
//! cycle is `begin_feed`, one `ingest` per observation, then `render`.

use skyglass_display::{
    Background, DisplayBackend, DisplayError, StatusBanner, StatusLine, StatusSink,
};

use crate::config::{RadarConfig, ValidationError};
use crate::draw::DrawListBuilder;
use crate::feed::{FeedCounts, Observation};
use crate::geo::GeoProjector;
use crate::render::{DirtyRegionEngine, HeadingMap, IconRasterizer, SpriteError, SpriteSheet};
use crate::summary::FrameSummary;
use crate::track::{Heading, Label, SlotId, TrackId, TrackStore, TrackUpdate, MAX_TRACKS};

/// Errors raised while setting up a [`Radar`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RadarError {
    Config(ValidationError),
    Sprite(SpriteError),
    /// Sprite sheet dimensions differ from the configured icon size
    SpriteSizeMismatch,
}

impl From<ValidationError> for RadarError {
    fn from(e: ValidationError) -> Self {
        RadarError::Config(e)
    }
}

impl From<SpriteError> for RadarError {
    fn from(e: SpriteError) -> Self {
        RadarError::Sprite(e)
    }
}

/// Why an observation did not reach the track table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DropReason {
    /// Position does not project onto the canvas
    OutOfBounds,
}

/// Why an observation was refused outright
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RejectReason {
    /// Identity empty after trimming
    InvalidIdentity,
}

/// Result of [`Radar::ingest`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IngestOutcome {
    Updated(SlotId),
    Dropped(DropReason),
    Rejected(RejectReason),
}

/// What one call to [`Radar::render`] did
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FrameReport {
    /// Tracks removed by TTL expiry
    pub expired: usize,
    /// Regions restored after merging
    pub dirty_rects: usize,
    /// Icons painted this frame
    pub painted: usize,
    pub summary: FrameSummary,
}

/// Minimum interval between two refreshes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RefreshGate {
    interval_ms: u64,
    last_ms: Option<u64>,
}

impl RefreshGate {
    pub const fn new(interval_ms: u64) -> Self {
        Self {
            interval_ms,
            last_ms: None,
        }
    }

    /// Time of the last refresh let through
    pub const fn last_ms(&self) -> Option<u64> {
        self.last_ms
    }

    /// Check if a refresh is due at `now_ms`, and if so record it
    ///
    /// The first call is always due. A clock that went backwards counts as
    /// due, so a restarted time source cannot stall the display.
    pub fn ready(&mut self, now_ms: u64) -> bool {
        let due = match self.last_ms {
            None => true,
            Some(last) => now_ms < last || now_ms - last >= self.interval_ms,
        };
        if due {
            self.last_ms = Some(now_ms);
        }
        due
    }
}

/// Track display state across refresh cycles
pub struct Radar<'s, const N: usize = MAX_TRACKS> {
    config: RadarConfig,
    projector: GeoProjector,
    store: TrackStore<N>,
    builder: DrawListBuilder,
    engine: DirtyRegionEngine,
    icons: IconRasterizer<'s>,
    status: StatusLine,
    counts: FeedCounts,
    gate: RefreshGate,
    /// A failed frame left the screen out of sync with the track table
    needs_full_repaint: bool,
}

impl<'s, const N: usize> Radar<'s, N> {
    /// Set up a radar for a validated configuration
    ///
    /// The sprite sheet must match the configured icon size.
    pub fn new(config: RadarConfig, sprites: SpriteSheet<'s>) -> Result<Self, RadarError> {
        config.validate()?;
        if sprites.width() != config.icon.width || sprites.height() != config.icon.height {
            return Err(RadarError::SpriteSizeMismatch);
        }

        Ok(Self {
            projector: GeoProjector::new(&config),
            store: TrackStore::new(),
            builder: DrawListBuilder::new(&config),
            engine: DirtyRegionEngine::new(&config),
            icons: IconRasterizer::new(sprites, HeadingMap::from(&config.sprite)),
            status: StatusLine::new(config.status_layout()),
            counts: FeedCounts::default(),
            gate: RefreshGate::new(u64::from(config.tracks.refresh_interval_ms)),
            needs_full_repaint: false,
            config,
        })
    }

    pub fn config(&self) -> &RadarConfig {
        &self.config
    }

    pub fn store(&self) -> &TrackStore<N> {
        &self.store
    }

    pub fn status_text(&self) -> Option<&str> {
        self.status.text()
    }

    /// Feed counts recorded for the current cycle
    pub fn counts(&self) -> FeedCounts {
        self.counts
    }

    /// Check if the next refresh is due, see [`RefreshGate::ready`]
    pub fn refresh_due(&mut self, now_ms: u64) -> bool {
        self.gate.ready(now_ms)
    }

    /// Start a feed cycle
    pub fn begin_feed(&mut self, counts: FeedCounts) {
        self.counts = counts;
    }

    /// Project one observation and store it
    pub fn ingest(&mut self, observation: &Observation<'_>) -> IngestOutcome {
        let Some(id) = TrackId::new(observation.id) else {
            return IngestOutcome::Rejected(RejectReason::InvalidIdentity);
        };
        let Some(center) = self.projector.project(observation.position) else {
            #[cfg(feature = "defmt")]
            defmt::trace!("Dropping {}: off the map", id.as_str());
            return IngestOutcome::Dropped(DropReason::OutOfBounds);
        };

        let update = TrackUpdate {
            id,
            label: observation.label.and_then(Label::new),
            position: observation.position,
            center,
            heading: Heading::from_degrees(observation.heading_deg),
            altitude: observation.altitude,
        };
        IngestOutcome::Updated(self.store.upsert(update, observation.timestamp_ms))
    }

    /// Paint the whole background and forget what was on screen
    ///
    /// Used at start-up and after anything else drew over the canvas.
    pub fn paint_static<D, B>(
        &mut self,
        display: &mut D,
        background: &B,
    ) -> Result<(), DisplayError>
    where
        D: DisplayBackend + ?Sized,
        B: Background,
    {
        display.begin_write()?;
        let painted = self.restore_canvas(display, background);
        let ended = display.end_write();
        painted.and(ended)
    }

    fn restore_canvas<D, B>(
        &mut self,
        display: &mut D,
        background: &B,
    ) -> Result<(), DisplayError>
    where
        D: DisplayBackend + ?Sized,
        B: Background,
    {
        for (_, track) in self.store.iter_mut() {
            track.clear_drawn();
        }
        // Queued erasures are covered by the full repaint
        let _ = self.store.take_erasures();
        self.status.reset();

        // Stays set until the canvas has actually been restored
        self.needs_full_repaint = true;
        background.restore(display, self.config.canvas())?;
        self.needs_full_repaint = false;
        Ok(())
    }

    /// Run one refresh: expire, select, repaint dirty regions, update the
    /// status line
    ///
    /// Everything is drawn inside a single bus transaction, which is closed
    /// even when a draw call fails. After a failed frame the next call
    /// restores the whole canvas before drawing.
    pub fn render<D, B>(
        &mut self,
        display: &mut D,
        background: &B,
        now_ms: u64,
    ) -> Result<FrameReport, DisplayError>
    where
        D: DisplayBackend + ?Sized,
        B: Background,
    {
        display.begin_write()?;
        let frame = self.render_frame(display, background, now_ms);
        let ended = display.end_write();

        if frame.is_err() || ended.is_err() {
            #[cfg(feature = "defmt")]
            defmt::warn!("Frame at {} ms failed, full repaint scheduled", now_ms);
            self.needs_full_repaint = true;
        }

        let report = frame?;
        ended?;
        Ok(report)
    }

    fn render_frame<D, B>(
        &mut self,
        display: &mut D,
        background: &B,
        now_ms: u64,
    ) -> Result<FrameReport, DisplayError>
    where
        D: DisplayBackend + ?Sized,
        B: Background,
    {
        if self.needs_full_repaint {
            self.restore_canvas(display, background)?;
        }

        let expired = self.store.expire(now_ms, u64::from(self.config.tracks.ttl_ms));
        let list = self.builder.select(&self.store, now_ms);

        let mut dirty = self.engine.compute(&mut self.store, &list);
        dirty.merge();

        #[cfg(feature = "defmt")]
        defmt::debug!(
            "Frame at {} ms: {} live, {} expired, {} listed, {} dirty",
            now_ms,
            self.store.len(),
            expired,
            list.len(),
            dirty.len()
        );

        let painted = self.engine.repaint(
            display,
            background,
            &self.icons,
            &mut self.store,
            &list,
            &dirty,
        )?;

        let summary = FrameSummary::compute(&self.store, &list, self.config.home(), self.counts);
        self.status.update(display, &summary.status_text())?;

        Ok(FrameReport {
            expired,
            dirty_rects: dirty.len(),
            painted,
            summary,
        })
    }

    /// Show a one-off message on the status line
    ///
    /// The next frame only redraws the cells that differ from it.
    pub fn show_status<D>(&mut self, display: &mut D, text: &str) -> Result<(), DisplayError>
    where
        D: DisplayBackend + ?Sized,
    {
        StatusBanner::new(display, &mut self.status).show_status(text)
    }
}
