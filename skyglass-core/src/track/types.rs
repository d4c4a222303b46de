//! Track data types

use embedded_graphics::pixelcolor::{Rgb565, RgbColor};
use heapless::String;

use skyglass_display::Rect;

use crate::geo::{GeoPoint, ScreenPoint};

/// Maximum identity length (24-bit ICAO address as hex)
pub const IDENTITY_LEN: usize = 6;

/// Maximum callsign length
pub const LABEL_LEN: usize = 8;

/// Trim `text` and cut it to at most `max` bytes on a char boundary
fn clip(text: &str, max: usize) -> &str {
    let text = text.trim();
    if text.len() <= max {
        return text;
    }
    let mut end = max;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

/// Unique aircraft identity
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TrackId(String<IDENTITY_LEN>);

impl TrackId {
    /// Build an identity from feed text
    ///
    /// Surrounding whitespace is removed and the rest cut to
    /// [`IDENTITY_LEN`] bytes. Returns `None` if nothing is left.
    pub fn new(text: &str) -> Option<Self> {
        let text = clip(text, IDENTITY_LEN);
        if text.is_empty() {
            return None;
        }
        String::try_from(text).ok().map(Self)
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Callsign shown next to distance readouts
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Label(String<LABEL_LEN>);

impl Label {
    /// Build a label from feed text, `None` if blank
    pub fn new(text: &str) -> Option<Self> {
        let text = clip(text, LABEL_LEN);
        if text.is_empty() {
            return None;
        }
        String::try_from(text).ok().map(Self)
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Compass heading in whole degrees, `0..360`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Heading(u16);

impl Heading {
    /// Round to the nearest degree and wrap into `0..360`
    ///
    /// Non-finite input yields north.
    pub fn from_degrees(deg: f64) -> Self {
        if !deg.is_finite() {
            return Self(0);
        }
        let whole = libm::round(deg) as i64;
        Self(whole.rem_euclid(360) as u16)
    }

    pub const fn degrees(self) -> u16 {
        self.0
    }
}

/// Barometric altitude
///
/// Orders `Unknown` below every known altitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Altitude {
    #[default]
    Unknown,
    Meters(i32),
}

impl Altitude {
    /// Convert a barometric altitude in feet, rounded to whole meters
    pub fn from_feet(ft: f64) -> Self {
        if !ft.is_finite() {
            return Self::Unknown;
        }
        Self::Meters(libm::round(ft * 0.3048) as i32)
    }

    pub const fn meters(self) -> Option<i32> {
        match self {
            Self::Unknown => None,
            Self::Meters(m) => Some(m),
        }
    }
}

/// Altitude colour band
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AltitudeBand {
    Unknown,
    /// Below 1000 m
    Low,
    /// 1000 m to below 5000 m
    MediumLow,
    /// 5000 m to below 9000 m
    MediumHigh,
    /// 9000 m and above
    High,
}

/// Grey used for unknown altitude (0x7BEF)
const DARK_GREY: Rgb565 = Rgb565::new(15, 31, 15);

impl AltitudeBand {
    /// Bands in legend order
    pub const ALL: [AltitudeBand; 5] = [
        AltitudeBand::Low,
        AltitudeBand::MediumLow,
        AltitudeBand::MediumHigh,
        AltitudeBand::High,
        AltitudeBand::Unknown,
    ];

    /// Band containing `altitude`
    pub fn of(altitude: Altitude) -> Self {
        match altitude {
            Altitude::Unknown => Self::Unknown,
            Altitude::Meters(m) if m < 1000 => Self::Low,
            Altitude::Meters(m) if m < 5000 => Self::MediumLow,
            Altitude::Meters(m) if m < 9000 => Self::MediumHigh,
            Altitude::Meters(_) => Self::High,
        }
    }

    /// Icon colour
    pub const fn color(self) -> Rgb565 {
        match self {
            Self::Unknown => DARK_GREY,
            Self::Low => Rgb565::RED,
            Self::MediumLow => Rgb565::GREEN,
            Self::MediumHigh => Rgb565::YELLOW,
            Self::High => Rgb565::CYAN,
        }
    }

    /// Legend text
    pub const fn label(self) -> &'static str {
        match self {
            Self::Unknown => "UNKNOWN",
            Self::Low => "0-1000",
            Self::MediumLow => "1000-5000",
            Self::MediumHigh => "5000-9000",
            Self::High => "9000+",
        }
    }
}

/// Everything the feed knows about one aircraft for one cycle
#[derive(Debug, Clone, PartialEq)]
pub struct TrackUpdate {
    pub id: TrackId,
    pub label: Option<Label>,
    pub position: GeoPoint,
    /// Projected icon centre
    pub center: ScreenPoint,
    pub heading: Heading,
    pub altitude: Altitude,
}

/// Index of a slot in the track table
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SlotId(pub u16);

impl SlotId {
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Live entry of the track table
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    id: TrackId,
    label: Option<Label>,
    position: GeoPoint,
    center: ScreenPoint,
    heading: Heading,
    altitude: Altitude,
    color: Rgb565,
    /// Top-left of the pixels last painted
    last_draw: ScreenPoint,
    drawn: bool,
    last_update_ms: u64,
}

impl Track {
    pub(crate) fn from_update(update: TrackUpdate, now_ms: u64) -> Self {
        let color = AltitudeBand::of(update.altitude).color();
        Self {
            id: update.id,
            label: update.label,
            position: update.position,
            center: update.center,
            heading: update.heading,
            altitude: update.altitude,
            color,
            last_draw: ScreenPoint::default(),
            drawn: false,
            last_update_ms: now_ms,
        }
    }

    /// Refresh from the feed, keeping render state
    pub(crate) fn apply(&mut self, update: TrackUpdate, now_ms: u64) {
        self.color = AltitudeBand::of(update.altitude).color();
        self.id = update.id;
        self.label = update.label;
        self.position = update.position;
        self.center = update.center;
        self.heading = update.heading;
        self.altitude = update.altitude;
        self.last_update_ms = now_ms;
    }

    pub fn id(&self) -> &TrackId {
        &self.id
    }

    pub fn label(&self) -> Option<&Label> {
        self.label.as_ref()
    }

    /// Callsign, or the identity when there is none
    pub fn display_name(&self) -> &str {
        match &self.label {
            Some(label) => label.as_str(),
            None => self.id.as_str(),
        }
    }

    pub fn position(&self) -> GeoPoint {
        self.position
    }

    /// Projected icon centre
    pub fn center(&self) -> ScreenPoint {
        self.center
    }

    pub fn heading(&self) -> Heading {
        self.heading
    }

    pub fn altitude(&self) -> Altitude {
        self.altitude
    }

    /// Icon colour for the current altitude
    pub fn color(&self) -> Rgb565 {
        self.color
    }

    pub fn last_update_ms(&self) -> u64 {
        self.last_update_ms
    }

    /// Milliseconds since the last feed update
    pub fn age_ms(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.last_update_ms)
    }

    /// Whether the icon is currently on screen
    pub fn is_drawn(&self) -> bool {
        self.drawn
    }

    /// Top-left of the icon currently on screen
    pub fn last_draw(&self) -> Option<ScreenPoint> {
        self.drawn.then_some(self.last_draw)
    }

    /// Top-left of an icon centred on the current position
    pub fn icon_origin(&self, icon_w: i32, icon_h: i32) -> ScreenPoint {
        ScreenPoint::new(self.center.x - icon_w / 2, self.center.y - icon_h / 2)
    }

    /// Icon box at the current position
    pub fn icon_rect(&self, icon_w: i32, icon_h: i32) -> Rect {
        let origin = self.icon_origin(icon_w, icon_h);
        Rect::new(origin.x, origin.y, icon_w, icon_h)
    }

    pub(crate) fn mark_drawn(&mut self, top_left: ScreenPoint) {
        self.last_draw = top_left;
        self.drawn = true;
    }

    pub(crate) fn clear_drawn(&mut self) {
        self.drawn = false;
    }
}
