use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashSet;
use std::fmt;

use crate::wheel::WheelError;

/// Segment identity as the host supplies it: numbers and strings are both accepted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SegmentId {
    Number(u64),
    Text(String),
}

impl fmt::Display for SegmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(value) => write!(f, "{value}"),
            Self::Text(value) => write!(f, "{value}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const WHITE: Self = Self(0xff, 0xff, 0xff);

    pub fn parse(value: &str) -> Option<Self> {
        let hex = value.trim().strip_prefix('#')?;
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }

        let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();
        Some(Self(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }

    /// Each channel multiplied by `factor`, saturating at 0 and 255.
    #[allow(clippy::cast_sign_loss)]
    #[must_use]
    pub fn scaled(self, factor: f64) -> Self {
        let channel = |value: u8| (f64::from(value) * factor).round().clamp(0.0, 255.0) as u8;
        Self(channel(self.0), channel(self.1), channel(self.2))
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Rgb {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid colour {raw:?}, expected #rrggbb")))
    }
}

/// Per-segment label styling
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentStyle {
    pub bold: bool,
    pub uppercase: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub id: SegmentId,
    pub label: String,
    pub color: Rgb,
    #[serde(default, alias = "textColor", skip_serializing_if = "Option::is_none")]
    pub text_color: Option<Rgb>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<SegmentStyle>,
}

impl Segment {
    pub fn new(id: impl Into<SegmentId>, label: impl Into<String>, color: Rgb) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            color,
            text_color: None,
            style: None,
        }
    }

    #[must_use]
    pub fn with_text_color(mut self, color: Rgb) -> Self {
        self.text_color = Some(color);
        self
    }

    #[must_use]
    pub fn with_style(mut self, style: SegmentStyle) -> Self {
        self.style = Some(style);
        self
    }

    /// Label as it should be drawn on the wheel
    pub fn display_label(&self) -> String {
        if self.style.is_some_and(|style| style.uppercase) {
            self.label.to_uppercase()
        } else {
            self.label.clone()
        }
    }
}

/// Colours of everything on the wheel that is not a segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WheelTheme {
    pub rim: Rgb,
    pub knob: Rgb,
    pub pointer: Rgb,
    /// Label colour for segments without their own `text_color`.
    pub text: Rgb,
}

impl WheelTheme {
    pub const ROYALE: Self = Self {
        rim: Rgb(0xf1, 0xc4, 0x0f),
        knob: Rgb(0xf1, 0xc4, 0x0f),
        pointer: Rgb(0xe7, 0x4c, 0x3c),
        text: Rgb::WHITE,
    };

    pub fn label_color(&self, segment: &Segment) -> Rgb {
        segment.text_color.unwrap_or(self.text)
    }
}

impl Default for WheelTheme {
    fn default() -> Self {
        Self::ROYALE
    }
}

impl From<u64> for SegmentId {
    fn from(value: u64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for SegmentId {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for SegmentId {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Ordered, non-empty list of segments. Order defines angular position:
/// segment `i` covers `[i * 360/N, (i + 1) * 360/N)` degrees, clockwise from 0° (right).
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentSet {
    segments: Vec<Segment>,
}

impl SegmentSet {
    pub fn new(segments: Vec<Segment>) -> Result<Self, WheelError> {
        if segments.is_empty() {
            return Err(WheelError::EmptySegmentSet);
        }

        let mut seen = HashSet::with_capacity(segments.len());
        for segment in &segments {
            if !seen.insert(&segment.id) {
                return Err(WheelError::DuplicateSegmentId(segment.id.to_string()));
            }
        }

        Ok(Self { segments })
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Segment> {
        self.segments.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Segment> {
        self.segments.iter()
    }

    pub fn angle_per_item(&self) -> f64 {
        360.0 / self.segments.len() as f64
    }
}

impl<'a> IntoIterator for &'a SegmentSet {
    type Item = &'a Segment;
    type IntoIter = std::slice::Iter<'a, Segment>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// The eight-prize "Royale" wheel used when no configuration supplies segments.
pub fn default_segments() -> Vec<Segment> {
    let gold = Rgb(0xf1, 0xc4, 0x0f);
    let cloud = Rgb(0xec, 0xf0, 0xf1);

    vec![
        Segment::new(1_u64, "50 Gems", Rgb(0x2c, 0x3e, 0x50)).with_text_color(gold),
        Segment::new(2_u64, "Try Again", Rgb(0xc0, 0x39, 0x2b)).with_text_color(cloud),
        Segment::new(3_u64, "100 Gems", Rgb(0x8e, 0x44, 0xad)).with_text_color(gold),
        Segment::new(4_u64, "Free Spin", Rgb(0x16, 0xa0, 0x85)).with_text_color(cloud),
        Segment::new(5_u64, "JACKPOT", gold)
            .with_text_color(Rgb(0, 0, 0))
            .with_style(SegmentStyle {
                bold: true,
                uppercase: true,
            }),
        Segment::new(6_u64, "No Luck", Rgb(0x7f, 0x8c, 0x8d)).with_text_color(cloud),
        Segment::new(7_u64, "20 Gems", Rgb(0x29, 0x80, 0xb9)).with_text_color(gold),
        Segment::new(8_u64, "Mystery", Rgb(0xd3, 0x54, 0x00)).with_text_color(cloud),
    ]
}
