//! Polar layout engine
//!
//! Pure geometry, no rendering or interaction state:
//! - `arc`: annular wedges (sections and layers) and their hit areas
//! - `polar`: layer annuli, entry slots, zoom centers

pub mod arc;
pub mod polar;

pub use arc::ArcSegment;
pub use polar::{
    Annulus, EntryPlacement, LayerShares, RadialScale, angle_step, canvas_offset,
    layers_to_annuli, place_entries, zoom_center,
};

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::consts::{QUADRANT_SPAN, SECTION_COUNT};
use crate::error::{RadarError, Result};

/// 1-based quadrant number of a section.
///
/// The quadrant fixes the section's angular span, its fill color and where it
/// lands when zoomed. Only `1..=4` exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct SectionId(u8);

impl SectionId {
    pub const ALL: [SectionId; SECTION_COUNT] =
        [SectionId(1), SectionId(2), SectionId(3), SectionId(4)];

    pub fn new(quadrant: u8) -> Result<Self> {
        if (1..=SECTION_COUNT as u8).contains(&quadrant) {
            Ok(Self(quadrant))
        } else {
            Err(RadarError::InvalidSection(quadrant))
        }
    }

    /// Section for a 0-based position in the dataset
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    #[inline]
    pub fn get(self) -> u8 {
        self.0
    }

    /// 0-based position in the dataset and palette
    #[inline]
    pub fn index(self) -> usize {
        usize::from(self.0) - 1
    }

    #[inline]
    pub fn is_even(self) -> bool {
        self.0 % 2 == 0
    }

    /// `[(q-1)·90°, q·90°]` in radians
    pub fn angles(self) -> (f64, f64) {
        let q = f64::from(self.0);
        ((q - 1.0) * QUADRANT_SPAN, q * QUADRANT_SPAN)
    }
}

impl TryFrom<u8> for SectionId {
    type Error = RadarError;

    fn try_from(value: u8) -> Result<Self> {
        Self::new(value)
    }
}

impl From<SectionId> for u8 {
    fn from(id: SectionId) -> u8 {
        id.0
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
