//! Tech Radar - an interactive four-quadrant technology radar
//!
//! Core modules:
//! - `layout`: Polar layout engine (layer annuli, entry placement, zoom centers)
//! - `radar`: Public façade and the overview/zoom state machine
//! - `events`: Named event channels and listener registry
//! - `interaction`: Hit-testing, hover/selection rules, debouncing
//! - `surface`: Declarative draw commands for a rendering surface
//! - `data`: Radar dataset model and loaders
//! - `platform`: Browser bindings (SVG surface, fetch, JS events)

pub mod config;
pub mod data;
pub mod error;
pub mod events;
pub mod hash;
pub mod interaction;
pub mod layout;
pub mod platform;
pub mod radar;
pub mod surface;
pub mod timeline;

pub use config::{RadarConfig, RadarOptions};
pub use data::{DataLoader, Entry, FileLoader, Layer, RadarDataset, Section, StaticLoader};
pub use error::{RadarError, Result};
pub use events::{Channel, RadarEvent};
pub use layout::SectionId;
pub use radar::{Radar, ViewState};
pub use surface::{RecordingSurface, Surface};

use glam::DVec2;

/// Radar configuration constants
pub mod consts {
    use std::f64::consts::FRAC_PI_2;

    /// Number of sections. Section angle spans, zoom centers, the parity
    /// rotation in entry placement and the palette size all assume four.
    pub const SECTION_COUNT: usize = 4;
    /// Angular span of one section (radians)
    pub const QUADRANT_SPAN: f64 = FRAC_PI_2;

    /// Entries scatter within this fraction of a band's half-width
    pub const RADIAL_SPREAD: f64 = 0.60;

    /// Resting opacity of overview sections and zoomed layers
    pub const SECTION_OPACITY: f64 = 0.25;
    pub const LAYER_OPACITY: f64 = 0.25;

    /// Transition timings (milliseconds)
    pub const TRANSITION_DELAY_MS: f64 = 250.0;
    pub const FADE_DURATION_MS: f64 = 500.0;
    pub const ZOOM_DURATION_MS: f64 = 750.0;
    /// Pause between the overview fading out and being redrawn
    pub const SETTLE_DELAY_MS: f64 = 100.0;

    /// Entry symbol area in square pixels
    pub const SYMBOL_AREA: f64 = 64.0;
    /// Pointer distance that still counts as touching an entry
    pub const ENTRY_HIT_RADIUS: f64 = 6.0;
}

/// Screen-frame polar to cartesian: clockwise from 12 o'clock, y down
#[inline]
pub fn screen_point(r: f64, theta: f64) -> DVec2 {
    DVec2::new(r * theta.sin(), -r * theta.cos())
}

/// Screen-frame angle of a point, in `[0, 2π)`
#[inline]
pub fn screen_angle(pos: DVec2) -> f64 {
    pos.x.atan2(-pos.y).rem_euclid(std::f64::consts::TAU)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_screen_point_clock_positions() {
        let twelve = screen_point(10.0, 0.0);
        assert!((twelve - DVec2::new(0.0, -10.0)).length() < 1e-12);
        let three = screen_point(10.0, FRAC_PI_2);
        assert!((three - DVec2::new(10.0, 0.0)).length() < 1e-12);
        let six = screen_point(10.0, PI);
        assert!((six - DVec2::new(0.0, 10.0)).length() < 1e-12);
    }

    #[test]
    fn test_screen_angle_roundtrip() {
        for theta in [0.3, 1.9, 3.5, 5.9] {
            assert!((screen_angle(screen_point(7.0, theta)) - theta).abs() < 1e-12);
        }
    }
}
