//! Layer annuli and entry placement inside a zoomed section
//!
//! A zoomed section is a quarter-disc whose apex sits on a canvas corner
//! (`zoom_center`). Layers split the quarter-disc into concentric bands of
//! equal area; entries are spread across a band's angular span and pulled
//! toward its mid-radius by a hash of their name.

use glam::DVec2;
use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_2, PI};

use super::SectionId;
use crate::consts::{QUADRANT_SPAN, RADIAL_SPREAD};
use crate::data::Entry;
use crate::hash::{HashRange, hash_range, string_hash};

/// How many equal-area shares a section's quarter-disc is split into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LayerShares {
    /// `layers + 1` shares; the outermost share stays empty
    #[default]
    SourceCompatible,
    /// `layers` shares; the last layer reaches the full radius
    Exact,
}

impl LayerShares {
    fn share_count(self, layer_count: usize) -> usize {
        match self {
            LayerShares::SourceCompatible => layer_count + 1,
            LayerShares::Exact => layer_count,
        }
    }
}

/// Radial band of one layer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Annulus {
    pub inner_radius: f64,
    pub outer_radius: f64,
}

impl Annulus {
    #[inline]
    pub fn mid_radius(&self) -> f64 {
        (self.inner_radius + self.outer_radius) / 2.0
    }
}

/// Split a quarter-disc of `radius` into `layer_count` concentric bands.
///
/// Band `i` ends where the area enclosed reaches `i + 1` shares; each band
/// starts where the previous one ended.
pub fn layers_to_annuli(radius: f64, layer_count: usize, shares: LayerShares) -> Vec<Annulus> {
    if layer_count == 0 {
        return Vec::new();
    }
    let total_area = PI * radius * radius / 4.0;
    let share_area = total_area / shares.share_count(layer_count) as f64;

    let mut inner_radius = 0.0;
    (0..layer_count)
        .map(|i| {
            let outer_radius = (4.0 * share_area * (i + 1) as f64 / PI).sqrt();
            let annulus = Annulus {
                inner_radius,
                outer_radius,
            };
            inner_radius = outer_radius;
            annulus
        })
        .collect()
}

/// Angular distance between neighbouring entries in a band of `entry_count`.
///
/// The quadrant is cut into `entry_count + 1` steps so no entry sits on a
/// section edge.
#[inline]
pub fn angle_step(entry_count: usize) -> f64 {
    QUADRANT_SPAN / (entry_count + 1) as f64
}

/// Canvas corner the section's apex occupies once zoomed to `size × size`.
///
/// Only meaningful for the fixed four-quadrant layout.
pub fn zoom_center(section: SectionId, size: f64) -> DVec2 {
    match section.get() {
        1 => DVec2::new(0.0, size),
        2 => DVec2::new(0.0, 0.0),
        3 => DVec2::new(size, 0.0),
        _ => DVec2::new(size, size),
    }
}

/// Reflect a local entry offset into the canvas quadrant the zoomed section
/// covers. Distance from the zoom center is preserved.
pub fn canvas_offset(section: SectionId, offset: DVec2) -> DVec2 {
    let sign = match section.get() {
        1 => DVec2::new(1.0, -1.0),
        2 => DVec2::new(1.0, 1.0),
        3 => DVec2::new(-1.0, 1.0),
        _ => DVec2::new(-1.0, -1.0),
    };
    offset.abs() * sign
}

/// Linear map from a band's hash range onto its inner 60% around mid-radius
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadialScale {
    domain: Option<HashRange>,
    range: (f64, f64),
}

impl RadialScale {
    pub fn new(domain: Option<HashRange>, annulus: Annulus) -> Self {
        let mid = annulus.mid_radius();
        let low = RADIAL_SPREAD * (annulus.inner_radius - mid) + mid;
        let high = RADIAL_SPREAD * (annulus.outer_radius - mid) + mid;
        Self {
            domain,
            range: (low, high),
        }
    }

    /// Radius for a hash. Degenerate domains collapse to mid-radius.
    pub fn radius(&self, hash: i32) -> f64 {
        let (low, high) = self.range;
        match self.domain {
            Some(domain) if !domain.is_degenerate() => {
                let (min, max) = (f64::from(domain.min), f64::from(domain.max));
                let t = (f64::from(hash) - min) / (max - min);
                low + t * (high - low)
            }
            _ => (low + high) / 2.0,
        }
    }
}

/// Where one entry is drawn inside a zoomed section
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EntryPlacement {
    /// Position of the entry within its layer
    pub index: usize,
    /// Angle after the per-quadrant rotation (radians)
    pub angle: f64,
    /// Distance from the zoom center
    pub radius: f64,
    /// `(r·sin angle, r·cos angle)`, relative to the zoom center
    pub offset: DVec2,
    /// Canvas position of the entry's symbol
    pub position: DVec2,
    /// Drawn with the emphasized symbol
    pub emphasized: bool,
}

/// Place every entry of one layer of a zoomed section.
///
/// Entries keep dataset order and take consecutive angular slots; the
/// rotation by ±90° depends on quadrant parity.
pub fn place_entries(
    section: SectionId,
    annulus: Annulus,
    entries: &[Entry],
    size: f64,
) -> Vec<EntryPlacement> {
    if entries.is_empty() {
        return Vec::new();
    }

    let step = angle_step(entries.len());
    let scale = RadialScale::new(hash_range(entries.iter().map(|e| e.name.as_str())), annulus);
    let base = f64::from(section.get() - 1) * QUADRANT_SPAN;
    let center = zoom_center(section, size);

    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let angle = base + step * (index + 1) as f64;
            let angle = if section.is_even() {
                angle + FRAC_PI_2
            } else {
                angle - FRAC_PI_2
            };
            let radius = scale.radius(string_hash(&entry.name));
            let offset = DVec2::new(radius * angle.sin(), radius * angle.cos());

            EntryPlacement {
                index,
                angle,
                radius,
                offset,
                position: center + canvas_offset(section, offset),
                emphasized: entry.active,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn entries(names: &[&str]) -> Vec<Entry> {
        names.iter().map(|n| Entry::named(n)).collect()
    }

    fn section(q: u8) -> SectionId {
        SectionId::new(q).unwrap()
    }

    #[test]
    fn test_annuli_source_compatible_shares() {
        let annuli = layers_to_annuli(600.0, 3, LayerShares::SourceCompatible);
        assert_eq!(annuli.len(), 3);
        assert_eq!(annuli[0].inner_radius, 0.0);
        for pair in annuli.windows(2) {
            assert_eq!(pair[1].inner_radius, pair[0].outer_radius);
        }
        // Three of four shares used: the last band stops short of the edge
        let expected = 600.0 * (3.0f64 / 4.0).sqrt();
        assert!((annuli[2].outer_radius - expected).abs() < 1e-9);
        let first = 600.0 * (1.0f64 / 4.0).sqrt();
        assert!((annuli[0].outer_radius - first).abs() < 1e-9);
    }

    #[test]
    fn test_annuli_exact_shares_fill_radius() {
        let annuli = layers_to_annuli(600.0, 3, LayerShares::Exact);
        assert!((annuli[2].outer_radius - 600.0).abs() < 1e-9);
    }

    #[test]
    fn test_annuli_equal_area() {
        let annuli = layers_to_annuli(500.0, 4, LayerShares::SourceCompatible);
        let area = |a: &Annulus| PI / 4.0 * (a.outer_radius.powi(2) - a.inner_radius.powi(2));
        let first = area(&annuli[0]);
        for a in &annuli {
            assert!((area(a) - first).abs() < 1e-6);
        }
    }

    #[test]
    fn test_annuli_empty() {
        assert!(layers_to_annuli(600.0, 0, LayerShares::SourceCompatible).is_empty());
        assert!(layers_to_annuli(600.0, 0, LayerShares::Exact).is_empty());
    }

    #[test]
    fn test_zoom_centers() {
        let size = 480.0;
        assert_eq!(zoom_center(section(1), size), DVec2::new(0.0, size));
        assert_eq!(zoom_center(section(2), size), DVec2::new(0.0, 0.0));
        assert_eq!(zoom_center(section(3), size), DVec2::new(size, 0.0));
        assert_eq!(zoom_center(section(4), size), DVec2::new(size, size));
    }

    #[test]
    fn test_place_entries_empty_layer() {
        let annulus = Annulus {
            inner_radius: 0.0,
            outer_radius: 100.0,
        };
        assert!(place_entries(section(1), annulus, &[], 600.0).is_empty());
    }

    #[test]
    fn test_single_entry_sits_mid_band() {
        let annulus = Annulus {
            inner_radius: 100.0,
            outer_radius: 200.0,
        };
        let placed = place_entries(section(3), annulus, &entries(&["only"]), 600.0);
        assert_eq!(placed.len(), 1);
        assert_eq!(placed[0].radius, 150.0);
        assert!(placed[0].position.is_finite());
        // One entry: half way through the quadrant, then rotated by -90°
        let expected_angle = PI + QUADRANT_SPAN / 2.0 - FRAC_PI_2;
        assert!((placed[0].angle - expected_angle).abs() < 1e-12);
    }

    #[test]
    fn test_radial_scale_extremes() {
        let annulus = Annulus {
            inner_radius: 100.0,
            outer_radius: 200.0,
        };
        let names = ["a", "b", "c"];
        let placed = place_entries(section(2), annulus, &entries(&names), 600.0);
        // hash("a") < hash("b") < hash("c")
        assert!((placed[0].radius - 120.0).abs() < 1e-9);
        assert!((placed[1].radius - 150.0).abs() < 1e-9);
        assert!((placed[2].radius - 180.0).abs() < 1e-9);
    }

    #[test]
    fn test_offsets_follow_formula() {
        let annulus = Annulus {
            inner_radius: 0.0,
            outer_radius: 300.0,
        };
        let list = entries(&["Rust", "Go", "Zig"]);
        for q in 1..=4 {
            let id = section(q);
            let placed = place_entries(id, annulus, &list, 600.0);
            let step = FRAC_PI_2 / 4.0;
            for p in &placed {
                let raw = f64::from(q - 1) * FRAC_PI_2 + step * (p.index + 1) as f64;
                let adjusted = if q % 2 == 0 { raw + FRAC_PI_2 } else { raw - FRAC_PI_2 };
                assert!((p.angle - adjusted).abs() < 1e-12);
                assert!((p.offset.x - p.radius * adjusted.sin()).abs() < 1e-9);
                assert!((p.offset.y - p.radius * adjusted.cos()).abs() < 1e-9);
                let from_center = p.position - zoom_center(id, 600.0);
                assert!((from_center.length() - p.radius).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_positions_stay_on_canvas() {
        let annulus = Annulus {
            inner_radius: 200.0,
            outer_radius: 400.0,
        };
        let list = entries(&["Kafka", "Pulsar", "NATS", "RabbitMQ", "Redis Streams"]);
        for id in SectionId::ALL {
            for p in place_entries(id, annulus, &list, 600.0) {
                assert!((0.0..=600.0).contains(&p.position.x), "{id}: {:?}", p.position);
                assert!((0.0..=600.0).contains(&p.position.y), "{id}: {:?}", p.position);
            }
        }
    }

    #[test]
    fn test_emphasized_follows_active() {
        let mut list = entries(&["one", "two"]);
        list[1].active = true;
        let annulus = Annulus {
            inner_radius: 0.0,
            outer_radius: 100.0,
        };
        let placed = place_entries(section(1), annulus, &list, 600.0);
        assert!(!placed[0].emphasized);
        assert!(placed[1].emphasized);
    }

    proptest! {
        #[test]
        fn prop_angle_step(n in 0usize..500) {
            let step = angle_step(n);
            prop_assert!(step.is_finite());
            prop_assert!((step * (n + 1) as f64 - FRAC_PI_2).abs() < 1e-9);
        }

        #[test]
        fn prop_scale_maps_bounds(inner in 0.0f64..500.0, width in 0.1f64..500.0, a in any::<i32>(), b in any::<i32>()) {
            prop_assume!(a != b);
            let annulus = Annulus { inner_radius: inner, outer_radius: inner + width };
            let range = HashRange::single(a).include(b);
            let scale = RadialScale::new(Some(range), annulus);
            let mid = annulus.mid_radius();
            let low = 0.6 * (annulus.inner_radius - mid) + mid;
            let high = 0.6 * (annulus.outer_radius - mid) + mid;
            prop_assert!((scale.radius(range.min) - low).abs() < 1e-6);
            prop_assert!((scale.radius(range.max) - high).abs() < 1e-6);
        }

        #[test]
        fn prop_placements_never_nan(names in prop::collection::vec("[a-z]{1,8}", 0..12), q in 1u8..=4) {
            let list: Vec<Entry> = names.iter().map(|n| Entry::named(n)).collect();
            let annulus = Annulus { inner_radius: 50.0, outer_radius: 120.0 };
            let placed = place_entries(SectionId::new(q).unwrap(), annulus, &list, 600.0);
            prop_assert_eq!(placed.len(), list.len());
            for p in placed {
                prop_assert!(p.position.is_finite());
                prop_assert!(p.radius >= 50.0 && p.radius <= 120.0);
            }
        }
    }
}
