//! Annular wedge geometry for sections and layers
//!
//! Angles are screen-frame: radians clockwise from 12 o'clock, y pointing
//! down. A wedge is defined by:
//! - inner_radius / outer_radius: radial extent
//! - start_angle, end_angle: angular extent (end >= start)

use glam::DVec2;
use serde::{Deserialize, Serialize};
use std::f64::consts::{PI, TAU};
use std::fmt::Write;

use super::SectionId;
use crate::{screen_angle, screen_point};

/// A filled annular wedge
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArcSegment {
    pub inner_radius: f64,
    pub outer_radius: f64,
    pub start_angle: f64,
    pub end_angle: f64,
}

impl ArcSegment {
    pub fn new(inner_radius: f64, outer_radius: f64, start_angle: f64, end_angle: f64) -> Self {
        Self {
            inner_radius,
            outer_radius,
            start_angle,
            end_angle,
        }
    }

    /// Wedge spanning a section's quadrant
    pub fn quadrant(section: SectionId, inner_radius: f64, outer_radius: f64) -> Self {
        let (start, end) = section.angles();
        Self::new(inner_radius, outer_radius, start, end)
    }

    /// Angular span (a full turn at most)
    pub fn angular_span(&self) -> f64 {
        (self.end_angle - self.start_angle).clamp(0.0, TAU)
    }

    /// Check if a screen-frame angle is within the wedge
    pub fn contains_angle(&self, theta: f64) -> bool {
        let span = self.angular_span();
        if span >= TAU {
            return true;
        }
        (theta - self.start_angle).rem_euclid(TAU) <= span
    }

    /// Check if a point, relative to the wedge center, lies inside it
    pub fn contains_point(&self, local: DVec2) -> bool {
        let r = local.length();
        if r < self.inner_radius || r > self.outer_radius {
            return false;
        }
        // The apex has no direction
        r == 0.0 || self.contains_angle(screen_angle(local))
    }

    /// Point at the middle radius and middle angle
    pub fn centroid(&self) -> DVec2 {
        let r = (self.inner_radius + self.outer_radius) / 2.0;
        screen_point(r, self.start_angle + self.angular_span() / 2.0)
    }

    /// SVG path data relative to the wedge center
    pub fn path_data(&self) -> String {
        let span = self.angular_span();
        let large_arc = u8::from(span > PI);
        let outer_start = screen_point(self.outer_radius, self.start_angle);
        let outer_end = screen_point(self.outer_radius, self.end_angle);
        let ro = self.outer_radius;

        let mut d = String::new();
        let _ = write!(
            d,
            "M{:.3},{:.3}A{ro:.3},{ro:.3} 0 {large_arc},1 {:.3},{:.3}",
            outer_start.x, outer_start.y, outer_end.x, outer_end.y
        );
        if self.inner_radius > 0.0 {
            let ri = self.inner_radius;
            let inner_end = screen_point(ri, self.end_angle);
            let inner_start = screen_point(ri, self.start_angle);
            let _ = write!(
                d,
                "L{:.3},{:.3}A{ri:.3},{ri:.3} 0 {large_arc},0 {:.3},{:.3}Z",
                inner_end.x, inner_end.y, inner_start.x, inner_start.y
            );
        } else {
            d.push_str("L0,0Z");
        }
        d
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_quadrant_contains_its_corner() {
        // Quadrant 1 spans 12 o'clock to 3 o'clock: up and to the right
        let arc = ArcSegment::quadrant(SectionId::new(1).unwrap(), 0.0, 100.0);
        assert!(arc.contains_point(DVec2::new(30.0, -30.0)));
        assert!(!arc.contains_point(DVec2::new(-30.0, -30.0)));
        assert!(!arc.contains_point(DVec2::new(30.0, 30.0)));

        // Quadrant 3 spans 6 o'clock to 9 o'clock: down and to the left
        let arc = ArcSegment::quadrant(SectionId::new(3).unwrap(), 0.0, 100.0);
        assert!(arc.contains_point(DVec2::new(-30.0, 30.0)));
        assert!(!arc.contains_point(DVec2::new(30.0, -30.0)));
    }

    #[test]
    fn test_quadrant_four_wraps_to_zero() {
        let arc = ArcSegment::quadrant(SectionId::new(4).unwrap(), 0.0, 100.0);
        assert!(arc.contains_point(DVec2::new(-30.0, -30.0)));
        assert!(arc.contains_angle(TAU - 0.01));
        assert!(!arc.contains_angle(0.01));
        assert!(!arc.contains_angle(FRAC_PI_2));
    }

    #[test]
    fn test_contains_point_radial_band() {
        let arc = ArcSegment::new(40.0, 80.0, 0.0, FRAC_PI_2);
        assert!(!arc.contains_point(DVec2::new(20.0, -20.0)));
        assert!(arc.contains_point(DVec2::new(40.0, -40.0)));
        assert!(!arc.contains_point(DVec2::new(70.0, -70.0)));
    }

    #[test]
    fn test_centroid_inside() {
        for id in SectionId::ALL {
            let arc = ArcSegment::quadrant(id, 10.0, 90.0);
            assert!(arc.contains_point(arc.centroid()), "section {id}");
        }
    }

    #[test]
    fn test_path_data_shape() {
        let wedge = ArcSegment::new(0.0, 100.0, 0.0, FRAC_PI_2);
        assert_eq!(
            wedge.path_data(),
            "M0.000,-100.000A100.000,100.000 0 0,1 100.000,-0.000L0,0Z"
        );

        let band = ArcSegment::new(50.0, 100.0, 0.0, FRAC_PI_2);
        let d = band.path_data();
        assert!(d.starts_with("M0.000,-100.000"));
        assert!(d.contains("A50.000,50.000 0 0,0 0.000,-50.000Z"));
    }
}
