//! Pointer interaction: hit-testing, hover tracking, selection, debouncing
//!
//! Raw pointer input becomes `PointerEvent`s against shape ids. Events are
//! debounced per (shape, kind) with a trailing edge, so a burst of identical
//! events dispatches once with the latest state.

use glam::DVec2;
use std::collections::BTreeMap;

use crate::config::RadarConfig;
use crate::consts::SECTION_OPACITY;
use crate::surface::{Shape, ShapeId, ShapeRole, Style};

/// Kind of pointer input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerKind {
    Enter,
    Leave,
    Click,
}

/// Pointer input addressed to a shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerEvent {
    pub shape: ShapeId,
    pub kind: PointerKind,
}

impl PointerEvent {
    pub fn new(shape: ShapeId, kind: PointerKind) -> Self {
        Self { shape, kind }
    }
}

#[derive(Debug, Clone)]
struct Pending {
    event: PointerEvent,
    due: f64,
    seq: u64,
}

/// Trailing-edge debounce keyed by (shape, kind)
#[derive(Debug, Clone, Default)]
pub struct Debouncer {
    wait_ms: f64,
    pending: Vec<Pending>,
    next_seq: u64,
}

impl Debouncer {
    pub fn new(wait_ms: f64) -> Self {
        Self {
            wait_ms,
            ..Self::default()
        }
    }

    /// Queue an event. A pending event with the same key is replaced and its
    /// deadline restarts.
    pub fn push(&mut self, event: PointerEvent, now: f64) {
        self.pending.retain(|p| p.event != event);
        let seq = self.next_seq;
        self.next_seq += 1;
        self.pending.push(Pending {
            event,
            due: now + self.wait_ms,
            seq,
        });
    }

    /// Take every event whose deadline has passed, oldest first
    pub fn flush(&mut self, now: f64) -> Vec<PointerEvent> {
        let (mut due, waiting): (Vec<Pending>, Vec<Pending>) =
            self.pending.drain(..).partition(|p| p.due <= now);
        self.pending = waiting;
        due.sort_by_key(|p| p.seq);
        due.into_iter().map(|p| p.event).collect()
    }

    /// Drop everything queued
    pub fn clear(&mut self) {
        self.pending.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

/// Shape currently under the pointer
#[derive(Debug, Clone, Default)]
pub struct HoverTracker {
    current: Option<ShapeId>,
}

impl HoverTracker {
    /// Move the pointer onto `hit`, returning the leave/enter pair if the
    /// hovered shape changed
    pub fn update(&mut self, hit: Option<ShapeId>) -> Vec<PointerEvent> {
        if hit == self.current {
            return Vec::new();
        }
        let mut events = Vec::with_capacity(2);
        if let Some(old) = self.current {
            events.push(PointerEvent::new(old, PointerKind::Leave));
        }
        if let Some(new) = hit {
            events.push(PointerEvent::new(new, PointerKind::Enter));
        }
        self.current = hit;
        events
    }

    pub fn current(&self) -> Option<ShapeId> {
        self.current
    }

    /// Forget the hovered shape without emitting anything
    pub fn reset(&mut self) {
        self.current = None;
    }
}

/// The single open entry
#[derive(Debug, Clone, Default)]
pub struct Selection {
    open: Option<ShapeId>,
}

impl Selection {
    pub fn is_open(&self, shape: ShapeId) -> bool {
        self.open == Some(shape)
    }

    pub fn open(&mut self, shape: ShapeId) -> Option<ShapeId> {
        self.open.replace(shape)
    }

    pub fn take(&mut self) -> Option<ShapeId> {
        self.open.take()
    }

    pub fn current(&self) -> Option<ShapeId> {
        self.open
    }
}

/// Interactive shape under `point`: entries win over sections, later shapes
/// over earlier ones. Layers never capture the pointer.
pub fn hit_test(shapes: &BTreeMap<ShapeId, Shape>, point: DVec2, hit_radius: f64) -> Option<ShapeId> {
    let rank = |role: &ShapeRole| match role {
        ShapeRole::Entry(_) => Some(0),
        ShapeRole::Section(_) => Some(1),
        ShapeRole::Layer { .. } => None,
    };

    shapes
        .iter()
        .rev()
        .filter_map(|(id, shape)| rank(&shape.role).map(|r| (r, *id, shape)))
        .filter(|(_, _, shape)| shape.contains_point(point, hit_radius))
        .min_by_key(|(r, _, _)| *r)
        .map(|(_, id, _)| id)
}

/// Section under the pointer
pub fn section_highlight(config: &RadarConfig) -> Style {
    Style {
        fill: None,
        stroke: Some(config.highlight_color.clone()),
        stroke_width: Some(2.0),
        opacity: Some(1.0),
    }
}

/// Section at rest
pub fn section_default(config: &RadarConfig) -> Style {
    Style {
        fill: None,
        stroke: Some(config.outline_color.clone()),
        stroke_width: Some(1.0),
        opacity: Some(SECTION_OPACITY),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{ArcSegment, SectionId};
    use crate::surface::{EntryKey, Geometry, SymbolKind};

    fn ev(id: u32, kind: PointerKind) -> PointerEvent {
        PointerEvent::new(ShapeId(id), kind)
    }

    #[test]
    fn test_debounce_coalesces_bursts() {
        let mut debouncer = Debouncer::new(0.0);
        for _ in 0..10 {
            debouncer.push(ev(1, PointerKind::Enter), 5.0);
        }
        debouncer.push(ev(1, PointerKind::Click), 5.0);
        assert_eq!(
            debouncer.flush(5.0),
            vec![ev(1, PointerKind::Enter), ev(1, PointerKind::Click)]
        );
        assert!(debouncer.is_empty());
    }

    #[test]
    fn test_debounce_trailing_edge_restarts() {
        let mut debouncer = Debouncer::new(16.0);
        debouncer.push(ev(2, PointerKind::Enter), 0.0);
        debouncer.push(ev(2, PointerKind::Enter), 10.0);
        assert!(debouncer.flush(16.0).is_empty());
        assert_eq!(debouncer.flush(26.0), vec![ev(2, PointerKind::Enter)]);
    }

    #[test]
    fn test_debounce_orders_by_latest_push() {
        let mut debouncer = Debouncer::new(0.0);
        debouncer.push(ev(1, PointerKind::Enter), 0.0);
        debouncer.push(ev(1, PointerKind::Leave), 0.0);
        debouncer.push(ev(1, PointerKind::Enter), 0.0);
        assert_eq!(
            debouncer.flush(0.0),
            vec![ev(1, PointerKind::Leave), ev(1, PointerKind::Enter)]
        );
    }

    #[test]
    fn test_hover_tracker_transitions() {
        let mut hover = HoverTracker::default();
        assert_eq!(hover.update(Some(ShapeId(1))), vec![ev(1, PointerKind::Enter)]);
        assert!(hover.update(Some(ShapeId(1))).is_empty());
        assert_eq!(
            hover.update(Some(ShapeId(2))),
            vec![ev(1, PointerKind::Leave), ev(2, PointerKind::Enter)]
        );
        assert_eq!(hover.update(None), vec![ev(2, PointerKind::Leave)]);
        assert_eq!(hover.current(), None);
    }

    #[test]
    fn test_selection_single_open() {
        let mut selection = Selection::default();
        assert_eq!(selection.open(ShapeId(3)), None);
        assert_eq!(selection.open(ShapeId(4)), Some(ShapeId(3)));
        assert!(selection.is_open(ShapeId(4)));
        assert!(!selection.is_open(ShapeId(3)));
        assert_eq!(selection.take(), Some(ShapeId(4)));
        assert_eq!(selection.current(), None);
    }

    #[test]
    fn test_hit_test_finds_placed_entries() {
        use crate::consts::ENTRY_HIT_RADIUS;
        use crate::data::Entry;
        use crate::layout::{Annulus, place_entries};

        let section = SectionId::new(3).unwrap();
        let annulus = Annulus {
            inner_radius: 100.0,
            outer_radius: 300.0,
        };
        let entries: Vec<Entry> = ["Kafka", "NATS", "Pulsar"].iter().map(|n| Entry::named(n)).collect();
        let placements = place_entries(section, annulus, &entries, 600.0);

        let shapes: BTreeMap<ShapeId, Shape> = placements
            .iter()
            .map(|p| {
                let shape = Shape {
                    role: ShapeRole::Entry(EntryKey {
                        section,
                        layer: 0,
                        index: p.index,
                    }),
                    geometry: Geometry::Symbol {
                        kind: SymbolKind::Circle,
                        area: 64.0,
                    },
                    translate: p.position,
                    style: Style::default(),
                };
                (ShapeId(p.index as u32 + 1), shape)
            })
            .collect();

        for p in &placements {
            let id = ShapeId(p.index as u32 + 1);
            let near = p.position + DVec2::new(ENTRY_HIT_RADIUS - 0.5, 0.0);
            assert_eq!(hit_test(&shapes, near, ENTRY_HIT_RADIUS), Some(id));
            let far = p.position + DVec2::new(0.0, ENTRY_HIT_RADIUS + 0.5);
            assert_ne!(hit_test(&shapes, far, ENTRY_HIT_RADIUS), Some(id));
        }
    }

    #[test]
    fn test_hit_test_prefers_entries() {
        let section = SectionId::new(2).unwrap();
        let mut shapes = BTreeMap::new();
        shapes.insert(
            ShapeId(1),
            Shape {
                role: ShapeRole::Layer { section, layer: 0 },
                geometry: Geometry::Arc(ArcSegment::quadrant(section, 0.0, 300.0)),
                translate: DVec2::ZERO,
                style: Style::default(),
            },
        );
        shapes.insert(
            ShapeId(2),
            Shape {
                role: ShapeRole::Entry(EntryKey {
                    section,
                    layer: 0,
                    index: 0,
                }),
                geometry: Geometry::Symbol {
                    kind: SymbolKind::Circle,
                    area: 64.0,
                },
                translate: DVec2::new(100.0, 100.0),
                style: Style::default(),
            },
        );

        assert_eq!(hit_test(&shapes, DVec2::new(102.0, 99.0), 6.0), Some(ShapeId(2)));
        // Inside the layer only: layers are not interactive
        assert_eq!(hit_test(&shapes, DVec2::new(50.0, 200.0), 6.0), None);
    }
}
