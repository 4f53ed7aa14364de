//! Declarative draw commands for a rendering surface
//!
//! The radar never touches a concrete rendering technology. It appends
//! shapes, restyles them, asks for animations and removes them; a `Surface`
//! turns those commands into pixels (SVG in the browser) or records them.

use glam::DVec2;
use serde::Serialize;
use std::collections::BTreeMap;
use std::f64::consts::PI;
use std::fmt::Write;

use crate::layout::{ArcSegment, SectionId};

/// Handle of a drawn shape, unique per radar instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ShapeId(pub u32);

/// Address of an entry inside the dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct EntryKey {
    pub section: SectionId,
    pub layer: usize,
    pub index: usize,
}

/// What a shape stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ShapeRole {
    /// A whole section in the overview
    Section(SectionId),
    /// One band of a zoomed section
    Layer { section: SectionId, layer: usize },
    /// An entry symbol in a zoomed section
    Entry(EntryKey),
}

/// Entry marker symbols
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SymbolKind {
    Circle,
    TriangleUp,
}

impl SymbolKind {
    /// SVG path data of a symbol with the given area, centered on the origin
    pub fn path_data(self, area: f64) -> String {
        let mut d = String::new();
        match self {
            SymbolKind::Circle => {
                let r = (area / PI).sqrt();
                let _ = write!(
                    d,
                    "M0,{r:.3}A{r:.3},{r:.3} 0 1,1 0,{:.3}A{r:.3},{r:.3} 0 1,1 0,{r:.3}Z",
                    -r
                );
            }
            SymbolKind::TriangleUp => {
                let sqrt3 = 3f64.sqrt();
                let ry = (area / sqrt3).sqrt();
                let rx = ry * sqrt3 / 2.0;
                let _ = write!(d, "M0,{:.3}L{rx:.3},{ry:.3} {:.3},{ry:.3}Z", -ry, -rx);
            }
        }
        d
    }
}

/// Shape outline
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Geometry {
    Arc(ArcSegment),
    Symbol { kind: SymbolKind, area: f64 },
}

impl Geometry {
    pub fn path_data(&self) -> String {
        match self {
            Geometry::Arc(arc) => arc.path_data(),
            Geometry::Symbol { kind, area } => kind.path_data(*area),
        }
    }
}

/// Presentation attributes; `None` leaves the current value untouched
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Style {
    pub fill: Option<String>,
    pub stroke: Option<String>,
    pub stroke_width: Option<f64>,
    pub opacity: Option<f64>,
}

impl Style {
    pub fn fill(color: &str) -> Self {
        Self {
            fill: Some(color.to_string()),
            ..Self::default()
        }
    }

    /// Overwrite every attribute `other` sets
    pub fn merge(&mut self, other: &Style) {
        if let Some(fill) = &other.fill {
            self.fill = Some(fill.clone());
        }
        if let Some(stroke) = &other.stroke {
            self.stroke = Some(stroke.clone());
        }
        if other.stroke_width.is_some() {
            self.stroke_width = other.stroke_width;
        }
        if other.opacity.is_some() {
            self.opacity = other.opacity;
        }
    }

    /// Inline CSS declarations for the attributes that are set
    pub fn css(&self) -> String {
        let mut css = String::new();
        if let Some(fill) = &self.fill {
            let _ = write!(css, "fill:{fill};");
        }
        if let Some(stroke) = &self.stroke {
            let _ = write!(css, "stroke:{stroke};");
        }
        if let Some(width) = self.stroke_width {
            let _ = write!(css, "stroke-width:{width};");
        }
        if let Some(opacity) = self.opacity {
            let _ = write!(css, "opacity:{opacity};");
        }
        css
    }
}

/// A drawable shape
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Shape {
    pub role: ShapeRole,
    pub geometry: Geometry,
    /// Canvas position of the geometry's origin
    pub translate: DVec2,
    pub style: Style,
}

impl Shape {
    /// Hit-test a canvas point against the shape outline
    pub fn contains_point(&self, point: DVec2, hit_radius: f64) -> bool {
        let local = point - self.translate;
        match &self.geometry {
            Geometry::Arc(arc) => arc.contains_point(local),
            Geometry::Symbol { .. } => local.length() <= hit_radius,
        }
    }
}

/// Timed change of opacity and/or position
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Animation {
    pub delay_ms: f64,
    pub duration_ms: f64,
    pub opacity: Option<f64>,
    pub translate: Option<DVec2>,
}

impl Animation {
    pub fn fade(delay_ms: f64, duration_ms: f64, opacity: f64) -> Self {
        Self {
            delay_ms,
            duration_ms,
            opacity: Some(opacity),
            translate: None,
        }
    }

    pub fn move_to(delay_ms: f64, duration_ms: f64, translate: DVec2) -> Self {
        Self {
            delay_ms,
            duration_ms,
            opacity: None,
            translate: Some(translate),
        }
    }

    /// Time from start until the animation settles
    pub fn end_ms(&self) -> f64 {
        self.delay_ms + self.duration_ms
    }
}

/// A rendering target for radar draw commands
pub trait Surface {
    /// Create the drawing area; called once on first draw
    fn mount(&mut self, width: f64, height: f64);
    fn append(&mut self, id: ShapeId, shape: &Shape);
    fn set_style(&mut self, id: ShapeId, style: &Style);
    fn animate(&mut self, id: ShapeId, animation: &Animation);
    fn remove(&mut self, id: ShapeId);
}

/// A command received by a `RecordingSurface`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum SurfaceCommand {
    Mount { width: f64, height: f64 },
    Append { id: ShapeId, shape: Shape },
    SetStyle { id: ShapeId, style: Style },
    Animate { id: ShapeId, animation: Animation },
    Remove { id: ShapeId },
}

/// Headless surface: keeps live shapes with animations applied as if
/// finished, plus the full command log
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    pub size: Option<(f64, f64)>,
    shapes: BTreeMap<ShapeId, Shape>,
    commands: Vec<SurfaceCommand>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shapes(&self) -> impl Iterator<Item = (&ShapeId, &Shape)> {
        self.shapes.iter()
    }

    pub fn shape(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.get(&id)
    }

    /// Live shapes playing the given kind of role
    pub fn count_where(&self, pred: impl Fn(&ShapeRole) -> bool) -> usize {
        self.shapes.values().filter(|s| pred(&s.role)).count()
    }

    pub fn commands(&self) -> &[SurfaceCommand] {
        &self.commands
    }

    pub fn clear_commands(&mut self) {
        self.commands.clear();
    }
}

impl Surface for RecordingSurface {
    fn mount(&mut self, width: f64, height: f64) {
        self.size = Some((width, height));
        self.commands.push(SurfaceCommand::Mount { width, height });
    }

    fn append(&mut self, id: ShapeId, shape: &Shape) {
        self.shapes.insert(id, shape.clone());
        self.commands.push(SurfaceCommand::Append {
            id,
            shape: shape.clone(),
        });
    }

    fn set_style(&mut self, id: ShapeId, style: &Style) {
        if let Some(shape) = self.shapes.get_mut(&id) {
            shape.style.merge(style);
        }
        self.commands.push(SurfaceCommand::SetStyle {
            id,
            style: style.clone(),
        });
    }

    fn animate(&mut self, id: ShapeId, animation: &Animation) {
        if let Some(shape) = self.shapes.get_mut(&id) {
            if let Some(opacity) = animation.opacity {
                shape.style.opacity = Some(opacity);
            }
            if let Some(translate) = animation.translate {
                shape.translate = translate;
            }
        }
        self.commands.push(SurfaceCommand::Animate {
            id,
            animation: *animation,
        });
    }

    fn remove(&mut self, id: ShapeId) {
        self.shapes.remove(&id);
        self.commands.push(SurfaceCommand::Remove { id });
    }
}
