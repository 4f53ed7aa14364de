//! Radar façade and the overview/zoom state machine
//!
//! A `Radar` owns its configuration, dataset, view state, listeners and the
//! surface it draws on. Time only moves when the host calls `advance`, which
//! fires deferred transition steps and flushes debounced pointer input.
//!
//! ```text
//!            click section q                      zoom settles
//! Overview ──────────────────▶ (zooming q) ───────────────────▶ ZoomedSection(q)
//!    ▲                                                                │
//!    │ redraw after settle                      return_to_overview()  │
//!    └────────────────────────── (returning) ◀────────────────────────┘
//! ```

use glam::DVec2;
use std::collections::BTreeMap;

use crate::config::{RadarConfig, RadarOptions};
use crate::consts::*;
use crate::data::{DataLoader, Entry, RadarDataset, Section};
use crate::error::{RadarError, Result};
use crate::events::{EventBus, RadarEvent};
use crate::interaction::{
    Debouncer, HoverTracker, PointerEvent, PointerKind, Selection, hit_test, section_default,
    section_highlight,
};
use crate::layout::{ArcSegment, SectionId, layers_to_annuli, place_entries, zoom_center};
use crate::surface::{
    Animation, EntryKey, Geometry, Shape, ShapeId, ShapeRole, Style, Surface, SymbolKind,
};
use crate::timeline::Timeline;

/// Which view is on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewState {
    /// All four sections
    Overview,
    /// One section's layers and entries fill the canvas
    ZoomedSection(SectionId),
}

/// Render lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lifecycle {
    /// `render` not called yet, or the last load failed
    Idle,
    /// Waiting for the data document
    Loading,
    /// First draw done
    Ready,
}

/// Transition in flight
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Transition {
    Zooming(SectionId),
    Returning,
}

/// Deferred transition steps
#[derive(Debug, Clone, PartialEq)]
enum Deferred {
    /// Detach shapes whose exit animation finished
    Detach(Vec<ShapeId>),
    /// The clicked section reached its zoom center
    ZoomSettled { section: SectionId, shape: ShapeId },
    /// The overview is redrawn after everything faded out
    RedrawOverview,
}

/// Interactive technology radar
pub struct Radar<S: Surface> {
    data_url: String,
    config: RadarConfig,
    surface: S,
    lifecycle: Lifecycle,
    dataset: Option<RadarDataset>,
    view: ViewState,
    transition: Option<Transition>,
    bus: EventBus,
    shapes: BTreeMap<ShapeId, Shape>,
    next_shape: u32,
    timeline: Timeline<Deferred>,
    debouncer: Debouncer,
    hover: HoverTracker,
    selection: Selection,
    now: f64,
}

impl<S: Surface> Radar<S> {
    /// Create a radar that loads its data from `data_url` on `render`
    pub fn new(data_url: impl Into<String>, config: RadarConfig, surface: S) -> Self {
        let debouncer = Debouncer::new(config.debounce_ms);
        Self {
            data_url: data_url.into(),
            config,
            surface,
            lifecycle: Lifecycle::Idle,
            dataset: None,
            view: ViewState::Overview,
            transition: None,
            bus: EventBus::new(),
            shapes: BTreeMap::new(),
            next_shape: 1,
            timeline: Default::default(),
            debouncer,
            hover: HoverTracker::default(),
            selection: Selection::default(),
            now: 0.0,
        }
    }

    /// Validate raw options, then create the radar
    pub fn with_options(
        data_url: impl Into<String>,
        options: RadarOptions,
        surface: S,
    ) -> Result<Self> {
        Ok(Self::new(data_url, RadarConfig::try_from(options)?, surface))
    }

    // === Façade ===

    /// Load the data document and draw the overview.
    ///
    /// Load failures are returned as-is and leave the radar un-rendered, so
    /// the call may be repeated. There is no automatic retry.
    pub fn render(&mut self, loader: &mut (impl DataLoader + ?Sized)) -> Result<&mut Self> {
        let url = self.begin_render()?.to_string();
        let document = loader.load(&url);
        self.complete_render(document)
    }

    /// First half of `render` for hosts that load asynchronously: returns the
    /// URL to fetch. Finish with `complete_render`.
    pub fn begin_render(&mut self) -> Result<&str> {
        match self.lifecycle {
            Lifecycle::Idle => {
                self.lifecycle = Lifecycle::Loading;
                log::info!("Loading radar data from {}", self.data_url);
                Ok(&self.data_url)
            }
            Lifecycle::Loading => Err(RadarError::InvalidState("render() is already loading")),
            Lifecycle::Ready => Err(RadarError::InvalidState("render() may only be called once")),
        }
    }

    /// Second half of `render`: hand over the fetched document (or the
    /// fetch error) and draw the overview.
    pub fn complete_render(&mut self, document: Result<String>) -> Result<&mut Self> {
        if self.lifecycle != Lifecycle::Loading {
            return Err(RadarError::InvalidState("complete_render() without begin_render()"));
        }

        let dataset = match document.and_then(|json| RadarDataset::from_json(&json)) {
            Ok(dataset) => dataset,
            Err(e) => {
                log::error!("Radar data unavailable: {e}");
                self.lifecycle = Lifecycle::Idle;
                return Err(e);
            }
        };

        log::info!(
            "Loaded radar with {} entries across {} sections",
            dataset.entry_count(),
            dataset.sections.len()
        );
        self.dataset = Some(dataset);
        self.surface.mount(self.config.control_size, self.config.control_size);
        self.draw_overview();
        self.lifecycle = Lifecycle::Ready;
        Ok(self)
    }

    /// Subscribe to a named channel; unknown names are ignored
    pub fn on(&mut self, event_name: &str, handler: impl FnMut(&RadarEvent) + 'static) -> &mut Self {
        self.bus.on(event_name, handler);
        self
    }

    /// Close any open entry, fade everything out and redraw the overview.
    ///
    /// Ignored while another transition is still running.
    pub fn return_to_overview(&mut self) -> Result<&mut Self> {
        self.ensure_ready()?;
        if let Some(transition) = self.transition {
            log::debug!("return_to_overview ignored during {transition:?}");
            return Ok(self);
        }

        self.selection.take();
        self.bus.emit(&RadarEvent::EntryClose);
        self.reset_pointer();

        let fade = Animation::fade(TRANSITION_DELAY_MS, FADE_DURATION_MS, 0.0);
        let all: Vec<ShapeId> = self.shapes.keys().copied().collect();
        for &id in &all {
            self.animate(id, fade);
        }
        self.timeline.schedule(self.now + fade.end_ms(), Deferred::Detach(all));
        self.timeline
            .schedule(self.now + fade.end_ms() + SETTLE_DELAY_MS, Deferred::RedrawOverview);
        self.transition = Some(Transition::Returning);
        log::info!("Returning to overview");
        Ok(self)
    }

    /// Advance the radar clock to `now_ms`, firing due transition steps and
    /// dispatching debounced pointer input.
    pub fn advance(&mut self, now_ms: f64) {
        self.now = self.now.max(now_ms);
        while let Some(action) = self.timeline.pop_due(self.now) {
            self.run_deferred(action);
        }
        for event in self.debouncer.flush(self.now) {
            self.dispatch(event);
        }
    }

    // === Pointer input ===

    /// Pointer moved to a canvas position
    pub fn pointer_move(&mut self, x: f64, y: f64) -> Result<()> {
        self.ensure_ready()?;
        let hit = hit_test(&self.shapes, DVec2::new(x, y), ENTRY_HIT_RADIUS);
        for event in self.hover.update(hit) {
            self.debouncer.push(event, self.now);
        }
        Ok(())
    }

    /// Pointer left the canvas
    pub fn pointer_leave(&mut self) -> Result<()> {
        self.ensure_ready()?;
        for event in self.hover.update(None) {
            self.debouncer.push(event, self.now);
        }
        Ok(())
    }

    /// Click at a canvas position
    pub fn pointer_click(&mut self, x: f64, y: f64) -> Result<()> {
        self.pointer_move(x, y)?;
        if let Some(shape) = self.hover.current() {
            self.debouncer.push(PointerEvent::new(shape, PointerKind::Click), self.now);
        }
        Ok(())
    }

    /// Pointer input already resolved to a shape by the host
    pub fn pointer_event(&mut self, event: PointerEvent) -> Result<()> {
        self.ensure_ready()?;
        self.debouncer.push(event, self.now);
        Ok(())
    }

    // === Accessors ===

    pub fn view(&self) -> ViewState {
        self.view
    }

    pub fn is_transitioning(&self) -> bool {
        self.transition.is_some()
    }

    pub fn is_rendered(&self) -> bool {
        self.lifecycle == Lifecycle::Ready
    }

    pub fn config(&self) -> &RadarConfig {
        &self.config
    }

    pub fn dataset(&self) -> Option<&RadarDataset> {
        self.dataset.as_ref()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Shapes currently drawn
    pub fn shapes(&self) -> impl Iterator<Item = (ShapeId, &Shape)> {
        self.shapes.iter().map(|(id, shape)| (*id, shape))
    }

    /// The drawn shape of a section in the overview
    pub fn section_shape(&self, section: SectionId) -> Option<ShapeId> {
        self.shapes()
            .find(|(_, s)| s.role == ShapeRole::Section(section))
            .map(|(id, _)| id)
    }

    /// The open entry, if any
    pub fn open_entry(&self) -> Option<&Entry> {
        let id = self.selection.current()?;
        match self.shapes.get(&id)?.role {
            ShapeRole::Entry(key) => self.entry(key),
            _ => None,
        }
    }

    pub fn now(&self) -> f64 {
        self.now
    }

    // === State machine ===

    fn ensure_ready(&self) -> Result<()> {
        if self.lifecycle == Lifecycle::Ready {
            Ok(())
        } else {
            Err(RadarError::InvalidState(
                "render() needs to complete before manipulating the radar",
            ))
        }
    }

    fn run_deferred(&mut self, action: Deferred) {
        match action {
            Deferred::Detach(ids) => {
                for id in ids {
                    self.detach(id);
                }
            }
            Deferred::ZoomSettled { section, shape } => {
                self.detach(shape);
                self.draw_zoomed_section(section);
                self.view = ViewState::ZoomedSection(section);
                self.transition = None;

                let Some(name) = self.section(section).map(|s| s.name.clone()) else {
                    return;
                };
                let color = self.config.fill_color(section).to_string();
                log::info!("Zoomed into section {section} ({name})");
                self.bus.emit(&RadarEvent::SectionOpen { name, color });
            }
            Deferred::RedrawOverview => {
                self.draw_overview();
                self.view = ViewState::Overview;
                self.transition = None;
                self.bus.emit(&RadarEvent::SectionClose);
            }
        }
    }

    fn start_zoom(&mut self, section: SectionId, clicked: ShapeId) {
        self.transition = Some(Transition::Zooming(section));
        self.reset_pointer();

        let others: Vec<ShapeId> = self.shapes.keys().copied().filter(|&id| id != clicked).collect();
        let fade = Animation::fade(TRANSITION_DELAY_MS, FADE_DURATION_MS, 0.0);
        for &id in &others {
            self.animate(id, fade);
        }
        self.timeline.schedule(self.now + fade.end_ms(), Deferred::Detach(others));

        let center = zoom_center(section, self.config.control_size);
        let zoom = Animation::move_to(TRANSITION_DELAY_MS, ZOOM_DURATION_MS, center);
        self.animate(clicked, zoom);
        self.timeline.schedule(
            self.now + zoom.end_ms(),
            Deferred::ZoomSettled {
                section,
                shape: clicked,
            },
        );
        log::info!("Zooming into section {section}");
    }

    // === Pointer dispatch ===

    fn dispatch(&mut self, event: PointerEvent) {
        let Some(role) = self.shapes.get(&event.shape).map(|s| s.role) else {
            log::debug!("Dropping {event:?} for a detached shape");
            return;
        };
        if self.transition.is_some() {
            log::debug!("Dropping {event:?} during transition");
            return;
        }

        match (role, self.view) {
            (ShapeRole::Section(section), ViewState::Overview) => {
                self.on_section_pointer(section, event)
            }
            (ShapeRole::Entry(key), ViewState::ZoomedSection(open)) if key.section == open => {
                self.on_entry_pointer(key, event)
            }
            _ => log::debug!("{event:?} not interactive in {:?}", self.view),
        }
    }

    fn on_section_pointer(&mut self, section: SectionId, event: PointerEvent) {
        match event.kind {
            PointerKind::Enter => {
                let style = section_highlight(&self.config);
                self.restyle(event.shape, style);
                let color = self.config.fill_color(section).to_string();
                if let Some(data) = self.section(section) {
                    let payload = RadarEvent::SectionDisplay {
                        name: data.name.clone(),
                        description: data.description.clone(),
                        color,
                    };
                    self.bus.emit(&payload);
                }
            }
            PointerKind::Leave => {
                let style = section_default(&self.config);
                self.restyle(event.shape, style);
                self.bus.emit(&RadarEvent::SectionClear);
            }
            PointerKind::Click => self.start_zoom(section, event.shape),
        }
    }

    fn on_entry_pointer(&mut self, key: EntryKey, event: PointerEvent) {
        let id = event.shape;
        match event.kind {
            PointerKind::Enter if !self.selection.is_open(id) => {
                let fill = self.config.point_highlight_color.clone();
                self.restyle(id, Style::fill(&fill));
                if let Some(payload) = self.entry_event(key, false) {
                    self.bus.emit(&payload);
                }
            }
            PointerKind::Leave if !self.selection.is_open(id) => {
                let fill = self.config.point_color.clone();
                self.restyle(id, Style::fill(&fill));
                self.bus.emit(&RadarEvent::EntryClear);
            }
            PointerKind::Enter | PointerKind::Leave => {}
            PointerKind::Click if self.selection.is_open(id) => {
                self.selection.take();
                let fill = self.config.point_highlight_color.clone();
                self.restyle(id, Style::fill(&fill));
                self.bus.emit(&RadarEvent::EntryClose);
            }
            PointerKind::Click => {
                if let Some(previous) = self.selection.take() {
                    let fill = self.config.point_color.clone();
                    self.restyle(previous, Style::fill(&fill));
                    self.bus.emit(&RadarEvent::EntryClose);
                }
                self.selection.open(id);
                let fill = self.config.point_active_color.clone();
                self.restyle(id, Style::fill(&fill));
                if let Some(payload) = self.entry_event(key, true) {
                    self.bus.emit(&payload);
                }
            }
        }
    }

    fn reset_pointer(&mut self) {
        self.hover.reset();
        self.debouncer.clear();
    }

    // === Drawing ===

    fn draw_overview(&mut self) {
        let size = self.config.control_size;
        let center = DVec2::splat(size / 2.0);
        let radius = self.config.section_radius();

        let mut drawn = Vec::with_capacity(SECTION_COUNT);
        for section in SectionId::ALL {
            let shape = Shape {
                role: ShapeRole::Section(section),
                geometry: Geometry::Arc(ArcSegment::quadrant(section, 0.0, radius)),
                translate: center,
                style: Style {
                    fill: Some(self.config.fill_color(section).to_string()),
                    stroke: Some(self.config.outline_color.clone()),
                    stroke_width: None,
                    opacity: Some(0.0),
                },
            };
            drawn.push(self.append(shape));
        }

        let fade_in = Animation::fade(TRANSITION_DELAY_MS, FADE_DURATION_MS, SECTION_OPACITY);
        for id in drawn {
            self.animate(id, fade_in);
        }
    }

    fn draw_zoomed_section(&mut self, section: SectionId) {
        let size = self.config.control_size;
        let center = zoom_center(section, size);
        let fill = self.config.fill_color(section).to_string();
        let Some(layers) = self.section(section).map(|s| s.layers.clone()) else {
            log::warn!("No data for section {section}");
            return;
        };
        let annuli = layers_to_annuli(size, layers.len(), self.config.layer_shares);

        for (layer_index, (layer, annulus)) in layers.iter().zip(annuli).enumerate() {
            self.append(Shape {
                role: ShapeRole::Layer {
                    section,
                    layer: layer_index,
                },
                geometry: Geometry::Arc(ArcSegment::quadrant(
                    section,
                    annulus.inner_radius,
                    annulus.outer_radius,
                )),
                translate: center,
                style: Style {
                    fill: Some(fill.clone()),
                    stroke: Some(self.config.outline_color.clone()),
                    stroke_width: None,
                    opacity: Some(LAYER_OPACITY),
                },
            });

            for placement in place_entries(section, annulus, &layer.entries, size) {
                let kind = if placement.emphasized {
                    SymbolKind::TriangleUp
                } else {
                    SymbolKind::Circle
                };
                self.append(Shape {
                    role: ShapeRole::Entry(EntryKey {
                        section,
                        layer: layer_index,
                        index: placement.index,
                    }),
                    geometry: Geometry::Symbol {
                        kind,
                        area: SYMBOL_AREA,
                    },
                    translate: placement.position,
                    style: Style::fill(&self.config.point_color),
                });
            }
        }
    }

    fn append(&mut self, shape: Shape) -> ShapeId {
        let id = ShapeId(self.next_shape);
        self.next_shape += 1;
        self.surface.append(id, &shape);
        self.shapes.insert(id, shape);
        id
    }

    fn restyle(&mut self, id: ShapeId, style: Style) {
        if let Some(shape) = self.shapes.get_mut(&id) {
            shape.style.merge(&style);
            self.surface.set_style(id, &style);
        }
    }

    /// Start an animation; the shape record takes the end state right away
    fn animate(&mut self, id: ShapeId, animation: Animation) {
        if let Some(shape) = self.shapes.get_mut(&id) {
            if let Some(opacity) = animation.opacity {
                shape.style.opacity = Some(opacity);
            }
            if let Some(translate) = animation.translate {
                shape.translate = translate;
            }
            self.surface.animate(id, &animation);
        }
    }

    fn detach(&mut self, id: ShapeId) {
        if self.shapes.remove(&id).is_some() {
            self.surface.remove(id);
        }
    }

    // === Data lookups ===

    fn section(&self, id: SectionId) -> Option<&Section> {
        self.dataset.as_ref().map(|dataset| dataset.section(id))
    }

    fn entry(&self, key: EntryKey) -> Option<&Entry> {
        self.section(key.section)?
            .layers
            .get(key.layer)?
            .entries
            .get(key.index)
    }

    fn entry_event(&self, key: EntryKey, open: bool) -> Option<RadarEvent> {
        let entry = self.entry(key)?;
        let (name, description, analysis) = (
            entry.name.clone(),
            entry.description.clone(),
            entry.analysis.clone(),
        );
        Some(if open {
            RadarEvent::EntryOpen {
                name,
                description,
                analysis,
            }
        } else {
            RadarEvent::EntryDisplay {
                name,
                description,
                analysis,
            }
        })
    }
}

impl<S: Surface> std::fmt::Debug for Radar<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Radar")
            .field("data_url", &self.data_url)
            .field("lifecycle", &self.lifecycle)
            .field("view", &self.view)
            .field("transition", &self.transition)
            .field("shapes", &self.shapes.len())
            .field("listeners", &self.bus)
            .field("now", &self.now)
            .finish()
    }
}
