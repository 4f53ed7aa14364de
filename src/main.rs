//! Tech radar entry point
//!
//! On the web the library is driven through `WebRadar`. Natively this runs a
//! scripted session against a headless surface and logs what a page would
//! see: `tech-radar [data.json] [controlSize]`.

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use std::cell::RefCell;
    use std::rc::Rc;

    use tech_radar::data::{DataLoader, FileLoader, sample_dataset};
    use tech_radar::layout::SectionId;
    use tech_radar::surface::{Geometry, ShapeRole};
    use tech_radar::{Radar, RadarConfig, RadarEvent, RecordingSurface, Result, StaticLoader};

    /// Frame period of the simulated host (milliseconds)
    const FRAME_MS: f64 = 16.0;
    /// Long enough for any transition to finish
    const SETTLE_MS: f64 = 1100.0;

    struct Session {
        radar: Radar<RecordingSurface>,
        events: Rc<RefCell<Vec<RadarEvent>>>,
    }

    impl Session {
        /// Advance frame by frame for `duration` milliseconds
        fn run_for(&mut self, duration: f64) {
            let end = self.radar.now() + duration;
            while self.radar.now() < end {
                let next = (self.radar.now() + FRAME_MS).min(end);
                self.radar.advance(next);
            }
            for event in self.events.borrow_mut().drain(..) {
                log::info!("{} {:?}", event.channel(), event.args());
            }
        }

        fn click_section(&mut self, section: SectionId) -> Result<()> {
            let Some(id) = self.radar.section_shape(section) else {
                log::warn!("Section {section} is not drawn");
                return Ok(());
            };
            let target = self
                .radar
                .shapes()
                .find(|(shape, _)| *shape == id)
                .and_then(|(_, shape)| match shape.geometry {
                    Geometry::Arc(arc) => Some(shape.translate + arc.centroid()),
                    _ => None,
                });
            if let Some(p) = target {
                self.radar.pointer_click(p.x, p.y)?;
            }
            Ok(())
        }

        /// Click every entry of the zoomed section in turn
        fn visit_entries(&mut self) -> Result<()> {
            let positions: Vec<_> = self
                .radar
                .shapes()
                .filter(|(_, s)| matches!(s.role, ShapeRole::Entry(_)))
                .map(|(_, s)| s.translate)
                .collect();
            for p in positions {
                log::info!("Entry at ({:.1}, {:.1})", p.x, p.y);
                self.radar.pointer_click(p.x, p.y)?;
                self.run_for(FRAME_MS);
            }
            Ok(())
        }
    }

    pub fn run() -> Result<()> {
        let mut args = std::env::args().skip(1);
        let data_path = args.next();
        let size = args
            .next()
            .and_then(|s| s.parse::<f64>().ok())
            .unwrap_or(600.0);

        let config = RadarConfig::new(size)?;
        let url = data_path.clone().unwrap_or_else(|| "sample.json".into());
        let mut radar = Radar::new(url, config, RecordingSurface::new());

        let events = Rc::new(RefCell::new(Vec::new()));
        for channel in tech_radar::Channel::ALL {
            let events = events.clone();
            radar.on(channel.as_str(), move |event| events.borrow_mut().push(event.clone()));
        }

        let mut loader: Box<dyn DataLoader> = match data_path {
            Some(_) => Box::new(FileLoader::default()),
            None => Box::new(StaticLoader::from_dataset(&sample_dataset(7, 3, 6))?),
        };
        radar.render(&mut *loader)?;
        log::info!("Rendered {} sections", radar.shapes().count());

        let mut session = Session { radar, events };
        session.run_for(SETTLE_MS);

        for section in SectionId::ALL {
            session.click_section(section)?;
            session.run_for(SETTLE_MS);
            session.visit_entries()?;
            session.radar.return_to_overview()?;
            session.run_for(SETTLE_MS);
        }

        log::info!(
            "Session finished at {:.0}ms with {} surface commands",
            session.radar.now(),
            session.radar.surface().commands().len()
        );
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    tech_radar::platform::init_logging();
    if let Err(e) = demo::run() {
        log::error!("{e}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The page constructs `WebRadar`; nothing to run here
}
