//! Radar dataset model and loaders
//!
//! The data document is JSON:
//! `{ "sections": [ { "name", "desc", "layers": [ { "entries": [ { "name", "desc", "analysis", "active"? } ] } ] } ] }`
//! with exactly four sections in quadrant order.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::consts::SECTION_COUNT;
use crate::error::{RadarError, Result};
use crate::layout::SectionId;

/// A single point on the radar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    /// Display name, also the layout hash key
    pub name: String,
    #[serde(rename = "desc", alias = "description", default)]
    pub description: String,
    #[serde(default)]
    pub analysis: String,
    /// Drawn with the emphasized (triangle) symbol
    #[serde(default)]
    pub active: bool,
}

impl Entry {
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            description: String::new(),
            analysis: String::new(),
            active: false,
        }
    }
}

/// A concentric ring within a section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    #[serde(alias = "data", default)]
    pub entries: Vec<Entry>,
}

/// One quadrant of the radar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub name: String,
    #[serde(rename = "desc", alias = "description", default)]
    pub description: String,
    #[serde(default)]
    pub layers: Vec<Layer>,
}

/// The four sections of a radar, in quadrant order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RadarDataset {
    pub sections: Vec<Section>,
}

impl RadarDataset {
    /// Build a dataset, rejecting anything but four sections
    pub fn new(sections: Vec<Section>) -> Result<Self> {
        if sections.len() != SECTION_COUNT {
            return Err(RadarError::InvalidDataset(format!(
                "expected {SECTION_COUNT} sections, found {}",
                sections.len()
            )));
        }
        Ok(Self { sections })
    }

    /// Parse and validate a data document
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: RadarDataset = serde_json::from_str(json)?;
        Self::new(raw.sections)
    }

    pub fn section(&self, id: SectionId) -> &Section {
        &self.sections[id.index()]
    }

    /// Total number of entries across all sections
    pub fn entry_count(&self) -> usize {
        self.sections
            .iter()
            .flat_map(|s| &s.layers)
            .map(|l| l.entries.len())
            .sum()
    }
}

const SAMPLE_SECTIONS: [(&str, &str); SECTION_COUNT] = [
    ("Techniques", "Processes and practices"),
    ("Tools", "Software used while building"),
    ("Platforms", "Where software runs"),
    ("Languages & Frameworks", "What software is written in"),
];

const SAMPLE_WORDS: [&str; 16] = [
    "Async", "Stream", "Graph", "Vector", "Edge", "Cache", "Mesh", "Query", "Event", "Schema",
    "Proxy", "Signal", "Queue", "Shard", "Lens", "Actor",
];

/// Reproducible demo dataset: four sections, `layers` layers each holding
/// 1..=`max_entries` entries. Same seed, same radar.
pub fn sample_dataset(seed: u64, layers: usize, max_entries: usize) -> RadarDataset {
    let mut rng = Pcg32::seed_from_u64(seed);
    let max_entries = max_entries.max(1);

    let sections = SAMPLE_SECTIONS
        .iter()
        .map(|(name, description)| Section {
            name: name.to_string(),
            description: description.to_string(),
            layers: (0..layers)
                .map(|_| Layer {
                    entries: (0..rng.random_range(1..=max_entries))
                        .map(|_| {
                            let word = SAMPLE_WORDS[rng.random_range(0..SAMPLE_WORDS.len())];
                            let name = format!("{word} {}", rng.random_range(100..1000));
                            Entry {
                                description: format!("Sample {} entry", word.to_lowercase()),
                                analysis: format!("Assessed for {}", description.to_lowercase()),
                                active: rng.random_bool(0.1),
                                name,
                            }
                        })
                        .collect(),
                })
                .collect(),
        })
        .collect();

    RadarDataset { sections }
}

/// Source of the radar's data document
pub trait DataLoader {
    /// Fetch the raw JSON document for `url`
    fn load(&mut self, url: &str) -> Result<String>;
}

/// Reads the document from the local filesystem; `url` is a path
#[derive(Debug, Clone, Default)]
pub struct FileLoader {
    /// Directory relative paths are resolved against
    pub base_dir: Option<PathBuf>,
}

impl DataLoader for FileLoader {
    fn load(&mut self, url: &str) -> Result<String> {
        let path = match &self.base_dir {
            Some(dir) => dir.join(url),
            None => PathBuf::from(url),
        };
        log::debug!("Reading radar data from {}", path.display());
        std::fs::read_to_string(&path).map_err(|e| RadarError::Load {
            url: url.to_string(),
            reason: e.to_string(),
        })
    }
}

/// Serves a fixed document regardless of `url`
#[derive(Debug, Clone)]
pub struct StaticLoader {
    document: Result<String, String>,
}

impl StaticLoader {
    pub fn new(document: impl Into<String>) -> Self {
        Self {
            document: Ok(document.into()),
        }
    }

    /// Serialize a dataset into the document this loader serves
    pub fn from_dataset(dataset: &RadarDataset) -> Result<Self> {
        Ok(Self::new(serde_json::to_string(dataset)?))
    }

    /// A loader that always fails with `reason`
    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            document: Err(reason.into()),
        }
    }
}

impl DataLoader for StaticLoader {
    fn load(&mut self, url: &str) -> Result<String> {
        self.document.clone().map_err(|reason| RadarError::Load {
            url: url.to_string(),
            reason,
        })
    }
}
