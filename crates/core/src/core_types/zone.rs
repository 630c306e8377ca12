//! Zones (ecoregions) supplied by the host simulator
//!
//! The library never creates or mutates zones. It only validates file
//! headers against the registry and maps file columns to zone indices.

use crate::error::{ClimateError, ClimateResult};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// A simulation area over which climate is spatially uniform
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Zone {
    /// Stable index, also the slot in [`crate::ClimateSeries`]
    pub index: usize,
    /// Unique name, matched case-insensitively against file headers
    pub name: String,
    /// Inactive zones are not allowed in climate files
    pub active: bool,
}

impl Zone {
    pub fn new(index: usize, name: impl Into<String>, active: bool) -> Self {
        Self {
            index,
            name: name.into(),
            active,
        }
    }
}

/// Lookup table of the host's zones
#[derive(Debug, Clone)]
pub struct ZoneRegistry {
    zones: Vec<Zone>,
    by_name: FxHashMap<String, usize>,
    slots: usize,
}

impl ZoneRegistry {
    /// Build a registry from the host's zone list
    ///
    /// # Errors
    ///
    /// Returns [`ClimateError::Config`] when two zones share an index or a
    /// case-insensitive name.
    pub fn new(zones: Vec<Zone>) -> ClimateResult<Self> {
        let mut by_name = FxHashMap::default();
        let mut seen_indices = FxHashMap::default();
        for (position, zone) in zones.iter().enumerate() {
            if by_name.insert(zone.name.to_lowercase(), position).is_some() {
                return Err(ClimateError::Config {
                    field: "zones",
                    reason: format!("duplicate zone name '{}'", zone.name),
                });
            }
            if seen_indices.insert(zone.index, position).is_some() {
                return Err(ClimateError::Config {
                    field: "zones",
                    reason: format!("duplicate zone index {}", zone.index),
                });
            }
        }
        let slots = zones.iter().map(|z| z.index + 1).max().unwrap_or(0);
        Ok(Self {
            zones,
            by_name,
            slots,
        })
    }

    /// Registry of active zones indexed 0.. in the given order
    ///
    /// # Errors
    ///
    /// Returns [`ClimateError::Config`] on duplicate names.
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> ClimateResult<Self> {
        Self::new(
            names
                .iter()
                .enumerate()
                .map(|(i, name)| Zone::new(i, name.as_ref(), true))
                .collect(),
        )
    }

    /// Case-insensitive lookup by name
    pub fn by_name(&self, name: &str) -> Option<&Zone> {
        self.by_name
            .get(&name.to_lowercase())
            .map(|&position| &self.zones[position])
    }

    /// Number of active zones
    pub fn active_count(&self) -> usize {
        self.zones.iter().filter(|z| z.active).count()
    }

    /// Indices of active zones in ascending order
    pub fn active_indices(&self) -> Vec<usize> {
        let mut indices: Vec<usize> = self
            .zones
            .iter()
            .filter(|z| z.active)
            .map(|z| z.index)
            .collect();
        indices.sort_unstable();
        indices
    }

    /// Number of zone slots (largest index + 1)
    pub fn slot_count(&self) -> usize {
        self.slots
    }

    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }
}
