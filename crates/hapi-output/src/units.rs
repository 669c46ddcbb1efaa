//! Unit-string resolution for the frame adapter.

use std::collections::BTreeMap;

/// Unit attached to columns whose units are blank or unresolved.
pub const DIMENSIONLESS: &str = "dimensionless";

/// Maps a dataset `UNITS` string to the canonical unit of a frame column.
pub trait UnitResolver {
    /// `None` when the string is not understood.
    fn resolve(&self, units: &str) -> Option<String>;
}

/// Accepts any unit string unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughUnits;

impl UnitResolver for PassthroughUnits {
    fn resolve(&self, units: &str) -> Option<String> {
        Some(units.trim().to_string())
    }
}

/// Lookup table of unit spellings seen in HAPI catalogs. Keys match exactly
/// after trimming; case is significant (`MeV` vs `meV`).
#[derive(Debug, Clone)]
pub struct UnitTable {
    entries: BTreeMap<String, String>,
}

impl UnitTable {
    pub fn empty() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Register `alias` as a spelling of `canonical`.
    #[must_use]
    pub fn with_alias(mut self, alias: &str, canonical: &str) -> Self {
        self.entries
            .insert(alias.trim().to_string(), canonical.to_string());
        self
    }
}

impl Default for UnitTable {
    fn default() -> Self {
        [
            ("nT", "nT"),
            ("nanoTesla", "nT"),
            ("km/s", "km/s"),
            ("km/sec", "km/s"),
            ("cm^-3", "cm^-3"),
            ("#/cm^3", "cm^-3"),
            ("1/cm^3", "cm^-3"),
            ("/cc", "cm^-3"),
            ("eV", "eV"),
            ("keV", "keV"),
            ("MeV", "MeV"),
            ("K", "K"),
            ("deg", "deg"),
            ("degrees", "deg"),
            ("Hz", "Hz"),
            ("s", "s"),
            ("sec", "s"),
            ("m", "m"),
            ("km", "km"),
            ("Re", "R_E"),
            ("R_E", "R_E"),
            ("nPa", "nPa"),
            ("mV/m", "mV/m"),
            ("counts", "counts"),
            ("counts/s", "counts/s"),
            ("UTC", "UTC"),
        ]
        .into_iter()
        .fold(Self::empty(), |table, (alias, canonical)| {
            table.with_alias(alias, canonical)
        })
    }
}

impl UnitResolver for UnitTable {
    fn resolve(&self, units: &str) -> Option<String> {
        self.entries.get(units.trim()).cloned()
    }
}
