#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Province (si-do) naming and centroid lookup tables.
//!
//! Statistics rows store provinces under their short names (`서울`,
//! `경기`, ...) while map boundary data uses the official display names
//! (`서울특별시`, `경기도`, ...). [`sido::SidoTable`] is the single,
//! validated translation between the two.

pub mod sido;

use serde::{Deserialize, Serialize};

/// A WGS84 point serialized as `[lng, lat]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct LngLat {
    /// Longitude.
    pub lng: f64,
    /// Latitude.
    pub lat: f64,
}

impl LngLat {
    /// Creates a new point.
    #[must_use]
    pub const fn new(lng: f64, lat: f64) -> Self {
        Self { lng, lat }
    }
}

impl From<[f64; 2]> for LngLat {
    fn from([lng, lat]: [f64; 2]) -> Self {
        Self { lng, lat }
    }
}

impl From<LngLat> for [f64; 2] {
    fn from(p: LngLat) -> Self {
        [p.lng, p.lat]
    }
}

/// One province entry in the lookup table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SidoInfo {
    /// Short name as stored in the statistics tables.
    pub stored_name: String,
    /// Official name as used by map boundary data.
    pub display_name: String,
    /// Approximate centroid, used for labels and camera targets.
    pub centroid: LngLat,
}
