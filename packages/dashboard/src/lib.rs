#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Client-side state for the edustats dashboard.
//!
//! - [`filter`]: the single filter selection shared by the dropdowns and
//!   the map, with the province/sub-region cascade enforced on mutation.
//! - [`compare`]: named region groups for the multi-group comparison.
//! - [`views`]: pure shaping of API results into render-ready data
//!   (choropleth color stops, merged comparison series, school ranking).
//!
//! Nothing here performs I/O. State is single-owner and mutated through
//! `&mut self`.

pub mod compare;
pub mod filter;
pub mod views;
