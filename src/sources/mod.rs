//! Observation source registry and factory
//!
//! This module provides:
//! - The `ObservationSource` trait and its query type
//! - Central registration of all supported sources
//!
//! The collector interacts exclusively through the trait.

pub mod adapter;
pub mod inaturalist;

use std::sync::Arc;
use adapter::ObservationSource;

use crate::config::ApiConfig;

/// Returns an observation source by name.
///
/// RETURNS:
/// - `Ok(Some(..))` if the source is supported
/// - `Ok(None)` if the name is unknown
/// - `Err` if the source could not be constructed (HTTP client setup)
///
pub fn get_source(api: &ApiConfig) -> anyhow::Result<Option<Arc<dyn ObservationSource>>> {
    match api.source.as_str() {
        "inaturalist" => Ok(Some(Arc::new(inaturalist::InaturalistSource::new(api)?))),
        _ => Ok(None),
    }
}
