/// Collector module
///
/// This module groups all logic responsible for:
/// - Iterating classes and their taxon identifiers
/// - Paging through the observation source
/// - Enforcing the per-class cap and URL dedup
///
/// The collector layer acts as the orchestration layer between:
/// - Observation sources (iNaturalist, ...)
/// - The CSV output
///
/// Source-specific logic MUST NOT live here.
pub mod runner;
