use serde::Deserialize;
use std::time::Duration;

// ------------------------------------------------------------
// Root configuration
// ------------------------------------------------------------
//
// The collector has no config file, flags or env overrides.
// Everything lives in `CollectorConfig::builtin()`, so changing
// a class, a region or the cap is a source edit.
//
// It defines:
// - Target classes and their taxon identifiers
// - Local / national search regions
// - Observation API settings
// - Request pacing
// - Output location
//
#[derive(Debug, Deserialize, Clone)]
pub struct CollectorConfig {
    /// Maximum number of distinct image URLs per class
    pub target_per_class: usize,

    /// Local and national search regions
    pub regions: RegionConfig,

    /// Class ids searched in the national region instead of the local one
    pub national_classes: Vec<u32>,

    /// Target classes, processed in this order
    pub classes: Vec<ClassSpec>,

    /// Optional per-class categorical filters (life stage, ...)
    pub facets: Vec<FacetFilter>,

    /// Observation API settings
    pub api: ApiConfig,

    /// Delay inserted after every fetched page
    pub pacing: PacingConfig,

    /// Image size variants
    pub photo_size: PhotoSizeConfig,

    /// Destination of the CSV table
    pub output_path: String,
}

// ------------------------------------------------------------
// Class specification
// ------------------------------------------------------------
//
// One target category of the dataset.
//
// A class may span several taxa (e.g. two spider families),
// all of which share the class-level cap.
//
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ClassSpec {
    /// Stable class label written to every row
    pub id: u32,

    /// Human readable class name
    pub name: String,

    /// External taxonomy identifiers, queried in this order
    pub taxon_ids: Vec<u64>,
}

// ------------------------------------------------------------
// Geographic scope
// ------------------------------------------------------------
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum GeoScope {
    Local,
    National,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RegionConfig {
    pub local: Region,
    pub national: Region,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Region {
    /// Place identifier understood by the observation API
    pub place_id: u64,

    /// Label written to the `source_loc` column
    pub label: String,
}

// ------------------------------------------------------------
// Facet filter
// ------------------------------------------------------------
//
// Term / term-value pair narrowing results to an annotation,
// e.g. term 1 (life stage) = value 6 (larva).
//
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct FacetFilter {
    pub class_id: u32,
    pub term_id: u64,
    pub term_value_id: u64,
}

// ------------------------------------------------------------
// Observation API configuration
// ------------------------------------------------------------
#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    /// Source identifier resolved by `sources::get_source`
    pub source: String,

    /// Base URL without trailing slash
    pub base_url: String,

    /// Results per page (the API caps this at 200)
    pub per_page: u32,

    /// Quality predicate applied to every query
    pub quality_grade: String,

    /// Sent with every request
    pub user_agent: String,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

// ------------------------------------------------------------
// Pacing configuration
// ------------------------------------------------------------
//
// Delay after every page = base + uniform jitter in [0, jitter).
//
#[derive(Debug, Deserialize, Clone)]
pub struct PacingConfig {
    pub base_delay_ms: u64,
    pub jitter_ms: u64,
}

impl PacingConfig {
    pub fn base(&self) -> Duration {
        Duration::from_millis(self.base_delay_ms)
    }

    pub fn jitter(&self) -> Duration {
        Duration::from_millis(self.jitter_ms)
    }
}

// ------------------------------------------------------------
// Photo size tokens
// ------------------------------------------------------------
//
// The API returns thumbnail URLs ("square", 75x75). The token is
// swapped for a larger variant ("medium", ~500px) by plain string
// replacement.
//
#[derive(Debug, Deserialize, Clone)]
pub struct PhotoSizeConfig {
    pub default_token: String,
    pub target_token: String,
}

impl CollectorConfig {
    /// The hard-coded collection run.
    pub fn builtin() -> Self {
        let class = |id: u32, name: &str, taxon_ids: &[u64]| ClassSpec {
            id,
            name: name.to_string(),
            taxon_ids: taxon_ids.to_vec(),
        };

        Self {
            target_per_class: 2000,
            regions: RegionConfig {
                local: Region { place_id: 30, label: "NC".to_string() },
                national: Region { place_id: 1, label: "USA".to_string() },
            },
            // Blister Beetles, Scorpions, Horse Flies
            national_classes: vec![8, 9, 10],
            classes: vec![
                // Latrodectus, Sicariidae
                class(0, "Venomous Spiders", &[47370, 48140]),
                // Ixodidae
                class(1, "Ticks", &[51673]),
                // Culicidae
                class(2, "Mosquitoes", &[52134]),
                // Vespidae
                class(3, "Stinging Wasps", &[52747]),
                // Apidae
                class(4, "Bees", &[47221]),
                // Solenopsis
                class(5, "Fire Ants", &[67597]),
                // Reduviidae
                class(6, "Assassin Bugs", &[48959]),
                // Megalopygidae, Limacodidae
                class(7, "Venomous Cats.", &[84186, 84165]),
                // Meloidae
                class(8, "Blister Beetles", &[59510]),
                // Vaejovidae
                class(9, "Scorpions", &[52572]),
                // Tabanidae
                class(10, "Horse/Deer Flies", &[47821]),
                // Chilopoda
                class(11, "Centipedes", &[49556]),
            ],
            // Caterpillars: larva life stage only
            facets: vec![FacetFilter { class_id: 7, term_id: 1, term_value_id: 6 }],
            api: ApiConfig {
                source: "inaturalist".to_string(),
                base_url: "https://api.inaturalist.org/v1".to_string(),
                per_page: 200,
                quality_grade: "research".to_string(),
                user_agent: concat!("inat-image-collector/", env!("CARGO_PKG_VERSION")).to_string(),
                timeout_secs: 60,
            },
            pacing: PacingConfig { base_delay_ms: 2300, jitter_ms: 1000 },
            photo_size: PhotoSizeConfig {
                default_token: "square".to_string(),
                target_token: "medium".to_string(),
            },
            output_path: "../nc_arthropod_dataset_urls.csv".to_string(),
        }
    }

    /// Resolves the search scope of a class.
    pub fn scope_for(&self, class_id: u32) -> GeoScope {
        if self.national_classes.contains(&class_id) {
            GeoScope::National
        } else {
            GeoScope::Local
        }
    }

    /// Resolves the region (place id + label) a class is searched in.
    pub fn region_for(&self, class_id: u32) -> &Region {
        match self.scope_for(class_id) {
            GeoScope::Local => &self.regions.local,
            GeoScope::National => &self.regions.national,
        }
    }

    pub fn facet_for(&self, class_id: u32) -> Option<FacetFilter> {
        self.facets.iter().copied().find(|f| f.class_id == class_id)
    }
}
