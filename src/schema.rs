use serde::Deserialize;

// ------------------------------------------------------------
// Observation page
// ------------------------------------------------------------
//
// One page of the `/observations` endpoint.
//
// Only the fields the collector reads are modelled; everything
// else in the response is ignored by serde.
//
#[derive(Debug, Deserialize, Clone, Default)]
pub struct ObservationPage {
    /// Total matching observations reported by the API
    #[serde(default)]
    pub total_results: u64,

    /// Observations on this page, in API order
    #[serde(default)]
    pub results: Vec<Observation>,
}

// ------------------------------------------------------------
// Observation
// ------------------------------------------------------------
//
// A single real-world sighting. Consumed read-only.
//
#[derive(Debug, Deserialize, Clone)]
pub struct Observation {
    pub id: u64,

    /// Photo attachments; the first one represents the observation
    #[serde(default)]
    pub photos: Vec<Photo>,
}

impl Observation {
    /// URL of the first photo attachment, if there is one.
    pub fn first_photo_url(&self) -> Option<&str> {
        self.photos.first()?.url.as_deref()
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct Photo {
    /// Image URL; the size variant is embedded as a path token
    /// (e.g. `.../photos/123/square.jpg`)
    pub url: Option<String>,
}

// ------------------------------------------------------------
// Dataset row
// ------------------------------------------------------------
//
// The persisted unit: one accepted observation of one class.
// Field order matches the CSV column order.
//
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetRow {
    pub class_id: u32,
    pub class_name: String,
    pub taxon_id: u64,
    pub obs_id: u64,

    /// Photo URL with the size token already substituted
    pub image_url: String,

    /// Region label ("NC" / "USA")
    pub source_loc: String,
}

impl DatasetRow {
    pub const HEADER: [&'static str; 6] = [
        "class_id",
        "class_name",
        "taxon_id",
        "obs_id",
        "image_url",
        "source_loc",
    ];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_api_page_ignoring_unknown_fields() {
        let raw = r#"{
            "total_results": 2,
            "page": 1,
            "per_page": 200,
            "results": [
                {"id": 11, "quality_grade": "research",
                 "photos": [{"id": 5, "url": "https://static.example/photos/5/square.jpg"}]},
                {"id": 12, "photos": []}
            ]
        }"#;

        let page: ObservationPage = serde_json::from_str(raw).unwrap();

        assert_eq!(page.total_results, 2);
        assert_eq!(page.results.len(), 2);
        assert_eq!(
            page.results[0].first_photo_url(),
            Some("https://static.example/photos/5/square.jpg")
        );
        assert_eq!(page.results[1].first_photo_url(), None);
    }

    #[test]
    fn missing_photo_list_is_treated_as_empty() {
        let obs: Observation = serde_json::from_str(r#"{"id": 3}"#).unwrap();
        assert!(obs.photos.is_empty());

        let obs: Observation = serde_json::from_str(r#"{"id": 4, "photos": [{"url": null}]}"#).unwrap();
        assert_eq!(obs.first_photo_url(), None);
    }
}
