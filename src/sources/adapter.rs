use crate::schema::ObservationPage;

/// Parameters of a single page request.
///
/// Built by the collector runtime, translated by each source into
/// its own query format.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObservationQuery {
    pub taxon_id: u64,
    pub place_id: u64,

    /// Quality predicate (e.g. "research")
    pub quality_grade: String,

    /// Optional categorical facet: (term id, term value id)
    pub facet: Option<(u64, u64)>,

    /// 1-based page number
    pub page: u32,
    pub per_page: u32,
}

/// ObservationSource is the abstraction layer between:
/// - The collector runtime (pagination, cap, dedup)
/// - An external observation service
///
/// Each implementation must:
/// - Translate an `ObservationQuery` into a request
/// - Decode the response into an `ObservationPage`
///
/// ERRORS:
/// - Transport failures, non-success status and undecodable bodies
///   are all returned as `Err`. The collector treats every `Err` the
///   same way: the current taxon is abandoned.
///
#[async_trait::async_trait]
pub trait ObservationSource: Send + Sync {

    /// Canonical source name, used for logging.
    fn name(&self) -> &'static str;

    /// Fetches one page of observations.
    ///
    /// An empty `results` list means the query is exhausted.
    ///
    async fn fetch_page(&self, query: &ObservationQuery) -> anyhow::Result<ObservationPage>;
}
