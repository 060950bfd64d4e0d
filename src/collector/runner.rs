use std::collections::HashSet;
use std::sync::atomic::Ordering;

use log::{debug, info, warn};
use tokio::time::sleep;

use crate::{
    config::{ClassSpec, CollectorConfig, Region},
    metrics::RunMetrics,
    schema::DatasetRow,
    sources::adapter::{ObservationQuery, ObservationSource},
    util,
};

/// Runs the whole collection and returns every accepted row.
///
/// Classes are processed in configured order, strictly one request
/// at a time. Rows come back in collection order:
/// class, then taxon, then page, then position on the page.
///
/// This function never fails: source errors only truncate the
/// affected taxon. Every outcome is counted in `metrics`.
///
pub async fn run_collection(
    source: &dyn ObservationSource,
    cfg: &CollectorConfig,
    metrics: &RunMetrics,
) -> Vec<DatasetRow> {
    info!(
        "Starting collection from {}... Target: {} per class.",
        source.name(),
        cfg.target_per_class
    );

    let collector = Collector { source, cfg, metrics };
    let mut rows = Vec::new();

    for class in &cfg.classes {
        collector.collect_class(class, &mut rows).await;
    }

    rows
}

/// Borrowed state shared by every class of one run.
struct Collector<'a> {
    source: &'a dyn ObservationSource,
    cfg: &'a CollectorConfig,
    metrics: &'a RunMetrics,
}

impl Collector<'_> {
    /// Collects one class across all of its taxon identifiers.
    ///
    /// The URL set is shared by every taxon of the class, so the cap
    /// and the dedup both apply to the class as a whole.
    ///
    async fn collect_class(&self, class: &ClassSpec, rows: &mut Vec<DatasetRow>) {
        let region = self.cfg.region_for(class.id);

        info!(
            "Collecting Class {} ({}) from {}...",
            class.id, class.name, region.label
        );

        let mut collected_urls: HashSet<String> = HashSet::new();

        for &taxon_id in &class.taxon_ids {
            self.collect_taxon(class, region, taxon_id, &mut collected_urls, rows).await;
        }

        info!(
            "  [OK] Finished Class {}. Total: {}",
            class.id,
            collected_urls.len()
        );
    }

    /// Pages through one taxon until the class cap is reached, the
    /// source runs dry, or the source fails.
    ///
    /// - Pagination starts at page 1
    /// - An empty page ends the taxon without a delay
    /// - Any source error ends the taxon; nothing is retried
    ///
    async fn collect_taxon(
        &self,
        class: &ClassSpec,
        region: &Region,
        taxon_id: u64,
        collected_urls: &mut HashSet<String>,
        rows: &mut Vec<DatasetRow>,
    ) {
        let cfg = self.cfg;
        let metrics = self.metrics;
        let cap = cfg.target_per_class;
        let facet = cfg.facet_for(class.id);
        let mut page = 1;

        while collected_urls.len() < cap {
            let query = ObservationQuery {
                taxon_id,
                place_id: region.place_id,
                quality_grade: cfg.api.quality_grade.clone(),
                facet: facet.map(|f| (f.term_id, f.term_value_id)),
                page,
                per_page: cfg.api.per_page,
            };

            debug!("Requesting {:?}", query);

            let observations = match self.source.fetch_page(&query).await {
                Ok(p) => {
                    if page == 1 {
                        info!("  Taxon {}: {} matching observations", taxon_id, p.total_results);
                    }
                    p.results
                }
                Err(e) => {
                    metrics.page_errors.fetch_add(1, Ordering::Relaxed);
                    warn!("  [!] Error on page {} (taxon {}): {:#}", page, taxon_id, e);
                    return;
                }
            };

            metrics.pages_fetched.fetch_add(1, Ordering::Relaxed);

            // Exhausted
            if observations.is_empty() {
                return;
            }

            for obs in &observations {
                if collected_urls.len() >= cap {
                    break;
                }

                metrics.observations_seen.fetch_add(1, Ordering::Relaxed);

                let Some(photo_url) = obs.first_photo_url() else {
                    metrics.observations_without_photo.fetch_add(1, Ordering::Relaxed);
                    continue;
                };

                let image_url = util::resize_photo_url(
                    photo_url,
                    &cfg.photo_size.default_token,
                    &cfg.photo_size.target_token,
                );

                if collected_urls.contains(&image_url) {
                    metrics.duplicates_skipped.fetch_add(1, Ordering::Relaxed);
                    debug!("Skipping duplicate image of observation {}: {}", obs.id, image_url);
                    continue;
                }

                rows.push(DatasetRow {
                    class_id: class.id,
                    class_name: class.name.clone(),
                    taxon_id,
                    obs_id: obs.id,
                    image_url: image_url.clone(),
                    source_loc: region.label.clone(),
                });
                collected_urls.insert(image_url);
                metrics.rows_collected.fetch_add(1, Ordering::Relaxed);
            }

            info!(
                "  -> Page {}: Total collected so far: {}",
                page,
                collected_urls.len()
            );
            page += 1;

            // Be polite to the API
            sleep(util::page_delay(cfg.pacing.base(), cfg.pacing.jitter())).await;
        }
    }
}
