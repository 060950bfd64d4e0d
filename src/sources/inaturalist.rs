use std::time::Duration;

use anyhow::{anyhow, Context};
use reqwest::Client;

use crate::{
    config::ApiConfig,
    schema::ObservationPage,
};

use super::adapter::{ObservationQuery, ObservationSource};

/// iNaturalist v1 REST adapter
///
/// Encapsulates all iNaturalist-specific behavior:
/// - endpoint layout (`{base}/observations`)
/// - query parameter names
/// - response decoding
///
/// No pagination, capping or dedup logic lives here.
pub struct InaturalistSource {
    client: Client,
    base_url: String,
}

impl InaturalistSource {
    pub fn new(api: &ApiConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .user_agent(api.user_agent.clone())
            .timeout(Duration::from_secs(api.timeout_secs))
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self::with_client(client, &api.base_url))
    }

    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Translates a query into iNaturalist parameter pairs.
    ///
    /// The facet pair is only sent when present; the API treats an
    /// absent `term_id` as "no annotation filter".
    fn query_params(query: &ObservationQuery) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("taxon_id", query.taxon_id.to_string()),
            ("place_id", query.place_id.to_string()),
            ("quality_grade", query.quality_grade.clone()),
            ("page", query.page.to_string()),
            ("per_page", query.per_page.to_string()),
        ];

        if let Some((term_id, term_value_id)) = query.facet {
            params.push(("term_id", term_id.to_string()));
            params.push(("term_value_id", term_value_id.to_string()));
        }

        params
    }
}

#[async_trait::async_trait]
impl ObservationSource for InaturalistSource {

    fn name(&self) -> &'static str {
        "inaturalist"
    }

    async fn fetch_page(&self, query: &ObservationQuery) -> anyhow::Result<ObservationPage> {
        let res = self
            .client
            .get(format!("{}/observations", self.base_url))
            .query(&Self::query_params(query))
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(anyhow!("HTTP {}: {}", status, body));
        }

        let page = res
            .json::<ObservationPage>()
            .await
            .context("malformed observations response")?;

        Ok(page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn source(server: &MockServer) -> InaturalistSource {
        crate::util::install_crypto_provider();
        InaturalistSource::with_client(Client::new(), &format!("{}/v1/", server.uri()))
    }

    fn query(facet: Option<(u64, u64)>) -> ObservationQuery {
        ObservationQuery {
            taxon_id: 51673,
            place_id: 30,
            quality_grade: "research".to_string(),
            facet,
            page: 2,
            per_page: 200,
        }
    }

    #[tokio::test]
    async fn sends_filters_and_decodes_results() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/observations"))
            .and(query_param("taxon_id", "51673"))
            .and(query_param("place_id", "30"))
            .and(query_param("quality_grade", "research"))
            .and(query_param("page", "2"))
            .and(query_param("per_page", "200"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "total_results": 401,
                "page": 2,
                "per_page": 200,
                "results": [
                    {"id": 100, "photos": [{"id": 1, "url": "https://img.example/photos/1/square.jpg"}]},
                    {"id": 101, "photos": []}
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let page = source(&server).fetch_page(&query(None)).await.unwrap();

        assert_eq!(page.total_results, 401);
        assert_eq!(page.results.len(), 2);
        assert_eq!(page.results[0].id, 100);
        assert_eq!(
            page.results[0].first_photo_url(),
            Some("https://img.example/photos/1/square.jpg")
        );
    }

    #[tokio::test]
    async fn facet_pair_is_sent_when_present() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/observations"))
            .and(query_param("term_id", "1"))
            .and(query_param("term_value_id", "6"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "results": []
            })))
            .expect(1)
            .mount(&server)
            .await;

        let page = source(&server).fetch_page(&query(Some((1, 6)))).await.unwrap();
        assert!(page.results.is_empty());
    }

    #[test]
    fn facet_pair_is_omitted_when_absent() {
        let params = InaturalistSource::query_params(&query(None));
        assert!(params.iter().all(|(k, _)| *k != "term_id" && *k != "term_value_id"));

        let params = InaturalistSource::query_params(&query(Some((1, 6))));
        assert!(params.contains(&("term_id", "1".to_string())));
        assert!(params.contains(&("term_value_id", "6".to_string())));
    }

    #[tokio::test]
    async fn any_success_status_is_accepted() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/observations"))
            .respond_with(ResponseTemplate::new(203).set_body_json(serde_json::json!({
                "total_results": 1,
                "results": [{"id": 7, "photos": []}]
            })))
            .mount(&server)
            .await;

        let page = source(&server).fetch_page(&query(None)).await.unwrap();
        assert_eq!(page.results[0].id, 7);
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/observations"))
            .respond_with(ResponseTemplate::new(429).set_body_string("Too Many Requests"))
            .mount(&server)
            .await;

        let err = source(&server).fetch_page(&query(None)).await.unwrap_err();
        let msg = format!("{:#}", err);
        assert!(msg.contains("429"), "unexpected error: {}", msg);
        assert!(msg.contains("Too Many Requests"));
    }

    #[tokio::test]
    async fn malformed_body_is_an_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/observations"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not valid json"))
            .mount(&server)
            .await;

        let err = source(&server).fetch_page(&query(None)).await.unwrap_err();
        assert!(format!("{:#}", err).contains("malformed observations response"));
    }
}
