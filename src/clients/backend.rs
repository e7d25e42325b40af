/// HTTP client for this service's own planet endpoints
use crate::domain::{ListQuery, ListResponse, PlanetDetail, PlanetImage};
use crate::errors::{ErrorResponse, FetchError, FetchResult};
use crate::store::PlanetApi;
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// [`PlanetApi`] over HTTP, used by the client-side stores
pub struct BackendClient {
    client: Client,
    base_url: String,
}

impl BackendClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> FetchResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent("planet-explorer-client/1.0")
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn planet_url(&self, id: &str) -> String {
        format!("{}/api/planets/{}", self.base_url, urlencoding::encode(id))
    }
}

/// Decode a success body or surface the server's `error` message
async fn decode<T: DeserializeOwned>(resp: Response) -> FetchResult<T> {
    let status = resp.status();
    if !status.is_success() {
        let message = match resp.json::<ErrorResponse>().await {
            Ok(body) => body.error,
            Err(_) => format!("HTTP error! status: {}", status.as_u16()),
        };
        return Err(FetchError::Status {
            status: status.as_u16(),
            message,
        });
    }
    let bytes = resp.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| FetchError::Decode(e.to_string()))
}

#[async_trait]
impl PlanetApi for BackendClient {
    async fn list_planets(&self, query: &ListQuery) -> FetchResult<ListResponse> {
        let mut params = vec![
            ("page", query.page.to_string()),
            ("order", query.order.to_string()),
        ];
        if !query.name.is_empty() {
            params.push(("name", query.name.clone()));
        }
        if query.realtime {
            params.push(("realtime", "true".to_string()));
        }

        let resp = self
            .client
            .get(format!("{}/api/planets", self.base_url))
            .query(&params)
            .send()
            .await?;
        decode(resp).await
    }

    async fn planet_detail(&self, id: &str) -> FetchResult<PlanetDetail> {
        let resp = self.client.get(self.planet_url(id)).send().await?;
        decode(resp).await
    }

    async fn planet_image(&self, id: &str) -> FetchResult<PlanetImage> {
        let resp = self
            .client
            .get(format!("{}/image", self.planet_url(id)))
            .send()
            .await?;
        decode(resp).await
    }
}
