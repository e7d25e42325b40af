/// External API clients module
mod backend;

pub use backend::BackendClient;

use crate::config::UpstreamConfig;
use crate::errors::{ApiError, ApiResult};
use crate::resolver::Planet;
use crate::utils::{parse_ephemeris_distance_au, AU_KM};
use chrono::{Days, Utc};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

/// HTTP client wrapper with common configuration
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    pub fn new(default_timeout: Duration) -> ApiResult<Self> {
        let client = Client::builder()
            .timeout(default_timeout)
            .user_agent("planet-explorer/1.0")
            .build()?;
        Ok(Self { client })
    }

    pub fn get_client(&self) -> &Client {
        &self.client
    }
}

/// Decode a JSON body, turning non-success statuses into typed errors
async fn read_json<T: DeserializeOwned>(resp: Response) -> ApiResult<T> {
    let status = resp.status();
    if !status.is_success() {
        return Err(ApiError::from_upstream_status(status.as_u16()));
    }
    Ok(resp.json().await?)
}

/// Raw body record from the solar-system API
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Body {
    pub id: String,
    pub english_name: String,
    pub is_planet: bool,
    pub mean_radius: Option<f64>,
    pub semimajor_axis: Option<f64>,
    pub mass: Option<MassValue>,
    pub density: Option<f64>,
    pub gravity: Option<f64>,
    pub escape: Option<f64>,
    pub avg_temp: Option<f64>,
    /// Hours
    pub sideral_rotation: Option<f64>,
    /// Days
    pub sideral_orbit: Option<f64>,
    pub eccentricity: Option<f64>,
    pub inclination: Option<f64>,
    pub moons: Option<Vec<MoonRef>>,
    pub discovered_by: Option<String>,
    pub discovery_date: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MassValue {
    pub mass_value: f64,
    pub mass_exponent: i32,
}

impl MassValue {
    pub fn kilograms(&self) -> f64 {
        self.mass_value * 10f64.powi(self.mass_exponent)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MoonRef {
    pub moon: String,
}

#[derive(Debug, Deserialize)]
struct BodiesEnvelope {
    #[serde(default)]
    bodies: Vec<Body>,
}

/// Solar-system bodies API client
pub struct SolarSystemClient {
    http_client: HttpClient,
    base_url: String,
    list_timeout: Duration,
    detail_timeout: Duration,
}

impl SolarSystemClient {
    pub fn new(http_client: HttpClient, config: &UpstreamConfig) -> Self {
        Self {
            http_client,
            base_url: config.solar_system_url.trim_end_matches('/').to_string(),
            list_timeout: config.timeouts.list,
            detail_timeout: config.timeouts.detail,
        }
    }

    /// Fetch every body flagged as a planet
    pub async fn fetch_planets(&self) -> ApiResult<Vec<Body>> {
        let resp = self
            .http_client
            .get_client()
            .get(format!("{}/bodies", self.base_url))
            .query(&[("filter[]", "isPlanet,eq,true")])
            .header("Accept", "application/json")
            .timeout(self.list_timeout)
            .send()
            .await?;

        let envelope: BodiesEnvelope = read_json(resp).await?;
        if envelope.bodies.is_empty() {
            return Err(ApiError::Upstream {
                status: 502,
                message: "Could not fetch planetary data".to_string(),
            });
        }
        Ok(envelope.bodies)
    }

    /// Fetch one body by its API identifier
    pub async fn fetch_body(&self, body_id: &str) -> ApiResult<Body> {
        let resp = self
            .http_client
            .get_client()
            .get(format!(
                "{}/bodies/{}",
                self.base_url,
                urlencoding::encode(body_id)
            ))
            .header("Accept", "application/json")
            .timeout(self.detail_timeout)
            .send()
            .await?;

        read_json(resp).await
    }
}

/// Image reference with dimensions
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ImageRef {
    pub source: String,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Deserialize)]
struct PageSummary {
    originalimage: Option<ImageRef>,
    thumbnail: Option<ImageRef>,
}

#[derive(Debug, Deserialize)]
struct QueryEnvelope<P> {
    query: Option<QueryPages<P>>,
}

#[derive(Debug, Deserialize)]
struct QueryPages<P> {
    #[serde(default = "Vec::new")]
    pages: Vec<P>,
}

#[derive(Debug, Deserialize)]
struct PageImagesPage {
    original: Option<ImageRef>,
}

#[derive(Debug, Deserialize)]
struct ImageInfoPage {
    title: String,
    #[serde(default)]
    imageinfo: Vec<ImageInfo>,
}

#[derive(Debug, Deserialize)]
struct ImageInfo {
    url: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
}

/// One image in a Commons category listing
#[derive(Debug, Clone, PartialEq)]
pub struct CommonsImage {
    pub title: String,
    pub url: String,
    pub width: u32,
    pub height: u32,
}

/// Wikipedia / Wikimedia Commons image client
pub struct WikiClient {
    http_client: HttpClient,
    api_url: String,
    rest_url: String,
    commons_url: String,
    image_timeout: Duration,
    gallery_timeout: Duration,
}

impl WikiClient {
    pub fn new(http_client: HttpClient, config: &UpstreamConfig) -> Self {
        Self {
            http_client,
            api_url: config.wiki_api_url.clone(),
            rest_url: config.wiki_rest_url.trim_end_matches('/').to_string(),
            commons_url: config.commons_api_url.clone(),
            image_timeout: config.timeouts.image,
            gallery_timeout: config.timeouts.gallery,
        }
    }

    /// Original page image of an article, `None` when the article has none
    pub async fn fetch_page_image(&self, slug: &str) -> ApiResult<Option<ImageRef>> {
        let resp = self
            .http_client
            .get_client()
            .get(&self.api_url)
            .query(&[
                ("action", "query"),
                ("format", "json"),
                ("formatversion", "2"),
                ("titles", slug),
                ("prop", "pageimages"),
                ("piprop", "original"),
                ("pilicense", "any"),
            ])
            .timeout(self.image_timeout)
            .send()
            .await?;

        let envelope: QueryEnvelope<PageImagesPage> = read_json(resp).await?;
        Ok(envelope
            .query
            .and_then(|q| q.pages.into_iter().next())
            .and_then(|page| page.original))
    }

    /// Lead image from the REST page summary, original resolution preferred
    pub async fn fetch_summary_image(&self, slug: &str) -> ApiResult<Option<ImageRef>> {
        let resp = self
            .http_client
            .get_client()
            .get(format!(
                "{}/page/summary/{}",
                self.rest_url,
                urlencoding::encode(slug)
            ))
            .header("Accept", "application/json")
            .timeout(self.image_timeout)
            .send()
            .await?;

        let summary: PageSummary = read_json(resp).await?;
        Ok(summary.originalimage.or(summary.thumbnail))
    }

    /// `File:<name>.jpg` on Commons
    pub async fn fetch_commons_file(&self, english_name: &str) -> ApiResult<Option<ImageRef>> {
        let title = format!("File:{english_name}.jpg");
        let resp = self
            .http_client
            .get_client()
            .get(&self.commons_url)
            .query(&[
                ("action", "query"),
                ("format", "json"),
                ("formatversion", "2"),
                ("titles", title.as_str()),
                ("prop", "imageinfo"),
                ("iiprop", "url|size"),
                ("iiurlwidth", "800"),
            ])
            .timeout(self.gallery_timeout)
            .send()
            .await?;

        let envelope: QueryEnvelope<ImageInfoPage> = read_json(resp).await?;
        let image = envelope
            .query
            .and_then(|q| q.pages.into_iter().next())
            .and_then(|page| page.imageinfo.into_iter().next())
            .and_then(|info| match (info.url, info.width, info.height) {
                (Some(source), Some(width), Some(height)) => Some(ImageRef {
                    source,
                    width,
                    height,
                }),
                _ => None,
            });
        Ok(image)
    }

    /// Up to `limit` files from `Category:<name>`
    pub async fn fetch_category_gallery(
        &self,
        english_name: &str,
        limit: u32,
    ) -> ApiResult<Vec<CommonsImage>> {
        let category = format!("Category:{english_name}");
        let limit = limit.to_string();
        let resp = self
            .http_client
            .get_client()
            .get(&self.commons_url)
            .query(&[
                ("action", "query"),
                ("format", "json"),
                ("formatversion", "2"),
                ("generator", "categorymembers"),
                ("gcmtitle", category.as_str()),
                ("gcmtype", "file"),
                ("gcmlimit", limit.as_str()),
                ("prop", "imageinfo"),
                ("iiprop", "url|size"),
                ("iiurlwidth", "600"),
            ])
            .timeout(self.gallery_timeout)
            .send()
            .await?;

        let envelope: QueryEnvelope<ImageInfoPage> = read_json(resp).await?;
        let pages = envelope.query.map(|q| q.pages).unwrap_or_default();

        Ok(pages
            .into_iter()
            .filter_map(|page| {
                let info = page.imageinfo.into_iter().next()?;
                Some(CommonsImage {
                    title: page.title,
                    url: info.url?,
                    width: info.width.unwrap_or(0),
                    height: info.height.unwrap_or(0),
                })
            })
            .collect())
    }
}

#[derive(Debug, Deserialize)]
struct HorizonsResponse {
    result: Option<String>,
}

/// JPL Horizons ephemeris client used for realtime Earth distances
pub struct HorizonsClient {
    http_client: HttpClient,
    base_url: String,
    timeout: Duration,
}

impl HorizonsClient {
    pub fn new(http_client: HttpClient, config: &UpstreamConfig) -> Self {
        Self {
            http_client,
            base_url: config.horizons_url.clone(),
            timeout: config.timeouts.horizons,
        }
    }

    /// Current geocentric distance in km.
    ///
    /// Best effort: every failure is logged and reported as `None`.
    pub async fn current_distance_km(&self, planet: Planet) -> Option<f64> {
        if planet == Planet::Earth {
            return Some(0.0);
        }

        match self.fetch_distance_au(planet).await {
            Ok(Some(au)) => Some(au * AU_KM),
            Ok(None) => {
                tracing::warn!("No ephemeris rows for {}", planet);
                None
            }
            Err(e) => {
                tracing::warn!("Could not fetch current distance for {}: {}", planet, e);
                None
            }
        }
    }

    async fn fetch_distance_au(&self, planet: Planet) -> ApiResult<Option<f64>> {
        let today = Utc::now().date_naive();
        let tomorrow = today + Days::new(1);
        let command = format!("'{}'", planet.horizons_code());
        let start = format!("'{today}'");
        let stop = format!("'{tomorrow}'");

        let resp = self
            .http_client
            .get_client()
            .get(&self.base_url)
            .query(&[
                ("format", "json"),
                ("COMMAND", command.as_str()),
                ("OBJ_DATA", "NO"),
                ("MAKE_EPHEM", "YES"),
                ("EPHEM_TYPE", "OBSERVER"),
                ("CENTER", "'500@399'"),
                ("START_TIME", start.as_str()),
                ("STOP_TIME", stop.as_str()),
                ("STEP_SIZE", "'1d'"),
                ("QUANTITIES", "'20'"),
            ])
            .timeout(self.timeout)
            .send()
            .await?;

        let body: HorizonsResponse = read_json(resp).await?;
        Ok(body.result.as_deref().and_then(parse_ephemeris_distance_au))
    }
}
