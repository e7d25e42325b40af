/// In-process planets API serving the eight-planet fixture
use super::PlanetApi;
use crate::domain::{ListQuery, ListResponse, PlanetDetail, PlanetImage, PlanetImages};
use crate::errors::{FetchError, FetchResult};
use crate::services::{build_detail, build_list_page, fixtures, resolve_identifier};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Duration;

#[derive(Default)]
pub struct FixtureApi {
    list_delays: Mutex<HashMap<u32, Duration>>,
    list_calls: Mutex<Vec<ListQuery>>,
    detail_calls: Mutex<Vec<String>>,
    detail_delay: Mutex<Duration>,
    image_delay: Mutex<Duration>,
    pub fail_list: AtomicBool,
    pub fail_detail: AtomicBool,
    pub fail_image: AtomicBool,
}

impl FixtureApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn delay_page(&self, page: u32, delay: Duration) {
        self.list_delays.lock().unwrap().insert(page, delay);
    }

    pub fn delay_detail(&self, delay: Duration) {
        *self.detail_delay.lock().unwrap() = delay;
    }

    pub fn delay_image(&self, delay: Duration) {
        *self.image_delay.lock().unwrap() = delay;
    }

    pub fn list_calls(&self) -> Vec<ListQuery> {
        self.list_calls.lock().unwrap().clone()
    }

    pub fn detail_calls(&self) -> Vec<String> {
        self.detail_calls.lock().unwrap().clone()
    }

    pub fn set(&self, flag: &AtomicBool, value: bool) {
        flag.store(value, Ordering::SeqCst);
    }
}

fn rejected(err: crate::errors::ApiError) -> FetchError {
    FetchError::Status {
        status: err.status_code().as_u16(),
        message: err.to_string(),
    }
}

#[async_trait]
impl PlanetApi for FixtureApi {
    async fn list_planets(&self, query: &ListQuery) -> FetchResult<ListResponse> {
        self.list_calls.lock().unwrap().push(query.clone());
        let delay = self
            .list_delays
            .lock()
            .unwrap()
            .get(&query.page)
            .copied()
            .unwrap_or_default();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        if self.fail_list.load(Ordering::SeqCst) {
            return Err(FetchError::Status {
                status: 500,
                message: "External server error".into(),
            });
        }
        Ok(build_list_page(fixtures::summaries(), query, 5))
    }

    async fn planet_detail(&self, id: &str) -> FetchResult<PlanetDetail> {
        self.detail_calls.lock().unwrap().push(id.to_string());
        let delay = *self.detail_delay.lock().unwrap();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        if self.fail_detail.load(Ordering::SeqCst) {
            return Err(FetchError::Status {
                status: 500,
                message: "Internal server error".into(),
            });
        }
        let info = resolve_identifier(id).map_err(rejected)?;
        let index = crate::resolver::Planet::ALL
            .iter()
            .position(|p| *p == info.planet)
            .unwrap_or(0);
        let bodies = fixtures::bodies();
        Ok(build_detail(
            info.planet,
            &bodies[index],
            None,
            PlanetImages::empty(format!("Imagen de {}", info.localized_name)),
            Utc::now(),
        ))
    }

    async fn planet_image(&self, id: &str) -> FetchResult<PlanetImage> {
        let delay = *self.image_delay.lock().unwrap();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        if self.fail_image.load(Ordering::SeqCst) {
            return Err(FetchError::Status {
                status: 404,
                message: "No images found for this planet".into(),
            });
        }
        let info = resolve_identifier(id).map_err(rejected)?;
        Ok(PlanetImage {
            title: info.wiki_slug.to_string(),
            image_url: format!("https://img.example/{}.jpg", info.planet.body_id()),
            width: 800,
            height: 600,
        })
    }
}
