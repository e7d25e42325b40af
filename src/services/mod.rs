/// Business logic services layer
use crate::catalog;
use crate::clients::{Body, HorizonsClient, HttpClient, ImageRef, SolarSystemClient, WikiClient};
use crate::config::AppConfig;
use crate::domain::{
    Atmosphere, DiscoveryInfo, GalleryImage, ListQuery, ListResponse, MoonDetail, Moons, Pagination,
    PlanetDetail, PlanetImage, PlanetImages, PlanetSummary, SortOrder, TemperatureRange,
};
use crate::errors::{ApiError, ApiResult};
use crate::resolver::{self, CanonicalPlanetInfo, Planet};
use crate::utils::{
    collate_es, contains_ignore_case, round_to, AU_KM, EARTH_GRAVITY, EARTH_MASS_KG,
};
use chrono::{DateTime, Utc};
use futures::future::join_all;

const GALLERY_LIMIT: u32 = 5;

/// Planet list, detail and image queries
pub struct PlanetService {
    solar: SolarSystemClient,
    wiki: WikiClient,
    horizons: HorizonsClient,
    items_per_page: u32,
}

impl PlanetService {
    pub fn new(config: &AppConfig) -> ApiResult<Self> {
        let http = HttpClient::new(config.upstream.timeouts.detail)?;
        Ok(Self {
            solar: SolarSystemClient::new(http.clone(), &config.upstream),
            wiki: WikiClient::new(http.clone(), &config.upstream),
            horizons: HorizonsClient::new(http, &config.upstream),
            items_per_page: config.items_per_page,
        })
    }

    /// One page of planets, filtered and sorted, with images for that page only
    pub async fn list(&self, query: &ListQuery) -> ApiResult<ListResponse> {
        let bodies = self.solar.fetch_planets().await?;
        let summaries = bodies.iter().map(summarize).collect();

        let mut page = build_list_page(summaries, query, self.items_per_page);
        join_all(
            page.data
                .iter_mut()
                .map(|planet| self.enrich_summary(planet, query.realtime)),
        )
        .await;

        tracing::info!(
            "listed page {}/{} ({} items, order {}, filter {:?})",
            page.pagination.current_page,
            page.pagination.total_pages,
            page.data.len(),
            query.order,
            query.name
        );
        Ok(page)
    }

    /// Full record for one planet
    pub async fn detail(&self, id: &str) -> ApiResult<PlanetDetail> {
        let info = resolve_identifier(id)?;
        let planet = info.planet;

        let body = self.solar.fetch_body(planet.body_id()).await?;
        if !body.is_planet {
            return Err(ApiError::NotFound("Planet not found".to_string()));
        }

        let (distance, images) = tokio::join!(
            self.horizons.current_distance_km(planet),
            self.fetch_images(planet)
        );

        Ok(build_detail(planet, &body, distance, images, Utc::now()))
    }

    /// Lead image of the planet's Wikipedia article
    pub async fn image(&self, id: &str) -> ApiResult<PlanetImage> {
        let info = resolve_identifier(id)?;

        match self.wiki.fetch_page_image(info.wiki_slug).await? {
            Some(original) => Ok(PlanetImage {
                title: info.wiki_slug.to_string(),
                image_url: original.source,
                width: original.width,
                height: original.height,
            }),
            None => Err(ApiError::NotFound(
                "No images found for this planet".to_string(),
            )),
        }
    }

    async fn enrich_summary(&self, summary: &mut PlanetSummary, realtime: bool) {
        let Some(planet) = Planet::from_english(&summary.name) else {
            return;
        };

        let distance = async {
            if realtime {
                self.horizons.current_distance_km(planet).await
            } else {
                None
            }
        };
        let (image, distance) = tokio::join!(self.fetch_card_image(planet), distance);

        if let Some(image) = image {
            summary.image_url = Some(image.source);
            summary.image_width = Some(image.width);
            summary.image_height = Some(image.height);
        }
        summary.distance_from_earth = distance;
    }

    /// Article lead image, falling back to a Commons file; `None` on any failure
    async fn fetch_card_image(&self, planet: Planet) -> Option<ImageRef> {
        match self.wiki.fetch_summary_image(planet.wiki_slug()).await {
            Ok(Some(image)) => return Some(image),
            Ok(None) => {}
            Err(e) => tracing::warn!("Summary image for {} failed: {}", planet, e),
        }

        match self.wiki.fetch_commons_file(planet.english_name()).await {
            Ok(image) => image,
            Err(e) => {
                tracing::warn!("Commons image for {} failed: {}", planet, e);
                None
            }
        }
    }

    async fn fetch_images(&self, planet: Planet) -> PlanetImages {
        let caption = format!("Imagen de {}", planet.localized_name());
        let (main, gallery) = tokio::join!(
            self.wiki.fetch_summary_image(planet.wiki_slug()),
            self.wiki.fetch_category_gallery(planet.english_name(), GALLERY_LIMIT)
        );

        let mut images = PlanetImages::empty(caption);
        match main {
            Ok(Some(image)) => {
                images.main.url = Some(image.source);
                images.main.width = Some(image.width);
                images.main.height = Some(image.height);
            }
            Ok(None) => {}
            Err(e) => tracing::warn!("Main image for {} failed: {}", planet, e),
        }

        match gallery {
            Ok(items) if !items.is_empty() => {
                images.gallery = Some(
                    items
                        .into_iter()
                        .map(|item| GalleryImage {
                            caption: gallery_caption(&item.title),
                            url: item.url,
                            width: item.width,
                            height: item.height,
                        })
                        .collect(),
                );
            }
            Ok(_) => {}
            Err(e) => tracing::warn!("Gallery for {} failed: {}", planet, e),
        }
        images
    }
}

/// Validate a route identifier and resolve it to a supported planet
pub fn resolve_identifier(id: &str) -> ApiResult<CanonicalPlanetInfo> {
    if id.trim().is_empty() {
        return Err(ApiError::Validation("Missing planet ID".to_string()));
    }
    resolver::resolve(id).ok_or_else(|| {
        ApiError::Validation(format!(
            "Invalid planet name: {}. Supported names include: {} (in English, Spanish, or French)",
            id,
            resolver::supported_names()
        ))
    })
}

/// Map an upstream body onto a list row (no image, no live distance)
pub fn summarize(body: &Body) -> PlanetSummary {
    let planet = Planet::from_english(&body.english_name);

    PlanetSummary {
        id: body.id.clone(),
        name: body.english_name.clone(),
        localized_name: planet
            .map(|p| p.localized_name().to_string())
            .unwrap_or_else(|| body.english_name.clone()),
        size: (body.mean_radius.unwrap_or(0.0) * 2.0).round(),
        distance_from_sun: au(body.semimajor_axis),
        distance_from_earth: None,
        mass: relative_mass(body),
        gravity: relative_gravity(body),
        temperature: body.avg_temp.unwrap_or(0.0).round(),
        day_length: round_to(body.sideral_rotation.unwrap_or(0.0), 2),
        year_length: body.sideral_orbit.unwrap_or(0.0).round(),
        moons: moon_count(body),
        image_url: None,
        image_width: None,
        image_height: None,
        description: planet
            .map(|p| catalog::summary_description(p).to_string())
            .unwrap_or_else(|| format!("Información sobre {}", body.english_name)),
        discovery_date: body.discovery_date.clone().filter(|d| !d.is_empty()),
        atmosphere: Vec::new(),
    }
}

/// Filter by name, sort by localized name and cut one page.
///
/// The requested page is echoed back even when it lies past the last page;
/// in that case `data` is empty.
pub fn build_list_page(
    planets: Vec<PlanetSummary>,
    query: &ListQuery,
    items_per_page: u32,
) -> ListResponse {
    let mut planets: Vec<PlanetSummary> = if query.name.is_empty() {
        planets
    } else {
        planets
            .into_iter()
            .filter(|p| {
                contains_ignore_case(&p.localized_name, &query.name)
                    || contains_ignore_case(&p.name, &query.name)
            })
            .collect()
    };

    planets.sort_by(|a, b| {
        let ord = collate_es(&a.localized_name, &b.localized_name);
        match query.order {
            SortOrder::Asc => ord,
            SortOrder::Desc => ord.reverse(),
        }
    });

    let per_page = items_per_page.max(1);
    let page = query.page.max(1);
    let total_items = u32::try_from(planets.len()).unwrap_or(u32::MAX);
    let start = ((page - 1) as usize).saturating_mul(per_page as usize);

    let data = planets
        .into_iter()
        .skip(start)
        .take(per_page as usize)
        .collect();

    ListResponse {
        data,
        pagination: Pagination::new(page, total_items, per_page),
    }
}

/// Assemble the detail record from upstream data and curated content
pub fn build_detail(
    planet: Planet,
    body: &Body,
    distance_from_earth: Option<f64>,
    images: PlanetImages,
    now: DateTime<Utc>,
) -> PlanetDetail {
    let avg_temp = body.avg_temp.unwrap_or(0.0);
    let moon_names: Vec<String> = body
        .moons
        .iter()
        .flatten()
        .map(|m| m.moon.clone())
        .collect();
    let details: Vec<MoonDetail> = moon_names
        .iter()
        .take(3)
        .map(|name| MoonDetail {
            name: name.clone(),
            diameter: 0.0,
            distance_from_planet: 0.0,
        })
        .collect();

    PlanetDetail {
        id: body.id.clone(),
        name: planet.english_name().to_string(),
        localized_name: planet.localized_name().to_string(),

        size: (body.mean_radius.unwrap_or(0.0) * 2.0).round(),
        mass: relative_mass(body),
        density: body.density.unwrap_or(0.0),
        gravity: relative_gravity(body),
        escape_velocity: round_to(body.escape.unwrap_or(0.0) / 1000.0, 2),

        distance_from_sun: au(body.semimajor_axis),
        distance_from_earth,
        orbital_period: body.sideral_orbit.unwrap_or(0.0).round(),
        rotation_period: round_to(body.sideral_rotation.unwrap_or(0.0), 2),
        eccentricity: body.eccentricity.unwrap_or(0.0),
        inclination: body.inclination.unwrap_or(0.0),

        temperature: TemperatureRange {
            min: (avg_temp - 50.0).round(),
            max: (avg_temp + 50.0).round(),
            average: avg_temp.round(),
        },
        // The bodies API carries no composition data.
        atmosphere: Atmosphere {
            composition: Vec::new(),
            pressure: 0.0,
            has_atmosphere: false,
        },
        moons: Moons {
            count: moon_count(body),
            major_moons: moon_names.iter().take(5).cloned().collect(),
            details: (!details.is_empty()).then_some(details),
        },
        images,

        description: catalog::detail_description(planet).to_string(),
        interesting_facts: catalog::interesting_facts(planet),
        discovery_info: DiscoveryInfo {
            discovered_by: body.discovered_by.clone().filter(|s| !s.is_empty()),
            discovery_date: body.discovery_date.clone().filter(|s| !s.is_empty()),
            discovery_method: Some("Observación astronómica".to_string()),
        },
        missions: catalog::missions(planet),
        last_updated: now,
    }
}

fn au(semimajor_axis_km: Option<f64>) -> f64 {
    round_to(semimajor_axis_km.unwrap_or(0.0) / AU_KM, 3)
}

fn relative_mass(body: &Body) -> f64 {
    body.mass
        .as_ref()
        .map(|m| round_to(m.kilograms() / EARTH_MASS_KG, 3))
        .unwrap_or(0.0)
}

fn relative_gravity(body: &Body) -> f64 {
    body.gravity
        .map(|g| round_to(g / EARTH_GRAVITY, 2))
        .unwrap_or(0.0)
}

fn moon_count(body: &Body) -> u32 {
    body.moons
        .as_ref()
        .map(|m| u32::try_from(m.len()).unwrap_or(u32::MAX))
        .unwrap_or(0)
}

fn gallery_caption(title: &str) -> String {
    let name = title.strip_prefix("File:").unwrap_or(title);
    match name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem.to_string(),
        _ => name.to_string(),
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use crate::clients::{MassValue, MoonRef};

    /// Eight bodies shaped like the solar-system API output
    pub fn bodies() -> Vec<Body> {
        Planet::ALL
            .iter()
            .enumerate()
            .map(|(i, planet)| Body {
                id: planet.body_id().to_string(),
                english_name: planet.english_name().to_string(),
                is_planet: true,
                mean_radius: Some(1000.0 * (i as f64 + 1.0)),
                semimajor_axis: Some(AU_KM * (i as f64 + 1.0)),
                mass: Some(MassValue {
                    mass_value: 5.972,
                    mass_exponent: 24,
                }),
                gravity: Some(9.81),
                avg_temp: Some(200.0 + i as f64),
                sideral_rotation: Some(24.0),
                sideral_orbit: Some(365.256),
                moons: (i > 2).then(|| {
                    (0..i)
                        .map(|m| MoonRef {
                            moon: format!("{}-{}", planet.english_name(), m),
                        })
                        .collect()
                }),
                ..Body::default()
            })
            .collect()
    }

    pub fn summaries() -> Vec<PlanetSummary> {
        bodies().iter().map(summarize).collect()
    }
}
