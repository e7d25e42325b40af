/// Domain models shared by the API server and the client stores
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Planet row as returned by the list endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanetSummary {
    pub id: String,
    pub name: String,
    #[serde(rename = "nameES")]
    pub localized_name: String,
    /// Diameter in km
    pub size: f64,
    /// Semi-major axis in AU
    pub distance_from_sun: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_from_earth: Option<f64>,
    /// Mass relative to Earth
    pub mass: f64,
    /// Surface gravity relative to Earth
    pub gravity: f64,
    /// Average temperature in Kelvin
    pub temperature: f64,
    /// Sidereal rotation in hours
    pub day_length: f64,
    /// Sidereal orbit in days
    pub year_length: f64,
    pub moons: u32,
    pub image_url: Option<String>,
    pub image_width: Option<u32>,
    pub image_height: Option<u32>,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discovery_date: Option<String>,
    #[serde(default)]
    pub atmosphere: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemperatureRange {
    pub min: f64,
    pub max: f64,
    pub average: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Atmosphere {
    pub composition: Vec<String>,
    pub pressure: f64,
    pub has_atmosphere: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoonDetail {
    pub name: String,
    pub diameter: f64,
    pub distance_from_planet: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Moons {
    pub count: u32,
    pub major_moons: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<MoonDetail>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MainImage {
    pub url: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub caption: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GalleryImage {
    pub url: String,
    pub caption: String,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanetImages {
    pub main: MainImage,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gallery: Option<Vec<GalleryImage>>,
}

impl PlanetImages {
    pub fn empty(caption: String) -> Self {
        Self {
            main: MainImage {
                url: None,
                width: None,
                height: None,
                caption,
            },
            gallery: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveryInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discovered_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discovery_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discovery_method: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissionStatus {
    Completed,
    Active,
    Planned,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissionKind {
    Flyby,
    Orbiter,
    Lander,
    Rover,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mission {
    pub name: String,
    pub agency: String,
    pub launch_date: String,
    pub status: MissionStatus,
    #[serde(rename = "type")]
    pub kind: MissionKind,
}

/// Full planet record for the detail page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanetDetail {
    pub id: String,
    pub name: String,
    #[serde(rename = "nameES")]
    pub localized_name: String,

    pub size: f64,
    pub mass: f64,
    pub density: f64,
    pub gravity: f64,
    pub escape_velocity: f64,

    pub distance_from_sun: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_from_earth: Option<f64>,
    pub orbital_period: f64,
    pub rotation_period: f64,
    pub eccentricity: f64,
    pub inclination: f64,

    pub temperature: TemperatureRange,
    pub atmosphere: Atmosphere,
    pub moons: Moons,
    pub images: PlanetImages,

    pub description: String,
    pub interesting_facts: Vec<String>,
    pub discovery_info: DiscoveryInfo,
    pub missions: Vec<Mission>,
    pub last_updated: DateTime<Utc>,
}

/// Pagination metadata derived from a list response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current_page: u32,
    pub total_pages: u32,
    pub has_more: bool,
    pub total_items: u32,
    pub items_per_page: u32,
}

impl Pagination {
    /// Compute pagination for `total_items` split into pages of `items_per_page`.
    pub fn new(current_page: u32, total_items: u32, items_per_page: u32) -> Self {
        let per_page = items_per_page.max(1);
        let total_pages = total_items.div_ceil(per_page);
        Self {
            current_page,
            total_pages,
            has_more: current_page < total_pages,
            total_items,
            items_per_page: per_page,
        }
    }

    /// Safe state shown while nothing (or an error) is loaded
    pub fn fallback(items_per_page: u32) -> Self {
        Self {
            current_page: 1,
            total_pages: 1,
            has_more: false,
            total_items: 0,
            items_per_page,
        }
    }
}

/// Body of a successful list response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListResponse {
    pub data: Vec<PlanetSummary>,
    pub pagination: Pagination,
}

/// Body of a successful image response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanetImage {
    pub title: String,
    pub image_url: String,
    pub width: u32,
    pub height: u32,
}

/// Sort order over localized names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn toggled(self) -> Self {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            other => Err(format!("unknown sort order: {other}")),
        }
    }
}

/// Parameters of one list query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListQuery {
    pub page: u32,
    pub name: String,
    pub order: SortOrder,
    pub realtime: bool,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page: 1,
            name: String::new(),
            order: SortOrder::Asc,
            realtime: false,
        }
    }
}

/// Health check response
#[derive(Serialize)]
pub struct Health {
    pub status: &'static str,
    pub now: DateTime<Utc>,
}
