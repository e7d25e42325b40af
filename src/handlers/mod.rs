/// HTTP request handlers
use crate::domain::{Health, ListQuery, ListResponse, PlanetDetail, PlanetImage, SortOrder};
use crate::errors::ApiError;
use crate::services::PlanetService;
use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub planet_service: Arc<PlanetService>,
}

/// Raw query string of the list endpoint; parsed leniently
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub page: Option<String>,
    pub name: Option<String>,
    pub order: Option<String>,
    pub realtime: Option<String>,
}

impl ListParams {
    pub fn into_query(self) -> ListQuery {
        ListQuery {
            page: self
                .page
                .and_then(|p| p.trim().parse::<u32>().ok())
                .unwrap_or(1)
                .max(1),
            name: self.name.map(|n| n.trim().to_string()).unwrap_or_default(),
            order: self
                .order
                .and_then(|o| o.parse::<SortOrder>().ok())
                .unwrap_or_default(),
            realtime: self.realtime.as_deref() == Some("true"),
        }
    }
}

/// Health check handler
pub async fn health() -> Json<Health> {
    Json(Health {
        status: "ok",
        now: Utc::now(),
    })
}

/// Paginated, filterable planet list
pub async fn list_planets(
    Query(params): Query<ListParams>,
    State(state): State<AppState>,
) -> Result<Json<ListResponse>, ApiError> {
    let query = params.into_query();
    let page = state.planet_service.list(&query).await?;
    Ok(Json(page))
}

/// Full planet details
pub async fn get_planet(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<PlanetDetail>, ApiError> {
    let detail = state.planet_service.detail(&id).await?;
    Ok(Json(detail))
}

/// Planet lead image
pub async fn get_planet_image(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<PlanetImage>, ApiError> {
    let image = state.planet_service.image(&id).await?;
    Ok(Json(image))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_params_defaults() {
        let query = ListParams::default().into_query();
        assert_eq!(query, ListQuery::default());
    }

    #[test]
    fn test_list_params_lenient_parsing() {
        let query = ListParams {
            page: Some("abc".into()),
            name: Some("  mar ".into()),
            order: Some("DESC".into()),
            realtime: Some("yes".into()),
        }
        .into_query();
        assert_eq!(query.page, 1);
        assert_eq!(query.name, "mar");
        assert_eq!(query.order, SortOrder::Desc);
        assert!(!query.realtime);
    }

    #[test]
    fn test_list_params_keeps_large_pages() {
        let query = ListParams {
            page: Some("9".into()),
            realtime: Some("true".into()),
            ..ListParams::default()
        }
        .into_query();
        assert_eq!(query.page, 9);
        assert!(query.realtime);
    }
}
