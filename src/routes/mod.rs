/// Application routes configuration
use crate::handlers::{get_planet, get_planet_image, health, list_planets, AppState};
use axum::{routing::get, Router};

/// Build the application router with all routes
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health))
        // Planet endpoints
        .route("/api/planets", get(list_planets))
        .route("/api/planets/:id", get(get_planet))
        .route("/api/planets/:id/image", get(get_planet_image))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::errors::ErrorResponse;
    use crate::services::PlanetService;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn offline_router() -> Router {
        let service = PlanetService::new(&AppConfig::offline()).unwrap();
        build_router(AppState {
            planet_service: Arc::new(service),
        })
    }

    async fn get(router: Router, uri: &str) -> (StatusCode, Vec<u8>) {
        let resp = router
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, bytes.to_vec())
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = get(offline_router(), "/health").await;
        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "ok");
    }

    #[tokio::test]
    async fn test_image_for_pluto_is_400_listing_planets() {
        let (status, body) = get(offline_router(), "/api/planets/pluto/image").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let err: ErrorResponse = serde_json::from_slice(&body).unwrap();
        for name in [
            "mercury", "venus", "earth", "mars", "jupiter", "saturn", "uranus", "neptune",
        ] {
            assert!(err.error.contains(name), "{}", err.error);
        }
    }

    #[tokio::test]
    async fn test_detail_for_unknown_planet_is_400() {
        let (status, _) = get(offline_router(), "/api/planets/vulcan").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_upstream_outage_is_reported_as_json_error() {
        let (status, body) = get(offline_router(), "/api/planets?page=1").await;
        assert!(status.is_server_error());
        let err: ErrorResponse = serde_json::from_slice(&body).unwrap();
        assert!(err.error.starts_with("Connection error"), "{}", err.error);
    }
}
