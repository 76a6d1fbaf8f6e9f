use airsync_core::LatestReading;
use axum::{routing::get, Router};
use std::sync::Arc;

/// Shared state passed as Arc<AppState> to the Axum handlers.
pub struct AppState {
    pub latest: LatestReading,
}

impl AppState {
    pub fn new(latest: LatestReading) -> Self {
        Self { latest }
    }
}

/// Assemble the status router.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(crate::http::health::liveness_handler))
        .route("/latest-data", get(crate::http::latest::latest_handler))
        .with_state(state)
        .layer(tower_http::trace::TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use super::*;
    use airsync_core::SensorReading;
    use airsync_scheduler::WriterJob;
    use airsync_store::MemoryPrimaryStore;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    fn router() -> (Router, LatestReading) {
        let latest = LatestReading::new();
        (build_router(Arc::new(AppState::new(latest.clone()))), latest)
    }

    async fn get(router: Router, uri: &str) -> (StatusCode, Vec<u8>) {
        let response = router
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, body.to_vec())
    }

    #[tokio::test]
    async fn root_is_always_ok() {
        let (router, _) = router();
        let (status, body) = get(router, "/").await;
        assert_eq!(status, StatusCode::OK);
        assert!(String::from_utf8(body).unwrap().contains("running"));
    }

    #[tokio::test]
    async fn latest_is_no_content_before_first_write() {
        let (router, _) = router();
        let (status, _) = get(router, "/latest-data").await;
        assert_eq!(status, StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn latest_returns_the_reading_stored_by_one_writer_tick() {
        let (router, latest) = router();
        let store = Arc::new(MemoryPrimaryStore::new());
        let writer = WriterJob::new(store.clone(), latest);

        let stored = writer.write_once().await.unwrap();

        let (status, body) = get(router, "/latest-data").await;
        assert_eq!(status, StatusCode::OK);
        let returned: SensorReading = serde_json::from_slice(&body).unwrap();
        assert_eq!(returned, stored);
        assert_eq!(store.rows(), vec![returned]);
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() {
        let (router, _) = router();
        let (status, _) = get(router, "/api").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
