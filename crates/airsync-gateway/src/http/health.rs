/// GET /: liveness check. Succeeds whenever the process is serving.
pub async fn liveness_handler() -> &'static str {
    "Air sensor sync service is running"
}
