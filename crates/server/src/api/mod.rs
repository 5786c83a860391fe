pub mod metrics;

use axum::{routing::get, Router};

use crate::app_state::AppState;

/// 所有 API 路由（统一入口）
pub fn api_routes() -> Router<AppState> {
    Router::new().route("/metrics", get(metrics::get_metrics))
}
