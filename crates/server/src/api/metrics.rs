/// 利用率查询接口

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use tracing::error;

use common::models::UtilizationResult;

use crate::{app_state::AppState, services::metrics_service::MetricsService};

/// 错误响应
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// 查询当前 CPU 与内存使用率
///
/// 任何失败（上游不可达、超时、非 2xx）统一返回 500 和固定错误体，
/// 不向调用方区分具体原因；两个百分比要么一起返回要么都不返回
pub async fn get_metrics(
    State(state): State<AppState>,
) -> Result<Json<UtilizationResult>, (StatusCode, Json<ErrorResponse>)> {
    let service = MetricsService::new(state);
    match service.collect().await {
        Ok(result) => Ok(Json(result)),
        Err(e) => {
            error!("采集指标失败: {}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to fetch metrics".to_string(),
                }),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_body_shape() {
        let body = ErrorResponse {
            error: "Failed to fetch metrics".to_string(),
        };
        let json = serde_json::to_string(&body).unwrap();
        assert_eq!(json, r#"{"error":"Failed to fetch metrics"}"#);
    }
}
