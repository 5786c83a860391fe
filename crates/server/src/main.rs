/// Node Metrics API - Server
///
/// 后端服务器主程序，抓取 node_exporter 指标并提供利用率查询 API

mod api;
mod app_state;
mod config;
mod metrics;
mod services;

use axum::{
    http::{header, HeaderName, Method},
    routing::get,
    Router,
};
use std::net::SocketAddr;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

use crate::{app_state::AppState, metrics::ExporterClient};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载环境变量
    dotenvy::dotenv().ok();

    // 加载配置
    let cfg = config::Config::from_env()?;

    // 初始化日志
    // 可以通过环境变量 RUST_LOG 设置日志级别，例如：
    // RUST_LOG=debug cargo run
    tracing_subscriber::fmt()
        .with_target(false)
        .with_thread_ids(true)
        .with_line_number(true)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cfg.log_level)),
        )
        .init();

    info!("🚀 启动 Node Metrics API Server...");
    info!("✅ 配置加载成功");

    // 初始化上游客户端
    let exporter = ExporterClient::new(&cfg.exporter_url, cfg.fetch_timeout_secs);
    info!("📊 上游 node_exporter: {}", cfg.exporter_url);

    // 创建应用状态
    let app_state = AppState::new(exporter);

    // 设置 CORS：允许任意来源
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::ORIGIN,
            HeaderName::from_static("x-requested-with"),
            header::CONTENT_TYPE,
            header::ACCEPT,
        ]);

    // 构建应用路由
    let app = Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .merge(api::api_routes())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state);

    // 启动服务器
    let addr = SocketAddr::from(([0, 0, 0, 0], cfg.server_port));
    info!("🎯 服务器监听在 http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn root_handler() -> &'static str {
    "Welcome to the metrics API! Visit /metrics for metrics regarding CPU and MEMORY usage!"
}

async fn health_handler() -> &'static str {
    "OK"
}
