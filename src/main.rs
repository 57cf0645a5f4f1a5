//! Stock Explainer 后端服务
//!
//! 获取股票行情、计算区间表现，并生成面向新手投资者的 AI 解读
//! 数据来源：Yahoo Finance；解读生成：OpenAI（不可用时本地模板兜底）

mod config;     // 配置加载
mod handlers;   // HTTP 请求处理器
mod models;     // 数据模型定义
mod services;   // 业务逻辑服务

use actix_web::{middleware::Logger, web, App, HttpServer};
use env_logger::Env;
use std::time::Duration;

use crate::config::AppConfig;
use crate::handlers::AppState;
use crate::services::narrative_service::NarrativeService;
use crate::services::stock::yahoo::YahooProvider;

/// 应用程序入口
///
/// 加载配置并启动 HTTP 服务器
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let app_config = AppConfig::load();

    // 初始化日志系统，级别来自配置，默认 info
    env_logger::init_from_env(Env::default().default_filter_or(app_config.log.level.as_str()));

    log::info!("启动 Stock Explainer 后端服务");

    let timeout = Duration::from_secs(app_config.api.timeout_secs);
    let connect_timeout = Duration::from_secs(app_config.api.connect_timeout_secs);

    let quotes = YahooProvider::new(timeout, connect_timeout).map_err(std::io::Error::other)?;
    let narrative =
        NarrativeService::new(&app_config.openai, timeout).map_err(std::io::Error::other)?;
    let state = web::Data::new(AppState { quotes, narrative });

    let bind_addr = app_config.bind_addr();
    log::info!("监听地址: {}", bind_addr);

    // 创建并启动 HTTP 服务器
    let mut server = HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())  // 请求日志中间件
            .app_data(state.clone())
            .configure(handlers::config)  // 配置路由
    });

    if app_config.server.workers > 0 {
        server = server.workers(app_config.server.workers);
    }

    server.bind(bind_addr)?.run().await
}
