pub mod health;
pub mod stock;

use actix_web::web;

use crate::services::narrative_service::NarrativeService;
use crate::services::stock::yahoo::YahooProvider;

/// 进程级共享的只读依赖
///
/// 每个请求的装配流程相互独立，这里只共享配置好的客户端，
/// 不存在跨请求的可变状态
pub struct AppState {
    /// 实时行情数据源
    pub quotes: YahooProvider,
    /// AI 解读生成服务
    pub narrative: NarrativeService,
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(health::config)
            .configure(stock::config)
    );
}
