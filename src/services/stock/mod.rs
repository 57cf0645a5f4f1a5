//! 股票数据服务模块
//!
//! 提供实时行情获取、Mock 数据合成和区间表现计算

pub mod mock;
pub mod performance;
pub mod yahoo;

use crate::models::RawQuote;

/// 实时行情获取失败分类
///
/// NotFound 表示上游确认无此代码，不应重试；
/// Transient 表示网络错误、响应格式异常等临时故障，可在重试预算内重试
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// 上游无此股票代码
    #[error("未找到股票代码: {0}")]
    NotFound(String),
    /// 临时故障，可重试
    #[error("行情获取临时故障: {0}")]
    Transient(#[source] anyhow::Error),
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        FetchError::Transient(e.into())
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(e: serde_json::Error) -> Self {
        FetchError::Transient(e.into())
    }
}

/// 实时行情数据源接口
///
/// 抽象为 trait 以便测试时用桩实现替换真实数据源
pub trait QuoteProvider {
    /// 获取指定股票的行情快照与近一月日线历史
    fn fetch(
        &self,
        ticker: &str,
    ) -> impl std::future::Future<Output = Result<RawQuote, FetchError>> + Send;
}
