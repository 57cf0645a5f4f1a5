//! 股票数据装配服务
//!
//! 负责"先实时、后演示数据"的完整装配流程：
//! 带重试地调用实时行情数据源，失败后降级到 Mock 数据，
//! 并把两种来源的数据统一规范化为 StockData

use chrono::{NaiveDate, Utc};
use chrono_tz::America::New_York;
use std::time::Duration;

use crate::models::{RawQuote, StockData};
use crate::services::stock::{mock, performance, FetchError, QuoteProvider};

/// 实时行情最大尝试次数
pub const MAX_RETRIES: u32 = 2;
/// 重试间隔
pub const RETRY_DELAY: Duration = Duration::from_secs(1);

/// 装配流程对外的失败分类
///
/// 只有两种失败会到达调用方：实时和演示数据都无法覆盖的代码（NotFound），
/// 以及装配过程中未预期的内部错误（Internal）。
/// 实时行情的临时故障在流程内部被重试和降级吸收，不会向外传播
#[derive(Debug, thiserror::Error)]
pub enum ExplainError {
    /// 实时与演示数据源均无此代码，终态
    #[error("未找到 {0} 的任何数据")]
    NotFound(String),
    /// 未预期的内部错误
    #[error("处理请求时发生内部错误")]
    Internal(#[from] anyhow::Error),
}

/// 装配状态机的中间状态
///
/// Succeeded / Failed 两个终态直接以函数返回值表达
#[derive(Debug)]
enum AssembleState {
    /// 第 n 次尝试实时行情（n 从 1 开始）
    Attempting(u32),
    /// 实时行情已放弃，降级到演示数据
    FallbackToMock,
}

/// 获取美东时区的当前日期
fn today_eastern() -> NaiveDate {
    Utc::now().with_timezone(&New_York).date_naive()
}

/// 获取指定代码的规范化股票数据
///
/// 流程见 [`get_stock_data_with`]，使用默认的重试间隔与当前日期
pub async fn get_stock_data<P: QuoteProvider>(
    provider: &P,
    ticker: &str,
) -> Result<StockData, ExplainError> {
    get_stock_data_with(provider, ticker, RETRY_DELAY, today_eastern()).await
}

/// 获取规范化股票数据（注入重试间隔与当前日期，便于测试）
///
/// 状态机：
/// - Attempting(n)：调用实时数据源。成功则装配并返回；
///   NotFound 直接降级；临时故障在 n < MAX_RETRIES 时
///   等待固定间隔后进入 Attempting(n+1)，否则降级
/// - FallbackToMock：查询演示数据目录，命中则返回（is_mock = true），
///   未命中则以 NotFound 终止
///
/// 不会返回部分装配的数据：要么完整成功（实时或演示），要么失败
pub async fn get_stock_data_with<P: QuoteProvider>(
    provider: &P,
    ticker: &str,
    retry_delay: Duration,
    now: NaiveDate,
) -> Result<StockData, ExplainError> {
    let mut state = AssembleState::Attempting(1);

    loop {
        state = match state {
            AssembleState::Attempting(n) => match provider.fetch(ticker).await {
                Ok(raw) => return Ok(build_stock_data(ticker, raw, now)),
                Err(FetchError::NotFound(_)) => {
                    log::info!("实时数据源无代码 {}，不再重试", ticker);
                    AssembleState::FallbackToMock
                }
                Err(FetchError::Transient(e)) => {
                    log::warn!(
                        "获取 {} 实时行情失败（第 {}/{} 次）: {}",
                        ticker,
                        n,
                        MAX_RETRIES,
                        e
                    );
                    if n < MAX_RETRIES {
                        tokio::time::sleep(retry_delay).await;
                        AssembleState::Attempting(n + 1)
                    } else {
                        AssembleState::FallbackToMock
                    }
                }
            },
            AssembleState::FallbackToMock => {
                log::info!("{} 实时行情不可用，尝试使用演示数据", ticker);
                return match mock::get_mock_data(ticker) {
                    Some(data) => Ok(data),
                    None => Err(ExplainError::NotFound(ticker.to_uppercase())),
                };
            }
        };
    }
}

/// 将实时行情原始数据规范化为 StockData
///
/// 当日涨跌在 current/previous 任一缺失时保持为 None（不允许补 0），
/// 周/月表现由历史收盘价计算
fn build_stock_data(ticker: &str, raw: RawQuote, now: NaiveDate) -> StockData {
    let ticker = ticker.to_uppercase();

    let (day_change, day_change_percent) = match (raw.current_price, raw.previous_close) {
        (Some(current), Some(previous)) if previous != 0.0 => {
            let change = current - previous;
            (Some(change), Some(change / previous * 100.0))
        }
        _ => (None, None),
    };

    let perf = performance::calculate_performance(&raw.price_history, now);

    StockData {
        company_name: raw.long_name.unwrap_or_else(|| ticker.clone()),
        business_summary: raw
            .business_summary
            .unwrap_or_else(|| "No description available".to_string()),
        ticker,
        current_price: raw.current_price,
        previous_close: raw.previous_close,
        day_change,
        day_change_percent,
        week_performance: perf.week,
        month_performance: perf.month,
        pe_ratio: raw.pe_ratio,
        forward_pe: raw.forward_pe,
        market_cap: raw.market_cap,
        eps: raw.eps,
        dividend_yield: raw.dividend_yield,
        fifty_two_week_high: raw.fifty_two_week_high,
        fifty_two_week_low: raw.fifty_two_week_low,
        volume: raw.volume,
        avg_volume: raw.avg_volume,
        currency: raw.currency.unwrap_or_else(|| "USD".to_string()),
        price_history: raw.price_history,
        is_mock: false,
    }
}
