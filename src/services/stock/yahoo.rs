//! Yahoo Finance 行情接口实现
//!
//! 提供实时报价、基本面数据和近一月日线历史
//! 对接 https://query1.finance.yahoo.com 的 chart 和 quoteSummary 接口

use anyhow::anyhow;
use chrono::TimeZone;
use chrono_tz::America::New_York;
use reqwest::Client;
use std::time::Duration;

use crate::models::{PricePoint, RawQuote};
use crate::services::stock::{FetchError, QuoteProvider};

// Yahoo Finance API 常量
const YAHOO_CHART_API: &str = "https://query1.finance.yahoo.com/v8/finance/chart";
const YAHOO_SUMMARY_API: &str = "https://query1.finance.yahoo.com/v10/finance/quoteSummary";
const SUMMARY_MODULES: &str = "summaryDetail,defaultKeyStatistics,assetProfile,price";
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Yahoo Finance 行情数据源
pub struct YahooProvider {
    client: Client,
}

impl YahooProvider {
    /// 创建数据源实例
    ///
    /// # 参数
    /// - timeout: 请求超时时间
    /// - connect_timeout: 连接超时时间
    pub fn new(timeout: Duration, connect_timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(connect_timeout)
            .build()?;
        Ok(Self { client })
    }

    /// 请求 chart 接口：报价快照 + 近一月日线
    async fn get_chart(&self, ticker: &str) -> Result<serde_json::Value, FetchError> {
        let url = format!("{}/{}", YAHOO_CHART_API, ticker);

        let response = self
            .client
            .get(&url)
            .query(&[("range", "1mo"), ("interval", "1d")])
            .header("User-Agent", USER_AGENT)
            .send()
            .await?;

        // Yahoo 对未知代码返回 404
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound(ticker.to_string()));
        }
        if !response.status().is_success() {
            return Err(FetchError::Transient(anyhow!(
                "chart 接口返回异常状态: {}",
                response.status()
            )));
        }

        Ok(response.json().await?)
    }

    /// 请求 quoteSummary 接口：市盈率、市值、公司简介等基本面数据
    async fn get_summary(&self, ticker: &str) -> Result<serde_json::Value, FetchError> {
        let url = format!("{}/{}", YAHOO_SUMMARY_API, ticker);

        let response = self
            .client
            .get(&url)
            .query(&[("modules", SUMMARY_MODULES)])
            .header("User-Agent", USER_AGENT)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(FetchError::Transient(anyhow!(
                "quoteSummary 接口返回异常状态: {}",
                response.status()
            )));
        }

        Ok(response.json().await?)
    }
}

impl QuoteProvider for YahooProvider {
    async fn fetch(&self, ticker: &str) -> Result<RawQuote, FetchError> {
        let chart = self.get_chart(ticker).await?;
        let mut quote = parse_chart(&chart, ticker)?;

        // 基本面数据缺失不算失败：相关字段保持 None，行情本身仍然可用
        match self.get_summary(ticker).await {
            Ok(summary) => merge_summary(&mut quote, &summary),
            Err(e) => log::warn!("获取 {} 基本面数据失败，相关字段置空: {}", ticker, e),
        }

        Ok(quote)
    }
}

/// 读取 Yahoo 的数值字段
///
/// quoteSummary 的数值通常包装为 {"raw": 1.23, "fmt": "1.23"}，
/// chart meta 中则是裸数值，两种形式都兼容
fn raw_f64(value: &serde_json::Value) -> Option<f64> {
    value.as_f64().or_else(|| value["raw"].as_f64())
}

fn raw_u64(value: &serde_json::Value) -> Option<u64> {
    value.as_u64().or_else(|| value["raw"].as_u64())
}

/// 解析 chart 接口响应
///
/// 必须能解析出有效的 symbol，否则视为无效响应（可重试）；
/// 上游明确报告 "Not Found" 时视为代码不存在（不重试）
fn parse_chart(data: &serde_json::Value, ticker: &str) -> Result<RawQuote, FetchError> {
    let chart = &data["chart"];

    let result = match chart["result"].get(0) {
        Some(r) => r,
        None => {
            // 无结果时根据 error.code 区分"代码不存在"和"响应异常"
            let code = chart["error"]["code"].as_str().unwrap_or("");
            if code.eq_ignore_ascii_case("not found") {
                return Err(FetchError::NotFound(ticker.to_string()));
            }
            return Err(FetchError::Transient(anyhow!(
                "chart 响应无有效数据: {}",
                chart["error"]["description"].as_str().unwrap_or("unknown")
            )));
        }
    };

    let meta = &result["meta"];
    if meta["symbol"].as_str().unwrap_or("").is_empty() {
        return Err(FetchError::Transient(anyhow!("chart 响应缺少 symbol 字段")));
    }

    let mut quote = RawQuote {
        long_name: meta["longName"]
            .as_str()
            .or_else(|| meta["shortName"].as_str())
            .map(str::to_string),
        current_price: raw_f64(&meta["regularMarketPrice"]),
        previous_close: raw_f64(&meta["regularMarketPreviousClose"])
            .or_else(|| raw_f64(&meta["chartPreviousClose"])),
        fifty_two_week_high: raw_f64(&meta["fiftyTwoWeekHigh"]),
        fifty_two_week_low: raw_f64(&meta["fiftyTwoWeekLow"]),
        volume: raw_u64(&meta["regularMarketVolume"]),
        currency: meta["currency"].as_str().map(str::to_string),
        ..RawQuote::default()
    };

    quote.price_history = parse_price_history(result);
    Ok(quote)
}

/// 解析日线收盘价历史
///
/// timestamp 与 indicators.quote[0].close 按下标对齐，
/// 停牌日的 close 为 null，直接跳过；日期按美东时区换算并去重
fn parse_price_history(result: &serde_json::Value) -> Vec<PricePoint> {
    let timestamps = match result["timestamp"].as_array() {
        Some(arr) => arr,
        None => return Vec::new(),
    };
    let closes = match result["indicators"]["quote"][0]["close"].as_array() {
        Some(arr) => arr,
        None => return Vec::new(),
    };

    let mut history: Vec<PricePoint> = Vec::with_capacity(timestamps.len());
    for (ts, close) in timestamps.iter().zip(closes.iter()) {
        let (Some(ts), Some(close)) = (ts.as_i64(), close.as_f64()) else {
            continue;
        };
        let Some(dt) = New_York.timestamp_opt(ts, 0).single() else {
            continue;
        };
        let date = dt.date_naive();
        // 同一交易日只保留最后一条（盘中时间戳可能与收盘重复）
        if history.last().map(|p: &PricePoint| p.date) == Some(date) {
            history.pop();
        }
        history.push(PricePoint { date, close });
    }
    history
}

/// 将 quoteSummary 的基本面字段合并进 RawQuote
fn merge_summary(quote: &mut RawQuote, data: &serde_json::Value) {
    let result = &data["quoteSummary"]["result"][0];

    let detail = &result["summaryDetail"];
    let stats = &result["defaultKeyStatistics"];
    let profile = &result["assetProfile"];
    let price = &result["price"];

    quote.pe_ratio = raw_f64(&detail["trailingPE"]);
    quote.forward_pe = raw_f64(&detail["forwardPE"]).or_else(|| raw_f64(&stats["forwardPE"]));
    quote.market_cap = raw_f64(&price["marketCap"]).or_else(|| raw_f64(&detail["marketCap"]));
    quote.eps = raw_f64(&stats["trailingEps"]);
    quote.dividend_yield = raw_f64(&detail["dividendYield"]);
    quote.avg_volume = raw_u64(&detail["averageVolume"]);

    if quote.long_name.is_none() {
        quote.long_name = price["longName"].as_str().map(str::to_string);
    }
    if let Some(summary) = profile["longBusinessSummary"].as_str() {
        quote.business_summary = Some(summary.to_string());
    }
    if quote.fifty_two_week_high.is_none() {
        quote.fifty_two_week_high = raw_f64(&detail["fiftyTwoWeekHigh"]);
    }
    if quote.fifty_two_week_low.is_none() {
        quote.fifty_two_week_low = raw_f64(&detail["fiftyTwoWeekLow"]);
    }
}
