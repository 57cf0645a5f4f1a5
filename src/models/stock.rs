//! 股票数据模型
//!
//! 定义股票相关的数据结构

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 单日收盘价
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricePoint {
    /// 交易日（YYYY-MM-DD）
    pub date: NaiveDate,
    /// 收盘价
    pub close: f64,
}

/// 规范化的股票数据记录
///
/// 由 stock_service 装配，无论数据来自实时行情还是 Mock 数据，
/// 字段含义完全一致。上游缺失的数值字段保持为 None，
/// 下游格式化时显示为 "N/A"，不允许用 0 代替缺失值。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockData {
    /// 股票代码（大写）
    pub ticker: String,
    /// 公司名称
    pub company_name: String,
    /// 公司业务简介
    pub business_summary: String,
    /// 当前价格
    pub current_price: Option<f64>,
    /// 昨日收盘价
    pub previous_close: Option<f64>,
    /// 当日涨跌额（current - previous，任一缺失则为 None）
    pub day_change: Option<f64>,
    /// 当日涨跌幅（百分比）
    pub day_change_percent: Option<f64>,
    /// 近一周表现，带符号百分比字符串或 "N/A"
    pub week_performance: String,
    /// 近一月表现，带符号百分比字符串或 "N/A"
    pub month_performance: String,
    /// 市盈率（TTM）
    pub pe_ratio: Option<f64>,
    /// 预期市盈率
    pub forward_pe: Option<f64>,
    /// 市值（原始数值，展示时再做单位换算）
    pub market_cap: Option<f64>,
    /// 每股收益
    pub eps: Option<f64>,
    /// 股息率
    pub dividend_yield: Option<f64>,
    /// 52周最高价
    pub fifty_two_week_high: Option<f64>,
    /// 52周最低价
    pub fifty_two_week_low: Option<f64>,
    /// 成交量
    pub volume: Option<u64>,
    /// 平均成交量
    pub avg_volume: Option<u64>,
    /// 计价货币，默认 USD
    pub currency: String,
    /// 日线收盘价历史，按日期升序
    pub price_history: Vec<PricePoint>,
    /// 是否为演示数据
    pub is_mock: bool,
}

/// 实时行情原始数据
///
/// 从上游接口解析出的未规范化字段集合，
/// 上游未提供的字段保持为 None
#[derive(Debug, Clone, Default)]
pub struct RawQuote {
    /// 公司名称
    pub long_name: Option<String>,
    /// 公司业务简介
    pub business_summary: Option<String>,
    /// 当前价格
    pub current_price: Option<f64>,
    /// 昨日收盘价
    pub previous_close: Option<f64>,
    /// 市盈率（TTM）
    pub pe_ratio: Option<f64>,
    /// 预期市盈率
    pub forward_pe: Option<f64>,
    /// 市值
    pub market_cap: Option<f64>,
    /// 每股收益
    pub eps: Option<f64>,
    /// 股息率
    pub dividend_yield: Option<f64>,
    /// 52周最高价
    pub fifty_two_week_high: Option<f64>,
    /// 52周最低价
    pub fifty_two_week_low: Option<f64>,
    /// 成交量
    pub volume: Option<u64>,
    /// 平均成交量
    pub avg_volume: Option<u64>,
    /// 计价货币
    pub currency: Option<String>,
    /// 近一月日线收盘价历史，按日期升序
    pub price_history: Vec<PricePoint>,
}

/// Mock 数据公司档案模板
///
/// 固定目录中每只股票的基准数据，
/// 实时数据源不可用时据此合成演示数据集
#[derive(Debug, Clone, Copy)]
pub struct MockProfile {
    /// 公司名称
    pub name: &'static str,
    /// 基准价格
    pub price: f64,
    /// 当日涨跌额
    pub change: f64,
    /// 当日涨跌幅（百分比）
    pub change_percent: f64,
    /// 市盈率
    pub pe: f64,
    /// 市值
    pub market_cap: f64,
    /// 52周最高价
    pub high_52: f64,
    /// 52周最低价
    pub low_52: f64,
    /// 公司业务简介
    pub summary: &'static str,
}
