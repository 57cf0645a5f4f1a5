//! 通用 API 响应模型
//!
//! 定义统一的 API 响应格式以及 explain 接口的请求/响应结构

use chrono::Utc;
use chrono_tz::America::New_York;
use serde::{Deserialize, Serialize};

use crate::models::PricePoint;

/// 获取美东时间（美股交易时区）
fn get_eastern_time() -> chrono::DateTime<chrono_tz::Tz> {
    Utc::now().with_timezone(&New_York)
}

/// 统一 API 响应结构
///
/// 所有接口返回统一格式，包含：
/// - success: 请求是否成功
/// - data: 响应数据（成功时有值）
/// - message: 响应消息
/// - timestamp: 响应时间戳（美东时间）
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// 请求是否成功
    pub success: bool,
    /// 响应数据
    pub data: Option<T>,
    /// 响应消息
    pub message: String,
    /// 响应时间戳（ISO 8601 格式）
    pub timestamp: String,
}

impl<T> ApiResponse<T> {
    /// 创建成功响应
    ///
    /// # 参数
    /// - data: 响应数据
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: "Success".to_string(),
            timestamp: get_eastern_time().to_rfc3339(),
        }
    }

    /// 创建错误响应
    ///
    /// # 参数
    /// - message: 错误信息
    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            message,
            timestamp: get_eastern_time().to_rfc3339(),
        }
    }
}

/// explain 接口请求体
#[derive(Debug, Deserialize)]
pub struct ExplainRequest {
    /// 股票代码，大小写不敏感，前后空白会被去除
    pub ticker: String,
}

/// explain 接口响应文档
///
/// 面向前端的最终结构：行情摘要 + AI 解读文本。
/// market_cap 在这里已经换算为可读字符串（如 "$2.85 Trillion"），
/// 其余数值字段保持原始数值，缺失为 null
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExplainResponse {
    /// 股票代码（大写）
    pub ticker: String,
    /// 公司名称
    pub company_name: String,
    /// 当前价格
    pub current_price: Option<f64>,
    /// 当日涨跌额
    pub day_change: Option<f64>,
    /// 当日涨跌幅（百分比）
    pub day_change_percent: Option<f64>,
    /// 近一周表现
    pub week_performance: String,
    /// 近一月表现
    pub month_performance: String,
    /// 市盈率（TTM）
    pub pe_ratio: Option<f64>,
    /// 市值（已格式化的可读字符串，缺失为 "N/A"）
    pub market_cap: String,
    /// 52周最高价
    pub fifty_two_week_high: Option<f64>,
    /// 52周最低价
    pub fifty_two_week_low: Option<f64>,
    /// 日线收盘价历史
    pub price_history: Vec<PricePoint>,
    /// AI 生成的解读文本
    pub explanation: String,
    /// 是否为演示数据
    pub is_mock: bool,
    /// 演示数据提示（仅 is_mock 为 true 时存在）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}
