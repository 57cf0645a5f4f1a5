//! AI 解读生成服务
//!
//! 基于规范化的股票数据构造提示词，调用 OpenAI Chat Completions
//! 生成面向新手投资者的解读文本。外部服务不可用时使用本地模板兜底，
//! 该兜底路径永不失败，因此 explain 对调用方而言总是成功

use anyhow::{anyhow, bail, Result};
use reqwest::Client;
use serde_json::json;
use std::time::Duration;

use crate::config::OpenAiConfig;
use crate::models::StockData;
use crate::services::formatter::{format_market_cap, format_number};

const OPENAI_CHAT_API: &str = "https://api.openai.com/v1/chat/completions";

/// 固定的系统角色设定
const SYSTEM_PERSONA: &str =
    "You are a friendly financial educator who explains stocks in simple terms.";

/// AI 解读生成服务
///
/// 持有 HTTP 客户端与生成参数，进程级共享、只读
pub struct NarrativeService {
    client: Client,
    api_key: String,
    model: String,
    max_tokens: u32,
    temperature: f64,
}

impl NarrativeService {
    /// 根据配置创建服务实例
    pub fn new(config: &OpenAiConfig, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        })
    }

    /// 生成解读文本
    ///
    /// 单次阻塞式调用，不重试。任何失败（未配置 Key、超时、配额、
    /// 响应格式异常）都降级到本地模板，不向调用方传播错误
    pub async fn explain(&self, stock: &StockData) -> String {
        match self.generate(stock).await {
            Ok(text) => text,
            Err(e) => {
                log::warn!("AI 解读生成失败，使用本地模板: {}", e);
                fallback_explanation(stock)
            }
        }
    }

    /// 调用 OpenAI Chat Completions
    async fn generate(&self, stock: &StockData) -> Result<String> {
        if self.api_key.is_empty() {
            bail!("未配置 OpenAI API Key");
        }

        let body = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": SYSTEM_PERSONA },
                { "role": "user", "content": build_prompt(stock) }
            ],
            "temperature": self.temperature,
            "max_tokens": self.max_tokens,
        });

        let response = self
            .client
            .post(OPENAI_CHAT_API)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            bail!("OpenAI 接口返回异常状态: {}", response.status());
        }

        let data: serde_json::Value = response.json().await?;
        data["choices"][0]["message"]["content"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| anyhow!("OpenAI 响应缺少生成内容"))
    }
}

/// 按字符数截断文本（避免在 UTF-8 字节边界截断）
fn truncate_chars(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

/// 构造提示词
///
/// 嵌入行情摘要（缺失字段显示 "N/A"），业务简介截断到 500 字符；
/// 演示数据时追加免责声明，提示分析基于示例数据
fn build_prompt(stock: &StockData) -> String {
    let disclaimer = if stock.is_mock {
        "\n\nNote: Due to API rate limiting, this analysis is based on demonstration data."
    } else {
        ""
    };

    let day_change = match stock.day_change_percent {
        Some(percent) => format!("{:.2}%", percent),
        None => "N/A".to_string(),
    };

    format!(
        "You are a financial analyst assistant. Explain the following stock to a beginner investor in a conversational, easy-to-understand way:\n\
        \n\
        Ticker: {ticker}\n\
        Company Name: {name}\n\
        Company Summary: {summary}...\n\
        \n\
        Current Price: ${price}\n\
        Day Change: {day_change}\n\
        Past Week Performance: {week}\n\
        Past Month Performance: {month}\n\
        \n\
        P/E Ratio: {pe}\n\
        Forward P/E: {forward_pe}\n\
        Market Cap: {market_cap}\n\
        EPS: ${eps}\n\
        52-Week Range: ${low} - ${high}\n\
        \n\
        Provide:\n\
        1. A brief, simple explanation of what the company does (2-3 sentences)\n\
        2. How the stock has been performing recently and what that means\n\
        3. Whether the stock appears expensive or cheap based on its P/E ratio (explain what P/E means simply)\n\
        4. A balanced view with one bullish case and one bearish case\n\
        5. End with a reminder that this is for educational purposes only{disclaimer}\n\
        \n\
        Keep the entire response under 250 words and make it sound like you're explaining to a friend who's new to investing.",
        ticker = stock.ticker,
        name = stock.company_name,
        summary = truncate_chars(&stock.business_summary, 500),
        price = format_number(stock.current_price),
        day_change = day_change,
        week = stock.week_performance,
        month = stock.month_performance,
        pe = format_number(stock.pe_ratio),
        forward_pe = format_number(stock.forward_pe),
        market_cap = format_market_cap(stock.market_cap),
        eps = format_number(stock.eps),
        low = format_number(stock.fifty_two_week_low),
        high = format_number(stock.fifty_two_week_high),
        disclaimer = disclaimer,
    )
}

/// 本地兜底解读模板
///
/// 确定性纯函数，永不失败：公司名、代码、200 字符简介摘录、
/// 价格/市值/市盈率、市盈率科普与教育用途免责声明
fn fallback_explanation(stock: &StockData) -> String {
    format!(
        "**{name} ({ticker})**\n\
        \n\
        {summary}...\n\
        \n\
        Current Price: ${price}\n\
        Market Cap: {market_cap}\n\
        P/E Ratio: {pe}\n\
        \n\
        The P/E (Price-to-Earnings) ratio helps investors understand if a stock is expensive or cheap \
        relative to its earnings. A higher P/E might mean investors expect growth, while a lower P/E \
        could indicate a value opportunity or concerns about the company.\n\
        \n\
        ⚠️ This information is for educational purposes only and should not be considered investment \
        advice. Always do your own research and consult with financial professionals before making \
        investment decisions.",
        name = stock.company_name,
        ticker = stock.ticker,
        summary = truncate_chars(&stock.business_summary, 200),
        price = format_number(stock.current_price),
        market_cap = format_market_cap(stock.market_cap),
        pe = format_number(stock.pe_ratio),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PricePoint;

    fn sample_stock(is_mock: bool) -> StockData {
        StockData {
            ticker: "AAPL".to_string(),
            company_name: "Apple Inc.".to_string(),
            business_summary: "Apple Inc. designs, manufactures, and markets smartphones."
                .to_string(),
            current_price: Some(182.5),
            previous_close: Some(180.15),
            day_change: Some(2.35),
            day_change_percent: Some(1.3),
            week_performance: "+3.45%".to_string(),
            month_performance: "-1.20%".to_string(),
            pe_ratio: Some(30.5),
            forward_pe: Some(27.45),
            market_cap: Some(2.85e12),
            eps: Some(6.0),
            dividend_yield: Some(0.0055),
            fifty_two_week_high: Some(198.23),
            fifty_two_week_low: Some(164.08),
            volume: Some(51_234_567),
            avg_volume: Some(58_000_000),
            currency: "USD".to_string(),
            price_history: vec![PricePoint {
                date: "2024-06-27".parse().unwrap(),
                close: 182.5,
            }],
            is_mock,
        }
    }

    /// 测试提示词包含关键行情字段
    #[test]
    fn test_build_prompt_embeds_fields() {
        let prompt = build_prompt(&sample_stock(false));

        assert!(prompt.contains("Ticker: AAPL"));
        assert!(prompt.contains("Company Name: Apple Inc."));
        assert!(prompt.contains("Current Price: $182.50"));
        assert!(prompt.contains("Past Week Performance: +3.45%"));
        assert!(prompt.contains("Market Cap: $2.85 Trillion"));
        assert!(!prompt.contains("demonstration data"));
    }

    /// 测试演示数据时提示词追加免责声明
    #[test]
    fn test_build_prompt_mock_disclaimer() {
        let prompt = build_prompt(&sample_stock(true));
        assert!(prompt.contains("this analysis is based on demonstration data"));
    }

    /// 测试缺失字段在提示词中显示为 N/A 而非 0
    #[test]
    fn test_build_prompt_null_fields() {
        let mut stock = sample_stock(false);
        stock.pe_ratio = None;
        stock.day_change_percent = None;

        let prompt = build_prompt(&stock);
        assert!(prompt.contains("P/E Ratio: N/A"));
        assert!(prompt.contains("Day Change: N/A"));
        assert!(!prompt.contains("P/E Ratio: 0"));
    }

    /// 测试兜底模板包含代码与公司名且非空
    #[test]
    fn test_fallback_contains_identity() {
        let text = fallback_explanation(&sample_stock(false));

        assert!(!text.is_empty());
        assert!(text.contains("AAPL"));
        assert!(text.contains("Apple Inc."));
        assert!(text.contains("educational purposes only"));
    }

    /// 测试外部服务不可用（未配置 Key）时 explain 降级且不报错
    #[tokio::test]
    async fn test_explain_falls_back_without_api_key() {
        let config = OpenAiConfig {
            api_key: String::new(),
            ..OpenAiConfig::default()
        };
        let service = NarrativeService::new(&config, Duration::from_secs(5)).unwrap();

        let text = service.explain(&sample_stock(true)).await;
        assert!(text.contains("AAPL"));
        assert!(text.contains("Apple Inc."));
    }

    /// 测试按字符截断不会落在多字节字符中间
    #[test]
    fn test_truncate_chars_utf8_safe() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("short", 200), "short");
    }
}
