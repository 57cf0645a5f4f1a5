//! 响应格式化
//!
//! 数值展示格式化与最终响应文档装配，均为纯函数

use crate::models::{ExplainResponse, StockData};

/// 演示数据的用户提示
const MOCK_NOTE: &str = "Note: Using demonstration data due to API rate limiting. \
    The analysis is still educational but based on sample data.";

/// 将市值换算为可读字符串
///
/// 边界值划入更大的单位（恰好 1e12 显示为 Trillion），
/// 不足百万时显示千分位分组的美元金额，缺失为 "N/A"
pub fn format_market_cap(market_cap: Option<f64>) -> String {
    let value = match market_cap {
        Some(v) => v,
        None => return "N/A".to_string(),
    };

    if value >= 1e12 {
        format!("${:.2} Trillion", value / 1e12)
    } else if value >= 1e9 {
        format!("${:.2} Billion", value / 1e9)
    } else if value >= 1e6 {
        format!("${:.2} Million", value / 1e6)
    } else {
        format!("${}", group_thousands(value))
    }
}

/// 格式化数值：千分位分组、两位小数，缺失为 "N/A"
pub fn format_number(value: Option<f64>) -> String {
    match value {
        Some(v) => group_thousands(v),
        None => "N/A".to_string(),
    }
}

/// 千分位分组的两位小数字符串
fn group_thousands(value: f64) -> String {
    let formatted = format!("{:.2}", value.abs());
    // "{:.2}" 输出必然包含小数点
    let (int_part, frac_part) = formatted.split_once('.').unwrap_or((&formatted, "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    let sign = if value < 0.0 { "-" } else { "" };
    format!("{}{}.{}", sign, grouped, frac_part)
}

/// 装配最终响应文档
///
/// 市值在此处换算为可读字符串，其余字段原样透传；
/// 演示数据时附加用户提示
pub fn build_response(stock: StockData, explanation: String) -> ExplainResponse {
    let note = stock.is_mock.then(|| MOCK_NOTE.to_string());

    ExplainResponse {
        ticker: stock.ticker,
        company_name: stock.company_name,
        current_price: stock.current_price,
        day_change: stock.day_change,
        day_change_percent: stock.day_change_percent,
        week_performance: stock.week_performance,
        month_performance: stock.month_performance,
        pe_ratio: stock.pe_ratio,
        market_cap: format_market_cap(stock.market_cap),
        fifty_two_week_high: stock.fifty_two_week_high,
        fifty_two_week_low: stock.fifty_two_week_low,
        price_history: stock.price_history,
        explanation,
        is_mock: stock.is_mock,
        note,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::stock::mock;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// 测试市值单位换算与边界值（边界划入更大的单位）
    #[test]
    fn test_format_market_cap_units() {
        assert_eq!(format_market_cap(Some(2.85e12)), "$2.85 Trillion");
        assert_eq!(format_market_cap(Some(1e12)), "$1.00 Trillion");
        assert_eq!(format_market_cap(Some(780e9)), "$780.00 Billion");
        assert_eq!(format_market_cap(Some(1e9)), "$1.00 Billion");
        assert_eq!(format_market_cap(Some(1e6)), "$1.00 Million");
        assert_eq!(format_market_cap(Some(999_999.0)), "$999,999.00");
        assert_eq!(format_market_cap(None), "N/A");
    }

    /// 测试千分位分组
    #[test]
    fn test_group_thousands() {
        assert_eq!(format_number(Some(1234567.891)), "1,234,567.89");
        assert_eq!(format_number(Some(182.5)), "182.50");
        assert_eq!(format_number(Some(-1234.5)), "-1,234.50");
        assert_eq!(format_number(Some(0.0)), "0.00");
        assert_eq!(format_number(None), "N/A");
    }

    /// 测试演示数据响应附带用户提示
    #[test]
    fn test_build_response_mock_note() {
        let mut rng = StdRng::seed_from_u64(1);
        let stock = mock::get_mock_data_with("AAPL", &mut rng, "2024-06-28".parse().unwrap())
            .unwrap();

        let response = build_response(stock, "An explanation.".to_string());

        assert!(response.is_mock);
        assert_eq!(response.market_cap, "$2.85 Trillion");
        assert_eq!(response.price_history.len(), 30);
        assert!(response.note.as_deref().unwrap().contains("demonstration data"));
    }

    /// 测试实时数据响应不带提示
    #[test]
    fn test_build_response_live_has_no_note() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut stock = mock::get_mock_data_with("MSFT", &mut rng, "2024-06-28".parse().unwrap())
            .unwrap();
        stock.is_mock = false;

        let response = build_response(stock, "An explanation.".to_string());
        assert!(!response.is_mock);
        assert!(response.note.is_none());
    }
}
