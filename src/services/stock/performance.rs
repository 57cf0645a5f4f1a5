//! 区间表现计算
//!
//! 根据日线收盘价历史计算近一周/近一月的涨跌幅

use chrono::{Duration, NaiveDate};

use crate::models::PricePoint;

/// 区间表现计算结果
///
/// 每个区间为带符号的百分比字符串（如 "+3.45%"），
/// 数据不足时为 "N/A"
#[derive(Debug, Clone, PartialEq)]
pub struct Performance {
    /// 近一周（7个自然日）
    pub week: String,
    /// 近一月（30个自然日）
    pub month: String,
}

impl Performance {
    /// 两个区间均无数据
    pub fn unavailable() -> Self {
        Self {
            week: "N/A".to_string(),
            month: "N/A".to_string(),
        }
    }
}

/// 计算近一周/近一月涨跌幅
///
/// 纯函数：结果只取决于 history 和 now 两个输入，now 由调用方注入以便测试。
/// 约定 history 按日期升序。单个区间内不足 2 条记录时该区间为 "N/A"；
/// 否则以区间内最早一条的收盘价为起点，
/// 涨跌幅 = (最新收盘价 - 起点价) / 起点价 * 100
pub fn calculate_performance(history: &[PricePoint], now: NaiveDate) -> Performance {
    let current_price = match history.last() {
        Some(point) => point.close,
        None => return Performance::unavailable(),
    };

    Performance {
        week: horizon_change(history, current_price, now - Duration::days(7)),
        month: horizon_change(history, current_price, now - Duration::days(30)),
    }
}

/// 计算单个区间的涨跌幅
fn horizon_change(history: &[PricePoint], current_price: f64, since: NaiveDate) -> String {
    let window: Vec<&PricePoint> = history.iter().filter(|p| p.date >= since).collect();
    if window.len() < 2 {
        return "N/A".to_string();
    }

    let start_price = window[0].close;
    let change = (current_price - start_price) / start_price * 100.0;
    format!("{:+.2}%", change)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(date: &str, close: f64) -> PricePoint {
        PricePoint {
            date: date.parse().unwrap(),
            close,
        }
    }

    /// 测试空历史返回双 N/A
    #[test]
    fn test_empty_history() {
        let now = "2024-06-28".parse().unwrap();
        assert_eq!(calculate_performance(&[], now), Performance::unavailable());
    }

    /// 测试区间内只有 1 条记录时该区间为 N/A
    #[test]
    fn test_single_entry_in_window() {
        let now: NaiveDate = "2024-06-28".parse().unwrap();
        // 仅最后一条落在一周窗口内，月度窗口内有 2 条
        let history = vec![point("2024-06-03", 100.0), point("2024-06-27", 110.0)];

        let perf = calculate_performance(&history, now);
        assert_eq!(perf.week, "N/A");
        assert_eq!(perf.month, "+10.00%");
    }

    /// 测试起点取区间内最早一条，而不是区间内最低/最高价
    #[test]
    fn test_uses_earliest_entry_as_start() {
        let now: NaiveDate = "2024-06-28".parse().unwrap();
        let history = vec![
            point("2024-06-24", 200.0), // 周窗口起点
            point("2024-06-25", 150.0), // 窗口内最低价，不应被选中
            point("2024-06-27", 190.0),
        ];

        let perf = calculate_performance(&history, now);
        // (190 - 200) / 200 * 100 = -5.00
        assert_eq!(perf.week, "-5.00%");
        assert_eq!(perf.month, "-5.00%");
    }

    /// 测试正负号与两位小数格式
    #[test]
    fn test_signed_two_decimal_format() {
        let now: NaiveDate = "2024-06-28".parse().unwrap();
        let history = vec![point("2024-06-24", 100.0), point("2024-06-27", 103.456)];

        let perf = calculate_performance(&history, now);
        assert_eq!(perf.week, "+3.46%");
    }

    /// 测试窗口外的历史记录不参与计算
    #[test]
    fn test_excludes_entries_before_window() {
        let now: NaiveDate = "2024-06-28".parse().unwrap();
        let history = vec![
            point("2024-04-01", 50.0), // 超出 30 天窗口
            point("2024-06-10", 100.0),
            point("2024-06-27", 120.0),
        ];

        let perf = calculate_performance(&history, now);
        // 月度起点应为 06-10 的 100.0，而不是 04-01 的 50.0
        assert_eq!(perf.month, "+20.00%");
        assert_eq!(perf.week, "N/A");
    }
}
