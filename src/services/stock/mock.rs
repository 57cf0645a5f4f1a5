//! Mock 股票数据服务
//!
//! 实时数据源不可用（限流、故障）时为常见股票合成演示数据。
//! 只覆盖固定目录中的代码，不是万能兜底：目录外的代码返回 None

use chrono::{Duration, NaiveDate, Utc};
use chrono_tz::America::New_York;
use rand::Rng;

use crate::models::{MockProfile, PricePoint, StockData};

/// 固定的公司档案目录
const MOCK_CATALOG: &[(&str, MockProfile)] = &[
    (
        "AAPL",
        MockProfile {
            name: "Apple Inc.",
            price: 182.50,
            change: 2.35,
            change_percent: 1.30,
            pe: 30.5,
            market_cap: 2.85e12,
            high_52: 198.23,
            low_52: 164.08,
            summary: "Apple Inc. designs, manufactures, and markets smartphones, personal computers, tablets, wearables, and accessories worldwide.",
        },
    ),
    (
        "MSFT",
        MockProfile {
            name: "Microsoft Corporation",
            price: 415.20,
            change: -1.85,
            change_percent: -0.44,
            pe: 35.8,
            market_cap: 3.08e12,
            high_52: 430.82,
            low_52: 327.52,
            summary: "Microsoft Corporation develops, licenses, and supports software, services, devices, and solutions worldwide.",
        },
    ),
    (
        "GOOGL",
        MockProfile {
            name: "Alphabet Inc.",
            price: 165.30,
            change: 3.20,
            change_percent: 1.97,
            pe: 26.3,
            market_cap: 2.05e12,
            high_52: 175.69,
            low_52: 121.46,
            summary: "Alphabet Inc. offers various products and platforms including Google Search, YouTube, Google Cloud, and Android operating system.",
        },
    ),
    (
        "TSLA",
        MockProfile {
            name: "Tesla, Inc.",
            price: 245.60,
            change: -5.40,
            change_percent: -2.15,
            pe: 73.2,
            market_cap: 780e9,
            high_52: 299.29,
            low_52: 152.37,
            summary: "Tesla, Inc. designs, develops, manufactures, leases, and sells electric vehicles, energy storage systems, and solar panels.",
        },
    ),
    (
        "NVDA",
        MockProfile {
            name: "NVIDIA Corporation",
            price: 115.80,
            change: 4.20,
            change_percent: 3.76,
            pe: 65.4,
            market_cap: 2.86e12,
            high_52: 140.76,
            low_52: 39.23,
            summary: "NVIDIA Corporation provides graphics, computing and networking solutions including GPUs for gaming and professional markets.",
        },
    ),
];

/// 获取美东时区的当前日期
fn today_eastern() -> NaiveDate {
    Utc::now().with_timezone(&New_York).date_naive()
}

/// 获取指定代码的演示数据集
///
/// 目录外的代码返回 None
pub fn get_mock_data(ticker: &str) -> Option<StockData> {
    get_mock_data_with(ticker, &mut rand::thread_rng(), today_eastern())
}

/// 获取演示数据集（注入随机源与当前日期，便于测试复现）
///
/// 合成规则：
/// - 30 条日线历史，收盘价 = 基准价 × (1 ± 5% 均匀随机)
/// - 周/月表现在 ±5% / ±10% 内独立抽取。注意这里刻意沿用了
///   独立生成的简化做法，周/月表现与合成历史并不保证吻合
/// - eps = 基准价 / 市盈率，股息率 0~3%，成交量取固定的合理区间
pub fn get_mock_data_with<R: Rng + ?Sized>(
    ticker: &str,
    rng: &mut R,
    today: NaiveDate,
) -> Option<StockData> {
    let ticker = ticker.to_uppercase();
    let profile = MOCK_CATALOG
        .iter()
        .find(|(symbol, _)| *symbol == ticker)
        .map(|(_, profile)| profile)?;

    // 合成近 30 天日线历史（升序，截止昨日）
    let mut price_history = Vec::with_capacity(30);
    for i in (1..=30).rev() {
        let variation: f64 = rng.gen_range(-0.05..0.05);
        price_history.push(PricePoint {
            date: today - Duration::days(i),
            close: profile.price * (1.0 + variation),
        });
    }

    Some(StockData {
        ticker,
        company_name: profile.name.to_string(),
        business_summary: profile.summary.to_string(),
        current_price: Some(profile.price),
        previous_close: Some(profile.price - profile.change),
        day_change: Some(profile.change),
        day_change_percent: Some(profile.change_percent),
        week_performance: format!("{:+.2}%", rng.gen_range(-5.0..5.0)),
        month_performance: format!("{:+.2}%", rng.gen_range(-10.0..10.0)),
        pe_ratio: Some(profile.pe),
        forward_pe: Some(profile.pe * 0.9),
        market_cap: Some(profile.market_cap),
        eps: Some(profile.price / profile.pe),
        dividend_yield: Some(rng.gen_range(0.0..0.03)),
        fifty_two_week_high: Some(profile.high_52),
        fifty_two_week_low: Some(profile.low_52),
        volume: Some(rng.gen_range(10_000_000..=100_000_000)),
        avg_volume: Some(rng.gen_range(15_000_000..=80_000_000)),
        currency: "USD".to_string(),
        price_history,
        is_mock: true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn fixed_today() -> NaiveDate {
        "2024-06-28".parse().unwrap()
    }

    /// 测试目录内代码返回 30 条历史且均在基准价 ±5% 以内
    #[test]
    fn test_known_ticker_history_shape() {
        let mut rng = StdRng::seed_from_u64(42);
        let data = get_mock_data_with("AAPL", &mut rng, fixed_today()).unwrap();

        assert!(data.is_mock);
        assert_eq!(data.ticker, "AAPL");
        assert_eq!(data.company_name, "Apple Inc.");
        assert_eq!(data.price_history.len(), 30);

        let base = 182.50;
        for point in &data.price_history {
            assert!(point.close >= base * 0.95 && point.close <= base * 1.05);
        }
        // 日期升序且不重复
        for pair in data.price_history.windows(2) {
            assert!(pair[0].date < pair[1].date);
        }
    }

    /// 测试目录外代码返回 None
    #[test]
    fn test_unknown_ticker() {
        let mut rng = StdRng::seed_from_u64(42);
        assert!(get_mock_data_with("ZZZZ", &mut rng, fixed_today()).is_none());
    }

    /// 测试代码大小写不敏感
    #[test]
    fn test_lowercase_ticker() {
        let mut rng = StdRng::seed_from_u64(42);
        let data = get_mock_data_with("tsla", &mut rng, fixed_today()).unwrap();
        assert_eq!(data.ticker, "TSLA");
    }

    /// 测试派生字段：eps = 基准价 / 市盈率，forward_pe = pe × 0.9
    #[test]
    fn test_derived_fundamentals() {
        let mut rng = StdRng::seed_from_u64(7);
        let data = get_mock_data_with("MSFT", &mut rng, fixed_today()).unwrap();

        assert_eq!(data.eps, Some(415.20 / 35.8));
        assert_eq!(data.forward_pe, Some(35.8 * 0.9));
        assert_eq!(data.previous_close, Some(415.20 - (-1.85)));

        let yield_ = data.dividend_yield.unwrap();
        assert!((0.0..0.03).contains(&yield_));
    }

    /// 测试相同种子生成完全相同的数据集
    #[test]
    fn test_reproducible_with_seed() {
        let mut rng_a = StdRng::seed_from_u64(99);
        let mut rng_b = StdRng::seed_from_u64(99);

        let a = get_mock_data_with("NVDA", &mut rng_a, fixed_today()).unwrap();
        let b = get_mock_data_with("NVDA", &mut rng_b, fixed_today()).unwrap();

        assert_eq!(a.week_performance, b.week_performance);
        assert_eq!(a.month_performance, b.month_performance);
        let closes_a: Vec<f64> = a.price_history.iter().map(|p| p.close).collect();
        let closes_b: Vec<f64> = b.price_history.iter().map(|p| p.close).collect();
        assert_eq!(closes_a, closes_b);
    }
}
