use crate::{History, QuoteInfo, QuoteMeta, QuoteResult, Symbol, DEFAULT_CURRENCY};

/// Builds the quote body from the provider snapshot and the recent daily history.
///
/// Price falls back from `regularMarketPrice` to `currentPrice` to the latest
/// close; previous close from `previousClose` to `regularMarketPreviousClose`
/// to the close before it. A zero price counts as missing, so the percent
/// change never divides by zero.
pub fn shape_quote(symbol: &Symbol, info: &QuoteInfo, history: &History) -> QuoteResult {
    let current_price = non_zero(info.regular_market_price)
        .or_else(|| non_zero(info.current_price))
        .or_else(|| history.close_from_end(0));
    let previous_close = non_zero(info.previous_close)
        .or_else(|| non_zero(info.regular_market_previous_close))
        .or_else(|| history.close_from_end(1));

    let (change, change_percent) = match (non_zero(current_price), non_zero(previous_close)) {
        (Some(current), Some(previous)) => {
            let change = current - previous;
            (change, change / previous * 100.0)
        }
        _ => (0.0, 0.0),
    };

    QuoteResult {
        meta: QuoteMeta {
            symbol: symbol.requested().to_owned(),
            short_name: info
                .short_name
                .clone()
                .unwrap_or_else(|| symbol.requested().to_owned()),
            regular_market_price: current_price,
            previous_close,
            regular_market_change: change,
            regular_market_change_percent: change_percent,
            regular_market_volume: info.regular_market_volume.unwrap_or(0),
            market_cap: info.market_cap.unwrap_or(0),
            currency: info
                .currency
                .clone()
                .unwrap_or_else(|| DEFAULT_CURRENCY.to_owned()),
        },
    }
}

fn non_zero(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v != 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{HistorySample, UtcDateTime};

    fn symbol() -> Symbol {
        Symbol::parse("AAPL").expect("valid symbol")
    }

    fn history(closes: &[Option<f64>]) -> History {
        let samples = closes
            .iter()
            .enumerate()
            .map(|(i, close)| {
                let ts = UtcDateTime::from_unix_timestamp(1_704_067_200 + i as i64 * 86_400)
                    .expect("timestamp");
                HistorySample::new(ts, *close, *close, *close, *close, Some(100))
            })
            .collect();
        History::new(symbol(), None, samples)
    }

    #[test]
    fn computes_change_from_info_prices() {
        let info = QuoteInfo {
            regular_market_price: Some(150.0),
            previous_close: Some(148.0),
            ..QuoteInfo::default()
        };

        let meta = shape_quote(&symbol(), &info, &history(&[])).meta;
        assert_eq!(meta.regular_market_change, 2.0);
        assert_eq!(meta.regular_market_change_percent, 2.0 / 148.0 * 100.0);
        assert!((meta.regular_market_change_percent - 1.351).abs() < 1e-3);
    }

    #[test]
    fn falls_back_to_current_price_and_regular_previous_close() {
        let info = QuoteInfo {
            current_price: Some(101.0),
            regular_market_previous_close: Some(100.0),
            ..QuoteInfo::default()
        };

        let meta = shape_quote(&symbol(), &info, &history(&[Some(1.0), Some(2.0)])).meta;
        assert_eq!(meta.regular_market_price, Some(101.0));
        assert_eq!(meta.previous_close, Some(100.0));
        assert_eq!(meta.regular_market_change, 1.0);
    }

    #[test]
    fn falls_back_to_history_closes() {
        let meta = shape_quote(
            &symbol(),
            &QuoteInfo::default(),
            &history(&[Some(200.0), Some(210.0)]),
        )
        .meta;

        assert_eq!(meta.regular_market_price, Some(210.0));
        assert_eq!(meta.previous_close, Some(200.0));
        assert_eq!(meta.regular_market_change, 10.0);
        assert!((meta.regular_market_change_percent - 5.0).abs() < 1e-12);
    }

    #[test]
    fn missing_previous_close_zeroes_both_change_fields() {
        let info = QuoteInfo {
            regular_market_price: Some(150.0),
            ..QuoteInfo::default()
        };

        let meta = shape_quote(&symbol(), &info, &history(&[Some(150.0)])).meta;
        assert_eq!(meta.previous_close, None);
        assert_eq!(meta.regular_market_change, 0.0);
        assert_eq!(meta.regular_market_change_percent, 0.0);
    }

    #[test]
    fn zero_previous_close_never_divides() {
        let info = QuoteInfo {
            regular_market_price: Some(150.0),
            previous_close: Some(0.0),
            ..QuoteInfo::default()
        };

        let meta = shape_quote(&symbol(), &info, &history(&[])).meta;
        assert_eq!(meta.regular_market_change, 0.0);
        assert_eq!(meta.regular_market_change_percent, 0.0);
        assert!(meta.regular_market_change_percent.is_finite());
    }

    #[test]
    fn empty_snapshot_uses_defaults() {
        let meta = shape_quote(&symbol(), &QuoteInfo::default(), &history(&[])).meta;
        assert_eq!(meta.short_name, "AAPL");
        assert_eq!(meta.regular_market_price, None);
        assert_eq!(meta.regular_market_volume, 0);
        assert_eq!(meta.market_cap, 0);
        assert_eq!(meta.currency, "INR");
    }
}
