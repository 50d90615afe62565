use crate::{
    ChartIndicators, ChartMeta, ChartResult, FinancePayload, History, QuoteIndicator, Symbol,
    DEFAULT_CURRENCY,
};

/// Builds the chart body, or the soft "No data available" payload when the
/// history is empty.
pub fn shape_chart(symbol: &Symbol, history: &History) -> FinancePayload {
    if history.is_empty() {
        return FinancePayload::no_data();
    }

    let mut timestamp = Vec::with_capacity(history.len());
    let mut quote = QuoteIndicator::with_capacity(history.len());
    for sample in &history.samples {
        timestamp.push(sample.ts.unix_timestamp());
        quote.open.push(sample.open);
        quote.high.push(sample.high);
        quote.low.push(sample.low);
        quote.close.push(sample.close);
        quote.volume.push(sample.volume);
    }

    FinancePayload::Chart(ChartResult {
        meta: ChartMeta {
            symbol: symbol.requested().to_owned(),
            currency: history
                .currency
                .clone()
                .unwrap_or_else(|| DEFAULT_CURRENCY.to_owned()),
            regular_market_price: history.close_from_end(0).unwrap_or(0.0),
        },
        timestamp,
        indicators: ChartIndicators { quote: vec![quote] },
    })
}
