use rust_decimal::Decimal;
use tracing::warn;

use crate::{portfolio::Portfolio, prices::PriceTable};

#[derive(Clone, Debug, PartialEq)]
pub struct ViewRow {
    pub symbol: String,
    pub quantity: i64,
    pub unit_price: Decimal,
    pub value: Decimal,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PortfolioView {
    pub rows: Vec<ViewRow>,
    pub total: Decimal,
}

impl PortfolioView {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

pub fn recompute(portfolio: &Portfolio, prices: &PriceTable) -> PortfolioView {
    let rows: Vec<ViewRow> = portfolio
        .holdings()
        .filter_map(|holding| match prices.get(&holding.symbol) {
            Some(unit_price) => Some(ViewRow {
                symbol: holding.symbol.clone(),
                quantity: holding.quantity,
                unit_price,
                value: Decimal::from(holding.quantity) * unit_price,
            }),
            None => {
                warn!("No price for {}, holding not displayed", holding.symbol);
                None
            }
        })
        .collect();
    let total = rows.iter().fold(Decimal::ZERO, |acc, row| acc + row.value);

    PortfolioView { rows, total }
}

pub fn usd(amount: Decimal) -> String {
    format!("${}", amount.normalize())
}
