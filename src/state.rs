use std::num::{IntErrorKind, ParseIntError};

use crate::{
    error::ValidationError,
    portfolio::Portfolio,
    prices::PriceTable,
    theme::Theme,
    view::{self, PortfolioView},
};

#[derive(Clone, Debug)]
pub struct State {
    pub prices: PriceTable,
    pub portfolio: Portfolio,
    pub theme: Theme,
}

impl State {
    pub fn new(prices: PriceTable) -> Self {
        Self {
            prices,
            portfolio: Portfolio::new(),
            theme: Theme::default(),
        }
    }

    pub fn add_holding(
        &mut self,
        symbol: Option<&str>,
        quantity_text: &str,
    ) -> Result<i64, ValidationError> {
        let symbol = match symbol {
            Some(symbol) if !symbol.is_empty() => symbol,
            _ => return Err(ValidationError::NoSymbolSelected),
        };
        if !self.prices.contains(symbol) {
            return Err(ValidationError::UnknownSymbol(symbol.to_string()));
        }
        let quantity = parse_quantity(quantity_text)?;

        self.portfolio.add(symbol, quantity)
    }

    pub fn toggle_theme(&mut self) -> Theme {
        self.theme = self.theme.toggled();
        self.theme
    }

    pub fn view(&self) -> PortfolioView {
        view::recompute(&self.portfolio, &self.prices)
    }
}

pub fn parse_quantity(text: &str) -> Result<i64, ValidationError> {
    let text = text.trim();
    let quantity: i64 = text.parse().map_err(|err: ParseIntError| match err.kind() {
        IntErrorKind::PosOverflow => ValidationError::QuantityOverflow,
        IntErrorKind::NegOverflow => ValidationError::NonPositiveQuantity(i64::MIN),
        _ => ValidationError::QuantityNotANumber(text.to_string()),
    })?;
    if quantity <= 0 {
        return Err(ValidationError::NonPositiveQuantity(quantity));
    }
    Ok(quantity)
}
