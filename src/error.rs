#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please select a stock.")]
    NoSymbolSelected,

    #[error("Unknown stock symbol: {0}")]
    UnknownSymbol(String),

    #[error("Quantity must be a number.")]
    QuantityNotANumber(String),

    #[error("Quantity must be greater than zero.")]
    NonPositiveQuantity(i64),

    #[error("Quantity is too large.")]
    QuantityOverflow,

    #[error("Portfolio is empty.")]
    EmptyPortfolio,
}

impl ValidationError {
    pub fn is_warning(&self) -> bool {
        matches!(self, ValidationError::EmptyPortfolio)
    }
}
