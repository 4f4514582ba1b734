use rust_decimal::Decimal;
use rust_decimal_macros::dec;

#[derive(Clone, Debug, PartialEq)]
pub struct PriceEntry {
    pub symbol: String,
    pub unit_price: Decimal,
}

impl PriceEntry {
    pub fn new(symbol: &str, unit_price: Decimal) -> Self {
        Self {
            symbol: symbol.to_string(),
            unit_price,
        }
    }
}

#[derive(Clone, Debug)]
pub struct PriceTable {
    entries: Vec<PriceEntry>,
}

impl PriceTable {
    pub fn new(entries: Vec<PriceEntry>) -> Result<Self, String> {
        check_entries(&entries)?;
        Ok(Self { entries })
    }

    pub fn get(&self, symbol: &str) -> Option<Decimal> {
        self.entries
            .iter()
            .find(|entry| entry.symbol == symbol)
            .map(|entry| entry.unit_price)
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.get(symbol).is_some()
    }

    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.symbol.as_str())
    }

    pub fn symbol_at(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(|entry| entry.symbol.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for PriceTable {
    fn default() -> Self {
        let entries = vec![
            PriceEntry::new("AAPL", dec!(180)),
            PriceEntry::new("TSLA", dec!(250)),
            PriceEntry::new("MSFT", dec!(320)),
            PriceEntry::new("GOOG", dec!(140)),
        ];
        debug_assert_eq!(check_entries(&entries), Ok(()));
        Self { entries }
    }
}

// symbols must be non-empty and unique
fn check_entries(entries: &[PriceEntry]) -> Result<(), String> {
    for (i, entry) in entries.iter().enumerate() {
        if entry.symbol.is_empty() {
            return Err(format!("Empty symbol at position {}", i));
        }
        if entries[..i].iter().any(|e| e.symbol == entry.symbol) {
            return Err(format!("Duplicate symbol {}", entry.symbol));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table() {
        let prices = PriceTable::default();
        assert_eq!(prices.len(), 4);
        assert_eq!(prices.get("AAPL"), Some(dec!(180)));
        assert_eq!(prices.get("GOOG"), Some(dec!(140)));
        assert_eq!(prices.get("aapl"), None);
        assert_eq!(
            prices.symbols().collect::<Vec<_>>(),
            vec!["AAPL", "TSLA", "MSFT", "GOOG"]
        );
        assert_eq!(prices.symbol_at(1), Some("TSLA"));
        assert_eq!(prices.symbol_at(4), None);
    }

    #[test]
    fn test_duplicate_symbols_rejected() {
        let res = PriceTable::new(vec![
            PriceEntry::new("AAPL", dec!(180)),
            PriceEntry::new("AAPL", dec!(181)),
        ]);
        assert!(res.is_err());

        let res = PriceTable::new(vec![PriceEntry::new("", dec!(1))]);
        assert!(res.is_err());
    }

    #[test]
    fn test_default_table_is_valid() {
        let prices = PriceTable::default();
        assert_eq!(check_entries(&prices.entries), Ok(()));
        assert!(PriceTable::new(prices.entries.clone()).is_ok());
    }
}
