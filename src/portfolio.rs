use std::fmt::Display;

use colored::Colorize;

use crate::error::ValidationError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Holding {
    pub symbol: String,
    pub quantity: i64,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Portfolio {
    holdings: Vec<Holding>,
}

impl Portfolio {
    pub fn new() -> Self {
        Self { holdings: vec![] }
    }

    pub fn add(&mut self, symbol: &str, quantity: i64) -> Result<i64, ValidationError> {
        match self.holdings.iter_mut().find(|h| h.symbol == symbol) {
            Some(holding) => {
                holding.quantity = holding
                    .quantity
                    .checked_add(quantity)
                    .ok_or(ValidationError::QuantityOverflow)?;
                Ok(holding.quantity)
            }
            None => {
                self.holdings.push(Holding {
                    symbol: symbol.to_string(),
                    quantity,
                });
                Ok(quantity)
            }
        }
    }

    pub fn set(&mut self, symbol: &str, quantity: i64) {
        match self.holdings.iter_mut().find(|h| h.symbol == symbol) {
            Some(holding) => holding.quantity = quantity,
            None => self.holdings.push(Holding {
                symbol: symbol.to_string(),
                quantity,
            }),
        }
    }

    pub fn quantity(&self, symbol: &str) -> Option<i64> {
        self.holdings
            .iter()
            .find(|h| h.symbol == symbol)
            .map(|h| h.quantity)
    }

    pub fn holdings(&self) -> impl Iterator<Item = &Holding> {
        self.holdings.iter()
    }

    pub fn len(&self) -> usize {
        self.holdings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.holdings.is_empty()
    }
}

impl Display for Portfolio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s: Vec<String> = self
            .holdings
            .iter()
            .map(|h| format!("{}: {}", h.symbol, h.quantity.to_string().purple()))
            .collect();
        write!(f, "{}", s.join(" / "))
    }
}
