use std::path::Path;

use anyhow::Result;
use tracing::info;

use crate::{
    config::Config,
    error::ValidationError,
    export::{self, ExportFormat},
    prices::PriceTable,
    settings::SettingsStore,
    state::State,
    store::PortfolioStore,
    theme::Theme,
    view::PortfolioView,
};

#[derive(Debug)]
pub struct Tracker {
    state: State,
    portfolio_store: PortfolioStore,
    settings_store: SettingsStore,
}

impl Tracker {
    pub fn open(config: &Config) -> Result<Self> {
        Self::load(
            PriceTable::default(),
            PortfolioStore::new(&config.portfolio_path),
            SettingsStore::new(&config.settings_path),
        )
    }

    pub fn load(
        prices: PriceTable,
        portfolio_store: PortfolioStore,
        settings_store: SettingsStore,
    ) -> Result<Self> {
        let mut state = State::new(prices);
        state.theme = settings_store.load()?;
        state.portfolio = portfolio_store.load(&state.prices)?;

        Ok(Self {
            state,
            portfolio_store,
            settings_store,
        })
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn view(&self) -> PortfolioView {
        self.state.view()
    }

    pub fn add_holding(&mut self, symbol: Option<&str>, quantity_text: &str) -> Result<i64> {
        let quantity = self.state.add_holding(symbol, quantity_text)?;
        self.portfolio_store.save(&self.state.portfolio)?;
        info!(
            "Added {} {}, now holding {}",
            quantity_text.trim(),
            symbol.unwrap_or_default(),
            quantity
        );
        Ok(quantity)
    }

    pub fn export_as(&self, path: &Path) -> Result<ExportFormat> {
        if self.state.portfolio.is_empty() {
            return Err(ValidationError::EmptyPortfolio.into());
        }
        export::write(path, &self.view())
    }

    pub fn toggle_theme(&mut self) -> Result<Theme> {
        let theme = self.state.toggle_theme();
        self.settings_store.save(theme)?;
        info!("Switched to {} theme", theme);
        Ok(theme)
    }
}
