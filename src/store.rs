use std::{
    fs::{self, File},
    io::{BufWriter, ErrorKind, Write},
    path::{Path, PathBuf},
};

use anyhow::{anyhow, Context, Result};
use tracing::{debug, info};

use crate::{portfolio::Portfolio, prices::PriceTable};

const STOCK_COLUMN: &str = "Stock";
const QUANTITY_COLUMN: &str = "Quantity";

#[derive(Clone, Debug)]
pub struct PortfolioStore {
    path: PathBuf,
}

impl PortfolioStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn save(&self, portfolio: &Portfolio) -> Result<()> {
        let file = File::create(&self.path)
            .with_context(|| format!("Could not create {}", self.path.display()))?;
        let mut writer = BufWriter::new(file);

        writeln!(writer, "{},{}", STOCK_COLUMN, QUANTITY_COLUMN)?;
        for holding in portfolio.holdings() {
            writeln!(writer, "{},{}", holding.symbol, holding.quantity)?;
        }
        writer
            .flush()
            .with_context(|| format!("Could not write {}", self.path.display()))?;

        debug!(
            "Saved {} holdings to {}",
            portfolio.len(),
            self.path.display()
        );
        Ok(())
    }

    /// Reads the auto-save file. Rows for symbols missing from `prices` are
    /// dropped; a missing file is an empty portfolio.
    pub fn load(&self, prices: &PriceTable) -> Result<Portfolio> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!("No saved portfolio at {}", self.path.display());
                return Ok(Portfolio::new());
            }
            Err(err) => {
                return Err(err).with_context(|| format!("Could not read {}", self.path.display()))
            }
        };

        let mut portfolio = Portfolio::new();
        let mut lines = content
            .lines()
            .enumerate()
            .map(|(i, line)| (i + 1, line.trim_end_matches('\r')))
            .filter(|(_, line)| !line.trim().is_empty());

        let Some((_, header)) = lines.next() else {
            return Ok(portfolio);
        };
        let header = split_record(header);
        let column = |name: &str| {
            header
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| anyhow!("{}: missing {} column", self.path.display(), name))
        };
        let stock_idx = column(STOCK_COLUMN)?;
        let quantity_idx = column(QUANTITY_COLUMN)?;

        for (line_no, line) in lines {
            let record = split_record(line);
            let symbol = record.get(stock_idx).map(String::as_str).unwrap_or("");
            let quantity = record
                .get(quantity_idx)
                .map(String::as_str)
                .unwrap_or("")
                .trim();
            let quantity: i64 = quantity.parse().with_context(|| {
                format!(
                    "{}:{}: invalid quantity {:?}",
                    self.path.display(),
                    line_no,
                    quantity
                )
            })?;

            if prices.contains(symbol) {
                portfolio.set(symbol, quantity);
            } else {
                debug!("Skipping unknown symbol {:?} on line {}", symbol, line_no);
            }
        }

        info!(
            "Loaded {} holdings from {}",
            portfolio.len(),
            self.path.display()
        );
        Ok(portfolio)
    }
}

fn split_record(line: &str) -> Vec<String> {
    let mut fields = vec![];
    let mut field = String::new();
    let mut quoted = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if quoted && chars.peek() == Some(&'"') => {
                field.push('"');
                chars.next();
            }
            '"' => quoted = !quoted,
            ',' if !quoted => fields.push(std::mem::take(&mut field)),
            c => field.push(c),
        }
    }
    fields.push(field);
    fields
}
