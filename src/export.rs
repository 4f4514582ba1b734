use std::{fs, path::Path};

use anyhow::{Context, Result};
use strum::Display;
use tracing::info;

use crate::view::{usd, PortfolioView};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Display)]
pub enum ExportFormat {
    #[strum(to_string = "CSV")]
    Csv,
    #[strum(to_string = "plain text")]
    PlainText,
}

impl ExportFormat {
    /// `.csv` in any case selects CSV; every other extension, or none, is
    /// plain text.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => ExportFormat::Csv,
            _ => ExportFormat::PlainText,
        }
    }

    pub fn render(self, view: &PortfolioView) -> String {
        match self {
            ExportFormat::Csv => render_csv(view),
            ExportFormat::PlainText => render_plain_text(view),
        }
    }
}

pub fn render_csv(view: &PortfolioView) -> String {
    let mut lines = vec!["Stock,Quantity,Price,Value".to_string()];
    for row in view.rows.iter() {
        lines.push(format!(
            "{},{},{},{}",
            row.symbol,
            row.quantity,
            row.unit_price.normalize(),
            row.value.normalize()
        ));
    }
    lines.push(format!("TOTAL,,,{}", view.total.normalize()));
    lines.join("\n") + "\n"
}

pub fn render_plain_text(view: &PortfolioView) -> String {
    let mut out = String::new();
    for row in view.rows.iter() {
        out.push_str(&format!(
            "{}: {} × {} = {}\n",
            row.symbol,
            row.quantity,
            usd(row.unit_price),
            usd(row.value)
        ));
    }
    out.push_str(&format!("\nTotal Investment: {}\n", usd(view.total)));
    out
}

pub fn write(path: &Path, view: &PortfolioView) -> Result<ExportFormat> {
    let format = ExportFormat::from_path(path);
    fs::write(path, format.render(view))
        .with_context(|| format!("Could not write {}", path.display()))?;
    info!(
        "Exported {} holdings as {} to {}",
        view.rows.len(),
        format,
        path.display()
    );
    Ok(format)
}

#[cfg(test)]
mod tests {
    use crate::{portfolio::Portfolio, prices::PriceTable, view};

    use super::*;

    fn sample_view() -> PortfolioView {
        let mut portfolio = Portfolio::new();
        portfolio.add("AAPL", 5).unwrap();
        portfolio.add("TSLA", 1).unwrap();
        view::recompute(&portfolio, &PriceTable::default())
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(ExportFormat::from_path(Path::new("out.csv")), ExportFormat::Csv);
        assert_eq!(ExportFormat::from_path(Path::new("OUT.CSV")), ExportFormat::Csv);
        assert_eq!(
            ExportFormat::from_path(Path::new("out.txt")),
            ExportFormat::PlainText
        );
        assert_eq!(
            ExportFormat::from_path(Path::new("out")),
            ExportFormat::PlainText
        );
        assert_eq!(
            ExportFormat::from_path(Path::new("out.csv.bak")),
            ExportFormat::PlainText
        );
    }

    #[test]
    fn test_render_csv() {
        assert_eq!(
            render_csv(&sample_view()),
            "Stock,Quantity,Price,Value\nAAPL,5,180,900\nTSLA,1,250,250\nTOTAL,,,1150\n"
        );
    }

    #[test]
    fn test_render_plain_text() {
        assert_eq!(
            render_plain_text(&sample_view()),
            "AAPL: 5 × $180 = $900\nTSLA: 1 × $250 = $250\n\nTotal Investment: $1150\n"
        );
    }

    #[test]
    fn test_write() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.txt");
        let format = write(&path, &sample_view()).unwrap();
        assert_eq!(format, ExportFormat::PlainText);
        assert!(fs::read_to_string(&path)
            .unwrap()
            .ends_with("Total Investment: $1150\n"));
    }
}
