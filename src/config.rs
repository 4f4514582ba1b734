use std::path::PathBuf;

use clap::Args;

#[derive(Args, Clone, Debug)]
pub struct Config {
    /// Auto-save file, rewritten after every added holding
    #[arg(long, env = "STOCK_TRACKER_PORTFOLIO", default_value = "portfolio.csv")]
    pub portfolio_path: PathBuf,

    /// Theme setting file
    #[arg(long, env = "STOCK_TRACKER_SETTINGS", default_value = "settings.txt")]
    pub settings_path: PathBuf,

    /// Log destination while the terminal UI is running
    #[arg(long, env = "STOCK_TRACKER_LOG", default_value = "stock-tracker.log")]
    pub log_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            portfolio_path: PathBuf::from("portfolio.csv"),
            settings_path: PathBuf::from("settings.txt"),
            log_path: PathBuf::from("stock-tracker.log"),
        }
    }
}
