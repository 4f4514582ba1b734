pub mod config;
pub mod error;
pub mod export;
pub mod portfolio;
pub mod prices;
pub mod settings;
pub mod state;
pub mod store;
pub mod theme;
pub mod tracker;
pub mod tui;
pub mod view;
