pub mod app;
mod input;
