use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyModifiers};
use futures_util::StreamExt;
use ratatui::{
    layout::{Alignment, Constraint, Flex, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Row, Table},
    Frame,
};
use tracing::error;

use super::input::TextInput;
use crate::{
    error::ValidationError,
    theme::Palette,
    tracker::Tracker,
    view::usd,
};

const DEFAULT_EXPORT_PATH: &str = "portfolio_export.csv";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum AlertKind {
    Info,
    Warning,
    Error,
}

#[derive(Debug)]
enum Dialog {
    Message {
        kind: AlertKind,
        title: String,
        text: String,
    },
    SaveAs(TextInput),
}

impl Dialog {
    fn message(kind: AlertKind, title: &str, text: impl Into<String>) -> Self {
        Dialog::Message {
            kind,
            title: title.to_string(),
            text: text.into(),
        }
    }
}

#[derive(Debug, PartialEq)]
enum Action {
    Quit,
    AddHolding,
    OpenSaveAs,
    ExportAs(PathBuf),
    ToggleTheme,
}

pub struct App {
    should_quit: bool,
    tracker: Tracker,
    selected_symbol: Option<usize>,
    quantity: TextInput,
    dialog: Option<Dialog>,
}

impl App {
    pub fn new(tracker: Tracker) -> Self {
        Self {
            should_quit: false,
            tracker,
            selected_symbol: None,
            quantity: TextInput::default(),
            dialog: None,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut terminal = ratatui::init();
        let _ = terminal.clear();

        let mut events = EventStream::new();

        let period = Duration::from_secs_f64(1.0 / 20.0);
        let mut interval = tokio::time::interval(period);

        while !self.should_quit {
            tokio::select! {
                _ = interval.tick() => { terminal.draw(|frame| self.render(frame))?; },
                Some(Ok(event)) = events.next() => self.handle_events(event),
            }
        }

        Ok(())
    }

    fn selected_symbol(&self) -> Option<String> {
        self.selected_symbol
            .and_then(|i| self.tracker.state().prices.symbol_at(i))
            .map(str::to_string)
    }

    fn handle_events(&mut self, event: Event) {
        if let Some(key) = event.as_key_press_event() {
            let action = if self.dialog.is_some() {
                self.handle_dialog_key(key)
            } else {
                self.handle_main_key(key)
            };
            if let Some(action) = action {
                self.apply(action);
            }
        }
    }

    fn handle_main_key(&mut self, key: KeyEvent) -> Option<Action> {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return match key.code {
                KeyCode::Char('c') | KeyCode::Char('q') => Some(Action::Quit),
                KeyCode::Char('s') => Some(Action::OpenSaveAs),
                KeyCode::Char('t') => Some(Action::ToggleTheme),
                _ => None,
            };
        }

        let symbols = self.tracker.state().prices.len();
        match key.code {
            KeyCode::Esc => Some(Action::Quit),
            KeyCode::Enter => Some(Action::AddHolding),
            KeyCode::Down if symbols > 0 => {
                self.selected_symbol = Some(self.selected_symbol.map_or(0, |i| (i + 1) % symbols));
                None
            }
            KeyCode::Up if symbols > 0 => {
                self.selected_symbol = Some(
                    self.selected_symbol
                        .map_or(symbols - 1, |i| (i + symbols - 1) % symbols),
                );
                None
            }
            _ => {
                self.quantity.handle_key(key);
                None
            }
        }
    }

    fn handle_dialog_key(&mut self, key: KeyEvent) -> Option<Action> {
        let Some(dialog) = &mut self.dialog else {
            return None;
        };
        match dialog {
            Dialog::Message { .. } => {
                if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                    self.dialog = None;
                }
                None
            }
            Dialog::SaveAs(input) => match key.code {
                KeyCode::Esc => {
                    self.dialog = None;
                    None
                }
                KeyCode::Enter => Some(Action::ExportAs(with_default_extension(input.value()))),
                KeyCode::Tab => {
                    let switched = switch_extension(input.value());
                    input.set(switched);
                    None
                }
                _ => {
                    input.handle_key(key);
                    None
                }
            },
        }
    }

    fn apply(&mut self, action: Action) {
        match action {
            Action::Quit => self.should_quit = true,
            Action::AddHolding => {
                let symbol = self.selected_symbol();
                match self
                    .tracker
                    .add_holding(symbol.as_deref(), self.quantity.value())
                {
                    Ok(_) => self.quantity.clear(),
                    Err(err) => self.report(err),
                }
            }
            Action::OpenSaveAs => {
                if self.tracker.state().portfolio.is_empty() {
                    self.report(ValidationError::EmptyPortfolio.into());
                } else {
                    self.dialog = Some(Dialog::SaveAs(TextInput::new(DEFAULT_EXPORT_PATH)));
                }
            }
            Action::ExportAs(path) => {
                self.dialog = None;
                match self.tracker.export_as(&path) {
                    Ok(_) => {
                        self.dialog = Some(Dialog::message(
                            AlertKind::Info,
                            "Saved",
                            format!("Portfolio saved to {}", path.display()),
                        ))
                    }
                    Err(err) => self.report(err),
                }
            }
            Action::ToggleTheme => {
                if let Err(err) = self.tracker.toggle_theme() {
                    self.report(err);
                }
            }
        }
    }

    fn report(&mut self, err: anyhow::Error) {
        let dialog = match err.downcast_ref::<ValidationError>() {
            Some(validation) if validation.is_warning() => {
                Dialog::message(AlertKind::Warning, "Warning", validation.to_string())
            }
            Some(validation) => Dialog::message(AlertKind::Error, "Error", validation.to_string()),
            None => {
                error!("{:#}", err);
                Dialog::message(AlertKind::Error, "I/O error", format!("{:#}", err))
            }
        };
        self.dialog = Some(dialog);
    }

    pub fn render(&self, frame: &mut Frame) {
        let palette = self.tracker.state().theme.palette();
        frame.render_widget(Block::default().style(palette.base()), frame.area());

        let [header_area, input_area, table_area, total_area, footer_area] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Fill(1),
            Constraint::Length(1),
            Constraint::Length(3),
        ])
        .areas(frame.area());

        self.render_header(frame, header_area, &palette);
        self.render_inputs(frame, input_area, &palette);
        self.render_table(frame, table_area, total_area, &palette);
        self.render_footer(frame, footer_area, &palette);

        if let Some(dialog) = &self.dialog {
            self.render_dialog(frame, dialog, &palette);
        }
    }

    fn render_header(&self, frame: &mut Frame, area: Rect, palette: &Palette) {
        let block = Block::default()
            .title("Simple Stock Tracker")
            .borders(Borders::ALL)
            .style(palette.base());
        let p = Paragraph::new(Line::from(format!(
            "Theme: {}",
            self.tracker.state().theme
        )))
        .block(block);
        frame.render_widget(p, area);
    }

    fn render_inputs(&self, frame: &mut Frame, area: Rect, palette: &Palette) {
        let [symbol_area, quantity_area, actions_area] = Layout::horizontal([
            Constraint::Length(22),
            Constraint::Length(22),
            Constraint::Fill(1),
        ])
        .areas(area);

        let symbol = match self.selected_symbol() {
            Some(symbol) => Line::from(format!("◀ {} ▶", symbol)),
            None => Line::from(Span::styled(
                "↑/↓ to select",
                Style::default().add_modifier(Modifier::DIM),
            )),
        };
        let p = Paragraph::new(symbol).block(
            Block::default()
                .title("Stock Symbol")
                .borders(Borders::ALL)
                .style(palette.base()),
        );
        frame.render_widget(p, symbol_area);

        let p = Paragraph::new(Line::from(format!("{}_", self.quantity.value()))).block(
            Block::default()
                .title("Quantity")
                .borders(Borders::ALL)
                .style(palette.base()),
        );
        frame.render_widget(p, quantity_area);

        let actions = Line::from(vec![
            Span::styled(" Enter: Add Stock ", palette.button(palette.add)),
            Span::raw(" "),
            Span::styled(" ^S: Save Portfolio As... ", palette.button(palette.save)),
            Span::raw(" "),
            Span::styled(" ^T: Toggle Theme ", palette.button(palette.theme)),
        ]);
        let p = Paragraph::new(actions).block(
            Block::default()
                .borders(Borders::ALL)
                .style(palette.base()),
        );
        frame.render_widget(p, actions_area);
    }

    fn render_table(&self, frame: &mut Frame, table_area: Rect, total_area: Rect, palette: &Palette) {
        let view = self.tracker.view();

        let header = Row::new(["Stock", "Quantity", "Price", "Value"])
            .style(Style::default().add_modifier(Modifier::BOLD));
        let rows: Vec<Row> = view
            .rows
            .iter()
            .map(|row| {
                Row::new([
                    row.symbol.clone(),
                    row.quantity.to_string(),
                    usd(row.unit_price),
                    usd(row.value),
                ])
            })
            .collect();
        let table = Table::new(rows, [Constraint::Fill(1); 4])
            .header(header)
            .block(
                Block::default()
                    .title("Portfolio")
                    .borders(Borders::ALL)
                    .style(palette.base()),
            )
            .style(palette.base());
        frame.render_widget(table, table_area);

        let total = Paragraph::new(Line::from(format!(
            "Total Investment: {}",
            usd(view.total)
        )))
        .style(palette.base().add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center);
        frame.render_widget(total, total_area);
    }

    fn render_footer(&self, frame: &mut Frame, area: Rect, palette: &Palette) {
        let block = Block::default().borders(Borders::ALL).style(palette.base());
        let p = Paragraph::new(Line::from(
            "↑/↓ select stock, type quantity, Esc to quit",
        ))
        .block(block);
        frame.render_widget(p, area);
    }

    fn render_dialog(&self, frame: &mut Frame, dialog: &Dialog, palette: &Palette) {
        let area = centered(frame.area(), 60, 6);
        frame.render_widget(Clear, area);

        let (title, border, lines) = match dialog {
            Dialog::Message { kind, title, text } => {
                let border = match kind {
                    AlertKind::Info => palette.save,
                    AlertKind::Warning => Color::Yellow,
                    AlertKind::Error => Color::Red,
                };
                (
                    title.as_str(),
                    border,
                    vec![Line::from(text.as_str()), Line::from(""), Line::from("[Enter] OK")],
                )
            }
            Dialog::SaveAs(input) => (
                "Save Portfolio As...",
                palette.save,
                vec![
                    Line::from(format!("{}_", input.value())),
                    Line::from(""),
                    Line::from("Tab: .csv/.txt  Enter: save  Esc: cancel"),
                ],
            ),
        };

        let p = Paragraph::new(lines).block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border))
                .style(palette.base()),
        );
        frame.render_widget(p, area);
    }
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let [area] = Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .areas(area);
    let [area] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(area);
    area
}

fn with_default_extension(path: &str) -> PathBuf {
    let mut path = PathBuf::from(path.trim());
    if path.extension().is_none() {
        path.set_extension("csv");
    }
    path
}

fn switch_extension(path: &str) -> String {
    let mut path = PathBuf::from(path);
    let next = match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("csv") => "txt",
        _ => "csv",
    };
    path.set_extension(next);
    path.to_string_lossy().into_owned()
}

#[cfg(test)]
mod tests {
    use std::fs;

    use ratatui::{backend::TestBackend, Terminal};

    use super::*;
    use crate::{config::Config, theme::Theme};

    fn app(dir: &std::path::Path) -> App {
        let tracker = Tracker::open(&Config {
            portfolio_path: dir.join("portfolio.csv"),
            settings_path: dir.join("settings.txt"),
            log_path: dir.join("tracker.log"),
        })
        .unwrap();
        App::new(tracker)
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_events(Event::Key(KeyEvent::new(code, KeyModifiers::NONE)));
    }

    fn ctrl(app: &mut App, c: char) {
        app.handle_events(Event::Key(KeyEvent::new(
            KeyCode::Char(c),
            KeyModifiers::CONTROL,
        )));
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn screen(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|frame| app.render(frame)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    fn message(app: &App) -> Option<(AlertKind, &str)> {
        match &app.dialog {
            Some(Dialog::Message { kind, text, .. }) => Some((*kind, text.as_str())),
            _ => None,
        }
    }

    #[test]
    fn test_symbol_selection_cycles() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(dir.path());
        assert_eq!(app.selected_symbol(), None);

        press(&mut app, KeyCode::Down);
        assert_eq!(app.selected_symbol().as_deref(), Some("AAPL"));
        press(&mut app, KeyCode::Up);
        assert_eq!(app.selected_symbol().as_deref(), Some("GOOG"));
        press(&mut app, KeyCode::Down);
        assert_eq!(app.selected_symbol().as_deref(), Some("AAPL"));
    }

    #[test]
    fn test_add_stock() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(dir.path());

        press(&mut app, KeyCode::Down);
        type_text(&mut app, "2");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.quantity.value(), "");

        press(&mut app, KeyCode::Down);
        type_text(&mut app, "1");
        press(&mut app, KeyCode::Enter);

        press(&mut app, KeyCode::Up);
        type_text(&mut app, "3");
        press(&mut app, KeyCode::Enter);

        assert!(app.dialog.is_none());
        assert_eq!(app.tracker.state().portfolio.quantity("AAPL"), Some(5));
        assert_eq!(app.tracker.state().portfolio.quantity("TSLA"), Some(1));

        let screen = screen(&app);
        assert!(screen.contains("$900"));
        assert!(screen.contains("$250"));
        assert!(screen.contains("Total Investment: $1150"));
        assert!(dir.path().join("portfolio.csv").exists());
    }

    #[test]
    fn test_add_without_symbol() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(dir.path());

        type_text(&mut app, "5");
        press(&mut app, KeyCode::Enter);
        assert_eq!(
            message(&app),
            Some((AlertKind::Error, "Please select a stock."))
        );
        assert!(screen(&app).contains("Please select a stock."));
        assert_eq!(app.quantity.value(), "5");

        // dialog swallows input until dismissed
        press(&mut app, KeyCode::Down);
        assert_eq!(app.selected_symbol(), None);
        press(&mut app, KeyCode::Enter);
        assert!(app.dialog.is_none());
        assert!(app.tracker.state().portfolio.is_empty());
    }

    #[test]
    fn test_add_invalid_quantity() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(dir.path());

        press(&mut app, KeyCode::Down);
        type_text(&mut app, "five");
        press(&mut app, KeyCode::Enter);
        assert_eq!(
            message(&app),
            Some((AlertKind::Error, "Quantity must be a number."))
        );
        assert!(app.tracker.state().portfolio.is_empty());
        assert!(!dir.path().join("portfolio.csv").exists());
    }

    #[test]
    fn test_auto_save_failure_dialog() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(dir.path());
        fs::create_dir(dir.path().join("portfolio.csv")).unwrap();

        press(&mut app, KeyCode::Down);
        type_text(&mut app, "3");
        press(&mut app, KeyCode::Enter);

        let Some(Dialog::Message { kind, title, text }) = &app.dialog else {
            panic!("error dialog not open");
        };
        assert_eq!(*kind, AlertKind::Error);
        assert_eq!(title, "I/O error");
        assert!(text.contains("Could not create"));
        assert_eq!(app.tracker.state().portfolio.quantity("AAPL"), Some(3));
        assert!(screen(&app).contains("I/O error"));
    }

    #[test]
    fn test_save_as_empty_portfolio() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(dir.path());

        ctrl(&mut app, 's');
        assert_eq!(message(&app), Some((AlertKind::Warning, "Portfolio is empty.")));
    }

    #[test]
    fn test_save_as() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(dir.path());
        press(&mut app, KeyCode::Down);
        type_text(&mut app, "4");
        press(&mut app, KeyCode::Enter);

        ctrl(&mut app, 's');
        let Some(Dialog::SaveAs(input)) = &mut app.dialog else {
            panic!("save dialog not open");
        };
        assert_eq!(input.value(), DEFAULT_EXPORT_PATH);
        let target = dir.path().join("report");
        input.set(target.to_string_lossy());

        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Enter);

        let expected = dir.path().join("report.csv");
        assert_eq!(
            fs::read_to_string(&expected).unwrap(),
            "Stock,Quantity,Price,Value\nAAPL,4,180,720\nTOTAL,,,720\n"
        );
        let (kind, text) = message(&app).unwrap();
        assert_eq!(kind, AlertKind::Info);
        assert!(text.starts_with("Portfolio saved to"));
    }

    #[test]
    fn test_toggle_theme() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(dir.path());

        ctrl(&mut app, 't');
        assert_eq!(app.tracker.state().theme, Theme::Dark);
        assert_eq!(
            fs::read_to_string(dir.path().join("settings.txt")).unwrap(),
            "Dark"
        );
        assert!(screen(&app).contains("Theme: Dark"));

        ctrl(&mut app, 't');
        assert_eq!(app.tracker.state().theme, Theme::Light);
    }

    #[test]
    fn test_quit() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(dir.path());
        type_text(&mut app, "q");
        assert!(!app.should_quit);
        press(&mut app, KeyCode::Esc);
        assert!(app.should_quit);
    }

    #[test]
    fn test_extensions() {
        assert_eq!(with_default_extension("out"), PathBuf::from("out.csv"));
        assert_eq!(with_default_extension(" out.txt "), PathBuf::from("out.txt"));
        assert_eq!(switch_extension("out.csv"), "out.txt");
        assert_eq!(switch_extension("out.txt"), "out.csv");
        assert_eq!(switch_extension("out"), "out.csv");
    }
}
