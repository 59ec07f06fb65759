//! Ratatui-based terminal UI.
//!
//! One screen: the listing form on the left, the Sevilla map on the right and
//! the prediction result underneath. Predictions run on demand only.

use std::io;
use std::time::Duration;

use chrono::{DateTime, Local};
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        MouseButton, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
};

use crate::app::AppContext;
use crate::domain::{InferenceResult, PriceLabel};
use crate::error::AppError;

mod form;
mod map;
mod map_widget;

pub use form::{Field, FormState};
pub use map::{MapState, cell_to_coords};

use map_widget::SevillaMap;

/// Start the TUI over an already-loaded context.
pub fn run(ctx: &AppContext) -> Result<(), AppError> {
    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::io(format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(ctx);
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen, mouse) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::io(format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen, EnableMouseCapture) {
            let _ = disable_raw_mode();
            return Err(AppError::io(format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), DisableMouseCapture, LeaveAlternateScreen);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    Form,
    Map,
}

/// Result panel contents. Dropped as soon as any input changes.
#[derive(Debug, Clone)]
enum Outcome {
    Scored(InferenceResult, DateTime<Local>),
    Failed(String),
}

struct App<'a> {
    ctx: &'a AppContext,
    form: FormState,
    map: MapState,
    focus: Focus,
    outcome: Option<Outcome>,
    status: String,
}

impl<'a> App<'a> {
    fn new(ctx: &'a AppContext) -> Self {
        Self {
            ctx,
            form: FormState::new(ctx.catalogue(), &ctx.default_query()),
            map: MapState::default(),
            focus: Focus::Form,
            outcome: None,
            status: "Ready.".to_string(),
        }
    }

    fn event_loop<B: ratatui::backend::Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
    ) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::io(format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::io(format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::io(format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key) {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Mouse(mouse) => {
                    if self.handle_mouse(mouse) {
                        needs_redraw = true;
                    }
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Returns `true` when the user asked to quit.
    fn handle_key(&mut self, key: KeyEvent) -> bool {
        if self.form.is_editing() {
            self.handle_edit_key(key.code);
            return false;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Tab | KeyCode::BackTab => {
                self.focus = match self.focus {
                    Focus::Form => Focus::Map,
                    Focus::Map => Focus::Form,
                };
            }
            KeyCode::Char('p') => self.predict(),
            _ => match self.focus {
                Focus::Form => self.handle_form_key(key.code),
                Focus::Map => self.handle_map_key(key.code),
            },
        }
        false
    }

    fn handle_form_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Up => self.form.select_prev(),
            KeyCode::Down => self.form.select_next(),
            KeyCode::Left => self.adjust(-1),
            KeyCode::Right => self.adjust(1),
            KeyCode::Enter => {
                if self.form.selected_field() == Field::Predict {
                    self.predict();
                } else if self.form.begin_edit(false) {
                    self.status = format!(
                        "Editing {}. Enter to apply, Esc to cancel.",
                        self.form.selected_field().label()
                    );
                }
            }
            KeyCode::Char(c) if c.is_ascii_digit() || c == '.' || c == '-' => {
                if self.form.begin_edit(true) {
                    self.form.edit_push(c);
                }
            }
            _ => {}
        }
    }

    fn handle_edit_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc => {
                self.form.cancel_edit();
                self.status = "Edit canceled.".to_string();
            }
            KeyCode::Enter => match self.form.commit_edit() {
                Ok(changed) => {
                    if changed {
                        self.input_changed();
                    }
                    self.status = self.field_status();
                }
                Err(msg) => self.status = msg,
            },
            KeyCode::Backspace => self.form.edit_pop(),
            KeyCode::Char(c) => self.form.edit_push(c),
            _ => {}
        }
    }

    fn handle_map_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Up => self.map.move_cursor(-1, 0),
            KeyCode::Down => self.map.move_cursor(1, 0),
            KeyCode::Left => self.map.move_cursor(0, -1),
            KeyCode::Right => self.map.move_cursor(0, 1),
            KeyCode::Enter | KeyCode::Char(' ') => {
                let message = self.map.select_at_cursor().message();
                self.input_changed();
                self.status = message;
            }
            _ => {}
        }
    }

    /// Returns `true` when something changed on screen.
    fn handle_mouse(&mut self, mouse: MouseEvent) -> bool {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return false;
        }
        let Some(selection) = self.map.click(mouse.column, mouse.row) else {
            return false;
        };
        let message = selection.message();
        self.focus = Focus::Map;
        self.input_changed();
        self.status = message;
        true
    }

    fn adjust(&mut self, delta: i32) {
        if self.form.adjust(delta) {
            self.input_changed();
            self.status = self.field_status();
        }
    }

    fn field_status(&self) -> String {
        let field = self.form.selected_field();
        format!("{}: {}", field.label(), self.form.display_value(field))
    }

    /// Any change to the inputs invalidates the shown result.
    fn input_changed(&mut self) {
        self.outcome = None;
    }

    fn predict(&mut self) {
        let query = self.form.to_query();
        let outcome = match query.validate() {
            Err(msg) => Outcome::Failed(msg),
            Ok(()) => match self.ctx.classify(&query) {
                Ok(result) => {
                    log::info!("scored listing: {} ({:.1}%)", result.label, result.confidence);
                    Outcome::Scored(result, Local::now())
                }
                Err(e) => {
                    log::error!("{e}");
                    Outcome::Failed(e.to_string())
                }
            },
        };
        self.status = match &outcome {
            Outcome::Scored(..) => "Prediction complete.".to_string(),
            Outcome::Failed(_) => "Prediction failed.".to_string(),
        };
        self.outcome = Some(outcome);
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),
                Constraint::Min(0),
                Constraint::Length(6),
                Constraint::Length(3),
            ])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_body(frame, chunks[1]);
        self.draw_result(frame, chunks[2]);
        self.draw_footer(frame, chunks[3]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let cat = self.ctx.catalogue();
        let lines = vec![
            Line::from(vec![
                Span::styled("lp", Style::default().fg(Color::Cyan)),
                Span::raw(" - Airbnb Price Classification in Sevilla"),
            ]),
            Line::from(Span::styled(
                format!(
                    "Predict whether a listing is High or Low price | {} neighbourhoods | {} room types | {} reference listings",
                    cat.neighbourhoods.len(),
                    cat.room_types.len(),
                    cat.listings.len(),
                ),
                Style::default().fg(Color::Gray),
            )),
        ];
        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_body(&mut self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(52), Constraint::Min(0)])
            .split(area);

        self.draw_form(frame, chunks[0]);
        self.draw_map(frame, chunks[1]);
    }

    fn draw_form(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let selected = self.form.selected_index();
        let items: Vec<ListItem> = Field::ALL
            .iter()
            .enumerate()
            .map(|(i, &field)| {
                if field == Field::Predict {
                    return ListItem::new(Line::from(Span::styled(
                        field.label(),
                        Style::default().add_modifier(Modifier::BOLD),
                    )));
                }
                let value = match self.form.edit_buffer() {
                    Some(buf) if i == selected => format!("{buf}_"),
                    _ => self.form.display_value(field),
                };
                ListItem::new(format!("{:<24} {value}", field.label()))
            })
            .collect();

        let list = List::new(items)
            .block(focus_block("Listing", self.focus == Focus::Form))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");

        let mut state = ListState::default();
        state.select(Some(selected));
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn draw_map(&mut self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(3)])
            .split(area);

        let block = focus_block("Sevilla map", self.focus == Focus::Map);
        let inner = block.inner(chunks[0]);
        frame.render_widget(block, chunks[0]);
        frame.render_widget(Clear, inner);
        self.map.set_area(inner);

        let cursor = self.map.cursor();
        // A rejected selection has no coordinates; it was made at the cursor.
        let selected = self
            .map
            .selection()
            .map(|s| (s.coordinates().unwrap_or(cursor), s.is_accepted()));
        let widget = SevillaMap {
            view: *self.map.view(),
            bounds: *self.map.bounds(),
            listings: &self.ctx.catalogue().listings,
            cursor,
            selected,
        };
        frame.render_widget(widget, inner);

        let (text, style) = match self.map.selection() {
            Some(sel) if sel.is_accepted() => (sel.message(), Style::default().fg(Color::Green)),
            Some(sel) => (sel.message(), Style::default().fg(Color::Red)),
            None => (
                format!(
                    "Click the map or press Enter to select. Cursor: {:.5}, {:.5}",
                    cursor.0, cursor.1
                ),
                Style::default().fg(Color::Gray),
            ),
        };
        let p = Paragraph::new(text)
            .style(style)
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, chunks[1]);
    }

    fn draw_result(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default().title("Prediction Result").borders(Borders::ALL);
        let lines = match &self.outcome {
            None => vec![Line::from(Span::styled(
                "Press p (or Enter on the Predict row) to classify the listing.",
                Style::default().fg(Color::Gray),
            ))],
            Some(Outcome::Scored(result, at)) => {
                let color = match result.label {
                    PriceLabel::HighPrice => Color::Yellow,
                    PriceLabel::LowPrice => Color::Green,
                };
                vec![
                    Line::from(Span::styled(
                        result.label.display_name(),
                        Style::default().fg(color).add_modifier(Modifier::BOLD),
                    )),
                    Line::from(result.sentence()),
                    Line::from(Span::styled(
                        format!("scored at {}", at.format("%H:%M:%S")),
                        Style::default().fg(Color::Gray),
                    )),
                ]
            }
            Some(Outcome::Failed(msg)) => vec![Line::from(Span::styled(
                msg.clone(),
                Style::default().fg(Color::Red),
            ))],
        };
        let p = Paragraph::new(Text::from(lines))
            .wrap(Wrap { trim: true })
            .block(block);
        frame.render_widget(p, area);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = match (self.form.is_editing(), self.focus) {
            (true, _) => "type value  Enter apply  Esc cancel",
            (false, Focus::Form) => "↑/↓ select  ←/→ adjust  Enter edit  p predict  Tab map  q quit",
            (false, Focus::Map) => "arrows move  Enter select  click select  p predict  Tab form  q quit",
        };
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

fn focus_block(title: &str, focused: bool) -> Block<'_> {
    let style = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(style)
}
