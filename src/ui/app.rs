use std::cmp::min;
use std::ffi::OsStr;
use std::mem;
use std::path::PathBuf;

use anyhow::{Context, Result};
use crossterm::event::KeyCode;
use open::that as open_link;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::prelude::*;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::Frame;

use crate::catalog::Catalog;
use crate::error::{AuthError, BorrowError, ReturnError};
use crate::models::{Book, Cover};
use crate::session::{AuthGate, Session};
use crate::store::JsonStore;

use super::forms::{LoanAction, LoginField, LoginForm, TitlePrompt};
use super::helpers::{catalog_line, centered_rect, surface_error};
use super::screens::{BookListScreen, MenuItem, MenuScreen};

/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;
/// Height allocation per book card in the catalog view.
const BOOK_CARD_HEIGHT: u16 = 5;

/// High-level navigation states. Login is the only screen reachable without
/// an identity.
enum Screen {
    Login(LoginForm),
    Menu(MenuScreen),
    Books(BookListScreen),
}

/// Fine-grained modes scoped to the current screen.
enum Mode {
    Normal,
    Prompt(TitlePrompt),
}

/// Holds the footer message text plus its severity.
struct StatusMessage {
    text: String,
    kind: StatusKind,
}

/// Severity levels shown in the footer.
enum StatusKind {
    Info,
    Error,
}

impl StatusKind {
    fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// Central application state shared across the TUI.
pub struct App {
    catalog: Catalog,
    gate: AuthGate,
    session: Session,
    /// Directory local cover filenames are resolved against.
    cover_dir: PathBuf,
    screen: Screen,
    mode: Mode,
    status: Option<StatusMessage>,
}

impl App {
    pub fn new(store: JsonStore, cover_dir: impl Into<PathBuf>) -> Self {
        Self {
            catalog: Catalog::new(store.clone()),
            gate: AuthGate::new(store),
            session: Session::default(),
            cover_dir: cover_dir.into(),
            screen: Screen::Login(LoginForm::default()),
            mode: Mode::Normal,
            status: None,
        }
    }

    /// Process one key press. Returns `true` when the kiosk should exit.
    pub fn handle_key(&mut self, code: KeyCode) -> bool {
        let mut exit = false;
        let mode = mem::replace(&mut self.mode, Mode::Normal);

        self.mode = match mode {
            Mode::Normal => self.handle_normal_key(code, &mut exit),
            Mode::Prompt(prompt) => self.handle_prompt(code, prompt),
        };

        exit
    }

    fn handle_normal_key(&mut self, code: KeyCode, exit: &mut bool) -> Mode {
        match self.screen {
            Screen::Login(_) => {
                self.handle_login_key(code, exit);
                Mode::Normal
            }
            Screen::Menu(ref mut menu) => {
                let item = match code {
                    KeyCode::Char('q') | KeyCode::Char('Q') => {
                        *exit = true;
                        None
                    }
                    KeyCode::Up => {
                        menu.move_selection(-1);
                        None
                    }
                    KeyCode::Down => {
                        menu.move_selection(1);
                        None
                    }
                    KeyCode::Enter => Some(menu.current()),
                    KeyCode::Char(ch) => MenuItem::from_hotkey(ch),
                    _ => None,
                };

                match item {
                    Some(item) => {
                        self.clear_status();
                        let result = self.activate(item);
                        self.recover(result)
                    }
                    None => Mode::Normal,
                }
            }
            Screen::Books(ref mut list) => {
                let mut action: Option<LoanAction> = None;
                let mut back_to_menu = false;
                let mut open_cover = false;

                {
                    let list = &mut *list;
                    match code {
                        KeyCode::Char('q') | KeyCode::Char('Q') => {
                            *exit = true;
                        }
                        KeyCode::Esc | KeyCode::Char('m') | KeyCode::Char('M') => {
                            back_to_menu = true;
                        }
                        KeyCode::Up => list.move_selection(-1),
                        KeyCode::Down => list.move_selection(1),
                        KeyCode::PageUp => list.move_selection(-5),
                        KeyCode::PageDown => list.move_selection(5),
                        KeyCode::Home => list.select_first(),
                        KeyCode::End => list.select_last(),
                        KeyCode::Enter => open_cover = true,
                        KeyCode::Char('b') | KeyCode::Char('B') => {
                            action = Some(LoanAction::Borrow);
                        }
                        KeyCode::Char('r') | KeyCode::Char('R') => {
                            action = Some(LoanAction::Return);
                        }
                        _ => {}
                    }
                }

                if back_to_menu {
                    self.clear_status();
                    self.screen = Screen::Menu(MenuScreen::default());
                } else if open_cover {
                    self.open_selected_cover();
                } else if let Some(action) = action {
                    self.clear_status();
                    let prefill = self.selected_title_for(action);
                    let result = self.open_prompt(action, prefill);
                    return self.recover(result);
                }

                Mode::Normal
            }
        }
    }

    fn handle_login_key(&mut self, code: KeyCode, exit: &mut bool) {
        let Screen::Login(form) = &mut self.screen else {
            return;
        };

        match code {
            KeyCode::Esc => *exit = true,
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => form.toggle_field(),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Enter => {
                if form.active == LoginField::Username {
                    form.toggle_field();
                } else {
                    let (username, password) = form.credentials();
                    self.submit_login(&username, &password);
                }
            }
            KeyCode::Char(ch) => {
                if form.push_char(ch) {
                    form.error = None;
                }
            }
            _ => {}
        }
    }

    fn submit_login(&mut self, username: &str, password: &str) {
        match self.session.login(&self.gate, username, password) {
            Ok(identity) => {
                let message = format!("Welcome, {identity}!");
                self.screen = Screen::Menu(MenuScreen::default());
                self.set_status(message, StatusKind::Info);
            }
            Err(AuthError::InvalidCredentials) => {
                let message = "Invalid username or password.";
                if let Screen::Login(form) = &mut self.screen {
                    form.error = Some(message.to_string());
                    form.clear_password();
                }
                self.set_status(message, StatusKind::Error);
            }
            Err(AuthError::Store(err)) => {
                tracing::error!(error = %err, "could not read accounts");
                self.set_status(format!("Could not read accounts: {err}"), StatusKind::Error);
            }
        }
    }

    fn activate(&mut self, item: MenuItem) -> Result<Mode> {
        match item {
            MenuItem::ViewBooks => {
                let books = self.catalog.list_books().context("failed to load catalog")?;
                self.screen = Screen::Books(BookListScreen::new(books));
                Ok(Mode::Normal)
            }
            MenuItem::BorrowBook => self.open_prompt(LoanAction::Borrow, None),
            MenuItem::ReturnBook => self.open_prompt(LoanAction::Return, None),
            MenuItem::Logout => {
                self.logout();
                Ok(Mode::Normal)
            }
        }
    }

    /// Open the borrow/return prompt, or explain why there is nothing to pick.
    fn open_prompt(&mut self, action: LoanAction, prefill: Option<String>) -> Result<Mode> {
        let candidates = match action {
            LoanAction::Borrow => self.catalog.available_books(),
            LoanAction::Return => self.catalog.borrowed_books(),
        }
        .context("failed to load catalog")?;

        if candidates.is_empty() {
            let message = match action {
                LoanAction::Borrow => "No books are currently available for borrowing.",
                LoanAction::Return => "No books are currently borrowed.",
            };
            self.set_status(message, StatusKind::Info);
            return Ok(Mode::Normal);
        }

        let titles = candidates.into_iter().map(|book| book.title).collect();
        let prompt = TitlePrompt::new(action, titles).with_input(prefill.unwrap_or_default());
        Ok(Mode::Prompt(prompt))
    }

    fn handle_prompt(&mut self, code: KeyCode, mut prompt: TitlePrompt) -> Mode {
        match code {
            KeyCode::Esc => {
                self.set_status(format!("{} cancelled.", prompt.action.title()), StatusKind::Info);
                Mode::Normal
            }
            KeyCode::Backspace => {
                prompt.backspace();
                Mode::Prompt(prompt)
            }
            KeyCode::Enter => self.submit_prompt(prompt),
            KeyCode::Char(ch) => {
                if prompt.push_char(ch) {
                    prompt.error = None;
                }
                Mode::Prompt(prompt)
            }
            _ => Mode::Prompt(prompt),
        }
    }

    fn submit_prompt(&mut self, mut prompt: TitlePrompt) -> Mode {
        let Some(title) = prompt.parse_input() else {
            self.set_status(format!("{} cancelled.", prompt.action.title()), StatusKind::Info);
            return Mode::Normal;
        };

        let outcome = match prompt.action {
            LoanAction::Borrow => self.borrow_title(&title),
            LoanAction::Return => self.return_title(&title),
        };

        match outcome {
            Ok(book) => {
                let verb = match prompt.action {
                    LoanAction::Borrow => "borrowed",
                    LoanAction::Return => "returned",
                };
                self.set_status(format!("You {verb} '{}'!", book.title), StatusKind::Info);
                let refreshed = self.refresh_book_list();
                self.recover(refreshed.map(|_| Mode::Normal))
            }
            Err(PromptFailure::NoMatch(message)) => {
                prompt.error = Some(message.to_string());
                self.set_status(message, StatusKind::Error);
                Mode::Prompt(prompt)
            }
            Err(PromptFailure::NothingToDo(message)) => {
                self.set_status(message, StatusKind::Info);
                Mode::Normal
            }
            Err(PromptFailure::Failed(err)) => {
                tracing::error!(error = %err, action = prompt.action.verb(), "loan operation failed");
                self.set_status(surface_error(&err), StatusKind::Error);
                Mode::Normal
            }
        }
    }

    fn borrow_title(&self, title: &str) -> Result<Book, PromptFailure> {
        self.catalog.borrow(title).map_err(|err| match err {
            BorrowError::NotFoundOrUnavailable => {
                PromptFailure::NoMatch("Book not found or already borrowed.")
            }
            BorrowError::NoneAvailable => {
                PromptFailure::NothingToDo("No books are currently available for borrowing.")
            }
            BorrowError::Store(err) => {
                PromptFailure::Failed(anyhow::Error::new(err).context("failed to borrow book"))
            }
        })
    }

    fn return_title(&self, title: &str) -> Result<Book, PromptFailure> {
        self.catalog.return_book(title).map_err(|err| match err {
            ReturnError::NotFoundOrAvailable => {
                PromptFailure::NoMatch("Book not found or already available.")
            }
            ReturnError::NoneBorrowed => {
                PromptFailure::NothingToDo("No books are currently borrowed.")
            }
            ReturnError::Store(err) => {
                PromptFailure::Failed(anyhow::Error::new(err).context("failed to return book"))
            }
        })
    }

    /// Discard the identity and go back to an empty login form.
    fn logout(&mut self) {
        self.session.logout();
        self.screen = Screen::Login(LoginForm::default());
        self.mode = Mode::Normal;
        self.set_status("Logged out.", StatusKind::Info);
    }

    fn refresh_book_list(&mut self) -> Result<()> {
        if let Screen::Books(list) = &mut self.screen {
            let books = self.catalog.list_books().context("failed to reload catalog")?;
            list.set_books(books);
        }
        Ok(())
    }

    /// Prefill the prompt with the highlighted title when it can take part in
    /// the requested action.
    fn selected_title_for(&self, action: LoanAction) -> Option<String> {
        let Screen::Books(list) = &self.screen else {
            return None;
        };
        let book = list.current_book()?;
        let eligible = match action {
            LoanAction::Borrow => book.is_available,
            LoanAction::Return => !book.is_available,
        };
        eligible.then(|| book.title.clone())
    }

    /// Hand the highlighted cover to the system viewer. Failures only produce
    /// a status message.
    fn open_selected_cover(&mut self) {
        let Screen::Books(list) = &self.screen else {
            return;
        };
        let Some(book) = list.current_book() else {
            self.set_status("No book selected.", StatusKind::Error);
            return;
        };

        let title = book.title.clone();
        let (status, kind) = match book.cover(&self.cover_dir) {
            Cover::Missing => ("This book does not have a cover.".to_string(), StatusKind::Error),
            Cover::Local(path) if !path.exists() => (
                format!("Cover file {} not found.", path.display()),
                StatusKind::Error,
            ),
            Cover::Local(path) => Self::open_cover(&title, path.as_os_str()),
            Cover::Remote(url) => Self::open_cover(&title, OsStr::new(&url)),
        };
        self.set_status(status, kind);
    }

    fn open_cover(title: &str, target: &OsStr) -> (String, StatusKind) {
        match open_link(target) {
            Ok(()) => (format!("Opened cover for '{title}'."), StatusKind::Info),
            Err(err) => {
                tracing::warn!(error = %err, title, "could not open cover");
                (format!("Failed to open cover: {err}"), StatusKind::Error)
            }
        }
    }

    fn recover(&mut self, result: Result<Mode>) -> Mode {
        result.unwrap_or_else(|err| {
            tracing::error!(error = %format!("{err:#}"), "operation failed");
            self.set_status(surface_error(&err), StatusKind::Error);
            Mode::Normal
        })
    }

    pub(crate) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let footer_height = FOOTER_HEIGHT.min(area.height);

        let (content_area, footer_area) = if area.height > footer_height {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(0), Constraint::Length(footer_height)])
                .split(area);
            (chunks[0], chunks[1])
        } else {
            (area, area)
        };

        match &self.screen {
            Screen::Login(form) => self.draw_login(frame, content_area, form),
            Screen::Menu(menu) => self.draw_menu(frame, content_area, menu),
            Screen::Books(list) => self.draw_book_list(frame, content_area, list),
        }

        if area.height >= footer_height {
            self.draw_footer(frame, footer_area);
        }

        match &self.mode {
            Mode::Prompt(prompt) => self.draw_prompt(frame, area, prompt),
            Mode::Normal => {}
        }
    }

    fn draw_login(&self, frame: &mut Frame, area: Rect, form: &LoginForm) {
        let popup_area = centered_rect(50, 40, area);
        let block = Block::default()
            .title("Library Kiosk Login")
            .borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let mut lines = vec![
            form.build_line("Username", LoginField::Username),
            form.build_line("Password", LoginField::Password),
            Line::from(""),
        ];

        if let Some(error) = &form.error {
            lines.push(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(Color::Red),
            )));
        } else {
            lines.push(Line::from(Span::styled(
                "Enter to continue • Tab to switch • Esc to quit",
                Style::default().fg(Color::Gray),
            )));
        }

        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);

        if matches!(self.mode, Mode::Normal) {
            let (prefix, row) = match form.active {
                LoginField::Username => ("Username: ".len() as u16, 0),
                LoginField::Password => ("Password: ".len() as u16, 1),
            };
            frame.set_cursor_position((
                inner.x + prefix + form.value_len(form.active) as u16,
                inner.y + row,
            ));
        }
    }

    fn draw_menu(&self, frame: &mut Frame, area: Rect, menu: &MenuScreen) {
        let popup_area = centered_rect(50, 50, area);
        let heading = match self.session.identity() {
            Some(identity) => format!("Welcome, {identity}!"),
            None => "Library Kiosk".to_string(),
        };
        let block = Block::default().title(heading).borders(Borders::ALL);

        let items: Vec<ListItem> = MenuItem::ALL
            .iter()
            .map(|item| ListItem::new(format!("[{}] {}", item.hotkey(), item.label())))
            .collect();

        let list = List::new(items)
            .block(block)
            .highlight_style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("▶ ");

        let mut list_state = ListState::default();
        list_state.select(Some(menu.selected));
        frame.render_stateful_widget(list, popup_area, &mut list_state);
    }

    fn draw_book_list(&self, frame: &mut Frame, area: Rect, list: &BookListScreen) {
        let block = Block::default().title("Book List").borders(Borders::ALL);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        if list.books.is_empty() {
            let message = Paragraph::new("The catalog is empty.")
                .alignment(Alignment::Center)
                .style(Style::default().fg(Color::Gray));
            frame.render_widget(message, inner);
            return;
        }

        self.render_book_cards(frame, inner, &list.books, list.selected);
    }

    fn render_book_cards(&self, frame: &mut Frame, area: Rect, books: &[Book], selected: usize) {
        if area.height == 0 {
            return;
        }

        let card_height = BOOK_CARD_HEIGHT as usize;
        let capacity = ((area.height as usize) / card_height).max(1);
        let len = books.len();
        let mut start = if selected >= capacity {
            selected + 1 - capacity
        } else {
            0
        };
        if start + capacity > len {
            start = len.saturating_sub(capacity);
        }
        let end = min(start + capacity, len);
        let visible_len = end.saturating_sub(start);
        if visible_len == 0 {
            return;
        }

        let constraints: Vec<Constraint> = (0..visible_len)
            .map(|_| Constraint::Length(BOOK_CARD_HEIGHT))
            .collect();
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(area);

        for (idx, chunk) in rows.iter().enumerate() {
            if chunk.height == 0 {
                continue;
            }

            let position = start + idx;
            let book = &books[position];
            let mut block = Block::default().borders(Borders::ALL);
            let mut paragraph_style = Style::default();
            if position == selected {
                block = block.style(Style::default().fg(Color::Yellow));
                paragraph_style = Style::default().fg(Color::Yellow);
            }

            let marker = if position == selected { "▶ " } else { "" };
            let status_style = if book.is_available {
                Style::default().fg(Color::Green)
            } else {
                Style::default().fg(Color::Red)
            };

            let cover_text = match book.cover(&self.cover_dir) {
                Cover::Missing => "No cover".to_string(),
                Cover::Remote(url) => format!("Image: {url}"),
                Cover::Local(_) => format!("Image: {}", book.image.trim()),
            };

            let lines = vec![
                Line::from(vec![
                    Span::styled(
                        format!("{marker}{}", catalog_line(position, book)),
                        Style::default().add_modifier(Modifier::BOLD),
                    ),
                ]),
                Line::from(Span::styled(book.status_label(), status_style)),
                Line::from(Span::styled(cover_text, Style::default().fg(Color::Cyan))),
            ];

            let paragraph = Paragraph::new(lines)
                .block(block)
                .wrap(Wrap { trim: true })
                .alignment(Alignment::Left)
                .style(paragraph_style);

            frame.render_widget(paragraph, *chunk);
        }
    }

    fn draw_prompt(&self, frame: &mut Frame, area: Rect, prompt: &TitlePrompt) {
        let popup_area = centered_rect(60, 60, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title(prompt.action.title())
            .borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let mut lines = vec![Line::from(prompt.action.candidates_heading())];
        lines.extend(
            prompt
                .candidates
                .iter()
                .map(|title| Line::from(format!("  {title}"))),
        );
        lines.push(Line::from(""));

        let input_row = lines.len() as u16;
        let label = format!("Title to {}: ", prompt.action.verb());
        lines.push(Line::from(vec![
            Span::raw(label.clone()),
            Span::styled(prompt.input.clone(), Style::default().fg(Color::Yellow)),
        ]));
        lines.push(Line::from(""));

        if let Some(error) = &prompt.error {
            lines.push(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(Color::Red),
            )));
        } else {
            lines.push(Line::from(Span::styled(
                "Enter to confirm • Esc to cancel",
                Style::default().fg(Color::Gray),
            )));
        }

        let paragraph = Paragraph::new(lines);
        frame.render_widget(paragraph, inner);

        if input_row < inner.height {
            frame.set_cursor_position((
                inner.x + label.chars().count() as u16 + prompt.input_len() as u16,
                inner.y + input_row,
            ));
        }
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = if let Some(status) = &self.status {
            Line::from(vec![Span::styled(status.text.clone(), status.kind.style())])
        } else {
            Line::from("")
        };

        let instructions = self.footer_instructions();

        let paragraph = Paragraph::new(vec![status_line, instructions]).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn footer_instructions(&self) -> Line<'static> {
        let key_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        match (&self.screen, &self.mode) {
            (_, Mode::Prompt(_)) => Line::from(vec![
                Span::styled("[Enter]", key_style),
                Span::raw(" Confirm   "),
                Span::styled("[Esc]", key_style),
                Span::raw(" Cancel"),
            ]),
            (Screen::Login(_), _) => Line::from(vec![
                Span::styled("[Tab]", key_style),
                Span::raw(" Switch Field   "),
                Span::styled("[Enter]", key_style),
                Span::raw(" Login   "),
                Span::styled("[Esc]", key_style),
                Span::raw(" Quit"),
            ]),
            (Screen::Menu(_), _) => Line::from(vec![
                Span::styled("[↑↓]", key_style),
                Span::raw(" Navigate   "),
                Span::styled("[Enter]", key_style),
                Span::raw(" Select   "),
                Span::styled("[v/b/r/l]", key_style),
                Span::raw(" Shortcuts   "),
                Span::styled("[q]", key_style),
                Span::raw(" Quit"),
            ]),
            (Screen::Books(_), _) => Line::from(vec![
                Span::styled("[↑↓]", key_style),
                Span::raw(" Navigate   "),
                Span::styled("[Enter]", key_style),
                Span::raw(" Open Cover   "),
                Span::styled("[b]", key_style),
                Span::raw(" Borrow   "),
                Span::styled("[r]", key_style),
                Span::raw(" Return   "),
                Span::styled("[Esc]", key_style),
                Span::raw(" Menu   "),
                Span::styled("[q]", key_style),
                Span::raw(" Quit"),
            ]),
        }
    }

    fn set_status<S: Into<String>>(&mut self, text: S, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    fn clear_status(&mut self) {
        self.status = None;
    }
}

/// Why a borrow/return prompt did not go through.
enum PromptFailure {
    /// The title did not match; the prompt stays open for another try.
    NoMatch(&'static str),
    /// Nothing is eligible any more; the prompt closes.
    NothingToDo(&'static str),
    Failed(anyhow::Error),
}
