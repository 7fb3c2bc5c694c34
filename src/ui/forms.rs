use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

/// Internal representation of the login form fields.
#[derive(Default, Clone)]
pub(crate) struct LoginForm {
    pub(crate) username: String,
    pub(crate) password: String,
    pub(crate) active: LoginField,
    pub(crate) error: Option<String>,
}

/// Fields available within the login form.
#[derive(Copy, Clone, Default, PartialEq, Eq, Debug)]
pub(crate) enum LoginField {
    #[default]
    Username,
    Password,
}

impl LoginForm {
    /// Swap focus between the username and password fields.
    pub(crate) fn toggle_field(&mut self) {
        self.active = match self.active {
            LoginField::Username => LoginField::Password,
            LoginField::Password => LoginField::Username,
        };
    }

    /// Append a character to the active field. Control characters are ignored.
    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        match self.active {
            LoginField::Username => self.username.push(ch),
            LoginField::Password => self.password.push(ch),
        }
        true
    }

    pub(crate) fn backspace(&mut self) {
        match self.active {
            LoginField::Username => {
                self.username.pop();
            }
            LoginField::Password => {
                self.password.pop();
            }
        }
    }

    /// Wipe the secret after a rejected attempt and put the cursor back on it.
    pub(crate) fn clear_password(&mut self) {
        self.password.clear();
        self.active = LoginField::Password;
    }

    /// Credentials exactly as typed; the gate decides whether they are valid.
    pub(crate) fn credentials(&self) -> (String, String) {
        (self.username.clone(), self.password.clone())
    }

    /// Render a single line for the form widget. The password is masked.
    pub(crate) fn build_line(&self, field_name: &str, field: LoginField) -> Line<'static> {
        let value = match field {
            LoginField::Username => self.username.clone(),
            LoginField::Password => "*".repeat(self.password.chars().count()),
        };
        let is_active = self.active == field;

        let style = if is_active {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        };

        Line::from(vec![
            Span::raw(format!("{field_name}: ")),
            Span::styled(value, style),
        ])
    }

    /// Return the character count for the requested field.
    pub(crate) fn value_len(&self, field: LoginField) -> usize {
        match field {
            LoginField::Username => self.username.chars().count(),
            LoginField::Password => self.password.chars().count(),
        }
    }
}

/// Which way a title prompt moves a book.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub(crate) enum LoanAction {
    Borrow,
    Return,
}

impl LoanAction {
    pub(crate) fn title(self) -> &'static str {
        match self {
            LoanAction::Borrow => "Borrow Book",
            LoanAction::Return => "Return Book",
        }
    }

    /// Heading above the candidate list.
    pub(crate) fn candidates_heading(self) -> &'static str {
        match self {
            LoanAction::Borrow => "Available Books:",
            LoanAction::Return => "Borrowed Books:",
        }
    }

    pub(crate) fn verb(self) -> &'static str {
        match self {
            LoanAction::Borrow => "borrow",
            LoanAction::Return => "return",
        }
    }
}

/// Modal state for the borrow/return title prompt.
#[derive(Clone)]
pub(crate) struct TitlePrompt {
    pub(crate) action: LoanAction,
    pub(crate) candidates: Vec<String>,
    pub(crate) input: String,
    pub(crate) error: Option<String>,
}

impl TitlePrompt {
    pub(crate) fn new(action: LoanAction, candidates: Vec<String>) -> Self {
        Self {
            action,
            candidates,
            input: String::new(),
            error: None,
        }
    }

    pub(crate) fn with_input(mut self, input: impl Into<String>) -> Self {
        self.input = input.into();
        self
    }

    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        self.input.push(ch);
        true
    }

    pub(crate) fn backspace(&mut self) {
        self.input.pop();
    }

    /// Trimmed title, or `None` when the prompt was left empty.
    pub(crate) fn parse_input(&self) -> Option<String> {
        let title = self.input.trim();
        if title.is_empty() {
            None
        } else {
            Some(title.to_string())
        }
    }

    pub(crate) fn input_len(&self) -> usize {
        self.input.chars().count()
    }
}
