use crate::models::Book;

/// Entries of the main menu, in display order.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub(crate) enum MenuItem {
    ViewBooks,
    BorrowBook,
    ReturnBook,
    Logout,
}

impl MenuItem {
    pub(crate) const ALL: [MenuItem; 4] = [
        MenuItem::ViewBooks,
        MenuItem::BorrowBook,
        MenuItem::ReturnBook,
        MenuItem::Logout,
    ];

    pub(crate) fn label(self) -> &'static str {
        match self {
            MenuItem::ViewBooks => "View Books",
            MenuItem::BorrowBook => "Borrow Book",
            MenuItem::ReturnBook => "Return Book",
            MenuItem::Logout => "Logout",
        }
    }

    /// Single-key shortcut shown next to the label.
    pub(crate) fn hotkey(self) -> char {
        match self {
            MenuItem::ViewBooks => 'v',
            MenuItem::BorrowBook => 'b',
            MenuItem::ReturnBook => 'r',
            MenuItem::Logout => 'l',
        }
    }

    pub(crate) fn from_hotkey(ch: char) -> Option<Self> {
        let ch = ch.to_ascii_lowercase();
        Self::ALL.into_iter().find(|item| item.hotkey() == ch)
    }
}

/// Main menu shown after a successful login.
#[derive(Default)]
pub(crate) struct MenuScreen {
    pub(crate) selected: usize,
}

impl MenuScreen {
    pub(crate) fn current(&self) -> MenuItem {
        MenuItem::ALL[self.selected.min(MenuItem::ALL.len() - 1)]
    }

    pub(crate) fn move_selection(&mut self, offset: isize) {
        let len = MenuItem::ALL.len() as isize;
        let new = (self.selected as isize + offset).clamp(0, len - 1);
        self.selected = new as usize;
    }
}

/// Scrollable view over the whole catalog.
pub(crate) struct BookListScreen {
    pub(crate) books: Vec<Book>,
    pub(crate) selected: usize,
}

impl BookListScreen {
    pub(crate) fn new(books: Vec<Book>) -> Self {
        let mut screen = Self { books, selected: 0 };
        screen.ensure_in_bounds();
        screen
    }

    pub(crate) fn current_book(&self) -> Option<&Book> {
        self.books.get(self.selected)
    }

    pub(crate) fn move_selection(&mut self, offset: isize) {
        if self.books.is_empty() {
            return;
        }
        let len = self.books.len() as isize;
        let new = (self.selected as isize + offset).clamp(0, len - 1);
        self.selected = new as usize;
    }

    pub(crate) fn select_first(&mut self) {
        self.selected = 0;
    }

    pub(crate) fn select_last(&mut self) {
        self.selected = self.books.len().saturating_sub(1);
    }

    /// Swap in a freshly loaded catalog while keeping the cursor where it was.
    pub(crate) fn set_books(&mut self, books: Vec<Book>) {
        self.books = books;
        self.ensure_in_bounds();
    }

    fn ensure_in_bounds(&mut self) {
        if self.books.is_empty() {
            self.selected = 0;
        } else if self.selected >= self.books.len() {
            self.selected = self.books.len() - 1;
        }
    }
}
