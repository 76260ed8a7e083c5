use crossterm::event::{Event, KeyCode, KeyEventKind, KeyModifiers};
use ratatui::Frame;
use std::path::{Path, PathBuf};

use crate::commands::SqliteInspector;
use crate::commands::sqlite_inspector::ColumnInfo;

use super::views;

pub const PAGE_SIZE: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Screen {
    Tables,
    Table,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TableTab {
    Schema,
    Preview,
}

#[derive(Debug, Clone)]
pub enum Popup {
    None,
    Message { title: String, body: String },
}

#[derive(Debug)]
pub enum Message {
    Quit,
    NavigateUp,
    NavigateDown,
    Enter,
    Back,
    SwitchTab,
    ScrollUp,
    ScrollDown,
    NextPage,
    PrevPage,
    ClosePopup,
    Noop,
}

pub struct TableEntry {
    pub name: String,
    /// `None` when the table could not be counted
    pub row_count: Option<usize>,
}

pub struct App {
    pub should_quit: bool,
    pub current_screen: Screen,
    pub store_path: PathBuf,
    inspector: SqliteInspector,
    // Table list
    pub tables: Vec<TableEntry>,
    pub tables_selected: usize,
    // Open table
    pub table_name: Option<String>,
    pub table_tab: TableTab,
    pub table_columns: Vec<ColumnInfo>,
    pub table_row_count: usize,
    pub preview_headers: Vec<String>,
    pub preview_data: Vec<Vec<String>>,
    pub table_scroll: usize,
    pub table_page: usize,
    // Popup
    pub popup: Popup,
}

impl App {
    pub fn new(path: &Path) -> anyhow::Result<Self> {
        let inspector = SqliteInspector::open(path)?;

        let tables = inspector
            .tables()?
            .into_iter()
            .map(|name| {
                let row_count = inspector.row_count(&name).ok();
                TableEntry { name, row_count }
            })
            .collect();

        Ok(Self {
            should_quit: false,
            current_screen: Screen::Tables,
            store_path: path.to_path_buf(),
            inspector,
            tables,
            tables_selected: 0,
            table_name: None,
            table_tab: TableTab::Schema,
            table_columns: Vec::new(),
            table_row_count: 0,
            preview_headers: Vec::new(),
            preview_data: Vec::new(),
            table_scroll: 0,
            table_page: 0,
            popup: Popup::None,
        })
    }

    pub fn handle_event(&self, event: Event) -> Message {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key),
            _ => Message::Noop,
        }
    }

    fn handle_key(&self, key: crossterm::event::KeyEvent) -> Message {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Message::Quit;
        }

        // Popup handling takes priority over everything but Ctrl-C
        if let Popup::Message { .. } = self.popup {
            return match key.code {
                KeyCode::Enter | KeyCode::Esc => Message::ClosePopup,
                _ => Message::Noop,
            };
        }

        // Global quit
        if key.code == KeyCode::Char('q') {
            return Message::Quit;
        }

        match self.current_screen {
            Screen::Tables => match key.code {
                KeyCode::Up | KeyCode::Char('k') => Message::NavigateUp,
                KeyCode::Down | KeyCode::Char('j') => Message::NavigateDown,
                KeyCode::Enter => Message::Enter,
                _ => Message::Noop,
            },
            Screen::Table => match key.code {
                KeyCode::Tab => Message::SwitchTab,
                KeyCode::Up | KeyCode::Char('k') => Message::ScrollUp,
                KeyCode::Down | KeyCode::Char('j') => Message::ScrollDown,
                KeyCode::Right => Message::NextPage,
                KeyCode::Left => Message::PrevPage,
                KeyCode::Esc => Message::Back,
                _ => Message::Noop,
            },
        }
    }

    pub fn update(&mut self, message: Message) {
        match message {
            Message::Quit => self.should_quit = true,
            Message::NavigateUp => {
                self.tables_selected = self.tables_selected.saturating_sub(1);
            }
            Message::NavigateDown => {
                if self.tables_selected + 1 < self.tables.len() {
                    self.tables_selected += 1;
                }
            }
            Message::Enter => self.open_selected_table(),
            Message::Back => self.current_screen = Screen::Tables,
            Message::SwitchTab => self.switch_tab(),
            Message::ScrollUp => self.table_scroll = self.table_scroll.saturating_sub(1),
            Message::ScrollDown => self.scroll_down(),
            Message::NextPage => self.next_page(),
            Message::PrevPage => self.prev_page(),
            Message::ClosePopup => self.popup = Popup::None,
            Message::Noop => {}
        }
    }

    pub fn total_pages(&self) -> usize {
        self.table_row_count.div_ceil(PAGE_SIZE)
    }

    fn open_selected_table(&mut self) {
        let Some(entry) = self.tables.get(self.tables_selected) else {
            return;
        };
        let name = entry.name.clone();

        match self.load_table(&name) {
            Ok(()) => self.current_screen = Screen::Table,
            Err(e) => self.show_error(e.to_string()),
        }
    }

    fn load_table(&mut self, name: &str) -> anyhow::Result<()> {
        let columns = self.inspector.columns(name)?;
        let row_count = self.inspector.row_count(name)?;
        let (headers, data) = self.inspector.preview(name, PAGE_SIZE, 0)?;

        self.table_name = Some(name.to_string());
        self.table_tab = TableTab::Schema;
        self.table_columns = columns;
        self.table_row_count = row_count;
        self.preview_headers = headers;
        self.preview_data = data;
        self.table_scroll = 0;
        self.table_page = 0;
        Ok(())
    }

    fn switch_tab(&mut self) {
        self.table_scroll = 0;
        self.table_tab = match self.table_tab {
            TableTab::Schema => TableTab::Preview,
            TableTab::Preview => TableTab::Schema,
        };
    }

    fn scroll_down(&mut self) {
        let max = match self.table_tab {
            TableTab::Schema => self.table_columns.len(),
            TableTab::Preview => self.preview_data.len(),
        };
        if self.table_scroll + 1 < max {
            self.table_scroll += 1;
        }
    }

    fn next_page(&mut self) {
        if self.table_tab != TableTab::Preview {
            return;
        }
        if self.table_page + 1 < self.total_pages() {
            self.load_page(self.table_page + 1);
        }
    }

    fn prev_page(&mut self) {
        if self.table_tab != TableTab::Preview {
            return;
        }
        if self.table_page > 0 {
            self.load_page(self.table_page - 1);
        }
    }

    fn load_page(&mut self, page: usize) {
        let Some(name) = self.table_name.clone() else {
            return;
        };
        match self.inspector.preview(&name, PAGE_SIZE, page * PAGE_SIZE) {
            Ok((headers, data)) => {
                self.preview_headers = headers;
                self.preview_data = data;
                self.table_page = page;
                self.table_scroll = 0;
            }
            Err(e) => self.show_error(e.to_string()),
        }
    }

    fn show_error(&mut self, body: String) {
        self.popup = Popup::Message {
            title: "Error".to_string(),
            body,
        };
    }

    pub fn view(&self, frame: &mut Frame) {
        match self.current_screen {
            Screen::Tables => views::tables::render(frame, self),
            Screen::Table => views::table::render(frame, self),
        }
    }
}
