use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use listo_core::{Clock, Task, TaskStore, TaskUpdate, TodoState};
use ratatui::widgets::TableState;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Confirm {
    Delete(Uuid),
    ClearCompleted(usize),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputMode {
    Normal,
    Adding,
    Editing(Uuid),
    Confirming(Confirm),
}

pub struct App<S: TaskStore, C: Clock> {
    pub state: TodoState<S, C>,
    /// Display-ordered snapshot of `state`, rebuilt after every action.
    pub rows: Vec<Task>,
    pub table_state: TableState,
    pub input: String,
    pub input_mode: InputMode,
    pub cursor_position: usize,
    pub should_quit: bool,
}

impl<S: TaskStore, C: Clock> App<S, C> {
    pub fn new(state: TodoState<S, C>) -> Self {
        let mut app = App {
            state,
            rows: Vec::new(),
            table_state: TableState::default(),
            input: String::new(),
            input_mode: InputMode::Normal,
            cursor_position: 0,
            should_quit: false,
        };
        app.refresh(None);
        app
    }

    pub fn selected_task(&self) -> Option<&Task> {
        self.table_state.selected().and_then(|i| self.rows.get(i))
    }

    /// Rebuilds `rows`, keeping `focus` selected when it is still present.
    fn refresh(&mut self, focus: Option<Uuid>) {
        let previous = self.table_state.selected();
        self.rows = self.state.display_tasks();

        let selected = match focus.and_then(|id| self.rows.iter().position(|t| t.id == id)) {
            Some(i) => Some(i),
            None if self.rows.is_empty() => None,
            None => Some(previous.unwrap_or(0).min(self.rows.len() - 1)),
        };
        self.table_state.select(selected);
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        match self.input_mode {
            InputMode::Normal => match key.code {
                KeyCode::Char('q') => self.should_quit = true,
                KeyCode::Down | KeyCode::Char('j') => self.next(),
                KeyCode::Up | KeyCode::Char('k') => self.previous(),
                KeyCode::Char(' ') => self.toggle_selected(),
                KeyCode::Char('a') => self.enter_add_mode(),
                KeyCode::Char('e') | KeyCode::Enter => self.enter_edit_mode(),
                KeyCode::Char('d') | KeyCode::Delete => self.request_delete(),
                KeyCode::Char('c') => self.request_clear_completed(),
                KeyCode::Char('x') => self.state.clear_error(),
                _ => {}
            },
            InputMode::Adding | InputMode::Editing(_) => match key.code {
                KeyCode::Enter => self.submit(),
                KeyCode::Esc => self.exit_input_mode(),
                KeyCode::Char(c) => self.input_char(c),
                KeyCode::Backspace => self.delete_char(),
                KeyCode::Left => self.move_cursor_left(),
                KeyCode::Right => self.move_cursor_right(),
                _ => {}
            },
            InputMode::Confirming(_) => {
                self.confirm(matches!(key.code, KeyCode::Char('y') | KeyCode::Char('Y')))
            }
        }
    }

    pub fn next(&mut self) {
        if self.rows.is_empty() {
            return;
        }

        let i = match self.table_state.selected() {
            Some(i) if i + 1 < self.rows.len() => i + 1,
            _ => 0,
        };
        self.table_state.select(Some(i));
    }

    pub fn previous(&mut self) {
        if self.rows.is_empty() {
            return;
        }

        let i = match self.table_state.selected() {
            Some(0) | None => self.rows.len() - 1,
            Some(i) => i - 1,
        };
        self.table_state.select(Some(i));
    }

    pub fn toggle_selected(&mut self) {
        if let Some(id) = self.selected_task().map(|t| t.id) {
            self.state.toggle_task(&id);
            self.refresh(Some(id));
        }
    }

    pub fn request_delete(&mut self) {
        if let Some(id) = self.selected_task().map(|t| t.id) {
            self.input_mode = InputMode::Confirming(Confirm::Delete(id));
        }
    }

    pub fn request_clear_completed(&mut self) {
        let completed = self.state.stats().completed;
        if completed > 0 {
            self.input_mode = InputMode::Confirming(Confirm::ClearCompleted(completed));
        }
    }

    pub fn confirm(&mut self, accepted: bool) {
        let InputMode::Confirming(pending) = self.input_mode else {
            return;
        };
        self.input_mode = InputMode::Normal;
        if !accepted {
            return;
        }

        match pending {
            Confirm::Delete(id) => {
                self.state.delete_task(&id);
            }
            Confirm::ClearCompleted(_) => {
                self.state.clear_completed_tasks();
            }
        }
        self.refresh(None);
    }

    pub fn enter_add_mode(&mut self) {
        self.input_mode = InputMode::Adding;
        self.input.clear();
        self.cursor_position = 0;
    }

    pub fn enter_edit_mode(&mut self) {
        if let Some(task) = self.selected_task() {
            let (id, text) = (task.id, task.text.clone());
            self.input_mode = InputMode::Editing(id);
            self.cursor_position = text.chars().count();
            self.input = text;
        }
    }

    pub fn exit_input_mode(&mut self) {
        self.input_mode = InputMode::Normal;
        self.input.clear();
        self.cursor_position = 0;
    }

    pub fn input_char(&mut self, c: char) {
        let byte_index = self.byte_index(self.cursor_position);
        self.input.insert(byte_index, c);
        self.cursor_position += 1;
    }

    pub fn delete_char(&mut self) {
        if self.cursor_position > 0 {
            let byte_index = self.byte_index(self.cursor_position - 1);
            self.input.remove(byte_index);
            self.cursor_position -= 1;
        }
    }

    pub fn move_cursor_left(&mut self) {
        self.cursor_position = self.cursor_position.saturating_sub(1);
    }

    pub fn move_cursor_right(&mut self) {
        if self.cursor_position < self.input.chars().count() {
            self.cursor_position += 1;
        }
    }

    fn byte_index(&self, char_index: usize) -> usize {
        self.input
            .chars()
            .take(char_index)
            .map(char::len_utf8)
            .sum()
    }

    pub fn submit(&mut self) {
        match self.input_mode {
            InputMode::Adding => self.submit_add(),
            InputMode::Editing(id) => self.submit_edit(id),
            InputMode::Normal | InputMode::Confirming(_) => {}
        }
    }

    /// Blank input is ignored; the text is kept when the add fails.
    fn submit_add(&mut self) {
        if self.input.trim().is_empty() {
            return;
        }

        if let Some(task) = self.state.add_task(&self.input) {
            self.exit_input_mode();
            self.refresh(Some(task.id));
        }
    }

    /// Blank input reverts, unchanged text leaves without a write, and a
    /// failed update stays in edit mode.
    fn submit_edit(&mut self, id: Uuid) {
        let trimmed = self.input.trim().to_string();
        let unchanged = self.state.find(&id).is_some_and(|t| t.text == trimmed);

        if trimmed.is_empty() || unchanged {
            self.exit_input_mode();
            return;
        }

        if self.state.update_task(&id, TaskUpdate::text(trimmed)) {
            self.exit_input_mode();
            self.refresh(Some(id));
        }
    }
}
