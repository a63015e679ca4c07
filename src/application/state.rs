//! Application state management for the terminal calculator.
//!
//! This module contains the main application state and mode management
//! for the terminal user interface: the expression being typed, the
//! last result, the calculation history and the dialog modes.

use crate::domain::{AngleMode, CalculatorEngine, HistoryEntry};

/// Most history entries kept in memory (and on disk).
const MAX_HISTORY_ENTRIES: usize = 100;

/// Represents the current mode of the application.
#[derive(Debug)]
pub enum AppMode {
    /// Typing an expression; Enter calculates
    Normal,
    /// Help screen is displayed
    Help,
    /// Save-history dialog is open
    SaveHistory,
    /// Load-history dialog is open
    LoadHistory,
    /// CSV export dialog is open
    ExportCsv,
}

/// Expands a typed glyph into the token the engine grammar accepts.
///
/// This is the button-label expansion layer: display labels become
/// grammar tokens before the engine ever sees them. Plain characters
/// pass through unchanged.
pub fn expand_label(label: char) -> String {
    match label {
        '√' => "sqrt(".to_string(),
        'π' => "pi".to_string(),
        other => other.to_string(),
    }
}

/// Main application state containing the engine and UI state.
///
/// # Examples
///
/// ```
/// use scicalc::application::App;
///
/// let app = App::default();
/// assert_eq!(app.last_result, "0");
/// assert!(app.input.is_empty());
/// ```
pub struct App {
    /// The calculator engine (validator + evaluator + formatting)
    pub engine: CalculatorEngine,
    /// Expression currently being typed
    pub input: String,
    /// Cursor position within the input buffer, counted in chars
    pub cursor_position: usize,
    /// Last successful result, or the last error message
    pub last_result: String,
    /// Whether `last_result` holds an error message
    pub error_state: bool,
    /// Completed calculations, most recent first
    pub history: Vec<HistoryEntry>,
    /// Index into `history` while recalling with Up/Down
    pub history_index: Option<usize>,
    /// Current application mode
    pub mode: AppMode,
    /// Temporary status message to display
    pub status_message: Option<String>,
    /// Current history filename (if saved/loaded)
    pub filename: Option<String>,
    /// Input buffer for filename entry
    pub filename_input: String,
    /// Scroll position in help text
    pub help_scroll: usize,
}

impl Default for App {
    fn default() -> Self {
        Self {
            engine: CalculatorEngine::new(),
            input: String::new(),
            cursor_position: 0,
            last_result: "0".to_string(),
            error_state: false,
            history: Vec::new(),
            history_index: None,
            mode: AppMode::Normal,
            status_message: None,
            filename: None,
            filename_input: String::new(),
            help_scroll: 0,
        }
    }
}

impl App {
    /// Inserts typed text at the cursor, expanding display glyphs into
    /// grammar tokens. A displayed error is cleared first, so typing
    /// after a failure starts a fresh expression.
    pub fn append_input(&mut self, label: char) {
        if self.error_state {
            self.clear();
        }
        let token = expand_label(label);
        let at = self.cursor_byte_index();
        self.input.insert_str(at, &token);
        self.cursor_position += token.chars().count();
        self.history_index = None;
    }

    /// Removes the character before the cursor.
    pub fn backspace(&mut self) {
        if self.error_state {
            self.clear();
            return;
        }
        if self.cursor_position > 0 {
            self.cursor_position -= 1;
            let at = self.cursor_byte_index();
            self.input.remove(at);
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

    /// Byte offset matching the char-counted cursor. Keystrokes can be
    /// any Unicode scalar, so edits must never index mid-character.
    fn cursor_byte_index(&self) -> usize {
        self.input
            .char_indices()
            .nth(self.cursor_position)
            .map(|(i, _)| i)
            .unwrap_or(self.input.len())
    }

    /// Clears the expression and resets the display.
    pub fn clear(&mut self) {
        self.input.clear();
        self.cursor_position = 0;
        self.last_result = "0".to_string();
        self.error_state = false;
        self.history_index = None;
    }

    /// Calculates the current expression and records it in history.
    ///
    /// On success the expression stays in the input buffer so it can be
    /// edited further. On failure the error message takes the result
    /// slot until the next keystroke.
    pub fn submit(&mut self) {
        if self.input.is_empty() {
            return;
        }

        let result = self.engine.calculate(&self.input);

        if result.success {
            let value = result.result.unwrap_or_default();
            self.history.insert(
                0,
                HistoryEntry {
                    expression: self.input.clone(),
                    result: value.clone(),
                },
            );
            self.history.truncate(MAX_HISTORY_ENTRIES);
            self.last_result = value;
            self.error_state = false;
        } else {
            self.last_result = result.error.unwrap_or_default();
            self.error_state = true;
        }
        self.history_index = None;
    }

    /// Cycles DEG -> RAD -> GRAD and tells the engine.
    pub fn cycle_angle_mode(&mut self) {
        let mode = self.engine.angle_mode().next();
        self.engine.set_angle_mode(mode);
        self.status_message = Some(format!("Angle mode: {}", mode.label()));
    }

    pub fn angle_mode(&self) -> AngleMode {
        self.engine.angle_mode()
    }

    /// Recalls the next-older history entry into the input buffer.
    pub fn recall_older(&mut self) {
        if self.history.is_empty() {
            return;
        }
        let index = match self.history_index {
            None => 0,
            Some(i) if i + 1 < self.history.len() => i + 1,
            Some(i) => i,
        };
        self.load_history_entry(index);
    }

    /// Recalls the next-newer history entry, or clears the input when
    /// already at the newest.
    pub fn recall_newer(&mut self) {
        match self.history_index {
            Some(0) | None => {
                self.input.clear();
                self.cursor_position = 0;
                self.history_index = None;
            }
            Some(i) => self.load_history_entry(i - 1),
        }
    }

    fn load_history_entry(&mut self, index: usize) {
        if let Some(entry) = self.history.get(index) {
            self.input = entry.expression.clone();
            self.cursor_position = self.input.chars().count();
            self.history_index = Some(index);
            self.error_state = false;
        }
    }

    /// Switches to save-history mode to prompt for a filename.
    pub fn start_save_history(&mut self) {
        self.mode = AppMode::SaveHistory;
        self.filename_input = self
            .filename
            .clone()
            .unwrap_or_else(|| "history.json".to_string());
        self.status_message = None;
    }

    /// Switches to load-history mode to prompt for a filename.
    pub fn start_load_history(&mut self) {
        self.mode = AppMode::LoadHistory;
        self.filename_input = self
            .filename
            .clone()
            .unwrap_or_else(|| "history.json".to_string());
        self.status_message = None;
    }

    /// Switches to CSV export mode to prompt for a filename.
    pub fn start_csv_export(&mut self) {
        self.mode = AppMode::ExportCsv;
        self.filename_input = self
            .filename
            .as_ref()
            .map(|f| f.replace(".json", ".csv"))
            .unwrap_or_else(|| "history.csv".to_string());
        self.status_message = None;
    }

    /// Cancels filename input and returns to normal mode.
    pub fn cancel_filename_input(&mut self) {
        self.mode = AppMode::Normal;
        self.filename_input.clear();
    }

    /// Gets the filename to use for the open dialog, falling back to a
    /// default when the input is empty.
    pub fn dialog_filename(&self, default: &str) -> String {
        if self.filename_input.is_empty() {
            default.to_string()
        } else {
            self.filename_input.clone()
        }
    }

    /// Processes the result of a history save operation.
    pub fn set_save_result(&mut self, result: Result<String, String>) {
        match result {
            Ok(filename) => {
                self.filename = Some(filename.clone());
                self.status_message = Some(format!("Saved history to {}", filename));
            }
            Err(error) => {
                self.status_message = Some(format!("Save failed: {}", error));
            }
        }

        self.mode = AppMode::Normal;
        self.filename_input.clear();
    }

    /// Processes the result of a history load operation.
    pub fn set_load_result(&mut self, result: Result<(Vec<HistoryEntry>, String), String>) {
        match result {
            Ok((history, filename)) => {
                self.history = history;
                self.history.truncate(MAX_HISTORY_ENTRIES);
                self.history_index = None;
                self.filename = Some(filename.clone());
                self.status_message = Some(format!("Loaded history from {}", filename));
            }
            Err(error) => {
                self.status_message = Some(format!("Load failed: {}", error));
            }
        }

        self.mode = AppMode::Normal;
        self.filename_input.clear();
    }

    /// Processes the result of a CSV export operation.
    pub fn set_csv_export_result(&mut self, result: Result<String, String>) {
        match result {
            Ok(filename) => {
                self.status_message = Some(format!("Exported history to {}", filename));
            }
            Err(error) => {
                self.status_message = Some(format!("Export failed: {}", error));
            }
        }

        self.mode = AppMode::Normal;
        self.filename_input.clear();
    }
}
