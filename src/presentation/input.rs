use crate::application::{App, AppMode};
use crate::infrastructure::{FileRepository, HistoryCsvExporter};
use crossterm::event::{KeyCode, KeyModifiers};

pub struct InputHandler;

impl InputHandler {
    pub fn handle_key_event(app: &mut App, key: KeyCode, modifiers: KeyModifiers) {
        match app.mode {
            AppMode::Normal => Self::handle_normal_mode(app, key, modifiers),
            AppMode::Help => Self::handle_help_mode(app, key),
            AppMode::SaveHistory => Self::handle_filename_input_mode(app, key, "save"),
            AppMode::LoadHistory => Self::handle_filename_input_mode(app, key, "load"),
            AppMode::ExportCsv => Self::handle_filename_input_mode(app, key, "csv_export"),
        }
    }

    fn handle_normal_mode(app: &mut App, key: KeyCode, modifiers: KeyModifiers) {
        if modifiers.contains(KeyModifiers::CONTROL) {
            match key {
                KeyCode::Char('s') => {
                    app.start_save_history();
                    return;
                }
                KeyCode::Char('o') => {
                    app.start_load_history();
                    return;
                }
                KeyCode::Char('e') => {
                    app.start_csv_export();
                    return;
                }
                KeyCode::Char('y') => {
                    Self::copy_result_to_clipboard(app);
                    return;
                }
                KeyCode::Char('u') => {
                    app.clear();
                    return;
                }
                _ => {}
            }
        }

        app.status_message = None;

        match key {
            KeyCode::Enter => {
                app.submit();
            }
            KeyCode::Tab => {
                app.cycle_angle_mode();
            }
            KeyCode::Backspace => {
                app.backspace();
            }
            KeyCode::Left => {
                app.move_cursor_left();
            }
            KeyCode::Right => {
                app.move_cursor_right();
            }
            KeyCode::Up => {
                app.recall_older();
            }
            KeyCode::Down => {
                app.recall_newer();
            }
            KeyCode::Esc => {
                app.clear();
            }
            KeyCode::F(1) | KeyCode::Char('?') => {
                app.mode = AppMode::Help;
                app.help_scroll = 0;
            }
            KeyCode::Char(c) => {
                app.append_input(c);
            }
            _ => {}
        }
    }

    fn copy_result_to_clipboard(app: &mut App) {
        if app.error_state {
            app.status_message = Some("Nothing to copy".to_string());
            return;
        }
        match arboard::Clipboard::new() {
            Ok(mut clipboard) => match clipboard.set_text(app.last_result.clone()) {
                Ok(_) => {
                    app.status_message = Some("Result copied to clipboard".to_string());
                }
                Err(e) => {
                    app.status_message = Some(format!("Clipboard error: {}", e));
                }
            },
            Err(e) => {
                app.status_message = Some(format!("Clipboard unavailable: {}", e));
            }
        }
    }

    fn handle_help_mode(app: &mut App, key: KeyCode) {
        match key {
            KeyCode::Esc | KeyCode::F(1) | KeyCode::Char('?') | KeyCode::Char('q') => {
                app.mode = AppMode::Normal;
            }
            KeyCode::Up | KeyCode::Char('k') => {
                if app.help_scroll > 0 {
                    app.help_scroll -= 1;
                }
            }
            KeyCode::Down | KeyCode::Char('j') => {
                app.help_scroll += 1;
            }
            KeyCode::PageUp => {
                app.help_scroll = app.help_scroll.saturating_sub(5);
            }
            KeyCode::PageDown => {
                app.help_scroll += 5;
            }
            KeyCode::Home => {
                app.help_scroll = 0;
            }
            _ => {}
        }
    }

    fn handle_filename_input_mode(app: &mut App, key: KeyCode, mode: &str) {
        match key {
            KeyCode::Enter => {
                match mode {
                    "save" => {
                        let filename = app.dialog_filename("history.json");
                        let result = FileRepository::save_history(&app.history, &filename);
                        app.set_save_result(result);
                    }
                    "load" => {
                        let filename = app.dialog_filename("history.json");
                        let result = FileRepository::load_history(&filename);
                        app.set_load_result(result);
                    }
                    "csv_export" => {
                        let filename = app.dialog_filename("history.csv");
                        let result = HistoryCsvExporter::export(&app.history, &filename);
                        app.set_csv_export_result(result);
                    }
                    _ => {}
                }
            }
            KeyCode::Esc => {
                app.cancel_filename_input();
            }
            KeyCode::Backspace => {
                app.filename_input.pop();
            }
            KeyCode::Char(c) => {
                app.filename_input.push(c);
            }
            _ => {}
        }
    }
}
