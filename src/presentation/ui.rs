use crate::application::{App, AppMode};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table},
};

pub fn render_ui(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(5),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(f.area());

    render_header(f, app, chunks[0]);
    render_display(f, app, chunks[1]);
    render_history(f, app, chunks[2]);
    render_status_bar(f, app, chunks[3]);

    if matches!(app.mode, AppMode::Help) {
        render_help_popup(f, app.help_scroll);
    }
}

fn render_header(f: &mut Frame, app: &App, area: Rect) {
    let header = Paragraph::new(format!(
        "scicalc - Terminal Calculator | Angle: {}",
        app.angle_mode().label()
    ))
    .style(Style::default().fg(Color::Cyan));
    f.render_widget(header, area);
}

fn render_display(f: &mut Frame, app: &App, area: Rect) {
    let expression = if app.input.is_empty() {
        " ".to_string()
    } else {
        app.input.clone()
    };

    let result_style = if app.error_state {
        Style::default().fg(Color::Red)
    } else {
        Style::default().fg(Color::Green)
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Length(2)])
        .split(area);

    let expression_widget = Paragraph::new(expression)
        .block(Block::default().borders(Borders::ALL).title("Expression"));
    f.render_widget(expression_widget, chunks[0]);

    let result_widget = Paragraph::new(format!("= {}", app.last_result)).style(result_style);
    f.render_widget(result_widget, chunks[1]);

    // Cursor sits inside the expression block border.
    let cursor_x = chunks[0].x + 1 + app.cursor_position as u16;
    if cursor_x < chunks[0].x + chunks[0].width - 1 {
        f.set_cursor_position((cursor_x, chunks[0].y + 1));
    }
}

fn render_history(f: &mut Frame, app: &App, area: Rect) {
    let visible_rows = area.height.saturating_sub(2) as usize;

    let rows: Vec<Row> = app
        .history
        .iter()
        .take(visible_rows)
        .enumerate()
        .map(|(i, entry)| {
            let style = if app.history_index == Some(i) {
                Style::default().bg(Color::Blue).fg(Color::White)
            } else {
                Style::default()
            };
            Row::new(vec![
                Cell::from(entry.expression.clone()),
                Cell::from(format!("= {}", entry.result)),
            ])
            .style(style)
        })
        .collect();

    let widths = [Constraint::Percentage(60), Constraint::Percentage(40)];
    let table = Table::new(rows, widths)
        .block(Block::default().borders(Borders::ALL).title("History"))
        .column_spacing(1);

    f.render_widget(table, area);
}

fn render_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let input_text = match app.mode {
        AppMode::Normal => {
            if let Some(ref status) = app.status_message {
                status.clone()
            } else {
                let filename = app.filename.as_ref().map(|f| f.as_str()).unwrap_or("unsaved");
                format!(
                    "History: {} | Tab: angle mode | Ctrl+S: save | Ctrl+O: load | Ctrl+E: export CSV | Ctrl+Y: copy | F1/?: help | Ctrl+Q: quit",
                    filename
                )
            }
        }
        AppMode::Help => {
            "↑↓/jk: scroll | PgUp/PgDn: fast scroll | Home: top | Esc/q: close help".to_string()
        }
        AppMode::SaveHistory => format!(
            "Save history as: {} (Enter to save, Esc to cancel)",
            app.filename_input
        ),
        AppMode::LoadHistory => format!(
            "Load history from: {} (Enter to load, Esc to cancel)",
            app.filename_input
        ),
        AppMode::ExportCsv => format!(
            "Export CSV as: {} (Enter to export, Esc to cancel)",
            app.filename_input
        ),
    };

    let input = Paragraph::new(input_text)
        .block(Block::default().borders(Borders::ALL).title("Status"))
        .style(match app.mode {
            AppMode::Normal => Style::default(),
            AppMode::Help => Style::default().fg(Color::Cyan),
            AppMode::SaveHistory => Style::default().fg(Color::Yellow),
            AppMode::LoadHistory => Style::default().fg(Color::Yellow),
            AppMode::ExportCsv => Style::default().fg(Color::Magenta),
        });
    f.render_widget(input, area);
}

fn render_help_popup(f: &mut Frame, scroll: usize) {
    let area = f.area();
    let popup_area = Rect {
        x: area.width / 10,
        y: area.height / 10,
        width: area.width * 4 / 5,
        height: area.height * 4 / 5,
    };

    f.render_widget(Clear, popup_area);

    let help_text = get_help_text();
    let help_lines: Vec<&str> = help_text.lines().collect();
    let visible_height = popup_area.height.saturating_sub(2) as usize;

    let start_line = scroll.min(help_lines.len().saturating_sub(visible_height));
    let end_line = (start_line + visible_height).min(help_lines.len());

    let visible_text = help_lines[start_line..end_line].join("\n");

    let help_widget = Paragraph::new(visible_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(
                    "scicalc Help (Line {}/{})",
                    start_line + 1,
                    help_lines.len()
                ))
                .style(Style::default().fg(Color::Cyan)),
        )
        .style(Style::default().fg(Color::White));

    f.render_widget(help_widget, popup_area);
}

fn get_help_text() -> String {
    r#"SCICALC EXPRESSION REFERENCE

=== BASIC CONCEPTS ===
• Type an expression and press Enter to calculate
• Results are exact decimals, never scientific notation
• Integer arithmetic is exact at any size (try 2^200)
• Float results are rounded to 10 decimal places, so 0.1+0.2 = 0.3

=== ARITHMETIC OPERATORS ===
+       Addition                    2+3 → 5
-       Subtraction (also unary)    10-3 → 7, -5+3 → -2
*       Multiplication              4*3 → 12
/       Division (always exact)     1/2 → 0.5
%       Modulo (sign of divisor)    -7%3 → 2
^       Power (right-associative)   2^3^2 → 512

=== FUNCTIONS (single argument) ===
sin, cos, tan           Trigonometric, honor the angle mode
asin, acos, atan        Inverse trigonometric, result in radians
sinh, cosh, tanh        Hyperbolic
sqrt(x)                 Square root (x >= 0)
log(x)                  Base-10 logarithm (x > 0)
ln(x)                   Natural logarithm (x > 0)
abs(x)                  Absolute value
factorial(n)            Exact factorial (integer n, 0 <= n <= 170)

=== CONSTANTS ===
pi      3.14159...      2*pi, sin(pi)
e       2.71828...      ln(e) → 1

=== ANGLE MODES ===
Tab cycles DEG → RAD → GRAD. Degrees is the default.
sin(90) in DEG = 1; sin(pi/2) in RAD = 1; sin(100) in GRAD = 1

=== KEYS ===
Enter           Calculate the current expression
Esc / Ctrl+U    Clear expression and result
Backspace       Delete before the cursor
Left/Right      Move the cursor
Up/Down         Recall older/newer history entries
Tab             Cycle angle mode
Ctrl+Y          Copy the last result to the clipboard
Ctrl+S          Save history to a JSON file
Ctrl+O          Load history from a JSON file
Ctrl+E          Export history to CSV
F1 / ?          This help screen
Ctrl+Q          Quit

=== ERRORS ===
Errors replace the result line until the next keystroke:
division by zero, unmatched parentheses (with position),
unknown names, domain errors (sqrt(-1), log(0)),
factorial limits, and overflow.
"#
    .to_string()
}
