//! UI layout and rendering logic for the TUI.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use super::app::{App, Modal, Theme};

struct Palette {
    fg: Color,
    bg: Color,
    accent: Color,
    dim: Color,
}

fn palette(theme: Theme) -> Palette {
    match theme {
        Theme::Dark => Palette {
            fg: Color::White,
            bg: Color::Black,
            accent: Color::Cyan,
            dim: Color::DarkGray,
        },
        Theme::Light => Palette {
            fg: Color::Black,
            bg: Color::White,
            accent: Color::Blue,
            dim: Color::Gray,
        },
    }
}

/// Render the main UI
pub fn render_ui(frame: &mut Frame, app: &App) {
    let pal = palette(app.theme);

    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(55), // Editor area
            Constraint::Min(5),         // Output area
            Constraint::Length(1),      // Status bar
        ])
        .split(frame.area());

    render_editor(frame, app, &pal, main_layout[0]);
    render_output(frame, app, &pal, main_layout[1]);
    render_status_bar(frame, app, &pal, main_layout[2]);

    if app.show_help {
        render_help_overlay(frame, &pal);
    }

    match &app.modal {
        Modal::Save { name } => render_name_modal(frame, &pal, "Save snippet as", name),
        Modal::Load { name } => render_name_modal(frame, &pal, "Load snippet", name),
        Modal::None => {}
    }
}

/// Render the code editor pane with an inline cursor.
fn render_editor(frame: &mut Frame, app: &App, pal: &Palette, area: Rect) {
    let inner_height = area.height.saturating_sub(2) as usize;
    let inner_width = area.width.saturating_sub(2) as usize;

    let top = if app.editor.row + 1 > inner_height {
        app.editor.row + 1 - inner_height
    } else {
        0
    };

    let cursor_style = Style::default().add_modifier(Modifier::REVERSED);
    let text_style = Style::default().fg(pal.fg);

    let mut lines: Vec<Line> = Vec::new();
    for (i, raw) in app.editor.lines.iter().enumerate().skip(top).take(inner_height) {
        if i != app.editor.row {
            lines.push(Line::from(Span::styled(raw.clone(), text_style)));
            continue;
        }

        // Cursor line: split at the cursor and reverse one cell.
        let mut before: String = raw.chars().take(app.editor.col).collect();
        let at: String = raw.chars().skip(app.editor.col).take(1).collect();
        let after: String = raw.chars().skip(app.editor.col + 1).collect();

        // Keep the cursor in view on long lines.
        while before.width() + 1 > inner_width && !before.is_empty() {
            before.remove(0);
        }

        let cursor_cell = if at.is_empty() { " ".to_string() } else { at };
        lines.push(Line::from(vec![
            Span::styled(before, text_style),
            Span::styled(cursor_cell, cursor_style),
            Span::styled(after, text_style),
        ]));
    }

    let title = format!(
        "Python Editor - Ln {}, Col {}",
        app.editor.row + 1,
        app.editor.col + 1
    );

    let paragraph = Paragraph::new(Text::from(lines))
        .style(Style::default().bg(pal.bg))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(pal.accent))
                .title(title),
        );

    frame.render_widget(paragraph, area);
}

/// Render the output pane, following new output unless scrolled up.
fn render_output(frame: &mut Frame, app: &App, pal: &Palette, area: Rect) {
    let title = if app.session.is_loading() {
        "Output - running...".to_string()
    } else if app.session.is_awaiting_input() {
        "Output - program is waiting for input".to_string()
    } else {
        "Output".to_string()
    };

    let content_lines: Vec<Line> = app
        .session
        .output
        .lines()
        .map(|l| Line::from(Span::styled(l.to_string(), Style::default().fg(pal.fg))))
        .collect();

    let available_height = area.height.saturating_sub(2) as usize;
    let total_lines = content_lines.len();

    let mut paragraph = Paragraph::new(Text::from(content_lines))
        .style(Style::default().bg(pal.bg))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(pal.dim))
                .title(title),
        )
        .wrap(Wrap { trim: false });

    if total_lines > available_height {
        let max_scroll = total_lines.saturating_sub(available_height);
        let offset = app.output_scroll.min(max_scroll);
        let scroll_y = (max_scroll - offset) as u16;
        paragraph = paragraph.scroll((scroll_y, 0));
    }

    frame.render_widget(paragraph, area);
}

fn render_status_bar(frame: &mut Frame, app: &App, pal: &Palette, area: Rect) {
    let status_text = if app.session.is_awaiting_input() {
        format!("{} | buffer: {}", app.status_message, app.session.input_buffer())
    } else {
        app.status_message.clone()
    };

    let status_paragraph =
        Paragraph::new(status_text).style(Style::default().bg(pal.dim).fg(pal.fg));

    frame.render_widget(status_paragraph, area);
}

/// Render the save/load name prompt as a centered popup.
fn render_name_modal(frame: &mut Frame, pal: &Palette, title: &str, name: &str) {
    let popup_area = centered_rect(50, 20, frame.area());
    frame.render_widget(Clear, popup_area);

    let body = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled("Name: ", Style::default().fg(pal.dim)),
            Span::styled(name.to_string(), Style::default().fg(pal.fg)),
            Span::styled(" ", Style::default().add_modifier(Modifier::REVERSED)),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "Enter to confirm, Esc to cancel",
            Style::default().fg(pal.dim),
        )),
    ];

    let paragraph = Paragraph::new(Text::from(body))
        .style(Style::default().bg(pal.bg))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(pal.accent))
                .title(title.to_string()),
        );

    frame.render_widget(paragraph, popup_area);
}

fn render_help_overlay(frame: &mut Frame, pal: &Palette) {
    let popup_area = centered_rect(60, 60, frame.area());
    frame.render_widget(Clear, popup_area);

    let help_lines = vec![
        Line::from("Python Playground Help"),
        Line::from(""),
        Line::from("  Ctrl+R     - Run the code"),
        Line::from("  Ctrl+S     - Save snippet (prompts for a name)"),
        Line::from("  Ctrl+O     - Load snippet by name"),
        Line::from("  Ctrl+T     - Toggle light/dark theme"),
        Line::from("  PgUp/PgDn  - Scroll output"),
        Line::from("  F1         - Toggle this help"),
        Line::from("  Ctrl+C x2  - Quit"),
        Line::from(""),
        Line::from("While the program waits for input, typed characters go"),
        Line::from("to the program; Enter sends the line."),
        Line::from(""),
        Line::from("Press any key to close"),
    ];

    let paragraph = Paragraph::new(Text::from(help_lines))
        .style(Style::default().bg(pal.bg).fg(pal.fg))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(pal.accent))
                .title("Help"),
        );

    frame.render_widget(paragraph, popup_area);
}

/// Create a centered rectangle with the given percentage dimensions
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
