//! Async event loop for the playground TUI.

use std::io;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::ExecutableCommand;
use ratatui::prelude::*;
use tokio::sync::mpsc;

use crate::{
    client::ExecClient,
    config::Config,
    session::Key as SessionKey,
    store::{DirStore, SnippetStore},
};
use super::{
    app::{App, Editor, Modal, Theme},
    events::TuiEvent,
    ui::render_ui,
};

/// Run the playground TUI with the given initial editor contents.
pub async fn run_tui(cfg: &Config, initial_code: String) -> Result<()> {
    if !io::IsTerminal::is_terminal(&io::stdout()) {
        return Err(anyhow::anyhow!("the editor requires a proper terminal environment"));
    }

    let client = ExecClient::from_config(cfg)?;
    let store = SnippetStore::from_config(cfg);

    let theme = store
        .load_theme()
        .or_else(|| cfg.get("DEFAULT_THEME"))
        .map(|s| Theme::parse(&s))
        .unwrap_or(Theme::Dark);

    let mut app = App::new(initial_code, cfg.input_prompt_marker(), theme);
    store.save_draft(&app.session.code);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    stdout.execute(EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let (event_tx, event_rx) = mpsc::unbounded_channel::<TuiEvent>();

    let result = run_app(&mut terminal, &mut app, client, store, event_tx, event_rx).await;

    // Restore terminal
    disable_raw_mode()?;
    terminal.backend_mut().execute(LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

/// Main application loop. All state mutation happens here: keyboard events
/// and request completions arrive on one channel and are applied in order.
async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    client: ExecClient,
    store: SnippetStore<DirStore>,
    event_tx: mpsc::UnboundedSender<TuiEvent>,
    mut event_rx: mpsc::UnboundedReceiver<TuiEvent>,
) -> Result<()> {
    // Spawn input handler
    let input_tx = event_tx.clone();
    tokio::task::spawn_blocking(move || {
        loop {
            if event::poll(Duration::from_millis(100)).unwrap_or(false) {
                if let Ok(Event::Key(key)) = event::read() {
                    if input_tx.send(TuiEvent::Key(key)).is_err() {
                        break; // Channel closed
                    }
                }
            }
        }
    });

    loop {
        terminal.draw(|frame| render_ui(frame, app))?;

        if let Ok(tui_event) = event_rx.try_recv() {
            match tui_event {
                TuiEvent::Key(key) => {
                    if handle_key_event(app, key, &client, &store, &event_tx) {
                        break;
                    }
                }
                TuiEvent::ExecFinished(result) => {
                    app.session.apply_outcome(result);
                    app.scroll_output_to_bottom();
                    if app.session.is_awaiting_input() {
                        app.set_status("Waiting for input: type a line and press Enter");
                    } else {
                        app.set_status("Ctrl+R run | Ctrl+S save | Ctrl+O load | F1 help");
                    }
                }
                TuiEvent::Quit => break,
            }
        }

        // Small delay to prevent busy waiting
        tokio::time::sleep(Duration::from_millis(16)).await;
    }

    Ok(())
}

/// Handle one keyboard event. Returns true when the app should quit.
fn handle_key_event(
    app: &mut App,
    key: crossterm::event::KeyEvent,
    client: &ExecClient,
    store: &SnippetStore<DirStore>,
    event_tx: &mpsc::UnboundedSender<TuiEvent>,
) -> bool {
    if app.show_help {
        app.show_help = false;
        return false;
    }

    if app.modal != Modal::None {
        handle_modal_key(app, key, store);
        return false;
    }

    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            return app.handle_ctrl_c();
        }
        KeyCode::Char('r') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            submit(app, client, event_tx);
        }
        KeyCode::Char('s') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.modal = Modal::Save { name: String::new() };
        }
        KeyCode::Char('o') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.modal = Modal::Load { name: String::new() };
        }
        KeyCode::Char('t') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.theme = app.theme.toggled();
            store.save_theme(app.theme.as_str());
        }
        KeyCode::F(1) => {
            app.show_help = true;
        }
        KeyCode::PageUp => {
            app.scroll_output_up();
        }
        KeyCode::PageDown => {
            app.scroll_output_down();
        }
        _ if app.session.is_awaiting_input() => {
            handle_terminal_key(app, key.code, client, event_tx);
        }
        _ => {
            handle_editor_key(app, key.code, store);
        }
    }

    false
}

fn submit(app: &mut App, client: &ExecClient, event_tx: &mpsc::UnboundedSender<TuiEvent>) {
    match app.session.submit() {
        Ok(code) => {
            app.scroll_output_to_bottom();
            app.set_status("Running...");
            let client = client.clone();
            let tx = event_tx.clone();
            tokio::spawn(async move {
                let _ = tx.send(TuiEvent::ExecFinished(client.execute(&code).await));
            });
        }
        Err(_) => {
            app.set_status("A run is already in progress");
        }
    }
}

/// Keystrokes routed to the remote program while it waits on a read.
fn handle_terminal_key(
    app: &mut App,
    code: KeyCode,
    client: &ExecClient,
    event_tx: &mpsc::UnboundedSender<TuiEvent>,
) {
    let key = match code {
        KeyCode::Char(c) => SessionKey::Char(c),
        KeyCode::Backspace => SessionKey::Backspace,
        KeyCode::Enter => SessionKey::Enter,
        _ => return,
    };
    if let Some(line) = app.session.keystroke(key) {
        app.set_status("Running...");
        let client = client.clone();
        let tx = event_tx.clone();
        tokio::spawn(async move {
            let _ = tx.send(TuiEvent::ExecFinished(client.send_input(&line).await));
        });
    }
    app.scroll_output_to_bottom();
}

fn handle_editor_key(app: &mut App, code: KeyCode, store: &SnippetStore<DirStore>) {
    let mutated = match code {
        KeyCode::Char(c) => {
            app.editor.insert_char(c);
            true
        }
        KeyCode::Tab => {
            for _ in 0..4 {
                app.editor.insert_char(' ');
            }
            true
        }
        KeyCode::Enter => {
            app.editor.newline();
            true
        }
        KeyCode::Backspace => {
            app.editor.backspace();
            true
        }
        KeyCode::Delete => {
            app.editor.delete();
            true
        }
        KeyCode::Left => {
            app.editor.move_left();
            false
        }
        KeyCode::Right => {
            app.editor.move_right();
            false
        }
        KeyCode::Up => {
            app.editor.move_up();
            false
        }
        KeyCode::Down => {
            app.editor.move_down();
            false
        }
        KeyCode::Home => {
            app.editor.move_home();
            false
        }
        KeyCode::End => {
            app.editor.move_end();
            false
        }
        _ => false,
    };

    if mutated {
        app.sync_code();
        store.save_draft(&app.session.code);
    }
}

fn handle_modal_key(app: &mut App, key: crossterm::event::KeyEvent, store: &SnippetStore<DirStore>) {
    let name = match &mut app.modal {
        Modal::Save { name } | Modal::Load { name } => name,
        Modal::None => return,
    };

    match key.code {
        KeyCode::Char(c) => {
            name.push(c);
        }
        KeyCode::Backspace => {
            name.pop();
        }
        KeyCode::Esc => {
            app.modal = Modal::None;
        }
        KeyCode::Enter => {
            let modal = std::mem::replace(&mut app.modal, Modal::None);
            match modal {
                Modal::Save { name } => match store.save(&name, &app.session.code) {
                    Ok(()) => app.set_status(format!("Saved snippet: {}", name.trim())),
                    Err(e) => app.set_status(format!("Save failed: {}", e)),
                },
                Modal::Load { name } => match store.load(&name) {
                    Ok(code) => {
                        app.editor = Editor::from_text(&code);
                        app.session.code = code;
                        store.save_draft(&app.session.code);
                        app.set_status(format!("Loaded snippet: {}", name.trim()));
                    }
                    Err(e) => app.set_status(format!("Load failed: {}", e)),
                },
                Modal::None => {}
            }
        }
        _ => {}
    }
}
