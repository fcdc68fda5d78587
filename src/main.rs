mod api;
mod app;
mod config;
mod events;
mod export;
mod generation;
mod logging;
mod models;
mod ui;

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::Backend, prelude::*};
use std::io;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use api::GeminiClient;
use app::{App, Transition, WizardState};
use events::AppEvent;
use generation::GenerationSettings;
use models::{AppConfig, FormData, GeneratedEbook, InputKind};

#[tokio::main]
async fn main() -> Result<()> {
    // Logging is best-effort; the wizard still runs without a log file
    let _log_guard = match logging::init() {
        Ok(guard) => Some(guard),
        Err(err) => {
            eprintln!("Warning: {err:#}");
            None
        }
    };

    let config = config::load_config_or_default();
    tracing::info!(
        text_model = %config.text_model,
        image_model = %config.image_model,
        "Starting bookai"
    );

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new();

    // Create channel for async events
    let (tx, mut rx) = mpsc::unbounded_channel::<AppEvent>();

    let res = run_app(&mut terminal, &mut app, &config, &tx, &mut rx);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!("Application error: {err:#}");
        eprintln!("Error: {err:?}");
    }

    Ok(())
}

fn handle_app_event(app: &mut App, event: AppEvent) {
    match event {
        AppEvent::GenerationFinished(ebook) => {
            app.finish_generation(ebook);
        }
        AppEvent::GenerationFailed(error) => {
            tracing::error!("Ebook generation failed: {error}");
            app.fail_generation();
        }
    }
}

async fn run_generation(form: FormData, config: AppConfig) -> Result<GeneratedEbook> {
    // A missing API key surfaces here, before any request is made
    let client = GeminiClient::from_env(&config)?;
    generation::generate_ebook(&client, &form, GenerationSettings::from(&config)).await
}

fn spawn_generation(
    app: &App,
    config: &AppConfig,
    event_tx: &mpsc::UnboundedSender<AppEvent>,
) -> JoinHandle<()> {
    let form = app.form.clone();
    let config = config.clone();
    let tx = event_tx.clone();

    tokio::spawn(async move {
        let event = match run_generation(form, config).await {
            Ok(ebook) => AppEvent::GenerationFinished(ebook),
            Err(e) => AppEvent::GenerationFailed(format!("{e:#}")),
        };
        let _ = tx.send(event);
    })
}

/// Ctrl+C arms exit, a second Ctrl+C quits, any other key disarms.
/// Returns true when the key was consumed.
fn handle_global_keys(app: &mut App, key: KeyCode, modifiers: KeyModifiers) -> bool {
    match key {
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
            if app.exit_pending {
                app.quit();
            } else {
                app.exit_pending = true;
            }
            return true;
        }
        KeyCode::Char('q') if modifiers.contains(KeyModifiers::CONTROL) => {
            app.quit();
            return true;
        }
        _ if app.exit_pending => {
            app.exit_pending = false;
            if key == KeyCode::Esc {
                return true;
            }
        }
        _ => {}
    }

    if app.show_help {
        if key == KeyCode::Esc
            || (key == KeyCode::Char('h') && modifiers.contains(KeyModifiers::CONTROL))
        {
            app.show_help = false;
        }
        return true;
    }

    if key == KeyCode::Char('h') && modifiers.contains(KeyModifiers::CONTROL) {
        app.toggle_help();
        return true;
    }

    false
}

fn handle_form_keys(
    app: &mut App,
    key: KeyCode,
    config: &AppConfig,
    event_tx: &mpsc::UnboundedSender<AppEvent>,
) -> Option<JoinHandle<()>> {
    let input = app.current_step()?.input;

    match key {
        KeyCode::Enter => {
            if app.next() == Transition::Submit {
                tracing::info!("Form submitted");
                return Some(spawn_generation(app, config, event_tx));
            }
        }
        KeyCode::Esc => app.back(),
        KeyCode::Up if matches!(input, InputKind::SingleSelect { .. }) => app.move_selection(-1),
        KeyCode::Down if matches!(input, InputKind::SingleSelect { .. }) => app.move_selection(1),
        KeyCode::Left if matches!(input, InputKind::Slider { .. }) => app.adjust_slider(-1),
        KeyCode::Right if matches!(input, InputKind::Slider { .. }) => app.adjust_slider(1),
        KeyCode::Backspace => app.input_backspace(),
        KeyCode::Char(c) => app.input_char(c),
        _ => {}
    }
    None
}

/// Run an export action against the current ebook and report it on the status line.
fn export_action(app: &mut App, action: impl FnOnce(&GeneratedEbook) -> String) {
    if let Some(ebook) = app.ebook.as_ref() {
        let status = action(ebook);
        app.set_status(status);
    }
}

fn handle_result_keys(app: &mut App, key: KeyCode, config: &AppConfig) {
    if app.ebook.is_none() {
        return;
    }

    match key {
        KeyCode::Char('c') => export_action(app, |ebook| {
            match export::copy_to_clipboard(&ebook.content) {
                Ok(()) => "Copiado para a área de transferência".to_string(),
                Err(e) => format!("Falha ao copiar: {e:#}"),
            }
        }),
        KeyCode::Char('d') => export_action(app, |ebook| {
            match export::save_markdown(&config::export_dir(config), ebook) {
                Ok(paths) => format!("Salvo em {}", paths[0].display()),
                Err(e) => format!("Falha ao salvar: {e:#}"),
            }
        }),
        KeyCode::Char('p') => export_action(app, |ebook| {
            match export::save_print_html(&config::export_dir(config), ebook) {
                Ok(path) => format!("Abra {} no navegador e imprima como PDF", path.display()),
                Err(e) => format!("Falha ao exportar: {e:#}"),
            }
        }),
        KeyCode::Char('s') => app.set_status(export::SHARE_UNSUPPORTED),
        KeyCode::Char('n') => app.reset(),
        KeyCode::Up => app.scroll_up(1),
        KeyCode::Down => app.scroll_down(1),
        KeyCode::PageUp => app.scroll_up(10),
        KeyCode::PageDown => app.scroll_down(10),
        KeyCode::Home => app.scroll_to_top(),
        KeyCode::End => app.scroll_to_bottom(),
        _ => {}
    }
}

fn handle_keyboard_input(
    app: &mut App,
    key: KeyCode,
    modifiers: KeyModifiers,
    config: &AppConfig,
    event_tx: &mpsc::UnboundedSender<AppEvent>,
) -> Option<JoinHandle<()>> {
    if handle_global_keys(app, key, modifiers) {
        return None;
    }

    match app.state {
        WizardState::Intro => {
            if key == KeyCode::Enter {
                app.start();
            }
        }
        WizardState::Form { .. } => return handle_form_keys(app, key, config, event_tx),
        // No cancellation once generation has started
        WizardState::Generating => {}
        WizardState::Result => handle_result_keys(app, key, config),
        WizardState::Error { .. } => match key {
            KeyCode::Char('r') | KeyCode::Enter => {
                if app.retry() {
                    tracing::info!("Retrying generation");
                    return Some(spawn_generation(app, config, event_tx));
                }
            }
            KeyCode::Char('n') => app.reset(),
            _ => {}
        },
    }
    None
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    config: &AppConfig,
    event_tx: &mpsc::UnboundedSender<AppEvent>,
    event_rx: &mut mpsc::UnboundedReceiver<AppEvent>,
) -> Result<()> {
    loop {
        terminal.draw(|f| ui::render(f, app))?;

        // Check for generation results first
        if let Ok(app_event) = event_rx.try_recv() {
            handle_app_event(app, app_event);
        }

        if event::poll(Duration::from_millis(16))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    handle_keyboard_input(app, key.code, key.modifiers, config, event_tx);
                }
            }
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use app::GENERATION_ERROR_MESSAGE;

    fn press(app: &mut App, key: KeyCode) {
        let (tx, _rx) = mpsc::unbounded_channel();
        let handle = handle_keyboard_input(
            app,
            key,
            KeyModifiers::NONE,
            &AppConfig::default(),
            &tx,
        );
        assert!(handle.is_none(), "unexpected generation task");
    }

    #[test]
    fn test_double_ctrl_c_quits() {
        let mut app = App::new();
        assert!(handle_global_keys(&mut app, KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.exit_pending);
        assert!(!app.should_quit);
        assert!(handle_global_keys(&mut app, KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit);
    }

    #[test]
    fn test_other_key_cancels_pending_exit() {
        let mut app = App::new();
        handle_global_keys(&mut app, KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert!(!handle_global_keys(&mut app, KeyCode::Enter, KeyModifiers::NONE));
        assert!(!app.exit_pending);
    }

    #[test]
    fn test_help_swallows_keys() {
        let mut app = App::new();
        handle_global_keys(&mut app, KeyCode::Char('h'), KeyModifiers::CONTROL);
        assert!(app.show_help);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.state, WizardState::Intro);
        press(&mut app, KeyCode::Esc);
        assert!(!app.show_help);
    }

    #[test]
    fn test_typing_through_first_step() {
        let mut app = App::new();
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.state, WizardState::Form { step: 0 });

        press(&mut app, KeyCode::Enter);
        assert_eq!(app.state, WizardState::Form { step: 0 });

        for c in "Chá".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.state, WizardState::Form { step: 1 });
        assert_eq!(app.form.topic, "Chá");

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.state, WizardState::Form { step: 0 });
    }

    #[test]
    fn test_result_keys_reset_and_share() {
        let mut app = App::new();
        app.state = WizardState::Generating;
        app.finish_generation(GeneratedEbook {
            content: "# Livro".to_string(),
            cover: None,
        });

        press(&mut app, KeyCode::Char('s'));
        assert_eq!(app.state, WizardState::Result);
        assert_eq!(app.status_message.as_deref(), Some(export::SHARE_UNSUPPORTED));

        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.state, WizardState::Intro);
        assert_eq!(app.form, FormData::default());
    }

    #[test]
    fn test_download_writes_into_export_dir() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let config = AppConfig {
            export_dir: Some(temp_dir.path().display().to_string()),
            ..Default::default()
        };
        let mut app = App::new();
        app.state = WizardState::Generating;
        app.finish_generation(GeneratedEbook {
            content: "# Livro\n- item".to_string(),
            cover: None,
        });

        handle_result_keys(&mut app, KeyCode::Down, &config);
        assert!(app.status_message.is_none());

        handle_result_keys(&mut app, KeyCode::Char('d'), &config);
        let saved = temp_dir.path().join(export::MARKDOWN_FILENAME);
        assert_eq!(std::fs::read_to_string(&saved).unwrap(), "# Livro\n- item");
        assert!(app
            .status_message
            .as_deref()
            .is_some_and(|status| status.starts_with("Salvo em")));
        assert!(app.ebook.is_some());
    }

    #[test]
    fn test_stale_event_after_reset_is_ignored() {
        let mut app = App::new();
        handle_app_event(
            &mut app,
            AppEvent::GenerationFinished(GeneratedEbook {
                content: "late".to_string(),
                cover: None,
            }),
        );
        assert_eq!(app.state, WizardState::Intro);
        assert!(app.ebook.is_none());
    }

    #[test]
    fn test_missing_key_shows_fixed_error() {
        let client = GeminiClient::with_api_key(&AppConfig::default(), None);
        let error = client.expect_err("blank key must be rejected");

        let mut app = App::new();
        app.state = WizardState::Generating;
        handle_app_event(&mut app, AppEvent::GenerationFailed(format!("{error:#}")));
        assert_eq!(
            app.state,
            WizardState::Error {
                message: GENERATION_ERROR_MESSAGE.to_string()
            }
        );
    }
}
