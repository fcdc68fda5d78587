pub mod markdown;
pub mod widgets;

use crate::app::{App, WizardState};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    Frame,
};

pub fn render(frame: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Active screen
            Constraint::Length(1), // Bottom keymap bar
        ])
        .split(frame.area());

    match app.state {
        WizardState::Intro => widgets::render_intro(frame, chunks[0]),
        WizardState::Form { .. } => widgets::render_form_step(frame, app, chunks[0]),
        WizardState::Generating => widgets::render_generating(frame, app, chunks[0]),
        WizardState::Result => widgets::render_result(frame, app, chunks[0]),
        WizardState::Error { .. } => widgets::render_error(frame, app, chunks[0]),
    }

    widgets::render_bottom_bar(frame, app, chunks[1]);

    if app.show_help {
        widgets::render_help_window(frame, frame.area());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GeneratedEbook;
    use ratatui::{backend::TestBackend, Terminal};

    fn screen_text(app: &mut App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|f| render(f, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(ratatui::buffer::Cell::symbol)
            .collect()
    }

    #[test]
    fn test_render_intro() {
        let mut app = App::new();
        assert!(screen_text(&mut app).contains("Book AI"));
    }

    #[test]
    fn test_render_form_step() {
        let mut app = App::new();
        app.start();
        let screen = screen_text(&mut app);
        assert!(screen.contains("Passo 1 de 7"));
        assert!(screen.contains("Tópico e Título"));
    }

    #[test]
    fn test_render_result_clamps_scroll() {
        let mut app = App::new();
        app.state = WizardState::Generating;
        app.finish_generation(GeneratedEbook {
            content: "# Meu Ebook\n\n- um\n- dois".to_string(),
            cover: None,
        });
        app.scroll_to_bottom();

        let screen = screen_text(&mut app);
        assert!(screen.contains("Meu Ebook"));
        assert_eq!(app.scroll_offset, 0);
    }

    #[test]
    fn test_render_error_and_help() {
        let mut app = App::new();
        app.state = WizardState::Generating;
        app.fail_generation();
        app.toggle_help();
        let screen = screen_text(&mut app);
        assert!(screen.contains("Ajuda"));
    }
}
