use crate::models::{FormData, GeneratedEbook, InputKind, StepDefinition, STEPS};
use crate::ui::markdown::{self, Block};

use std::time::Instant;

/// Shown in the Error state whatever the underlying cause.
pub const GENERATION_ERROR_MESSAGE: &str =
    "Ocorreu um erro ao gerar o ebook. Por favor, verifique sua conexão e tente novamente.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WizardState {
    Intro,
    Form { step: usize },
    Generating,
    Result,
    Error { message: String },
}

/// Outcome of pressing "next" on a form step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Field blank (or not on a form step); nothing changed.
    Blocked,
    Advanced,
    /// Last step done; the controller is now Generating.
    Submit,
}

#[derive(Debug)]
pub struct App {
    pub state: WizardState,
    pub form: FormData,
    pub ebook: Option<GeneratedEbook>,
    /// Parsed once per successful generation.
    pub blocks: Vec<Block>,
    pub should_quit: bool,
    pub exit_pending: bool,
    pub show_help: bool,
    pub scroll_offset: usize,
    pub status_message: Option<String>,
    pub generation_started: Option<Instant>,
}

impl App {
    pub fn new() -> Self {
        Self {
            state: WizardState::Intro,
            form: FormData::default(),
            ebook: None,
            blocks: Vec::new(),
            should_quit: false,
            exit_pending: false,
            show_help: false,
            scroll_offset: 0,
            status_message: None,
            generation_started: None,
        }
    }

    pub const fn quit(&mut self) {
        self.should_quit = true;
    }

    pub const fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub fn start(&mut self) {
        if self.state == WizardState::Intro {
            self.state = WizardState::Form { step: 0 };
        }
    }

    pub fn current_step(&self) -> Option<&'static StepDefinition> {
        match self.state {
            WizardState::Form { step } => STEPS.get(step),
            _ => None,
        }
    }

    pub fn is_last_step(&self) -> bool {
        matches!(self.state, WizardState::Form { step } if step + 1 == STEPS.len())
    }

    /// "Next" precondition: the active step's field has non-blank content.
    pub fn can_advance(&self) -> bool {
        self.current_step()
            .is_some_and(|step| self.form.is_filled(step.key))
    }

    pub fn next(&mut self) -> Transition {
        if !self.can_advance() {
            return Transition::Blocked;
        }
        let WizardState::Form { step } = self.state else {
            return Transition::Blocked;
        };

        if step + 1 < STEPS.len() {
            self.state = WizardState::Form { step: step + 1 };
            Transition::Advanced
        } else {
            self.enter_generating();
            Transition::Submit
        }
    }

    pub fn back(&mut self) {
        if let WizardState::Form { step } = self.state {
            if step > 0 {
                self.state = WizardState::Form { step: step - 1 };
            }
        }
    }

    /// Error -> Generating with the same answers. Returns false elsewhere.
    pub fn retry(&mut self) -> bool {
        if matches!(self.state, WizardState::Error { .. }) {
            self.enter_generating();
            true
        } else {
            false
        }
    }

    fn enter_generating(&mut self) {
        self.state = WizardState::Generating;
        self.ebook = None;
        self.blocks.clear();
        self.status_message = None;
        self.generation_started = Some(Instant::now());
    }

    pub fn is_generating(&self) -> bool {
        self.state == WizardState::Generating
    }

    /// Results that arrive outside Generating are stale and dropped.
    pub fn finish_generation(&mut self, ebook: GeneratedEbook) {
        if !self.is_generating() {
            return;
        }
        self.blocks = markdown::parse_blocks(&ebook.content);
        self.ebook = Some(ebook);
        self.state = WizardState::Result;
        self.generation_started = None;
        self.scroll_to_top();
    }

    pub fn fail_generation(&mut self) {
        if !self.is_generating() {
            return;
        }
        self.state = WizardState::Error {
            message: GENERATION_ERROR_MESSAGE.to_string(),
        };
        self.generation_started = None;
    }

    /// Back to Intro with every answer cleared.
    pub fn reset(&mut self) {
        self.state = WizardState::Intro;
        self.form = FormData::default();
        self.ebook = None;
        self.blocks.clear();
        self.status_message = None;
        self.generation_started = None;
        self.scroll_offset = 0;
    }

    pub fn input_char(&mut self, c: char) {
        if let Some(step) = self.current_step() {
            if matches!(step.input, InputKind::FreeText { .. }) {
                self.form.get_mut(step.key).push(c);
            }
        }
    }

    pub fn input_backspace(&mut self) {
        if let Some(step) = self.current_step() {
            if matches!(step.input, InputKind::FreeText { .. }) {
                self.form.get_mut(step.key).pop();
            }
        }
    }

    /// Move the highlighted option. The first move selects the first option.
    pub fn move_selection(&mut self, delta: isize) {
        let Some(step) = self.current_step() else {
            return;
        };
        let InputKind::SingleSelect { options } = step.input else {
            return;
        };
        if options.is_empty() {
            return;
        }

        let current = options
            .iter()
            .position(|option| *option == self.form.get(step.key));
        let index = current.map_or(0, |i| {
            i.saturating_add_signed(delta).min(options.len() - 1)
        });
        self.form.set(step.key, options[index]);
    }

    /// Nudge the slider by `delta` steps. The first move lands on the initial value.
    pub fn adjust_slider(&mut self, delta: i32) {
        let Some(step) = self.current_step() else {
            return;
        };
        let InputKind::Slider {
            min,
            max,
            step: increment,
            initial,
        } = step.input
        else {
            return;
        };

        let delta = delta.saturating_mul(i32::try_from(increment).unwrap_or(i32::MAX));
        let value = match self.form.get(step.key).trim().parse::<u32>() {
            Ok(current) => current.saturating_add_signed(delta).clamp(min, max),
            Err(_) => initial,
        };
        self.form.set(step.key, value.to_string());
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    pub const fn scroll_up(&mut self, amount: usize) {
        self.scroll_offset = self.scroll_offset.saturating_sub(amount);
    }

    pub fn scroll_down(&mut self, amount: usize) {
        self.scroll_offset = self.scroll_offset.saturating_add(amount);
    }

    pub const fn scroll_to_top(&mut self) {
        self.scroll_offset = 0;
    }

    pub const fn scroll_to_bottom(&mut self) {
        // Clamped to the real bottom by the renderer
        self.scroll_offset = usize::MAX;
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FieldKey, DEPTH_MAX, DEPTH_MIN};

    fn fill_current(app: &mut App) {
        let step = app.current_step().unwrap();
        match step.input {
            InputKind::FreeText { .. } => "resposta".chars().for_each(|c| app.input_char(c)),
            InputKind::SingleSelect { .. } => app.move_selection(1),
            InputKind::Slider { .. } => app.adjust_slider(1),
        }
    }

    fn app_at_last_step() -> App {
        let mut app = App::new();
        app.start();
        for _ in 0..STEPS.len() - 1 {
            fill_current(&mut app);
            assert_eq!(app.next(), Transition::Advanced);
        }
        app
    }

    fn sample_ebook() -> GeneratedEbook {
        GeneratedEbook {
            content: "# Livro\n\nTexto".to_string(),
            cover: None,
        }
    }

    #[test]
    fn test_app_new() {
        let app = App::new();
        assert_eq!(app.state, WizardState::Intro);
        assert_eq!(app.form, FormData::default());
        assert!(!app.should_quit);
        assert!(app.ebook.is_none());
    }

    #[test]
    fn test_app_quit() {
        let mut app = App::new();
        app.quit();
        assert!(app.should_quit);
    }

    #[test]
    fn test_toggle_help() {
        let mut app = App::new();
        assert!(!app.show_help);
        app.toggle_help();
        assert!(app.show_help);
        app.toggle_help();
        assert!(!app.show_help);
    }

    #[test]
    fn test_start_enters_first_step() {
        let mut app = App::new();
        assert!(app.current_step().is_none());
        app.start();
        assert_eq!(app.state, WizardState::Form { step: 0 });
        assert_eq!(app.current_step().unwrap().key, FieldKey::Topic);
    }

    #[test]
    fn test_next_blocked_on_blank_field_for_every_step() {
        let mut app = App::new();
        app.start();
        for index in 0..STEPS.len() {
            assert_eq!(app.state, WizardState::Form { step: index });

            let key = STEPS[index].key;
            app.form.set(key, "  \t ");
            assert!(!app.can_advance());
            assert_eq!(app.next(), Transition::Blocked);
            assert_eq!(app.state, WizardState::Form { step: index });

            app.form.set(key, "");
            fill_current(&mut app);
            assert!(app.can_advance());
            if index + 1 < STEPS.len() {
                assert_eq!(app.next(), Transition::Advanced);
            }
        }
    }

    #[test]
    fn test_completing_steps_submits_once() {
        let mut app = app_at_last_step();
        assert!(app.is_last_step());
        fill_current(&mut app);

        assert_eq!(app.next(), Transition::Submit);
        assert!(app.is_generating());
        assert!(app.generation_started.is_some());

        // Another "next" while generating cannot submit again
        assert_eq!(app.next(), Transition::Blocked);
        assert!(!app.retry());
        assert!(app.is_generating());
    }

    #[test]
    fn test_back_navigation() {
        let mut app = App::new();
        app.start();
        app.back();
        assert_eq!(app.state, WizardState::Form { step: 0 });

        fill_current(&mut app);
        app.next();
        app.back();
        assert_eq!(app.state, WizardState::Form { step: 0 });
        assert_eq!(app.form.topic, "resposta");
    }

    #[test]
    fn test_text_input_only_on_free_text_steps() {
        let mut app = App::new();
        app.start();
        app.input_char('a');
        app.input_char('b');
        app.input_backspace();
        assert_eq!(app.form.topic, "a");

        let mut app = app_at_last_step();
        app.input_char('x');
        assert!(app.form.cover_style.is_empty());
    }

    #[test]
    fn test_move_selection() {
        let mut app = app_at_last_step();
        app.move_selection(-1);
        assert_eq!(app.form.cover_style, "Minimalista");
        app.move_selection(1);
        assert_eq!(app.form.cover_style, "Fotorealista");
        app.move_selection(-5);
        assert_eq!(app.form.cover_style, "Minimalista");
        app.move_selection(100);
        assert_eq!(app.form.cover_style, "Art Deco");
    }

    #[test]
    fn test_adjust_slider_clamps() {
        let mut app = App::new();
        app.start();
        while app.current_step().unwrap().key != FieldKey::Depth {
            fill_current(&mut app);
            app.next();
        }

        app.adjust_slider(1);
        assert_eq!(app.form.depth, "50");
        app.adjust_slider(1);
        assert_eq!(app.form.depth, "55");
        app.adjust_slider(-100);
        assert_eq!(app.form.depth, DEPTH_MIN.to_string());
        app.adjust_slider(100);
        assert_eq!(app.form.depth, DEPTH_MAX.to_string());
    }

    #[test]
    fn test_success_reaches_result() {
        let mut app = app_at_last_step();
        fill_current(&mut app);
        app.next();

        app.finish_generation(sample_ebook());
        assert_eq!(app.state, WizardState::Result);
        assert_eq!(app.ebook, Some(sample_ebook()));
        assert_eq!(app.blocks.len(), 3);
    }

    #[test]
    fn test_failure_then_retry() {
        let mut app = app_at_last_step();
        fill_current(&mut app);
        app.next();
        let submitted = app.form.clone();

        app.fail_generation();
        assert_eq!(
            app.state,
            WizardState::Error {
                message: GENERATION_ERROR_MESSAGE.to_string()
            }
        );

        assert!(app.retry());
        assert!(app.is_generating());
        assert_eq!(app.form, submitted);
    }

    #[test]
    fn test_stale_events_are_ignored() {
        let mut app = App::new();
        app.finish_generation(sample_ebook());
        assert_eq!(app.state, WizardState::Intro);
        app.fail_generation();
        assert_eq!(app.state, WizardState::Intro);
    }

    #[test]
    fn test_reset_from_result_and_error() {
        let mut app = app_at_last_step();
        fill_current(&mut app);
        app.next();
        app.finish_generation(sample_ebook());
        app.set_status("Copiado");
        app.reset();
        assert_eq!(app.state, WizardState::Intro);
        assert_eq!(app.form, FormData::default());
        assert!(app.ebook.is_none());
        assert!(app.blocks.is_empty());
        assert!(app.status_message.is_none());

        let mut app = app_at_last_step();
        fill_current(&mut app);
        app.next();
        app.fail_generation();
        app.reset();
        assert_eq!(app.state, WizardState::Intro);
        assert_eq!(app.form, FormData::default());
    }

    #[test]
    fn test_scroll_up() {
        let mut app = App::new();
        app.scroll_offset = 10;
        app.scroll_up(3);
        assert_eq!(app.scroll_offset, 7);
        app.scroll_up(10);
        assert_eq!(app.scroll_offset, 0);
    }

    #[test]
    fn test_scroll_down_and_bottom() {
        let mut app = App::new();
        app.scroll_down(3);
        assert_eq!(app.scroll_offset, 3);
        app.scroll_to_bottom();
        assert_eq!(app.scroll_offset, usize::MAX);
        app.scroll_to_top();
        assert_eq!(app.scroll_offset, 0);
    }
}
