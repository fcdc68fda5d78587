use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};
use std::time::Duration;

use crate::app::{App, WizardState};
use crate::models::{InputKind, STEPS};

pub const LOADING_TIPS: &[&str] = &[
    "Aplicando o princípio de 'Moeda Social' para tornar seu conteúdo digno de ser compartilhado...",
    "Estruturando 'Gatilhos' mentais para manter seu público engajado...",
    "Refinando a 'Emoção' do texto para criar conexão profunda...",
    "Simplificando conceitos complexos para torná-los 'Concretos'...",
    "Criando histórias envolventes no estilo 'Made to Stick'...",
    "Desenhando a capa e as ilustrações dos capítulos...",
    "Escrevendo o primeiro capítulo com foco em conversão...",
];

const TIP_INTERVAL_SECS: u64 = 4;
const SPINNER: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Tip shown after `elapsed` on the loading screen; rotates every few seconds.
pub fn loading_tip(elapsed: Duration) -> &'static str {
    let index = usize::try_from(elapsed.as_secs() / TIP_INTERVAL_SECS).unwrap_or(0);
    LOADING_TIPS[index % LOADING_TIPS.len()]
}

fn spinner_frame(elapsed: Duration) -> &'static str {
    let index = usize::try_from(elapsed.as_millis() / 100).unwrap_or(0);
    SPINNER[index % SPINNER.len()]
}

pub fn progress_label(step: usize, total: usize) -> String {
    let dots: String = (0..total)
        .map(|i| if i <= step { '●' } else { '○' })
        .collect();
    format!("Passo {} de {total}  {dots}", step + 1)
}

/// Number of terminal rows `lines` occupy once wrapped to `width`.
pub fn visual_line_count(lines: &[Line], width: usize) -> usize {
    let width = width.max(1);
    lines
        .iter()
        .map(|line| line.width().div_ceil(width).max(1))
        .sum()
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn panel(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(Style::default().fg(Color::Cyan))
}

pub fn render_intro(frame: &mut Frame, area: Rect) {
    let text = vec![
        Line::from(Span::styled(
            "Olá, eu sou o Book AI",
            Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(
            "Sou seu copywriter especialista de IA. Vou te ajudar a construir seu Ebook de forma \
             profissional, usando os princípios de \"Contagious\" e \"Made to Stick\" para que seu \
             material seja contagiante e memorável.",
        ),
        Line::from(""),
        Line::from(vec![
            Span::styled("  ✦ ", Style::default().fg(Color::Yellow)),
            Span::raw("Estrutura viral baseada em psicologia comportamental."),
        ]),
        Line::from(vec![
            Span::styled("  ✦ ", Style::default().fg(Color::Yellow)),
            Span::raw("Copywriting persuasivo focado nas dores da persona."),
        ]),
        Line::from(vec![
            Span::styled("  ✦ ", Style::default().fg(Color::Yellow)),
            Span::raw("Capa e ilustrações geradas no estilo que você escolher."),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "Pressione Enter para começar",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ))
        .alignment(Alignment::Center),
    ];

    let intro = Paragraph::new(text)
        .block(panel(" Book AI "))
        .wrap(Wrap { trim: false });

    frame.render_widget(intro, centered(area, 72, 16));
}

pub fn render_form_step(frame: &mut Frame, app: &App, area: Rect) {
    let (WizardState::Form { step: index }, Some(step)) = (&app.state, app.current_step()) else {
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(1), // Progress
            Constraint::Length(1), // Gap
            Constraint::Length(1), // Title
            Constraint::Length(3), // Description
            Constraint::Min(3),    // Input
            Constraint::Length(1), // Navigation hint
        ])
        .split(area);

    frame.render_widget(
        Paragraph::new(progress_label(*index, STEPS.len())).style(Style::default().fg(Color::Gray)),
        chunks[0],
    );
    frame.render_widget(
        Paragraph::new(step.title).style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        chunks[2],
    );
    frame.render_widget(
        Paragraph::new(step.description).wrap(Wrap { trim: true }),
        chunks[3],
    );

    let value = app.form.get(step.key);
    match step.input {
        InputKind::FreeText { placeholder } => {
            let (text, style) = if value.is_empty() {
                (placeholder, Style::default().fg(Color::Gray))
            } else {
                (
                    value,
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                )
            };
            let input = Paragraph::new(text)
                .style(style)
                .block(panel(" Sua resposta "))
                .wrap(Wrap { trim: false });
            frame.render_widget(input, chunks[4]);
        }
        InputKind::SingleSelect { options } => {
            let items: Vec<ListItem> = options.iter().map(|option| ListItem::new(*option)).collect();
            let mut state =
                ListState::default().with_selected(options.iter().position(|o| *o == value));
            let list = List::new(items)
                .block(panel(" ↑/↓ para escolher "))
                .highlight_style(
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                )
                .highlight_symbol("> ");
            frame.render_stateful_widget(list, chunks[4], &mut state);
        }
        InputKind::Slider { min, max, .. } => {
            let gauge_area = Rect {
                height: chunks[4].height.min(3),
                ..chunks[4]
            };
            let (ratio, label) = match value.parse::<u32>() {
                Ok(pages) => (
                    f64::from(pages.saturating_sub(min)) / f64::from((max - min).max(1)),
                    format!("{pages} páginas"),
                ),
                Err(_) => (0.0, "Use ←/→ para definir".to_string()),
            };
            let gauge = Gauge::default()
                .block(panel(" ←/→ para ajustar "))
                .gauge_style(Style::default().fg(Color::Cyan))
                .ratio(ratio.clamp(0.0, 1.0))
                .label(label);
            frame.render_widget(gauge, gauge_area);
        }
    }

    let next_label = if app.is_last_step() {
        "Gerar Ebook"
    } else {
        "Próximo"
    };
    let next_style = if app.can_advance() {
        Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let mut hint = vec![Span::styled(format!("Enter: {next_label}"), next_style)];
    if *index > 0 {
        hint.push(Span::styled(
            "   Esc: Voltar",
            Style::default().fg(Color::Gray),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(hint)), chunks[5]);
}

pub fn render_generating(frame: &mut Frame, app: &App, area: Rect) {
    let elapsed = app
        .generation_started
        .map(|started| started.elapsed())
        .unwrap_or_default();

    let text = vec![
        Line::from(Span::styled(
            "O Book AI está pensando",
            Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            format!("{} Processando dados", spinner_frame(elapsed)),
            Style::default().fg(Color::Cyan),
        )),
        Line::from(""),
        Line::from(Span::styled(
            format!("\"{}\"", loading_tip(elapsed)),
            Style::default()
                .fg(Color::Gray)
                .add_modifier(Modifier::ITALIC),
        )),
    ];

    let loading = Paragraph::new(text)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });

    frame.render_widget(loading, centered(area, 64, 8));
}

pub fn render_result(frame: &mut Frame, app: &mut App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Header
            Constraint::Min(0),    // Document
            Constraint::Length(1), // Status line
        ])
        .split(area);

    let cover_label = match app.ebook.as_ref().and_then(|e| e.cover.as_ref()) {
        Some(_) => Span::styled(" · capa gerada", Style::default().fg(Color::Green)),
        None => Span::styled(" · sem capa", Style::default().fg(Color::DarkGray)),
    };
    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(
                "Book AI · Resultado",
                Style::default()
                    .fg(Color::Magenta)
                    .add_modifier(Modifier::BOLD),
            ),
            cover_label,
        ])),
        chunks[0],
    );

    let lines = super::markdown::render_blocks(&app.blocks);

    // Clamp scrolling against the wrapped height
    let document_area = chunks[1];
    let total_visual_lines = visual_line_count(&lines, document_area.width as usize);
    let max_scroll = total_visual_lines.saturating_sub(document_area.height as usize);
    let actual_scroll = app.scroll_offset.min(max_scroll);
    if app.scroll_offset != actual_scroll {
        app.scroll_offset = actual_scroll;
    }

    let document = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((u16::try_from(actual_scroll).unwrap_or(u16::MAX), 0));
    frame.render_widget(document, document_area);

    let status = app.status_message.as_deref().map_or_else(
        || Paragraph::new("").style(Style::default().fg(Color::DarkGray)),
        |message| {
            Paragraph::new(message.to_string()).style(
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            )
        },
    );
    frame.render_widget(status, chunks[2]);
}

pub fn render_error(frame: &mut Frame, app: &App, area: Rect) {
    let WizardState::Error { message } = &app.state else {
        return;
    };

    let text = vec![
        Line::from(Span::styled(
            "Ops, algo deu errado",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(message.as_str()),
        Line::from(""),
        Line::from(Span::styled(
            "r: Tentar novamente   n: Novo ebook",
            Style::default().fg(Color::Cyan),
        )),
    ];

    let error = Paragraph::new(text)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        )
        .wrap(Wrap { trim: true });

    frame.render_widget(error, centered(area, 60, 9));
}

pub fn render_help_window(frame: &mut Frame, area: Rect) {
    let help_text = vec![
        Line::from(Span::styled(
            "Book AI - Atalhos",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled("Geral:", Style::default().add_modifier(Modifier::BOLD))),
        Line::from("  Ctrl+H        - Mostrar/ocultar esta ajuda"),
        Line::from("  Ctrl+Q        - Sair"),
        Line::from("  Ctrl+C (2x)   - Sair"),
        Line::from(""),
        Line::from(Span::styled("Formulário:", Style::default().add_modifier(Modifier::BOLD))),
        Line::from("  Enter         - Próximo passo / gerar"),
        Line::from("  Esc           - Passo anterior"),
        Line::from("  ↑/↓  ←/→      - Escolher estilo / páginas"),
        Line::from(""),
        Line::from(Span::styled("Resultado:", Style::default().add_modifier(Modifier::BOLD))),
        Line::from("  c / d / p / s - Copiar / baixar / imprimir / compartilhar"),
        Line::from("  n             - Novo ebook"),
        Line::from("  ↑/↓ PgUp/PgDn - Rolar o texto"),
        Line::from(""),
        Line::from(Span::styled(
            "Ctrl+H ou Esc para fechar",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let help_paragraph = Paragraph::new(help_text)
        .block(panel(" Ajuda "))
        .wrap(Wrap { trim: false });

    let popup_area = centered(area, 64, 21);
    frame.render_widget(Clear, popup_area);
    frame.render_widget(help_paragraph, popup_area);
}

pub fn key_hints(state: &WizardState) -> &'static str {
    match state {
        WizardState::Intro => "Enter: Começar | Ctrl+H: Ajuda | Ctrl+C: Sair",
        WizardState::Form { .. } => "Enter: Próximo | Esc: Voltar | Ctrl+H: Ajuda",
        WizardState::Generating => "Gerando... | Ctrl+C: Sair",
        WizardState::Result => {
            "c: Copiar | d: Baixar | p: Imprimir | s: Compartilhar | n: Novo Ebook"
        }
        WizardState::Error { .. } => "r: Tentar novamente | n: Novo ebook | Ctrl+C: Sair",
    }
}

pub fn render_bottom_bar(frame: &mut Frame, app: &App, area: Rect) {
    let (text, style) = if app.exit_pending {
        (
            "Press Ctrl+C again to exit, Esc to cancel",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )
    } else {
        (key_hints(&app.state), Style::default().fg(Color::DarkGray))
    };

    let bar = Paragraph::new(text)
        .alignment(Alignment::Center)
        .style(style);

    frame.render_widget(bar, area);
}
