// Line-oriented markdown subset: headings, bullets, numbered items, images,
// paragraphs with **bold** spans. Everything else is literal text.

use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    Text(String),
    Bold(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Spacer,
    Heading { level: u8, text: String },
    Bullet(Vec<Inline>),
    Numbered { label: String, content: Vec<Inline> },
    Image { alt: String, src: String },
    Paragraph(Vec<Inline>),
}

/// Classify every line of `markdown` independently. A trailing newline
/// yields a final spacer; `\r` is dropped by the per-line trim.
pub fn parse_blocks(markdown: &str) -> Vec<Block> {
    markdown.split('\n').map(parse_line).collect()
}

fn parse_line(line: &str) -> Block {
    let trimmed = line.trim();

    if trimmed.is_empty() {
        return Block::Spacer;
    }

    for (prefix, level) in [("###", 3), ("##", 2), ("#", 1)] {
        if let Some(rest) = trimmed.strip_prefix(prefix) {
            return Block::Heading {
                level,
                text: rest.trim_start().to_string(),
            };
        }
    }

    if let Some(rest) = trimmed
        .strip_prefix("- ")
        .or_else(|| trimmed.strip_prefix("* "))
    {
        return Block::Bullet(parse_inline(rest.trim_start()));
    }

    if let Some((label, rest)) = split_numbered(trimmed) {
        return Block::Numbered {
            label: label.to_string(),
            content: parse_inline(rest),
        };
    }

    if let Some((alt, src)) = split_image(trimmed) {
        return Block::Image {
            alt: alt.to_string(),
            src: src.to_string(),
        };
    }

    Block::Paragraph(parse_inline(trimmed))
}

/// `12. rest` -> `("12", "rest")`. Needs digits, a dot, then whitespace.
fn split_numbered(line: &str) -> Option<(&str, &str)> {
    let digits = line.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    let rest = line[digits..].strip_prefix('.')?;
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    Some((&line[..digits], rest.trim_start()))
}

/// A line that is exactly one `![alt](src)`.
fn split_image(line: &str) -> Option<(&str, &str)> {
    let inner = line.strip_prefix("![")?.strip_suffix(')')?;
    let (alt, src) = inner.split_once("](")?;
    if src.contains(')') || src.contains("](") {
        return None;
    }
    Some((alt, src))
}

/// Resolve `**bold**` spans. An unterminated `**` stays literal.
pub fn parse_inline(text: &str) -> Vec<Inline> {
    let mut spans = Vec::new();
    let mut current_text = String::new();
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '*' && chars.peek() == Some(&'*') {
            chars.next(); // consume second *

            // Find closing **
            let mut bold_text = String::new();
            let mut found_close = false;
            while let Some(ch) = chars.next() {
                if ch == '*' && chars.peek() == Some(&'*') {
                    chars.next();
                    found_close = true;
                    break;
                }
                bold_text.push(ch);
            }

            if found_close {
                if !current_text.is_empty() {
                    spans.push(Inline::Text(std::mem::take(&mut current_text)));
                }
                spans.push(Inline::Bold(bold_text));
            } else {
                current_text.push_str("**");
                current_text.push_str(&bold_text);
            }
        } else {
            current_text.push(ch);
        }
    }

    if !current_text.is_empty() {
        spans.push(Inline::Text(current_text));
    }

    spans
}

fn inline_spans(content: &[Inline]) -> Vec<Span<'static>> {
    content
        .iter()
        .map(|inline| match inline {
            Inline::Text(text) => Span::raw(text.clone()),
            Inline::Bold(text) => Span::styled(
                text.clone(),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
        })
        .collect()
}

/// Style parsed blocks for the terminal.
pub fn render_blocks(blocks: &[Block]) -> Vec<Line<'static>> {
    blocks.iter().map(render_block).collect()
}

fn render_block(block: &Block) -> Line<'static> {
    match block {
        Block::Spacer => Line::from(""),
        Block::Heading { level, text } => {
            let color = match level {
                1 => Color::Yellow,
                2 => Color::Cyan,
                _ => Color::Blue,
            };
            let mut style = Style::default().fg(color).add_modifier(Modifier::BOLD);
            if *level == 1 {
                style = style.add_modifier(Modifier::UNDERLINED);
            }
            Line::from(Span::styled(text.clone(), style))
        }
        Block::Bullet(content) => {
            let mut spans = vec![Span::styled("  • ", Style::default().fg(Color::Cyan))];
            spans.extend(inline_spans(content));
            Line::from(spans)
        }
        Block::Numbered { label, content } => {
            let mut spans = vec![Span::styled(
                format!("  {label}. "),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )];
            spans.extend(inline_spans(content));
            Line::from(spans)
        }
        Block::Image { alt, .. } => Line::from(Span::styled(
            format!("[imagem: {alt}]"),
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        )),
        Block::Paragraph(content) => Line::from(inline_spans(content)),
    }
}
