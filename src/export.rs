// Result-screen actions: copy, download, print-ready export

use anyhow::{Context, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::fmt::Write as _;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::models::GeneratedEbook;
use crate::ui::markdown::{self, Block, Inline};

pub const MARKDOWN_FILENAME: &str = "ebook-gerado.md";
pub const HTML_FILENAME: &str = "ebook-gerado.html";
const COVER_STEM: &str = "ebook-capa";

pub const SHARE_UNSUPPORTED: &str = "Compartilhamento não é suportado neste terminal.";

/// OSC 52 sequence asking the terminal to place `text` on the clipboard.
pub fn clipboard_sequence(text: &str) -> String {
    format!("\x1b]52;c;{}\x07", STANDARD.encode(text))
}

pub fn copy_to_clipboard(text: &str) -> Result<()> {
    let mut stdout = std::io::stdout();
    stdout
        .write_all(clipboard_sequence(text).as_bytes())
        .context("Failed to write clipboard sequence")?;
    stdout.flush().context("Failed to flush clipboard sequence")?;
    Ok(())
}

/// Split a base64 `data:` URI into its MIME type and decoded bytes.
pub fn decode_data_uri(uri: &str) -> Option<(&str, Vec<u8>)> {
    let rest = uri.strip_prefix("data:")?;
    let (mime_type, data) = rest.split_once(";base64,")?;
    let bytes = STANDARD.decode(data).ok()?;
    Some((mime_type, bytes))
}

fn extension_for(mime_type: &str) -> &'static str {
    match mime_type {
        "image/png" => "png",
        "image/jpeg" | "image/jpg" => "jpg",
        "image/webp" => "webp",
        "image/gif" => "gif",
        _ => "img",
    }
}

/// Write the raw markdown, plus the decoded cover when there is one.
/// Returns every path written, markdown first.
pub fn save_markdown(dir: &Path, ebook: &GeneratedEbook) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir).context("Failed to create export directory")?;

    let markdown_path = dir.join(MARKDOWN_FILENAME);
    fs::write(&markdown_path, &ebook.content).context("Failed to write markdown file")?;
    let mut written = vec![markdown_path];

    if let Some(cover) = &ebook.cover {
        match decode_data_uri(cover) {
            Some((mime_type, bytes)) => {
                let cover_path = dir.join(format!("{COVER_STEM}.{}", extension_for(mime_type)));
                fs::write(&cover_path, bytes).context("Failed to write cover image")?;
                written.push(cover_path);
            }
            None => tracing::warn!("Cover is not a base64 data URI; skipped"),
        }
    }

    tracing::info!(files = written.len(), dir = %dir.display(), "Ebook exported");
    Ok(written)
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

fn inline_html(content: &[Inline]) -> String {
    content
        .iter()
        .map(|inline| match inline {
            Inline::Text(text) => escape_html(text),
            Inline::Bold(text) => format!("<strong>{}</strong>", escape_html(text)),
        })
        .collect()
}

/// Self-contained HTML document built from the same blocks the terminal shows.
pub fn render_html(ebook: &GeneratedEbook) -> String {
    let mut html = String::from(
        "<!DOCTYPE html>\n<html lang=\"pt-BR\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>Ebook</title>\n<style>\n\
         body { font-family: Georgia, serif; max-width: 42rem; margin: 2rem auto; line-height: 1.6; }\n\
         img { max-width: 100%; }\n\
         .cover { page-break-after: always; text-align: center; }\n\
         .spacer { height: 0.5rem; }\n\
         </style>\n</head>\n<body>\n",
    );

    if let Some(cover) = &ebook.cover {
        let _ = writeln!(
            html,
            "<div class=\"cover\"><img src=\"{}\" alt=\"Capa\"></div>",
            escape_html(cover)
        );
    }

    for block in markdown::parse_blocks(&ebook.content) {
        let _ = match block {
            Block::Spacer => writeln!(html, "<div class=\"spacer\"></div>"),
            Block::Heading { level, text } => {
                writeln!(html, "<h{level}>{}</h{level}>", escape_html(&text))
            }
            Block::Bullet(content) => writeln!(html, "<p>&bull; {}</p>", inline_html(&content)),
            Block::Numbered { label, content } => {
                writeln!(html, "<p>{}. {}</p>", escape_html(&label), inline_html(&content))
            }
            Block::Image { alt, src } => writeln!(
                html,
                "<p><img src=\"{}\" alt=\"{}\"></p>",
                escape_html(&src),
                escape_html(&alt)
            ),
            Block::Paragraph(content) => writeln!(html, "<p>{}</p>", inline_html(&content)),
        };
    }

    html.push_str("</body>\n</html>\n");
    html
}

/// Write the print-ready HTML for the host's print-to-PDF.
pub fn save_print_html(dir: &Path, ebook: &GeneratedEbook) -> Result<PathBuf> {
    fs::create_dir_all(dir).context("Failed to create export directory")?;
    let path = dir.join(HTML_FILENAME);
    fs::write(&path, render_html(ebook)).context("Failed to write HTML file")?;
    tracing::info!(path = %path.display(), "Print-ready HTML written");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn ebook(cover: Option<&str>) -> GeneratedEbook {
        GeneratedEbook {
            content: "# Título\n\n- item **forte**\n1. passo\nTexto <script>".to_string(),
            cover: cover.map(ToString::to_string),
        }
    }

    #[test]
    fn test_clipboard_sequence() {
        assert_eq!(clipboard_sequence("hi"), "\x1b]52;c;aGk=\x07");
    }

    #[test]
    fn test_decode_data_uri() {
        let (mime_type, bytes) = decode_data_uri("data:image/png;base64,QUJD").unwrap();
        assert_eq!(mime_type, "image/png");
        assert_eq!(bytes, b"ABC");

        assert!(decode_data_uri("https://example.com/cover.png").is_none());
        assert!(decode_data_uri("data:image/png;base64,@@@").is_none());
    }

    #[test]
    fn test_save_markdown_without_cover() {
        let temp_dir = TempDir::new().unwrap();
        let written = save_markdown(temp_dir.path(), &ebook(None)).unwrap();

        assert_eq!(written, vec![temp_dir.path().join(MARKDOWN_FILENAME)]);
        let saved = fs::read_to_string(&written[0]).unwrap();
        assert_eq!(saved, ebook(None).content);
    }

    #[test]
    fn test_save_markdown_with_cover() {
        let temp_dir = TempDir::new().unwrap();
        let written =
            save_markdown(temp_dir.path(), &ebook(Some("data:image/jpeg;base64,QUJD"))).unwrap();

        assert_eq!(written.len(), 2);
        assert_eq!(written[1], temp_dir.path().join("ebook-capa.jpg"));
        assert_eq!(fs::read(&written[1]).unwrap(), b"ABC");
    }

    #[test]
    fn test_save_markdown_creates_directory() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("out/books");
        let written = save_markdown(&nested, &ebook(None)).unwrap();
        assert!(written[0].exists());
    }

    #[test]
    fn test_render_html_escapes_and_styles() {
        let html = render_html(&ebook(Some("data:image/png;base64,QUJD")));
        assert!(html.contains("<h1>Título</h1>"));
        assert!(html.contains("<strong>forte</strong>"));
        assert!(html.contains("<p>1. passo</p>"));
        assert!(html.contains("Texto &lt;script&gt;"));
        assert!(html.contains("<img src=\"data:image/png;base64,QUJD\" alt=\"Capa\">"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn test_save_print_html() {
        let temp_dir = TempDir::new().unwrap();
        let path = save_print_html(temp_dir.path(), &ebook(None)).unwrap();
        assert!(path.ends_with(HTML_FILENAME));
        assert!(fs::read_to_string(path).unwrap().starts_with("<!DOCTYPE html>"));
    }
}
