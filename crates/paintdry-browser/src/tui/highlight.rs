//! JSON syntax highlighting for the detail view

use once_cell::sync::Lazy;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use syntect::easy::HighlightLines;
use syntect::highlighting::{self, ThemeSet};
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;

static SYNTAXES: Lazy<SyntaxSet> = Lazy::new(SyntaxSet::load_defaults_newlines);
static THEMES: Lazy<ThemeSet> = Lazy::new(ThemeSet::load_defaults);

const THEME: &str = "base16-ocean.dark";

/// Highlighted lines of `text`. Falls back to unstyled lines if the grammar or
/// theme is unavailable.
pub fn highlight_json(text: &str) -> Vec<Line<'static>> {
    let Some(syntax) = SYNTAXES.find_syntax_by_extension("json") else {
        return plain(text);
    };
    let Some(theme) = THEMES.themes.get(THEME) else {
        return plain(text);
    };

    let mut highlighter = HighlightLines::new(syntax, theme);
    let mut lines = Vec::new();
    for line in LinesWithEndings::from(text) {
        let ranges = match highlighter.highlight_line(line, &SYNTAXES) {
            Ok(ranges) => ranges,
            Err(e) => {
                log::debug!("highlighting failed: {}", e);
                return plain(text);
            }
        };
        let spans: Vec<Span<'static>> = ranges
            .into_iter()
            .map(|(style, piece)| {
                Span::styled(
                    piece.trim_end_matches(['\r', '\n']).to_string(),
                    convert(style),
                )
            })
            .collect();
        lines.push(Line::from(spans));
    }
    lines
}

fn plain(text: &str) -> Vec<Line<'static>> {
    text.lines().map(|l| Line::raw(l.to_string())).collect()
}

fn convert(style: highlighting::Style) -> Style {
    let fg = style.foreground;
    Style::default().fg(Color::Rgb(fg.r, fg.g, fg.b))
}
