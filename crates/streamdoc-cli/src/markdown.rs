//! Markdown rendering for terminal output

use colored::*;
use pulldown_cmark::{CodeBlockKind, Event, Parser, Tag};
use streamdoc_core::RichTextRenderer;
use syntect::easy::HighlightLines;
use syntect::highlighting::{Style, ThemeSet};
use syntect::parsing::SyntaxSet;
use syntect::util::{LinesWithEndings, as_24_bit_terminal_escaped};
use textwrap::{Options, wrap};

const CODE_THEME: &str = "base16-ocean.dark";

/// Markdown renderer for terminal output
pub struct MarkdownRenderer {
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
    width: usize,
}

impl MarkdownRenderer {
    pub fn new(width: usize) -> Self {
        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set: ThemeSet::load_defaults(),
            width: width.max(10),
        }
    }

    /// Render markdown text to colored terminal output
    pub fn render_markdown(&self, markdown: &str) -> String {
        let parser = Parser::new(markdown);
        let mut output = String::new();
        let mut in_code_block = false;
        let mut code_lang = String::new();
        let mut code_content = String::new();
        let mut list_depth: usize = 0;
        let mut heading_level: Option<usize> = None;
        let mut in_emphasis = false;
        let mut in_strong = false;

        for event in parser {
            match event {
                Event::Start(tag) => match tag {
                    Tag::Heading(level, _, _) => {
                        heading_level = Some(level as usize);
                        if !output.is_empty() {
                            output.push('\n');
                        }
                    }
                    Tag::Paragraph => {
                        if !output.is_empty() && !output.ends_with('\n') {
                            output.push('\n');
                        }
                    }
                    Tag::List(_) => {
                        list_depth += 1;
                        if !output.ends_with('\n') && !output.is_empty() {
                            output.push('\n');
                        }
                    }
                    Tag::Item => {
                        let indent = "  ".repeat(list_depth.saturating_sub(1));
                        output.push_str(&format!("{}• ", indent));
                    }
                    Tag::CodeBlock(kind) => {
                        in_code_block = true;
                        if let CodeBlockKind::Fenced(lang) = kind {
                            code_lang = lang.to_string();
                        }
                        output.push('\n');
                    }
                    Tag::Emphasis => in_emphasis = true,
                    Tag::Strong => in_strong = true,
                    Tag::BlockQuote => output.push_str(&"│ ".bright_black().to_string()),
                    _ => {}
                },
                Event::End(tag) => match tag {
                    Tag::Heading(_, _, _) => {
                        heading_level = None;
                        output.push('\n');
                    }
                    Tag::Paragraph => output.push('\n'),
                    Tag::List(_) => list_depth = list_depth.saturating_sub(1),
                    Tag::Item => {
                        if !output.ends_with('\n') {
                            output.push('\n');
                        }
                    }
                    Tag::CodeBlock(_) => {
                        let highlighted = self.highlight_code(&code_content, &code_lang);
                        output.push_str(&highlighted);
                        output.push('\n');
                        in_code_block = false;
                        code_content.clear();
                        code_lang.clear();
                    }
                    Tag::Emphasis => in_emphasis = false,
                    Tag::Strong => in_strong = false,
                    Tag::Link(_, dest_url, _) => {
                        output.push_str(&format!(" ({})", dest_url.blue().underline()));
                    }
                    _ => {}
                },
                Event::Text(text) => {
                    if in_code_block {
                        code_content.push_str(&text);
                    } else if let Some(level) = heading_level {
                        output.push_str(&format_heading(&text, level));
                    } else if in_strong {
                        output.push_str(&text.bold().to_string());
                    } else if in_emphasis {
                        output.push_str(&text.italic().to_string());
                    } else {
                        output.push_str(&self.wrap_text(&text));
                    }
                }
                Event::Code(code) => {
                    output.push_str(&format!("{}", code.black().on_truecolor(240, 240, 240)));
                }
                Event::SoftBreak => output.push(' '),
                Event::HardBreak => output.push('\n'),
                Event::Rule => {
                    output.push_str(&"─".repeat(self.width).bright_black().to_string());
                    output.push('\n');
                }
                _ => {}
            }
        }

        output.trim_end_matches('\n').to_string()
    }

    fn wrap_text(&self, text: &str) -> String {
        wrap(text, Options::new(self.width)).join("\n")
    }

    fn highlight_code(&self, code: &str, lang: &str) -> String {
        let syntax = self
            .syntax_set
            .find_syntax_by_token(lang)
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());
        let border = "─".repeat(self.width.saturating_sub(2));

        let mut output = format!("{}\n", format!("┌{}┐", border).bright_black());
        match self.theme_set.themes.get(CODE_THEME) {
            Some(theme) => {
                let mut highlighter = HighlightLines::new(syntax, theme);
                for line in LinesWithEndings::from(code) {
                    let ranges: Vec<(Style, &str)> = highlighter
                        .highlight_line(line, &self.syntax_set)
                        .unwrap_or_default();
                    output.push_str(&"│ ".bright_black().to_string());
                    output.push_str(&as_24_bit_terminal_escaped(&ranges[..], false));
                    if !line.ends_with('\n') {
                        output.push('\n');
                    }
                }
                output.push_str("\x1b[0m");
            }
            None => {
                for line in code.lines() {
                    output.push_str(&format!("{}{}\n", "│ ".bright_black(), line));
                }
            }
        }
        output.push_str(&format!("└{}┘", border).bright_black().to_string());
        output
    }
}

fn format_heading(text: &str, level: usize) -> String {
    match level {
        1 => text.bright_blue().bold().to_string(),
        2 => text.bright_green().bold().to_string(),
        3 => text.bright_yellow().bold().to_string(),
        _ => text.bold().to_string(),
    }
}

impl RichTextRenderer for MarkdownRenderer {
    type Output = String;

    fn render(&self, markdown: &str) -> String {
        self.render_markdown(markdown)
    }
}
