//! Plain-text PDF rendering for module notes and assignments.
//!
//! Input is either the markdown-ish module content or LaTeX assignment source.
//! LaTeX is reduced to the same markdown-ish form first, then both go through
//! one block parser and a fixed A4 layout with the built-in Helvetica/Courier fonts.

use once_cell::sync::Lazy;
use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument};
use regex::Regex;
use thiserror::Error;

pub type RenderResult<T> = std::result::Result<T, RenderError>;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("pdf error: {0}")]
    PdfError(#[from] printpdf::Error),
    #[error("nothing to render")]
    EmptyDocument,
}

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN: f32 = 20.0;
const PT_TO_MM: f32 = 0.3528;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Style {
    Title,
    Heading,
    Body,
    Code,
}

impl Style {
    fn size(&self) -> f32 {
        match self {
            Self::Title => 18.0,
            Self::Heading => 14.0,
            Self::Body => 11.0,
            Self::Code => 9.5,
        }
    }

    /// Rough average glyph width as a fraction of the font size.
    fn glyph_ratio(&self) -> f32 {
        match self {
            Self::Code => 0.6,
            Self::Title | Self::Heading => 0.55,
            Self::Body => 0.5,
        }
    }

    fn line_height(&self) -> f32 {
        self.size() * PT_TO_MM * 1.35
    }

    fn chars_per_line(&self, indent: f32) -> usize {
        let usable = PAGE_WIDTH - 2.0 * MARGIN - indent;
        (usable / (self.size() * PT_TO_MM * self.glyph_ratio())).floor() as usize
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Block {
    Title(String),
    Heading(String),
    Paragraph(String),
    Bullet(String),
    Code(String),
    Gap,
}

#[derive(Debug, Clone, PartialEq)]
struct Line {
    text: String,
    style: Style,
    indent: f32,
    /// Vertical space consumed, in mm.
    advance: f32,
}

/// Notes for a module: title, description, the markdown content and key points.
pub fn render_notes_pdf(
    title: &str,
    description: &str,
    content: &str,
    key_points: &[String],
) -> RenderResult<Vec<u8>> {
    let mut blocks = vec![Block::Title(format!("{title} - Study Notes")), Block::Gap];
    if !description.trim().is_empty() {
        blocks.push(Block::Paragraph(description.trim().to_string()));
        blocks.push(Block::Gap);
    }
    blocks.extend(parse_blocks(content));
    if !key_points.is_empty() {
        blocks.push(Block::Gap);
        blocks.push(Block::Heading("Key Points".to_string()));
        blocks.extend(key_points.iter().map(|p| Block::Bullet(p.clone())));
    }

    render(title, &blocks)
}

/// The assignment of a module, rendered from its LaTeX source.
pub fn render_assignment_pdf(module_title: &str, latex: &str) -> RenderResult<Vec<u8>> {
    let body = parse_blocks(&strip_latex(latex));
    if body.iter().all(|b| matches!(b, Block::Gap)) {
        return Err(RenderError::EmptyDocument);
    }

    let mut blocks = vec![
        Block::Title("Assignment".to_string()),
        Block::Heading(format!("Module: {module_title}")),
        Block::Gap,
    ];
    blocks.extend(body);

    render(&format!("{module_title} - Assignment"), &blocks)
}

static LATEX_DROP: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\\(?:documentclass|usepackage)(?:\[[^\]]*\])?\{[^}]*\}|\\(?:author|date)\{[^}]*\}|\\(?:begin|end)\{(?:document|itemize|enumerate|center|flushleft)\}|\\(?:maketitle|newpage|clearpage|noindent|today|hfill|vfill|centering)\b",
    )
    .expect("LATEX_DROP is a valid regex pattern")
});
static LATEX_TITLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\\title\{([^}]*)\}").expect("LATEX_TITLE is a valid regex pattern")
});
static LATEX_SECTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\\(?:sub)*section\*?\{([^}]*)\}").expect("LATEX_SECTION is a valid regex pattern")
});
static LATEX_EMPHASIS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\\(?:textbf|textit|emph|underline|texttt|text)\{([^}]*)\}")
        .expect("LATEX_EMPHASIS is a valid regex pattern")
});
static LATEX_ITEM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\\item\s*").expect("LATEX_ITEM is a valid regex pattern"));
static LATEX_COMMAND: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\\[a-zA-Z]+\*?").expect("LATEX_COMMAND is a valid regex pattern"));
static BLANK_LINES: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\n\s*\n(\s*\n)*").expect("BLANK_LINES is a valid regex pattern")
});

/// Reduces LaTeX source to markdown-ish text: sections become `##` headings,
/// items become `- ` bullets, formatting commands keep their argument and
/// everything else is dropped.
pub fn strip_latex(src: &str) -> String {
    let text = LATEX_DROP.replace_all(src, "");
    let text = LATEX_TITLE.replace_all(&text, "\n# $1\n");
    let text = LATEX_SECTION.replace_all(&text, "\n## $1\n");
    let text = LATEX_EMPHASIS.replace_all(&text, "$1");
    let text = LATEX_ITEM.replace_all(&text, "\n- ");
    let text = text.replace("\\\\", "\n");
    let text = LATEX_COMMAND.replace_all(&text, "");
    let text: String = text
        .chars()
        .filter(|c| !matches!(c, '{' | '}' | '$'))
        .collect();
    let text = text
        .lines()
        .map(str::trim)
        .collect::<Vec<_>>()
        .join("\n");

    BLANK_LINES.replace_all(&text, "\n\n").trim().to_string()
}

fn parse_blocks(src: &str) -> Vec<Block> {
    let mut blocks = Vec::new();
    let mut paragraph = String::new();
    let mut in_code = false;

    let flush = |paragraph: &mut String, blocks: &mut Vec<Block>| {
        if !paragraph.is_empty() {
            blocks.push(Block::Paragraph(std::mem::take(paragraph)));
        }
    };

    for raw in src.lines() {
        let line = raw.trim_end();
        let trimmed = line.trim_start();

        if trimmed.starts_with("```") {
            flush(&mut paragraph, &mut blocks);
            in_code = !in_code;
            continue;
        }
        if in_code {
            blocks.push(Block::Code(line.to_string()));
            continue;
        }

        if trimmed.is_empty() {
            flush(&mut paragraph, &mut blocks);
            if !matches!(blocks.last(), Some(Block::Gap) | None) {
                blocks.push(Block::Gap);
            }
        } else if let Some(heading) = trimmed.strip_prefix('#') {
            flush(&mut paragraph, &mut blocks);
            blocks.push(Block::Heading(heading.trim_start_matches('#').trim().to_string()));
        } else if let Some(item) = bullet_text(trimmed) {
            flush(&mut paragraph, &mut blocks);
            blocks.push(Block::Bullet(item.to_string()));
        } else {
            if !paragraph.is_empty() {
                paragraph.push(' ');
            }
            paragraph.push_str(trimmed);
        }
    }
    flush(&mut paragraph, &mut blocks);

    blocks
}

fn bullet_text(line: &str) -> Option<&str> {
    if let Some(rest) = line.strip_prefix("- ").or_else(|| line.strip_prefix("* ")) {
        return Some(rest.trim());
    }
    let digits = line.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits > 0 {
        if let Some(rest) = line[digits..].strip_prefix(". ") {
            return Some(rest.trim());
        }
    }
    None
}

/// Markdown emphasis and non-Latin glyphs don't survive the built-in fonts.
fn clean_inline(text: &str) -> String {
    text.replace("**", "")
        .replace('`', "")
        .chars()
        .map(|c| match c {
            '\u{2018}' | '\u{2019}' => '\'',
            '\u{201C}' | '\u{201D}' => '"',
            '\u{2013}' | '\u{2014}' => '-',
            '\u{2022}' => '*',
            '\t' => ' ',
            c if c.is_ascii() && !c.is_ascii_control() => c,
            _ => '?',
        })
        .collect()
}

fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(8);
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let mut word = word.to_string();
        while word.len() > width {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            let rest = word.split_off(width);
            lines.push(word);
            word = rest;
        }

        if current.is_empty() {
            current = word;
        } else if current.len() + 1 + word.len() <= width {
            current.push(' ');
            current.push_str(&word);
        } else {
            lines.push(std::mem::replace(&mut current, word));
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }

    lines
}

fn layout_lines(blocks: &[Block]) -> Vec<Line> {
    let mut lines = Vec::new();
    let mut push = |text: String, style: Style, indent: f32| {
        lines.push(Line {
            advance: style.line_height(),
            text,
            style,
            indent,
        });
    };

    for block in blocks {
        match block {
            Block::Title(text) => {
                for l in wrap(&clean_inline(text), Style::Title.chars_per_line(0.0)) {
                    push(l, Style::Title, 0.0);
                }
            }
            Block::Heading(text) => {
                for l in wrap(&clean_inline(text), Style::Heading.chars_per_line(0.0)) {
                    push(l, Style::Heading, 0.0);
                }
            }
            Block::Paragraph(text) => {
                for l in wrap(&clean_inline(text), Style::Body.chars_per_line(0.0)) {
                    push(l, Style::Body, 0.0);
                }
            }
            Block::Bullet(text) => {
                let wrapped = wrap(&clean_inline(text), Style::Body.chars_per_line(5.0));
                for (i, l) in wrapped.into_iter().enumerate() {
                    let l = if i == 0 { format!("- {l}") } else { format!("  {l}") };
                    push(l, Style::Body, 5.0);
                }
            }
            Block::Code(text) => {
                let cleaned = clean_inline(text);
                let width = Style::Code.chars_per_line(5.0);
                if cleaned.trim().is_empty() {
                    push(String::new(), Style::Code, 5.0);
                }
                let mut rest = cleaned.as_str();
                while !rest.trim().is_empty() {
                    let cut = rest.len().min(width);
                    push(rest[..cut].to_string(), Style::Code, 5.0);
                    rest = &rest[cut..];
                }
            }
            Block::Gap => push(String::new(), Style::Body, 0.0),
        }
    }

    lines
}

/// Splits laid-out lines into pages that fit between the margins.
fn paginate(lines: Vec<Line>) -> Vec<Vec<Line>> {
    let usable = PAGE_HEIGHT - 2.0 * MARGIN;
    let mut pages = vec![Vec::new()];
    let mut used = 0.0;

    for line in lines {
        if used + line.advance > usable && used > 0.0 {
            pages.push(Vec::new());
            used = 0.0;
        }
        // a gap never opens a page
        if used == 0.0 && line.text.is_empty() && pages.len() > 1 {
            continue;
        }
        used += line.advance;
        if let Some(page) = pages.last_mut() {
            page.push(line);
        }
    }

    pages
}

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    mono: IndirectFontRef,
}

impl Fonts {
    fn for_style(&self, style: Style) -> &IndirectFontRef {
        match style {
            Style::Title | Style::Heading => &self.bold,
            Style::Body => &self.regular,
            Style::Code => &self.mono,
        }
    }
}

fn render(doc_title: &str, blocks: &[Block]) -> RenderResult<Vec<u8>> {
    let pages = paginate(layout_lines(blocks));

    let (doc, first_page, first_layer) = PdfDocument::new(
        clean_inline(doc_title),
        Mm(PAGE_WIDTH),
        Mm(PAGE_HEIGHT),
        "Layer 1",
    );
    let fonts = Fonts {
        regular: doc.add_builtin_font(BuiltinFont::Helvetica)?,
        bold: doc.add_builtin_font(BuiltinFont::HelveticaBold)?,
        mono: doc.add_builtin_font(BuiltinFont::Courier)?,
    };

    for (index, page) in pages.iter().enumerate() {
        let layer = if index == 0 {
            doc.get_page(first_page).get_layer(first_layer)
        } else {
            let (page_idx, layer_idx) = doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
            doc.get_page(page_idx).get_layer(layer_idx)
        };

        let mut y = PAGE_HEIGHT - MARGIN;
        for line in page {
            y -= line.advance;
            if line.text.is_empty() {
                continue;
            }
            layer.use_text(
                line.text.clone(),
                line.style.size(),
                Mm(MARGIN + line.indent),
                Mm(y),
                fonts.for_style(line.style),
            );
        }
    }

    Ok(doc.save_to_bytes()?)
}
