//! State tracked while walking the markdown event stream.

use std::collections::{HashMap, HashSet};

use pulldown_cmark::Alignment;

/// State for tracking code block rendering.
#[derive(Default)]
pub(crate) struct CodeBlockState {
    active: bool,
    language: Option<String>,
    buffer: String,
}

impl CodeBlockState {
    pub fn start(&mut self, language: Option<String>) {
        self.active = true;
        self.language = language;
        self.buffer.clear();
    }

    /// End the current code block and return (language, content).
    pub fn end(&mut self) -> (Option<String>, String) {
        self.active = false;
        (self.language.take(), std::mem::take(&mut self.buffer))
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn push_str(&mut self, text: &str) {
        self.buffer.push_str(text);
    }
}

/// State for tracking table rendering.
#[derive(Default)]
pub(crate) struct TableState {
    in_head: bool,
    alignments: Vec<Alignment>,
    cell_index: usize,
}

impl TableState {
    pub fn start(&mut self, alignments: Vec<Alignment>) {
        self.alignments = alignments;
        self.in_head = false;
        self.cell_index = 0;
    }

    pub fn start_head(&mut self) {
        self.in_head = true;
        self.cell_index = 0;
    }

    pub fn end_head(&mut self) {
        self.in_head = false;
    }

    pub fn start_row(&mut self) {
        self.cell_index = 0;
    }

    pub fn next_cell(&mut self) {
        self.cell_index += 1;
    }

    pub fn is_in_head(&self) -> bool {
        self.in_head
    }

    /// Alignment attribute for the current cell.
    pub fn current_alignment_style(&self) -> &'static str {
        match self.alignments.get(self.cell_index) {
            Some(Alignment::Left) => r#" style="text-align:left""#,
            Some(Alignment::Center) => r#" style="text-align:center""#,
            Some(Alignment::Right) => r#" style="text-align:right""#,
            Some(Alignment::None) | None => "",
        }
    }
}

/// State for capturing image alt text.
#[derive(Default)]
pub(crate) struct ImageState {
    active: bool,
    alt_text: String,
}

impl ImageState {
    pub fn start(&mut self) {
        self.active = true;
        self.alt_text.clear();
    }

    pub fn end(&mut self) -> String {
        self.active = false;
        std::mem::take(&mut self.alt_text)
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn push_str(&mut self, text: &str) {
        self.alt_text.push_str(text);
    }
}

/// Table of contents entry.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TocEntry {
    /// Heading level (1-6).
    pub level: u8,
    /// Heading text.
    pub title: String,
    /// Anchor ID for linking.
    pub id: String,
}

/// A completed heading, ready to be written.
pub(crate) struct CompletedHeading {
    pub level: u8,
    pub id: String,
    pub html: String,
}

/// State for heading capture and table of contents generation.
///
/// With title extraction enabled, the first H1 becomes the page title. It is
/// still rendered but left out of the table of contents.
#[derive(Default)]
pub(crate) struct HeadingState {
    extract_title: bool,
    title: Option<String>,
    current_level: Option<u8>,
    /// Plain text, for the slug and table of contents.
    text: String,
    /// Inner HTML with inline formatting.
    html: String,
    toc: Vec<TocEntry>,
    id_counts: HashMap<String, usize>,
    /// Every id handed out, so a suffixed id never repeats a literal one.
    issued: HashSet<String>,
}

impl HeadingState {
    pub fn new(extract_title: bool) -> Self {
        Self {
            extract_title,
            ..Self::default()
        }
    }

    pub fn is_active(&self) -> bool {
        self.current_level.is_some()
    }

    pub fn start_heading(&mut self, level: u8) {
        self.current_level = Some(level);
        self.text.clear();
        self.html.clear();
    }

    /// Complete the heading and record its table of contents entry.
    pub fn complete_heading(&mut self) -> Option<CompletedHeading> {
        let level = self.current_level.take()?;
        let text = std::mem::take(&mut self.text);
        let html = std::mem::take(&mut self.html);
        let id = self.generate_id(&text);
        let title = text.trim().to_owned();

        if self.extract_title && level == 1 && self.title.is_none() {
            self.title = Some(title);
        } else {
            self.toc.push(TocEntry {
                level,
                title,
                id: id.clone(),
            });
        }

        Some(CompletedHeading { level, id, html })
    }

    /// Generate a unique ID: repeated headings get `-1`, `-2` suffixes,
    /// skipping any id already taken (`Step`, `Step`, `Step 1` gives
    /// `step`, `step-1`, `step-1-1`).
    fn generate_id(&mut self, text: &str) -> String {
        let mut base_id = slugify(text);
        if base_id.is_empty() {
            base_id = "section".to_owned();
        }
        let count = self.id_counts.entry(base_id.clone()).or_default();
        loop {
            let candidate = match *count {
                0 => base_id.clone(),
                n => format!("{base_id}-{n}"),
            };
            *count += 1;
            if self.issued.insert(candidate.clone()) {
                return candidate;
            }
        }
    }

    pub fn push_text(&mut self, text: &str) {
        self.text.push_str(text);
    }

    pub fn push_html(&mut self, html: &str) {
        self.html.push_str(html);
    }

    pub fn html_buffer(&mut self) -> &mut String {
        &mut self.html
    }

    /// Take the collected entries and reset id allocation for the next document.
    pub fn take_toc(&mut self) -> Vec<TocEntry> {
        self.id_counts.clear();
        self.issued.clear();
        std::mem::take(&mut self.toc)
    }

    pub fn take_title(&mut self) -> Option<String> {
        self.title.take()
    }
}

/// Convert text to URL-safe slug.
///
/// Lowercases ASCII letters and digits, turns runs of whitespace, dashes and
/// underscores into a single dash, and drops everything else.
#[must_use]
pub fn slugify(text: &str) -> String {
    let mut result = String::new();
    let mut last_was_dash = true;

    for c in text.trim().chars() {
        if c.is_ascii_alphanumeric() {
            result.push(c.to_ascii_lowercase());
            last_was_dash = false;
        } else if !last_was_dash && (c.is_whitespace() || c == '-' || c == '_') {
            result.push('-');
            last_was_dash = true;
        }
    }

    if result.ends_with('-') {
        result.pop();
    }

    result
}

/// Escape HTML special characters.
#[must_use]
pub fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#x27;"),
            _ => result.push(c),
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Hello World"), "hello-world");
        assert_eq!(slugify("What's New?"), "whats-new");
        assert_eq!(slugify("  Spaces  "), "spaces");
        assert_eq!(slugify("The `ADD` Instruction"), "the-add-instruction");
        assert_eq!(slugify("snake_case"), "snake-case");
        assert_eq!(slugify("x0 - x30 registers"), "x0-x30-registers");
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("<script>"), "&lt;script&gt;");
        assert_eq!(escape_html("a & b"), "a &amp; b");
        assert_eq!(escape_html(r#""quoted""#), "&quot;quoted&quot;");
        assert_eq!(escape_html("it's"), "it&#x27;s");
    }

    #[test]
    fn test_table_alignment() {
        let mut state = TableState::default();
        state.start(vec![Alignment::Left, Alignment::None, Alignment::Right]);
        state.start_head();
        assert!(state.is_in_head());
        assert_eq!(state.current_alignment_style(), r#" style="text-align:left""#);
        state.next_cell();
        assert_eq!(state.current_alignment_style(), "");
        state.next_cell();
        assert_eq!(state.current_alignment_style(), r#" style="text-align:right""#);
        state.next_cell();
        assert_eq!(state.current_alignment_style(), "");
        state.end_head();
        assert!(!state.is_in_head());
    }

    #[test]
    fn test_heading_ids_are_unique() {
        let mut state = HeadingState::default();
        for _ in 0..3 {
            state.start_heading(2);
            state.push_text("Example");
            state.complete_heading();
        }
        let ids: Vec<_> = state.take_toc().into_iter().map(|e| e.id).collect();
        assert_eq!(ids, vec!["example", "example-1", "example-2"]);
    }

    #[test]
    fn test_suffixed_ids_skip_literal_headings() {
        let mut state = HeadingState::default();
        for text in ["Step 1", "Step", "Step"] {
            state.start_heading(2);
            state.push_text(text);
            state.complete_heading();
        }
        let ids: Vec<_> = state.take_toc().into_iter().map(|e| e.id).collect();
        assert_eq!(ids, vec!["step-1", "step", "step-2"]);
    }

    #[test]
    fn test_heading_without_slug_text_gets_fallback_id() {
        let mut state = HeadingState::default();
        state.start_heading(3);
        state.push_text("!!!");
        let heading = state.complete_heading().unwrap();
        assert_eq!(heading.id, "section");
        assert_eq!(heading.level, 3);
    }

    #[test]
    fn test_title_extraction_skips_toc() {
        let mut state = HeadingState::new(true);
        for (level, text) in [(1, "Title"), (2, "Setup"), (1, "Second")] {
            state.start_heading(level);
            state.push_text(text);
            state.complete_heading();
        }
        assert_eq!(state.take_title().as_deref(), Some("Title"));
        let titles: Vec<_> = state.take_toc().into_iter().map(|e| e.title).collect();
        assert_eq!(titles, vec!["Setup", "Second"]);
    }

    #[test]
    fn test_complete_without_start() {
        let mut state = HeadingState::default();
        assert!(state.complete_heading().is_none());
    }
}
