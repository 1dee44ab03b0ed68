//! Syntax highlighting for fenced code blocks.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use syntect::highlighting::{Theme, ThemeSet};
use syntect::html::highlighted_html_for_string;
use syntect::parsing::SyntaxSet;

use crate::code_block::{CodeBlockProcessor, ProcessResult};
use crate::state::escape_html;

/// Errors from loading or applying syntax definitions and themes.
#[derive(Debug, thiserror::Error)]
pub enum HighlightError {
    #[error("unknown syntax theme `{name}` (available: {})", available.join(", "))]
    UnknownTheme { name: String, available: Vec<String> },

    #[error("{what} directory not found: {}", path.display())]
    MissingDir { what: &'static str, path: PathBuf },

    #[error("failed to load {what} from {}: {source}", path.display())]
    Load {
        what: &'static str,
        path: PathBuf,
        #[source]
        source: syntect::LoadingError,
    },

    #[error("highlighting failed: {0}")]
    Highlight(#[from] syntect::Error),
}

/// Syntax definitions plus the selected theme.
///
/// Loading is the expensive part, so one highlighter is built per site and
/// shared across render threads.
pub struct Highlighter {
    syntaxes: SyntaxSet,
    theme: Theme,
    theme_name: String,
}

impl Highlighter {
    /// Create a highlighter using the bundled syntaxes and themes.
    pub fn new(theme: &str) -> Result<Self, HighlightError> {
        Self::with_extras(theme, None, None)
    }

    /// Create a highlighter, adding `.tmTheme` files from `theme_dir` and
    /// `.sublime-syntax` files from `syntax_dir`.
    pub fn with_extras(
        theme: &str,
        theme_dir: Option<&Path>,
        syntax_dir: Option<&Path>,
    ) -> Result<Self, HighlightError> {
        let mut themes = ThemeSet::load_defaults();
        if let Some(dir) = theme_dir {
            ensure_dir("theme", dir)?;
            themes
                .add_from_folder(dir)
                .map_err(|source| HighlightError::Load {
                    what: "themes",
                    path: dir.to_path_buf(),
                    source,
                })?;
        }

        let syntaxes = match syntax_dir {
            Some(dir) => {
                ensure_dir("syntax", dir)?;
                let mut builder = SyntaxSet::load_defaults_newlines().into_builder();
                builder
                    .add_from_folder(dir, true)
                    .map_err(|source| HighlightError::Load {
                        what: "syntaxes",
                        path: dir.to_path_buf(),
                        source,
                    })?;
                builder.build()
            }
            None => SyntaxSet::load_defaults_newlines(),
        };

        let Some(selected) = themes.themes.remove(theme) else {
            return Err(HighlightError::UnknownTheme {
                name: theme.to_owned(),
                available: themes.themes.into_keys().collect(),
            });
        };

        tracing::debug!(
            theme,
            syntax_count = syntaxes.syntaxes().len(),
            "Highlighter loaded"
        );

        Ok(Self {
            syntaxes,
            theme: selected,
            theme_name: theme.to_owned(),
        })
    }

    /// Name of the selected theme.
    #[must_use]
    pub fn theme_name(&self) -> &str {
        &self.theme_name
    }

    /// Whether a language token resolves to a known syntax.
    #[must_use]
    pub fn knows_language(&self, language: &str) -> bool {
        !language.is_empty() && self.syntaxes.find_syntax_by_token(language).is_some()
    }

    /// Highlight `code` as `language`.
    ///
    /// The language is looked up by token (`rust`, `asm`) then by file
    /// extension. Unknown or empty languages render as themed plain text.
    pub fn highlight(&self, language: &str, code: &str) -> Result<String, HighlightError> {
        let found = if language.is_empty() {
            None
        } else {
            self.syntaxes
                .find_syntax_by_token(language)
                .or_else(|| self.syntaxes.find_syntax_by_extension(language))
        };
        let syntax = found.unwrap_or_else(|| self.syntaxes.find_syntax_plain_text());

        let html = highlighted_html_for_string(code, &self.syntaxes, syntax, &self.theme)?;

        let class = if language.is_empty() {
            r#"<pre class="highlight" "#.to_owned()
        } else {
            format!(
                r#"<pre class="highlight language-{}" "#,
                escape_html(language)
            )
        };
        Ok(match html.strip_prefix("<pre ") {
            Some(rest) => format!("{class}{rest}"),
            None => html,
        })
    }
}

fn ensure_dir(what: &'static str, dir: &Path) -> Result<(), HighlightError> {
    if dir.is_dir() {
        Ok(())
    } else {
        Err(HighlightError::MissingDir {
            what,
            path: dir.to_path_buf(),
        })
    }
}

/// Code block processor that highlights every fenced block.
///
/// Blocks in unknown languages are still rendered with the theme's colors
/// and produce a warning.
pub struct SyntaxHighlighting {
    highlighter: Arc<Highlighter>,
    warnings: Vec<String>,
}

impl SyntaxHighlighting {
    #[must_use]
    pub fn new(highlighter: Arc<Highlighter>) -> Self {
        Self {
            highlighter,
            warnings: Vec::new(),
        }
    }
}

impl CodeBlockProcessor for SyntaxHighlighting {
    fn process(
        &mut self,
        language: &str,
        _attrs: &HashMap<String, String>,
        source: &str,
        index: usize,
    ) -> ProcessResult {
        if !language.is_empty() && !self.highlighter.knows_language(language) {
            self.warnings.push(format!(
                "code block {index}: unknown language `{language}`, rendered as plain text"
            ));
        }
        match self.highlighter.highlight(language, source) {
            Ok(html) => ProcessResult::Inline(html),
            Err(e) => {
                self.warnings.push(format!("code block {index}: {e}"));
                ProcessResult::PassThrough
            }
        }
    }

    fn take_warnings(&mut self) -> Vec<String> {
        std::mem::take(&mut self.warnings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    static_assertions::assert_impl_all!(super::Highlighter: Send, Sync);

    const TOY_SYNTAX: &str = r"%YAML 1.2
---
name: Toy
file_extensions: [toy]
scope: source.toy
contexts:
  main:
    - match: '\bpush\b'
      scope: keyword.control.toy
";

    #[test]
    fn test_known_theme() {
        let highlighter = Highlighter::new("base16-ocean.dark").unwrap();
        assert_eq!(highlighter.theme_name(), "base16-ocean.dark");
    }

    #[test]
    fn test_unknown_theme_lists_available() {
        let Err(err) = Highlighter::new("no-such-theme") else {
            panic!("expected unknown theme error");
        };
        let HighlightError::UnknownTheme { name, available } = &err else {
            panic!("unexpected error: {err}");
        };
        assert_eq!(name, "no-such-theme");
        assert!(available.iter().any(|t| t == "InspiredGitHub"));
        assert!(err.to_string().contains("base16-ocean.dark"));
    }

    #[test]
    fn test_highlight_known_language() {
        let highlighter = Highlighter::new("InspiredGitHub").unwrap();
        let html = highlighter.highlight("rust", "fn main() {}\n").unwrap();
        assert!(html.starts_with(r#"<pre class="highlight language-rust" style="#));
        assert!(html.contains("<span"));
        assert!(html.contains("main"));
    }

    #[test]
    fn test_highlight_unknown_language_is_plain_text() {
        let highlighter = Highlighter::new("InspiredGitHub").unwrap();
        assert!(!highlighter.knows_language("nonsense-lang"));
        let html = highlighter.highlight("nonsense-lang", "a < b\n").unwrap();
        assert!(html.contains("a &lt; b"));
        assert!(html.contains("style="));
    }

    #[test]
    fn test_extra_syntax_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("toy.sublime-syntax"), TOY_SYNTAX).unwrap();

        let highlighter =
            Highlighter::with_extras("base16-ocean.dark", None, Some(dir.path())).unwrap();
        assert!(highlighter.knows_language("toy"));
        assert!(!Highlighter::new("base16-ocean.dark")
            .unwrap()
            .knows_language("toy"));
    }

    #[test]
    fn test_missing_syntax_dir() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing");
        let Err(err) = Highlighter::with_extras("base16-ocean.dark", None, Some(&missing)) else {
            panic!("expected missing directory error");
        };
        assert!(matches!(err, HighlightError::MissingDir { what: "syntax", .. }));
    }

    #[test]
    fn test_processor_warns_on_unknown_language() {
        let highlighter = Arc::new(Highlighter::new("base16-ocean.dark").unwrap());
        let mut processor = SyntaxHighlighting::new(highlighter);

        let result = processor.process("rust", &HashMap::new(), "let x = 1;\n", 0);
        assert!(matches!(result, ProcessResult::Inline(_)));
        assert!(processor.take_warnings().is_empty());

        let result = processor.process("klingon", &HashMap::new(), "qapla'\n", 1);
        assert!(matches!(result, ProcessResult::Inline(_)));
        assert_eq!(
            processor.take_warnings(),
            vec!["code block 1: unknown language `klingon`, rendered as plain text"]
        );
        assert!(processor.take_warnings().is_empty());
    }
}
