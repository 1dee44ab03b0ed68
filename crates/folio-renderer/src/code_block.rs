//! Code block processor trait.
//!
//! Processors are registered with the renderer and see every fenced block in
//! document order. The first processor returning [`ProcessResult::Inline`]
//! replaces the block; if all pass through, the block is rendered as a plain
//! `<pre><code>` element.

use std::collections::HashMap;

/// Result of processing a code block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProcessResult {
    /// Replace the code block with this HTML.
    Inline(String),
    /// Render as a regular code block.
    PassThrough,
}

/// Trait for processing fenced code blocks.
pub trait CodeBlockProcessor {
    /// Process a code block.
    ///
    /// * `language` - Language from the fence info string, empty if none
    /// * `attrs` - `key=value` attributes following the language
    /// * `source` - Raw content of the code block
    /// * `index` - Zero-based index of the block in the document
    fn process(
        &mut self,
        language: &str,
        attrs: &HashMap<String, String>,
        source: &str,
        index: usize,
    ) -> ProcessResult;

    /// Drain the warnings generated since the last call.
    ///
    /// Called once per rendered document, so a reused processor reports each
    /// warning exactly once.
    fn take_warnings(&mut self) -> Vec<String> {
        Vec::new()
    }
}

/// Parse fence info string into language and attributes.
///
/// Format: `language [key=value ...]`. Values may be double-quoted. Bare
/// words after the language become flags with an empty value.
#[must_use]
pub(crate) fn parse_fence_info(info: &str) -> (String, HashMap<String, String>) {
    let mut parts = info.split_whitespace();
    let language = parts.next().unwrap_or("").to_owned();

    let mut attrs = HashMap::new();
    for part in parts {
        match part.split_once('=') {
            Some((key, value)) => {
                let value = value.trim_matches('"');
                attrs.insert(key.to_owned(), value.to_owned());
            }
            None => {
                attrs.insert(part.to_owned(), String::new());
            }
        }
    }

    (language, attrs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_fence_info_language_only() {
        let (lang, attrs) = parse_fence_info("asm");
        assert_eq!(lang, "asm");
        assert!(attrs.is_empty());
    }

    #[test]
    fn test_parse_fence_info_with_attrs() {
        let (lang, attrs) = parse_fence_info(r#"asm title="calc.s" linenos"#);
        assert_eq!(lang, "asm");
        assert_eq!(attrs.get("title").map(String::as_str), Some("calc.s"));
        assert_eq!(attrs.get("linenos").map(String::as_str), Some(""));
    }

    #[test]
    fn test_parse_fence_info_empty() {
        let (lang, attrs) = parse_fence_info("");
        assert_eq!(lang, "");
        assert!(attrs.is_empty());
    }
}
