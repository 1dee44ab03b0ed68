//! HTML fragments and link resolution.

use std::fmt::Write;

use pulldown_cmark::BlockQuoteKind;

use crate::state::escape_html;

// SVG icons for alerts (GitHub Octicons-style, 16x16)
const SVG_INFO: &str = r#"<svg class="alert-icon" viewBox="0 0 16 16" width="16" height="16" aria-hidden="true"><path d="M0 8a8 8 0 1 1 16 0A8 8 0 0 1 0 8Zm8-6.5a6.5 6.5 0 1 0 0 13 6.5 6.5 0 0 0 0-13ZM6.5 7.75A.75.75 0 0 1 7.25 7h1a.75.75 0 0 1 .75.75v2.75h.25a.75.75 0 0 1 0 1.5h-2a.75.75 0 0 1 0-1.5h.25v-2h-.25a.75.75 0 0 1-.75-.75ZM8 6a1 1 0 1 1 0-2 1 1 0 0 1 0 2Z"></path></svg>"#;
const SVG_LIGHTBULB: &str = r#"<svg class="alert-icon" viewBox="0 0 16 16" width="16" height="16" aria-hidden="true"><path d="M8 1.5c-2.363 0-4 1.69-4 3.75 0 .984.424 1.625.984 2.304l.214.253c.223.264.47.556.673.848.284.411.537.896.621 1.49a.75.75 0 0 1-1.484.211c-.04-.282-.163-.547-.37-.847a8.456 8.456 0 0 0-.542-.68c-.084-.1-.173-.205-.268-.32C3.201 7.75 2.5 6.766 2.5 5.25 2.5 2.31 4.863 0 8 0s5.5 2.31 5.5 5.25c0 1.516-.701 2.5-1.328 3.259-.095.115-.184.22-.268.319-.207.245-.383.453-.541.681-.208.3-.33.565-.37.847a.751.751 0 0 1-1.485-.212c.084-.593.337-1.078.621-1.489.203-.292.45-.584.673-.848.075-.088.147-.173.213-.253.561-.679.985-1.32.985-2.304 0-2.06-1.637-3.75-4-3.75ZM5.75 12h4.5a.75.75 0 0 1 0 1.5h-4.5a.75.75 0 0 1 0-1.5ZM6 15.25a.75.75 0 0 1 .75-.75h2.5a.75.75 0 0 1 0 1.5h-2.5a.75.75 0 0 1-.75-.75Z"></path></svg>"#;
const SVG_ALERT: &str = r#"<svg class="alert-icon" viewBox="0 0 16 16" width="16" height="16" aria-hidden="true"><path d="M6.457 1.047c.659-1.234 2.427-1.234 3.086 0l6.082 11.378A1.75 1.75 0 0 1 14.082 15H1.918a1.75 1.75 0 0 1-1.543-2.575Zm1.763.707a.25.25 0 0 0-.44 0L1.698 13.132a.25.25 0 0 0 .22.368h12.164a.25.25 0 0 0 .22-.368Zm.53 3.996v2.5a.75.75 0 0 1-1.5 0v-2.5a.75.75 0 0 1 1.5 0ZM9 11a1 1 0 1 1-2 0 1 1 0 0 1 2 0Z"></path></svg>"#;

/// GitHub-style alert kind (`> [!NOTE]`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AlertKind {
    Note,
    Tip,
    Important,
    Warning,
    Caution,
}

impl From<BlockQuoteKind> for AlertKind {
    fn from(kind: BlockQuoteKind) -> Self {
        match kind {
            BlockQuoteKind::Note => Self::Note,
            BlockQuoteKind::Tip => Self::Tip,
            BlockQuoteKind::Important => Self::Important,
            BlockQuoteKind::Warning => Self::Warning,
            BlockQuoteKind::Caution => Self::Caution,
        }
    }
}

pub(crate) fn alert_start(kind: AlertKind, out: &mut String) {
    // Important and caution reuse the info and warning glyphs.
    let (class, icon, title) = match kind {
        AlertKind::Note => ("note", SVG_INFO, "Note"),
        AlertKind::Tip => ("tip", SVG_LIGHTBULB, "Tip"),
        AlertKind::Important => ("important", SVG_INFO, "Important"),
        AlertKind::Warning => ("warning", SVG_ALERT, "Warning"),
        AlertKind::Caution => ("caution", SVG_ALERT, "Caution"),
    };
    write!(
        out,
        r#"<div class="alert alert-{class}"><div class="alert-title">{icon}{title}</div><div class="alert-content">"#
    )
    .unwrap();
}

pub(crate) fn alert_end(out: &mut String) {
    out.push_str("</div></div>");
}

/// Unhighlighted code block, used when no processor claims the block.
pub(crate) fn code_block(lang: Option<&str>, content: &str, out: &mut String) {
    if let Some(lang) = lang {
        write!(
            out,
            r#"<pre><code class="language-{}">{}</code></pre>"#,
            escape_html(lang),
            escape_html(content)
        )
        .unwrap();
    } else {
        write!(out, "<pre><code>{}</code></pre>", escape_html(content)).unwrap();
    }
}

pub(crate) fn image(src: &str, alt: &str, title: &str, out: &mut String) {
    let title_attr = if title.is_empty() {
        String::new()
    } else {
        format!(r#" title="{}""#, escape_html(title))
    };
    write!(
        out,
        r#"<img src="{}"{title_attr} alt="{}" loading="lazy">"#,
        escape_html(src),
        escape_html(alt)
    )
    .unwrap();
}

/// Resolve a markdown link to the clean URL of the page it points to.
///
/// `base_dir` is the linking document's directory relative to the content
/// root; `site_root` is the URL prefix pages are served under (`/` or
/// `/sub/`).
///
/// - `./sibling.md` in `blog` becomes `{site_root}blog/sibling/`
/// - `../about.md#team` in `blog` becomes `{site_root}about/#team`
/// - `/blog/index.md` becomes `{site_root}blog/`
///
/// External links, fragment-only links and links to anything other than a
/// markdown file are returned unchanged.
#[must_use]
pub fn resolve_link(url: &str, base_dir: &str, site_root: &str) -> String {
    if url.starts_with("http://")
        || url.starts_with("https://")
        || url.starts_with("//")
        || url.starts_with("mailto:")
        || url.starts_with("tel:")
        || url.starts_with('#')
    {
        return url.to_owned();
    }

    let (path_part, fragment) = match url.find('#') {
        Some(pos) => (&url[..pos], &url[pos..]),
        None => (url, ""),
    };

    let Some(without_ext) = strip_markdown_ext(path_part) else {
        return url.to_owned();
    };

    let resolved = if let Some(absolute) = without_ext.strip_prefix('/') {
        resolve_relative_path(absolute, "")
    } else {
        resolve_relative_path(without_ext, base_dir)
    };

    let clean = if resolved == "index" {
        ""
    } else {
        resolved.strip_suffix("/index").unwrap_or(&resolved)
    };

    let root = site_root.trim_end_matches('/');
    if clean.is_empty() {
        format!("{root}/{fragment}")
    } else {
        format!("{root}/{clean}/{fragment}")
    }
}

#[allow(clippy::case_sensitive_file_extension_comparisons)]
fn strip_markdown_ext(path: &str) -> Option<&str> {
    path.strip_suffix(".md")
        .or_else(|| path.strip_suffix(".markdown"))
}

/// Resolve a relative path against a base directory.
///
/// `..` above the root is clamped to the root.
fn resolve_relative_path(relative: &str, base: &str) -> String {
    let mut segments: Vec<&str> = base.split('/').filter(|s| !s.is_empty()).collect();

    for component in relative.split('/') {
        match component {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            _ => segments.push(component),
        }
    }

    segments.join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_code_block_with_language() {
        let mut out = String::new();
        code_block(Some("asm"), "mov x0, #1", &mut out);
        assert_eq!(
            out,
            r#"<pre><code class="language-asm">mov x0, #1</code></pre>"#
        );
    }

    #[test]
    fn test_code_block_escapes() {
        let mut out = String::new();
        code_block(None, "a < b", &mut out);
        assert_eq!(out, "<pre><code>a &lt; b</code></pre>");
    }

    #[test]
    fn test_alert_box() {
        let mut out = String::new();
        alert_start(AlertKind::Warning, &mut out);
        out.push_str("careful");
        alert_end(&mut out);
        assert!(out.starts_with(r#"<div class="alert alert-warning">"#));
        assert!(out.contains("Warning</div>"));
        assert!(out.ends_with("careful</div></div>"));
    }

    #[test]
    fn test_image_with_title() {
        let mut out = String::new();
        image("/img/a.png", "A \"chart\"", "Chart", &mut out);
        assert_eq!(
            out,
            r#"<img src="/img/a.png" title="Chart" alt="A &quot;chart&quot;" loading="lazy">"#
        );
    }

    #[test]
    fn test_resolve_link_sibling() {
        assert_eq!(resolve_link("./intro.md", "blog", "/"), "/blog/intro/");
        assert_eq!(resolve_link("intro.md", "blog", "/"), "/blog/intro/");
    }

    #[test]
    fn test_resolve_link_parent() {
        assert_eq!(resolve_link("../about.md", "blog", "/"), "/about/");
    }

    #[test]
    fn test_resolve_link_with_fragment() {
        assert_eq!(
            resolve_link("../about.md#team", "blog", "/"),
            "/about/#team"
        );
    }

    #[test]
    fn test_resolve_link_index() {
        assert_eq!(resolve_link("series/index.md", "blog", "/"), "/blog/series/");
        assert_eq!(resolve_link("../index.md", "blog", "/"), "/");
    }

    #[test]
    fn test_resolve_link_absolute() {
        assert_eq!(resolve_link("/blog/post.md", "notes", "/"), "/blog/post/");
    }

    #[test]
    fn test_resolve_link_site_root() {
        assert_eq!(
            resolve_link("post.md", "blog", "/folio/"),
            "/folio/blog/post/"
        );
        assert_eq!(resolve_link("/index.md", "", "/folio/"), "/folio/");
    }

    #[test]
    fn test_resolve_link_traversal_clamped() {
        assert_eq!(resolve_link("../../../x.md", "blog", "/"), "/x/");
    }

    #[test]
    fn test_resolve_link_unchanged() {
        for url in [
            "https://developer.arm.com/",
            "http://example.com/a.md",
            "//cdn.example.com/x.md",
            "mailto:me@example.com",
            "#registers",
            "/images/diagram.png",
            "notes.txt",
        ] {
            assert_eq!(resolve_link(url, "blog", "/"), url);
        }
    }
}
