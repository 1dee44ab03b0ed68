//! Internal link checking over emitted HTML.

use std::borrow::Cow;
use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::BrokenLink;

static LINK_ATTR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\b(?:href|src)\s*=\s*"([^"]*)""#).unwrap());

/// Where an internal link points.
enum Target {
    /// Output path relative to the output root; a trailing `/` means a directory.
    Path(String),
    /// Absolute path outside `base_url`.
    Outside,
}

/// Checks that every site-internal `href` and `src` resolves to an emitted
/// file.
///
/// Targets are output paths relative to the output root, with `/`
/// separators (e.g. `blog/post/index.html`, `styles.css`).
pub struct LinkChecker<'a> {
    base_url: &'a str,
    targets: BTreeSet<String>,
}

impl<'a> LinkChecker<'a> {
    pub fn new(base_url: &'a str, targets: impl IntoIterator<Item = String>) -> Self {
        Self {
            base_url,
            targets: targets.into_iter().collect(),
        }
    }

    /// Check one emitted HTML file. Returns the number of internal links
    /// checked.
    pub fn check_page(&self, page: &str, html: &str, broken: &mut Vec<BrokenLink>) -> usize {
        let mut checked = 0;
        for caps in LINK_ATTR_RE.captures_iter(html) {
            let href = decode_entities(&caps[1]);
            let Some(target) = self.internal_target(page, &href) else {
                continue;
            };
            checked += 1;
            let found = match target {
                Target::Path(path) => self.exists(&path),
                Target::Outside => false,
            };
            if !found {
                broken.push(BrokenLink {
                    page: page.to_owned(),
                    href: href.into_owned(),
                });
            }
        }
        checked
    }

    /// Where a link points, or `None` for links the checker ignores
    /// (external, fragment-only, `mailto:` and other schemes).
    fn internal_target(&self, page: &str, href: &str) -> Option<Target> {
        let path = href.split(['#', '?']).next().unwrap_or_default();
        if path.is_empty() || href.starts_with("//") || has_scheme(href) {
            return None;
        }

        if path.starts_with('/') {
            return Some(match path.strip_prefix(self.base_url) {
                Some(rest) => Target::Path(normalize("", rest)),
                None if format!("{path}/") == self.base_url => Target::Path(String::new()),
                None => Target::Outside,
            });
        }

        let page_dir = page.rsplit_once('/').map_or("", |(dir, _)| dir);
        Some(Target::Path(normalize(page_dir, path)))
    }

    fn exists(&self, target: &str) -> bool {
        if target.is_empty() || target.ends_with('/') {
            return self.targets.contains(&format!("{target}index.html"));
        }
        self.targets.contains(target) || self.targets.contains(&format!("{target}/index.html"))
    }
}

/// Undo the attribute escaping applied by the markdown renderer and by
/// template auto-escaping (which also escapes `/`).
fn decode_entities(value: &str) -> Cow<'_, str> {
    if !value.contains('&') {
        return Cow::Borrowed(value);
    }
    let mut decoded = value.to_owned();
    for (entity, ch) in [
        ("&#x2f;", "/"),
        ("&#x2F;", "/"),
        ("&#47;", "/"),
        ("&quot;", "\""),
        ("&#x27;", "'"),
        ("&#39;", "'"),
        ("&lt;", "<"),
        ("&gt;", ">"),
    ] {
        decoded = decoded.replace(entity, ch);
    }
    Cow::Owned(decoded.replace("&amp;", "&"))
}

fn has_scheme(href: &str) -> bool {
    href.split_once(':').is_some_and(|(scheme, _)| {
        !scheme.is_empty()
            && scheme
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
    })
}

/// Join `path` onto `dir` and collapse `.` and `..`, keeping a trailing `/`.
fn normalize(dir: &str, path: &str) -> String {
    let mut segments: Vec<&str> = dir.split('/').filter(|s| !s.is_empty()).collect();
    for component in path.split('/') {
        match component {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            _ => segments.push(component),
        }
    }
    let mut joined = segments.join("/");
    if path.ends_with('/') && !joined.is_empty() {
        joined.push('/');
    }
    joined
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn checker(base_url: &str) -> LinkChecker<'_> {
        LinkChecker::new(
            base_url,
            [
                "index.html",
                "blog/a/index.html",
                "blog/b/index.html",
                "styles.css",
                "img/chart.png",
            ]
            .map(str::to_owned),
        )
    }

    fn broken(checker: &LinkChecker<'_>, page: &str, html: &str) -> Vec<String> {
        let mut broken = Vec::new();
        checker.check_page(page, html, &mut broken);
        broken.into_iter().map(|l| l.href).collect()
    }

    #[test]
    fn test_absolute_links() {
        let c = checker("/");
        let html = r#"<a href="/">home</a><a href="/blog/a/">a</a><a href="/blog/a">a</a>
            <link href="/styles.css"><img src="/img/chart.png"><a href="/blog/c/">c</a>"#;
        assert_eq!(broken(&c, "index.html", html), vec!["/blog/c/"]);
    }

    #[test]
    fn test_relative_links() {
        let c = checker("/");
        let html = r#"<a href="../b/">b</a><a href="../../styles.css">css</a><a href="./missing.png">x</a>"#;
        assert_eq!(
            broken(&c, "blog/a/index.html", html),
            vec!["./missing.png"]
        );
    }

    #[test]
    fn test_ignored_links() {
        let c = checker("/");
        let html = r##"<a href="#top">top</a><a href="https://arm.com/x">arm</a>
            <a href="//cdn.example.com/a.js">cdn</a><a href="mailto:me@example.com">me</a>
            <a href="">empty</a>"##;
        let mut links = Vec::new();
        assert_eq!(c.check_page("index.html", html, &mut links), 0);
        assert!(links.is_empty());
    }

    #[test]
    fn test_fragment_and_query_stripped() {
        let c = checker("/");
        let html = r#"<a href="/blog/a/#registers">a</a><a href="/styles.css?v=2">css</a>"#;
        assert!(broken(&c, "index.html", html).is_empty());
    }

    #[test]
    fn test_base_url_prefix() {
        let c = checker("/notes/");
        let html = r#"<a href="/notes/blog/a/">a</a><a href="/notes">home</a><a href="/blog/a/">outside</a>"#;
        assert_eq!(broken(&c, "index.html", html), vec!["/blog/a/"]);
    }

    #[test]
    fn test_escaped_hrefs() {
        let c = checker("/");
        let html = r#"<a href="&#x2f;blog&#x2f;a&#x2f;">a</a><a href="https:&#x2f;&#x2f;example.com&#x2f;">ext</a>
            <a href="&#x2f;blog&#x2f;c&#x2f;">c</a>"#;
        assert_eq!(broken(&c, "index.html", html), vec!["/blog/c/"]);
        assert_eq!(decode_entities("/a?x=1&amp;y=2"), "/a?x=1&y=2");
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("blog/a", "../b/"), "blog/b/");
        assert_eq!(normalize("blog/a", "../../x.css"), "x.css");
        assert_eq!(normalize("", "../../x"), "x");
        assert_eq!(normalize("blog", "./"), "blog/");
        assert_eq!(normalize("", "/"), "");
    }
}
