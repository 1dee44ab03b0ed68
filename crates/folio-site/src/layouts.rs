//! Layout registry.
//!
//! Layouts are minijinja templates. Built-in `base`, `post` and `index`
//! layouts are always available; every `*.html` file in the site's layouts
//! directory is registered under its file stem and overrides a built-in of
//! the same name.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use folio_content::layout_name;
use minijinja::{AutoEscape, Environment, UndefinedBehavior};
use serde::Serialize;

use crate::SiteError;

const BUILTIN: [(&str, &str); 3] = [
    ("base", include_str!("../templates/base.html")),
    ("post", include_str!("../templates/post.html")),
    ("index", include_str!("../templates/index.html")),
];

/// Registered layouts, ready to render.
pub struct Layouts {
    env: Environment<'static>,
    names: BTreeSet<String>,
}

impl Layouts {
    /// Built-in layouts only.
    #[must_use]
    pub fn builtin() -> Self {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.set_auto_escape_callback(|_name: &str| AutoEscape::Html);

        let mut names = BTreeSet::new();
        for (name, source) in BUILTIN {
            env.add_template(name, source)
                .expect("built-in layouts are valid templates");
            names.insert(name.to_owned());
        }

        Self { env, names }
    }

    /// Built-in layouts plus every `*.html` file in `dir`.
    ///
    /// A missing directory is not an error.
    pub fn load(dir: &Path) -> Result<Self, SiteError> {
        let mut layouts = Self::builtin();
        if !dir.is_dir() {
            tracing::debug!(dir = %dir.display(), "No layouts directory, using built-in layouts");
            return Ok(layouts);
        }

        let mut files: Vec<_> = fs::read_dir(dir)
            .map_err(SiteError::io(dir))?
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "html"))
            .collect();
        files.sort();

        for path in files {
            let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let source = fs::read_to_string(&path).map_err(SiteError::io(&path))?;
            layouts.add(name, source)?;
            tracing::debug!(layout = name, path = %path.display(), "Registered layout");
        }

        Ok(layouts)
    }

    /// Register a layout, replacing any layout with the same name.
    pub fn add(&mut self, name: &str, source: String) -> Result<(), SiteError> {
        self.env
            .add_template_owned(name.to_owned(), source)
            .map_err(|source| SiteError::Template {
                name: name.to_owned(),
                source,
            })?;
        self.names.insert(name.to_owned());
        Ok(())
    }

    /// Layout names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Resolve a front matter layout reference to a registered layout name.
    ///
    /// `post`, `post.html` and `../../layouts/post.html` all resolve to
    /// `post`.
    pub fn resolve<'a>(&self, source: &Path, reference: &'a str) -> Result<&'a str, SiteError> {
        let name = layout_name(reference);
        if self.contains(name) {
            Ok(name)
        } else {
            Err(SiteError::UnknownLayout {
                path: source.to_path_buf(),
                layout: reference.to_owned(),
                available: self.names.iter().cloned().collect(),
            })
        }
    }

    /// Render a layout with the given context.
    pub fn render<S: Serialize>(&self, name: &str, ctx: S) -> Result<String, SiteError> {
        let template_error = |source: minijinja::Error| SiteError::Template {
            name: name.to_owned(),
            source,
        };
        let template = self.env.get_template(name).map_err(template_error)?;
        template.render(ctx).map_err(template_error)
    }
}
