//! Popup fragments rendered from a Jinja template on disk.

use anyhow::{Context, Result};
use minijinja::{Environment, context, path_loader};
use std::path::Path;

use crate::parser::Row;

/// Renders the detail fragment shown inside each marker popup.
///
/// The template receives the whole row as `row`, so any dataset column is
/// reachable as `row.<column>` or `row["<column>"]`.
pub struct PopupRenderer {
    env: Environment<'static>,
    template: String,
}

impl PopupRenderer {
    /// Loads `template` from `dir`. Fails immediately if the file is missing
    /// or does not compile.
    pub fn new(dir: &Path, template: &str) -> Result<Self> {
        let mut env = Environment::new();
        env.set_loader(path_loader(dir));

        env.get_template(template).with_context(|| {
            format!("failed to load popup template {}", dir.join(template).display())
        })?;

        Ok(Self {
            env,
            template: template.to_string(),
        })
    }

    pub fn render(&self, row: &Row) -> Result<String> {
        let template = self.env.get_template(&self.template)?;
        template
            .render(context! { row => row })
            .with_context(|| format!("failed to render {}", self.template))
    }
}
