//! View engine
//!
//! Server-side HTML rendering with Tera.
//! Features:
//! - Templates compiled into the binary
//! - Optional on-disk directory whose templates replace the embedded ones
//! - Fallback to the error template, then to a bare HTML page

use rust_embed::RustEmbed;
use std::collections::BTreeMap;
use std::error::Error as StdError;
use std::fs;
use std::path::Path;
use tera::{Context as TeraContext, Tera};

use crate::config::ViewsConfig;

mod error;

pub use error::ViewError;

/// Templates shipped with the binary
#[derive(RustEmbed)]
#[folder = "templates/"]
#[include = "*.html"]
struct EmbeddedTemplates;

/// Template name used when a page fails to render
const ERROR_TEMPLATE: &str = "error.html";

/// View engine for rendering templates
pub struct ViewEngine {
    tera: Tera,
}

impl std::fmt::Debug for ViewEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewEngine")
            .field("templates", &self.tera.get_template_names().count())
            .finish()
    }
}

impl ViewEngine {
    /// Load the embedded templates, overlaid with any found under
    /// `config.path` when that directory exists.
    pub fn new(config: &ViewsConfig) -> Result<Self, ViewError> {
        let overlay = config.path.is_dir().then_some(config.path.as_path());
        if overlay.is_some() {
            tracing::info!("Loading template overrides from {:?}", config.path);
        }
        Self::load(overlay)
    }

    /// Only the embedded templates
    pub fn embedded() -> Result<Self, ViewError> {
        Self::load(None)
    }

    fn load(overlay: Option<&Path>) -> Result<Self, ViewError> {
        let mut templates: BTreeMap<String, String> = BTreeMap::new();

        for name in EmbeddedTemplates::iter() {
            if let Some(file) = EmbeddedTemplates::get(&name) {
                let content = String::from_utf8(file.data.into_owned()).map_err(|e| {
                    ViewError::TemplateError(format!("Template {} is not UTF-8: {}", name, e))
                })?;
                templates.insert(name.into_owned(), content);
            }
        }

        if let Some(dir) = overlay {
            let mut overrides = Vec::new();
            collect_templates_from_dir(dir, dir, &mut overrides)?;
            for (name, content) in overrides {
                tracing::debug!("Template override: {}", name);
                templates.insert(name, content);
            }
        }

        // Registering everything at once lets children precede their parents
        let mut tera = Tera::default();
        tera.add_raw_templates(templates)
            .map_err(|e| ViewError::TemplateError(error_chain(&e)))?;

        tracing::debug!(
            "View engine loaded {} templates",
            tera.get_template_names().count()
        );
        Ok(Self { tera })
    }

    /// Whether a template is registered under `name`
    pub fn has_template(&self, name: &str) -> bool {
        self.tera.get_template_names().any(|t| t == name)
    }

    /// Render a template with the given context
    pub fn render(&self, template: &str, context: &TeraContext) -> Result<String, ViewError> {
        if !self.has_template(template) {
            return Err(ViewError::NotFound(template.to_string()));
        }

        self.tera.render(template, context).map_err(|e| {
            ViewError::TemplateError(format!(
                "Failed to render '{}': {}",
                template,
                error_chain(&e)
            ))
        })
    }

    /// Render the error page for `status`, falling back to simple HTML
    ///
    /// Always produces a page. `error.html` gets `status` and
    /// `error_message`; if it fails to render, a minimal page is built
    /// without Tera.
    pub fn render_error(&self, status: u16, message: &str) -> String {
        let mut context = TeraContext::new();
        context.insert("status", &status);
        context.insert("error_message", message);

        match self.render(ERROR_TEMPLATE, &context) {
            Ok(html) => html,
            Err(e) => {
                tracing::warn!(
                    "Failed to render error template: {}, returning simple HTML error page",
                    e
                );
                simple_error_page(status, message)
            }
        }
    }
}

/// Walk `current` recursively, naming each `.html` file by its path
/// relative to `base` with forward slashes.
fn collect_templates_from_dir(
    base: &Path,
    current: &Path,
    templates: &mut Vec<(String, String)>,
) -> Result<(), ViewError> {
    for entry in fs::read_dir(current)? {
        let path = entry?.path();

        if path.is_dir() {
            collect_templates_from_dir(base, &path, templates)?;
        } else if path.extension().is_some_and(|ext| ext == "html") {
            let relative = path.strip_prefix(base).map_err(|_| {
                ViewError::TemplateError(format!("Failed to get relative path for {:?}", path))
            })?;
            let name = relative.to_string_lossy().replace('\\', "/");
            templates.push((name, fs::read_to_string(&path)?));
        }
    }
    Ok(())
}

fn error_chain(e: &tera::Error) -> String {
    let mut message = e.to_string();
    let mut source = e.source();
    while let Some(s) = source {
        message.push_str(&format!("\n  Caused by: {}", s));
        source = s.source();
    }
    message
}

/// Last-resort page when even the error template cannot render
pub fn simple_error_page(status: u16, message: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Error {status}</title>
    <style>
        body {{
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            max-width: 600px;
            margin: 50px auto;
            padding: 20px;
            background: #f5f5f5;
        }}
        .error-box {{
            background: white;
            border-left: 4px solid #e74c3c;
            padding: 20px;
            border-radius: 4px;
        }}
        h1 {{ color: #e74c3c; margin-top: 0; }}
    </style>
</head>
<body>
    <div class="error-box">
        <h1>Error {status}</h1>
        <p>{message}</p>
        <p><a href="/">Back to home</a></p>
    </div>
</body>
</html>"#,
        status = status,
        message = tera::escape_html(message)
    )
}
