//! Theme engine
//!
//! Renders the HTML pages and htmx fragments with Tera. Templates are
//! embedded into the binary from `templates/`.

use rust_embed::RustEmbed;
use serde::Serialize;
use tera::{Context as TeraContext, Tera};

use crate::models::LogEntry;

mod error;

pub use error::ThemeError;

/// Login page
pub const LOGIN_TEMPLATE: &str = "login.html";
/// Main page
pub const INDEX_TEMPLATE: &str = "index.html";
/// Single message fragment
pub const MESSAGE_TEMPLATE: &str = "fragments/message.html";
/// Log list fragment
pub const LOGS_TEMPLATE: &str = "fragments/logs.html";

#[derive(RustEmbed)]
#[folder = "templates/"]
struct TemplateAssets;

/// Kind of feedback fragment, used as the CSS class prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    Success,
    Error,
}

/// Theme engine for rendering templates
pub struct ThemeEngine {
    tera: Tera,
}

impl ThemeEngine {
    /// Load the embedded templates
    pub fn new() -> Result<Self, ThemeError> {
        let mut templates = Vec::new();
        for name in TemplateAssets::iter() {
            let file = TemplateAssets::get(&name)
                .ok_or_else(|| ThemeError::NotFound(name.to_string()))?;
            let content = String::from_utf8(file.data.into_owned())
                .map_err(|e| ThemeError::TemplateError(format!("{}: {}", name, e)))?;
            templates.push((name.to_string(), content));
        }

        let mut tera = Tera::default();
        tera.add_raw_templates(templates)?;
        tracing::debug!("Loaded {} templates", tera.get_template_names().count());

        Ok(Self { tera })
    }

    /// Render a template by name
    pub fn render(&self, name: &str, context: &TeraContext) -> Result<String, ThemeError> {
        if !self.tera.get_template_names().any(|t| t == name) {
            return Err(ThemeError::NotFound(name.to_string()));
        }
        Ok(self.tera.render(name, context)?)
    }

    pub fn render_login(&self) -> Result<String, ThemeError> {
        self.render(LOGIN_TEMPLATE, &TeraContext::new())
    }

    pub fn render_index(&self, username: &str) -> Result<String, ThemeError> {
        let mut context = TeraContext::new();
        context.insert("username", username);
        self.render(INDEX_TEMPLATE, &context)
    }

    pub fn render_message(&self, kind: MessageKind, message: &str) -> Result<String, ThemeError> {
        let mut context = TeraContext::new();
        context.insert("kind", &kind);
        context.insert("message", message);
        self.render(MESSAGE_TEMPLATE, &context)
    }

    pub fn render_logs(&self, logs: &[LogEntry]) -> Result<String, ThemeError> {
        let mut context = TeraContext::new();
        context.insert("logs", logs);
        self.render(LOGS_TEMPLATE, &context)
    }
}
