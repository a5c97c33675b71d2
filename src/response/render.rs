//! Page rendering capability
//!
//! Narrow seam for template rendering plus the parameter collection handed
//! to it. The default renderer substitutes `<%tag%>` markers with literal
//! replacement text.

use super::serialize::Serializer;
use crate::error::EmitError;
use serde::Serialize;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

/// Tag/replacement pairs used when rendering a page. Object values are
/// serialized through the installed serializer capability.
pub struct RenderParams {
    entries: HashMap<String, String>,
    serializer: Arc<dyn Serializer>,
}

impl RenderParams {
    pub(crate) fn new(serializer: Arc<dyn Serializer>) -> Self {
        Self {
            entries: HashMap::new(),
            serializer,
        }
    }

    /// Add a tag with literal replacement text.
    pub fn add(&mut self, tag: &str, text: impl Into<String>) {
        self.entries.insert(tag.trim().to_string(), text.into());
    }

    /// Add a tag whose replacement is the serialized form of `value`.
    pub fn add_object<T: Serialize>(&mut self, tag: &str, value: &T) -> Result<(), EmitError> {
        let value = serde_json::to_value(value)?;
        let text = self.serializer.serialize(&value)?;
        self.entries.insert(tag.trim().to_string(), text);
        Ok(())
    }

    /// Replacement text for a tag; empty string when the tag is unknown.
    #[must_use]
    pub fn get(&self, tag: &str) -> &str {
        self.entries.get(tag).map_or("", String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Template rendering capability.
pub trait PageRenderer: Send + Sync {
    fn render(&self, template_path: &Path, params: &RenderParams) -> Result<String, EmitError>;
}

/// Default renderer: reads the template file and replaces each `<%tag%>`
/// marker with its replacement text.
#[derive(Debug, Default)]
pub struct TagRenderer;

impl PageRenderer for TagRenderer {
    fn render(&self, template_path: &Path, params: &RenderParams) -> Result<String, EmitError> {
        let mut page = std::fs::read_to_string(template_path)
            .map_err(|e| EmitError::Render(format!("{}: {e}", template_path.display())))?;
        for (tag, text) in &params.entries {
            page = page.replace(&format!("<%{tag}%>"), text);
        }
        Ok(page)
    }
}
