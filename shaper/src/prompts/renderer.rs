//! Prompt rendering using minijinja (Jinja2-compatible).

use std::collections::BTreeMap;

use minijinja::{Environment, UndefinedBehavior};

use super::template::{FORMAT_INSTRUCTIONS_VAR, PromptTemplate};
use crate::error::{Error, Result};

/// Renders [`PromptTemplate`]s.
///
/// Undefined placeholders are errors rather than empty strings, and user text
/// is substituted as a value, so template syntax inside it is never evaluated.
///
/// # Example
///
/// ```rust,ignore
/// let renderer = PromptRenderer::new();
/// let template = PromptTemplate::new("t", "Paragraph: {{ paragraph }}\n{{ format_instructions }}", "paragraph");
/// let prompt = renderer.render(&template, "Hello.", "Reply in JSON.")?;
/// ```
#[derive(Debug, Clone)]
pub struct PromptRenderer {
    env: Environment<'static>,
}

impl Default for PromptRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl PromptRenderer {
    /// Creates a renderer with strict undefined behaviour.
    #[must_use]
    pub fn new() -> Self {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.set_keep_trailing_newline(true);
        env.set_trim_blocks(false);
        env.set_lstrip_blocks(false);
        Self { env }
    }

    /// Checks that a template compiles and only uses the placeholders the
    /// renderer supplies.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Template`] on a syntax error, an unknown placeholder,
    /// or a template that never uses its input variable.
    pub fn check(&self, template: &PromptTemplate) -> Result<()> {
        if template.input_variable.trim().is_empty() {
            return Err(Error::template(format!(
                "template '{}' has no input variable",
                template.name
            )));
        }

        let compiled = self.env.template_from_str(&template.source)?;
        let used = compiled.undeclared_variables(false);

        if let Some(unknown) = used
            .iter()
            .find(|v| *v != &template.input_variable && *v != FORMAT_INSTRUCTIONS_VAR)
        {
            return Err(Error::template(format!(
                "template '{}' uses unknown placeholder '{unknown}'",
                template.name
            )));
        }
        if !used.contains(&template.input_variable) {
            return Err(Error::template(format!(
                "template '{}' never uses '{}'",
                template.name, template.input_variable
            )));
        }
        Ok(())
    }

    /// Renders `template` with the caller's text and format instructions.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if `user_text` is empty or whitespace
    /// (checked before the template engine runs) and [`Error::Template`] if
    /// rendering fails.
    pub fn render(
        &self,
        template: &PromptTemplate,
        user_text: &str,
        format_instructions: &str,
    ) -> Result<String> {
        let text = user_text.trim();
        if text.is_empty() {
            return Err(Error::invalid_input(format!(
                "{} text cannot be empty",
                template.input_variable
            )));
        }

        let mut ctx = BTreeMap::new();
        ctx.insert(template.input_variable.as_str(), text);
        ctx.insert(FORMAT_INSTRUCTIONS_VAR, format_instructions);

        let rendered = self.env.render_str(&template.source, ctx)?;
        Ok(rendered)
    }
}
