use minijinja::{Environment, UndefinedBehavior};
use std::collections::BTreeMap;
use thiserror::Error;

/// Stylesheet rendered once per week range
pub(crate) static CALENDAR_CSS: &str = include_str!("../templates/academic-year-calendar.css");

pub(crate) trait TemplateRenderer {
    fn render(&self, template: &str, vars: &[(&str, String)]) -> Result<String, TemplateError>;
}

impl<T: TemplateRenderer + ?Sized> TemplateRenderer for &T {
    fn render(&self, template: &str, vars: &[(&str, String)]) -> Result<String, TemplateError> {
        (**self).render(template, vars)
    }
}

/// Renders Jinja-syntax templates.  Referring to a variable that wasn't
/// supplied is an error rather than an empty string.
#[derive(Clone, Debug)]
pub(crate) struct JinjaTemplate {
    env: Environment<'static>,
}

impl JinjaTemplate {
    pub(crate) fn new() -> JinjaTemplate {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        JinjaTemplate { env }
    }
}

impl Default for JinjaTemplate {
    fn default() -> JinjaTemplate {
        JinjaTemplate::new()
    }
}

impl TemplateRenderer for JinjaTemplate {
    fn render(&self, template: &str, vars: &[(&str, String)]) -> Result<String, TemplateError> {
        let ctx = vars
            .iter()
            .map(|(k, v)| (*k, v.as_str()))
            .collect::<BTreeMap<_, _>>();
        Ok(self.env.render_str(template, ctx)?)
    }
}

#[derive(Debug, Error)]
#[error("failed to render template")]
pub(crate) struct TemplateError(#[from] minijinja::Error);
