//! Custom message templates.
//!
//! Templates are Handlebars in strict mode, rendered against a fixed set of
//! placeholders built from [`RunMetadata`]:
//!
//! | Placeholder    | Value                                         |
//! |----------------|-----------------------------------------------|
//! | `workflow`     | `<pr checks url\|workflow name>`              |
//! | `job`          | `<job url\|job name>`                         |
//! | `commit`       | `<commit url\|short sha>`                     |
//! | `repo`         | `<repo url\|owner/repo>`                      |
//! | `author`       | `name<email>`                                 |
//! | `took`         | elapsed time                                  |
//! | `message`      | `<commit html url\|commit title>`             |
//! | `ref`          | git ref                                       |
//! | `eventName`    | triggering event                              |
//! | `action`       | `<pr checks url\|action>`                     |
//! | `workflowName`, `jobName`, `sha`, `shortSha`, `commitUrl`, `repoUrl`, `prChecksUrl`, `runUrl` | raw values |
//!
//! A template written as a `{ ... }` mapping (JSON or YAML flow syntax) is
//! rendered key by key and leaf by leaf and sent as that object. Anything
//! else, including text that merely contains `key: value` pairs, is rendered
//! as a whole and sent as `{"text": ...}`.

use handlebars::{Handlebars, RenderError, RenderErrorReason};
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::error::TemplateError;
use crate::fields::Field;
use crate::metadata::RunMetadata;

/// Message produced by a custom template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedMessage(Map<String, Value>);

impl RenderedMessage {
    /// Wrap plain text as `{"text": ...}`.
    #[must_use]
    pub fn text_only(text: impl Into<String>) -> Self {
        let mut map = Map::new();
        map.insert("text".to_string(), Value::String(text.into()));
        Self(map)
    }

    #[cfg(test)]
    pub(crate) fn text(&self) -> Option<&str> {
        self.0.get("text").and_then(Value::as_str)
    }

    #[cfg(test)]
    pub(crate) fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

impl Serialize for RenderedMessage {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

/// The closed placeholder catalog.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Placeholders {
    workflow: String,
    job: String,
    commit: String,
    repo: String,
    author: String,
    took: String,
    message: String,
    #[serde(rename = "ref")]
    git_ref: String,
    event_name: String,
    action: String,
    workflow_name: String,
    job_name: String,
    sha: String,
    short_sha: String,
    commit_url: String,
    repo_url: String,
    pr_checks_url: String,
    run_url: String,
}

impl Placeholders {
    fn new(metadata: &RunMetadata) -> Self {
        Self {
            workflow: Field::Workflow.value(metadata),
            job: Field::Job.value(metadata),
            commit: Field::Commit.value(metadata),
            repo: Field::Repo.value(metadata),
            author: Field::Author.value(metadata),
            took: Field::Took.value(metadata),
            message: Field::Message.value(metadata),
            git_ref: Field::Ref.value(metadata),
            event_name: Field::EventName.value(metadata),
            action: Field::Action.value(metadata),
            workflow_name: metadata.workflow.clone(),
            job_name: metadata.job_name.clone(),
            sha: metadata.sha.clone(),
            short_sha: metadata.short_sha().to_string(),
            commit_url: metadata.commit_url(),
            repo_url: metadata.repo_url(),
            pr_checks_url: metadata.pr_checks_url(),
            run_url: metadata.run_url(),
        }
    }
}

/// Renders custom templates against run metadata.
pub struct TemplateRenderer {
    handlebars: Handlebars<'static>,
}

impl TemplateRenderer {
    #[must_use]
    pub fn new() -> Self {
        let mut handlebars = Handlebars::new();
        handlebars.set_strict_mode(true);
        // Output is Slack mrkdwn, not HTML
        handlebars.register_escape_fn(handlebars::no_escape);
        Self { handlebars }
    }

    /// Render `template` with placeholders taken from `metadata`.
    ///
    /// # Errors
    ///
    /// Returns a [`TemplateError`] for unknown placeholders or invalid syntax.
    pub fn render(
        &self,
        template: &str,
        metadata: &RunMetadata,
    ) -> Result<RenderedMessage, TemplateError> {
        let context = serde_json::to_value(Placeholders::new(metadata))
            .map_err(|e| TemplateError::Syntax(e.to_string()))?;

        match parse_object(template) {
            Some(object) => Ok(RenderedMessage(self.render_map(object, &context)?)),
            None => Ok(RenderedMessage::text_only(
                self.render_str(template, &context)?,
            )),
        }
    }

    fn render_value(&self, value: Value, context: &Value) -> Result<Value, TemplateError> {
        Ok(match value {
            Value::String(s) => Value::String(self.render_str(&s, context)?),
            Value::Array(items) => Value::Array(
                items
                    .into_iter()
                    .map(|item| self.render_value(item, context))
                    .collect::<Result<_, _>>()?,
            ),
            Value::Object(map) => Value::Object(self.render_map(map, context)?),
            other => other,
        })
    }

    fn render_map(
        &self,
        map: Map<String, Value>,
        context: &Value,
    ) -> Result<Map<String, Value>, TemplateError> {
        let mut rendered = Map::with_capacity(map.len());
        for (key, value) in map {
            rendered.insert(
                self.render_str(&key, context)?,
                self.render_value(value, context)?,
            );
        }
        Ok(rendered)
    }

    fn render_str(&self, template: &str, context: &Value) -> Result<String, TemplateError> {
        self.handlebars
            .render_template(template, context)
            .map_err(classify)
    }
}

impl Default for TemplateRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse the template as a `{ ... }` mapping with string keys, if it is one.
fn parse_object(template: &str) -> Option<Map<String, Value>> {
    if !template.trim_start().starts_with('{') {
        return None;
    }
    let yaml: serde_yaml::Value = serde_yaml::from_str(template).ok()?;
    let serde_yaml::Value::Mapping(mapping) = &yaml else {
        return None;
    };
    if !mapping.keys().all(serde_yaml::Value::is_string) {
        return None;
    }
    match serde_json::to_value(&yaml).ok()? {
        Value::Object(object) => Some(object),
        _ => None,
    }
}

fn classify(err: RenderError) -> TemplateError {
    match err.reason() {
        RenderErrorReason::MissingVariable(name) => {
            TemplateError::UnknownPlaceholder(name.clone().unwrap_or_default())
        }
        RenderErrorReason::HelperNotFound(name) => TemplateError::UnknownPlaceholder(name.clone()),
        _ => TemplateError::Syntax(err.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metadata() -> RunMetadata {
        RunMetadata {
            repository: "8398a7/action-slack".to_string(),
            server_url: "https://github.com".to_string(),
            sha: "b24f03a32e093fe8d55e23cfd0bb314069633b2f".to_string(),
            commit_message: "mod: lint".to_string(),
            commit_html_url: "https://github.com/8398a7/action-slack/commit/b24f03a32e093fe8d55e23cfd0bb314069633b2f".to_string(),
            author_name: "839".to_string(),
            author_email: "8398a7@gmail.com".to_string(),
            job_name: "notification".to_string(),
            job_url: "https://github.com/8398a7/action-slack/runs/762195612".to_string(),
            workflow: "PR Checks".to_string(),
            run_id: "141394066".to_string(),
            event_name: "push".to_string(),
            git_ref: "refs/heads/master".to_string(),
            took: "1 hour 1 min 1 sec".to_string(),
        }
    }

    #[test]
    fn test_object_template() {
        let template = r#"{ "text": "{{workflow}}\n{{job}} ({{commit}}) of {{repo}}@master by {{author}} succeeded in {{took}}" }"#;
        let rendered = TemplateRenderer::new().render(template, &metadata()).unwrap();
        assert_eq!(
            rendered.text(),
            Some(
                "<https://github.com/8398a7/action-slack/commit/b24f03a32e093fe8d55e23cfd0bb314069633b2f/checks|PR Checks>
<https://github.com/8398a7/action-slack/runs/762195612|notification> (<https://github.com/8398a7/action-slack/commit/b24f03a32e093fe8d55e23cfd0bb314069633b2f|b24f03a3>) of <https://github.com/8398a7/action-slack|8398a7/action-slack>@master by 839<8398a7@gmail.com> succeeded in 1 hour 1 min 1 sec"
            )
        );
        assert_eq!(rendered.into_value().as_object().map(Map::len), Some(1));
    }

    #[test]
    fn test_yaml_template_with_nested_values() {
        let template = "{ text: \"{{eventName}} on {{ref}}\", unfurl_links: false,\n  blocks: [{ type: section, text: \"{{shortSha}}\" }] }";
        let rendered = TemplateRenderer::new().render(template, &metadata()).unwrap();
        assert_eq!(
            rendered.into_value(),
            serde_json::json!({
                "text": "push on refs/heads/master",
                "unfurl_links": false,
                "blocks": [{ "type": "section", "text": "b24f03a3" }]
            })
        );
    }

    #[test]
    fn test_plain_text_template() {
        let rendered = TemplateRenderer::new()
            .render("{{workflowName}} finished: {{runUrl}}", &metadata())
            .unwrap();
        assert_eq!(
            rendered.text(),
            Some("PR Checks finished: https://github.com/8398a7/action-slack/actions/runs/141394066")
        );
    }

    #[test]
    fn test_text_with_colons_stays_text() {
        let renderer = TemplateRenderer::new();
        let rendered = renderer
            .render("Run {{workflowName}} failed: see {{runUrl}}", &metadata())
            .unwrap();
        assert_eq!(
            rendered.into_value(),
            serde_json::json!({
                "text": "Run PR Checks failed: see https://github.com/8398a7/action-slack/actions/runs/141394066"
            })
        );

        let rendered = renderer.render("Deploy status: done", &metadata()).unwrap();
        assert_eq!(
            rendered.into_value(),
            serde_json::json!({ "text": "Deploy status: done" })
        );
    }

    #[test]
    fn test_leading_placeholder_is_text() {
        let rendered = TemplateRenderer::new()
            .render("{{workflowName}} done", &metadata())
            .unwrap();
        assert_eq!(rendered.text(), Some("PR Checks done"));
    }

    #[test]
    fn test_object_keys_are_rendered() {
        let rendered = TemplateRenderer::new()
            .render(r#"{ "{{jobName}}": "{{took}}" }"#, &metadata())
            .unwrap();
        assert_eq!(
            rendered.into_value(),
            serde_json::json!({ "notification": "1 hour 1 min 1 sec" })
        );

        let err = TemplateRenderer::new()
            .render(r#"{ "{{secret_env}}": "x" }"#, &metadata())
            .unwrap_err();
        assert!(matches!(err, TemplateError::UnknownPlaceholder(_)));
    }

    #[test]
    fn test_literal_text_passes_through() {
        let rendered = TemplateRenderer::new()
            .render("nothing to see <here> & there", &metadata())
            .unwrap();
        assert_eq!(rendered.text(), Some("nothing to see <here> & there"));
    }

    #[test]
    fn test_unknown_placeholder() {
        let err = TemplateRenderer::new()
            .render(r#"{ "text": "{{secret_env}}" }"#, &metadata())
            .unwrap_err();
        assert!(matches!(err, TemplateError::UnknownPlaceholder(_)));
    }

    #[test]
    fn test_invalid_syntax() {
        let err = TemplateRenderer::new()
            .render("{{#if workflow}}never closed", &metadata())
            .unwrap_err();
        assert!(matches!(err, TemplateError::Syntax(_)));
    }
}
