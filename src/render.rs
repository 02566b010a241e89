//! Step content rendering
//!
//! Each content kind has one template. Templates see a flat set of fields:
//!
//! - message and prompt: `step_id`, `text`
//! - choice: `step_id`, `header`, `options`
//!
//! `options` maps each option id to `{step_id, id, text}`. The step id is
//! repeated per option so a template can build links while iterating.

use crate::backend::{ChoiceOption, StepContent};
use crate::config::TemplatePaths;
use minijinja::{Environment, UndefinedBehavior};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

const MESSAGE_TEMPLATE: &str = "message.html";
const PROMPT_TEMPLATE: &str = "prompt.html";
const CHOICE_TEMPLATE: &str = "choice.html";

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to read template {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{0:#}")]
    Template(#[from] minijinja::Error),
}

/// Renders step content with the message, prompt and choice templates
pub struct Renderer {
    env: Environment<'static>,
}

impl Renderer {
    /// Load and compile the three templates from disk
    pub fn load(paths: &TemplatePaths) -> Result<Self, RenderError> {
        let message = read_template(&paths.message)?;
        let prompt = read_template(&paths.prompt)?;
        let choice = read_template(&paths.choice)?;
        Self::from_sources(message, prompt, choice)
    }

    pub fn from_sources(
        message: String,
        prompt: String,
        choice: String,
    ) -> Result<Self, RenderError> {
        let mut env = Environment::new();
        // Referencing a field the data does not carry is an error
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.add_template_owned(MESSAGE_TEMPLATE, message)?;
        env.add_template_owned(PROMPT_TEMPLATE, prompt)?;
        env.add_template_owned(CHOICE_TEMPLATE, choice)?;
        Ok(Self { env })
    }

    /// Render `content` for `step_id`. No content renders as an empty page.
    pub fn render(
        &self,
        step_id: &str,
        content: Option<&StepContent>,
    ) -> Result<String, RenderError> {
        match content {
            Some(StepContent::Message { text }) => {
                self.render_template(MESSAGE_TEMPLATE, &TextView { step_id, text })
            }
            Some(StepContent::Prompt { text }) => {
                self.render_template(PROMPT_TEMPLATE, &TextView { step_id, text })
            }
            Some(StepContent::Choice { header, options }) => {
                self.render_template(CHOICE_TEMPLATE, &ChoiceView::new(step_id, header, options))
            }
            None => Ok(String::new()),
        }
    }

    fn render_template<S: Serialize>(&self, name: &str, data: &S) -> Result<String, RenderError> {
        let template = self.env.get_template(name)?;
        Ok(template.render(data)?)
    }
}

fn read_template(path: &Path) -> Result<String, RenderError> {
    std::fs::read_to_string(path).map_err(|source| RenderError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Fields for the message and prompt templates
#[derive(Debug, Serialize)]
struct TextView<'a> {
    step_id: &'a str,
    text: &'a str,
}

/// Fields for the choice template
#[derive(Debug, Serialize)]
struct ChoiceView<'a> {
    step_id: &'a str,
    header: &'a str,
    options: BTreeMap<&'a str, OptionView<'a>>,
}

#[derive(Debug, PartialEq, Eq, Serialize)]
struct OptionView<'a> {
    step_id: &'a str,
    id: &'a str,
    text: &'a str,
}

impl<'a> ChoiceView<'a> {
    fn new(step_id: &'a str, header: &'a str, options: &'a [ChoiceOption]) -> Self {
        let options = options
            .iter()
            .map(|o| {
                (
                    o.id.as_str(),
                    OptionView {
                        step_id,
                        id: &o.id,
                        text: &o.text,
                    },
                )
            })
            .collect();
        Self {
            step_id,
            header,
            options,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::BTreeSet;

    fn tagged_renderer() -> Renderer {
        Renderer::from_sources(
            "MESSAGE[{{ step_id }}] {{ text }}".to_string(),
            "PROMPT[{{ step_id }}] {{ text }}".to_string(),
            "CHOICE[{{ step_id }}] {{ header }}:\
             {% for id, o in options|items %} {{ id }}={{ o.step_id }}/{{ o.id }}/{{ o.text }}{% endfor %}"
                .to_string(),
        )
        .unwrap()
    }

    #[test]
    fn test_message_uses_message_template_only() {
        let out = tagged_renderer()
            .render("s1", Some(&StepContent::message("Welcome")))
            .unwrap();
        assert_eq!(out, "MESSAGE[s1] Welcome");
    }

    #[test]
    fn test_prompt_uses_prompt_template_only() {
        let out = tagged_renderer()
            .render("s2", Some(&StepContent::prompt("Your name?")))
            .unwrap();
        assert_eq!(out, "PROMPT[s2] Your name?");
    }

    #[test]
    fn test_choice_uses_choice_template_with_options() {
        let content = StepContent::choice(
            "Pick one",
            vec![ChoiceOption::new("b", "Banana"), ChoiceOption::new("a", "Apple")],
        );
        let out = tagged_renderer().render("s1", Some(&content)).unwrap();
        assert_eq!(out, "CHOICE[s1] Pick one: a=s1/a/Apple b=s1/b/Banana");
    }

    #[test]
    fn test_no_content_renders_nothing() {
        let out = tagged_renderer().render("s9", None).unwrap();
        assert_eq!(out, "");
    }

    #[test]
    fn test_choice_view_option_mapping() {
        let options = vec![ChoiceOption::new("a", "Apple"), ChoiceOption::new("b", "Banana")];
        let view = ChoiceView::new("s1", "Pick one", &options);

        assert_eq!(view.options.len(), 2);
        assert_eq!(
            view.options["a"],
            OptionView {
                step_id: "s1",
                id: "a",
                text: "Apple"
            }
        );
        assert_eq!(
            view.options["b"],
            OptionView {
                step_id: "s1",
                id: "b",
                text: "Banana"
            }
        );
    }

    #[test]
    fn test_missing_field_is_render_error() {
        let renderer = Renderer::from_sources(
            "{{ text }} {{ author }}".to_string(),
            "{{ text }}".to_string(),
            "{{ header }}".to_string(),
        )
        .unwrap();
        let err = renderer
            .render("s1", Some(&StepContent::message("hi")))
            .unwrap_err();
        assert!(matches!(err, RenderError::Template(_)));
    }

    #[test]
    fn test_invalid_template_fails_at_construction() {
        let result = Renderer::from_sources(
            "{% if %}".to_string(),
            "{{ text }}".to_string(),
            "{{ header }}".to_string(),
        );
        assert!(matches!(result, Err(RenderError::Template(_))));
    }

    #[test]
    fn test_text_is_html_escaped() {
        let out = tagged_renderer()
            .render("s1", Some(&StepContent::message("<b>bold</b> & co")))
            .unwrap();
        assert!(out.starts_with("MESSAGE[s1] &lt;b&gt;bold"));
        assert!(out.ends_with("&amp; co"));
        assert!(!out.contains("<b>"));
    }

    #[test]
    fn test_load_from_files() {
        let dir = tempfile::tempdir().unwrap();
        let paths = TemplatePaths {
            message: dir.path().join("message.tmpl"),
            prompt: dir.path().join("prompt.tmpl"),
            choice: dir.path().join("choice.tmpl"),
        };
        std::fs::write(&paths.message, "m:{{ text }}").unwrap();
        std::fs::write(&paths.prompt, "p:{{ text }}").unwrap();
        std::fs::write(&paths.choice, "c:{{ header }}").unwrap();

        let renderer = Renderer::load(&paths).unwrap();
        let out = renderer.render("s", Some(&StepContent::prompt("q"))).unwrap();
        assert_eq!(out, "p:q");
    }

    #[test]
    fn test_load_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let paths = TemplatePaths {
            message: dir.path().join("absent.tmpl"),
            prompt: dir.path().join("absent.tmpl"),
            choice: dir.path().join("absent.tmpl"),
        };
        let result = Renderer::load(&paths);
        assert!(matches!(result, Err(RenderError::Read { .. })));
    }

    #[test]
    fn test_shipped_templates_render() {
        let root = Path::new(env!("CARGO_MANIFEST_DIR")).join("tmpl");
        let renderer = Renderer::load(&TemplatePaths {
            message: root.join("message.tmpl"),
            prompt: root.join("prompt.tmpl"),
            choice: root.join("choice.tmpl"),
        })
        .unwrap();

        let page = renderer
            .render("s3", Some(&StepContent::prompt("Your name?")))
            .unwrap();
        assert!(page.contains(r#"action="/input/s3""#));

        let page = renderer
            .render(
                "s4",
                Some(&StepContent::choice("Fruit", vec![ChoiceOption::new("a", "Apple")])),
            )
            .unwrap();
        assert!(page.contains(r#"href="/choose/s4/a""#));
        assert!(page.contains("Apple"));
    }

    proptest! {
        #[test]
        fn prop_choice_options_keyed_by_id(
            step_id in "[a-z0-9]{1,8}",
            entries in prop::collection::vec(("[a-z]{1,4}", "[A-Za-z ]{0,12}"), 0..12),
        ) {
            let options: Vec<ChoiceOption> = entries
                .iter()
                .map(|(id, text)| ChoiceOption::new(id.clone(), text.clone()))
                .collect();
            let view = ChoiceView::new(&step_id, "h", &options);

            let ids: BTreeSet<&str> = options.iter().map(|o| o.id.as_str()).collect();
            let keys: BTreeSet<&str> = view.options.keys().copied().collect();
            prop_assert_eq!(keys, ids);

            for (key, option) in &view.options {
                prop_assert_eq!(option.step_id, step_id.as_str());
                prop_assert_eq!(option.id, *key);
            }
        }
    }
}
