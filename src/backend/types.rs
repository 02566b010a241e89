//! Payload types exchanged with the session backend

use serde::{Deserialize, Serialize};

/// Request to start (or restart) a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartRequest {
    /// Empty on a first visit; the backend then assigns one
    #[serde(default)]
    pub client_id: String,
}

/// Response to a start request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartResponse {
    pub client_id: String,
    pub session_id: String,
    pub content: Content,
}

/// Request to continue a session with user input for one step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContinueRequest {
    pub session_id: String,
    pub step_id: String,
    pub data: ContinueData,
}

impl ContinueRequest {
    pub fn new(
        session_id: impl Into<String>,
        step_id: impl Into<String>,
        input: impl Into<String>,
    ) -> Self {
        Self {
            session_id: session_id.into(),
            step_id: step_id.into(),
            data: ContinueData {
                input: input.into(),
            },
        }
    }
}

/// Input submitted for a step.
///
/// Serialized as a string-keyed mapping with the single key `input`, holding
/// either free text or the id of the chosen option. Any other keys are for
/// the backend to define; none are produced here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContinueData {
    pub input: String,
}

/// Response to a continue request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContinueResponse {
    pub content: Content,
}

/// Content of one step, as returned by the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ContentWire", into = "ContentWire")]
pub struct Content {
    pub step_id: String,
    /// `None` when the backend populated no variant
    pub body: Option<StepContent>,
}

#[allow(dead_code)] // Constructors used by tests and mocks
impl Content {
    pub fn new(step_id: impl Into<String>, body: StepContent) -> Self {
        Self {
            step_id: step_id.into(),
            body: Some(body),
        }
    }

    pub fn empty(step_id: impl Into<String>) -> Self {
        Self {
            step_id: step_id.into(),
            body: None,
        }
    }
}

/// The three kinds of step content
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepContent {
    /// Display only, no input expected
    Message { text: String },
    /// Expects free text
    Prompt { text: String },
    /// Expects one of the option ids
    Choice {
        header: String,
        options: Vec<ChoiceOption>,
    },
}

#[allow(dead_code)] // Constructors used by tests and mocks
impl StepContent {
    pub fn message(text: impl Into<String>) -> Self {
        Self::Message { text: text.into() }
    }

    pub fn prompt(text: impl Into<String>) -> Self {
        Self::Prompt { text: text.into() }
    }

    pub fn choice(header: impl Into<String>, options: Vec<ChoiceOption>) -> Self {
        Self::Choice {
            header: header.into(),
            options,
        }
    }
}

/// A selectable option of a choice step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceOption {
    pub id: String,
    pub text: String,
}

#[allow(dead_code)] // Constructor used by tests and mocks
impl ChoiceOption {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
        }
    }
}

// ============================================================================
// Wire representation
// ============================================================================

/// Content as it travels on the wire: one optional field per variant
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ContentWire {
    #[serde(default)]
    step_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    message: Option<TextWire>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    prompt: Option<TextWire>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    choice: Option<ChoiceWire>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct TextWire {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ChoiceWire {
    #[serde(default)]
    header: String,
    #[serde(default)]
    options: Vec<ChoiceOption>,
}

impl From<ContentWire> for Content {
    fn from(wire: ContentWire) -> Self {
        let populated = usize::from(wire.message.is_some())
            + usize::from(wire.prompt.is_some())
            + usize::from(wire.choice.is_some());
        if populated > 1 {
            tracing::warn!(
                step_id = %wire.step_id,
                populated,
                "Backend populated more than one content variant, using the first"
            );
        }

        // Message, then prompt, then choice
        let body = if let Some(m) = wire.message {
            Some(StepContent::Message { text: m.text })
        } else if let Some(p) = wire.prompt {
            Some(StepContent::Prompt { text: p.text })
        } else {
            wire.choice.map(|c| StepContent::Choice {
                header: c.header,
                options: c.options,
            })
        };

        Self {
            step_id: wire.step_id,
            body,
        }
    }
}

impl From<Content> for ContentWire {
    fn from(content: Content) -> Self {
        let mut wire = ContentWire {
            step_id: content.step_id,
            ..Default::default()
        };
        match content.body {
            Some(StepContent::Message { text }) => wire.message = Some(TextWire { text }),
            Some(StepContent::Prompt { text }) => wire.prompt = Some(TextWire { text }),
            Some(StepContent::Choice { header, options }) => {
                wire.choice = Some(ChoiceWire { header, options });
            }
            None => {}
        }
        wire
    }
}
