//! Element selection chains.
//!
//! A [`Selector`] is a pure value: an ordered list of steps evaluated from
//! the document root, each step narrowing or re-rooting the current match
//! set. It serializes to the JSON shape the in-page resolver consumes.

use serde::{Deserialize, Serialize};

/// How a piece of visible text is compared.
///
/// Text is whitespace-normalized on both sides before comparison.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum TextMatch {
    /// Case-insensitive substring.
    Substring { value: String },
    /// Case-sensitive, full-string equality.
    Exact { value: String },
    /// JavaScript regular expression with flags.
    Regex { value: String, flags: String },
}

impl TextMatch {
    /// Case-insensitive substring match.
    #[must_use]
    pub fn substring(value: impl Into<String>) -> Self {
        Self::Substring {
            value: value.into(),
        }
    }

    /// Exact match.
    #[must_use]
    pub fn exact(value: impl Into<String>) -> Self {
        Self::Exact {
            value: value.into(),
        }
    }

    /// Case-insensitive regex (`/pattern/i`).
    #[must_use]
    pub fn regex_i(pattern: impl Into<String>) -> Self {
        Self::Regex {
            value: pattern.into(),
            flags: "i".to_string(),
        }
    }

    /// Case-sensitive regex.
    #[must_use]
    pub fn regex(pattern: impl Into<String>) -> Self {
        Self::Regex {
            value: pattern.into(),
            flags: String::new(),
        }
    }

    /// Whether `text` satisfies this matcher, with the resolver's
    /// normalization. Used by drivers that evaluate selectors natively.
    #[must_use]
    pub fn matches(&self, text: &str) -> bool {
        let text = normalize_whitespace(text);
        match self {
            Self::Substring { value } => text
                .to_lowercase()
                .contains(&normalize_whitespace(value).to_lowercase()),
            Self::Exact { value } => text == normalize_whitespace(value),
            Self::Regex { value, flags } => regex::RegexBuilder::new(value)
                .case_insensitive(flags.contains('i'))
                .build()
                .is_ok_and(|re| re.is_match(&text)),
        }
    }
}

impl From<&str> for TextMatch {
    fn from(value: &str) -> Self {
        Self::substring(value)
    }
}

impl From<String> for TextMatch {
    fn from(value: String) -> Self {
        Self::substring(value)
    }
}

/// Collapse runs of whitespace to single spaces and trim.
#[must_use]
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// ARIA roles the scenarios query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Button,
    Cell,
    Checkbox,
    Columnheader,
    Combobox,
    Heading,
    Img,
    Link,
    Listitem,
    Paragraph,
    Radio,
    Row,
    Spinbutton,
    Textbox,
}

/// One step of a selection chain.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Step {
    /// Descendants matching a CSS selector.
    Css { selector: String },
    /// Descendants with an ARIA role, optionally filtered by accessible name.
    Role {
        role: Role,
        name: Option<TextMatch>,
    },
    /// Innermost descendants whose text matches.
    Text { text: TextMatch },
    /// Form controls whose label matches.
    Label { text: TextMatch },
    /// Elements whose placeholder matches.
    Placeholder { text: TextMatch },
    /// Elements whose test-id attribute equals `value`.
    TestId { attribute: String, value: String },
    /// Keep current matches whose text content matches.
    HasText { text: TextMatch },
    /// Keep a single match; negative counts from the end.
    Nth { index: i64 },
}

/// An ordered selection chain, evaluated from the document root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Selector {
    steps: Vec<Step>,
}

impl Selector {
    /// Empty chain; resolves to the document itself.
    #[must_use]
    pub const fn root() -> Self {
        Self { steps: Vec::new() }
    }

    /// This chain followed by `step`.
    #[must_use]
    pub fn then(&self, step: Step) -> Self {
        let mut steps = self.steps.clone();
        steps.push(step);
        Self { steps }
    }

    #[must_use]
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Stable key for maps and logs.
    #[must_use]
    pub fn key(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| format!("{self:?}"))
    }

    /// Short human-readable form used in errors (`role=link[name~"Cart"] >> nth=0`).
    #[must_use]
    pub fn describe(&self) -> String {
        if self.steps.is_empty() {
            return "document".to_string();
        }
        self.steps
            .iter()
            .map(describe_step)
            .collect::<Vec<_>>()
            .join(" >> ")
    }
}

fn describe_text(text: &TextMatch) -> String {
    match text {
        TextMatch::Substring { value } => format!("~{value:?}"),
        TextMatch::Exact { value } => format!("={value:?}"),
        TextMatch::Regex { value, flags } => format!("=/{value}/{flags}"),
    }
}

fn describe_step(step: &Step) -> String {
    match step {
        Step::Css { selector } => format!("css={selector}"),
        Step::Role { role, name: None } => format!("role={}", role_name(*role)),
        Step::Role {
            role,
            name: Some(name),
        } => format!("role={}[name{}]", role_name(*role), describe_text(name)),
        Step::Text { text } => format!("text{}", describe_text(text)),
        Step::Label { text } => format!("label{}", describe_text(text)),
        Step::Placeholder { text } => format!("placeholder{}", describe_text(text)),
        Step::TestId { attribute, value } => format!("[{attribute}={value:?}]"),
        Step::HasText { text } => format!("has-text{}", describe_text(text)),
        Step::Nth { index } => format!("nth={index}"),
    }
}

const fn role_name(role: Role) -> &'static str {
    match role {
        Role::Button => "button",
        Role::Cell => "cell",
        Role::Checkbox => "checkbox",
        Role::Columnheader => "columnheader",
        Role::Combobox => "combobox",
        Role::Heading => "heading",
        Role::Img => "img",
        Role::Link => "link",
        Role::Listitem => "listitem",
        Role::Paragraph => "paragraph",
        Role::Radio => "radio",
        Role::Row => "row",
        Role::Spinbutton => "spinbutton",
        Role::Textbox => "textbox",
    }
}
