//! Action grammar for interactions reported by a rendered automation screen.
//!
//! A screen reports taps as URIs shaped like
//! `qon-<app>://automation?action=<tag>&data=<payload>`. Only URIs whose host
//! is `automation` and whose scheme matches `qon-.+` belong to the engine;
//! everything else is an ordinary link the host handles itself.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;
use url::Url;

pub const AUTOMATION_HOST: &str = "automation";
pub const SCHEME_PREFIX: &str = "qon-";
pub const ACTION_PARAM: &str = "action";
pub const DATA_PARAM: &str = "data";

static SCHEME_RE: OnceLock<Regex> = OnceLock::new();

fn scheme_re() -> &'static Regex {
    SCHEME_RE.get_or_init(|| Regex::new(&format!("^{SCHEME_PREFIX}.+$")).unwrap())
}

// ---------------------------------------------------------------------------
// ActionType
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    Url,
    DeepLink,
    Close,
    Navigate,
    Purchase,
    Restore,
    Unknown,
}

impl ActionType {
    /// Map the `action` query value onto a tag. Absent or unrecognized values
    /// are `Unknown`.
    pub fn from_tag(tag: Option<&str>) -> Self {
        match tag {
            Some("url") => ActionType::Url,
            Some("deep_link") | Some("deeplink") => ActionType::DeepLink,
            Some("close") => ActionType::Close,
            Some("navigate") => ActionType::Navigate,
            Some("purchase") => ActionType::Purchase,
            Some("restore") => ActionType::Restore,
            _ => ActionType::Unknown,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ActionType::Url => "url",
            ActionType::DeepLink => "deep_link",
            ActionType::Close => "close",
            ActionType::Navigate => "navigate",
            ActionType::Purchase => "purchase",
            ActionType::Restore => "restore",
            ActionType::Unknown => "unknown",
        }
    }

    /// Whether the tag is only executable with a non-empty `data` payload.
    pub fn requires_payload(self) -> bool {
        matches!(
            self,
            ActionType::Url | ActionType::DeepLink | ActionType::Navigate | ActionType::Purchase
        )
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Action / Command
// ---------------------------------------------------------------------------

/// A classified interaction: the tag plus whatever `data` payload came with it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    pub kind: ActionType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl Action {
    /// Build an action; an empty payload is stored as `None`.
    pub fn new(kind: ActionType, value: Option<String>) -> Self {
        Self {
            kind,
            value: value.filter(|v| !v.is_empty()),
        }
    }

    /// The executable form of this action, or `None` when it is `Unknown` or
    /// lacks a payload its tag requires.
    pub fn command(&self) -> Option<Command> {
        let payload = || self.value.clone();
        match self.kind {
            ActionType::Url | ActionType::DeepLink => payload().map(Command::OpenLink),
            ActionType::Close => Some(Command::Close),
            ActionType::Navigate => payload().map(Command::Navigate),
            ActionType::Purchase => payload().map(Command::Purchase),
            ActionType::Restore => Some(Command::Restore),
            ActionType::Unknown => None,
        }
    }
}

/// What the dispatcher actually does in response to an [`Action`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "command", content = "target", rename_all = "snake_case")]
pub enum Command {
    OpenLink(String),
    Close,
    Navigate(String),
    Purchase(String),
    Restore,
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// True when the URI addresses the engine (`automation` host, `qon-` scheme).
///
/// `raw` is the string `uri` was parsed from. `Url` lowercases the scheme, so
/// the scheme is matched against the raw text instead.
pub fn is_eligible(raw: &str, uri: &Url) -> bool {
    let raw_scheme = raw.split_once(':').map_or("", |(scheme, _)| scheme);
    uri.host_str() == Some(AUTOMATION_HOST) && scheme_re().is_match(raw_scheme)
}

/// Classify a reported interaction.
///
/// Returns `None` when the string is not an engine URI (including strings
/// that do not parse as URIs at all). An eligible URI always yields an
/// [`Action`], possibly `Unknown` or missing its payload.
pub fn parse(raw: &str) -> Option<Action> {
    let raw = raw.trim();
    let uri = Url::parse(raw).ok()?;
    if !is_eligible(raw, &uri) {
        return None;
    }
    let tag = query_param(&uri, ACTION_PARAM);
    let data = query_param(&uri, DATA_PARAM);
    Some(Action::new(ActionType::from_tag(tag.as_deref()), data))
}

/// First value of `name` in the query string, percent-decoded.
fn query_param(uri: &Url, name: &str) -> Option<String> {
    uri.query_pairs()
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.into_owned())
}
