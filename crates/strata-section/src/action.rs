//! Actions and action creators.
//!
//! An action type reads `<path><marker><title> [ <keys> ]`. Only the
//! `<path><marker>` prefix carries meaning; the rest is a label for humans
//! and tooling.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use strata_types::{Patch, PatchEntry};

use crate::path::{SectionPath, REPLACE_MARK, UPDATE_MARK};
use crate::section::SectionDescriptor;

/// The two kinds of action a section understands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    /// Payload is merged into the section recursively.
    Update,
    /// Payload overwrites top-level keys of the section.
    Replace,
}

impl ActionKind {
    /// The marker placed between the path and the title.
    pub fn marker(self) -> &'static str {
        match self {
            Self::Update => UPDATE_MARK,
            Self::Replace => REPLACE_MARK,
        }
    }
}

/// How a given section should handle an action, decoded from its type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Dispatch {
    Update,
    Replace,
    Unrecognized,
}

impl Dispatch {
    /// Decode the action type once, relative to the section at `path`.
    pub fn decode(path: &SectionPath, action_type: &str) -> Self {
        let Some(rest) = action_type.strip_prefix(path.as_str()) else {
            return Self::Unrecognized;
        };
        if rest.starts_with(UPDATE_MARK) {
            Self::Update
        } else if rest.starts_with(REPLACE_MARK) {
            Self::Replace
        } else {
            Self::Unrecognized
        }
    }
}

impl From<ActionKind> for Dispatch {
    fn from(kind: ActionKind) -> Self {
        match kind {
            ActionKind::Update => Self::Update,
            ActionKind::Replace => Self::Replace,
        }
    }
}

/// A `{type, payload}` record handed to the external dispatcher.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Action {
    #[serde(rename = "type")]
    pub action_type: String,
    pub payload: Patch,
}

impl Action {
    pub fn new(action_type: impl Into<String>, payload: Patch) -> Self {
        Self {
            action_type: action_type.into(),
            payload,
        }
    }
}

/// Format an action type from its parts.
pub fn format_action_type(path: &SectionPath, kind: ActionKind, title: &str, change: &Patch) -> String {
    let keys = change.keys().collect::<Vec<_>>().join(",");
    let label = format!("{title} [ {keys} ]");
    format!("{path}{}{}", kind.marker(), label.trim())
}

/// Builds actions of one kind for one section.
#[derive(Clone, Debug)]
pub struct ActionCreator {
    descriptor: Arc<SectionDescriptor>,
    kind: ActionKind,
}

impl ActionCreator {
    pub fn new(descriptor: Arc<SectionDescriptor>, kind: ActionKind) -> Self {
        Self { descriptor, kind }
    }

    pub fn kind(&self) -> ActionKind {
        self.kind
    }

    /// Build an untitled action for `change`.
    pub fn create(&self, change: Patch) -> Action {
        self.titled(change, "")
    }

    /// Build an action for `change` with a human-readable title.
    ///
    /// Update payloads are `change` as given, absent markers included.
    /// Replace payloads resolve every absent marker against the section
    /// default at creation time, so the reducer never sees a marker for a key
    /// the default defines.
    pub fn titled(&self, change: Patch, title: &str) -> Action {
        let action_type = format_action_type(self.descriptor.path(), self.kind, title, &change);
        let payload = match self.kind {
            ActionKind::Update => change,
            ActionKind::Replace => self.resolve_defaults(change),
        };
        Action {
            action_type,
            payload,
        }
    }

    fn resolve_defaults(&self, change: Patch) -> Patch {
        let defaults = self.descriptor.default_value();
        change
            .iter()
            .map(|(key, entry)| {
                let resolved = match entry {
                    PatchEntry::Absent => PatchEntry::from(defaults.get(key).cloned()),
                    other => other.clone(),
                };
                (key.clone(), resolved)
            })
            .collect()
    }
}
