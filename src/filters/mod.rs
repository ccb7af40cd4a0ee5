//! Search tab state: filter vocabularies, the URL codec and the
//! draft/applied filter state machine shared by every searchable list.

use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;

use crate::permissions::Resource;

pub mod codec;
pub mod state;
pub mod tabs;

/// Errors raised while decoding URL filter values.
///
/// These never reach the user: the offending value is logged and treated as
/// "no filter".
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FilterError {
    #[error("unknown option `{value}` for filter `{field}`")]
    UnknownOption { field: String, value: String },

    #[error("invalid date `{value}` for filter `{field}`")]
    InvalidDate { field: String, value: String },

    #[error("invalid page number `{0}`")]
    InvalidPage(String),
}

/// Mapping from filter key to value. Empty values are never stored, so an
/// absent key and an empty control mean the same thing.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct FilterSet(BTreeMap<String, String>);

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores the trimmed value, or removes the key when it is blank.
    pub fn set(&mut self, key: impl Into<String>, value: impl AsRef<str>) {
        let key = key.into();
        let value = value.as_ref().trim();
        if value.is_empty() {
            self.0.remove(&key);
        } else {
            self.0.insert(key, value.to_string());
        }
    }

    /// Builder-style [`FilterSet::set`].
    pub fn with(mut self, key: impl Into<String>, value: impl AsRef<str>) -> Self {
        self.set(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Value of `key`, or the empty string when unset.
    pub fn value(&self, key: &str) -> &str {
        self.get(key).unwrap_or("")
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Pairs ready to be sent to the backend as query parameters.
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        self.0
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

impl<K: Into<String>, V: AsRef<str>> FromIterator<(K, V)> for FilterSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut set = FilterSet::new();
        for (key, value) in iter {
            set.set(key, value);
        }
        set
    }
}

/// One entry of a select-box option table. Id 0 is reserved for "All".
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct FilterOption {
    pub id: u32,
    pub value: &'static str,
    pub label: &'static str,
}

impl FilterOption {
    pub const fn new(id: u32, value: &'static str, label: &'static str) -> Self {
        Self { id, value, label }
    }
}

pub const ALL_OPTION_LABEL: &str = "Todos";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "options", rename_all = "snake_case")]
pub enum FieldKind {
    /// Free text, sent verbatim.
    Text,
    /// ISO `YYYY-MM-DD` date.
    Date,
    /// Select box backed by an option table.
    Choice(&'static [FilterOption]),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct FilterField {
    pub key: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
}

impl FilterField {
    pub const fn text(key: &'static str, label: &'static str) -> Self {
        Self {
            key,
            label,
            kind: FieldKind::Text,
        }
    }

    pub const fn date(key: &'static str, label: &'static str) -> Self {
        Self {
            key,
            label,
            kind: FieldKind::Date,
        }
    }

    pub const fn choice(
        key: &'static str,
        label: &'static str,
        options: &'static [FilterOption],
    ) -> Self {
        Self {
            key,
            label,
            kind: FieldKind::Choice(options),
        }
    }

    /// Backend value for a select-box option id. `0` and unknown ids map to
    /// `None` ("All").
    pub fn option_value(&self, id: u32) -> Option<&'static str> {
        match self.kind {
            FieldKind::Choice(options) => options.iter().find(|o| o.id == id).map(|o| o.value),
            _ => None,
        }
    }

    /// Select-box option id for a backend value, `0` when not in the table.
    pub fn option_id(&self, value: &str) -> u32 {
        match self.kind {
            FieldKind::Choice(options) => options
                .iter()
                .find(|o| o.value == value)
                .map_or(0, |o| o.id),
            _ => 0,
        }
    }
}

/// Which entity a search tab lists.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TabKind {
    Clients,
    Proposals,
    Appointments,
    Reports,
    Equipments,
    Users,
    Materials,
}

/// Filter vocabulary and URL layout of a single search tab.
#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct TabSchema {
    pub kind: TabKind,
    /// Prefix of every filter key in the URL (`{prefix}_{key}`).
    pub prefix: &'static str,
    /// URL key holding the tab's page cursor.
    pub page_key: &'static str,
    /// Position on the multi-tab search page; `None` for standalone pages.
    pub index: Option<usize>,
    pub title: &'static str,
    /// Backend list endpoint.
    pub endpoint: &'static str,
    pub resource: Resource,
    pub fields: &'static [FilterField],
}

impl TabSchema {
    pub fn field(&self, key: &str) -> Option<&FilterField> {
        self.fields.iter().find(|f| f.key == key)
    }

    /// URL key of a filter field.
    pub fn url_key(&self, key: &str) -> String {
        format!("{}_{}", self.prefix, key)
    }

    /// Whether a URL key belongs to this tab (a prefixed filter or the page key).
    pub fn owns(&self, url_key: &str) -> bool {
        url_key == self.page_key
            || url_key
                .strip_prefix(self.prefix)
                .is_some_and(|rest| rest.starts_with('_'))
    }

    /// Converts draft control values into the applied filter set: option ids
    /// become backend values, blanks and "All" are dropped.
    pub fn build_filters(&self, draft: &FilterSet) -> FilterSet {
        let mut applied = FilterSet::new();
        for field in self.fields {
            let raw = draft.value(field.key);
            let value = match field.kind {
                FieldKind::Choice(_) => raw
                    .parse::<u32>()
                    .ok()
                    .and_then(|id| field.option_value(id))
                    .unwrap_or(""),
                FieldKind::Text | FieldKind::Date => raw,
            };
            applied.set(field.key, value);
        }
        applied
    }

    /// Converts applied values back into draft control values.
    pub fn draft_from_applied(&self, applied: &FilterSet) -> FilterSet {
        let mut draft = FilterSet::new();
        for field in self.fields {
            let Some(value) = applied.get(field.key) else {
                continue;
            };
            match field.kind {
                FieldKind::Choice(_) => {
                    let id = field.option_id(value);
                    if id != 0 {
                        draft.set(field.key, id.to_string());
                    }
                }
                FieldKind::Text | FieldKind::Date => draft.set(field.key, value),
            }
        }
        draft
    }

    /// A filter set with every field unset.
    pub fn empty_filters(&self) -> FilterSet {
        FilterSet::new()
    }
}
