use std::collections::HashMap;

use crate::filters::tabs::TAB_KEY;
use crate::filters::{FilterSet, TabSchema};

/// Hidden field carrying the query string of the page the form was posted from.
pub const CURRENT_QUERY_KEY: &str = "current_query";
pub const PAGE_KEY: &str = "page";

/// Apply, clear and page actions of a search tab.
///
/// Posted as a flat urlencoded form: the reserved keys `tab`,
/// `current_query` and `page`, plus one entry per filter control keyed by the
/// unprefixed field key.
#[derive(Debug, Default, Clone)]
pub struct TabActionForm {
    pub tab: Option<usize>,
    pub current_query: String,
    pub page: Option<usize>,
    pub values: HashMap<String, String>,
}

impl From<HashMap<String, String>> for TabActionForm {
    fn from(mut values: HashMap<String, String>) -> Self {
        let tab = values
            .remove(TAB_KEY)
            .and_then(|raw| raw.trim().parse().ok());
        let current_query = values.remove(CURRENT_QUERY_KEY).unwrap_or_default();
        let page = values
            .remove(PAGE_KEY)
            .and_then(|raw| raw.trim().parse().ok());
        Self {
            tab,
            current_query,
            page,
            values,
        }
    }
}

impl TabActionForm {
    /// Draft control values for the fields of `schema`; anything else posted
    /// is ignored.
    pub fn draft_for(&self, schema: &TabSchema) -> FilterSet {
        schema
            .fields
            .iter()
            .filter_map(|field| {
                self.values
                    .get(field.key)
                    .map(|value| (field.key, value.as_str()))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::tabs::REPORTS;

    fn form(pairs: &[(&str, &str)]) -> TabActionForm {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<HashMap<_, _>>()
            .into()
    }

    #[test]
    fn reserved_keys_are_extracted() {
        let form = form(&[
            ("tab", "3"),
            ("current_query", "tab=3&report_page=2"),
            ("page", "4"),
            ("status", "1"),
        ]);
        assert_eq!(form.tab, Some(3));
        assert_eq!(form.page, Some(4));
        assert_eq!(form.current_query, "tab=3&report_page=2");
        assert!(!form.values.contains_key("tab"));
    }

    #[test]
    fn draft_keeps_only_schema_fields() {
        let form = form(&[("status", "2"), ("unit_city", " Natal "), ("bogus", "x")]);
        let draft = form.draft_for(&REPORTS);
        assert_eq!(draft.get("status"), Some("2"));
        assert_eq!(draft.get("unit_city"), Some("Natal"));
        assert_eq!(draft.get("bogus"), None);
    }

    #[test]
    fn malformed_reserved_values_are_dropped() {
        let form = form(&[("tab", "x"), ("page", "-1")]);
        assert_eq!(form.tab, None);
        assert_eq!(form.page, None);
    }
}
