//! Bidirectional mapping between a tab's (page, applied filters) and the
//! browser query string.

use chrono::NaiveDate;
use url::form_urlencoded;

use crate::filters::tabs::TAB_KEY;
use crate::filters::{FieldKind, FilterError, FilterField, FilterSet, TabSchema};
use crate::modal::{MODAL_ID_KEY, MODAL_KEY};

/// Ordered query string pairs. Later duplicates are ignored on lookup.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QueryParams(Vec<(String, String)>);

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a raw query string (without the leading `?`).
    pub fn parse(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        Self(
            form_urlencoded::parse(query.as_bytes())
                .map(|(k, v)| (k.into_owned(), v.into_owned()))
                .collect(),
        )
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Replaces every occurrence of `key` with a single pair.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        self.remove(&key);
        self.0.push((key, value.into()));
    }

    pub fn remove(&mut self, key: &str) {
        self.0.retain(|(k, _)| k != key);
    }

    pub fn retain(&mut self, mut keep: impl FnMut(&str) -> bool) {
        self.0.retain(|(k, _)| keep(k));
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.iter().any(|(k, _)| k == key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Serializes back to `a=1&b=2` form.
    pub fn to_query_string(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.0.iter())
            .finish()
    }

    /// `path` with the query string appended when non-empty.
    pub fn to_url(&self, path: &str) -> String {
        if self.0.is_empty() {
            path.to_string()
        } else {
            format!("{path}?{}", self.to_query_string())
        }
    }

    /// Pairs sorted by key then value, for order-insensitive comparisons.
    pub fn sorted(&self) -> Vec<(String, String)> {
        let mut pairs = self.0.clone();
        pairs.sort();
        pairs
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Validates a raw URL value for `field`.
///
/// Choice fields accept a known backend value or a known option id; dates must
/// be ISO formatted. Blank values decode to `Ok(None)`.
pub fn decode_value(field: &FilterField, raw: &str) -> Result<Option<String>, FilterError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    match field.kind {
        FieldKind::Text => Ok(Some(raw.to_string())),
        FieldKind::Date => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map(|date| Some(date.format("%Y-%m-%d").to_string()))
            .map_err(|_| FilterError::InvalidDate {
                field: field.key.to_string(),
                value: raw.to_string(),
            }),
        FieldKind::Choice(options) => {
            if let Some(option) = options.iter().find(|o| o.value == raw) {
                return Ok(Some(option.value.to_string()));
            }
            match raw.parse::<u32>() {
                Ok(0) => Ok(None),
                Ok(id) => field
                    .option_value(id)
                    .map(|value| Some(value.to_string()))
                    .ok_or_else(|| FilterError::UnknownOption {
                        field: field.key.to_string(),
                        value: raw.to_string(),
                    }),
                Err(_) => Err(FilterError::UnknownOption {
                    field: field.key.to_string(),
                    value: raw.to_string(),
                }),
            }
        }
    }
}

/// Reads the tab's prefixed keys into a filter set. Malformed values are
/// logged and treated as absent.
pub fn decode_filters(schema: &TabSchema, params: &QueryParams) -> FilterSet {
    let mut filters = FilterSet::new();
    for field in schema.fields {
        let Some(raw) = params.get(&schema.url_key(field.key)) else {
            continue;
        };
        match decode_value(field, raw) {
            Ok(Some(value)) => filters.set(field.key, value),
            Ok(None) => {}
            Err(err) => log::debug!("Ignoring {} filter: {err}", schema.prefix),
        }
    }
    filters
}

/// Reads the tab's page cursor. Missing, zero or malformed values yield 1;
/// out-of-range pages are passed through.
pub fn decode_page(schema: &TabSchema, params: &QueryParams) -> usize {
    let Some(raw) = params.get(schema.page_key) else {
        return 1;
    };
    match raw.trim().parse::<usize>() {
        Ok(page) if page > 0 => page,
        _ => {
            log::debug!("{}", FilterError::InvalidPage(raw.to_string()));
            1
        }
    }
}

/// Decodes `(page, applied filters)` for `schema`.
pub fn decode(schema: &TabSchema, params: &QueryParams) -> (usize, FilterSet) {
    (decode_page(schema, params), decode_filters(schema, params))
}

/// Whether `key` survives a rewrite of `schema`'s state.
fn is_carried_over(schema: &TabSchema, key: &str) -> bool {
    if schema.owns(key) {
        return false;
    }
    if key == MODAL_KEY || key == MODAL_ID_KEY {
        return false;
    }
    if key == TAB_KEY {
        return schema.index.is_none();
    }
    true
}

/// Rewrites `existing` so it reflects `page` and `filters` on `schema`.
///
/// Every key not owned by this tab is copied through, except an open modal,
/// which is closed. Stale keys of this tab are dropped. The page key is
/// written when `page > 1` or when `force_page` is set, and the `tab`
/// indicator is written for tabs living on the multi-tab search page.
pub fn encode(
    schema: &TabSchema,
    page: usize,
    filters: &FilterSet,
    existing: &QueryParams,
    force_page: bool,
) -> QueryParams {
    let mut params = existing.clone();
    params.retain(|key| is_carried_over(schema, key));

    if let Some(index) = schema.index {
        params.set(TAB_KEY, index.to_string());
    }
    for field in schema.fields {
        if let Some(value) = filters.get(field.key) {
            params.set(schema.url_key(field.key), value);
        }
    }
    if page > 1 || force_page {
        params.set(schema.page_key, page.max(1).to_string());
    }
    params
}

/// Switches the search page to `target`, resetting its page cursor while
/// keeping every tab's filters.
pub fn switch_tab(target: &TabSchema, existing: &QueryParams) -> QueryParams {
    let (_, filters) = decode(target, existing);
    encode(target, 1, &filters, existing, false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::tabs::{
        ALL_TABS, APPOINTMENTS, CLIENTS, MATERIALS, PROPOSALS, REPORTS, VIEW_KEY,
    };

    #[test]
    fn round_trip_restores_page_and_filters() {
        let filters = FilterSet::new()
            .with("status", "OVERDUE")
            .with("due_date_start", "2024-01-01")
            .with("client_name", "Hospital & Maternidade")
            .with("responsible_cpf", "12345678909");

        for page in [1, 2, 17] {
            let params = encode(&REPORTS, page, &filters, &QueryParams::new(), false);
            let reparsed = QueryParams::parse(&params.to_query_string());
            assert_eq!(decode(&REPORTS, &reparsed), (page, filters.clone()));
        }
    }

    fn sample_values(field: &FilterField) -> Vec<&'static str> {
        match field.kind {
            FieldKind::Text => vec!["Hospital & Maternidade São José", "12.345/0001-90"],
            FieldKind::Date => vec!["2024-01-31", "1999-12-01"],
            FieldKind::Choice(options) => options.iter().map(|option| option.value).collect(),
        }
    }

    #[test]
    fn round_trip_holds_for_every_tab_field_and_option() {
        for tab in ALL_TABS {
            let mut combined = FilterSet::new();
            let mut cases = Vec::new();
            for field in tab.fields {
                let values = sample_values(field);
                if let Some(first) = values.first() {
                    combined.set(field.key, first);
                }
                cases.extend(
                    values
                        .into_iter()
                        .map(|value| FilterSet::new().with(field.key, value)),
                );
            }
            cases.push(combined);
            cases.push(FilterSet::new());

            for filters in &cases {
                for page in [1, 2, 250] {
                    let params = encode(tab, page, filters, &QueryParams::new(), false);
                    let reparsed = QueryParams::parse(&params.to_query_string());
                    assert_eq!(
                        decode(tab, &reparsed),
                        (page, filters.clone()),
                        "{} tab, page {page}, {filters:?}",
                        tab.prefix
                    );
                }
            }
        }
    }

    #[test]
    fn encode_of_decode_is_idempotent() {
        let raw = QueryParams::parse(
            "tab=0&clients_name=Santa%20Casa&clients_status=2&client_page=3&reports_status=DONE&view=calendar",
        );
        let (page, filters) = decode(&CLIENTS, &raw);
        let once = encode(&CLIENTS, page, &filters, &raw, false);
        let (page_again, filters_again) = decode(&CLIENTS, &once);
        let twice = encode(&CLIENTS, page_again, &filters_again, &once, false);
        assert_eq!(once.sorted(), twice.sorted());
        assert_eq!(once.get("clients_status"), Some("I"));
    }

    #[test]
    fn unknown_option_id_decodes_to_all() {
        let params = QueryParams::parse("proposals_status=42&proposals_contract_type=Z&proposals_cnpj=123");
        let filters = decode_filters(&PROPOSALS, &params);
        assert_eq!(filters.get("status"), None);
        assert_eq!(filters.get("contract_type"), None);
        assert_eq!(filters.get("cnpj"), Some("123"));
    }

    #[test]
    fn known_option_id_decodes_to_backend_value() {
        let params = QueryParams::parse("reports_status=2");
        assert_eq!(decode_filters(&REPORTS, &params).get("status"), Some("OVERDUE"));
    }

    #[test]
    fn malformed_dates_are_ignored() {
        let params =
            QueryParams::parse("appointments_date_start=2024-13-40&appointments_date_end=2024-02-29");
        let filters = decode_filters(&APPOINTMENTS, &params);
        assert_eq!(filters.get("date_start"), None);
        assert_eq!(filters.get("date_end"), Some("2024-02-29"));
    }

    #[test]
    fn page_defaults_to_one() {
        assert_eq!(decode_page(&CLIENTS, &QueryParams::parse("")), 1);
        assert_eq!(decode_page(&CLIENTS, &QueryParams::parse("client_page=0")), 1);
        assert_eq!(decode_page(&CLIENTS, &QueryParams::parse("client_page=abc")), 1);
        assert_eq!(decode_page(&CLIENTS, &QueryParams::parse("client_page=999")), 999);
    }

    #[test]
    fn encode_keeps_unrelated_keys_and_closes_modal() {
        let existing = QueryParams::parse(
            "view=calendar&clients_city=Natal&appointments_status=C&modal=edit_client&modal_id=4&appointments_unit_name=old&utm_source=mail",
        );
        let filters = FilterSet::new().with("status", "P");
        let params = encode(&APPOINTMENTS, 1, &filters, &existing, true);

        assert_eq!(params.get(VIEW_KEY), Some("calendar"));
        assert_eq!(params.get("clients_city"), Some("Natal"));
        assert_eq!(params.get("appointments_status"), Some("P"));
        assert_eq!(params.get("appointments_unit_name"), None);
        assert_eq!(params.get("appointment_page"), Some("1"));
        assert_eq!(params.get("tab"), Some("2"));
        assert_eq!(params.get("utm_source"), Some("mail"));
        assert!(!params.contains("modal"));
        assert!(!params.contains("modal_id"));
    }

    #[test]
    fn standalone_tab_writes_no_tab_indicator() {
        let filters = FilterSet::new().with("search", "lead");
        let params = encode(&MATERIALS, 2, &filters, &QueryParams::new(), false);
        assert!(!params.contains("tab"));
        assert_eq!(params.get("materials_search"), Some("lead"));
        assert_eq!(params.get("material_page"), Some("2"));
    }

    #[test]
    fn switch_tab_resets_target_page_only() {
        let existing =
            QueryParams::parse("tab=0&client_page=4&clients_name=X&report_page=3&reports_status=DONE");
        let params = switch_tab(&REPORTS, &existing);
        assert_eq!(params.get("tab"), Some("3"));
        assert_eq!(params.get("report_page"), None);
        assert_eq!(params.get("reports_status"), Some("DONE"));
        assert_eq!(params.get("client_page"), Some("4"));
        assert_eq!(params.get("clients_name"), Some("X"));
    }

    #[test]
    fn query_string_escapes_values() {
        let params: QueryParams = [("clients_name", "A&B = C")].into_iter().collect();
        let query = params.to_query_string();
        assert_eq!(QueryParams::parse(&query).get("clients_name"), Some("A&B = C"));
        assert_eq!(params.to_url("/search"), format!("/search?{query}"));
        assert_eq!(QueryParams::new().to_url("/search"), "/search");
    }
}
