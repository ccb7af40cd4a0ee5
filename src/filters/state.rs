//! Draft/applied filter state of a search tab.
//!
//! The draft mirrors the input controls; the applied set is what the backend
//! query is built from. Every operation returns the rewritten query string,
//! which the caller navigates to.

use serde::Serialize;

use crate::filters::codec::{self, QueryParams};
use crate::filters::{FilterSet, TabSchema};

#[derive(Debug, Clone, Serialize)]
pub struct SearchTabState<'a> {
    #[serde(skip)]
    schema: &'a TabSchema,
    draft: FilterSet,
    applied: FilterSet,
    page: usize,
}

impl<'a> SearchTabState<'a> {
    pub fn new(schema: &'a TabSchema) -> Self {
        Self {
            schema,
            draft: FilterSet::new(),
            applied: FilterSet::new(),
            page: 1,
        }
    }

    /// State restored from the URL with the default codec callbacks.
    pub fn from_url(schema: &'a TabSchema, url: &QueryParams) -> Self {
        let mut state = Self::new(schema);
        state.restore_from_url(
            url,
            |applied| schema.draft_from_applied(applied),
            |applied| applied.clone(),
        );
        state
    }

    pub fn schema(&self) -> &'a TabSchema {
        self.schema
    }

    pub fn draft(&self) -> &FilterSet {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut FilterSet {
        &mut self.draft
    }

    pub fn applied(&self) -> &FilterSet {
        &self.applied
    }

    pub fn page(&self) -> usize {
        self.page
    }

    /// Commits the filters computed from the draft, resets the page to 1 and
    /// returns the rewritten URL.
    pub fn apply_filters<F>(&mut self, build_filters: F, url: &QueryParams) -> QueryParams
    where
        F: FnOnce(&FilterSet) -> FilterSet,
    {
        self.page = 1;
        self.applied = build_filters(&self.draft);
        codec::encode(self.schema, self.page, &self.applied, url, true)
    }

    /// Blanks the draft through `reset_filters`, applies `empty_filters` and
    /// drops every key of this tab from the URL.
    pub fn clear_filters<R>(
        &mut self,
        reset_filters: R,
        empty_filters: FilterSet,
        url: &QueryParams,
    ) -> QueryParams
    where
        R: FnOnce(&mut FilterSet),
    {
        reset_filters(&mut self.draft);
        self.applied = empty_filters;
        self.page = 1;
        codec::encode(self.schema, self.page, &self.applied, url, false)
    }

    /// Moves to `page`. The URL filters are recomputed from the draft, which
    /// mirrors the applied set at this point; the applied set is untouched.
    pub fn navigate_to_page<F>(
        &mut self,
        page: usize,
        build_filters: F,
        url: &QueryParams,
    ) -> QueryParams
    where
        F: FnOnce(&FilterSet) -> FilterSet,
    {
        self.page = page.max(1);
        let filters = build_filters(&self.draft);
        codec::encode(self.schema, self.page, &filters, url, true)
    }

    /// Loads the page and filters encoded in `url`.
    ///
    /// `restore_filters` produces the draft control values; the applied set
    /// is built straight from the URL values by `build_applied_filters`, so the
    /// first backend query always matches the URL.
    pub fn restore_from_url<R, B>(
        &mut self,
        url: &QueryParams,
        restore_filters: R,
        build_applied_filters: B,
    ) where
        R: FnOnce(&FilterSet) -> FilterSet,
        B: FnOnce(&FilterSet) -> FilterSet,
    {
        let (page, from_url) = codec::decode(self.schema, url);
        self.draft = restore_filters(&from_url);
        self.applied = build_applied_filters(&from_url);
        self.page = page;
    }

    /// [`Self::apply_filters`] with the schema's draft-to-applied mapping.
    pub fn apply(&mut self, url: &QueryParams) -> QueryParams {
        let schema = self.schema;
        self.apply_filters(|draft| schema.build_filters(draft), url)
    }

    /// [`Self::clear_filters`] blanking every draft control.
    pub fn clear(&mut self, url: &QueryParams) -> QueryParams {
        let empty = self.schema.empty_filters();
        self.clear_filters(|draft| *draft = FilterSet::new(), empty, url)
    }

    /// [`Self::navigate_to_page`] with the schema's draft-to-applied mapping.
    pub fn go_to_page(&mut self, page: usize, url: &QueryParams) -> QueryParams {
        let schema = self.schema;
        self.navigate_to_page(page, |draft| schema.build_filters(draft), url)
    }

    /// Backend query parameters derived from the applied set.
    pub fn backend_params(&self) -> Vec<(String, String)> {
        self.applied.to_pairs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::tabs::{APPOINTMENTS, CLIENTS, REPORTS};

    #[test]
    fn apply_resets_page_to_one() {
        let url = QueryParams::parse("tab=3&report_page=3&reports_status=DONE");
        let mut state = SearchTabState::from_url(&REPORTS, &url);
        assert_eq!(state.page(), 3);

        state.draft_mut().set("due_date_start", "2024-01-01");
        state.draft_mut().set("status", "1");
        let next = state.apply(&url);

        assert_eq!(state.page(), 1);
        assert_eq!(next.get("report_page"), Some("1"));
        assert_eq!(next.get("reports_due_date_start"), Some("2024-01-01"));
        assert_eq!(next.get("reports_status"), Some("PENDING"));
        assert_eq!(
            state.backend_params(),
            vec![
                ("due_date_start".to_string(), "2024-01-01".to_string()),
                ("status".to_string(), "PENDING".to_string()),
            ]
        );
    }

    #[test]
    fn apply_removes_filters_no_longer_set() {
        let url = QueryParams::parse("clients_name=Old&clients_city=Natal");
        let mut state = SearchTabState::from_url(&CLIENTS, &url);
        state.draft_mut().set("name", "");
        let next = state.apply(&url);
        assert_eq!(next.get("clients_name"), None);
        assert_eq!(next.get("clients_city"), Some("Natal"));
    }

    #[test]
    fn draft_edits_do_not_touch_applied_filters() {
        let url = QueryParams::parse("clients_name=Santa");
        let mut state = SearchTabState::from_url(&CLIENTS, &url);
        state.draft_mut().set("name", "Santa Ca");
        assert_eq!(state.applied().get("name"), Some("Santa"));
        assert_eq!(state.backend_params()[0].1, "Santa");
    }

    #[test]
    fn clear_keeps_unrelated_params_but_closes_modal() {
        let url = QueryParams::parse(
            "tab=0&clients_name=Santa&utm_source=newsletter&modal=edit_client&modal_id=7",
        );
        let mut state = SearchTabState::from_url(&CLIENTS, &url);
        let next = state.clear(&url);
        assert_eq!(next.get("clients_name"), None);
        assert_eq!(next.get("utm_source"), Some("newsletter"));
        assert_eq!(next.get("modal"), None);
        assert_eq!(next.get("modal_id"), None);
    }

    #[test]
    fn clear_removes_only_own_tab_keys() {
        let url = QueryParams::parse(
            "tab=2&view=calendar&appointments_status=C&appointments_client_name=X&appointment_page=4&clients_city=Natal&client_page=2",
        );
        let mut state = SearchTabState::from_url(&APPOINTMENTS, &url);
        let mut reset_called = false;
        let next = state.clear_filters(
            |draft| {
                reset_called = true;
                *draft = FilterSet::new();
            },
            APPOINTMENTS.empty_filters(),
            &url,
        );

        assert!(reset_called);
        assert!(state.draft().is_empty());
        assert!(state.applied().is_empty());
        assert_eq!(state.page(), 1);
        assert!(!next.iter().any(|(key, _)| APPOINTMENTS.owns(key)));
        assert_eq!(next.get("view"), Some("calendar"));
        assert_eq!(next.get("clients_city"), Some("Natal"));
        assert_eq!(next.get("client_page"), Some("2"));
    }

    #[test]
    fn navigate_keeps_applied_and_writes_page() {
        let url = QueryParams::parse("tab=0&clients_status=A");
        let mut state = SearchTabState::from_url(&CLIENTS, &url);
        let next = state.go_to_page(5, &url);
        assert_eq!(state.page(), 5);
        assert_eq!(state.applied().get("status"), Some("A"));
        assert_eq!(next.get("client_page"), Some("5"));
        assert_eq!(next.get("clients_status"), Some("A"));
    }

    #[test]
    fn restore_builds_draft_and_applied_from_url() {
        let url = QueryParams::parse("reports_status=OVERDUE&reports_unit_city=Recife&report_page=2");
        let mut state = SearchTabState::new(&REPORTS);
        state.restore_from_url(
            &url,
            |applied| REPORTS.draft_from_applied(applied),
            |applied| applied.clone(),
        );
        assert_eq!(state.page(), 2);
        assert_eq!(state.draft().get("status"), Some("2"));
        assert_eq!(state.applied().get("status"), Some("OVERDUE"));
        assert_eq!(state.applied().get("unit_city"), Some("Recife"));
    }
}
