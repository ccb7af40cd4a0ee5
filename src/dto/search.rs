//! View models of the search and materials pages.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::Serialize;

use crate::domain::appointment::Appointment;
use crate::domain::client::Client;
use crate::domain::equipment::Equipment;
use crate::domain::material::Material;
use crate::domain::proposal::Proposal;
use crate::domain::report::Report;
use crate::domain::unit::Unit;
use crate::domain::user::User;
use crate::filters::codec::QueryParams;
use crate::filters::state::SearchTabState;
use crate::filters::tabs::VIEW_KEY;
use crate::filters::{FieldKind, FilterOption, FilterSet, TabSchema};
use crate::modal::{MODAL_ID_KEY, MODAL_KEY, ModalState};
use crate::pagination::Paginated;

/// Entry of the tab strip on the search page.
#[derive(Debug, Serialize)]
pub struct TabLink {
    pub index: usize,
    pub title: &'static str,
    pub active: bool,
    pub url: String,
}

/// Input control of a filter field, pre-filled with the draft value.
#[derive(Debug, Serialize)]
pub struct FilterControl {
    pub key: &'static str,
    pub label: &'static str,
    /// `text`, `date` or `choice`.
    pub input: &'static str,
    pub value: String,
    pub options: &'static [FilterOption],
}

impl FilterControl {
    pub fn for_schema(schema: &TabSchema, draft: &FilterSet) -> Vec<Self> {
        schema
            .fields
            .iter()
            .map(|field| {
                let (input, options): (_, &'static [FilterOption]) = match field.kind {
                    FieldKind::Text => ("text", &[]),
                    FieldKind::Date => ("date", &[]),
                    FieldKind::Choice(options) => ("choice", options),
                };
                let value = match field.kind {
                    FieldKind::Choice(_) => draft.get(field.key).unwrap_or("0").to_string(),
                    _ => draft.value(field.key).to_string(),
                };
                FilterControl {
                    key: field.key,
                    label: field.label,
                    input,
                    value,
                    options,
                }
            })
            .collect()
    }
}

#[derive(Debug, Serialize)]
pub struct ClientRow {
    pub client: Client,
    pub cnpj: String,
    /// Change requests under review for the client, its units and equipment.
    pub pending_operations: usize,
}

/// Current page of whichever entity the active tab lists.
#[derive(Debug, Serialize)]
#[serde(tag = "kind", content = "rows", rename_all = "snake_case")]
pub enum TabRows {
    Clients(Paginated<ClientRow>),
    Proposals(Paginated<Proposal>),
    Appointments(Paginated<Appointment>),
    Reports(Paginated<Report>),
    Equipments(Paginated<Equipment>),
    Users(Paginated<User>),
    Materials(Paginated<Material>),
}

/// Everything needed to render one search tab.
#[derive(Debug, Serialize)]
pub struct TabView {
    pub prefix: &'static str,
    pub title: &'static str,
    pub index: Option<usize>,
    pub controls: Vec<FilterControl>,
    pub applied: FilterSet,
    pub page: usize,
    /// `None` when the backend request failed; see `error`.
    pub rows: Option<TabRows>,
    pub error: Option<String>,
    /// The current URL, reloaded by the retry link.
    pub retry_url: String,
    /// Query string posted back by the apply, clear and page forms.
    pub current_query: String,
}

impl TabView {
    pub fn new(state: &SearchTabState<'_>, url: &QueryParams, path: &str) -> Self {
        let schema = state.schema();
        Self {
            prefix: schema.prefix,
            title: schema.title,
            index: schema.index,
            controls: FilterControl::for_schema(schema, state.draft()),
            applied: state.applied().clone(),
            page: state.page(),
            rows: None,
            error: None,
            retry_url: url.to_url(path),
            current_query: url.to_query_string(),
        }
    }
}

/// Prefix for links opening a modal: the current URL without any modal,
/// ending in `?` or `&`.
pub fn modal_base_url(url: &QueryParams, path: &str) -> String {
    let mut params = url.clone();
    params.remove(MODAL_KEY);
    params.remove(MODAL_ID_KEY);
    let separator = if params.is_empty() { '?' } else { '&' };
    format!("{}{separator}", params.to_url(path))
}

/// The current URL with the modal closed.
pub fn modal_close_url(url: &QueryParams, path: &str) -> String {
    let mut params = url.clone();
    ModalState::None.write_params(&mut params);
    params.to_url(path)
}

/// Layout of the appointments tab, selected by the `view` parameter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentsView {
    #[default]
    List,
    Calendar,
}

impl AppointmentsView {
    /// Anything other than `calendar` shows the list.
    pub fn from_params(url: &QueryParams) -> Self {
        match url.get(VIEW_KEY).map(str::trim) {
            Some("calendar") => AppointmentsView::Calendar,
            _ => AppointmentsView::List,
        }
    }

    pub const fn code(self) -> &'static str {
        match self {
            AppointmentsView::List => "list",
            AppointmentsView::Calendar => "calendar",
        }
    }
}

/// The current URL switched to `view`, keeping every filter and page but
/// closing any modal.
pub fn view_url(url: &QueryParams, path: &str, view: AppointmentsView) -> String {
    let mut params = url.clone();
    ModalState::None.write_params(&mut params);
    params.set(VIEW_KEY, view.code());
    params.to_url(path)
}

/// Appointments of one date in the calendar layout.
#[derive(Debug, Serialize)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub weekday: &'static str,
    pub appointments: Vec<Appointment>,
}

fn weekday_label(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Segunda-feira",
        Weekday::Tue => "Terça-feira",
        Weekday::Wed => "Quarta-feira",
        Weekday::Thu => "Quinta-feira",
        Weekday::Fri => "Sexta-feira",
        Weekday::Sat => "Sábado",
        Weekday::Sun => "Domingo",
    }
}

/// Groups appointments by date, earliest first. Order within a day follows
/// the backend.
pub fn calendar_days(appointments: &[Appointment]) -> Vec<CalendarDay> {
    let mut days: BTreeMap<NaiveDate, Vec<Appointment>> = BTreeMap::new();
    for appointment in appointments {
        days.entry(appointment.date)
            .or_default()
            .push(appointment.clone());
    }
    days.into_iter()
        .map(|(date, appointments)| CalendarDay {
            date,
            weekday: weekday_label(date.weekday()),
            appointments,
        })
        .collect()
}

/// Data required to render the search page.
#[derive(Debug, Serialize)]
pub struct SearchPageData {
    pub tabs: Vec<TabLink>,
    pub active: TabView,
    pub view: AppointmentsView,
    pub list_view_url: String,
    pub calendar_view_url: String,
    /// Appointments grouped by date; empty unless the calendar is shown.
    pub calendar: Vec<CalendarDay>,
    pub modal: ModalState,
    /// User edited by an open `edit_user` modal.
    pub modal_user: Option<User>,
    /// Units offered by an open `create_appointment` modal.
    pub modal_units: Vec<Unit>,
    pub modal_base_url: String,
    pub modal_close_url: String,
}

/// Data required to render the materials page.
#[derive(Debug, Serialize)]
pub struct MaterialsPageData {
    pub active: TabView,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::tabs::REPORTS;

    #[test]
    fn controls_carry_draft_values() {
        let draft = FilterSet::new().with("status", "2").with("unit_city", "Natal");
        let controls = FilterControl::for_schema(&REPORTS, &draft);
        let status = controls.iter().find(|c| c.key == "status").unwrap();
        let due = controls.iter().find(|c| c.key == "due_date_start").unwrap();
        assert_eq!((status.input, status.value.as_str()), ("choice", "2"));
        assert_eq!((due.input, due.value.as_str()), ("date", ""));
        assert_eq!(status.options.len(), 3);
    }

    fn appointment(id: i32, date: &str) -> Appointment {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "date": date,
            "status": "C",
            "type": "O",
            "unit": 1,
            "service_order": null,
            "justification": null,
        }))
        .unwrap()
    }

    #[test]
    fn view_defaults_to_list() {
        assert_eq!(
            AppointmentsView::from_params(&QueryParams::parse("tab=2")),
            AppointmentsView::List
        );
        assert_eq!(
            AppointmentsView::from_params(&QueryParams::parse("view=agenda")),
            AppointmentsView::List
        );
        assert_eq!(
            AppointmentsView::from_params(&QueryParams::parse("view=calendar")),
            AppointmentsView::Calendar
        );
    }

    #[test]
    fn view_url_keeps_filters_and_page() {
        let url = QueryParams::parse(
            "tab=2&appointments_status=P&appointment_page=3&modal=create_appointment",
        );
        let next = view_url(&url, "/search", AppointmentsView::Calendar);
        let params = QueryParams::parse(next.trim_start_matches("/search?"));
        assert_eq!(params.get("view"), Some("calendar"));
        assert_eq!(params.get("appointments_status"), Some("P"));
        assert_eq!(params.get("appointment_page"), Some("3"));
        assert_eq!(params.get("modal"), None);

        let back = view_url(&params, "/search", AppointmentsView::List);
        assert!(back.contains("view=list"));
        assert!(back.contains("appointments_status=P"));
    }

    #[test]
    fn calendar_groups_by_date_in_order() {
        let days = calendar_days(&[
            appointment(1, "2024-03-06"),
            appointment(2, "2024-03-04"),
            appointment(3, "2024-03-06"),
        ]);
        assert_eq!(days.len(), 2);
        assert_eq!(days[0].date.to_string(), "2024-03-04");
        assert_eq!(days[0].weekday, "Segunda-feira");
        assert_eq!(
            days[1]
                .appointments
                .iter()
                .map(|a| a.id.get())
                .collect::<Vec<_>>(),
            vec![1, 3]
        );
    }

    #[test]
    fn modal_urls_strip_open_modal() {
        let url = QueryParams::parse("tab=5&modal=edit_user&modal_id=3");
        assert_eq!(modal_base_url(&url, "/search"), "/search?tab=5&");
        assert_eq!(modal_close_url(&url, "/search"), "/search?tab=5");
        assert_eq!(modal_base_url(&QueryParams::new(), "/search"), "/search?");
    }
}
