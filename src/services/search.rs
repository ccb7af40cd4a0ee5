//! Multi-tab search page and the actions rewriting its URL.

use serde::de::DeserializeOwned;

use crate::backend::errors::BackendError;
use crate::backend::pagination::{fetch_all, fetch_page};
use crate::backend::{BackendApi, detail_path};
use crate::domain::client::Client;
use crate::domain::unit::Unit;
use crate::domain::user::User;
use crate::dto::search::{
    AppointmentsView, ClientRow, SearchPageData, TabLink, TabRows, TabView, calendar_days,
    modal_base_url, modal_close_url, view_url,
};
use crate::filters::codec::{self, QueryParams};
use crate::filters::state::SearchTabState;
use crate::filters::tabs::{TAB_KEY, search_tab};
use crate::filters::{FilterSet, TabKind, TabSchema};
use crate::forms::search::TabActionForm;
use crate::modal::ModalState;
use crate::models::auth::AuthenticatedUser;
use crate::pagination::Paginated;
use crate::permissions::{Action, search_tabs_for};
use crate::services::operations::pending_by_client;
use crate::services::{ServiceError, ServiceResult, ensure_permission};

pub const SEARCH_PATH: &str = "/search";

/// What a posted tab form asks for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TabAction {
    Apply,
    Clear,
    Page(usize),
}

/// Applies `action` to the state of `schema` restored from `url` and returns
/// the rewritten URL. `draft` holds the posted control values and is only
/// used by [`TabAction::Apply`].
pub fn run_tab_action(
    schema: &TabSchema,
    action: TabAction,
    draft: FilterSet,
    url: &QueryParams,
) -> QueryParams {
    let mut state = SearchTabState::from_url(schema, url);
    match action {
        TabAction::Apply => {
            *state.draft_mut() = draft;
            state.apply(url)
        }
        TabAction::Clear => state.clear(url),
        TabAction::Page(page) => state.go_to_page(page, url),
    }
}

/// Resolves the posted tab to a search tab the user may view.
fn posted_tab(
    user: &AuthenticatedUser,
    form: &TabActionForm,
) -> ServiceResult<&'static TabSchema> {
    let schema = form
        .tab
        .and_then(search_tab)
        .ok_or_else(|| ServiceError::Form("Aba de busca inválida".to_string()))?;
    ensure_permission(user, schema.resource, Action::View)?;
    Ok(schema)
}

/// Handles the apply, clear and page forms of the search page, returning the
/// URL to redirect to.
pub fn search_tab_action(
    user: &AuthenticatedUser,
    form: TabActionForm,
    action: TabAction,
) -> ServiceResult<String> {
    let schema = posted_tab(user, &form)?;
    let url = QueryParams::parse(&form.current_query);
    let draft = form.draft_for(schema);
    let next = run_tab_action(schema, action, draft, &url);
    log::debug!("{action:?} on {} tab: {}", schema.prefix, next.to_query_string());
    Ok(next.to_url(SEARCH_PATH))
}

/// URL of the search page showing tab `index`, keeping every tab's filters.
pub fn switch_search_tab(
    user: &AuthenticatedUser,
    index: usize,
    url: &QueryParams,
) -> ServiceResult<String> {
    let schema = search_tab(index).ok_or(ServiceError::NotFound)?;
    ensure_permission(user, schema.resource, Action::View)?;
    Ok(codec::switch_tab(schema, url).to_url(SEARCH_PATH))
}

/// The search page at `current_query` with any dialog closed.
pub fn back_to_search(current_query: &str) -> String {
    modal_close_url(&QueryParams::parse(current_query), SEARCH_PATH)
}

async fn fetch_paginated<B, T>(
    api: &B,
    schema: &TabSchema,
    state: &SearchTabState<'_>,
) -> Result<Paginated<T>, BackendError>
where
    B: BackendApi + ?Sized,
    T: DeserializeOwned,
{
    let page = fetch_page(api, schema.endpoint, state.page(), &state.backend_params()).await?;
    Ok(Paginated::from_page(page, state.page()))
}

async fn client_rows<B>(
    api: &B,
    clients: Paginated<Client>,
) -> Paginated<ClientRow>
where
    B: BackendApi + ?Sized,
{
    let pending = match pending_by_client(api).await {
        Ok(pending) => pending,
        Err(err) => {
            log::warn!("Failed to count pending operations: {err}");
            Default::default()
        }
    };
    clients.map(|client| ClientRow {
        cnpj: client.cnpj.formatted(),
        pending_operations: pending.get(&client.id).copied().unwrap_or(0),
        client,
    })
}

/// Runs the single-page query of the tab.
async fn fetch_rows<B>(
    api: &B,
    state: &SearchTabState<'_>,
) -> Result<TabRows, BackendError>
where
    B: BackendApi + ?Sized,
{
    let schema = state.schema();
    let rows = match schema.kind {
        TabKind::Clients => {
            let clients = fetch_paginated(api, schema, state).await?;
            TabRows::Clients(client_rows(api, clients).await)
        }
        TabKind::Proposals => TabRows::Proposals(fetch_paginated(api, schema, state).await?),
        TabKind::Appointments => {
            TabRows::Appointments(fetch_paginated(api, schema, state).await?)
        }
        TabKind::Reports => TabRows::Reports(fetch_paginated(api, schema, state).await?),
        TabKind::Equipments => TabRows::Equipments(fetch_paginated(api, schema, state).await?),
        TabKind::Users => TabRows::Users(fetch_paginated(api, schema, state).await?),
        TabKind::Materials => TabRows::Materials(fetch_paginated(api, schema, state).await?),
    };
    Ok(rows)
}

/// Restores the tab from `url` and loads its current page.
///
/// Backend failures other than an authorization refusal are reported inside
/// the view so the page can offer a retry of the same URL.
pub async fn load_tab_view<B>(
    api: &B,
    schema: &TabSchema,
    url: &QueryParams,
    path: &str,
) -> ServiceResult<TabView>
where
    B: BackendApi + ?Sized,
{
    let state = SearchTabState::from_url(schema, url);
    let mut view = TabView::new(&state, url, path);
    match fetch_rows(api, &state).await {
        Ok(rows) => view.rows = Some(rows),
        Err(BackendError::Unauthorized) => return Err(ServiceError::Unauthorized),
        Err(err) => {
            log::error!("Failed to load {} tab: {err}", schema.prefix);
            view.error = Some(format!("Não foi possível carregar {}.", schema.title));
        }
    }
    Ok(view)
}

/// Extra records an open modal needs to render.
async fn load_modal<B>(
    api: &B,
    modal: ModalState,
) -> ServiceResult<(ModalState, Option<User>, Vec<Unit>)>
where
    B: BackendApi + ?Sized,
{
    match modal {
        ModalState::EditUser { user_id } => {
            match api.get_json(&detail_path("/users/", user_id), &[]).await {
                Ok(value) => {
                    let user = serde_json::from_value(value)
                        .map_err(|err| ServiceError::Backend(err.to_string()))?;
                    Ok((modal, Some(user), Vec::new()))
                }
                Err(BackendError::NotFound) => Ok((ModalState::None, None, Vec::new())),
                Err(err) => Err(err.into()),
            }
        }
        ModalState::CreateAppointment => {
            let units = fetch_all(api, "/units/", &[]).await?;
            Ok((modal, None, units))
        }
        _ => Ok((modal, None, Vec::new())),
    }
}

/// Loads the search page for the state encoded in `url`.
pub async fn load_search_page<B>(
    api: &B,
    user: &AuthenticatedUser,
    url: &QueryParams,
) -> ServiceResult<SearchPageData>
where
    B: BackendApi + ?Sized,
{
    let visible = search_tabs_for(user.role);
    let Some(first) = visible.first().copied() else {
        return Err(ServiceError::Unauthorized);
    };

    let requested = url
        .get(TAB_KEY)
        .and_then(|raw| raw.trim().parse::<usize>().ok())
        .and_then(search_tab);
    let active = match requested {
        Some(tab) if visible.iter().any(|visible| visible.kind == tab.kind) => tab,
        _ => first,
    };

    let tabs = visible
        .iter()
        .filter_map(|tab| {
            let index = tab.index?;
            Some(TabLink {
                index,
                title: tab.title,
                active: tab.kind == active.kind,
                url: url.to_url(&format!("{SEARCH_PATH}/tab/{index}")),
            })
        })
        .collect();

    let view = load_tab_view(api, active, url, SEARCH_PATH).await?;

    let layout = AppointmentsView::from_params(url);
    let calendar = match (&view.rows, layout) {
        (Some(TabRows::Appointments(page)), AppointmentsView::Calendar) => {
            calendar_days(&page.items)
        }
        _ => Vec::new(),
    };

    let modal = ModalState::from_params(url).visible_for(user.role);
    let (modal, modal_user, modal_units) = load_modal(api, modal).await?;

    Ok(SearchPageData {
        tabs,
        active: view,
        view: layout,
        list_view_url: view_url(url, SEARCH_PATH, AppointmentsView::List),
        calendar_view_url: view_url(url, SEARCH_PATH, AppointmentsView::Calendar),
        calendar,
        modal,
        modal_user,
        modal_units,
        modal_base_url: modal_base_url(url, SEARCH_PATH),
        modal_close_url: modal_close_url(url, SEARCH_PATH),
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use serde_json::json;

    use super::*;
    use crate::backend::fake::FakeBackend;
    use crate::domain::types::Role;
    use crate::services::test_support::user;

    fn report(id: i32) -> serde_json::Value {
        json!({
            "id": id,
            "file": null,
            "due_date": "2024-02-01",
            "status": "PENDING",
            "unit": 1,
            "equipment": null,
            "responsibles": [],
        })
    }

    fn action_form(pairs: &[(&str, &str)]) -> TabActionForm {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<HashMap<_, _>>()
            .into()
    }

    #[test]
    fn apply_on_reports_rewrites_url() {
        let form = action_form(&[
            ("tab", "3"),
            ("current_query", "tab=3&report_page=3&clients_name=Ana"),
            ("due_date_start", "2024-01-01"),
            ("status", "1"),
        ]);

        let next = search_tab_action(&user(Role::ProphyManager), form, TabAction::Apply).unwrap();

        let params = QueryParams::parse(next.trim_start_matches("/search?"));
        assert_eq!(params.get("reports_due_date_start"), Some("2024-01-01"));
        assert_eq!(params.get("reports_status"), Some("PENDING"));
        assert_eq!(params.get("report_page"), Some("1"));
        assert_eq!(params.get("clients_name"), Some("Ana"));
    }

    #[test]
    fn clear_keeps_other_tabs_and_view() {
        let form = action_form(&[
            ("tab", "2"),
            (
                "current_query",
                "tab=2&view=calendar&appointments_status=P&appointment_page=2&reports_status=DONE",
            ),
        ]);

        let next = search_tab_action(&user(Role::ProphyManager), form, TabAction::Clear).unwrap();

        let params = QueryParams::parse(next.trim_start_matches("/search?"));
        assert_eq!(params.get("appointments_status"), None);
        assert_eq!(params.get("appointment_page"), None);
        assert_eq!(params.get("view"), Some("calendar"));
        assert_eq!(params.get("reports_status"), Some("DONE"));
    }

    #[test]
    fn page_action_keeps_applied_filters() {
        let form = action_form(&[
            ("tab", "0"),
            ("current_query", "tab=0&clients_city=Natal"),
            ("page", "4"),
            ("city", "ignored"),
        ]);

        let next = search_tab_action(&user(Role::ProphyManager), form, TabAction::Page(4)).unwrap();

        let params = QueryParams::parse(next.trim_start_matches("/search?"));
        assert_eq!(params.get("clients_city"), Some("Natal"));
        assert_eq!(params.get("client_page"), Some("4"));
    }

    #[test]
    fn actions_on_hidden_tabs_are_unauthorized() {
        let form = action_form(&[("tab", "1"), ("current_query", "")]);
        assert!(matches!(
            search_tab_action(&user(Role::UnitManager), form, TabAction::Apply),
            Err(ServiceError::Unauthorized)
        ));
    }

    #[test]
    fn switching_tabs_resets_target_page_only() {
        let url = QueryParams::parse("tab=0&client_page=2&report_page=5&reports_status=DONE");
        let next = switch_search_tab(&user(Role::ProphyManager), 3, &url).unwrap();
        let params = QueryParams::parse(next.trim_start_matches("/search?"));
        assert_eq!(params.get("tab"), Some("3"));
        assert_eq!(params.get("report_page"), None);
        assert_eq!(params.get("client_page"), Some("2"));
        assert_eq!(params.get("reports_status"), Some("DONE"));
    }

    #[actix_web::test]
    async fn reports_tab_issues_one_filtered_request() {
        let backend = FakeBackend::default();
        backend.paginate("/reports/", vec![vec![report(1), report(2)]]);
        let url = QueryParams::parse(
            "tab=3&reports_due_date_start=2024-01-01&reports_status=PENDING&report_page=1",
        );

        let data = load_search_page(&backend, &user(Role::ProphyManager), &url)
            .await
            .unwrap();

        assert_eq!(data.active.prefix, "reports");
        assert!(matches!(
            data.active.rows,
            Some(TabRows::Reports(ref page)) if page.items.len() == 2
        ));
        let requests = backend.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(
            requests[0],
            (
                "/reports/".to_string(),
                vec![
                    ("page".to_string(), "1".to_string()),
                    ("due_date_start".to_string(), "2024-01-01".to_string()),
                    ("status".to_string(), "PENDING".to_string()),
                ]
            )
        );
    }

    #[actix_web::test]
    async fn hidden_requested_tab_falls_back_to_first_visible() {
        let backend = FakeBackend::default();
        backend.paginate::<serde_json::Value>("/appointments/", vec![vec![]]);

        let data = load_search_page(
            &backend,
            &user(Role::UnitManager),
            &QueryParams::parse("tab=5"),
        )
        .await
        .unwrap();

        assert_eq!(data.active.prefix, "appointments");
        assert_eq!(
            data.tabs.iter().map(|tab| tab.index).collect::<Vec<_>>(),
            vec![2, 3, 4]
        );
    }

    #[actix_web::test]
    async fn backend_failure_is_shown_with_retry_link() {
        let backend = FakeBackend::default();
        backend.fail("/reports/", 500);
        let url = QueryParams::parse("tab=3&reports_status=DONE");

        let data = load_search_page(&backend, &user(Role::ProphyManager), &url)
            .await
            .unwrap();

        assert!(data.active.rows.is_none());
        assert!(data.active.error.is_some());
        assert_eq!(data.active.retry_url, "/search?tab=3&reports_status=DONE");
    }

    #[actix_web::test]
    async fn backend_refusal_propagates() {
        let backend = FakeBackend::default();
        backend.fail("/reports/", 403);

        let result = load_search_page(
            &backend,
            &user(Role::ProphyManager),
            &QueryParams::parse("tab=3"),
        )
        .await;

        assert!(matches!(result, Err(ServiceError::Unauthorized)));
    }

    #[actix_web::test]
    async fn modal_without_permission_stays_closed() {
        let backend = FakeBackend::default();
        backend.paginate::<serde_json::Value>("/appointments/", vec![vec![]]);

        let data = load_search_page(
            &backend,
            &user(Role::UnitManager),
            &QueryParams::parse("tab=2&modal=create_proposal"),
        )
        .await
        .unwrap();

        assert_eq!(data.modal, ModalState::None);
        assert_eq!(data.modal_close_url, "/search?tab=2");
    }

    #[actix_web::test]
    async fn edit_user_modal_loads_the_user() {
        let backend = FakeBackend::default();
        backend.paginate::<serde_json::Value>("/users/", vec![vec![]]);
        backend.respond(
            "/users/3/",
            json!({
                "id": 3,
                "name": "Carla",
                "email": "carla@prophy.test",
                "cpf": null,
                "phone": null,
                "role": "FMI",
            }),
        );

        let data = load_search_page(
            &backend,
            &user(Role::ProphyManager),
            &QueryParams::parse("tab=5&modal=edit_user&modal_id=3"),
        )
        .await
        .unwrap();

        assert!(matches!(data.modal, ModalState::EditUser { .. }));
        assert_eq!(data.modal_user.map(|u| u.role), Some(Role::InternalPhysicist));
    }

    #[actix_web::test]
    async fn clients_tab_includes_pending_counts() {
        let backend = FakeBackend::default();
        backend.paginate(
            "/clients/",
            vec![vec![json!({
                "id": 1,
                "cnpj": "12345678000190",
                "name": "Hospital A",
                "email": null,
                "phone": null,
                "address": null,
                "state": "RN",
                "city": "Natal",
                "status": "A",
                "contract_type": "A",
            })]],
        );
        backend.paginate(
            "/clients/operations/",
            vec![vec![json!({
                "id": 9,
                "operation_type": "E",
                "operation_status": "REV",
                "original_client": 1,
            })]],
        );
        backend.paginate::<serde_json::Value>("/units/operations/", vec![vec![]]);
        backend.paginate::<serde_json::Value>("/equipments/operations/", vec![vec![]]);

        let data = load_search_page(
            &backend,
            &user(Role::ProphyManager),
            &QueryParams::parse("tab=0"),
        )
        .await
        .unwrap();

        let Some(TabRows::Clients(page)) = data.active.rows else {
            panic!("expected clients");
        };
        assert_eq!(page.items[0].pending_operations, 1);
        assert_eq!(page.items[0].cnpj, "12.345.678/0001-90");
    }

    #[actix_web::test]
    async fn page_far_past_the_end_renders_empty_tab() {
        let backend = FakeBackend::default();
        backend.paginate::<serde_json::Value>("/reports/", vec![vec![]]);

        let data = load_search_page(
            &backend,
            &user(Role::ProphyManager),
            &QueryParams::parse("tab=3&report_page=18446744073709551615"),
        )
        .await
        .unwrap();

        assert_eq!(data.active.page, usize::MAX);
        let Some(TabRows::Reports(page)) = data.active.rows else {
            panic!("expected reports");
        };
        assert!(page.items.is_empty());
        assert_eq!(
            backend.requests()[0].1[0],
            ("page".to_string(), usize::MAX.to_string())
        );
    }

    #[test]
    fn page_action_with_huge_page_is_passed_through() {
        let form = action_form(&[
            ("tab", "3"),
            ("current_query", "tab=3"),
            ("page", "18446744073709551615"),
        ]);

        let next = search_tab_action(
            &user(Role::ProphyManager),
            form,
            TabAction::Page(usize::MAX),
        )
        .unwrap();

        assert!(next.contains("report_page=18446744073709551615"));
    }

    #[actix_web::test]
    async fn calendar_view_groups_appointments_by_date() {
        let backend = FakeBackend::default();
        let appointment = |id: i32, date: &str| {
            json!({
                "id": id,
                "date": date,
                "status": "C",
                "type": "O",
                "unit": 1,
                "service_order": null,
                "justification": null,
            })
        };
        backend.paginate(
            "/appointments/",
            vec![vec![
                appointment(1, "2024-03-05"),
                appointment(2, "2024-03-05"),
                appointment(3, "2024-03-07"),
            ]],
        );

        let data = load_search_page(
            &backend,
            &user(Role::ProphyManager),
            &QueryParams::parse("tab=2&view=calendar&appointments_status=C"),
        )
        .await
        .unwrap();

        assert_eq!(data.view, AppointmentsView::Calendar);
        assert_eq!(data.calendar.len(), 2);
        assert_eq!(data.calendar[0].appointments.len(), 2);
        assert_eq!(
            data.list_view_url,
            "/search?tab=2&appointments_status=C&view=list"
        );
    }

    #[actix_web::test]
    async fn list_view_builds_no_calendar() {
        let backend = FakeBackend::default();
        backend.paginate::<serde_json::Value>("/appointments/", vec![vec![]]);

        let data = load_search_page(
            &backend,
            &user(Role::ProphyManager),
            &QueryParams::parse("tab=2"),
        )
        .await
        .unwrap();

        assert_eq!(data.view, AppointmentsView::List);
        assert!(data.calendar.is_empty());
        assert_eq!(data.calendar_view_url, "/search?tab=2&view=calendar");
    }

    #[test]
    fn back_to_search_closes_dialog() {
        assert_eq!(
            back_to_search("tab=2&modal=create_appointment&appointments_status=P"),
            "/search?tab=2&appointments_status=P"
        );
        assert_eq!(back_to_search(""), SEARCH_PATH);
    }
}
