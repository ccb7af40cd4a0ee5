#![cfg(feature = "test-mocks")]

use std::collections::HashMap;
use std::time::Duration;

use serde_json::json;

use prophy_dashboard::backend::BackendApi;
use prophy_dashboard::backend::cache::{CachedBackend, QueryCache};
use prophy_dashboard::backend::fake::{FakeBackend, Mutation};
use prophy_dashboard::domain::types::Role;
use prophy_dashboard::dto::search::TabRows;
use prophy_dashboard::filters::codec::QueryParams;
use prophy_dashboard::forms::search::TabActionForm;
use prophy_dashboard::forms::units::SaveUnitForm;
use prophy_dashboard::models::auth::AuthenticatedUser;
use prophy_dashboard::services::search::{TabAction, load_search_page, search_tab_action};
use prophy_dashboard::services::units::save_unit;

fn user(role: Role) -> AuthenticatedUser {
    AuthenticatedUser {
        sub: "7".to_string(),
        email: "ana@prophy.test".to_string(),
        name: "Ana".to_string(),
        role,
        exp: 4_102_444_800,
        token: "token".to_string(),
    }
}

fn report(id: i32) -> serde_json::Value {
    json!({
        "id": id,
        "file": null,
        "due_date": "2024-03-01",
        "status": "PENDING",
        "unit": 1,
        "equipment": null,
        "responsibles": [],
    })
}

#[actix_web::test]
async fn applied_report_filters_reach_the_backend() {
    let backend = FakeBackend::default();
    backend.paginate(
        "/reports/",
        vec![(1..=10).map(report).collect(), vec![report(11)]],
    );
    let manager = user(Role::ProphyManager);

    let form: TabActionForm = [
        ("tab", "3"),
        ("current_query", "tab=3&report_page=2"),
        ("due_date_start", "2024-01-01"),
        ("status", "1"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect::<HashMap<_, _>>()
    .into();
    let next = search_tab_action(&manager, form, TabAction::Apply).unwrap();
    let url = QueryParams::parse(next.trim_start_matches("/search?"));

    let data = load_search_page(&backend, &manager, &url).await.unwrap();

    let Some(TabRows::Reports(page)) = data.active.rows else {
        panic!("expected reports");
    };
    assert_eq!(page.page, 1);
    assert_eq!(page.total, 11);
    assert_eq!(page.items.len(), 10);
    assert_eq!(
        backend.requests(),
        vec![(
            "/reports/".to_string(),
            vec![
                ("page".to_string(), "1".to_string()),
                ("due_date_start".to_string(), "2024-01-01".to_string()),
                ("status".to_string(), "PENDING".to_string()),
            ]
        )]
    );
}

#[actix_web::test]
async fn backend_failure_renders_retry_panel() {
    let backend = FakeBackend::default();
    backend.fail("/reports/", 502);

    let url = QueryParams::parse("tab=3&reports_status=DONE");
    let data = load_search_page(&backend, &user(Role::ProphyManager), &url)
        .await
        .unwrap();

    assert!(data.active.rows.is_none());
    assert!(data.active.error.is_some());
    assert_eq!(data.active.retry_url, "/search?tab=3&reports_status=DONE");
}

#[actix_web::test]
async fn unit_edit_refreshes_cached_lists() {
    let fake = FakeBackend::default();
    fake.paginate(
        "/units/",
        vec![vec![json!({
            "id": 4,
            "client": 1,
            "name": "Centro",
            "cnpj": null,
            "email": null,
            "phone": null,
            "address": null,
            "state": null,
            "city": null,
            "user": null,
        })]],
    );
    let cache = QueryCache::new(32, Duration::from_secs(60));
    let manager = user(Role::ProphyManager);
    let api = CachedBackend::new(fake, &cache, manager.sub.clone());
    let params = vec![("page".to_string(), "1".to_string())];

    api.get_json("/units/", &params).await.unwrap();
    api.get_json("/units/", &params).await.unwrap();
    assert_eq!(api.inner().get_count("/units/"), 1);

    let form = SaveUnitForm {
        client_id: 1,
        name: "Centro Norte".to_string(),
        email: String::new(),
        phone: String::new(),
        address: String::new(),
        user: String::new(),
    };
    save_unit(&api, &manager, 4, form).await.unwrap();
    api.get_json("/units/", &params).await.unwrap();

    assert_eq!(api.inner().get_count("/units/"), 2);
    assert_eq!(
        api.inner().mutations(),
        vec![Mutation::Patch(
            "/units/4/".to_string(),
            json!({"name": "Centro Norte"})
        )]
    );
}
