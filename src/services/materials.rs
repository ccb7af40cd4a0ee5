//! Standalone materials page, sharing the search tab machinery.

use crate::backend::BackendApi;
use crate::dto::search::MaterialsPageData;
use crate::filters::codec::QueryParams;
use crate::filters::tabs::MATERIALS;
use crate::forms::search::TabActionForm;
use crate::models::auth::AuthenticatedUser;
use crate::permissions::{Action, Resource};
use crate::services::search::{TabAction, load_tab_view, run_tab_action};
use crate::services::{ServiceResult, ensure_permission};

pub const MATERIALS_PATH: &str = "/materials";

pub async fn load_materials_page<B>(
    api: &B,
    user: &AuthenticatedUser,
    url: &QueryParams,
) -> ServiceResult<MaterialsPageData>
where
    B: BackendApi + ?Sized,
{
    ensure_permission(user, Resource::Material, Action::View)?;
    let active = load_tab_view(api, &MATERIALS, url, MATERIALS_PATH).await?;
    Ok(MaterialsPageData { active })
}

/// Handles the apply, clear and page forms, returning the URL to redirect to.
pub fn materials_action(
    user: &AuthenticatedUser,
    form: TabActionForm,
    action: TabAction,
) -> ServiceResult<String> {
    ensure_permission(user, Resource::Material, Action::View)?;
    let url = QueryParams::parse(&form.current_query);
    let draft = form.draft_for(&MATERIALS);
    Ok(run_tab_action(&MATERIALS, action, draft, &url).to_url(MATERIALS_PATH))
}
