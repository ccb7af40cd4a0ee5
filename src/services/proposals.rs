use crate::backend::BackendApi;
use crate::domain::proposal::NewProposal;
use crate::forms::proposals::AddProposalForm;
use crate::models::auth::AuthenticatedUser;
use crate::permissions::{Action, Resource};
use crate::services::search::back_to_search;
use crate::services::{ServiceError, ServiceResult, ensure_permission, to_body};

pub const PROPOSALS_PATH: &str = "/proposals/";

/// Registers a proposal and returns the search page URL to go back to.
pub async fn add_proposal<B>(
    api: &B,
    user: &AuthenticatedUser,
    form: AddProposalForm,
) -> ServiceResult<String>
where
    B: BackendApi + ?Sized,
{
    ensure_permission(user, Resource::Proposal, Action::Create)?;
    let redirect_to = back_to_search(&form.current_query);

    let proposal = NewProposal::try_from(form).map_err(|err| {
        log::error!("Failed to validate proposal form: {err}");
        ServiceError::from(err)
    })?;

    api.post_json(PROPOSALS_PATH, &to_body(&proposal)?)
        .await
        .map_err(|err| {
            log::error!("Failed to add a proposal for {}: {err}", proposal.cnpj);
            ServiceError::from(err)
        })?;

    Ok(redirect_to)
}
