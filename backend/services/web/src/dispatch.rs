use famtree_config::AppConfig;
use famtree_db::family::repositories::FamilyStore;

use crate::action::Action;
use crate::error::PageError;
use crate::params::QueryParams;
use crate::people::handlers as people;
use crate::reply::Reply;
use crate::tree::handlers as tree;

/// Run one request against `store`.
pub async fn dispatch<S>(store: &S, config: &AppConfig, params: &QueryParams) -> Reply
where
    S: FamilyStore + ?Sized,
{
    let action = Action::from_params(params);
    tracing::debug!(action = action.name(), "dispatching");

    let result = match action {
        Action::Home => people::home(store, config.recent_people_limit).await,
        Action::ViewProfile => people::view_profile(store, params).await,
        Action::ViewTree => tree::view_tree(store, params).await,
        Action::TreeJson => tree::tree_json(store, params).await,
        Action::AddPerson => people::add_person(store, params).await,
        Action::ProcessAddPerson => people::process_add_person(store, params).await,
        Action::EditPerson => people::edit_person(store, params).await,
        Action::ProcessEditPerson => people::process_edit_person(store, params).await,
        Action::AddFamilyMember => people::add_family_member(store, params).await,
        Action::DeletePerson => people::delete_person(params),
        Action::ProcessDeletePerson => people::process_delete_person(params),
        Action::Search => people::search(store, params).await,
        Action::Login => Ok(people::login()),
    };

    result.unwrap_or_else(|err| PageError::from(err).into_reply())
}
