use serde::Deserialize;

use crate::params::QueryParams;

#[derive(Debug, Deserialize)]
struct ActionQuery {
    action: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Home,
    ViewProfile,
    ViewTree,
    TreeJson,
    AddPerson,
    ProcessAddPerson,
    EditPerson,
    ProcessEditPerson,
    AddFamilyMember,
    DeletePerson,
    ProcessDeletePerson,
    Search,
    Login,
}

impl Action {
    pub const ALL: [Action; 13] = [
        Action::Home,
        Action::ViewProfile,
        Action::ViewTree,
        Action::TreeJson,
        Action::AddPerson,
        Action::ProcessAddPerson,
        Action::EditPerson,
        Action::ProcessEditPerson,
        Action::AddFamilyMember,
        Action::DeletePerson,
        Action::ProcessDeletePerson,
        Action::Search,
        Action::Login,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::ViewProfile => "view_profile",
            Self::ViewTree => "view_tree",
            Self::TreeJson => "tree_json",
            Self::AddPerson => "add_person",
            Self::ProcessAddPerson => "process_add_person",
            Self::EditPerson => "edit_person",
            Self::ProcessEditPerson => "process_edit_person",
            Self::AddFamilyMember => "add_family_member",
            Self::DeletePerson => "delete_person",
            Self::ProcessDeletePerson => "process_delete_person",
            Self::Search => "search",
            Self::Login => "login",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.name() == name)
    }

    /// The requested action. Missing or unknown names mean [`Action::Home`].
    pub fn from_params(params: &QueryParams) -> Self {
        let name = match params.deserialize::<ActionQuery>() {
            Ok(query) => query.action,
            Err(e) => {
                tracing::warn!(error = %e, "unreadable action, showing home");
                None
            }
        };
        match name {
            None => Self::Home,
            Some(name) => Self::from_name(&name).unwrap_or_else(|| {
                tracing::warn!(action = %name, "unknown action, showing home");
                Self::Home
            }),
        }
    }
}
