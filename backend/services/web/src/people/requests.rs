//! Typed views of the add/edit form parameters.

use famtree_common::error::{FamtreeError, FamtreeResult};
use famtree_db::family::models::{Gender, NewPerson, NewRelationship, ParentRole, Person};
use serde::Deserialize;

use crate::params::{lenient_i64, non_empty, QueryParams};

/// Raw person fields as posted by the add and edit forms.
#[derive(Debug, Default, Deserialize)]
pub struct PersonFormInput {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    #[serde(default, deserialize_with = "non_empty")]
    pub gender: Option<String>,
    #[serde(default, deserialize_with = "non_empty")]
    pub birth_date: Option<String>,
    #[serde(default, deserialize_with = "non_empty")]
    pub death_date: Option<String>,
    #[serde(default, deserialize_with = "non_empty")]
    pub bio: Option<String>,
    #[serde(default, deserialize_with = "non_empty")]
    pub photo_url: Option<String>,
}

/// Validated person fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonForm {
    pub first_name: String,
    pub last_name: String,
    pub gender: Gender,
    pub birth_date: Option<String>,
    pub death_date: Option<String>,
    pub bio: Option<String>,
    pub photo_url: Option<String>,
}

impl TryFrom<PersonFormInput> for PersonForm {
    type Error = FamtreeError;

    fn try_from(input: PersonFormInput) -> FamtreeResult<Self> {
        let first_name = input.first_name.unwrap_or_default().trim().to_string();
        let last_name = input.last_name.unwrap_or_default().trim().to_string();
        if first_name.is_empty() || last_name.is_empty() {
            return Err(FamtreeError::Validation(
                "First and last name are required.".to_string(),
            ));
        }

        let gender = match input.gender {
            None => Gender::Male,
            Some(raw) => raw
                .parse()
                .map_err(|_| FamtreeError::Validation("Invalid gender.".to_string()))?,
        };

        Ok(Self {
            first_name,
            last_name,
            gender,
            birth_date: input.birth_date,
            death_date: input.death_date,
            bio: input.bio,
            photo_url: input.photo_url,
        })
    }
}

impl PersonForm {
    pub fn from_params(params: &QueryParams) -> FamtreeResult<Self> {
        params.deserialize::<PersonFormInput>()?.try_into()
    }

    pub fn into_new_person(self) -> NewPerson {
        NewPerson {
            first_name: self.first_name,
            last_name: self.last_name,
            gender: self.gender,
            birth_date: self.birth_date,
            death_date: self.death_date,
            bio: self.bio,
            photo_url: self.photo_url,
        }
    }

    /// Overwrite every mutable field of `existing`.
    pub fn apply_to(self, mut existing: Person) -> Person {
        existing.first_name = self.first_name;
        existing.last_name = self.last_name;
        existing.gender = Some(self.gender);
        existing.birth_date = self.birth_date;
        existing.death_date = self.death_date;
        existing.bio = self.bio;
        existing.photo_url = self.photo_url;
        existing
    }
}

/// How a newly added person relates to the anchor person.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    /// The anchor is the parent, the new person the child.
    ParentChild,
    /// The new person is the parent, the anchor the child.
    Child,
    Spouse,
}

impl LinkKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ParentChild => "parent-child",
            Self::Child => "child",
            Self::Spouse => "spouse",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "parent-child" => Some(Self::ParentChild),
            "child" => Some(Self::Child),
            "spouse" => Some(Self::Spouse),
            _ => None,
        }
    }
}

/// Raw link fields. The add form carries the anchor as `person_id`, the
/// submitted form as `parent_id`.
#[derive(Debug, Default, Deserialize)]
pub struct LinkInput {
    #[serde(default, deserialize_with = "lenient_i64")]
    pub person_id: Option<i64>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub parent_id: Option<i64>,
    pub relationship_type: Option<String>,
    #[serde(default, deserialize_with = "non_empty")]
    pub parent_role: Option<String>,
    #[serde(default, deserialize_with = "non_empty")]
    pub marriage_date: Option<String>,
}

/// Which parameter names the anchor person.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkAnchor {
    PersonId,
    ParentId,
}

/// A pending relationship between a new person and an existing one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkRequest {
    pub anchor_id: i64,
    pub kind: LinkKind,
    pub parent_role: Option<ParentRole>,
    pub marriage_date: Option<String>,
}

impl LinkRequest {
    /// Returns `None` unless both the anchor and a known relationship type
    /// are present. An unrecognised `parent_role` is ignored.
    pub fn from_input(input: LinkInput, anchor: LinkAnchor) -> Option<Self> {
        let anchor_id = match anchor {
            LinkAnchor::PersonId => input.person_id,
            LinkAnchor::ParentId => input.parent_id,
        }?;
        let kind = LinkKind::from_name(input.relationship_type.as_deref()?)?;
        let (parent_role, marriage_date) = match kind {
            LinkKind::Spouse => (None, input.marriage_date),
            _ => (input.parent_role.and_then(|raw| raw.parse().ok()), None),
        };
        Some(Self {
            anchor_id,
            kind,
            parent_role,
            marriage_date,
        })
    }

    pub fn from_params(params: &QueryParams, anchor: LinkAnchor) -> FamtreeResult<Option<Self>> {
        Ok(Self::from_input(params.deserialize()?, anchor))
    }

    pub fn heading(&self) -> &'static str {
        match (self.kind, self.parent_role) {
            (LinkKind::ParentChild, _) => "Add Child",
            (LinkKind::Spouse, _) => "Add Spouse",
            (LinkKind::Child, Some(ParentRole::Father)) => "Add Father",
            (LinkKind::Child, Some(ParentRole::Mother)) => "Add Mother",
            (LinkKind::Child, None) => "Add Parent",
        }
    }

    /// The relationship row joining `new_person` to the anchor.
    ///
    /// Without an explicit role the parent's gender decides it. The anchor's
    /// gender is only consulted when the anchor is the parent.
    pub fn relationship_for(
        &self,
        new_person: &Person,
        anchor_gender: Option<Gender>,
    ) -> NewRelationship {
        let role_from = |gender: Option<Gender>| {
            self.parent_role
                .or_else(|| gender.map(|g| g.default_parent_role()))
        };
        match self.kind {
            LinkKind::ParentChild => NewRelationship::parent_child(
                self.anchor_id,
                new_person.id,
                role_from(anchor_gender),
            ),
            LinkKind::Child => NewRelationship::parent_child(
                new_person.id,
                self.anchor_id,
                role_from(new_person.gender),
            ),
            LinkKind::Spouse => NewRelationship::spouse(
                self.anchor_id,
                new_person.id,
                self.marriage_date.clone(),
            ),
        }
    }
}
