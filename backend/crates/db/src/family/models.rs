use std::str::FromStr;

use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Male => "M",
            Self::Female => "F",
        }
    }

    /// CSS class used on person cards.
    pub fn css_class(&self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
        }
    }

    /// Role a parent of this gender takes when none was recorded.
    pub fn default_parent_role(&self) -> ParentRole {
        match self {
            Self::Male => ParentRole::Father,
            Self::Female => ParentRole::Mother,
        }
    }
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "M" => Ok(Self::Male),
            "F" => Ok(Self::Female),
            _ => Err(format!("unknown gender: {value}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationshipType {
    ParentChild,
    Spouse,
}

impl RelationshipType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ParentChild => "parent-child",
            Self::Spouse => "spouse",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParentRole {
    Father,
    Mother,
}

impl ParentRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Father => "father",
            Self::Mother => "mother",
        }
    }
}

impl FromStr for ParentRole {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "father" => Ok(Self::Father),
            "mother" => Ok(Self::Mother),
            _ => Err(format!("unknown parent role: {value}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Person {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    /// Nullable in the schema; rows written by this application always carry one.
    pub gender: Option<Gender>,
    pub birth_date: Option<String>,
    pub death_date: Option<String>,
    pub bio: Option<String>,
    pub photo_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Person {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn gender_class(&self) -> &'static str {
        self.gender.map_or("unknown", |g| g.css_class())
    }
}

/// Write-side input for a person; id and timestamps are assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPerson {
    pub first_name: String,
    pub last_name: String,
    pub gender: Gender,
    pub birth_date: Option<String>,
    pub death_date: Option<String>,
    pub bio: Option<String>,
    pub photo_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    pub id: i64,
    pub person1_id: i64,
    pub person2_id: i64,
    pub relationship_type: RelationshipType,
    pub parent_role: Option<ParentRole>,
    pub marriage_date: Option<String>,
    pub divorce_date: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRelationship {
    pub person1_id: i64,
    pub person2_id: i64,
    pub relationship_type: RelationshipType,
    pub parent_role: Option<ParentRole>,
    pub marriage_date: Option<String>,
    pub divorce_date: Option<String>,
}

impl NewRelationship {
    pub fn parent_child(parent_id: i64, child_id: i64, role: Option<ParentRole>) -> Self {
        Self {
            person1_id: parent_id,
            person2_id: child_id,
            relationship_type: RelationshipType::ParentChild,
            parent_role: role,
            marriage_date: None,
            divorce_date: None,
        }
    }

    pub fn spouse(person1_id: i64, person2_id: i64, marriage_date: Option<String>) -> Self {
        Self {
            person1_id,
            person2_id,
            relationship_type: RelationshipType::Spouse,
            parent_role: None,
            marriage_date,
            divorce_date: None,
        }
    }
}

/// Result of a parents lookup. Either slot may be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Parents {
    pub father: Option<Person>,
    pub mother: Option<Person>,
}

impl Parents {
    pub fn is_empty(&self) -> bool {
        self.father.is_none() && self.mother.is_none()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Person> {
        self.father.iter().chain(self.mother.iter())
    }
}
