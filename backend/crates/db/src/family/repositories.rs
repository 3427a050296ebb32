use async_trait::async_trait;

use crate::family::models::{NewPerson, NewRelationship, Parents, Person, Relationship};
use famtree_common::error::FamtreeResult;

#[async_trait]
pub trait PersonRepository: Send + Sync {
    async fn get_by_id(&self, id: i64) -> FamtreeResult<Option<Person>>;
    async fn create(&self, person: NewPerson) -> FamtreeResult<Person>;

    /// Overwrite every mutable field of an existing person and refresh
    /// `updated_at`. `created_at` on the input is ignored.
    async fn update(&self, person: Person) -> FamtreeResult<Person>;

    /// Most recently created people first.
    async fn list_recent(&self, limit: i64) -> FamtreeResult<Vec<Person>>;

    /// Case-sensitive substring match on first or last name.
    async fn search(&self, term: &str) -> FamtreeResult<Vec<Person>>;
}

#[async_trait]
pub trait RelationshipRepository: Send + Sync {
    async fn create(&self, relationship: NewRelationship) -> FamtreeResult<Relationship>;

    async fn get_parents(&self, child_id: i64) -> FamtreeResult<Parents>;

    /// First active spouse, looked up from either side of the relationship.
    async fn get_spouse(&self, person_id: i64) -> FamtreeResult<Option<Person>>;

    /// Children in relationship insertion order.
    async fn get_children(&self, parent_id: i64) -> FamtreeResult<Vec<Person>>;
}

/// Everything the page renderer needs from the store.
pub trait FamilyStore: PersonRepository + RelationshipRepository {}

impl<T: PersonRepository + RelationshipRepository> FamilyStore for T {}
