//! In-memory store seeding shared by handler and renderer tests.

use famtree_db::family::models::{Gender, NewPerson, NewRelationship, ParentRole, Person};
use famtree_db::family::repositories::{PersonRepository, RelationshipRepository};
use famtree_db::family::sqlite_repository::SqliteFamilyRepository;

pub async fn memory_store() -> SqliteFamilyRepository {
    let pool = famtree_db::create_memory_pool().await.unwrap();
    SqliteFamilyRepository::new(pool)
}

pub async fn add_person(
    store: &SqliteFamilyRepository,
    first: &str,
    last: &str,
    gender: Gender,
) -> Person {
    let new = NewPerson {
        first_name: first.to_string(),
        last_name: last.to_string(),
        gender,
        birth_date: None,
        death_date: None,
        bio: None,
        photo_url: None,
    };
    PersonRepository::create(store, new).await.unwrap()
}

pub async fn link_parent(
    store: &SqliteFamilyRepository,
    parent: &Person,
    child: &Person,
    role: ParentRole,
) {
    let rel = NewRelationship::parent_child(parent.id, child.id, Some(role));
    RelationshipRepository::create(store, rel).await.unwrap();
}

pub async fn link_spouse(store: &SqliteFamilyRepository, a: &Person, b: &Person) {
    let rel = NewRelationship::spouse(a.id, b.id, None);
    RelationshipRepository::create(store, rel).await.unwrap();
}
