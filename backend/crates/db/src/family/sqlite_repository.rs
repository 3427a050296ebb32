use std::str::FromStr;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};

use crate::family::models::{
    Gender, NewPerson, NewRelationship, ParentRole, Parents, Person, Relationship,
    RelationshipType,
};
use crate::family::repositories::{PersonRepository, RelationshipRepository};
use famtree_common::error::{FamtreeError, FamtreeResult};

const PERSON_COLUMNS: &str = "p.id, p.first_name, p.last_name, p.gender, p.birth_date, \
     p.death_date, p.bio, p.photo_url, p.created_at, p.updated_at";

#[derive(Clone)]
pub struct SqliteFamilyRepository {
    pool: SqlitePool,
}

impl SqliteFamilyRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    fn map_person_row(row: &SqliteRow) -> FamtreeResult<Person> {
        let gender_raw: Option<String> = row.get("gender");
        let gender = gender_raw
            .as_deref()
            .map(Gender::from_str)
            .transpose()
            .map_err(FamtreeError::Internal)?;

        Ok(Person {
            id: row.get("id"),
            first_name: row.get("first_name"),
            last_name: row.get("last_name"),
            gender,
            birth_date: row.get("birth_date"),
            death_date: row.get("death_date"),
            bio: row.get("bio"),
            photo_url: row.get("photo_url"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        })
    }

    fn map_person_rows(rows: Vec<SqliteRow>) -> FamtreeResult<Vec<Person>> {
        rows.iter().map(Self::map_person_row).collect()
    }
}

fn db_err(e: sqlx::Error) -> FamtreeError {
    FamtreeError::Database(e.to_string())
}

/// Empty form fields are stored as NULL.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

#[async_trait]
impl PersonRepository for SqliteFamilyRepository {
    async fn get_by_id(&self, id: i64) -> FamtreeResult<Option<Person>> {
        let row = sqlx::query(&format!("select {PERSON_COLUMNS} from people p where p.id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;

        row.as_ref().map(Self::map_person_row).transpose()
    }

    async fn create(&self, person: NewPerson) -> FamtreeResult<Person> {
        let now = Utc::now();
        let birth_date = non_empty(person.birth_date);
        let death_date = non_empty(person.death_date);
        let bio = non_empty(person.bio);
        let photo_url = non_empty(person.photo_url);

        let result = sqlx::query(
            "insert into people
             (first_name, last_name, gender, birth_date, death_date, bio, photo_url, created_at, updated_at)
             values (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&person.first_name)
        .bind(&person.last_name)
        .bind(person.gender.as_str())
        .bind(&birth_date)
        .bind(&death_date)
        .bind(&bio)
        .bind(&photo_url)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        let id = result.last_insert_rowid();
        tracing::debug!(person_id = id, "person created");

        Ok(Person {
            id,
            first_name: person.first_name,
            last_name: person.last_name,
            gender: Some(person.gender),
            birth_date,
            death_date,
            bio,
            photo_url,
            created_at: now,
            updated_at: now,
        })
    }

    async fn update(&self, person: Person) -> FamtreeResult<Person> {
        let now = Utc::now();
        let birth_date = non_empty(person.birth_date);
        let death_date = non_empty(person.death_date);
        let bio = non_empty(person.bio);
        let photo_url = non_empty(person.photo_url);

        let result = sqlx::query(
            "update people
             set first_name = ?, last_name = ?, gender = ?, birth_date = ?,
                 death_date = ?, bio = ?, photo_url = ?, updated_at = ?
             where id = ?",
        )
        .bind(&person.first_name)
        .bind(&person.last_name)
        .bind(person.gender.map(|g| g.as_str()))
        .bind(&birth_date)
        .bind(&death_date)
        .bind(&bio)
        .bind(&photo_url)
        .bind(now)
        .bind(person.id)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        if result.rows_affected() == 0 {
            return Err(FamtreeError::NotFound(format!(
                "person not found: {}",
                person.id
            )));
        }
        tracing::debug!(person_id = person.id, "person updated");

        self.get_by_id(person.id)
            .await?
            .ok_or_else(|| FamtreeError::NotFound(format!("person not found: {}", person.id)))
    }

    async fn list_recent(&self, limit: i64) -> FamtreeResult<Vec<Person>> {
        let rows = sqlx::query(&format!(
            "select {PERSON_COLUMNS} from people p
             order by p.created_at desc, p.id desc
             limit ?"
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        Self::map_person_rows(rows)
    }

    async fn search(&self, term: &str) -> FamtreeResult<Vec<Person>> {
        // instr() is case-sensitive and treats the term literally.
        let rows = sqlx::query(&format!(
            "select {PERSON_COLUMNS} from people p
             where instr(p.first_name, ?) > 0 or instr(p.last_name, ?) > 0
             order by p.id"
        ))
        .bind(term)
        .bind(term)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        Self::map_person_rows(rows)
    }
}

#[async_trait]
impl RelationshipRepository for SqliteFamilyRepository {
    async fn create(&self, relationship: NewRelationship) -> FamtreeResult<Relationship> {
        let now = Utc::now();
        let marriage_date = non_empty(relationship.marriage_date);
        let divorce_date = non_empty(relationship.divorce_date);

        let result = sqlx::query(
            "insert into relationships
             (person1_id, person2_id, relationship_type, parent_role, marriage_date, divorce_date, created_at, updated_at)
             values (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(relationship.person1_id)
        .bind(relationship.person2_id)
        .bind(relationship.relationship_type.as_str())
        .bind(relationship.parent_role.map(|r| r.as_str()))
        .bind(&marriage_date)
        .bind(&divorce_date)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        let id = result.last_insert_rowid();
        tracing::debug!(
            relationship_id = id,
            kind = relationship.relationship_type.as_str(),
            "relationship created"
        );

        Ok(Relationship {
            id,
            person1_id: relationship.person1_id,
            person2_id: relationship.person2_id,
            relationship_type: relationship.relationship_type,
            parent_role: relationship.parent_role,
            marriage_date,
            divorce_date,
            created_at: now,
            updated_at: now,
        })
    }

    async fn get_parents(&self, child_id: i64) -> FamtreeResult<Parents> {
        let rows = sqlx::query(&format!(
            "select {PERSON_COLUMNS}, r.parent_role
             from relationships r
             join people p on p.id = r.person1_id
             where r.person2_id = ? and r.relationship_type = ?
             order by r.id"
        ))
        .bind(child_id)
        .bind(RelationshipType::ParentChild.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        let mut parents = Parents::default();
        for row in &rows {
            let parent = Self::map_person_row(row)?;
            let role_raw: Option<String> = row.get("parent_role");
            let role = match role_raw.as_deref() {
                Some(raw) => Some(ParentRole::from_str(raw).map_err(FamtreeError::Internal)?),
                None => parent.gender.map(|g| g.default_parent_role()),
            };

            // Later rows overwrite earlier ones for the same slot.
            match role {
                Some(ParentRole::Father) => parents.father = Some(parent),
                Some(ParentRole::Mother) => parents.mother = Some(parent),
                None => {
                    tracing::warn!(
                        child_id,
                        parent_id = parent.id,
                        "parent has neither a recorded role nor a gender; skipping"
                    );
                }
            }
        }

        Ok(parents)
    }

    async fn get_spouse(&self, person_id: i64) -> FamtreeResult<Option<Person>> {
        let row = sqlx::query(&format!(
            "select {PERSON_COLUMNS}
             from relationships r
             join people p on p.id = (case when r.person1_id = ? then r.person2_id else r.person1_id end)
             where (r.person1_id = ? or r.person2_id = ?)
               and r.relationship_type = ?
               and (r.divorce_date is null or r.divorce_date = '')
             order by r.id
             limit 1"
        ))
        .bind(person_id)
        .bind(person_id)
        .bind(person_id)
        .bind(RelationshipType::Spouse.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        row.as_ref().map(Self::map_person_row).transpose()
    }

    async fn get_children(&self, parent_id: i64) -> FamtreeResult<Vec<Person>> {
        let rows = sqlx::query(&format!(
            "select {PERSON_COLUMNS}
             from relationships r
             join people p on p.id = r.person2_id
             where r.person1_id = ? and r.relationship_type = ?
             order by r.id"
        ))
        .bind(parent_id)
        .bind(RelationshipType::ParentChild.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        Self::map_person_rows(rows)
    }
}
