use famtree_common::error::{FamtreeError, FamtreeResult};
use famtree_db::family::models::Person;
use famtree_db::family::repositories::{FamilyStore, PersonRepository, RelationshipRepository};
use serde::Deserialize;

use crate::params::{lenient_i64, non_empty, QueryParams};
use crate::people::requests::{LinkAnchor, LinkRequest, PersonForm};
use crate::render::cards::{profile_href, render_person_card};
use crate::render::escape::escape_html;
use crate::render::forms;
use crate::render::profile::{render_person_profile, ProfileView};
use crate::reply::Reply;

// ── queries ──

#[derive(Debug, Deserialize)]
struct IdQuery {
    #[serde(default, deserialize_with = "lenient_i64")]
    id: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct PersonIdQuery {
    #[serde(default, deserialize_with = "lenient_i64")]
    person_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct SearchQuery {
    #[serde(default, deserialize_with = "non_empty")]
    search_term: Option<String>,
}

// ── helpers ──

/// A positive id, or a validation error.
fn positive_id(raw: Option<i64>) -> FamtreeResult<i64> {
    raw.filter(|id| *id > 0)
        .ok_or_else(|| FamtreeError::Validation("Invalid person ID.".to_string()))
}

fn id_param(params: &QueryParams) -> FamtreeResult<i64> {
    positive_id(params.deserialize::<IdQuery>()?.id)
}

async fn require_person<S>(store: &S, id: i64) -> FamtreeResult<Person>
where
    S: FamilyStore + ?Sized,
{
    store
        .get_by_id(id)
        .await?
        .ok_or_else(|| FamtreeError::NotFound(format!("person {id}")))
}

fn cards(people: &[Person]) -> String {
    people.iter().map(render_person_card).collect()
}

fn view_profile_button(id: i64) -> String {
    format!(
        "<a href=\"{}\" class=\"btn-primary\">View Profile</a>\n",
        profile_href(id)
    )
}

// ── read pages ──

pub async fn home<S>(store: &S, limit: i64) -> FamtreeResult<Reply>
where
    S: FamilyStore + ?Sized,
{
    let recent = store.list_recent(limit).await?;

    let mut content = String::from("<h2>Welcome to Family Tree Application</h2>\n");
    content.push_str("<div class=\"home-actions\">\n");
    content.push_str("  <a href=\"?action=add_person\" class=\"btn-primary\">Add New Person</a>\n");
    content.push_str("  <a href=\"?action=view_tree\" class=\"btn-primary\">View Family Tree</a>\n");
    content.push_str("</div>\n");
    content.push_str("<h3>Recently Added People</h3>\n");
    content.push_str("<div class=\"recent-people\">\n");
    content.push_str(&cards(&recent));
    content.push_str("</div>\n");
    Ok(Reply::page(content))
}

pub async fn view_profile<S>(store: &S, params: &QueryParams) -> FamtreeResult<Reply>
where
    S: FamilyStore + ?Sized,
{
    let id = id_param(params)?;
    let person = require_person(store, id).await?;
    let view = ProfileView {
        parents: store.get_parents(id).await?,
        spouse: store.get_spouse(id).await?,
        children: store.get_children(id).await?,
        person,
    };
    Ok(Reply::page(render_person_profile(&view)))
}

pub async fn search<S>(store: &S, params: &QueryParams) -> FamtreeResult<Reply>
where
    S: FamilyStore + ?Sized,
{
    let query: SearchQuery = params.deserialize()?;
    let term = query.search_term.as_deref();

    let mut content = String::from("<h2>Search Results</h2>\n");
    match term {
        Some(term) => {
            let found = store.search(term).await?;
            content.push_str("<div class=\"search-results\">\n");
            content.push_str(&cards(&found));
            content.push_str("</div>\n");
            if found.is_empty() {
                content.push_str(&format!(
                    "<p>No results found for &quot;{}&quot;.</p>\n",
                    escape_html(term)
                ));
            }
        }
        None => content.push_str("<p>Please enter a search term.</p>\n"),
    }
    content.push_str(&forms::render_search_form(term));
    Ok(Reply::page(content))
}

pub fn login() -> Reply {
    Reply::page(forms::render_login_form())
}

// ── add ──

pub async fn add_person<S>(store: &S, params: &QueryParams) -> FamtreeResult<Reply>
where
    S: FamilyStore + ?Sized,
{
    let link = LinkRequest::from_params(params, LinkAnchor::PersonId)?;
    let anchor = match &link {
        Some(link) => store.get_by_id(link.anchor_id).await?,
        None => None,
    };
    // a link to a person that does not exist is dropped
    let link = link.filter(|_| anchor.is_some());
    Ok(Reply::page(forms::render_add_person_form(
        link.as_ref(),
        anchor.as_ref(),
    )))
}

pub async fn process_add_person<S>(store: &S, params: &QueryParams) -> FamtreeResult<Reply>
where
    S: FamilyStore + ?Sized,
{
    let form = PersonForm::from_params(params)?;
    let person = match PersonRepository::create(store, form.into_new_person()).await {
        Ok(person) => person,
        Err(e) => {
            tracing::error!(error = %e, "failed to add person");
            return Ok(Reply::message("Error adding person."));
        }
    };
    tracing::info!(person_id = person.id, "person added");

    let mut content = String::from("<p>Person added successfully.</p>\n");
    let link = LinkRequest::from_params(params, LinkAnchor::ParentId)?;
    if let Some(link) = link.filter(|l| l.anchor_id > 0) {
        if let Err(e) = save_link(store, &link, &person).await {
            tracing::error!(error = %e, anchor_id = link.anchor_id, "failed to link new person");
            content.push_str("<p>The family link could not be saved.</p>\n");
        }
    }
    content.push_str(&view_profile_button(person.id));
    Ok(Reply::page(content))
}

/// The person row already exists here, so any failure only loses the link.
async fn save_link<S>(store: &S, link: &LinkRequest, person: &Person) -> FamtreeResult<()>
where
    S: FamilyStore + ?Sized,
{
    let anchor_gender = store
        .get_by_id(link.anchor_id)
        .await?
        .and_then(|anchor| anchor.gender);
    let relationship = link.relationship_for(person, anchor_gender);
    let rel = RelationshipRepository::create(store, relationship).await?;
    tracing::info!(
        relationship_id = rel.id,
        kind = link.kind.as_str(),
        "relationship added"
    );
    Ok(())
}

pub async fn add_family_member<S>(store: &S, params: &QueryParams) -> FamtreeResult<Reply>
where
    S: FamilyStore + ?Sized,
{
    let id = positive_id(params.deserialize::<PersonIdQuery>()?.person_id)?;
    let person = require_person(store, id).await?;
    Ok(Reply::page(forms::render_family_member_chooser(&person)))
}

// ── edit ──

pub async fn edit_person<S>(store: &S, params: &QueryParams) -> FamtreeResult<Reply>
where
    S: FamilyStore + ?Sized,
{
    let id = id_param(params)?;
    let person = require_person(store, id).await?;
    Ok(Reply::page(forms::render_edit_person_form(&person)))
}

pub async fn process_edit_person<S>(store: &S, params: &QueryParams) -> FamtreeResult<Reply>
where
    S: FamilyStore + ?Sized,
{
    let id = id_param(params)?;
    let existing = require_person(store, id).await?;
    let form = PersonForm::from_params(params)?;

    match store.update(form.apply_to(existing)).await {
        Ok(person) => {
            tracing::info!(person_id = person.id, "person updated");
            let mut content = String::from("<p>Person updated successfully.</p>\n");
            content.push_str(&view_profile_button(person.id));
            Ok(Reply::page(content))
        }
        Err(e) => {
            tracing::error!(error = %e, person_id = id, "failed to update person");
            Ok(Reply::message("Error updating person."))
        }
    }
}

// ── delete (confirmation only, nothing is removed) ──

pub fn delete_person(params: &QueryParams) -> FamtreeResult<Reply> {
    let id = id_param(params)?;
    Ok(Reply::page(forms::render_delete_confirmation(id)))
}

pub fn process_delete_person(params: &QueryParams) -> FamtreeResult<Reply> {
    let id = id_param(params)?;
    tracing::warn!(person_id = id, "delete requested but not supported");
    Ok(Reply::page(
        "<p>Person deletion functionality is not implemented in this demo.</p>\n<a href=\"?action=home\" class=\"btn-primary\">Return to Home</a>\n"
            .to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{add_person as seed, link_spouse, memory_store};
    use async_trait::async_trait;
    use famtree_db::family::models::{Gender, NewPerson, NewRelationship, Parents, Relationship};
    use famtree_db::family::sqlite_repository::SqliteFamilyRepository;

    /// Creates people normally but fails every lookup by id.
    struct LookupFails(SqliteFamilyRepository);

    #[async_trait]
    impl PersonRepository for LookupFails {
        async fn get_by_id(&self, _id: i64) -> FamtreeResult<Option<Person>> {
            Err(FamtreeError::Database("connection reset".to_string()))
        }
        async fn create(&self, person: NewPerson) -> FamtreeResult<Person> {
            PersonRepository::create(&self.0, person).await
        }
        async fn update(&self, person: Person) -> FamtreeResult<Person> {
            self.0.update(person).await
        }
        async fn list_recent(&self, limit: i64) -> FamtreeResult<Vec<Person>> {
            self.0.list_recent(limit).await
        }
        async fn search(&self, term: &str) -> FamtreeResult<Vec<Person>> {
            self.0.search(term).await
        }
    }

    #[async_trait]
    impl RelationshipRepository for LookupFails {
        async fn create(&self, relationship: NewRelationship) -> FamtreeResult<Relationship> {
            RelationshipRepository::create(&self.0, relationship).await
        }
        async fn get_parents(&self, child_id: i64) -> FamtreeResult<Parents> {
            self.0.get_parents(child_id).await
        }
        async fn get_spouse(&self, person_id: i64) -> FamtreeResult<Option<Person>> {
            self.0.get_spouse(person_id).await
        }
        async fn get_children(&self, parent_id: i64) -> FamtreeResult<Vec<Person>> {
            self.0.get_children(parent_id).await
        }
    }

    fn html(reply: Reply) -> String {
        match reply {
            Reply::Html(page) => page.content,
            other => panic!("expected html, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn home_lists_most_recent_first_up_to_limit() {
        let store = memory_store().await;
        for name in ["One", "Two", "Three"] {
            seed(&store, name, "Seed", Gender::Male).await;
        }

        let content = html(home(&store, 2).await.unwrap());
        assert_eq!(content.matches("person-card").count(), 2);
        assert!(content.find("Three Seed").unwrap() < content.find("Two Seed").unwrap());
        assert!(!content.contains("One Seed"));
    }

    #[tokio::test]
    async fn profile_rejects_bad_ids() {
        let store = memory_store().await;
        for query in ["", "id=abc", "id=0", "id=-3"] {
            let err = view_profile(&store, &QueryParams::parse(query)).await.unwrap_err();
            assert_eq!(err, FamtreeError::Validation("Invalid person ID.".to_string()));
        }
        let err = view_profile(&store, &QueryParams::parse("id=9")).await.unwrap_err();
        assert!(matches!(err, FamtreeError::NotFound(_)));
    }

    #[tokio::test]
    async fn spouse_shows_on_both_profiles() {
        let store = memory_store().await;
        let a = seed(&store, "Alex", "Moss", Gender::Male).await;
        let b = seed(&store, "Blair", "Moss", Gender::Female).await;
        link_spouse(&store, &a, &b).await;

        let a_page = html(view_profile(&store, &QueryParams::parse("id=1")).await.unwrap());
        let b_page = html(view_profile(&store, &QueryParams::parse("id=2")).await.unwrap());
        assert!(a_page.contains("<h3>Spouse</h3>") && a_page.contains("Blair Moss"));
        assert!(b_page.contains("<h3>Spouse</h3>") && b_page.contains("Alex Moss"));
    }

    #[tokio::test]
    async fn adding_child_makes_anchor_the_father() {
        let store = memory_store().await;
        let dad = seed(&store, "Pat", "Ray", Gender::Male).await;

        let params = QueryParams::parse(&format!(
            "first_name=Kid&last_name=Ray&gender=F&parent_id={}&relationship_type=parent-child",
            dad.id
        ));
        let content = html(process_add_person(&store, &params).await.unwrap());
        assert!(content.contains("Person added successfully."));

        let kid = store.search("Kid").await.unwrap().remove(0);
        let parents = store.get_parents(kid.id).await.unwrap();
        assert_eq!(parents.father.map(|p| p.id), Some(dad.id));
        assert!(parents.mother.is_none());
    }

    #[tokio::test]
    async fn adding_mother_links_new_person_as_parent() {
        let store = memory_store().await;
        let kid = seed(&store, "Kid", "Ray", Gender::Male).await;

        let params = QueryParams::parse(&format!(
            "first_name=Mae&last_name=Ray&gender=F&parent_id={}&relationship_type=child&parent_role=mother",
            kid.id
        ));
        process_add_person(&store, &params).await.unwrap();

        let parents = store.get_parents(kid.id).await.unwrap();
        assert_eq!(parents.mother.map(|p| p.first_name), Some("Mae".to_string()));
        let mae = store.search("Mae").await.unwrap().remove(0);
        let children = store.get_children(mae.id).await.unwrap();
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].id, kid.id);
    }

    #[tokio::test]
    async fn adding_spouse_links_both_ways_with_marriage_date() {
        let store = memory_store().await;
        let a = seed(&store, "Alex", "Moss", Gender::Male).await;

        let params = QueryParams::parse(&format!(
            "first_name=Blair&last_name=Moss&gender=F&parent_id={}&relationship_type=spouse&marriage_date=1990-06-01",
            a.id
        ));
        let content = html(process_add_person(&store, &params).await.unwrap());
        assert!(!content.contains("could not be saved"));

        let b = store.search("Blair").await.unwrap().remove(0);
        assert_eq!(store.get_spouse(a.id).await.unwrap().map(|p| p.id), Some(b.id));
        assert_eq!(store.get_spouse(b.id).await.unwrap().map(|p| p.id), Some(a.id));

        let (person1_id, person2_id, marriage_date): (i64, i64, Option<String>) = sqlx::query_as(
            "SELECT person1_id, person2_id, marriage_date FROM relationships WHERE relationship_type = 'spouse'",
        )
        .fetch_one(store.pool())
        .await
        .unwrap();
        assert_eq!((person1_id, person2_id), (a.id, b.id));
        assert_eq!(marriage_date.as_deref(), Some("1990-06-01"));
    }

    #[tokio::test]
    async fn failed_anchor_lookup_keeps_new_person() {
        let inner = memory_store().await;
        let a = seed(&inner, "Alex", "Moss", Gender::Male).await;
        let store = LookupFails(inner);

        let params = QueryParams::parse(&format!(
            "first_name=Blair&last_name=Moss&parent_id={}&relationship_type=spouse",
            a.id
        ));
        let content = html(process_add_person(&store, &params).await.unwrap());
        assert!(content.contains("Person added successfully."));
        assert!(content.contains("<p>The family link could not be saved.</p>"));

        let b = store.search("Blair").await.unwrap().remove(0);
        assert!(content.contains(&format!("?action=view_profile&amp;id={}", b.id)));
        assert!(store.get_spouse(a.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn dangling_link_still_adds_person() {
        let store = memory_store().await;
        let params = QueryParams::parse(
            "first_name=Lone&last_name=Wolf&parent_id=404&relationship_type=spouse",
        );
        let content = html(process_add_person(&store, &params).await.unwrap());
        assert!(content.contains("Person added successfully."));
        assert!(content.contains("could not be saved"));
        assert_eq!(store.search("Lone").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn add_without_names_is_rejected() {
        let store = memory_store().await;
        let err = process_add_person(&store, &QueryParams::parse("first_name=Solo"))
            .await
            .unwrap_err();
        assert!(matches!(err, FamtreeError::Validation(_)));
        assert!(store.list_recent(10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn edit_overwrites_fields() {
        let store = memory_store().await;
        let p = seed(&store, "Old", "Name", Gender::Male).await;

        let params = QueryParams::parse(&format!(
            "id={}&first_name=New&last_name=Name&gender=F&bio=Hello",
            p.id
        ));
        let content = html(process_edit_person(&store, &params).await.unwrap());
        assert!(content.contains("Person updated successfully."));

        let stored = store.get_by_id(p.id).await.unwrap().unwrap();
        assert_eq!(stored.first_name, "New");
        assert_eq!(stored.gender, Some(Gender::Female));
        assert_eq!(stored.bio.as_deref(), Some("Hello"));
        assert!(stored.updated_at >= stored.created_at);
    }

    #[tokio::test]
    async fn search_reports_empty_and_missing_terms() {
        let store = memory_store().await;
        seed(&store, "Maria", "Lopez", Gender::Female).await;

        let content = html(search(&store, &QueryParams::default()).await.unwrap());
        assert!(content.contains("Please enter a search term."));

        let content = html(search(&store, &QueryParams::parse("search_term=ari")).await.unwrap());
        assert!(content.contains("Maria Lopez"));

        let content = html(
            search(&store, &QueryParams::parse("search_term=%3Cx%3E"))
                .await
                .unwrap(),
        );
        assert!(content.contains("No results found for &quot;&lt;x&gt;&quot;."));
    }

    #[tokio::test]
    async fn delete_stub_keeps_the_person() {
        let store = memory_store().await;
        let p = seed(&store, "Stay", "Put", Gender::Male).await;

        let params = QueryParams::parse(&format!("id={}", p.id));
        let confirm = html(delete_person(&params).unwrap());
        assert!(confirm.contains("Yes, Delete Person"));
        let ack = html(process_delete_person(&params).unwrap());
        assert!(ack.contains("not implemented"));
        assert!(store.get_by_id(p.id).await.unwrap().is_some());
    }
}
