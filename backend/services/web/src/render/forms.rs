use famtree_db::family::models::{Gender, ParentRole, Person};

use crate::people::requests::{LinkKind, LinkRequest};
use crate::render::escape::{escape_html, escape_opt};

// ── field helpers ──

fn text_field(id: &str, label: &str, kind: &str, value: Option<&str>, required: bool) -> String {
    let value = match value {
        Some(v) => format!(" value=\"{}\"", escape_html(v)),
        None => String::new(),
    };
    let required = if required { " required" } else { "" };
    format!(
        "  <div class=\"form-group\">\n    <label for=\"{id}\">{label}:</label>\n    <input type=\"{kind}\" id=\"{id}\" name=\"{id}\"{value} class=\"form-control\"{required}>\n  </div>\n"
    )
}

fn gender_field(selected: Option<Gender>) -> String {
    let mut out = String::from(
        "  <div class=\"form-group\">\n    <label for=\"gender\">Gender:</label>\n    <select id=\"gender\" name=\"gender\" class=\"form-control\">\n",
    );
    for (gender, label) in [(Gender::Male, "Male"), (Gender::Female, "Female")] {
        let mark = if selected == Some(gender) { " selected" } else { "" };
        out.push_str(&format!(
            "      <option value=\"{}\"{mark}>{label}</option>\n",
            gender.as_str()
        ));
    }
    out.push_str("    </select>\n  </div>\n");
    out
}

fn bio_field(bio: Option<&str>) -> String {
    format!(
        "  <div class=\"form-group\">\n    <label for=\"bio\">Biography:</label>\n    <textarea id=\"bio\" name=\"bio\" class=\"form-control\" rows=\"5\">{}</textarea>\n  </div>\n",
        escape_opt(bio)
    )
}

fn hidden(name: &str, value: &str) -> String {
    format!(
        "  <input type=\"hidden\" name=\"{name}\" value=\"{}\">\n",
        escape_html(value)
    )
}

/// Shared by the add and edit forms.
fn person_fields(person: Option<&Person>) -> String {
    let mut out = String::new();
    out.push_str(&text_field(
        "first_name",
        "First Name",
        "text",
        person.map(|p| p.first_name.as_str()),
        true,
    ));
    out.push_str(&text_field(
        "last_name",
        "Last Name",
        "text",
        person.map(|p| p.last_name.as_str()),
        true,
    ));
    out.push_str(&gender_field(person.and_then(|p| p.gender)));
    out.push_str(&text_field(
        "birth_date",
        "Birth Date",
        "date",
        person.and_then(|p| p.birth_date.as_deref()),
        false,
    ));
    out.push_str(&text_field(
        "death_date",
        "Death Date (if applicable)",
        "date",
        person.and_then(|p| p.death_date.as_deref()),
        false,
    ));
    out.push_str(&bio_field(person.and_then(|p| p.bio.as_deref())));
    out.push_str(&text_field(
        "photo_url",
        "Photo URL",
        "url",
        person.and_then(|p| p.photo_url.as_deref()),
        false,
    ));
    out
}

fn cancel_link(anchor_id: Option<i64>) -> String {
    match anchor_id {
        Some(id) => format!(
            "  <a href=\"?action=view_profile&amp;id={id}\" class=\"btn-secondary\">Cancel</a>\n"
        ),
        None => "  <a href=\"?action=home\" class=\"btn-secondary\">Cancel</a>\n".to_string(),
    }
}

// ── pages ──

/// Add-person form. With a link the new person is attached to the anchor
/// on submit.
pub fn render_add_person_form(link: Option<&LinkRequest>, anchor: Option<&Person>) -> String {
    let mut heading = link.map_or("Add Person", |l| l.heading()).to_string();
    if let Some(anchor) = anchor {
        heading.push_str(&format!(
            " for {} {}",
            escape_html(&anchor.first_name),
            escape_html(&anchor.last_name)
        ));
    }

    let mut out = format!("<h2>{heading}</h2>\n");
    out.push_str("<form action=\"?action=process_add_person\" method=\"post\">\n");
    if let Some(link) = link {
        out.push_str(&hidden("parent_id", &link.anchor_id.to_string()));
        out.push_str(&hidden("relationship_type", link.kind.as_str()));
        if let Some(role) = link.parent_role {
            out.push_str(&hidden("parent_role", role.as_str()));
        }
    }
    out.push_str(&person_fields(None));
    if link.is_some_and(|l| l.kind == LinkKind::Spouse) {
        out.push_str(&text_field("marriage_date", "Marriage Date", "date", None, false));
    }
    out.push_str("  <button type=\"submit\" class=\"btn-primary\">Add Person</button>\n");
    out.push_str(&cancel_link(link.map(|l| l.anchor_id)));
    out.push_str("</form>\n");
    out
}

pub fn render_edit_person_form(person: &Person) -> String {
    let mut out = String::from("<h2>Edit Person</h2>\n");
    out.push_str("<form action=\"?action=process_edit_person\" method=\"post\">\n");
    out.push_str(&hidden("id", &person.id.to_string()));
    out.push_str(&person_fields(Some(person)));
    out.push_str("  <button type=\"submit\" class=\"btn-primary\">Save Changes</button>\n");
    out.push_str(&cancel_link(Some(person.id)));
    out.push_str("</form>\n");
    out
}

pub fn render_family_member_chooser(person: &Person) -> String {
    let id = person.id;
    let add = |query: &str, label: &str| {
        format!(
            "  <a href=\"?action=add_person&amp;person_id={id}&amp;{query}\" class=\"btn-primary\">{label}</a>\n"
        )
    };

    let mut out = format!(
        "<h2>Add Family Member for {} {}</h2>\n",
        escape_html(&person.first_name),
        escape_html(&person.last_name)
    );
    out.push_str("<div class=\"relationship-options\">\n");
    out.push_str(&add(
        &format!("relationship_type=child&amp;parent_role={}", ParentRole::Father.as_str()),
        "Add Father",
    ));
    out.push_str(&add(
        &format!("relationship_type=child&amp;parent_role={}", ParentRole::Mother.as_str()),
        "Add Mother",
    ));
    out.push_str(&add("relationship_type=spouse", "Add Spouse"));
    out.push_str(&add("relationship_type=parent-child", "Add Child"));
    out.push_str(&cancel_link(Some(id)));
    out.push_str("</div>\n");
    out
}

pub fn render_login_form() -> String {
    let mut out = String::from("<h2>Login</h2>\n");
    out.push_str("<div id=\"login-error\" class=\"error-message\"></div>\n");
    out.push_str("<form method=\"post\" action=\"?action=login\">\n");
    out.push_str(&text_field("username", "Username", "text", None, true));
    out.push_str(&text_field("password", "Password", "password", None, true));
    out.push_str("  <button type=\"submit\" class=\"btn-primary\">Login</button>\n");
    out.push_str("</form>\n");
    out.push_str(
        "<p>Note: This is a demo application. Login functionality is not fully implemented.</p>\n",
    );
    out
}

pub fn render_delete_confirmation(id: i64) -> String {
    let mut out = String::from("<h2>Delete Person</h2>\n");
    out.push_str(
        "<p>Are you sure you want to delete this person and all related relationships?</p>\n",
    );
    out.push_str("<form action=\"?action=process_delete_person\" method=\"post\">\n");
    out.push_str(&hidden("id", &id.to_string()));
    out.push_str("  <button type=\"submit\" class=\"btn-primary\">Yes, Delete Person</button>\n");
    out.push_str(&cancel_link(Some(id)));
    out.push_str("</form>\n");
    out
}

pub fn render_search_form(term: Option<&str>) -> String {
    let mut out = String::from("<form action=\"\" method=\"get\">\n");
    out.push_str(&hidden("action", "search"));
    out.push_str(&text_field("search_term", "Search", "text", term, true));
    out.push_str("  <button type=\"submit\" class=\"btn-primary\">Search</button>\n");
    out.push_str("</form>\n");
    out
}

pub fn render_tree_controls(root_id: i64, levels: i64, max_levels: i64) -> String {
    let mut out = String::from("<h2>Family Tree</h2>\n");
    out.push_str("<form action=\"\" method=\"get\" class=\"tree-controls\">\n");
    out.push_str(&hidden("action", "view_tree"));
    out.push_str(&format!(
        "  <div class=\"form-group\">\n    <label for=\"root_id\">Root Person ID:</label>\n    <input type=\"number\" id=\"root_id\" name=\"root_id\" value=\"{root_id}\" class=\"form-control\">\n  </div>\n"
    ));
    out.push_str(&format!(
        "  <div class=\"form-group\">\n    <label for=\"levels\">Number of Generations:</label>\n    <input type=\"number\" id=\"levels\" name=\"levels\" value=\"{levels}\" min=\"1\" max=\"{max_levels}\" class=\"form-control\">\n  </div>\n"
    ));
    out.push_str("  <button type=\"submit\" class=\"btn-primary\">Update Tree</button>\n");
    out.push_str(&format!(
        "  <a href=\"?action=tree_json&amp;root_id={root_id}&amp;levels={levels}\" class=\"btn-secondary\">JSON</a>\n"
    ));
    out.push_str("</form>\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::QueryParams;
    use crate::people::requests::LinkAnchor;
    use crate::render::cards::fixtures::person;

    #[test]
    fn plain_add_form_has_no_link_fields() {
        let html = render_add_person_form(None, None);
        assert!(html.starts_with("<h2>Add Person</h2>"));
        assert!(!html.contains("name=\"parent_id\""));
        assert!(!html.contains("marriage_date"));
        assert!(html.contains("href=\"?action=home\""));
    }

    #[test]
    fn spouse_add_form_carries_link_and_marriage_date() {
        let params = QueryParams::parse("person_id=4&relationship_type=spouse");
        let link = LinkRequest::from_params(&params, LinkAnchor::PersonId)
            .unwrap()
            .unwrap();
        let anchor = person(4, "Ann", "Lee", Gender::Female);

        let html = render_add_person_form(Some(&link), Some(&anchor));
        assert!(html.starts_with("<h2>Add Spouse for Ann Lee</h2>"));
        assert!(html.contains("<input type=\"hidden\" name=\"parent_id\" value=\"4\">"));
        assert!(html.contains("name=\"relationship_type\" value=\"spouse\""));
        assert!(html.contains("id=\"marriage_date\""));
        assert!(html.contains("?action=view_profile&amp;id=4"));
    }

    #[test]
    fn edit_form_is_prefilled_and_escaped() {
        let mut p = person(2, "Jo\"e", "<Doe>", Gender::Female);
        p.bio = Some("a & b".to_string());

        let html = render_edit_person_form(&p);
        assert!(html.contains("value=\"Jo&quot;e\""));
        assert!(html.contains("value=\"&lt;Doe&gt;\""));
        assert!(html.contains("<option value=\"F\" selected>Female</option>"));
        assert!(html.contains("<option value=\"M\">Male</option>"));
        assert!(html.contains(">a &amp; b</textarea>"));
        assert!(html.contains("name=\"id\" value=\"2\""));
    }

    #[test]
    fn chooser_offers_correctly_labelled_links() {
        let html = render_family_member_chooser(&person(3, "Kim", "Park", Gender::Male));
        assert!(html.contains(
            "person_id=3&amp;relationship_type=child&amp;parent_role=father\" class=\"btn-primary\">Add Father"
        ));
        assert!(html.contains("parent_role=mother\" class=\"btn-primary\">Add Mother"));
        assert!(html.contains("relationship_type=spouse\" class=\"btn-primary\">Add Spouse"));
        assert!(html.contains("relationship_type=parent-child\" class=\"btn-primary\">Add Child"));
    }

    #[test]
    fn tree_controls_bound_levels() {
        let html = render_tree_controls(7, 2, 5);
        assert!(html.contains("name=\"root_id\" value=\"7\""));
        assert!(html.contains("value=\"2\" min=\"1\" max=\"5\""));
        assert!(html.contains("?action=tree_json&amp;root_id=7&amp;levels=2"));
    }
}
