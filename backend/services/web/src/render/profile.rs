use famtree_db::family::models::{Parents, Person};

use crate::render::cards::render_person_link;
use crate::render::escape::escape_html;

/// Everything shown on a profile page, fetched up front by the handler.
#[derive(Debug, Clone)]
pub struct ProfileView {
    pub person: Person,
    pub parents: Parents,
    pub spouse: Option<Person>,
    pub children: Vec<Person>,
}

fn family_section<'a>(
    class: &str,
    heading: &str,
    people: impl IntoIterator<Item = &'a Person>,
) -> String {
    let mut items = String::new();
    for person in people {
        items.push_str(&render_person_link(person));
    }
    if items.is_empty() {
        return String::new();
    }
    format!(
        "  <div class=\"family-section {class}\">\n    <h3>{heading}</h3>\n    <ul>\n{items}    </ul>\n  </div>\n"
    )
}

pub fn render_person_profile(view: &ProfileView) -> String {
    let person = &view.person;
    let first = escape_html(&person.first_name);
    let last = escape_html(&person.last_name);

    let mut out = String::from("<div class=\"person-profile\">\n");
    out.push_str(&format!("  <h2>{first} {last}</h2>\n"));
    if let Some(url) = person.photo_url.as_deref() {
        out.push_str(&format!(
            "  <img src=\"{}\" alt=\"{first} {last}\" class=\"profile-photo\">\n",
            escape_html(url)
        ));
    }

    out.push_str("  <div class=\"person-details\">\n");
    let birth = person
        .birth_date
        .as_deref()
        .map(escape_html)
        .unwrap_or_else(|| "Unknown".to_string());
    out.push_str(&format!("    <p><strong>Birth:</strong> {birth}</p>\n"));
    if let Some(death) = person.death_date.as_deref() {
        out.push_str(&format!(
            "    <p><strong>Death:</strong> {}</p>\n",
            escape_html(death)
        ));
    }
    if let Some(bio) = person.bio.as_deref() {
        out.push_str(&format!(
            "    <div class=\"bio\">\n      <h3>Biography</h3>\n      <p>{}</p>\n    </div>\n",
            escape_html(bio)
        ));
    }
    out.push_str("  </div>\n");

    out.push_str(&family_section("parents", "Parents", view.parents.iter()));
    out.push_str(&family_section("spouse", "Spouse", view.spouse.iter()));
    out.push_str(&family_section("children", "Children", view.children.iter()));

    let id = person.id;
    out.push_str("  <div class=\"edit-section\">\n");
    out.push_str(&format!(
        "    <a href=\"?action=edit_person&amp;id={id}\" class=\"btn-primary\">Edit Information</a>\n"
    ));
    out.push_str(&format!(
        "    <a href=\"?action=add_family_member&amp;person_id={id}\" class=\"btn-primary\">Add Family Member</a>\n"
    ));
    out.push_str(&format!(
        "    <a href=\"?action=view_tree&amp;root_id={id}\" class=\"btn-secondary\">View Tree</a>\n"
    ));
    out.push_str(&format!(
        "    <a href=\"?action=delete_person&amp;id={id}\" class=\"btn-secondary\">Delete</a>\n"
    ));
    out.push_str("  </div>\n");

    out.push_str("</div>\n");
    out
}
