use famtree_db::family::models::Person;

use crate::render::escape::escape_html;

pub fn profile_href(id: i64) -> String {
    format!("?action=view_profile&amp;id={id}")
}

/// Compact card used on the home page, search results and tree views.
pub fn render_person_card(person: &Person) -> String {
    let first = escape_html(&person.first_name);
    let last = escape_html(&person.last_name);

    let mut out = format!(
        "<div class=\"person-card {}\">\n",
        person.gender_class()
    );
    match person.photo_url.as_deref() {
        Some(url) => out.push_str(&format!(
            "  <img src=\"{}\" alt=\"{first} {last}\" class=\"person-photo\">\n",
            escape_html(url)
        )),
        None => out.push_str("  <div class=\"person-photo-placeholder\"></div>\n"),
    }
    out.push_str(&format!("  <h3>{first} {last}</h3>\n"));
    if let Some(born) = person.birth_date.as_deref() {
        out.push_str(&format!("  <p>Born: {}</p>\n", escape_html(born)));
    }
    if let Some(died) = person.death_date.as_deref() {
        out.push_str(&format!("  <p>Died: {}</p>\n", escape_html(died)));
    }
    out.push_str(&format!(
        "  <a href=\"{}\" class=\"btn-primary\">View Profile</a>\n",
        profile_href(person.id)
    ));
    out.push_str("</div>\n");
    out
}

/// `<li>` linking to a person's profile.
pub fn render_person_link(person: &Person) -> String {
    format!(
        "      <li><a href=\"{}\">{} {}</a></li>\n",
        profile_href(person.id),
        escape_html(&person.first_name),
        escape_html(&person.last_name)
    )
}

#[cfg(test)]
pub(crate) mod fixtures {
    use chrono::Utc;
    use famtree_db::family::models::{Gender, Person};

    pub fn person(id: i64, first: &str, last: &str, gender: Gender) -> Person {
        let now = Utc::now();
        Person {
            id,
            first_name: first.to_string(),
            last_name: last.to_string(),
            gender: Some(gender),
            birth_date: None,
            death_date: None,
            bio: None,
            photo_url: None,
            created_at: now,
            updated_at: now,
        }
    }
}
