use chrono::{Datelike, Utc};

use crate::render::escape::escape_html;
use crate::reply::Page;

const NAV_LINKS: &[(&str, &str)] = &[
    ("?action=home", "Home"),
    ("?action=view_tree", "Family Tree"),
    ("?action=search", "Search"),
    ("?action=login", "Login"),
];

pub fn render_header(title: &str) -> String {
    let title = escape_html(title);
    let mut out = String::from("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    out.push_str("  <meta charset=\"UTF-8\">\n");
    out.push_str(
        "  <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n",
    );
    out.push_str(&format!("  <title>{title}</title>\n"));
    out.push_str("  <link rel=\"stylesheet\" href=\"/styles.css\">\n");
    out.push_str("</head>\n<body>\n  <header>\n");
    out.push_str(&format!("    <h1>{title}</h1>\n"));
    out.push_str("    <nav>\n      <ul>\n");
    for (href, label) in NAV_LINKS {
        out.push_str(&format!("        <li><a href=\"{href}\">{label}</a></li>\n"));
    }
    out.push_str("      </ul>\n    </nav>\n  </header>\n  <main>\n");
    out
}

pub fn render_footer() -> String {
    format!(
        "  </main>\n  <footer>\n    <p>&copy; {} Family Tree Project</p>\n  </footer>\n</body>\n</html>\n",
        Utc::now().year()
    )
}

pub fn render_document(page: &Page) -> String {
    let mut out = render_header(&page.title);
    out.push_str(&page.content);
    out.push_str(&render_footer());
    out
}

/// Minimal page for requests that could not be served at all.
pub fn render_fatal(heading: &str, message: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head><meta charset=\"UTF-8\"><title>{h}</title></head>\n<body>\n<h1>{h}</h1>\n<p>{m}</p>\n</body>\n</html>\n",
        h = escape_html(heading),
        m = escape_html(message),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_wraps_content_between_header_and_footer() {
        let doc = render_document(&Page::new("<p>hello</p>\n".to_string()));
        assert!(doc.starts_with("<!DOCTYPE html>"));
        assert!(doc.contains("<title>Family Tree</title>"));
        assert!(doc.contains("<li><a href=\"?action=view_tree\">Family Tree</a></li>"));

        let main_start = doc.find("<main>").unwrap();
        let content = doc.find("<p>hello</p>").unwrap();
        let main_end = doc.find("</main>").unwrap();
        assert!(main_start < content && content < main_end);
        assert!(doc.trim_end().ends_with("</html>"));
    }

    #[test]
    fn footer_carries_current_year() {
        let year = Utc::now().year().to_string();
        assert!(render_footer().contains(&year));
    }

    #[test]
    fn fatal_page_is_escaped_and_bare() {
        let doc = render_fatal("Database Error", "could not open <db>");
        assert!(doc.contains("<h1>Database Error</h1>"));
        assert!(doc.contains("could not open &lt;db&gt;"));
        assert!(!doc.contains("<nav>"));
    }
}
