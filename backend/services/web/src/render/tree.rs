use famtree_common::error::FamtreeResult;
use famtree_db::family::repositories::FamilyStore;

use crate::render::cards::render_person_card;
use crate::tree::{build_tree, TreeNode};

pub fn render_tree_node(node: &TreeNode) -> String {
    let mut out = String::from("<div class=\"tree-level\">\n");
    out.push_str(&render_person_card(&node.person));
    if let Some(spouse) = &node.spouse {
        out.push_str(&render_person_card(spouse));
    }

    if node.father.is_some() || node.mother.is_some() {
        out.push_str("<div class=\"tree-parents\">\n");
        for parent in [&node.father, &node.mother].into_iter().flatten() {
            out.push_str(&render_tree_node(parent));
        }
        out.push_str("</div>\n");
    }

    if !node.children.is_empty() {
        out.push_str("<div class=\"tree-children\">\n");
        for child in &node.children {
            out.push_str(&render_tree_node(child));
        }
        out.push_str("</div>\n");
    }

    out.push_str("</div>\n");
    out
}

/// HTML tree for `root_id`. Empty for `levels <= 0`.
pub async fn render_family_tree<S>(store: &S, root_id: i64, levels: i64) -> FamtreeResult<String>
where
    S: FamilyStore + ?Sized,
{
    if levels <= 0 {
        return Ok(String::new());
    }
    Ok(match build_tree(store, root_id, levels).await? {
        Some(node) => render_tree_node(&node),
        None => "<p>Person not found.</p>\n".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{add_person, link_parent, link_spouse, memory_store};
    use famtree_db::family::models::{Gender, ParentRole};

    #[tokio::test]
    async fn non_positive_levels_render_nothing() {
        let store = memory_store().await;
        add_person(&store, "Ann", "Lee", Gender::Female).await;
        assert_eq!(render_family_tree(&store, 1, 0).await.unwrap(), "");
    }

    #[tokio::test]
    async fn missing_root_reports_not_found() {
        let store = memory_store().await;
        let html = render_family_tree(&store, 42, 3).await.unwrap();
        assert_eq!(html, "<p>Person not found.</p>\n");
    }

    #[tokio::test]
    async fn nested_levels_place_parents_and_children() {
        let store = memory_store().await;
        let dad = add_person(&store, "Dad", "Kim", Gender::Male).await;
        let mom = add_person(&store, "Mom", "Kim", Gender::Female).await;
        let me = add_person(&store, "Me", "Kim", Gender::Male).await;
        let kid = add_person(&store, "Kid", "Kim", Gender::Female).await;
        link_spouse(&store, &dad, &mom).await;
        link_parent(&store, &dad, &me, ParentRole::Father).await;
        link_parent(&store, &mom, &me, ParentRole::Mother).await;
        link_parent(&store, &me, &kid, ParentRole::Father).await;

        let html = render_family_tree(&store, me.id, 2).await.unwrap();
        assert_eq!(html.matches("class=\"tree-level\"").count(), 4);

        let parents = html.find("tree-parents").unwrap();
        let children = html.find("tree-children").unwrap();
        assert!(parents < html.find("Dad Kim").unwrap());
        assert!(html.find("Mom Kim").unwrap() < children);
        assert!(children < html.find("Kid Kim").unwrap());
        assert!(html.contains("person-card female"));
    }
}
