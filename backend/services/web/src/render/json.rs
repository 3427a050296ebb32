//! Nested JSON export of a descendant tree.

use serde::Serialize;
use serde_json::Value;

use famtree_common::error::{FamtreeError, FamtreeResult};
use famtree_db::family::models::Person;

use crate::render::escape::escape_html;
use crate::tree::TreeNode;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonNode {
    id: i64,
    name: String,
    birth_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    death_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    spouse: Option<JsonSpouse>,
    /// `null` stands for a child beyond the requested depth.
    children: Vec<Option<JsonNode>>,
}

#[derive(Debug, Serialize)]
struct JsonSpouse {
    id: i64,
    name: String,
}

fn escaped_name(person: &Person) -> String {
    escape_html(&person.full_name())
}

impl From<&TreeNode> for JsonNode {
    fn from(node: &TreeNode) -> Self {
        let person = &node.person;
        Self {
            id: person.id,
            name: escaped_name(person),
            birth_date: person
                .birth_date
                .as_deref()
                .map(escape_html)
                .unwrap_or_else(|| "Unknown".to_string()),
            death_date: person.death_date.as_deref().map(escape_html),
            spouse: node.spouse.as_ref().map(|s| JsonSpouse {
                id: s.id,
                name: escaped_name(s),
            }),
            children: node
                .children
                .iter()
                .map(|child| Some(JsonNode::from(child)))
                .chain(std::iter::repeat_with(|| None).take(node.hidden_children))
                .collect(),
        }
    }
}

/// `null` when there is no tree.
pub fn tree_to_json(node: Option<&TreeNode>) -> FamtreeResult<Value> {
    match node {
        Some(node) => serde_json::to_value(JsonNode::from(node))
            .map_err(|e| FamtreeError::Internal(format!("tree export: {e}"))),
        None => Ok(Value::Null),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::cards::fixtures::person;
    use famtree_db::family::models::Gender;
    use serde_json::json;

    fn leaf(person: Person) -> TreeNode {
        TreeNode {
            person,
            spouse: None,
            father: None,
            mother: None,
            children: Vec::new(),
            hidden_children: 0,
        }
    }

    #[test]
    fn missing_tree_is_null() {
        assert_eq!(tree_to_json(None).unwrap(), Value::Null);
    }

    #[test]
    fn nested_export_matches_expected_shape() {
        let mut root_person = person(1, "Tom", "O'Hara", Gender::Male);
        root_person.birth_date = Some("1950-01-01".to_string());
        root_person.death_date = Some("2020-02-02".to_string());
        let mut root = leaf(root_person);
        root.spouse = Some(person(2, "Eve", "O'Hara", Gender::Female));
        root.children.push(leaf(person(3, "Sam", "<b>", Gender::Male)));

        let value = tree_to_json(Some(&root)).unwrap();
        assert_eq!(
            value,
            json!({
                "id": 1,
                "name": "Tom O&#039;Hara",
                "birthDate": "1950-01-01",
                "deathDate": "2020-02-02",
                "spouse": {"id": 2, "name": "Eve O&#039;Hara"},
                "children": [{
                    "id": 3,
                    "name": "Sam &lt;b&gt;",
                    "birthDate": "Unknown",
                    "children": []
                }]
            })
        );
    }

    #[test]
    fn children_past_depth_export_as_null() {
        let mut root = leaf(person(1, "Dad", "Ng", Gender::Male));
        root.children.push(leaf(person(2, "Kid", "Ng", Gender::Female)));
        root.children[0].hidden_children = 2;

        let value = tree_to_json(Some(&root)).unwrap();
        assert_eq!(value["children"][0]["children"], json!([null, null]));
    }
}
