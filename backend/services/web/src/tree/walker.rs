//! Generation-bounded traversal of the family graph.
//!
//! Every recursive edge spends one level, so the walk terminates even when
//! the stored relationships form a cycle.

use std::future::Future;
use std::pin::Pin;

use famtree_common::error::FamtreeResult;
use famtree_db::family::models::Person;
use famtree_db::family::repositories::FamilyStore;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    pub person: Person,
    pub spouse: Option<Person>,
    pub father: Option<Box<TreeNode>>,
    pub mother: Option<Box<TreeNode>>,
    pub children: Vec<TreeNode>,
    /// Children that exist but lie past the last generation walked.
    pub hidden_children: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Both,
    Up,
    Down,
}

impl Direction {
    fn ascends(self) -> bool {
        matches!(self, Self::Both | Self::Up)
    }

    fn descends(self) -> bool {
        matches!(self, Self::Both | Self::Down)
    }
}

type WalkFuture<'a> = Pin<Box<dyn Future<Output = FamtreeResult<Option<TreeNode>>> + Send + 'a>>;

/// Tree centred on `root_id`: ancestors above, descendants below.
///
/// Returns `None` when `levels <= 0` or the root does not exist.
pub async fn build_tree<S>(store: &S, root_id: i64, levels: i64) -> FamtreeResult<Option<TreeNode>>
where
    S: FamilyStore + ?Sized,
{
    walk(store, root_id, levels, Direction::Both).await
}

/// Descendants only. Used by the JSON export.
pub async fn build_descendants<S>(
    store: &S,
    root_id: i64,
    levels: i64,
) -> FamtreeResult<Option<TreeNode>>
where
    S: FamilyStore + ?Sized,
{
    walk(store, root_id, levels, Direction::Down).await
}

fn walk<'a, S>(store: &'a S, id: i64, levels: i64, direction: Direction) -> WalkFuture<'a>
where
    S: FamilyStore + ?Sized,
{
    Box::pin(async move {
        if levels <= 0 {
            return Ok(None);
        }
        let Some(person) = store.get_by_id(id).await? else {
            return Ok(None);
        };
        let spouse = store.get_spouse(id).await?;

        let mut node = TreeNode {
            person,
            spouse,
            father: None,
            mother: None,
            children: Vec::new(),
            hidden_children: 0,
        };
        if levels == 1 {
            if direction.descends() {
                node.hidden_children = store.get_children(id).await?.len();
            }
            return Ok(Some(node));
        }

        if direction.ascends() {
            let parents = store.get_parents(id).await?;
            if let Some(father) = parents.father {
                node.father = walk(store, father.id, levels - 1, Direction::Up)
                    .await?
                    .map(Box::new);
            }
            if let Some(mother) = parents.mother {
                node.mother = walk(store, mother.id, levels - 1, Direction::Up)
                    .await?
                    .map(Box::new);
            }
        }

        if direction.descends() {
            for child in store.get_children(id).await? {
                if let Some(child_node) = walk(store, child.id, levels - 1, Direction::Down).await? {
                    node.children.push(child_node);
                }
            }
        }

        tracing::debug!(person_id = id, levels, ?direction, "tree node built");
        Ok(Some(node))
    })
}
