use famtree_common::error::FamtreeResult;
use famtree_db::family::repositories::FamilyStore;
use serde::Deserialize;

use crate::params::{lenient_i64, QueryParams};
use crate::render::forms::render_tree_controls;
use crate::render::json::tree_to_json;
use crate::render::tree::render_family_tree;
use crate::reply::Reply;
use crate::tree::build_descendants;

pub const DEFAULT_ROOT_ID: i64 = 1;
pub const DEFAULT_TREE_LEVELS: i64 = 3;
pub const MAX_TREE_LEVELS: i64 = 5;

#[derive(Debug, Default, Deserialize)]
struct TreeQuery {
    #[serde(default, deserialize_with = "lenient_i64")]
    root_id: Option<i64>,
    #[serde(default, deserialize_with = "lenient_i64")]
    levels: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeRequest {
    pub root_id: i64,
    pub levels: i64,
}

impl From<TreeQuery> for TreeRequest {
    fn from(query: TreeQuery) -> Self {
        Self {
            root_id: query.root_id.unwrap_or(DEFAULT_ROOT_ID),
            levels: query
                .levels
                .unwrap_or(DEFAULT_TREE_LEVELS)
                .min(MAX_TREE_LEVELS),
        }
    }
}

impl TreeRequest {
    pub fn from_params(params: &QueryParams) -> FamtreeResult<Self> {
        Ok(params.deserialize::<TreeQuery>()?.into())
    }
}

pub async fn view_tree<S>(store: &S, params: &QueryParams) -> FamtreeResult<Reply>
where
    S: FamilyStore + ?Sized,
{
    let request = TreeRequest::from_params(params)?;
    let tree = render_family_tree(store, request.root_id, request.levels).await?;

    let mut content = render_tree_controls(request.root_id, request.levels, MAX_TREE_LEVELS);
    content.push_str("<div class=\"tree-container\">\n");
    content.push_str(&tree);
    content.push_str("</div>\n");
    Ok(Reply::page(content))
}

pub async fn tree_json<S>(store: &S, params: &QueryParams) -> FamtreeResult<Reply>
where
    S: FamilyStore + ?Sized,
{
    let request = TreeRequest::from_params(params)?;
    let tree = build_descendants(store, request.root_id, request.levels).await?;
    Ok(Reply::Json(tree_to_json(tree.as_ref())?))
}
