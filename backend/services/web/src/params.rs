//! Request parameters: the query string first, then an urlencoded form body.
//!
//! Decoding follows `application/x-www-form-urlencoded`. When a name repeats,
//! the first occurrence wins; typed views are deserialized from that set.

use std::collections::HashSet;

use famtree_common::error::{FamtreeError, FamtreeResult};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    pub fn parse(raw: &str) -> Self {
        Self::from_pairs(form_urlencoded::parse(raw.as_bytes()).into_owned())
    }

    pub fn from_pairs(pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        Self {
            pairs: pairs.into_iter().collect(),
        }
    }

    /// Query-string parameters followed by those of a form body, if any.
    pub fn from_request(query: Option<&str>, form_body: Option<&str>) -> Self {
        let mut params = Self::parse(query.unwrap_or_default());
        if let Some(body) = form_body {
            params.extend(Self::parse(body));
        }
        params
    }

    /// Append pairs from `other`. Existing names keep precedence.
    pub fn extend(&mut self, other: QueryParams) {
        self.pairs.extend(other.pairs);
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    #[cfg(test)]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Deserialize a typed request. Repeated names after the first are dropped.
    pub fn deserialize<T: DeserializeOwned>(&self) -> FamtreeResult<T> {
        let mut seen = HashSet::new();
        let encoded = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(
                self.pairs
                    .iter()
                    .filter(|(name, _)| seen.insert(name.as_str())),
            )
            .finish();
        serde_urlencoded::from_str(&encoded)
            .map_err(|e| FamtreeError::Validation(format!("malformed parameters: {e}")))
    }
}

/// Whether a request carries an urlencoded form body worth parsing.
pub fn is_form_post(method: &str, content_type: Option<&str>) -> bool {
    method.eq_ignore_ascii_case("POST")
        && content_type.is_some_and(|ct| {
            ct.trim_start()
                .to_ascii_lowercase()
                .starts_with("application/x-www-form-urlencoded")
        })
}

/// Field deserializer: an empty value counts as absent.
pub fn non_empty<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.filter(|v| !v.is_empty()))
}

/// Field deserializer: a value that is not an integer counts as absent.
pub fn lenient_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.and_then(|v| v.trim().parse().ok()))
}
