use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Canonical hierarchical path of a node in the resource graph.
///
/// Normalization rules are intentionally simple and deterministic:
/// - segments joined with forward slashes (`/`)
/// - no leading or trailing slash
/// - empty input becomes the root marker `.`
#[derive(
    Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(transparent)]
pub struct NodePath(String);

impl Default for NodePath {
    fn default() -> Self {
        NodePath::new(".")
    }
}

impl NodePath {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        let v = s.as_ref().trim_matches('/').to_string();
        if v.is_empty() {
            return Self(".".to_string());
        }
        Self(v)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn join(&self, segment: &str) -> NodePath {
        NodePath::new(format!("{}/{}", self.0, segment.trim_matches('/')))
    }

    /// Substring match against the full hierarchical path. This is the
    /// matching primitive suppression predicates use.
    pub fn contains(&self, needle: &str) -> bool {
        self.0.contains(needle)
    }

    /// True if `self` sits strictly below `ancestor` in the hierarchy.
    pub fn is_descendant_of(&self, ancestor: &NodePath) -> bool {
        self.0.len() > ancestor.0.len()
            && self.0.starts_with(ancestor.0.as_str())
            && self.0.as_bytes()[ancestor.0.len()] == b'/'
    }
}

impl std::fmt::Display for NodePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
