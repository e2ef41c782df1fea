//! Raw flow-graph descriptions, as shipped in the diagram asset.
//!
//! ```json
//! {
//!   "nodes": [{ "id": "11554", "class": "origination", "data": { "label": "Wire Gateway" } }],
//!   "edges": [{ "source": "11554", "target": ["2001", "2002"] }]
//! }
//! ```

/// A raw, unpositioned graph: nodes tagged with a category, and edges.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RawGraph {
    #[cfg_attr(feature = "serde", serde(default))]
    pub nodes: Vec<RawNode>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub edges: Vec<RawEdge>,
}

impl RawGraph {
    pub fn new(nodes: Vec<RawNode>, edges: Vec<RawEdge>) -> Self {
        Self { nodes, edges }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }
}

/// A graph node before layout. The id doubles as the system's AIT number.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RawNode {
    pub id: String,
    /// Category tag used to pick the diagram section.
    #[cfg_attr(feature = "serde", serde(rename = "class", alias = "category", default))]
    pub category: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub data: RawNodeData,
}

impl RawNode {
    pub fn new(
        id: impl Into<String>,
        category: impl Into<String>,
        label: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            category: category.into(),
            data: RawNodeData {
                label: label.into(),
            },
        }
    }

    pub fn label(&self) -> &str {
        &self.data.label
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RawNodeData {
    #[cfg_attr(feature = "serde", serde(default))]
    pub label: String,
}

/// A directed edge from one source to one or many targets.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RawEdge {
    /// Explicit id. Only honoured for single-target edges.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub id: Option<String>,
    pub source: String,
    pub target: EdgeTarget,
}

impl RawEdge {
    pub fn new(source: impl Into<String>, target: impl Into<EdgeTarget>) -> Self {
        Self {
            id: None,
            source: source.into(),
            target: target.into(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

/// Edge target: a single node id or a fan-out list.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum EdgeTarget {
    One(String),
    Many(Vec<String>),
}

impl From<&str> for EdgeTarget {
    fn from(target: &str) -> Self {
        EdgeTarget::One(target.to_string())
    }
}

impl From<String> for EdgeTarget {
    fn from(target: String) -> Self {
        EdgeTarget::One(target)
    }
}

impl<S: Into<String>> From<Vec<S>> for EdgeTarget {
    fn from(targets: Vec<S>) -> Self {
        EdgeTarget::Many(targets.into_iter().map(Into::into).collect())
    }
}
