//! Sectioned flow-diagram layout.
//!
//! A raw graph description (nodes tagged with a category, edges with one or
//! many targets) is placed into fixed diagram sections using a static slot
//! table per section. The resulting [`Diagram`] is immutable; responsive
//! resizing always derives a new diagram from it via [`Diagram::relayout`],
//! so re-running the resize any number of times never accumulates drift.
//!
//! Coordinates are absolute diagram units, with sections laid out left to
//! right at `y = 0`.

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use wirewatch_types::{EdgeTarget, RawGraph};

/// Stroke color shared by every edge and its markers.
pub const EDGE_COLOR: &str = "#6b7280";
/// Stroke width shared by every edge.
pub const EDGE_WIDTH: f64 = 2.0;

/// Problems with a section layout configuration.
#[derive(Debug, Error, PartialEq)]
pub enum LayoutConfigError {
    #[error("layout has no sections")]
    NoSections,

    #[error("section '{0}' appears more than once")]
    DuplicateSection(String),

    #[error("section '{id}' has non-positive size {width}x{height}")]
    NonPositiveSize { id: String, width: f64, height: f64 },

    #[error("section proportions sum to {0}, expected 1")]
    ProportionSum(f64),

    #[error("section '{id}' has invalid proportion {proportion}")]
    InvalidProportion { id: String, proportion: f64 },

    #[error("category '{category}' maps to unknown section '{section}'")]
    UnknownSection { category: String, section: String },

    #[error("gap must be non-negative, got {0}")]
    NegativeGap(f64),

    #[error("overflow step must be positive, got {0}")]
    NonPositiveStep(f64),
}

/// A point in diagram coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Width and height in diagram units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

/// One diagram section: its box, its slot table and its share of the width.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionConfig {
    pub id: String,
    pub title: String,
    pub x: f64,
    pub width: f64,
    pub height: f64,
    /// Column used for nodes past the end of the slot table.
    pub base_x: f64,
    pub slots: Vec<Position>,
    /// Share of the available width during re-layout.
    pub proportion: f64,
}

/// Static section layout, built once at startup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub sections: Vec<SectionConfig>,
    /// Node category to section id.
    pub categories: BTreeMap<String, String>,
    pub gap: f64,
    pub overflow_start_y: f64,
    pub overflow_step: f64,
}

impl Default for LayoutConfig {
    /// The US wires layout: four sections from origination to processing.
    fn default() -> Self {
        fn slots(points: &[(f64, f64)]) -> Vec<Position> {
            points.iter().map(|&(x, y)| Position::new(x, y)).collect()
        }

        let sections = vec![
            SectionConfig {
                id: "bg-origination".into(),
                title: "Origination".into(),
                x: 0.0,
                width: 350.0,
                height: 960.0,
                base_x: 50.0,
                slots: slots(&[
                    (50.0, 100.0),
                    (50.0, 220.0),
                    (50.0, 340.0),
                    (50.0, 460.0),
                    (50.0, 580.0),
                    (50.0, 700.0),
                ]),
                proportion: 0.2,
            },
            SectionConfig {
                id: "bg-validation".into(),
                title: "Payment Validation and Routing".into(),
                x: 350.0,
                width: 350.0,
                height: 960.0,
                base_x: 425.0,
                slots: slots(&[
                    (425.0, 100.0),
                    (425.0, 220.0),
                    (425.0, 340.0),
                    (425.0, 480.0),
                    (425.0, 590.0),
                    (425.0, 700.0),
                ]),
                proportion: 0.2,
            },
            SectionConfig {
                id: "bg-middleware".into(),
                title: "Middleware".into(),
                x: 700.0,
                width: 450.0,
                height: 960.0,
                base_x: 750.0,
                slots: slots(&[(750.0, 220.0), (950.0, 400.0)]),
                proportion: 0.25,
            },
            SectionConfig {
                id: "bg-processing".into(),
                title: "Payment Processing, Sanctions & Investigation".into(),
                x: 1150.0,
                width: 500.0,
                height: 960.0,
                base_x: 1200.0,
                slots: slots(&[
                    (1200.0, 160.0),
                    (1420.0, 160.0),
                    (1310.0, 300.0),
                    (1310.0, 420.0),
                    (1200.0, 580.0),
                    (1200.0, 700.0),
                    (1200.0, 820.0),
                ]),
                proportion: 0.35,
            },
        ];

        let categories = [
            ("origination", "bg-origination"),
            ("validation", "bg-validation"),
            ("middleware", "bg-middleware"),
            ("processing", "bg-processing"),
        ]
        .into_iter()
        .map(|(c, s)| (c.to_string(), s.to_string()))
        .collect();

        Self {
            sections,
            categories,
            gap: 16.0,
            overflow_start_y: 100.0,
            overflow_step: 120.0,
        }
    }
}

impl LayoutConfig {
    /// Check the configuration for internal consistency.
    pub fn validate(&self) -> Result<(), LayoutConfigError> {
        if self.sections.is_empty() {
            return Err(LayoutConfigError::NoSections);
        }

        let mut seen = HashSet::new();
        for section in &self.sections {
            if !seen.insert(section.id.as_str()) {
                return Err(LayoutConfigError::DuplicateSection(section.id.clone()));
            }
            if section.width <= 0.0 || section.height <= 0.0 {
                return Err(LayoutConfigError::NonPositiveSize {
                    id: section.id.clone(),
                    width: section.width,
                    height: section.height,
                });
            }
            if !(section.proportion > 0.0 && section.proportion.is_finite()) {
                return Err(LayoutConfigError::InvalidProportion {
                    id: section.id.clone(),
                    proportion: section.proportion,
                });
            }
        }

        let sum: f64 = self.sections.iter().map(|s| s.proportion).sum();
        if (sum - 1.0).abs() > 1e-6 {
            return Err(LayoutConfigError::ProportionSum(sum));
        }

        for (category, section) in &self.categories {
            if !seen.contains(section.as_str()) {
                return Err(LayoutConfigError::UnknownSection {
                    category: category.clone(),
                    section: section.clone(),
                });
            }
        }

        if self.gap < 0.0 {
            return Err(LayoutConfigError::NegativeGap(self.gap));
        }
        if self.overflow_step <= 0.0 {
            return Err(LayoutConfigError::NonPositiveStep(self.overflow_step));
        }

        Ok(())
    }

    pub fn section(&self, id: &str) -> Option<&SectionConfig> {
        self.sections.iter().find(|s| s.id == id)
    }

    /// Section a node category belongs to, if mapped.
    pub fn section_for(&self, category: &str) -> Option<&SectionConfig> {
        self.categories.get(category).and_then(|id| self.section(id))
    }
}

/// Node kind in the rendered diagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// A monitored system.
    Custom,
    /// A section box drawn behind its systems.
    Background,
}

/// Display data of a diagram node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeData {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtext: Option<String>,
}

/// A positioned diagram node.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagramNode {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub position: Position,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<Size>,
    pub data: NodeData,
    /// Confined to the parent section's box.
    pub extent_parent: bool,
    pub draggable: bool,
    pub selectable: bool,
    pub z_index: i32,
}

impl DiagramNode {
    fn background(section: &SectionConfig) -> Self {
        Self {
            id: section.id.clone(),
            kind: NodeKind::Background,
            position: Position::new(section.x, 0.0),
            parent_id: None,
            size: Some(Size {
                width: section.width,
                height: section.height,
            }),
            data: NodeData {
                title: section.title.clone(),
                subtext: None,
            },
            extent_parent: false,
            draggable: false,
            selectable: false,
            z_index: -1,
        }
    }

    fn system(id: &str, label: &str, position: Position, parent: Option<&str>) -> Self {
        Self {
            id: id.to_string(),
            kind: NodeKind::Custom,
            position,
            parent_id: parent.map(str::to_string),
            size: None,
            data: NodeData {
                title: label.to_string(),
                subtext: Some(format!("AIT {}", id)),
            },
            extent_parent: parent.is_some(),
            draggable: true,
            selectable: true,
            z_index: 0,
        }
    }

    pub fn is_background(&self) -> bool {
        self.kind == NodeKind::Background
    }

    pub fn title(&self) -> &str {
        &self.data.title
    }
}

/// Edge routing style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    Smoothstep,
}

/// Edge end marker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    #[serde(rename = "type")]
    pub kind: MarkerKind,
    pub color: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MarkerKind {
    #[serde(rename = "arrowclosed")]
    ArrowClosed,
}

impl Marker {
    fn closed_arrow() -> Self {
        Self {
            kind: MarkerKind::ArrowClosed,
            color: EDGE_COLOR.to_string(),
        }
    }
}

/// Stroke style of an edge.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeStyle {
    pub stroke: String,
    pub stroke_width: f64,
}

/// A styled, directed diagram edge.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagramEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(rename = "type")]
    pub kind: EdgeKind,
    pub style: EdgeStyle,
    pub marker_start: Marker,
    pub marker_end: Marker,
}

impl DiagramEdge {
    fn new(id: String, source: &str, target: &str) -> Self {
        Self {
            id,
            source: source.to_string(),
            target: target.to_string(),
            kind: EdgeKind::Smoothstep,
            style: EdgeStyle {
                stroke: EDGE_COLOR.to_string(),
                stroke_width: EDGE_WIDTH,
            },
            marker_start: Marker::closed_arrow(),
            marker_end: Marker::closed_arrow(),
        }
    }

    pub fn touches(&self, node_id: &str) -> bool {
        self.source == node_id || self.target == node_id
    }
}

/// A laid-out diagram: section backgrounds first, then systems, plus edges.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Diagram {
    pub nodes: Vec<DiagramNode>,
    pub edges: Vec<DiagramEdge>,
}

impl Diagram {
    /// Lay out a raw graph description against a section configuration.
    ///
    /// Nodes are assigned slots in input order within their section. Nodes
    /// past the end of the slot table stack below the section's base column.
    /// Nodes with an unmapped category are kept at the origin with no parent.
    pub fn transform(graph: &RawGraph, config: &LayoutConfig) -> Self {
        let mut nodes: Vec<DiagramNode> =
            config.sections.iter().map(DiagramNode::background).collect();

        let mut counters: HashMap<&str, usize> = HashMap::new();
        for raw in &graph.nodes {
            let node = match config.section_for(&raw.category) {
                Some(section) => {
                    let index = counters.entry(section.id.as_str()).or_insert(0);
                    let position = section.slots.get(*index).copied().unwrap_or_else(|| {
                        Position::new(
                            section.base_x,
                            config.overflow_start_y + *index as f64 * config.overflow_step,
                        )
                    });
                    *index += 1;
                    DiagramNode::system(&raw.id, raw.label(), position, Some(&section.id))
                }
                None => DiagramNode::system(&raw.id, raw.label(), Position::default(), None),
            };
            nodes.push(node);
        }

        let mut edges = Vec::new();
        for raw in &graph.edges {
            match &raw.target {
                EdgeTarget::Many(targets) => {
                    for target in targets {
                        edges.push(DiagramEdge::new(
                            format!("{}-{}", raw.source, target),
                            &raw.source,
                            target,
                        ));
                    }
                }
                EdgeTarget::One(target) => {
                    let id = raw
                        .id
                        .clone()
                        .unwrap_or_else(|| format!("{}-{}", raw.source, target));
                    edges.push(DiagramEdge::new(id, &raw.source, target));
                }
            }
        }

        Self { nodes, edges }
    }

    /// Fit the diagram to a measured container size.
    ///
    /// Sections are resized by their configured proportion of the available
    /// width and packed left to right with the configured gap. Systems keep
    /// their relative horizontal offset within their section and their
    /// original `y`. Always derived from `self`, so the result for a given
    /// size is stable no matter how often it is recomputed. A non-positive
    /// size, or a width too small to fit the gaps, returns `self` unchanged.
    pub fn relayout(&self, config: &LayoutConfig, width: f64, height: f64) -> Self {
        let section_count = config.sections.len();
        let gaps = config.gap * section_count.saturating_sub(1) as f64;
        let available = width - gaps;

        if !(width > 0.0 && height > 0.0 && available > 0.0) {
            return self.clone();
        }

        // original (x, width) and new (x, width) per section id
        let mut boxes: HashMap<&str, ((f64, f64), (f64, f64))> = HashMap::new();
        let mut cursor = 0.0;
        for section in &config.sections {
            let new_width = available * section.proportion;
            let original = self
                .node(&section.id)
                .map(|n| (n.position.x, n.size.map_or(section.width, |s| s.width)))
                .unwrap_or((section.x, section.width));
            boxes.insert(section.id.as_str(), (original, (cursor, new_width)));
            cursor += new_width + config.gap;
        }

        let nodes = self
            .nodes
            .iter()
            .map(|node| {
                let mut node = node.clone();
                if node.is_background() {
                    if let Some(&(_, (x, w))) = boxes.get(node.id.as_str()) {
                        node.position = Position::new(x, 0.0);
                        node.size = Some(Size {
                            width: w,
                            height,
                        });
                    }
                } else if let Some(&((ox, ow), (nx, nw))) =
                    node.parent_id.as_deref().and_then(|p| boxes.get(p))
                {
                    if ow > 0.0 {
                        node.position.x = nx + (node.position.x - ox) / ow * nw;
                    }
                }
                node
            })
            .collect();

        Self {
            nodes,
            edges: self.edges.clone(),
        }
    }

    pub fn node(&self, id: &str) -> Option<&DiagramNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Section background nodes, in section order.
    pub fn backgrounds(&self) -> impl Iterator<Item = &DiagramNode> {
        self.nodes.iter().filter(|n| n.is_background())
    }

    /// System nodes, in input order.
    pub fn systems(&self) -> impl Iterator<Item = &DiagramNode> {
        self.nodes.iter().filter(|n| !n.is_background())
    }

    /// System nodes belonging to one section.
    pub fn systems_in<'a>(&'a self, section_id: &'a str) -> impl Iterator<Item = &'a DiagramNode> {
        self.systems()
            .filter(move |n| n.parent_id.as_deref() == Some(section_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wirewatch_types::{RawEdge, RawNode};

    fn graph() -> RawGraph {
        RawGraph::new(
            vec![
                RawNode::new("101", "origination", "Online Banking"),
                RawNode::new("102", "origination", "Branch"),
                RawNode::new("201", "validation", "Router"),
                RawNode::new("301", "middleware", "MQ Bridge"),
                RawNode::new("401", "processing", "Core Payments"),
            ],
            vec![
                RawEdge::new("101", vec!["201", "301"]),
                RawEdge::new("201", "401").with_id("route-core"),
                RawEdge::new("301", "401"),
            ],
        )
    }

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(LayoutConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_validate_rejects_bad_configs() {
        let mut config = LayoutConfig::default();
        config.sections[0].proportion = 0.5;
        assert!(matches!(config.validate(), Err(LayoutConfigError::ProportionSum(_))));

        let mut config = LayoutConfig::default();
        config
            .categories
            .insert("settlement".into(), "bg-settlement".into());
        assert!(matches!(
            config.validate(),
            Err(LayoutConfigError::UnknownSection { .. })
        ));

        let mut config = LayoutConfig::default();
        config.sections[2].width = 0.0;
        assert!(matches!(
            config.validate(),
            Err(LayoutConfigError::NonPositiveSize { .. })
        ));

        let mut config = LayoutConfig::default();
        config.sections.clear();
        assert_eq!(config.validate(), Err(LayoutConfigError::NoSections));
    }

    #[test]
    fn test_backgrounds_come_first() {
        let diagram = Diagram::transform(&graph(), &LayoutConfig::default());

        let ids: Vec<&str> = diagram.nodes.iter().take(4).map(|n| n.id.as_str()).collect();
        assert_eq!(
            ids,
            vec!["bg-origination", "bg-validation", "bg-middleware", "bg-processing"]
        );
        assert_eq!(diagram.nodes.len(), 9);

        for bg in diagram.backgrounds() {
            assert!(!bg.draggable);
            assert!(!bg.selectable);
            assert_eq!(bg.z_index, -1);
            assert_eq!(bg.size.unwrap().height, 960.0);
        }
    }

    #[test]
    fn test_slots_assigned_in_input_order() {
        let diagram = Diagram::transform(&graph(), &LayoutConfig::default());

        let first = diagram.node("101").unwrap();
        assert_eq!(first.position, Position::new(50.0, 100.0));
        assert_eq!(first.parent_id.as_deref(), Some("bg-origination"));
        assert!(first.extent_parent);
        assert_eq!(first.data.title, "Online Banking");
        assert_eq!(first.data.subtext.as_deref(), Some("AIT 101"));

        assert_eq!(diagram.node("102").unwrap().position, Position::new(50.0, 220.0));
        assert_eq!(diagram.node("301").unwrap().position, Position::new(750.0, 220.0));
        assert_eq!(diagram.node("401").unwrap().position, Position::new(1200.0, 160.0));
    }

    #[test]
    fn test_slot_overflow() {
        let nodes = (0..4)
            .map(|i| RawNode::new(format!("m{}", i), "middleware", "MW"))
            .collect();
        let diagram = Diagram::transform(&RawGraph::new(nodes, vec![]), &LayoutConfig::default());

        assert_eq!(diagram.node("m1").unwrap().position, Position::new(950.0, 400.0));
        assert_eq!(diagram.node("m2").unwrap().position, Position::new(750.0, 340.0));
        assert_eq!(diagram.node("m3").unwrap().position, Position::new(750.0, 460.0));
    }

    #[test]
    fn test_unmapped_category_at_origin() {
        let graph = RawGraph::new(vec![RawNode::new("999", "settlement", "Ledger")], vec![]);
        let diagram = Diagram::transform(&graph, &LayoutConfig::default());

        let node = diagram.node("999").unwrap();
        assert_eq!(node.position, Position::new(0.0, 0.0));
        assert!(node.parent_id.is_none());
        assert!(!node.extent_parent);
    }

    #[test]
    fn test_edges_expand_targets() {
        let diagram = Diagram::transform(&graph(), &LayoutConfig::default());

        let ids: Vec<&str> = diagram.edges.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["101-201", "101-301", "route-core", "301-401"]);

        for edge in &diagram.edges {
            assert_eq!(edge.kind, EdgeKind::Smoothstep);
            assert_eq!(edge.style.stroke, EDGE_COLOR);
            assert_eq!(edge.style.stroke_width, EDGE_WIDTH);
            assert_eq!(edge.marker_start.kind, MarkerKind::ArrowClosed);
            assert_eq!(edge.marker_end.color, EDGE_COLOR);
        }
    }

    #[test]
    fn test_transform_is_deterministic() {
        let config = LayoutConfig::default();
        assert_eq!(
            Diagram::transform(&graph(), &config),
            Diagram::transform(&graph(), &config)
        );
    }

    #[test]
    fn test_relayout_sections() {
        let config = LayoutConfig::default();
        let diagram = Diagram::transform(&graph(), &config);

        // 1048 - 3 * 16 leaves 1000 units to share
        let resized = diagram.relayout(&config, 1048.0, 600.0);
        let boxes: Vec<(f64, f64)> = resized
            .backgrounds()
            .map(|n| (n.position.x, n.size.unwrap().width))
            .collect();
        assert_eq!(
            boxes,
            vec![(0.0, 200.0), (216.0, 200.0), (432.0, 250.0), (698.0, 350.0)]
        );
        assert!(resized.backgrounds().all(|n| n.size.unwrap().height == 600.0));
    }

    #[test]
    fn test_relayout_children_keep_relative_offset() {
        let config = LayoutConfig::default();
        let diagram = Diagram::transform(&graph(), &config);
        let resized = diagram.relayout(&config, 1048.0, 600.0);

        // (50 - 0) / 350 * 200
        let origination = resized.node("101").unwrap();
        assert!((origination.position.x - 50.0 / 350.0 * 200.0).abs() < 1e-9);
        assert_eq!(origination.position.y, 100.0);

        // 432 + (750 - 700) / 450 * 250
        let middleware = resized.node("301").unwrap();
        assert!((middleware.position.x - (432.0 + 50.0 / 450.0 * 250.0)).abs() < 1e-9);
    }

    #[test]
    fn test_relayout_offset_holds_across_widths() {
        let mut config = LayoutConfig::default();
        let origination = &mut config.sections[0];
        origination.slots[0].x = origination.x + origination.width / 2.0;
        let diagram = Diagram::transform(&graph(), &config);

        let fraction = |d: &Diagram, id: &str| {
            let node = d.node(id).unwrap();
            let section = d.node(node.parent_id.as_deref().unwrap()).unwrap();
            (node.position.x - section.position.x) / section.size.unwrap().width
        };

        for width in [200.0, 777.0, 1048.0, 1650.0, 4096.0] {
            let resized = diagram.relayout(&config, width, 600.0);
            assert!((fraction(&resized, "101") - 0.5).abs() < 1e-9, "width {width}");
            for node in diagram.systems() {
                let before = fraction(&diagram, &node.id);
                let after = fraction(&resized, &node.id);
                assert!((before - after).abs() < 1e-9, "{} at width {width}", node.id);
                assert_eq!(resized.node(&node.id).unwrap().position.y, node.position.y);
            }
        }
    }

    #[test]
    fn test_relayout_is_idempotent() {
        let config = LayoutConfig::default();
        let diagram = Diagram::transform(&graph(), &config);

        let once = diagram.relayout(&config, 900.0, 500.0);
        let twice = diagram.relayout(&config, 900.0, 500.0);
        assert_eq!(once, twice);

        let _ = diagram.relayout(&config, 300.0, 200.0);
        assert_eq!(diagram.relayout(&config, 900.0, 500.0), once);
    }

    #[test]
    fn test_relayout_ignores_degenerate_sizes() {
        let config = LayoutConfig::default();
        let diagram = Diagram::transform(&graph(), &config);

        assert_eq!(diagram.relayout(&config, 0.0, 500.0), diagram);
        assert_eq!(diagram.relayout(&config, 900.0, -1.0), diagram);
        assert_eq!(diagram.relayout(&config, 40.0, 500.0), diagram);
    }

    #[test]
    fn test_relayout_leaves_unparented_nodes() {
        let graph = RawGraph::new(vec![RawNode::new("999", "settlement", "Ledger")], vec![]);
        let config = LayoutConfig::default();
        let diagram = Diagram::transform(&graph, &config);

        let resized = diagram.relayout(&config, 1048.0, 600.0);
        assert_eq!(resized.node("999").unwrap().position, Position::new(0.0, 0.0));
    }

    #[test]
    fn test_serializes_diagram_field_names() {
        let diagram = Diagram::transform(&graph(), &LayoutConfig::default());
        let json = serde_json::to_value(&diagram).unwrap();

        assert_eq!(json["nodes"][0]["type"], "background");
        assert_eq!(json["nodes"][0]["zIndex"], -1);
        assert_eq!(json["nodes"][4]["parentId"], "bg-origination");
        assert_eq!(json["nodes"][4]["extentParent"], true);
        assert_eq!(json["edges"][0]["type"], "smoothstep");
        assert_eq!(json["edges"][0]["markerEnd"]["type"], "arrowclosed");
        assert_eq!(json["edges"][0]["style"]["strokeWidth"], 2.0);
    }
}
