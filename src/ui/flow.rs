//! Flow view rendering.
//!
//! Draws the sectioned diagram fitted to the terminal: sections side by side
//! with their configured proportions, systems at their slot positions,
//! colored by traffic with a trend marker. Re-fitted on every draw, so a
//! resize is picked up on the next frame.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;
use crate::data::{DiagramNode, TrafficStatus, TrendStatus};

/// Diagram units per terminal column.
const CELL_WIDTH: f64 = 8.0;

/// Render the flow diagram and the connections panel.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::vertical([
        Constraint::Min(6),    // Diagram
        Constraint::Length(3), // Connections / legend
    ])
    .split(area);

    render_diagram(frame, app, chunks[0]);
    render_connections(frame, app, chunks[1]);
}

fn render_diagram(frame: &mut Frame, app: &App, area: Rect) {
    let canvas_height = app
        .layout
        .sections
        .iter()
        .map(|s| s.height)
        .fold(0.0, f64::max);

    if app.diagram.nodes.is_empty() || canvas_height <= 0.0 {
        let block = Block::default()
            .title(" Flow ")
            .borders(Borders::ALL)
            .border_type(app.theme.border_type)
            .border_style(Style::default().fg(app.theme.border));
        frame.render_widget(Paragraph::new("No diagram loaded").block(block), area);
        return;
    }

    let fitted = app
        .diagram
        .relayout(&app.layout, f64::from(area.width) * CELL_WIDTH, canvas_height);

    for section in fitted.backgrounds() {
        let Some(rect) = section_rect(section, area) else {
            continue;
        };

        let block = Block::default()
            .title(format!(" {} ", section.title()))
            .borders(Borders::ALL)
            .border_type(app.theme.border_type)
            .border_style(Style::default().fg(app.theme.border));
        frame.render_widget(block, rect);

        for node in fitted.systems_in(&section.id) {
            if let Some(label_area) = label_rect(node, rect, area, canvas_height) {
                frame.render_widget(Paragraph::new(node_label(app, node)), label_area);
            }
        }
    }
}

/// Terminal rectangle of a fitted section background.
fn section_rect(section: &DiagramNode, area: Rect) -> Option<Rect> {
    let size = section.size?;
    let x = area.x + to_cols(section.position.x);
    let right = (area.x + to_cols(section.position.x + size.width)).min(area.right());
    let width = right.saturating_sub(x);
    (width >= 3).then(|| Rect::new(x, area.y, width, area.height))
}

/// One-line area for a system label, kept inside its section's border.
fn label_rect(node: &DiagramNode, section: Rect, area: Rect, canvas_height: f64) -> Option<Rect> {
    let inner_rows = section.height.saturating_sub(2);
    if inner_rows == 0 {
        return None;
    }

    let row = ((node.position.y / canvas_height) * f64::from(inner_rows)) as u16;
    let y = section.y + 1 + row.min(inner_rows - 1);

    let inner_right = section.right().saturating_sub(1);
    let x = (area.x + to_cols(node.position.x)).clamp(section.x + 1, inner_right);
    let width = inner_right.saturating_sub(x);

    (width > 0).then(|| Rect::new(x, y, width, 1))
}

fn to_cols(units: f64) -> u16 {
    (units.max(0.0) / CELL_WIDTH) as u16
}

/// Traffic dot, trend marker and name, styled for cursor, selection,
/// connections and search matches.
fn node_label<'a>(app: &App, node: &'a DiagramNode) -> Line<'a> {
    let (traffic, trend) = app
        .data
        .as_ref()
        .and_then(|d| d.system(&node.id))
        .map_or((TrafficStatus::Grey, TrendStatus::Grey), |s| (s.traffic, s.trend));

    let mut name_style = app.theme.traffic_style(traffic);
    if app.matched_systems.contains(&node.id) {
        name_style = name_style.patch(app.theme.matched);
    }
    if let Some(connections) = app.selection.connections() {
        if connections.node_id == node.id {
            name_style = name_style.add_modifier(Modifier::REVERSED);
        } else if connections.highlights(&node.id) {
            name_style = name_style.patch(app.theme.connected);
        } else {
            name_style = name_style.add_modifier(Modifier::DIM);
        }
    }

    let is_cursor = app.selected_node().is_some_and(|n| n.id == node.id);
    let pointer = if is_cursor { "▶" } else { " " };
    if is_cursor {
        name_style = name_style.patch(app.theme.selected);
    }

    Line::from(vec![
        Span::styled(pointer, Style::default().fg(app.theme.highlight)),
        Span::styled("●", app.theme.traffic_style(traffic)),
        Span::styled(trend.marker(), app.theme.trend_style(trend)),
        Span::raw(" "),
        Span::styled(node.title(), name_style),
    ])
}

fn render_connections(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans = match app.selection.connections() {
        Some(connections) => {
            let title = app
                .diagram
                .node(&connections.node_id)
                .map_or(connections.node_id.as_str(), DiagramNode::title);
            let names = connections.names(&app.diagram);
            vec![
                Span::styled(
                    format!(" {} ", title),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::raw(format!("({} edges) ⇄ ", connections.edges.len())),
                Span::styled(
                    if names.is_empty() {
                        "none".to_string()
                    } else {
                        names.join(", ")
                    },
                    app.theme.connected,
                ),
            ]
        }
        None => legend(app),
    };

    let unplaced: Vec<&str> = app
        .diagram
        .systems()
        .filter(|n| n.parent_id.is_none())
        .map(DiagramNode::title)
        .collect();
    if !unplaced.is_empty() {
        spans.push(Span::styled(
            format!(" │ Unplaced: {}", unplaced.join(", ")),
            Style::default().add_modifier(Modifier::DIM),
        ));
    }

    let block = Block::default()
        .title(" Connections ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));
    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

fn legend(app: &App) -> Vec<Span<'static>> {
    let mut spans = vec![Span::raw(" ")];
    for traffic in [TrafficStatus::Green, TrafficStatus::Red, TrafficStatus::Grey] {
        spans.push(Span::styled("●", app.theme.traffic_style(traffic)));
        spans.push(Span::raw(format!(" {}  ", traffic.label())));
    }
    spans.push(Span::raw("│ "));
    for trend in [TrendStatus::Green, TrendStatus::Yellow, TrendStatus::Red] {
        spans.push(Span::styled(trend.marker(), app.theme.trend_style(trend)));
        spans.push(Span::raw(format!(" {}  ", trend.label())));
    }
    spans
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Diagram, LayoutConfig};
    use wirewatch_types::{RawGraph, RawNode};

    fn fitted(width: u16) -> Diagram {
        let layout = LayoutConfig::default();
        let graph = RawGraph::new(
            vec![
                RawNode::new("101", "origination", "Online Banking"),
                RawNode::new("303", "processing", "Core Ledger"),
            ],
            Vec::new(),
        );
        Diagram::transform(&graph, &layout).relayout(&layout, f64::from(width) * CELL_WIDTH, 960.0)
    }

    #[test]
    fn test_sections_fill_the_width() {
        let area = Rect::new(0, 2, 131, 20);
        let diagram = fitted(area.width);

        let rects: Vec<Rect> = diagram
            .backgrounds()
            .filter_map(|bg| section_rect(bg, area))
            .collect();
        assert_eq!(rects.len(), 4);
        assert_eq!(rects[0].x, 0);
        // sections are packed left to right without overlap
        for pair in rects.windows(2) {
            assert!(pair[0].right() <= pair[1].x);
        }
        assert!(rects[3].right() <= area.right());
        assert!(rects.iter().all(|r| r.height == area.height));
    }

    #[test]
    fn test_labels_stay_inside_their_section() {
        let area = Rect::new(0, 2, 131, 20);
        let diagram = fitted(area.width);

        for bg in diagram.backgrounds() {
            let section = section_rect(bg, area).unwrap();
            for node in diagram.systems_in(&bg.id) {
                let label = label_rect(node, section, area, 960.0).unwrap();
                assert!(label.x > section.x);
                assert!(label.right() < section.right());
                assert!(label.y > section.y);
                assert!(label.y < section.bottom() - 1);
            }
        }
    }

    #[test]
    fn test_tiny_section_is_skipped() {
        let diagram = fitted(2);
        let area = Rect::new(0, 0, 2, 10);
        assert!(diagram
            .backgrounds()
            .all(|bg| section_rect(bg, area).is_none()));
    }
}
