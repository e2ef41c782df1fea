//! Drill-down overlay rendering.
//!
//! Displays a modal overlay with one row per flow of the selected system.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table},
    Frame,
};

use crate::app::App;
use crate::data::drilldown::{Column, LOW_VOLUME_NOTE};
use crate::data::Focus;

/// Minimum width required for the overlay to render properly.
const MIN_OVERLAY_WIDTH: u16 = 50;
/// Minimum height required for the overlay to render properly.
const MIN_OVERLAY_HEIGHT: u16 = 12;

/// Columns shown on narrow terminals.
const NARROW_COLUMNS: [Column; 7] = [
    Column::Direction,
    Column::PeerName,
    Column::TrafficFlowing,
    Column::OnTrend,
    Column::CurrentCount,
    Column::Delta,
    Column::Balanced,
];

/// Render the drill-down for `app.detail_system` as a modal overlay.
pub fn render_overlay(frame: &mut Frame, app: &App, area: Rect) {
    if area.width < MIN_OVERLAY_WIDTH || area.height < MIN_OVERLAY_HEIGHT {
        return;
    }
    let Some(ref id) = app.detail_system else {
        return;
    };

    let overlay_width = (area.width * 95 / 100).max(MIN_OVERLAY_WIDTH);
    let overlay_height = (area.height * 90 / 100).clamp(MIN_OVERLAY_HEIGHT, 50);
    let x = area.x + (area.width.saturating_sub(overlay_width)) / 2;
    let y = area.y + (area.height.saturating_sub(overlay_height)) / 2;
    let overlay_area = Rect::new(x, y, overlay_width, overlay_height);

    frame.render_widget(Clear, overlay_area);

    let chunks = Layout::vertical([
        Constraint::Length(4), // System header
        Constraint::Min(5),    // Flow table
        Constraint::Length(1), // Footer
    ])
    .split(overlay_area);

    // ===== HEADER =====
    let system = app.data.as_ref().and_then(|d| d.system(id));
    let name = system
        .map(|s| s.name.clone())
        .or_else(|| app.diagram.node(id).map(|n| n.title().to_string()))
        .unwrap_or_else(|| id.clone());

    let mut status = vec![Span::raw(" ")];
    match system {
        Some(s) => {
            status.push(Span::raw("Traffic: "));
            status.push(Span::styled(s.traffic.label(), app.theme.traffic_style(s.traffic)));
            status.push(Span::raw("    Trend: "));
            status.push(Span::styled(s.trend.label(), app.theme.trend_style(s.trend)));
            status.push(Span::raw("    Health: "));
            status.push(Span::styled(
                s.health.symbol(),
                app.theme.status_style(s.health).add_modifier(Modifier::BOLD),
            ));
        }
        None => status.push(Span::styled(
            "No telemetry for this system",
            Style::default().add_modifier(Modifier::DIM),
        )),
    }
    status.push(Span::raw("    Focus: "));
    status.push(Span::styled(
        app.drilldown_focus.label(),
        Style::default().fg(app.theme.highlight).add_modifier(Modifier::BOLD),
    ));

    let header_lines = vec![
        Line::from(vec![Span::styled(
            format!(" {} (AIT {}) ", name, id),
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from(status),
    ];

    let header = Paragraph::new(header_lines).block(
        Block::default()
            .title(" Drill-down ")
            .borders(Borders::ALL)
            .border_type(app.theme.border_type)
            .border_style(Style::default().fg(app.theme.highlight)),
    );
    frame.render_widget(header, chunks[0]);

    // ===== FLOWS =====
    let columns: &[Column] = if overlay_width >= 140 {
        &Column::ALL
    } else {
        &NARROW_COLUMNS
    };

    let focus = app.drilldown_focus;
    let header_style = |column: Column| {
        if focus.highlights(column) {
            app.theme.header.add_modifier(Modifier::REVERSED)
        } else {
            app.theme.header
        }
    };

    let table_header = Row::new(
        columns
            .iter()
            .map(|&c| Cell::from(c.header()).style(header_style(c))),
    );

    let rows_data = app.detail_rows();
    let rows: Vec<Row> = rows_data
        .iter()
        .map(|row| {
            Row::new(columns.iter().map(|&c| {
                let mut style = cell_style(app, focus, c, row.balanced);
                if c == Column::Analytics && row.analytics == LOW_VOLUME_NOTE {
                    style = style.fg(app.theme.critical);
                }
                Cell::from(row.cell(c)).style(style)
            }))
        })
        .collect();

    let widths: Vec<Constraint> = columns.iter().map(|&c| column_width(c)).collect();

    let table = Table::new(rows, widths).header(table_header).block(
        Block::default()
            .title(format!(" Flows ({}) ", rows_data.len()))
            .borders(Borders::ALL)
            .border_type(app.theme.border_type)
            .border_style(Style::default().fg(app.theme.border)),
    );
    frame.render_widget(table, chunks[1]);

    let footer = Paragraph::new(" f:focus  ↑↓:next system  Esc:close")
        .style(Style::default().add_modifier(Modifier::DIM));
    frame.render_widget(footer, chunks[2]);
}

fn cell_style(app: &App, focus: Focus, column: Column, balanced: bool) -> Style {
    if !focus.highlights(column) {
        return Style::default();
    }
    let color = if balanced {
        app.theme.healthy
    } else {
        app.theme.warning
    };
    Style::default().fg(color).add_modifier(Modifier::BOLD)
}

fn column_width(column: Column) -> Constraint {
    match column {
        Column::PeerName | Column::Analytics => Constraint::Fill(2),
        Column::OnTrend => Constraint::Min(18),
        Column::Direction | Column::PeerId => Constraint::Min(9),
        _ => Constraint::Fill(1),
    }
}
