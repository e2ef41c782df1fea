//! Summary view rendering.
//!
//! Displays a table of all systems with traffic and trend colors, volumes,
//! a volume sparkline and the overall health.

use std::cmp::Ordering;

use ratatui::{
    layout::{Constraint, Rect},
    style::Style,
    text::Span,
    widgets::{Block, Borders, Cell, Row, Table, TableState},
    Frame,
};

use crate::app::App;
use crate::data::SystemData;

/// Sparkline characters (8 levels of height).
const SPARKLINE_CHARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Column to sort by in the Summary view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortColumn {
    /// Sort by overall health.
    #[default]
    Health,
    /// Sort by AIT id.
    Id,
    /// Sort by system name alphabetically.
    Name,
    /// Sort by current volume.
    Volume,
}

impl SortColumn {
    /// Cycle to the next sort column.
    pub fn next(self) -> Self {
        match self {
            SortColumn::Health => SortColumn::Id,
            SortColumn::Id => SortColumn::Name,
            SortColumn::Name => SortColumn::Volume,
            SortColumn::Volume => SortColumn::Health,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            SortColumn::Health => "health",
            SortColumn::Id => "id",
            SortColumn::Name => "name",
            SortColumn::Volume => "volume",
        }
    }
}

/// Render the Summary view showing all systems in a sortable table.
pub fn render(frame: &mut Frame, app: &mut App, area: Rect) {
    let Some(ref data) = app.data else {
        return;
    };
    let total = data.systems.len();
    let systems = app.visible_systems();

    let header = Row::new(vec![
        Cell::from(format_header("AIT", SortColumn::Id, app)),
        Cell::from(format_header("System", SortColumn::Name, app)),
        Cell::from("Traffic"),
        Cell::from("Trend"),
        Cell::from(format_header("Current", SortColumn::Volume, app)),
        Cell::from("Average"),
        Cell::from("History"),
        Cell::from(format_header("Health", SortColumn::Health, app)),
    ])
    .height(1)
    .style(app.theme.header);

    let rows: Vec<Row> = systems
        .iter()
        .map(|s| {
            let sparkline = render_sparkline(&app.history.volume_sparkline(&s.id));
            let name_style = if app.matched_systems.contains(&s.id) {
                app.theme.matched
            } else {
                Style::default()
            };

            Row::new(vec![
                Cell::from(s.id.clone()),
                Cell::from(s.name.clone()).style(name_style),
                Cell::from(format!("● {}", s.traffic.label()))
                    .style(app.theme.traffic_style(s.traffic)),
                Cell::from(format!("● {}", s.trend.label())).style(app.theme.trend_style(s.trend)),
                Cell::from(format_volume(s.current_volume)),
                Cell::from(format_volume(s.average_volume)),
                Cell::from(sparkline),
                Cell::from(s.health.symbol()).style(app.theme.status_style(s.health)),
            ])
        })
        .collect();

    let widths = [
        Constraint::Min(7),  // AIT
        Constraint::Fill(3), // System
        Constraint::Min(11), // Traffic
        Constraint::Min(12), // Trend
        Constraint::Fill(1), // Current
        Constraint::Fill(1), // Average
        Constraint::Min(8),  // History sparkline
        Constraint::Min(6),  // Health
    ];

    let selected_visual_index = app.selected_system_index.min(systems.len().saturating_sub(1));

    let sort_dir = if app.sort_ascending { "↑" } else { "↓" };

    let filter_info = if app.filter_active {
        format!(" /{}_", app.filter_text)
    } else if !app.filter_text.is_empty() {
        format!(" /{}/ [c:clear]", app.filter_text)
    } else {
        String::new()
    };

    let position_info = if !systems.is_empty() {
        format!(" [{}/{}]", selected_visual_index + 1, systems.len())
    } else {
        String::new()
    };

    let title = format!(
        " Systems ({}/{}) [s:sort {}{}]{}{} ",
        systems.len(),
        total,
        app.sort_column.label(),
        sort_dir,
        filter_info,
        position_info
    );

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_type(app.theme.border_type)
                .border_style(Style::default().fg(app.theme.border)),
        )
        .row_highlight_style(app.theme.selected)
        .highlight_symbol("▶ ");

    let mut state = TableState::default();
    state.select(Some(selected_visual_index));

    frame.render_stateful_widget(table, area, &mut state);
}

fn format_header(name: &str, col: SortColumn, app: &App) -> Span<'static> {
    if app.sort_column == col {
        let arrow = if app.sort_ascending { "↑" } else { "↓" };
        Span::raw(format!("{}{}", name, arrow))
    } else {
        Span::raw(name.to_string())
    }
}

/// Sort systems by the given column and direction, ties broken by id.
pub fn sort_systems_by(systems: &mut [&SystemData], column: SortColumn, ascending: bool) {
    systems.sort_by(|a, b| {
        let primary = match column {
            SortColumn::Health => a.health.cmp(&b.health),
            SortColumn::Id => a.id.cmp(&b.id),
            SortColumn::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
            SortColumn::Volume => a.current_volume.total_cmp(&b.current_volume),
        };

        let primary = if ascending {
            primary
        } else {
            primary.reverse()
        };

        if primary == Ordering::Equal {
            a.id.cmp(&b.id)
        } else {
            primary
        }
    });
}

fn render_sparkline(data: &[u8]) -> String {
    if data.is_empty() {
        return "        ".to_string();
    }

    // last 8 samples
    let skip = data.len().saturating_sub(8);
    data[skip..]
        .iter()
        .map(|&v| SPARKLINE_CHARS[v.min(7) as usize])
        .collect()
}

/// Format a transaction volume with K/M suffixes.
pub fn format_volume(n: f64) -> String {
    if n >= 1_000_000.0 {
        format!("{:.1}M", n / 1_000_000.0)
    } else if n >= 1_000.0 {
        format!("{:.1}K", n / 1_000.0)
    } else {
        format!("{:.0}", n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Health, TrafficStatus, TrendStatus};

    fn system(id: &str, name: &str, health: Health, volume: f64) -> SystemData {
        SystemData {
            id: id.into(),
            name: name.into(),
            traffic: TrafficStatus::Green,
            trend: TrendStatus::Green,
            health,
            current_volume: volume,
            average_volume: 0.0,
            flows: 1,
        }
    }

    #[test]
    fn test_sort_by_health_breaks_ties_by_id() {
        let a = system("300", "Ledger", Health::Critical, 5.0);
        let b = system("100", "Gateway", Health::Healthy, 50.0);
        let c = system("200", "Screening", Health::Critical, 1.0);
        let mut systems = vec![&a, &b, &c];

        sort_systems_by(&mut systems, SortColumn::Health, false);
        let ids: Vec<&str> = systems.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, ["200", "300", "100"]);

        sort_systems_by(&mut systems, SortColumn::Volume, true);
        let ids: Vec<&str> = systems.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, ["200", "300", "100"]);

        sort_systems_by(&mut systems, SortColumn::Name, true);
        let ids: Vec<&str> = systems.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, ["100", "300", "200"]);
    }

    #[test]
    fn test_sort_column_cycle() {
        let mut col = SortColumn::default();
        for _ in 0..4 {
            col = col.next();
        }
        assert_eq!(col, SortColumn::Health);
    }

    #[test]
    fn test_sparkline_keeps_last_eight() {
        let data = [0, 1, 2, 3, 4, 5, 6, 7, 7, 9];
        assert_eq!(render_sparkline(&data), "▃▄▅▆▇███");
        assert_eq!(render_sparkline(&[]).len(), 8);
    }

    #[test]
    fn test_format_volume() {
        assert_eq!(format_volume(950.0), "950");
        assert_eq!(format_volume(1_500.0), "1.5K");
        assert_eq!(format_volume(2_300_000.0), "2.3M");
    }
}
