//! Common UI components shared across views.
//!
//! This module contains the header bar, tab bar, status bar, and help overlay.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Tabs},
    Frame,
};

use crate::app::{App, View};
use crate::data::duration::format_age;
use crate::data::Health;
use crate::ui::summary::format_volume;

const TITLE: &str = "US WIRES";

/// Render the header bar with overall health.
///
/// Displays: status indicator, system counts by health, total volume.
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let Some(ref data) = app.data else {
        let line = Line::from(vec![
            Span::styled(
                format!(" {} ", TITLE),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw("| Loading..."),
        ]);
        frame.render_widget(Paragraph::new(line), area);
        return;
    };

    let count_span = |health: Health, color| {
        let n = data.count(health);
        if n > 0 {
            Span::styled(n.to_string(), app.theme.status_style(health).fg(color))
        } else {
            Span::styled("0", Style::default().add_modifier(Modifier::DIM))
        }
    };

    let current: f64 = data.systems.iter().map(|s| s.current_volume).sum();
    let average: f64 = data.systems.iter().map(|s| s.average_volume).sum();

    let mut spans = vec![
        Span::styled(" ● ", app.theme.status_style(data.overall_health())),
        Span::styled(
            format!("{} ", TITLE),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw("│ "),
        count_span(Health::Healthy, app.theme.healthy),
        Span::raw(" ok "),
        count_span(Health::Warning, app.theme.warning),
        Span::raw(" warn "),
        count_span(Health::Critical, app.theme.critical),
        Span::raw(" crit "),
        count_span(Health::Unknown, app.theme.unknown),
        Span::raw(" n/a │ "),
        Span::styled(
            data.systems.len().to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(" systems │ "),
        Span::raw(format!(
            "Vol:{} Avg:{}",
            format_volume(current),
            format_volume(average)
        )),
    ];

    if let Some(ref result) = app.search_result {
        spans.push(Span::raw(" │ "));
        spans.push(Span::styled(
            format!(" {} ", result.id),
            app.theme.matched,
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Render the tab bar showing available views.
pub fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = vec![Line::from(" 1:Summary "), Line::from(" 2:Flow ")];

    let selected = match app.current_view {
        View::Summary => 0,
        View::Flow => 1,
    };

    let tabs = Tabs::new(titles)
        .select(selected)
        .style(app.theme.tab_inactive)
        .highlight_style(app.theme.tab_active)
        .divider("|");

    frame.render_widget(tabs, area);
}

/// Render the status bar at the bottom.
///
/// Shows: breadcrumb trail, time since last update, available controls.
/// Also displays temporary status messages, prompts and errors.
pub fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    if app.search_active {
        let paragraph = Paragraph::new(format!(
            " Transaction id or amount: {}_ | Enter:search Esc:cancel",
            app.search_input
        ))
        .style(Style::default().fg(app.theme.highlight));
        frame.render_widget(paragraph, area);
        return;
    }

    if let Some(msg) = app.get_status_message() {
        let paragraph =
            Paragraph::new(format!(" {} ", msg)).style(Style::default().fg(app.theme.highlight));
        frame.render_widget(paragraph, area);
        return;
    }

    let status = if let Some(ref data) = app.data {
        let controls = match app.current_view {
            View::Summary if app.filter_active => "Type to filter | Enter:apply Esc:cancel",
            View::Summary => "/:filter s:sort Enter:detail g:locate t:search ?:help q:quit",
            View::Flow => "↑↓:select Enter:connections d:detail t:search ?:help q:quit",
        };

        let stale = match app.load_error {
            Some(ref err) => format!(" | Stale: {}", err),
            None => String::new(),
        };

        format!(
            " {} | Updated {}{} | {}",
            app.breadcrumb(),
            format_age(data.last_updated.elapsed()),
            stale,
            controls,
        )
    } else if let Some(ref err) = app.load_error {
        format!(" Error: {} | q:quit r:retry", err)
    } else {
        format!(" Loading {}... | q:quit", app.source_description())
    };

    let paragraph = Paragraph::new(status).style(Style::default().add_modifier(Modifier::DIM));

    frame.render_widget(paragraph, area);
}

/// Render the help overlay with keyboard shortcuts.
///
/// Displayed as a centered modal on top of the current view.
pub fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let section = |title: &'static str| {
        Line::from(vec![Span::styled(
            title,
            Style::default().add_modifier(Modifier::BOLD),
        )])
    };

    let help_text = vec![
        Line::from(vec![Span::styled("Keyboard Shortcuts", app.theme.header)]),
        Line::from(""),
        section(" Navigation"),
        Line::from("  ←/→ h/l     Switch views"),
        Line::from("  ↑/↓ j/k     Navigate list"),
        Line::from("  PgUp/PgDn   Jump 10 items"),
        Line::from("  Home/End    Jump to first/last"),
        Line::from("  Esc         Go back"),
        Line::from(""),
        section(" Summary"),
        Line::from("  Enter     Drill down"),
        Line::from("  g         Locate in flow"),
        Line::from("  /         Start filter"),
        Line::from("  c         Clear filter"),
        Line::from("  s / S     Sort column / direction"),
        Line::from(""),
        section(" Flow"),
        Line::from("  Enter     Select, show connections"),
        Line::from("  d         Drill down"),
        Line::from(""),
        section(" General"),
        Line::from("  f         Cycle drill-down focus"),
        Line::from("  t / x     Search / clear transaction"),
        Line::from("  r         Reload data"),
        Line::from("  e         Export to JSON"),
        Line::from("  q         Quit"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Press any key to close",
            Style::default().add_modifier(Modifier::DIM),
        )]),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));

    let help_height = (help_text.len() as u16 + 2).min(area.height.saturating_sub(2));
    let paragraph = Paragraph::new(help_text).block(block);

    let help_width = 44u16.min(area.width.saturating_sub(4));
    let x = area.x + (area.width.saturating_sub(help_width)) / 2;
    let y = area.y + (area.height.saturating_sub(help_height)) / 2;
    let help_area = Rect::new(x, y, help_width, help_height);

    frame.render_widget(Clear, help_area);
    frame.render_widget(paragraph, help_area);
}
