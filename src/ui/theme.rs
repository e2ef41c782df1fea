//! Theme configuration for the TUI.
//!
//! Supports light and dark themes with automatic terminal detection.

use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::block::BorderType;

use crate::data::{Health, TrafficStatus, TrendStatus};

/// Color and style theme for the TUI.
///
/// Use [`Theme::auto_detect()`] for automatic theme selection based on
/// terminal background, or [`Theme::dark()`]/[`Theme::light()`] explicitly.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Accent color for highlights and active elements.
    pub highlight: Color,
    /// Color for warning-level health and yellow trends.
    pub warning: Color,
    /// Color for critical-level health and red statuses.
    pub critical: Color,
    /// Color for healthy systems and green statuses.
    pub healthy: Color,
    /// Color for systems with no usable data.
    pub unknown: Color,
    /// Color for borders and separators.
    pub border: Color,
    /// Style for header rows in tables.
    pub header: Style,
    /// Style for selected/highlighted rows.
    pub selected: Style,
    /// Style for nodes connected to the selected node.
    pub connected: Style,
    /// Style for systems that logged the searched transaction.
    pub matched: Style,
    /// Style for the active tab.
    pub tab_active: Style,
    /// Style for inactive tabs.
    pub tab_inactive: Style,
    /// Border style (rounded, plain, etc.).
    pub border_type: BorderType,
}

impl Theme {
    /// Create a dark theme suitable for dark terminal backgrounds.
    pub fn dark() -> Self {
        Self {
            highlight: Color::Cyan,
            warning: Color::Yellow,
            critical: Color::Red,
            healthy: Color::Green,
            unknown: Color::Gray,
            border: Color::Gray,
            header: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            selected: Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD),
            connected: Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            matched: Style::default().bg(Color::Magenta).fg(Color::Black),
            tab_active: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            tab_inactive: Style::default().fg(Color::Gray),
            border_type: BorderType::Rounded,
        }
    }

    /// Create a light theme suitable for light terminal backgrounds.
    pub fn light() -> Self {
        Self {
            highlight: Color::Blue,
            warning: Color::Yellow,
            critical: Color::Red,
            healthy: Color::Green,
            unknown: Color::DarkGray,
            border: Color::DarkGray,
            header: Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            selected: Style::default().bg(Color::LightBlue).add_modifier(Modifier::BOLD),
            connected: Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            matched: Style::default().bg(Color::LightMagenta).fg(Color::Black),
            tab_active: Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            tab_inactive: Style::default().fg(Color::DarkGray),
            border_type: BorderType::Rounded,
        }
    }

    /// Auto-detect based on terminal background
    pub fn auto_detect() -> Self {
        match terminal_light::luma() {
            Ok(luma) if luma > 0.5 => Self::light(),
            _ => Self::dark(),
        }
    }

    /// Get style for a health rank
    pub fn status_style(&self, health: Health) -> Style {
        match health {
            Health::Healthy => Style::default().fg(self.healthy),
            Health::Unknown => Style::default().fg(self.unknown),
            Health::Warning => Style::default().fg(self.warning),
            Health::Critical => Style::default().fg(self.critical).add_modifier(Modifier::BOLD),
        }
    }

    pub fn traffic_style(&self, status: TrafficStatus) -> Style {
        match status {
            TrafficStatus::Green => Style::default().fg(self.healthy),
            TrafficStatus::Red => Style::default().fg(self.critical),
            TrafficStatus::Grey => Style::default().fg(self.unknown),
        }
    }

    pub fn trend_style(&self, status: TrendStatus) -> Style {
        match status {
            TrendStatus::Green => Style::default().fg(self.healthy),
            TrendStatus::Yellow => Style::default().fg(self.warning),
            TrendStatus::Red => Style::default().fg(self.critical),
            TrendStatus::Grey => Style::default().fg(self.unknown),
        }
    }
}
