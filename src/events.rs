use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

use crate::app::{App, View};

/// Where the export key writes.
const EXPORT_FILE: &str = "wirewatch_export.json";

/// Poll for events with a timeout
pub fn poll_event(timeout: Duration) -> Result<Option<Event>> {
    if event::poll(timeout)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}

/// Handle a key event
pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    // If help is shown, any key closes it
    if app.show_help {
        app.show_help = false;
        return;
    }

    if app.show_detail_overlay {
        match key.code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Backspace | KeyCode::Char('q') => {
                app.close_overlay();
            }
            KeyCode::Char('f') | KeyCode::Tab => app.cycle_focus(),
            // step through systems while the overlay stays open
            KeyCode::Up | KeyCode::Char('k') => {
                app.select_prev();
                app.enter_detail();
            }
            KeyCode::Down | KeyCode::Char('j') => {
                app.select_next();
                app.enter_detail();
            }
            _ => {}
        }
        return;
    }

    if app.search_active {
        handle_search_input(app, key);
        return;
    }

    if app.filter_active {
        handle_filter_input(app, key);
        return;
    }

    match key.code {
        KeyCode::Char('q') => app.quit(),

        // View switching
        KeyCode::Tab => {
            if key.modifiers.contains(KeyModifiers::SHIFT) {
                app.prev_view();
            } else {
                app.next_view();
            }
        }
        KeyCode::BackTab => app.prev_view(),
        KeyCode::Char('1') => app.set_view(View::Summary),
        KeyCode::Char('2') => app.set_view(View::Flow),

        // Navigation (up/down for items, left/right for tabs)
        KeyCode::Up | KeyCode::Char('k') => app.select_prev(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),
        KeyCode::Left | KeyCode::Char('h') => app.prev_view(),
        KeyCode::Right | KeyCode::Char('l') => app.next_view(),
        KeyCode::PageUp => app.select_prev_n(10),
        KeyCode::PageDown => app.select_next_n(10),
        KeyCode::Home => app.select_first(),
        KeyCode::End => app.select_last(),

        // Enter drills down in Summary and selects a node in Flow
        KeyCode::Enter => match app.current_view {
            View::Summary => app.enter_detail(),
            View::Flow => app.toggle_node_selection(),
        },
        KeyCode::Char('d') => app.enter_detail(),
        KeyCode::Char('g') => {
            if app.current_view == View::Summary {
                app.locate_in_flow();
            }
        }
        KeyCode::Char('f') => {
            app.cycle_focus();
            let focus = app.drilldown_focus.label();
            app.set_status_message(format!("Drill-down focus: {}", focus));
        }

        KeyCode::Esc | KeyCode::Backspace => app.go_back(),

        KeyCode::Char('r') => {
            if !app.reload_data() {
                app.set_status_message("No new data".to_string());
            }
        }

        KeyCode::Char('?') => app.toggle_help(),

        // Sorting (Summary view)
        KeyCode::Char('s') => {
            if app.current_view == View::Summary {
                app.cycle_sort();
            }
        }
        KeyCode::Char('S') => {
            if app.current_view == View::Summary {
                app.toggle_sort_direction();
            }
        }

        // Filter (start typing to filter)
        KeyCode::Char('/') => app.start_filter(),
        KeyCode::Char('c') => {
            if !app.filter_text.is_empty() {
                app.clear_filter();
            }
        }

        // Transaction search
        KeyCode::Char('t') => app.start_search(),
        KeyCode::Char('x') => {
            if app.search_result.is_some() {
                app.clear_search();
                app.set_status_message("Search cleared".to_string());
            }
        }

        KeyCode::Char('e') => {
            let export_path = PathBuf::from(EXPORT_FILE);
            match app.export_state(&export_path) {
                Ok(()) => {
                    app.set_status_message(format!("Exported to {}", export_path.display()));
                }
                Err(e) => {
                    app.set_status_message(format!("Export failed: {}", e));
                }
            }
        }

        _ => {}
    }
}

/// Handle key input while filter is active
fn handle_filter_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => {
            app.filter_active = false;
        }

        // Cancel filter (keep text but exit input mode)
        KeyCode::Esc => {
            app.cancel_filter();
        }

        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.clear_filter();
        }

        KeyCode::Backspace => {
            app.filter_pop();
            if app.filter_text.is_empty() {
                app.filter_active = false;
            }
        }

        KeyCode::Char(c) => {
            app.filter_push(c);
        }

        _ => {}
    }
}

/// Handle key input at the transaction search prompt
fn handle_search_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => app.submit_search(),
        KeyCode::Esc => app.cancel_search(),
        KeyCode::Backspace => {
            app.search_input.pop();
        }
        KeyCode::Char(c) if !c.is_whitespace() => app.search_input.push(c),
        _ => {}
    }
}

/// Handle mouse events
///
/// `content_start_row` is the row of the Summary table's column header.
pub fn handle_mouse_event(app: &mut App, mouse: MouseEvent, content_start_row: u16) {
    match mouse.kind {
        MouseEventKind::ScrollUp => app.select_prev(),
        MouseEventKind::ScrollDown => app.select_next(),

        MouseEventKind::Down(MouseButton::Left) => {
            let clicked_row = mouse.row;

            if app.current_view == View::Summary && clicked_row > content_start_row {
                let item_row = (clicked_row - content_start_row - 1) as usize;
                if item_row < app.visible_systems().len() {
                    app.selected_system_index = item_row;
                }
            }

            // Tab clicks (row 1, after header): Summary (0-10), Flow (11-19)
            if clicked_row == 1 {
                let col = mouse.column;
                if col < 11 {
                    app.set_view(View::Summary);
                } else if col < 20 {
                    app.set_view(View::Flow);
                }
            }
        }

        // Right-click goes back
        MouseEventKind::Down(MouseButton::Right) => app.go_back(),

        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Diagram, LayoutConfig};
    use crate::source::ChannelSource;
    use crossterm::event::{KeyEventKind, KeyEventState};
    use wirewatch_types::{RawEdge, RawGraph, RawNode, TelemetryRecord, TrafficFlowing};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn app() -> App {
        let layout = LayoutConfig::default();
        let graph = RawGraph::new(
            vec![
                RawNode::new("101", "origination", "Online Banking"),
                RawNode::new("303", "processing", "Core Ledger"),
            ],
            vec![RawEdge::new("101", "303")],
        );
        let diagram = Diagram::transform(&graph, &layout);
        let (tx, source) = ChannelSource::create("test");
        tx.send(vec![
            TelemetryRecord::builder("101").traffic(TrafficFlowing::Yes).build(),
            TelemetryRecord::builder("303").traffic(TrafficFlowing::No).build(),
        ])
        .unwrap();
        let mut app = App::new(Box::new(source), diagram, layout);
        app.reload_data();
        app
    }

    #[test]
    fn test_quit_and_view_keys() {
        let mut app = app();
        handle_key_event(&mut app, key(KeyCode::Char('2')));
        assert_eq!(app.current_view, View::Flow);
        handle_key_event(&mut app, key(KeyCode::Tab));
        assert_eq!(app.current_view, View::Summary);
        handle_key_event(&mut app, key(KeyCode::Char('q')));
        assert!(!app.running);
    }

    #[test]
    fn test_help_swallows_next_key() {
        let mut app = app();
        handle_key_event(&mut app, key(KeyCode::Char('?')));
        assert!(app.show_help);
        handle_key_event(&mut app, key(KeyCode::Char('q')));
        assert!(!app.show_help);
        assert!(app.running);
    }

    #[test]
    fn test_enter_depends_on_view() {
        let mut app = app();
        handle_key_event(&mut app, key(KeyCode::Enter));
        assert!(app.show_detail_overlay);

        handle_key_event(&mut app, key(KeyCode::Char('f')));
        assert_eq!(app.drilldown_focus, crate::data::Focus::Trend);
        handle_key_event(&mut app, key(KeyCode::Esc));
        assert!(!app.show_detail_overlay);

        handle_key_event(&mut app, key(KeyCode::Char('2')));
        handle_key_event(&mut app, key(KeyCode::Enter));
        assert_eq!(app.selection.selected(), Some("101"));
        handle_key_event(&mut app, key(KeyCode::Enter));
        assert!(app.selection.selected().is_none());
    }

    #[test]
    fn test_filter_input() {
        let mut app = app();
        handle_key_event(&mut app, key(KeyCode::Char('/')));
        assert!(app.filter_active);
        handle_key_event(&mut app, key(KeyCode::Char('3')));
        // typing does not switch views while filtering
        assert_eq!(app.current_view, View::Summary);
        assert_eq!(app.filter_text, "3");
        handle_key_event(&mut app, key(KeyCode::Enter));
        assert!(!app.filter_active);
        assert_eq!(app.visible_systems().len(), 1);

        handle_key_event(&mut app, key(KeyCode::Char('c')));
        assert!(app.filter_text.is_empty());
    }

    #[test]
    fn test_mouse_selects_row() {
        let mut app = app();
        let click = MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 5,
            row: 5,
            modifiers: KeyModifiers::NONE,
        };
        handle_mouse_event(&mut app, click, 3);
        assert_eq!(app.selected_system_index, 1);
    }
}
