//! Application state and navigation logic.

use std::collections::BTreeSet;
use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::Result;
use tracing::{debug, info};

use crate::data::drilldown::rows_for_system;
use crate::data::export::{self, Export};
use crate::data::search::SearchParams;
use crate::data::{
    DashboardData, Diagram, DiagramNode, DrillDownRow, Focus, History, LayoutConfig,
    SearchResult, Selection, SystemData,
};
use crate::source::{DataSource, SearchTask};
use crate::ui::summary::SortColumn;
use crate::ui::Theme;

/// How long a status message stays in the status bar.
const STATUS_MESSAGE_TTL: Duration = Duration::from_secs(3);

/// The current view/tab in the TUI.
///
/// The drill-down is shown as an overlay (controlled by
/// `App::show_detail_overlay`) rather than as a separate view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Table of all systems with traffic, trend and health.
    Summary,
    /// Sectioned flow diagram of the payment chain.
    Flow,
}

impl View {
    /// Cycle to the next view.
    pub fn next(self) -> Self {
        match self {
            View::Summary => View::Flow,
            View::Flow => View::Summary,
        }
    }

    /// Cycle to the previous view.
    pub fn prev(self) -> Self {
        // two views, so both directions land on the other one
        self.next()
    }

    /// Returns the display label for this view.
    pub fn label(&self) -> &'static str {
        match self {
            View::Summary => "Summary",
            View::Flow => "Flow",
        }
    }
}

/// Saved state for returning to a previous view.
#[derive(Debug, Clone)]
pub struct ViewState {
    pub view: View,
    pub selected_system_index: usize,
    pub selected_node_index: usize,
}

/// Main application state.
pub struct App {
    pub running: bool,
    pub current_view: View,
    pub show_help: bool,
    pub show_detail_overlay: bool,

    // Data source
    source: Box<dyn DataSource>,
    pub data: Option<DashboardData>,
    pub history: History,
    pub load_error: Option<String>,

    // Diagram, laid out once at startup; views re-fit it on every draw
    pub diagram: Diagram,
    pub layout: LayoutConfig,
    pub selection: Selection,

    // Navigation state
    pub selected_system_index: usize,
    pub selected_node_index: usize,
    pub view_stack: Vec<ViewState>,

    // Drill-down overlay
    pub detail_system: Option<String>,
    pub drilldown_focus: Focus,

    // Sorting (Summary view)
    pub sort_column: SortColumn,
    pub sort_ascending: bool,

    // Filter
    pub filter_text: String,
    pub filter_active: bool,

    // Transaction search
    search: Option<SearchTask>,
    search_dates: (Option<String>, Option<String>),
    pub search_input: String,
    pub search_active: bool,
    pub search_result: Option<SearchResult>,
    pub matched_systems: BTreeSet<String>,

    // UI
    pub theme: Theme,

    // Status message (temporary feedback)
    pub status_message: Option<(String, Instant)>,
}

impl App {
    /// Create a new App polling `source` and showing `diagram`.
    pub fn new(source: Box<dyn DataSource>, diagram: Diagram, layout: LayoutConfig) -> Self {
        Self {
            running: true,
            current_view: View::Summary,
            show_help: false,
            show_detail_overlay: false,
            source,
            data: None,
            history: History::new(),
            load_error: None,
            diagram,
            layout,
            selection: Selection::default(),
            selected_system_index: 0,
            selected_node_index: 0,
            view_stack: Vec::new(),
            detail_system: None,
            drilldown_focus: Focus::default(),
            sort_column: SortColumn::default(),
            // worst health first
            sort_ascending: false,
            filter_text: String::new(),
            filter_active: false,
            search: None,
            search_dates: (None, None),
            search_input: String::new(),
            search_active: false,
            search_result: None,
            matched_systems: BTreeSet::new(),
            theme: Theme::auto_detect(),
            status_message: None,
        }
    }

    /// Enable transaction search; `date_start`/`date_end` bound every search.
    pub fn with_search(
        mut self,
        task: SearchTask,
        date_start: Option<String>,
        date_end: Option<String>,
    ) -> Self {
        self.search = Some(task);
        self.search_dates = (date_start, date_end);
        self
    }

    /// Returns a description of the current data source.
    pub fn source_description(&self) -> &str {
        self.source.description()
    }

    /// Set a temporary status message that will be shown for a few seconds.
    pub fn set_status_message(&mut self, message: String) {
        self.status_message = Some((message, Instant::now()));
    }

    /// Get the current status message if it hasn't expired.
    pub fn get_status_message(&self) -> Option<&str> {
        match &self.status_message {
            Some((msg, time)) if time.elapsed() < STATUS_MESSAGE_TTL => Some(msg),
            _ => None,
        }
    }

    /// Push current state to stack and navigate to a new view.
    pub fn push_view(&mut self, view: View) {
        self.view_stack.push(ViewState {
            view: self.current_view,
            selected_system_index: self.selected_system_index,
            selected_node_index: self.selected_node_index,
        });
        self.current_view = view;
    }

    /// Pop the view stack and restore previous state.
    pub fn pop_view(&mut self) -> bool {
        if let Some(state) = self.view_stack.pop() {
            self.current_view = state.view;
            self.selected_system_index = state.selected_system_index;
            self.selected_node_index = state.selected_node_index;
            true
        } else {
            false
        }
    }

    /// Get breadcrumb trail for current navigation.
    pub fn breadcrumb(&self) -> String {
        let mut parts: Vec<&str> = self.view_stack.iter().map(|s| s.view.label()).collect();
        parts.push(self.current_view.label());
        parts.join(" > ")
    }

    /// Poll the data source for a new batch.
    ///
    /// Returns true if a new batch was received. The source's last error is
    /// kept either way so a stale view can say why it is stale.
    pub fn reload_data(&mut self) -> bool {
        let updated = match self.source.poll() {
            Some(batch) => {
                let data = DashboardData::from_records(batch);
                debug!(
                    "classified {} records into {} systems",
                    data.records.len(),
                    data.systems.len()
                );

                self.history.record(&data);
                self.data = Some(data);
                self.clamp_selection();
                true
            }
            None => false,
        };

        self.load_error = self.source.error();
        updated
    }

    fn clamp_selection(&mut self) {
        let max = self.filtered_system_count().saturating_sub(1);
        self.selected_system_index = self.selected_system_index.min(max);
    }

    /// Switch to the next view.
    pub fn next_view(&mut self) {
        self.current_view = self.current_view.next();
    }

    /// Switch to the previous view.
    pub fn prev_view(&mut self) {
        self.current_view = self.current_view.prev();
    }

    /// Switch to a specific view.
    pub fn set_view(&mut self, view: View) {
        self.current_view = view;
    }

    /// Move selection down by one item.
    pub fn select_next(&mut self) {
        self.select_next_n(1);
    }

    /// Move selection up by one item.
    pub fn select_prev(&mut self) {
        self.select_prev_n(1);
    }

    /// Move selection down by n items.
    pub fn select_next_n(&mut self, n: usize) {
        match self.current_view {
            View::Summary => {
                let max = self.filtered_system_count().saturating_sub(1);
                self.selected_system_index = (self.selected_system_index + n).min(max);
            }
            View::Flow => {
                let max = self.flow_nodes().len().saturating_sub(1);
                self.selected_node_index = (self.selected_node_index + n).min(max);
            }
        }
    }

    /// Move selection up by n items.
    pub fn select_prev_n(&mut self, n: usize) {
        match self.current_view {
            View::Summary => {
                self.selected_system_index = self.selected_system_index.saturating_sub(n);
            }
            View::Flow => {
                self.selected_node_index = self.selected_node_index.saturating_sub(n);
            }
        }
    }

    /// Jump to the first item in the list.
    pub fn select_first(&mut self) {
        match self.current_view {
            View::Summary => self.selected_system_index = 0,
            View::Flow => self.selected_node_index = 0,
        }
    }

    /// Jump to the last item in the list.
    pub fn select_last(&mut self) {
        match self.current_view {
            View::Summary => {
                self.selected_system_index = self.filtered_system_count().saturating_sub(1);
            }
            View::Flow => {
                self.selected_node_index = self.flow_nodes().len().saturating_sub(1);
            }
        }
    }

    fn filtered_system_count(&self) -> usize {
        self.data.as_ref().map_or(0, |data| {
            data.systems.iter().filter(|s| self.matches_system(s)).count()
        })
    }

    /// Systems in Summary row order: filtered, then sorted.
    pub fn visible_systems(&self) -> Vec<&SystemData> {
        let Some(data) = self.data.as_ref() else {
            return Vec::new();
        };
        let mut systems: Vec<&SystemData> =
            data.systems.iter().filter(|s| self.matches_system(s)).collect();
        crate::ui::summary::sort_systems_by(&mut systems, self.sort_column, self.sort_ascending);
        systems
    }

    /// The system under the Summary cursor.
    pub fn selected_system(&self) -> Option<&SystemData> {
        self.visible_systems().get(self.selected_system_index).copied()
    }

    /// Diagram systems in Flow cursor order: section by section, top to
    /// bottom then left to right, followed by systems outside any section.
    pub fn flow_nodes(&self) -> Vec<&DiagramNode> {
        let by_position = |a: &&DiagramNode, b: &&DiagramNode| {
            a.position
                .y
                .total_cmp(&b.position.y)
                .then(a.position.x.total_cmp(&b.position.x))
        };

        let mut nodes = Vec::new();
        for section in &self.layout.sections {
            let mut in_section: Vec<&DiagramNode> =
                self.diagram.systems_in(&section.id).collect();
            in_section.sort_by(by_position);
            nodes.extend(in_section);
        }
        nodes.extend(self.diagram.systems().filter(|n| n.parent_id.is_none()));
        nodes
    }

    /// The diagram node under the Flow cursor.
    pub fn selected_node(&self) -> Option<&DiagramNode> {
        self.flow_nodes().get(self.selected_node_index).copied()
    }

    /// Select the node under the Flow cursor, or clear it if already selected.
    pub fn toggle_node_selection(&mut self) {
        let Some(id) = self.selected_node().map(|n| n.id.clone()) else {
            return;
        };
        self.selection.toggle(&self.diagram, &id);
        if let Some(connections) = self.selection.connections() {
            let names = connections.names(&self.diagram);
            let message = if names.is_empty() {
                format!("{}: no connections", id)
            } else {
                format!("{} connects to {}", id, names.join(", "))
            };
            self.set_status_message(message);
        }
    }

    /// Show the selected Summary system in the Flow view.
    pub fn locate_in_flow(&mut self) {
        let Some(id) = self.selected_system().map(|s| s.id.clone()) else {
            return;
        };
        match self.flow_nodes().iter().position(|n| n.id == id) {
            Some(index) => {
                self.push_view(View::Flow);
                self.selected_node_index = index;
            }
            None => self.set_status_message(format!("{} is not on the diagram", id)),
        }
    }

    /// Open the drill-down overlay for the system under the cursor.
    pub fn enter_detail(&mut self) {
        let id = match self.current_view {
            View::Summary => self.selected_system().map(|s| s.id.clone()),
            View::Flow => self.selected_node().map(|n| n.id.clone()),
        };
        if let Some(id) = id {
            self.detail_system = Some(id);
            self.show_detail_overlay = true;
        }
    }

    /// Drill-down rows for the system shown in the overlay.
    pub fn detail_rows(&self) -> Vec<DrillDownRow> {
        match (&self.data, &self.detail_system) {
            (Some(data), Some(id)) => rows_for_system(&data.records, id),
            _ => Vec::new(),
        }
    }

    /// Cycle the drill-down focus.
    pub fn cycle_focus(&mut self) {
        self.drilldown_focus = self.drilldown_focus.next();
    }

    /// Navigate back: close overlay first, then clear the node selection,
    /// then pop the view stack, then go to Summary.
    pub fn go_back(&mut self) {
        if self.show_detail_overlay {
            self.close_overlay();
            return;
        }
        if self.current_view == View::Flow && self.selection.selected().is_some() {
            self.selection.clear();
            return;
        }
        if !self.pop_view() && self.current_view != View::Summary {
            self.current_view = View::Summary;
        }
    }

    /// Close the detail overlay if open.
    pub fn close_overlay(&mut self) {
        self.show_detail_overlay = false;
    }

    /// Toggle the help overlay.
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Cycle to the next sort column.
    pub fn cycle_sort(&mut self) {
        self.sort_column = self.sort_column.next();
    }

    /// Toggle sort direction between ascending and descending.
    pub fn toggle_sort_direction(&mut self) {
        self.sort_ascending = !self.sort_ascending;
    }

    /// Enter filter input mode (starts capturing keystrokes).
    pub fn start_filter(&mut self) {
        self.filter_active = true;
    }

    /// Exit filter input mode without clearing the filter text.
    pub fn cancel_filter(&mut self) {
        self.filter_active = false;
    }

    /// Clear the filter text and exit filter mode.
    pub fn clear_filter(&mut self) {
        self.filter_text.clear();
        self.filter_active = false;
    }

    /// Append a character to the filter text.
    pub fn filter_push(&mut self, c: char) {
        self.filter_text.push(c);
        self.clamp_selection();
    }

    /// Remove the last character from the filter text.
    pub fn filter_pop(&mut self) {
        self.filter_text.pop();
    }

    /// Check if a name matches the current filter.
    pub fn matches_filter(&self, name: &str) -> bool {
        if self.filter_text.is_empty() {
            return true;
        }
        name.to_lowercase().contains(&self.filter_text.to_lowercase())
    }

    fn matches_system(&self, system: &SystemData) -> bool {
        self.matches_filter(&system.id) || self.matches_filter(&system.name)
    }

    /// Whether transaction search is available.
    pub fn can_search(&self) -> bool {
        self.search.is_some()
    }

    /// Start typing a transaction search.
    pub fn start_search(&mut self) {
        if self.can_search() {
            self.search_active = true;
        } else {
            self.set_status_message("Transaction search needs --endpoint".to_string());
        }
    }

    pub fn cancel_search(&mut self) {
        self.search_active = false;
        self.search_input.clear();
    }

    /// Run a search for the text typed at the prompt.
    pub fn submit_search(&mut self) {
        self.search_active = false;
        let query = std::mem::take(&mut self.search_input);
        let (start, end) = &self.search_dates;
        let params = SearchParams::from_query(&query).with_dates(start.as_deref(), end.as_deref());

        let Some(task) = self.search.as_mut() else {
            return;
        };
        let message = match task.start(params) {
            Ok(()) => format!("Searching for {}...", query.trim()),
            Err(e) => e.to_string(),
        };
        self.set_status_message(message);
    }

    /// Pick up a finished search, if any. Called every tick.
    pub fn poll_search(&mut self) {
        let Some(outcome) = self.search.as_mut().and_then(SearchTask::poll) else {
            return;
        };
        match outcome {
            Ok(result) => {
                self.matched_systems = result.matched_systems();
                info!(
                    "search '{}' matched {} systems",
                    result.id,
                    self.matched_systems.len()
                );
                let message = format!(
                    "{}: {:?} {} {} ({} systems)",
                    result.id,
                    result.summary.status,
                    result.summary.amount,
                    result.summary.currency,
                    self.matched_systems.len()
                );
                self.search_result = Some(result);
                self.set_status_message(message);
            }
            Err(e) => {
                self.matched_systems.clear();
                self.search_result = None;
                self.set_status_message(e.to_string());
            }
        }
    }

    /// Forget the last search and its highlighting.
    pub fn clear_search(&mut self) {
        self.search_result = None;
        self.matched_systems.clear();
    }

    /// Signal the application to quit.
    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Export the current classification and the diagram to a file.
    pub fn export_state(&self, path: &Path) -> Result<()> {
        let Some(ref data) = self.data else {
            anyhow::bail!("No data to export");
        };
        Export::build(
            data,
            &self.diagram,
            &self.layout,
            export::DEFAULT_WIDTH,
            export::DEFAULT_HEIGHT,
        )
        .write(path)
    }
}
