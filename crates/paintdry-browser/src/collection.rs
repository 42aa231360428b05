//! Generic paginated grid over any collection endpoint

use crate::columns::{AutosizeOptions, ColumnSet, autosize};
use crate::fetch::{FetchRequest, FetchResponse, FetchSlot, Method};
use crate::identity::{Row, identify_rows};
use crate::router::child_path;
use paintdry_api::decode;

#[derive(Debug, Clone, PartialEq)]
pub enum TableState {
    Loading,
    Empty,
    Loaded(Vec<Row>),
    Error(String),
}

/// Renders one collection endpoint with caller-supplied columns.
///
/// Nothing here knows which kind of record it is showing. Activating a row
/// yields the drill-down route `<current path>/<row id>`.
#[derive(Debug)]
pub struct CollectionTable {
    endpoint: String,
    columns: ColumnSet,
    header: Option<String>,
    autosize: AutosizeOptions,
    state: TableState,
    slot: FetchSlot,
    page: usize,
    page_size: usize,
    /// Index within the current page of the row Enter activates
    cursor: usize,
}

impl CollectionTable {
    pub fn new(endpoint: impl Into<String>, columns: ColumnSet, header: Option<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            columns,
            header,
            autosize: AutosizeOptions::default(),
            state: TableState::Loading,
            slot: FetchSlot::default(),
            page: 0,
            page_size: 1,
            cursor: 0,
        }
    }

    pub fn with_autosize(mut self, options: AutosizeOptions) -> Self {
        self.autosize = options;
        self
    }

    /// Start (or restart) loading the collection
    pub fn mount(&mut self) -> FetchRequest {
        self.state = TableState::Loading;
        self.page = 0;
        self.cursor = 0;
        log::debug!("loading collection {}", self.endpoint);
        self.slot.issue(Method::get(self.endpoint.clone()))
    }

    pub fn unmount(&mut self) {
        self.slot.cancel();
    }

    /// Commit a response if it belongs to the newest request. Returns whether the
    /// state changed.
    pub fn on_response(&mut self, response: FetchResponse) -> bool {
        if !self.slot.accept(response.seq) {
            log::debug!(
                "dropping stale response #{} for {}",
                response.seq,
                self.endpoint
            );
            return false;
        }

        self.state = match response
            .result
            .and_then(|value| decode::array(value, &self.endpoint))
        {
            Ok(records) if records.is_empty() => TableState::Empty,
            Ok(records) => TableState::Loaded(identify_rows(records)),
            Err(e) => {
                log::debug!("collection {} failed: {}", self.endpoint, e);
                TableState::Error(e.to_string())
            }
        };
        self.clamp();
        true
    }

    pub fn state(&self) -> &TableState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state == TableState::Loading
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn columns(&self) -> &ColumnSet {
        &self.columns
    }

    pub fn header(&self) -> Option<&str> {
        self.header.as_deref()
    }

    pub fn rows(&self) -> &[Row] {
        match &self.state {
            TableState::Loaded(rows) => rows,
            _ => &[],
        }
    }

    /// Rows per page follow the visible height of the grid
    pub fn set_viewport_rows(&mut self, rows: usize) {
        let rows = rows.max(1);
        if rows != self.page_size {
            let first = self.page * self.page_size;
            self.page_size = rows;
            self.page = first / rows;
            self.clamp();
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Zero-based index of the current page
    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_count(&self) -> usize {
        self.rows().len().div_ceil(self.page_size).max(1)
    }

    pub fn page_rows(&self) -> &[Row] {
        let rows = self.rows();
        let start = (self.page * self.page_size).min(rows.len());
        let end = (start + self.page_size).min(rows.len());
        &rows[start..end]
    }

    pub fn next_page(&mut self) -> bool {
        if self.page + 1 < self.page_count() {
            self.page += 1;
            self.cursor = 0;
            true
        } else {
            false
        }
    }

    pub fn prev_page(&mut self) -> bool {
        if self.page > 0 {
            self.page -= 1;
            self.cursor = 0;
            true
        } else {
            false
        }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn cursor_up(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
        } else if self.prev_page() {
            self.cursor = self.page_rows().len().saturating_sub(1);
        }
    }

    pub fn cursor_down(&mut self) {
        if self.cursor + 1 < self.page_rows().len() {
            self.cursor += 1;
        } else {
            self.next_page();
        }
    }

    /// Drill-down route for the row under the cursor
    pub fn activate(&self, current_path: &str) -> Option<String> {
        self.activate_at(self.cursor, current_path)
    }

    /// Drill-down route for the `index`th row of the current page
    pub fn activate_at(&self, index: usize, current_path: &str) -> Option<String> {
        let row = self.page_rows().get(index)?;
        if row.id.is_ephemeral() {
            log::debug!("row {} has no backend id", row.id);
        }
        Some(child_path(current_path, &row.id.to_string()))
    }

    /// Widths for the grid's columns given `available` cells
    pub fn column_widths(&self, available: u16) -> Vec<u16> {
        autosize(&self.columns, self.rows(), available, &self.autosize)
    }

    fn clamp(&mut self) {
        let last = self.page_count() - 1;
        if self.page > last {
            self.page = last;
        }
        let len = self.page_rows().len();
        if self.cursor >= len {
            self.cursor = len.saturating_sub(1);
        }
    }
}
