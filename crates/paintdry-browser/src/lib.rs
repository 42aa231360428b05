//! # paintdry-browser
//!
//! Schema-driven browsing of the paintdry backend: one generic grid for every
//! collection, one raw record view, a search view and the tab navigation that
//! ties them to routes.
//!
//! Components never talk to the network themselves. They hand out
//! [`FetchRequest`]s and accept [`FetchResponse`]s, which keeps them synchronous
//! and testable; [`Fetcher`] runs the requests in the interactive browser.

pub mod collection;
pub mod columns;
pub mod config;
pub mod detail;
pub mod fetch;
pub mod identity;
pub mod nav;
pub mod router;
pub mod search;
pub mod tui;
pub mod views;

pub use collection::{CollectionTable, TableState};
pub use columns::{AutosizeOptions, Column, ColumnError, ColumnSet, autosize, cell_text};
pub use config::{BrowserConfig, ConfigError};
pub use detail::{DetailState, DetailTarget, RecordDetail};
pub use fetch::{CancelToken, FetchRequest, FetchResponse, FetchSlot, Fetcher, Method, Ticket};
pub use identity::{Row, RowId, identify_rows};
pub use nav::{NavigationShell, Section, active_tab};
pub use router::{History, Route, child_path, normalize_path, parent_path, resolve_path};
pub use search::{PAGE_SIZE, SearchBrowser, SearchStatus, details_line, result_details};
pub use views::{COLLECTIONS, CollectionSpec, Retarget, View};
