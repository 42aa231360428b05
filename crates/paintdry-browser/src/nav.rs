//! Top-level sections and the tab bar state

use crate::router::{History, Route};
use paintdry_api::{CONFIG_ENDPOINT, SEARCH_ENDPOINT};

/// A top-level navigation destination
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Resources,
    Observations,
    Changes,
    History,
    Config,
    Search,
}

impl Section {
    /// Tab order
    pub const ALL: [Section; 6] = [
        Section::Resources,
        Section::Observations,
        Section::Changes,
        Section::History,
        Section::Config,
        Section::Search,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Section::Resources => "resources",
            Section::Observations => "observations",
            Section::Changes => "changes",
            Section::History => "history",
            Section::Config => "config",
            Section::Search => "search",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Section::Resources => "Resources",
            Section::Observations => "Observations",
            Section::Changes => "Changes",
            Section::History => "History",
            Section::Config => "Config",
            Section::Search => "Search",
        }
    }

    pub fn from_name(name: &str) -> Option<Section> {
        Section::ALL.into_iter().find(|s| s.name() == name)
    }

    pub fn root_path(self) -> String {
        format!("/{}", self.name())
    }

    /// Backend endpoint the section reads from
    pub fn endpoint(self) -> &'static str {
        match self {
            Section::Resources => "/api/resources",
            Section::Observations => "/api/observations",
            Section::Changes => "/api/changes",
            Section::History => "/api/history",
            Section::Config => CONFIG_ENDPOINT,
            Section::Search => SEARCH_ENDPOINT,
        }
    }
}

/// Index of the tab to highlight for `path`.
///
/// The first section (in tab order) whose name occurs anywhere in the path wins;
/// no match selects the first tab.
pub fn active_tab(path: &str) -> usize {
    Section::ALL
        .iter()
        .position(|s| path.contains(s.name()))
        .unwrap_or(0)
}

/// Tab bar plus the route history it drives.
///
/// The active tab is never stored; it is recomputed from the current path.
#[derive(Debug, Clone)]
pub struct NavigationShell {
    history: History,
}

impl NavigationShell {
    pub fn new(start_path: &str) -> Self {
        Self {
            history: History::new(start_path),
        }
    }

    pub fn current_path(&self) -> &str {
        self.history.current()
    }

    pub fn route(&self) -> Route {
        Route::parse(self.current_path())
    }

    pub fn active_tab(&self) -> usize {
        active_tab(self.current_path())
    }

    /// Go to the root of the tab at `index`. Returns true if the route changed.
    pub fn select_tab(&mut self, index: usize) -> bool {
        match Section::ALL.get(index) {
            Some(section) => self.history.push(&section.root_path()),
            None => false,
        }
    }

    pub fn navigate(&mut self, path: &str) -> bool {
        self.history.push(path)
    }

    pub fn back(&mut self) -> bool {
        self.history.back()
    }

    pub fn forward(&mut self) -> bool {
        self.history.forward()
    }
}
