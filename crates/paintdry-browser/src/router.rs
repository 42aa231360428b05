//! In-app routes and the browser-style history stack

use crate::nav::Section;
use paintdry_api::join_endpoint;

/// Prefix the web frontend was served under; accepted and stripped
const UI_PREFIX: &str = "/ui";

/// Route every empty or bare-prefix path redirects to
pub const HOME_PATH: &str = "/resources";

/// What a path shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Collection(Section),
    Record(Section, String),
    Search,
    Config,
    ConfigRecord(String),
    NotFound(String),
}

impl Route {
    pub fn parse(path: &str) -> Route {
        let path = resolve_path(path);
        let segments: Vec<&str> = path.trim_start_matches('/').split('/').collect();

        match segments.as_slice() {
            [name] => match Section::from_name(name) {
                Some(Section::Search) => Route::Search,
                Some(Section::Config) => Route::Config,
                Some(section) => Route::Collection(section),
                None => Route::NotFound(path),
            },
            [name, id] => match Section::from_name(name) {
                Some(Section::Config) => Route::ConfigRecord(id.to_string()),
                Some(Section::Search) | None => Route::NotFound(path),
                Some(section) => Route::Record(section, id.to_string()),
            },
            _ => Route::NotFound(path),
        }
    }
}

/// Canonical form of a path: leading slash, no empty segments, no trailing slash
pub fn normalize_path(path: &str) -> String {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    format!("/{}", segments.join("/"))
}

/// Normalize, strip the `/ui` prefix and apply the home redirect
pub fn resolve_path(path: &str) -> String {
    let path = normalize_path(path);
    let path = match path.strip_prefix(UI_PREFIX) {
        Some("") => "/".to_string(),
        Some(rest) if rest.starts_with('/') => rest.to_string(),
        _ => path,
    };
    if path == "/" {
        HOME_PATH.to_string()
    } else {
        path
    }
}

/// One segment up: `/resources/42` → `/resources`, `/resources` → `/`
pub fn parent_path(path: &str) -> String {
    let path = normalize_path(path);
    match path.rfind('/') {
        Some(0) | None => "/".to_string(),
        Some(i) => path[..i].to_string(),
    }
}

/// `<path>/<segment>` with exactly one separator
pub fn child_path(path: &str, segment: &str) -> String {
    join_endpoint(&normalize_path(path), segment)
}

/// Visited routes with back/forward, like a browser tab
#[derive(Debug, Clone)]
pub struct History {
    entries: Vec<String>,
    index: usize,
}

impl History {
    pub fn new(start: &str) -> Self {
        Self {
            entries: vec![resolve_path(start)],
            index: 0,
        }
    }

    pub fn current(&self) -> &str {
        &self.entries[self.index]
    }

    /// Visit `path`. Forward entries are discarded. Returns false when `path` is
    /// already the current entry.
    pub fn push(&mut self, path: &str) -> bool {
        let path = resolve_path(path);
        if path == self.current() {
            return false;
        }
        self.entries.truncate(self.index + 1);
        self.entries.push(path);
        self.index += 1;
        true
    }

    pub fn back(&mut self) -> bool {
        if self.can_go_back() {
            self.index -= 1;
            true
        } else {
            false
        }
    }

    pub fn forward(&mut self) -> bool {
        if self.can_go_forward() {
            self.index += 1;
            true
        } else {
            false
        }
    }

    pub fn can_go_back(&self) -> bool {
        self.index > 0
    }

    pub fn can_go_forward(&self) -> bool {
        self.index + 1 < self.entries.len()
    }
}
