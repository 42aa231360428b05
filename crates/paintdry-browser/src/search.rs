//! Free-text search over every record kind

use crate::columns::cell_text;
use crate::fetch::{FetchRequest, FetchResponse, FetchSlot, Method};
use paintdry_api::{ResultKind, SearchRequest, SearchResult, decode};
use serde_json::Value;

/// Results per page; fixed by the backend
pub const PAGE_SIZE: u64 = 50;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchStatus {
    /// Blank term, nothing requested
    Idle,
    Loading,
    Ready,
    Error(String),
}

/// Search input state, the current page of results and pagination.
///
/// Every term change issues a request; there is no debouncing. Out-of-order
/// responses are discarded by the fetch slot.
#[derive(Debug)]
pub struct SearchBrowser {
    endpoint: String,
    term: String,
    page: u32,
    results: Vec<SearchResult>,
    total_pages: u32,
    total_results: u64,
    status: SearchStatus,
    slot: FetchSlot,
    scroll: usize,
}

impl SearchBrowser {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            term: String::new(),
            page: 1,
            results: Vec::new(),
            total_pages: 0,
            total_results: 0,
            status: SearchStatus::Idle,
            slot: FetchSlot::default(),
            scroll: 0,
        }
    }

    /// New term, back to page 1. A blank term clears everything without a request.
    pub fn set_term(&mut self, term: &str) -> Option<FetchRequest> {
        self.search(term, 1)
    }

    /// Search `term` at `page` (1-based)
    pub fn search(&mut self, term: &str, page: u32) -> Option<FetchRequest> {
        self.term = term.to_string();
        self.page = page.max(1);

        if self.term.trim().is_empty() {
            self.slot.cancel();
            self.clear();
            self.status = SearchStatus::Idle;
            return None;
        }

        let request = SearchRequest::new(self.term.clone(), self.page);
        log::debug!("search {:?} page {}", request.search, request.page);
        self.status = SearchStatus::Loading;
        Some(
            self.slot
                .issue(Method::post(self.endpoint.clone(), request.body())),
        )
    }

    /// Re-run the current term at another page, clamped to the known page range
    pub fn set_page(&mut self, page: u32) -> Option<FetchRequest> {
        let page = page.clamp(1, self.total_pages.max(1));
        if page == self.page {
            return None;
        }
        let term = self.term.clone();
        self.search(&term, page)
    }

    pub fn next_page(&mut self) -> Option<FetchRequest> {
        self.set_page(self.page.saturating_add(1))
    }

    pub fn prev_page(&mut self) -> Option<FetchRequest> {
        self.set_page(self.page.saturating_sub(1))
    }

    pub fn unmount(&mut self) {
        self.slot.cancel();
    }

    pub fn on_response(&mut self, response: FetchResponse) -> bool {
        if !self.slot.accept(response.seq) {
            log::debug!("dropping stale search response #{}", response.seq);
            return false;
        }

        match response
            .result
            .and_then(|value| decode::search_response(value, &self.endpoint))
        {
            Ok(page) => {
                // Never report fewer results than this page shows
                let shown = (self.page as u64 - 1) * PAGE_SIZE + page.results.len() as u64;
                self.total_pages = if page.results.is_empty() {
                    page.total_pages
                } else {
                    page.total_pages.max(self.page)
                };
                self.total_results = page.total_results.max(shown);
                self.results = page.results;
                self.status = SearchStatus::Ready;
            }
            Err(e) => {
                log::warn!("search for {:?} failed: {}", self.term, e);
                self.clear();
                self.status = SearchStatus::Error(e.to_string());
            }
        }
        self.scroll = 0;
        true
    }

    fn clear(&mut self) {
        self.results.clear();
        self.total_pages = 0;
        self.total_results = 0;
        self.scroll = 0;
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn results(&self) -> &[SearchResult] {
        &self.results
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    pub fn total_results(&self) -> u64 {
        self.total_results
    }

    pub fn status(&self) -> &SearchStatus {
        &self.status
    }

    pub fn is_loading(&self) -> bool {
        self.status == SearchStatus::Loading
    }

    pub fn show_pagination(&self) -> bool {
        self.total_pages > 1
    }

    /// `Showing results 51-100 of 120`
    pub fn summary(&self) -> Option<String> {
        if self.results.is_empty() {
            return None;
        }
        let start = (self.page as u64 - 1) * PAGE_SIZE + 1;
        let end = (self.page as u64 * PAGE_SIZE).min(self.total_results);
        Some(format!(
            "Showing results {}-{} of {}",
            start, end, self.total_results
        ))
    }

    pub fn empty_message(&self) -> Option<String> {
        if self.status == SearchStatus::Ready && self.results.is_empty() {
            Some(format!("No results found for \"{}\"", self.term))
        } else {
            None
        }
    }

    pub fn scroll(&self) -> usize {
        self.scroll
    }

    pub fn scroll_by(&mut self, delta: isize) {
        let max = self.results.len().saturating_sub(1);
        self.scroll = self.scroll.saturating_add_signed(delta).min(max);
    }
}

/// Kind-specific details of a search hit as `(label, value)` pairs.
///
/// Observations and changes only show details when they name an attribute.
/// Unknown kinds show nothing extra.
pub fn result_details(result: &SearchResult) -> Vec<(&'static str, String)> {
    let text = |value: &Option<Value>| cell_text(value.as_ref());
    let mut details = Vec::new();

    match result.kind {
        ResultKind::Observation => {
            let Some(attribute) = &result.attribute else {
                return details;
            };
            details.push(("Attribute", attribute.clone()));
            details.push(("Value", text(&result.value)));
            if let Some(severity) = &result.severity {
                details.push(("Severity", severity.clone()));
            }
            details.push(("First seen", text(&result.first_seen)));
            details.push(("Last seen", text(&result.last_seen)));
        }
        ResultKind::Change => {
            let Some(attribute) = &result.attribute else {
                return details;
            };
            details.push(("Attribute", attribute.clone()));
            details.push(("Old value", text(&result.old_value)));
            details.push(("New value", text(&result.new_value)));
            if let Some(severity) = &result.severity {
                details.push(("Severity", severity.clone()));
            }
            details.push(("Timestamp", text(&result.timestamp)));
        }
        ResultKind::Resource => {
            details.push(("Source", result.source.clone().unwrap_or_default()));
            details.push(("First seen", text(&result.first_seen)));
            details.push(("Last seen", text(&result.last_seen)));
        }
        ResultKind::Other(_) | ResultKind::Untagged => {}
    }
    details
}

/// Details joined on one line: `Attribute: A, Value: 1.2.3.4`
pub fn details_line(result: &SearchResult) -> String {
    result_details(result)
        .into_iter()
        .map(|(label, value)| format!("{}: {}", label, value))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use paintdry_api::ApiError;
    use serde_json::json;

    fn respond(search: &mut SearchBrowser, request: &FetchRequest, value: Value) -> bool {
        search.on_response(FetchResponse {
            seq: request.seq(),
            result: Ok(value),
        })
    }

    fn hits(n: usize) -> Value {
        Value::Array(
            (0..n)
                .map(|i| json!({"type": "resource", "resource": format!("r{i}")}))
                .collect(),
        )
    }

    #[test]
    fn test_default_page_body() {
        let mut search = SearchBrowser::new("/api/search");
        let request = search.set_term("example").unwrap();
        assert_eq!(
            request.method,
            Method::post("/api/search", json!({"search": "example", "page": 1}))
        );
        assert!(search.is_loading());
    }

    #[test]
    fn test_blank_term_resets_without_request() {
        let mut search = SearchBrowser::new("/api/search");
        let request = search.set_term("example").unwrap();
        respond(
            &mut search,
            &request,
            json!({"results": hits(3), "total_pages": 1, "total_results": 3}),
        );
        assert_eq!(search.results().len(), 3);

        assert!(search.set_term("   ").is_none());
        assert!(search.results().is_empty());
        assert_eq!((search.total_pages(), search.total_results()), (0, 0));
        assert_eq!(search.status(), &SearchStatus::Idle);
    }

    #[test]
    fn test_blank_term_cancels_pending_search() {
        let mut search = SearchBrowser::new("/api/search");
        let request = search.set_term("exa").unwrap();
        search.set_term("");
        assert!(!respond(&mut search, &request, json!({"results": hits(1)})));
        assert!(search.results().is_empty());
    }

    #[test]
    fn test_out_of_order_responses_are_dropped() {
        let mut search = SearchBrowser::new("/api/search");
        let first = search.set_term("e").unwrap();
        let second = search.set_term("ex").unwrap();

        assert!(respond(
            &mut search,
            &second,
            json!({"results": hits(1), "total_pages": 1, "total_results": 1})
        ));
        assert!(!respond(
            &mut search,
            &first,
            json!({"results": hits(9), "total_pages": 1, "total_results": 9})
        ));
        assert_eq!(search.results().len(), 1);
        assert_eq!(search.term(), "ex");
    }

    #[test]
    fn test_summary_range() {
        let mut search = SearchBrowser::new("/api/search");
        let request = search.search("example", 2).unwrap();
        respond(
            &mut search,
            &request,
            json!({"results": hits(50), "total_pages": 3, "total_results": 120}),
        );
        assert_eq!(
            search.summary().as_deref(),
            Some("Showing results 51-100 of 120")
        );
        assert!(search.show_pagination());

        let request = search.next_page().unwrap();
        assert_eq!(
            request.method,
            Method::post("/api/search", json!({"search": "example", "page": 3}))
        );
        respond(
            &mut search,
            &request,
            json!({"results": hits(20), "total_pages": 3, "total_results": 120}),
        );
        assert_eq!(
            search.summary().as_deref(),
            Some("Showing results 101-120 of 120")
        );
        assert!(search.next_page().is_none());
    }

    #[test]
    fn test_summary_counts_at_least_the_shown_page() {
        let mut search = SearchBrowser::new("/api/search");
        let request = search.set_term("dns").unwrap();
        respond(&mut search, &request, json!({"results": hits(3)}));
        assert_eq!(search.summary().as_deref(), Some("Showing results 1-3 of 3"));
        assert_eq!(search.total_pages(), 1);

        let request = search.search("dns", 2).unwrap();
        respond(
            &mut search,
            &request,
            json!({"results": hits(50), "total_pages": 1, "total_results": 60}),
        );
        assert_eq!(
            search.summary().as_deref(),
            Some("Showing results 51-100 of 100")
        );
        assert_eq!(search.total_pages(), 2);
    }

    #[test]
    fn test_pagination_hidden_for_single_page() {
        let mut search = SearchBrowser::new("/api/search");
        let request = search.set_term("x").unwrap();
        respond(
            &mut search,
            &request,
            json!({"results": hits(2), "total_pages": 1, "total_results": 2}),
        );
        assert!(!search.show_pagination());
        assert!(search.prev_page().is_none());
    }

    #[test]
    fn test_missing_fields_default() {
        let mut search = SearchBrowser::new("/api/search");
        let request = search.set_term("nothing").unwrap();
        respond(&mut search, &request, json!({}));
        assert_eq!(search.status(), &SearchStatus::Ready);
        assert_eq!(
            search.empty_message().as_deref(),
            Some("No results found for \"nothing\"")
        );
        assert_eq!(search.summary(), None);
    }

    #[test]
    fn test_failure_degrades_to_empty() {
        let mut search = SearchBrowser::new("/api/search");
        let request = search.set_term("x").unwrap();
        respond(
            &mut search,
            &request,
            json!({"results": hits(2), "total_pages": 1, "total_results": 2}),
        );

        let request = search.set_term("xy").unwrap();
        search.on_response(FetchResponse {
            seq: request.seq(),
            result: Err(ApiError::Status {
                url: "http://localhost:5000/api/search".into(),
                status: 500,
            }),
        });
        assert!(search.results().is_empty());
        assert_eq!(search.total_results(), 0);
        assert!(matches!(search.status(), SearchStatus::Error(msg) if msg.contains("500")));
        assert_eq!(search.empty_message(), None);
    }

    fn result(value: Value) -> SearchResult {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_observation_details() {
        let r = result(json!({
            "type": "observation", "resource": "example.com", "module": "dns",
            "attribute": "A", "value": "93.184.216.34",
            "first_seen": "2024-01-01", "last_seen": "2024-02-01"
        }));
        insta::assert_snapshot!(details_line(&r), @"Attribute: A, Value: 93.184.216.34, First seen: 2024-01-01, Last seen: 2024-02-01");
    }

    #[test]
    fn test_change_details_with_severity() {
        let r = result(json!({
            "type": "change", "resource": "example.com", "module": "tls",
            "attribute": "issuer", "old_value": "A", "new_value": "B",
            "severity": "high", "timestamp": 1700000000
        }));
        assert_eq!(
            result_details(&r),
            vec![
                ("Attribute", "issuer".to_string()),
                ("Old value", "A".to_string()),
                ("New value", "B".to_string()),
                ("Severity", "high".to_string()),
                ("Timestamp", "1700000000".to_string()),
            ]
        );
    }

    #[test]
    fn test_details_need_attribute() {
        let r = result(json!({"type": "observation", "resource": "x", "value": 1}));
        assert!(result_details(&r).is_empty());
        let r = result(json!({"type": "change", "resource": "x"}));
        assert!(result_details(&r).is_empty());
    }

    #[test]
    fn test_resource_and_unknown_details() {
        let r = result(json!({"type": "resource", "resource": "x", "source": "config"}));
        assert_eq!(details_line(&r), "Source: config, First seen: , Last seen: ");

        let r = result(json!({"type": "snapshot", "resource": "x", "attribute": "a"}));
        assert!(result_details(&r).is_empty());
    }
}
