//! Raw view of a single record (or document)

use crate::fetch::{FetchRequest, FetchResponse, FetchSlot, Method};
use paintdry_api::join_endpoint;
use serde_json::Value;

/// What a detail view fetches
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailTarget {
    /// `GET <endpoint>/<id>`; nothing is fetched while the id is absent
    Record { endpoint: String, id: Option<String> },
    /// `GET <endpoint>` as-is
    Document { endpoint: String },
}

impl DetailTarget {
    pub fn endpoint(&self) -> &str {
        match self {
            DetailTarget::Record { endpoint, .. } | DetailTarget::Document { endpoint } => endpoint,
        }
    }

    pub fn is_record_of(&self, endpoint: &str) -> bool {
        matches!(self, DetailTarget::Record { endpoint: e, .. } if e == endpoint)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DetailState {
    Idle,
    Loading,
    Loaded(Value),
    Error(String),
}

#[derive(Debug)]
pub struct RecordDetail {
    target: DetailTarget,
    heading: String,
    preamble: Option<String>,
    state: DetailState,
    slot: FetchSlot,
    scroll: u16,
}

impl RecordDetail {
    pub fn record(endpoint: impl Into<String>, id: Option<String>) -> Self {
        Self::new(DetailTarget::Record {
            endpoint: endpoint.into(),
            id,
        })
    }

    pub fn document(endpoint: impl Into<String>) -> Self {
        Self::new(DetailTarget::Document {
            endpoint: endpoint.into(),
        })
    }

    fn new(target: DetailTarget) -> Self {
        Self {
            target,
            heading: "Details".to_string(),
            preamble: None,
            state: DetailState::Idle,
            slot: FetchSlot::default(),
            scroll: 0,
        }
    }

    pub fn with_heading(mut self, heading: impl Into<String>) -> Self {
        self.heading = heading.into();
        self
    }

    /// Text shown above the document body
    pub fn with_preamble(mut self, preamble: impl Into<String>) -> Self {
        self.preamble = Some(preamble.into());
        self
    }

    pub fn target(&self) -> &DetailTarget {
        &self.target
    }

    pub fn id(&self) -> Option<&str> {
        match &self.target {
            DetailTarget::Record { id, .. } => id.as_deref(),
            DetailTarget::Document { .. } => None,
        }
    }

    /// Backend path this view reads, if any
    pub fn request_path(&self) -> Option<String> {
        match &self.target {
            DetailTarget::Record { endpoint, id } => {
                id.as_deref().map(|id| join_endpoint(endpoint, id))
            }
            DetailTarget::Document { endpoint } => Some(endpoint.clone()),
        }
    }

    pub fn mount(&mut self) -> Option<FetchRequest> {
        self.scroll = 0;
        match self.request_path() {
            Some(path) => {
                self.state = DetailState::Loading;
                Some(self.slot.issue(Method::get(path)))
            }
            None => {
                self.slot.cancel();
                self.state = DetailState::Idle;
                None
            }
        }
    }

    /// Change the record id. Refetches only when it actually changed.
    pub fn set_id(&mut self, new_id: Option<String>) -> Option<FetchRequest> {
        match &mut self.target {
            DetailTarget::Record { id, .. } if *id != new_id => *id = new_id,
            _ => return None,
        }
        self.mount()
    }

    pub fn unmount(&mut self) {
        self.slot.cancel();
    }

    pub fn on_response(&mut self, response: FetchResponse) -> bool {
        if !self.slot.accept(response.seq) {
            log::debug!("dropping stale detail response #{}", response.seq);
            return false;
        }
        self.state = match response.result {
            Ok(value) => DetailState::Loaded(value),
            Err(e) => DetailState::Error(e.to_string()),
        };
        true
    }

    pub fn state(&self) -> &DetailState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state == DetailState::Loading
    }

    pub fn preamble(&self) -> Option<&str> {
        self.preamble.as_deref()
    }

    /// `Details`, or `Details: <resource> (<id>)` once a record naming its
    /// resource has loaded
    pub fn title(&self) -> String {
        let resource = match &self.state {
            DetailState::Loaded(value) => value.get("resource").and_then(Value::as_str),
            _ => None,
        };
        match (resource, self.id()) {
            (Some(resource), Some(id)) => format!("{}: {} ({})", self.heading, resource, id),
            _ => self.heading.clone(),
        }
    }

    /// The loaded value, pretty printed with 2-space indentation
    pub fn pretty(&self) -> Option<String> {
        match &self.state {
            DetailState::Loaded(value) => serde_json::to_string_pretty(value).ok(),
            _ => None,
        }
    }

    pub fn scroll(&self) -> u16 {
        self.scroll
    }

    pub fn scroll_by(&mut self, delta: i32) {
        let lines = self
            .pretty()
            .map(|text| text.lines().count())
            .unwrap_or(0);
        let max = lines.saturating_sub(1).min(u16::MAX as usize) as i32;
        self.scroll = (self.scroll as i32 + delta).clamp(0, max) as u16;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use paintdry_api::ApiError;
    use serde_json::json;

    fn load(detail: &mut RecordDetail, value: Value) {
        let request = detail.mount().unwrap();
        assert!(detail.on_response(FetchResponse {
            seq: request.seq(),
            result: Ok(value),
        }));
    }

    #[test]
    fn test_exactly_one_separator() {
        for endpoint in ["/api/resources", "/api/resources/"] {
            let mut detail = RecordDetail::record(endpoint, Some("42".into()));
            let request = detail.mount().unwrap();
            assert_eq!(request.method, Method::get("/api/resources/42"));
        }
    }

    #[test]
    fn test_no_id_no_request() {
        let mut detail = RecordDetail::record("/api/resources", None);
        assert!(detail.mount().is_none());
        assert_eq!(detail.state(), &DetailState::Idle);
    }

    #[test]
    fn test_set_id_refetches_only_on_change() {
        let mut detail = RecordDetail::record("/api/changes", Some("1".into()));
        let first = detail.mount().unwrap();
        assert!(detail.set_id(Some("1".into())).is_none());

        let second = detail.set_id(Some("2".into())).unwrap();
        assert_eq!(second.method, Method::get("/api/changes/2"));
        assert!(first.ticket.token.is_cancelled());
        assert!(!detail.on_response(FetchResponse {
            seq: first.seq(),
            result: Ok(json!({"id": 1})),
        }));
        assert!(detail.is_loading());
    }

    #[test]
    fn test_raw_value_is_kept_verbatim() {
        let mut detail = RecordDetail::record("/api/history", Some("3".into()));
        let value = json!({"id": 3, "nested": {"list": [1, 2]}, "extra": null});
        load(&mut detail, value.clone());
        assert_eq!(detail.state(), &DetailState::Loaded(value));
        insta::assert_snapshot!(detail.pretty().unwrap(), @r#"
        {
          "extra": null,
          "id": 3,
          "nested": {
            "list": [
              1,
              2
            ]
          }
        }
        "#);
    }

    #[test]
    fn test_title() {
        let mut detail = RecordDetail::record("/api/resources", Some("42".into()));
        assert_eq!(detail.title(), "Details");
        load(&mut detail, json!({"id": 42, "resource": "example.com"}));
        assert_eq!(detail.title(), "Details: example.com (42)");

        let mut config = RecordDetail::record("/api/config", Some("7".into())).with_heading("Config");
        load(&mut config, json!({"resource": "example.org"}));
        assert_eq!(config.title(), "Config: example.org (7)");
    }

    #[test]
    fn test_document_target() {
        let mut detail = RecordDetail::document("/api/config").with_heading("Config");
        assert_eq!(detail.request_path().as_deref(), Some("/api/config"));
        load(&mut detail, json!({"resource": "ignored"}));
        assert_eq!(detail.title(), "Config");
        assert!(detail.set_id(Some("1".into())).is_none());
    }

    #[test]
    fn test_not_found_is_error_state() {
        let mut detail = RecordDetail::record("/api/resources", Some("-1".into()));
        let request = detail.mount().unwrap();
        detail.on_response(FetchResponse {
            seq: request.seq(),
            result: Err(ApiError::NotFound {
                url: "http://localhost:5000/api/resources/-1".into(),
            }),
        });
        assert_eq!(
            detail.state(),
            &DetailState::Error("http://localhost:5000/api/resources/-1 was not found".into())
        );
    }

    #[test]
    fn test_scroll_is_clamped() {
        let mut detail = RecordDetail::record("/api/resources", Some("1".into()));
        load(&mut detail, json!({"a": 1, "b": 2}));
        detail.scroll_by(-5);
        assert_eq!(detail.scroll(), 0);
        detail.scroll_by(100);
        assert_eq!(detail.scroll(), 3);
    }
}
