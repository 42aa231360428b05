use paintdry_api::{ApiError, Backend};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::Mutex;
use std::thread;
use std::time::Duration;

/// A request the fake backend received
#[derive(Debug, Clone, PartialEq)]
pub enum Seen {
    Get(String),
    Post(String, Value),
}

/// In-memory backend with canned GET answers, scripted search pages and a log
/// of every request
#[derive(Default)]
pub struct FakeBackend {
    gets: HashMap<String, Result<Value, ApiError>>,
    /// Search term -> (response, delay)
    searches: HashMap<String, (Value, Duration)>,
    seen: Mutex<Vec<Seen>>,
}

#[allow(unused)]
impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_get(mut self, path: &str, value: Value) -> Self {
        self.gets.insert(path.to_string(), Ok(value));
        self
    }

    pub fn with_get_error(mut self, path: &str, error: ApiError) -> Self {
        self.gets.insert(path.to_string(), Err(error));
        self
    }

    pub fn with_search(mut self, term: &str, response: Value) -> Self {
        self.searches
            .insert(term.to_string(), (response, Duration::ZERO));
        self
    }

    pub fn with_slow_search(mut self, term: &str, response: Value, delay: Duration) -> Self {
        self.searches.insert(term.to_string(), (response, delay));
        self
    }

    pub fn seen(&self) -> Vec<Seen> {
        self.seen.lock().unwrap().clone()
    }

    pub fn gets(&self) -> Vec<String> {
        self.seen()
            .into_iter()
            .filter_map(|s| match s {
                Seen::Get(path) => Some(path),
                Seen::Post(..) => None,
            })
            .collect()
    }

    pub fn posts(&self) -> Vec<Value> {
        self.seen()
            .into_iter()
            .filter_map(|s| match s {
                Seen::Post(_, body) => Some(body),
                Seen::Get(_) => None,
            })
            .collect()
    }
}

impl Backend for FakeBackend {
    fn get(&self, path: &str) -> Result<Value, ApiError> {
        self.seen.lock().unwrap().push(Seen::Get(path.to_string()));
        self.gets.get(path).cloned().unwrap_or_else(|| {
            Err(ApiError::NotFound {
                url: path.to_string(),
            })
        })
    }

    fn post(&self, path: &str, body: &Value) -> Result<Value, ApiError> {
        self.seen
            .lock()
            .unwrap()
            .push(Seen::Post(path.to_string(), body.clone()));
        let term = body["search"].as_str().unwrap_or_default();
        match self.searches.get(term) {
            Some((response, delay)) => {
                thread::sleep(*delay);
                Ok(response.clone())
            }
            None => Ok(json!({"results": [], "total_pages": 0, "total_results": 0})),
        }
    }
}

/// `n` search hits of kind resource
#[allow(unused)]
pub fn resource_hits(n: usize) -> Value {
    Value::Array(
        (0..n)
            .map(|i| json!({"type": "resource", "resource": format!("host{i}.example.com")}))
            .collect(),
    )
}

/// Commit responses until the mounted view stops loading. False on timeout.
#[allow(unused)]
pub fn settle(app: &mut paintdry_browser::tui::App) -> bool {
    let deadline = std::time::Instant::now() + Duration::from_secs(5);
    loop {
        app.poll_responses();
        if !app.view.is_loading() {
            return true;
        }
        if std::time::Instant::now() >= deadline {
            return false;
        }
        thread::sleep(Duration::from_millis(5));
    }
}
