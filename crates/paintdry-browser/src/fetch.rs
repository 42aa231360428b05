//! Request sequencing for fetching views.
//!
//! Every view owns a [`FetchSlot`]. Issuing through the slot supersedes (and
//! cancels) whatever the view asked for before, so only the newest request's
//! response is ever committed. Requests run on short-lived worker threads via
//! [`Fetcher`]; responses come back over an mpsc channel and the UI thread hands
//! them to the current view, which drops anything stale.

use paintdry_api::{ApiError, Backend};
use serde_json::Value;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

/// Sequence numbers are process-wide so a response can never be mistaken for one
/// issued by a different view instance.
static NEXT_SEQ: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Identity of one issued request
#[derive(Debug, Clone)]
pub struct Ticket {
    pub seq: u64,
    pub token: CancelToken,
}

impl Ticket {
    fn next() -> Self {
        Self {
            seq: NEXT_SEQ.fetch_add(1, Ordering::Relaxed),
            token: CancelToken::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Method {
    Get { path: String },
    Post { path: String, body: Value },
}

impl Method {
    pub fn get(path: impl Into<String>) -> Self {
        Method::Get { path: path.into() }
    }

    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Method::Post {
            path: path.into(),
            body,
        }
    }

    pub fn path(&self) -> &str {
        match self {
            Method::Get { path } | Method::Post { path, .. } => path,
        }
    }

    fn execute(&self, backend: &dyn Backend) -> Result<Value, ApiError> {
        match self {
            Method::Get { path } => backend.get(path),
            Method::Post { path, body } => backend.post(path, body),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FetchRequest {
    pub ticket: Ticket,
    pub method: Method,
}

impl FetchRequest {
    pub fn seq(&self) -> u64 {
        self.ticket.seq
    }

    /// Run the request on the calling thread
    pub fn execute(&self, backend: &dyn Backend) -> FetchResponse {
        FetchResponse {
            seq: self.ticket.seq,
            result: self.method.execute(backend),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FetchResponse {
    pub seq: u64,
    pub result: Result<Value, ApiError>,
}

/// At most one outstanding request per view
#[derive(Debug, Default)]
pub struct FetchSlot {
    current: Option<Ticket>,
}

impl FetchSlot {
    /// Issue a new request, cancelling the one in flight (if any)
    pub fn issue(&mut self, method: Method) -> FetchRequest {
        self.cancel();
        let ticket = Ticket::next();
        self.current = Some(ticket.clone());
        FetchRequest { ticket, method }
    }

    /// Claim a response. Returns true only for the newest, uncancelled request;
    /// the slot is then idle again.
    pub fn accept(&mut self, seq: u64) -> bool {
        match &self.current {
            Some(ticket) if ticket.seq == seq && !ticket.token.is_cancelled() => {
                self.current = None;
                true
            }
            _ => false,
        }
    }

    pub fn cancel(&mut self) {
        if let Some(ticket) = self.current.take() {
            ticket.token.cancel();
        }
    }
}

impl Drop for FetchSlot {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Runs requests off the UI thread
pub struct Fetcher {
    backend: Arc<dyn Backend>,
    response_tx: Sender<FetchResponse>,
}

impl Fetcher {
    pub fn new(backend: Arc<dyn Backend>) -> (Self, Receiver<FetchResponse>) {
        let (response_tx, response_rx) = mpsc::channel();
        (
            Self {
                backend,
                response_tx,
            },
            response_rx,
        )
    }

    pub fn dispatch(&self, request: FetchRequest) {
        let backend = Arc::clone(&self.backend);
        let tx = self.response_tx.clone();
        let seq = request.seq();

        let spawned = thread::Builder::new()
            .name(format!("fetch-{seq}"))
            .spawn(move || {
                if request.ticket.token.is_cancelled() {
                    log::debug!("request #{} cancelled before start", seq);
                    return;
                }
                let response = request.execute(backend.as_ref());
                if request.ticket.token.is_cancelled() {
                    log::debug!("request #{} cancelled, dropping response", seq);
                    return;
                }
                let _ = tx.send(response);
            });

        if let Err(e) = spawned {
            log::warn!("failed to start fetch worker: {}", e);
            let _ = self.response_tx.send(FetchResponse {
                seq,
                result: Err(ApiError::transport("(worker)", e)),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;

    struct Echo;

    impl Backend for Echo {
        fn get(&self, path: &str) -> Result<Value, ApiError> {
            Ok(json!({ "path": path }))
        }

        fn post(&self, path: &str, body: &Value) -> Result<Value, ApiError> {
            Ok(json!({ "path": path, "body": body }))
        }
    }

    #[test]
    fn test_only_newest_request_is_accepted() {
        let mut slot = FetchSlot::default();
        let first = slot.issue(Method::get("/a"));
        let second = slot.issue(Method::get("/b"));
        assert!(second.seq() > first.seq());
        assert!(first.ticket.token.is_cancelled());

        assert!(!slot.accept(first.seq()));
        assert!(slot.accept(second.seq()));
        // A duplicate delivery is not accepted twice
        assert!(!slot.accept(second.seq()));
    }

    #[test]
    fn test_cancelled_request_is_not_accepted() {
        let mut slot = FetchSlot::default();
        let request = slot.issue(Method::get("/a"));
        request.ticket.token.cancel();
        assert!(!slot.accept(request.seq()));
    }

    #[test]
    fn test_dropping_slot_cancels() {
        let mut slot = FetchSlot::default();
        let request = slot.issue(Method::get("/a"));
        drop(slot);
        assert!(request.ticket.token.is_cancelled());
    }

    #[test]
    fn test_sequence_is_unique_across_slots() {
        let mut a = FetchSlot::default();
        let mut b = FetchSlot::default();
        let ra = a.issue(Method::get("/a"));
        let rb = b.issue(Method::get("/a"));
        assert_ne!(ra.seq(), rb.seq());
        assert!(!b.accept(ra.seq()));
    }

    #[test]
    fn test_fetcher_delivers_response() {
        let (fetcher, rx) = Fetcher::new(Arc::new(Echo));
        let mut slot = FetchSlot::default();
        let request = slot.issue(Method::post("/api/search", json!({"search": "x"})));
        let seq = request.seq();
        fetcher.dispatch(request);

        let response = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(response.seq, seq);
        assert_eq!(
            response.result.unwrap(),
            json!({"path": "/api/search", "body": {"search": "x"}})
        );
    }

    #[test]
    fn test_fetcher_skips_cancelled_request() {
        let (fetcher, rx) = Fetcher::new(Arc::new(Echo));
        let mut slot = FetchSlot::default();
        let request = slot.issue(Method::get("/a"));
        slot.cancel();
        fetcher.dispatch(request);
        assert!(rx.recv_timeout(Duration::from_millis(200)).is_err());
    }
}
