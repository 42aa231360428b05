use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Value, json};

/// Body of `POST /api/search`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchRequest {
    pub search: String,
    pub page: u32,
}

impl SearchRequest {
    pub fn new(search: impl Into<String>, page: u32) -> Self {
        Self {
            search: search.into(),
            page: page.max(1),
        }
    }

    /// The JSON body posted to the search endpoint
    pub fn body(&self) -> Value {
        json!({ "search": self.search, "page": self.page })
    }
}

/// One page of search results.
///
/// Missing or null fields fall back to an empty page. The backend also echoes
/// `query`, `page` and `per_page`; those are ignored.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SearchResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub results: Vec<SearchResult>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_pages: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_results: u64,
}

/// Record kind carried in the `type` tag of a search result
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum ResultKind {
    Resource,
    Observation,
    Change,
    /// Any tag this client does not know about
    Other(String),
    #[default]
    Untagged,
}

impl From<String> for ResultKind {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "resource" => ResultKind::Resource,
            "observation" => ResultKind::Observation,
            "change" => ResultKind::Change,
            "" => ResultKind::Untagged,
            _ => ResultKind::Other(tag),
        }
    }
}

impl ResultKind {
    pub fn as_str(&self) -> &str {
        match self {
            ResultKind::Resource => "resource",
            ResultKind::Observation => "observation",
            ResultKind::Change => "change",
            ResultKind::Other(tag) => tag,
            ResultKind::Untagged => "",
        }
    }
}

/// A search hit: shared fields plus whatever the record kind carries.
///
/// Attribute values and timestamps are kept as raw JSON since the backend emits
/// strings, numbers and nulls interchangeably there.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SearchResult {
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub kind: ResultKind,
    pub id: Option<Value>,
    pub resource: Option<String>,
    pub module: Option<String>,
    pub attribute: Option<String>,
    pub value: Option<Value>,
    pub old_value: Option<Value>,
    pub new_value: Option<Value>,
    pub source: Option<String>,
    pub severity: Option<String>,
    pub first_seen: Option<Value>,
    pub last_seen: Option<Value>,
    pub timestamp: Option<Value>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
