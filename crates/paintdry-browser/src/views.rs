//! Route outlet: which component is mounted for a route, and with what

use crate::collection::CollectionTable;
use crate::columns::{AutosizeOptions, ColumnError, ColumnSet};
use crate::detail::{DetailTarget, RecordDetail};
use crate::fetch::{FetchRequest, FetchResponse};
use crate::nav::Section;
use crate::router::Route;
use crate::search::SearchBrowser;

/// Column layout of a collection section
#[derive(Debug, Clone, Copy)]
pub struct CollectionSpec {
    pub section: Section,
    pub fields: &'static [&'static str],
}

pub static COLLECTIONS: [CollectionSpec; 4] = [
    CollectionSpec {
        section: Section::Resources,
        fields: &["id", "resource", "modules", "source", "first_seen", "last_seen"],
    },
    CollectionSpec {
        section: Section::Observations,
        fields: &["id", "resource", "module", "attribute", "value", "last_changed"],
    },
    CollectionSpec {
        section: Section::Changes,
        fields: &[
            "id",
            "resource",
            "module",
            "attribute",
            "old_value",
            "new_value",
            "timestamp",
        ],
    },
    CollectionSpec {
        section: Section::History,
        fields: &["id", "resource", "module", "attribute", "value", "timestamp"],
    },
];

impl CollectionSpec {
    pub fn for_section(section: Section) -> Option<&'static CollectionSpec> {
        COLLECTIONS.iter().find(|spec| spec.section == section)
    }

    pub fn columns(&self) -> Result<ColumnSet, ColumnError> {
        ColumnSet::from_fields(self.fields)
    }

    pub fn table(&self, autosize: &AutosizeOptions) -> Result<CollectionTable, ColumnError> {
        Ok(CollectionTable::new(
            self.section.endpoint(),
            self.columns()?,
            Some(self.section.label().to_string()),
        )
        .with_autosize(autosize.clone()))
    }
}

const CONFIG_PREAMBLE: &str = "The block below shows the contents of config/config.json. \
Secrets from config/secrets.json are never exposed.";

/// The mounted component
#[derive(Debug)]
pub enum View {
    Collection(CollectionTable),
    Detail(RecordDetail),
    Search(SearchBrowser),
    NotFound(String),
}

/// Outcome of pointing the mounted view at a new route
#[derive(Debug)]
pub enum Retarget {
    /// Same component and parameters; nothing to do
    Unchanged,
    /// Same component, new parameters
    Refetch(FetchRequest),
    /// A different component is needed
    Replace,
}

impl View {
    pub fn for_route(route: &Route, autosize: &AutosizeOptions) -> Result<View, ColumnError> {
        let view = match route {
            Route::Collection(section) => match CollectionSpec::for_section(*section) {
                Some(spec) => View::Collection(spec.table(autosize)?),
                None => View::NotFound(section.root_path()),
            },
            Route::Record(section, id) => {
                View::Detail(RecordDetail::record(section.endpoint(), Some(id.clone())))
            }
            Route::Search => View::Search(SearchBrowser::new(Section::Search.endpoint())),
            Route::Config => View::Detail(
                RecordDetail::document(Section::Config.endpoint())
                    .with_heading("Config")
                    .with_preamble(CONFIG_PREAMBLE),
            ),
            Route::ConfigRecord(id) => View::Detail(
                RecordDetail::record(Section::Config.endpoint(), Some(id.clone()))
                    .with_heading("Config"),
            ),
            Route::NotFound(path) => View::NotFound(path.clone()),
        };
        Ok(view)
    }

    /// Initial fetch of a freshly created view
    pub fn mount(&mut self) -> Option<FetchRequest> {
        match self {
            View::Collection(table) => Some(table.mount()),
            View::Detail(detail) => detail.mount(),
            View::Search(_) | View::NotFound(_) => None,
        }
    }

    /// Keep the component when only its parameters change
    pub fn retarget(&mut self, route: &Route) -> Retarget {
        let refetch = |request: Option<FetchRequest>| match request {
            Some(request) => Retarget::Refetch(request),
            None => Retarget::Unchanged,
        };
        match (self, route) {
            (View::Collection(table), Route::Collection(section))
                if table.endpoint() == section.endpoint() =>
            {
                Retarget::Unchanged
            }
            (View::Detail(detail), Route::Record(section, id))
                if detail.target().is_record_of(section.endpoint()) =>
            {
                refetch(detail.set_id(Some(id.clone())))
            }
            (View::Detail(detail), Route::ConfigRecord(id))
                if detail.target().is_record_of(Section::Config.endpoint()) =>
            {
                refetch(detail.set_id(Some(id.clone())))
            }
            (View::Detail(detail), Route::Config)
                if matches!(detail.target(), DetailTarget::Document { .. }) =>
            {
                Retarget::Unchanged
            }
            (View::Search(_), Route::Search) => Retarget::Unchanged,
            _ => Retarget::Replace,
        }
    }

    pub fn on_response(&mut self, response: FetchResponse) -> bool {
        match self {
            View::Collection(table) => table.on_response(response),
            View::Detail(detail) => detail.on_response(response),
            View::Search(search) => search.on_response(response),
            View::NotFound(_) => false,
        }
    }

    pub fn unmount(&mut self) {
        match self {
            View::Collection(table) => table.unmount(),
            View::Detail(detail) => detail.unmount(),
            View::Search(search) => search.unmount(),
            View::NotFound(_) => {}
        }
    }

    pub fn is_loading(&self) -> bool {
        match self {
            View::Collection(table) => table.is_loading(),
            View::Detail(detail) => detail.is_loading(),
            View::Search(search) => search.is_loading(),
            View::NotFound(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::Method;

    fn view(path: &str) -> View {
        View::for_route(&Route::parse(path), &AutosizeOptions::default()).unwrap()
    }

    #[test]
    fn test_every_collection_has_valid_columns() {
        for spec in &COLLECTIONS {
            let columns = spec.columns().unwrap();
            assert_eq!(columns.len(), spec.fields.len());
            assert_eq!(columns.labels(), spec.fields.to_vec());
        }
    }

    #[test]
    fn test_route_outlet() {
        let mut v = view("/changes");
        let request = v.mount().unwrap();
        assert_eq!(request.method, Method::get("/api/changes"));
        match &v {
            View::Collection(table) => assert_eq!(table.header(), Some("Changes")),
            other => panic!("unexpected view {other:?}"),
        }

        let request = view("/observations/42").mount().unwrap();
        assert_eq!(request.method, Method::get("/api/observations/42"));

        let request = view("/config").mount().unwrap();
        assert_eq!(request.method, Method::get("/api/config"));

        let request = view("/config/3").mount().unwrap();
        assert_eq!(request.method, Method::get("/api/config/3"));

        assert!(view("/search").mount().is_none());
        assert!(matches!(view("/nowhere"), View::NotFound(path) if path == "/nowhere"));
    }

    #[test]
    fn test_retarget_detail_refetches_new_id() {
        let mut v = view("/resources/1");
        let _first = v.mount();
        match v.retarget(&Route::parse("/resources/2")) {
            Retarget::Refetch(request) => {
                assert_eq!(request.method, Method::get("/api/resources/2"))
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(matches!(
            v.retarget(&Route::parse("/resources/2")),
            Retarget::Unchanged
        ));
        assert!(matches!(
            v.retarget(&Route::parse("/changes/2")),
            Retarget::Replace
        ));
        assert!(matches!(
            v.retarget(&Route::parse("/resources")),
            Retarget::Replace
        ));
    }

    #[test]
    fn test_retarget_config() {
        let mut v = view("/config/1");
        v.mount();
        assert!(matches!(
            v.retarget(&Route::parse("/config/2")),
            Retarget::Refetch(_)
        ));
        assert!(matches!(
            v.retarget(&Route::parse("/resources/2")),
            Retarget::Replace
        ));

        let mut v = view("/config");
        v.mount();
        assert!(matches!(v.retarget(&Route::Config), Retarget::Unchanged));
        assert!(matches!(
            v.retarget(&Route::parse("/config/2")),
            Retarget::Replace
        ));
    }

    #[test]
    fn test_retarget_collection() {
        let mut v = view("/history");
        v.mount();
        assert!(matches!(
            v.retarget(&Route::parse("/history")),
            Retarget::Unchanged
        ));
        // Different columns and header: a new table
        assert!(matches!(
            v.retarget(&Route::parse("/observations")),
            Retarget::Replace
        ));
        assert!(matches!(
            v.retarget(&Route::parse("/search")),
            Retarget::Replace
        ));
    }
}
