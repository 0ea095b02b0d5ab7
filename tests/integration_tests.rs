//! End-to-end navigation tests over an in-memory transport.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use serde_json::{json, Value};

use halnav::{
    AddressElem, HalError, HalNavigator, HalResponse, HalTransport, NavigatorConfig, Result,
};

/// Canned-response transport with a request log.
struct StubTransport {
    responses: RefCell<HashMap<String, (u16, &'static str, String)>>,
    requests: RefCell<Vec<String>>,
}

impl StubTransport {
    fn new() -> Rc<Self> {
        Rc::new(StubTransport {
            responses: RefCell::new(HashMap::new()),
            requests: RefCell::new(Vec::new()),
        })
    }

    fn register(&self, uri: &str, body: &Value) {
        self.register_status(uri, 200, "OK", body);
    }

    fn register_status(&self, uri: &str, status: u16, reason: &'static str, body: &Value) {
        self.responses
            .borrow_mut()
            .insert(uri.to_owned(), (status, reason, body.to_string()));
    }

    fn requests_for(&self, uri: &str) -> usize {
        self.requests.borrow().iter().filter(|r| *r == uri).count()
    }

    fn request_count(&self) -> usize {
        self.requests.borrow().len()
    }
}

impl HalTransport for StubTransport {
    fn get(&self, uri: &str) -> Result<HalResponse> {
        self.requests.borrow_mut().push(uri.to_owned());
        match self.responses.borrow().get(uri) {
            Some((status, reason, body)) => Ok(HalResponse::new(*status, *reason, body.clone())),
            None => Ok(HalResponse::new(404, "Not Found", "{}")),
        }
    }
}

/// Transport that must never be reached.
struct PanicTransport;

impl HalTransport for PanicTransport {
    fn get(&self, uri: &str) -> Result<HalResponse> {
        panic!("transport was invoked for {uri}");
    }
}

const ROOT: &str = "http://fakeuri.example/api/";

fn navigator(transport: Rc<StubTransport>) -> HalNavigator {
    HalNavigator::with_transport(ROOT, transport).unwrap()
}

fn navigator_with_curie(transport: Rc<StubTransport>, curie: &str) -> HalNavigator {
    HalNavigator::with_config(
        ROOT,
        NavigatorConfig {
            default_curie: Some(curie.to_owned()),
            transport: Some(transport),
            ..Default::default()
        },
    )
    .unwrap()
}

// ---- root address normalization ----

#[test]
fn root_scheme_is_defaulted() {
    let nav = HalNavigator::with_transport("example.com", StubTransport::new()).unwrap();
    assert_eq!(nav.uri(), Some("http://example.com"));
}

#[test]
fn explicit_http_root_is_unchanged() {
    let nav = HalNavigator::with_transport("http://example.com", StubTransport::new()).unwrap();
    assert_eq!(nav.uri(), Some("http://example.com"));
}

#[test]
fn ftp_root_is_rejected() {
    assert!(matches!(
        HalNavigator::with_transport("ftp://example.com", StubTransport::new()),
        Err(HalError::UnsupportedScheme(s)) if s == "ftp"
    ));
}

#[test]
fn doubled_scheme_is_rejected() {
    assert!(matches!(
        HalNavigator::with_transport("http://x://y", StubTransport::new()),
        Err(HalError::DuplicateScheme(_))
    ));
}

// ---- autofetch and status ----

#[test]
fn status_is_empty_until_fetch_and_never_fetches() {
    let transport = StubTransport::new();
    transport.register(ROOT, &json!({"a": 1}));
    let nav = navigator(transport.clone());

    assert!(nav.status().is_none());
    assert_eq!(transport.request_count(), 0);

    nav.state().unwrap();
    assert_eq!(nav.status(), Some((200, "OK".to_owned())));
}

#[test]
fn non_success_status_is_data_not_error() {
    let transport = StubTransport::new();
    transport.register_status(ROOT, 404, "Not Found", &json!({"error": "gone"}));
    let nav = navigator(transport);

    let state = nav.state().unwrap();
    assert_eq!(state["error"], json!("gone"));
    assert_eq!(nav.status(), Some((404, "Not Found".to_owned())));
}

#[test]
fn repeated_reads_fetch_once() {
    let transport = StubTransport::new();
    transport.register(ROOT, &json!({"n": 1}));
    let nav = navigator(transport.clone());

    nav.links().unwrap();
    nav.links().unwrap();
    nav.state().unwrap();
    assert_eq!(transport.request_count(), 1);
}

// ---- chained dereference ----

fn chain_fixture(transport: &StubTransport) {
    transport.register(
        ROOT,
        &json!({"_links": {"a": {"href": "/a"}}, "level": 0}),
    );
    transport.register(
        "http://fakeuri.example/a",
        &json!({"_links": {"b": {"href": "/b"}}, "level": 1}),
    );
    transport.register(
        "http://fakeuri.example/b",
        &json!({"level": 2}),
    );
}

#[test]
fn chained_select_equals_sequential_hops() {
    let transport = StubTransport::new();
    chain_fixture(&transport);
    let nav = navigator(transport.clone());

    let chained = nav.select(&["a".into(), "b".into()]).unwrap();
    let sequential = nav.follow("a").unwrap().follow("b").unwrap();

    assert!(HalNavigator::ptr_eq(&chained, &sequential));
    assert_eq!(chained, sequential);
    // One fetch per intermediate hop; the final resource is never fetched.
    assert_eq!(transport.requests_for(ROOT), 1);
    assert_eq!(transport.requests_for("http://fakeuri.example/a"), 1);
    assert_eq!(transport.requests_for("http://fakeuri.example/b"), 0);
}

#[test]
fn chain_reports_missing_relation() {
    let transport = StubTransport::new();
    chain_fixture(&transport);
    let nav = navigator(transport);

    let err = nav.select(&["a".into(), "missing".into()]).unwrap_err();
    match err {
        HalError::RelationNotFound { rel, uri } => {
            assert_eq!(rel, "missing");
            assert_eq!(uri, "http://fakeuri.example/a");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn malformed_address_fails_before_any_request() {
    let nav = HalNavigator::with_transport(ROOT, Rc::new(PanicTransport)).unwrap();
    let err = nav
        .select(&[
            AddressElem::rel("a"),
            AddressElem::bind("id", 1),
            AddressElem::KeepTemplated,
        ])
        .unwrap_err();
    assert!(matches!(err, HalError::MalformedAddress(_)));
}

// ---- template expansion ----

fn template_fixture(transport: &StubTransport) {
    transport.register(
        ROOT,
        &json!({"_links": {
            "orders": {"href": "/orders{?id}", "templated": true, "title": "Orders"},
        }}),
    );
}

#[test]
fn expansion_goes_through_identity_map() {
    let transport = StubTransport::new();
    template_fixture(&transport);
    let nav = navigator(transport);
    let orders = nav.follow("orders").unwrap();

    let first = orders.expand([("id", 1)]).unwrap();
    let again = orders.expand([("id", 1)]).unwrap();
    assert!(HalNavigator::ptr_eq(&first, &again));
    assert_eq!(first.uri(), Some("http://fakeuri.example/orders?id=1"));
}

#[test]
fn expansion_zero_is_preserved() {
    let transport = StubTransport::new();
    template_fixture(&transport);
    let nav = navigator(transport);

    let order = nav
        .select(&[AddressElem::rel("orders"), AddressElem::bind("id", 0)])
        .unwrap();
    assert_eq!(order.uri(), Some("http://fakeuri.example/orders?id=0"));
}

#[test]
fn dropped_expansion_is_rebuilt_fresh() {
    let transport = StubTransport::new();
    template_fixture(&transport);
    transport.register("http://fakeuri.example/orders?id=1", &json!({"id": 1}));
    let nav = navigator(transport);
    let orders = nav.follow("orders").unwrap();

    let held = orders.expand([("id", 1)]).unwrap();
    held.state().unwrap();
    // While a strong handle exists, re-expansion returns the same fetched
    // instance.
    assert!(orders.expand([("id", 1)]).unwrap().is_fetched());

    drop(held);
    // With every handle gone the entry is reclaimed; the next expansion
    // builds an unfetched navigator.
    assert!(!orders.expand([("id", 1)]).unwrap().is_fetched());
}

#[test]
fn keep_templated_chain_expands_in_rounds() {
    let transport = StubTransport::new();
    transport.register(
        ROOT,
        &json!({"_links": {
            "search": {"href": "/search{?q,page}", "templated": true},
        }}),
    );
    let nav = navigator(transport);

    let partial = nav
        .select(&[AddressElem::rel("search"), AddressElem::KeepTemplated])
        .unwrap();
    assert!(partial.is_templated());

    let narrowed = partial.expand_partial([("q", "widgets")]).unwrap();
    let done = narrowed.expand([("page", 2)]).unwrap();
    assert_eq!(
        done.uri(),
        Some("http://fakeuri.example/search?q=widgets&page=2")
    );
}

#[test]
fn expanding_concrete_navigator_fails() {
    let transport = StubTransport::new();
    transport.register(ROOT, &json!({}));
    let nav = navigator(transport);
    assert!(matches!(
        nav.expand([("id", 1)]),
        Err(HalError::NotExpandable(_))
    ));
}

#[test]
fn fetching_templated_navigator_fails() {
    let transport = StubTransport::new();
    template_fixture(&transport);
    let nav = navigator(transport);
    let orders = nav.follow("orders").unwrap();
    assert!(matches!(
        orders.state(),
        Err(HalError::AmbiguousNavigation(_))
    ));
}

// ---- pagination ----

#[test]
fn pages_stop_after_last_next_link() {
    let transport = StubTransport::new();
    transport.register(
        "http://fakeuri.example/page/1",
        &json!({"_links": {"next": {"href": "/page/2"}}, "number": 1}),
    );
    transport.register("http://fakeuri.example/page/2", &json!({"number": 2}));
    let first =
        HalNavigator::with_transport("http://fakeuri.example/page/1", transport).unwrap();

    let pages: Vec<HalNavigator> = first.pages().collect::<Result<_>>().unwrap();
    assert_eq!(pages.len(), 2);
    assert_eq!(pages[0].uri(), Some("http://fakeuri.example/page/1"));
    assert_eq!(pages[1].uri(), Some("http://fakeuri.example/page/2"));
    assert!(pages[1].is_fetched());
}

#[test]
fn pages_restart_from_the_origin() {
    let transport = StubTransport::new();
    transport.register(
        "http://fakeuri.example/page/1",
        &json!({"_links": {"next": {"href": "/page/2"}}}),
    );
    transport.register("http://fakeuri.example/page/2", &json!({}));
    let first =
        HalNavigator::with_transport("http://fakeuri.example/page/1", transport).unwrap();

    assert_eq!(first.pages().count(), 2);
    assert_eq!(first.pages().count(), 2);
}

#[test]
fn next_page_past_the_end_is_end_of_sequence() {
    let transport = StubTransport::new();
    transport.register(ROOT, &json!({}));
    let nav = navigator(transport);
    assert!(matches!(nav.next_page(), Err(HalError::EndOfSequence)));
}

// ---- curie-aware lookup ----

#[test]
fn default_curie_rewrites_bare_keys() {
    let transport = StubTransport::new();
    transport.register(
        ROOT,
        &json!({"_links": {"ex:widget": {"href": "/widgets/1"}}}),
    );
    let nav = navigator_with_curie(transport, "ex");

    let bare = nav.follow("widget").unwrap();
    let qualified = nav.follow("ex:widget").unwrap();
    assert!(HalNavigator::ptr_eq(&bare, &qualified));
    assert_eq!(bare.uri(), Some("http://fakeuri.example/widgets/1"));
}

#[test]
fn standard_relations_are_never_rewritten() {
    let transport = StubTransport::new();
    transport.register(
        ROOT,
        &json!({"_links": {
            "next": {"href": "/page/2"},
            "ex:next": {"href": "/custom-next"},
        }}),
    );
    let nav = navigator_with_curie(transport, "ex");

    assert_eq!(
        nav.follow("next").unwrap().uri(),
        Some("http://fakeuri.example/page/2")
    );
}

#[test]
fn curie_miss_reports_the_rewritten_key() {
    let transport = StubTransport::new();
    transport.register(ROOT, &json!({}));
    let nav = navigator_with_curie(transport, "ex");

    match nav.follow("widget").unwrap_err() {
        HalError::RelationNotFound { rel, .. } => assert_eq!(rel, "ex:widget"),
        other => panic!("unexpected error: {other}"),
    }
}

// ---- plural links and collections ----

fn plural_fixture(transport: &StubTransport) {
    transport.register(
        ROOT,
        &json!({"_links": {
            "item": [
                {"href": "/items/1", "name": "first", "flavor": "sweet"},
                {"href": "/items/2", "name": "second", "flavor": "sweet"},
                {"href": "/items/3", "name": "third", "flavor": "sour"},
            ],
        }}),
    );
}

#[test]
fn plural_relation_keeps_document_order() {
    let transport = StubTransport::new();
    plural_fixture(&transport);
    let nav = navigator(transport);

    let links = nav.links().unwrap();
    let items = links.get_all("item").unwrap();
    assert_eq!(items.len(), 3);
    assert_eq!(items[0].uri(), Some("http://fakeuri.example/items/1"));
    assert_eq!(items[2].uri(), Some("http://fakeuri.example/items/3"));
    // A bare hop takes the first entry.
    let first = nav.follow("item").unwrap();
    assert!(HalNavigator::ptr_eq(&first, &items[0]));
}

#[test]
fn collection_lookup_by_metadata() {
    let transport = StubTransport::new();
    plural_fixture(&transport);
    let nav = navigator(transport);

    let links = nav.links().unwrap();
    let items = links.get_all("item").unwrap();

    let second = items.named("second").unwrap();
    assert_eq!(second.uri(), Some("http://fakeuri.example/items/2"));

    let sweet = items.get_all_by("flavor", "sweet");
    assert_eq!(sweet.len(), 2);
    assert!(HalNavigator::ptr_eq(&sweet[0], &items[0]));

    assert!(items.get_by("flavor", "bitter").is_none());
    let err = items.try_get_by("flavor", "bitter").unwrap_err();
    assert!(matches!(err, HalError::RelationNotFound { .. }));
}

// ---- snapshot semantics ----

#[test]
fn refetch_replaces_state_and_links_together() {
    let transport = StubTransport::new();
    transport.register(
        ROOT,
        &json!({"_links": {"a": {"href": "/a"}}, "version": 1}),
    );
    let nav = navigator(transport.clone());
    nav.fetch().unwrap();
    assert!(nav.links().unwrap().contains("a"));
    assert_eq!(nav.state().unwrap()["version"], json!(1));

    transport.register(
        ROOT,
        &json!({"_links": {"b": {"href": "/b"}}, "version": 2}),
    );
    nav.fetch().unwrap();
    let links = nav.links().unwrap();
    assert!(links.contains("b"));
    assert!(!links.contains("a"));
    assert_eq!(nav.state().unwrap()["version"], json!(2));
}

#[test]
fn equal_addresses_and_names_are_equal_across_trees() {
    let a = HalNavigator::with_transport(ROOT, StubTransport::new()).unwrap();
    let b = HalNavigator::with_transport(ROOT, StubTransport::new()).unwrap();
    assert_eq!(a, b);
    assert!(!HalNavigator::ptr_eq(&a, &b));
}
