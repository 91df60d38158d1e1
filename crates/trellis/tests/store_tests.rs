//! Integration tests for the trellis runtime
//!
//! Covers the navigation store's subscription lifecycle (attach/detach
//! reference counting, idempotent unsubscribe, dispatch ordering and
//! snapshots) and the server-side per-request router.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use pretty_assertions::assert_eq;
use rstest::rstest;
use trellis::*;

fn app_routing() -> Routing<&'static str> {
    Routing::new()
        .with_get("/", "home")
        .with_get("/users", "users#layout")
        .with_get("/users/:id", "users#show")
        .with_post("/users", "users#create")
}

fn store_at(pathname: &str) -> (NavigationStore<&'static str, MemorySource>, MemorySource) {
    let source = MemorySource::new(pathname);
    let store = NavigationStore::new(&app_routing(), source.clone()).unwrap();
    (store, source)
}

// ============================================================================
// Navigation store
// ============================================================================

#[test]
fn test_initial_match_computed_at_construction() {
    let (store, _source) = store_at("/users/42");
    let current = store.current().unwrap();
    assert_eq!(current.location.pathname, "/users/42");
    assert_eq!(current.matches["/users/:id"].params["id"], "42");
}

#[test]
fn test_initial_location_with_search_is_patched_in() {
    let source = MemorySource::new("/users/42");
    source.set_location("/users/42", Some("?tab=posts"));
    let store = NavigationStore::new(&app_routing(), source.clone()).unwrap();

    let current = store.current().unwrap();
    assert_eq!(current.location.search.as_deref(), Some("?tab=posts"));
}

#[test]
fn test_subscribe_attaches_listener_once() {
    let (store, source) = store_at("/");
    assert!(!source.is_attached());

    let first = store.subscribe(|_| {});
    let second = store.subscribe(|_| {});
    assert!(source.is_attached());
    assert_eq!(source.attach_count(), 1);
    assert_eq!(store.subscribers(), 2);

    // One of two subscribers gone: listener stays.
    first.unsubscribe();
    assert!(source.is_attached());
    assert_eq!(store.subscribers(), 1);

    // Last subscriber gone: listener detaches.
    second.unsubscribe();
    assert!(!source.is_attached());
    assert_eq!(source.detach_count(), 1);
    assert_eq!(store.subscribers(), 0);
}

#[test]
fn test_unsubscribe_is_idempotent() {
    let (store, source) = store_at("/");

    let keep = store.subscribe(|_| {});
    let churn = store.subscribe(|_| {});

    assert!(churn.unsubscribe());
    assert!(!churn.unsubscribe());
    assert!(!churn.unsubscribe());

    // The double unsubscribe did not steal the remaining subscriber's slot.
    assert_eq!(store.subscribers(), 1);
    assert!(source.is_attached());

    keep.unsubscribe();
    assert!(!source.is_attached());
}

#[test]
fn test_rapid_subscribe_unsubscribe_churn() {
    let (store, source) = store_at("/");

    for round in 1..=3 {
        let subscription = store.subscribe(|_| {});
        assert!(source.is_attached());
        assert_eq!(source.attach_count(), round);
        subscription.unsubscribe();
        assert!(!source.is_attached());
        assert_eq!(source.detach_count(), round);
    }
}

#[test]
fn test_on_route_change_notifies_in_registration_order() {
    let (store, _source) = store_at("/");
    let order = Rc::new(RefCell::new(Vec::new()));

    let first_log = Rc::clone(&order);
    let _first = store.subscribe(move |_| first_log.borrow_mut().push("first"));
    let second_log = Rc::clone(&order);
    let _second = store.subscribe(move |_| second_log.borrow_mut().push("second"));

    store.on_route_change();
    assert_eq!(*order.borrow(), vec!["first", "second"]);
}

#[test]
fn test_subscribers_observe_latest_match_only() {
    let (store, source) = store_at("/");
    let seen = Rc::new(RefCell::new(Vec::new()));

    let log = Rc::clone(&seen);
    let _subscription = store.subscribe(move |matched: Option<&MatchTree<&str>>| {
        log.borrow_mut()
            .push(matched.map(|m| m.location.pathname.clone()));
    });

    source.set_location("/users", None);
    store.on_route_change();
    source.set_location("/users/7", None);
    store.on_route_change();

    assert_eq!(
        *seen.borrow(),
        vec![
            Some("/users".to_string()),
            Some("/users/7".to_string())
        ]
    );
    assert_eq!(store.current().unwrap().location.pathname, "/users/7");
}

#[test]
fn test_subscribers_observe_not_found_as_absent() {
    let (store, source) = store_at("/");
    let saw_none = Rc::new(Cell::new(false));

    let flag = Rc::clone(&saw_none);
    let _subscription = store.subscribe(move |matched: Option<&MatchTree<&str>>| {
        flag.set(matched.is_none());
    });

    source.set_location("/nonexistent", None);
    store.on_route_change();

    assert!(saw_none.get());
    assert!(store.current().is_none());
}

#[test]
fn test_listener_unsubscribed_mid_dispatch_is_skipped() {
    let (store, _source) = store_at("/");
    let calls = Rc::new(RefCell::new(Vec::new()));
    let victim: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));

    let saboteur_calls = Rc::clone(&calls);
    let saboteur_victim = Rc::clone(&victim);
    let _saboteur = store.subscribe(move |_| {
        saboteur_calls.borrow_mut().push("saboteur");
        if let Some(subscription) = saboteur_victim.borrow().as_ref() {
            subscription.unsubscribe();
        }
    });

    let victim_calls = Rc::clone(&calls);
    *victim.borrow_mut() = Some(store.subscribe(move |_| {
        victim_calls.borrow_mut().push("victim");
    }));

    store.on_route_change();
    assert_eq!(*calls.borrow(), vec!["saboteur"]);

    // Later dispatches keep skipping it too.
    store.on_route_change();
    assert_eq!(*calls.borrow(), vec!["saboteur", "saboteur"]);
}

#[test]
fn test_one_off_match_leaves_current_untouched() {
    let (store, _source) = store_at("/users/7");
    let before = store.current();

    let matched = store.match_path("/users", Method::Post).unwrap();
    assert_eq!(
        matched.config.unwrap().config.as_ref().unwrap().fragment,
        "users#create"
    );
    assert!(store.match_path("/users", Method::Delete).is_none());

    assert_eq!(store.current(), before);
}

#[test]
fn test_store_rejects_malformed_table() {
    let routing = Routing::new().with_get("users", "broken");
    let err = NavigationStore::new(&routing, MemorySource::default()).unwrap_err();
    assert_eq!(err, RouteError::NotAbsolute("users".to_string()));
}

// ============================================================================
// Server-side per-request router
// ============================================================================

#[rstest]
#[case("/users/42?tab=posts&page=2", "/users/42", Some("?tab=posts&page=2"))]
#[case("/users/42", "/users/42", None)]
#[case("/?q=1", "/", Some("?q=1"))]
fn test_for_request_splits_url_at_query(
    #[case] url: &str,
    #[case] pathname: &str,
    #[case] search: Option<&str>,
) {
    let router = StaticRouter::new(app_routing());
    let request = router.for_request(&Request::new(url)).unwrap();

    let matched = request.current().unwrap();
    assert_eq!(matched.location.pathname, pathname);
    assert_eq!(matched.location.search.as_deref(), search);
}

#[test]
fn test_for_request_binds_params() {
    let router = StaticRouter::new(app_routing());
    let request = router
        .for_request(&Request::new("/users/42?tab=posts"))
        .unwrap();
    let matched = request.current().unwrap();
    assert_eq!(matched.matches["/users/:id"].params["id"], "42");
}

#[test]
fn test_for_request_without_match() {
    let router = StaticRouter::new(app_routing());
    let request = router.for_request(&Request::new("/nonexistent")).unwrap();
    assert!(request.current().is_none());
}

#[test]
fn test_requests_are_isolated() {
    let router = StaticRouter::new(app_routing());

    let first = router.for_request(&Request::new("/users/1")).unwrap();
    let second = router.for_request(&Request::new("/users/2")).unwrap();

    assert_eq!(
        first.current().unwrap().matches["/users/:id"].params["id"],
        "1"
    );
    assert_eq!(
        second.current().unwrap().matches["/users/:id"].params["id"],
        "2"
    );

    // A one-off match on one request router never leaks into another.
    let one_off = first.match_path("/users/9", Method::Get).unwrap();
    assert_eq!(one_off.matches["/users/:id"].params["id"], "9");
    assert_eq!(
        first.current().unwrap().matches["/users/:id"].params["id"],
        "1"
    );
}

#[test]
fn test_per_request_match_honors_methods() {
    let router = StaticRouter::new(app_routing());
    let request = router.for_request(&Request::new("/")).unwrap();

    assert!(request.match_path("/users", Method::Post).is_some());
    assert!(request.match_path("/users", Method::Patch).is_none());
}
