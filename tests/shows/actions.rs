//! The show lifecycle driven through named actions.

use calchart_store::actions::{ActionError, ActionRequest, ActionService, Session};
use calchart_store::{InMemoryShowBackend, MembershipDirectory, StoreError};
use serde_json::{json, Value};

use crate::support::{show_data, store};

type Service = ActionService<InMemoryShowBackend, MembershipDirectory>;

fn service() -> Service {
    ActionService::new(store())
}

fn call(service: &Service, action: &str, user: &str, data: Value) -> Result<Value, ActionError> {
    service.dispatch(action, data, Session::for_user(user))
}

#[test]
fn band_show_lifecycle() {
    let service = service();

    let created = call(&service, "create_show", "stunt", json!({ "name": "Spring Show", "isBand": true })).unwrap();
    assert_eq!(created, json!({ "slug": "spring-show", "isBand": true }));

    let view = call(&service, "get_show", "stunt", json!({ "slug": "spring-show" })).unwrap();
    assert_eq!(
        view,
        json!({ "isInitialized": false, "name": "Spring Show", "slug": "spring-show", "isBand": true })
    );

    let data = Value::Object(show_data("spring-show", "Spring Show", true, false, 7));
    let saved = call(&service, "save_show", "stunt", data).unwrap();
    assert_eq!(saved, json!({ "slug": "spring-show" }));

    let err = call(&service, "get_show", "member", json!({ "slug": "spring-show" })).unwrap_err();
    assert_eq!(err.status_code(), 403);

    let published = call(&service, "publish_show", "stunt", json!({ "slug": "spring-show", "publish": true })).unwrap();
    assert_eq!(published, json!({ "slug": "spring-show", "published": true }));

    let view = call(&service, "get_show", "member", json!({ "slug": "spring-show" })).unwrap();
    assert_eq!(view["isInitialized"], json!(true));
    assert_eq!(view["show"]["published"], json!(true));
    assert_eq!(view["show"]["version"], json!(7));

    let tab = call(&service, "get_tab", "member", json!({ "tab": "band" })).unwrap();
    assert_eq!(
        tab,
        json!({ "shows": [{ "slug": "spring-show", "name": "Spring Show", "published": true }] })
    );

    let deleted = call(&service, "delete_show", "stunt", json!({ "slug": "spring-show" })).unwrap();
    assert_eq!(deleted, json!({ "slug": "spring-show", "deleted": true }));
    let err = call(&service, "get_show", "stunt", json!({ "slug": "spring-show" })).unwrap_err();
    assert_eq!(err.status_code(), 404);
}

#[test]
fn owned_tab_and_personal_save() {
    let service = service();
    call(&service, "create_show", "u1", json!({ "name": "Mine", "isBand": false })).unwrap();

    let data = Value::Object(show_data("mine", "Renamed", false, false, 7));
    let saved = call(&service, "save_show", "u1", data).unwrap();
    assert_eq!(saved, json!({ "slug": "mine" }));

    let tab = call(&service, "get_tab", "u1", json!({ "tab": "owned" })).unwrap();
    assert_eq!(tab["shows"][0]["name"], json!("Renamed"));

    let tab = call(&service, "get_tab", "u2", json!({ "tab": "owned" })).unwrap();
    assert_eq!(tab, json!({ "shows": [] }));
}

#[test]
fn explicit_year_filters_band_tab() {
    let service = service();
    call(&service, "create_show", "stunt", json!({ "name": "Band", "isBand": true })).unwrap();

    let tab = call(&service, "get_tab", "stunt", json!({ "tab": "band", "year": 1999 })).unwrap();
    assert_eq!(tab, json!({ "shows": [] }));
}

#[test]
fn duplicate_create_is_conflict() {
    let service = service();
    call(&service, "create_show", "u1", json!({ "name": "Foo", "isBand": false })).unwrap();

    let err = call(&service, "create_show", "u2", json!({ "name": "Foo", "isBand": false })).unwrap_err();
    assert!(matches!(err, ActionError::Store(StoreError::DuplicateName { .. })));
    assert_eq!(err.status_code(), 409);
}

#[test]
fn publish_before_save_is_conflict() {
    let service = service();
    call(&service, "create_show", "stunt", json!({ "name": "Band", "isBand": true })).unwrap();

    let err = call(&service, "publish_show", "stunt", json!({ "slug": "band", "publish": true })).unwrap_err();
    assert!(matches!(err, ActionError::Store(StoreError::NotInitialized { .. })));
    assert_eq!(err.status_code(), 409);
}

#[test]
fn invalid_tab_is_unprocessable() {
    let service = service();
    let err = call(&service, "get_tab", "u1", json!({ "tab": "everything" })).unwrap_err();
    assert_eq!(err.status_code(), 422);
    assert_eq!(err.to_string(), "Invalid tab: everything");
}

#[test]
fn save_without_name_is_rejected() {
    let service = service();
    call(&service, "create_show", "u1", json!({ "name": "Foo", "isBand": false })).unwrap();

    let err = call(&service, "save_show", "u1", json!({ "slug": "foo" })).unwrap_err();
    assert!(matches!(err, ActionError::GuardRejected(_)));
    assert_eq!(err.status_code(), 400);
}

#[test]
fn requests_carry_the_user_in_session_variables() {
    let service = service();
    let request: ActionRequest = serde_json::from_value(json!({
        "action": "create_show",
        "data": { "name": "Foo", "isBand": false },
        "session_variables": { "x-calchart-user-id": "u1" },
    }))
    .unwrap();
    let response = service.dispatch_request(&request);
    assert_eq!(response.status, 200);

    let anonymous: ActionRequest = serde_json::from_value(json!({
        "action": "get_tab",
        "data": { "tab": "owned" },
    }))
    .unwrap();
    let response = service.dispatch_request(&anonymous);
    assert_eq!(response.status, 401);
    assert_eq!(response.body, json!({ "message": "authentication required" }));
}
