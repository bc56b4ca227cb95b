//! Dispatch Integration Tests
//!
//! End-to-end calls through a dispatcher: lookup, the synthetic index, early
//! return, nested calls and stack cleanup on every exit path.

mod common;

use common::*;
use dao_core::{CallOptions, DaoError, Dispatcher, Status};
use serde_json::{json, Value};
use std::panic::{self, AssertUnwindSafe};

#[test]
fn test_unknown_path_is_a_lookup_error() {
    let mut api = Dispatcher::new(Accounts::default());

    let err = api.call("/accounts/missing", json!({})).unwrap_err();
    assert_eq!(
        err,
        DaoError::NoSuchInterface {
            path: "/accounts/missing".to_string()
        }
    );
    assert!(err.is_usage_error());
    assert_eq!(api.call_depth(), 0);
}

#[test]
fn test_paths_are_normalized_before_lookup() {
    let mut api = Dispatcher::new(Accounts::default());

    let result = api.call("accounts//./", json!({})).unwrap();
    assert_eq!(result.path, "/accounts");
    assert_eq!(result.data.get("accounts"), Some(&json!(["checking", "savings"])));
}

#[test]
fn test_plain_call_builds_only_what_the_handler_set() {
    let mut api = Dispatcher::new(Accounts::default());

    let result = api.call("/accounts", Value::Null).unwrap();
    assert_eq!(result.data.len(), 1);
    assert!(result.status.is_none());
    assert!(result.errors.is_empty());
}

#[test]
fn test_index_lists_every_interface() {
    let mut api = Dispatcher::new(Accounts::default());

    let index = api.call("/index", json!({})).unwrap();
    assert_eq!(index.path, "/index");
    assert_eq!(index.data.get("/accounts"), Some(&json!({"description": "list accounts"})));
    assert_eq!(
        index.data.get("/accounts/show"),
        Some(&json!({"description": "/accounts/show"}))
    );
    assert_eq!(
        index.data.as_map().get("/accounts/nested"),
        Some(&json!({"description": "calls show without an id", "since": "1.0"}))
    );
    assert_eq!(index.data.len(), Dispatcher::<Accounts>::registry().len());
}

#[test]
fn test_index_of_empty_api() {
    let mut api = Dispatcher::new(Empty);

    let index = api.call("index/", json!({})).unwrap();
    assert!(index.data.is_empty());
    assert!(!api.responds_to("/index"));
}

#[test]
fn test_registered_index_takes_precedence() {
    let mut api = Dispatcher::new(CustomIndex);

    let result = api.call("/index", json!({})).unwrap();
    assert_eq!(result.data.into_value(), json!({"custom": true}));
}

#[test]
fn test_last_registration_wins() {
    let mut api = Dispatcher::new(Duplicates);

    let result = api.call("/dup", json!({})).unwrap();
    assert_eq!(result.data.get("version"), Some(&json!(2)));

    let index = api.index();
    assert_eq!(index.data.len(), 1);
    assert_eq!(index.data.get("/dup"), Some(&json!({"description": "second registration"})));
}

#[test]
fn test_halt_discards_later_writes() {
    let mut api = Dispatcher::new(Accounts::default());

    let result = api.call("/accounts/halt", json!({})).unwrap();
    assert_eq!(result.data.into_value(), json!({"before": 1}));
    assert_eq!(api.call_depth(), 0);
    assert_eq!(api.scope_depth(), 0);
}

#[test]
fn test_nested_halt_only_ends_the_inner_call() {
    let mut api = Dispatcher::new(Accounts::default());

    let result = api.call("/accounts/outer", json!({})).unwrap();
    assert_eq!(result.data.get("inner_result"), Some(&json!({"inner": "started"})));
    assert_eq!(result.data.get("depth_after_inner"), Some(&json!(1)));
    assert_eq!(result.status, Some(Status::new(202)));
    assert!(!result.data.has("unreachable"));
    assert_eq!(api.call_depth(), 0);
}

#[test]
fn test_nested_results_are_independent() {
    let mut api = Dispatcher::new(Accounts::default());

    let result = api.call("/accounts/nested", json!({})).unwrap();
    assert_eq!(result.data.get("inner_status"), Some(&json!(412)));
    assert_eq!(
        result.data.get("inner_errors"),
        Some(&json!(["id (parameter missing)"]))
    );
    assert_eq!(result.data.get("outer_ran"), Some(&json!(true)));
    assert!(result.status.is_none());
    assert!(result.errors.is_empty());
}

#[test]
fn test_handler_failure_propagates_and_unwinds() {
    let mut api = Dispatcher::new(Accounts::default());

    let err = api.call("/accounts/fail", json!({})).unwrap_err();
    assert_eq!(err, DaoError::Handler("ledger unavailable".to_string()));
    assert_eq!(api.call_depth(), 0);
    assert_eq!(api.scope_depth(), 0);
    assert!(api.context().is_err());
}

#[test]
fn test_panicking_handler_still_pops_frames() {
    let mut api = Dispatcher::new(Accounts::default());

    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        let _ = api.call("/accounts/panic", json!({}));
    }));
    assert!(outcome.is_err());
    assert_eq!(api.call_depth(), 0);
    assert_eq!(api.scope_depth(), 0);

    // the dispatcher stays usable
    assert!(api.call("/accounts", json!({})).is_ok());
}

#[test]
fn test_validation_failure_surfaces_as_invalid() {
    let mut api = Dispatcher::new(Accounts::default());

    let err = api.call("/accounts/create", json!({})).unwrap_err();
    assert_eq!(
        err,
        DaoError::Invalid {
            path: "/accounts/create".to_string(),
            errors: vec!["name is required".to_string()],
        }
    );

    let created = api.call("/accounts/create", json!({"name": "ada"})).unwrap();
    assert_eq!(created.status.map(|s| s.code), Some(201));
    assert_eq!(created.data.get("name"), Some(&json!("ada")));
}

#[test]
fn test_parser_failure_skips_the_handler() {
    let mut api = Dispatcher::new(Accounts::default()).with_parser(RejectingParser);

    let err = api.call("/accounts/audit", json!({})).unwrap_err();
    assert_eq!(
        err,
        DaoError::Parse {
            path: "/accounts/audit".to_string(),
            reason: "rejected".to_string(),
        }
    );
    assert!(api.api().audits.is_empty());
    assert_eq!(api.call_depth(), 0);
}

#[test]
fn test_default_parser_rejects_non_objects() {
    let mut api = Dispatcher::new(Accounts::default());

    let err = api.call("/accounts", json!([1, 2, 3])).unwrap_err();
    assert!(matches!(err, DaoError::Parse { .. }));
}

#[test]
fn test_dotted_index_cannot_grow_arrays_past_limits() {
    let mut api = Dispatcher::new(Accounts::default());

    for params in [
        json!({"a": [0], "a.4999": 1}),
        json!({"a": [0], "a.18446744073709551615": 1}),
    ] {
        let err = api.call("/accounts/lookup", params).unwrap_err();
        assert!(matches!(err, DaoError::Parse { .. }), "{err:?}");
        assert_eq!(api.call_depth(), 0);
    }

    let grown = api.call("/accounts/lookup", json!({"a": [0], "a.2": 1})).unwrap();
    assert_eq!(grown.data.get("value"), Some(&json!([0, null, 1])));
}

#[test]
fn test_dotted_and_plain_keys_merge_in_either_order() {
    let mut api = Dispatcher::new(Accounts::default());

    let dotted_first = api
        .call("/accounts/lookup", json!({"a.name": "ada", "a": {"age": 3}}))
        .unwrap();
    let plain_first = api
        .call("/accounts/lookup", json!({"a": {"age": 3}, "a.name": "ada"}))
        .unwrap();

    assert_eq!(dotted_first.data.get("value"), Some(&json!({"age": 3, "name": "ada"})));
    assert_eq!(dotted_first.data, plain_first.data);
}

#[test]
fn test_call_options_reach_the_parser() {
    let mut api = Dispatcher::new(Accounts::default()).with_parser(OptionsParser);
    let mut options = CallOptions::new();
    options.insert("format".to_string(), json!("compact"));

    let result = api.call_with("/accounts/lookup", json!({}), options).unwrap();
    assert_eq!(result.data.get("found"), Some(&json!(true)));
    assert_eq!(result.data.get("value"), Some(&json!({"format": "compact"})));
}

#[test]
fn test_raw_keys_option_disables_expansion() {
    let mut api = Dispatcher::new(Accounts::default());

    let expanded = api.call("/accounts/lookup", json!({"a.b": 1})).unwrap();
    assert_eq!(expanded.data.get("found"), Some(&json!(true)));
    assert_eq!(expanded.data.get("value"), Some(&json!({"b": 1})));

    let mut options = CallOptions::new();
    options.insert("raw_keys".to_string(), json!(true));
    let raw = api
        .call_with("/accounts/lookup", json!({"a.b": 1}), options)
        .unwrap();
    assert_eq!(raw.data.get("found"), Some(&json!(false)));
}

#[test]
fn test_api_state_survives_across_calls() {
    let mut api = Dispatcher::new(Accounts::default());

    api.call("/accounts/audit", json!({})).unwrap();
    api.call("accounts/audit/", json!({})).unwrap();

    assert_eq!(api.api().audits, vec!["/accounts/audit", "/accounts/audit"]);
    let accounts = api.into_inner();
    assert_eq!(accounts.audits.len(), 2);
}

#[test]
fn test_accessors_outside_a_call() {
    let mut api = Dispatcher::new(Accounts::default());

    assert_eq!(api.params().unwrap_err(), DaoError::NoContext);
    assert_eq!(api.set("x", json!(1)).unwrap_err(), DaoError::NoContext);
    assert_eq!(api.status(200).unwrap_err(), DaoError::NoContext);
    assert!(api.parameter("id").is_err());
    assert!(!api.is_catching_results());
}

#[test]
fn test_responds_to_paths_and_handler_ids() {
    let api = Dispatcher::new(Accounts::default());

    assert!(api.responds_to("/accounts/show"));
    assert!(api.responds_to("accounts/show/"));
    assert!(api.responds_to("/accounts/show/interface"));
    assert!(!api.responds_to("/accounts/missing"));
}

#[test]
fn test_dispatchers_share_one_registry() {
    let first = Dispatcher::new(Accounts::default());
    let second = Dispatcher::new(Accounts::default());

    assert!(std::ptr::eq(first.interfaces(), second.interfaces()));
}
