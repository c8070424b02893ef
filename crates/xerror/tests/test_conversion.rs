//! Integration tests for conversion, classification and formatting
//!
//! These tests check how foreign and unstructured errors are reported,
//! and that quick error construction formats messages as documented.

use std::fmt;
use std::sync::Arc;

use pretty_assertions::assert_eq;
use serde_json::json;
use xerror::prelude::*;

error_kind!(static QUEUE: "QueueError";);

#[derive(Debug, thiserror::Error)]
enum FetchError {
    #[error("connection reset")]
    Reset,
    #[error("fetch failed")]
    Failed(#[source] std::io::Error),
}

/// A user error type overriding `ErrorLike` accessors.
#[derive(Debug)]
struct RateLimited {
    retry_after: u64,
}

impl fmt::Display for RateLimited {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rate limited for {}s", self.retry_after)
    }
}

impl std::error::Error for RateLimited {}

impl ErrorLike for RateLimited {
    fn name(&self) -> std::borrow::Cow<'_, str> {
        "RateLimited".into()
    }

    fn code(&self) -> Option<&str> {
        Some("E_RATE")
    }
}

#[test]
fn test_extract_data_absent() {
    assert!(extract_data::<XError>(None).is_none());
    assert!(extract_data::<dyn ErrorLike>(None).is_none());
}

#[test]
fn test_extract_data_from_extra_properties() {
    let error = PlainError::named("foo", "")
        .with_property("foo", "bar")
        .with_property("message", "ignored")
        .with_property("count", 2);

    let data = extract_data(Some(&error)).unwrap().into_owned();
    assert_eq!(data, error_data(json!({"foo": "bar", "count": 2})));
}

#[test]
fn test_plain_error_dto() {
    let dto = to_dto(Some(&PlainError::new("")));

    assert_eq!(dto.name, "Error");
    assert_eq!(dto.message, "");
    assert!(!dto.stack.is_empty());
    assert_eq!(dto.data, None);
    assert_eq!(dto.cause, None);
    assert!(dto.transient);
}

#[test]
fn test_nested_causes_follow_the_same_rules() {
    let root = PlainError::named("DnsError", "lookup failed").with_property("host", "example.org");
    let middle = XError::builder(&QUEUE).message("publish failed").cause(root).build();
    let top = PlainError::new("request failed").with_cause(middle);

    let dto = to_dto(Some(&top));
    let names: Vec<&str> = dto.chain().map(|level| level.name.as_str()).collect();
    assert_eq!(names, vec!["Error", "QueueError", "DnsError"]);

    let root = dto.root_cause();
    assert_eq!(root.data, Some(error_data(json!({"host": "example.org"}))));
    assert_eq!(root.id, "");
    assert!(!dto.cause.as_ref().unwrap().id.is_empty());
}

#[test]
fn test_custom_error_like() {
    let error = RateLimited { retry_after: 30 };
    let dto = to_dto(Some(&error));

    assert_eq!(dto.name, "RateLimited");
    assert_eq!(dto.message, "rate limited for 30s");
    assert_eq!(dto.code.as_deref(), Some("E_RATE"));
    assert!(is_transient(Some(&error)));
    assert!(is_of_type(Some(&error), &ERROR));
    assert!(!is_of_type(Some(&error), &XERROR));
}

#[test]
fn test_classification_of_absent_error() {
    assert!(!is_of_type::<XError>(None, &ERROR));
    assert!(!is_transient::<XError>(None));
}

#[test]
fn test_transient_flags() {
    let declared = XError::builder(&QUEUE).transient(false).build();
    let plain = PlainError::new("x");
    let plain_declared = PlainError::new("x").with_property("transient", false);

    assert!(!is_transient(Some(&declared)));
    assert!(is_transient(Some(&plain)));
    assert!(!is_transient(Some(&plain_declared)));
}

#[test]
fn test_std_error_snapshot() {
    let io = std::io::Error::new(std::io::ErrorKind::TimedOut, "read timed out");
    let error = PlainError::from_std(&FetchError::Failed(io));

    assert_eq!(error.name(), "FetchError");
    assert_eq!(error.message(), "fetch failed");

    let dto = to_dto(Some(&error));
    assert_eq!(dto.depth(), 2);
    assert_eq!(dto.root_cause().message, "read timed out");

    let reset = PlainError::from_std(&FetchError::Reset);
    assert!(reset.to_dto().cause.is_none());
}

#[test]
fn test_anyhow_context_becomes_causes() {
    let error = anyhow::Error::new(FetchError::Reset).context("syncing inbox");
    let plain = PlainError::from(error);

    let messages: Vec<String> = plain
        .to_dto()
        .chain()
        .map(|level| level.message.clone())
        .collect();
    assert_eq!(messages, vec!["syncing inbox", "connection reset"]);
}

#[test]
fn test_shared_cause_is_reported_by_each_owner() {
    let cause: Arc<dyn ErrorLike> = Arc::new(PlainError::named("Upstream", "502"));
    let first = XError::builder(&QUEUE).shared_cause(Arc::clone(&cause)).build();
    let second = XError::builder(&QUEUE).shared_cause(cause).build();

    assert_eq!(to_dto(Some(&first)).root_cause().name, "Upstream");
    assert_eq!(to_dto(Some(&second)).root_cause().name, "Upstream");
}

#[test]
fn test_config_limits_and_stack() {
    let error = PlainError::new("a").with_cause(PlainError::new("b").with_cause(PlainError::new("c")));
    let config = DtoConfig::new().with_include_stack(false).with_max_cause_depth(1);

    let dto = to_dto_with(Some(&error), &config);
    assert_eq!(dto.depth(), 2);
    assert!(dto.chain().all(|level| level.stack.is_empty()));
}

#[test]
fn test_errorf_messages() {
    let data = error_data(json!({"a": "b"}));

    assert_eq!(errorf("foo", data.clone()).message(), "foo: a=b");
    assert_eq!(errorf("foo", "bad").message(), "foo: bad");
    assert_eq!(errorf("foo", ("bad", data)).message(), "foo: bad. a=b");
}

#[test]
fn test_errorf_data_is_reported() {
    let error = errorf("LimitError", ("too many", error_data(json!({"limit": 10}))));

    assert_eq!(error.name(), "LimitError");
    assert_eq!(
        to_dto(Some(&error)).data,
        Some(error_data(json!({"limit": 10})))
    );
}

#[test]
fn test_message_format() {
    let data = error_data(json!({"x": 1}));
    assert_eq!(message_format(&["a", "b"], Some(&data)), "a b. x=1");
    assert_eq!(message_format("a", None), "a");
}

#[test]
fn test_walk_cause_chain_through_trait_objects() {
    let error = XError::builder(&QUEUE)
        .message("publish failed")
        .cause(PlainError::new("broker down").with_cause(RateLimited { retry_after: 5 }))
        .build();

    let names: Vec<String> = std::iter::successors(Some(&error as &dyn ErrorLike), |level| {
        level.error_cause()
    })
    .map(|level| level.name().into_owned())
    .collect();

    assert_eq!(names, vec!["QueueError", "Error", "RateLimited"]);
}
