#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Behavior of the plain constructors, without any decoration.

use boom::{AuthAttributes, AuthScheme, Boom, INTERNAL_MESSAGE, StatusInput, WrapTarget};
use serde_json::{Value, json};

#[derive(Debug, thiserror::Error)]
#[error("ka-boom")]
struct KaBoom {
    xyz: u32,
}

#[derive(Debug, thiserror::Error)]
#[error("")]
struct Silent;

fn attributes(value: Value) -> AuthAttributes {
    match value {
        Value::Object(map) => AuthAttributes::Map(map),
        other => panic!("expected object, got {other}"),
    }
}

#[test]
fn bad_request_sets_fields() {
    let err = Boom::bad_request(Some("Missing data"), Some(json!({ "type": "user" })));
    assert_eq!(err.status_code(), 400);
    assert!(!err.is_server());
    assert!(err.is_boom());
    assert_eq!(err.data().unwrap()["type"], "user");
    assert_eq!(err.output().payload()["message"], "Missing data");
    assert_eq!(err.output().payload()["error"], "Bad Request");
}

#[test]
fn message_falls_back_to_reason_phrase() {
    let err = Boom::bad_request(None, None);
    assert_eq!(err.message(), "Bad Request");
    assert!(err.output().payload().get("message").is_none());
    assert!(err.data().is_none());

    assert_eq!(Boom::payment_required(None, None).message(), "Payment Required");
}

#[test]
fn every_status_constructor_has_its_code() {
    let cases: [(fn(Option<&str>, Option<Value>) -> Boom, u16); 28] = [
        (Boom::bad_request, 400),
        (Boom::payment_required, 402),
        (Boom::forbidden, 403),
        (Boom::not_found, 404),
        (Boom::not_acceptable, 406),
        (Boom::proxy_auth_required, 407),
        (Boom::client_timeout, 408),
        (Boom::conflict, 409),
        (Boom::resource_gone, 410),
        (Boom::length_required, 411),
        (Boom::precondition_failed, 412),
        (Boom::entity_too_large, 413),
        (Boom::uri_too_long, 414),
        (Boom::unsupported_media_type, 415),
        (Boom::range_not_satisfiable, 416),
        (Boom::expectation_failed, 417),
        (Boom::teapot, 418),
        (Boom::bad_data, 422),
        (Boom::locked, 423),
        (Boom::precondition_required, 428),
        (Boom::too_many_requests, 429),
        (Boom::illegal, 451),
        (Boom::internal, 500),
        (Boom::bad_implementation, 500),
        (Boom::not_implemented, 501),
        (Boom::bad_gateway, 502),
        (Boom::server_unavailable, 503),
        (Boom::gateway_timeout, 504),
    ];
    for (ctor, status) in cases {
        let err = ctor(Some("my message"), None);
        assert_eq!(err.status_code(), status);
        assert_eq!(err.output().payload()["statusCode"], status);
        assert_eq!(err.message(), "my message");
        assert_eq!(err.is_server(), status >= 500);
    }
}

#[test]
fn internal_hides_message_and_keeps_data() {
    let err = Boom::internal(Some("my message"), Some(json!({ "my": "data" })));
    assert_eq!(err.message(), "my message");
    assert!(err.is_server());
    assert_eq!(err.output().payload()["message"], INTERNAL_MESSAGE);
    assert_eq!(err.data().unwrap()["my"], "data");
}

#[test]
fn bad_implementation_is_developer_error() {
    let err = Boom::bad_implementation(None, None);
    assert_eq!(err.status_code(), 500);
    assert!(err.is_developer_error());
    assert!(err.is_server());
    assert!(!Boom::internal(None, None).is_developer_error());
}

#[test]
fn unauthorized_without_scheme_has_no_headers() {
    let err = Boom::unauthorized(None, None, None).unwrap();
    assert_eq!(err.status_code(), 401);
    assert!(err.output().headers().is_empty());
    assert_eq!(
        Boom::unauthorized(Some("my message"), None, None)
            .unwrap()
            .message(),
        "my message"
    );
}

#[test]
fn unauthorized_with_scheme_and_attributes() {
    let attrs = attributes(json!({ "a": 1, "b": "something", "c": null, "d": 0 }));
    let err = Boom::unauthorized(Some("boom"), Some(&"Test".into()), Some(&attrs)).unwrap();
    assert_eq!(
        err.output().headers()["www-authenticate"],
        "Test a=\"1\", b=\"something\", c=\"\", d=\"0\", error=\"boom\""
    );
    assert_eq!(
        err.output().payload()["attributes"],
        json!({ "a": 1, "b": "something", "c": "", "d": 0, "error": "boom" })
    );
    assert!(!err.is_missing());
}

#[test]
fn unauthorized_missing_message_sets_is_missing() {
    let attrs = attributes(json!({ "a": 1, "b": "something", "c": null, "d": 0 }));
    let err = Boom::unauthorized(None, Some(&"Test".into()), Some(&attrs)).unwrap();
    assert_eq!(
        err.output().headers()["www-authenticate"],
        "Test a=\"1\", b=\"something\", c=\"\", d=\"0\""
    );
    assert!(err.is_missing());

    let empty = Boom::unauthorized(Some(""), Some(&"Basic".into()), None).unwrap();
    assert!(empty.is_missing());
}

#[test]
fn unauthorized_with_challenge_list() {
    let scheme = AuthScheme::from(vec!["Test", "one", "two"]);
    let err = Boom::unauthorized(None, Some(&scheme), None).unwrap();
    assert_eq!(err.output().headers()["www-authenticate"], "Test, one, two");
}

#[test]
fn unauthorized_rejects_non_ascii_attribute() {
    let attrs = attributes(json!({ "realm": "caf\u{e9}" }));
    let err = Boom::unauthorized(Some("boom"), Some(&"Test".into()), Some(&attrs)).unwrap_err();
    assert!(matches!(err, boom::Error::InvalidAttribute { .. }));
}

#[test]
fn method_not_allowed_sets_allow_header() {
    let single = Boom::method_not_allowed(Some("my message"), None, Some(["GET".to_owned()].as_slice())).unwrap();
    assert_eq!(single.status_code(), 405);
    assert_eq!(single.output().headers()["allow"], "GET");

    let many = ["GET".to_owned(), "POST".to_owned()];
    let err = Boom::method_not_allowed(Some("my message"), None, Some(many.as_slice())).unwrap();
    assert_eq!(err.output().headers()["allow"], "GET, POST");
    assert_eq!(err.message(), "my message");
}

#[test]
fn create_casts_and_validates_status() {
    assert_eq!(Boom::create("404.1", None, None).unwrap().status_code(), 404);
    assert_eq!(Boom::create(400.123, None, None).unwrap().status_code(), 400);

    let err = Boom::create("x", None, None).unwrap_err();
    assert_eq!(err.to_string(), "First argument must be a number (400+): x");

    let denominator = 0.0_f64;
    assert!(Boom::create(1.0 / denominator, None, None).is_err());
}

#[test]
fn create_unknown_status_is_labelled_unknown() {
    let err = Boom::create(StatusInput::Code(999), None, None).unwrap();
    assert_eq!(err.output().payload()["error"], "Unknown");
    assert_eq!(err.output().payload()["statusCode"], 999);
}

#[test]
fn wrap_returns_existing_boom_untouched() {
    let mut original = Boom::bad_request(Some("first"), None);
    original
        .payload_mut()
        .insert("guid".to_owned(), json!("abc"));

    let wrapped = Boom::wrap(original.into(), Some(&StatusInput::Code(503)), Some("ignored")).unwrap();
    assert_eq!(wrapped.status_code(), 400);
    assert_eq!(wrapped.message(), "first");
    assert_eq!(wrapped.output().payload()["guid"], "abc");
}

#[test]
fn wrap_foreign_error_defaults_to_500() {
    let err = Boom::wrap(WrapTarget::foreign(KaBoom { xyz: 123 }), None, None).unwrap();
    assert_eq!(err.status_code(), 500);
    assert_eq!(err.message(), "ka-boom");
    assert_eq!(
        err.output().payload(),
        json!({
            "statusCode": 500,
            "error": "Internal Server Error",
            "message": INTERNAL_MESSAGE,
        })
        .as_object()
        .unwrap()
    );
    assert!(err.data().is_none());

    let source = std::error::Error::source(&err)
        .and_then(|source| source.downcast_ref::<KaBoom>())
        .unwrap();
    assert_eq!(source.xyz, 123);
}

#[test]
fn wrap_prefixes_or_sets_message() {
    let wrapped = Boom::wrap(
        WrapTarget::foreign(Silent),
        Some(&StatusInput::Code(400)),
        Some("something bad"),
    )
    .unwrap();
    assert_eq!(wrapped.message(), "something bad");

    let composite = Boom::wrap(
        WrapTarget::foreign(KaBoom { xyz: 1 }),
        None,
        Some("Something bad"),
    )
    .unwrap();
    assert_eq!(composite.message(), "Something bad: ka-boom");
    assert!(composite.is_server());
}

#[test]
fn output_serializes_with_camel_case_and_flat_headers() {
    let err = Boom::method_not_allowed(None, None, Some(["GET".to_owned()].as_slice())).unwrap();
    let json = serde_json::to_value(err.output()).unwrap();
    assert_eq!(json["statusCode"], 405);
    assert_eq!(json["headers"]["allow"], "GET");
    assert_eq!(json["payload"]["error"], "Method Not Allowed");
}
