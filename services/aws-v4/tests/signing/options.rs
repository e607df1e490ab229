use super::{init_signing_test, ACCESS_KEY_ID, SECRET_ACCESS_KEY};
use awsig_core::ErrorKind;
use awsig_v4::{Options, Signer};
use pretty_assertions::assert_eq;
use serde_json::json;

#[test]
fn test_sign_from_options() {
    let cred = init_signing_test();

    let value = json!({
        "method": "GET",
        "path": "/?Param2=value2&Param1=value1",
        "service": "service",
        "region": "us-east-1",
        "headers": {
            "X-Amz-Date": "20150830T123600Z",
            "Host": "example.amazonaws.com"
        },
        "body": "",
        "credentials": {
            "accessKeyId": ACCESS_KEY_ID,
            "secretKey": SECRET_ACCESS_KEY
        }
    });

    let opts = Options::parse_with_credentials(&value).expect("options must be valid");
    assert_eq!(opts.credential.as_ref(), Some(&cred));

    let output = Signer::default()
        .sign(&opts.request, &cred)
        .expect("sign must succeed");
    assert_eq!(
        output.signature(),
        "b97d918cfa904a5beff61c982a1b6f458b799221646efd99d3219ec94cdf2500"
    );
}

#[test]
fn test_missing_keys_are_reported_together() {
    init_signing_test();

    let err = Options::parse(&json!({ "method": "GET", "path": "/", "body": null }))
        .expect_err("keys are missing");
    assert_eq!(err.kind(), ErrorKind::RequestInvalid);
    assert_eq!(err.missing_keys(), ["service", "region", "headers", "body"]);
}

#[test]
fn test_session_token_is_signed_when_given() {
    init_signing_test();

    let value = json!({
        "method": "GET",
        "path": "/",
        "service": "service",
        "region": "us-east-1",
        "headers": {
            "X-Amz-Date": "20150830T123600Z",
            "Host": "example.amazonaws.com",
            "X-Amz-Security-Token": "token"
        },
        "body": "",
        "credentials": {
            "accessKeyId": ACCESS_KEY_ID,
            "secretKey": SECRET_ACCESS_KEY,
            "sessionToken": "token"
        }
    });

    let opts = Options::parse_with_credentials(&value).expect("options must be valid");
    let cred = opts.credential.expect("credential is given inline");
    assert_eq!(cred.session_token.as_deref(), Some("token"));

    let output = Signer::default()
        .sign(&opts.request, &cred)
        .expect("sign must succeed");
    assert_eq!(
        output.canonical_request().signed_headers(),
        "host;x-amz-date;x-amz-security-token"
    );
}
