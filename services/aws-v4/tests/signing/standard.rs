use super::{
    init_signing_test, suite_request, ACCESS_KEY_ID, AMZ_DATE, HOST, REGION, SECRET_ACCESS_KEY,
    SERVICE,
};
use awsig_v4::{
    authorization_header, canonicalize, sign, string_to_sign, Config, Credential, Signer,
    SigningRequest,
};
use pretty_assertions::assert_eq;
use test_case::test_case;

#[test]
fn test_get_vanilla_query_order_key_case() {
    let cred = init_signing_test();
    let req = suite_request("GET", "/?Param2=value2&Param1=value1", &[], "");

    let creq = canonicalize(&req);
    assert_eq!(
        creq.as_str(),
        "GET\n/\nParam1=value1&Param2=value2\nhost:example.amazonaws.com\nx-amz-date:20150830T123600Z\n\nhost;x-amz-date\ne3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
    );

    let sts = string_to_sign(req.timestamp(), REGION, SERVICE, creq.as_str());
    assert_eq!(
        sts,
        "AWS4-HMAC-SHA256\n20150830T123600Z\n20150830/us-east-1/service/aws4_request\n816cd5b414d056048ba4f7c5386d6e0533120fb1fcfa93762cf0fc39e2cf19e0"
    );

    let signature = sign(SECRET_ACCESS_KEY, req.date(), REGION, SERVICE, &sts);
    assert_eq!(
        signature,
        "b97d918cfa904a5beff61c982a1b6f458b799221646efd99d3219ec94cdf2500"
    );

    let output = Signer::default().sign(&req, &cred).expect("sign must succeed");
    assert_eq!(output.string_to_sign(), sts);
    assert_eq!(
        output.authorization(),
        authorization_header(
            ACCESS_KEY_ID,
            req.date(),
            REGION,
            SERVICE,
            "host;x-amz-date",
            &signature
        )
    );
}

#[test]
fn test_get_vanilla() {
    let cred = init_signing_test();
    let req = suite_request("GET", "/", &[], "");

    let output = Signer::default().sign(&req, &cred).expect("sign must succeed");
    assert_eq!(
        output.authorization(),
        "AWS4-HMAC-SHA256 Credential=AKIDEXAMPLE/20150830/us-east-1/service/aws4_request, SignedHeaders=host;x-amz-date, Signature=5fa00fa31553b73ebf1942676e86291e8372ff2a2260956d9b8aae1d763fbf31"
    );
}

fn some_endpoint_request(headers: &[(&str, &str)]) -> SigningRequest {
    let mut all = vec![
        ("host", "some-endpoint.some-region.amazonaws.com"),
        ("x-amz-date", "20150830T123600Z"),
    ];
    all.extend_from_slice(headers);

    SigningRequest::new("GET", "/", all, "", SERVICE, REGION).expect("request must be valid")
}

#[test]
fn test_sign_headers_utf8() {
    let cred = init_signing_test();
    let req = some_endpoint_request(&[("some-header", "テスト")]);

    let output = Signer::default().sign(&req, &cred).expect("sign must succeed");
    assert_eq!(
        output.canonical_request().signed_headers(),
        "host;some-header;x-amz-date"
    );
    assert_eq!(
        output.signature(),
        "4596b207a7fc6bdf18725369bc0cd7022cf20efbd2c19730549f42d1a403648e"
    );
}

#[test]
fn test_sign_headers_space_trimming() {
    let cred = init_signing_test();
    let req = some_endpoint_request(&[("some-header", "  test  test   ")]);

    let output = Signer::default().sign(&req, &cred).expect("sign must succeed");
    assert!(output
        .canonical_request()
        .as_str()
        .contains("\nsome-header:test test\n"));
    assert_eq!(
        output.signature(),
        "0bd74dbf6f21161f61a1a3a1c313b6a4bc67ec57bf5ea9ae956a63753ca1d7f7"
    );
}

#[test]
fn test_sign_minimal_headers() {
    let cred = init_signing_test();
    let req = some_endpoint_request(&[]);

    let output = Signer::default().sign(&req, &cred).expect("sign must succeed");
    assert_eq!(
        output.authorization(),
        "AWS4-HMAC-SHA256 Credential=AKIDEXAMPLE/20150830/us-east-1/service/aws4_request, SignedHeaders=host;x-amz-date, Signature=d2445d2d58e01146627c1e498dc0b4749d0cecd2cab05c5349ed132c083914e8"
    );
}

#[test]
fn test_sign_http_matches_sign() {
    let cred = init_signing_test();

    let req = http::Request::get("https://example.amazonaws.com/?Param2=value2&Param1=value1")
        .header("X-Amz-Date", "20150830T123600Z")
        .body(())
        .expect("request must be valid");
    let (mut parts, _) = req.into_parts();

    let output = http_signer()
        .sign_http(&mut parts, b"", SERVICE, &cred)
        .expect("sign must succeed");

    assert_eq!(
        output.signature(),
        "b97d918cfa904a5beff61c982a1b6f458b799221646efd99d3219ec94cdf2500"
    );
    assert_eq!(parts.headers["authorization"], output.authorization());
}

fn http_signer() -> Signer {
    Signer::new(Config {
        region: Some(REGION.to_string()),
        ..Default::default()
    })
}

#[test_case("/bucket/a%20b?prefix=a%20b", "/bucket/a b?prefix=a b"; "space")]
#[test_case("/bucket/key?prefix=a%2Fb&delimiter=%2F", "/bucket/key?prefix=a/b&delimiter=/"; "slash")]
#[test_case("/%E1%88%B4?%E1%88%B4=%2A", "/ሴ?ሴ=*"; "utf8")]
fn test_sign_http_decodes_uri(uri: &str, path: &str) {
    let cred = init_signing_test();

    let req = http::Request::get(format!("https://{HOST}{uri}"))
        .header("X-Amz-Date", AMZ_DATE)
        .body(())
        .expect("request must be valid");
    let (mut parts, _) = req.into_parts();
    let from_http = http_signer()
        .sign_http(&mut parts, b"", SERVICE, &cred)
        .expect("sign must succeed");

    let from_fields = Signer::default()
        .sign(&suite_request("GET", path, &[], ""), &cred)
        .expect("sign must succeed");

    assert_eq!(
        from_http.canonical_request().as_str(),
        from_fields.canonical_request().as_str()
    );
    assert_eq!(from_http.signature(), from_fields.signature());
}

#[test]
fn test_sign_http_encoded_uri_canonical_form() {
    let cred = init_signing_test();

    let req = http::Request::get("https://example.amazonaws.com/bucket/a%20b?prefix=a%20b")
        .header("X-Amz-Date", AMZ_DATE)
        .body(())
        .expect("request must be valid");
    let (mut parts, _) = req.into_parts();

    let output = http_signer()
        .sign_http(&mut parts, b"", SERVICE, &cred)
        .expect("sign must succeed");
    assert!(output
        .canonical_request()
        .as_str()
        .starts_with("GET\n/bucket/a%20b\nprefix=a%20b\n"));
}

#[test]
fn test_signature_depends_on_secret() {
    init_signing_test();
    let req = suite_request("GET", "/", &[], "");

    let a = Signer::default()
        .sign(&req, &Credential::new(ACCESS_KEY_ID, SECRET_ACCESS_KEY))
        .expect("sign must succeed");
    let b = Signer::default()
        .sign(&req, &Credential::new(ACCESS_KEY_ID, "another_secret"))
        .expect("sign must succeed");

    assert_eq!(a.string_to_sign(), b.string_to_sign());
    assert_ne!(a.signature(), b.signature());
}
