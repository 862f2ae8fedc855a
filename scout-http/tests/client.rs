use reqwest::header::{HeaderName, HeaderValue};
use scout_http::{Auth, HttpClient, HttpError, RequestOpts};
use serde_json::{json, Value};
use std::borrow::Cow;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn post_json_sends_body_and_header_auth() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/search"))
        .and(header("x-api-key", "serp-key"))
        .and(body_json(json!({"q": "rust", "num": 4})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"organic": []})))
        .expect(1)
        .mount(&server)
        .await;

    let client = HttpClient::new(&server.uri()).unwrap();
    let got: Value = client
        .post_json(
            "search",
            &json!({"q": "rust", "num": 4}),
            RequestOpts {
                auth: Some(Auth::Header {
                    name: HeaderName::from_static("x-api-key"),
                    value: HeaderValue::from_static("serp-key"),
                }),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(got, json!({"organic": []}));
}

#[tokio::test]
async fn query_auth_is_appended_to_params() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/customsearch/v1"))
        .and(query_param("key", "g-key"))
        .and(query_param("q", "tokio"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": []})))
        .expect(1)
        .mount(&server)
        .await;

    let client = HttpClient::new(&server.uri()).unwrap();
    let _: Value = client
        .get_json(
            "customsearch/v1",
            RequestOpts {
                query: Some(vec![("q", Cow::Borrowed("tokio"))]),
                auth: Some(Auth::Query {
                    name: "key",
                    value: Cow::Borrowed("g-key"),
                }),
                ..Default::default()
            },
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn non_success_status_is_an_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(403).set_body_json(json!({"error": {"message": "bad key"}})),
        )
        .mount(&server)
        .await;

    let client = HttpClient::new(&server.uri()).unwrap();
    let err = client
        .get_json::<Value>("anything", RequestOpts::default())
        .await
        .unwrap_err();

    match err {
        HttpError::Api {
            status, message, ..
        } => {
            assert_eq!(status.as_u16(), 403);
            assert_eq!(message, "bad key");
        }
        other => panic!("expected api error, got {other:?}"),
    }
}

#[tokio::test]
async fn invalid_json_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;

    let client = HttpClient::new(&server.uri()).unwrap();
    let err = client
        .get_json::<Value>("x", RequestOpts::default())
        .await
        .unwrap_err();
    assert!(matches!(err, HttpError::Decode(_, ref snippet) if snippet.contains("not json")));
}

#[tokio::test]
async fn detached_client_fetches_absolute_urls_as_bytes() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/paper.pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"%PDF-1.4".to_vec()))
        .mount(&server)
        .await;

    let client = HttpClient::detached().unwrap();
    let bytes = client
        .get_bytes(&format!("{}/paper.pdf", server.uri()), RequestOpts::default())
        .await
        .unwrap();
    assert_eq!(bytes, b"%PDF-1.4");
}
