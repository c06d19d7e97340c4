//! Verify request construction against JSON test vectors in `test-vectors/`.
//!
//! Each case names an operation as data and the request it must produce.
//! The built URL is parsed back and compared by path and decoded query pairs,
//! so the check does not depend on a particular percent-encoding spelling.

use movies_core::{GatewayError, MovieClient, Operation};
use url::Url;

fn load() -> serde_json::Value {
    let raw = include_str!("../../test-vectors/requests.json");
    serde_json::from_str(raw).unwrap()
}

fn client(vectors: &serde_json::Value) -> MovieClient {
    MovieClient::new(
        vectors["base_url"].as_str().unwrap(),
        vectors["api_key"].as_str().unwrap(),
    )
}

#[test]
fn request_test_vectors() {
    let vectors = load();
    let c = client(&vectors);

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let operation: Operation = serde_json::from_value(case["operation"].clone()).unwrap();
        let expected = &case["expected_request"];

        let req = c.build(&operation).unwrap();
        let url = Url::parse(&req.url).unwrap();
        assert_eq!(url.scheme(), "https", "{name}: scheme");
        assert_eq!(url.host_str(), Some("api.themoviedb.org"), "{name}: host");
        assert_eq!(url.path(), expected["path"].as_str().unwrap(), "{name}: path");

        let query: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        let expected_query: Vec<(String, String)> = expected["query"]
            .as_array()
            .unwrap()
            .iter()
            .map(|pair| {
                let arr = pair.as_array().unwrap();
                (arr[0].as_str().unwrap().to_string(), arr[1].as_str().unwrap().to_string())
            })
            .collect();
        assert_eq!(query, expected_query, "{name}: query");
    }
}

#[test]
fn rejection_test_vectors() {
    let vectors = load();
    let c = client(&vectors);

    for case in vectors["rejections"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let operation: Operation = serde_json::from_value(case["operation"].clone()).unwrap();
        let err = c.build(&operation).unwrap_err();
        assert!(matches!(err, GatewayError::InvalidArgument(_)), "{name}: {err}");
    }
}

#[test]
fn building_is_deterministic() {
    let vectors = load();
    let c = client(&vectors);

    for case in vectors["cases"].as_array().unwrap() {
        let operation: Operation = serde_json::from_value(case["operation"].clone()).unwrap();
        assert_eq!(c.build(&operation).unwrap(), c.build(&operation).unwrap());
    }
}
