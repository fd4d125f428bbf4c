use std::time::{Duration, Instant};

use serde::Deserialize;
use thiserror::Error;

use crate::recognition::domain::face_match::{FaceMatch, RecognitionRequest};
use crate::recognition::domain::identity_recognizer::{IdentityRecognizer, RecognitionFailure};

#[derive(Error, Debug)]
pub enum RecognitionError {
    #[error("failed to build http client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("face search request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("face search at {url} returned status {status}")]
    Status { url: String, status: u16 },
    #[error("malformed face search response: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct SearchResponse {
    #[serde(default)]
    face_matches: Vec<SearchMatch>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct SearchMatch {
    #[serde(default)]
    similarity: f32,
    face: Option<IndexedFace>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct IndexedFace {
    external_image_id: Option<String>,
}

/// Face search over HTTP.
///
/// Sends `POST <endpoint>?collection=<id>&threshold=<t>` with the PNG as an
/// `image/png` body and expects a JSON body of the form
/// `{"FaceMatches":[{"Similarity":99.2,"Face":{"ExternalImageId":"Jane_Doe"}}]}`.
/// Every request is bounded by the client-wide `timeout`.
pub struct HttpFaceSearch {
    client: reqwest::blocking::Client,
    endpoint: String,
}

impl HttpFaceSearch {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, RecognitionError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(RecognitionError::Client)?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    fn call(&self, request: &RecognitionRequest) -> Result<Vec<FaceMatch>, RecognitionError> {
        let start = Instant::now();
        let threshold = request.match_threshold.to_string();
        let response = self
            .client
            .post(&self.endpoint)
            .query(&[
                ("collection", request.collection_id.as_str()),
                ("threshold", threshold.as_str()),
            ])
            .header(reqwest::header::CONTENT_TYPE, "image/png")
            .body(request.image_png.clone())
            .send()
            .map_err(|e| self.request_error(e))?;
        log::debug!("Service call took {:?}", start.elapsed());

        let status = response.status();
        if !status.is_success() {
            return Err(RecognitionError::Status {
                url: self.endpoint.clone(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().map_err(|e| self.request_error(e))?;
        parse_matches(&body)
    }

    fn request_error(&self, source: reqwest::Error) -> RecognitionError {
        RecognitionError::Request {
            url: self.endpoint.clone(),
            source,
        }
    }
}

impl IdentityRecognizer for HttpFaceSearch {
    fn search(&self, request: &RecognitionRequest) -> Result<Vec<FaceMatch>, RecognitionFailure> {
        Ok(self.call(request)?)
    }
}

/// Decodes a face search body, preserving the service's ranking order.
fn parse_matches(body: &[u8]) -> Result<Vec<FaceMatch>, RecognitionError> {
    let parsed: SearchResponse = serde_json::from_slice(body)?;
    Ok(parsed
        .face_matches
        .into_iter()
        .map(|m| FaceMatch {
            score: m.similarity,
            external_id: m.face.and_then(|f| f.external_image_id),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::OneShotServer;
    use approx::assert_relative_eq;

    fn request() -> RecognitionRequest {
        RecognitionRequest {
            image_png: vec![0x89, b'P', b'N', b'G'],
            collection_id: "gopaloalto".to_string(),
            match_threshold: 0.7,
        }
    }

    #[test]
    fn test_parse_keeps_service_order() {
        let body = br#"{"FaceMatches":[
            {"Similarity":97.5,"Face":{"ExternalImageId":"Jane_Doe"}},
            {"Similarity":99.0,"Face":{"ExternalImageId":"John_Roe"}}
        ]}"#;

        let matches = parse_matches(body).unwrap();

        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].external_id.as_deref(), Some("Jane_Doe"));
        assert_eq!(matches[1].external_id.as_deref(), Some("John_Roe"));
    }

    #[test]
    fn test_parse_missing_matches_is_empty() {
        assert!(parse_matches(b"{}").unwrap().is_empty());
        assert!(parse_matches(br#"{"FaceMatches":[]}"#).unwrap().is_empty());
    }

    #[test]
    fn test_parse_match_without_face_has_no_id() {
        let matches = parse_matches(br#"{"FaceMatches":[{"Similarity":80.0}]}"#).unwrap();
        assert_eq!(matches[0].external_id, None);
    }

    #[test]
    fn test_parse_rejects_malformed_json() {
        assert!(matches!(
            parse_matches(b"<html>"),
            Err(RecognitionError::Decode(_))
        ));
    }

    #[test]
    fn test_search_posts_png_with_collection_and_threshold() {
        let server = OneShotServer::start(
            200,
            r#"{"FaceMatches":[{"Similarity":99.1,"Face":{"ExternalImageId":"Jane_Doe"}}]}"#,
        );
        let search = HttpFaceSearch::new(&server.url, Duration::from_secs(5)).unwrap();

        let matches = search.search(&request()).unwrap();

        assert_eq!(matches.len(), 1);
        assert_relative_eq!(matches[0].score, 99.1, epsilon = 1e-3);
        assert_eq!(matches[0].external_id.as_deref(), Some("Jane_Doe"));
        let captured = server
            .requests
            .recv_timeout(Duration::from_secs(5))
            .unwrap();
        assert!(captured.request_line.starts_with("POST /?"));
        assert!(captured.request_line.contains("collection=gopaloalto"));
        assert!(captured.request_line.contains("threshold=0.7"));
        assert_eq!(captured.header("content-type"), Some("image/png"));
        assert_eq!(captured.body, request().image_png);
    }

    #[test]
    fn test_search_reports_error_status() {
        let server = OneShotServer::start(500, "{}");
        let search = HttpFaceSearch::new(&server.url, Duration::from_secs(5)).unwrap();

        let err = search.call(&request()).unwrap_err();

        assert!(matches!(err, RecognitionError::Status { status: 500, .. }));
    }

    #[test]
    fn test_search_reports_unreachable_service() {
        let search = HttpFaceSearch::new("http://127.0.0.1:1/", Duration::from_secs(2)).unwrap();
        assert!(search.search(&request()).is_err());
    }
}
