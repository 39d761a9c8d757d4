//! JSON messages exchanged with the host
//!
//! Requests are tagged by `action`. Only `analyze` produces a payload; the
//! highlight requests are fire-and-forget.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::AnalysisReport;

#[derive(Debug, Error)]
pub enum ExchangeError {
    #[error("Malformed request: {0}")]
    Decode(#[source] serde_json::Error),
    #[error("Failed to encode response: {0}")]
    Encode(#[source] serde_json::Error),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum Request {
    Analyze,
    HighlightColor {
        color: String,
        #[serde(rename = "highlightColor", default)]
        highlight_color: Option<String>,
    },
    HighlightFont {
        font: String,
        #[serde(rename = "highlightColor", default)]
        highlight_color: Option<String>,
    },
    RemoveHighlight,
    /// Any action this side does not handle, e.g. `setActiveTab`.
    #[serde(other)]
    Unsupported,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Response {
    Report(AnalysisReport),
    Failure { error: String },
}

pub fn decode_request(message: &str) -> Result<Request, ExchangeError> {
    serde_json::from_str(message).map_err(ExchangeError::Decode)
}

pub fn encode_response(response: &Response) -> Result<String, ExchangeError> {
    serde_json::to_string(response).map_err(ExchangeError::Encode)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::types::ColorSummaryEntry;

    #[test]
    fn decodes_every_action() {
        assert_eq!(decode_request(r#"{"action":"analyze"}"#).unwrap(), Request::Analyze);
        assert_eq!(
            decode_request(
                r##"{"action":"highlightColor","color":"rgb(1, 2, 3)","highlightColor":"#f0f"}"##
            )
            .unwrap(),
            Request::HighlightColor {
                color: "rgb(1, 2, 3)".into(),
                highlight_color: Some("#f0f".into()),
            }
        );
        assert_eq!(
            decode_request(r#"{"action":"highlightFont","font":"Inter"}"#).unwrap(),
            Request::HighlightFont {
                font: "Inter".into(),
                highlight_color: None,
            }
        );
        assert_eq!(
            decode_request(r#"{"action":"removeHighlight"}"#).unwrap(),
            Request::RemoveHighlight
        );
        assert_eq!(
            decode_request(r#"{"action":"setActiveTab","tab":"fonts"}"#).unwrap(),
            Request::Unsupported
        );
    }

    #[test]
    fn malformed_requests_fail() {
        assert!(matches!(
            decode_request("not json"),
            Err(ExchangeError::Decode(_))
        ));
        assert!(decode_request(r#"{"action":"highlightColor"}"#).is_err());
        assert!(decode_request(r#"{"color":"red"}"#).is_err());
    }

    #[test]
    fn response_shapes() {
        let report = Response::Report(AnalysisReport {
            colors: vec![ColorSummaryEntry {
                color: "rgb(10, 10, 10)".into(),
                count: 2,
                elements: vec!["div".into(), "span".into()],
            }],
            fonts: Vec::new(),
            url: "https://example.test/".into(),
            title: "Example".into(),
        });
        let encoded = encode_response(&report).unwrap();
        let value: serde_json::Value = serde_json::from_str(&encoded).unwrap();
        assert_eq!(
            value,
            json!({
                "colors": [{"color": "rgb(10, 10, 10)", "count": 2, "elements": ["div", "span"]}],
                "fonts": [],
                "url": "https://example.test/",
                "title": "Example",
            })
        );

        let failure = Response::Failure {
            error: "denied".into(),
        };
        assert_eq!(encode_response(&failure).unwrap(), r#"{"error":"denied"}"#);
    }
}
