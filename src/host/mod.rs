//! Contract with the automation host.
//!
//! The host owns screenshots, template/OCR matching, input dispatch and the
//! pipeline's node history. Handlers only see it through [`Context`], which is
//! handed to every call explicitly.

pub mod error;
pub mod keyboard;

pub use error::{AgentError, AgentResult};
pub use keyboard::Key;

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub type Screenshot = image::RgbaImage;

/// Screen rectangle, `[x, y, width, height]` on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "[i32; 4]", into = "[i32; 4]")]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    pub const fn zero() -> Self {
        Self::new(0, 0, 0, 0)
    }

    pub fn center(&self) -> (i32, i32) {
        (self.x + self.width / 2, self.y + self.height / 2)
    }
}

impl From<[i32; 4]> for Rect {
    fn from(r: [i32; 4]) -> Self {
        Self::new(r[0], r[1], r[2], r[3])
    }
}

impl From<Rect> for [i32; 4] {
    fn from(r: Rect) -> Self {
        [r.x, r.y, r.width, r.height]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecognitionMethod {
    TemplateMatch,
    #[serde(rename = "OCR")]
    Ocr,
}

/// A recognition the host should run. Without overrides the host runs the node
/// exactly as its pipeline defines it.
#[derive(Debug, Clone, PartialEq)]
pub struct RecognitionRequest {
    pub node: String,
    pub method: Option<RecognitionMethod>,
    pub roi: Option<Rect>,
    pub expected: Vec<String>,
}

impl RecognitionRequest {
    pub fn node(node: impl Into<String>) -> Self {
        Self {
            node: node.into(),
            method: None,
            roi: None,
            expected: Vec::new(),
        }
    }

    /// OCR inside `roi`, hit when the text matches any of `expected`.
    pub fn ocr(node: impl Into<String>, roi: Rect, expected: impl Into<String>) -> Self {
        Self {
            node: node.into(),
            method: Some(RecognitionMethod::Ocr),
            roi: Some(roi),
            expected: vec![expected.into()],
        }
    }

    /// Pipeline override in the host's JSON shape, keyed by node name.
    pub fn pipeline_override(&self) -> Value {
        let mut body = serde_json::Map::new();
        if let Some(method) = self.method {
            body.insert("recognition".into(), serde_json::json!(method));
        }
        if let Some(roi) = self.roi {
            body.insert("roi".into(), serde_json::json!(roi));
        }
        if !self.expected.is_empty() {
            body.insert("expected".into(), serde_json::json!(self.expected));
        }
        let mut root = serde_json::Map::new();
        root.insert(self.node.clone(), Value::Object(body));
        Value::Object(root)
    }
}

/// What the host reports back from a recognition it ran.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RecognitionDetail {
    pub hit: bool,
    #[serde(rename = "box")]
    pub bbox: Option<Rect>,
    pub text: Option<String>,
}

impl RecognitionDetail {
    pub fn hit_box(&self) -> Option<Rect> {
        if self.hit {
            self.bbox
        } else {
            None
        }
    }
}

/// Result of one of our custom recognitions. `bbox == None` is a miss.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecoOutcome {
    #[serde(rename = "box")]
    pub bbox: Option<Rect>,
    pub detail: Value,
}

impl RecoOutcome {
    pub fn hit(bbox: Rect, detail: Value) -> Self {
        Self { bbox: Some(bbox), detail }
    }

    pub fn miss(detail: Value) -> Self {
        Self { bbox: None, detail }
    }

    pub fn is_hit(&self) -> bool {
        self.bbox.is_some()
    }
}

/// Latest recorded execution of a pipeline node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeDetail {
    pub name: String,
    pub recognition: Option<RecoOutcome>,
}

impl NodeDetail {
    /// Deserializes the best result's detail record, failing when the node
    /// never produced one.
    pub fn detail<T: serde::de::DeserializeOwned>(&self) -> AgentResult<T> {
        let reco = self
            .recognition
            .as_ref()
            .ok_or_else(|| AgentError::MissingNode(self.name.clone()))?;
        serde_json::from_value(reco.detail.clone()).map_err(|e| AgentError::MissingField {
            node: self.name.clone(),
            field: e.to_string(),
        })
    }
}

/// Capabilities the host exposes to a running handler.
pub trait Context {
    fn screencap(&mut self) -> AgentResult<Screenshot>;

    /// `Ok(None)` when the host ran nothing (unknown node); a miss comes back
    /// as `hit == false`.
    fn run_recognition(
        &mut self,
        request: &RecognitionRequest,
        image: &Screenshot,
    ) -> AgentResult<Option<RecognitionDetail>>;

    fn click(&mut self, x: i32, y: i32) -> AgentResult<()>;

    fn click_key(&mut self, key: Key) -> AgentResult<()>;

    fn input_text(&mut self, text: &str) -> AgentResult<()>;

    fn latest_node(&self, name: &str) -> Option<NodeDetail>;

    /// Runs `request` and returns the matched box only on a hit.
    fn find(&mut self, request: &RecognitionRequest, image: &Screenshot) -> AgentResult<Option<Rect>> {
        Ok(self
            .run_recognition(request, image)?
            .and_then(|detail| detail.hit_box()))
    }

    fn click_center(&mut self, bbox: Rect) -> AgentResult<()> {
        let (x, y) = bbox.center();
        self.click(x, y)
    }

    /// Latest node with a recognition result, or [`AgentError::MissingNode`].
    fn require_node(&self, name: &str) -> AgentResult<NodeDetail> {
        self.latest_node(name)
            .filter(|node| node.recognition.is_some())
            .ok_or_else(|| AgentError::MissingNode(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn center_uses_integer_division() {
        assert_eq!(Rect::new(491, 432, 207, 116).center(), (594, 490));
        assert_eq!(Rect::new(0, 0, 3, 3).center(), (1, 1));
    }

    #[test]
    fn rect_is_a_four_element_array_in_json() {
        let r = Rect::new(1, 2, 3, 4);
        assert_eq!(serde_json::to_value(r).unwrap(), serde_json::json!([1, 2, 3, 4]));
        let back: Rect = serde_json::from_value(serde_json::json!([5, 6, 7, 8])).unwrap();
        assert_eq!(back, Rect::new(5, 6, 7, 8));
    }

    #[test]
    fn ocr_override_matches_host_shape() {
        let req = RecognitionRequest::ocr("MyCheckPage", Rect::new(403, 216, 236, 131), ".*1000.*");
        assert_eq!(
            req.pipeline_override(),
            serde_json::json!({
                "MyCheckPage": {
                    "recognition": "OCR",
                    "roi": [403, 216, 236, 131],
                    "expected": [".*1000.*"]
                }
            })
        );
    }

    #[test]
    fn plain_node_request_has_empty_override() {
        let req = RecognitionRequest::node("FindDownArrow");
        assert_eq!(req.pipeline_override(), serde_json::json!({ "FindDownArrow": {} }));
    }

    #[test]
    fn hit_box_requires_hit() {
        let miss = RecognitionDetail {
            hit: false,
            bbox: Some(Rect::new(1, 1, 1, 1)),
            text: None,
        };
        assert_eq!(miss.hit_box(), None);
    }

    #[test]
    fn node_detail_without_recognition_is_missing_node() {
        let node = NodeDetail {
            name: "GetNextServer".into(),
            recognition: None,
        };
        let err = node.detail::<serde_json::Value>().unwrap_err();
        assert_eq!(err, AgentError::MissingNode("GetNextServer".into()));
    }
}
