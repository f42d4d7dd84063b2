#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};

use maa_server_agent::host::{
    AgentError, AgentResult, Context, Key, NodeDetail, RecoOutcome, RecognitionDetail, RecognitionRequest, Rect,
    Screenshot,
};
use regex::Regex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Click(i32, i32),
    Key(i32),
    Text(String),
}

/// Scripted host: queued template results per node, static OCR text per ROI,
/// and a record of every input the handlers sent.
#[derive(Default)]
pub struct FakeHost {
    pub nodes: HashMap<String, NodeDetail>,
    pub template_hits: HashMap<String, VecDeque<Option<Rect>>>,
    pub screen_text: HashMap<Rect, String>,
    pub inputs: Vec<Input>,
    pub requests: Vec<RecognitionRequest>,
    pub screencaps: usize,
    pub fail_screencap: bool,
}

impl FakeHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `outcome` as the latest result of `node`.
    pub fn record(&mut self, node: &str, outcome: RecoOutcome) {
        self.nodes.insert(
            node.to_string(),
            NodeDetail {
                name: node.to_string(),
                recognition: Some(outcome),
            },
        );
    }

    /// Queues one result per call for a template node; an empty queue misses.
    pub fn queue(&mut self, node: &str, results: impl IntoIterator<Item = Option<Rect>>) {
        self.template_hits
            .entry(node.to_string())
            .or_default()
            .extend(results);
    }

    pub fn show_text(&mut self, roi: Rect, text: &str) {
        self.screen_text.insert(roi, text.to_string());
    }

    pub fn clicks(&self) -> Vec<(i32, i32)> {
        self.inputs
            .iter()
            .filter_map(|i| match i {
                Input::Click(x, y) => Some((*x, *y)),
                _ => None,
            })
            .collect()
    }

    pub fn keys(&self) -> Vec<i32> {
        self.inputs
            .iter()
            .filter_map(|i| match i {
                Input::Key(k) => Some(*k),
                _ => None,
            })
            .collect()
    }
}

pub fn blank() -> Screenshot {
    Screenshot::new(4, 4)
}

impl Context for FakeHost {
    fn screencap(&mut self) -> AgentResult<Screenshot> {
        if self.fail_screencap {
            return Err(AgentError::Host("screencap failed".into()));
        }
        self.screencaps += 1;
        Ok(blank())
    }

    fn run_recognition(
        &mut self,
        request: &RecognitionRequest,
        _image: &Screenshot,
    ) -> AgentResult<Option<RecognitionDetail>> {
        self.requests.push(request.clone());

        if let Some(roi) = request.roi {
            let text = self.screen_text.get(&roi).cloned();
            let hit = match &text {
                Some(t) => request
                    .expected
                    .iter()
                    .any(|p| Regex::new(p).map(|re| re.is_match(t)).unwrap_or(false)),
                None => false,
            };
            return Ok(Some(RecognitionDetail {
                hit,
                bbox: hit.then_some(roi),
                text,
            }));
        }

        let next = self
            .template_hits
            .get_mut(&request.node)
            .and_then(|q| q.pop_front())
            .flatten();
        Ok(Some(RecognitionDetail {
            hit: next.is_some(),
            bbox: next,
            text: None,
        }))
    }

    fn click(&mut self, x: i32, y: i32) -> AgentResult<()> {
        self.inputs.push(Input::Click(x, y));
        Ok(())
    }

    fn click_key(&mut self, key: Key) -> AgentResult<()> {
        self.inputs.push(Input::Key(key.code()));
        Ok(())
    }

    fn input_text(&mut self, text: &str) -> AgentResult<()> {
        self.inputs.push(Input::Text(text.to_string()));
        Ok(())
    }

    fn latest_node(&self, name: &str) -> Option<NodeDetail> {
        self.nodes.get(name).cloned()
    }
}
