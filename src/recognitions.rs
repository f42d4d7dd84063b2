//! Custom recognitions: server iteration state and on-screen lookups.

use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, info};

use crate::config::NodeNames;
use crate::cursor::{IterationCursor, NextServerDetail, ServerListDetail};
use crate::host::{AgentError, AgentResult, Context, RecoOutcome, RecognitionRequest, Rect};
use crate::range::parse_server_range;
use crate::regions::{ServerPage, ServerRegionTable, PAGE_CHECK_ROI};
use crate::registry::{AnalyzeArg, CustomRecognition};

/// Server currently being processed, from the latest `GetNextServer` record.
pub fn current_target(ctx: &dyn Context, nodes: &NodeNames) -> AgentResult<u32> {
    let detail: NextServerDetail = ctx.require_node(&nodes.next_server)?.detail()?;
    detail.server_id.ok_or_else(|| AgentError::MissingField {
        node: nodes.next_server.clone(),
        field: "server_id".to_string(),
    })
}

/// Detail shared by the OCR-backed lookups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocateDetail {
    pub server_id: u32,
    pub roi_used: Rect,
    pub ocr_result: Option<String>,
    pub hit: bool,
}

fn ocr_lookup(ctx: &mut dyn Context, arg: &AnalyzeArg, server_id: u32, request: RecognitionRequest) -> AgentResult<RecoOutcome> {
    let roi = request.roi.unwrap_or_else(Rect::zero);
    let result = ctx.run_recognition(&request, arg.image)?.unwrap_or_default();
    let bbox = result.hit_box();
    let detail = LocateDetail {
        server_id,
        roi_used: roi,
        ocr_result: bbox.and(result.text),
        hit: bbox.is_some(),
    };
    debug!(node = %request.node, server_id, hit = detail.hit, "ocr lookup");
    Ok(RecoOutcome {
        bbox,
        detail: json!(detail),
    })
}

/// `ParseServerRange`: expands the range parameter into the server list.
pub struct ParseServerRange;

impl CustomRecognition for ParseServerRange {
    fn analyze(&self, _ctx: &mut dyn Context, arg: &AnalyzeArg) -> AgentResult<RecoOutcome> {
        let server_list = parse_server_range(arg.param)?;
        info!(count = server_list.len(), servers = ?server_list, "server list parsed");
        Ok(RecoOutcome::hit(
            Rect::new(0, 0, 100, 100),
            json!(ServerListDetail { server_list }),
        ))
    }
}

/// `GetNextServer`: dispatches the next server, or reports the list finished.
pub struct GetNextServer {
    nodes: Arc<NodeNames>,
}

impl GetNextServer {
    pub fn new(nodes: Arc<NodeNames>) -> Self {
        Self { nodes }
    }
}

impl CustomRecognition for GetNextServer {
    fn analyze(&self, ctx: &mut dyn Context, _arg: &AnalyzeArg) -> AgentResult<RecoOutcome> {
        let list: ServerListDetail = ctx.require_node(&self.nodes.parse_server)?.detail()?;
        let previous = match ctx.latest_node(&self.nodes.next_server) {
            Some(node) if node.recognition.is_some() => Some(node.detail::<NextServerDetail>()?),
            _ => None,
        };

        let step = IterationCursor::resume(&list.server_list, previous.as_ref()).advance();
        match step.server_id() {
            Some(id) => info!(server_id = id, "next server"),
            None => info!(count = list.server_list.len(), "all servers dispatched"),
        }
        Ok(RecoOutcome::hit(Rect::zero(), json!(NextServerDetail::from(step))))
    }
}

/// `DetectServerPage`: finds the tab ("1-999" or "1000+") holding the target.
pub struct DetectServerPage {
    nodes: Arc<NodeNames>,
}

impl DetectServerPage {
    pub fn new(nodes: Arc<NodeNames>) -> Self {
        Self { nodes }
    }
}

impl CustomRecognition for DetectServerPage {
    fn analyze(&self, ctx: &mut dyn Context, arg: &AnalyzeArg) -> AgentResult<RecoOutcome> {
        let server_id = current_target(ctx, &self.nodes)?;
        let page = ServerPage::for_server(server_id);
        let request = RecognitionRequest::ocr(
            self.nodes.check_page.as_str(),
            PAGE_CHECK_ROI,
            page.expected_pattern(),
        );
        ocr_lookup(ctx, arg, server_id, request)
    }
}

/// `LocateServerButton`: verifies the target's button by OCR inside its
/// recorded region, or inside the scrolled list for unrecorded 1000+ IDs.
pub struct LocateServerButton {
    nodes: Arc<NodeNames>,
    table: Arc<ServerRegionTable>,
}

impl LocateServerButton {
    pub fn new(nodes: Arc<NodeNames>, table: Arc<ServerRegionTable>) -> Self {
        Self { nodes, table }
    }
}

impl CustomRecognition for LocateServerButton {
    fn analyze(&self, ctx: &mut dyn Context, arg: &AnalyzeArg) -> AgentResult<RecoOutcome> {
        let server_id = current_target(ctx, &self.nodes)?;
        let roi = self
            .table
            .search_roi(server_id)
            .ok_or(AgentError::UnknownServer(server_id))?;
        let request = RecognitionRequest::ocr(
            self.nodes.server_button.as_str(),
            roi,
            format!(".*{}.*", server_id),
        );
        ocr_lookup(ctx, arg, server_id, request)
    }
}

/// `AllCompleted`: hits once the cursor has run off the end of the list.
pub struct AllCompleted {
    nodes: Arc<NodeNames>,
}

impl AllCompleted {
    pub fn new(nodes: Arc<NodeNames>) -> Self {
        Self { nodes }
    }
}

impl CustomRecognition for AllCompleted {
    fn analyze(&self, ctx: &mut dyn Context, _arg: &AnalyzeArg) -> AgentResult<RecoOutcome> {
        let detail: NextServerDetail = ctx.require_node(&self.nodes.next_server)?.detail()?;
        if detail.finished {
            Ok(RecoOutcome::hit(Rect::zero(), json!({ "finished": true })))
        } else {
            Ok(RecoOutcome::miss(json!({})))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountNameDetail {
    #[serde(rename = "AccountName")]
    pub account_name: String,
}

/// `GenerateAccountName`: builds `{prefix}_{server_id}`.
pub struct GenerateAccountName {
    nodes: Arc<NodeNames>,
}

impl GenerateAccountName {
    pub fn new(nodes: Arc<NodeNames>) -> Self {
        Self { nodes }
    }
}

impl CustomRecognition for GenerateAccountName {
    fn analyze(&self, ctx: &mut dyn Context, arg: &AnalyzeArg) -> AgentResult<RecoOutcome> {
        let server_id = current_target(ctx, &self.nodes)?;
        let prefix = arg.param.trim().trim_matches('"');
        if prefix.is_empty() {
            return Err(AgentError::InvalidParameter("account prefix is empty".to_string()));
        }
        let account_name = format!("{}_{}", prefix, server_id);
        info!(%account_name, "account name generated");
        Ok(RecoOutcome::hit(
            Rect::zero(),
            json!(AccountNameDetail { account_name }),
        ))
    }
}
