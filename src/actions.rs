//! Custom actions: taps, key presses and text input.

use std::sync::Arc;
use tracing::{info, warn};

use crate::config::NodeNames;
use crate::host::{AgentResult, Context, RecognitionRequest};
use crate::pacing::Pacing;
use crate::popup::{FastEscape, PopupDismisser};
use crate::recognitions::{current_target, AccountNameDetail};
use crate::regions::ServerPage;
use crate::registry::{CustomAction, RunArg};

/// `ScrollToTargetServer`: on the "1000+" page, taps the down arrow twice to
/// reveal the lower rows.
pub struct ScrollToTargetServer {
    nodes: Arc<NodeNames>,
    pacing: Pacing,
}

impl ScrollToTargetServer {
    pub fn new(nodes: Arc<NodeNames>, pacing: Pacing) -> Self {
        Self { nodes, pacing }
    }
}

impl CustomAction for ScrollToTargetServer {
    fn run(&self, ctx: &mut dyn Context, _arg: &RunArg) -> AgentResult<bool> {
        let server_id = current_target(ctx, &self.nodes)?;
        if !ServerPage::for_server(server_id).needs_scroll() {
            return Ok(true);
        }

        let image = ctx.screencap()?;
        let request = RecognitionRequest::node(self.nodes.down_arrow.as_str());
        let Some(arrow) = ctx.find(&request, &image)? else {
            warn!(server_id, node = %self.nodes.down_arrow, "down arrow not found");
            return Ok(false);
        };

        ctx.click_center(arrow)?;
        self.pacing.pause();
        ctx.click_center(arrow)?;
        Ok(true)
    }
}

/// `HandleLoginPopups`
pub struct HandleLoginPopups {
    dismisser: PopupDismisser,
}

impl HandleLoginPopups {
    pub fn new(dismisser: PopupDismisser) -> Self {
        Self { dismisser }
    }
}

impl CustomAction for HandleLoginPopups {
    fn run(&self, ctx: &mut dyn Context, _arg: &RunArg) -> AgentResult<bool> {
        let report = self.dismisser.dismiss_all(ctx)?;
        info!(passes = report.passes, dismissed = ?report.dismissed, "login popups cleared");
        Ok(true)
    }
}

/// `PreciseClick`: taps the centre of the box the pipeline matched.
pub struct PreciseClick;

impl CustomAction for PreciseClick {
    fn run(&self, ctx: &mut dyn Context, arg: &RunArg) -> AgentResult<bool> {
        match arg.bbox {
            Some(bbox) => {
                ctx.click_center(bbox)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

/// `fastESC`
pub struct FastEsc {
    escape: FastEscape,
}

impl FastEsc {
    pub fn new(escape: FastEscape) -> Self {
        Self { escape }
    }
}

impl CustomAction for FastEsc {
    fn run(&self, ctx: &mut dyn Context, _arg: &RunArg) -> AgentResult<bool> {
        self.escape.run(ctx)?;
        Ok(true)
    }
}

/// `PasteAccountName`: types the name `GenerateAccountName` produced.
pub struct PasteAccountName {
    nodes: Arc<NodeNames>,
}

impl PasteAccountName {
    pub fn new(nodes: Arc<NodeNames>) -> Self {
        Self { nodes }
    }
}

impl CustomAction for PasteAccountName {
    fn run(&self, ctx: &mut dyn Context, _arg: &RunArg) -> AgentResult<bool> {
        let detail: AccountNameDetail = ctx.require_node(&self.nodes.account_prefix)?.detail()?;
        ctx.input_text(&detail.account_name)?;
        info!(account_name = %detail.account_name, "account name pasted");
        Ok(true)
    }
}
