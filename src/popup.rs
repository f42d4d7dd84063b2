//! Login popup detection and dismissal.
//!
//! A pass takes one screenshot, tests every known signature against it in
//! priority order and dismisses each one that matches. The loop ends on the
//! first clean pass, or fails once `max_passes` passes have all found something.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::host::{AgentError, AgentResult, Context, Key, RecognitionRequest, Rect};
use crate::pacing::Pacing;

pub const DEFAULT_DISMISS_POINT: [i32; 2] = [680, 400];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Dismissal {
    /// Tap the centre of the matched box.
    TapMatch,
    /// Tap a fixed blank spot, then press a key.
    TapThenKey { x: i32, y: i32, key: Key },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopupSignature {
    pub name: String,
    /// Pipeline recognition node that detects the popup.
    pub node: String,
    pub dismissal: Dismissal,
}

impl PopupSignature {
    pub fn new(name: &str, node: &str, dismissal: Dismissal) -> Self {
        Self {
            name: name.to_string(),
            node: node.to_string(),
            dismissal,
        }
    }
}

pub fn default_signatures() -> Vec<PopupSignature> {
    let [x, y] = DEFAULT_DISMISS_POINT;
    vec![
        PopupSignature::new("announcement", "CheckAnnouncement", Dismissal::TapMatch),
        PopupSignature::new(
            "welfare hall",
            "CheckWelfare",
            Dismissal::TapThenKey { x, y, key: Key::Escape },
        ),
        PopupSignature::new(
            "return gift",
            "CheckReturnGift",
            Dismissal::TapThenKey { x, y, key: Key::Escape },
        ),
    ]
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DismissReport {
    /// Passes taken, including the final clean one.
    pub passes: u32,
    /// Signature names in the order they were dismissed.
    pub dismissed: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct PopupDismisser {
    signatures: Vec<PopupSignature>,
    max_passes: u32,
    pacing: Pacing,
}

impl PopupDismisser {
    pub fn new(signatures: Vec<PopupSignature>, max_passes: u32, pacing: Pacing) -> Self {
        Self {
            signatures,
            max_passes: max_passes.max(1),
            pacing,
        }
    }

    pub fn signatures(&self) -> &[PopupSignature] {
        &self.signatures
    }

    pub fn max_passes(&self) -> u32 {
        self.max_passes
    }

    pub fn dismiss_all(&self, ctx: &mut dyn Context) -> AgentResult<DismissReport> {
        let mut report = DismissReport::default();

        for pass in 1..=self.max_passes {
            report.passes = pass;
            let image = ctx.screencap()?;
            let mut found = false;

            for sig in &self.signatures {
                let request = RecognitionRequest::node(sig.node.as_str());
                if let Some(bbox) = ctx.find(&request, &image)? {
                    found = true;
                    info!(popup = %sig.name, pass, "popup detected, closing");
                    dismiss(ctx, &sig.dismissal, bbox, &self.pacing)?;
                    report.dismissed.push(sig.name.clone());
                }
            }

            if !found {
                debug!(passes = pass, "no popups left");
                return Ok(report);
            }
        }

        warn!(max_passes = self.max_passes, "popups still present, giving up");
        Err(AgentError::PopupsNotCleared {
            passes: self.max_passes,
        })
    }
}

/// Performs one signature's dismissal gesture.
pub fn dismiss(ctx: &mut dyn Context, dismissal: &Dismissal, matched: Rect, pacing: &Pacing) -> AgentResult<()> {
    match dismissal {
        Dismissal::TapMatch => {
            pacing.pause();
            ctx.click_center(matched)?;
            pacing.pause();
        }
        Dismissal::TapThenKey { x, y, key } => {
            ctx.click(*x, *y)?;
            pacing.pause();
            ctx.click_key(*key)?;
            pacing.pause();
        }
    }
    Ok(())
}

/// Presses Escape a fixed number of times, then clears one leftover popup.
#[derive(Debug, Clone)]
pub struct FastEscape {
    presses: u32,
    leftover: PopupSignature,
    pacing: Pacing,
}

impl FastEscape {
    pub fn new(presses: u32, leftover: PopupSignature, pacing: Pacing) -> Self {
        Self {
            presses,
            leftover,
            pacing,
        }
    }

    /// Returns whether the leftover popup was found and closed.
    pub fn run(&self, ctx: &mut dyn Context) -> AgentResult<bool> {
        for _ in 0..self.presses {
            ctx.click_key(Key::Escape)?;
            self.pacing.pause();
        }

        let image = ctx.screencap()?;
        let request = RecognitionRequest::node(self.leftover.node.as_str());
        match ctx.find(&request, &image)? {
            Some(bbox) => {
                info!(popup = %self.leftover.name, "leftover popup after escapes, closing");
                dismiss(ctx, &self.leftover.dismissal, bbox, &self.pacing)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
