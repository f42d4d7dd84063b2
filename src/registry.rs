//! Registration names → handlers, and the boundary where handler errors turn
//! into the host's plain failure signals.

use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info_span, warn};

use crate::actions::{FastEsc, HandleLoginPopups, PasteAccountName, PreciseClick, ScrollToTargetServer};
use crate::config::AgentConfig;
use crate::host::{AgentResult, Context, RecoOutcome, Rect, Screenshot};
use crate::popup::{FastEscape, PopupDismisser};
use crate::recognitions::{
    AllCompleted, DetectServerPage, GenerateAccountName, GetNextServer, LocateServerButton, ParseServerRange,
};
use crate::regions::ServerRegionTable;

pub struct AnalyzeArg<'a> {
    pub image: &'a Screenshot,
    /// `custom_recognition_param` from the pipeline, usually a JSON string.
    pub param: &'a str,
}

#[derive(Debug, Clone, Default)]
pub struct RunArg<'a> {
    pub param: &'a str,
    /// Box matched by the node's own recognition, if any.
    pub bbox: Option<Rect>,
}

pub trait CustomRecognition: Send + Sync {
    fn analyze(&self, ctx: &mut dyn Context, arg: &AnalyzeArg) -> AgentResult<RecoOutcome>;
}

pub trait CustomAction: Send + Sync {
    fn run(&self, ctx: &mut dyn Context, arg: &RunArg) -> AgentResult<bool>;
}

#[derive(Default)]
pub struct AgentRegistry {
    recognitions: HashMap<String, Box<dyn CustomRecognition>>,
    actions: HashMap<String, Box<dyn CustomAction>>,
}

impl AgentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers every built-in handler. The region table is built here, once.
    pub fn with_defaults(config: &AgentConfig) -> Self {
        let nodes = Arc::new(config.nodes.clone());
        let table = Arc::new(ServerRegionTable::with_overrides(&config.servers));
        let pacing = config.pacing;

        let mut registry = Self::new();
        registry
            .register_recognition("ParseServerRange", ParseServerRange)
            .register_recognition("GetNextServer", GetNextServer::new(Arc::clone(&nodes)))
            .register_recognition("DetectServerPage", DetectServerPage::new(Arc::clone(&nodes)))
            .register_recognition(
                "LocateServerButton",
                LocateServerButton::new(Arc::clone(&nodes), table),
            )
            .register_recognition("AllCompleted", AllCompleted::new(Arc::clone(&nodes)))
            .register_recognition("GenerateAccountName", GenerateAccountName::new(Arc::clone(&nodes)));

        registry
            .register_action(
                "ScrollToTargetServer",
                ScrollToTargetServer::new(Arc::clone(&nodes), pacing),
            )
            .register_action(
                "HandleLoginPopups",
                HandleLoginPopups::new(PopupDismisser::new(
                    config.popups.signatures.clone(),
                    config.popups.max_passes,
                    pacing,
                )),
            )
            .register_action("PreciseClick", PreciseClick)
            .register_action(
                "fastESC",
                FastEsc::new(FastEscape::new(
                    config.popups.escape_presses,
                    config.leftover_popup(),
                    pacing,
                )),
            )
            .register_action("PasteAccountName", PasteAccountName::new(nodes));

        registry
    }

    pub fn register_recognition(
        &mut self,
        name: &str,
        handler: impl CustomRecognition + 'static,
    ) -> &mut Self {
        self.recognitions.insert(name.to_string(), Box::new(handler));
        self
    }

    pub fn register_action(&mut self, name: &str, handler: impl CustomAction + 'static) -> &mut Self {
        self.actions.insert(name.to_string(), Box::new(handler));
        self
    }

    pub fn recognition_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.recognitions.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn action_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.actions.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Runs a custom recognition. Any failure is reported as a miss.
    pub fn analyze(&self, name: &str, ctx: &mut dyn Context, arg: &AnalyzeArg) -> RecoOutcome {
        let _span = info_span!("recognition", name).entered();
        let Some(handler) = self.recognitions.get(name) else {
            warn!("no recognition registered under this name");
            return RecoOutcome::miss(json!({}));
        };
        match handler.analyze(ctx, arg) {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(error = %e, "recognition failed");
                RecoOutcome::miss(json!({}))
            }
        }
    }

    /// Runs a custom action. Any failure is reported as `false`.
    pub fn run_action(&self, name: &str, ctx: &mut dyn Context, arg: &RunArg) -> bool {
        let _span = info_span!("action", name).entered();
        let Some(handler) = self.actions.get(name) else {
            warn!("no action registered under this name");
            return false;
        };
        match handler.run(ctx, arg) {
            Ok(done) => done,
            Err(e) => {
                warn!(error = %e, "action failed");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_register_every_handler() {
        let registry = AgentRegistry::with_defaults(&AgentConfig::default());
        assert_eq!(
            registry.recognition_names(),
            [
                "AllCompleted",
                "DetectServerPage",
                "GenerateAccountName",
                "GetNextServer",
                "LocateServerButton",
                "ParseServerRange",
            ]
        );
        assert_eq!(
            registry.action_names(),
            [
                "HandleLoginPopups",
                "PasteAccountName",
                "PreciseClick",
                "ScrollToTargetServer",
                "fastESC",
            ]
        );
    }
}
