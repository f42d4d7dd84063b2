use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::host::{AgentError, AgentResult, Key};
use crate::pacing::Pacing;
use crate::popup::{self, Dismissal, PopupSignature};
use crate::regions::RegionOverride;

/// Pipeline node names the handlers read from or run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeNames {
    pub parse_server: String,
    pub next_server: String,
    pub account_prefix: String,
    pub down_arrow: String,
    pub check_page: String,
    pub server_button: String,
    pub remain_popup: String,
}

impl Default for NodeNames {
    fn default() -> Self {
        Self {
            parse_server: "ParseServer".to_string(),
            next_server: "GetNextServer".to_string(),
            account_prefix: "GetAccountPrefix".to_string(),
            down_arrow: "FindDownArrow".to_string(),
            check_page: "MyCheckPage".to_string(),
            server_button: "MyServerButton".to_string(),
            remain_popup: "CheckRemainPopup".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PopupConfig {
    pub max_passes: u32,
    pub escape_presses: u32,
    /// Blank spot tapped before Escape when closing the leftover popup.
    pub dismiss_point: [i32; 2],
    pub signatures: Vec<PopupSignature>,
}

impl Default for PopupConfig {
    fn default() -> Self {
        Self {
            max_passes: 10,
            escape_presses: 5,
            dismiss_point: popup::DEFAULT_DISMISS_POINT,
            signatures: popup::default_signatures(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    pub nodes: NodeNames,
    pub pacing: Pacing,
    pub popups: PopupConfig,
    pub servers: Vec<RegionOverride>,
}

impl AgentConfig {
    pub fn load(path: impl AsRef<Path>) -> AgentResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| AgentError::Config(format!("cannot read {}: {}", path.display(), e)))?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> AgentResult<Self> {
        toml::from_str(content).map_err(|e| AgentError::Config(e.to_string()))
    }

    pub fn with_pacing(mut self, pacing: Pacing) -> Self {
        self.pacing = pacing;
        self
    }

    pub fn with_max_passes(mut self, max_passes: u32) -> Self {
        self.popups.max_passes = max_passes;
        self
    }

    pub fn with_escape_presses(mut self, presses: u32) -> Self {
        self.popups.escape_presses = presses;
        self
    }

    pub fn with_region(mut self, region: RegionOverride) -> Self {
        self.servers.push(region);
        self
    }

    /// Signature used by the fast-escape action for whatever survives the
    /// Escape presses.
    pub fn leftover_popup(&self) -> PopupSignature {
        let [x, y] = self.popups.dismiss_point;
        PopupSignature::new(
            "leftover popup",
            &self.nodes.remain_popup,
            Dismissal::TapThenKey { x, y, key: Key::Escape },
        )
    }
}
