//! Walks the parsed server list one entry per pipeline tick.
//!
//! The cursor holds no state of its own between ticks: the index is read back
//! from the latest `GetNextServer` detail the host recorded, so re-running the
//! step with the same stored index yields the same answer.

use serde::{Deserialize, Serialize};

/// Detail record written by `ParseServerRange`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerListDetail {
    pub server_list: Vec<u32>,
}

/// Detail record written by `GetNextServer`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NextServerDetail {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_id: Option<u32>,
    #[serde(default)]
    pub server_index: usize,
    #[serde(default)]
    pub server_cnt: usize,
    pub finished: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorStep {
    /// `index` is the position after this dispatch.
    Next { server_id: u32, index: usize, count: usize },
    Finished { index: usize, count: usize },
}

impl CursorStep {
    pub fn server_id(&self) -> Option<u32> {
        match self {
            CursorStep::Next { server_id, .. } => Some(*server_id),
            CursorStep::Finished { .. } => None,
        }
    }

    pub fn is_finished(&self) -> bool {
        matches!(self, CursorStep::Finished { .. })
    }
}

impl From<CursorStep> for NextServerDetail {
    fn from(step: CursorStep) -> Self {
        match step {
            CursorStep::Next { server_id, index, count } => Self {
                server_id: Some(server_id),
                server_index: index,
                server_cnt: count,
                finished: false,
            },
            CursorStep::Finished { index, count } => Self {
                server_id: None,
                server_index: index,
                server_cnt: count,
                finished: true,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IterationCursor<'a> {
    servers: &'a [u32],
    index: usize,
}

impl<'a> IterationCursor<'a> {
    /// Out-of-range stored indices clamp to the end of the list.
    pub fn new(servers: &'a [u32], index: usize) -> Self {
        Self {
            servers,
            index: index.min(servers.len()),
        }
    }

    /// Resumes from the previous `GetNextServer` record, or from the start
    /// when the step has not run yet.
    pub fn resume(servers: &'a [u32], previous: Option<&NextServerDetail>) -> Self {
        Self::new(servers, previous.map_or(0, |p| p.server_index))
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn is_finished(&self) -> bool {
        self.index >= self.servers.len()
    }

    pub fn advance(&self) -> CursorStep {
        let count = self.servers.len();
        match self.servers.get(self.index) {
            Some(&server_id) => CursorStep::Next {
                server_id,
                index: self.index + 1,
                count,
            },
            None => CursorStep::Finished { index: count, count },
        }
    }
}
