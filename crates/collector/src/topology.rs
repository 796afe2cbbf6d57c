use crate::error::{CollectorError, Result};
use framefield_protocol::Report;
use tokio::sync::mpsc;

/// Where this frame sits in the tree and how to reach the root.
///
/// `send_to_root` is fire-and-forget: unordered, no acknowledgment, and
/// no sender authentication. Exactly-once delivery is a precondition of
/// the protocol, not something it verifies; a duplicated delivery would
/// corrupt the root's counters.
pub trait TopologyProbe {
    fn is_root(&self) -> bool;

    fn immediate_child_count(&self) -> usize;

    fn send_to_root(&self, report: Report) -> Result<()>;
}

/// Star-topology probe: every frame holds a clone of the root's sender,
/// so reports skip intermediate frames entirely.
#[derive(Debug, Clone)]
pub struct ChannelTopology {
    root: bool,
    child_count: usize,
    to_root: mpsc::UnboundedSender<Report>,
}

impl ChannelTopology {
    pub fn new(root: bool, child_count: usize, to_root: mpsc::UnboundedSender<Report>) -> Self {
        Self {
            root,
            child_count,
            to_root,
        }
    }
}

impl TopologyProbe for ChannelTopology {
    fn is_root(&self) -> bool {
        self.root
    }

    fn immediate_child_count(&self) -> usize {
        self.child_count
    }

    fn send_to_root(&self, report: Report) -> Result<()> {
        self.to_root
            .send(report)
            .map_err(|e| CollectorError::TransportClosed(e.to_string()))
    }
}
