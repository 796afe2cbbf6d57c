use crate::collect::LocalCollector;
use crate::topology::TopologyProbe;
use framefield_protocol::{FieldRecord, Report};
use log::{error, warn};

/// Per-frame logic: collect the frame's own fields and either forward
/// them toward the root or, on the root itself, seed the aggregator.
///
/// Every error is contained at this boundary. A frame that fails to
/// collect or send never crashes, and never blocks sibling frames.
pub struct FrameAgent<C, T> {
    collector: C,
    topology: T,
}

impl<C, T> FrameAgent<C, T>
where
    C: LocalCollector,
    T: TopologyProbe,
{
    pub fn new(collector: C, topology: T) -> Self {
        Self {
            collector,
            topology,
        }
    }

    #[must_use]
    pub fn is_root(&self) -> bool {
        self.topology.is_root()
    }

    #[must_use]
    pub fn immediate_child_count(&self) -> usize {
        self.topology.immediate_child_count()
    }

    /// Collects this frame's fields, swallowing collection failures.
    ///
    /// A failed collection degrades to an empty list so the frame can
    /// still report its child count; sending nothing would leave the
    /// root's expected count permanently unreachable.
    pub fn collect_own_fields(&self) -> Vec<FieldRecord> {
        match self.collector.collect_fields() {
            Ok(fields) => fields,
            Err(e) => {
                error!("field collection failed: {e}");
                Vec::new()
            }
        }
    }

    /// Non-root path: build this frame's report and send it to the root.
    ///
    /// Fire-and-forget; there is no response path and no confirmation.
    /// Transport failures are logged and otherwise indistinguishable
    /// from a message still in flight.
    pub fn forward(&self) {
        let report = Report::new(
            self.collect_own_fields(),
            self.topology.immediate_child_count(),
        );
        if let Err(e) = self.topology.send_to_root(report) {
            warn!("report send failed: {e}");
        }
    }
}
