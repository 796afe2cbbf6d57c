use crate::agent::FrameAgent;
use crate::aggregator::{RootAggregator, RootAggregatorConfig};
use crate::collect::StaticFields;
use crate::error::{CollectorError, Result};
use crate::topology::ChannelTopology;
use framefield_protocol::{FieldRecord, FieldsLoaded, Report};
use serde::Deserialize;
use tokio::sync::{broadcast, mpsc};

/// Declarative description of one frame and its subtree, to arbitrary
/// depth.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FrameSpec {
    #[serde(default)]
    pub fields: Vec<FieldRecord>,
    #[serde(default)]
    pub children: Vec<FrameSpec>,
}

/// Spawns one task per frame over a star-topology channel and starts the
/// root's aggregation loop.
///
/// Every non-root frame gets a clone of the root's sender and reports
/// exactly once, in whatever order the scheduler produces; the root
/// tolerates any arrival order. The returned receiver was subscribed
/// before any frame could report, so the completion event cannot be
/// missed.
pub fn spawn_tree(
    spec: FrameSpec,
    config: RootAggregatorConfig,
) -> (RootAggregator, broadcast::Receiver<FieldsLoaded>) {
    let (to_root, reports) = mpsc::unbounded_channel();

    let root_agent = FrameAgent::new(
        StaticFields::new(spec.fields),
        ChannelTopology::new(true, spec.children.len(), to_root.clone()),
    );
    let own_fields = root_agent.collect_own_fields();
    let child_count = root_agent.immediate_child_count();

    for child in spec.children {
        spawn_subtree(child, to_root.clone());
    }
    // The root never sends; dropping its sender lets the loop observe
    // channel closure once every frame task is done.
    drop(to_root);

    RootAggregator::start(own_fields, child_count, reports, config)
}

fn spawn_subtree(spec: FrameSpec, to_root: mpsc::UnboundedSender<Report>) {
    let FrameSpec { fields, children } = spec;
    let agent = FrameAgent::new(
        StaticFields::new(fields),
        ChannelTopology::new(false, children.len(), to_root.clone()),
    );
    tokio::spawn(async move {
        agent.forward();
    });
    for child in children {
        spawn_subtree(child, to_root.clone());
    }
}

/// Runs a frame tree to completion and returns the sorted fields.
pub async fn run_tree(spec: FrameSpec) -> Result<FieldsLoaded> {
    let (_root, mut completion) = spawn_tree(spec, RootAggregatorConfig::default());
    completion
        .recv()
        .await
        .map_err(|e| CollectorError::Other(format!("completion event lost: {e}")))
}
