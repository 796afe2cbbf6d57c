use crate::notify::CompletionNotifier;
use crate::sort::sort_fields;
use framefield_protocol::{FieldRecord, FieldsLoaded, Report};
use log::{debug, info, warn};
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc, watch};

/// Snapshot of the root's accumulation counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AggregatorProgress {
    pub processed_count: usize,
    pub expected_count: usize,
    pub completed: bool,
}

/// Root-resident accumulation state machine.
///
/// Exists only on the root frame and is mutated only by the root's own
/// message handling; no other frame can read or write it. Completion is
/// evaluated once per report, never polled.
#[derive(Debug)]
pub struct Aggregator {
    merged_fields: Vec<FieldRecord>,
    processed_count: usize,
    expected_count: usize,
    completed: bool,
}

impl Aggregator {
    /// Seeds the state with the root's own fields and immediate child
    /// count. `expected_count` only ever grows from here, by the
    /// descendant count of each incoming report.
    pub fn new(own_fields: Vec<FieldRecord>, immediate_child_count: usize) -> Self {
        Self {
            merged_fields: own_fields,
            processed_count: 0,
            expected_count: immediate_child_count,
            completed: false,
        }
    }

    /// Folds one report into the state and evaluates completion.
    ///
    /// Returns the final sorted fields when this report completes the
    /// tree, `None` otherwise. Reports arriving after completion are
    /// dropped without mutating anything; the terminal state is
    /// idempotent.
    pub fn on_report(&mut self, report: Report) -> Option<Vec<FieldRecord>> {
        if self.completed {
            debug!(
                "dropping report after completion ({} fields, {} descendants)",
                report.fields.len(),
                report.descendant_count
            );
            return None;
        }

        self.merged_fields.extend(report.fields);
        self.processed_count += 1;
        self.expected_count += report.descendant_count;

        if self.processed_count != self.expected_count {
            return None;
        }

        self.completed = true;
        let mut fields = std::mem::take(&mut self.merged_fields);
        sort_fields(&mut fields);
        Some(fields)
    }

    /// A root with no children is already complete at seed time; no
    /// report will ever arrive to trigger the per-arrival check.
    pub fn complete_if_childless(&mut self) -> Option<Vec<FieldRecord>> {
        if self.completed || self.expected_count != 0 {
            return None;
        }
        self.completed = true;
        let mut fields = std::mem::take(&mut self.merged_fields);
        sort_fields(&mut fields);
        Some(fields)
    }

    #[must_use]
    pub const fn progress(&self) -> AggregatorProgress {
        AggregatorProgress {
            processed_count: self.processed_count,
            expected_count: self.expected_count,
            completed: self.completed,
        }
    }

    #[must_use]
    pub const fn is_completed(&self) -> bool {
        self.completed
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RootAggregatorConfig {
    /// Capacity of the completion broadcast channel.
    pub event_capacity: usize,
}

impl Default for RootAggregatorConfig {
    fn default() -> Self {
        Self { event_capacity: 8 }
    }
}

/// Handle to the root's aggregation loop.
///
/// The loop and all aggregation state live in a spawned task; the handle
/// only exposes the completion event and a progress surface.
#[derive(Clone)]
pub struct RootAggregator {
    inner: Arc<RootAggregatorInner>,
}

struct RootAggregatorInner {
    completion_tx: broadcast::Sender<FieldsLoaded>,
    progress_tx: watch::Sender<AggregatorProgress>,
}

impl RootAggregator {
    /// Spawns the root's event loop over `reports`.
    ///
    /// Also returns a completion subscription created before the loop
    /// starts, so the caller cannot lose the event to a fast tree.
    /// Further subscribers obtained from [`subscribe_completion`]
    /// observe one-shot semantics: attaching after the event fired
    /// yields nothing.
    ///
    /// [`subscribe_completion`]: RootAggregator::subscribe_completion
    pub fn start(
        own_fields: Vec<FieldRecord>,
        immediate_child_count: usize,
        reports: mpsc::UnboundedReceiver<Report>,
        config: RootAggregatorConfig,
    ) -> (Self, broadcast::Receiver<FieldsLoaded>) {
        let (completion_tx, completion_rx) = broadcast::channel(config.event_capacity.max(1));
        let aggregator = Aggregator::new(own_fields, immediate_child_count);
        let (progress_tx, _) = watch::channel(aggregator.progress());

        spawn_root_loop(
            aggregator,
            reports,
            completion_tx.clone(),
            progress_tx.clone(),
        );

        let handle = Self {
            inner: Arc::new(RootAggregatorInner {
                completion_tx,
                progress_tx,
            }),
        };
        (handle, completion_rx)
    }

    #[must_use]
    pub fn subscribe_completion(&self) -> broadcast::Receiver<FieldsLoaded> {
        self.inner.completion_tx.subscribe()
    }

    #[must_use]
    pub fn progress_snapshot(&self) -> AggregatorProgress {
        *self.inner.progress_tx.subscribe().borrow()
    }

    #[must_use]
    pub fn progress_stream(&self) -> watch::Receiver<AggregatorProgress> {
        self.inner.progress_tx.subscribe()
    }
}

fn spawn_root_loop(
    mut aggregator: Aggregator,
    mut reports: mpsc::UnboundedReceiver<Report>,
    completion_tx: broadcast::Sender<FieldsLoaded>,
    progress_tx: watch::Sender<AggregatorProgress>,
) {
    tokio::spawn(async move {
        let mut notifier = CompletionNotifier::new(completion_tx);

        if let Some(fields) = aggregator.complete_if_childless() {
            info!("root has no children; dispatching {} fields", fields.len());
            let _ = progress_tx.send(aggregator.progress());
            notifier.fire(FieldsLoaded { fields });
        }

        while let Some(report) = reports.recv().await {
            let finished = aggregator.on_report(report);
            let _ = progress_tx.send(aggregator.progress());
            if let Some(fields) = finished {
                info!(
                    "all frames reported; dispatching {} sorted fields",
                    fields.len()
                );
                notifier.fire(FieldsLoaded { fields });
            }
        }

        // Channel closed with the tree incomplete: the missing frames can
        // never report now. There is no timeout or retry in the protocol,
        // so this is only worth a log line.
        if !aggregator.is_completed() {
            let progress = aggregator.progress();
            warn!(
                "report channel closed before completion ({}/{} reports)",
                progress.processed_count, progress.expected_count
            );
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use framefield_protocol::FieldRecord;
    use pretty_assertions::assert_eq;

    fn record(name: &str, label: &str) -> FieldRecord {
        FieldRecord::new(name, label)
    }

    #[test]
    fn expected_count_grows_with_descendant_counts() {
        let mut agg = Aggregator::new(Vec::new(), 1);
        assert_eq!(agg.progress().expected_count, 1);

        assert!(agg.on_report(Report::new(Vec::new(), 2)).is_none());
        let progress = agg.progress();
        assert_eq!(progress.processed_count, 1);
        assert_eq!(progress.expected_count, 3);
        assert!(!progress.completed);
    }

    #[test]
    fn completes_exactly_when_counts_meet() {
        let mut agg = Aggregator::new(vec![record("root", "Root")], 2);

        assert!(agg
            .on_report(Report::new(vec![record("b", "B")], 0))
            .is_none());
        let fields = agg
            .on_report(Report::new(vec![record("a", "A")], 0))
            .expect("second report completes");

        assert_eq!(
            fields,
            vec![record("a", "A"), record("b", "B"), record("root", "Root")]
        );
        assert!(agg.is_completed());
    }

    #[test]
    fn reports_after_completion_mutate_nothing() {
        let mut agg = Aggregator::new(Vec::new(), 1);
        agg.on_report(Report::new(vec![record("a", "A")], 0))
            .expect("completes");
        let before = agg.progress();

        assert!(agg
            .on_report(Report::new(vec![record("z", "Z")], 5))
            .is_none());
        assert_eq!(agg.progress(), before);
    }

    #[test]
    fn completion_point_is_arrival_order_independent() {
        // Three-level tree: root(1 child) -> child(1 grandchild) -> leaf.
        let reports = vec![
            Report::new(vec![record("child", "Child")], 1),
            Report::new(vec![record("leaf", "Leaf")], 0),
        ];

        for (first, second) in [(0, 1), (1, 0)] {
            let mut agg = Aggregator::new(vec![record("root", "Root")], 1);
            assert!(agg.on_report(reports[first].clone()).is_none());
            let fields = agg
                .on_report(reports[second].clone())
                .expect("second arrival completes regardless of order");
            let names: Vec<&str> = fields.iter().map(FieldRecord::key).collect();
            assert_eq!(names, vec!["child", "leaf", "root"]);
        }
    }

    #[test]
    fn childless_root_is_complete_at_seed_time() {
        let mut agg = Aggregator::new(vec![record("b", "B"), record("a", "A")], 0);
        let fields = agg.complete_if_childless().expect("already complete");
        assert_eq!(fields, vec![record("a", "A"), record("b", "B")]);
        assert!(agg.complete_if_childless().is_none());
    }

    #[test]
    fn rooted_tree_with_children_does_not_complete_early() {
        let mut agg = Aggregator::new(Vec::new(), 2);
        assert!(agg.complete_if_childless().is_none());
        assert!(!agg.is_completed());
    }
}
