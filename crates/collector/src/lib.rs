//! # Framefield Collector
//!
//! Aggregation of per-frame field records into one sorted list at the
//! tree root, over one-way message passing.
//!
//! ## Flow
//!
//! ```text
//! Frame
//!     │
//!     ├──> LocalCollector (scrape own fields)
//!     │      └─> FrameAgent
//!     │            └─> Report { fields, descendant_count }
//!     │                   │  send_to_root (fire-and-forget)
//!     ▼                   ▼
//! Root event loop ──> Aggregator ──> sort ──> "frames:loaded"
//! ```
//!
//! Every frame reports directly to the root (star topology); the root
//! discovers the tree size by summing descendant counts, so completion
//! is detected by count equality without any frame knowing the whole
//! tree.
//!
//! ## Example
//!
//! ```no_run
//! use framefield_collector::{run_tree, FrameSpec};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let spec: FrameSpec = serde_json::from_str(
//!         r#"{"children": [{"fields": [{"email": "Email address"}]}]}"#,
//!     )?;
//!     let loaded = run_tree(spec).await?;
//!
//!     println!("{} fields", loaded.fields.len());
//!     Ok(())
//! }
//! ```

mod agent;
mod aggregator;
mod collect;
mod error;
mod notify;
mod runtime;
mod sort;
mod topology;

pub use agent::FrameAgent;
pub use aggregator::{Aggregator, AggregatorProgress, RootAggregator, RootAggregatorConfig};
pub use collect::{Label, LabeledDocument, LocalCollector, StaticFields};
pub use error::{CollectorError, Result};
pub use notify::CompletionNotifier;
pub use runtime::{run_tree, spawn_tree, FrameSpec};
pub use sort::sort_fields;
pub use topology::{ChannelTopology, TopologyProbe};
