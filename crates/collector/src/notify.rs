use framefield_protocol::FieldsLoaded;
use log::debug;
use tokio::sync::broadcast;

/// One-shot completion event surface.
///
/// Fires at most once per root lifetime. Subscribers that attach after
/// the event has fired receive nothing; this is an event, not a state
/// channel.
pub struct CompletionNotifier {
    tx: broadcast::Sender<FieldsLoaded>,
    fired: bool,
}

impl CompletionNotifier {
    pub fn new(tx: broadcast::Sender<FieldsLoaded>) -> Self {
        Self { tx, fired: false }
    }

    /// Dispatches the completion event. Repeat calls are no-ops.
    pub fn fire(&mut self, payload: FieldsLoaded) {
        if self.fired {
            debug!("completion already dispatched; dropping repeat notification");
            return;
        }
        self.fired = true;
        // A send with no live subscribers is fine; the event is
        // fire-and-forget.
        let _ = self.tx.send(payload);
    }

    #[must_use]
    pub const fn has_fired(&self) -> bool {
        self.fired
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use framefield_protocol::FieldRecord;

    fn payload(label: &str) -> FieldsLoaded {
        FieldsLoaded {
            fields: vec![FieldRecord::new("f", label)],
        }
    }

    #[test]
    fn fires_once_and_only_once() {
        let (tx, mut rx) = broadcast::channel(4);
        let mut notifier = CompletionNotifier::new(tx);

        notifier.fire(payload("first"));
        notifier.fire(payload("second"));

        let got = rx.try_recv().expect("first notification");
        assert_eq!(got.fields[0].label, "first");
        assert!(rx.try_recv().is_err(), "no second notification");
        assert!(notifier.has_fired());
    }

    #[test]
    fn firing_without_subscribers_does_not_panic() {
        let (tx, _) = broadcast::channel(4);
        let mut notifier = CompletionNotifier::new(tx);
        notifier.fire(payload("unheard"));
        assert!(notifier.has_fired());
    }

    #[test]
    fn late_subscriber_receives_nothing() {
        let (tx, _) = broadcast::channel(4);
        let mut notifier = CompletionNotifier::new(tx.clone());
        notifier.fire(payload("gone"));

        let mut late = tx.subscribe();
        assert!(late.try_recv().is_err());
    }
}
