//! Latest-value subscriptions.
//!
//! A [`Signal`] observes one piece of shared state. It always holds the
//! current value, so a subscriber created late sees the state as it is now
//! rather than the history that led there. Every change after subscription
//! is delivered at least once; changes that land between two polls are
//! coalesced into the latest value.

use std::fmt;

use futures_core::Stream;
use tokio::sync::watch;

/// A subscription to a projection `T` of shared state `S`.
pub struct Signal<S, T> {
    rx: watch::Receiver<S>,
    project: fn(&S) -> T,
}

impl<S, T> Signal<S, T> {
    pub(crate) fn new(rx: watch::Receiver<S>, project: fn(&S) -> T) -> Self {
        Self { rx, project }
    }

    /// The current value.
    pub fn get(&self) -> T {
        (self.project)(&self.rx.borrow())
    }

    /// True when the state changed since this subscriber last looked.
    pub fn has_changed(&self) -> bool {
        self.rx.has_changed().unwrap_or(false)
    }

    /// Wait for the next change and return the value after it.
    ///
    /// Returns `None` once the owner of the state has been dropped.
    pub async fn changed(&mut self) -> Option<T> {
        self.rx.changed().await.ok()?;
        let value = (self.project)(&self.rx.borrow_and_update());
        Some(value)
    }

    /// Turn the subscription into a stream that yields the current value
    /// first and then every change.
    pub fn into_stream(self) -> impl Stream<Item = T> + Send
    where
        S: Send + Sync + 'static,
        T: Send + 'static,
    {
        let Signal { mut rx, project } = self;
        async_stream::stream! {
            let current = project(&rx.borrow_and_update());
            yield current;
            while rx.changed().await.is_ok() {
                let next = project(&rx.borrow_and_update());
                yield next;
            }
        }
    }
}

impl<S, T> Clone for Signal<S, T> {
    fn clone(&self) -> Self {
        Self {
            rx: self.rx.clone(),
            project: self.project,
        }
    }
}

impl<S, T: fmt::Debug> fmt::Debug for Signal<S, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal").field("current", &self.get()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::StreamExt;

    fn doubled(v: &u32) -> u32 {
        v * 2
    }

    #[tokio::test]
    async fn late_subscriber_sees_latest_value_only() {
        let (tx, _) = watch::channel(1u32);
        tx.send_replace(2);
        tx.send_replace(3);

        let signal = Signal::new(tx.subscribe(), doubled);
        assert_eq!(signal.get(), 6);
        assert!(!signal.has_changed());
    }

    #[tokio::test]
    async fn changed_delivers_next_value() {
        let (tx, rx) = watch::channel(1u32);
        let mut signal = Signal::new(rx, doubled);

        tx.send_replace(5);
        assert_eq!(signal.changed().await, Some(10));

        drop(tx);
        assert_eq!(signal.changed().await, None);
    }

    #[tokio::test]
    async fn stream_starts_with_current_value() {
        let (tx, rx) = watch::channel(1u32);
        let mut stream = Box::pin(Signal::new(rx, doubled).into_stream());

        assert_eq!(stream.next().await, Some(2));
        tx.send_replace(4);
        assert_eq!(stream.next().await, Some(8));
        drop(tx);
        assert_eq!(stream.next().await, None);
    }
}
