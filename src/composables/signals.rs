use futures::future::{abortable, AbortHandle};
use futures_signals::signal::{Signal, SignalExt};
use yew::prelude::*;
use yew_hooks::prelude::*;

/// Calls `on_change` every time `signal` moves past its current value, until
/// the returned handle is aborted.
pub fn spawn_watch<S>(signal: S, on_change: impl Fn() + 'static) -> AbortHandle
where
    S: Signal + 'static,
{
    let mut initial = true;
    let (watch, handle) = abortable(signal.for_each(move |_| {
        if initial {
            initial = false;
        } else {
            on_change();
        }
        async {}
    }));
    wasm_bindgen_futures::spawn_local(async move {
        let _ = watch.await;
    });
    handle
}

/// Re-renders the calling component whenever the signal built by
/// `make_signal` changes. The watch stops on unmount.
#[hook]
pub fn use_rerender_on<S, F>(make_signal: F)
where
    S: Signal + 'static,
    F: FnOnce() -> S + 'static,
{
    let update = use_update();
    use_effect_with_deps(
        move |_| {
            let watch = spawn_watch(make_signal(), move || update());
            move || watch.abort()
        },
        (),
    );
}

#[cfg(test)]
pub mod testing {
    use std::pin::Pin;

    use futures::{FutureExt, Stream, StreamExt};
    use futures_signals::signal::{Signal, SignalExt};

    /// Counts how often a signal has changed since it was last drained,
    /// polling without an executor.
    pub struct Changes {
        stream: Pin<Box<dyn Stream<Item = ()>>>,
    }

    impl Changes {
        pub fn new<S>(signal: S) -> Self
        where
            S: Signal + 'static,
        {
            let mut changes = Self {
                stream: Box::pin(signal.map(|_| ()).to_stream()),
            };
            changes.drain();
            changes
        }

        /// Number of wake-ups seen since the last call. Changes made between
        /// two calls coalesce into one.
        pub fn drain(&mut self) -> usize {
            let mut seen = 0;
            while let Some(Some(())) = self.stream.next().now_or_never() {
                seen += 1;
            }
            seen
        }
    }
}

#[cfg(test)]
mod tests {
    use futures_signals::signal::Mutable;

    use super::testing::Changes;

    #[test]
    fn changes_coalesce_between_drains() {
        let flag = Mutable::new(false);
        let mut changes = Changes::new(flag.signal());
        assert_eq!(changes.drain(), 0);

        flag.set(true);
        flag.set(false);
        assert_eq!(changes.drain(), 1);
        assert_eq!(changes.drain(), 0);
    }

    #[test]
    fn set_neq_skips_equal_values() {
        let count = Mutable::new(3);
        let mut changes = Changes::new(count.signal());

        count.set_neq(3);
        assert_eq!(changes.drain(), 0);
        count.set_neq(4);
        assert_eq!(changes.drain(), 1);
    }
}
