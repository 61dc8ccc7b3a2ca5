// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under MIT License.

//! # Routing Module
//!
//! Validation and dispatch for kernel operations: opcode resolution,
//! auxiliary parameter binding, axis and broadcast checks, and the
//! type-erased call layer on top.

pub mod axes;
pub mod broadcast;
pub mod dispatch;
pub mod executor;

pub use broadcast::{broadcast_shape, broadcast_strides, can_broadcast_into};
pub use dispatch::{
    exec_broadcast, exec_index_reduce, exec_index_reduce_scalar, exec_pairwise, exec_reduce,
    exec_reduce3, exec_reduce3_scalar, exec_reduce_scalar, exec_scalar, exec_summary_stats,
    exec_summary_stats_scalar, exec_transform,
};
pub use executor::{OpCall, execute};

/// Event capture for asserting what the routing layer logs.
#[cfg(test)]
pub(crate) mod capture {
    use std::fmt;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use tracing::field::{Field, Visit};
    use tracing::{Event, Level, Metadata, Subscriber, span};

    struct Counter {
        level: Level,
        message: &'static str,
        hits: Arc<AtomicUsize>,
    }

    struct MessageIs<'a> {
        message: &'a str,
        matched: bool,
    }

    impl Visit for MessageIs<'_> {
        fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
            if field.name() == "message" && format!("{value:?}") == self.message {
                self.matched = true;
            }
        }
    }

    impl Subscriber for Counter {
        fn enabled(&self, _: &Metadata<'_>) -> bool {
            true
        }

        fn new_span(&self, _: &span::Attributes<'_>) -> span::Id {
            span::Id::from_u64(1)
        }

        fn record(&self, _: &span::Id, _: &span::Record<'_>) {}

        fn record_follows_from(&self, _: &span::Id, _: &span::Id) {}

        fn event(&self, event: &Event<'_>) {
            if *event.metadata().level() != self.level {
                return;
            }
            let mut visitor = MessageIs {
                message: self.message,
                matched: false,
            };
            event.record(&mut visitor);
            if visitor.matched {
                self.hits.fetch_add(1, Ordering::SeqCst);
            }
        }

        fn enter(&self, _: &span::Id) {}

        fn exit(&self, _: &span::Id) {}
    }

    /// Runs `f` and counts the events at `level` carrying `message`.
    pub(crate) fn count_events(level: Level, message: &'static str, f: impl FnOnce()) -> usize {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Counter {
            level,
            message,
            hits: Arc::clone(&hits),
        };
        tracing::subscriber::with_default(counter, f);
        hits.load(Ordering::SeqCst)
    }
}
