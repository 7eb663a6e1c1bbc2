//! Core swapper handle and attachment lifecycle.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::pin::pin;
use std::sync::Arc;
use std::task::{Context, Waker};
use std::time::Duration;

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::time::sleep;
use tracing::debug;

use crate::config::SwapperOptions;
use crate::error::{Error, Result};
use crate::host::{Container, HostWindow};
use crate::identifiers::{FrameId, ObserverId};

use super::builder::SwapperBuilder;
use super::events::EventListeners;
use super::readiness::ReadinessStrategy;
use super::state::{FrameState, SwapState};

// ============================================================================
// SwapperInner
// ============================================================================

/// Internal shared state for a swapper.
///
/// Observer, listener, and timer closures hold `Weak` references to this,
/// so dropping the last [`FrameSwapper`] makes them inert.
pub(crate) struct SwapperInner {
    pub container: Container,
    pub window: HostWindow,
    pub options: SwapperOptions,
    pub strategy: ReadinessStrategy,
    /// Runtime the swap timers are spawned on.
    pub runtime: Handle,
    pub observer: Mutex<Option<ObserverId>>,
    pub state: Mutex<SwapState>,
    pub listeners: EventListeners,
}

impl Drop for SwapperInner {
    fn drop(&mut self) {
        if let Some(id) = self.observer.get_mut().take() {
            self.container.disconnect(id);
        }
        for entry in self.state.get_mut().frames.values_mut() {
            entry.cancel();
        }
    }
}

// ============================================================================
// FrameSwapper
// ============================================================================

/// Keeps a container showing only its newest loaded frame.
///
/// Frames appended to the container are pre-loaded hidden. Once a frame is
/// ready and the swap delay has elapsed, the newest frame is shown and all
/// older frames are removed, carrying the scroll position over.
///
/// Clones share the same swapper. Keep a handle alive while the swapper
/// should keep working.
///
/// # Example
///
/// ```no_run
/// use frame_swapper::{Container, FrameSwapper, HostWindow};
///
/// # fn example() -> frame_swapper::Result<()> {
/// let container = Container::new();
/// let swapper = FrameSwapper::attach(container.clone(), HostWindow::new())?;
///
/// let mut events = swapper.events();
/// let frame = swapper.add_frame([("src", "/page/2")])?;
///
/// // Embedding signals that the content finished loading.
/// frame.complete_load();
/// # let _ = events.try_recv();
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct FrameSwapper {
    pub(crate) inner: Arc<SwapperInner>,
}

impl fmt::Debug for FrameSwapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameSwapper")
            .field("attached", &self.is_attached())
            .field("options", &self.inner.options)
            .field("tracked_frames", &self.inner.state.lock().frames.len())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// FrameSwapper - Attachment
// ============================================================================

impl FrameSwapper {
    /// Creates a builder for attaching a swapper.
    #[inline]
    #[must_use]
    pub fn builder() -> SwapperBuilder {
        SwapperBuilder::new()
    }

    /// Attaches to `container`, reading options from its attributes.
    ///
    /// # Errors
    ///
    /// - [`Error::NoRuntime`] if called outside a tokio runtime, or in one
    ///   built without timers
    pub fn attach(container: Container, window: HostWindow) -> Result<Self> {
        let options = SwapperOptions::from_attributes(&container.attributes());
        Self::attach_with(container, window, options)
    }

    /// Attaches to `container` with explicit options.
    ///
    /// Frames already in the container are not announced or armed; they only
    /// take part in swaps.
    ///
    /// # Errors
    ///
    /// - [`Error::Config`] if the options are invalid
    /// - [`Error::NoRuntime`] if called outside a tokio runtime, or in one
    ///   built without timers
    pub fn attach_with(
        container: Container,
        window: HostWindow,
        options: SwapperOptions,
    ) -> Result<Self> {
        options.validate()?;
        let runtime = Handle::try_current().map_err(|e| Error::no_runtime(e.to_string()))?;
        ensure_timers(&runtime)?;
        let strategy = ReadinessStrategy::from_options(&options);

        debug!(
            swap_delay_ms = options.swap_delay_ms,
            listen_for = ?options.listen_for,
            disable_scroll = options.disable_scroll,
            "Attaching swapper"
        );

        let inner = Arc::new(SwapperInner {
            container,
            window,
            options,
            strategy,
            runtime,
            observer: Mutex::new(None),
            state: Mutex::new(SwapState::default()),
            listeners: EventListeners::default(),
        });
        inner.start_observing();

        Ok(Self { inner })
    }

    /// Stops observing the container.
    ///
    /// Readiness subscriptions and swap timers already in flight still run.
    /// Returns `false` if already detached.
    pub fn detach(&self) -> bool {
        let detached = self.inner.stop_observing();
        if detached {
            debug!("Swapper detached");
        }
        detached
    }

    /// Returns `true` while the container is observed.
    #[inline]
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.inner.observer.lock().is_some()
    }
}

// ============================================================================
// FrameSwapper - Accessors
// ============================================================================

impl FrameSwapper {
    /// Returns the managed container.
    #[inline]
    #[must_use]
    pub fn container(&self) -> &Container {
        &self.inner.container
    }

    /// Returns the host window.
    #[inline]
    #[must_use]
    pub fn window(&self) -> &HostWindow {
        &self.inner.window
    }

    /// Returns the options read at attachment.
    #[inline]
    #[must_use]
    pub fn options(&self) -> &SwapperOptions {
        &self.inner.options
    }

    /// Returns the readiness strategy.
    #[inline]
    #[must_use]
    pub fn strategy(&self) -> &ReadinessStrategy {
        &self.inner.strategy
    }

    /// Returns the lifecycle state of a tracked frame.
    ///
    /// Frames removed by a swap stay visible here until the next swap.
    #[must_use]
    pub fn frame_state(&self, frame_id: FrameId) -> Option<FrameState> {
        self.inner.state.lock().state_of(frame_id)
    }

    /// Returns the vertical scroll offset captured at the latest readiness.
    #[must_use]
    pub fn last_captured_scroll(&self) -> i32 {
        self.inner.state.lock().last_captured_scroll
    }

    /// Returns the number of frames still awaiting readiness.
    #[must_use]
    pub fn pending_readiness_count(&self) -> usize {
        self.inner.state.lock().pending_readiness_count()
    }

    /// Returns the number of swap timers running.
    #[must_use]
    pub fn pending_swap_count(&self) -> usize {
        self.inner.state.lock().pending_swap_count()
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Fails if `runtime` cannot drive swap timers.
///
/// Tokio has no query for the time driver; registering a zero-length sleep
/// panics when it is disabled.
fn ensure_timers(runtime: &Handle) -> Result<()> {
    let _guard = runtime.enter();
    panic::catch_unwind(AssertUnwindSafe(|| {
        let mut timer = pin!(sleep(Duration::ZERO));
        let mut cx = Context::from_waker(Waker::noop());
        let _ = timer.as_mut().poll(&mut cx);
    }))
    .map_err(|_| Error::no_runtime("timers are disabled on the current tokio runtime"))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use std::time::Duration;

    use serde_json::json;
    use tokio::sync::mpsc::UnboundedReceiver;
    use tokio::time::{Instant, sleep, timeout};
    use tracing_subscriber::EnvFilter;

    use crate::host::{Element, Frame, Node, Visibility};
    use crate::identifiers::ContextId;
    use crate::protocol::{EventKind, Message, SwapperEvent};

    const SRCDOC: &str = "<!DOCTYPE html><html><body style=\"height: 3000px\"></body></html>";

    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }

    struct Fixture {
        container: Container,
        window: HostWindow,
        swapper: FrameSwapper,
        events: UnboundedReceiver<SwapperEvent>,
    }

    fn fixture(options: SwapperOptions) -> Fixture {
        init_tracing();
        let container = Container::new();
        let window = HostWindow::new();
        let swapper =
            FrameSwapper::attach_with(container.clone(), window.clone(), options).expect("attach");
        let events = swapper.events();
        Fixture {
            container,
            window,
            swapper,
            events,
        }
    }

    async fn next_event(events: &mut UnboundedReceiver<SwapperEvent>) -> SwapperEvent {
        timeout(Duration::from_secs(30), events.recv())
            .await
            .expect("event before timeout")
            .expect("event channel open")
    }

    async fn expect_event(
        events: &mut UnboundedReceiver<SwapperEvent>,
        kind: EventKind,
        frame: &Frame,
    ) {
        let event = next_event(events).await;
        assert_eq!(event.kind(), kind);
        assert_eq!(event.frame(), frame);
    }

    /// Adds a frame, loads it natively, and waits for its swap.
    async fn show_first_frame(fx: &mut Fixture) -> Frame {
        let frame = fx.swapper.add_frame([("srcdoc", SRCDOC)]).expect("add");
        expect_event(&mut fx.events, EventKind::Added, &frame).await;
        frame.complete_load();
        expect_event(&mut fx.events, EventKind::Loaded, &frame).await;
        sleep(fx.swapper.options().swap_delay() * 2).await;
        assert!(frame.is_visible());
        frame
    }

    #[tokio::test(start_paused = true)]
    async fn test_add_frame_via_mutator() {
        let mut fx = fixture(SwapperOptions::new());

        let frame = fx.swapper.add_frame([("srcdoc", SRCDOC)]).expect("add");

        assert_eq!(fx.container.frame_count(), 1);
        assert_eq!(frame.attribute("srcdoc").as_deref(), Some(SRCDOC));
        expect_event(&mut fx.events, EventKind::Added, &frame).await;
        assert_eq!(
            fx.swapper.frame_state(frame.id()),
            Some(FrameState::AwaitingReadiness)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_frame_never_swaps() {
        let mut fx = fixture(SwapperOptions::new());

        let frame = fx.swapper.add_frame([("srcdoc", SRCDOC)]).expect("add");
        expect_event(&mut fx.events, EventKind::Added, &frame).await;
        assert!(!frame.is_visible());

        assert!(frame.complete_load());
        expect_event(&mut fx.events, EventKind::Loaded, &frame).await;
        assert_eq!(fx.swapper.pending_swap_count(), 1);

        sleep(Duration::from_millis(500)).await;

        assert!(fx.events.try_recv().is_err());
        assert!(frame.is_visible());
        assert_eq!(fx.container.frame_count(), 1);
        assert_eq!(fx.swapper.frame_state(frame.id()), Some(FrameState::Swapped));
        assert_eq!(fx.swapper.pending_swap_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_manual_append_is_observed() {
        let mut fx = fixture(SwapperOptions::new());

        let frame = Frame::new();
        frame.set_attribute("srcdoc", SRCDOC).expect("valid");
        fx.container.append_child(frame.clone());

        expect_event(&mut fx.events, EventKind::Added, &frame).await;
        frame.complete_load();
        expect_event(&mut fx.events, EventKind::Loaded, &frame).await;

        sleep(Duration::from_millis(500)).await;
        assert!(fx.events.try_recv().is_err());
        assert_eq!(fx.container.frame_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_frame_replaces_first() {
        let mut fx = fixture(SwapperOptions::new());
        let first = show_first_frame(&mut fx).await;

        let second = fx.swapper.add_frame([("srcdoc", SRCDOC)]).expect("add");
        expect_event(&mut fx.events, EventKind::Added, &second).await;
        second.complete_load();
        expect_event(&mut fx.events, EventKind::Loaded, &second).await;

        // Transient window: the old frame is still the only visible one.
        assert!(first.is_visible());
        assert!(!second.is_visible());

        expect_event(&mut fx.events, EventKind::Swapped, &first).await;

        assert_eq!(fx.container.frames(), vec![second.clone()]);
        assert!(second.is_visible());
        assert!(!first.is_attached());
        assert!(fx.events.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_manual_second_frame_replaces_first() {
        let mut fx = fixture(SwapperOptions::new());
        let first = show_first_frame(&mut fx).await;

        let second = Frame::with_attributes([("srcdoc", SRCDOC)]).expect("valid");
        fx.container.append_child(second.clone());
        expect_event(&mut fx.events, EventKind::Added, &second).await;
        second.complete_load();
        expect_event(&mut fx.events, EventKind::Loaded, &second).await;
        expect_event(&mut fx.events, EventKind::Swapped, &first).await;

        assert_eq!(fx.container.frames(), vec![second]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_default_delay() {
        let mut fx = fixture(SwapperOptions::new());
        let first = show_first_frame(&mut fx).await;

        let second = fx.swapper.add_frame([("srcdoc", SRCDOC)]).expect("add");
        expect_event(&mut fx.events, EventKind::Added, &second).await;
        second.complete_load();
        expect_event(&mut fx.events, EventKind::Loaded, &second).await;

        let start = Instant::now();
        expect_event(&mut fx.events, EventKind::Swapped, &first).await;
        let elapsed = start.elapsed();

        assert!(elapsed >= Duration::from_millis(40), "{elapsed:?}");
        assert!(elapsed <= Duration::from_millis(160), "{elapsed:?}");
    }

    #[tokio::test(start_paused = true)]
    async fn test_swap_delay_attribute() {
        init_tracing();
        let container = Container::new()
            .with_attribute("swap-delay", "1000")
            .expect("valid");
        let swapper = FrameSwapper::attach(container, HostWindow::new()).expect("attach");
        let mut events = swapper.events();

        let first = swapper.add_frame([("srcdoc", SRCDOC)]).expect("add");
        first.complete_load();
        sleep(Duration::from_millis(1500)).await;

        let second = swapper.add_frame([("srcdoc", SRCDOC)]).expect("add");
        second.complete_load();

        let kinds: Vec<EventKind> = std::iter::from_fn(|| events.try_recv().ok())
            .map(|event| event.kind())
            .collect();
        assert_eq!(
            kinds,
            vec![
                EventKind::Added,
                EventKind::Loaded,
                EventKind::Added,
                EventKind::Loaded
            ]
        );

        let start = Instant::now();
        expect_event(&mut events, EventKind::Swapped, &first).await;
        let elapsed = start.elapsed();

        assert!(elapsed >= Duration::from_millis(800), "{elapsed:?}");
        assert!(elapsed <= Duration::from_millis(1200), "{elapsed:?}");
    }

    #[tokio::test(start_paused = true)]
    async fn test_scroll_transfers_to_new_frame() {
        let mut fx = fixture(SwapperOptions::new());
        let first = show_first_frame(&mut fx).await;

        first.content_window().expect("attached").scroll_to(0, 100);

        let second = fx.swapper.add_frame([("srcdoc", SRCDOC)]).expect("add");
        expect_event(&mut fx.events, EventKind::Added, &second).await;
        second.complete_load();
        expect_event(&mut fx.events, EventKind::Loaded, &second).await;
        assert_eq!(fx.swapper.last_captured_scroll(), 100);

        expect_event(&mut fx.events, EventKind::Swapped, &first).await;

        let content = second.content_window().expect("attached");
        assert_eq!(content.scroll_y(), 100);
    }

    #[tokio::test(start_paused = true)]
    async fn test_overlapping_readiness_last_capture_wins() {
        let mut fx = fixture(SwapperOptions::new());
        let first = show_first_frame(&mut fx).await;
        let outgoing = first.content_window().expect("attached");
        outgoing.scroll_to(0, 100);

        let b = fx.swapper.add_frame([("srcdoc", SRCDOC)]).expect("add");
        let c = fx.swapper.add_frame([("srcdoc", SRCDOC)]).expect("add");
        expect_event(&mut fx.events, EventKind::Added, &b).await;
        expect_event(&mut fx.events, EventKind::Added, &c).await;

        b.complete_load();
        expect_event(&mut fx.events, EventKind::Loaded, &b).await;
        assert_eq!(fx.swapper.last_captured_scroll(), 100);

        outgoing.scroll_to(0, 250);
        c.complete_load();
        expect_event(&mut fx.events, EventKind::Loaded, &c).await;
        assert_eq!(fx.swapper.last_captured_scroll(), 250);
        assert_eq!(fx.swapper.pending_swap_count(), 2);

        expect_event(&mut fx.events, EventKind::Swapped, &first).await;
        expect_event(&mut fx.events, EventKind::Swapped, &b).await;
        sleep(Duration::from_millis(500)).await;

        assert!(fx.events.try_recv().is_err());
        assert_eq!(fx.container.frames(), vec![c.clone()]);
        assert!(c.is_visible());
        assert_eq!(c.content_window().expect("attached").scroll_y(), 250);
        assert_eq!(fx.swapper.pending_swap_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_disable_scroll_skips_transfer() {
        let mut fx = fixture(SwapperOptions::new().with_scroll_disabled());
        let first = show_first_frame(&mut fx).await;

        first.content_window().expect("attached").scroll_to(0, 100);

        let second = fx.swapper.add_frame([("srcdoc", SRCDOC)]).expect("add");
        expect_event(&mut fx.events, EventKind::Added, &second).await;
        second.complete_load();
        expect_event(&mut fx.events, EventKind::Loaded, &second).await;
        expect_event(&mut fx.events, EventKind::Swapped, &first).await;

        assert_eq!(fx.swapper.last_captured_scroll(), 0);
        assert_eq!(second.content_window().expect("attached").scroll_y(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_scroll_is_not_restored() {
        let mut fx = fixture(SwapperOptions::new());
        let first = show_first_frame(&mut fx).await;

        let second = fx.swapper.add_frame([("srcdoc", SRCDOC)]).expect("add");
        second.content_window().expect("attached").scroll_to(15, 40);
        second.complete_load();
        sleep(Duration::from_millis(500)).await;

        assert!(!first.is_attached());
        let position = second.content_window().expect("attached").scroll_position();
        assert_eq!((position.x, position.y), (15, 40));
    }

    #[tokio::test(start_paused = true)]
    async fn test_listen_for_requires_matching_message() {
        let mut fx = fixture(SwapperOptions::new().with_listen_for("custom-event"));

        let frame = fx.swapper.add_frame([("srcdoc", SRCDOC)]).expect("add");
        expect_event(&mut fx.events, EventKind::Added, &frame).await;
        assert_eq!(fx.window.listener_count(), 1);

        // Native completion is not the readiness signal here.
        assert!(!frame.complete_load());

        // Wrong source, wrong type, anonymous.
        fx.window
            .post_message(&Message::typed(ContextId::generate(), "custom-event"));
        fx.window
            .post_message(&Message::typed(frame.context_id(), "other-event"));
        fx.window
            .post_message(&Message::new(None, json!({ "type": "custom-event" })));

        sleep(Duration::from_millis(500)).await;
        assert!(fx.events.try_recv().is_err());

        let content = frame.content_window().expect("attached");
        content.post_to_parent(&fx.window, json!({ "type": "custom-event" }));
        expect_event(&mut fx.events, EventKind::Loaded, &frame).await;
        assert_eq!(fx.window.listener_count(), 0);

        content.post_to_parent(&fx.window, json!({ "type": "custom-event" }));
        sleep(Duration::from_millis(500)).await;
        assert!(fx.events.try_recv().is_err());
        assert!(frame.is_visible());
    }

    #[tokio::test(start_paused = true)]
    async fn test_removed_frame_readiness_is_inert() {
        let mut fx = fixture(SwapperOptions::new().with_listen_for("custom-event"));

        let frame = fx.swapper.add_frame([("srcdoc", SRCDOC)]).expect("add");
        expect_event(&mut fx.events, EventKind::Added, &frame).await;

        let context = frame.context_id();
        fx.container.remove_frame(&frame).expect("child");

        assert_eq!(fx.swapper.frame_state(frame.id()), Some(FrameState::Superseded));
        assert_eq!(fx.window.listener_count(), 0);
        assert_eq!(fx.swapper.pending_readiness_count(), 0);

        fx.window.post_message(&Message::typed(context, "custom-event"));
        sleep(Duration::from_millis(500)).await;
        assert!(fx.events.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_removed_frame_native_load_is_inert() {
        let mut fx = fixture(SwapperOptions::new());

        let frame = fx.swapper.add_frame([("srcdoc", SRCDOC)]).expect("add");
        expect_event(&mut fx.events, EventKind::Added, &frame).await;
        fx.container.remove_frame(&frame).expect("child");

        assert!(!frame.has_onload());
        assert!(!frame.complete_load());
        sleep(Duration::from_millis(500)).await;
        assert!(fx.events.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_frame_added_during_delay_is_shown() {
        let mut fx = fixture(SwapperOptions::new());
        let first = show_first_frame(&mut fx).await;

        let second = fx.swapper.add_frame([("srcdoc", SRCDOC)]).expect("add");
        second.complete_load();
        let third = fx.swapper.add_frame([("srcdoc", SRCDOC)]).expect("add");

        expect_event(&mut fx.events, EventKind::Added, &second).await;
        expect_event(&mut fx.events, EventKind::Loaded, &second).await;
        expect_event(&mut fx.events, EventKind::Added, &third).await;
        expect_event(&mut fx.events, EventKind::Swapped, &first).await;
        expect_event(&mut fx.events, EventKind::Swapped, &second).await;

        assert_eq!(fx.container.frames(), vec![third.clone()]);
        assert!(third.is_visible());
        assert_eq!(
            fx.swapper.frame_state(third.id()),
            Some(FrameState::AwaitingReadiness)
        );

        third.complete_load();
        expect_event(&mut fx.events, EventKind::Loaded, &third).await;
        sleep(Duration::from_millis(500)).await;
        assert!(fx.events.try_recv().is_err());
        assert_eq!(fx.container.frames(), vec![third]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_later_frame_ready_first_supersedes_pending() {
        let mut fx = fixture(SwapperOptions::new());
        let first = show_first_frame(&mut fx).await;

        let second = fx.swapper.add_frame([("srcdoc", SRCDOC)]).expect("add");
        let third = fx.swapper.add_frame([("srcdoc", SRCDOC)]).expect("add");
        expect_event(&mut fx.events, EventKind::Added, &second).await;
        expect_event(&mut fx.events, EventKind::Added, &third).await;
        assert_eq!(fx.swapper.pending_readiness_count(), 2);

        third.complete_load();
        expect_event(&mut fx.events, EventKind::Loaded, &third).await;
        expect_event(&mut fx.events, EventKind::Swapped, &first).await;
        expect_event(&mut fx.events, EventKind::Swapped, &second).await;

        assert_eq!(fx.swapper.frame_state(second.id()), Some(FrameState::Superseded));
        assert_eq!(fx.swapper.pending_readiness_count(), 0);

        assert!(!second.complete_load());
        sleep(Duration::from_millis(500)).await;
        assert!(fx.events.try_recv().is_err());
        assert_eq!(fx.container.frames(), vec![third]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retired_entries_pruned_on_next_swap() {
        let mut fx = fixture(SwapperOptions::new());
        let first = show_first_frame(&mut fx).await;

        let second = fx.swapper.add_frame([("srcdoc", SRCDOC)]).expect("add");
        second.complete_load();
        sleep(Duration::from_millis(500)).await;
        assert_eq!(fx.swapper.frame_state(first.id()), Some(FrameState::Swapped));

        let third = fx.swapper.add_frame([("srcdoc", SRCDOC)]).expect("add");
        third.complete_load();
        sleep(Duration::from_millis(500)).await;

        assert!(fx.swapper.frame_state(first.id()).is_none());
        assert_eq!(fx.swapper.frame_state(second.id()), Some(FrameState::Swapped));
        assert_eq!(fx.container.frames(), vec![third]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_non_frame_children_ignored() {
        let mut fx = fixture(SwapperOptions::new());

        fx.container.append_child(Element::new("div"));
        fx.container.append_child(Node::Text("caption".into()));
        sleep(Duration::from_millis(50)).await;
        assert!(fx.events.try_recv().is_err());

        let first = show_first_frame(&mut fx).await;
        let second = fx.swapper.add_frame([("srcdoc", SRCDOC)]).expect("add");
        second.complete_load();
        sleep(Duration::from_millis(500)).await;

        assert!(!first.is_attached());
        assert_eq!(fx.container.child_count(), 3);
        assert_eq!(fx.container.frames(), vec![second]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_batch_insertion_announces_each_frame() {
        let mut fx = fixture(SwapperOptions::new());

        let a = Frame::new();
        let b = Frame::new();
        fx.container
            .append_children([Node::from(a.clone()), Node::from(Element::new("p")), Node::from(b.clone())]);

        expect_event(&mut fx.events, EventKind::Added, &a).await;
        expect_event(&mut fx.events, EventKind::Added, &b).await;
        assert_eq!(fx.swapper.pending_readiness_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_detach_stops_observation() {
        let mut fx = fixture(SwapperOptions::new());

        assert!(fx.swapper.is_attached());
        assert!(fx.swapper.detach());
        assert!(!fx.swapper.detach());
        assert!(!fx.swapper.is_attached());
        assert_eq!(fx.container.observer_count(), 0);

        let frame = fx.swapper.add_frame([("srcdoc", SRCDOC)]).expect("add");
        assert!(!frame.has_onload());
        sleep(Duration::from_millis(50)).await;
        assert!(fx.events.try_recv().is_err());
        assert_eq!(fx.container.frame_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_detach_keeps_inflight_swap() {
        let mut fx = fixture(SwapperOptions::new());
        let first = show_first_frame(&mut fx).await;

        let second = fx.swapper.add_frame([("srcdoc", SRCDOC)]).expect("add");
        expect_event(&mut fx.events, EventKind::Added, &second).await;
        second.complete_load();
        expect_event(&mut fx.events, EventKind::Loaded, &second).await;

        fx.swapper.detach();
        expect_event(&mut fx.events, EventKind::Swapped, &first).await;
        assert_eq!(fx.container.frames(), vec![second]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_preexisting_frames_take_part_in_swaps() {
        init_tracing();
        let container = Container::new();
        let initial = Frame::new();
        container.append_child(initial.clone());
        initial.set_visibility(Visibility::Visible);

        let swapper = FrameSwapper::attach(container.clone(), HostWindow::new()).expect("attach");
        let mut events = swapper.events();
        assert!(swapper.frame_state(initial.id()).is_none());

        let next = swapper.add_frame([("srcdoc", SRCDOC)]).expect("add");
        next.complete_load();
        sleep(Duration::from_millis(500)).await;

        let kinds: Vec<EventKind> = std::iter::from_fn(|| events.try_recv().ok())
            .map(|event| event.kind())
            .collect();
        assert_eq!(
            kinds,
            vec![EventKind::Added, EventKind::Loaded, EventKind::Swapped]
        );
        assert_eq!(container.frames(), vec![next]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_swapper_releases_subscriptions() {
        let fx = fixture(SwapperOptions::new().with_listen_for("custom-event"));
        let frame = fx.swapper.add_frame([("srcdoc", SRCDOC)]).expect("add");
        assert_eq!(fx.window.listener_count(), 1);

        let Fixture {
            container,
            window,
            swapper,
            events,
        } = fx;
        drop(events);
        drop(swapper);

        assert_eq!(container.observer_count(), 0);
        assert_eq!(window.listener_count(), 0);
        assert!(frame.is_attached());
    }

    #[tokio::test(start_paused = true)]
    async fn test_listener_callbacks() {
        let fx = fixture(SwapperOptions::new());
        let loaded = Arc::new(Mutex::new(Vec::new()));

        let sink = Arc::clone(&loaded);
        let id = fx
            .swapper
            .add_event_listener(EventKind::Loaded, move |event: &SwapperEvent| {
                sink.lock().push(event.frame().id());
            });

        let frame = fx.swapper.add_frame([("srcdoc", SRCDOC)]).expect("add");
        frame.complete_load();
        assert_eq!(*loaded.lock(), vec![frame.id()]);

        assert!(fx.swapper.remove_event_listener(id));
        assert!(!fx.swapper.remove_event_listener(id));
    }

    #[test]
    fn test_attach_outside_runtime() {
        let err = FrameSwapper::attach(Container::new(), HostWindow::new()).unwrap_err();
        assert!(matches!(err, Error::NoRuntime { .. }));
    }

    #[test]
    fn test_attach_in_runtime_without_timers() {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .build()
            .expect("build runtime");
        let _guard = runtime.enter();

        let container = Container::new();
        let err = FrameSwapper::attach(container.clone(), HostWindow::new()).unwrap_err();

        assert!(matches!(err, Error::NoRuntime { .. }));
        assert!(err.to_string().contains("timers"));
        assert_eq!(container.observer_count(), 0);
    }

    #[test]
    fn test_attach_in_runtime_with_timers() {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()
            .expect("build runtime");
        let _guard = runtime.enter();

        let swapper = FrameSwapper::attach(Container::new(), HostWindow::new()).expect("attach");
        assert!(swapper.is_attached());
    }

    #[tokio::test]
    async fn test_attach_rejects_invalid_options() {
        let err = FrameSwapper::attach_with(
            Container::new(),
            HostWindow::new(),
            SwapperOptions::new().with_listen_for(""),
        )
        .unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }

    #[test]
    fn test_swapper_is_clone_and_debug() {
        fn assert_clone<T: Clone>() {}
        fn assert_debug<T: std::fmt::Debug>() {}
        assert_clone::<FrameSwapper>();
        assert_debug::<FrameSwapper>();
    }
}
