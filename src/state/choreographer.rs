//! Async driver around [`Loader`]: turns the state machine's deadlines into
//! timers and hands callers a single completion future per session.
//!
//! The driver runs detached from the caller, so a completion future that is
//! dropped unawaited still lets the indicator time out and hide.

use std::cell::RefCell;
use std::future::Future;
use std::rc::Rc;

use futures_channel::oneshot;
use futures_util::future::{self, Either, FutureExt, LocalBoxFuture, select};
use gloo_timers::future::TimeoutFuture;
use tracing::debug;
use yew::Callback;

use super::loader::{Completion, Loader, Phase, SessionId, Step};
use crate::config::{LoaderConfig, LoaderStyle};
use crate::util::now_ms;

/// Resolves after the given number of milliseconds.
pub type Sleep = Rc<dyn Fn(u32) -> LocalBoxFuture<'static, ()>>;
/// Runs a future in the background.
pub type Spawn = Rc<dyn Fn(LocalBoxFuture<'static, ()>)>;

/// Clock, timers and executor the driver runs on.
#[derive(Clone)]
pub struct Runtime {
    pub clock: Rc<dyn Fn() -> f64>,
    pub sleep: Sleep,
    pub spawn: Spawn,
}

impl Runtime {
    pub fn browser() -> Self {
        Self {
            clock: Rc::new(now_ms),
            sleep: Rc::new(|ms: u32| TimeoutFuture::new(ms).boxed_local()),
            spawn: Rc::new(|fut: LocalBoxFuture<'static, ()>| {
                wasm_bindgen_futures::spawn_local(fut)
            }),
        }
    }
}

/// What the overlay needs to render.
#[derive(Clone, Debug, PartialEq)]
pub struct LoaderSnapshot {
    pub session: Option<SessionId>,
    pub phase: Phase,
    pub message: String,
    pub percent: u8,
    pub style: LoaderStyle,
}

impl LoaderSnapshot {
    pub fn visible(&self) -> bool {
        self.phase != Phase::Hidden
    }
}

struct Inner {
    loader: Loader,
    style: LoaderStyle,
    /// Dropping this wakes the driver of the current session.
    cancel: Option<oneshot::Sender<()>>,
    notify: Option<Callback<LoaderSnapshot>>,
}

enum Wake {
    Task,
    Timer,
    Cancelled,
}

/// Shared handle; clones refer to the same indicator.
#[derive(Clone)]
pub struct Choreographer {
    inner: Rc<RefCell<Inner>>,
    runtime: Runtime,
}

impl PartialEq for Choreographer {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Choreographer {
    pub fn new(config: LoaderConfig, style: LoaderStyle, runtime: Runtime) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Inner {
                loader: Loader::new(config),
                style,
                cancel: None,
                notify: None,
            })),
            runtime,
        }
    }

    fn now(&self) -> f64 {
        (self.runtime.clock)()
    }

    /// Registers the mounted overlay.
    pub fn attach(&self, notify: Callback<LoaderSnapshot>) {
        self.inner.borrow_mut().notify = Some(notify);
        self.publish();
    }

    /// Overlay unmounted; any visible session is dismissed.
    pub fn detach(&self) {
        self.dismiss();
        self.inner.borrow_mut().notify = None;
    }

    pub fn is_attached(&self) -> bool {
        self.inner.borrow().notify.is_some()
    }

    pub fn snapshot(&self) -> LoaderSnapshot {
        let inner = self.inner.borrow();
        let session = inner.loader.session();
        LoaderSnapshot {
            session: session.map(|s| s.id),
            phase: inner.loader.phase(),
            message: session.map(|s| s.message.clone()).unwrap_or_default(),
            percent: inner.loader.percent(),
            style: inner.style,
        }
    }

    fn publish(&self) {
        let notify = self.inner.borrow().notify.clone();
        if let Some(cb) = notify {
            cb.emit(self.snapshot());
        }
    }

    pub fn set_style(&self, style: LoaderStyle) {
        self.inner.borrow_mut().style = style;
        self.publish();
    }

    /// Shows the indicator and returns its completion signal.
    ///
    /// With a task, completion waits for both the animation and the task; the
    /// task's output (including any error) is discarded. A newer `begin`
    /// resolves this signal as [`Completion::Superseded`].
    pub fn begin<F>(
        &self,
        message: &str,
        duration_ms: Option<u32>,
        task: Option<F>,
    ) -> LocalBoxFuture<'static, Completion>
    where
        F: Future + 'static,
    {
        if !self.is_attached() {
            debug!(message, "no loading overlay mounted");
            return future::ready(Completion::Detached).boxed_local();
        }
        let now = self.now();
        let (cancel_tx, cancel_rx) = oneshot::channel();
        let id = {
            let mut inner = self.inner.borrow_mut();
            let id = inner.loader.begin(message, duration_ms, task.is_some(), now);
            // replacing the sender wakes a superseded driver
            inner.cancel = Some(cancel_tx);
            id
        };
        self.publish();
        let task: LocalBoxFuture<'static, ()> = match task {
            Some(t) => t.map(|_| ()).boxed_local(),
            None => future::pending().boxed_local(),
        };
        let (done_tx, done_rx) = oneshot::channel();
        let driver = self.clone().drive(id, task, cancel_rx);
        (self.runtime.spawn)(
            async move {
                // nobody listening is fine
                let _ = done_tx.send(driver.await);
            }
            .boxed_local(),
        );
        done_rx
            .map(move |res| {
                res.unwrap_or_else(|_| {
                    debug!(id, "loading driver dropped");
                    Completion::Superseded
                })
            })
            .boxed_local()
    }

    async fn drive(
        self,
        id: SessionId,
        mut task: LocalBoxFuture<'static, ()>,
        mut cancel: oneshot::Receiver<()>,
    ) -> Completion {
        loop {
            let step = {
                let now = self.now();
                self.inner.borrow_mut().loader.advance(id, now)
            };
            let deadline = match step {
                Step::WaitUntil(at) => at,
                Step::Done(outcome) => {
                    if matches!(outcome, Completion::Finished | Completion::TimedOut) {
                        self.inner.borrow_mut().cancel = None;
                    }
                    self.publish();
                    return outcome;
                }
            };
            self.publish();
            let wait_ms = (deadline - self.now()).max(0.0).ceil() as u32;
            let timer = (self.runtime.sleep)(wait_ms);
            let woke = match select(select(&mut task, timer), &mut cancel).await {
                Either::Left((Either::Left(_), _)) => Wake::Task,
                Either::Left((Either::Right(_), _)) => Wake::Timer,
                Either::Right(_) => Wake::Cancelled,
            };
            match woke {
                Wake::Task => {
                    task = future::pending().boxed_local();
                    self.inner.borrow_mut().loader.task_settled(id);
                }
                Wake::Timer => {}
                Wake::Cancelled => {
                    let outcome = self.inner.borrow().loader.outcome_of(id);
                    debug!(id, ?outcome, "loading driver cancelled");
                    return outcome;
                }
            }
        }
    }

    /// Per-frame percent update for the current session.
    pub fn tick(&self) {
        let changed = {
            let mut inner = self.inner.borrow_mut();
            let Some(id) = inner.loader.current_id() else {
                return;
            };
            let before = inner.loader.percent();
            let now = self.now();
            inner.loader.tick(id, now).is_some_and(|pct| pct != before)
        };
        if changed {
            self.publish();
        }
    }

    /// Hides the indicator early; the session resolves as `Dismissed`.
    pub fn dismiss(&self) {
        self.close_with(Loader::dismiss);
    }

    /// Hides the indicator and resolves the session as `Superseded`, so the
    /// caller drops whatever transition it was waiting to make.
    pub fn abandon(&self) {
        self.close_with(Loader::abandon);
    }

    fn close_with(&self, close: fn(&mut Loader) -> Option<SessionId>) {
        let closed = {
            let mut inner = self.inner.borrow_mut();
            let id = close(&mut inner.loader);
            if id.is_some() {
                inner.cancel = None;
            }
            id
        };
        if closed.is_some() {
            self.publish();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_executor::LocalPool;
    use futures_util::task::LocalSpawnExt;
    use std::cell::Cell;

    type Timers = Rc<RefCell<Vec<(f64, oneshot::Sender<()>)>>>;

    /// Single-threaded executor with a hand-moved clock and timers that fire
    /// only when the clock passes them.
    struct Harness {
        pool: LocalPool,
        clock: Rc<Cell<f64>>,
        timers: Timers,
        c: Choreographer,
    }

    impl Harness {
        fn new() -> Self {
            let pool = LocalPool::new();
            let clock = Rc::new(Cell::new(0.0));
            let timers: Timers = Rc::new(RefCell::new(Vec::new()));
            let runtime = Runtime {
                clock: {
                    let clock = clock.clone();
                    Rc::new(move || clock.get())
                },
                sleep: {
                    let clock = clock.clone();
                    let timers = timers.clone();
                    Rc::new(move |ms: u32| {
                        let (tx, rx) = oneshot::channel();
                        timers.borrow_mut().push((clock.get() + ms as f64, tx));
                        rx.map(|_| ()).boxed_local()
                    })
                },
                spawn: {
                    let spawner = pool.spawner();
                    Rc::new(move |fut: LocalBoxFuture<'static, ()>| {
                        spawner.spawn_local(fut).expect("spawn driver");
                    })
                },
            };
            let c = Choreographer::new(LoaderConfig::default(), LoaderStyle::FillBar, runtime);
            Self { pool, clock, timers, c }
        }

        fn attached() -> Self {
            let h = Self::new();
            h.c.attach(Callback::from(|_| ()));
            h
        }

        /// Moves the clock to `at`, firing due timers until nothing is runnable.
        fn advance_to(&mut self, at: f64) {
            self.clock.set(at);
            loop {
                self.pool.run_until_stalled();
                let due: Vec<_> = {
                    let mut timers = self.timers.borrow_mut();
                    let (due, rest): (Vec<_>, Vec<_>) =
                        timers.drain(..).partition(|(deadline, _)| *deadline <= at);
                    *timers = rest;
                    due
                };
                if due.is_empty() {
                    break;
                }
                for (_, tx) in due {
                    let _ = tx.send(());
                }
            }
        }

        fn watch(&self, done: LocalBoxFuture<'static, Completion>) -> Rc<Cell<Option<Completion>>> {
            let slot = Rc::new(Cell::new(None));
            let out = slot.clone();
            self.pool
                .spawner()
                .spawn_local(async move { out.set(Some(done.await)) })
                .expect("spawn watcher");
            slot
        }
    }

    fn no_task() -> Option<future::Ready<()>> {
        None
    }

    #[test]
    fn detached_overlay_completes_immediately() {
        let h = Harness::new();
        let done = h.c.begin("Loading...", Some(300), no_task()).now_or_never();
        assert_eq!(done, Some(Completion::Detached));
        assert!(!h.c.snapshot().visible());
    }

    #[test]
    fn begin_publishes_and_supersedes() {
        let h = Harness::new();
        let seen = Rc::new(RefCell::new(Vec::<LoaderSnapshot>::new()));
        {
            let seen = seen.clone();
            h.c.attach(Callback::from(move |s| seen.borrow_mut().push(s)));
        }
        let _first = h.c.begin("first", Some(300), no_task());
        let first_id = h.c.snapshot().session.unwrap();
        let _second = h.c.begin("second", Some(300), no_task());
        let snap = h.c.snapshot();
        assert!(snap.visible());
        assert_eq!(snap.message, "second");
        assert_ne!(snap.session, Some(first_id));
        assert_eq!(seen.borrow().last().unwrap().message, "second");
        assert_eq!(
            h.c.inner.borrow().loader.outcome_of(first_id),
            Completion::Superseded
        );
    }

    #[test]
    fn tick_and_dismiss() {
        let mut h = Harness::attached();
        h.clock.set(1000.0);
        let done = h.watch(h.c.begin("x", Some(400), Some(future::pending::<()>())));
        h.advance_to(1200.0);
        h.c.tick();
        assert_eq!(h.c.snapshot().percent, 50);
        h.c.dismiss();
        h.advance_to(1200.0);
        let snap = h.c.snapshot();
        assert!(!snap.visible());
        assert_eq!(snap.percent, 0);
        assert!(h.c.inner.borrow().cancel.is_none());
        assert_eq!(done.get(), Some(Completion::Dismissed));
    }

    #[test]
    fn unawaited_completion_still_hides() {
        let mut h = Harness::attached();
        drop(h.c.begin("x", Some(300), Some(future::pending::<()>())));
        for at in [0.0, 300.0, 3300.0, 3800.0] {
            h.advance_to(at);
        }
        h.c.tick();
        let snap = h.c.snapshot();
        assert!(!snap.visible());
        assert_eq!(snap.phase, Phase::Hidden);
    }

    #[test]
    fn late_task_holds_completion() {
        let mut h = Harness::attached();
        let (task_tx, task_rx) = oneshot::channel::<()>();
        let done = h.watch(h.c.begin("x", Some(400), Some(task_rx)));
        h.advance_to(400.0);
        assert_eq!(done.get(), None);
        assert_eq!(h.c.snapshot().percent, 100);
        assert_eq!(h.c.snapshot().phase, Phase::Animating);
        h.advance_to(799.0);
        assert_eq!(done.get(), None);

        h.clock.set(800.0);
        task_tx.send(()).unwrap();
        h.advance_to(800.0);
        assert_eq!(h.c.snapshot().phase, Phase::Settling);
        assert_eq!(done.get(), None);
        h.advance_to(1300.0);
        assert_eq!(done.get(), Some(Completion::Finished));
        assert!(!h.c.snapshot().visible());
    }

    #[test]
    fn hung_task_times_out() {
        let mut h = Harness::attached();
        let done = h.watch(h.c.begin("x", None, Some(future::pending::<()>())));
        h.advance_to(3399.0);
        assert_eq!(h.c.snapshot().phase, Phase::Animating);
        h.advance_to(3400.0);
        assert_eq!(h.c.snapshot().phase, Phase::Settling);
        assert_eq!(done.get(), None);
        h.advance_to(3900.0);
        assert_eq!(done.get(), Some(Completion::TimedOut));
        assert!(!h.c.snapshot().visible());
    }

    #[test]
    fn superseded_driver_leaves_new_session_alone() {
        let mut h = Harness::attached();
        let first = h.watch(h.c.begin("first", Some(300), no_task()));
        h.advance_to(100.0);
        let second = h.watch(h.c.begin("second", Some(300), no_task()));
        h.advance_to(100.0);
        assert_eq!(first.get(), Some(Completion::Superseded));

        // first session's animation end passes; the second keeps animating
        h.advance_to(300.0);
        let snap = h.c.snapshot();
        assert_eq!(snap.message, "second");
        assert_eq!(snap.phase, Phase::Animating);
        h.advance_to(400.0);
        assert_eq!(h.c.snapshot().phase, Phase::Settling);
        h.advance_to(900.0);
        assert_eq!(second.get(), Some(Completion::Finished));
    }

    #[test]
    fn abandon_resolves_without_proceeding() {
        let mut h = Harness::attached();
        let done = h.watch(h.c.begin("Loading saved game...", None, Some(future::pending::<()>())));
        h.advance_to(50.0);
        h.c.abandon();
        h.advance_to(50.0);
        assert!(!h.c.snapshot().visible());
        let outcome = done.get().unwrap();
        assert_eq!(outcome, Completion::Superseded);
        assert!(!outcome.should_proceed());
    }

    #[test]
    fn style_change_is_published() {
        let h = Harness::new();
        let last = Rc::new(RefCell::new(None));
        {
            let last = last.clone();
            h.c.attach(Callback::from(move |s: LoaderSnapshot| *last.borrow_mut() = Some(s.style)));
        }
        h.c.set_style(LoaderStyle::Jerrycan);
        assert_eq!(*last.borrow(), Some(LoaderStyle::Jerrycan));
    }
}
