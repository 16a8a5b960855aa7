//! Loading indicator state machine.
//!
//! Time is passed in explicitly (milliseconds on a monotonic clock) so the
//! machine can be driven by browser timers in the app and by plain numbers in
//! tests. Every operation takes the session id it was issued for; calls with a
//! stale id never mutate the current session.

use tracing::{debug, warn};

use crate::config::LoaderConfig;

pub type SessionId = u64;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Hidden,
    Animating,
    /// Held at 100% while the finish splash plays.
    Settling,
}

/// How a session ended, as reported to whoever awaited it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Completion {
    Finished,
    /// Forced by the safety timeout.
    TimedOut,
    Dismissed,
    /// Replaced by a newer `begin`; the indicator was left alone.
    Superseded,
    /// No indicator was mounted.
    Detached,
}

impl Completion {
    /// Whether the caller should go on with its screen transition.
    pub fn should_proceed(self) -> bool {
        !matches!(self, Completion::Superseded)
    }
}

/// What the driver has to do next for a session.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Step {
    /// Call `advance` again at this time (or earlier, if the task settles).
    WaitUntil(f64),
    Done(Completion),
}

#[derive(Clone, Debug, PartialEq)]
pub struct IndicatorSession {
    pub id: SessionId,
    pub message: String,
    pub duration_ms: f64,
    pub start_time: f64,
    pub task_pending: bool,
    pub elapsed_percent: u8,
    settle_deadline: Option<f64>,
    timed_out: bool,
}

impl IndicatorSession {
    fn animation_end(&self) -> f64 {
        self.start_time + self.duration_ms
    }

    fn sample(&mut self, now: f64) -> u8 {
        let ratio = ((now - self.start_time) / self.duration_ms).clamp(0.0, 1.0);
        let pct = (ratio * 100.0).round() as u8;
        self.elapsed_percent = self.elapsed_percent.max(pct);
        self.elapsed_percent
    }
}

#[derive(Clone, Debug)]
pub struct Loader {
    config: LoaderConfig,
    phase: Phase,
    session: Option<IndicatorSession>,
    next_id: SessionId,
    last_closed: Option<(SessionId, Completion)>,
}

impl Loader {
    pub fn new(config: LoaderConfig) -> Self {
        Self {
            config,
            phase: Phase::Hidden,
            session: None,
            next_id: 1,
            last_closed: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn session(&self) -> Option<&IndicatorSession> {
        self.session.as_ref()
    }

    pub fn current_id(&self) -> Option<SessionId> {
        self.session.as_ref().map(|s| s.id)
    }

    pub fn is_current(&self, id: SessionId) -> bool {
        self.current_id() == Some(id)
    }

    pub fn percent(&self) -> u8 {
        self.session.as_ref().map_or(0, |s| s.elapsed_percent)
    }

    /// Starts a session, replacing any visible one.
    pub fn begin(
        &mut self,
        message: &str,
        duration_ms: Option<u32>,
        has_task: bool,
        now: f64,
    ) -> SessionId {
        if let Some(old) = self.session.take() {
            debug!(old = old.id, "loading session superseded");
            self.last_closed = Some((old.id, Completion::Superseded));
        }
        let id = self.next_id;
        self.next_id += 1;
        let duration = duration_ms.unwrap_or(self.config.default_duration_ms).max(1);
        self.session = Some(IndicatorSession {
            id,
            message: message.to_string(),
            duration_ms: duration as f64,
            start_time: now,
            task_pending: has_task,
            elapsed_percent: 0,
            settle_deadline: None,
            timed_out: false,
        });
        self.phase = Phase::Animating;
        debug!(id, duration, has_task, message, "loading session started");
        id
    }

    /// Per-frame percent sample; `None` for a stale id.
    pub fn tick(&mut self, id: SessionId, now: f64) -> Option<u8> {
        let phase = self.phase;
        let session = self.session.as_mut().filter(|s| s.id == id)?;
        match phase {
            Phase::Animating => Some(session.sample(now)),
            _ => Some(session.elapsed_percent),
        }
    }

    /// The external task finished (successfully or not).
    pub fn task_settled(&mut self, id: SessionId) {
        if let Some(session) = self.session.as_mut().filter(|s| s.id == id) {
            session.task_pending = false;
        }
    }

    /// Applies every deadline that has passed at `now`.
    pub fn advance(&mut self, id: SessionId, now: f64) -> Step {
        if !self.is_current(id) {
            return Step::Done(self.outcome_of(id));
        }
        let safety_margin = self.config.safety_margin_ms as f64;
        let settle_delay = self.config.settle_delay_ms as f64;
        let phase = self.phase;
        let Some(session) = self.session.as_mut() else {
            return Step::Done(Completion::Superseded);
        };
        if phase == Phase::Animating {
            session.sample(now);
            let animation_end = session.animation_end();
            let safety_deadline = animation_end + safety_margin;
            if now >= safety_deadline {
                warn!(id, message = %session.message, "loading safety timeout fired");
                session.timed_out = true;
            } else if now < animation_end {
                return Step::WaitUntil(animation_end);
            } else if session.task_pending {
                return Step::WaitUntil(safety_deadline);
            }
            session.elapsed_percent = 100;
            let deadline = now + settle_delay;
            session.settle_deadline = Some(deadline);
            self.phase = Phase::Settling;
            if settle_delay > 0.0 {
                return Step::WaitUntil(deadline);
            }
        }
        let Some((settle_deadline, timed_out)) =
            self.session.as_ref().map(|s| (s.settle_deadline, s.timed_out))
        else {
            return Step::Done(Completion::Superseded);
        };
        match settle_deadline {
            Some(deadline) if now < deadline => Step::WaitUntil(deadline),
            _ => {
                let outcome = if timed_out {
                    Completion::TimedOut
                } else {
                    Completion::Finished
                };
                self.close(outcome);
                Step::Done(outcome)
            }
        }
    }

    /// Hides the indicator immediately. Returns the dismissed session id.
    pub fn dismiss(&mut self) -> Option<SessionId> {
        let id = self.current_id()?;
        debug!(id, "loading session dismissed");
        self.close(Completion::Dismissed);
        Some(id)
    }

    /// Hides the indicator and tells the awaiting caller not to proceed.
    pub fn abandon(&mut self) -> Option<SessionId> {
        let id = self.current_id()?;
        debug!(id, "loading session abandoned");
        self.close(Completion::Superseded);
        Some(id)
    }

    /// How a session that is no longer current ended.
    pub fn outcome_of(&self, id: SessionId) -> Completion {
        match self.last_closed {
            Some((closed, outcome)) if closed == id => outcome,
            _ => Completion::Superseded,
        }
    }

    fn close(&mut self, outcome: Completion) {
        if let Some(session) = self.session.take() {
            self.last_closed = Some((session.id, outcome));
        }
        self.phase = Phase::Hidden;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SETTLE: f64 = 500.0;
    const MARGIN: f64 = 3000.0;

    fn loader() -> Loader {
        Loader::new(LoaderConfig::default())
    }

    /// Runs a session to completion, firing timers exactly at their deadlines
    /// and settling the task (if any) at `task_at`. Returns (outcome, end time).
    fn drive(l: &mut Loader, id: SessionId, task_at: Option<f64>) -> (Completion, f64) {
        let mut now = 0.0;
        let mut task_at = task_at;
        loop {
            match l.advance(id, now) {
                Step::Done(outcome) => return (outcome, now),
                Step::WaitUntil(deadline) => {
                    assert!(deadline >= now);
                    match task_at {
                        Some(t) if t <= deadline => {
                            now = t;
                            task_at = None;
                            l.task_settled(id);
                        }
                        _ => now = deadline,
                    }
                }
            }
        }
    }

    #[test]
    fn no_task_hides_after_duration_plus_settle() {
        let mut l = loader();
        let id = l.begin("Loading...", Some(300), false, 0.0);
        assert_eq!(l.phase(), Phase::Animating);
        assert_eq!(l.percent(), 0);
        let (outcome, end) = drive(&mut l, id, None);
        assert_eq!(outcome, Completion::Finished);
        assert!((end - (300.0 + SETTLE)).abs() < 1e-9);
        assert_eq!(l.phase(), Phase::Hidden);
        assert_eq!(l.percent(), 0);
    }

    #[test]
    fn completion_bound_holds_for_many_durations() {
        for duration in [1u32, 7, 16, 250, 400, 1999, 10_000] {
            let mut l = loader();
            let id = l.begin("x", Some(duration), false, 0.0);
            let (outcome, end) = drive(&mut l, id, None);
            assert_eq!(outcome, Completion::Finished);
            assert!(end <= duration as f64 + SETTLE + 1.0, "duration {duration}");
        }
    }

    #[test]
    fn late_task_gates_completion() {
        let mut l = loader();
        let id = l.begin("x", Some(300), true, 0.0);
        let (outcome, end) = drive(&mut l, id, Some(800.0));
        assert_eq!(outcome, Completion::Finished);
        assert!(end >= 800.0);
        assert!((end - (800.0 + SETTLE)).abs() < 1e-9);
    }

    #[test]
    fn early_task_does_not_cut_animation_short() {
        let mut l = loader();
        let id = l.begin("x", Some(300), true, 0.0);
        let (_, end) = drive(&mut l, id, Some(50.0));
        assert!((end - (300.0 + SETTLE)).abs() < 1e-9);
    }

    #[test]
    fn never_settling_task_hits_safety_timeout() {
        let mut l = loader();
        let id = l.begin("x", Some(300), true, 0.0);
        let mut now = 0.0;
        let mut forced_at = None;
        let outcome = loop {
            match l.advance(id, now) {
                Step::Done(o) => break o,
                Step::WaitUntil(d) => {
                    if forced_at.is_none() && l.phase() == Phase::Settling {
                        forced_at = Some(now);
                    }
                    now = d;
                }
            }
        };
        assert_eq!(outcome, Completion::TimedOut);
        assert_eq!(forced_at, Some(300.0 + MARGIN));
        assert!((now - (300.0 + MARGIN + SETTLE)).abs() < 1e-9);
    }

    #[test]
    fn stalled_clock_still_forced_by_safety_deadline() {
        // Frames stop arriving entirely; only the safety timer fires.
        let mut l = loader();
        let id = l.begin("x", Some(400), true, 0.0);
        assert_eq!(l.advance(id, 10.0), Step::WaitUntil(400.0));
        assert_eq!(l.advance(id, 5000.0), Step::WaitUntil(5500.0));
        assert_eq!(l.percent(), 100);
        assert_eq!(l.advance(id, 5500.0), Step::Done(Completion::TimedOut));
    }

    #[test]
    fn percent_is_monotonic_and_bounded() {
        let mut l = loader();
        let id = l.begin("x", Some(300), false, 1000.0);
        let mut last = 0;
        // includes a clock that jumps backwards and one far past the end
        for t in [1000.0, 1016.0, 1100.0, 1050.0, 1200.0, 1299.0, 1300.0, 1900.0, 1400.0] {
            let pct = l.tick(id, t).unwrap();
            assert!(pct >= last);
            assert!(pct <= 100);
            last = pct;
        }
        assert_eq!(last, 100);
        assert_eq!(l.tick(id, 1150.0), Some(100));
    }

    #[test]
    fn percent_follows_rounded_ratio() {
        let mut l = loader();
        let id = l.begin("x", Some(400), false, 0.0);
        assert_eq!(l.tick(id, 0.0), Some(0));
        assert_eq!(l.tick(id, 2.0), Some(1)); // 0.5 rounds up
        assert_eq!(l.tick(id, 100.0), Some(25));
        assert_eq!(l.tick(id, 333.0), Some(83));
    }

    #[test]
    fn second_begin_supersedes_first() {
        let mut l = loader();
        let first = l.begin("first", Some(300), false, 0.0);
        assert_eq!(l.advance(first, 0.0), Step::WaitUntil(300.0));
        let second = l.begin("second", Some(300), false, 100.0);
        assert_ne!(first, second);

        // The first session's timer fires late; it must not touch the second.
        assert_eq!(l.advance(first, 300.0), Step::Done(Completion::Superseded));
        assert_eq!(l.tick(first, 300.0), None);
        l.task_settled(first);
        assert_eq!(l.phase(), Phase::Animating);
        assert_eq!(l.session().unwrap().message, "second");
        assert_eq!(l.advance(second, 300.0), Step::WaitUntil(400.0));

        assert_eq!(l.advance(second, 400.0), Step::WaitUntil(900.0));
        assert_eq!(l.advance(second, 900.0), Step::Done(Completion::Finished));
        // Stale safety timer of the first session after the second completed.
        assert_eq!(l.advance(first, 3300.0), Step::Done(Completion::Superseded));
        assert_eq!(l.phase(), Phase::Hidden);
    }

    #[test]
    fn dismiss_hides_immediately() {
        let mut l = loader();
        let id = l.begin("x", Some(300), true, 0.0);
        l.tick(id, 150.0);
        assert_eq!(l.dismiss(), Some(id));
        assert_eq!(l.phase(), Phase::Hidden);
        assert_eq!(l.percent(), 0);
        assert_eq!(l.advance(id, 300.0), Step::Done(Completion::Dismissed));
        assert_eq!(l.dismiss(), None);
    }

    #[test]
    fn abandoned_session_does_not_proceed() {
        let mut l = loader();
        let id = l.begin("x", Some(300), true, 0.0);
        assert_eq!(l.abandon(), Some(id));
        assert_eq!(l.phase(), Phase::Hidden);
        let outcome = l.outcome_of(id);
        assert_eq!(outcome, Completion::Superseded);
        assert!(!outcome.should_proceed());
        assert_eq!(l.abandon(), None);
    }

    #[test]
    fn default_and_zero_durations() {
        let mut l = loader();
        let id = l.begin("x", None, false, 0.0);
        assert_eq!(l.advance(id, 0.0), Step::WaitUntil(400.0));
        let id = l.begin("x", Some(0), false, 0.0);
        assert_eq!(l.advance(id, 0.0), Step::WaitUntil(1.0));
    }

    #[test]
    fn superseded_never_proceeds() {
        assert!(!Completion::Superseded.should_proceed());
        assert!(Completion::TimedOut.should_proceed());
        assert!(Completion::Detached.should_proceed());
    }
}
