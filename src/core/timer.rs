//=========================================================================
// Scene Timers
//=========================================================================
//
// Virtual-time scheduling for the scene's background effects.
//
// Architecture:
// ```text
//   SceneController ──after()/every()──> Scheduler
//         ↑                                  │
//         └──── pop_due(until) ◄─────────────┘
//               (one task at a time, deadline order)
// ```
//
// Timers carry `TimerTask` values instead of closures: the controller
// owns all scene state, so a fired timer is just a command it runs on
// itself. Because tasks are popped one at a time, a task that schedules
// a new timer inside the current window (e.g. a glyph spawned at t=3s
// that expires at t=13s while advancing 60s) still fires in order.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::BTreeMap;
use std::time::Duration;

use log::trace;

//=== Internal Dependencies ===============================================

use crate::core::scene::NodeId;
use crate::core::surface::LandmarkId;

//=== TimerTask ===========================================================

/// Work a timer performs when it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerTask {
    /// Ambient spawner tick (probabilistic glyph).
    SpawnAmbient,

    /// Traffic-light phase advance.
    CycleTrafficLight,

    /// Day/night auto-cycle tick.
    ToggleDayNight,

    /// Welcome panel shown shortly after start.
    ShowWelcome,

    /// Deferred start-up: traffic light and population counter.
    DeferredStart,

    /// Remove a decorative node whose lifetime ended.
    Expire(NodeId),

    /// Restore a landmark's scale after a click pulse.
    RestoreScale(LandmarkId),
}

//=== TimerId =============================================================

/// Handle returned by [`Scheduler::after`] and [`Scheduler::every`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

//=== Scheduler Trait =====================================================

/// Timer source injected into the scene controller.
///
/// Time is a monotonically increasing [`Duration`] since the controller
/// started. Implementations decide how that relates to wall-clock time;
/// [`VirtualScheduler`] only moves when told to.
pub trait Scheduler: Send {
    /// Current scheduler time.
    fn now(&self) -> Duration;

    /// Schedules a one-shot task `delay` from now.
    fn after(&mut self, delay: Duration, task: TimerTask) -> TimerId;

    /// Schedules a repeating task every `period`, first firing one period from now.
    fn every(&mut self, period: Duration, task: TimerTask) -> TimerId;

    /// Cancels a pending timer. Returns `false` if it already fired or never existed.
    fn cancel(&mut self, id: TimerId) -> bool;

    /// Pops the earliest task due at or before `until`, moving the clock to
    /// its deadline. Repeating timers are re-armed before returning.
    fn pop_due(&mut self, until: Duration) -> Option<TimerTask>;

    /// Moves the clock forward to `now` (never backwards).
    fn settle(&mut self, now: Duration);

    /// Number of armed timers.
    fn pending(&self) -> usize;
}

//=== VirtualScheduler ====================================================

#[derive(Debug, Clone)]
struct TimerEntry {
    id: TimerId,
    task: TimerTask,
    period: Option<Duration>,
}

/// Deterministic scheduler driven entirely by the caller.
///
/// Timers with equal deadlines fire in the order they were armed.
#[derive(Debug, Default)]
pub struct VirtualScheduler {
    now: Duration,
    next_seq: u64,
    queue: BTreeMap<(Duration, u64), TimerEntry>,
}

impl VirtualScheduler {
    /// Creates a scheduler at time zero with nothing armed.
    pub fn new() -> Self {
        Self::default()
    }

    fn arm(&mut self, deadline: Duration, id: TimerId, task: TimerTask, period: Option<Duration>) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.queue.insert((deadline, seq), TimerEntry { id, task, period });
    }

    fn next_id(&mut self) -> TimerId {
        // ids share the sequence counter, so they are unique and ordered
        TimerId(self.next_seq)
    }
}

impl Scheduler for VirtualScheduler {
    fn now(&self) -> Duration {
        self.now
    }

    fn after(&mut self, delay: Duration, task: TimerTask) -> TimerId {
        let id = self.next_id();
        self.arm(self.now + delay, id, task, None);
        id
    }

    fn every(&mut self, period: Duration, task: TimerTask) -> TimerId {
        assert!(!period.is_zero(), "Repeating timer period must be positive");
        let id = self.next_id();
        self.arm(self.now + period, id, task, Some(period));
        id
    }

    fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.queue.len();
        self.queue.retain(|_, entry| entry.id != id);
        self.queue.len() != before
    }

    fn pop_due(&mut self, until: Duration) -> Option<TimerTask> {
        let (&(deadline, _), _) = self.queue.first_key_value()?;
        if deadline > until {
            return None;
        }

        let (_, entry) = self.queue.pop_first()?;
        self.now = self.now.max(deadline);
        trace!(target: "scene::timer", "Timer {:?} fired at {:?}: {:?}", entry.id, deadline, entry.task);

        if let Some(period) = entry.period {
            self.arm(deadline + period, entry.id, entry.task, Some(period));
        }

        Some(entry.task)
    }

    fn settle(&mut self, now: Duration) {
        self.now = self.now.max(now);
    }

    fn pending(&self) -> usize {
        self.queue.len()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(s: u64) -> Duration {
        Duration::from_secs(s)
    }

    fn drain(scheduler: &mut VirtualScheduler, until: Duration) -> Vec<TimerTask> {
        let mut fired = Vec::new();
        while let Some(task) = scheduler.pop_due(until) {
            fired.push(task);
        }
        scheduler.settle(until);
        fired
    }

    //=====================================================================
    // One-shot Timers
    //=====================================================================

    #[test]
    fn one_shot_fires_once_at_deadline() {
        let mut scheduler = VirtualScheduler::new();
        scheduler.after(secs(1), TimerTask::ShowWelcome);

        assert!(drain(&mut scheduler, Duration::from_millis(999)).is_empty());
        assert_eq!(drain(&mut scheduler, secs(1)), vec![TimerTask::ShowWelcome]);
        assert!(drain(&mut scheduler, secs(10)).is_empty());
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn equal_deadlines_fire_in_arming_order() {
        let mut scheduler = VirtualScheduler::new();
        scheduler.after(secs(2), TimerTask::DeferredStart);
        scheduler.after(secs(2), TimerTask::ShowWelcome);

        assert_eq!(
            drain(&mut scheduler, secs(2)),
            vec![TimerTask::DeferredStart, TimerTask::ShowWelcome]
        );
    }

    #[test]
    fn clock_moves_to_each_deadline() {
        let mut scheduler = VirtualScheduler::new();
        scheduler.after(secs(3), TimerTask::ShowWelcome);

        assert_eq!(scheduler.pop_due(secs(10)), Some(TimerTask::ShowWelcome));
        assert_eq!(scheduler.now(), secs(3));

        scheduler.settle(secs(10));
        assert_eq!(scheduler.now(), secs(10));
    }

    #[test]
    fn settle_never_moves_backwards() {
        let mut scheduler = VirtualScheduler::new();
        scheduler.settle(secs(5));
        scheduler.settle(secs(2));
        assert_eq!(scheduler.now(), secs(5));
    }

    //=====================================================================
    // Repeating Timers
    //=====================================================================

    #[test]
    fn repeating_timer_fires_every_period() {
        let mut scheduler = VirtualScheduler::new();
        scheduler.every(secs(2), TimerTask::CycleTrafficLight);

        let fired = drain(&mut scheduler, secs(9));
        assert_eq!(fired.len(), 4, "Ticks at 2, 4, 6, 8");
        assert_eq!(scheduler.pending(), 1, "Repeating timer stays armed");
    }

    #[test]
    fn interleaves_repeating_and_one_shot() {
        let mut scheduler = VirtualScheduler::new();
        scheduler.every(secs(3), TimerTask::SpawnAmbient);
        scheduler.after(secs(4), TimerTask::ShowWelcome);

        assert_eq!(
            drain(&mut scheduler, secs(6)),
            vec![TimerTask::SpawnAmbient, TimerTask::ShowWelcome, TimerTask::SpawnAmbient]
        );
    }

    #[test]
    fn timers_armed_mid_advance_fire_in_same_window() {
        let mut scheduler = VirtualScheduler::new();
        scheduler.after(secs(1), TimerTask::ShowWelcome);

        assert_eq!(scheduler.pop_due(secs(20)), Some(TimerTask::ShowWelcome));
        // Armed relative to the fired deadline (t=1), not the window end
        scheduler.after(secs(10), TimerTask::DeferredStart);

        assert_eq!(scheduler.pop_due(secs(20)), Some(TimerTask::DeferredStart));
        assert_eq!(scheduler.now(), secs(11));
    }

    #[test]
    #[should_panic(expected = "period must be positive")]
    fn zero_period_panics() {
        let mut scheduler = VirtualScheduler::new();
        scheduler.every(Duration::ZERO, TimerTask::SpawnAmbient);
    }

    //=====================================================================
    // Cancellation
    //=====================================================================

    #[test]
    fn cancel_removes_pending_timer() {
        let mut scheduler = VirtualScheduler::new();
        let id = scheduler.every(secs(30), TimerTask::ToggleDayNight);

        assert!(scheduler.cancel(id));
        assert!(!scheduler.cancel(id), "Second cancel finds nothing");
        assert!(drain(&mut scheduler, secs(120)).is_empty());
    }

    #[test]
    fn cancel_keeps_other_timers() {
        let mut scheduler = VirtualScheduler::new();
        let a = scheduler.after(secs(1), TimerTask::ShowWelcome);
        scheduler.after(secs(1), TimerTask::DeferredStart);

        scheduler.cancel(a);
        assert_eq!(drain(&mut scheduler, secs(1)), vec![TimerTask::DeferredStart]);
    }
}
