//=========================================================================
// Event Collector
//=========================================================================
//
// Logic-side reader of the platform channel.
//
// Architecture:
//   Receiver<PlatformEvent> → collect_frame(budget) → batches → TickControl
//
// Each tick waits up to the frame budget for the first message, then
// drains what is already queued (bounded, so a flood of pointer moves
// cannot starve the scene timers).
//
//=========================================================================

//=== External Dependencies ===============================================

use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, TryRecvError};
use log::warn;

//=== Internal Dependencies ===============================================

use super::PlatformEvent;
use crate::core::input::InputEvent;

//=== Constants ===========================================================

const MAX_EVENTS_PER_FRAME: usize = 100;

//=== TickControl =========================================================

/// Whether the logic loop keeps running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TickControl {
    Continue,
    Exit,
}

//=== EventCollector ======================================================

/// Gathers one tick's worth of input batches from the platform.
pub(crate) struct EventCollector {
    receiver: Receiver<PlatformEvent>,
    input_batches: Vec<Vec<InputEvent>>,
}

impl EventCollector {
    pub(crate) fn new(receiver: Receiver<PlatformEvent>) -> Self {
        Self {
            receiver,
            input_batches: Vec::with_capacity(4),
        }
    }

    /// Waits up to `budget` for input, then drains the backlog.
    ///
    /// Returns `Exit` on window close or when the platform side hangs up.
    pub(crate) fn collect_frame(&mut self, budget: Duration) -> TickControl {
        self.input_batches.clear();

        match self.receiver.recv_timeout(budget) {
            Ok(event) => {
                if self.handle_event(event) == TickControl::Exit {
                    return TickControl::Exit;
                }
            }
            Err(RecvTimeoutError::Timeout) => return TickControl::Continue,
            Err(RecvTimeoutError::Disconnected) => return TickControl::Exit,
        }

        let mut drained = 1;
        while drained < MAX_EVENTS_PER_FRAME {
            match self.receiver.try_recv() {
                Ok(event) => {
                    if self.handle_event(event) == TickControl::Exit {
                        return TickControl::Exit;
                    }
                    drained += 1;
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => return TickControl::Exit,
            }
        }

        if drained >= MAX_EVENTS_PER_FRAME {
            warn!(target: "platform", "Event backlog: drained {} messages this tick", drained);
        }

        TickControl::Continue
    }

    /// Input batches collected this tick, in arrival order.
    pub(crate) fn batches(&self) -> &[Vec<InputEvent>] {
        &self.input_batches
    }

    fn handle_event(&mut self, event: PlatformEvent) -> TickControl {
        match event {
            PlatformEvent::Inputs { discrete, continuous } => {
                if !discrete.is_empty() {
                    self.input_batches.push(discrete);
                }
                if !continuous.is_empty() {
                    self.input_batches.push(continuous);
                }
                TickControl::Continue
            }
            PlatformEvent::WindowClosed => TickControl::Exit,
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::input::{KeyCode, Modifiers};
    use crossbeam_channel::unbounded;

    const BUDGET: Duration = Duration::from_millis(5);

    fn key_n() -> InputEvent {
        InputEvent::KeyDown { key: KeyCode::KeyN, modifiers: Modifiers::NONE }
    }

    #[test]
    fn idle_tick_times_out_and_continues() {
        let (_tx, rx) = unbounded::<PlatformEvent>();
        let mut collector = EventCollector::new(rx);

        assert_eq!(collector.collect_frame(BUDGET), TickControl::Continue);
        assert!(collector.batches().is_empty());
    }

    #[test]
    fn discrete_batch_precedes_pointer_batch() {
        let (tx, rx) = unbounded();
        let mut collector = EventCollector::new(rx);

        tx.send(PlatformEvent::Inputs {
            discrete: vec![key_n()],
            continuous: vec![InputEvent::PointerMoved { x: 4.0, y: 2.0 }],
        })
        .unwrap();
        tx.send(PlatformEvent::Inputs { discrete: vec![], continuous: vec![] }).unwrap();

        assert_eq!(collector.collect_frame(BUDGET), TickControl::Continue);
        assert_eq!(collector.batches().len(), 2, "Empty flushes add nothing");
        assert_eq!(collector.batches()[0], vec![key_n()]);
    }

    #[test]
    fn window_close_exits() {
        let (tx, rx) = unbounded();
        let mut collector = EventCollector::new(rx);

        tx.send(PlatformEvent::Inputs { discrete: vec![key_n()], continuous: vec![] }).unwrap();
        tx.send(PlatformEvent::WindowClosed).unwrap();

        assert_eq!(collector.collect_frame(BUDGET), TickControl::Exit);
    }

    #[test]
    fn hang_up_exits() {
        let (tx, rx) = unbounded::<PlatformEvent>();
        let mut collector = EventCollector::new(rx);
        drop(tx);

        assert_eq!(collector.collect_frame(BUDGET), TickControl::Exit);
    }

    #[test]
    fn batches_do_not_carry_over() {
        let (tx, rx) = unbounded();
        let mut collector = EventCollector::new(rx);

        tx.send(PlatformEvent::Inputs { discrete: vec![key_n()], continuous: vec![] }).unwrap();
        collector.collect_frame(BUDGET);
        assert_eq!(collector.batches().len(), 1);

        collector.collect_frame(BUDGET);
        assert!(collector.batches().is_empty());
    }

    #[test]
    fn backlog_is_bounded_per_tick() {
        let (tx, rx) = unbounded();
        let mut collector = EventCollector::new(rx);
        for _ in 0..150 {
            tx.send(PlatformEvent::Inputs { discrete: vec![key_n()], continuous: vec![] }).unwrap();
        }

        collector.collect_frame(BUDGET);
        assert_eq!(collector.batches().len(), MAX_EVENTS_PER_FRAME);

        collector.collect_frame(BUDGET);
        assert_eq!(collector.batches().len(), 50);
    }
}
