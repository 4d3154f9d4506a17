//=========================================================================
// Core Systems Orchestrator
//
// Runs the city scene on the logic (non-platform) thread.
//
// Architecture:
// ```text
//   PlatformEvent ──crossbeam──> EventCollector
//                                   │ batches
//                                   ▼
//                               GlobalSystems
//                                 ├─ InputSystem ──commands──┐
//                                 └─ SceneController <───────┘
//                                      └─ advance(elapsed)
// ```
//
// The loop waits at most one tick for input, dispatches it, then advances
// scene time by the real time that passed since the previous tick. Surface
// changes are logged by revision.
//
//=========================================================================

//=== Module Declarations =================================================

pub mod globals;
pub mod input;
pub(crate) mod platform_bridge;
pub mod scene;
pub mod surface;
pub mod timer;

//=== Standard Library Imports ============================================

use std::thread;
use std::time::{Duration, Instant};

//=== External Crates =====================================================

use crossbeam_channel::Receiver;
use log::{debug, info};

//=== Internal Modules ====================================================

use globals::GlobalSystems;
use platform_bridge::{EventCollector, PlatformEvent, TickControl};
use scene::SceneConfig;
use surface::Surface;

//=== CoreSystemsOrchestrator =============================================

pub(crate) struct CoreSystemsOrchestrator {
    systems: GlobalSystems,
}

impl CoreSystemsOrchestrator {
    //--- Construction -----------------------------------------------------

    pub(crate) fn new(size: (f32, f32), config: SceneConfig, seed: u64) -> Self {
        Self {
            systems: GlobalSystems::new(size, config, seed),
        }
    }

    /// Gives the caller mutable access to the systems before the thread starts.
    pub(crate) fn init_systems<F>(&mut self, init_fn: F)
    where
        F: FnOnce(&mut GlobalSystems),
    {
        init_fn(&mut self.systems);
    }

    //--- spawn_core_thread() ---------------------------------------------

    /// Starts the scene and ticks it at `tps` until the platform closes.
    pub(crate) fn spawn_core_thread(
        self,
        receiver: Receiver<PlatformEvent>,
        tps: f64,
    ) -> thread::JoinHandle<()> {
        let frame_duration = Duration::from_secs_f64(1.0 / tps);

        thread::spawn(move || {
            let mut systems = self.systems;
            let mut collector = EventCollector::new(receiver);

            systems.scene.start();
            let mut last_tick = Instant::now();
            let mut last_revision = systems.scene.surface().revision();

            loop {
                let frame_start = Instant::now();

                //--- Step 1: Gather platform events ------------------------
                if collector.collect_frame(frame_duration) == TickControl::Exit {
                    info!("Core thread exiting (scene time {:?})", systems.scene.now());
                    break;
                }

                //--- Step 2: Input, then scene time ------------------------
                let now = Instant::now();
                systems.update(collector.batches(), now - last_tick);
                last_tick = now;

                let revision = systems.scene.surface().revision();
                if revision != last_revision {
                    last_revision = revision;
                    Self::log_surface(&systems);
                }

                //--- Step 3: Pacing ----------------------------------------
                let elapsed = frame_start.elapsed();
                if elapsed < frame_duration {
                    thread::sleep(frame_duration - elapsed);
                }
            }
        })
    }

    fn log_surface(systems: &GlobalSystems) {
        let scene = &systems.scene;
        let stage = scene.surface();
        debug!(
            target: "scene",
            "Surface r{}: night={} offset={} nodes={} traffic={} light={:?}",
            stage.revision(),
            scene.is_night(),
            scene.offset().to_transform(),
            stage.nodes().count(),
            scene.traffic_count(),
            scene.traffic_light()
        );
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::input::{InputEvent, KeyCode, Modifiers};
    use crossbeam_channel::unbounded;

    #[test]
    fn init_systems_runs_before_spawn() {
        let mut orchestrator = CoreSystemsOrchestrator::new((800.0, 600.0), SceneConfig::default(), 1);
        orchestrator.init_systems(|systems| {
            systems.scene.add_traffic_unit();
        });
        assert_eq!(orchestrator.systems.scene.traffic_count(), 1);
    }

    #[test]
    fn thread_exits_on_window_close() {
        let orchestrator = CoreSystemsOrchestrator::new((800.0, 600.0), SceneConfig::default(), 1);
        let (tx, rx) = unbounded();
        let handle = orchestrator.spawn_core_thread(rx, 240.0);

        tx.send(PlatformEvent::Inputs {
            discrete: vec![InputEvent::KeyDown { key: KeyCode::KeyN, modifiers: Modifiers::NONE }],
            continuous: vec![],
        })
        .unwrap();
        tx.send(PlatformEvent::WindowClosed).unwrap();

        assert!(handle.join().is_ok());
    }

    #[test]
    fn thread_exits_when_platform_hangs_up() {
        let orchestrator = CoreSystemsOrchestrator::new((800.0, 600.0), SceneConfig::default(), 1);
        let (tx, rx) = unbounded::<PlatformEvent>();
        let handle = orchestrator.spawn_core_thread(rx, 240.0);

        drop(tx);
        assert!(handle.join().is_ok());
    }
}
