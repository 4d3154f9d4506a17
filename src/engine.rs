//=========================================================================
// Virtual City Engine
//
// Entry point: builds the scene, spawns the logic thread, runs the window.
//
// Architecture:
// ```text
//     EngineBuilder  ──build()──>  Engine  ──run()──>  [Runtime]
//         │                          │
//         ├─ with_tps()              ├─ init(|systems| ...)
//         ├─ with_channel_capacity() └─ spawns logic thread
//         ├─ with_seed()                runs platform
//         ├─ with_size()                blocks until exit
//         └─ with_scene_config()
// ```
//
//=========================================================================

//=== External Dependencies ===============================================

use crossbeam_channel::{bounded, Receiver, Sender};
use log::{error, info};

//=== Internal Dependencies ===============================================

use crate::core::globals::GlobalSystems;
use crate::core::platform_bridge::{PlatformError, PlatformEvent};
use crate::core::scene::SceneConfig;
use crate::core::CoreSystemsOrchestrator;
use crate::platform::Platform;

//=== Constants ===========================================================

const WINDOW_TITLE: &str = "Virtual City";

//=== EngineBuilder =======================================================

/// Builder for an [`Engine`].
///
/// # Default Values
///
/// - **TPS**: 60.0 (logic ticks per second)
/// - **Channel capacity**: 128 messages
/// - **Seed**: 0
/// - **Size**: 1280×720 logical pixels
/// - **Scene config**: [`SceneConfig::default`]
///
/// # Examples
///
/// ```no_run
/// use std::time::Duration;
/// use virtual_city::core::input::CityAction;
/// use virtual_city::core::scene::{SceneConfig, WeatherKind};
/// use virtual_city::EngineBuilder;
///
/// let config = SceneConfig::builder().with_day_night_cycle(Duration::from_secs(60));
///
/// EngineBuilder::new()
///     .with_tps(120.0)
///     .with_seed(42)
///     .with_scene_config(config)
///     .build()
///     .init(|systems| {
///         systems.input.bind_char('w', CityAction::Weather(WeatherKind::Rain));
///     })
///     .run()
///     .ok();
/// ```
pub struct EngineBuilder {
    tps: f64,
    channel_capacity: usize,
    seed: u64,
    size: (f32, f32),
    scene_config: SceneConfig,
}

impl EngineBuilder {
    pub fn new() -> Self {
        Self {
            tps: 60.0,
            channel_capacity: 128,
            seed: 0,
            size: (1280.0, 720.0),
            scene_config: SceneConfig::default(),
        }
    }

    /// Sets the logic thread's tick rate.
    ///
    /// # Panics
    ///
    /// Panics if `tps <= 0.0`.
    pub fn with_tps(mut self, tps: f64) -> Self {
        assert!(tps > 0.0, "TPS must be positive, got {}", tps);
        self.tps = tps;
        self
    }

    /// Sets the platform → logic channel capacity.
    ///
    /// # Panics
    ///
    /// Panics if `capacity == 0`.
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        assert!(capacity > 0, "Channel capacity must be positive");
        self.channel_capacity = capacity;
        self
    }

    /// Seeds the scene's random source. Equal seeds replay equal scenes.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Sets the window's logical size, which is also the stage size.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is not positive.
    pub fn with_size(mut self, width: f32, height: f32) -> Self {
        assert!(width > 0.0 && height > 0.0, "Window size must be positive");
        self.size = (width, height);
        self
    }

    pub fn with_scene_config(mut self, config: SceneConfig) -> Self {
        self.scene_config = config;
        self
    }

    /// Builds the engine and its systems.
    pub fn build(self) -> Engine {
        info!(
            "Building engine (TPS: {}, channel: {}, seed: {})",
            self.tps, self.channel_capacity, self.seed
        );

        Engine {
            orchestrator: CoreSystemsOrchestrator::new(self.size, self.scene_config, self.seed),
            tps: self.tps,
            channel_capacity: self.channel_capacity,
            size: self.size,
        }
    }
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

//=== Engine ==============================================================

/// Virtual City runtime.
///
/// ```text
/// Engine (Main Thread)
///   ├─► CoreSystemsOrchestrator (Logic Thread @ TPS)
///   │     └─► InputSystem → SceneController<Stage>
///   │
///   └─► Platform (winit event loop)
///
/// Communication: bounded crossbeam channel (PlatformEvent)
/// ```
pub struct Engine {
    orchestrator: CoreSystemsOrchestrator,
    tps: f64,
    channel_capacity: usize,
    size: (f32, f32),
}

impl Engine {
    //--- Initialization ---------------------------------------------------

    /// Configures the systems (extra key bindings, pre-placed traffic, ...)
    /// before the scene starts.
    pub fn init<F>(mut self, init_fn: F) -> Self
    where
        F: FnOnce(&mut GlobalSystems),
    {
        info!("Initializing engine systems");
        self.orchestrator.init_systems(init_fn);
        self
    }

    //--- Execution --------------------------------------------------------

    /// Runs until the window closes.
    ///
    /// 1. Creates the platform → logic channel
    /// 2. Spawns the logic thread (which starts the scene)
    /// 3. Runs the winit event loop on this thread
    /// 4. Joins the logic thread
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError`] if the event loop could not be created or
    /// failed while running. The logic thread is joined either way.
    pub fn run(self) -> Result<(), PlatformError> {
        info!("Starting engine runtime (TPS: {})", self.tps);

        //--- 1. Create communication channel -----------------------------
        let (tx, rx): (Sender<PlatformEvent>, Receiver<PlatformEvent>) =
            bounded(self.channel_capacity);

        //--- 2. Spawn the core logic thread -------------------------------
        let core_handle = self.orchestrator.spawn_core_thread(rx, self.tps);
        info!("Core logic thread spawned");

        //--- 3. Launch the platform subsystem -----------------------------
        let size = (f64::from(self.size.0), f64::from(self.size.1));
        let result = Platform::new(tx, WINDOW_TITLE, size).run();
        if let Err(e) = &result {
            error!("Platform error: {}", e);
        }
        info!("Platform event loop exited");

        //--- 4. Wait for the logic thread ---------------------------------
        // The platform's sender is dropped by now, so the thread sees a
        // disconnect even if WindowClosed was never sent.
        match core_handle.join() {
            Ok(()) => info!("Core thread terminated cleanly"),
            Err(e) => error!("Core thread panicked: {:?}", e),
        }

        info!("Engine shutdown complete");
        result
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
