//=========================================================================
// virtual-city
//
// Opens the city window. Log level via RUST_LOG, e.g.
//   RUST_LOG=scene=debug,platform=info virtual-city
//
//=========================================================================

use log::error;
use virtual_city::prelude::*;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let seed = std::env::var("VIRTUAL_CITY_SEED")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(0);

    let result = EngineBuilder::new()
        .with_seed(seed)
        .with_scene_config(SceneConfig::default())
        .build()
        .init(|systems| {
            systems.input.bind_char('w', CityAction::Weather(WeatherKind::Rain));
            systems.input.bind_char('s', CityAction::Weather(WeatherKind::Snow));
        })
        .run();

    if let Err(e) = result {
        error!("virtual-city stopped: {}", e);
        std::process::exit(1);
    }
}
