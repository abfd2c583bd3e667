use log::{error, info};

use tilewalk::assets::EmbeddedAssets;
use tilewalk::config::DemoConfig;
use tilewalk::demo::Demo;
use tilewalk::engine::EngineBuilder;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let assets = EmbeddedAssets::bundled();
    let config = DemoConfig::default();
    let title = config.title.clone();
    let ups = config.ups;

    let demo = match Demo::load(&assets, config) {
        Ok(demo) => demo,
        Err(e) => {
            error!("failed to load demo: {e}");
            std::process::exit(1);
        }
    };

    let window = demo.window_config();
    info!("starting '{title}' at {}x{}", window.logical_width, window.logical_height);

    let result = EngineBuilder::default()
        .with_title(&title)
        .with_size(window.logical_width, window.logical_height)
        .with_ups(ups)
        .run(demo);

    if let Err(e) = result {
        error!("{e}");
        std::process::exit(1);
    }
}
