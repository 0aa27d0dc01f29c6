mod app;
mod catalog;
mod error;
mod event_loop;
mod layout;
mod render;
mod terminal;

use std::fs::File;

use curtain::OverlayConfig;
use simplelog::{Config, LevelFilter, WriteLogger};

#[tokio::main]
async fn main() {
    match File::create("storefront.log") {
        Ok(log_file) => {
            if let Err(e) = WriteLogger::init(LevelFilter::Debug, Config::default(), log_file) {
                eprintln!("Failed to initialize logger: {}", e);
            }
        }
        Err(e) => eprintln!("Failed to create log file: {}", e),
    }

    let reduced_motion = std::env::args().skip(1).any(|arg| arg == "--reduced-motion");
    let config = OverlayConfig::new().reduced_motion(reduced_motion);

    if let Err(e) = event_loop::run(config).await {
        eprintln!("Error: {}", e);
    }
}
