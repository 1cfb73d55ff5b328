use anyhow::Result;

use taskpad_tui::{app::App, config::Config, logging};

fn main() -> Result<()> {
    let direct = std::env::args().skip(1).any(|arg| arg == "--direct");
    logging::init();
    let config = Config::from_env();
    App::new(config, direct).run()
}
