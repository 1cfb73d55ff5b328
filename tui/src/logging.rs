//! Tracing setup. The TUI owns the terminal, so log lines go to
//! `taskpad.log` instead of stderr, and only when `TASKPAD_LOG` is set.

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

pub fn init() {
    let Ok(filter) = std::env::var("TASKPAD_LOG") else {
        return;
    };
    let Ok(file) = std::fs::File::create("taskpad.log") else {
        return;
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(Arc::new(file))
        .with_ansi(false)
        .init();
}
