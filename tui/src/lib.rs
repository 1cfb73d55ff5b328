//! Terminal frontend for the taskpad core: credential screen, list screen,
//! and the ureq executor that runs core-built requests.

pub mod app;
pub mod config;
pub mod logging;
pub mod net;
pub mod ui;
