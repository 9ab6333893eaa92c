pub mod classifier;
pub mod clock;
pub mod commands;
pub mod events;
pub mod geometry;
pub mod injector;
pub mod logging;
pub mod motion;
pub mod scroll;
pub mod session;
pub mod settings;
pub mod trackpad;
pub mod watchdog;

pub use trackpad::TrackpadCore;
