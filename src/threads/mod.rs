//! Worker threads wiring the localization pipeline together.

pub mod localization_thread;
pub mod transform_thread;

pub use localization_thread::{
    CommandReceiver, CommandSender, LocalizationCommand, LocalizationThread,
    LocalizationThreadConfig, ScanReceiver, ScanSender,
};
pub use transform_thread::TransformThread;
