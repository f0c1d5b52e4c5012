//! A `log` backend that forwards records over a crossbeam channel.
//!
//! The engine logs through the `log` facade only. Hosts pick the backend; `ChannelLogger` is the
//! one used by tools and tests that want to inspect conversion diagnostics (for example the
//! multi-candidate warning) instead of printing them.
//!
//! ```rust,ignore
//! let (logger, receiver) = ChannelLogger::with_receiver(LevelFilter::Warn);
//! logger.install()?;
//!
//! group.update(&mut world)?;
//! for message in receiver.try_iter() {
//!     eprintln!("[{}] {}: {}", message.level, message.target, message.message);
//! }
//! ```

use crossbeam::channel::{Receiver, Sender, unbounded};
use ::log::{Level, LevelFilter, Metadata, Record, SetLoggerError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogMessage {
    pub level: Level,
    pub target: String,
    pub message: String,
}

pub struct ChannelLogger {
    sender: Sender<LogMessage>,
    level: LevelFilter,
}

impl ::log::Log for ChannelLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            // A dropped receiver only means nobody listens anymore.
            let _ = self.sender.try_send(LogMessage {
                level: record.metadata().level(),
                target: record.target().to_string(),
                message: format!("{}", record.args()),
            });
        }
    }

    fn flush(&self) {}
}

impl ChannelLogger {
    pub fn new(sender: Sender<LogMessage>, level: LevelFilter) -> Self {
        Self { sender, level }
    }

    pub fn with_receiver(level: LevelFilter) -> (Self, Receiver<LogMessage>) {
        let (sender, receiver) = unbounded();
        (Self::new(sender, level), receiver)
    }

    #[inline]
    pub fn level(&self) -> LevelFilter {
        self.level
    }

    /// Install as the global logger. Fails if a logger is already installed.
    pub fn install(self) -> Result<(), SetLoggerError> {
        let level = self.level;
        ::log::set_boxed_logger(Box::new(self))?;
        ::log::set_max_level(level);
        Ok(())
    }
}
