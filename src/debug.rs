use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, reload, Registry};

/// Runtime on/off switch for debug logging. Logging starts disabled and goes
/// to stderr so it never mixes with results on stdout.
pub struct DebugSwitch {
    handle: reload::Handle<LevelFilter, Registry>,
}

impl DebugSwitch {
    pub fn install() -> Result<DebugSwitch, tracing_subscriber::util::TryInitError> {
        let (filter, handle) = reload::Layer::new(LevelFilter::OFF);
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_writer(std::io::stderr).without_time())
            .try_init()?;
        Ok(DebugSwitch { handle })
    }

    /// Flips between OFF and DEBUG, returning whether debug output is now on.
    pub fn toggle(&self) -> Result<bool, reload::Error> {
        let mut enabled = false;
        self.handle.modify(|level| {
            enabled = *level == LevelFilter::OFF;
            *level = if enabled { LevelFilter::DEBUG } else { LevelFilter::OFF };
        })?;
        Ok(enabled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_flips_between_off_and_debug() {
        let switch = DebugSwitch::install().unwrap();
        assert!(matches!(switch.toggle(), Ok(true)));
        assert!(tracing::enabled!(tracing::Level::DEBUG));
        assert!(matches!(switch.toggle(), Ok(false)));
        assert!(!tracing::enabled!(tracing::Level::ERROR));
    }
}
