//! Logging bootstrap.

use env_logger::{Builder, Env};

/// Install the `env_logger` backend: `RUST_LOG` overrides the default
/// `info` filter, timestamps have second resolution.
///
/// Fails only when another logger is already installed.
pub fn init() -> Result<(), log::SetLoggerError> {
    Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp_secs()
        .try_init()?;
    log::info!("nmr-spectral-engine v{}", env!("CARGO_PKG_VERSION"));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_init_is_rejected() {
        let _ = init();
        assert!(init().is_err());
        log::info!("logger installed");
    }
}
