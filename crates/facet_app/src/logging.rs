use log::LevelFilter;

/// Resolves the global level: `RUST_LOG` (a bare level name) wins over the
/// configured one; anything unparsable falls back to `info`.
pub fn resolve_level(configured: &str, env: Option<&str>) -> LevelFilter {
    env.and_then(|s| s.trim().parse().ok())
        .or_else(|| configured.trim().parse().ok())
        .unwrap_or(LevelFilter::Info)
}

/// Installs the `fern` logger on stderr.  GPU backend crates are capped at
/// `warn` because they are very chatty at `info`.
pub fn init(configured_level: &str) -> Result<(), log::SetLoggerError> {
    let env = std::env::var("RUST_LOG").ok();
    let level = resolve_level(configured_level, env.as_deref());

    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{:<5} {}] {}",
                record.level(),
                record.target(),
                message
            ))
        })
        .level(level)
        .level_for("wgpu_core", LevelFilter::Warn)
        .level_for("wgpu_hal", LevelFilter::Warn)
        .level_for("naga", LevelFilter::Warn)
        .chain(std::io::stderr())
        .apply()?;

    log::debug!("logging initialised at {level}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_overrides_config() {
        assert_eq!(resolve_level("info", Some("trace")), LevelFilter::Trace);
        assert_eq!(resolve_level("warn", None), LevelFilter::Warn);
        assert_eq!(resolve_level("DEBUG", Some("not-a-level")), LevelFilter::Debug);
        assert_eq!(resolve_level("loud", None), LevelFilter::Info);
    }
}
