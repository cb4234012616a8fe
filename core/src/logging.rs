//! Tracing setup shared by every embedding of the bridge

/// Install the global `tracing` subscriber (idempotent).
///
/// `RUST_LOG` wins when set; otherwise `filter` is used, defaulting to `info`.
pub fn init_logging(filter: Option<&str>) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(filter.unwrap_or("info"))
    });
    let _ = tracing_subscriber::fmt().with_env_filter(env_filter).try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_logging_is_idempotent() {
        init_logging(Some("debug"));
        init_logging(None);
        tracing::debug!("logging initialised twice without panicking");
    }
}
