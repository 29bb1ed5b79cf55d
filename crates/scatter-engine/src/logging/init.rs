use std::sync::Once;

/// Filter used when neither the config nor `RUST_LOG` names one. wgpu and naga log
/// every pipeline and buffer at info.
pub const DEFAULT_FILTER: &str = "info,wgpu_core=warn,wgpu_hal=warn,naga=warn";

/// `env_filter` takes `env_logger` syntax, e.g. "scatter_engine=debug,wgpu_core=warn".
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    pub write_style: env_logger::WriteStyle,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            write_style: env_logger::WriteStyle::Auto,
        }
    }
}

/// Explicit config beats `RUST_LOG`, which beats `DEFAULT_FILTER`.
fn resolve_filter(configured: Option<String>, from_env: Option<String>) -> String {
    configured
        .or(from_env)
        .filter(|f| !f.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_FILTER.to_string())
}

static INIT: Once = Once::new();

/// Installs the global `env_logger` the first time it is called; later calls do nothing.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let filter = resolve_filter(config.env_filter, std::env::var("RUST_LOG").ok());

        env_logger::Builder::new()
            .parse_filters(&filter)
            .write_style(config.write_style)
            .init();

        log::debug!("logging initialized with filter {filter:?}");
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_precedence() {
        let cfg = Some("scatter_engine=trace".to_string());
        let env = Some("warn".to_string());
        assert_eq!(resolve_filter(cfg, env.clone()), "scatter_engine=trace");
        assert_eq!(resolve_filter(None, env), "warn");
        assert_eq!(resolve_filter(None, None), DEFAULT_FILTER);
    }

    #[test]
    fn blank_filter_uses_default() {
        assert_eq!(resolve_filter(None, Some("  ".to_string())), DEFAULT_FILTER);
    }

    #[test]
    fn repeated_init_is_ignored() {
        init_logging(LoggingConfig::default());
        init_logging(LoggingConfig {
            env_filter: Some("trace".to_string()),
            ..LoggingConfig::default()
        });
    }
}
