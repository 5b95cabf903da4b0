use log::LevelFilter;
use simplelog::*;
use std::fs::File;
use std::path::PathBuf;

/// Logging configuration for the Nomex dashboard engine
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Master switch to enable/disable all logging
    pub enabled: bool,
    /// Path to the log file
    pub log_file: PathBuf,
    /// Whether to clear the log file on startup
    pub clear_on_startup: bool,
    /// Feature flags for specific logging categories
    pub features: LogFeatures,
    /// Overall log level
    pub level: LevelFilter,
}

/// Feature flags for specific logging categories
#[derive(Debug, Clone)]
pub struct LogFeatures {
    /// Log remote store calls
    pub api_calls: bool,
    /// Log page fetches and feed bookkeeping
    pub pagination: bool,
    /// Log editing mode transitions
    pub editing: bool,
    /// Log comment set loads
    pub comments: bool,
    /// Log create/update/delete outcomes
    pub mutations: bool,
    /// Log general debug messages
    pub general: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            log_file: PathBuf::from("nomex_debug.log"),
            clear_on_startup: true,
            features: LogFeatures::default(),
            level: LevelFilter::Debug,
        }
    }
}

impl Default for LogFeatures {
    fn default() -> Self {
        Self {
            api_calls: true,
            pagination: true,
            editing: true,
            comments: true,
            mutations: true,
            general: true,
        }
    }
}

impl LogFeatures {
    fn none() -> Self {
        Self {
            api_calls: false,
            pagination: false,
            editing: false,
            comments: false,
            mutations: false,
            general: false,
        }
    }
}

impl LogConfig {
    /// Create a new log configuration with all features disabled
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Default::default()
        }
    }

    /// Create a minimal log configuration (only errors and warnings)
    pub fn minimal() -> Self {
        Self {
            enabled: true,
            level: LevelFilter::Warn,
            features: LogFeatures::none(),
            ..Default::default()
        }
    }

    /// Create a verbose log configuration (all features enabled)
    pub fn verbose() -> Self {
        Self {
            enabled: true,
            level: LevelFilter::Trace,
            features: LogFeatures::default(),
            ..Default::default()
        }
    }
}

/// Initialize the logging system with the given configuration
pub fn init_logging(config: &LogConfig) -> anyhow::Result<()> {
    if !config.enabled {
        // Initialize with no-op logger
        let _ = WriteLogger::init(LevelFilter::Off, Config::default(), std::io::sink());
        return Ok(());
    }

    // Clear log file if requested
    if config.clear_on_startup {
        let _ = File::create(&config.log_file)?;
    }

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_file)?;

    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_time_offset_to_local()
        .unwrap_or_else(|builder| builder)
        .build();

    WriteLogger::init(config.level, log_config, log_file)?;

    log::info!(
        "Logging initialized: file={}, level={:?}",
        config.log_file.display(),
        config.level
    );
    log::debug!("Log features: {:?}", config.features);

    Ok(())
}

/// Macro for logging remote store calls
#[macro_export]
macro_rules! log_api_call {
    ($config:expr, $($arg:tt)*) => {
        if $config.enabled && $config.features.api_calls {
            log::debug!(target: "api_calls", $($arg)*);
        }
    };
}

/// Macro for logging feed pagination
#[macro_export]
macro_rules! log_feed {
    ($config:expr, $($arg:tt)*) => {
        if $config.enabled && $config.features.pagination {
            log::debug!(target: "pagination", $($arg)*);
        }
    };
}

/// Macro for logging editing mode transitions
#[macro_export]
macro_rules! log_editing {
    ($config:expr, $($arg:tt)*) => {
        if $config.enabled && $config.features.editing {
            log::debug!(target: "editing", $($arg)*);
        }
    };
}

/// Macro for logging comment set loads
#[macro_export]
macro_rules! log_comments {
    ($config:expr, $($arg:tt)*) => {
        if $config.enabled && $config.features.comments {
            log::debug!(target: "comments", $($arg)*);
        }
    };
}

/// Macro for logging mutation outcomes
#[macro_export]
macro_rules! log_mutation {
    ($config:expr, $($arg:tt)*) => {
        if $config.enabled && $config.features.mutations {
            log::debug!(target: "mutations", $($arg)*);
        }
    };
}

/// Macro for general debug logging
#[macro_export]
macro_rules! log_debug {
    ($config:expr, $($arg:tt)*) => {
        if $config.enabled && $config.features.general {
            log::debug!(target: "general", $($arg)*);
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets() {
        assert!(!LogConfig::disabled().enabled);

        let minimal = LogConfig::minimal();
        assert_eq!(minimal.level, LevelFilter::Warn);
        assert!(!minimal.features.pagination);
        assert!(!minimal.features.mutations);

        let verbose = LogConfig::verbose();
        assert_eq!(verbose.level, LevelFilter::Trace);
        assert!(verbose.features.api_calls && verbose.features.editing);
    }
}
