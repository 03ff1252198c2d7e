use std::sync::Once;

use log::LevelFilter;

/// Environment variable hosts use to pick a filter.
pub const LOG_ENV: &str = "POLYSTAGE_LOG";

/// Log targets owned by this workspace.
const WORKSPACE_TARGETS: [&str; 7] = [
    "polystage",
    "polystage_engine",
    "polystage_canvas",
    "polystage_scene3d",
    "polystage_xr",
    "polystage_markup",
    "polystage_studio",
];

/// Logger configuration.
///
/// The filter is taken from the first of these that is set and non-blank:
/// `filter`, the `env_var` variable, `RUST_LOG`. Failing all three, the
/// workspace crates log at `level` and everything else at `warn`.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Filter in `env_logger` syntax, e.g. `"polystage_xr=debug,warn"`.
    pub filter: Option<String>,
    pub env_var: &'static str,
    pub level: LevelFilter,
    /// Prefix each line with its module target.
    pub show_targets: bool,
    pub write_style: env_logger::WriteStyle,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: None,
            env_var: LOG_ENV,
            level: LevelFilter::Info,
            show_targets: true,
            write_style: env_logger::WriteStyle::Auto,
        }
    }
}

impl LoggingConfig {
    pub fn with_filter(mut self, filter: Option<String>) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_level(mut self, level: LevelFilter) -> Self {
        self.level = level;
        self
    }

    /// Filter directives to install, reading variables through `lookup`.
    pub fn resolve_filter(&self, lookup: impl Fn(&str) -> Option<String>) -> String {
        let set = |f: &String| !f.trim().is_empty();
        if let Some(filter) = self.filter.as_ref().filter(|f| set(f)) {
            return filter.clone();
        }
        for var in [self.env_var, "RUST_LOG"] {
            if let Some(filter) = lookup(var).filter(set) {
                return filter;
            }
        }

        let level = self.level.to_string().to_ascii_lowercase();
        let mut directives = vec!["warn".to_string()];
        directives.extend(WORKSPACE_TARGETS.iter().map(|t| format!("{t}={level}")));
        directives.join(",")
    }
}

static INIT: Once = Once::new();

/// Installs the global logger once. Later calls are ignored, and so is a
/// logger the host installed first.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let filter = config.resolve_filter(|var| std::env::var(var).ok());

        let mut builder = env_logger::Builder::new();
        builder.parse_filters(&filter);
        builder.format_target(config.show_targets);
        builder.write_style(config.write_style);

        if builder.try_init().is_err() {
            log::debug!("a global logger was already installed");
            return;
        }
        log::debug!("logging initialized with `{filter}`");
    });
}
