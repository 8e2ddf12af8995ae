//! Runtime and application configuration.
//!
//! Both structs carry sensible defaults; override individual fields with the
//! `with_*` builders, or pull the runtime limits from the environment with
//! [`RuntimeConfig::from_env`].

use std::time::Duration;

/// Environment variable read by [`RuntimeConfig::from_env`].
pub const MAX_UPDATE_DEPTH_ENV: &str = "EMBER_MAX_UPDATE_DEPTH";

/// Default number of passes a single flush may take before giving up.
pub const DEFAULT_MAX_UPDATE_DEPTH: usize = 100;

// =============================================================================
// RuntimeConfig
// =============================================================================

/// Limits for the reactive runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Maximum number of scheduler passes in one flush. Effects that keep
    /// writing the signals they read hit this cap and the flush fails with
    /// [`Error::TooManyUpdates`](crate::Error::TooManyUpdates).
    pub max_update_depth: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            max_update_depth: DEFAULT_MAX_UPDATE_DEPTH,
        }
    }
}

impl RuntimeConfig {
    /// Set the flush pass limit (minimum 1).
    pub fn with_max_update_depth(mut self, depth: usize) -> Self {
        self.max_update_depth = depth.max(1);
        self
    }

    /// Defaults, overridden by `EMBER_MAX_UPDATE_DEPTH` when it parses.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`from_env`](Self::from_env) but with a custom variable source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(raw) = lookup(MAX_UPDATE_DEPTH_ENV) {
            match raw.trim().parse::<usize>() {
                Ok(depth) => config = config.with_max_update_depth(depth),
                Err(_) => {
                    tracing::warn!(value = %raw, "ignoring unparsable {MAX_UPDATE_DEPTH_ENV}");
                }
            }
        }
        config
    }
}

// =============================================================================
// AppConfig
// =============================================================================

/// Settings for an [`App`](crate::pipeline::App) or a live
/// [`render`](crate::pipeline::render) session.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Viewport width in cells.
    pub width: u16,
    /// Viewport height in cells. `None` sizes the frame to the content.
    pub height: Option<u16>,
    /// Exit the session on Ctrl+C.
    pub exit_on_ctrl_c: bool,
    /// Use the terminal's alternate screen buffer (live sessions only).
    pub alternate_screen: bool,
    /// Enable mouse reporting (live sessions only).
    pub mouse_capture: bool,
    /// How long the live loop waits for input before re-checking exit.
    pub poll_interval: Duration,
    /// Reactive runtime limits.
    pub runtime: RuntimeConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            width: 80,
            height: Some(24),
            exit_on_ctrl_c: true,
            alternate_screen: true,
            mouse_capture: true,
            poll_interval: Duration::from_millis(16),
            runtime: RuntimeConfig::default(),
        }
    }
}

impl AppConfig {
    /// Fixed-size viewport.
    pub fn with_size(mut self, width: u16, height: u16) -> Self {
        self.width = width;
        self.height = Some(height);
        self
    }

    /// Fixed width, content-sized height.
    pub fn with_width(mut self, width: u16) -> Self {
        self.width = width;
        self.height = None;
        self
    }

    pub fn with_exit_on_ctrl_c(mut self, enabled: bool) -> Self {
        self.exit_on_ctrl_c = enabled;
        self
    }

    pub fn with_alternate_screen(mut self, enabled: bool) -> Self {
        self.alternate_screen = enabled;
        self
    }

    pub fn with_mouse_capture(mut self, enabled: bool) -> Self {
        self.mouse_capture = enabled;
        self
    }

    pub fn with_runtime(mut self, runtime: RuntimeConfig) -> Self {
        self.runtime = runtime;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RuntimeConfig::default();
        assert_eq!(config.max_update_depth, DEFAULT_MAX_UPDATE_DEPTH);

        let app = AppConfig::default();
        assert_eq!((app.width, app.height), (80, Some(24)));
        assert!(app.exit_on_ctrl_c);
    }

    #[test]
    fn test_from_lookup_overrides_depth() {
        let config = RuntimeConfig::from_lookup(|key| {
            (key == MAX_UPDATE_DEPTH_ENV).then(|| "7".to_string())
        });
        assert_eq!(config.max_update_depth, 7);
    }

    #[test]
    fn test_from_lookup_ignores_garbage() {
        let config = RuntimeConfig::from_lookup(|_| Some("lots".to_string()));
        assert_eq!(config, RuntimeConfig::default());
    }

    #[test]
    fn test_depth_has_floor_of_one() {
        assert_eq!(RuntimeConfig::default().with_max_update_depth(0).max_update_depth, 1);
    }

    #[test]
    fn test_with_width_unbounds_height() {
        let app = AppConfig::default().with_width(40);
        assert_eq!(app.width, 40);
        assert_eq!(app.height, None);
    }
}
