//! Logging initialization module
//!
//! Provides a single initialization point for the logging facility.

use std::str::FromStr;
use std::sync::Once;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Environment variable selecting the profile when none is passed explicitly
pub const PROFILE_ENV: &str = "CASDIFF_LOG_PROFILE";

/// Logging profile configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    /// Human-readable output for development
    Development,
    /// JSON structured output for production
    Production,
    /// Test capture mode for deterministic testing
    Test,
}

impl Profile {
    /// Default filter directive when `RUST_LOG` is not set
    pub fn default_directive(&self) -> &'static str {
        match self {
            Profile::Development => "casdiff=debug",
            Profile::Production => "casdiff=info",
            Profile::Test => "casdiff=trace",
        }
    }

    /// Read the profile from `CASDIFF_LOG_PROFILE`, falling back to `Development`
    pub fn from_env() -> Self {
        Self::from_setting(std::env::var(PROFILE_ENV).ok().as_deref())
    }

    fn from_setting(setting: Option<&str>) -> Self {
        setting
            .and_then(|v| v.parse().ok())
            .unwrap_or(Profile::Development)
    }
}

impl FromStr for Profile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Profile::Development),
            "production" | "prod" => Ok(Profile::Production),
            "test" => Ok(Profile::Test),
            other => Err(format!("unknown logging profile: {}", other)),
        }
    }
}

static INIT_ONCE: Once = Once::new();

fn filter_for(profile: Profile) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(profile.default_directive()))
}

/// Initialize the logging facility
///
/// This function should be called once at application startup. Later calls
/// are no-ops, and an already installed global subscriber (for example the
/// test capture layer) is left in place.
///
/// # Profiles
///
/// - **Development**: Human-readable logs with debug level
/// - **Production**: JSON structured logs with info level
/// - **Test**: Registry filtered at `casdiff=trace`; events are captured via
///   `init_test_capture()`
///
/// # Example
///
/// ```
/// use casdiff_core::logging_facility::{init, Profile};
///
/// init(Profile::Development);
/// ```
pub fn init(profile: Profile) {
    INIT_ONCE.call_once(|| {
        let installed = match profile {
            Profile::Development => tracing_subscriber::fmt()
                .with_env_filter(filter_for(profile))
                .finish()
                .try_init(),
            Profile::Production => tracing_subscriber::fmt()
                .json()
                .with_env_filter(filter_for(profile))
                .finish()
                .try_init(),
            Profile::Test => tracing_subscriber::registry()
                .with(filter_for(profile))
                .try_init(),
        };
        // The subscriber installed first stays in charge
        if let Err(err) = installed {
            tracing::debug!(
                profile = ?profile,
                error = %err,
                "Global subscriber already set; keeping it"
            );
        }
    });
}

/// Initialize with the profile named by `CASDIFF_LOG_PROFILE`
///
/// Unset or unrecognised values select [`Profile::Development`].
pub fn init_from_env() {
    init(Profile::from_env());
}
