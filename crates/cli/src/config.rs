//! Device and verbosity resolution from flags and environment

use std::env;

const ENV_DEVICE: &str = "SIMLINK_AT_DEVICE";
const ENV_DEBUG: &str = "SIMLINK_AT_DEBUG";

/// Names older deployments exported, kept working for compatibility
const LEGACY_ENV_DEVICE: &str = "AT_DEVICE";
const LEGACY_ENV_DEBUG: &str = "AT_DEBUG";

const DEFAULT_DEVICE: &str = "/dev/ttyUSB0";

/// Resolve the serial device: flag, then environment, then the default.
pub fn resolve_device(flag: Option<&str>) -> String {
    if let Some(device) = flag {
        return device.to_owned();
    }
    if let Ok(device) = env::var(ENV_DEVICE) {
        return device;
    }
    if let Ok(device) = env::var(LEGACY_ENV_DEVICE) {
        // Logging is not up yet when resolution runs, so warn directly
        eprintln!("warning: {LEGACY_ENV_DEVICE} is deprecated, use {ENV_DEVICE}");
        return device;
    }
    DEFAULT_DEVICE.to_owned()
}

/// Resolve verbosity: the flag wins, otherwise either debug variable enables it.
pub fn resolve_verbose(flag: bool) -> bool {
    flag || env_enabled(ENV_DEBUG) || legacy_debug_enabled()
}

fn legacy_debug_enabled() -> bool {
    if env_enabled(LEGACY_ENV_DEBUG) {
        eprintln!("warning: {LEGACY_ENV_DEBUG} is deprecated, use {ENV_DEBUG}");
        return true;
    }
    false
}

fn env_enabled(name: &str) -> bool {
    env::var(name).is_ok_and(|value| value == "1" || value.eq_ignore_ascii_case("true"))
}
