//! Trap handling configuration from the firmware boot command line.

use hvfw_lib::{KlogLevel, klog_set_level};
use spin::Once;

const DEFAULT_LOG_LEVEL: KlogLevel = KlogLevel::Info;
const DEFAULT_BACKTRACE: bool = true;
const DEFAULT_BACKTRACE_DEPTH: usize = 16;
const DEFAULT_SYMBOLS: bool = true;

pub const MIN_BACKTRACE_DEPTH: usize = 1;
pub const MAX_BACKTRACE_DEPTH: usize = 64;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TrapConfig {
    pub log_level: KlogLevel,
    /// Capture a backtrace on informational and degraded resumes.
    pub backtrace: bool,
    pub backtrace_depth: usize,
    /// Resolve addresses to symbols in trap reports.
    pub symbols: bool,
}

impl TrapConfig {
    pub const DEFAULT: Self = Self {
        log_level: DEFAULT_LOG_LEVEL,
        backtrace: DEFAULT_BACKTRACE,
        backtrace_depth: DEFAULT_BACKTRACE_DEPTH,
        symbols: DEFAULT_SYMBOLS,
    };
}

impl Default for TrapConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    if value.eq_ignore_ascii_case("on")
        || value.eq_ignore_ascii_case("true")
        || value.eq_ignore_ascii_case("yes")
        || value.eq_ignore_ascii_case("enabled")
        || value == "1"
    {
        Some(true)
    } else if value.eq_ignore_ascii_case("off")
        || value.eq_ignore_ascii_case("false")
        || value.eq_ignore_ascii_case("no")
        || value.eq_ignore_ascii_case("disabled")
        || value == "0"
    {
        Some(false)
    } else {
        None
    }
}

pub fn config_from_cmdline(cmdline: Option<&str>) -> TrapConfig {
    let mut cfg = TrapConfig::default();
    if let Some(cmdline) = cmdline {
        for token in cmdline.split_whitespace() {
            if let Some(value) = token.strip_prefix("klog.level=") {
                if let Some(level) = KlogLevel::from_name(value) {
                    cfg.log_level = level;
                }
            } else if let Some(value) = token.strip_prefix("trap.backtrace=") {
                if let Some(enabled) = parse_bool(value) {
                    cfg.backtrace = enabled;
                }
            } else if let Some(value) = token.strip_prefix("trap.backtrace_depth=") {
                if let Ok(depth) = value.parse::<usize>() {
                    cfg.backtrace_depth = depth.clamp(MIN_BACKTRACE_DEPTH, MAX_BACKTRACE_DEPTH);
                }
            } else if let Some(value) = token.strip_prefix("trap.symbols=") {
                if let Some(enabled) = parse_bool(value) {
                    cfg.symbols = enabled;
                }
            }
        }
    }
    cfg
}

static TRAP_CONFIG: Once<TrapConfig> = Once::new();

/// Parse and install the trap configuration, then apply its log level.
/// Only the first call takes effect; later calls return the installed
/// configuration.
pub fn trap_config_init(cmdline: Option<&str>) -> TrapConfig {
    let cfg = *TRAP_CONFIG.call_once(|| config_from_cmdline(cmdline));
    klog_set_level(cfg.log_level);
    cfg
}

/// The installed configuration, or the defaults before `trap_config_init`.
pub fn trap_config() -> TrapConfig {
    TRAP_CONFIG.get().copied().unwrap_or(TrapConfig::DEFAULT)
}
