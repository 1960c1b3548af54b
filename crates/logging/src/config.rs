//! crates/logging/src/config.rs
//! Per-subsystem verbosity configuration.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

/// Target used by [`trace_xfer!`](crate::trace_xfer) for transfer progress.
pub const TRANSFER_TARGET: &str = "ftpmirror::transfer";
/// Target used by [`trace_ftp!`](crate::trace_ftp) for control-channel traffic.
pub const FTP_TARGET: &str = "ftpmirror::ftp";
/// Target used by [`trace_size!`](crate::trace_size) for the sizing phase.
pub const SIZE_TARGET: &str = "ftpmirror::size";
/// Target used by [`trace_walk!`](crate::trace_walk) for local traversal.
pub const WALK_TARGET: &str = "ftpmirror::walk";

/// Subsystems whose verbosity can be tuned independently.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Subsystem {
    /// File and folder transfer orchestration.
    Transfer,
    /// FTP commands and replies.
    Ftp,
    /// Pre-flight size computation.
    Size,
    /// Local filesystem traversal.
    Walk,
}

impl Subsystem {
    /// All subsystems in directive order.
    pub const ALL: [Self; 4] = [Self::Transfer, Self::Ftp, Self::Size, Self::Walk];

    /// Returns the tracing target emitted by the subsystem.
    #[must_use]
    pub const fn target(self) -> &'static str {
        match self {
            Self::Transfer => TRANSFER_TARGET,
            Self::Ftp => FTP_TARGET,
            Self::Size => SIZE_TARGET,
            Self::Walk => WALK_TARGET,
        }
    }

    /// Returns the short name accepted by [`LogConfig::apply_directive`].
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Transfer => "transfer",
            Self::Ftp => "ftp",
            Self::Size => "size",
            Self::Walk => "walk",
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|subsystem| subsystem.name() == name)
    }
}

/// Verbosity levels for each [`Subsystem`].
///
/// Level `0` shows warnings and errors only, `1` adds info, `2` adds debug,
/// and `3` or more enables trace output.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LogConfig {
    /// Transfer orchestration level.
    pub transfer: u8,
    /// FTP control-channel level.
    pub ftp: u8,
    /// Sizing phase level.
    pub size: u8,
    /// Local traversal level.
    pub walk: u8,
}

impl LogConfig {
    /// Creates a configuration from a single verbosity count (`-v`, `-vv`, ...).
    #[must_use]
    pub fn from_verbose_level(level: u8) -> Self {
        match level {
            0 => Self::default(),
            1 => Self {
                transfer: 1,
                ..Self::default()
            },
            2 => Self {
                transfer: 2,
                ftp: 2,
                size: 2,
                walk: 0,
            },
            _ => Self {
                transfer: 3,
                ftp: 3,
                size: 3,
                walk: 3,
            },
        }
    }

    /// Returns the level configured for `subsystem`.
    #[must_use]
    pub const fn level(&self, subsystem: Subsystem) -> u8 {
        match subsystem {
            Subsystem::Transfer => self.transfer,
            Subsystem::Ftp => self.ftp,
            Subsystem::Size => self.size,
            Subsystem::Walk => self.walk,
        }
    }

    /// Sets the level for `subsystem`.
    pub fn set(&mut self, subsystem: Subsystem, level: u8) {
        match subsystem {
            Subsystem::Transfer => self.transfer = level,
            Subsystem::Ftp => self.ftp = level,
            Subsystem::Size => self.size = level,
            Subsystem::Walk => self.walk = level,
        }
    }

    /// Applies a directive token such as `ftp2` or `transfer`.
    ///
    /// A token without a trailing number sets level `1`.
    pub fn apply_directive(&mut self, token: &str) -> Result<(), String> {
        let (name, level) = parse_directive_token(token)?;
        let subsystem =
            Subsystem::from_name(name).ok_or_else(|| format!("unknown log subsystem: {name}"))?;
        self.set(subsystem, level);
        Ok(())
    }

    /// Renders the configuration as `EnvFilter` directives.
    ///
    /// Targets outside the four subsystems stay at `warn`.
    #[must_use]
    pub fn directives(&self) -> String {
        let mut rendered = String::from("warn");
        for subsystem in Subsystem::ALL {
            let filter = level_filter(self.level(subsystem));
            rendered.push(',');
            rendered.push_str(subsystem.target());
            rendered.push('=');
            rendered.push_str(&filter.to_string().to_ascii_lowercase());
        }
        rendered
    }

    /// Builds an [`EnvFilter`] from [`directives`](Self::directives).
    #[must_use]
    pub fn env_filter(&self) -> EnvFilter {
        EnvFilter::new(self.directives())
    }
}

/// Maps a subsystem level onto a tracing [`LevelFilter`].
#[must_use]
pub const fn level_filter(level: u8) -> LevelFilter {
    match level {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

fn parse_directive_token(token: &str) -> Result<(&str, u8), String> {
    if token.is_empty() {
        return Err("empty log directive".to_string());
    }

    match token.find(|c: char| c.is_ascii_digit()) {
        Some(0) => Err(format!("log directive lacks a subsystem name: {token}")),
        Some(pos) => {
            let level = token[pos..]
                .parse::<u8>()
                .map_err(|_| format!("invalid level in log directive: {token}"))?;
            Ok((&token[..pos], level))
        }
        None => Ok((token, 1)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directive_without_number_sets_level_one() {
        let mut config = LogConfig::default();
        config.apply_directive("size").unwrap();
        assert_eq!(config.size, 1);
    }

    #[test]
    fn directive_with_number_sets_that_level() {
        let mut config = LogConfig::default();
        config.apply_directive("ftp3").unwrap();
        assert_eq!(config.level(Subsystem::Ftp), 3);
    }

    #[test]
    fn unknown_or_malformed_directives_are_rejected() {
        let mut config = LogConfig::default();
        assert!(config.apply_directive("").is_err());
        assert!(config.apply_directive("2").is_err());
        assert!(config.apply_directive("ftpx").is_err());
        assert!(config.apply_directive("ftp9x").is_err());
        assert_eq!(config, LogConfig::default());
    }

    #[test]
    fn level_filter_saturates_at_trace() {
        assert_eq!(level_filter(0), LevelFilter::WARN);
        assert_eq!(level_filter(1), LevelFilter::INFO);
        assert_eq!(level_filter(2), LevelFilter::DEBUG);
        assert_eq!(level_filter(9), LevelFilter::TRACE);
    }

    #[test]
    fn subsystem_names_round_trip() {
        for subsystem in Subsystem::ALL {
            assert_eq!(Subsystem::from_name(subsystem.name()), Some(subsystem));
        }
        assert_eq!(Subsystem::from_name("delta"), None);
    }
}
