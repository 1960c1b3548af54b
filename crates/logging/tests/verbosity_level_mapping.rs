//! Verbosity count to subsystem level mapping.

use logging::{LogConfig, Subsystem, init_tracing};

#[test]
fn level_zero_keeps_every_subsystem_at_warn() {
    let config = LogConfig::from_verbose_level(0);
    assert_eq!(config, LogConfig::default());
    assert_eq!(
        config.directives(),
        "warn,ftpmirror::transfer=warn,ftpmirror::ftp=warn,ftpmirror::size=warn,ftpmirror::walk=warn"
    );
}

#[test]
fn level_one_enables_transfer_info_only() {
    let config = LogConfig::from_verbose_level(1);
    assert_eq!(config.level(Subsystem::Transfer), 1);
    assert_eq!(config.level(Subsystem::Ftp), 0);
    assert_eq!(config.level(Subsystem::Size), 0);
    assert_eq!(config.level(Subsystem::Walk), 0);
}

#[test]
fn level_two_enables_protocol_and_sizing_debug() {
    let config = LogConfig::from_verbose_level(2);
    assert!(config.directives().contains("ftpmirror::ftp=debug"));
    assert!(config.directives().contains("ftpmirror::size=debug"));
    assert!(config.directives().contains("ftpmirror::walk=warn"));
}

#[test]
fn high_levels_saturate_at_trace() {
    assert_eq!(
        LogConfig::from_verbose_level(3),
        LogConfig::from_verbose_level(200)
    );
    for subsystem in Subsystem::ALL {
        assert_eq!(LogConfig::from_verbose_level(7).level(subsystem), 3);
    }
}

#[test]
fn directives_override_verbose_defaults() {
    let mut config = LogConfig::from_verbose_level(3);
    config.apply_directive("walk0").unwrap();
    assert!(config.directives().ends_with("ftpmirror::walk=warn"));
}

#[test]
fn second_initialisation_is_rejected() {
    init_tracing(&LogConfig::from_verbose_level(2)).expect("first init");
    assert!(init_tracing(&LogConfig::default()).is_err());
}
