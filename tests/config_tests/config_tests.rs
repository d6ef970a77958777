//! Config Tests
//!
//! Tests for defaults, the builder and validation.

use iscsi_responder::{Config, IscsiError, Responder};

#[test]
fn test_defaults() {
    let config = Config::default();
    assert_eq!(config.listen_addr, "127.0.0.1:3260");
    assert_eq!(config.worker_threads, 4);
    assert_eq!(config.max_pending_connections, 1024);
    assert_eq!(config.read_timeout_ms, 5000);
    assert_eq!(config.write_timeout_ms, 5000);
    assert_eq!(config.command_residual, 8);
    assert!(config.validate().is_ok());
}

#[test]
fn test_builder_sets_fields() {
    let config = Config::builder()
        .listen_addr("0.0.0.0:13260")
        .worker_threads(2)
        .max_pending_connections(16)
        .read_timeout_ms(0)
        .write_timeout_ms(250)
        .command_residual(512)
        .build();

    assert_eq!(config.listen_addr, "0.0.0.0:13260");
    assert_eq!(config.worker_threads, 2);
    assert_eq!(config.max_pending_connections, 16);
    assert_eq!(config.read_timeout_ms, 0);
    assert_eq!(config.write_timeout_ms, 250);
    assert_eq!(config.command_residual, 512);
    assert!(config.validate().is_ok());
}

#[test]
fn test_zero_workers_rejected() {
    let config = Config::builder().worker_threads(0).build();
    assert!(matches!(config.validate(), Err(IscsiError::Config(_))));
}

#[test]
fn test_zero_pending_rejected() {
    let config = Config::builder().max_pending_connections(0).build();
    assert!(matches!(config.validate(), Err(IscsiError::Config(_))));
}

#[test]
fn test_bad_listen_addr_rejected() {
    let config = Config::builder().listen_addr("not an address").build();
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("invalid listen address"));
}

#[test]
fn test_responder_from_config() {
    let config = Config::builder().command_residual(64).build();
    assert_eq!(Responder::new(&config).command_residual(), 64);
    assert_eq!(Responder::new(&Config::default()), Responder::default());
}
