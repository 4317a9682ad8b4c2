//! Integration tests for metrics server functionality.

use serial_test::serial;
use testrack_core::config::MetricsConfig;
use testrack_daemon::metrics_server;

#[test]
#[serial]
fn test_install_metrics_recorder_fails_with_invalid_address() {
    // Given: An invalid metrics configuration (invalid IP)
    let config = MetricsConfig {
        enabled: true,
        listen_addr: "999.999.999.999".to_string(),
        port: 19406,
        endpoint: "/metrics".to_string(),
    };

    // When: Installing the metrics recorder
    let result = metrics_server::install_metrics_recorder(&config);

    // Then: Should fail before binding anything
    assert!(
        result.is_err(),
        "install_metrics_recorder should fail with invalid address"
    );
}

#[test]
#[serial]
fn test_install_metrics_recorder_rejects_unsupported_endpoint() {
    // Given: A custom scrape path
    let config = MetricsConfig {
        enabled: true,
        listen_addr: "127.0.0.1".to_string(),
        port: 19407,
        endpoint: "/custom".to_string(),
    };

    // When: Installing the metrics recorder
    let result = metrics_server::install_metrics_recorder(&config);

    // Then: Should fail with an endpoint error
    let err = result.expect_err("custom endpoint should be rejected");
    assert!(err.to_string().contains("/custom"), "got: {err}");
}
