//! Integration tests for CLI argument handling
//!
//! Runs the weatherhub binary for the paths that exit before any service
//! starts listening.

use std::process::Command;

/// Helper to run the CLI with given args and capture output
fn run_cli(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_weatherhub"))
        .args(args)
        .env_remove("OPENWEATHER_API_KEY")
        .env_remove("GOOGLE_MAPS_API_KEY")
        .output()
        .expect("Failed to execute weatherhub")
}

#[test]
fn test_help_flag_exits_successfully() {
    let output = run_cli(&["--help"]);
    assert!(
        output.status.success(),
        "Expected --help to exit successfully"
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("weatherhub"), "Help should mention weatherhub");
    assert!(stdout.contains("--service"), "Help should mention --service");
    assert!(stdout.contains("--base-port"), "Help should mention --base-port");
}

#[test]
fn test_unknown_service_prints_error_and_exits() {
    let output = run_cli(&["--service", "tides"]);
    assert!(!output.status.success(), "Expected unknown service to fail");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("invalid value"),
        "Should print error message about the invalid service: {}",
        stderr
    );
}

#[test]
fn test_missing_openweather_key_fails_before_binding() {
    let output = run_cli(&["--service", "forecast", "--base-port", "0"]);
    assert!(
        !output.status.success(),
        "Expected a missing API key to fail"
    );
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("The forecast service requires an OpenWeatherMap API key"),
        "Should report the missing key: {}",
        stderr
    );
}

#[cfg(test)]
mod unit_tests {
    //! Unit tests for CLI parsing that don't require running the binary

    use clap::Parser;
    use weatherhub::cli::Cli;
    use weatherhub::config::Config;
    use weatherhub::services::ServiceKind;

    #[test]
    fn test_cli_maps_only_needs_no_openweather_key() {
        let cli = Cli::parse_from(["weatherhub", "--service", "maps"]);
        let config = Config::from_cli(&cli).unwrap();
        assert_eq!(config.services, vec![ServiceKind::Maps]);
    }

    #[test]
    fn test_cli_service_ports_follow_base_port() {
        let cli = Cli::parse_from([
            "weatherhub",
            "--base-port",
            "6000",
            "--openweather-key",
            "key",
        ]);
        let config = Config::from_cli(&cli).unwrap();
        assert_eq!(config.addr_for(ServiceKind::Conditions).port(), 6000);
        assert_eq!(config.addr_for(ServiceKind::Searches).port(), 6005);
        assert_eq!(config.coordinates_url, "http://127.0.0.1:6003/coordinates");
    }
}
