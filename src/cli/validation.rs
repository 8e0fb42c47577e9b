//! Value parsers for CLI arguments.

use std::net::IpAddr;
use std::path::PathBuf;

const MAX_ROLLBACK_STEPS: u32 = 100;

pub fn validate_port(value: &str) -> Result<u16, String> {
    match value.parse::<u16>() {
        Ok(0) => Err("Port must be between 1 and 65535. Port 0 is not allowed.".to_string()),
        Ok(port) => Ok(port),
        Err(_) => Err(format!(
            "Port must be a number between 1 and 65535, got: '{}'",
            value
        )),
    }
}

/// The file must exist and be readable.
pub fn validate_config_file_path(value: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(value);
    if !path.is_file() {
        return Err(format!("Configuration file does not exist: '{}'", value));
    }
    std::fs::File::open(&path)
        .map(|_| path)
        .map_err(|e| format!("Cannot read configuration file '{}': {}", value, e))
}

pub fn validate_rollback_steps(value: &str) -> Result<u32, String> {
    let steps: u32 = value
        .parse()
        .map_err(|_| format!("Rollback steps must be a positive number, got: '{}'", value))?;
    if steps == 0 || steps > MAX_ROLLBACK_STEPS {
        return Err(format!(
            "Rollback steps must be between 1 and {}",
            MAX_ROLLBACK_STEPS
        ));
    }
    Ok(steps)
}

/// Accepts IP addresses and plausible host names.
pub fn validate_host_address(value: &str) -> Result<String, String> {
    let host = value.trim();
    if host.is_empty() {
        return Err("Host address cannot be empty".to_string());
    }
    if host.parse::<IpAddr>().is_ok() {
        return Ok(host.to_string());
    }
    // dotted digits that failed to parse as an IP
    if host.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return Err(format!("Invalid IPv4 address: '{}'", value));
    }
    if host.len() > 253 {
        return Err("Host address is too long (maximum 253 characters)".to_string());
    }
    let valid_label = |label: &str| {
        !label.is_empty()
            && label.len() <= 63
            && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
            && !label.starts_with('-')
            && !label.ends_with('-')
    };
    if host.split('.').all(valid_label) {
        Ok(host.to_string())
    } else {
        Err(format!("Invalid host name: '{}'", value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ports() {
        for port in ["1", "80", "3000", "65535"] {
            assert!(validate_port(port).is_ok(), "{}", port);
        }
        for port in ["0", "65536", "-1", "abc", ""] {
            assert!(validate_port(port).is_err(), "{}", port);
        }
    }

    #[test]
    fn test_hosts() {
        for host in ["localhost", "127.0.0.1", "0.0.0.0", "::1", "db-1.internal"] {
            assert!(validate_host_address(host).is_ok(), "{}", host);
        }
        let long = "x".repeat(300);
        for host in ["", "   ", "two words", "999.1.1.1", "-bad.example", long.as_str()] {
            assert!(validate_host_address(host).is_err(), "{}", host);
        }
    }

    #[test]
    fn test_rollback_steps() {
        assert_eq!(validate_rollback_steps("3"), Ok(3));
        for steps in ["0", "101", "abc"] {
            assert!(validate_rollback_steps(steps).is_err(), "{}", steps);
        }
    }

    #[test]
    fn test_config_file_must_exist() {
        let dir = tempfile::TempDir::new().unwrap();
        assert!(validate_config_file_path(dir.path().to_str().unwrap()).is_err());

        let file = dir.path().join("library.toml");
        std::fs::write(&file, "").unwrap();
        assert_eq!(validate_config_file_path(file.to_str().unwrap()), Ok(file));
    }
}
