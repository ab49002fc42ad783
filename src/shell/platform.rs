//! Platform detection.

/// Check if running in a CI environment.
///
/// Used to suppress the progress bar in log-based environments.
/// Checks common CI environment variables: `CI`, `GITHUB_ACTIONS`,
/// `GITLAB_CI`, `CIRCLECI`, `TRAVIS`, `JENKINS_URL`.
pub fn is_ci() -> bool {
    ["CI", "GITHUB_ACTIONS", "GITLAB_CI", "CIRCLECI", "TRAVIS", "JENKINS_URL"]
        .iter()
        .any(|var| std::env::var(var).is_ok())
}

/// Arguments for a single-echo reachability probe with `ping`.
pub fn ping_args(host: &str, timeout_secs: u64) -> Vec<String> {
    let timeout_secs = timeout_secs.max(1);
    if cfg!(target_os = "windows") {
        vec![
            "-n".to_string(),
            "1".to_string(),
            "-w".to_string(),
            (timeout_secs * 1000).to_string(),
            host.to_string(),
        ]
    } else if cfg!(target_os = "macos") {
        vec![
            "-c".to_string(),
            "1".to_string(),
            "-t".to_string(),
            timeout_secs.to_string(),
            host.to_string(),
        ]
    } else {
        vec![
            "-c".to_string(),
            "1".to_string(),
            "-W".to_string(),
            timeout_secs.to_string(),
            host.to_string(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn is_ci_detects_environment() {
        let _ = is_ci();
    }

    #[test]
    fn ping_args_send_one_echo_to_host() {
        let args = ping_args("ws-001", 2);
        assert_eq!(args.last().map(String::as_str), Some("ws-001"));
        assert!(args.contains(&"1".to_string()));
    }

    #[test]
    fn ping_timeout_is_at_least_one_second() {
        let args = ping_args("ws-001", 0);
        assert!(!args.contains(&"0".to_string()));
    }
}
