//! Remote hosts reached through an ssh client.
//!
//! Every fact query runs a small POSIX probe script on the target that
//! prints `Key=Value` lines, one blank-line separated block per instance.
//! Process creation first checks that the tool resolves on the target,
//! then backgrounds the command with `nohup`. The ssh exit status is the
//! creation result, so a missing tool comes back as 127.
//!
//! Host names that start with `-` are refused before anything is run.

use super::{parse_attribute_blocks, Attributes, FactQuery, QueryTransport};
use crate::assessment::Target;
use crate::config::TransportSettings;
use crate::error::{FleetError, Result};
use crate::shell::{ping_args, run, shell_quote};

/// Creation result when the target name could be read as an option.
const REFUSED_TARGET: u32 = 2;

const PROCESSOR_PROBE: &str = r#"printf 'AddressWidth=%s\n' "$(getconf LONG_BIT)"
case "$(uname -m)" in *64*|s390x) echo DataWidth=64 ;; *) echo DataWidth=32 ;; esac
f=/sys/devices/system/cpu/cpu0/cpufreq/cpuinfo_max_freq
if [ -r "$f" ]; then echo "MaxClockSpeed=$(( $(cat "$f") / 1000 ))"
else awk -F: '/cpu MHz/ { printf "MaxClockSpeed=%d\n", $2; exit }' /proc/cpuinfo; fi"#;

const MEMORY_PROBE: &str = r#"d=/sys/devices/system/memory
if [ -r "$d/block_size_bytes" ]; then
  s=$(( 0x$(cat "$d/block_size_bytes") ))
  for m in "$d"/memory*/online; do
    [ "$(cat "$m")" = 1 ] && printf 'Capacity=%s\n\n' "$s"
  done
else awk '/MemTotal/ { printf "Capacity=%d\n", $2 * 1024 }' /proc/meminfo; fi"#;

const OS_PROBE: &str = r#". /etc/os-release 2>/dev/null
printf 'Caption=%s\nSystemDrive=/\n' "${PRETTY_NAME:-$(uname -sr)}""#;

/// Transport that runs probes over ssh.
#[derive(Debug, Clone)]
pub struct SshTransport {
    settings: TransportSettings,
}

impl SshTransport {
    /// Create a transport from the configured settings.
    pub fn new(settings: TransportSettings) -> Self {
        Self { settings }
    }

    fn destination(&self, target: &Target) -> String {
        match &self.settings.user {
            Some(user) => format!("{}@{}", user, target.name()),
            None => target.name().to_string(),
        }
    }

    /// Full argument list for running `remote_command` on `target`.
    fn ssh_args(&self, target: &Target, remote_command: &str) -> Vec<String> {
        let mut args = self.settings.ssh_options.clone();
        args.push("--".to_string());
        args.push(self.destination(target));
        args.push(remote_command.to_string());
        args
    }

    /// Remote shell line that starts `command_line` in the background once
    /// its program is known to resolve.
    fn launch_script(command_line: &str) -> String {
        format!(
            "command -v {} >/dev/null 2>&1 || exit 127; nohup {} >/dev/null 2>&1 &",
            leading_word(command_line),
            command_line
        )
    }

    fn probe_script(query: &FactQuery) -> String {
        match query {
            FactQuery::Processor => PROCESSOR_PROBE.to_string(),
            FactQuery::MemoryModules => MEMORY_PROBE.to_string(),
            FactQuery::OperatingSystem => OS_PROBE.to_string(),
            FactQuery::SystemVolume { drive } => format!(
                "df -Pk {} | awk 'NR == 2 {{ printf \"FreeSpace=%d\\n\", $4 * 1024 }}'",
                shell_quote(drive)
            ),
        }
    }
}

impl QueryTransport for SshTransport {
    fn is_reachable(&self, target: &Target) -> bool {
        if target.is_option_like() {
            tracing::warn!("Refusing host name that looks like an option: {}", target);
            return false;
        }
        let args = ping_args(target.name(), self.settings.ping_timeout_secs);
        match run("ping", &args) {
            Ok(result) => result.success,
            Err(e) => {
                tracing::debug!("ping unavailable for {}: {}", target, e);
                false
            }
        }
    }

    fn query(&self, target: &Target, query: &FactQuery) -> Result<Vec<Attributes>> {
        if target.is_option_like() {
            return Err(FleetError::QueryError {
                target: target.name().to_string(),
                query: query.name().to_string(),
                message: "host name starts with '-'".to_string(),
            });
        }
        let args = self.ssh_args(target, &Self::probe_script(query));
        let result = run(&self.settings.ssh_program, &args)?;

        if !result.success {
            return Err(FleetError::QueryError {
                target: target.name().to_string(),
                query: query.name().to_string(),
                message: format!(
                    "remote probe exited with {:?}: {}",
                    result.exit_code,
                    result.stderr.trim()
                ),
            });
        }

        Ok(parse_attribute_blocks(&result.stdout))
    }

    fn create_process(&self, target: &Target, command_line: &str) -> Result<u32> {
        if target.is_option_like() {
            return Ok(REFUSED_TARGET);
        }
        let remote = Self::launch_script(command_line);
        let result = run(&self.settings.ssh_program, &self.ssh_args(target, &remote))?;
        let code = result.exit_code.map(|code| code as u32).unwrap_or(u32::MAX);
        if code != 0 {
            tracing::debug!("Launch on {} returned {}: {}", target, code, result.stderr.trim());
        }
        Ok(code)
    }
}

/// First shell word of `command_line`, keeping its quoting.
fn leading_word(command_line: &str) -> &str {
    let line = command_line.trim_start();
    if let Some(rest) = line.strip_prefix('\'') {
        return match rest.find('\'') {
            Some(end) => &line[..end + 2],
            None => line,
        };
    }
    line.split_whitespace().next().unwrap_or(line)
}
