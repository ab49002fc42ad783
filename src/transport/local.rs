//! Access to the machine running the assessment.
//!
//! Facts come from `sysinfo`, refined with sysfs where the kernel exposes
//! more precise data:
//!
//! - memory is summed over online memory blocks in
//!   `/sys/devices/system/memory`, falling back to the kernel total
//! - the clock speed is the rated maximum from `cpufreq`, falling back to
//!   the fastest current core frequency

use std::fs;
use std::path::{Path, PathBuf};

use sysinfo::{Disks, System};

use super::{Attributes, FactQuery, QueryTransport, RemoteFiles};
use crate::assessment::Target;
use crate::error::Result;
use crate::shell::spawn_detached;

const MEMORY_SYSFS: &str = "/sys/devices/system/memory";
const CPU_MAX_FREQ: &str = "/sys/devices/system/cpu/cpu0/cpufreq/cpuinfo_max_freq";

/// Transport for the local host.
#[derive(Debug, Clone)]
pub struct LocalTransport {
    sysfs_memory: PathBuf,
}

impl Default for LocalTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalTransport {
    /// Create a transport reading the real sysfs.
    pub fn new() -> Self {
        Self {
            sysfs_memory: PathBuf::from(MEMORY_SYSFS),
        }
    }

    /// Create a transport reading memory blocks from another directory.
    pub fn with_memory_root(root: impl Into<PathBuf>) -> Self {
        Self {
            sysfs_memory: root.into(),
        }
    }

    fn processor(&self) -> Vec<Attributes> {
        let mut system = System::new();
        system.refresh_cpu();

        let current_max = system.cpus().iter().map(|c| c.frequency()).max();
        let clock_mhz = read_max_freq_mhz(Path::new(CPU_MAX_FREQ))
            .or(current_max)
            .unwrap_or(0);

        let arch = System::cpu_arch().unwrap_or_else(|| std::env::consts::ARCH.to_string());

        let mut attrs = Attributes::new();
        attrs.insert("AddressWidth".into(), usize::BITS.to_string());
        attrs.insert("DataWidth".into(), data_width(&arch).to_string());
        attrs.insert("MaxClockSpeed".into(), clock_mhz.to_string());
        vec![attrs]
    }

    fn memory_modules(&self) -> Vec<Attributes> {
        let blocks = memory_blocks(&self.sysfs_memory);
        if !blocks.is_empty() {
            return blocks.into_iter().map(capacity_instance).collect();
        }

        tracing::debug!(
            "No memory blocks under {}, using kernel total",
            self.sysfs_memory.display()
        );
        let mut system = System::new();
        system.refresh_memory();
        vec![capacity_instance(system.total_memory())]
    }

    fn operating_system(&self) -> Vec<Attributes> {
        let caption = System::long_os_version()
            .or_else(System::name)
            .unwrap_or_else(|| std::env::consts::OS.to_string());
        let drive = if cfg!(target_os = "windows") {
            std::env::var("SystemDrive").unwrap_or_else(|_| "C:".to_string())
        } else {
            "/".to_string()
        };

        let mut attrs = Attributes::new();
        attrs.insert("Caption".into(), caption);
        attrs.insert("SystemDrive".into(), drive);
        vec![attrs]
    }

    fn system_volume(&self, drive: &str) -> Vec<Attributes> {
        let disks = Disks::new_with_refreshed_list();
        disks
            .list()
            .iter()
            .filter(|disk| mount_matches(disk.mount_point(), drive))
            .take(1)
            .map(|disk| {
                let mut attrs = Attributes::new();
                attrs.insert("FreeSpace".into(), disk.available_space().to_string());
                attrs
            })
            .collect()
    }
}

impl QueryTransport for LocalTransport {
    fn is_reachable(&self, _target: &Target) -> bool {
        true
    }

    fn query(&self, _target: &Target, query: &FactQuery) -> Result<Vec<Attributes>> {
        Ok(match query {
            FactQuery::Processor => self.processor(),
            FactQuery::MemoryModules => self.memory_modules(),
            FactQuery::OperatingSystem => self.operating_system(),
            FactQuery::SystemVolume { drive } => self.system_volume(drive),
        })
    }

    fn create_process(&self, _target: &Target, command_line: &str) -> Result<u32> {
        match spawn_detached(command_line) {
            Ok(()) => Ok(0),
            Err(e) => {
                tracing::warn!("Local process creation failed: {}", e);
                Ok(1)
            }
        }
    }
}

impl RemoteFiles for LocalTransport {
    fn exists(&self, _target: &Target, path: &str) -> bool {
        Path::new(path).exists()
    }

    fn read_to_string(&self, _target: &Target, path: &str) -> Result<String> {
        Ok(fs::read_to_string(path)?)
    }

    fn remove(&self, _target: &Target, path: &str) -> Result<()> {
        Ok(fs::remove_file(path)?)
    }
}

fn capacity_instance(bytes: u64) -> Attributes {
    let mut attrs = Attributes::new();
    attrs.insert("Capacity".into(), bytes.to_string());
    attrs
}

/// Data width implied by a processor architecture name.
fn data_width(arch: &str) -> u16 {
    if arch.contains("64") || arch == "s390x" {
        64
    } else {
        32
    }
}

/// Rated maximum frequency in MHz from a `cpuinfo_max_freq` file (kHz).
fn read_max_freq_mhz(path: &Path) -> Option<u64> {
    let khz: u64 = fs::read_to_string(path).ok()?.trim().parse().ok()?;
    Some(khz / 1000)
}

/// Sizes of the online memory blocks below `root`.
fn memory_blocks(root: &Path) -> Vec<u64> {
    let Some(block_size) = fs::read_to_string(root.join("block_size_bytes"))
        .ok()
        .and_then(|hex| u64::from_str_radix(hex.trim().trim_start_matches("0x"), 16).ok())
    else {
        return Vec::new();
    };

    let Ok(entries) = fs::read_dir(root) else {
        return Vec::new();
    };

    entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_name().to_string_lossy().starts_with("memory"))
        .filter(|entry| {
            fs::read_to_string(entry.path().join("online"))
                .map(|state| state.trim() == "1")
                .unwrap_or(false)
        })
        .map(|_| block_size)
        .collect()
}

/// Whether a mount point is the volume named by `drive` (`/`, `C:`, `C:\`).
fn mount_matches(mount_point: &Path, drive: &str) -> bool {
    let mount = mount_point.to_string_lossy();
    let normalize = |s: &str| s.trim_end_matches(['\\', '/']).to_ascii_lowercase();
    if drive == "/" {
        return mount == "/";
    }
    normalize(&mount) == normalize(drive)
}
