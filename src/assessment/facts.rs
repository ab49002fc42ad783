//! Host fact collection.
//!
//! The collector checks reachability, then issues the processor, memory
//! module, operating system and system volume queries. Any failing query
//! fails the whole collection; partial fact sets are never returned.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::Target;
use crate::error::{FleetError, Result};
use crate::transport::{Attributes, FactQuery, QueryTransport};

/// Bytes per GB as used by the requirement profile.
pub const BYTES_PER_GB: u64 = 1024 * 1024 * 1024;

/// Hardware and OS facts for one host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawFacts {
    /// Processor address width in bits
    pub address_width: u16,
    /// Processor data width in bits
    pub data_width: u16,
    /// Rated maximum clock speed in MHz
    pub max_clock_mhz: u32,
    /// Sum of installed memory module capacities
    pub total_memory_bytes: u64,
    /// Free space on the system volume
    pub free_disk_bytes: u64,
    /// Operating system caption
    pub os_name: String,
    /// Volume holding the operating system
    pub system_drive: String,
}

impl RawFacts {
    /// Installed memory in GB.
    pub fn memory_gb(&self) -> f64 {
        self.total_memory_bytes as f64 / BYTES_PER_GB as f64
    }

    /// Free system-volume space in GB.
    pub fn free_disk_gb(&self) -> f64 {
        self.free_disk_bytes as f64 / BYTES_PER_GB as f64
    }

    /// Whether the processor is 64-bit.
    pub fn is_64_bit(&self) -> bool {
        self.data_width == 64
    }
}

/// Collects [`RawFacts`] from one target through a [`QueryTransport`].
pub struct HostFactCollector<'a> {
    transport: &'a dyn QueryTransport,
}

impl<'a> HostFactCollector<'a> {
    /// Create a collector over the given transport.
    pub fn new(transport: &'a dyn QueryTransport) -> Self {
        Self { transport }
    }

    /// Collect all facts for `target`.
    ///
    /// # Errors
    ///
    /// Returns `Unreachable` if the reachability check fails, and
    /// `QueryError` naming the failing query otherwise.
    pub fn collect(&self, target: &Target) -> Result<RawFacts> {
        if !self.transport.is_reachable(target) {
            return Err(FleetError::Unreachable {
                target: target.name().to_string(),
            });
        }

        let processor = self.first_instance(target, &FactQuery::Processor)?;
        let address_width = attribute(target, &FactQuery::Processor, &processor, "AddressWidth")?;
        let data_width = attribute(target, &FactQuery::Processor, &processor, "DataWidth")?;
        let max_clock_mhz = attribute(target, &FactQuery::Processor, &processor, "MaxClockSpeed")?;

        let total_memory_bytes = self.memory_total(target)?;

        let os = self.first_instance(target, &FactQuery::OperatingSystem)?;
        let os_name: String = attribute(target, &FactQuery::OperatingSystem, &os, "Caption")?;
        let system_drive: String =
            attribute(target, &FactQuery::OperatingSystem, &os, "SystemDrive")?;

        let volume_query = FactQuery::SystemVolume {
            drive: system_drive.clone(),
        };
        let volume = self.first_instance(target, &volume_query)?;
        let free_disk_bytes = attribute(target, &volume_query, &volume, "FreeSpace")?;

        let facts = RawFacts {
            address_width,
            data_width,
            max_clock_mhz,
            total_memory_bytes,
            free_disk_bytes,
            os_name,
            system_drive,
        };
        tracing::debug!("Collected facts for {}: {:?}", target, facts);
        Ok(facts)
    }

    fn run(&self, target: &Target, query: &FactQuery) -> Result<Vec<Attributes>> {
        self.transport
            .query(target, query)
            .map_err(|e| match e {
                FleetError::QueryError { .. } => e,
                other => query_error(target, query, other.to_string()),
            })
    }

    fn first_instance(&self, target: &Target, query: &FactQuery) -> Result<Attributes> {
        self.run(target, query)?
            .into_iter()
            .next()
            .ok_or_else(|| query_error(target, query, "query returned no instances"))
    }

    /// Sum of module capacities; the OS "total memory" figure is not used.
    fn memory_total(&self, target: &Target) -> Result<u64> {
        let query = FactQuery::MemoryModules;
        let modules = self.run(target, &query)?;
        if modules.is_empty() {
            return Err(query_error(target, &query, "no memory modules reported"));
        }

        modules.iter().try_fold(0u64, |total, module| {
            let capacity: u64 = attribute(target, &query, module, "Capacity")?;
            Ok(total.saturating_add(capacity))
        })
    }
}

fn query_error(target: &Target, query: &FactQuery, message: impl Into<String>) -> FleetError {
    FleetError::QueryError {
        target: target.name().to_string(),
        query: query.name().to_string(),
        message: message.into(),
    }
}

/// Read and convert one attribute of a query instance.
fn attribute<T: FromStr>(
    target: &Target,
    query: &FactQuery,
    instance: &Attributes,
    key: &str,
) -> Result<T> {
    let raw = instance
        .get(key)
        .ok_or_else(|| query_error(target, query, format!("missing attribute '{}'", key)))?;
    raw.trim().parse().map_err(|_| {
        query_error(
            target,
            query,
            format!("attribute '{}' has unexpected value '{}'", key, raw),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    /// Transport answering from fixed instance lists.
    #[derive(Default)]
    struct FixedTransport {
        unreachable: bool,
        answers: HashMap<&'static str, Vec<Vec<(&'static str, &'static str)>>>,
        failing: Option<&'static str>,
    }

    impl FixedTransport {
        fn healthy() -> Self {
            let mut answers = HashMap::new();
            answers.insert(
                "processor",
                vec![vec![
                    ("AddressWidth", "64"),
                    ("DataWidth", "64"),
                    ("MaxClockSpeed", "2400"),
                ]],
            );
            answers.insert(
                "memory-modules",
                vec![
                    vec![("Capacity", "1073741824")],
                    vec![("Capacity", "2147483648")],
                ],
            );
            answers.insert(
                "operating-system",
                vec![vec![("Caption", "Windows 7 Professional"), ("SystemDrive", "C:")]],
            );
            answers.insert("system-volume", vec![vec![("FreeSpace", "21474836480")]]);
            Self {
                answers,
                ..Default::default()
            }
        }
    }

    impl QueryTransport for FixedTransport {
        fn is_reachable(&self, _target: &Target) -> bool {
            !self.unreachable
        }

        fn query(&self, _target: &Target, query: &FactQuery) -> Result<Vec<Attributes>> {
            if self.failing == Some(query.name()) {
                return Err(FleetError::CommandFailed {
                    command: "probe".into(),
                    code: Some(255),
                });
            }
            Ok(self
                .answers
                .get(query.name())
                .map(|instances| {
                    instances
                        .iter()
                        .map(|pairs| {
                            pairs
                                .iter()
                                .map(|(k, v)| (k.to_string(), v.to_string()))
                                .collect()
                        })
                        .collect()
                })
                .unwrap_or_default())
        }

        fn create_process(&self, _target: &Target, _command_line: &str) -> Result<u32> {
            Ok(0)
        }
    }

    fn target() -> Target {
        Target::new("ws-001")
    }

    #[test]
    fn collects_all_facts() {
        let transport = FixedTransport::healthy();
        let facts = HostFactCollector::new(&transport).collect(&target()).unwrap();

        assert_eq!(facts.address_width, 64);
        assert_eq!(facts.data_width, 64);
        assert_eq!(facts.max_clock_mhz, 2400);
        assert_eq!(facts.total_memory_bytes, 3 * BYTES_PER_GB);
        assert_eq!(facts.free_disk_bytes, 20 * BYTES_PER_GB);
        assert_eq!(facts.system_drive, "C:");
        assert!(facts.is_64_bit());
        assert_eq!(facts.memory_gb(), 3.0);
        assert_eq!(facts.free_disk_gb(), 20.0);
    }

    #[test]
    fn unreachable_host_fails_before_queries() {
        let transport = FixedTransport {
            unreachable: true,
            ..FixedTransport::healthy()
        };
        let result = HostFactCollector::new(&transport).collect(&target());
        assert!(matches!(result, Err(FleetError::Unreachable { .. })));
    }

    #[test]
    fn failing_query_is_named() {
        let transport = FixedTransport {
            failing: Some("memory-modules"),
            ..FixedTransport::healthy()
        };
        match HostFactCollector::new(&transport).collect(&target()) {
            Err(FleetError::QueryError { query, .. }) => assert_eq!(query, "memory-modules"),
            other => panic!("Expected QueryError, got {:?}", other),
        }
    }

    #[test]
    fn missing_attribute_is_query_error() {
        let mut transport = FixedTransport::healthy();
        transport
            .answers
            .insert("processor", vec![vec![("AddressWidth", "64")]]);

        match HostFactCollector::new(&transport).collect(&target()) {
            Err(FleetError::QueryError { query, message, .. }) => {
                assert_eq!(query, "processor");
                assert!(message.contains("DataWidth"));
            }
            other => panic!("Expected QueryError, got {:?}", other),
        }
    }

    #[test]
    fn non_numeric_capacity_is_query_error() {
        let mut transport = FixedTransport::healthy();
        transport
            .answers
            .insert("memory-modules", vec![vec![("Capacity", "lots")]]);

        let result = HostFactCollector::new(&transport).collect(&target());
        assert!(matches!(result, Err(FleetError::QueryError { .. })));
    }

    #[test]
    fn empty_volume_answer_is_query_error() {
        let mut transport = FixedTransport::healthy();
        transport.answers.remove("system-volume");

        match HostFactCollector::new(&transport).collect(&target()) {
            Err(FleetError::QueryError { query, .. }) => assert_eq!(query, "system-volume"),
            other => panic!("Expected QueryError, got {:?}", other),
        }
    }

    #[test]
    fn no_memory_modules_is_query_error() {
        let mut transport = FixedTransport::healthy();
        transport.answers.remove("memory-modules");

        let result = HostFactCollector::new(&transport).collect(&target());
        assert!(matches!(result, Err(FleetError::QueryError { .. })));
    }
}
