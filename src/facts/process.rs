use std::env::consts;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::facts::provider::PlatformFacts;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct MemoryUsage {
    pub(crate) rss: u64,
    #[serde(rename = "virtual")]
    pub(crate) virtual_bytes: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CpuUsage {
    pub(crate) user: u64,
    pub(crate) system: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ProcessSnapshot {
    pub(crate) pid: u32,
    pub(crate) ppid: Option<u32>,
    pub(crate) version: String,
    pub(crate) platform: &'static str,
    pub(crate) arch: &'static str,
    pub(crate) argv: Vec<String>,
    pub(crate) exec_path: String,
    pub(crate) cwd: String,
    pub(crate) memory_usage: MemoryUsage,
    pub(crate) cpu_usage: CpuUsage,
    pub(crate) uptime: f64,
    pub(crate) versions: Map<String, Value>,
}

pub(crate) fn collect(platform: &dyn PlatformFacts) -> ProcessSnapshot {
    let process = platform.process();

    // Component version strings are opaque pass-throughs, never parsed.
    let versions = platform
        .component_versions()
        .into_iter()
        .map(|(component, version)| (component, Value::String(version)))
        .collect();

    ProcessSnapshot {
        pid: process.pid,
        ppid: process.ppid,
        version: platform.version(),
        platform: consts::OS,
        arch: consts::ARCH,
        argv: process.argv,
        exec_path: process.exe_path,
        cwd: process.cwd,
        memory_usage: MemoryUsage {
            rss: process.rss_bytes,
            virtual_bytes: process.virtual_bytes,
        },
        cpu_usage: CpuUsage {
            user: process.cpu_user_micros,
            system: process.cpu_system_micros,
        },
        uptime: process.uptime_secs,
        versions,
    }
}

#[cfg(test)]
mod tests {
    use super::collect;
    use crate::facts::provider::fake::FakePlatform;

    #[test]
    fn snapshot_reads_provider_values() {
        let fake = FakePlatform::default();
        let snapshot = collect(&fake);

        assert_eq!(snapshot.pid, 4242);
        assert_eq!(snapshot.ppid, Some(1));
        assert_eq!(snapshot.version, "0.0.0-test");
        assert_eq!(snapshot.uptime, 12.5);
        assert_eq!(snapshot.memory_usage.rss, 10_485_760);
        assert_eq!(snapshot.cpu_usage.user, 120_000);
        assert_eq!(snapshot.versions["server"], "0.0.0-test");
    }

    #[test]
    fn uptime_keeps_fractional_seconds() {
        let fake = FakePlatform::default();
        let value = serde_json::to_value(collect(&fake)).unwrap();

        assert_eq!(value["uptime"], 12.5);
        assert!(value["memoryUsage"].get("virtual").is_some());
        assert!(value.get("execPath").is_some());
    }
}
