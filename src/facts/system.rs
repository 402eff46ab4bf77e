use std::env::consts;

use serde::Serialize;

use crate::facts::provider::PlatformFacts;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UserInfo {
    pub(crate) username: String,
    pub(crate) home: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SystemSnapshot {
    pub(crate) hostname: String,
    pub(crate) platform: &'static str,
    pub(crate) arch: &'static str,
    pub(crate) release: String,
    pub(crate) kernel_type: String,
    pub(crate) uptime: u64,
    pub(crate) total_memory: u64,
    pub(crate) free_memory: u64,
    pub(crate) cpu_count: usize,
    pub(crate) load_average: [f64; 3],
    pub(crate) network_interfaces: Vec<String>,
    pub(crate) user: UserInfo,
    pub(crate) tmp_dir: String,
    pub(crate) byte_order: &'static str,
}

pub(crate) fn collect(platform: &dyn PlatformFacts) -> SystemSnapshot {
    let memory = platform.memory();

    SystemSnapshot {
        hostname: platform.hostname(),
        platform: consts::OS,
        arch: consts::ARCH,
        release: platform.kernel_release(),
        kernel_type: platform.os_name(),
        uptime: platform.uptime_secs(),
        total_memory: to_megabytes(memory.total_bytes),
        free_memory: to_megabytes(memory.free_bytes),
        cpu_count: platform.cpu_count(),
        load_average: platform.load_average(),
        network_interfaces: platform
            .interfaces()
            .into_iter()
            .map(|interface| interface.name)
            .collect(),
        user: UserInfo {
            username: platform.username(),
            home: platform.home_dir(),
        },
        tmp_dir: platform.temp_dir(),
        byte_order: if cfg!(target_endian = "little") {
            "little"
        } else {
            "big"
        },
    }
}

/// Bytes to megabytes, rounded to the nearest whole megabyte.
fn to_megabytes(bytes: u64) -> u64 {
    const MEBIBYTE: u64 = 1_048_576;

    (bytes + MEBIBYTE / 2) / MEBIBYTE
}
