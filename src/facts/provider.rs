use std::env;
use std::net::IpAddr;
use std::time::{SystemTime, UNIX_EPOCH};

use sysinfo::{Networks, Pid, System};

#[derive(Debug, Clone)]
pub(crate) struct MemoryFacts {
    pub(crate) total_bytes: u64,
    pub(crate) free_bytes: u64,
}

#[derive(Debug, Clone)]
pub(crate) struct RawAddress {
    pub(crate) addr: IpAddr,
    pub(crate) prefix: u8,
}

#[derive(Debug, Clone)]
pub(crate) struct RawInterface {
    pub(crate) name: String,
    pub(crate) mac: String,
    pub(crate) addresses: Vec<RawAddress>,
}

#[derive(Debug, Clone)]
pub(crate) struct RawProcess {
    pub(crate) pid: u32,
    pub(crate) ppid: Option<u32>,
    pub(crate) argv: Vec<String>,
    pub(crate) exe_path: String,
    pub(crate) cwd: String,
    pub(crate) rss_bytes: u64,
    pub(crate) virtual_bytes: u64,
    pub(crate) cpu_user_micros: u64,
    pub(crate) cpu_system_micros: u64,
    pub(crate) uptime_secs: f64,
}

/// Read-only capability over process and host state. Every method is
/// infallible: values the platform cannot supply degrade to empty
/// strings or zeros, never to errors.
pub(crate) trait PlatformFacts: Send + Sync {
    fn hostname(&self) -> String;
    fn os_name(&self) -> String;
    fn kernel_release(&self) -> String;
    fn uptime_secs(&self) -> u64;
    fn memory(&self) -> MemoryFacts;
    fn cpu_count(&self) -> usize;
    fn load_average(&self) -> [f64; 3];
    fn interfaces(&self) -> Vec<RawInterface>;
    fn username(&self) -> String;
    fn home_dir(&self) -> String;
    fn temp_dir(&self) -> String;
    fn version(&self) -> String;
    fn process(&self) -> RawProcess;
    fn component_versions(&self) -> Vec<(String, String)>;
    fn env_vars(&self) -> Vec<(String, String)>;
}

pub(crate) struct HostPlatform;

impl HostPlatform {
    pub(crate) fn new() -> Self {
        HostPlatform
    }
}

impl PlatformFacts for HostPlatform {
    fn hostname(&self) -> String {
        System::host_name().unwrap_or_default()
    }

    fn os_name(&self) -> String {
        System::name().unwrap_or_default()
    }

    fn kernel_release(&self) -> String {
        System::kernel_version().unwrap_or_default()
    }

    fn uptime_secs(&self) -> u64 {
        System::uptime()
    }

    fn memory(&self) -> MemoryFacts {
        let mut sys = System::new();
        sys.refresh_memory();

        MemoryFacts {
            total_bytes: sys.total_memory(),
            free_bytes: sys.free_memory(),
        }
    }

    fn cpu_count(&self) -> usize {
        let mut sys = System::new_all();
        sys.refresh_all();

        sys.cpus().len()
    }

    fn load_average(&self) -> [f64; 3] {
        let load = System::load_average();

        [load.one, load.five, load.fifteen]
    }

    fn interfaces(&self) -> Vec<RawInterface> {
        let networks = Networks::new_with_refreshed_list();

        networks
            .iter()
            .map(|(name, data)| RawInterface {
                name: name.clone(),
                mac: data.mac_address().to_string(),
                addresses: data
                    .ip_networks()
                    .iter()
                    .map(|network| RawAddress {
                        addr: network.addr,
                        prefix: network.prefix,
                    })
                    .collect(),
            })
            .collect()
    }

    fn username(&self) -> String {
        env::var("USER")
            .or_else(|_| env::var("USERNAME"))
            .unwrap_or_default()
    }

    fn home_dir(&self) -> String {
        env::var("HOME")
            .or_else(|_| env::var("USERPROFILE"))
            .unwrap_or_default()
    }

    fn temp_dir(&self) -> String {
        env::temp_dir().display().to_string()
    }

    fn version(&self) -> String {
        env!("CARGO_PKG_VERSION").to_string()
    }

    fn process(&self) -> RawProcess {
        let pid = std::process::id();

        let mut sys = System::new_all();
        sys.refresh_all();

        let (ppid, rss_bytes, virtual_bytes, start_time) = match sys.process(Pid::from_u32(pid)) {
            Some(process) => (
                process.parent().map(|parent| parent.as_u32()),
                process.memory(),
                process.virtual_memory(),
                process.start_time(),
            ),
            None => (None, 0, 0, 0),
        };

        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_secs_f64())
            .unwrap_or(0.0);

        let uptime_secs = if start_time > 0 {
            (now - start_time as f64).max(0.0)
        } else {
            0.0
        };

        let (cpu_user_micros, cpu_system_micros) = cpu_times();

        RawProcess {
            pid,
            ppid,
            argv: env::args().collect(),
            exe_path: env::current_exe()
                .map(|path| path.display().to_string())
                .unwrap_or_default(),
            cwd: env::current_dir()
                .map(|path| path.display().to_string())
                .unwrap_or_default(),
            rss_bytes,
            virtual_bytes,
            cpu_user_micros,
            cpu_system_micros,
            uptime_secs,
        }
    }

    fn component_versions(&self) -> Vec<(String, String)> {
        vec![
            ("server".to_string(), env!("CARGO_PKG_VERSION").to_string()),
            ("os".to_string(), System::long_os_version().unwrap_or_default()),
            ("kernel".to_string(), System::kernel_version().unwrap_or_default()),
        ]
    }

    fn env_vars(&self) -> Vec<(String, String)> {
        env::vars().collect()
    }
}

/// utime/stime are fields 14 and 15 of /proc/self/stat, in USER_HZ ticks.
#[cfg(target_os = "linux")]
fn cpu_times() -> (u64, u64) {
    const TICKS_PER_SEC: u64 = 100;

    let stat = match std::fs::read_to_string("/proc/self/stat") {
        Ok(contents) => contents,
        Err(_) => return (0, 0),
    };

    // The comm field may contain spaces, everything of interest sits
    // after the closing paren.
    let after_comm = match stat.rsplit_once(')') {
        Some((_, rest)) => rest,
        None => return (0, 0),
    };

    let fields: Vec<&str> = after_comm.split_whitespace().collect();
    let utime = fields.get(11).and_then(|v| v.parse::<u64>().ok()).unwrap_or(0);
    let stime = fields.get(12).and_then(|v| v.parse::<u64>().ok()).unwrap_or(0);

    (
        utime * 1_000_000 / TICKS_PER_SEC,
        stime * 1_000_000 / TICKS_PER_SEC,
    )
}

#[cfg(not(target_os = "linux"))]
fn cpu_times() -> (u64, u64) {
    (0, 0)
}

#[cfg(test)]
pub(crate) mod fake {
    use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

    use super::{MemoryFacts, PlatformFacts, RawAddress, RawInterface, RawProcess};

    #[derive(Debug, Clone)]
    pub(crate) struct FakePlatform {
        pub(crate) hostname: String,
        pub(crate) os_name: String,
        pub(crate) kernel_release: String,
        pub(crate) uptime_secs: u64,
        pub(crate) total_memory: u64,
        pub(crate) free_memory: u64,
        pub(crate) cpu_count: usize,
        pub(crate) load_average: [f64; 3],
        pub(crate) interfaces: Vec<RawInterface>,
        pub(crate) env: Vec<(String, String)>,
    }

    impl Default for FakePlatform {
        fn default() -> Self {
            FakePlatform {
                hostname: "test-host".to_string(),
                os_name: "Linux".to_string(),
                kernel_release: "6.1.0-test".to_string(),
                uptime_secs: 86_400,
                // 1.5 MiB, rounds up to 2 MB in the snapshot
                total_memory: 1_572_864,
                free_memory: 524_287,
                cpu_count: 8,
                load_average: [0.5, 0.25, 0.0],
                interfaces: vec![
                    RawInterface {
                        name: "lo".to_string(),
                        mac: "00:00:00:00:00:00".to_string(),
                        addresses: vec![RawAddress {
                            addr: IpAddr::V4(Ipv4Addr::LOCALHOST),
                            prefix: 8,
                        }],
                    },
                    RawInterface {
                        name: "eth0".to_string(),
                        mac: "02:42:ac:11:00:02".to_string(),
                        addresses: vec![
                            RawAddress {
                                addr: IpAddr::V4(Ipv4Addr::new(172, 17, 0, 2)),
                                prefix: 24,
                            },
                            RawAddress {
                                addr: IpAddr::V6(Ipv6Addr::new(
                                    0xfe80, 0, 0, 0, 0x42, 0xacff, 0xfe11, 0x2,
                                )),
                                prefix: 64,
                            },
                        ],
                    },
                ],
                env: vec![
                    ("HOSTNAME".to_string(), "test-host".to_string()),
                    ("PATH".to_string(), "/usr/local/bin:/usr/bin".to_string()),
                    ("HOME".to_string(), "/home/test".to_string()),
                    ("POD_NAMESPACE".to_string(), "staging".to_string()),
                    ("KUBERNETES_SERVICE_HOST".to_string(), "10.96.0.1".to_string()),
                    ("MY_SERVICE_HOST".to_string(), "10.96.0.7".to_string()),
                    ("UNRELATED_VAR".to_string(), "shadow".to_string()),
                    ("SECRET_TOKEN".to_string(), "hunter2".to_string()),
                ],
            }
        }
    }

    impl PlatformFacts for FakePlatform {
        fn hostname(&self) -> String {
            self.hostname.clone()
        }

        fn os_name(&self) -> String {
            self.os_name.clone()
        }

        fn kernel_release(&self) -> String {
            self.kernel_release.clone()
        }

        fn uptime_secs(&self) -> u64 {
            self.uptime_secs
        }

        fn memory(&self) -> MemoryFacts {
            MemoryFacts {
                total_bytes: self.total_memory,
                free_bytes: self.free_memory,
            }
        }

        fn cpu_count(&self) -> usize {
            self.cpu_count
        }

        fn load_average(&self) -> [f64; 3] {
            self.load_average
        }

        fn interfaces(&self) -> Vec<RawInterface> {
            self.interfaces.clone()
        }

        fn username(&self) -> String {
            "test".to_string()
        }

        fn home_dir(&self) -> String {
            "/home/test".to_string()
        }

        fn temp_dir(&self) -> String {
            "/tmp".to_string()
        }

        fn version(&self) -> String {
            "0.0.0-test".to_string()
        }

        fn process(&self) -> RawProcess {
            RawProcess {
                pid: 4242,
                ppid: Some(1),
                argv: vec!["mirador".to_string()],
                exe_path: "/usr/local/bin/mirador".to_string(),
                cwd: "/srv".to_string(),
                rss_bytes: 10_485_760,
                virtual_bytes: 104_857_600,
                cpu_user_micros: 120_000,
                cpu_system_micros: 40_000,
                uptime_secs: 12.5,
            }
        }

        fn component_versions(&self) -> Vec<(String, String)> {
            vec![
                ("server".to_string(), "0.0.0-test".to_string()),
                ("kernel".to_string(), "6.1.0-test".to_string()),
            ]
        }

        fn env_vars(&self) -> Vec<(String, String)> {
            self.env.clone()
        }
    }
}
