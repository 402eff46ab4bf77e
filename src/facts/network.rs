use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use serde_json::{json, Map, Value};

use crate::facts::provider::{PlatformFacts, RawAddress};

/// Interface name to address records, provider order preserved at both
/// the interface and the address level, no dedup.
pub(crate) fn collect(platform: &dyn PlatformFacts) -> Map<String, Value> {
    let mut snapshot = Map::new();

    for interface in platform.interfaces() {
        let addresses: Vec<Value> = interface
            .addresses
            .iter()
            .map(|address| address_record(address, &interface.mac))
            .collect();

        snapshot.insert(interface.name, Value::Array(addresses));
    }

    snapshot
}

fn address_record(address: &RawAddress, mac: &str) -> Value {
    let family = match address.addr {
        IpAddr::V4(_) => "IPv4",
        IpAddr::V6(_) => "IPv6",
    };

    json!({
        "address": address.addr.to_string(),
        "netmask": netmask(address.addr, address.prefix),
        "family": family,
        "mac": mac,
        "internal": address.addr.is_loopback(),
        "cidr": format!("{}/{}", address.addr, address.prefix),
    })
}

fn netmask(addr: IpAddr, prefix: u8) -> String {
    match addr {
        IpAddr::V4(_) => {
            let prefix = u32::from(prefix.min(32));
            let mask = if prefix == 0 {
                0
            } else {
                u32::MAX << (32 - prefix)
            };

            Ipv4Addr::from(mask).to_string()
        }
        IpAddr::V6(_) => {
            let prefix = u32::from(prefix.min(128));
            let mask = if prefix == 0 {
                0
            } else {
                u128::MAX << (128 - prefix)
            };

            Ipv6Addr::from(mask).to_string()
        }
    }
}
