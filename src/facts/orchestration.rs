use serde::Serialize;
use serde_json::{Map, Value};

use crate::facts::provider::PlatformFacts;

/// Sentinel substituted for any identity field the scheduler did not
/// inject.
pub(crate) const UNAVAILABLE: &str = "No disponible";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PodInfo {
    pub(crate) hostname: String,
    pub(crate) pod_name: String,
    pub(crate) pod_namespace: String,
    pub(crate) pod_ip: String,
    pub(crate) node_name: String,
    pub(crate) service_name: String,
}

/// Each field falls back to the sentinel independently.
pub(crate) fn pod_info(platform: &dyn PlatformFacts) -> PodInfo {
    let env = platform.env_vars();

    let lookup = |name: &str| -> String {
        env.iter()
            .find(|(candidate, _)| candidate == name)
            .map(|(_, value)| value.as_str())
            .filter(|value| !value.is_empty())
            .unwrap_or(UNAVAILABLE)
            .to_string()
    };

    let hostname = platform.hostname();

    PodInfo {
        hostname: if hostname.is_empty() {
            UNAVAILABLE.to_string()
        } else {
            hostname
        },
        pod_name: lookup("POD_NAME"),
        pod_namespace: lookup("POD_NAMESPACE"),
        pod_ip: lookup("POD_IP"),
        node_name: lookup("NODE_NAME"),
        service_name: lookup("SERVICE_NAME"),
    }
}

/// Scans the whole environment, unlike the /env allow-list. The two
/// filters are intentionally different and must stay that way.
pub(crate) fn kubernetes_info(platform: &dyn PlatformFacts) -> Map<String, Value> {
    let mut variables = Map::new();

    for (name, value) in platform.env_vars() {
        if matches_scan(&name) {
            variables.insert(name, Value::String(value));
        }
    }

    variables
}

fn matches_scan(name: &str) -> bool {
    name.starts_with("KUBERNETES_") || name.contains("SERVICE_") || name.contains("POD_")
}
