use serde_json::{Map, Value};

use crate::facts::provider::PlatformFacts;

/// Variables exposed on /env, in response order. Anything outside this
/// list never leaves the process, whatever else is set.
pub(crate) const ENV_ALLOW_LIST: [&str; 22] = [
    "HOSTNAME",
    "KUBERNETES_SERVICE_HOST",
    "KUBERNETES_SERVICE_PORT",
    "KUBERNETES_PORT",
    "KUBERNETES_PORT_443_TCP",
    "KUBERNETES_PORT_443_TCP_ADDR",
    "KUBERNETES_PORT_443_TCP_PORT",
    "KUBERNETES_PORT_443_TCP_PROTO",
    "KUBERNETES_SERVICE_PORT_HTTPS",
    "POD_NAME",
    "POD_NAMESPACE",
    "POD_IP",
    "NODE_NAME",
    "SERVICE_NAME",
    "SERVICE_PORT",
    "SERVICE_HOST",
    "PORT",
    "NODE_ENV",
    "PATH",
    "HOME",
    "USER",
    "PWD",
];

/// Unset or empty variables are omitted, not serialized as null.
pub(crate) fn collect(platform: &dyn PlatformFacts) -> Map<String, Value> {
    let env = platform.env_vars();
    let mut snapshot = Map::new();

    for name in ENV_ALLOW_LIST {
        let value = env
            .iter()
            .find(|(candidate, _)| candidate == name)
            .map(|(_, value)| value.as_str())
            .unwrap_or("");

        if !value.is_empty() {
            snapshot.insert(name.to_string(), Value::String(value.to_string()));
        }
    }

    snapshot
}
