use std::env;
use local_ip_address::local_ip;

#[derive(Debug, Clone)]
pub(crate) struct Config {
    pub(crate) port: u16,
}

impl Config {
    pub(crate) fn get_api_url(&self) -> String {
        let host = match local_ip() {
            Ok(ip) => ip.to_string(),
            Err(_) => "0.0.0.0".to_string(),
        };

        format!("http://{}:{}", host, self.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: 3000,
        }
    }
}

pub(crate) fn load_config() -> Config {
    match env::var("PORT") {
        Ok(raw) => match raw.parse::<u16>() {
            Ok(port) => Config { port },
            Err(err) => {
                error!("Invalid PORT value '{}': {}", raw, err);
                Config::default()
            }
        },
        Err(_) => {
            debug!("Switch to default configuration");
            Config::default()
        }
    }
}
