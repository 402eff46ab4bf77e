use std::sync::Arc;
use clap::Command;

#[macro_use]
extern crate log;
extern crate env_logger;

mod facts {
  pub(crate) mod provider;
  pub(crate) mod system;
  pub(crate) mod environment;
  pub(crate) mod process;
  pub(crate) mod network;
  pub(crate) mod orchestration;
}

mod api {
  pub(crate) mod server;
  pub(crate) mod action {
    pub(crate) mod root;
    pub(crate) mod system;
    pub(crate) mod env;
    pub(crate) mod process;
    pub(crate) mod network;
    pub(crate) mod health;
    pub(crate) mod pod;
    pub(crate) mod k8s;
  }
}

mod config;

use crate::facts::provider::HostPlatform;

#[tokio::main]
async fn main() {
    env_logger::init();

    let app = Command::new("mirador")
        .version("0.1.0")
        .about("Runtime environment diagnostics endpoint");

    let _matches = app.get_matches();

    let configuration = config::load_config();
    let platform = Arc::new(HostPlatform::new());

    api::server::start(platform, configuration).await;
}
