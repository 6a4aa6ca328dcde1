use crate::command::domain::{CommandAction, CommandOutcome};
use crate::config::AppConfig;
use anyhow::Result;
use apery_protocol::{Capabilities, CapabilitiesServer, Limits, CAPABILITIES_SCHEMA_VERSION};

pub(crate) struct CapabilitiesService {
    config: AppConfig,
}

impl CapabilitiesService {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn run(&self) -> Result<CommandOutcome> {
        let output = Capabilities {
            schema_version: CAPABILITIES_SCHEMA_VERSION,
            server: CapabilitiesServer {
                name: "apery-cli".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            actions: CommandAction::ALL
                .iter()
                .map(|action| action.as_str().to_string())
                .collect(),
            limits: Limits {
                closure_bound: self.config.analysis.closure_bound,
                max_modulus: self.config.max_modulus,
            },
        };

        CommandOutcome::from_value(output)
    }
}
