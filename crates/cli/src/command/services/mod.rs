mod analyze;
mod capabilities;
mod explain;

use crate::command::domain::{CommandAction, CommandOutcome};
use crate::config::AppConfig;
use anyhow::Result;
use serde_json::Value;

pub struct Services {
    analysis: analyze::AnalysisService,
    capabilities: capabilities::CapabilitiesService,
    explain: explain::ExplainService,
}

impl Services {
    pub fn new(config: AppConfig) -> Self {
        Self {
            analysis: analyze::AnalysisService::new(config),
            capabilities: capabilities::CapabilitiesService::new(config),
            explain: explain::ExplainService,
        }
    }

    pub async fn route(&self, action: CommandAction, payload: Value) -> Result<CommandOutcome> {
        match action {
            CommandAction::Analyze => self.analysis.analyze(payload).await,
            CommandAction::AperySet => self.analysis.apery_set(payload).await,
            CommandAction::Graph => self.analysis.graph(payload).await,
            CommandAction::Explain => self.explain.run(payload),
            CommandAction::Capabilities => self.capabilities.run(),
        }
    }
}
