pub mod domain;
mod services;

pub use domain::{
    error_envelope, CommandAction, CommandRequest, CommandResponse, CommandStatus, ResponseMeta,
};

use crate::config::AppConfig;
use services::Services;
use std::time::Instant;

pub struct CommandHandler {
    services: Services,
}

impl CommandHandler {
    pub fn new(config: AppConfig) -> Self {
        Self {
            services: Services::new(config),
        }
    }

    pub async fn execute(&self, request: CommandRequest) -> CommandResponse {
        let started = Instant::now();
        let CommandRequest { action, payload } = request;
        log::debug!("Command {}", action.as_str());

        match self.services.route(action, payload).await {
            Ok(outcome) => {
                let mut meta = outcome.meta;
                meta.duration_ms = Some(started.elapsed().as_millis() as u64);
                CommandResponse {
                    status: CommandStatus::Ok,
                    message: None,
                    error: None,
                    data: outcome.data,
                    meta,
                }
            }
            Err(err) => {
                let duration_ms = started.elapsed().as_millis() as u64;
                error_response(&err, duration_ms)
            }
        }
    }
}

pub(crate) fn error_response(err: &anyhow::Error, duration_ms: u64) -> CommandResponse {
    let error = error_envelope(err);
    log::debug!("Command failed ({}): {}", error.code, error.message);
    CommandResponse {
        status: CommandStatus::Error,
        message: Some(error.message.clone()),
        error: Some(error),
        data: serde_json::Value::Null,
        meta: ResponseMeta {
            duration_ms: Some(duration_ms),
            ..Default::default()
        },
    }
}

pub async fn execute(request: CommandRequest, config: AppConfig) -> CommandResponse {
    CommandHandler::new(config).execute(request).await
}
