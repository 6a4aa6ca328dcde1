use crate::command::domain::{parse_payload, CommandOutcome, ExplainPayload};
use crate::topics;
use anyhow::Result;
use apery_protocol::Explanation;
use serde_json::Value;

pub(crate) struct ExplainService;

impl ExplainService {
    pub fn run(&self, payload: Value) -> Result<CommandOutcome> {
        let payload: ExplainPayload = parse_payload(payload)?;
        let topic = topics::resolve(payload.topic.as_deref());
        CommandOutcome::from_value(Explanation {
            topic: topic.tag.to_string(),
            text: topic.text.to_string(),
        })
    }
}
