use crate::command::domain::{parse_payload, CommandOutcome, ImportPayload};
use anyhow::{Context, Result};
use dinepick_catalog::Session;
use dinepick_protocol::HintKind;
use serde_json::Value;
use std::fs;

pub(crate) struct ImportService;

impl ImportService {
    pub fn run(&self, payload: Value, session: &mut Session) -> Result<CommandOutcome> {
        let payload: ImportPayload = parse_payload(payload)?;
        let bytes = match (&payload.path, payload.content) {
            (Some(path), _) => fs::read(path)
                .with_context(|| format!("Failed to read upload {}", path.display()))?,
            (None, Some(content)) => content.into_bytes(),
            (None, None) => anyhow::bail!("Invalid payload: import needs `path` or `content`"),
        };

        let report = session.import(&bytes)?;
        let replaced = report.replaced;
        let outcome = CommandOutcome::from_value(report)?.with_hint(
            HintKind::Info,
            "파일이 성공적으로 업로드되고 기존 데이터와 병합되었습니다!",
        );
        if replaced > 0 {
            return Ok(outcome.with_hint(
                HintKind::Info,
                format!("{replaced} existing restaurant(s) replaced by uploaded rows"),
            ));
        }
        Ok(outcome)
    }
}
