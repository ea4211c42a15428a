use crate::command::domain::{
    parse_payload, CommandOutcome, LinksPayload, ListOutput, ListPayload, RecommendOutput,
    RecommendPayload, EMPTY_LIST_MESSAGE, NO_MATCH_MESSAGE,
};
use anyhow::Result;
use dinepick_catalog::Session;
use dinepick_protocol::HintKind;
use serde_json::Value;

pub(crate) struct BrowseService;

impl BrowseService {
    pub fn recommend(&self, payload: Value, session: &mut Session) -> Result<CommandOutcome> {
        let payload: RecommendPayload = parse_payload(payload)?;
        let filter = payload.filter.to_filter();
        let candidates = session.catalog().filter(&filter).len();
        let pick = session.recommend(&filter);

        let output = RecommendOutput {
            matched: pick.is_some(),
            candidates,
            pick,
        };
        let outcome = CommandOutcome::from_value(output)?;
        if candidates == 0 {
            return Ok(outcome.with_hint(HintKind::Warn, NO_MATCH_MESSAGE));
        }
        Ok(outcome)
    }

    pub fn list(&self, payload: Value, session: &mut Session) -> Result<CommandOutcome> {
        let payload: ListPayload = parse_payload(payload)?;
        let filter = payload.filter.to_filter();
        let records: Vec<_> = session
            .list(&payload.query, &filter)
            .into_iter()
            .cloned()
            .collect();

        let output = ListOutput {
            total: session.catalog().len(),
            shown: records.len(),
            records,
        };
        let empty = output.shown == 0;
        let outcome = CommandOutcome::from_value(output)?;
        if empty {
            return Ok(outcome.with_hint(HintKind::Info, EMPTY_LIST_MESSAGE));
        }
        Ok(outcome)
    }

    pub fn links(&self, payload: Value, session: &mut Session) -> Result<CommandOutcome> {
        let payload: LinksPayload = parse_payload(payload)?;
        let links = session.links_for(&payload.name)?;
        CommandOutcome::from_value(links)
    }
}
