use crate::command::domain::{
    parse_payload, AddPayload, CommandAction, CommandOutcome, ConfirmationRequired,
    DeletePayload, MutationOutput, UpdatePayload,
};
use anyhow::Result;
use dinepick_catalog::Session;
use serde_json::Value;

pub(crate) struct EditService;

impl EditService {
    pub fn add(&self, payload: Value, session: &mut Session) -> Result<CommandOutcome> {
        let payload: AddPayload = parse_payload(payload)?;
        let record = payload.into_record();
        let name = record.name.clone();
        session.add(record.clone());

        CommandOutcome::from_value(MutationOutput {
            action: CommandAction::Add,
            name,
            affected: 1,
            record: Some(record),
        })
    }

    pub fn update(&self, payload: Value, session: &mut Session) -> Result<CommandOutcome> {
        let payload: UpdatePayload = parse_payload(payload)?;
        let affected = session
            .catalog()
            .records()
            .iter()
            .filter(|r| r.name == payload.name)
            .count();
        let edited = session.edit(&payload.name, payload.changes)?;

        CommandOutcome::from_value(MutationOutput {
            action: CommandAction::Update,
            name: payload.name,
            affected,
            record: Some(edited),
        })
    }

    pub fn delete(&self, payload: Value, session: &mut Session) -> Result<CommandOutcome> {
        let payload: DeletePayload = parse_payload(payload)?;
        if !payload.confirm {
            return Err(ConfirmationRequired(payload.name).into());
        }
        let affected = session.delete(&payload.name)?;

        CommandOutcome::from_value(MutationOutput {
            action: CommandAction::Delete,
            name: payload.name,
            affected,
            record: None,
        })
    }
}
