mod browse;
mod edit;
mod import;

use crate::command::domain::{CommandAction, CommandOutcome};
use anyhow::Result;
use dinepick_catalog::Session;
use serde_json::Value;

pub struct Services {
    browse: browse::BrowseService,
    edit: edit::EditService,
    import: import::ImportService,
}

impl Services {
    pub fn new() -> Self {
        Self {
            browse: browse::BrowseService,
            edit: edit::EditService,
            import: import::ImportService,
        }
    }

    pub fn route(
        &self,
        action: CommandAction,
        payload: Value,
        session: &mut Session,
    ) -> Result<CommandOutcome> {
        match action {
            CommandAction::Recommend => self.browse.recommend(payload, session),
            CommandAction::List => self.browse.list(payload, session),
            CommandAction::Links => self.browse.links(payload, session),
            CommandAction::Add => self.edit.add(payload, session),
            CommandAction::Update => self.edit.update(payload, session),
            CommandAction::Delete => self.edit.delete(payload, session),
            CommandAction::Import => self.import.run(payload, session),
        }
    }
}
