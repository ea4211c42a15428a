pub mod domain;
mod services;

pub use domain::{
    AddPayload, CommandAction, CommandRequest, CommandResponse, DeletePayload, FilterPayload,
    ImportPayload, ImportReport, LinksPayload, ListOutput, ListPayload, MutationOutput,
    RecommendOutput, RecommendPayload, UpdatePayload,
};

use dinepick_catalog::{Config, Notice, Session};
use dinepick_protocol::COMMAND_API_VERSION;
use domain::{notice_hint, CommandOutcome, CommandStatus, ResponseMeta};
use services::Services;
use std::time::Instant;

/// Serves one request against a fresh session: load, run, persist, report.
pub struct CommandHandler {
    config: Config,
    services: Services,
}

impl CommandHandler {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            services: Services::new(),
        }
    }

    pub fn execute(&self, request: CommandRequest) -> CommandResponse {
        let started = Instant::now();
        let CommandRequest { action, payload } = request;
        log::debug!("command: action={}", action.as_str());

        let mut session = Session::open(&self.config);
        let outcome: anyhow::Result<CommandOutcome> =
            self.services.route(action, payload, &mut session);

        let notices = session.take_notices();
        let save_failed = notices.iter().any(|n| matches!(n, Notice::SaveFailed(_)));
        let mut meta = ResponseMeta {
            api_version: Some(COMMAND_API_VERSION),
            data_file: Some(self.config.data_file.display().to_string()),
            catalog_size: Some(session.catalog().len()),
            persisted: None,
            duration_ms: None,
        };

        let mut response = match outcome {
            Ok(outcome) => {
                if action.is_mutation() {
                    meta.persisted = Some(!save_failed);
                }
                CommandResponse {
                    status: CommandStatus::Ok,
                    message: None,
                    error: None,
                    hints: outcome.hints,
                    data: outcome.data,
                    meta,
                }
            }
            Err(err) => {
                log::debug!("command {} failed: {err:#}", action.as_str());
                CommandResponse::error(&err, Some(action), meta)
            }
        };

        response.hints.extend(notices.iter().map(notice_hint));
        response.meta.duration_ms = Some(started.elapsed().as_millis() as u64);
        response
    }
}

pub fn execute(request: CommandRequest, config: Config) -> CommandResponse {
    CommandHandler::new(config).execute(request)
}
