use anyhow::Result;
pub use dinepick_catalog::ImportReport;
use dinepick_catalog::{
    CatalogError, ConfigError, CuisineType, Filter, ImportError, Notice, PriceTier,
    Recommendation, Record, RecordPatch,
};
use dinepick_protocol::{ErrorEnvelope, Hint, HintKind, NextAction};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{json, Value};
use std::path::PathBuf;

pub const NO_MATCH_MESSAGE: &str =
    "추천할 식당이 없습니다. 필터를 조정하거나 새로운 식당을 등록해주세요.";
pub const EMPTY_LIST_MESSAGE: &str = "조건에 맞는 식당이 없습니다.";

#[derive(Debug, Deserialize)]
pub struct CommandRequest {
    pub action: CommandAction,
    #[serde(default = "empty_payload")]
    pub payload: Value,
}

fn empty_payload() -> Value {
    Value::Object(Default::default())
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CommandAction {
    Recommend,
    List,
    Add,
    Update,
    Delete,
    Import,
    Links,
}

impl CommandAction {
    pub const fn as_str(self) -> &'static str {
        match self {
            CommandAction::Recommend => "recommend",
            CommandAction::List => "list",
            CommandAction::Add => "add",
            CommandAction::Update => "update",
            CommandAction::Delete => "delete",
            CommandAction::Import => "import",
            CommandAction::Links => "links",
        }
    }

    pub const fn is_mutation(self) -> bool {
        matches!(
            self,
            CommandAction::Add | CommandAction::Update | CommandAction::Delete | CommandAction::Import
        )
    }
}

#[derive(Debug, Serialize)]
pub struct CommandResponse {
    pub status: CommandStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorEnvelope>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hints: Vec<Hint>,
    #[serde(default)]
    pub data: Value,
    #[serde(default)]
    pub meta: ResponseMeta,
}

impl CommandResponse {
    pub fn is_error(&self) -> bool {
        matches!(self.status, CommandStatus::Error)
    }

    pub fn error(err: &anyhow::Error, action: Option<CommandAction>, meta: ResponseMeta) -> Self {
        let message = format!("{err:#}");
        let classification = classify_error(err, action);
        let hint = classification
            .hint
            .clone()
            .or_else(|| classification.hints.first().map(|h| h.text.clone()));
        CommandResponse {
            status: CommandStatus::Error,
            message: Some(message.clone()),
            error: Some(ErrorEnvelope {
                code: classification.code,
                message,
                details: classification.details,
                hint,
                next_actions: classification.next_actions,
            }),
            hints: classification.hints,
            data: Value::Null,
            meta,
        }
    }
}

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CommandStatus {
    Ok,
    Error,
}

#[derive(Debug, Serialize, Default, Clone)]
pub struct ResponseMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_version: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catalog_size: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub persisted: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
}

pub struct CommandOutcome {
    pub data: Value,
    pub hints: Vec<Hint>,
}

impl CommandOutcome {
    pub fn from_value<T: Serialize>(value: T) -> Result<Self> {
        Ok(Self {
            data: serde_json::to_value(value)?,
            hints: Vec::new(),
        })
    }

    #[must_use]
    pub fn with_hint(mut self, kind: HintKind, text: impl Into<String>) -> Self {
        self.hints.push(Hint::new(kind, text));
        self
    }
}

pub fn parse_payload<T: DeserializeOwned>(payload: Value) -> Result<T> {
    serde_json::from_value(payload).map_err(|err| anyhow::anyhow!("Invalid payload: {err}"))
}

pub fn notice_hint(notice: &Notice) -> Hint {
    Hint::new(HintKind::Warn, notice.message())
}

#[derive(Debug, Deserialize, Serialize, Default)]
pub struct FilterPayload {
    #[serde(default)]
    pub cuisines: Vec<CuisineType>,
    #[serde(default)]
    pub prices: Vec<PriceTier>,
}

impl FilterPayload {
    pub fn to_filter(&self) -> Filter {
        Filter::new(self.cuisines.iter().copied(), self.prices.iter().copied())
    }
}

#[derive(Debug, Deserialize, Serialize, Default)]
pub struct RecommendPayload {
    #[serde(flatten)]
    pub filter: FilterPayload,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RecommendOutput {
    pub matched: bool,
    pub candidates: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pick: Option<Recommendation>,
}

#[derive(Debug, Deserialize, Serialize, Default)]
pub struct ListPayload {
    #[serde(default)]
    pub query: String,
    #[serde(flatten)]
    pub filter: FilterPayload,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ListOutput {
    pub total: usize,
    pub shown: usize,
    pub records: Vec<Record>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct AddPayload {
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub menu: String,
    #[serde(default)]
    pub contact: String,
    #[serde(default)]
    pub cuisine: CuisineType,
    #[serde(default)]
    pub price: PriceTier,
}

impl AddPayload {
    pub fn into_record(self) -> Record {
        Record::new(
            self.name,
            self.address,
            self.menu,
            self.contact,
            self.cuisine,
            self.price,
        )
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct UpdatePayload {
    pub name: String,
    #[serde(default)]
    pub changes: RecordPatch,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct DeletePayload {
    pub name: String,
    #[serde(default)]
    pub confirm: bool,
}

#[derive(Debug, Deserialize, Serialize, Default)]
pub struct ImportPayload {
    /// File to read raw bytes from.
    #[serde(default)]
    pub path: Option<PathBuf>,
    /// Inline upload text, used when no path is given.
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct LinksPayload {
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MutationOutput {
    pub action: CommandAction,
    pub name: String,
    pub affected: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record: Option<Record>,
}

/// Marker error for destructive actions issued without confirmation.
#[derive(Debug)]
pub struct ConfirmationRequired(pub String);

impl std::fmt::Display for ConfirmationRequired {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Deleting {} requires confirmation", self.0)
    }
}

impl std::error::Error for ConfirmationRequired {}

#[derive(Debug, Clone)]
pub struct ErrorClassification {
    pub code: String,
    pub hint: Option<String>,
    pub hints: Vec<Hint>,
    pub details: Option<Value>,
    pub next_actions: Vec<NextAction>,
}

pub fn classify_error(err: &anyhow::Error, action: Option<CommandAction>) -> ErrorClassification {
    let mut classification = ErrorClassification {
        code: "internal".to_string(),
        hint: None,
        hints: Vec::new(),
        details: None,
        next_actions: Vec::new(),
    };

    if let Some(ConfirmationRequired(name)) = err.downcast_ref::<ConfirmationRequired>() {
        classification.code = "confirmation_required".to_string();
        classification.hint =
            Some("Repeat the delete with confirm=true (CLI: --yes).".to_string());
        classification.next_actions.push(NextAction {
            action: CommandAction::Delete.as_str().to_string(),
            args: json!({ "name": name, "confirm": true }),
            reason: "Confirm the destructive delete.".to_string(),
        });
        return classification;
    }

    let import = err.downcast_ref::<ImportError>().or_else(|| {
        match err.downcast_ref::<CatalogError>() {
            Some(CatalogError::Import(inner)) => Some(inner),
            _ => None,
        }
    });
    if let Some(import) = import {
        match import {
            ImportError::MissingColumns(missing) => {
                classification.code = "missing_columns".to_string();
                classification.details = Some(json!({ "missing": missing }));
                classification.hints.push(Hint::new(
                    HintKind::Action,
                    format!(
                        "업로드된 파일에 필요한 모든 컬럼이 포함되어 있지 않습니다. 필요한 컬럼: {}",
                        dinepick_catalog::REQUIRED_FIELDS.join(", ")
                    ),
                ));
            }
            _ => {
                classification.code = "invalid_upload".to_string();
                classification.hints.push(Hint::new(
                    HintKind::Warn,
                    "Upload must be UTF-8 JSON: a list of objects with the six restaurant keys.",
                ));
            }
        }
        return classification;
    }

    match err.downcast_ref::<CatalogError>() {
        Some(CatalogError::NotFound(name)) => {
            classification.code = "not_found".to_string();
            classification.hint = Some(format!("No restaurant named {name}."));
            classification.next_actions.push(NextAction {
                action: CommandAction::List.as_str().to_string(),
                args: json!({ "query": name }),
                reason: "Look up the exact name (matching is case-sensitive).".to_string(),
            });
            return classification;
        }
        Some(CatalogError::Config(_)) => {
            classification.code = "config_error".to_string();
            return classification;
        }
        Some(CatalogError::InvalidLabel { .. }) => {
            classification.code = "invalid_request".to_string();
            return classification;
        }
        _ => {}
    }

    if err.downcast_ref::<ConfigError>().is_some() {
        classification.code = "config_error".to_string();
        classification.hints.push(Hint::new(
            HintKind::Warn,
            "Check dinepick.toml: only data_file and [links] are recognised.",
        ));
        return classification;
    }

    if err.to_string().starts_with("Invalid payload") {
        classification.code = "invalid_request".to_string();
        if let Some(action) = action {
            classification.hint = Some(format!(
                "Check the payload fields for action={}.",
                action.as_str()
            ));
        }
    }

    classification
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_missing_columns_with_details() {
        let err = anyhow::Error::from(CatalogError::Import(ImportError::MissingColumns(vec![
            "연락처".to_string(),
        ])));
        let classification = classify_error(&err, Some(CommandAction::Import));
        assert_eq!(classification.code, "missing_columns");
        assert_eq!(classification.details, Some(json!({ "missing": ["연락처"] })));
    }

    #[test]
    fn classifies_confirmation_and_not_found() {
        let err = anyhow::Error::new(ConfirmationRequired("A".into()));
        let classification = classify_error(&err, Some(CommandAction::Delete));
        assert_eq!(classification.code, "confirmation_required");
        assert_eq!(classification.next_actions[0].args["confirm"], true);

        let err = anyhow::Error::from(CatalogError::NotFound("B".into()));
        assert_eq!(classify_error(&err, None).code, "not_found");
    }

    #[test]
    fn classifies_bad_payloads() {
        let err = parse_payload::<LinksPayload>(json!({})).unwrap_err();
        let classification = classify_error(&err, Some(CommandAction::Links));
        assert_eq!(classification.code, "invalid_request");
        assert!(classification.hint.unwrap().contains("links"));
    }

    #[test]
    fn request_defaults_to_empty_payload() {
        let request: CommandRequest = serde_json::from_str(r#"{"action":"recommend"}"#).unwrap();
        assert_eq!(request.action, CommandAction::Recommend);
        let payload: RecommendPayload = parse_payload(request.payload).unwrap();
        assert!(payload.filter.to_filter().is_empty());
    }

    #[test]
    fn filter_payload_reads_korean_labels() {
        let payload: ListPayload =
            parse_payload(json!({"query": "국밥", "cuisines": ["한식"], "prices": ["저렴", "보통"]}))
                .unwrap();
        let filter = payload.filter.to_filter();
        assert_eq!(payload.query, "국밥");
        assert!(filter.cuisines.contains(&CuisineType::Korean));
        assert_eq!(filter.prices.len(), 2);
    }
}
