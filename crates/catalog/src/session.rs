use crate::catalog::{Catalog, Filter, MergeStats};
use crate::config::Config;
use crate::error::{CatalogError, Result};
use crate::import::{parse_upload, UploadedRow};
use crate::links::LinkConfig;
use crate::recommend::{recommend, Recommendation};
use crate::record::{Record, RecordPatch};
use crate::store::Store;
use serde::{Deserialize, Serialize};

/// Non-fatal, user-visible message produced while serving a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "message", rename_all = "snake_case")]
pub enum Notice {
    /// The catalog file could not be read; the session started empty.
    LoadFailed(String),
    /// The catalog file could not be written; the change lives only in memory.
    SaveFailed(String),
}

impl Notice {
    pub fn message(&self) -> &str {
        match self {
            Notice::LoadFailed(msg) | Notice::SaveFailed(msg) => msg,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportReport {
    /// Uploaded rows as they appeared in the file, before merging.
    pub preview: Vec<UploadedRow>,
    pub uploaded: usize,
    pub replaced: usize,
    pub dropped_unnamed: usize,
    pub total: usize,
}

impl ImportReport {
    fn new(preview: Vec<UploadedRow>, stats: MergeStats) -> Self {
        Self {
            preview,
            uploaded: stats.uploaded,
            replaced: stats.replaced,
            dropped_unnamed: stats.dropped_unnamed,
            total: stats.total,
        }
    }
}

/// One catalog plus the store it came from. Every mutation is followed by a
/// full save; a failed save is reported but the in-memory change is kept.
#[derive(Debug)]
pub struct Session {
    store: Store,
    links: LinkConfig,
    catalog: Catalog,
    notices: Vec<Notice>,
}

impl Session {
    pub fn open(config: &Config) -> Self {
        Self::with_store(config.store(), config.links.clone())
    }

    pub fn with_store(store: Store, links: LinkConfig) -> Self {
        let loaded = store.load();
        let notices = loaded
            .error
            .map(|err| Notice::LoadFailed(format!("Failed to load restaurants: {err}")))
            .into_iter()
            .collect();
        Self {
            store,
            links,
            catalog: loaded.catalog,
            notices,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn links(&self) -> &LinkConfig {
        &self.links
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    pub fn recommend(&self, filter: &Filter) -> Option<Recommendation> {
        recommend(&self.catalog, filter, &self.links, &mut rand::rng())
    }

    pub fn list(&self, query: &str, filter: &Filter) -> Vec<&Record> {
        self.catalog.query(query, filter)
    }

    pub fn links_for(&self, name: &str) -> Result<Recommendation> {
        self.catalog
            .find(name)
            .map(|record| Recommendation::for_record(record, &self.links))
            .ok_or_else(|| CatalogError::NotFound(name.to_string()))
    }

    pub fn add(&mut self, record: Record) {
        log::info!("Adding restaurant {}", record.name);
        self.catalog.add(record);
        self.persist();
    }

    /// Replaces every row named `name`. Saves only if something changed.
    pub fn update(&mut self, name: &str, record: &Record) -> usize {
        let replaced = self.catalog.update(name, record);
        if replaced > 0 {
            log::info!("Updated {replaced} row(s) named {name}");
            self.persist();
        }
        replaced
    }

    /// Edit-form flow: start from the first row named `name`, overlay `patch`,
    /// write the result over every row with that name.
    pub fn edit(&mut self, name: &str, patch: RecordPatch) -> Result<Record> {
        let base = self
            .catalog
            .find(name)
            .ok_or_else(|| CatalogError::NotFound(name.to_string()))?;
        let edited = patch.apply(base);
        self.update(name, &edited);
        Ok(edited)
    }

    pub fn delete(&mut self, name: &str) -> Result<usize> {
        let removed = self.catalog.delete(name);
        if removed == 0 {
            return Err(CatalogError::NotFound(name.to_string()));
        }
        log::info!("Deleted {removed} row(s) named {name}");
        self.persist();
        Ok(removed)
    }

    pub fn import(&mut self, bytes: &[u8]) -> Result<ImportReport> {
        let upload = parse_upload(bytes)?;
        let preview = upload.rows.clone();
        let stats = self.catalog.merge(upload.into_merge_entries());
        log::info!(
            "Imported {} row(s): {} replaced, {} unnamed dropped, {} total",
            stats.uploaded,
            stats.replaced,
            stats.dropped_unnamed,
            stats.total
        );
        self.persist();
        Ok(ImportReport::new(preview, stats))
    }

    fn persist(&mut self) {
        if let Err(err) = self.store.save(&self.catalog) {
            log::error!("Catalog kept in memory only: {err}");
            self.notices
                .push(Notice::SaveFailed(format!("Failed to save restaurants: {err}")));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ImportError;
    use crate::record::{CuisineType, PriceTier};
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::tempdir;

    fn record(name: &str, menu: &str) -> Record {
        Record::new(name, "부산사하구 괴정동", menu, "051", CuisineType::Korean, PriceTier::Medium)
    }

    fn session_in(dir: &std::path::Path) -> Session {
        Session::with_store(
            Store::new(dir.join("restaurants.json")),
            LinkConfig::default(),
        )
    }

    #[test]
    fn mutations_are_persisted() {
        let dir = tempdir().unwrap();
        let mut session = session_in(dir.path());
        session.add(record("A", "1"));
        session.add(record("B", "2"));
        session.edit("A", RecordPatch { menu: Some("3".into()), ..Default::default() }).unwrap();
        session.delete("B").unwrap();

        let reopened = session_in(dir.path());
        assert_eq!(reopened.catalog().records(), &[record("A", "3")]);
        assert!(reopened.notices().is_empty());
    }

    #[test]
    fn unknown_names_are_reported() {
        let dir = tempdir().unwrap();
        let mut session = session_in(dir.path());
        assert!(matches!(session.delete("ghost"), Err(CatalogError::NotFound(_))));
        assert!(matches!(
            session.edit("ghost", RecordPatch::default()),
            Err(CatalogError::NotFound(_))
        ));
        assert!(matches!(session.links_for("ghost"), Err(CatalogError::NotFound(_))));
        assert_eq!(session.update("ghost", &record("ghost", "x")), 0);
        assert!(!dir.path().join("restaurants.json").exists());
    }

    #[test]
    fn load_failure_becomes_a_notice() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("restaurants.json"), "not json").unwrap();
        let mut session = session_in(dir.path());
        assert!(session.catalog().is_empty());
        let notices = session.take_notices();
        assert!(matches!(notices.as_slice(), [Notice::LoadFailed(_)]));
        assert!(session.notices().is_empty());
    }

    #[test]
    fn save_failure_keeps_the_change_in_memory() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("restaurants.json.tmp")).unwrap();
        let mut session = session_in(dir.path());
        session.add(record("A", "1"));
        assert_eq!(session.catalog().len(), 1);
        assert!(matches!(session.notices(), [Notice::SaveFailed(_)]));
    }

    #[test]
    fn import_merges_keep_last_and_reports_preview() {
        let dir = tempdir().unwrap();
        let mut session = session_in(dir.path());
        session.add(record("X", "A"));
        let upload = r#"[
            {"상호명": "X", "주소": "b", "대표메뉴": "B", "연락처": "", "음식 종류": "중식", "가격대": "저렴"},
            {"상호명": "X", "주소": "c", "대표메뉴": "C", "연락처": "", "음식 종류": "일식", "가격대": "고급"}
        ]"#;
        let report = session.import(upload.as_bytes()).unwrap();
        assert_eq!(report.preview.len(), 2);
        assert_eq!(report.replaced, 1);
        assert_eq!(report.total, 1);

        let reopened = session_in(dir.path());
        let x = reopened.catalog().find("X").unwrap();
        assert_eq!(x.menu, "C");
        assert_eq!(x.cuisine, CuisineType::Japanese);
        assert_eq!(reopened.catalog().len(), 1);
    }

    #[test]
    fn schema_gate_leaves_catalog_and_file_untouched() {
        let dir = tempdir().unwrap();
        let mut session = session_in(dir.path());
        session.add(record("X", "A"));
        let before = fs::read(dir.path().join("restaurants.json")).unwrap();

        let upload = r#"[{"상호명": "Y", "주소": "b", "대표메뉴": "B", "음식 종류": "중식", "가격대": "저렴"}]"#;
        let err = session.import(upload.as_bytes()).unwrap_err();
        assert!(matches!(err, CatalogError::Import(ImportError::MissingColumns(_))));
        assert_eq!(session.catalog().records(), &[record("X", "A")]);
        assert_eq!(fs::read(dir.path().join("restaurants.json")).unwrap(), before);
    }

    #[test]
    fn recommend_respects_filter() {
        let dir = tempdir().unwrap();
        let mut session = session_in(dir.path());
        session.add(record("A", "1"));
        assert!(session.recommend(&Filter::new([CuisineType::Western], [])).is_none());
        let pick = session.recommend(&Filter::new([CuisineType::Korean], [])).unwrap();
        assert_eq!(pick.record.name, "A");
        assert_eq!(pick.search_url, session.links().search_url("A", "부산사하구 괴정동"));
    }
}
