use crate::catalog::Catalog;
use crate::error::StoreError;
use crate::record::Record;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

pub const DEFAULT_DATA_FILE: &str = "restaurants.json";

/// Result of [`Store::load`]: always a usable catalog, plus the error that
/// forced the empty fallback, if any.
#[derive(Debug)]
pub struct Loaded {
    pub catalog: Catalog,
    pub error: Option<StoreError>,
}

/// Flat JSON file holding the whole catalog, rewritten on every save.
#[derive(Debug, Clone)]
pub struct Store {
    path: PathBuf,
}

impl Store {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Missing file → empty catalog. Unreadable or malformed file → empty
    /// catalog plus the error.
    pub fn load(&self) -> Loaded {
        match self.try_load() {
            Ok(catalog) => Loaded {
                catalog,
                error: None,
            },
            Err(err) => {
                log::error!("Falling back to an empty catalog: {err}");
                Loaded {
                    catalog: Catalog::new(),
                    error: Some(err),
                }
            }
        }
    }

    pub fn try_load(&self) -> Result<Catalog, StoreError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                log::debug!("No catalog at {}, starting empty", self.path.display());
                return Ok(Catalog::new());
            }
            Err(source) => {
                return Err(StoreError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        let records: Vec<Record> =
            serde_json::from_slice(&bytes).map_err(|source| StoreError::Parse {
                path: self.path.clone(),
                source,
            })?;
        log::debug!(
            "Loaded {} restaurants from {}",
            records.len(),
            self.path.display()
        );
        Ok(Catalog::from_records(records))
    }

    pub fn save(&self, catalog: &Catalog) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(catalog.records())?;
        let write_err = |source| StoreError::Write {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, bytes).map_err(write_err)?;
        fs::rename(&tmp, &self.path).map_err(write_err)?;
        log::debug!(
            "Saved {} restaurants to {}",
            catalog.len(),
            self.path.display()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{CuisineType, PriceTier};
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn catalog() -> Catalog {
        Catalog::from_records(vec![
            Record::new("할매국밥", "부산사하구 다대동", "돼지국밥", "051-1", CuisineType::Korean, PriceTier::Low),
            Record::new("Trattoria", "Seoul", "Pasta", "", CuisineType::Western, PriceTier::High),
        ])
    }

    #[test]
    fn save_then_load_round_trips_in_order() {
        let dir = tempdir().unwrap();
        let store = Store::new(dir.path().join("restaurants.json"));
        store.save(&catalog()).unwrap();

        let loaded = store.load();
        assert!(loaded.error.is_none());
        assert_eq!(loaded.catalog, catalog());

        store.save(&loaded.catalog).unwrap();
        assert_eq!(store.load().catalog, catalog());
    }

    #[test]
    fn writes_indented_utf8_without_escapes() {
        let dir = tempdir().unwrap();
        let store = Store::new(dir.path().join("restaurants.json"));
        store.save(&catalog()).unwrap();

        let text = fs::read_to_string(store.path()).unwrap();
        assert!(text.starts_with("[\n  {\n    \"상호명\": \"할매국밥\""));
        assert!(text.contains("\"음식 종류\": \"한식\""));
        assert!(!dir.path().join("restaurants.json.tmp").exists());
    }

    #[test]
    fn missing_file_is_an_empty_catalog() {
        let dir = tempdir().unwrap();
        let loaded = Store::new(dir.path().join("absent.json")).load();
        assert!(loaded.catalog.is_empty());
        assert!(loaded.error.is_none());
    }

    #[test]
    fn malformed_file_falls_back_to_empty_with_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("restaurants.json");
        fs::write(&path, "{ not json").unwrap();

        let loaded = Store::new(&path).load();
        assert!(loaded.catalog.is_empty());
        assert!(matches!(loaded.error, Some(StoreError::Parse { .. })));
    }

    #[test]
    fn save_creates_missing_parent_dirs() {
        let dir = tempdir().unwrap();
        let store = Store::new(dir.path().join("nested/data/restaurants.json"));
        store.save(&Catalog::new()).unwrap();
        assert_eq!(fs::read_to_string(store.path()).unwrap(), "[]");
    }

    #[test]
    fn save_failure_is_reported() {
        let dir = tempdir().unwrap();
        // A directory in the way of the target file.
        let path = dir.path().join("taken");
        fs::create_dir_all(path.join("restaurants.json.tmp")).unwrap();
        let store = Store::new(path.join("restaurants.json"));
        assert!(matches!(store.save(&catalog()), Err(StoreError::Write { .. })));
    }
}
