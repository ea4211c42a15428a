use crate::error::ImportError;
use crate::record::{CuisineType, PriceTier, Record, REQUIRED_FIELDS};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;

/// One uploaded row before merging. The name may be missing; such rows are
/// discarded by the merge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedRow {
    #[serde(rename = "상호명", default)]
    pub name: Option<String>,
    #[serde(rename = "주소")]
    pub address: String,
    #[serde(rename = "대표메뉴")]
    pub menu: String,
    #[serde(rename = "연락처")]
    pub contact: String,
    #[serde(rename = "음식 종류")]
    pub cuisine: CuisineType,
    #[serde(rename = "가격대")]
    pub price: PriceTier,
}

impl UploadedRow {
    pub fn into_merge_entry(self) -> (Option<String>, Record) {
        let record = Record {
            name: self.name.clone().unwrap_or_default(),
            address: self.address,
            menu: self.menu,
            contact: self.contact,
            cuisine: self.cuisine,
            price: self.price,
        };
        (self.name, record)
    }
}

/// A parsed and schema-checked upload, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Upload {
    pub rows: Vec<UploadedRow>,
}

impl Upload {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn into_merge_entries(self) -> Vec<(Option<String>, Record)> {
        self.rows
            .into_iter()
            .map(UploadedRow::into_merge_entry)
            .collect()
    }
}

/// Decodes raw upload bytes. Any failure leaves the caller's catalog untouched
/// because nothing is merged until the whole upload parses.
pub fn parse_upload(bytes: &[u8]) -> Result<Upload, ImportError> {
    let text = std::str::from_utf8(bytes)?;
    let value: Value = serde_json::from_str(text)?;
    let Value::Array(items) = value else {
        return Err(ImportError::NotAList);
    };

    let mut columns: BTreeSet<&str> = BTreeSet::new();
    for item in &items {
        let Value::Object(map) = item else {
            return Err(ImportError::NotAList);
        };
        columns.extend(map.keys().map(String::as_str));
    }

    let missing: Vec<String> = REQUIRED_FIELDS
        .iter()
        .filter(|field| !columns.contains(*field))
        .map(|field| (*field).to_string())
        .collect();
    if !missing.is_empty() {
        return Err(ImportError::MissingColumns(missing));
    }

    let rows = items
        .into_iter()
        .enumerate()
        .map(|(idx, item)| {
            serde_json::from_value::<UploadedRow>(item).map_err(|err| ImportError::InvalidRow {
                row: idx + 1,
                message: err.to_string(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Upload { rows })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_rows_and_ignores_extra_keys() {
        let raw = r#"[
            {"상호명": "A", "주소": "a", "대표메뉴": "m", "연락처": "1", "음식 종류": "중식", "가격대": "고급", "평점": 5},
            {"상호명": null, "주소": "b", "대표메뉴": "m", "연락처": "2", "음식 종류": "기타", "가격대": "저렴"}
        ]"#;
        let upload = parse_upload(raw.as_bytes()).unwrap();
        assert_eq!(upload.len(), 2);
        assert_eq!(upload.rows[0].name.as_deref(), Some("A"));
        assert_eq!(upload.rows[0].cuisine, CuisineType::Chinese);
        assert_eq!(upload.rows[1].name, None);
    }

    #[test]
    fn missing_contact_column_is_rejected() {
        let raw = r#"[{"상호명": "A", "주소": "a", "대표메뉴": "m", "음식 종류": "한식", "가격대": "보통"}]"#;
        match parse_upload(raw.as_bytes()) {
            Err(ImportError::MissingColumns(missing)) => assert_eq!(missing, vec!["연락처"]),
            other => panic!("expected missing columns, got {other:?}"),
        }
    }

    #[test]
    fn columns_are_the_union_across_rows() {
        // The name column exists because the first row carries it.
        let raw = r#"[
            {"상호명": "A", "주소": "a", "대표메뉴": "m", "연락처": "1", "음식 종류": "한식", "가격대": "보통"},
            {"주소": "b", "대표메뉴": "m", "연락처": "2", "음식 종류": "한식", "가격대": "보통"}
        ]"#;
        let upload = parse_upload(raw.as_bytes()).unwrap();
        assert_eq!(upload.rows[1].name, None);
    }

    #[test]
    fn empty_list_has_no_columns() {
        match parse_upload(b"[]") {
            Err(ImportError::MissingColumns(missing)) => assert_eq!(missing.len(), 6),
            other => panic!("expected missing columns, got {other:?}"),
        }
    }

    #[test]
    fn decode_and_shape_errors() {
        assert!(matches!(parse_upload(&[0xff, 0xfe]), Err(ImportError::Decode(_))));
        assert!(matches!(parse_upload(b"[{"), Err(ImportError::Parse(_))));
        assert!(matches!(parse_upload(b"{\"a\": 1}"), Err(ImportError::NotAList)));
        assert!(matches!(parse_upload(b"[1, 2]"), Err(ImportError::NotAList)));
    }

    #[test]
    fn unknown_label_is_a_row_error() {
        let raw = r#"[{"상호명": "A", "주소": "a", "대표메뉴": "m", "연락처": "1", "음식 종류": "퓨전", "가격대": "보통"}]"#;
        assert!(matches!(
            parse_upload(raw.as_bytes()),
            Err(ImportError::InvalidRow { row: 1, .. })
        ));
    }
}
