use crate::command::{CommandAction, ImportReport, ListOutput, MutationOutput, RecommendOutput};
use dinepick_catalog::{Recommendation, Record, UploadedRow, REQUIRED_FIELDS};

const CELL_MAX_CHARS: usize = 60;

pub fn render_recommendation(out: &RecommendOutput) -> String {
    let Some(pick) = &out.pick else {
        return String::new();
    };
    let record = &pick.record;

    let mut md = String::new();
    md.push_str("오늘의 추천 식당은...\n\n");
    md.push_str(&format!("### {} <{}>\n", record.name, pick.search_url));
    md.push_str(&format!("- 주소: {} <{}>\n", record.address, pick.map_url));
    md.push_str(&format!("- 대표메뉴: {}\n", record.menu));
    md.push_str(&format!("- 연락처: {}\n", record.contact));
    md.push_str(&format!("- 음식 종류: {}\n", record.cuisine));
    md.push_str(&format!("- 가격대: {}\n", record.price));
    md.push_str(&format!("\n({} candidate(s))\n", out.candidates));
    md
}

pub fn render_list(out: &ListOutput) -> String {
    let mut md = String::new();
    if out.shown > 0 {
        md.push_str(&table_header());
        for record in &out.records {
            md.push_str(&record_row(record));
        }
        md.push('\n');
    }
    md.push_str(&format!("{} of {} restaurant(s)\n", out.shown, out.total));
    md
}

pub fn render_mutation(out: &MutationOutput) -> String {
    match out.action {
        CommandAction::Add => "새 식당이 등록되었습니다!\n".to_string(),
        CommandAction::Update => format!(
            "식당 정보가 수정되었습니다! ({} row(s) named {})\n",
            out.affected, out.name
        ),
        CommandAction::Delete => format!("{} 식당이 삭제되었습니다.\n", out.name),
        other => format!("{} {}\n", other.as_str(), out.name),
    }
}

pub fn render_import(report: &ImportReport) -> String {
    let mut md = String::new();
    md.push_str("## 업로드된 데이터 미리보기\n\n");
    md.push_str(&table_header());
    for row in &report.preview {
        md.push_str(&uploaded_row(row));
    }
    md.push_str(&format!(
        "\nuploaded={} replaced={} unnamed_dropped={} total={}\n",
        report.uploaded, report.replaced, report.dropped_unnamed, report.total
    ));
    md
}

pub fn render_links(links: &Recommendation) -> String {
    format!(
        "{}\n- map: {}\n- search: {}\n",
        links.record.name, links.map_url, links.search_url
    )
}

fn table_header() -> String {
    let mut md = format!("| {} |\n", REQUIRED_FIELDS.join(" | "));
    md.push_str("|---|---|---|---|---|---|\n");
    md
}

fn record_row(record: &Record) -> String {
    row(&[
        record.name.as_str(),
        &record.address,
        &record.menu,
        &record.contact,
        record.cuisine.label(),
        record.price.label(),
    ])
}

fn uploaded_row(record: &UploadedRow) -> String {
    row(&[
        record.name.as_deref().unwrap_or("-"),
        &record.address,
        &record.menu,
        &record.contact,
        record.cuisine.label(),
        record.price.label(),
    ])
}

fn row(cells: &[&str]) -> String {
    let cells: Vec<String> = cells
        .iter()
        .map(|cell| escape_cell(&truncate_one_line(cell, CELL_MAX_CHARS)))
        .collect();
    format!("| {} |\n", cells.join(" | "))
}

fn truncate_one_line(text: &str, max_chars: usize) -> String {
    let mut s = text.replace(['\n', '\r', '\t'], " ");
    s = s.split_whitespace().collect::<Vec<_>>().join(" ");
    if s.chars().count() <= max_chars {
        return s;
    }
    let truncated: String = s.chars().take(max_chars.saturating_sub(1)).collect();
    format!("{truncated}…")
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
}

#[cfg(test)]
mod tests {
    use super::*;
    use dinepick_catalog::{CuisineType, LinkConfig, PriceTier};

    fn record() -> Record {
        Record::new(
            "할매|국밥",
            "부산사하구 다대동",
            "돼지국밥\n수육",
            "051",
            CuisineType::Korean,
            PriceTier::Low,
        )
    }

    #[test]
    fn list_renders_table_with_escaped_cells() {
        let out = ListOutput {
            total: 3,
            shown: 1,
            records: vec![record()],
        };
        let md = render_list(&out);
        assert!(md.starts_with("| 상호명 | 주소 | 대표메뉴 | 연락처 | 음식 종류 | 가격대 |"));
        assert!(md.contains("| 할매\\|국밥 | 부산사하구 다대동 | 돼지국밥 수육 | 051 | 한식 | 저렴 |"));
        assert!(md.ends_with("1 of 3 restaurant(s)\n"));
    }

    #[test]
    fn empty_list_renders_only_counts() {
        let out = ListOutput {
            total: 0,
            shown: 0,
            records: Vec::new(),
        };
        assert_eq!(render_list(&out), "0 of 0 restaurant(s)\n");
    }

    #[test]
    fn recommendation_shows_links() {
        let pick = Recommendation::for_record(&record(), &LinkConfig::default());
        let out = RecommendOutput {
            matched: true,
            candidates: 2,
            pick: Some(pick.clone()),
        };
        let md = render_recommendation(&out);
        assert!(md.contains(&pick.search_url));
        assert!(md.contains(&pick.map_url));
        assert!(md.contains("- 가격대: 저렴"));
    }

    #[test]
    fn long_cells_are_truncated() {
        let long = "가".repeat(100);
        let cell = truncate_one_line(&long, CELL_MAX_CHARS);
        assert_eq!(cell.chars().count(), CELL_MAX_CHARS);
        assert!(cell.ends_with('…'));
    }
}
