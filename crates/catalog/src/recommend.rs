use crate::catalog::{Catalog, Filter};
use crate::links::LinkConfig;
use crate::record::Record;
use rand::seq::IndexedRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// A randomly drawn restaurant plus its derived links.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub record: Record,
    pub map_url: String,
    pub search_url: String,
}

impl Recommendation {
    pub fn for_record(record: &Record, links: &LinkConfig) -> Self {
        Self {
            map_url: links.map_url(&record.address),
            search_url: links.search_url(&record.name, &record.address),
            record: record.clone(),
        }
    }
}

/// Draws one record uniformly from the filtered catalog.
/// `None` means nothing matched the filter.
pub fn recommend<R: Rng + ?Sized>(
    catalog: &Catalog,
    filter: &Filter,
    links: &LinkConfig,
    rng: &mut R,
) -> Option<Recommendation> {
    let candidates = catalog.filter(filter);
    let picked = candidates.choose(rng)?;
    log::debug!(
        "recommend: picked {} out of {} candidates",
        picked.name,
        candidates.len()
    );
    Some(Recommendation::for_record(picked, links))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{CuisineType, PriceTier};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn catalog() -> Catalog {
        Catalog::from_records(vec![
            Record::new("a", "x", "m", "c", CuisineType::Korean, PriceTier::Low),
            Record::new("b", "x", "m", "c", CuisineType::Korean, PriceTier::High),
            Record::new("c", "x", "m", "c", CuisineType::Chinese, PriceTier::Low),
            Record::new("d", "x", "m", "c", CuisineType::Western, PriceTier::Medium),
        ])
    }

    #[test]
    fn never_leaves_the_filtered_subset() {
        let catalog = catalog();
        let filter = Filter::new([CuisineType::Korean, CuisineType::Chinese], [PriceTier::Low]);
        let links = LinkConfig::default();
        let mut rng = StdRng::seed_from_u64(7);
        let mut seen = HashSet::new();
        for _ in 0..200 {
            let pick = recommend(&catalog, &filter, &links, &mut rng).expect("match");
            assert!(filter.matches(&pick.record));
            seen.insert(pick.record.name);
        }
        assert_eq!(seen, HashSet::from(["a".to_string(), "c".to_string()]));
    }

    #[test]
    fn empty_filter_draws_from_everything() {
        let catalog = catalog();
        let links = LinkConfig::default();
        let mut rng = StdRng::seed_from_u64(11);
        let mut seen = HashSet::new();
        for _ in 0..400 {
            let pick = recommend(&catalog, &Filter::default(), &links, &mut rng).unwrap();
            seen.insert(pick.record.name);
        }
        assert_eq!(seen.len(), 4);
    }

    #[test]
    fn no_match_when_filter_excludes_all() {
        let links = LinkConfig::default();
        let mut rng = StdRng::seed_from_u64(1);
        let filter = Filter::new([CuisineType::Japanese], []);
        assert!(recommend(&catalog(), &filter, &links, &mut rng).is_none());
        assert!(recommend(&Catalog::new(), &Filter::default(), &links, &mut rng).is_none());
    }

    #[test]
    fn carries_links_for_the_pick() {
        let catalog = Catalog::from_records(vec![Record::new(
            "돼지국밥",
            "부산사하구 하단동",
            "국밥",
            "051",
            CuisineType::Korean,
            PriceTier::Low,
        )]);
        let links = LinkConfig::default();
        let pick = recommend(&catalog, &Filter::default(), &links, &mut rand::rng()).unwrap();
        assert_eq!(pick.map_url, links.map_url("부산사하구 하단동"));
        assert_eq!(pick.search_url, links.search_url("돼지국밥", "부산사하구 하단동"));
    }
}
