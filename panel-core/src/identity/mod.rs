//! Entity identity resolution.
//!
//! Each row gets one `EntityKey` from an ordered chain of [`KeyExtractor`]
//! strategies; the first strategy returning a non-empty fragment wins. The
//! chain is row-local and never merges identities across rows, so an entity
//! whose primary identifier is blank in some quarters resolves to a different
//! key in those quarters.

use log::debug;
use panel::{ConstituentRow, EntityKey, KeyExtractor};

pub mod firm_id;
pub mod isin;
pub mod name_hq;

pub use firm_id::FirmIdExtractor;
pub use isin::IsinExtractor;
pub use name_hq::NameHqExtractor;

/// Returns the trimmed value when it is non-empty.
pub(crate) fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

pub struct IdentityResolver {
    extractors: Vec<Box<dyn KeyExtractor>>,
}

impl Default for IdentityResolver {
    /// The fixed chain: `firm_id` → `isin` → `name` + `hq_code`.
    fn default() -> Self {
        let mut resolver = Self::new();
        resolver.add_extractor(Box::new(FirmIdExtractor));
        resolver.add_extractor(Box::new(IsinExtractor));
        resolver.add_extractor(Box::new(NameHqExtractor));
        resolver
    }
}

impl IdentityResolver {
    /// Creates a resolver with an empty chain. Every row resolves to the empty key.
    pub fn new() -> Self {
        Self {
            extractors: Vec::new(),
        }
    }

    pub fn add_extractor(&mut self, extractor: Box<dyn KeyExtractor>) {
        self.extractors.push(extractor);
    }

    /// Resolves the key of a single row. Never fails; the empty key means
    /// "unidentifiable".
    pub fn resolve_key(&self, row: &ConstituentRow) -> EntityKey {
        for extractor in &self.extractors {
            if let Some(key) = extractor.extract(row).filter(|k| !k.is_empty()) {
                return EntityKey::new(key);
            }
            debug!("{} yielded nothing for row dated {}", extractor.name(), row.as_of_date);
        }
        EntityKey::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn row() -> ConstituentRow {
        ConstituentRow::new(NaiveDate::from_ymd_opt(2020, 3, 31).unwrap())
    }

    #[test]
    fn test_firm_id_has_priority() {
        let resolver = IdentityResolver::default();
        let r = row()
            .with_firm_id("X1")
            .with_isin("DE0001")
            .with_name("Acme")
            .with_hq("Germany", "DE");
        assert_eq!(resolver.resolve_key(&r).as_str(), "X1");
    }

    #[test]
    fn test_falls_back_to_isin() {
        let resolver = IdentityResolver::default();
        let r = row().with_firm_id("   ").with_isin(" DE0001 ").with_name("Acme");
        assert_eq!(resolver.resolve_key(&r).as_str(), "DE0001");
    }

    #[test]
    fn test_falls_back_to_name_and_hq_code() {
        let resolver = IdentityResolver::default();
        let r = row().with_name("Acme").with_hq("Germany", "DE");
        assert_eq!(resolver.resolve_key(&r).as_str(), "Acme|DE");

        let no_code = row().with_name("Acme");
        assert_eq!(resolver.resolve_key(&no_code).as_str(), "Acme");
    }

    #[test]
    fn test_empty_row_is_unidentifiable() {
        let resolver = IdentityResolver::default();
        let r = row().with_hq("Germany", "DE").with_market_cap(10.0);
        assert!(resolver.resolve_key(&r).is_empty());
    }

    #[test]
    fn test_same_firm_id_same_key() {
        let resolver = IdentityResolver::default();
        let a = row().with_firm_id("X1").with_name("Acme").with_market_cap(1.0);
        let b = ConstituentRow::new(NaiveDate::from_ymd_opt(2021, 6, 30).unwrap())
            .with_firm_id("X1")
            .with_name("Acme Holding")
            .with_isin("FR0002");
        assert_eq!(resolver.resolve_key(&a), resolver.resolve_key(&b));
        assert_eq!(resolver.resolve_key(&a), resolver.resolve_key(&a));
    }

    #[test]
    fn test_empty_chain_resolves_empty() {
        let resolver = IdentityResolver::new();
        assert!(resolver.resolve_key(&row().with_firm_id("X1")).is_empty());
    }
}
