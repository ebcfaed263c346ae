use super::non_empty;
use panel::{ConstituentRow, KeyExtractor};

/// Uses the secondary, ISIN-like identifier.
pub struct IsinExtractor;

impl KeyExtractor for IsinExtractor {
    fn name(&self) -> &str {
        "Isin"
    }

    fn extract(&self, row: &ConstituentRow) -> Option<String> {
        non_empty(row.identifiers.isin.as_deref()).map(str::to_string)
    }
}
