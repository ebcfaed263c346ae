use super::non_empty;
use panel::{ConstituentRow, KeyExtractor};

/// Uses the primary identifier column as-is.
pub struct FirmIdExtractor;

impl KeyExtractor for FirmIdExtractor {
    fn name(&self) -> &str {
        "FirmId"
    }

    fn extract(&self, row: &ConstituentRow) -> Option<String> {
        non_empty(row.identifiers.firm_id.as_deref()).map(str::to_string)
    }
}
