use crate::model::constituent::ConstituentRow;

/// One step of the identity fallback chain.
pub trait KeyExtractor: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &str;

    /// Extracts a candidate key from a row.
    ///
    /// # Arguments
    ///
    /// * `row` - The row to inspect. Extractors must not consult other rows.
    ///
    /// # Returns
    ///
    /// * `Some(key)` - A non-empty candidate key.
    /// * `None` - This strategy has nothing to offer for the row.
    fn extract(&self, row: &ConstituentRow) -> Option<String>;
}

impl KeyExtractor for Box<dyn KeyExtractor> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn extract(&self, row: &ConstituentRow) -> Option<String> {
        (**self).extract(row)
    }
}
