use super::non_empty;
use panel::{ConstituentRow, KeyExtractor};

/// Last resort: display name joined with the HQ code, `"{name}|{hq_code}"`.
///
/// Two companies sharing a name and HQ code collapse into one key.
pub struct NameHqExtractor;

impl KeyExtractor for NameHqExtractor {
    fn name(&self) -> &str {
        "NameHq"
    }

    fn extract(&self, row: &ConstituentRow) -> Option<String> {
        let name = non_empty(row.name.as_deref())?;
        match non_empty(row.hq_code.as_deref()) {
            Some(code) => Some(format!("{}|{}", name, code)),
            None => Some(name.to_string()),
        }
    }
}
