use serde::Serialize;

use crate::verify::VerificationResult;

pub const DEFAULT_STATE: &str = "NY";
pub const ADDRESS_PLACEHOLDER: &str = "Address not available";

/// Fully-populated record for display; no optional fields.
#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DisplayLicense {
    pub license_number: String,
    pub company_name: String,
    pub license_holder: String,
    pub license_type: String,
    pub city: String,
    pub state: String,
    pub address: String,
}

/// Total mapping from a verification outcome to something renderable:
/// `None` when not found, otherwise every gap filled with a default.
pub fn to_display(result: &VerificationResult) -> Option<DisplayLicense> {
    if !result.found {
        return None;
    }

    Some(DisplayLicense {
        license_number: filled(&result.license_number, ""),
        company_name: filled(&result.company_name, ""),
        license_holder: filled(&result.license_holder, ""),
        license_type: filled(&result.license_type, ""),
        city: filled(&result.city, ""),
        state: filled(&result.state, DEFAULT_STATE),
        address: filled(&result.address, ADDRESS_PLACEHOLDER),
    })
}

fn filled(value: &Option<String>, default: &str) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v.clone(),
        _ => default.to_string(),
    }
}
