use serde::Deserialize;

/// Page-size cap sent to the open-data endpoint on every fetch.
pub const PAGE_LIMIT: u32 = 10_000;

/// One row of the open-data payload, field names as the endpoint emits them.
///
/// Every field defaults so a sparse row never fails the parse; defaulting
/// rules for display live in the [`crate::LicenseRecord`] conversion.
#[derive(Deserialize, Default)]
#[serde(default)]
pub struct RawLicense {
    pub license_number: String,
    pub application_number: String,
    pub entity_name: String,
    pub dba: String,
    pub license_holder: String,
    pub license_type: String,
    pub license_status: String,
    pub address_line_1: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub county: String,
    pub region: String,
    pub issued_date: String,
    pub effective_date: String,
    pub expiration_date: String,
    pub operational_status: String,
    pub business_purpose: String,
}
