//! # License Registry
//!
//! Data model and fetch for the public cannabis license registry.
//!
//! ## Source
//! - One open-data endpoint, plain GET with a `$limit` page-size cap
//! - Returns a JSON array of sparse rows; any field may be absent
//! - Rows are mapped onto [`LicenseRecord`] with a default for every field
//!
//! ## Keys
//! - License number is the primary lookup key when present
//! - Pre-licensure rows carry only an application number, which serves as
//!   the surrogate key until a license number is assigned

use anyhow::{Error, anyhow};
use serde::Serialize;

pub mod models;
pub mod normalize;

use models::{PAGE_LIMIT, RawLicense};

/// One cannabis business license, normalized for in-memory search.
#[derive(Serialize, Clone, Debug, Default, PartialEq)]
pub struct LicenseRecord {
    pub license_number: String,
    pub application_number: String,
    pub entity_name: String,
    pub dba_name: String,
    pub license_holder: String,
    pub license_type: String,
    pub license_status: String,
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub county: String,
    pub region: String,
    pub issued_date: String,
    pub effective_date: String,
    pub expiration_date: String,
    pub operational_status: String,
    pub business_purpose: String,
}

impl LicenseRecord {
    /// Lookup key: the license number, or the application number for rows
    /// that have not been issued one yet.
    pub fn key(&self) -> &str {
        if self.license_number.is_empty() {
            &self.application_number
        } else {
            &self.license_number
        }
    }
}

impl From<RawLicense> for LicenseRecord {
    fn from(raw: RawLicense) -> Self {
        Self {
            license_number: normalize::license_number(&raw.license_number),
            application_number: normalize::license_number(&raw.application_number),
            entity_name: normalize::clean(&raw.entity_name),
            dba_name: normalize::clean(&raw.dba),
            license_holder: normalize::clean(&raw.license_holder),
            license_type: normalize::clean(&raw.license_type),
            license_status: normalize::clean(&raw.license_status),
            street: normalize::clean(&raw.address_line_1),
            city: normalize::clean(&raw.city),
            state: normalize::clean(&raw.state),
            zip: normalize::clean(&raw.zip_code),
            county: normalize::clean(&raw.county),
            region: normalize::clean(&raw.region),
            issued_date: normalize::date(&raw.issued_date),
            effective_date: normalize::date(&raw.effective_date),
            expiration_date: normalize::date(&raw.expiration_date),
            operational_status: normalize::clean(&raw.operational_status),
            business_purpose: normalize::clean(&raw.business_purpose),
        }
    }
}

/// Fetches one full page of the registry and maps it into license records.
pub async fn fetch_licenses(
    client: &reqwest::Client,
    base_url: &str,
) -> Result<Vec<LicenseRecord>, Error> {
    let url = format!("{base_url}?$limit={PAGE_LIMIT}");

    let response = client.get(&url).send().await?;

    if !response.status().is_success() {
        return Err(anyhow!("registry fetch failed: HTTP {}", response.status()));
    }

    let rows: Vec<RawLicense> = response.json().await?;

    Ok(rows.into_iter().map(LicenseRecord::from).collect())
}
