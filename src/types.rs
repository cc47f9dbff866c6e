use serde::{Deserialize, Serialize};

/// Country every geographic lookup is scoped to (Romania).
pub const COUNTRY_ID: u32 = 1;

/// Label document settings sent to `/AwbDocuments`
pub mod label_format {
    pub const TYPE_PDF: &str = "PDF";
    /// Single label per page
    pub const FORMAT_A4_SINGLE: &str = "0";
}

/// Body of `POST /LoginUser`
#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    #[serde(rename = "UserName")]
    pub user_name: &'a str,
    #[serde(rename = "Password")]
    pub password: &'a str,
}

/// County record from `/Counties`.
///
/// Only the commonly used fields are typed; anything else the service sends
/// is kept in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct County {
    #[serde(rename = "CountyId", default, skip_serializing_if = "Option::is_none")]
    pub county_id: Option<i64>,
    #[serde(rename = "CountryId", default, skip_serializing_if = "Option::is_none")]
    pub country_id: Option<i64>,
    #[serde(rename = "Name", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "Abbreviation", default, skip_serializing_if = "Option::is_none")]
    pub abbreviation: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Locality record from `/Localities`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Locality {
    #[serde(rename = "LocalityId", default, skip_serializing_if = "Option::is_none")]
    pub locality_id: Option<i64>,
    #[serde(rename = "Name", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "ParentId", default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<i64>,
    #[serde(rename = "ParentName", default, skip_serializing_if = "Option::is_none")]
    pub parent_name: Option<String>,
    #[serde(rename = "CountyId", default, skip_serializing_if = "Option::is_none")]
    pub county_id: Option<i64>,
    #[serde(rename = "PostalCode", default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}
