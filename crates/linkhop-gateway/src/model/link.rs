use linkhop_core::{LinkRow, ShortCode};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLinkRequest {
    pub long_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLinkResponse {
    pub code: String,
    pub short_url: String,
    pub long_url: String,
    pub created_at: String,
    pub expires_at: String,
}

impl CreateLinkResponse {
    pub fn from_row(row: LinkRow, base_url: &str) -> Self {
        let short_url = ShortCode::new_unchecked(row.code.as_str()).to_url(base_url);
        Self {
            short_url,
            code: row.code,
            long_url: row.long_url,
            created_at: row.created_at,
            expires_at: row.expires_at,
        }
    }
}
