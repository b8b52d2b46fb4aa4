use serde::{Deserialize, Serialize};

use crate::application::pagination::PageRequest;

/// Raw `page`/`limit` query values; anything unusable falls back to defaults.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl ListQuery {
    pub fn page_request(&self) -> PageRequest {
        PageRequest::from_raw(self.page.as_deref(), self.limit.as_deref())
    }
}

#[derive(Debug, Serialize)]
pub struct DeletedResponse {
    pub msg: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted: Option<u64>,
}
