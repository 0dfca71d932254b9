//! Wire models for the vault REST API.

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// A vault folder. Each folder is one configuration namespace.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VaultFolder {
    /// Folder id, used to list the items it contains.
    pub id: String,
    /// Folder name, used as the key namespace.
    pub name: String,
}

/// A single vault item.
///
/// Only items of the secure-note kind carry configuration values; the
/// client filters out everything else.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VaultItem {
    /// Item id.
    pub id: String,
    /// Id of the folder containing this item, if any.
    #[serde(default)]
    pub folder_id: Option<String>,
    /// Item kind discriminator as reported by the vault.
    #[serde(rename = "type")]
    pub kind: u8,
    /// Item name, used as the item path within its namespace.
    pub name: String,
    /// The note text. This is the configuration value.
    #[serde(default)]
    pub notes: Option<String>,
    /// Last modification time of the item.
    pub revision_date: DateTime<Utc>,
}

impl VaultItem {
    /// Kind discriminator for secure notes, the only kind treated as a
    /// configuration value.
    pub const SECURE_NOTE: u8 = 2;
}

/// Response envelope wrapping every vault API payload.
#[derive(Debug, Deserialize)]
pub struct VaultResponse<T> {
    /// Whether the vault reported the request as successful.
    #[serde(default)]
    pub success: bool,
    /// The payload, absent on failure.
    pub data: Option<T>,
}

/// List payload carried inside a [`VaultResponse`].
#[derive(Debug, Deserialize)]
pub struct VaultListData<T> {
    /// Payload discriminator (e.g. `"list"`).
    #[serde(default)]
    pub object: String,
    /// The listed records.
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_folder_list() {
        let body = r#"{
            "success": true,
            "data": {
                "object": "list",
                "data": [
                    {"id": "f-1", "name": "production"},
                    {"id": "f-2", "name": "staging"}
                ]
            }
        }"#;

        let response: VaultResponse<VaultListData<VaultFolder>> =
            serde_json::from_str(body).unwrap();
        assert!(response.success);
        let folders = response.data.unwrap().data;
        assert_eq!(folders.len(), 2);
        assert_eq!(folders[0].name, "production");
    }

    #[test]
    fn test_deserialize_item_with_camel_case_fields() {
        let body = r#"{
            "id": "i-1",
            "folderId": "f-1",
            "type": 2,
            "name": "database/host",
            "notes": "db.internal.example.com",
            "revisionDate": "2024-03-01T12:00:00Z"
        }"#;

        let item: VaultItem = serde_json::from_str(body).unwrap();
        assert_eq!(item.kind, VaultItem::SECURE_NOTE);
        assert_eq!(item.folder_id.as_deref(), Some("f-1"));
        assert_eq!(item.notes.as_deref(), Some("db.internal.example.com"));
        assert_eq!(item.revision_date.to_rfc3339(), "2024-03-01T12:00:00+00:00");
    }

    #[test]
    fn test_deserialize_item_without_notes() {
        let body = r#"{
            "id": "i-2",
            "type": 1,
            "name": "login-entry",
            "revisionDate": "2024-03-01T12:00:00Z"
        }"#;

        let item: VaultItem = serde_json::from_str(body).unwrap();
        assert_eq!(item.kind, 1);
        assert!(item.notes.is_none());
        assert!(item.folder_id.is_none());
    }

    #[test]
    fn test_deserialize_failure_envelope() {
        let body = r#"{"success": false}"#;
        let response: VaultResponse<VaultItem> = serde_json::from_str(body).unwrap();
        assert!(!response.success);
        assert!(response.data.is_none());
    }
}
