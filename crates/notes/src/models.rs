use serde::{Deserialize, Deserializer, Serialize};

/// A note as returned by the server; absent fields decode as empty strings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Note {
    pub id: String,
    pub title: String,
    pub content: String,
    pub created_at: String,
    pub updated_at: String,
}

/// One page of the notes listing
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct NotesPage {
    /// Notes in server order
    #[serde(default)]
    pub notes: Vec<Note>,

    /// Token for the following page; `None` on the last page
    #[serde(
        default,
        rename = "nextPageToken",
        deserialize_with = "empty_as_none"
    )]
    pub next_page_token: Option<String>,
}

/// Query parameters for the notes listing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListNotesParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_token: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
}

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_page() {
        let json = r#"{
            "notes": [
                {"id":"1","title":"A","content":"B","created_at":"t1","updated_at":"t2"},
                {"id":"2","title":"C","content":"D","created_at":"t3","updated_at":"t4"}
            ],
            "nextPageToken": "page-2"
        }"#;

        let page: NotesPage = serde_json::from_str(json).unwrap();

        assert_eq!(page.notes.len(), 2);
        assert_eq!(page.notes[0].id, "1");
        assert_eq!(page.notes[1].id, "2");
        assert_eq!(page.next_page_token.as_deref(), Some("page-2"));
    }

    #[test]
    fn test_decode_note_with_missing_fields() {
        let page: NotesPage =
            serde_json::from_str(r#"{"notes":[{"id":"1","title":"A"}]}"#).unwrap();

        assert_eq!(
            page.notes,
            vec![Note {
                id: "1".into(),
                title: "A".into(),
                ..Note::default()
            }]
        );
    }

    #[test]
    fn test_decode_last_page() {
        let page: NotesPage =
            serde_json::from_str(r#"{"notes":[],"nextPageToken":""}"#).unwrap();
        assert!(page.notes.is_empty());
        assert_eq!(page.next_page_token, None);

        let page: NotesPage = serde_json::from_str("{}").unwrap();
        assert_eq!(page, NotesPage::default());
    }

    #[test]
    fn test_params_serialize_only_set_fields() {
        let params = ListNotesParams {
            page_size: Some(25),
            page_token: None,
            filter: Some("trashed = false".into()),
        };

        let value = serde_json::to_value(&params).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"pageSize": 25, "filter": "trashed = false"})
        );
    }
}
