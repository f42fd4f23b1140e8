use serde::{Deserialize, Serialize};

/// Identifier of a Hacker News item. Stable for the item's lifetime.
pub type ItemId = u64;

/// A story as returned by `item/{id}.json`.
///
/// Field names follow the remote payload on the wire (`by`, `time`, `type`,
/// `kids`). Anything the remote leaves out (deleted authors, Ask HN posts
/// without a url, stories with no comments) falls back to its default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRecord {
    pub id: ItemId,
    #[serde(default)]
    pub title: String,
    #[serde(rename = "by", default)]
    pub author: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub score: i64,
    // Unix epoch seconds
    #[serde(rename = "time", default)]
    pub timestamp: i64,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(rename = "kids", default)]
    pub child_ids: Vec<ItemId>,
}

impl ItemRecord {
    pub fn comment_count(&self) -> usize {
        self.child_ids.len()
    }
}

/// Shape handed back to HTTP callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryDto {
    pub title: String,
    pub url: String,
    pub posted_by: String,
    pub score: i64,
    pub time: i64,
    pub comment_count: usize,
}

impl From<&ItemRecord> for StoryDto {
    fn from(item: &ItemRecord) -> Self {
        Self {
            title: item.title.clone(),
            url: item.url.clone(),
            posted_by: item.author.clone(),
            score: item.score,
            time: item.timestamp,
            comment_count: item.comment_count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn deserializes_remote_payload() {
        let json = r#"{
            "by": "dhouston",
            "descendants": 71,
            "id": 8863,
            "kids": [8952, 9224, 8917],
            "score": 111,
            "time": 1175714200,
            "title": "My YC app: Dropbox - Throw away your USB drive",
            "type": "story",
            "url": "http://www.getdropbox.com/u/2/screencast.html"
        }"#;

        let item: ItemRecord = serde_json::from_str(json).unwrap();
        assert_eq!(item.id, 8863);
        assert_eq!(item.author, "dhouston");
        assert_eq!(item.score, 111);
        assert_eq!(item.timestamp, 1175714200);
        assert_eq!(item.kind, "story");
        assert_eq!(item.child_ids, vec![8952, 9224, 8917]);
    }

    #[test]
    fn missing_optional_fields_use_defaults() {
        let item: ItemRecord =
            serde_json::from_str(r#"{"id": 121003, "title": "Ask HN: anything?", "score": 25}"#)
                .unwrap();

        assert_eq!(item.url, "");
        assert_eq!(item.author, "");
        assert!(item.child_ids.is_empty());
        assert_eq!(item.comment_count(), 0);
    }

    #[test]
    fn dto_renames_fields_and_counts_kids() {
        let item = ItemRecord {
            id: 1,
            title: "Title".to_string(),
            author: "pg".to_string(),
            url: "https://example.com".to_string(),
            score: 42,
            timestamp: 1_700_000_000,
            kind: "story".to_string(),
            child_ids: vec![2, 3, 4],
        };

        let dto = StoryDto::from(&item);
        assert_eq!(dto.posted_by, "pg");
        assert_eq!(dto.comment_count, 3);

        let json = serde_json::to_value(&dto).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "title": "Title",
                "url": "https://example.com",
                "postedBy": "pg",
                "score": 42,
                "time": 1_700_000_000,
                "commentCount": 3
            })
        );
    }
}
