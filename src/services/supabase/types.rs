//! Wire shapes exchanged with Supabase REST (`/rest/v1`) and Auth (`/auth/v1`).
use serde::{Deserialize, Serialize};

/// Row of the `games` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Game {
    #[serde(deserialize_with = "id_as_string")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub subject_id: Option<String>,
    #[serde(rename = "difficulty_level", default)]
    pub difficulty: Option<i32>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Column values written on insert / update. Unset fields are not sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GameFields {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject_id: Option<String>,
    #[serde(rename = "difficulty_level", skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<i32>,
}

/// Row of the `public.users` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UserFields {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

/// `auth.users` entry as returned by `/auth/v1/signup`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AuthUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Token pair returned by a successful password grant.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default)]
    pub expires_in: Option<u64>,
}

#[derive(Debug, Serialize)]
pub(super) struct Credentials<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

// Supabase tables may use bigint or uuid primary keys.
fn id_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number id, got {other}"
        ))),
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn game_accepts_numeric_and_string_ids() {
        let numeric: Game = serde_json::from_value(json!({"id": 7, "title": "Chess"})).unwrap();
        let textual: Game =
            serde_json::from_value(json!({"id": "a1", "title": "Go", "difficulty_level": 3}))
                .unwrap();

        assert_eq!(numeric.id, "7");
        assert_eq!(textual.id, "a1");
        assert_eq!(textual.difficulty, Some(3));
    }

    #[test]
    fn game_with_null_or_missing_title_still_decodes() {
        let rows: Vec<Game> = serde_json::from_value(json!([
            {"id": 1, "title": null},
            {"id": 2},
            {"id": 3, "title": "Go"},
        ]))
        .unwrap();

        let titles: Vec<_> = rows.iter().map(|g| g.title.as_str()).collect();
        assert_eq!(titles, ["", "", "Go"]);
    }

    #[test]
    fn game_fields_skip_unset_columns() {
        let fields = GameFields {
            title: Some("Chess".into()),
            difficulty: Some(2),
            ..Default::default()
        };

        assert_eq!(
            serde_json::to_value(&fields).unwrap(),
            json!({"title": "Chess", "difficulty_level": 2})
        );
        assert_eq!(serde_json::to_value(GameFields::default()).unwrap(), json!({}));
    }
}
