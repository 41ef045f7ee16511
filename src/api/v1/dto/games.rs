/*
 * Responsibility
 * - Games request DTOs
 * - validate() checks shape only; Supabase enforces the rest
 */
use serde::Deserialize;

use crate::services::supabase::types::GameFields;

#[derive(Debug, Deserialize)]
pub struct GameRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub subject_id: Option<String>,
    #[serde(rename = "difficulty_level")]
    pub difficulty: Option<i32>,
}

impl GameRequest {
    pub fn validate_create(&self) -> Result<(), &'static str> {
        match &self.title {
            Some(title) if !title.trim().is_empty() => {}
            _ => return Err("title is required"),
        }
        self.validate_common()
    }

    pub fn validate_update(&self) -> Result<(), &'static str> {
        if self.title.is_none()
            && self.description.is_none()
            && self.subject_id.is_none()
            && self.difficulty.is_none()
        {
            return Err("no fields to update");
        }
        if let Some(title) = &self.title
            && title.trim().is_empty()
        {
            return Err("title cannot be empty");
        }
        self.validate_common()
    }

    fn validate_common(&self) -> Result<(), &'static str> {
        if let Some(level) = self.difficulty
            && level < 0
        {
            return Err("difficulty_level must be >= 0");
        }
        Ok(())
    }

    pub fn into_fields(self) -> GameFields {
        GameFields {
            title: self.title.map(|t| t.trim().to_string()),
            description: self.description,
            subject_id: self.subject_id,
            difficulty: self.difficulty,
        }
    }
}
