//! Data available to one substitution pass.
//!
//! Every record is optional; a missing record simply leaves its placeholders
//! to the later resolution layers. camelCase aliases accept payloads from the
//! existing web client.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubstitutionContext {
    #[serde(default)]
    pub user: Option<UserData>,

    #[serde(default, alias = "organisation")]
    pub organization: Option<OrganizationData>,

    #[serde(default, alias = "lessonData")]
    pub lesson_data: Option<LessonData>,

    #[serde(default, alias = "trackData")]
    pub track_data: Option<TrackData>,

    #[serde(default, alias = "completionData")]
    pub completion_data: Option<CompletionData>,

    #[serde(default, alias = "nextLesson")]
    pub next_lesson: Option<NextLessonData>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserData {
    #[serde(default, alias = "fullName")]
    pub full_name: Option<String>,
    #[serde(default, alias = "firstName")]
    pub first_name: Option<String>,
    #[serde(default, alias = "lastName")]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrganizationData {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub domain: Option<String>,
    #[serde(default, alias = "supportEmail")]
    pub support_email: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LessonData {
    #[serde(default, alias = "lessonTitle")]
    pub lesson_title: Option<String>,
    #[serde(default, alias = "lessonDescription")]
    pub lesson_description: Option<String>,
    #[serde(default, alias = "lessonUrl")]
    pub lesson_url: Option<String>,
    #[serde(default, alias = "durationMinutes")]
    pub duration_minutes: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrackData {
    #[serde(default, alias = "trackTitle")]
    pub track_title: Option<String>,
    #[serde(default, alias = "trackDescription")]
    pub track_description: Option<String>,
    #[serde(default, alias = "progressPercent")]
    pub progress_percent: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompletionData {
    #[serde(default, alias = "completedAt")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub score: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NextLessonData {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default, alias = "dueDate")]
    pub due_date: Option<NaiveDate>,
}

impl SubstitutionContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(mut self, user: UserData) -> Self {
        self.user = Some(user);
        self
    }

    pub fn with_organization(mut self, organization: OrganizationData) -> Self {
        self.organization = Some(organization);
        self
    }

    pub fn with_lesson(mut self, lesson: LessonData) -> Self {
        self.lesson_data = Some(lesson);
        self
    }

    pub fn with_track(mut self, track: TrackData) -> Self {
        self.track_data = Some(track);
        self
    }

    pub fn with_completion(mut self, completion: CompletionData) -> Self {
        self.completion_data = Some(completion);
        self
    }

    pub fn with_next_lesson(mut self, next_lesson: NextLessonData) -> Self {
        self.next_lesson = Some(next_lesson);
        self
    }
}

impl UserData {
    /// `full_name`, else `first_name last_name`.
    pub fn display_name(&self) -> Option<String> {
        if let Some(full) = non_empty(&self.full_name) {
            return Some(full.to_string());
        }

        let joined = [non_empty(&self.first_name), non_empty(&self.last_name)]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ");

        (!joined.is_empty()).then_some(joined)
    }

    /// `first_name`, else the first word of `full_name`.
    pub fn given_name(&self) -> Option<String> {
        non_empty(&self.first_name)
            .or_else(|| non_empty(&self.full_name).and_then(|n| n.split_whitespace().next()))
            .map(str::to_string)
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_fallbacks() {
        let user = UserData {
            full_name: Some("Ada Lovelace".to_string()),
            ..Default::default()
        };
        assert_eq!(user.display_name().as_deref(), Some("Ada Lovelace"));
        assert_eq!(user.given_name().as_deref(), Some("Ada"));

        let user = UserData {
            first_name: Some("Grace".to_string()),
            last_name: Some("Hopper".to_string()),
            full_name: Some("  ".to_string()),
            ..Default::default()
        };
        assert_eq!(user.display_name().as_deref(), Some("Grace Hopper"));
        assert_eq!(user.given_name().as_deref(), Some("Grace"));

        assert!(UserData::default().display_name().is_none());
    }

    #[test]
    fn test_deserialize_client_payload() {
        let ctx: SubstitutionContext = serde_json::from_value(serde_json::json!({
            "user": {"full_name": "Ada"},
            "lessonData": {"lessonTitle": "Intro to Phishing"},
            "nextLesson": {"title": "Passwords", "dueDate": "2026-11-02"}
        }))
        .unwrap();

        assert_eq!(ctx.user.unwrap().full_name.as_deref(), Some("Ada"));
        assert_eq!(
            ctx.lesson_data.unwrap().lesson_title.as_deref(),
            Some("Intro to Phishing")
        );
        assert_eq!(
            ctx.next_lesson.unwrap().due_date,
            NaiveDate::from_ymd_opt(2026, 11, 2)
        );
    }
}
