//! Built-in placeholder keys and how each one is resolved.

use std::fmt::{self, Write};

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::config::AppConfig;

use super::context::SubstitutionContext;

/// Where a built-in placeholder takes its value from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VariableSource {
    Lesson,
    Track,
    Completion,
    NextLesson,
    Organization,
    User,
    System,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct VariableInfo {
    pub key: &'static str,
    pub source: VariableSource,
    pub description: &'static str,
}

const fn var(key: &'static str, source: VariableSource, description: &'static str) -> VariableInfo {
    VariableInfo {
        key,
        source,
        description,
    }
}

/// Every key the engine resolves without the default value store.
pub const BUILTIN_VARIABLES: &[VariableInfo] = &[
    var("lesson_title", VariableSource::Lesson, "Title of the lesson"),
    var("lesson_description", VariableSource::Lesson, "Short lesson description"),
    var("lesson_url", VariableSource::Lesson, "Link to the lesson"),
    var("lesson_duration", VariableSource::Lesson, "Estimated duration in minutes"),
    var("track_title", VariableSource::Track, "Title of the learning track"),
    var("track_description", VariableSource::Track, "Learning track description"),
    var("track_progress", VariableSource::Track, "Track completion percentage"),
    var("completion_date", VariableSource::Completion, "Date the lesson was completed"),
    var("completion_score", VariableSource::Completion, "Score achieved on completion"),
    var("next_lesson_title", VariableSource::NextLesson, "Title of the next lesson"),
    var("next_lesson_url", VariableSource::NextLesson, "Link to the next lesson"),
    var("next_lesson_due_date", VariableSource::NextLesson, "Due date of the next lesson"),
    var("organization_name", VariableSource::Organization, "Organisation name"),
    var("company_name", VariableSource::Organization, "Alias of organization_name"),
    var("organization_domain", VariableSource::Organization, "Organisation e-mail domain"),
    var("support_email", VariableSource::Organization, "Organisation support address"),
    var("user_name", VariableSource::User, "Recipient full name"),
    var("user_first_name", VariableSource::User, "Recipient first name"),
    var("user_last_name", VariableSource::User, "Recipient last name"),
    var("user_email", VariableSource::User, "Recipient e-mail address"),
    var("user_department", VariableSource::User, "Recipient department"),
    var("user_role", VariableSource::User, "Recipient role"),
    var("current_date", VariableSource::System, "Today's date"),
    var("current_time", VariableSource::System, "Current time of day"),
    var("current_year", VariableSource::System, "Current year"),
    var("app_url", VariableSource::System, "Platform home page"),
    var("login_url", VariableSource::System, "Sign-in page"),
    var("dashboard_url", VariableSource::System, "Learner dashboard"),
    var("lessons_url", VariableSource::System, "Lesson overview"),
    var("reset_password_url", VariableSource::System, "Password reset page"),
];

pub fn is_builtin(key: &str) -> bool {
    BUILTIN_VARIABLES.iter().any(|v| v.key == key)
}

/// Inputs for the `System` keys.
#[derive(Debug, Clone)]
pub struct SystemValues {
    base_url: String,
    date_format: String,
    time_format: String,
}

impl SystemValues {
    /// Invalid strftime patterns fall back to `%Y-%m-%d` / `%H:%M`.
    pub fn new(base_url: &str, date_format: &str, time_format: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            date_format: checked_format(date_format, "%Y-%m-%d"),
            time_format: checked_format(time_format, "%H:%M"),
        }
    }

    pub fn date_format(&self) -> &str {
        &self.date_format
    }

    /// Resolve a `System` key at `now`.
    pub fn resolve(&self, key: &str, now: DateTime<Utc>) -> Option<String> {
        let value = match key {
            "current_date" => render(now.format(&self.date_format))?,
            "current_time" => render(now.format(&self.time_format))?,
            "current_year" => now.format("%Y").to_string(),
            "app_url" => self.base_url.clone(),
            "login_url" => format!("{}/login", self.base_url),
            "dashboard_url" => format!("{}/dashboard", self.base_url),
            "lessons_url" => format!("{}/lessons", self.base_url),
            "reset_password_url" => format!("{}/reset-password", self.base_url),
            _ => return None,
        };
        Some(value)
    }
}

fn checked_format(format: &str, fallback: &str) -> String {
    if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        tracing::warn!(format = %format, fallback = %fallback, "Invalid date/time format");
        return fallback.to_string();
    }
    format.to_string()
}

/// Write a lazily formatted value, `None` when its `Display` impl fails.
///
/// Chrono reports a format that asks for fields the value lacks (such as
/// `%H` on a date) through `fmt::Error` instead of at parse time.
fn render(value: impl fmt::Display) -> Option<String> {
    let mut out = String::new();
    write!(out, "{}", value).ok()?;
    Some(out)
}

/// Format a calendar date, falling back to ISO when the configured format
/// needs time fields.
fn format_date(date: NaiveDate, date_format: &str) -> String {
    render(date.format(date_format)).unwrap_or_else(|| {
        tracing::debug!(format = %date_format, "Date format needs time fields, using ISO date");
        date.format("%Y-%m-%d").to_string()
    })
}

impl From<&AppConfig> for SystemValues {
    fn from(config: &AppConfig) -> Self {
        Self::new(&config.base_url, &config.date_format, &config.time_format)
    }
}

impl Default for SystemValues {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

/// Resolve a key from structured context data.
///
/// Empty strings count as absent so later layers can still fill the key.
pub fn resolve_context_key(
    key: &str,
    ctx: &SubstitutionContext,
    date_format: &str,
) -> Option<String> {
    let value = match key {
        "lesson_title" => ctx.lesson_data.as_ref()?.lesson_title.clone(),
        "lesson_description" => ctx.lesson_data.as_ref()?.lesson_description.clone(),
        "lesson_url" => ctx.lesson_data.as_ref()?.lesson_url.clone(),
        "lesson_duration" => ctx
            .lesson_data
            .as_ref()?
            .duration_minutes
            .map(|m| m.to_string()),

        "track_title" => ctx.track_data.as_ref()?.track_title.clone(),
        "track_description" => ctx.track_data.as_ref()?.track_description.clone(),
        "track_progress" => ctx
            .track_data
            .as_ref()?
            .progress_percent
            .map(|p| format!("{}%", p)),

        "completion_date" => ctx
            .completion_data
            .as_ref()?
            .completed_at
            .and_then(|at| render(at.format(date_format))),
        "completion_score" => ctx.completion_data.as_ref()?.score.map(|s| s.to_string()),

        "next_lesson_title" => ctx.next_lesson.as_ref()?.title.clone(),
        "next_lesson_url" => ctx.next_lesson.as_ref()?.url.clone(),
        "next_lesson_due_date" => ctx
            .next_lesson
            .as_ref()?
            .due_date
            .map(|d| format_date(d, date_format)),

        "organization_name" | "company_name" => ctx.organization.as_ref()?.name.clone(),
        "organization_domain" => ctx.organization.as_ref()?.domain.clone(),
        "support_email" => ctx.organization.as_ref()?.support_email.clone(),

        "user_name" => ctx.user.as_ref()?.display_name(),
        "user_first_name" => ctx.user.as_ref()?.given_name(),
        "user_last_name" => ctx.user.as_ref()?.last_name.clone(),
        "user_email" => ctx.user.as_ref()?.email.clone(),
        "user_department" => ctx.user.as_ref()?.department.clone(),
        "user_role" => ctx.user.as_ref()?.role.clone(),

        _ => None,
    };

    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::{
        CompletionData, LessonData, NextLessonData, OrganizationData, TrackData, UserData,
    };
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 16, 9, 5, 0).unwrap()
    }

    #[test]
    fn test_every_builtin_is_resolvable() {
        let ctx = SubstitutionContext::new()
            .with_user(UserData {
                full_name: Some("Ada Lovelace".to_string()),
                first_name: Some("Ada".to_string()),
                last_name: Some("Lovelace".to_string()),
                email: Some("ada@example.com".to_string()),
                department: Some("Engineering".to_string()),
                role: Some("admin".to_string()),
            })
            .with_organization(OrganizationData {
                name: Some("Acme".to_string()),
                domain: Some("acme.test".to_string()),
                support_email: Some("help@acme.test".to_string()),
            })
            .with_lesson(LessonData {
                lesson_title: Some("Intro".to_string()),
                lesson_description: Some("Basics".to_string()),
                lesson_url: Some("https://lms.test/l/1".to_string()),
                duration_minutes: Some(15),
            })
            .with_track(TrackData {
                track_title: Some("Security".to_string()),
                track_description: Some("All of it".to_string()),
                progress_percent: Some(40),
            })
            .with_completion(CompletionData {
                completed_at: Some(fixed_now()),
                score: Some(92),
            })
            .with_next_lesson(NextLessonData {
                title: Some("Passwords".to_string()),
                url: Some("https://lms.test/l/2".to_string()),
                due_date: Some(fixed_now().date_naive()),
            });

        let system = SystemValues::default();
        for info in BUILTIN_VARIABLES {
            let resolved = resolve_context_key(info.key, &ctx, system.date_format())
                .or_else(|| system.resolve(info.key, fixed_now()));
            assert!(resolved.is_some(), "{} did not resolve", info.key);
        }
    }

    #[test]
    fn test_context_formatting() {
        let ctx = SubstitutionContext::new()
            .with_track(TrackData {
                progress_percent: Some(75),
                ..Default::default()
            })
            .with_completion(CompletionData {
                completed_at: Some(fixed_now()),
                score: None,
            });

        assert_eq!(
            resolve_context_key("track_progress", &ctx, "%Y-%m-%d").as_deref(),
            Some("75%")
        );
        assert_eq!(
            resolve_context_key("completion_date", &ctx, "%Y-%m-%d").as_deref(),
            Some("2026-10-16")
        );
        assert!(resolve_context_key("completion_score", &ctx, "%Y-%m-%d").is_none());
        assert!(resolve_context_key("lesson_title", &ctx, "%Y-%m-%d").is_none());
    }

    #[test]
    fn test_empty_strings_are_absent() {
        let ctx = SubstitutionContext::new().with_organization(OrganizationData {
            name: Some("".to_string()),
            ..Default::default()
        });
        assert!(resolve_context_key("organization_name", &ctx, "%F").is_none());
    }

    #[test]
    fn test_system_values() {
        let system = SystemValues::new("https://lms.example.com/", "%B %-d, %Y", "%H:%M");

        assert_eq!(
            system.resolve("current_date", fixed_now()).as_deref(),
            Some("October 16, 2026")
        );
        assert_eq!(system.resolve("current_time", fixed_now()).as_deref(), Some("09:05"));
        assert_eq!(
            system.resolve("login_url", fixed_now()).as_deref(),
            Some("https://lms.example.com/login")
        );
        assert!(system.resolve("user_name", fixed_now()).is_none());
    }

    #[test]
    fn test_invalid_format_falls_back() {
        let system = SystemValues::new("https://lms.test", "%Y-%", "%H:%M");
        assert_eq!(system.date_format(), "%Y-%m-%d");
        assert_eq!(
            system.resolve("current_date", fixed_now()).as_deref(),
            Some("2026-10-16")
        );
    }

    #[test]
    fn test_date_format_with_time_fields_on_due_date() {
        let system = SystemValues::new("https://lms.test", "%Y-%m-%d %H:%M", "%H:%M");
        let ctx = SubstitutionContext::new()
            .with_completion(CompletionData {
                completed_at: Some(fixed_now()),
                score: None,
            })
            .with_next_lesson(NextLessonData {
                due_date: NaiveDate::from_ymd_opt(2026, 11, 2),
                ..Default::default()
            });

        assert_eq!(
            resolve_context_key("next_lesson_due_date", &ctx, system.date_format()).as_deref(),
            Some("2026-11-02")
        );
        assert_eq!(
            resolve_context_key("completion_date", &ctx, system.date_format()).as_deref(),
            Some("2026-10-16 09:05")
        );
        assert_eq!(
            system.resolve("current_date", fixed_now()).as_deref(),
            Some("2026-10-16 09:05")
        );
    }

    #[test]
    fn test_is_builtin() {
        assert!(is_builtin("user_name"));
        assert!(is_builtin("reset_password_url"));
        assert!(!is_builtin("company_motto"));
    }
}
