use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Translatable content of one lesson.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LessonContent {
    #[serde(alias = "lessonId")]
    pub lesson_id: String,
    /// Source language, detected by the provider when absent
    #[serde(default)]
    pub language: Option<String>,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub nodes: Vec<LessonNode>,
}

/// A content node: a text block, or a question with its answers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LessonNode {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub answers: Vec<String>,
}

/// One translatable string of a lesson and its stable field name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct LessonField<'a> {
    pub name: String,
    pub text: &'a str,
}

impl LessonContent {
    /// First node id used by more than one node. Field names are keyed by
    /// node id, so such a lesson cannot be stored unambiguously.
    pub fn duplicate_node_id(&self) -> Option<&str> {
        let mut seen = HashSet::new();
        self.nodes
            .iter()
            .map(|node| node.id.as_str())
            .find(|id| !seen.insert(*id))
    }

    /// Fields in translation order: title, description, then each node's
    /// text followed by its answers.
    pub(crate) fn fields(&self) -> Vec<LessonField<'_>> {
        let mut fields = vec![
            LessonField {
                name: "title".to_string(),
                text: &self.title,
            },
            LessonField {
                name: "description".to_string(),
                text: &self.description,
            },
        ];

        for node in &self.nodes {
            fields.push(LessonField {
                name: format!("node:{}", node.id),
                text: &node.text,
            });
            for (i, answer) in node.answers.iter().enumerate() {
                fields.push(LessonField {
                    name: format!("node:{}:answer:{}", node.id, i),
                    text: answer,
                });
            }
        }

        fields
    }

    /// Rebuild the lesson from translated texts given in `fields()` order.
    pub(crate) fn with_translations(&self, language: &str, texts: Vec<String>) -> Self {
        let mut translated = self.clone();
        translated.language = Some(language.to_string());

        let mut texts = texts.into_iter();
        let mut next = |current: &mut String| {
            if let Some(text) = texts.next() {
                *current = text;
            }
        };

        next(&mut translated.title);
        next(&mut translated.description);
        for node in &mut translated.nodes {
            next(&mut node.text);
            for answer in &mut node.answers {
                next(answer);
            }
        }

        translated
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lesson() -> LessonContent {
        LessonContent {
            lesson_id: "phishing-101".to_string(),
            language: Some("en".to_string()),
            title: "Intro to Phishing".to_string(),
            description: "Spot the bait".to_string(),
            nodes: vec![
                LessonNode {
                    id: "n1".to_string(),
                    text: "What is phishing?".to_string(),
                    answers: vec!["A scam".to_string(), "A sport".to_string()],
                },
                LessonNode {
                    id: "n2".to_string(),
                    text: "Well done, {{user_first_name}}".to_string(),
                    answers: vec![],
                },
            ],
        }
    }

    #[test]
    fn test_duplicate_node_id() {
        let mut lesson = lesson();
        assert_eq!(lesson.duplicate_node_id(), None);

        lesson.nodes[1].id = "n1".to_string();
        assert_eq!(lesson.duplicate_node_id(), Some("n1"));
    }

    #[test]
    fn test_field_order() {
        let lesson = lesson();
        let names: Vec<String> = lesson.fields().into_iter().map(|f| f.name).collect();
        assert_eq!(
            names,
            vec![
                "title",
                "description",
                "node:n1",
                "node:n1:answer:0",
                "node:n1:answer:1",
                "node:n2",
            ]
        );
    }

    #[test]
    fn test_with_translations_fills_in_order() {
        let lesson = lesson();
        let texts = vec![
            "Einführung".to_string(),
            "Köder erkennen".to_string(),
            "Was ist Phishing?".to_string(),
            "Betrug".to_string(),
            "Sport".to_string(),
            "Gut gemacht, {{user_first_name}}".to_string(),
        ];

        let translated = lesson.with_translations("de", texts);
        assert_eq!(translated.language.as_deref(), Some("de"));
        assert_eq!(translated.title, "Einführung");
        assert_eq!(translated.nodes[0].answers, vec!["Betrug", "Sport"]);
        assert_eq!(translated.nodes[1].text, "Gut gemacht, {{user_first_name}}");
        assert_eq!(translated.lesson_id, "phishing-101");
    }

    #[test]
    fn test_deserialize_minimal() {
        let lesson: LessonContent =
            serde_json::from_str(r#"{"lessonId":"l1","title":"Hello"}"#).unwrap();
        assert_eq!(lesson.lesson_id, "l1");
        assert!(lesson.nodes.is_empty());
        assert_eq!(lesson.description, "");
    }
}
