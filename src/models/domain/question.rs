use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
#[cfg(test)]
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Question {
    pub id: String,
    pub quiz_id: String,
    pub question_text: String,
    pub question_type: QuestionType,
    /// Populated for multiple-choice questions; empty otherwise.
    pub options: Vec<QuestionOption>,
    /// The expected answer for true-false and short-answer questions.
    pub correct_answer: Option<String>,
    pub points: i32,
    pub difficulty: Difficulty,
    pub created_by: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct QuestionOption {
    pub text: String,
    pub is_correct: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuestionType {
    MultipleChoice,
    TrueFalse,
    ShortAnswer,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn label(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}

impl Question {
    /// Zero-based position of the option flagged correct. Creation enforces
    /// exactly one such option for multiple-choice questions.
    pub fn correct_option_index(&self) -> Option<usize> {
        self.options.iter().position(|opt| opt.is_correct)
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Difficulty::Medium
    }
}

#[cfg(test)]
pub fn multiple_choice(quiz_id: &str, texts: &[&str], correct: usize, points: i32) -> Question {
    Question {
        id: Uuid::new_v4().to_string(),
        quiz_id: quiz_id.to_string(),
        question_text: "Pick one".to_string(),
        question_type: QuestionType::MultipleChoice,
        options: texts
            .iter()
            .enumerate()
            .map(|(i, text)| QuestionOption {
                text: text.to_string(),
                is_correct: i == correct,
            })
            .collect(),
        correct_answer: None,
        points,
        difficulty: Difficulty::Medium,
        created_by: "user-1".to_string(),
        created_at: Some(Utc::now()),
    }
}

#[cfg(test)]
pub fn text_question(quiz_id: &str, kind: QuestionType, answer: &str, points: i32) -> Question {
    Question {
        id: Uuid::new_v4().to_string(),
        quiz_id: quiz_id.to_string(),
        question_text: "Answer this".to_string(),
        question_type: kind,
        options: Vec::new(),
        correct_answer: Some(answer.to_string()),
        points,
        difficulty: Difficulty::Medium,
        created_by: "user-1".to_string(),
        created_at: Some(Utc::now()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn question_type_serializes_kebab_case() {
        assert_eq!(
            serde_json::to_string(&QuestionType::MultipleChoice).unwrap(),
            "\"multiple-choice\""
        );
        assert_eq!(
            serde_json::to_string(&QuestionType::TrueFalse).unwrap(),
            "\"true-false\""
        );
        assert_eq!(
            serde_json::to_string(&QuestionType::ShortAnswer).unwrap(),
            "\"short-answer\""
        );
    }

    #[test]
    fn question_type_rejects_unknown_variant() {
        assert!(serde_json::from_str::<QuestionType>("\"essay\"").is_err());
    }

    #[test]
    fn correct_option_index_finds_flagged_option() {
        let question = multiple_choice("quiz-1", &["A", "B", "C"], 1, 1);
        assert_eq!(question.correct_option_index(), Some(1));
    }

    #[test]
    fn correct_option_index_is_none_without_options() {
        let question = text_question("quiz-1", QuestionType::ShortAnswer, "Paris", 1);
        assert_eq!(question.correct_option_index(), None);
    }
}
