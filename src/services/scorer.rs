use std::collections::HashMap;

use crate::models::domain::question::QuestionType;
use crate::models::domain::result::EvaluatedAnswer;
use crate::models::domain::Question;
use crate::models::dto::request::SubmitAnswerInput;

/// Outcome of evaluating one submission against the quiz's question list.
#[derive(Clone, Debug, PartialEq)]
pub struct Evaluation {
    pub answers: Vec<EvaluatedAnswer>,
    pub total_score: i32,
    pub max_score: i32,
}

/// Deterministic, side-effect-free answer evaluation. Given the same quiz,
/// questions, and answers, repeated evaluation yields identical output.
pub struct Scorer;

impl Scorer {
    pub fn evaluate(questions: &[Question], submitted: &[SubmitAnswerInput]) -> Evaluation {
        let question_map: HashMap<&str, &Question> =
            questions.iter().map(|q| (q.id.as_str(), q)).collect();

        let mut total_score = 0;
        let mut max_score = 0;
        let mut answers = Vec::with_capacity(submitted.len());

        for answer in submitted {
            // Answers referencing an unknown question are skipped entirely:
            // they contribute to neither total_score nor max_score.
            let Some(question) = question_map.get(answer.question_id.as_str()) else {
                continue;
            };

            max_score += question.points;

            let is_correct = Self::is_correct(question, answer);
            let points_earned = if is_correct { question.points } else { 0 };
            total_score += points_earned;

            answers.push(EvaluatedAnswer {
                question_id: question.id.clone(),
                selected: answer.selected_option.clone(),
                is_correct,
                points_earned,
            });
        }

        Evaluation {
            answers,
            total_score,
            max_score,
        }
    }

    fn is_correct(question: &Question, answer: &SubmitAnswerInput) -> bool {
        match question.question_type {
            // Position, not text, is the key: the submitted index must match
            // the zero-based position of the option flagged correct.
            QuestionType::MultipleChoice => match question.correct_option_index() {
                Some(correct_index) => answer.selected_option.as_index() == Some(correct_index),
                None => false,
            },
            QuestionType::TrueFalse => question
                .correct_answer
                .as_deref()
                .is_some_and(|expected| {
                    answer.selected_option.as_text().to_lowercase() == expected.to_lowercase()
                }),
            QuestionType::ShortAnswer => question
                .correct_answer
                .as_deref()
                .is_some_and(|expected| {
                    answer.selected_option.as_text().trim().to_lowercase()
                        == expected.trim().to_lowercase()
                }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::domain::question::{multiple_choice, text_question};
    use crate::models::domain::result::SelectedAnswer;

    fn answer(question_id: &str, selected: SelectedAnswer) -> SubmitAnswerInput {
        SubmitAnswerInput {
            question_id: question_id.to_string(),
            selected_option: selected,
        }
    }

    #[test]
    fn two_choice_quiz_half_right_scores_fifty_percent() {
        let q1 = multiple_choice("quiz-1", &["A", "B"], 0, 1);
        let q2 = multiple_choice("quiz-1", &["C", "D"], 0, 1);
        let questions = vec![q1.clone(), q2.clone()];

        let submitted = vec![
            answer(&q1.id, SelectedAnswer::Index(0)),
            answer(&q2.id, SelectedAnswer::Index(1)),
        ];

        let evaluation = Scorer::evaluate(&questions, &submitted);

        assert_eq!(evaluation.total_score, 1);
        assert_eq!(evaluation.max_score, 2);
        assert!(evaluation.answers[0].is_correct);
        assert!(!evaluation.answers[1].is_correct);
    }

    #[test]
    fn points_are_all_or_nothing() {
        let q = multiple_choice("quiz-1", &["A", "B", "C"], 2, 5);
        let questions = vec![q.clone()];

        let right = Scorer::evaluate(&questions, &[answer(&q.id, SelectedAnswer::Index(2))]);
        let wrong = Scorer::evaluate(&questions, &[answer(&q.id, SelectedAnswer::Index(0))]);

        assert_eq!(right.answers[0].points_earned, 5);
        assert_eq!(wrong.answers[0].points_earned, 0);
    }

    #[test]
    fn true_false_comparison_is_case_insensitive() {
        let q = text_question("quiz-1", QuestionType::TrueFalse, "True", 1);
        let questions = vec![q.clone()];

        let evaluation = Scorer::evaluate(
            &questions,
            &[answer(&q.id, SelectedAnswer::Text("true".to_string()))],
        );

        assert!(evaluation.answers[0].is_correct);
        assert_eq!(evaluation.total_score, 1);
    }

    #[test]
    fn short_answer_comparison_trims_and_ignores_case() {
        let q = text_question("quiz-1", QuestionType::ShortAnswer, " Paris ", 1);
        let questions = vec![q.clone()];

        let evaluation = Scorer::evaluate(
            &questions,
            &[answer(&q.id, SelectedAnswer::Text("paris".to_string()))],
        );

        assert!(evaluation.answers[0].is_correct);
    }

    #[test]
    fn unknown_question_ids_are_skipped_from_both_totals() {
        let q = multiple_choice("quiz-1", &["A", "B"], 0, 3);
        let questions = vec![q.clone()];

        let submitted = vec![
            answer(&q.id, SelectedAnswer::Index(0)),
            answer("no-such-question", SelectedAnswer::Index(0)),
        ];

        let evaluation = Scorer::evaluate(&questions, &submitted);

        assert_eq!(evaluation.answers.len(), 1);
        assert_eq!(evaluation.total_score, 3);
        assert_eq!(evaluation.max_score, 3);
    }

    #[test]
    fn index_answer_to_text_question_is_incorrect() {
        let q = text_question("quiz-1", QuestionType::ShortAnswer, "42", 1);
        let questions = vec![q.clone()];

        // An index submission is compared through its text rendering, the way
        // the original mixed-type answers behaved.
        let evaluation = Scorer::evaluate(&questions, &[answer(&q.id, SelectedAnswer::Index(42))]);
        assert!(evaluation.answers[0].is_correct);

        let evaluation = Scorer::evaluate(&questions, &[answer(&q.id, SelectedAnswer::Index(7))]);
        assert!(!evaluation.answers[0].is_correct);
    }

    #[test]
    fn text_answer_to_multiple_choice_is_incorrect() {
        let q = multiple_choice("quiz-1", &["A", "B"], 0, 1);
        let questions = vec![q.clone()];

        let evaluation = Scorer::evaluate(
            &questions,
            &[answer(&q.id, SelectedAnswer::Text("A".to_string()))],
        );

        assert!(!evaluation.answers[0].is_correct);
    }

    #[test]
    fn evaluation_is_deterministic() {
        let q1 = multiple_choice("quiz-1", &["A", "B"], 1, 2);
        let q2 = text_question("quiz-1", QuestionType::TrueFalse, "false", 1);
        let questions = vec![q1.clone(), q2.clone()];
        let submitted = vec![
            answer(&q1.id, SelectedAnswer::Index(1)),
            answer(&q2.id, SelectedAnswer::Text("FALSE".to_string())),
        ];

        let first = Scorer::evaluate(&questions, &submitted);
        let second = Scorer::evaluate(&questions, &submitted);

        assert_eq!(first, second);
        assert_eq!(first.total_score, 3);
        assert_eq!(first.max_score, 3);
    }
}
