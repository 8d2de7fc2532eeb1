use itertools::Itertools;
use serde::Serialize;
use sqlx::FromRow;
use std::collections::HashSet;

use crate::models::{Answer, Question, Quiz};

// Correctness is disclosed per answer only once the owning question has been
// answered by the requesting user, so clients cannot read grades up front.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Disclosure {
    Hidden,
    Correct,
    Incorrect,
}

#[derive(Debug, Serialize)]
pub struct AnswerView {
    pub id: i32,
    pub question_id: i32,
    pub title: String,
    pub after_title: Option<String>,
    pub photos_url: Vec<String>,
    pub is_chosen: bool,
    pub correctness: Disclosure,
}

#[derive(Debug, Serialize)]
pub struct QuestionView {
    pub id: i32,
    pub quiz_id: i32,
    pub title: String,
    pub description: Option<String>,
    pub photos_url: Vec<String>,
    pub is_answered: bool,
    pub answers: Vec<AnswerView>,
}

#[derive(Debug, Serialize)]
pub struct QuizDetail {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub photos_url: Vec<String>,
    pub preview_photo: Option<String>,
    pub is_completed: bool,
    pub questions: Vec<QuestionView>,
}

#[derive(Debug, Serialize)]
pub struct QuizSummary {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub photos_url: Vec<String>,
    pub preview_photo: Option<String>,
    pub is_completed: bool,
}

fn answer_view(answer: Answer, chosen: &HashSet<i32>, question_answered: bool) -> AnswerView {
    let is_chosen = chosen.contains(&answer.id);
    let correctness = if !question_answered {
        Disclosure::Hidden
    } else if answer.is_correct {
        Disclosure::Correct
    } else {
        Disclosure::Incorrect
    };
    AnswerView {
        id: answer.id,
        question_id: answer.question_id,
        title: answer.title,
        // the reveal text belongs to the chosen answer only
        after_title: if is_chosen { answer.after_title } else { None },
        photos_url: answer.photos_url.unwrap_or_default(),
        is_chosen,
        correctness,
    }
}

// `chosen` is the set of answer ids the user picked across this quiz.
pub fn assemble_detail(quiz: Quiz, questions: Vec<Question>, answers: Vec<Answer>, chosen: &HashSet<i32>) -> QuizDetail {
    let answered: HashSet<i32> = answers.iter().filter(|a| chosen.contains(&a.id)).map(|a| a.question_id).collect();
    let mut by_question = answers.into_iter().into_group_map_by(|a| a.question_id);
    let question_views: Vec<QuestionView> = questions
        .into_iter()
        .map(|q| {
            let is_answered = answered.contains(&q.id);
            let answers = by_question
                .remove(&q.id)
                .unwrap_or_default()
                .into_iter()
                .map(|a| answer_view(a, chosen, is_answered))
                .collect();
            QuestionView {
                id: q.id,
                quiz_id: q.quiz_id,
                title: q.title,
                description: q.description,
                photos_url: q.photos_url.unwrap_or_default(),
                is_answered,
                answers,
            }
        })
        .collect();
    let is_completed = question_views.iter().filter(|q| q.is_answered).count() == question_views.len();
    QuizDetail {
        id: quiz.id,
        title: quiz.title,
        description: quiz.description,
        photos_url: quiz.photos_url.unwrap_or_default(),
        preview_photo: quiz.preview_photo,
        is_completed,
        questions: question_views,
    }
}

// The completion snapshot: answers that are both correct and chosen.
pub fn correct_chosen(answers: &[Answer], chosen: &HashSet<i32>) -> Vec<i32> {
    answers.iter().filter(|a| a.is_correct && chosen.contains(&a.id)).map(|a| a.id).collect()
}

#[derive(Debug, FromRow)]
pub struct TallyRow {
    pub question_id: i32,
    pub answer_id: i32,
    pub is_correct: bool,
    pub picks: i64,
}

#[derive(Debug, Serialize)]
pub struct AnswerTally {
    pub answer_id: i32,
    pub picks: i64,
}

#[derive(Debug, Serialize)]
pub struct QuestionStats {
    pub question_id: i32,
    pub correct: i64,
    pub incorrect: i64,
    pub answers: Vec<AnswerTally>,
}

#[derive(Debug, Serialize)]
pub struct QuizStats {
    pub quiz_id: i32,
    pub questions: Vec<QuestionStats>,
}

// Rows come in ordered by (question_id, answer_id); picks count every user's
// submissions, not just the requester's.
pub fn fold_tallies(quiz_id: i32, rows: Vec<TallyRow>) -> QuizStats {
    let grouped = rows.into_iter().group_by(|r| r.question_id);
    let mut questions = Vec::new();
    for (question_id, group) in &grouped {
        let mut correct = 0;
        let mut incorrect = 0;
        let mut answers = Vec::new();
        for row in group {
            if row.is_correct {
                correct += row.picks;
            } else {
                incorrect += row.picks;
            }
            answers.push(AnswerTally {
                answer_id: row.answer_id,
                picks: row.picks,
            });
        }
        questions.push(QuestionStats {
            question_id,
            correct,
            incorrect,
            answers,
        });
    }
    QuizStats { quiz_id, questions }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quiz() -> Quiz {
        Quiz {
            id: 1,
            title: "capitals".into(),
            description: None,
            photos_url: None,
            preview_photo: None,
        }
    }

    fn question(id: i32) -> Question {
        Question {
            id,
            quiz_id: 1,
            title: format!("question {}", id),
            description: None,
            photos_url: None,
        }
    }

    fn answer(id: i32, question_id: i32, is_correct: bool) -> Answer {
        Answer {
            id,
            question_id,
            title: format!("answer {}", id),
            after_title: Some(format!("reveal {}", id)),
            photos_url: None,
            is_correct,
        }
    }

    // two questions, two answers each, one correct per question
    fn fixture() -> (Vec<Question>, Vec<Answer>) {
        let questions = vec![question(10), question(20)];
        let answers = vec![answer(11, 10, true), answer(12, 10, false), answer(21, 20, true), answer(22, 20, false)];
        (questions, answers)
    }

    #[test]
    fn untouched_quiz_hides_everything() {
        let (questions, answers) = fixture();
        let detail = assemble_detail(quiz(), questions, answers, &HashSet::new());
        assert!(!detail.is_completed);
        for q in &detail.questions {
            assert!(!q.is_answered);
            for a in &q.answers {
                assert!(!a.is_chosen);
                assert_eq!(a.correctness, Disclosure::Hidden);
                assert_eq!(a.after_title, None);
            }
        }
    }

    #[test]
    fn answering_one_question_discloses_only_that_question() {
        let (questions, answers) = fixture();
        let chosen = HashSet::from([11]);
        let detail = assemble_detail(quiz(), questions, answers, &chosen);
        assert!(!detail.is_completed);

        let q1 = &detail.questions[0];
        assert!(q1.is_answered);
        assert_eq!(q1.answers[0].correctness, Disclosure::Correct);
        assert_eq!(q1.answers[1].correctness, Disclosure::Incorrect);
        assert!(q1.answers[0].is_chosen);
        assert_eq!(q1.answers[0].after_title.as_deref(), Some("reveal 11"));
        // disclosure covers the whole question, the reveal text only the pick
        assert_eq!(q1.answers[1].after_title, None);

        let q2 = &detail.questions[1];
        assert!(!q2.is_answered);
        assert!(q2.answers.iter().all(|a| a.correctness == Disclosure::Hidden));
    }

    #[test]
    fn answering_every_question_completes_the_quiz() {
        let (questions, answers) = fixture();
        // first question answered correctly, second one not
        let chosen = HashSet::from([11, 22]);
        let detail = assemble_detail(quiz(), questions, answers.clone(), &chosen);
        assert!(detail.is_completed);
        assert_eq!(correct_chosen(&answers, &chosen), vec![11]);
    }

    #[test]
    fn snapshot_is_empty_when_every_pick_was_wrong() {
        let (_, answers) = fixture();
        let chosen = HashSet::from([12, 22]);
        assert_eq!(correct_chosen(&answers, &chosen), Vec::<i32>::new());
    }

    #[test]
    fn quiz_without_questions_reads_completed() {
        // strict count equality; unreachable through authoring, which
        // rejects empty quizzes
        let detail = assemble_detail(quiz(), vec![], vec![], &HashSet::new());
        assert!(detail.is_completed);
    }

    #[test]
    fn hidden_answer_serializes_with_null_after_title() {
        let (questions, answers) = fixture();
        let detail = assemble_detail(quiz(), questions, answers, &HashSet::new());
        let value = serde_json::to_value(&detail).unwrap();
        let first = &value["questions"][0]["answers"][0];
        assert_eq!(first["correctness"], "hidden");
        assert_eq!(first["after_title"], serde_json::Value::Null);
        assert_eq!(first["is_chosen"], false);
    }

    #[test]
    fn tallies_split_picks_by_grade() {
        let rows = vec![
            TallyRow { question_id: 10, answer_id: 11, is_correct: true, picks: 3 },
            TallyRow { question_id: 10, answer_id: 12, is_correct: false, picks: 2 },
            TallyRow { question_id: 20, answer_id: 21, is_correct: true, picks: 0 },
            TallyRow { question_id: 20, answer_id: 22, is_correct: false, picks: 5 },
        ];
        let stats = fold_tallies(1, rows);
        assert_eq!(stats.quiz_id, 1);
        assert_eq!(stats.questions.len(), 2);

        let q1 = &stats.questions[0];
        assert_eq!((q1.correct, q1.incorrect), (3, 2));
        assert_eq!(q1.correct + q1.incorrect, q1.answers.iter().map(|a| a.picks).sum::<i64>());

        let q2 = &stats.questions[1];
        assert_eq!((q2.correct, q2.incorrect), (0, 5));
    }
}
