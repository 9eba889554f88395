use std::collections::BTreeMap;
use std::sync::Arc;

use crate::errors::AppResult;
use crate::models::domain::QuizResult;
use crate::models::dto::response::{GradeEntryView, GradebookView, SubjectSummaryView};
use crate::repositories::{GradeRepository, QuizResultRepository};

/// Read-side of the gradebook: groups a learner's grades by subject and
/// computes the averages the dashboards show. Depends only on the Grade
/// shape the reconciliation service persists.
pub struct GradebookService {
    grades: Arc<dyn GradeRepository>,
    quiz_results: Arc<dyn QuizResultRepository>,
}

impl GradebookService {
    pub fn new(
        grades: Arc<dyn GradeRepository>,
        quiz_results: Arc<dyn QuizResultRepository>,
    ) -> Self {
        Self {
            grades,
            quiz_results,
        }
    }

    pub async fn gradebook(&self, learner_id: &str) -> AppResult<GradebookView> {
        let grades = self.grades.find_by_learner(learner_id).await?;

        let mut by_subject: BTreeMap<String, Vec<GradeEntryView>> = BTreeMap::new();
        for grade in &grades {
            let subject = if grade.subject.is_empty() {
                "General".to_string()
            } else {
                grade.subject.clone()
            };
            by_subject
                .entry(subject)
                .or_default()
                .push(GradeEntryView::from(grade));
        }

        let subjects: Vec<SubjectSummaryView> = by_subject
            .into_iter()
            .map(|(subject, mut entries)| {
                entries.sort_by(|a, b| b.graded_at.cmp(&a.graded_at));
                let average = round2(
                    entries.iter().map(|entry| entry.value as f64).sum::<f64>()
                        / entries.len() as f64,
                );
                SubjectSummaryView {
                    subject,
                    average,
                    grades: entries,
                }
            })
            .collect();

        let overall_average = if subjects.is_empty() {
            None
        } else {
            Some(round2(
                subjects.iter().map(|s| s.average).sum::<f64>() / subjects.len() as f64,
            ))
        };

        Ok(GradebookView {
            learner_id: learner_id.to_string(),
            total_grades: grades.len(),
            subjects,
            overall_average,
        })
    }

    /// Result review: every persisted submission for a (learner, quiz)
    /// pair, most recent first.
    pub async fn quiz_results(
        &self,
        learner_id: &str,
        quiz_id: &str,
    ) -> AppResult<Vec<QuizResult>> {
        self.quiz_results
            .find_by_learner_and_quiz(learner_id, quiz_id)
            .await
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::domain::Grade;
    use crate::repositories::grade_repository::MockGradeRepository;
    use crate::repositories::quiz_result_repository::MockQuizResultRepository;

    fn grade(subject: &str, quiz_id: &str, value: u8) -> Grade {
        Grade::new(
            "learner-1",
            "course-1",
            quiz_id,
            "Some quiz",
            subject,
            match value {
                5 => 95,
                4 => 80,
                3 => 65,
                2 => 45,
                _ => 20,
            },
            1,
            "teacher-1",
        )
    }

    fn service(grades: MockGradeRepository) -> GradebookService {
        GradebookService::new(Arc::new(grades), Arc::new(MockQuizResultRepository::new()))
    }

    #[tokio::test]
    async fn grades_group_by_subject_with_averages() {
        let mut repository = MockGradeRepository::new();
        repository.expect_find_by_learner().returning(|_| {
            Ok(vec![
                grade("Math", "quiz-1", 5),
                grade("Math", "quiz-2", 4),
                grade("History", "quiz-3", 3),
            ])
        });

        let view = service(repository)
            .gradebook("learner-1")
            .await
            .expect("gradebook should build");

        assert_eq!(view.total_grades, 3);
        assert_eq!(view.subjects.len(), 2);

        let history = &view.subjects[0];
        assert_eq!(history.subject, "History");
        assert_eq!(history.average, 3.0);

        let math = &view.subjects[1];
        assert_eq!(math.subject, "Math");
        assert_eq!(math.average, 4.5);

        // overall = mean of subject averages
        assert_eq!(view.overall_average, Some(3.75));
    }

    #[tokio::test]
    async fn empty_gradebook_has_no_average() {
        let mut repository = MockGradeRepository::new();
        repository.expect_find_by_learner().returning(|_| Ok(vec![]));

        let view = service(repository)
            .gradebook("learner-1")
            .await
            .expect("gradebook should build");

        assert_eq!(view.total_grades, 0);
        assert!(view.subjects.is_empty());
        assert_eq!(view.overall_average, None);
    }

    #[tokio::test]
    async fn grades_without_a_subject_land_in_general() {
        let mut repository = MockGradeRepository::new();
        repository
            .expect_find_by_learner()
            .returning(|_| Ok(vec![grade("", "quiz-1", 4)]));

        let view = service(repository)
            .gradebook("learner-1")
            .await
            .expect("gradebook should build");

        assert_eq!(view.subjects[0].subject, "General");
    }
}
