use std::sync::Arc;

use crate::{
    error::AppResult,
    models::{JobId, Recommendation, RecommendationRequest},
    services::{
        classifier::ClassifierAdapter,
        scorer::{Scorer, SkillSet},
        weights::WeightTable,
    },
};

/// Number of job ids returned per request
pub const MAX_RECOMMENDATIONS: usize = 3;

/// Scores, filters and ranks candidate jobs for one user
///
/// Holds only read-only state, so one instance is shared by every request.
#[derive(Clone)]
pub struct Recommender {
    scorer: Scorer,
    classifier: ClassifierAdapter,
}

impl Recommender {
    pub fn new(weights: Arc<WeightTable>, classifier: ClassifierAdapter) -> Self {
        Self {
            scorer: Scorer::new(weights),
            classifier,
        }
    }

    pub fn classifier(&self) -> &ClassifierAdapter {
        &self.classifier
    }

    /// Returns the ids of the best matching jobs, best first
    ///
    /// Jobs are scored in input order. Any classifier failure aborts the
    /// whole request; no partial list is ever returned.
    pub fn recommend(&self, request: RecommendationRequest) -> AppResult<Vec<JobId>> {
        let user_skills = SkillSet::parse(request.user_profile.skills.as_str());
        let mut candidates = Vec::new();

        for job in request.jobs {
            let job_skills = SkillSet::parse(job.skills.as_str());
            let score = self.scorer.score_sets(&user_skills, &job_skills);
            let is_match = self.classifier.is_match(score)?;

            tracing::debug!(job_id = %job.id, score, is_match, "Scored job");

            if is_match {
                candidates.push(Recommendation {
                    job_id: job.id,
                    score,
                });
            }
        }

        Ok(top_job_ids(candidates, MAX_RECOMMENDATIONS))
    }
}

/// Ranks candidates by descending score and keeps the first `limit` ids
///
/// The sort is stable, so equal scores keep their input order.
pub fn top_job_ids(mut candidates: Vec<Recommendation>, limit: usize) -> Vec<JobId> {
    candidates.sort_by(|a, b| b.score.cmp(&a.score));
    candidates
        .into_iter()
        .take(limit)
        .map(|rec| rec.job_id)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::models::{JobPosting, SkillsField, UserProfile};
    use crate::services::classifier::{ClassifierError, MockClassifier, ThresholdClassifier};
    use crate::services::scorer::Score;
    use serde_json::json;

    fn recommender_matching_at(threshold: f64) -> Recommender {
        let classifier = ThresholdClassifier::new(vec!["final_score".to_string()], threshold).unwrap();
        Recommender::new(
            Arc::new(WeightTable::seeded()),
            ClassifierAdapter::new(Arc::new(classifier), vec!["final_score".to_string()]),
        )
    }

    fn job(id: &str, skills: &str) -> JobPosting {
        JobPosting {
            id: JobId(json!(id)),
            skills: SkillsField(skills.to_string()),
        }
    }

    fn request(user_skills: &str, jobs: Vec<JobPosting>) -> RecommendationRequest {
        RecommendationRequest {
            user_profile: UserProfile {
                skills: SkillsField(user_skills.to_string()),
            },
            jobs,
        }
    }

    fn rec(id: &str, score: Score) -> Recommendation {
        Recommendation {
            job_id: JobId(json!(id)),
            score,
        }
    }

    #[test]
    fn test_ranks_matching_jobs() {
        let recommender = recommender_matching_at(1.0);
        let ids = recommender
            .recommend(request(
                "Python|AWS",
                vec![
                    job("A", "python|docker"),
                    job("B", "java"),
                    job("C", "aws|python"),
                ],
            ))
            .unwrap();

        assert_eq!(ids, vec![JobId(json!("C")), JobId(json!("A"))]);
    }

    #[test]
    fn test_keeps_top_three() {
        let recommender = recommender_matching_at(1.0);
        let ids = recommender
            .recommend(request(
                "python|aws|html|cobol",
                vec![
                    job("one", "cobol"),
                    job("two", "html"),
                    job("three", "python"),
                    job("four", "python|aws"),
                    job("five", "html|cobol"),
                ],
            ))
            .unwrap();

        assert_eq!(
            ids,
            vec![JobId(json!("four")), JobId(json!("three")), JobId(json!("five"))]
        );
    }

    #[test]
    fn test_classifier_filters_low_scores() {
        let recommender = recommender_matching_at(4.0);
        let ids = recommender
            .recommend(request(
                "python|aws",
                vec![job("A", "python"), job("B", "python|aws")],
            ))
            .unwrap();

        assert_eq!(ids, vec![JobId(json!("B"))]);
    }

    #[test]
    fn test_no_jobs_yields_empty() {
        let recommender = recommender_matching_at(1.0);
        assert!(recommender.recommend(request("python", vec![])).unwrap().is_empty());
    }

    #[test]
    fn test_empty_skills_match_on_empty_token() {
        let recommender = recommender_matching_at(1.0);
        let ids = recommender
            .recommend(request("", vec![job("A", ""), job("B", "python")]))
            .unwrap();

        assert_eq!(ids, vec![JobId(json!("A"))]);
    }

    #[test]
    fn test_classifier_failure_aborts_request() {
        let mut mock = MockClassifier::new();
        let mut calls = 0;
        mock.expect_predict().returning(move |_| {
            calls += 1;
            if calls == 2 {
                Err(ClassifierError::MissingFeature("final_score".to_string()))
            } else {
                Ok(1)
            }
        });

        let recommender = Recommender::new(
            Arc::new(WeightTable::seeded()),
            ClassifierAdapter::new(Arc::new(mock), vec!["final_score".to_string()]),
        );

        let result = recommender.recommend(request(
            "python",
            vec![job("A", "python"), job("B", "python"), job("C", "python")],
        ));
        assert!(matches!(result, Err(AppError::Classifier(_))));
    }

    #[test]
    fn test_top_job_ids_is_stable_for_ties() {
        let ids = top_job_ids(
            vec![rec("a", 3), rec("b", 5), rec("c", 3), rec("d", 5), rec("e", 3)],
            MAX_RECOMMENDATIONS,
        );

        assert_eq!(
            ids,
            vec![JobId(json!("b")), JobId(json!("d")), JobId(json!("a"))]
        );
    }

    #[test]
    fn test_top_job_ids_with_fewer_candidates() {
        assert_eq!(
            top_job_ids(vec![rec("only", 1)], MAX_RECOMMENDATIONS),
            vec![JobId(json!("only"))]
        );
        assert!(top_job_ids(vec![], MAX_RECOMMENDATIONS).is_empty());
    }
}
