use crate::config::Thresholds;
use crate::model::{PlayRegistry, SetupConfig, TagConfig, Week};
use crate::rows::ExtractedRow;
use crate::types::{CoverageStatus, ExecutionQuality, QualityStatus, QuotaCoverage, TagCount};
use crate::util::average;
use indexmap::IndexMap;
use std::collections::HashMap;

/// Scripted reps against one play's weekly target.
#[derive(Debug, Clone, PartialEq)]
pub struct QuotaComparison {
    pub play_id: String,
    pub name: String,
    pub formation: String,
    pub bucket_id: Option<String>,
    pub target: u32,
    pub actual: u32,
    pub delta: i64,
    pub status: CoverageStatus,
}

/// Review ratings collected for one play.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayExecution {
    pub ratings: Vec<u8>,
    pub avg_rating: f64,
    pub rated_reps: u32,
    pub low_rated_reps: u32,
    pub high_rated_reps: u32,
    pub worked_tags: Vec<String>,
    pub didnt_work_tags: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExecutionAnalysis {
    /// Rated plays in first-rated order.
    pub by_play: IndexMap<String, PlayExecution>,
    pub overall: ExecutionQuality,
}

/// Compare scripted reps with every positive rep target, most-under first.
///
/// Targets naming a play missing from the registry are skipped.
pub fn compare_quotas(
    rows: &[ExtractedRow],
    plays: &PlayRegistry,
    targets: &IndexMap<String, u32>,
) -> Vec<QuotaComparison> {
    let mut actuals: HashMap<&str, u32> = HashMap::new();
    for r in rows {
        if let Some(id) = r.play_id() {
            *actuals.entry(id).or_default() += 1;
        }
    }

    let mut quotas: Vec<QuotaComparison> = targets
        .iter()
        .filter(|(_, target)| **target > 0)
        .filter_map(|(play_id, target)| {
            let play = plays.get(play_id)?;
            let actual = actuals.get(play_id.as_str()).copied().unwrap_or(0);
            Some(QuotaComparison {
                play_id: play_id.clone(),
                name: play.name.clone(),
                formation: play.formation.clone(),
                bucket_id: play.bucket().map(String::from),
                target: *target,
                actual,
                delta: actual as i64 - *target as i64,
                status: CoverageStatus::from_counts(actual, *target),
            })
        })
        .collect();
    quotas.sort_by_key(|q| q.delta);
    quotas
}

/// Gather review ratings for every scripted row that has one.
pub fn analyze_execution(
    rows: &[ExtractedRow],
    week: &Week,
    setup: &SetupConfig,
    thresholds: &Thresholds,
) -> ExecutionAnalysis {
    let mut by_play: IndexMap<String, PlayExecution> = IndexMap::new();
    let mut all_ratings: Vec<f64> = Vec::new();
    let mut worked: HashMap<&str, u32> = HashMap::new();
    let mut didnt_work: HashMap<&str, u32> = HashMap::new();

    for r in rows {
        let Some(play_id) = r.play_id() else {
            continue;
        };
        let Some(review) = week
            .practice_reviews
            .get(r.day)
            .and_then(|day| day.script_reviews.get(&r.row.id))
        else {
            continue;
        };
        let Some(rating) = review.rating else {
            continue;
        };

        let entry = by_play.entry(play_id.to_string()).or_default();
        entry.ratings.push(rating);
        entry.rated_reps += 1;
        if rating <= thresholds.low_rating_max {
            entry.low_rated_reps += 1;
        }
        if rating >= thresholds.high_rating_min {
            entry.high_rated_reps += 1;
        }
        for tag in &review.worked_tags {
            if !entry.worked_tags.contains(tag) {
                entry.worked_tags.push(tag.clone());
            }
            *worked.entry(tag.as_str()).or_default() += 1;
        }
        for tag in &review.didnt_work_tags {
            if !entry.didnt_work_tags.contains(tag) {
                entry.didnt_work_tags.push(tag.clone());
            }
            *didnt_work.entry(tag.as_str()).or_default() += 1;
        }
        all_ratings.push(rating as f64);
    }

    for exec in by_play.values_mut() {
        let ratings: Vec<f64> = exec.ratings.iter().map(|r| *r as f64).collect();
        exec.avg_rating = average(&ratings);
    }

    let overall = ExecutionQuality {
        overall_avg_rating: average(&all_ratings),
        rated_reps: all_ratings.len() as u32,
        worked_tags: tag_counts(&setup.film_review_tags.worked, &worked),
        didnt_work_tags: tag_counts(&setup.film_review_tags.didnt_work, &didnt_work),
    };
    ExecutionAnalysis { by_play, overall }
}

fn tag_counts(configured: &[TagConfig], seen: &HashMap<&str, u32>) -> Vec<TagCount> {
    let mut counts: Vec<TagCount> = configured
        .iter()
        .filter_map(|tag| {
            let count = seen.get(tag.id.as_str()).copied().unwrap_or(0);
            (count > 0).then(|| TagCount {
                id: tag.id.clone(),
                label: tag.display_label().to_string(),
                count,
            })
        })
        .collect();
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts
}

/// Quality tier for an average rating.
pub fn classify_quality(avg_rating: f64, thresholds: &Thresholds) -> QualityStatus {
    if avg_rating >= thresholds.game_ready_min {
        QualityStatus::GameReady
    } else if avg_rating >= thresholds.solid_min {
        QualityStatus::Solid
    } else if avg_rating >= thresholds.needs_work_min {
        QualityStatus::NeedsWork
    } else {
        QualityStatus::Struggling
    }
}

/// Attach execution quality to each quota, keeping quota order.
pub fn merge_quota_quality(
    quotas: Vec<QuotaComparison>,
    execution: &ExecutionAnalysis,
    thresholds: &Thresholds,
) -> Vec<QuotaCoverage> {
    quotas
        .into_iter()
        .map(|q| {
            let exec = execution.by_play.get(&q.play_id).cloned().unwrap_or_default();
            let quality_status =
                (exec.rated_reps > 0).then(|| classify_quality(exec.avg_rating, thresholds));
            QuotaCoverage {
                play_id: q.play_id,
                name: q.name,
                formation: q.formation,
                bucket_id: q.bucket_id,
                target: q.target,
                actual: q.actual,
                delta: q.delta,
                status: q.status,
                avg_rating: exec.avg_rating,
                rated_reps: exec.rated_reps,
                low_rated_reps: exec.low_rated_reps,
                high_rated_reps: exec.high_rated_reps,
                worked_tags: exec.worked_tags,
                didnt_work_tags: exec.didnt_work_tags,
                quality_status,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Play, PracticeReview, ScriptReview, ScriptRow, Segment};
    use crate::rows::extract_rows;

    fn week(rows: &[(&str, &str)]) -> Week {
        let mut week = Week::default();
        week.practice_plans.entry("Monday".into()).or_default().segments.push(Segment {
            id: "s1".into(),
            script: rows
                .iter()
                .map(|(id, play)| ScriptRow {
                    id: id.to_string(),
                    play_id: Some(play.to_string()),
                })
                .collect(),
            ..Default::default()
        });
        week
    }

    fn review(rating: Option<u8>, worked: &[&str], didnt: &[&str]) -> ScriptReview {
        ScriptReview {
            rating,
            worked_tags: worked.iter().map(|t| t.to_string()).collect(),
            didnt_work_tags: didnt.iter().map(|t| t.to_string()).collect(),
        }
    }

    fn registry(ids: &[&str]) -> PlayRegistry {
        ids.iter()
            .map(|id| {
                (
                    id.to_string(),
                    Play {
                        name: id.to_uppercase(),
                        ..Default::default()
                    },
                )
            })
            .collect()
    }

    #[test]
    fn test_quotas_sorted_most_under_first() {
        let week = week(&[("r1", "a"), ("r2", "b"), ("r3", "b"), ("r4", "b")]);
        let rows = extract_rows(Some(&week), None, None);
        let plays = registry(&["a", "b", "c"]);
        let mut targets = IndexMap::new();
        targets.insert("a".to_string(), 3);
        targets.insert("b".to_string(), 2);
        targets.insert("c".to_string(), 2);
        targets.insert("ghost".to_string(), 9);
        targets.insert("zero".to_string(), 0);

        let quotas = compare_quotas(&rows, &plays, &targets);
        let summary: Vec<(&str, i64, CoverageStatus)> = quotas
            .iter()
            .map(|q| (q.play_id.as_str(), q.delta, q.status))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("a", -2, CoverageStatus::Partial),
                ("c", -2, CoverageStatus::Unmet),
                ("b", 1, CoverageStatus::Met),
            ]
        );
    }

    #[test]
    fn test_execution_collects_ratings_and_tags() {
        let mut week = week(&[("r1", "a"), ("r2", "a"), ("r3", "a"), ("r4", "b")]);
        let mut reviews = PracticeReview::default();
        reviews
            .script_reviews
            .insert("r1".into(), review(Some(5), &["timing"], &[]));
        reviews
            .script_reviews
            .insert("r2".into(), review(Some(2), &["timing"], &["drop", "pressure"]));
        reviews.script_reviews.insert("r3".into(), review(None, &["ignored"], &["drop"]));
        reviews.script_reviews.insert("r4".into(), review(Some(1), &[], &["drop"]));
        week.practice_reviews.insert("Monday".into(), reviews);
        let mut setup = SetupConfig::default();
        setup.film_review_tags.didnt_work = vec![
            TagConfig {
                id: "pressure".into(),
                label: Some("Pressure".into()),
                ..Default::default()
            },
            TagConfig {
                id: "drop".into(),
                name: Some("Drop".into()),
                ..Default::default()
            },
        ];
        let rows = extract_rows(Some(&week), None, None);

        let analysis = analyze_execution(&rows, &week, &setup, &Thresholds::default());
        let a = &analysis.by_play["a"];
        assert_eq!(a.ratings, vec![5, 2]);
        assert_eq!(a.avg_rating, 3.5);
        assert_eq!((a.rated_reps, a.low_rated_reps, a.high_rated_reps), (2, 1, 1));
        assert_eq!(a.worked_tags, vec!["timing"]);
        assert_eq!(a.didnt_work_tags, vec!["drop", "pressure"]);

        assert_eq!(analysis.overall.rated_reps, 3);
        assert!((analysis.overall.overall_avg_rating - 8.0 / 3.0).abs() < 1e-9);
        let didnt: Vec<(&str, u32)> = analysis
            .overall
            .didnt_work_tags
            .iter()
            .map(|t| (t.label.as_str(), t.count))
            .collect();
        assert_eq!(didnt, vec![("Drop", 2), ("Pressure", 1)]);
        assert!(analysis.overall.worked_tags.is_empty());
    }

    #[test]
    fn test_quality_bands() {
        let t = Thresholds::default();
        assert_eq!(classify_quality(4.0, &t), QualityStatus::GameReady);
        assert_eq!(classify_quality(3.99, &t), QualityStatus::Solid);
        assert_eq!(classify_quality(3.0, &t), QualityStatus::Solid);
        assert_eq!(classify_quality(2.0, &t), QualityStatus::NeedsWork);
        assert_eq!(classify_quality(1.5, &t), QualityStatus::Struggling);
    }

    #[test]
    fn test_unrated_quota_has_no_quality_status() {
        let quota = QuotaComparison {
            play_id: "a".into(),
            name: "A".into(),
            formation: String::new(),
            bucket_id: None,
            target: 2,
            actual: 2,
            delta: 0,
            status: CoverageStatus::Met,
        };
        let merged = merge_quota_quality(vec![quota], &ExecutionAnalysis::default(), &Thresholds::default());
        assert_eq!(merged[0].quality_status, None);
        assert_eq!(merged[0].rated_reps, 0);
        assert_eq!(merged[0].avg_rating, 0.0);
    }
}
