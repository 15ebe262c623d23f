use crate::config::Thresholds;
use crate::types::{
    BucketConcepts, BucketCoverage, CoverageStatus, ExecutionQuality, QualityStatus,
    QuotaCoverage, Recommendation, RecommendationKind, RecommendationSubject, Severity,
    SituationCoverage,
};

fn play_label(q: &QuotaCoverage) -> String {
    format!("{} {}", q.formation, q.name).trim().to_string()
}

fn recommend(
    kind: RecommendationKind,
    severity: Severity,
    message: String,
    action: String,
    subject: RecommendationSubject,
) -> Recommendation {
    Recommendation {
        kind,
        severity,
        message,
        action,
        subject,
    }
}

fn bucket_rules(buckets: &[BucketCoverage], t: &Thresholds, out: &mut Vec<Recommendation>) {
    for b in buckets {
        let deficit = -b.delta;
        let severity = if deficit > t.bucket_high_deficit as i64 {
            Severity::High
        } else if deficit > t.bucket_medium_deficit as i64 {
            Severity::Medium
        } else {
            continue;
        };
        out.push(recommend(
            RecommendationKind::BucketUnderTarget,
            severity,
            format!(
                "{} is {} reps under target ({}/{})",
                b.label, deficit, b.reps, b.target_reps
            ),
            format!("Script {} more {} reps this week", deficit, b.label),
            RecommendationSubject::Bucket {
                bucket_id: b.id.clone(),
            },
        ));
    }
}

fn concept_rules(concepts: &[BucketConcepts], t: &Thresholds, out: &mut Vec<Recommendation>) {
    for bucket in concepts {
        if bucket.total_reps == 0 {
            continue;
        }
        for family in &bucket.families {
            let share = family.reps as f64 * 100.0 / bucket.total_reps as f64;
            if share > t.concept_share_pct && family.reps > t.concept_min_reps {
                out.push(recommend(
                    RecommendationKind::ConceptConcentration,
                    Severity::Low,
                    format!(
                        "{} makes up {}% of {} reps",
                        family.family, family.percentage_of_bucket, bucket.bucket_label
                    ),
                    format!("Diversify {} with other concept families", bucket.bucket_label),
                    RecommendationSubject::Concept {
                        bucket_id: bucket.bucket_id.clone(),
                        family: family.family.clone(),
                    },
                ));
            }
        }
    }
}

fn quota_rules(quotas: &[QuotaCoverage], t: &Thresholds, out: &mut Vec<Recommendation>) {
    for q in quotas {
        let subject = || RecommendationSubject::Play {
            play_id: q.play_id.clone(),
        };
        match q.status {
            CoverageStatus::Unmet => out.push(recommend(
                RecommendationKind::QuotaUnmet,
                Severity::High,
                format!("{} has no reps scripted (target {})", play_label(q), q.target),
                format!("Add {} to the script", play_label(q)),
                subject(),
            )),
            CoverageStatus::Partial if q.delta <= t.quota_partial_delta => out.push(recommend(
                RecommendationKind::QuotaPartial,
                Severity::Medium,
                format!(
                    "{} is {} reps short ({}/{})",
                    play_label(q),
                    -q.delta,
                    q.actual,
                    q.target
                ),
                format!("Add {} more reps of {}", -q.delta, play_label(q)),
                subject(),
            )),
            _ => {}
        }
    }
}

fn situation_rules(situations: &[SituationCoverage], out: &mut Vec<Recommendation>) {
    for s in situations.iter().filter(|s| s.on_call_sheet) {
        let severity = match s.status {
            CoverageStatus::Unmet => Severity::High,
            CoverageStatus::Partial => Severity::Medium,
            CoverageStatus::Warning => Severity::Low,
            CoverageStatus::Met => continue,
        };
        let message = if s.min_required > 0 {
            format!(
                "{} is on the call sheet with {}/{} required reps",
                s.name, s.reps_scripted, s.min_required
            )
        } else {
            format!("{} is on the call sheet but has no reps scripted", s.name)
        };
        out.push(recommend(
            RecommendationKind::SituationUncovered,
            severity,
            message,
            format!("Script {} reps before game day", s.name),
            RecommendationSubject::Situation {
                situation_id: s.id.clone(),
            },
        ));
    }
}

fn quality_rules(quotas: &[QuotaCoverage], t: &Thresholds, out: &mut Vec<Recommendation>) {
    for q in quotas {
        let subject = || RecommendationSubject::Play {
            play_id: q.play_id.clone(),
        };
        if q.actual > 0 {
            match q.quality_status {
                Some(QualityStatus::Struggling) => out.push(recommend(
                    RecommendationKind::QualityStruggling,
                    Severity::High,
                    format!(
                        "{} is struggling (avg {:.1} over {} rated reps)",
                        play_label(q),
                        q.avg_rating,
                        q.rated_reps
                    ),
                    format!("Review film on {} and consider trimming it from the plan", play_label(q)),
                    subject(),
                )),
                Some(QualityStatus::NeedsWork) => out.push(recommend(
                    RecommendationKind::QualityNeedsWork,
                    Severity::Medium,
                    format!("{} needs work (avg {:.1})", play_label(q), q.avg_rating),
                    format!("Rep {} in individual and group periods", play_label(q)),
                    subject(),
                )),
                _ => {}
            }
        }
        if q.status == CoverageStatus::Met && q.rated_reps > 0 && q.avg_rating < t.low_quality_avg {
            out.push(recommend(
                RecommendationKind::QuotaMetLowQuality,
                Severity::Medium,
                format!(
                    "{} met quota but quality is low (avg {:.1})",
                    play_label(q),
                    q.avg_rating
                ),
                format!("Focus {} reps on execution, not volume", play_label(q)),
                subject(),
            ));
        }
    }
}

fn recurring_issue_rule(execution: &ExecutionQuality, t: &Thresholds, out: &mut Vec<Recommendation>) {
    let Some(top) = execution.didnt_work_tags.first() else {
        return;
    };
    let severity = if top.count >= t.recurring_issue_high {
        Severity::High
    } else if top.count >= t.recurring_issue_medium {
        Severity::Medium
    } else {
        return;
    };
    out.push(recommend(
        RecommendationKind::RecurringIssue,
        severity,
        format!("\"{}\" was flagged {} times this week", top.label, top.count),
        format!("Build a drill that addresses \"{}\"", top.label),
        RecommendationSubject::Tag {
            tag_id: top.id.clone(),
            count: top.count,
        },
    ));
}

/// Action items from every derived structure, high severity first.
pub fn generate_recommendations(
    buckets: &[BucketCoverage],
    concepts: &[BucketConcepts],
    quotas: &[QuotaCoverage],
    situations: &[SituationCoverage],
    execution: &ExecutionQuality,
    thresholds: &Thresholds,
) -> Vec<Recommendation> {
    let mut out = Vec::new();
    bucket_rules(buckets, thresholds, &mut out);
    concept_rules(concepts, thresholds, &mut out);
    quota_rules(quotas, thresholds, &mut out);
    situation_rules(situations, &mut out);
    quality_rules(quotas, thresholds, &mut out);
    recurring_issue_rule(execution, thresholds, &mut out);
    out.sort_by_key(|r| r.severity);
    out
}
