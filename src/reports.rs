use crate::buckets::{aggregate_buckets, aggregate_concepts};
use crate::config::Thresholds;
use crate::days::breakdown_days;
use crate::model::{PlayRegistry, SetupConfig, Week};
use crate::quotas::{analyze_execution, classify_quality, compare_quotas, merge_quota_quality, ExecutionAnalysis};
use crate::recommendations::generate_recommendations;
use crate::rows::{extract_rows, ExtractedRow};
use crate::situations::{cross_reference_call_sheet, match_situations};
use crate::types::{
    CallSheetPlay, CoverageReport, CoverageStatus, CoverageSummary, ExecutionIssue, QualityStatus,
    QuotaCoverage, SituationCoverage,
};
use crate::util::percent;
use std::cmp::Ordering;
use std::collections::HashSet;
use tracing::debug;

/// Coverage report for one week using the default thresholds.
pub fn compute_coverage_report(
    week: Option<&Week>,
    plays: &PlayRegistry,
    setup: &SetupConfig,
) -> CoverageReport {
    compute_coverage_report_with(week, plays, setup, &Thresholds::default())
}

/// Coverage report for one week.
///
/// Pure: identical inputs give an identical report. An absent week gives the
/// empty default report with seven zeroed days.
pub fn compute_coverage_report_with(
    week: Option<&Week>,
    plays: &PlayRegistry,
    setup: &SetupConfig,
    thresholds: &Thresholds,
) -> CoverageReport {
    let Some(week) = week else {
        debug!("no week loaded, returning empty coverage report");
        return CoverageReport {
            days: breakdown_days(None, plays),
            ..CoverageReport::default()
        };
    };
    let rows = extract_rows(Some(week), None, None);

    let buckets = aggregate_buckets(&rows, plays, setup, &week.play_rep_targets);
    let concepts = aggregate_concepts(&rows, plays, setup);
    let execution = analyze_execution(&rows, week, setup, thresholds);
    let quotas = merge_quota_quality(
        compare_quotas(&rows, plays, &week.play_rep_targets),
        &execution,
        thresholds,
    );
    let situations = match_situations(&rows, plays, setup, week);
    let call_sheet_plays = cross_reference_call_sheet(&rows, plays, week);
    let days = breakdown_days(Some(week), plays);
    let execution_issues = execution_issues(&execution, plays, thresholds);
    let recommendations = generate_recommendations(
        &buckets,
        &concepts,
        &quotas,
        &situations,
        &execution.overall,
        thresholds,
    );
    let summary = summarize(&rows, &quotas, &situations, &call_sheet_plays, &execution, thresholds);
    debug!(
        rows = rows.len(),
        quotas = quotas.len(),
        situations = situations.len(),
        recommendations = recommendations.len(),
        "computed coverage report"
    );

    CoverageReport {
        buckets,
        concepts,
        quotas,
        situations,
        call_sheet_plays,
        days,
        summary,
        execution_quality: execution.overall,
        execution_issues,
        recommendations,
    }
}

/// Rated plays below `solid`, lowest average first.
fn execution_issues(
    execution: &ExecutionAnalysis,
    plays: &PlayRegistry,
    thresholds: &Thresholds,
) -> Vec<ExecutionIssue> {
    let mut issues: Vec<ExecutionIssue> = execution
        .by_play
        .iter()
        .filter_map(|(play_id, exec)| {
            let quality_status = classify_quality(exec.avg_rating, thresholds);
            if !matches!(quality_status, QualityStatus::NeedsWork | QualityStatus::Struggling) {
                return None;
            }
            let play = plays.get(play_id);
            Some(ExecutionIssue {
                play_id: play_id.clone(),
                name: play.map(|p| p.name.clone()).unwrap_or_else(|| play_id.clone()),
                formation: play.map(|p| p.formation.clone()).unwrap_or_default(),
                avg_rating: exec.avg_rating,
                rated_reps: exec.rated_reps,
                low_rated_reps: exec.low_rated_reps,
                quality_status,
                didnt_work_tags: exec.didnt_work_tags.clone(),
            })
        })
        .collect();
    issues.sort_by(|a, b| a.avg_rating.partial_cmp(&b.avg_rating).unwrap_or(Ordering::Equal));
    issues
}

fn summarize(
    rows: &[ExtractedRow],
    quotas: &[QuotaCoverage],
    situations: &[SituationCoverage],
    call_sheet: &[CallSheetPlay],
    execution: &ExecutionAnalysis,
    thresholds: &Thresholds,
) -> CoverageSummary {
    let scripted: Vec<&str> = rows.iter().filter_map(|r| r.play_id()).collect();
    let unique: HashSet<&str> = scripted.iter().copied().collect();

    let quotas_met = quotas.iter().filter(|q| q.status == CoverageStatus::Met).count();
    let tracked: Vec<&SituationCoverage> = situations
        .iter()
        .filter(|s| s.on_call_sheet || s.min_required > 0)
        .collect();
    let covered = tracked.iter().filter(|s| s.status == CoverageStatus::Met).count();
    let practiced = call_sheet.iter().filter(|p| p.reps > 0).count();

    let tiers: Vec<QualityStatus> = execution
        .by_play
        .values()
        .map(|exec| classify_quality(exec.avg_rating, thresholds))
        .collect();

    CoverageSummary {
        total_reps: scripted.len() as u32,
        unique_plays: unique.len(),
        quota_count: quotas.len(),
        quotas_met,
        quota_met_pct: percent(quotas_met as u32, quotas.len() as u32),
        situations_tracked: tracked.len(),
        situations_covered: covered,
        situation_coverage_pct: percent(covered as u32, tracked.len() as u32),
        call_sheet_plays: call_sheet.len(),
        call_sheet_practiced: practiced,
        call_sheet_practiced_pct: percent(practiced as u32, call_sheet.len() as u32),
        overall_avg_rating: execution.overall.overall_avg_rating,
        rated_reps: execution.overall.rated_reps,
        game_ready_plays: tiers.iter().filter(|t| **t == QualityStatus::GameReady).count(),
        struggling_plays: tiers.iter().filter(|t| **t == QualityStatus::Struggling).count(),
    }
}
