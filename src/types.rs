use indexmap::IndexMap;
use serde::Serialize;
use std::fmt;

/// Coverage classification shared by buckets, quotas and situations.
///
/// Variant order is the situation sort priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CoverageStatus {
    Unmet,
    Partial,
    Warning,
    #[default]
    Met,
}

impl CoverageStatus {
    /// `unmet` when nothing was scripted against a positive target,
    /// `partial` when short of it, `met` otherwise.
    pub fn from_counts(actual: u32, target: u32) -> Self {
        if target == 0 || actual >= target {
            CoverageStatus::Met
        } else if actual == 0 {
            CoverageStatus::Unmet
        } else {
            CoverageStatus::Partial
        }
    }
}

impl fmt::Display for CoverageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CoverageStatus::Unmet => "unmet",
            CoverageStatus::Partial => "partial",
            CoverageStatus::Warning => "warning",
            CoverageStatus::Met => "met",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum QualityStatus {
    GameReady,
    Solid,
    NeedsWork,
    Struggling,
}

impl fmt::Display for QualityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            QualityStatus::GameReady => "game-ready",
            QualityStatus::Solid => "solid",
            QualityStatus::NeedsWork => "needs-work",
            QualityStatus::Struggling => "struggling",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BucketCoverage {
    pub id: String,
    pub label: String,
    pub color: Option<String>,
    pub reps: u32,
    pub target_reps: u32,
    pub delta: i64,
    pub percentage: u32,
    pub status: CoverageStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConceptCoverage {
    pub family: String,
    pub reps: u32,
    pub percentage_of_bucket: u32,
    pub uncategorized: bool,
}

/// Concept families of one bucket, busiest first.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BucketConcepts {
    pub bucket_id: String,
    pub bucket_label: String,
    pub total_reps: u32,
    pub families: Vec<ConceptCoverage>,
}

/// Quota comparison merged with execution quality for one play.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotaCoverage {
    pub play_id: String,
    pub name: String,
    pub formation: String,
    pub bucket_id: Option<String>,
    pub target: u32,
    pub actual: u32,
    pub delta: i64,
    pub status: CoverageStatus,
    pub avg_rating: f64,
    pub rated_reps: u32,
    pub low_rated_reps: u32,
    pub high_rated_reps: u32,
    pub worked_tags: Vec<String>,
    pub didnt_work_tags: Vec<String>,
    pub quality_status: Option<QualityStatus>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SituationKind {
    FieldZone,
    DownDistance,
    Special,
}

impl fmt::Display for SituationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SituationKind::FieldZone => "field-zone",
            SituationKind::DownDistance => "down-distance",
            SituationKind::Special => "special",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SituationCoverage {
    pub id: String,
    pub name: String,
    pub kind: SituationKind,
    pub on_call_sheet: bool,
    pub min_required: u32,
    pub reps_scripted: u32,
    pub call_sheet_play_count: usize,
    pub status: CoverageStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CallSheetPlay {
    pub play_id: String,
    pub name: String,
    pub formation: String,
    pub boxes: Vec<String>,
    pub reps: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayCoverage {
    pub day: String,
    pub total_reps: u32,
    pub unique_plays: usize,
    pub buckets: IndexMap<String, u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TagCount {
    pub id: String,
    pub label: String,
    pub count: u32,
}

/// Program-wide execution review aggregate.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionQuality {
    pub overall_avg_rating: f64,
    pub rated_reps: u32,
    pub worked_tags: Vec<TagCount>,
    pub didnt_work_tags: Vec<TagCount>,
}

/// A rated play whose execution is below `solid`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionIssue {
    pub play_id: String,
    pub name: String,
    pub formation: String,
    pub avg_rating: f64,
    pub rated_reps: u32,
    pub low_rated_reps: u32,
    pub quality_status: QualityStatus,
    pub didnt_work_tags: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    High,
    Medium,
    Low,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Severity::High => "high",
            Severity::Medium => "medium",
            Severity::Low => "low",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RecommendationKind {
    BucketUnderTarget,
    ConceptConcentration,
    QuotaUnmet,
    QuotaPartial,
    SituationUncovered,
    QualityStruggling,
    QualityNeedsWork,
    QuotaMetLowQuality,
    RecurringIssue,
}

impl fmt::Display for RecommendationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RecommendationKind::BucketUnderTarget => "bucket-under-target",
            RecommendationKind::ConceptConcentration => "concept-concentration",
            RecommendationKind::QuotaUnmet => "quota-unmet",
            RecommendationKind::QuotaPartial => "quota-partial",
            RecommendationKind::SituationUncovered => "situation-uncovered",
            RecommendationKind::QualityStruggling => "quality-struggling",
            RecommendationKind::QualityNeedsWork => "quality-needs-work",
            RecommendationKind::QuotaMetLowQuality => "quota-met-low-quality",
            RecommendationKind::RecurringIssue => "recurring-issue",
        };
        f.write_str(s)
    }
}

/// The record a recommendation was raised from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum RecommendationSubject {
    Bucket { bucket_id: String },
    Concept { bucket_id: String, family: String },
    Play { play_id: String },
    Situation { situation_id: String },
    Tag { tag_id: String, count: u32 },
}

impl RecommendationSubject {
    /// Identifier of the subject record, for flat exports.
    pub fn key(&self) -> String {
        match self {
            RecommendationSubject::Bucket { bucket_id } => bucket_id.clone(),
            RecommendationSubject::Concept { bucket_id, family } => {
                format!("{}/{}", bucket_id, family)
            }
            RecommendationSubject::Play { play_id } => play_id.clone(),
            RecommendationSubject::Situation { situation_id } => situation_id.clone(),
            RecommendationSubject::Tag { tag_id, .. } => tag_id.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub kind: RecommendationKind,
    pub severity: Severity,
    pub message: String,
    pub action: String,
    pub subject: RecommendationSubject,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverageSummary {
    pub total_reps: u32,
    pub unique_plays: usize,
    pub quota_count: usize,
    pub quotas_met: usize,
    pub quota_met_pct: u32,
    pub situations_tracked: usize,
    pub situations_covered: usize,
    pub situation_coverage_pct: u32,
    pub call_sheet_plays: usize,
    pub call_sheet_practiced: usize,
    pub call_sheet_practiced_pct: u32,
    pub overall_avg_rating: f64,
    pub rated_reps: u32,
    pub game_ready_plays: usize,
    pub struggling_plays: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverageReport {
    pub buckets: Vec<BucketCoverage>,
    pub concepts: Vec<BucketConcepts>,
    pub quotas: Vec<QuotaCoverage>,
    pub situations: Vec<SituationCoverage>,
    pub call_sheet_plays: Vec<CallSheetPlay>,
    pub days: Vec<DayCoverage>,
    pub summary: CoverageSummary,
    pub execution_quality: ExecutionQuality,
    pub execution_issues: Vec<ExecutionIssue>,
    pub recommendations: Vec<Recommendation>,
}
