use serde::{Deserialize, Serialize};

/// Cutoffs used by the quality classifier and the recommendation rules.
///
/// Every field has a default, so a thresholds file only needs to name the
/// values it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Thresholds {
    /// Reps under target before a bucket is flagged at medium severity
    pub bucket_medium_deficit: u32,

    /// Reps under target before a bucket is flagged at high severity
    pub bucket_high_deficit: u32,

    /// Share of its bucket (percent) above which a concept family is too dominant
    pub concept_share_pct: f64,

    /// Reps a dominant family must exceed before it is flagged
    pub concept_min_reps: u32,

    /// A partial quota at or below this delta is flagged
    pub quota_partial_delta: i64,

    /// Ratings at or below this count as low-rated reps
    pub low_rating_max: u8,

    /// Ratings at or above this count as high-rated reps
    pub high_rating_min: u8,

    /// Minimum average rating for `game-ready`
    pub game_ready_min: f64,

    /// Minimum average rating for `solid`
    pub solid_min: f64,

    /// Minimum average rating for `needs-work`; anything lower is `struggling`
    pub needs_work_min: f64,

    /// A met quota with an average below this is flagged as low quality
    pub low_quality_avg: f64,

    /// Occurrences of the top "didn't work" tag for a medium callout
    pub recurring_issue_medium: u32,

    /// Occurrences of the top "didn't work" tag for a high callout
    pub recurring_issue_high: u32,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            bucket_medium_deficit: 5,
            bucket_high_deficit: 10,
            concept_share_pct: 60.0,
            concept_min_reps: 5,
            quota_partial_delta: -3,
            low_rating_max: 2,
            high_rating_min: 4,
            game_ready_min: 4.0,
            solid_min: 3.0,
            needs_work_min: 2.0,
            low_quality_avg: 3.0,
            recurring_issue_medium: 3,
            recurring_issue_high: 5,
        }
    }
}
