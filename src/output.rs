use crate::error::Result;
use crate::types::{
    BucketCoverage, CallSheetPlay, CoverageReport, DayCoverage, QuotaCoverage, Recommendation,
    SituationCoverage,
};
use crate::util::format_number;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tabled::{settings::Style, Table, Tabled};
use tracing::debug;

pub fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    for r in rows {
        wtr.serialize(r)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let s = serde_json::to_string_pretty(value)?;
    std::fs::write(path, s)?;
    Ok(())
}

pub fn preview_table_rows<T>(rows: &[T], max_rows: usize)
where
    T: Tabled + Clone,
{
    let slice: Vec<T> = rows.iter().cloned().take(max_rows).collect();
    if slice.is_empty() {
        println!("(no rows)\n");
        return;
    }
    let table_str = Table::new(slice).with(Style::markdown()).to_string();
    println!("{}\n", table_str);
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct BucketRow {
    #[serde(rename = "Bucket")]
    #[tabled(rename = "Bucket")]
    pub bucket: String,
    #[serde(rename = "Reps")]
    #[tabled(rename = "Reps")]
    pub reps: u32,
    #[serde(rename = "Target")]
    #[tabled(rename = "Target")]
    pub target: u32,
    #[serde(rename = "Delta")]
    #[tabled(rename = "Delta")]
    pub delta: i64,
    #[serde(rename = "Share")]
    #[tabled(rename = "Share")]
    pub share: String,
    #[serde(rename = "Status")]
    #[tabled(rename = "Status")]
    pub status: String,
}

impl From<&BucketCoverage> for BucketRow {
    fn from(b: &BucketCoverage) -> Self {
        Self {
            bucket: b.label.clone(),
            reps: b.reps,
            target: b.target_reps,
            delta: b.delta,
            share: format!("{}%", b.percentage),
            status: b.status.to_string(),
        }
    }
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct QuotaRow {
    #[serde(rename = "Play")]
    #[tabled(rename = "Play")]
    pub play: String,
    #[serde(rename = "Target")]
    #[tabled(rename = "Target")]
    pub target: u32,
    #[serde(rename = "Actual")]
    #[tabled(rename = "Actual")]
    pub actual: u32,
    #[serde(rename = "Delta")]
    #[tabled(rename = "Delta")]
    pub delta: i64,
    #[serde(rename = "Status")]
    #[tabled(rename = "Status")]
    pub status: String,
    #[serde(rename = "AvgRating")]
    #[tabled(rename = "AvgRating")]
    pub avg_rating: String,
    #[serde(rename = "RatedReps")]
    #[tabled(rename = "RatedReps")]
    pub rated_reps: u32,
    #[serde(rename = "Quality")]
    #[tabled(rename = "Quality")]
    pub quality: String,
}

impl From<&QuotaCoverage> for QuotaRow {
    fn from(q: &QuotaCoverage) -> Self {
        Self {
            play: format!("{} {}", q.formation, q.name).trim().to_string(),
            target: q.target,
            actual: q.actual,
            delta: q.delta,
            status: q.status.to_string(),
            avg_rating: if q.rated_reps > 0 {
                format_number(q.avg_rating, 2)
            } else {
                "-".to_string()
            },
            rated_reps: q.rated_reps,
            quality: q
                .quality_status
                .map(|s| s.to_string())
                .unwrap_or_else(|| "-".to_string()),
        }
    }
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct SituationRow {
    #[serde(rename = "Situation")]
    #[tabled(rename = "Situation")]
    pub situation: String,
    #[serde(rename = "Kind")]
    #[tabled(rename = "Kind")]
    pub kind: String,
    #[serde(rename = "OnCallSheet")]
    #[tabled(rename = "OnCallSheet")]
    pub on_call_sheet: bool,
    #[serde(rename = "MinRequired")]
    #[tabled(rename = "MinRequired")]
    pub min_required: u32,
    #[serde(rename = "Reps")]
    #[tabled(rename = "Reps")]
    pub reps: u32,
    #[serde(rename = "Status")]
    #[tabled(rename = "Status")]
    pub status: String,
}

impl From<&SituationCoverage> for SituationRow {
    fn from(s: &SituationCoverage) -> Self {
        Self {
            situation: s.name.clone(),
            kind: s.kind.to_string(),
            on_call_sheet: s.on_call_sheet,
            min_required: s.min_required,
            reps: s.reps_scripted,
            status: s.status.to_string(),
        }
    }
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct CallSheetRow {
    #[serde(rename = "Play")]
    #[tabled(rename = "Play")]
    pub play: String,
    #[serde(rename = "Boxes")]
    #[tabled(rename = "Boxes")]
    pub boxes: String,
    #[serde(rename = "Reps")]
    #[tabled(rename = "Reps")]
    pub reps: u32,
}

impl From<&CallSheetPlay> for CallSheetRow {
    fn from(p: &CallSheetPlay) -> Self {
        Self {
            play: format!("{} {}", p.formation, p.name).trim().to_string(),
            boxes: p.boxes.join("; "),
            reps: p.reps,
        }
    }
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct DayRow {
    #[serde(rename = "Day")]
    #[tabled(rename = "Day")]
    pub day: String,
    #[serde(rename = "TotalReps")]
    #[tabled(rename = "TotalReps")]
    pub total_reps: u32,
    #[serde(rename = "UniquePlays")]
    #[tabled(rename = "UniquePlays")]
    pub unique_plays: usize,
    #[serde(rename = "Buckets")]
    #[tabled(rename = "Buckets")]
    pub buckets: String,
}

impl From<&DayCoverage> for DayRow {
    fn from(d: &DayCoverage) -> Self {
        Self {
            day: d.day.clone(),
            total_reps: d.total_reps,
            unique_plays: d.unique_plays,
            buckets: d
                .buckets
                .iter()
                .map(|(bucket, reps)| format!("{}={}", bucket, reps))
                .collect::<Vec<_>>()
                .join("; "),
        }
    }
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct RecommendationRow {
    #[serde(rename = "Severity")]
    #[tabled(rename = "Severity")]
    pub severity: String,
    #[serde(rename = "Kind")]
    #[tabled(rename = "Kind")]
    pub kind: String,
    #[serde(rename = "Message")]
    #[tabled(rename = "Message")]
    pub message: String,
    #[serde(rename = "Action")]
    #[tabled(rename = "Action")]
    pub action: String,
    #[serde(rename = "Subject")]
    #[tabled(rename = "Subject")]
    pub subject: String,
}

impl From<&Recommendation> for RecommendationRow {
    fn from(r: &Recommendation) -> Self {
        Self {
            severity: r.severity.to_string(),
            kind: r.kind.to_string(),
            message: r.message.clone(),
            action: r.action.clone(),
            subject: r.subject.key(),
        }
    }
}

pub fn rows_of<'a, S: 'a, T: From<&'a S>>(items: &'a [S]) -> Vec<T> {
    items.iter().map(T::from).collect()
}

/// Write every table as CSV plus the full report as JSON into `dir`.
pub fn write_report(dir: &Path, report: &CoverageReport) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)?;
    let files = [
        "buckets.csv",
        "quotas.csv",
        "situations.csv",
        "call_sheet.csv",
        "days.csv",
        "recommendations.csv",
        "coverage_report.json",
    ];
    let paths: Vec<PathBuf> = files.iter().map(|f| dir.join(f)).collect();
    write_csv(&paths[0], &rows_of::<_, BucketRow>(&report.buckets))?;
    write_csv(&paths[1], &rows_of::<_, QuotaRow>(&report.quotas))?;
    write_csv(&paths[2], &rows_of::<_, SituationRow>(&report.situations))?;
    write_csv(&paths[3], &rows_of::<_, CallSheetRow>(&report.call_sheet_plays))?;
    write_csv(&paths[4], &rows_of::<_, DayRow>(&report.days))?;
    write_csv(&paths[5], &rows_of::<_, RecommendationRow>(&report.recommendations))?;
    write_json(&paths[6], report)?;
    debug!(dir = %dir.display(), files = paths.len(), "wrote report files");
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CoverageStatus, QualityStatus};

    #[test]
    fn test_quota_row_formats_unrated_as_dash() {
        let mut quota = QuotaCoverage {
            play_id: "p1".into(),
            name: "Mesh".into(),
            formation: "Gun".into(),
            bucket_id: None,
            target: 4,
            actual: 2,
            delta: -2,
            status: CoverageStatus::Partial,
            avg_rating: 0.0,
            rated_reps: 0,
            low_rated_reps: 0,
            high_rated_reps: 0,
            worked_tags: vec![],
            didnt_work_tags: vec![],
            quality_status: None,
        };
        let row = QuotaRow::from(&quota);
        assert_eq!(row.play, "Gun Mesh");
        assert_eq!(row.avg_rating, "-");
        assert_eq!(row.quality, "-");
        assert_eq!(row.status, "partial");

        quota.rated_reps = 2;
        quota.avg_rating = 4.5;
        quota.quality_status = Some(QualityStatus::GameReady);
        let row = QuotaRow::from(&quota);
        assert_eq!(row.avg_rating, "4.50");
        assert_eq!(row.quality, "game-ready");
    }
}
