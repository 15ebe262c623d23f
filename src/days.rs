use crate::model::{PlayRegistry, Week};
use crate::rows::extract_rows;
use crate::types::DayCoverage;
use crate::util::WEEKDAY_NAMES;
use indexmap::IndexMap;
use std::collections::HashSet;

/// Per-day totals for Monday through Sunday. Days without a plan are zeroed.
pub fn breakdown_days(week: Option<&Week>, plays: &PlayRegistry) -> Vec<DayCoverage> {
    WEEKDAY_NAMES
        .iter()
        .map(|day| {
            let rows = extract_rows(week, Some(day.as_str()), None);
            let mut total_reps = 0u32;
            let mut unique: HashSet<&str> = HashSet::new();
            let mut buckets: IndexMap<String, u32> = IndexMap::new();
            for r in &rows {
                let Some(id) = r.play_id() else {
                    continue;
                };
                total_reps += 1;
                unique.insert(id);
                if let Some(bucket) = plays.get(id).and_then(|p| p.bucket()) {
                    *buckets.entry(bucket.to_string()).or_default() += 1;
                }
            }
            DayCoverage {
                day: day.clone(),
                total_reps,
                unique_plays: unique.len(),
                buckets,
            }
        })
        .collect()
}
