use crate::model::{PlayRegistry, SetupConfig};
use crate::rows::ExtractedRow;
use crate::types::{BucketConcepts, BucketCoverage, ConceptCoverage, CoverageStatus};
use crate::util::percent;
use indexmap::IndexMap;
use std::collections::HashMap;

pub const UNCATEGORIZED: &str = "Uncategorized";

/// Reps and rep targets per configured bucket, in configuration order.
pub fn aggregate_buckets(
    rows: &[ExtractedRow],
    plays: &PlayRegistry,
    setup: &SetupConfig,
    targets: &IndexMap<String, u32>,
) -> Vec<BucketCoverage> {
    let mut reps: HashMap<&str, u32> = HashMap::new();
    for r in rows {
        if let Some(bucket) = r.resolve(plays).and_then(|(_, play)| play.bucket()) {
            *reps.entry(bucket).or_default() += 1;
        }
    }

    // Targets are capped at u32::MAX on load, so their sums saturate.
    let mut target_reps: HashMap<&str, u32> = HashMap::new();
    for (play_id, target) in targets {
        if let Some(bucket) = plays.get(play_id).and_then(|p| p.bucket()) {
            let sum = target_reps.entry(bucket).or_default();
            *sum = sum.saturating_add(*target);
        }
    }

    let total: u32 = setup
        .play_buckets
        .iter()
        .map(|b| reps.get(b.id.as_str()).copied().unwrap_or(0))
        .sum();

    setup
        .play_buckets
        .iter()
        .map(|b| {
            let got = reps.get(b.id.as_str()).copied().unwrap_or(0);
            let want = target_reps.get(b.id.as_str()).copied().unwrap_or(0);
            BucketCoverage {
                id: b.id.clone(),
                label: b.display_label().to_string(),
                color: b.color.clone(),
                reps: got,
                target_reps: want,
                delta: got as i64 - want as i64,
                percentage: percent(got, total),
                status: CoverageStatus::from_counts(got, want),
            }
        })
        .collect()
}

/// Reps per concept family within each configured bucket.
///
/// Family names are matched exactly against every bucket's list; a name
/// declared by two buckets counts in both. Unmatched plays land in their own
/// bucket's `Uncategorized` entry.
pub fn aggregate_concepts(
    rows: &[ExtractedRow],
    plays: &PlayRegistry,
    setup: &SetupConfig,
) -> Vec<BucketConcepts> {
    let mut declared: HashMap<&str, Vec<usize>> = HashMap::new();
    let mut bucket_index: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<IndexMap<&str, u32>> = Vec::with_capacity(setup.play_buckets.len());
    for (idx, bucket) in setup.play_buckets.iter().enumerate() {
        bucket_index.entry(bucket.id.as_str()).or_insert(idx);
        let mut families = IndexMap::new();
        for family in &bucket.families {
            families.insert(family.as_str(), 0u32);
            let owners = declared.entry(family.as_str()).or_default();
            if !owners.contains(&idx) {
                owners.push(idx);
            }
        }
        counts.push(families);
    }
    let mut uncategorized = vec![0u32; setup.play_buckets.len()];

    for r in rows {
        let Some((_, play)) = r.resolve(plays) else {
            continue;
        };
        match play.family().and_then(|f| declared.get(f).map(|owners| (f, owners))) {
            Some((family, owners)) => {
                for idx in owners {
                    if let Some(n) = counts[*idx].get_mut(family) {
                        *n += 1;
                    }
                }
            }
            None => {
                if let Some(idx) = play.bucket().and_then(|b| bucket_index.get(b)) {
                    uncategorized[*idx] += 1;
                }
            }
        }
    }

    setup
        .play_buckets
        .iter()
        .zip(counts)
        .zip(uncategorized)
        .map(|((bucket, families), other)| {
            let mut entries: Vec<(String, u32, bool)> = families
                .into_iter()
                .filter(|(_, n)| *n > 0)
                .map(|(f, n)| (f.to_string(), n, false))
                .collect();
            if other > 0 {
                entries.push((UNCATEGORIZED.to_string(), other, true));
            }
            let total: u32 = entries.iter().map(|e| e.1).sum();
            // Stable: equal counts keep declaration order, uncategorized last.
            entries.sort_by(|a, b| b.1.cmp(&a.1));
            BucketConcepts {
                bucket_id: bucket.id.clone(),
                bucket_label: bucket.display_label().to_string(),
                total_reps: total,
                families: entries
                    .into_iter()
                    .map(|(family, reps, uncategorized)| ConceptCoverage {
                        family,
                        reps,
                        percentage_of_bucket: percent(reps, total),
                        uncategorized,
                    })
                    .collect(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BucketConfig, Play, ScriptRow, Segment, Week};
    use crate::rows::extract_rows;

    fn play(bucket: &str, family: Option<&str>) -> Play {
        Play {
            name: "play".into(),
            formation: "Gun".into(),
            bucket_id: Some(bucket.into()),
            concept_family: family.map(String::from),
            ..Default::default()
        }
    }

    fn bucket(id: &str, families: &[&str]) -> BucketConfig {
        BucketConfig {
            id: id.into(),
            label: Some(id.to_uppercase()),
            families: families.iter().map(|f| f.to_string()).collect(),
            ..Default::default()
        }
    }

    fn week_with(plays: &[&str]) -> Week {
        let mut week = Week::default();
        let script = plays
            .iter()
            .enumerate()
            .map(|(i, p)| ScriptRow {
                id: format!("r{}", i),
                play_id: Some(p.to_string()),
            })
            .collect();
        week.practice_plans.entry("Monday".into()).or_default().segments.push(Segment {
            id: "s1".into(),
            script,
            ..Default::default()
        });
        week
    }

    fn fixture() -> (PlayRegistry, SetupConfig) {
        let mut plays = PlayRegistry::new();
        plays.insert("iz".into(), play("run", Some("Inside Zone")));
        plays.insert("oz".into(), play("run", Some("Outside Zone")));
        plays.insert("draw".into(), play("run", Some("draw")));
        plays.insert("mesh".into(), play("pass", Some("Mesh")));
        plays.insert("ghost".into(), play("trick", None));
        let setup = SetupConfig {
            play_buckets: vec![
                bucket("run", &["Inside Zone", "Outside Zone", "Power"]),
                bucket("pass", &["Mesh", "Flood"]),
            ],
            ..Default::default()
        };
        (plays, setup)
    }

    #[test]
    fn test_bucket_reps_and_targets() {
        let (plays, setup) = fixture();
        let week = week_with(&["iz", "iz", "oz", "mesh", "ghost", "missing"]);
        let mut targets = IndexMap::new();
        targets.insert("iz".to_string(), 6);
        targets.insert("missing".to_string(), 10);
        let rows = extract_rows(Some(&week), None, None);

        let buckets = aggregate_buckets(&rows, &plays, &setup, &targets);
        assert_eq!(buckets.len(), 2);
        let run = &buckets[0];
        assert_eq!(run.label, "RUN");
        assert_eq!((run.reps, run.target_reps, run.delta), (3, 6, -3));
        assert_eq!(run.percentage, 75);
        assert_eq!(run.status, CoverageStatus::Partial);
        let pass = &buckets[1];
        assert_eq!((pass.reps, pass.target_reps), (1, 0));
        assert_eq!(pass.percentage, 25);
        assert_eq!(pass.status, CoverageStatus::Met);
    }

    #[test]
    fn test_bucket_unmet_without_reps() {
        let (plays, setup) = fixture();
        let mut targets = IndexMap::new();
        targets.insert("mesh".to_string(), 4);
        let buckets = aggregate_buckets(&[], &plays, &setup, &targets);
        assert_eq!(buckets[1].status, CoverageStatus::Unmet);
        assert_eq!(buckets[1].percentage, 0);
    }

    #[test]
    fn test_huge_targets_saturate() {
        let (plays, setup) = fixture();
        let mut targets = IndexMap::new();
        targets.insert("iz".to_string(), u32::MAX);
        targets.insert("oz".to_string(), 1);
        let week = week_with(&["iz"]);
        let rows = extract_rows(Some(&week), None, None);

        let buckets = aggregate_buckets(&rows, &plays, &setup, &targets);
        assert_eq!(buckets[0].target_reps, u32::MAX);
        assert_eq!(buckets[0].delta, 1 - u32::MAX as i64);
        assert_eq!(buckets[0].status, CoverageStatus::Partial);
    }

    #[test]
    fn test_concepts_sorted_with_uncategorized() {
        let (plays, setup) = fixture();
        let week = week_with(&["oz", "iz", "iz", "draw", "oz"]);
        let rows = extract_rows(Some(&week), None, None);

        let concepts = aggregate_concepts(&rows, &plays, &setup);
        let run = &concepts[0];
        assert_eq!(run.total_reps, 5);
        let names: Vec<&str> = run.families.iter().map(|f| f.family.as_str()).collect();
        // "draw" is case-different from any declared family.
        assert_eq!(names, vec!["Inside Zone", "Outside Zone", UNCATEGORIZED]);
        assert_eq!(run.families[0].percentage_of_bucket, 40);
        assert!(run.families[2].uncategorized);
        assert!(concepts[1].families.is_empty());
    }

    #[test]
    fn test_shared_family_counts_in_both_buckets() {
        let (plays, mut setup) = fixture();
        setup.play_buckets[1].families.push("Inside Zone".into());
        let week = week_with(&["iz"]);
        let rows = extract_rows(Some(&week), None, None);

        let concepts = aggregate_concepts(&rows, &plays, &setup);
        assert_eq!(concepts[0].families[0].reps, 1);
        assert_eq!(concepts[1].families[0].family, "Inside Zone");
        assert_eq!(concepts[1].families[0].reps, 1);
    }
}
