use crate::model::{PlayRegistry, SetupConfig, SituationConfig, Week};
use crate::rows::ExtractedRow;
use crate::types::{CallSheetPlay, CoverageStatus, SituationCoverage, SituationKind};
use indexmap::IndexMap;
use std::collections::{HashMap, HashSet};

/// Plays assigned to each game-plan set, by set id.
fn set_plays(week: &Week) -> HashMap<&str, &[String]> {
    week.offensive_game_plan
        .sets
        .iter()
        .map(|set| (set.id.as_str(), set.plays()))
        .collect()
}

fn situation_universe(setup: &SetupConfig) -> Vec<(SituationKind, &SituationConfig)> {
    let zones = setup.field_zones.iter().map(|s| (SituationKind::FieldZone, s));
    let downs = setup
        .down_distance_categories
        .iter()
        .map(|s| (SituationKind::DownDistance, s));
    let specials = setup.special_situations.iter().map(|s| (SituationKind::Special, s));
    zones.chain(downs).chain(specials).collect()
}

/// Scripted-rep coverage for every configured situation.
///
/// A row counts once for a play tagged with the situation and once more if
/// the play also sits in a call-sheet box linked to it.
pub fn match_situations(
    rows: &[ExtractedRow],
    plays: &PlayRegistry,
    setup: &SetupConfig,
    week: &Week,
) -> Vec<SituationCoverage> {
    let universe = situation_universe(setup);

    let mut call_sheet: HashMap<&str, HashSet<&str>> = HashMap::new();
    let sets = set_plays(week);
    for header in week.game_plan_layouts.spreadsheet.pages.iter().flat_map(|p| &p.headers) {
        let Some(situation_id) = header.situation_id.as_deref() else {
            continue;
        };
        let assigned = call_sheet.entry(situation_id).or_default();
        if let Some(ids) = sets.get(header.id.as_str()) {
            assigned.extend(ids.iter().map(String::as_str));
        }
    }

    let mut reps: HashMap<&str, u32> = HashMap::new();
    for r in rows {
        let Some((play_id, play)) = r.resolve(plays) else {
            continue;
        };
        for (_, situation) in &universe {
            let id = situation.id.as_str();
            let mut hits = 0;
            if play.special_situations.iter().any(|s| s == id) {
                hits += 1;
            }
            if call_sheet.get(id).is_some_and(|assigned| assigned.contains(play_id)) {
                hits += 1;
            }
            if hits > 0 {
                *reps.entry(id).or_default() += hits;
            }
        }
    }

    let minimums = &week.situation_minimums;
    let mut out: Vec<SituationCoverage> = universe
        .into_iter()
        .map(|(kind, situation)| {
            let id = situation.id.as_str();
            let assigned = call_sheet.get(id);
            let on_call_sheet = assigned.is_some();
            let min_required = minimums.get(id).copied().unwrap_or(0);
            let reps_scripted = reps.get(id).copied().unwrap_or(0);
            let status = if min_required > 0 {
                CoverageStatus::from_counts(reps_scripted, min_required)
            } else if on_call_sheet && reps_scripted == 0 {
                CoverageStatus::Warning
            } else {
                CoverageStatus::Met
            };
            SituationCoverage {
                id: situation.id.clone(),
                name: situation.display_label().to_string(),
                kind,
                on_call_sheet,
                min_required,
                reps_scripted,
                call_sheet_play_count: assigned.map_or(0, HashSet::len),
                status,
            }
        })
        .collect();

    out.sort_by(|a, b| {
        b.on_call_sheet
            .cmp(&a.on_call_sheet)
            .then(a.status.cmp(&b.status))
            .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
    });
    out
}

/// Every registered play placed in a call-sheet box, least practiced first.
pub fn cross_reference_call_sheet(
    rows: &[ExtractedRow],
    plays: &PlayRegistry,
    week: &Week,
) -> Vec<CallSheetPlay> {
    let sets = set_plays(week);
    let mut boxes: IndexMap<&str, Vec<String>> = IndexMap::new();
    for header in week.game_plan_layouts.spreadsheet.pages.iter().flat_map(|p| &p.headers) {
        let Some(ids) = sets.get(header.id.as_str()) else {
            continue;
        };
        let label = header.display_label();
        for id in ids.iter() {
            if !plays.contains_key(id) {
                continue;
            }
            let list = boxes.entry(id.as_str()).or_default();
            if !list.iter().any(|b| b == label) {
                list.push(label.to_string());
            }
        }
    }

    let mut reps: HashMap<&str, u32> = HashMap::new();
    for r in rows {
        if let Some(id) = r.play_id() {
            *reps.entry(id).or_default() += 1;
        }
    }

    let mut out: Vec<(String, CallSheetPlay)> = boxes
        .into_iter()
        .filter_map(|(id, boxes)| {
            let play = plays.get(id)?;
            let entry = CallSheetPlay {
                play_id: id.to_string(),
                name: play.name.clone(),
                formation: play.formation.clone(),
                boxes,
                reps: reps.get(id).copied().unwrap_or(0),
            };
            Some((play.full_name().to_lowercase(), entry))
        })
        .collect();
    out.sort_by(|(a_key, a), (b_key, b)| {
        (a.reps > 0)
            .cmp(&(b.reps > 0))
            .then(a.reps.cmp(&b.reps))
            .then_with(|| a_key.cmp(b_key))
    });
    out.into_iter().map(|(_, play)| play).collect()
}
