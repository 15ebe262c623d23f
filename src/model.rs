//! Input records owned by the program-administration layer.
//!
//! The shapes mirror the JSON documents the staff tool stores. Everything is
//! optional on the wire: missing or `null` collections become empty, ids may
//! be strings or numbers, and counts or ratings that cannot be read are
//! treated as absent rather than rejected.
use crate::util::{count_from_value, first_present, id_from_value, rating_from_value, resolve_label};
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Play records keyed by play id, in document order.
pub type PlayRegistry = IndexMap<String, Play>;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Week {
    #[serde(deserialize_with = "nullable_map")]
    pub practice_plans: IndexMap<String, PracticePlan>,
    #[serde(deserialize_with = "count_map")]
    pub play_rep_targets: IndexMap<String, u32>,
    #[serde(deserialize_with = "count_map")]
    pub situation_minimums: IndexMap<String, u32>,
    #[serde(deserialize_with = "nullable")]
    pub game_plan_layouts: GamePlanLayouts,
    #[serde(deserialize_with = "nullable")]
    pub offensive_game_plan: GamePlan,
    #[serde(deserialize_with = "nullable_map")]
    pub practice_reviews: IndexMap<String, PracticeReview>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PracticePlan {
    #[serde(deserialize_with = "nullable")]
    pub segments: Vec<Segment>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Segment {
    #[serde(deserialize_with = "required_id")]
    pub id: String,
    #[serde(deserialize_with = "optional_id")]
    pub type_id: Option<String>,
    #[serde(rename = "type", deserialize_with = "optional_id")]
    pub kind: Option<String>,
    #[serde(deserialize_with = "optional_id")]
    pub phase: Option<String>,
    #[serde(deserialize_with = "optional_id")]
    pub group: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub script: Vec<ScriptRow>,
}

impl Segment {
    /// `typeId`, falling back to the older `type` field.
    pub fn segment_type(&self) -> Option<&str> {
        first_present(&[self.type_id.as_deref(), self.kind.as_deref()])
    }

    /// `phase`, falling back to the older `group` field.
    pub fn segment_phase(&self) -> Option<&str> {
        first_present(&[self.phase.as_deref(), self.group.as_deref()])
    }
}

/// One scripted repetition. A missing play id is a placeholder row.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScriptRow {
    #[serde(deserialize_with = "required_id")]
    pub id: String,
    #[serde(deserialize_with = "optional_id")]
    pub play_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PracticeReview {
    #[serde(deserialize_with = "nullable_map")]
    pub script_reviews: IndexMap<String, ScriptReview>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScriptReview {
    #[serde(deserialize_with = "rating")]
    pub rating: Option<u8>,
    #[serde(deserialize_with = "nullable")]
    pub worked_tags: Vec<String>,
    #[serde(deserialize_with = "nullable")]
    pub didnt_work_tags: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct GamePlanLayouts {
    #[serde(rename = "SPREADSHEET", deserialize_with = "nullable")]
    pub spreadsheet: CallSheetLayout,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CallSheetLayout {
    #[serde(deserialize_with = "nullable")]
    pub pages: Vec<CallSheetPage>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CallSheetPage {
    #[serde(deserialize_with = "nullable")]
    pub headers: Vec<CallSheetHeader>,
}

/// A box on the call sheet, optionally tied to a situation.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CallSheetHeader {
    #[serde(deserialize_with = "required_id")]
    pub id: String,
    pub label: Option<String>,
    pub name: Option<String>,
    #[serde(deserialize_with = "optional_id")]
    pub situation_id: Option<String>,
}

impl CallSheetHeader {
    pub fn display_label(&self) -> &str {
        resolve_label(self.label.as_deref(), self.name.as_deref(), &self.id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct GamePlan {
    #[serde(deserialize_with = "nullable")]
    pub sets: Vec<GamePlanSet>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GamePlanSet {
    #[serde(deserialize_with = "required_id")]
    pub id: String,
    pub assigned_play_ids: Option<Vec<String>>,
    pub play_ids: Option<Vec<String>>,
}

impl GamePlanSet {
    /// `assignedPlayIds` when present, even if empty; otherwise `playIds`.
    pub fn plays(&self) -> &[String] {
        self.assigned_play_ids
            .as_deref()
            .or(self.play_ids.as_deref())
            .unwrap_or(&[])
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Play {
    #[serde(deserialize_with = "nullable")]
    pub name: String,
    #[serde(deserialize_with = "nullable")]
    pub formation: String,
    #[serde(deserialize_with = "optional_id")]
    pub bucket_id: Option<String>,
    pub concept_family: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub special_situations: Vec<String>,
}

impl Play {
    pub fn bucket(&self) -> Option<&str> {
        first_present(&[self.bucket_id.as_deref()])
    }

    pub fn family(&self) -> Option<&str> {
        first_present(&[self.concept_family.as_deref()])
    }

    /// "Formation Name", the way plays are listed on the call sheet.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.formation, self.name).trim().to_string()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SetupConfig {
    #[serde(deserialize_with = "nullable")]
    pub play_buckets: Vec<BucketConfig>,
    #[serde(deserialize_with = "nullable")]
    pub field_zones: Vec<SituationConfig>,
    #[serde(deserialize_with = "nullable")]
    pub down_distance_categories: Vec<SituationConfig>,
    #[serde(deserialize_with = "nullable")]
    pub special_situations: Vec<SituationConfig>,
    #[serde(deserialize_with = "nullable")]
    pub film_review_tags: FilmReviewTags,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct BucketConfig {
    #[serde(deserialize_with = "required_id")]
    pub id: String,
    pub label: Option<String>,
    pub name: Option<String>,
    pub color: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub families: Vec<String>,
}

impl BucketConfig {
    pub fn display_label(&self) -> &str {
        resolve_label(self.label.as_deref(), self.name.as_deref(), &self.id)
    }
}

/// A field zone, down/distance band or special situation.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SituationConfig {
    #[serde(deserialize_with = "required_id")]
    pub id: String,
    pub label: Option<String>,
    pub name: Option<String>,
}

impl SituationConfig {
    pub fn display_label(&self) -> &str {
        resolve_label(self.label.as_deref(), self.name.as_deref(), &self.id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FilmReviewTags {
    #[serde(deserialize_with = "nullable")]
    pub worked: Vec<TagConfig>,
    #[serde(deserialize_with = "nullable")]
    pub didnt_work: Vec<TagConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct TagConfig {
    #[serde(deserialize_with = "required_id")]
    pub id: String,
    pub label: Option<String>,
    pub name: Option<String>,
}

impl TagConfig {
    pub fn display_label(&self) -> &str {
        resolve_label(self.label.as_deref(), self.name.as_deref(), &self.id)
    }
}

fn nullable<'de, D, T>(de: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(de)?.unwrap_or_default())
}

/// Map whose values may individually be `null`.
fn nullable_map<'de, D, T>(de: D) -> Result<IndexMap<String, T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    let raw: Option<IndexMap<String, Option<T>>> = Option::deserialize(de)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .map(|(k, v)| (k, v.unwrap_or_default()))
        .collect())
}

fn count_map<'de, D>(de: D) -> Result<IndexMap<String, u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<IndexMap<String, Value>> = Option::deserialize(de)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .map(|(k, v)| {
            let count = count_from_value(&v);
            (k, count)
        })
        .collect())
}

fn rating<'de, D>(de: D) -> Result<Option<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Value::deserialize(de)?;
    Ok(rating_from_value(&raw))
}

fn optional_id<'de, D>(de: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Value::deserialize(de)?;
    Ok(id_from_value(&raw))
}

fn required_id<'de, D>(de: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(optional_id(de)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_week_tolerates_partial_documents() {
        let week: Week = serde_json::from_str(
            r#"{
                "practicePlans": {
                    "Monday": {"segments": [{"id": 7, "type": "team", "group": "Offense",
                        "script": [{"id": "r1", "playId": "p1"}, {"id": "r2", "playId": ""}]}]},
                    "Tuesday": null
                },
                "playRepTargets": {"p1": "4", "p2": 2.5, "p3": null},
                "situationMinimums": null,
                "practiceReviews": {"Monday": {"scriptReviews": {"r1": {"rating": "4", "workedTags": null}}}}
            }"#,
        )
        .unwrap();

        let segment = &week.practice_plans["Monday"].segments[0];
        assert_eq!(segment.id, "7");
        assert_eq!(segment.segment_type(), Some("team"));
        assert_eq!(segment.segment_phase(), Some("Offense"));
        assert_eq!(segment.script[1].play_id, None);
        assert!(week.practice_plans["Tuesday"].segments.is_empty());
        assert_eq!(week.play_rep_targets["p1"], 4);
        assert_eq!(week.play_rep_targets["p2"], 2);
        assert_eq!(week.play_rep_targets["p3"], 0);
        assert!(week.situation_minimums.is_empty());
        let review = &week.practice_reviews["Monday"].script_reviews["r1"];
        assert_eq!(review.rating, Some(4));
        assert!(review.worked_tags.is_empty());
    }

    #[test]
    fn test_type_id_wins_over_legacy_type() {
        let segment = Segment {
            type_id: Some("7v7".into()),
            kind: Some("team".into()),
            ..Default::default()
        };
        assert_eq!(segment.segment_type(), Some("7v7"));
    }

    #[test]
    fn test_assigned_play_ids_win_even_when_empty() {
        let set = GamePlanSet {
            id: "h1".into(),
            assigned_play_ids: Some(vec![]),
            play_ids: Some(vec!["p1".into()]),
        };
        assert!(set.plays().is_empty());

        let legacy = GamePlanSet {
            id: "h1".into(),
            assigned_play_ids: None,
            play_ids: Some(vec!["p1".into()]),
        };
        assert_eq!(legacy.plays(), ["p1".to_string()]);
    }

    #[test]
    fn test_call_sheet_layout_key() {
        let week: Week = serde_json::from_str(
            r#"{"gamePlanLayouts": {"SPREADSHEET": {"pages": [{"headers": [
                {"id": "h1", "name": "3rd & Long", "situationId": "3L"}]}]}}}"#,
        )
        .unwrap();
        let header = &week.game_plan_layouts.spreadsheet.pages[0].headers[0];
        assert_eq!(header.display_label(), "3rd & Long");
        assert_eq!(header.situation_id.as_deref(), Some("3L"));
    }
}
