use crate::model::{Play, PlayRegistry, ScriptRow, Week};

/// A script row flattened out of its day and segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExtractedRow<'a> {
    pub row: &'a ScriptRow,
    pub day: &'a str,
    pub segment_id: &'a str,
    pub segment_type: Option<&'a str>,
    pub segment_phase: Option<&'a str>,
}

impl<'a> ExtractedRow<'a> {
    /// Play id, or `None` for placeholder rows.
    pub fn play_id(&self) -> Option<&'a str> {
        self.row.play_id.as_deref().filter(|id| !id.trim().is_empty())
    }

    /// Play id together with its registry record, when both exist.
    pub fn resolve(&self, plays: &'a PlayRegistry) -> Option<(&'a str, &'a Play)> {
        let id = self.play_id()?;
        plays.get(id).map(|play| (id, play))
    }
}

/// Flatten a week into day, segment, row order.
///
/// `day` matches plan keys case-insensitively; `segment_type` must equal the
/// resolved segment type. Placeholder rows are kept.
pub fn extract_rows<'a>(
    week: Option<&'a Week>,
    day: Option<&str>,
    segment_type: Option<&str>,
) -> Vec<ExtractedRow<'a>> {
    let Some(week) = week else {
        return Vec::new();
    };
    let mut out = Vec::new();
    for (day_name, plan) in &week.practice_plans {
        if let Some(wanted) = day {
            if !day_name.eq_ignore_ascii_case(wanted) {
                continue;
            }
        }
        for segment in &plan.segments {
            let kind = segment.segment_type();
            if segment_type.is_some() && kind != segment_type {
                continue;
            }
            let phase = segment.segment_phase();
            out.extend(segment.script.iter().map(|row| ExtractedRow {
                row,
                day: day_name.as_str(),
                segment_id: segment.id.as_str(),
                segment_type: kind,
                segment_phase: phase,
            }));
        }
    }
    out
}
