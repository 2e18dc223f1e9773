use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::grades::{round_off_2_decimals, GradeError};

pub const ELIGIBILITY_THRESHOLD_PERCENT: f64 = 75.0;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceInput {
    #[serde(default)]
    pub subject_code: Option<String>,
    pub held: u32,
    pub attended: u32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject_code: Option<String>,
    pub held: u32,
    pub attended: u32,
    pub percentage: f64,
    pub eligible: bool,
    pub classes_to_eligibility: u32,
}

pub fn attendance_summary(
    subject_code: Option<String>,
    held: u32,
    attended: u32,
) -> Result<AttendanceSummary, GradeError> {
    if attended > held {
        return Err(GradeError::new(
            "invalid_input",
            "attended must not exceed held",
            Some(json!({ "subjectCode": subject_code, "held": held, "attended": attended })),
        ));
    }
    if held == 0 {
        // Nothing scheduled yet; defined sentinel, not an error.
        return Ok(AttendanceSummary {
            subject_code,
            held: 0,
            attended: 0,
            percentage: 0.0,
            eligible: false,
            classes_to_eligibility: 0,
        });
    }

    // Eligibility at the 75% bar, decided on exact integers: 4a >= 3h.
    let eligible = 4 * u64::from(attended) >= 3 * u64::from(held);
    // Attending n more classes in a row moves a/h to (a+n)/(h+n); solving
    // (a+n)/(h+n) >= 3/4 gives n >= 3h - 4a.
    let needed = (3 * u64::from(held)).saturating_sub(4 * u64::from(attended));

    Ok(AttendanceSummary {
        subject_code,
        held,
        attended,
        percentage: round_off_2_decimals(100.0 * attended as f64 / held as f64),
        eligible,
        classes_to_eligibility: u32::try_from(needed).unwrap_or(u32::MAX),
    })
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceReport {
    pub subjects: Vec<AttendanceSummary>,
    pub overall: AttendanceSummary,
}

pub fn compute_attendance_report(
    records: &[AttendanceInput],
) -> Result<AttendanceReport, GradeError> {
    let mut subjects = Vec::with_capacity(records.len());
    let mut held_total: u32 = 0;
    let mut attended_total: u32 = 0;
    for rec in records {
        subjects.push(attendance_summary(
            rec.subject_code.clone(),
            rec.held,
            rec.attended,
        )?);
        held_total = held_total.saturating_add(rec.held);
        attended_total = attended_total.saturating_add(rec.attended);
    }

    Ok(AttendanceReport {
        subjects,
        overall: attendance_summary(None, held_total, attended_total)?,
    })
}
