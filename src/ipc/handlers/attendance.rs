use crate::attendance::{
    attendance_summary, compute_attendance_report, AttendanceInput, ELIGIBILITY_THRESHOLD_PERCENT,
};
use crate::ipc::error::{err, ok};
use crate::ipc::types::Request;
use serde_json::json;

use super::grades::grade_error;

fn handle_summary(req: &Request) -> serde_json::Value {
    // Two accepted shapes: a per-subject list, or one bare held/attended pair.
    if let Some(raw) = req.params.get("subjects") {
        let Some(items) = raw.as_array() else {
            return err(&req.id, "bad_params", "subjects must be an array", None);
        };
        let mut records: Vec<AttendanceInput> = Vec::with_capacity(items.len());
        for (i, item) in items.iter().enumerate() {
            let rec: AttendanceInput = match serde_json::from_value(item.clone()) {
                Ok(v) => v,
                Err(e) => {
                    return err(
                        &req.id,
                        "bad_params",
                        format!("subjects[{}]: {}", i, e),
                        None,
                    )
                }
            };
            records.push(rec);
        }
        return match compute_attendance_report(&records) {
            Ok(report) => ok(
                &req.id,
                json!({
                    "subjects": report.subjects,
                    "overall": report.overall,
                    "thresholdPercent": ELIGIBILITY_THRESHOLD_PERCENT,
                }),
            ),
            Err(e) => grade_error(&req.id, e),
        };
    }

    let Some(held) = req.params.get("held").and_then(|v| v.as_u64()) else {
        return err(&req.id, "bad_params", "missing held", None);
    };
    let Some(attended) = req.params.get("attended").and_then(|v| v.as_u64()) else {
        return err(&req.id, "bad_params", "missing attended", None);
    };
    let (Ok(held), Ok(attended)) = (u32::try_from(held), u32::try_from(attended)) else {
        return err(&req.id, "bad_params", "held/attended out of range", None);
    };

    match attendance_summary(None, held, attended) {
        Ok(summary) => ok(
            &req.id,
            json!({
                "summary": summary,
                "thresholdPercent": ELIGIBILITY_THRESHOLD_PERCENT,
            }),
        ),
        Err(e) => grade_error(&req.id, e),
    }
}

pub fn try_handle(req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "attendance.summary" => Some(handle_summary(req)),
        _ => None,
    }
}
