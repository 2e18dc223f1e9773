use crate::grades::{
    classification_for_cgpa, compute_cgpa, compute_sgpa, performance_label_for_sgpa, SgpaResult,
};
use crate::ipc::error::{err, ok};
use crate::ipc::types::Request;
use serde_json::json;

use super::grades::{grade_subjects, parse_subject_inputs, sgpa_from_params};

fn required_str(req: &Request, key: &str) -> Result<String, serde_json::Value> {
    req.params
        .get(key)
        .and_then(|v| v.as_str())
        .map(|v| v.to_string())
        .ok_or_else(|| err(&req.id, "bad_params", format!("missing {}", key), None))
}

fn optional_str(req: &Request, key: &str) -> Option<String> {
    req.params
        .get(key)
        .and_then(|v| v.as_str())
        .map(|v| v.to_string())
}

fn subject_rows(summary: &SgpaResult) -> Vec<serde_json::Value> {
    summary
        .subjects
        .iter()
        .map(|s| {
            json!({
                "subjectCode": s.subject_code,
                "subjectName": s.subject_name,
                "credits": s.credits,
                "marksObtained": s.marks_obtained,
                "maxMarks": s.max_marks,
                "percentage": s.percentage,
                "grade": s.grade.symbol(),
                "gradePoint": s.grade_point,
                "creditPoints": s.credit_points,
                "failed": s.grade.is_failing(),
            })
        })
        .collect()
}

fn handle_grade_card(req: &Request) -> serde_json::Value {
    let student_name = match required_str(req, "studentName") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let roll_no = optional_str(req, "rollNo");
    let semester_label = optional_str(req, "semesterLabel");

    let summary = match sgpa_from_params(req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    ok(
        &req.id,
        json!({
            "student": { "name": student_name, "rollNo": roll_no },
            "semesterLabel": semester_label,
            "rows": subject_rows(&summary),
            "totalCredits": summary.total_credits,
            "totalCreditPoints": summary.total_credit_points,
            "sgpa": summary.sgpa,
            "performanceLabel": performance_label_for_sgpa(summary.sgpa),
            "passed": summary.passed,
            "failedSubjects": summary.failed_subjects,
        }),
    )
}

fn handle_transcript(req: &Request) -> serde_json::Value {
    let student_name = match required_str(req, "studentName") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let roll_no = optional_str(req, "rollNo");

    let Some(raw_semesters) = req.params.get("semesters").and_then(|v| v.as_array()) else {
        return err(&req.id, "bad_params", "semesters must be an array", None);
    };

    let mut semester_models: Vec<serde_json::Value> = Vec::with_capacity(raw_semesters.len());
    let mut summaries: Vec<SgpaResult> = Vec::with_capacity(raw_semesters.len());
    for (i, item) in raw_semesters.iter().enumerate() {
        let label = item
            .get("label")
            .and_then(|v| v.as_str())
            .map(|v| v.to_string())
            .unwrap_or_else(|| format!("Semester {}", i + 1));
        let Some(raw_subjects) = item.get("subjects") else {
            return err(
                &req.id,
                "bad_params",
                format!("semesters[{}]: missing subjects", i),
                None,
            );
        };
        let inputs = match parse_subject_inputs(req, raw_subjects) {
            Ok(v) => v,
            Err(resp) => return resp,
        };
        let graded = match grade_subjects(req, &inputs) {
            Ok(v) => v,
            Err(resp) => return resp,
        };
        let summary = compute_sgpa(graded);

        semester_models.push(json!({
            "label": label,
            "rows": subject_rows(&summary),
            "totalCredits": summary.total_credits,
            "totalCreditPoints": summary.total_credit_points,
            "sgpa": summary.sgpa,
            "performanceLabel": performance_label_for_sgpa(summary.sgpa),
            "passed": summary.passed,
            "failedSubjects": summary.failed_subjects,
        }));
        summaries.push(summary);
    }

    let overall = compute_cgpa(summaries);
    ok(
        &req.id,
        json!({
            "student": { "name": student_name, "rollNo": roll_no },
            "semesters": semester_models,
            "totalCredits": overall.total_credits,
            "totalCreditPoints": overall.total_credit_points,
            "cgpa": overall.cgpa,
            "classification": classification_for_cgpa(overall.cgpa),
            "overallPassed": overall.overall_passed,
        }),
    )
}

pub fn try_handle(req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "reports.gradeCard" => Some(handle_grade_card(req)),
        "reports.transcript" => Some(handle_transcript(req)),
        _ => None,
    }
}
