use crate::grades::{
    classification_for_cgpa, compute_cgpa, compute_sgpa, compute_subject_grade,
    performance_label_for_sgpa, GradeError, SgpaResult, SubjectGrade, SubjectInput,
    CLASSIFICATION_BANDS, GRADE_BANDS, PERFORMANCE_BANDS,
};
use crate::ipc::error::{err, ok};
use crate::ipc::types::Request;
use serde_json::json;

pub(super) fn grade_error(id: &str, e: GradeError) -> serde_json::Value {
    err(id, &e.code, e.message, e.details)
}

pub(super) fn parse_subject_inputs(
    req: &Request,
    raw: &serde_json::Value,
) -> Result<Vec<SubjectInput>, serde_json::Value> {
    let Some(items) = raw.as_array() else {
        return Err(err(&req.id, "bad_params", "subjects must be an array", None));
    };
    let mut out = Vec::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        let input: SubjectInput = serde_json::from_value(item.clone())
            .map_err(|e| err(&req.id, "bad_params", format!("subjects[{}]: {}", i, e), None))?;
        out.push(input);
    }
    Ok(out)
}

pub(super) fn grade_subjects(
    req: &Request,
    inputs: &[SubjectInput],
) -> Result<Vec<SubjectGrade>, serde_json::Value> {
    inputs
        .iter()
        .map(|input| compute_subject_grade(input).map_err(|e| grade_error(&req.id, e)))
        .collect()
}

pub(super) fn sgpa_from_params(req: &Request) -> Result<SgpaResult, serde_json::Value> {
    let Some(raw) = req.params.get("subjects") else {
        return Err(err(&req.id, "bad_params", "missing subjects", None));
    };
    let inputs = parse_subject_inputs(req, raw)?;
    let graded = grade_subjects(req, &inputs)?;
    Ok(compute_sgpa(graded))
}

fn handle_scale(req: &Request) -> serde_json::Value {
    let grade_bands: Vec<serde_json::Value> = GRADE_BANDS
        .iter()
        .map(|(min_percent, grade)| {
            json!({
                "minPercent": min_percent,
                "grade": grade.symbol(),
                "gradePoint": grade.grade_point(),
            })
        })
        .collect();
    let classification_bands: Vec<serde_json::Value> = CLASSIFICATION_BANDS
        .iter()
        .map(|(min_cgpa, label)| json!({ "minCgpa": min_cgpa, "label": label }))
        .collect();
    let performance_bands: Vec<serde_json::Value> = PERFORMANCE_BANDS
        .iter()
        .map(|(min_sgpa, label)| json!({ "minSgpa": min_sgpa, "label": label }))
        .collect();

    ok(
        &req.id,
        json!({
            "gradeBands": grade_bands,
            "failGrade": { "grade": "F", "gradePoint": 0 },
            "absentGrade": { "grade": "AB", "gradePoint": 0 },
            "classificationBands": classification_bands,
            "fallbackClassification": "Fail",
            "performanceBands": performance_bands,
            "fallbackPerformanceLabel": "Poor",
        }),
    )
}

fn handle_subject(req: &Request) -> serde_json::Value {
    let input: SubjectInput = match serde_json::from_value(req.params.clone()) {
        Ok(v) => v,
        Err(e) => return err(&req.id, "bad_params", e.to_string(), None),
    };
    match compute_subject_grade(&input) {
        Ok(subject) => ok(&req.id, json!({ "subject": subject })),
        Err(e) => grade_error(&req.id, e),
    }
}

fn handle_sgpa(req: &Request) -> serde_json::Value {
    let summary = match sgpa_from_params(req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let label = performance_label_for_sgpa(summary.sgpa);
    ok(
        &req.id,
        json!({ "summary": summary, "performanceLabel": label }),
    )
}

fn handle_cgpa(req: &Request) -> serde_json::Value {
    let Some(raw) = req.params.get("semesters") else {
        return err(&req.id, "bad_params", "missing semesters", None);
    };
    let Some(items) = raw.as_array() else {
        return err(&req.id, "bad_params", "semesters must be an array", None);
    };

    let mut semesters: Vec<SgpaResult> = Vec::with_capacity(items.len());
    for item in items {
        let inputs = match parse_subject_inputs(req, item) {
            Ok(v) => v,
            Err(resp) => return resp,
        };
        let graded = match grade_subjects(req, &inputs) {
            Ok(v) => v,
            Err(resp) => return resp,
        };
        semesters.push(compute_sgpa(graded));
    }

    let summary = compute_cgpa(semesters);
    let classification = classification_for_cgpa(summary.cgpa);
    ok(
        &req.id,
        json!({ "summary": summary, "classification": classification }),
    )
}

pub fn try_handle(req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "grades.scale" => Some(handle_scale(req)),
        "grades.subject" => Some(handle_subject(req)),
        "grades.sgpa" => Some(handle_sgpa(req)),
        "grades.cgpa" => Some(handle_cgpa(req)),
        _ => None,
    }
}
