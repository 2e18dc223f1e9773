use serde::{Deserialize, Serialize};

/// Round-half-up at 2 decimals, the rounding report-card screens expect:
/// `Int(100*x + 0.5) / 100`.
pub fn round_off_2_decimals(x: f64) -> f64 {
    ((100.0 * x) + 0.5).floor() / 100.0
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Grade {
    #[serde(rename = "A+")]
    APlus,
    #[serde(rename = "A")]
    A,
    #[serde(rename = "B+")]
    BPlus,
    #[serde(rename = "B")]
    B,
    #[serde(rename = "C")]
    C,
    #[serde(rename = "D")]
    D,
    #[serde(rename = "P")]
    P,
    #[serde(rename = "F")]
    F,
    #[serde(rename = "AB")]
    Ab,
}

impl Grade {
    pub fn symbol(self) -> &'static str {
        match self {
            Grade::APlus => "A+",
            Grade::A => "A",
            Grade::BPlus => "B+",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::P => "P",
            Grade::F => "F",
            Grade::Ab => "AB",
        }
    }

    pub fn grade_point(self) -> u32 {
        match self {
            Grade::APlus => 9,
            Grade::A => 8,
            Grade::BPlus => 7,
            Grade::B => 6,
            Grade::C => 5,
            Grade::D => 4,
            Grade::P => 3,
            Grade::F => 0,
            Grade::Ab => 0,
        }
    }

    /// A subject counts as failed when it lands in the fail band or the
    /// student was absent.
    pub fn is_failing(self) -> bool {
        matches!(self, Grade::F | Grade::Ab)
    }
}

// Ordered, walked top-down with inclusive lower bounds. Anything below the
// last band is an F. Kept as a slice (not a map) so evaluation order is the
// band order.
pub const GRADE_BANDS: [(f64, Grade); 7] = [
    (90.0, Grade::APlus),
    (85.0, Grade::A),
    (80.0, Grade::BPlus),
    (70.0, Grade::B),
    (60.0, Grade::C),
    (50.0, Grade::D),
    (40.0, Grade::P),
];

pub fn grade_for_percentage(percentage: f64) -> Grade {
    for (min_percent, grade) in GRADE_BANDS {
        if percentage >= min_percent {
            return grade;
        }
    }
    Grade::F
}

pub const CLASSIFICATION_BANDS: [(f64, &str); 4] = [
    (7.5, "First Class with Distinction"),
    (6.0, "First Class"),
    (4.5, "Second Class"),
    (3.0, "Pass Class"),
];

pub fn classification_for_cgpa(cgpa: f64) -> &'static str {
    for (min_cgpa, label) in CLASSIFICATION_BANDS {
        if cgpa >= min_cgpa {
            return label;
        }
    }
    "Fail"
}

pub const PERFORMANCE_BANDS: [(f64, &str); 6] = [
    (8.5, "Outstanding"),
    (7.5, "Excellent"),
    (6.5, "Very Good"),
    (5.5, "Good"),
    (4.5, "Average"),
    (3.0, "Satisfactory"),
];

pub fn performance_label_for_sgpa(sgpa: f64) -> &'static str {
    for (min_sgpa, label) in PERFORMANCE_BANDS {
        if sgpa >= min_sgpa {
            return label;
        }
    }
    "Poor"
}

#[derive(Debug, Clone, Serialize)]
pub struct GradeError {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl GradeError {
    pub fn new(
        code: &str,
        message: impl Into<String>,
        details: Option<serde_json::Value>,
    ) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
            details,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectInput {
    pub subject_name: String,
    pub subject_code: String,
    pub credits: u32,
    #[serde(default)]
    pub marks_obtained: f64,
    #[serde(default)]
    pub max_marks: f64,
    #[serde(default)]
    pub is_absent: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectGrade {
    pub subject_name: String,
    pub subject_code: String,
    pub credits: u32,
    pub marks_obtained: f64,
    pub max_marks: f64,
    pub is_absent: bool,
    pub percentage: f64,
    pub grade: Grade,
    pub grade_point: u32,
    pub credit_points: u32,
}

pub fn compute_subject_grade(input: &SubjectInput) -> Result<SubjectGrade, GradeError> {
    if input.is_absent {
        // Absence short-circuits to a zero-score record; submitted marks are
        // ignored.
        return Ok(SubjectGrade {
            subject_name: input.subject_name.clone(),
            subject_code: input.subject_code.clone(),
            credits: input.credits,
            marks_obtained: 0.0,
            max_marks: input.max_marks,
            is_absent: true,
            percentage: 0.0,
            grade: Grade::Ab,
            grade_point: 0,
            credit_points: 0,
        });
    }

    if !(input.max_marks > 0.0) {
        return Err(GradeError::new(
            "invalid_input",
            "maxMarks must be > 0",
            Some(serde_json::json!({
                "subjectCode": input.subject_code,
                "maxMarks": input.max_marks
            })),
        ));
    }
    if !(input.marks_obtained >= 0.0) {
        return Err(GradeError::new(
            "invalid_input",
            "marksObtained must be >= 0",
            Some(serde_json::json!({
                "subjectCode": input.subject_code,
                "marksObtained": input.marks_obtained
            })),
        ));
    }
    if input.marks_obtained > input.max_marks {
        return Err(GradeError::new(
            "invalid_input",
            "marksObtained must not exceed maxMarks",
            Some(serde_json::json!({
                "subjectCode": input.subject_code,
                "marksObtained": input.marks_obtained,
                "maxMarks": input.max_marks
            })),
        ));
    }

    // Band membership is decided on the raw quotient; the stored percentage
    // is rounded for display.
    let raw_percent = 100.0 * input.marks_obtained / input.max_marks;
    let grade = grade_for_percentage(raw_percent);
    let grade_point = grade.grade_point();

    Ok(SubjectGrade {
        subject_name: input.subject_name.clone(),
        subject_code: input.subject_code.clone(),
        credits: input.credits,
        marks_obtained: input.marks_obtained,
        max_marks: input.max_marks,
        is_absent: false,
        percentage: round_off_2_decimals(raw_percent),
        grade,
        grade_point,
        credit_points: grade_point * input.credits,
    })
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SgpaResult {
    pub sgpa: f64,
    pub total_credits: u32,
    pub total_credit_points: u32,
    pub subjects: Vec<SubjectGrade>,
    pub passed: bool,
    pub failed_subjects: Vec<String>,
}

pub fn compute_sgpa(subjects: Vec<SubjectGrade>) -> SgpaResult {
    if subjects.is_empty() {
        // Defined sentinel, not an error: nothing graded yet.
        return SgpaResult {
            sgpa: 0.0,
            total_credits: 0,
            total_credit_points: 0,
            subjects: Vec::new(),
            passed: false,
            failed_subjects: Vec::new(),
        };
    }

    let mut total_credits: u32 = 0;
    let mut total_credit_points: u32 = 0;
    let mut failed_subjects: Vec<String> = Vec::new();
    for s in &subjects {
        total_credits += s.credits;
        total_credit_points += s.credit_points;
        if s.grade.is_failing() {
            failed_subjects.push(s.subject_code.clone());
        }
    }

    // All-audit semesters (credit sum 0) are a defined degenerate case.
    let sgpa = if total_credits > 0 {
        round_off_2_decimals(total_credit_points as f64 / total_credits as f64)
    } else {
        0.0
    };

    SgpaResult {
        sgpa,
        total_credits,
        total_credit_points,
        subjects,
        passed: failed_subjects.is_empty(),
        failed_subjects,
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CgpaResult {
    pub cgpa: f64,
    pub total_credits: u32,
    pub total_credit_points: u32,
    pub semesters: Vec<SgpaResult>,
    pub overall_passed: bool,
}

pub fn compute_cgpa(semesters: Vec<SgpaResult>) -> CgpaResult {
    if semesters.is_empty() {
        return CgpaResult {
            cgpa: 0.0,
            total_credits: 0,
            total_credit_points: 0,
            semesters: Vec::new(),
            overall_passed: false,
        };
    }

    let mut total_credits: u32 = 0;
    let mut total_credit_points: u32 = 0;
    let mut overall_passed = true;
    for sem in &semesters {
        total_credits += sem.total_credits;
        total_credit_points += sem.total_credit_points;
        overall_passed = overall_passed && sem.passed;
    }

    let cgpa = if total_credits > 0 {
        round_off_2_decimals(total_credit_points as f64 / total_credits as f64)
    } else {
        0.0
    };

    CgpaResult {
        cgpa,
        total_credits,
        total_credit_points,
        semesters,
        overall_passed,
    }
}
