use serde_json::json;
use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

fn spawn_sidecar() -> (Child, ChildStdin, BufReader<ChildStdout>) {
    let exe = env!("CARGO_BIN_EXE_campusd");
    let mut child = Command::new(exe)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("spawn campusd");
    let stdin = child.stdin.take().expect("child stdin");
    let stdout = child.stdout.take().expect("child stdout");
    (child, stdin, BufReader::new(stdout))
}

fn request_ok(
    stdin: &mut ChildStdin,
    reader: &mut BufReader<ChildStdout>,
    id: &str,
    method: &str,
    params: serde_json::Value,
) -> serde_json::Value {
    let payload = json!({
        "id": id,
        "method": method,
        "params": params,
    });
    writeln!(stdin, "{}", payload).expect("write request");
    stdin.flush().expect("flush request");

    let mut line = String::new();
    reader.read_line(&mut line).expect("read response line");
    assert!(!line.trim().is_empty(), "empty response for {}", method);
    let value: serde_json::Value = serde_json::from_str(line.trim()).expect("parse response json");
    assert_eq!(value.get("id").and_then(|v| v.as_str()), Some(id));
    assert!(
        value.get("ok").and_then(|v| v.as_bool()).unwrap_or(false),
        "{} failed: {}",
        method,
        value
    );
    value.get("result").cloned().unwrap_or_else(|| json!({}))
}

#[test]
fn sgpa_behavior_locks_hold() {
    // Worked results for a spread of semesters, locked against drift in the
    // band table, the point ladder, and the rounding rule.
    let locks = json!([
        {
            "name": "clean pass across three bands",
            "subjects": [
                { "subjectName": "Mathematics II", "subjectCode": "MA101", "credits": 4, "marksObtained": 91, "maxMarks": 100 },
                { "subjectName": "Physics II", "subjectCode": "PH102", "credits": 3, "marksObtained": 85, "maxMarks": 100 },
                { "subjectName": "Data Structures", "subjectCode": "CS103", "credits": 3, "marksObtained": 72, "maxMarks": 100 }
            ],
            "sgpa": 7.8,
            "performanceLabel": "Excellent",
            "passed": true,
            "failedSubjects": []
        },
        {
            "name": "one failed subject drags the semester",
            "subjects": [
                { "subjectName": "Mathematics III", "subjectCode": "MA201", "credits": 4, "marksObtained": 38, "maxMarks": 100 },
                { "subjectName": "Physics III", "subjectCode": "PH202", "credits": 4, "marksObtained": 55, "maxMarks": 100 },
                { "subjectName": "Digital Logic", "subjectCode": "CS203", "credits": 2, "marksObtained": 66, "maxMarks": 100 }
            ],
            "sgpa": 2.6,
            "performanceLabel": "Poor",
            "passed": false,
            "failedSubjects": ["MA201"]
        },
        {
            "name": "absence zeroes the subject and fails the semester",
            "subjects": [
                { "subjectName": "Chemistry", "subjectCode": "CH104", "credits": 3, "isAbsent": true },
                { "subjectName": "Mathematics I", "subjectCode": "MA105", "credits": 3, "marksObtained": 95, "maxMarks": 100 }
            ],
            "sgpa": 4.5,
            "performanceLabel": "Average",
            "passed": false,
            "failedSubjects": ["CH104"]
        },
        {
            "name": "inclusive lower bounds at every band edge",
            "subjects": [
                { "subjectName": "Circuits", "subjectCode": "EE101", "credits": 4, "marksObtained": 90, "maxMarks": 100 },
                { "subjectName": "Signals", "subjectCode": "EE102", "credits": 4, "marksObtained": 85, "maxMarks": 100 },
                { "subjectName": "Machines", "subjectCode": "EE103", "credits": 4, "marksObtained": 80, "maxMarks": 100 },
                { "subjectName": "Fields", "subjectCode": "EE104", "credits": 4, "marksObtained": 70, "maxMarks": 100 }
            ],
            "sgpa": 7.5,
            "performanceLabel": "Excellent",
            "passed": true,
            "failedSubjects": []
        },
        {
            "name": "marks scale to percent before banding",
            "subjects": [
                { "subjectName": "Physics Lab", "subjectCode": "LAB1", "credits": 2, "marksObtained": 40, "maxMarks": 50 },
                { "subjectName": "Chemistry Lab", "subjectCode": "LAB2", "credits": 2, "marksObtained": 45, "maxMarks": 50 }
            ],
            "sgpa": 8.0,
            "performanceLabel": "Excellent",
            "passed": true,
            "failedSubjects": []
        },
        {
            "name": "all-audit semester is the zero degenerate case",
            "subjects": [
                { "subjectName": "Yoga", "subjectCode": "AU100", "credits": 0, "marksObtained": 88, "maxMarks": 100 }
            ],
            "sgpa": 0.0,
            "performanceLabel": "Poor",
            "passed": true,
            "failedSubjects": []
        },
        {
            "name": "empty semester is the zero sentinel",
            "subjects": [],
            "sgpa": 0.0,
            "performanceLabel": "Poor",
            "passed": false,
            "failedSubjects": []
        }
    ]);

    let (mut child, mut stdin, mut reader) = spawn_sidecar();

    for (i, case) in locks.as_array().expect("locks array").iter().enumerate() {
        let name = case.get("name").and_then(|v| v.as_str()).expect("name");
        let result = request_ok(
            &mut stdin,
            &mut reader,
            &format!("lock-{}", i),
            "grades.sgpa",
            json!({ "subjects": case.get("subjects").cloned().expect("subjects") }),
        );

        let expected_sgpa = case.get("sgpa").and_then(|v| v.as_f64()).expect("sgpa");
        let got_sgpa = result
            .pointer("/summary/sgpa")
            .and_then(|v| v.as_f64())
            .expect("summary.sgpa");
        assert!(
            (got_sgpa - expected_sgpa).abs() < 1e-9,
            "{}: expected sgpa {}, got {}",
            name,
            expected_sgpa,
            got_sgpa
        );

        assert_eq!(
            result.get("performanceLabel").and_then(|v| v.as_str()),
            case.get("performanceLabel").and_then(|v| v.as_str()),
            "{}: performance label",
            name
        );
        assert_eq!(
            result.pointer("/summary/passed").and_then(|v| v.as_bool()),
            case.get("passed").and_then(|v| v.as_bool()),
            "{}: passed flag",
            name
        );
        assert_eq!(
            result
                .pointer("/summary/failedSubjects")
                .cloned()
                .unwrap_or_default(),
            case.get("failedSubjects").cloned().unwrap_or_default(),
            "{}: failed subjects",
            name
        );
    }

    drop(stdin);
    let _ = child.wait();
}
