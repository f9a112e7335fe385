#![forbid(unsafe_code)]
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

const BUNDLE: &str = r#"{
  "configuration": { "vacationDays": 30, "annualHourLimit": 2208, "analysisYear": 2026, "analysisStartMonth": 1 },
  "cycles": [
    { "id": "12x9", "workDays": 12, "restDays": 9, "isPreferred": true },
    { "id": "14x7", "workDays": 14, "restDays": 7 }
  ],
  "positions": [
    { "id": "central_1", "type": "central", "requiredOperators": 1 }
  ],
  "operators": [
    { "id": "46781909", "name": "AGUIRRE", "positionType": "central", "initialPosition": "central_1",
      "initialCycleId": "12x9", "initialCycleDay": 19, "initialShift": "DESCANSO",
      "anniversaryReferenceDate": "25/01/2021", "pendingVacationDays": 30 },
    { "id": "70320115", "name": "SARMIENTO", "positionType": "central", "initialPosition": "vacation-pool",
      "initialCycleId": "12x9", "initialShift": "day", "anniversaryReferenceDate": "13/03/2024" }
  ]
}"#;

fn write_bundle(dir: &Path, content: &str) -> String {
    let path = dir.join("bundle.json");
    fs::write(&path, content).unwrap();
    path.to_string_lossy().into_owned()
}

#[test]
fn run_writes_output_json() {
    let dir = tempdir().unwrap();
    let input = write_bundle(dir.path(), BUNDLE);
    let out = dir.path().join("schedule.json");

    Command::cargo_bin("rotaplan-cli")
        .unwrap()
        .args(["--input", input.as_str(), "run", "--out"])
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("730 records"));

    let output: serde_json::Value = serde_json::from_slice(&fs::read(&out).unwrap()).unwrap();
    let schedule = output["schedule"].as_array().unwrap();
    assert_eq!(schedule.len(), 730);
    assert_eq!(schedule[0]["date"], "01/01/2026");
    assert_eq!(schedule[0]["operatorId"], "46781909");
    assert_eq!(output["metrics"]["operatorCount"], 2);
    assert_eq!(output["vacationPlan"][1]["startOffset"], 51);
}

#[test]
fn check_reports_gaps_with_warning_code() {
    let dir = tempdir().unwrap();
    let input = write_bundle(dir.path(), BUNDLE);

    Command::cargo_bin("rotaplan-cli")
        .unwrap()
        .args(["--input", input.as_str(), "check"])
        .assert()
        .code(2)
        .stdout(predicate::str::contains("gap | 01/01/2026 | central_1"));
}

#[test]
fn plan_lists_slots() {
    let dir = tempdir().unwrap();
    let input = write_bundle(dir.path(), BUNDLE);

    Command::cargo_bin("rotaplan-cli")
        .unwrap()
        .args(["--input", input.as_str(), "plan"])
        .assert()
        .success()
        .stdout(predicate::str::contains(" 1. 46781909 | days   0- 29"))
        .stdout(predicate::str::contains("days  51- 80 | anniversary 13/03/2026 | replacement"));
}

#[test]
fn unknown_fields_are_rejected() {
    let dir = tempdir().unwrap();
    let input = write_bundle(
        dir.path(),
        &BUNDLE.replace("\"pendingVacationDays\": 30", "\"vacPendientes\": 30"),
    );

    Command::cargo_bin("rotaplan-cli")
        .unwrap()
        .args(["--input", input.as_str(), "run"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("parsing input bundle"));
}
