#![forbid(unsafe_code)]
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn cli(team: &Path) -> Command {
    let mut cmd = Command::cargo_bin("relance-cli").unwrap();
    cmd.arg("--team").arg(team);
    cmd
}

fn seed(dir: &Path) -> std::path::PathBuf {
    let team = dir.join("team.json");
    let people = dir.join("people.csv");
    fs::write(
        &people,
        "handle,display_name,days,start_time,end_time,active\n\
         alice,Alice,mon-fri,09:00,18:00,yes\n\
         bob,Bob,mon;wed,10:00,16:00,\n\
         eve,Eve,,,,no\n",
    )
    .unwrap();
    cli(&team)
        .args(["import-salespeople", "--csv"])
        .arg(&people)
        .assert()
        .success();
    team
}

#[test]
fn due_on_weekend_moves_to_monday() {
    let dir = tempdir().unwrap();
    let team = seed(dir.path());
    cli(&team)
        .args(["--now", "2025-03-08T10:00", "due", "--handle", "alice"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2025-03-10T09:00:00 next-workday"));
}

#[test]
fn due_without_schedule_is_unadjusted() {
    let dir = tempdir().unwrap();
    let team = seed(dir.path());
    cli(&team)
        .args(["--now", "2025-03-08T10:00", "due", "--handle", "eve", "--delay-minutes", "15"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2025-03-08T10:15:00 unadjusted"));
}

#[test]
fn leaves_import_reschedules_and_overdue_exits_with_warning() {
    let dir = tempdir().unwrap();
    let team = seed(dir.path());

    cli(&team)
        .args(["--now", "2025-03-04T10:00", "create", "--lead", "anna", "--handle", "alice", "--delay-minutes", "1440"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2025-03-05T10:00:00"));

    let leaves = dir.path().join("leaves.csv");
    fs::write(
        &leaves,
        "handle,start_date,end_date,start_time,end_time,status\nalice,2025-03-05,2025-03-05,,,approved\n",
    )
    .unwrap();
    cli(&team)
        .args(["--now", "2025-03-04T10:00", "import-leaves", "--csv"])
        .arg(&leaves)
        .assert()
        .success()
        .stdout(predicate::str::contains("1 follow-up(s) rescheduled"));

    let csv_out = dir.path().join("follow_ups.csv");
    cli(&team)
        .args(["list", "--out-csv"])
        .arg(&csv_out)
        .assert()
        .success()
        .stdout(predicate::str::contains("2025-03-06T09:00"));
    let exported = fs::read_to_string(&csv_out).unwrap();
    assert!(exported.starts_with("id,lead,salesperson,due_at,status,escalation_level"));
    assert!(exported.contains("anna,alice,2025-03-06T09:00:00,pending,0"));

    cli(&team)
        .args(["--now", "2025-03-06T08:00", "overdue"])
        .assert()
        .success()
        .stdout(predicate::str::contains("OK: no overdue follow-up"));

    cli(&team)
        .args(["--now", "2025-03-06T12:00", "overdue"])
        .assert()
        .code(2)
        .stdout(predicate::str::contains("180 min"));
}

#[test]
fn unknown_handle_fails() {
    let dir = tempdir().unwrap();
    let team = seed(dir.path());
    cli(&team)
        .args(["--now", "2025-03-04T10:00", "create", "--lead", "x", "--handle", "nobody"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown salesperson handle: nobody"));
}

#[test]
fn notify_writes_notice_file() {
    let dir = tempdir().unwrap();
    let team = seed(dir.path());
    let out = cli(&team)
        .args(["--now", "2025-03-04T10:00", "create", "--lead", "anna", "--handle", "alice"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let stdout = String::from_utf8(out).unwrap();
    let id = stdout.split_whitespace().next().unwrap().to_string();

    let notice = dir.path().join("notice.txt");
    cli(&team)
        .args(["--now", "2025-03-05T10:30", "notify", "--id", &id, "--out"])
        .arg(&notice)
        .assert()
        .success()
        .stdout(predicate::str::contains("Notice generated for alice"));
    let text = fs::read_to_string(&notice).unwrap();
    assert!(text.contains("It is now 24h30 overdue"));
}

#[test]
fn huge_delay_is_rejected_before_scheduling() {
    let dir = tempdir().unwrap();
    let team = seed(dir.path());
    cli(&team)
        .args(["--now", "2025-03-04T10:00", "due", "--handle", "alice", "--delay-minutes", "9223372036854775807"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn team_file_with_huge_delay_fails_to_load() {
    let dir = tempdir().unwrap();
    let team = seed(dir.path());
    cli(&team)
        .args(["--now", "2025-03-04T10:00", "create", "--lead", "anna", "--handle", "alice", "--delay-minutes", "30"])
        .assert()
        .success();
    let raw = fs::read_to_string(&team).unwrap();
    let tampered = raw.replace("\"delay_minutes\": 30", "\"delay_minutes\": 9223372036854775807");
    assert_ne!(raw, tampered);
    fs::write(&team, tampered).unwrap();

    cli(&team)
        .args(["--now", "2025-03-04T10:00", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("out-of-range delay"));
}

#[test]
fn duplicate_handles_are_rejected_on_import() {
    let dir = tempdir().unwrap();
    let team = dir.path().join("team.json");
    let people = dir.path().join("people.csv");
    fs::write(&people, "handle,display_name,days,start_time,end_time\nalice,Alice,,,\nalice,Alice 2,,,\n").unwrap();
    cli(&team)
        .args(["import-salespeople", "--csv"])
        .arg(&people)
        .assert()
        .failure()
        .stderr(predicate::str::contains("duplicate salesperson handle: alice"));
    assert!(!team.exists());

    let team = seed(dir.path());
    let again = dir.path().join("again.csv");
    fs::write(&again, "handle,display_name,days,start_time,end_time\nbob,Bobby,,,\n").unwrap();
    cli(&team)
        .args(["import-salespeople", "--csv"])
        .arg(&again)
        .assert()
        .failure()
        .stderr(predicate::str::contains("duplicate salesperson handle: bob"));
}
