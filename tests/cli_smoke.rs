use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;

fn yw(db: &Path) -> Command {
    let mut cmd = Command::cargo_bin("yw").expect("yw binary");
    cmd.arg("--db").arg(db).env_remove("RUST_LOG");
    cmd
}

#[test]
fn add_then_calendar_shows_task_on_its_day() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let db = dir.path().join("tasks.json");

    yw(&db)
        .args(["add", "Fire drill", "--month", "2", "--weekday", "4", "--week-rank", "last"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Every year on the last Friday of February"));

    yw(&db)
        .args(["calendar", "--year", "2021", "--month", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("February 2021"))
        .stdout(predicate::str::contains(" 26 [ ] Fire drill (#1)"));

    Ok(())
}

#[test]
fn mixed_schedule_is_rejected_and_not_saved() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let db = dir.path().join("tasks.json");

    yw(&db)
        .args(["add", "Mixed", "--month", "5", "--day", "15", "--weekday", "2", "--week-rank", "2nd"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("not both"));

    assert!(!db.exists());
    Ok(())
}

#[test]
fn quarterly_without_anchor_is_rejected() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let db = dir.path().join("tasks.json");

    yw(&db)
        .args(["add", "VAT return", "--day", "10", "--recurrence", "quarterly"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("quarterly schedule needs an anchor month"));

    Ok(())
}

#[test]
fn list_done_and_delete_flow() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let db = dir.path().join("tasks.json");

    yw(&db)
        .args(["add", "VAT return", "--month", "2", "--day", "10", "--recurrence", "quarterly"])
        .assert()
        .success();
    yw(&db)
        .args(["add", "Rent", "--day", "1", "--recurrence", "monthly"])
        .assert()
        .success();

    yw(&db)
        .args(["list", "--month", "5", "--year", "2024"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Rent"))
        .stdout(predicate::str::contains("VAT return"));

    yw(&db)
        .args(["done", "vat return", "--year", "2024", "--month", "5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Marked 'VAT return' done for May 2024"));

    yw(&db)
        .args(["list", "--month", "5", "--year", "2024"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[x]"));

    yw(&db).args(["delete", "Rent"]).assert().success();

    yw(&db)
        .args(["list", "--month", "5", "--year", "2024"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Rent").not());

    // VAT is quarterly from February: nothing in June.
    yw(&db)
        .args(["list", "--month", "6", "--year", "2024"])
        .assert()
        .success()
        .stdout(predicate::str::contains("VAT return").not());

    Ok(())
}

#[test]
fn locale_from_config_file() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let db = dir.path().join("tasks.json");
    std::fs::write(dir.path().join("config.toml"), "locale = \"nb\"\n")?;

    yw(&db)
        .args(["add", "Vaske takrenner", "--month", "3", "--day", "15"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Årlig den 15. mars"));

    yw(&db)
        .args(["--locale", "en", "season", "spring"])
        .assert()
        .success()
        .stdout(predicate::str::contains("15.03 (spring)"));

    Ok(())
}

#[test]
fn edit_moves_derived_season_and_switches_kind() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let db = dir.path().join("tasks.json");

    yw(&db)
        .args(["add", "Clean gutters", "--month", "4", "--day", "15"])
        .assert()
        .success();

    yw(&db)
        .args(["edit", "Clean gutters", "--month", "7"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Every year on 15 July"));
    yw(&db)
        .args(["season", "summer"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Clean gutters"));
    yw(&db)
        .args(["season", "spring"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Clean gutters").not());

    yw(&db)
        .args(["edit", "1", "--clear-day", "--weekday", "0", "--week-rank", "last"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Every year on the last Monday of July"));

    // Adding a day to an ordinal rule mixes the kinds; the file stays as it was.
    let before = std::fs::read_to_string(&db)?;
    yw(&db)
        .args(["edit", "1", "--day", "3"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("not both"));
    assert_eq!(std::fs::read_to_string(&db)?, before);

    Ok(())
}

#[test]
fn edit_keeps_explicit_season_when_dates_are_cleared() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let db = dir.path().join("tasks.json");

    yw(&db)
        .args(["add", "Swim", "--month", "7", "--weekday", "5", "--week-rank", "1st", "--season", "summer"])
        .assert()
        .success();
    yw(&db)
        .args(["edit", "Swim", "--clear-weekday", "--clear-month"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Every year in summer"));

    // Without a season a bare month is not a schedule.
    yw(&db)
        .args(["add", "Paint fence", "--month", "5"])
        .assert()
        .code(2);

    Ok(())
}

#[test]
fn whole_year_mark_shows_done_in_list_and_view() -> Result<(), Box<dyn std::error::Error>> {
    use chrono::Datelike;

    let dir = tempfile::tempdir()?;
    let db = dir.path().join("tasks.json");
    let year = chrono::Local::now().year();

    yw(&db)
        .args(["add", "Rent", "--day", "1", "--recurrence", "monthly"])
        .assert()
        .success();

    for y in [year, year + 1] {
        yw(&db)
            .args(["done", "Rent", "--whole-year", "--year", &y.to_string()])
            .assert()
            .success()
            .stdout(predicate::str::contains(format!("Marked 'Rent' done for {y}")));
    }

    yw(&db)
        .args(["list", "--month", "8", "--year", &year.to_string()])
        .assert()
        .success()
        .stdout(predicate::str::contains("[x]"));

    // Twelve monthly dates from today fall within this year and the next.
    yw(&db)
        .args(["view", "Rent"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[x]").count(12));

    Ok(())
}
