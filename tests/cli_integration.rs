//! Drives the compiled `solar-sizer` binary.

use std::process::{Command, Output};

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_solar-sizer"))
        .args(args)
        .env("RUST_LOG", "warn")
        .output()
        .expect("solar-sizer process should run")
}

fn stdout_of(output: &Output) -> String {
    assert!(
        output.status.success(),
        "solar-sizer failed: stderr={}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout.clone()).expect("stdout should be valid UTF-8")
}

#[test]
fn json_output_is_a_complete_plan() {
    let output = run(&[
        "--template",
        "home",
        "--appliance",
        "fridge_small:normal:1",
        "--appliance",
        "led_bulb:heavy:3",
        "--bill-kwh",
        "60",
        "--location",
        "Hargeisa",
        "--json",
    ]);
    let json: serde_json::Value =
        serde_json::from_str(&stdout_of(&output)).expect("stdout should be JSON");

    assert_eq!(json["templateId"], "home");
    assert_eq!(json["location"], "Hargeisa");
    assert_eq!(json["applianceBreakdown"].as_array().map(Vec::len), Some(2));
    assert_eq!(
        json["refinementNotes"][0],
        "Calibrated using monthly bill (kWh)."
    );
    let watt = json["panelWattage"].as_u64().unwrap_or(0);
    let count = json["panelCount"].as_u64().unwrap_or(0);
    let each = json["panelWattEach"].as_u64().unwrap_or(0);
    assert!(watt > 0);
    assert_eq!(watt, count * each);
}

#[test]
fn text_report_and_narrative_are_printed() {
    let stdout = stdout_of(&run(&["--template", "shop", "--narrative"]));
    assert!(stdout.contains("--- Solar Plan (shop) ---"));
    assert!(stdout.contains("For the shop setup, we recommend"));
}

#[test]
fn out_of_range_quantity_is_rejected() {
    let output = run(&["--appliance", "fridge_small:normal:5"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("appliances[0].quantity"), "stderr={stderr}");
}

#[test]
fn unknown_preset_is_rejected() {
    let output = run(&["--preset", "tropical"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("unknown preset"));
}

#[test]
fn list_prints_both_catalogs() {
    let stdout = stdout_of(&run(&["--list"]));
    assert!(stdout.contains("Templates:"));
    assert!(stdout.contains("clinic"));
    assert!(stdout.contains("Appliances:"));
    assert!(stdout.contains("water_pump"));
}

#[test]
fn breakdown_csv_is_written() {
    let path = std::env::temp_dir().join(format!(
        "solar-sizer-cli-breakdown-{}.csv",
        std::process::id()
    ));
    let path_str = path.to_string_lossy().into_owned();
    stdout_of(&run(&[
        "--template",
        "clinic",
        "--preset",
        "conservative",
        "--breakdown-out",
        &path_str,
    ]));

    let csv = std::fs::read_to_string(&path).expect("breakdown file should exist");
    std::fs::remove_file(&path).ok();
    let mut lines = csv.lines();
    assert_eq!(
        lines.next(),
        Some("id,name,category,tier,quantity,hours_per_day,wattage,daily_wh")
    );
    assert!(lines.count() >= 1);
}
