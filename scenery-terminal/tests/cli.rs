use assert_cmd::prelude::*;
use predicates::str::contains;
use std::io::Write;
use std::process::Command;
use tempfile::NamedTempFile;

fn headless(scene: &str) -> Command {
    let mut cmd = Command::cargo_bin("scenery-terminal").expect("binary exists");
    cmd.args(["--headless", "--scene", scene, "--width", "40", "--height", "30"]);
    cmd
}

#[test]
fn list_prints_every_scene() {
    let mut cmd = Command::cargo_bin("scenery-terminal").expect("binary exists");
    cmd.arg("--list");
    cmd.assert()
        .success()
        .stdout(contains("basic"))
        .stdout(contains("helpers-orbit"))
        .stdout(contains("user-interactions"));
}

#[test]
fn headless_run_prints_final_state() {
    let mut cmd = headless("orbiting");
    cmd.args(["--frames", "31", "--fps", "30"]);
    cmd.assert()
        .success()
        .stdout(contains("Loaded scene `orbiting` with 4 objects (3 lights)"))
        .stdout(contains("Rendered 31 frame(s) over 1.00s"))
        .stdout(contains(" - orbit pos=(4.21, 0.00, 2.70)"));
}

#[test]
fn headless_run_replays_a_script() {
    let mut script = NamedTempFile::new().expect("temp script");
    writeln!(script, "# dim everything but the spot").expect("write script");
    writeln!(script, "at 0.1 set ambientSlider 0.0").expect("write script");
    writeln!(script, "at 0.2 set spotAngleSlider 0.5").expect("write script");
    writeln!(script, "at 0.3 check helpersToggle off").expect("write script");

    let mut cmd = headless("lighting");
    cmd.args(["--frames", "15"]).arg("--script").arg(script.path());
    cmd.assert()
        .success()
        .stdout(contains(" - ambient (ambient) intensity=0.00"))
        .stdout(contains(" - spotAngleSlider = 0.50"))
        .stdout(contains(" - helpersToggle = Checked(false)"));
}

#[test]
fn unknown_scene_fails() {
    let mut cmd = headless("teapot");
    cmd.assert().failure().stderr(contains("unknown scene `teapot`"));
}

#[test]
fn malformed_script_reports_its_line() {
    let mut script = NamedTempFile::new().expect("temp script");
    writeln!(script, "at 0 click topView").expect("write script");
    writeln!(script, "whenever set opacity 0.5").expect("write script");

    let mut cmd = headless("materials");
    cmd.arg("--script").arg(script.path());
    cmd.assert().failure().stderr(contains("line 2"));
}
