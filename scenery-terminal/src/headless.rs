/// Deterministic runs without a terminal
///
/// Frames are stepped on a synthetic clock, so a run with the same scene,
/// frame count, rate and script always ends in the same state.
use anyhow::{Context, Result};
use log::{info, warn};
use scenery_core::{Demo, ManualClock, Rasterizer, Script, UpdateLoop};
use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeadlessOptions {
    pub frames: u64,
    pub fps: u32,
}

/// Outcome of a headless run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeadlessReport {
    pub frames: u64,
    pub elapsed: f64,
    /// Pixels covered by geometry or helpers in the last frame.
    pub covered: usize,
}

pub fn run_headless<W: Write>(
    demo: Demo,
    options: HeadlessOptions,
    mut script: Option<Script>,
    out: &mut W,
) -> Result<HeadlessReport> {
    let viewport = demo.ctx.viewport;
    writeln!(
        out,
        "Loaded scene `{}` with {} objects ({} lights)",
        demo.name,
        demo.ctx.scene.objects().count(),
        demo.ctx.scene.lights().count()
    )?;
    for object in demo.ctx.scene.objects() {
        writeln!(out, " - {} ({})", object.name, object.shape.name())?;
    }

    let clock = ManualClock::new();
    let mut update = UpdateLoop::new(demo, clock.clone());
    let queue = update.queue();
    let stop = update.stop_handle();
    let mut surface = Rasterizer::new(viewport.width as usize, viewport.height as usize);
    let frame_time = 1.0 / f64::from(options.fps.max(1));

    if let Some(script) = &script {
        info!("replaying {} script command(s)", script.len());
    }

    let mut elapsed = 0.0;
    for frame in 0..options.frames {
        elapsed = frame as f64 * frame_time;
        clock.set(elapsed);
        if let Some(script) = script.as_mut() {
            for command in script.due(elapsed) {
                queue.push(command);
            }
        }
        update
            .tick(&mut surface)
            .with_context(|| format!("frame {} at {elapsed:.3}s failed", frame + 1))?;
        if stop.is_stopped() {
            break;
        }
    }

    let report = HeadlessReport {
        frames: update.frames(),
        elapsed,
        covered: surface.frame().covered_count(),
    };
    info!("headless run of `{}` finished after {} frames", update.name(), report.frames);
    if let Some(script) = script.as_ref().filter(|s| s.remaining() > 0) {
        warn!("{} script command(s) fall after the last frame and were not run", script.remaining());
    }

    writeln!(
        out,
        "Rendered {} frame(s) over {:.2}s, {} of {} pixels covered",
        report.frames,
        report.elapsed,
        report.covered,
        surface.frame().width() * surface.frame().height()
    )?;
    print_final_state(&update, out)?;
    Ok(report)
}

fn print_final_state<W: Write>(update: &UpdateLoop<ManualClock>, out: &mut W) -> Result<()> {
    let ctx = update.context();

    writeln!(out, "Final object states:")?;
    for object in ctx.scene.objects() {
        let p = object.transform.position;
        let r = object.transform.rotation;
        writeln!(
            out,
            " - {} pos=({:.2}, {:.2}, {:.2}) rot=({:.2}, {:.2}, {:.2}) opacity={:.2}{}",
            object.name,
            p.x,
            p.y,
            p.z,
            r.x,
            r.y,
            r.z,
            object.material.opacity,
            if object.material.wireframe { " wireframe" } else { "" }
        )?;
    }

    writeln!(out, "Final light states:")?;
    for (name, light) in ctx.scene.lights() {
        let p = light.position;
        writeln!(
            out,
            " - {} ({}) intensity={:.2} visible={} pos=({:.2}, {:.2}, {:.2})",
            name,
            light.kind.name(),
            light.intensity,
            light.visible,
            p.x,
            p.y,
            p.z
        )?;
    }

    let controls = update.panel().controls();
    if !controls.is_empty() {
        writeln!(out, "Controls:")?;
        for control in controls {
            match control.display() {
                Some(text) => writeln!(out, " - {} = {}", control.spec.id, text)?,
                None => writeln!(out, " - {} = {:?}", control.spec.id, control.value())?,
            }
        }
    }

    let camera = &ctx.camera;
    writeln!(
        out,
        "Camera pos=({:.2}, {:.2}, {:.2}) target=({:.2}, {:.2}, {:.2}) aspect={:.3}",
        camera.position.x,
        camera.position.y,
        camera.position.z,
        camera.target.x,
        camera.target.y,
        camera.target.z,
        camera.aspect
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use scenery_core::demos;

    fn run(scene: &str, frames: u64, script: Option<&str>) -> (HeadlessReport, String) {
        let demo = demos::build(scene, 40, 30).unwrap();
        let script = script.map(|s| Script::parse(s).unwrap());
        let mut out = Vec::new();
        let report = run_headless(demo, HeadlessOptions { frames, fps: 30 }, script, &mut out).unwrap();
        (report, String::from_utf8(out).unwrap())
    }

    #[test]
    fn renders_the_requested_frames() {
        let (report, out) = run("orbiting", 31, None);
        assert_eq!(report.frames, 31);
        assert!((report.elapsed - 1.0).abs() < 1e-9);
        assert!(report.covered > 0);
        assert!(out.contains("Loaded scene `orbiting` with 4 objects (3 lights)"));
        assert!(out.contains(" - orbit pos=(4.21, 0.00, 2.70)"));
    }

    #[test]
    fn script_drives_controls_and_stops() {
        let (report, out) = run(
            "lighting",
            100,
            Some("at 0 set ambientSlider 1.5\nat 0.5 check pointToggle off\nat 1 stop\n"),
        );
        assert_eq!(report.frames, 31);
        assert!(out.contains(" - ambient (ambient) intensity=1.50"));
        assert!(out.contains(" - point (point) intensity=1.00 visible=false"));
        assert!(out.contains(" - ambientSlider = 1.5"));
    }

    #[test]
    fn unknown_control_in_script_fails_the_run() {
        let demo = demos::build("basic", 20, 20).unwrap();
        let script = Script::parse("at 0 click nowhere").ok();
        let err = run_headless(demo, HeadlessOptions { frames: 5, fps: 30 }, script, &mut Vec::new()).unwrap_err();
        assert!(format!("{err:#}").contains("nowhere"));
    }
}
