/// Scenery Terminal - tutorial 3D scenes in the terminal
///
/// Controls:
///   - Tab / Shift+Tab: Select a control
///   - +/-: Adjust the selected slider
///   - Space / Enter: Toggle a checkbox or press a button
///   - Arrow Keys: Orbit, Shift+Arrows: Pan, PgUp/PgDn: Zoom
///   - Q/ESC: Quit
use anyhow::{Context, Result};
use clap::Parser;
use log::warn;
use scenery_core::{demos, Script};
use scenery_terminal::cli::Cli;
use scenery_terminal::{run_headless, HeadlessOptions, RenderStyle, TerminalApp};
use std::fs;
use std::io::{self, Write};

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err:?}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    if cli.list {
        let mut stdout = io::stdout().lock();
        for (name, title) in demos::catalog() {
            writeln!(stdout, "{name:<18} {title}")?;
        }
        return Ok(());
    }

    let script = match &cli.script {
        Some(path) => {
            let source = fs::read_to_string(path)
                .with_context(|| format!("failed to read script {}", path.display()))?;
            let script = Script::parse(&source)
                .with_context(|| format!("failed to parse script {}", path.display()))?;
            Some(script)
        }
        None => None,
    };

    let style = if cli.ascii { RenderStyle::Ascii } else { RenderStyle::HalfBlock };

    if cli.headless {
        let demo = demos::build(&cli.scene, cli.width, cli.height)
            .with_context(|| format!("cannot build scene `{}`", cli.scene))?;
        let options = HeadlessOptions {
            frames: cli.frames,
            fps: cli.fps,
        };
        run_headless(demo, options, script, &mut io::stdout().lock())?;
        return Ok(());
    }

    if script.is_some() {
        warn!("--script is only replayed in --headless runs");
    }

    let mut app = TerminalApp::new(&cli.scene, style, cli.fps)
        .with_context(|| format!("cannot start scene `{}`", cli.scene))?;
    let frames = app.run()?;
    println!("Stopped `{}` after {frames} frames", cli.scene);
    Ok(())
}
