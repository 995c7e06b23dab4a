// cli.rs - Command-line interface configuration
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(name = "scenery-terminal")]
#[command(about = "Tutorial 3D scenes rendered in the terminal", long_about = None)]
pub struct Cli {
    /// Scene to run (see --list)
    #[arg(long, short, default_value = "basic")]
    pub scene: String,

    /// Target frame rate
    #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(u32).range(1..=240))]
    pub fps: u32,

    /// Render without a terminal and print the final scene state
    #[arg(long)]
    pub headless: bool,

    /// Frames to render in headless mode
    #[arg(long, default_value_t = 90)]
    pub frames: u64,

    /// Headless framebuffer width in pixels
    #[arg(long, default_value_t = 80, value_parser = clap::value_parser!(u32).range(1..))]
    pub width: u32,

    /// Headless framebuffer height in pixels
    #[arg(long, default_value_t = 48, value_parser = clap::value_parser!(u32).range(1..))]
    pub height: u32,

    /// Control script replayed during a headless run
    #[arg(long)]
    pub script: Option<PathBuf>,

    /// Use the character ramp instead of colored half blocks
    #[arg(long)]
    pub ascii: bool,

    /// List the available scenes and exit
    #[arg(long)]
    pub list: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_terminal_target() {
        let cli = Cli::parse_from(["scenery-terminal"]);
        assert_eq!(cli.scene, "basic");
        assert_eq!(cli.fps, 30);
        assert!(!cli.headless);
    }

    #[test]
    fn zero_fps_is_rejected() {
        assert!(Cli::try_parse_from(["scenery-terminal", "--fps", "0"]).is_err());
    }
}
