/// Error type shared by the scene, control and loop layers
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum Error {
    /// A control declared by a scene is not provided by the host.
    #[error("control `{0}` is not present on the host page")]
    MissingControl(String),

    #[error("no control named `{0}` is declared")]
    UnknownControl(String),

    #[error("control `{control}` expects a {expected} value")]
    ControlValueMismatch {
        control: String,
        expected: &'static str,
    },

    #[error("`{model}` has no `{parameter}` parameter")]
    UnsupportedParameter {
        model: &'static str,
        parameter: &'static str,
    },

    #[error("invalid viewport size {width}x{height}")]
    InvalidViewport { width: u32, height: u32 },

    #[error("unknown scene `{0}`")]
    UnknownScene(String),

    #[error("no {kind} with handle {index}")]
    UnknownEntity { kind: &'static str, index: usize },

    #[error("control script line {line}: {message}")]
    Script { line: usize, message: String },

    #[error("render surface failure: {0}")]
    Surface(String),
}

pub type Result<T> = std::result::Result<T, Error>;
