/// Timed command scripts for headless replay
///
/// One command per line, `#` starts a comment:
///
/// ```text
/// at 0.5 set ambientSlider 1.2
/// at 1.0 check helpersToggle off
/// at 1.5 click topView
/// at 2.0 resize 120 40
/// at 2.5 pointer 0.5 -0.25
/// at 3.0 rotate 0.2 0.0
/// at 3.0 zoom 0.8
/// at 3.5 pan 1.0 0.0
/// at 4.0 stop
/// ```
use nom::{
    branch::alt,
    bytes::complete::{tag, take_while1},
    character::complete::{space0, space1, u32 as decimal},
    combinator::{all_consuming, map, value},
    number::complete::{double, float},
    sequence::{preceded, separated_pair, terminated, tuple},
    IResult,
};

use crate::command::Command;
use crate::error::{Error, Result};

/// A command scheduled at a clock reading
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptEntry {
    pub at: f64,
    pub command: Command,
}

/// Parsed script with a replay cursor
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Script {
    entries: Vec<ScriptEntry>,
    cursor: usize,
}

impl Script {
    pub fn parse(source: &str) -> Result<Self> {
        let mut entries = Vec::new();
        for (index, raw) in source.lines().enumerate() {
            let line = raw.split('#').next().unwrap_or_default().trim();
            if line.is_empty() {
                continue;
            }
            match all_consuming(parse_entry)(line) {
                Ok((_, entry)) if !entry.at.is_finite() || entry.at < 0.0 => {
                    return Err(Error::Script {
                        line: index + 1,
                        message: format!("time `{}` is not a finite, non-negative number of seconds", entry.at),
                    })
                }
                Ok((_, entry)) => entries.push(entry),
                Err(e) => {
                    return Err(Error::Script {
                        line: index + 1,
                        message: describe(line, e),
                    })
                }
            }
        }
        // Stable, so same-time commands keep file order.
        entries.sort_by(|a, b| a.at.total_cmp(&b.at));
        Ok(Self { entries, cursor: 0 })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Commands due at or before `elapsed` that were not yet returned.
    pub fn due(&mut self, elapsed: f64) -> Vec<Command> {
        let start = self.cursor;
        while self.cursor < self.entries.len() && self.entries[self.cursor].at <= elapsed {
            self.cursor += 1;
        }
        self.entries[start..self.cursor].iter().map(|e| e.command.clone()).collect()
    }

    /// Entries not yet handed out by [`Script::due`].
    pub fn remaining(&self) -> usize {
        self.entries.len() - self.cursor
    }
}

fn describe(line: &str, error: nom::Err<nom::error::Error<&str>>) -> String {
    match error {
        nom::Err::Error(e) | nom::Err::Failure(e) if e.input.is_empty() => {
            format!("unexpected end of `{line}`")
        }
        nom::Err::Error(e) | nom::Err::Failure(e) => format!("cannot parse `{}`", e.input),
        nom::Err::Incomplete(_) => format!("incomplete `{line}`"),
    }
}

fn parse_entry(input: &str) -> IResult<&str, ScriptEntry> {
    let (input, at) = preceded(terminated(tag("at"), space1), double)(input)?;
    let (input, command) = preceded(space1, parse_command)(input)?;
    let (input, _) = space0(input)?;
    Ok((input, ScriptEntry { at, command }))
}

fn parse_command(input: &str) -> IResult<&str, Command> {
    alt((
        map(preceded(tag("set"), tuple((argument(control_id), argument(float)))), |(id, v)| {
            Command::slider(id, v)
        }),
        map(preceded(tag("check"), tuple((argument(control_id), argument(switch)))), |(id, on)| {
            Command::checkbox(id, on)
        }),
        map(preceded(tag("click"), argument(control_id)), |id| Command::click(id)),
        map(preceded(tag("resize"), pair_of(decimal)), |(width, height)| Command::Resize { width, height }),
        map(preceded(tag("pointer"), pair_of(float)), |(x, y)| Command::Pointer { x, y }),
        map(preceded(tag("rotate"), pair_of(float)), |(left, up)| Command::OrbitRotate { left, up }),
        map(preceded(tag("zoom"), argument(float)), Command::OrbitZoom),
        map(preceded(tag("pan"), pair_of(float)), |(right, up)| Command::OrbitPan { right, up }),
        value(Command::Stop, tag("stop")),
    ))(input)
}

fn argument<'a, O, F>(parser: F) -> impl FnMut(&'a str) -> IResult<&'a str, O>
where
    F: FnMut(&'a str) -> IResult<&'a str, O>,
{
    preceded(space1, parser)
}

fn pair_of<'a, O, F>(parser: F) -> impl FnMut(&'a str) -> IResult<&'a str, (O, O)>
where
    F: FnMut(&'a str) -> IResult<&'a str, O> + Copy,
{
    preceded(space1, separated_pair(parser, space1, parser))
}

fn control_id(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_ascii_alphanumeric() || c == '_' || c == '-')(input)
}

fn switch(input: &str) -> IResult<&str, bool> {
    alt((
        value(true, alt((tag("on"), tag("true")))),
        value(false, alt((tag("off"), tag("false")))),
    ))(input)
}
