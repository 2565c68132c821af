//! Low-level nom parsers for margin magnitudes and units.
//!
//! Margin values arrive as free text from request payloads, so these parsers
//! are forgiving: a number is scanned the way a browser's
//! `parseFloat` would (longest numeric prefix), and only the strict
//! `<magnitude><unit>` form is recognised as carrying a unit.

use nom::IResult;
use nom::Parser;
use nom::branch::alt;
use nom::bytes::complete::{tag, take_while1};
use nom::character::complete::multispace0;
use nom::combinator::{all_consuming, map, opt};

/// Length units accepted in margin values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthUnit {
    Px,
    Pt,
    Mm,
    Cm,
    In,
}

impl LengthUnit {
    /// Number of PDF points (1/72") in one unit. Pixels assume 96 DPI.
    pub const fn points_per_unit(self) -> f64 {
        match self {
            LengthUnit::Pt => 1.0,
            LengthUnit::Px => 72.0 / 96.0,
            LengthUnit::Mm => 2.83465,
            LengthUnit::Cm => 28.3465,
            LengthUnit::In => 72.0,
        }
    }
}

// --- Helper Parsers ---

/// The run of characters a decimal number can be built from.
fn numeric_run(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_ascii_digit() || matches!(c, '.' | '+' | '-' | 'e' | 'E'))
        .parse(input)
}

fn unit(input: &str) -> IResult<&str, LengthUnit> {
    alt((
        map(tag("px"), |_| LengthUnit::Px),
        map(tag("pt"), |_| LengthUnit::Pt),
        map(tag("mm"), |_| LengthUnit::Mm),
        map(tag("cm"), |_| LengthUnit::Cm),
        map(tag("in"), |_| LengthUnit::In),
    ))
    .parse(input)
}

/// Matches the whole of `<digits and dots><whitespace>?<unit>?`.
///
/// Returns the raw magnitude text (which may still be unparseable, e.g.
/// `"1.2.3"` or `"."`) and the unit when one was given.
pub fn magnitude_with_unit(input: &str) -> IResult<&str, (&str, Option<LengthUnit>)> {
    all_consuming(map(
        (
            take_while1(|c: char| c.is_ascii_digit() || c == '.'),
            multispace0,
            opt(unit),
        ),
        |(magnitude, _, unit)| (magnitude, unit),
    ))
    .parse(input)
}

/// Parses the longest leading decimal number of `input`, ignoring leading
/// whitespace and any trailing text. `"12.5abc"` yields `12.5`, `"abc"`
/// yields `None`.
pub fn leading_number(input: &str) -> Option<f64> {
    let (_, run) = numeric_run(input.trim_start()).ok()?;
    (1..=run.len())
        .rev()
        .find_map(|end| run[..end].parse::<f64>().ok())
}
