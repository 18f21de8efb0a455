//! Interactive date prompts.

use std::io::{BufRead, Write};

use anyhow::{bail, Result};
use chrono::{Local, NaiveDate};
use shared::DateRange;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Empty input selects `default`; anything else must be YYYY-MM-DD.
pub fn parse_date_input(input: &str, default: NaiveDate) -> Result<NaiveDate, chrono::ParseError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(default);
    }
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
}

/// Ask for start and end dates until a valid window is given.
pub fn prompt_range<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> Result<DateRange> {
    prompt_range_from(input, output, Local::now().date_naive())
}

pub fn prompt_range_from<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    today: NaiveDate,
) -> Result<DateRange> {
    loop {
        let start = ask_date(input, output, "Start date (YYYY-MM-DD, Enter for today): ", today)?;
        let default_end = match DateRange::week_from(start) {
            Ok(week) => week.end(),
            Err(e) => {
                writeln!(output, "Invalid start date: {}. Please try again.", e)?;
                continue;
            }
        };
        let end = ask_date(
            input,
            output,
            "End date (YYYY-MM-DD, Enter for start + 7 days): ",
            default_end,
        )?;

        match DateRange::new(start, end) {
            Ok(range) => return Ok(range),
            Err(e) => writeln!(output, "Invalid range: {}. Please try again.", e)?,
        }
    }
}

fn ask_date<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    question: &str,
    default: NaiveDate,
) -> Result<NaiveDate> {
    loop {
        write!(output, "{}", question)?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            bail!("input closed while waiting for a date");
        }

        match parse_date_input(&line, default) {
            Ok(date) => return Ok(date),
            Err(e) => writeln!(output, "Could not read {:?} as a date: {}", line.trim(), e)?,
        }
    }
}
