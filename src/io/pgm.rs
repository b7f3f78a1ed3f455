//! ASCII portable graymap (`P2`) reading and writing
//!
//! Tokens are whitespace-delimited; a `#` at the start of a token comments
//! out the rest of its line. Header fields are magic, width, height and
//! maximum gray, followed by `width * height` samples in row-major order.
//! Tokens after the last sample are ignored.

use crate::dataset::{Raster, RowVector};
use crate::io::configuration::{MAX_GRAY_LIMIT, PGM_MAGIC};
use crate::io::error::{InputError, Result, WithPath};
use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Whitespace-delimited tokens with `#` line comments removed
pub struct Tokens<'a> {
    rest: &'a str,
}

impl<'a> Tokens<'a> {
    /// Tokenize `text`
    pub const fn new(text: &'a str) -> Self {
        Self { rest: text }
    }
}

impl<'a> Iterator for Tokens<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.rest = self.rest.trim_start();
            if self.rest.starts_with('#') {
                self.rest = self
                    .rest
                    .split_once('\n')
                    .map_or("", |(_, remainder)| remainder);
                continue;
            }
            if self.rest.is_empty() {
                return None;
            }
            let end = self
                .rest
                .find(char::is_whitespace)
                .unwrap_or(self.rest.len());
            let (token, remainder) = self.rest.split_at(end);
            self.rest = remainder;
            return Some(token);
        }
    }
}

fn next_token<'a>(tokens: &mut Tokens<'a>, expected: &'static str) -> Result<&'a str> {
    tokens
        .next()
        .ok_or_else(|| InputError::UnexpectedEof { expected }.into())
}

fn header_number(tokens: &mut Tokens<'_>, field: &'static str) -> Result<u64> {
    let token = next_token(tokens, field)?;
    token.parse::<u64>().map_err(|_parse_error| {
        InputError::InvalidHeaderField {
            field,
            token: token.to_string(),
        }
        .into()
    })
}

fn dimension(tokens: &mut Tokens<'_>, field: &'static str) -> Result<usize> {
    let value = header_number(tokens, field)?;
    match usize::try_from(value) {
        Ok(size) if size > 0 => Ok(size),
        _ => Err(InputError::InvalidDimension { field, value }.into()),
    }
}

/// Parse an ASCII graymap held in memory
///
/// # Errors
///
/// Returns [`AlgorithmError::InvalidInput`](crate::AlgorithmError::InvalidInput) if:
/// - The magic token is not `P2` (compared case-insensitively)
/// - Width, height or maximum gray is not a decimal integer
/// - Width or height is zero
/// - Maximum gray is outside 1..=65536
/// - A sample is not a decimal integer or exceeds maximum gray
/// - Input ends before the header or all samples were read
pub fn parse_pgm(text: &str) -> Result<Raster> {
    let mut tokens = Tokens::new(text);

    let magic = next_token(&mut tokens, "magic")?;
    if !magic.eq_ignore_ascii_case(PGM_MAGIC) {
        return Err(InputError::BadMagic {
            found: magic.to_string(),
        }
        .into());
    }

    let width = dimension(&mut tokens, "width")?;
    let height = dimension(&mut tokens, "height")?;
    let max_gray_value = header_number(&mut tokens, "maximum gray value")?;
    let max_gray = match u32::try_from(max_gray_value) {
        Ok(value) if (1..=MAX_GRAY_LIMIT).contains(&value) => value,
        _ => {
            return Err(InputError::MaxGrayOutOfRange {
                value: max_gray_value,
            }
            .into());
        }
    };

    // Capacity is bounded by the input size so a lying header cannot force a huge allocation
    let mut rows = Vec::with_capacity(height.min(text.len()));
    for row in 0..height {
        let mut samples = Vec::with_capacity(width.min(text.len()));
        for col in 0..width {
            let token = next_token(&mut tokens, "samples")?;
            let Ok(value) = token.parse::<u64>() else {
                return Err(InputError::InvalidSample {
                    row,
                    col,
                    token: token.to_string(),
                }
                .into());
            };
            if value > u64::from(max_gray) {
                return Err(InputError::SampleOutOfRange {
                    row,
                    col,
                    value,
                    max_gray,
                }
                .into());
            }
            samples.push(value as u32);
        }
        rows.push(RowVector::new(samples));
    }

    Raster::new(width, max_gray, rows)
}

/// Read an ASCII graymap from disk
///
/// # Errors
///
/// Returns an error if the file cannot be read or does not parse
pub fn read_pgm(path: &Path) -> Result<Raster> {
    let text = fs::read_to_string(path).with_path(path, "read")?;
    parse_pgm(&text)
}

/// Render a raster as ASCII graymap text, one raster row per line
pub fn format_pgm(raster: &Raster) -> String {
    let mut text = format!(
        "{PGM_MAGIC}\n{} {}\n{}\n",
        raster.width(),
        raster.height(),
        raster.max_gray()
    );
    for row in raster.rows() {
        let line = row
            .samples()
            .iter()
            .map(u32::to_string)
            .collect::<Vec<_>>()
            .join(" ");
        text.push_str(&line);
        text.push('\n');
    }
    text
}

/// Write a raster as an ASCII graymap, creating parent directories as needed
///
/// # Errors
///
/// Returns an error if the directory or file cannot be created or written
pub fn write_pgm(path: &Path, raster: &Raster) -> Result<()> {
    let directory = path.parent().filter(|dir| !dir.as_os_str().is_empty());
    if let Some(parent) = directory {
        fs::create_dir_all(parent).with_path(parent, "create directory")?;
    }
    let file = fs::File::create(path).with_path(path, "create")?;
    let mut writer = BufWriter::new(file);
    writer
        .write_all(format_pgm(raster).as_bytes())
        .with_path(path, "write")?;
    writer.flush().with_path(path, "write")
}
