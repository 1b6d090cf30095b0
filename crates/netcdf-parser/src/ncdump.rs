//! Decoder that shells out to the `ncdump` command-line tool.
//!
//! Slow for full-disk files but needs nothing beyond the netCDF utilities on
//! `PATH`. One `ncdump -v <var>` run yields both the header (dimensions and
//! attributes) and the raw packed values.

use std::path::Path;
use std::process::Command;

use tracing::{debug, instrument};

use crate::error::{NetCdfError, NetCdfResult};
use crate::variable::{DecodedVariable, Packing, VariableDecoder};

/// Decodes variables by parsing CDL text produced by `ncdump`.
#[derive(Debug, Clone)]
pub struct NcDumpDecoder {
    program: String,
}

impl Default for NcDumpDecoder {
    fn default() -> Self {
        Self {
            program: "ncdump".to_string(),
        }
    }
}

impl NcDumpDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a specific `ncdump` executable.
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn dump(&self, path: &Path, variable: &str) -> NetCdfResult<String> {
        let output = Command::new(&self.program)
            .arg("-v")
            .arg(variable)
            .arg(path)
            .output()
            .map_err(|e| {
                NetCdfError::CommandError(format!("Failed to run {}: {}", self.program, e))
            })?;

        if !output.status.success() {
            return Err(NetCdfError::CommandError(format!(
                "{} failed: {}",
                self.program,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl VariableDecoder for NcDumpDecoder {
    #[instrument(skip(self, path), fields(path = %path.display()))]
    fn decode(&self, path: &Path, variable: &str) -> NetCdfResult<DecodedVariable> {
        let cdl = self.dump(path, variable)?;
        let decoded = decode_cdl(&cdl, variable)?;
        debug!(
            width = decoded.width,
            height = decoded.height,
            "Decoded variable via ncdump"
        );
        Ok(decoded)
    }
}

/// Decode one 2D variable from complete CDL text (header plus data section).
pub fn decode_cdl(cdl: &str, variable: &str) -> NetCdfResult<DecodedVariable> {
    let (header, data) = match cdl.find("\ndata:") {
        Some(idx) => (&cdl[..idx], &cdl[idx..]),
        None => return Err(NetCdfError::MissingData("data section".to_string())),
    };

    let (height_dim, width_dim) = parse_variable_dims(header, variable)?;
    let height = parse_dimension(header, &height_dim)?;
    let width = parse_dimension(header, &width_dim)?;
    let packing = parse_packing(header, variable)?;

    let tokens = data_tokens(data, variable)?;
    let expected = width * height;
    if tokens.len() != expected {
        return Err(NetCdfError::InvalidFormat(format!(
            "{} has {} values, expected {} ({}x{})",
            variable,
            tokens.len(),
            expected,
            width,
            height
        )));
    }

    let fill_value = packing.unpacked_fill();
    let mut values = Vec::with_capacity(expected);
    let mut mask = Vec::with_capacity(expected);

    for token in tokens {
        if token == "_" {
            values.push(fill_value.unwrap_or(f32::NAN));
            mask.push(true);
            continue;
        }
        let raw = parse_cdl_number(token).ok_or_else(|| {
            NetCdfError::InvalidFormat(format!("bad value '{}' in {}", token, variable))
        })?;
        let (value, invalid) = packing.unpack(raw);
        values.push(value);
        mask.push(invalid);
    }

    let decoded = DecodedVariable {
        width,
        height,
        data: values,
        fill_value,
        mask: Some(mask),
    };
    decoded.validate()?;
    Ok(decoded)
}

/// Dimension names of `short CMI(y, x) ;`, returned as (rows, columns).
fn parse_variable_dims(header: &str, variable: &str) -> NetCdfResult<(String, String)> {
    let needle = format!(" {}(", variable);
    for line in header.lines() {
        let Some(start) = line.find(&needle) else {
            continue;
        };
        let rest = &line[start + needle.len()..];
        let Some(end) = rest.find(')') else {
            continue;
        };
        let dims: Vec<&str> = rest[..end].split(',').map(str::trim).collect();
        if dims.len() < 2 {
            return Err(NetCdfError::InvalidFormat(format!(
                "{} is not two-dimensional",
                variable
            )));
        }
        // Leading dimensions (time, band) are expected to have length 1
        let n = dims.len();
        return Ok((dims[n - 2].to_string(), dims[n - 1].to_string()));
    }
    Err(NetCdfError::MissingData(format!("variable {}", variable)))
}

/// Size of a dimension, looked up in the `dimensions:` section only.
fn parse_dimension(header: &str, name: &str) -> NetCdfResult<usize> {
    let section = section(header, "dimensions:", "variables:");
    for line in section.lines() {
        let Some((lhs, rhs)) = line.split_once('=') else {
            continue;
        };
        if lhs.trim() != name {
            continue;
        }
        let value = rhs.trim().trim_end_matches(';').trim();
        return value
            .parse()
            .map_err(|_| NetCdfError::InvalidFormat(format!("Failed to parse dimension {}", name)));
    }
    Err(NetCdfError::MissingData(format!("dimension {}", name)))
}

fn parse_packing(header: &str, variable: &str) -> NetCdfResult<Packing> {
    let section = section(header, "variables:", "// global attributes:");
    let mut packing = Packing::default();

    if let Some(value) = attribute(section, variable, "scale_factor") {
        packing.scale_factor = parse_attr_number(variable, "scale_factor", value)?;
    }
    if let Some(value) = attribute(section, variable, "add_offset") {
        packing.add_offset = parse_attr_number(variable, "add_offset", value)?;
    }
    if let Some(value) = attribute(section, variable, "_FillValue") {
        packing.fill_value = Some(parse_attr_number(variable, "_FillValue", value)?);
    }
    if let Some(value) = attribute(section, variable, "_Unsigned") {
        packing.unsigned = value.trim_matches('"').eq_ignore_ascii_case("true");
    }
    if let Some(value) = attribute(section, variable, "valid_range") {
        let bounds: Vec<f64> = value.split(',').filter_map(parse_cdl_number).collect();
        if let &[lo, hi] = bounds.as_slice() {
            packing.valid_range = Some((lo, hi));
        }
    }

    Ok(packing)
}

fn parse_attr_number(variable: &str, name: &str, value: &str) -> NetCdfResult<f64> {
    parse_cdl_number(value).ok_or_else(|| {
        NetCdfError::InvalidFormat(format!(
            "Failed to parse attribute {}:{}: '{}'",
            variable, name, value
        ))
    })
}

/// Raw value text of `variable:name = ... ;`.
fn attribute<'a>(section: &'a str, variable: &str, name: &str) -> Option<&'a str> {
    let pattern = format!("{}:{} = ", variable, name);
    section.lines().find_map(|line| {
        let trimmed = line.trim_start();
        trimmed
            .strip_prefix(&pattern)
            .map(|rest| rest.trim().trim_end_matches(';').trim())
    })
}

fn section<'a>(text: &'a str, start: &str, end: &str) -> &'a str {
    let from = text.find(start).map(|i| i + start.len()).unwrap_or(0);
    let rest = &text[from..];
    match rest.find(end) {
        Some(to) => &rest[..to],
        None => rest,
    }
}

/// Value tokens of `variable = v, v, ... ;` in the data section.
fn data_tokens<'a>(data: &'a str, variable: &str) -> NetCdfResult<Vec<&'a str>> {
    let start = data
        .lines()
        .scan(0usize, |offset, line| {
            let here = *offset;
            *offset += line.len() + 1;
            Some((here, line))
        })
        .find_map(|(offset, line)| {
            let trimmed = line.trim_start();
            let rest = trimmed.strip_prefix(variable)?;
            let rest_trimmed = rest.trim_start();
            rest_trimmed.strip_prefix('=')?;
            let lead = line.len() - rest_trimmed.len();
            Some(offset + lead + 1)
        })
        .ok_or_else(|| NetCdfError::MissingData(format!("{} data section", variable)))?;

    let body = &data[start..];
    let end = body
        .find(';')
        .ok_or_else(|| NetCdfError::InvalidFormat(format!("unterminated {} data", variable)))?;

    Ok(body[..end]
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect())
}

/// Parse a CDL numeric literal, dropping type suffixes (`-1s`, `0.f`, `12UB`).
pub fn parse_cdl_number(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    let is_suffix = |c: char| matches!(c, 's' | 'S' | 'b' | 'B' | 'f' | 'F' | 'l' | 'L' | 'u' | 'U');
    let stripped = trimmed.trim_end_matches(is_suffix).trim_end_matches('.');
    if stripped.is_empty() {
        return None;
    }
    stripped.parse().ok()
}
