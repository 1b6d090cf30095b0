//! [`VariableDecoder`] that maps file contents to canned variables.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use goes_common::{is_space, SpectralGrid};
use netcdf_parser::{DecodedVariable, NetCdfError, NetCdfResult, VariableDecoder};

/// Decoder keyed on the raw bytes of the file it is asked to open.
///
/// Pair it with [`crate::MemoryArchive`]: store a short marker as the object
/// content and register the variable that marker decodes to. Every path the
/// decoder opens is recorded so tests can check transient files were cleaned
/// up afterwards.
#[derive(Debug, Default)]
pub struct StaticDecoder {
    variables: HashMap<Vec<u8>, DecodedVariable>,
    opened: Mutex<Vec<PathBuf>>,
}

impl StaticDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_variable(mut self, content: &[u8], variable: DecodedVariable) -> Self {
        self.variables.insert(content.to_vec(), variable);
        self
    }

    /// Paths passed to `decode`, in call order.
    pub fn opened(&self) -> Vec<PathBuf> {
        self.opened.lock().unwrap().clone()
    }
}

impl VariableDecoder for StaticDecoder {
    fn decode(&self, path: &Path, variable: &str) -> NetCdfResult<DecodedVariable> {
        self.opened.lock().unwrap().push(path.to_path_buf());
        let content = std::fs::read(path)?;
        self.variables
            .get(&content)
            .cloned()
            .ok_or_else(|| NetCdfError::MissingData(format!("{} variable", variable)))
    }
}

/// Variable with the grid's values, space cells replaced by `fill` and
/// flagged in the embedded mask.
pub fn masked_variable(grid: &SpectralGrid, fill: f32) -> DecodedVariable {
    let mask: Vec<bool> = grid.data().iter().map(|&v| is_space(v)).collect();
    let data = grid
        .data()
        .iter()
        .map(|&v| if is_space(v) { fill } else { v })
        .collect();
    DecodedVariable {
        width: grid.width(),
        height: grid.height(),
        data,
        fill_value: Some(fill),
        mask: Some(mask),
    }
}

/// Variable with the grid's values, space cells replaced by `fill` and no
/// embedded mask, so only the fill value identifies them.
pub fn unmasked_variable(grid: &SpectralGrid, fill: f32) -> DecodedVariable {
    DecodedVariable {
        mask: None,
        ..masked_variable(grid, fill)
    }
}
