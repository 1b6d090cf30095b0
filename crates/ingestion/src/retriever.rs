//! Band retrieval: download, decode, mask and resample one band file.

use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};

use goes_common::{GoesResult, SpectralGrid, CMI_VARIABLE, SPACE};
use netcdf_parser::{DecodedVariable, VariableDecoder};
use storage::ArchiveStore;

/// Earth disk diameter in output pixels.
pub const DEFAULT_EARTH_SIZE: usize = 2048;

/// Fill value assumed when a variable declares none.
pub const DEFAULT_FILL_VALUE: f32 = -1.0;

/// Downloads band files to transient storage and decodes them into
/// square reflectance grids.
pub struct BandRetriever<'a> {
    store: &'a dyn ArchiveStore,
    decoder: &'a dyn VariableDecoder,
    temp_dir: PathBuf,
}

impl<'a> BandRetriever<'a> {
    /// Retriever for the `CMI` variable, downloading into
    /// [`netcdf_parser::optimal_temp_dir`].
    pub fn new(store: &'a dyn ArchiveStore, decoder: &'a dyn VariableDecoder) -> Self {
        Self {
            store,
            decoder,
            temp_dir: netcdf_parser::optimal_temp_dir(),
        }
    }

    pub fn with_temp_dir(mut self, temp_dir: impl Into<PathBuf>) -> Self {
        self.temp_dir = temp_dir.into();
        self
    }

    pub fn temp_dir(&self) -> &Path {
        &self.temp_dir
    }

    /// Fetch `key` and return it as a `target_size x target_size` grid.
    ///
    /// The transient download is removed on every exit path.
    #[instrument(skip(self), fields(variable = CMI_VARIABLE))]
    pub async fn retrieve(
        &self,
        bucket: &str,
        key: &str,
        target_size: usize,
    ) -> GoesResult<SpectralGrid> {
        let decoded = {
            let transient = tempfile::Builder::new()
                .prefix("goes_band_")
                .suffix(".nc")
                .tempfile_in(&self.temp_dir)?;

            let bytes = self.store.download(bucket, key, transient.path()).await?;
            debug!(bytes, path = %transient.path().display(), "Downloaded band file");

            self.decoder.decode(transient.path(), CMI_VARIABLE)?
        };

        let grid = mask_invalid(decoded)?;
        info!(
            width = grid.width(),
            height = grid.height(),
            space = grid.space_count(),
            "Decoded band"
        );

        if grid.width() != target_size || grid.height() != target_size {
            return grid_processor::resample_square(&grid, target_size);
        }
        Ok(grid)
    }
}

/// Replace invalid cells with the space sentinel.
///
/// Uses the decoder's embedded mask when there is one. Otherwise a cell is
/// invalid if it equals the declared fill value (default -1) or is negative.
pub fn mask_invalid(decoded: DecodedVariable) -> GoesResult<SpectralGrid> {
    decoded.validate()?;

    let DecodedVariable {
        width,
        height,
        mut data,
        fill_value,
        mask,
    } = decoded;

    match mask {
        Some(mask) => {
            for (value, invalid) in data.iter_mut().zip(mask) {
                if invalid {
                    *value = SPACE;
                }
            }
        }
        None => {
            let fill = fill_value.unwrap_or(DEFAULT_FILL_VALUE);
            for value in data.iter_mut() {
                if *value == fill || *value < 0.0 {
                    *value = SPACE;
                }
            }
        }
    }

    SpectralGrid::new(width, height, data)
}
