//! Selection and retrieval of the three true-color bands.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use tracing::info;

use goes_common::{
    acquisition_start, GoesError, GoesResult, SpectralGrid, BLUE_BAND, RED_BAND, RGB_BANDS,
    VEGGIE_BAND,
};

use crate::locator::{BandFile, BandLocator};
use crate::retriever::BandRetriever;

/// Display role of an ABI band in the true-color composite.
pub fn band_role(band: u8) -> &'static str {
    match band {
        BLUE_BAND => "blue",     // 0.47um
        RED_BAND => "red",       // 0.64um
        VEGGIE_BAND => "veggie", // 0.86um, used for synthetic green
        _ => "other",
    }
}

/// Red, veggie and blue grids at a common size, plus acquisition time.
#[derive(Debug, Clone)]
pub struct BandTriad {
    pub red: SpectralGrid,
    pub veggie: SpectralGrid,
    pub blue: SpectralGrid,
    /// Scan start of the red band file
    pub acquired: DateTime<Utc>,
    /// Files the grids were read from, by band number
    pub files: BTreeMap<u8, BandFile>,
}

/// Locate and retrieve bands 2 (red), 3 (veggie) and 1 (blue).
///
/// Fails with [`GoesError::MissingBands`] when any band is absent from the
/// lookback window. Bands are retrieved one after another.
pub async fn fetch_triad(
    locator: &BandLocator<'_>,
    retriever: &BandRetriever<'_>,
    target: DateTime<Utc>,
    target_size: usize,
    satellite: &str,
) -> GoesResult<BandTriad> {
    let files = locator.locate(target, satellite, &RGB_BANDS).await?;

    let missing: Vec<u8> = RGB_BANDS
        .iter()
        .copied()
        .filter(|band| !files.contains_key(band))
        .collect();
    if !missing.is_empty() {
        return Err(GoesError::MissingBands {
            found: files.keys().copied().collect(),
            missing,
        });
    }

    let acquired = acquisition_start(&files[&RED_BAND].key)?;

    let red = retrieve(retriever, &files[&RED_BAND], target_size).await?;
    let veggie = retrieve(retriever, &files[&VEGGIE_BAND], target_size).await?;
    let blue = retrieve(retriever, &files[&BLUE_BAND], target_size).await?;

    Ok(BandTriad {
        red,
        veggie,
        blue,
        acquired,
        files,
    })
}

async fn retrieve(
    retriever: &BandRetriever<'_>,
    file: &BandFile,
    target_size: usize,
) -> GoesResult<SpectralGrid> {
    info!(
        band = file.band,
        role = band_role(file.band),
        key = %file.key,
        "Retrieving band"
    );
    retriever.retrieve(&file.bucket, &file.key, target_size).await
}
