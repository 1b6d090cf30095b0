//! Tests for band download, decode, masking and resampling.

use chrono::{TimeZone, Utc};

use goes_common::{is_space, GoesError, SpectralGrid, SPACE};
use ingestion::BandRetriever;
use netcdf_parser::{DecodedVariable, NcDumpDecoder};
use test_utils::{
    assert_approx_eq, block_grid, constant_grid, file_count, masked_variable, require_test_file,
    scratch_dir, unmasked_variable, MemoryArchive, StaticDecoder,
};

const BUCKET: &str = "noaa-goes18";
const KEY: &str = "ABI-L2-CMIPF/2024/138/05/OR_ABI-L2-CMIPF-M6C02_G18_s20241380550206_e20241380559514_c20241380559580.nc";

fn archive_with(content: &[u8]) -> MemoryArchive {
    let modified = Utc.with_ymd_and_hms(2024, 5, 17, 6, 0, 0).unwrap();
    MemoryArchive::new().with_object(BUCKET, KEY, modified, content)
}

#[test]
fn test_temp_dir_defaults_and_override() {
    let archive = MemoryArchive::new();
    let decoder = StaticDecoder::new();
    let retriever = BandRetriever::new(&archive, &decoder);
    assert_eq!(retriever.temp_dir(), netcdf_parser::optimal_temp_dir());

    let dir = scratch_dir("retrieve_dir_");
    let retriever = retriever.with_temp_dir(dir.path());
    assert_eq!(retriever.temp_dir(), dir.path());
}

#[tokio::test]
async fn test_retrieve_applies_mask_and_cleans_up() {
    let dir = scratch_dir("retrieve_ok_");
    let grid = block_grid(6, 1, 1, 3, 0.6);
    let archive = archive_with(b"band-2");
    let decoder = StaticDecoder::new().with_variable(b"band-2", masked_variable(&grid, -1.0));
    let retriever = BandRetriever::new(&archive, &decoder).with_temp_dir(dir.path());

    let out = retriever.retrieve(BUCKET, KEY, 6).await.unwrap();

    assert_eq!((out.width(), out.height()), (6, 6));
    assert_eq!(out.space_count(), 36 - 9);
    assert_eq!(out.get(2, 2), 0.6);
    assert!(out.is_space_at(0, 0));

    let opened = decoder.opened();
    assert_eq!(opened.len(), 1);
    assert!(opened[0].starts_with(dir.path()));
    assert!(!opened[0].exists());
    assert_eq!(file_count(dir.path()), 0);
}

#[tokio::test]
async fn test_retrieve_without_mask_uses_fill_and_negatives() {
    let dir = scratch_dir("retrieve_fill_");
    let mut grid = constant_grid(4, 0.25);
    grid.set(0, 0, SPACE);
    let mut variable = unmasked_variable(&grid, 2.0);
    variable.data[5] = -0.01;

    let archive = archive_with(b"band-1");
    let decoder = StaticDecoder::new().with_variable(b"band-1", variable);
    let retriever = BandRetriever::new(&archive, &decoder).with_temp_dir(dir.path());

    let out = retriever.retrieve(BUCKET, KEY, 4).await.unwrap();

    assert!(out.is_space_at(0, 0));
    assert!(out.is_space_at(1, 1));
    assert_eq!(out.space_count(), 2);
}

#[tokio::test]
async fn test_retrieve_resamples_to_target() {
    let dir = scratch_dir("retrieve_resample_");
    let archive = archive_with(b"band-2");
    let decoder = StaticDecoder::new()
        .with_variable(b"band-2", masked_variable(&constant_grid(8, 0.4), -1.0));
    let retriever = BandRetriever::new(&archive, &decoder).with_temp_dir(dir.path());

    let out = retriever.retrieve(BUCKET, KEY, 4).await.unwrap();

    assert_eq!((out.width(), out.height()), (4, 4));
    for &v in out.data() {
        assert_approx_eq!(v, 0.4, 1e-5);
    }
}

#[tokio::test]
async fn test_retrieve_non_square_becomes_square() {
    let dir = scratch_dir("retrieve_rect_");
    let grid = SpectralGrid::new(6, 4, vec![0.3; 24]).unwrap();
    let archive = archive_with(b"rect");
    let decoder = StaticDecoder::new().with_variable(b"rect", masked_variable(&grid, -1.0));
    let retriever = BandRetriever::new(&archive, &decoder).with_temp_dir(dir.path());

    let out = retriever.retrieve(BUCKET, KEY, 4).await.unwrap();

    assert!(out.is_square());
    assert_eq!(out.side(), 4);
}

#[tokio::test]
async fn test_download_failure_surfaces_and_cleans_up() {
    let dir = scratch_dir("retrieve_dl_fail_");
    let archive = archive_with(b"band-2");
    archive.fail_download(KEY);
    let decoder = StaticDecoder::new();
    let retriever = BandRetriever::new(&archive, &decoder).with_temp_dir(dir.path());

    let err = retriever.retrieve(BUCKET, KEY, 4).await.unwrap_err();

    assert!(err.is_storage());
    assert!(decoder.opened().is_empty());
    assert_eq!(file_count(dir.path()), 0);
}

#[tokio::test]
async fn test_decode_failure_surfaces_and_cleans_up() {
    let dir = scratch_dir("retrieve_decode_fail_");
    let archive = archive_with(b"not-netcdf");
    let decoder = StaticDecoder::new();
    let retriever = BandRetriever::new(&archive, &decoder).with_temp_dir(dir.path());

    let err = retriever.retrieve(BUCKET, KEY, 4).await.unwrap_err();

    assert!(matches!(err, GoesError::DecodeError(_)));
    assert!(!decoder.opened()[0].exists());
    assert_eq!(file_count(dir.path()), 0);
}

#[tokio::test]
async fn test_malformed_dimensions_rejected() {
    let dir = scratch_dir("retrieve_dims_");
    let archive = archive_with(b"short");
    let variable = DecodedVariable {
        width: 4,
        height: 4,
        data: vec![0.1; 10],
        fill_value: None,
        mask: None,
    };
    let decoder = StaticDecoder::new().with_variable(b"short", variable);
    let retriever = BandRetriever::new(&archive, &decoder).with_temp_dir(dir.path());

    assert!(retriever.retrieve(BUCKET, KEY, 4).await.is_err());
    assert_eq!(file_count(dir.path()), 0);
}

#[tokio::test]
async fn test_missing_object_is_storage_error() {
    let dir = scratch_dir("retrieve_missing_");
    let archive = MemoryArchive::new();
    let decoder = StaticDecoder::new();
    let retriever = BandRetriever::new(&archive, &decoder).with_temp_dir(dir.path());

    let err = retriever.retrieve(BUCKET, KEY, 4).await.unwrap_err();
    assert!(err.is_storage());
}

#[tokio::test]
async fn test_decode_real_blue_band() {
    let path = require_test_file!("OR_ABI-L2-CMIPF-M6C01_G18.nc");
    let content = std::fs::read(&path).unwrap();
    let dir = scratch_dir("retrieve_real_");
    let archive = archive_with(&content);
    let decoder = NcDumpDecoder::new();
    let retriever = BandRetriever::new(&archive, &decoder).with_temp_dir(dir.path());

    let out = retriever.retrieve(BUCKET, KEY, 512).await.unwrap();

    assert_eq!(out.side(), 512);
    assert!(out.space_count() > 0, "full disk corners are space");
    assert!(out.data().iter().filter(|v| !is_space(**v)).all(|v| *v > -0.1 && *v < 1.5));
    assert_eq!(file_count(dir.path()), 0);
}
