//! NetCDF decoding for GOES-R ABI Cloud and Moisture Imagery files.
//!
//! Two backends implement [`VariableDecoder`]:
//!
//! - `NativeDecoder` reads through libnetcdf/HDF5. Built with the default
//!   `native` feature and used for full-disk bands.
//! - [`NcDumpDecoder`] parses the CDL text printed by the `ncdump` utility.
//!   Always available; the fallback for builds without `native`. Only
//!   practical for small files since it holds the whole CDL text.
//!
//! Both apply CF packing (`scale_factor`, `add_offset`, `_Unsigned`) and
//! report fill or out-of-range cells through [`DecodedVariable::mask`].

pub mod error;
pub mod ncdump;
#[cfg(feature = "native")]
pub mod native;
pub mod variable;

use std::path::PathBuf;

pub use error::{NetCdfError, NetCdfResult};
pub use ncdump::{decode_cdl, parse_cdl_number, NcDumpDecoder};
#[cfg(feature = "native")]
pub use native::{silence_hdf5_errors, NativeDecoder};
pub use variable::{DecodedVariable, Packing, VariableDecoder};

/// Get the optimal temp directory for downloaded NetCDF files.
///
/// On Linux, uses /dev/shm (memory-backed tmpfs) if it is writable.
/// Falls back to the system temp directory otherwise.
pub fn optimal_temp_dir() -> PathBuf {
    #[cfg(target_os = "linux")]
    {
        let shm_path = std::path::Path::new("/dev/shm");
        if shm_path.is_dir() {
            let probe = shm_path.join(format!(".goes_probe_{}", std::process::id()));
            if std::fs::write(&probe, b"probe").is_ok() {
                let _ = std::fs::remove_file(&probe);
                return shm_path.to_path_buf();
            }
        }
    }

    std::env::temp_dir()
}

/// The fastest decoder compiled into this build.
pub fn default_decoder() -> Box<dyn VariableDecoder> {
    #[cfg(feature = "native")]
    {
        Box::new(NativeDecoder::new())
    }
    #[cfg(not(feature = "native"))]
    {
        Box::new(NcDumpDecoder::new())
    }
}
