//! Download-if-absent for the Iris archive.

use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};

use md5::{Digest, Md5};
use tracing::{info, warn};

use crate::error::FetchError;

pub const IRIS_URL: &str =
    "https://dl4jdata.blob.core.windows.net/dl4j-examples/datavec-examples/IrisData.zip";
pub const IRIS_MD5: &str = "bb49e38bb91089634d7ef37ad8e430b8";
pub const IRIS_ARCHIVE_NAME: &str = "IrisData.zip";
/// Directory the archive extracts into.
pub const IRIS_DIR_NAME: &str = "IrisData";
pub const IRIS_FILE_NAME: &str = "iris.txt";

/// Returns the path of `iris.txt` under `data_dir`, downloading and
/// extracting the archive first if it is not there yet.
///
/// A cached archive that passes the checksum is extracted without touching
/// the network; one that fails it is downloaded again.
pub fn ensure_iris_data(data_dir: &Path) -> Result<PathBuf, FetchError> {
    let data_path = data_dir.join(IRIS_DIR_NAME).join(IRIS_FILE_NAME);
    if data_path.exists() {
        return Ok(data_path);
    }

    std::fs::create_dir_all(data_dir)?;
    let archive_path = data_dir.join(IRIS_ARCHIVE_NAME);

    let cached = match std::fs::read(&archive_path) {
        Ok(bytes) if compute_md5(&bytes) == IRIS_MD5 => Some(bytes),
        Ok(_) => {
            warn!(path = %archive_path.display(), "cached archive failed checksum, downloading again");
            None
        }
        Err(_) => None,
    };
    let bytes = match cached {
        Some(bytes) => bytes,
        None => {
            let bytes = download(IRIS_URL, Some(IRIS_MD5))?;
            std::fs::write(&archive_path, &bytes)?;
            bytes
        }
    };

    extract_archive(&bytes, data_dir)?;
    if !data_path.exists() {
        return Err(FetchError::MissingFile(data_path));
    }
    Ok(data_path)
}

/// Fetches `url` into memory, checking the MD5 digest when one is given.
pub fn download(url: &str, expected_md5: Option<&str>) -> Result<Vec<u8>, FetchError> {
    info!(url, "downloading");

    let response = ureq::get(url).call().map_err(|e| match e {
        ureq::Error::Status(status, _) => FetchError::Status { url: url.to_string(), status },
        other => FetchError::Http { url: url.to_string(), reason: other.to_string() },
    })?;

    let mut bytes = Vec::new();
    response
        .into_reader()
        .read_to_end(&mut bytes)
        .map_err(|e| FetchError::Http { url: url.to_string(), reason: e.to_string() })?;

    if let Some(expected) = expected_md5 {
        let got = compute_md5(&bytes);
        if got != expected {
            return Err(FetchError::ChecksumMismatch {
                url: url.to_string(),
                expected: expected.to_string(),
                got,
            });
        }
    }

    info!(url, bytes = bytes.len(), "download complete");
    Ok(bytes)
}

/// Unpacks a zip archive held in memory into `dest`.
pub fn extract_archive(bytes: &[u8], dest: &Path) -> Result<(), FetchError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| FetchError::Extract(e.to_string()))?;
    archive
        .extract(dest)
        .map_err(|e| FetchError::Extract(e.to_string()))
}

pub fn compute_md5(data: &[u8]) -> String {
    format!("{:x}", Md5::digest(data))
}
