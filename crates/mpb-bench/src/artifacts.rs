//! Filesystem artifacts: the results CSV, the summary markdown, and the
//! snapshot manifest.

use std::fs;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use mpb_core::{ErrorInfo, MpbError};
use mpb_maze::MazeAlgorithm;

use crate::trial::TrialResult;

/// Column order of `benchmark_results.csv`, a compatibility contract.
pub const CSV_COLUMNS: [&str; 11] = [
    "planner",
    "maze_index",
    "maze_seed",
    "width",
    "height",
    "algorithm",
    "success",
    "solve_time_ms",
    "path_length",
    "expansions",
    "error",
];

fn io_error(code: &str, path: &Path, err: impl ToString) -> MpbError {
    MpbError::Io(
        ErrorInfo::new(code, err.to_string()).with_context("path", path.display().to_string()),
    )
}

fn csv_error(path: &Path, err: csv::Error) -> MpbError {
    MpbError::Serde(
        ErrorInfo::new("bench-csv", err.to_string())
            .with_context("path", path.display().to_string()),
    )
}

/// Writes the per-trial CSV with the pinned column order.
///
/// Success is `0`/`1`, solve time carries six decimal places, and absent
/// values are empty strings.
pub fn write_results_csv(path: &Path, trials: &[TrialResult]) -> Result<(), MpbError> {
    let mut writer = csv::Writer::from_path(path).map_err(|err| csv_error(path, err))?;
    writer
        .write_record(CSV_COLUMNS)
        .map_err(|err| csv_error(path, err))?;
    for trial in trials {
        writer
            .write_record([
                trial.planner.clone(),
                trial.maze_index.to_string(),
                trial.maze_seed.to_string(),
                trial.width.to_string(),
                trial.height.to_string(),
                trial.algorithm.name().to_string(),
                if trial.success { "1" } else { "0" }.to_string(),
                format!("{:.6}", trial.solve_time_ms),
                trial
                    .path_length
                    .map(|length| length.to_string())
                    .unwrap_or_default(),
                trial.expansions.to_string(),
                trial.error.clone().unwrap_or_default(),
            ])
            .map_err(|err| csv_error(path, err))?;
    }
    writer.flush().map_err(|err| io_error("bench-csv", path, err))
}

/// Reads a per-trial CSV back into rows.
pub fn read_results_csv(path: &Path) -> Result<Vec<TrialResult>, MpbError> {
    let mut reader = csv::Reader::from_path(path).map_err(|err| csv_error(path, err))?;
    let headers = reader
        .headers()
        .map_err(|err| csv_error(path, err))?
        .clone();
    if headers.iter().collect::<Vec<_>>() != CSV_COLUMNS {
        return Err(MpbError::Serde(
            ErrorInfo::new(
                "bench-csv",
                format!("unexpected CSV header: {}", headers.iter().collect::<Vec<_>>().join(",")),
            )
            .with_context("path", path.display().to_string()),
        ));
    }

    let mut trials = Vec::new();
    for (line, record) in reader.records().enumerate() {
        let record = record.map_err(|err| csv_error(path, err))?;
        let field = |index: usize| record.get(index).unwrap_or_default();
        let parse_error = |column: &str, value: &str| {
            MpbError::Serde(
                ErrorInfo::new(
                    "bench-csv",
                    format!("row {}: invalid {column} value '{value}'", line + 2),
                )
                .with_context("path", path.display().to_string()),
            )
        };

        let success = match field(6) {
            "1" => true,
            "0" => false,
            other => return Err(parse_error("success", other)),
        };
        trials.push(TrialResult {
            planner: field(0).to_string(),
            maze_index: field(1)
                .parse()
                .map_err(|_| parse_error("maze_index", field(1)))?,
            maze_seed: field(2)
                .parse()
                .map_err(|_| parse_error("maze_seed", field(2)))?,
            width: field(3).parse().map_err(|_| parse_error("width", field(3)))?,
            height: field(4)
                .parse()
                .map_err(|_| parse_error("height", field(4)))?,
            algorithm: MazeAlgorithm::from_str(field(5))?,
            success,
            solve_time_ms: field(7)
                .parse()
                .map_err(|_| parse_error("solve_time_ms", field(7)))?,
            path_length: if field(8).is_empty() {
                None
            } else {
                Some(
                    field(8)
                        .parse()
                        .map_err(|_| parse_error("path_length", field(8)))?,
                )
            },
            expansions: field(9)
                .parse()
                .map_err(|_| parse_error("expansions", field(9)))?,
            error: if field(10).is_empty() {
                None
            } else {
                Some(field(10).to_string())
            },
        });
    }
    Ok(trials)
}

/// Writes the markdown summary.
pub fn write_summary_markdown(path: &Path, markdown: &str) -> Result<(), MpbError> {
    fs::write(path, markdown).map_err(|err| io_error("bench-summary", path, err))
}

/// Integrity manifest binding a snapshot label to its CSV digest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotManifest {
    /// Label of the run this manifest vouches for.
    pub designated_snapshot: String,
    /// Hex SHA-256 of the CSV bytes.
    pub csv_sha256: String,
}

/// Hashes a file in 64 KiB chunks.
pub fn sha256_file(path: &Path) -> Result<String, MpbError> {
    let mut file = fs::File::open(path).map_err(|err| io_error("bench-hash", path, err))?;
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; 64 * 1024];
    loop {
        let read = file
            .read(&mut buffer)
            .map_err(|err| io_error("bench-hash", path, err))?;
        if read == 0 {
            break;
        }
        hasher.update(&buffer[..read]);
    }
    Ok(format!("{:x}", hasher.finalize()))
}

/// Builds the manifest for an existing CSV.
pub fn snapshot_manifest(
    csv_path: &Path,
    designated_snapshot: impl Into<String>,
) -> Result<SnapshotManifest, MpbError> {
    Ok(SnapshotManifest {
        designated_snapshot: designated_snapshot.into(),
        csv_sha256: sha256_file(csv_path)?,
    })
}

/// Writes a manifest as pretty JSON.
pub fn write_snapshot_manifest(path: &Path, manifest: &SnapshotManifest) -> Result<(), MpbError> {
    let bytes = serde_json::to_vec_pretty(manifest).map_err(|err| {
        MpbError::Serde(ErrorInfo::new("bench-manifest", err.to_string()))
    })?;
    fs::write(path, bytes).map_err(|err| io_error("bench-manifest", path, err))
}

/// Reads a manifest from disk.
pub fn read_snapshot_manifest(path: &Path) -> Result<SnapshotManifest, MpbError> {
    let bytes = fs::read(path).map_err(|err| io_error("bench-manifest", path, err))?;
    serde_json::from_slice(&bytes).map_err(|err| {
        MpbError::Serde(
            ErrorInfo::new("bench-manifest", err.to_string())
                .with_context("path", path.display().to_string()),
        )
    })
}

/// Re-hashes the CSV and fails loudly when the manifest disagrees.
pub fn verify_snapshot(csv_path: &Path, manifest: &SnapshotManifest) -> Result<(), MpbError> {
    let actual = sha256_file(csv_path)?;
    if actual != manifest.csv_sha256 {
        return Err(MpbError::Benchmark(
            ErrorInfo::new(
                "bench-snapshot",
                format!(
                    "snapshot '{}' does not match the CSV on disk",
                    manifest.designated_snapshot
                ),
            )
            .with_context("expected_sha256", manifest.csv_sha256.clone())
            .with_context("actual_sha256", actual)
            .with_hint("the CSV was modified after the manifest was written"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hashing_matches_a_one_shot_digest() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("payload.bin");
        let payload: Vec<u8> = (0..200_000u32).map(|value| (value % 251) as u8).collect();
        fs::write(&path, &payload).unwrap();
        let chunked = sha256_file(&path).unwrap();
        let direct = format!("{:x}", Sha256::digest(&payload));
        assert_eq!(chunked, direct);
    }

    #[test]
    fn tampered_snapshots_fail_verification() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.csv");
        fs::write(&path, "planner,success\nastar,1\n").unwrap();
        let manifest = snapshot_manifest(&path, "run-1").unwrap();
        assert!(verify_snapshot(&path, &manifest).is_ok());

        fs::write(&path, "planner,success\nastar,0\n").unwrap();
        let err = verify_snapshot(&path, &manifest).unwrap_err();
        assert_eq!(err.info().code, "bench-snapshot");
    }
}
