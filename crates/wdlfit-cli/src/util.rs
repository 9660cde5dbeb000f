use std::{
    collections::BTreeMap,
    fs::File,
    io::{self, BufWriter},
    path::Path,
};

use anyhow::Context;

pub fn read_json_file<T, P>(file_kind: &str, path: P) -> anyhow::Result<T>
where
    T: serde::de::DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open {} file: {}", file_kind, path.display()))?;

    let reader = io::BufReader::new(file);
    let value = serde_json::from_reader(reader).with_context(|| {
        format!(
            "Failed to parse {} JSON file: {}",
            file_kind,
            path.display()
        )
    })?;

    Ok(value)
}

/// Read raw WDL game statistics from a JSON file
///
/// The file maps tuple-like observation key strings to occurrence counts;
/// key decoding happens separately so a malformed key names itself in the
/// error.
///
/// # Arguments
///
/// * `path` - Path to the statistics JSON file
///
/// # Returns
///
/// The raw key-string to count mapping
///
/// # Errors
///
/// Returns error if the file cannot be opened or parsed
pub fn read_stats_file<P>(path: P) -> anyhow::Result<BTreeMap<String, u64>>
where
    P: AsRef<Path>,
{
    read_json_file("game statistics", path)
}

/// Write a value as pretty JSON to a file
///
/// # Arguments
///
/// * `path` - Destination path
/// * `value` - Value to serialize
///
/// # Errors
///
/// Returns error if the file cannot be created or written
pub fn write_json_file<T, P>(path: P, value: &T) -> anyhow::Result<()>
where
    T: serde::Serialize,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::create(path)
        .with_context(|| format!("Failed to create output file: {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value)
        .with_context(|| format!("Failed to write JSON to {}", path.display()))?;
    Ok(())
}
