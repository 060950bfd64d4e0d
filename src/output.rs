use std::fs;
use std::path::Path;

use anyhow::Context;
use log::info;

use crate::{schema::DatasetRow, util::csv_escape};

/// Builds the CSV table for a set of rows.
///
/// Layout:
/// - Header: `class_id,class_name,taxon_id,obs_id,image_url,source_loc`
/// - One line per row, in the given order
/// - `\n` line endings, trailing newline
///
pub fn build_csv(rows: &[DatasetRow]) -> String {
    let mut out = String::with_capacity((rows.len() + 1) * 96);

    out.push_str(&DatasetRow::HEADER.join(","));
    out.push('\n');

    for row in rows {
        let fields = [
            row.class_id.to_string(),
            csv_escape(&row.class_name),
            row.taxon_id.to_string(),
            row.obs_id.to_string(),
            csv_escape(&row.image_url),
            csv_escape(&row.source_loc),
        ];
        out.push_str(&fields.join(","));
        out.push('\n');
    }

    out
}

/// Writes the dataset table to `path`, replacing any existing file.
///
/// The parent directory must already exist. Any failure here is
/// fatal for the run and is propagated to the caller.
///
pub fn write_dataset(path: impl AsRef<Path>, rows: &[DatasetRow]) -> anyhow::Result<()> {
    let path = path.as_ref();

    fs::write(path, build_csv(rows))
        .with_context(|| format!("failed to write dataset to {}", path.display()))?;

    info!("Wrote {} rows to {}", rows.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(class_id: u32, class_name: &str, obs_id: u64, url: &str) -> DatasetRow {
        DatasetRow {
            class_id,
            class_name: class_name.to_string(),
            taxon_id: 47370,
            obs_id,
            image_url: url.to_string(),
            source_loc: "NC".to_string(),
        }
    }

    #[test]
    fn empty_dataset_has_only_the_header() {
        assert_eq!(
            build_csv(&[]),
            "class_id,class_name,taxon_id,obs_id,image_url,source_loc\n"
        );
    }

    #[test]
    fn rows_are_written_in_order_with_escaping() {
        let rows = vec![
            row(0, "Venomous Spiders", 9, "https://img.example/photos/9/medium.jpg"),
            row(7, "Cats, venomous", 3, "https://img.example/photos/3/medium.jpg"),
        ];

        let csv = build_csv(&rows);
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[1],
            "0,Venomous Spiders,47370,9,https://img.example/photos/9/medium.jpg,NC"
        );
        assert_eq!(
            lines[2],
            "7,\"Cats, venomous\",47370,3,https://img.example/photos/3/medium.jpg,NC"
        );
    }

    #[test]
    fn write_dataset_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dataset.csv");
        let rows = vec![row(1, "Ticks", 42, "https://img.example/photos/42/medium.jpg")];

        write_dataset(&path, &rows).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert_eq!(written, build_csv(&rows));
    }

    #[test]
    fn write_dataset_fails_when_directory_is_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("dataset.csv");

        let err = write_dataset(&path, &[]).unwrap_err();
        assert!(err.to_string().contains("failed to write dataset"));
        assert!(!path.exists());
    }
}
