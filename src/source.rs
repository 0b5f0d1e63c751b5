use std::{fs, path::Path};

use bevy::log::{debug, info};

use crate::{
    error::{Result, TerrainError},
    grid::Grid,
};

pub fn load(path: impl AsRef<Path>) -> Result<Grid> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    let grid = parse(&text)?;

    info!(
        "Loaded {}x{} grid from {}",
        grid.rows(),
        grid.cols(),
        path.display()
    );

    Ok(grid)
}

/// One row per line, integers separated by whitespace. The first non-blank
/// row fixes the column count.
pub fn parse(text: &str) -> Result<Grid> {
    let mut rows: Vec<Vec<i32>> = Vec::new();

    for (index, line) in text.lines().enumerate() {
        let line_number = index + 1;

        if line.trim().is_empty() {
            debug!("Skipping blank line {}", line_number);
            continue;
        }

        let row = line
            .split_whitespace()
            .map(|field| {
                field.parse::<i32>().map_err(|e| TerrainError::Parse {
                    line: line_number,
                    message: format!("{:?} is not an integer ({})", field, e),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        if let Some(first) = rows.first() {
            if row.len() != first.len() {
                return Err(TerrainError::Parse {
                    line: line_number,
                    message: format!("expected {} values, found {}", first.len(), row.len()),
                });
            }
        }

        rows.push(row);
    }

    if rows.is_empty() {
        return Err(TerrainError::Parse {
            line: 0,
            message: "artifact contains no rows".into(),
        });
    }

    Grid::from_rows(&rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn parses_space_separated_rows() {
        let grid = parse("0 5\n10 15\n").unwrap();
        assert_eq!(grid.dim(), (2, 2));
        assert_eq!(grid.value_at(1, 0), 10);
        assert_eq!(grid.value_at(1, 1), 15);
    }

    #[test]
    fn accepts_negative_values_and_extra_whitespace() {
        let grid = parse("  -3   4\t7\n1 2 3\n\n").unwrap();
        assert_eq!(grid.dim(), (2, 3));
        assert_eq!(grid.value_at(0, 0), -3);
    }

    #[test]
    fn rejects_non_integer_field() {
        let err = parse("1 2\n3 x\n").unwrap_err();
        assert!(matches!(err, TerrainError::Parse { line: 2, .. }));
    }

    #[test]
    fn rejects_row_length_mismatch() {
        let err = parse("1 2 3\n4 5 6\n7 8\n").unwrap_err();
        assert!(matches!(err, TerrainError::Parse { line: 3, .. }));
    }

    #[test]
    fn rejects_empty_artifact() {
        assert!(matches!(parse("\n\n"), Err(TerrainError::Parse { .. })));
    }

    #[test]
    fn load_reads_file_from_disk() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "1 2 3").unwrap();
        writeln!(file, "4 5 6").unwrap();
        file.flush().unwrap();

        let grid = load(file.path()).unwrap();
        assert_eq!(grid.dim(), (2, 3));
        assert_eq!(grid.value_at(1, 2), 6);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load(dir.path().join("spectrogram.txt")).unwrap_err();
        assert!(matches!(err, TerrainError::Io(_)));
    }
}
