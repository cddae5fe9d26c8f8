//! Import a drive's process schedule from a spreadsheet export.

mod parser;

use std::io::Read;
use std::path::Path;

use crate::workflows::placement::domain::ScheduleItem;

#[derive(Debug)]
pub enum ScheduleImportError {
    Io(std::io::Error),
    Csv(csv::Error),
}

impl std::fmt::Display for ScheduleImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScheduleImportError::Io(err) => write!(f, "failed to read schedule export: {}", err),
            ScheduleImportError::Csv(err) => write!(f, "invalid schedule CSV data: {}", err),
        }
    }
}

impl std::error::Error for ScheduleImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ScheduleImportError::Io(err) => Some(err),
            ScheduleImportError::Csv(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for ScheduleImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for ScheduleImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Reads `Stage,Date,Time,Venue,Description` rows into schedule items.
///
/// Rows are kept as entered, including ones calendar sync will later skip, so the drive
/// record matches the sheet the placement cell published.
pub struct ScheduleImporter;

impl ScheduleImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<ScheduleItem>, ScheduleImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<ScheduleItem>, ScheduleImportError> {
        Ok(parser::parse_rows(reader)?
            .into_iter()
            .filter(|row| !row.is_blank())
            .map(parser::ScheduleRow::into_item)
            .collect())
    }
}
