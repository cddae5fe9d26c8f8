use serde::Deserialize;
use std::io::Read;

use crate::workflows::placement::domain::ScheduleItem;

#[derive(Debug, Deserialize)]
pub(super) struct ScheduleRow {
    #[serde(rename = "Stage", default, deserialize_with = "empty_string_as_none")]
    stage: Option<String>,
    #[serde(rename = "Date", default, deserialize_with = "empty_string_as_none")]
    date: Option<String>,
    #[serde(rename = "Time", default, deserialize_with = "empty_string_as_none")]
    time: Option<String>,
    #[serde(rename = "Venue", default, deserialize_with = "empty_string_as_none")]
    venue: Option<String>,
    #[serde(
        rename = "Description",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    description: Option<String>,
}

impl ScheduleRow {
    pub(super) fn is_blank(&self) -> bool {
        self.stage.is_none()
            && self.date.is_none()
            && self.time.is_none()
            && self.venue.is_none()
            && self.description.is_none()
    }

    pub(super) fn into_item(self) -> ScheduleItem {
        ScheduleItem {
            stage: self.stage,
            date: self.date,
            time: self.time,
            venue: self.venue,
            description: self.description,
        }
    }
}

pub(super) fn parse_rows<R: Read>(reader: R) -> Result<Vec<ScheduleRow>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    csv_reader.deserialize().collect()
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
