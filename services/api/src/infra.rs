use campus_placement::config::CalendarConfig;
use campus_placement::storage::MemoryStore;
use campus_placement::workflows::calendar::{resolve_slot, CalendarSynchronizer, EventService};
use campus_placement::workflows::counselling::CounsellingService;
use campus_placement::workflows::placement::{PlacementService, ScheduleItem};
use chrono::{NaiveDate, NaiveDateTime};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Serialize;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) calendar: CalendarConfig,
}

pub(crate) type Placement = PlacementService<MemoryStore, MemoryStore>;
pub(crate) type Counselling = CounsellingService<MemoryStore>;
pub(crate) type Events = EventService<MemoryStore>;

/// Every workflow wired onto one document store.
pub(crate) struct Workflows {
    pub(crate) placement: Arc<Placement>,
    pub(crate) counselling: Arc<Counselling>,
    pub(crate) events: Arc<Events>,
}

pub(crate) fn build_workflows(store: Arc<MemoryStore>, calendar: CalendarConfig) -> Workflows {
    let synchronizer = CalendarSynchronizer::new(store.clone(), calendar.clone());
    Workflows {
        placement: Arc::new(PlacementService::new(store.clone(), synchronizer)),
        counselling: Arc::new(CounsellingService::new(store.clone())),
        events: Arc::new(EventService::new(store, calendar)),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PreviewRow {
    pub(crate) index: usize,
    pub(crate) stage: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) starts_at: Option<NaiveDateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) venue: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) skipped: Option<String>,
}

/// What calendar sync would make of a schedule, row by row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SchedulePreview {
    pub(crate) rows: Vec<PreviewRow>,
    pub(crate) scheduled: usize,
    pub(crate) skipped: usize,
}

pub(crate) fn preview_schedule(items: &[ScheduleItem], calendar: &CalendarConfig) -> SchedulePreview {
    let rows: Vec<PreviewRow> = items
        .iter()
        .enumerate()
        .map(|(index, item)| match resolve_slot(item) {
            Ok(slot) => PreviewRow {
                index,
                stage: Some(slot.stage),
                starts_at: Some(slot.starts_at),
                venue: Some(slot.venue.unwrap_or_else(|| calendar.default_venue.clone())),
                skipped: None,
            },
            Err(reason) => PreviewRow {
                index,
                stage: item.stage.clone(),
                starts_at: None,
                venue: None,
                skipped: Some(reason.to_string()),
            },
        })
        .collect();

    let skipped = rows.iter().filter(|row| row.skipped.is_some()).count();
    SchedulePreview {
        scheduled: rows.len() - skipped,
        skipped,
        rows,
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
