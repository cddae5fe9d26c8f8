use crate::infra::{build_workflows, preview_schedule, SchedulePreview};
use campus_placement::auth::UserId;
use campus_placement::config::CalendarConfig;
use campus_placement::error::AppError;
use campus_placement::storage::MemoryStore;
use campus_placement::workflows::calendar::{CalendarEvent, EventQuery, NewEvent};
use campus_placement::workflows::counselling::{NewSession, SessionApplicationRequest, Urgency};
use campus_placement::workflows::error::PlacementError;
use campus_placement::workflows::placement::{Application, NewDrive, ScheduleItem};
use campus_placement::workflows::schedule_import::ScheduleImporter;
use chrono::{Duration, Local, NaiveDate};
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Date of the first stage (YYYY-MM-DD). Defaults to a week from today.
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) start: Option<NaiveDate>,
    /// Optional schedule CSV used instead of the generated one.
    #[arg(long)]
    pub(crate) schedule_csv: Option<PathBuf>,
    /// Skip the counselling booking portion of the demo.
    #[arg(long)]
    pub(crate) skip_counselling: bool,
}

#[derive(Args, Debug)]
pub(crate) struct ScheduleImportArgs {
    /// Schedule export with Stage,Date,Time,Venue,Description columns
    #[arg(long)]
    pub(crate) csv: PathBuf,
    /// Company name used for event titles in the preview
    #[arg(long, default_value = "Company")]
    pub(crate) company: String,
}

pub(crate) fn run_schedule_import(args: ScheduleImportArgs) -> Result<(), AppError> {
    let items = ScheduleImporter::from_path(&args.csv)?;
    let preview = preview_schedule(&items, &CalendarConfig::default());

    println!("Schedule import: {}", args.csv.display());
    render_preview(&args.company, &preview);
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        start,
        schedule_csv,
        skip_counselling,
    } = args;

    let start = start.unwrap_or_else(|| Local::now().date_naive() + Duration::days(7));
    let process_schedule = match schedule_csv {
        Some(path) => ScheduleImporter::from_path(path)?,
        None => generated_schedule(start),
    };

    let calendar = CalendarConfig::default();
    let workflows = build_workflows(Arc::new(MemoryStore::default()), calendar.clone());
    let placement = &workflows.placement;

    println!("Campus placement demo");
    render_preview("Acme Analytics", &preview_schedule(&process_schedule, &calendar));

    let drive = placement.create_drive(NewDrive {
        company: "Acme Analytics".to_string(),
        role: "Graduate Engineer".to_string(),
        description: Some("Campus hiring for the graduating batch".to_string()),
        location: Some("Pune".to_string()),
        package: Some("12 LPA".to_string()),
        deadline: Some(start),
        process: vec!["OA".to_string(), "Interview".to_string(), "HR".to_string()],
        process_schedule,
    })?;
    println!(
        "\nPublished drive {} | {} - {} | stages: {}",
        drive.id.0,
        drive.company,
        drive.role,
        drive.process.join(" -> ")
    );

    let student = UserId("stu-demo-001".to_string());
    let application = placement.apply_to_drive(&student, &drive.id)?;
    render_application("Applied", &application);
    render_events(&placement.events_for_user(&student, &EventQuery::default())?);

    for _ in 1..drive.process.len() {
        let application = placement.advance_stage(&application.id)?;
        render_application("Advanced", &application);
        render_events(&placement.events_for_user(&student, &EventQuery::default())?);
    }

    let classmate = UserId("stu-demo-002".to_string());
    let other = placement.apply_to_drive(&classmate, &drive.id)?;
    let rejected = placement.reject_application(&other.id)?;
    render_application("Rejected", &rejected);
    if let Err(err) = placement.advance_stage(&rejected.id) {
        println!("  advancing a rejected application fails: {err}");
    }

    let failures = placement.sync_failures();
    println!("\nCalendar sync failures: {}", failures.len());

    run_event_demo(&workflows.events, start, &student, &classmate)?;

    if !skip_counselling {
        run_counselling_demo(&workflows.counselling, start, &student, &classmate)?;
    }

    Ok(())
}

fn run_event_demo(
    events: &crate::infra::Events,
    start: NaiveDate,
    first: &UserId,
    second: &UserId,
) -> Result<(), AppError> {
    let starts_at = start
        .and_hms_opt(17, 0, 0)
        .unwrap_or_else(|| start.and_time(chrono::NaiveTime::MIN));
    let event = events.create_event(NewEvent {
        title: "Pre-placement talk".to_string(),
        kind: "Seminar".to_string(),
        date: starts_at,
        time: None,
        location: Some("Main Auditorium".to_string()),
        description: None,
        max_attendees: Some(1),
    })?;
    println!(
        "\nEvent {} | {} | {} at {} (1 seat)",
        event.id.0, event.title, event.location, event.time
    );

    events.register(first, &event.id)?;
    println!("- {} registered", first.0);
    match events.register(second, &event.id) {
        Err(PlacementError::CapacityExceeded(message)) => {
            println!("- {} turned away: {message}", second.0)
        }
        Err(err) => return Err(err.into()),
        Ok(_) => println!("- {} registered", second.0),
    }
    Ok(())
}

fn run_counselling_demo(
    counselling: &crate::infra::Counselling,
    start: NaiveDate,
    first: &UserId,
    second: &UserId,
) -> Result<(), AppError> {
    let session = counselling.create_session(NewSession {
        counsellor_name: "Dr. Rao".to_string(),
        topic: "Offer negotiation".to_string(),
        date: start,
        time: "3:00 PM".to_string(),
        duration_minutes: None,
        location: None,
        description: None,
        max_participants: Some(1),
        session_type: None,
    })?;
    println!(
        "\nCounselling session {} with {} on {} at {} ({} seat)",
        session.id.0, session.counsellor_name, session.date, session.time, session.max_participants
    );

    let request = SessionApplicationRequest {
        reason: "Comparing two offers".to_string(),
        urgency: Some(Urgency::High),
        previous_counselling: Some(false),
        notes: None,
    };
    let booking = counselling.apply_for_session(first, &session.id, request.clone())?;
    println!("- {} booked ({})", first.0, booking.status.label());

    match counselling.apply_for_session(second, &session.id, request.clone()) {
        Err(PlacementError::CapacityExceeded(message)) => {
            println!("- {} turned away: {message}", second.0)
        }
        Err(err) => return Err(err.into()),
        Ok(_) => println!("- {} booked", second.0),
    }

    counselling.cancel_application(first, &booking.id)?;
    println!("- {} cancelled, freeing the seat", first.0);
    let booking = counselling.apply_for_session(second, &session.id, request)?;
    println!("- {} booked ({})", second.0, booking.status.label());
    Ok(())
}

fn generated_schedule(start: NaiveDate) -> Vec<ScheduleItem> {
    [
        ("OA", 0, "10:00 AM", "Computer Lab 2"),
        ("Interview", 3, "11:30 AM", "Placement Office"),
        ("HR", 7, "4:00 PM", "Conference Room"),
    ]
    .into_iter()
    .map(|(stage, offset, time, venue)| ScheduleItem {
        stage: Some(stage.to_string()),
        date: Some((start + Duration::days(offset)).format("%Y-%m-%d").to_string()),
        time: Some(time.to_string()),
        venue: Some(venue.to_string()),
        description: None,
    })
    .collect()
}

fn render_preview(company: &str, preview: &SchedulePreview) {
    println!(
        "Schedule preview: {} event(s) | {} skipped row(s)",
        preview.scheduled, preview.skipped
    );
    for row in &preview.rows {
        let stage = row.stage.as_deref().unwrap_or("<no stage>");
        match (&row.starts_at, &row.skipped) {
            (Some(starts_at), _) => println!(
                "  {}. {company} - {stage} | {} | {}",
                row.index + 1,
                starts_at.format("%Y-%m-%d %H:%M"),
                row.venue.as_deref().unwrap_or("TBD")
            ),
            (None, Some(reason)) => println!("  {}. {stage} skipped: {reason}", row.index + 1),
            (None, None) => println!("  {}. {stage}", row.index + 1),
        }
    }
}

fn render_application(label: &str, application: &Application) {
    println!(
        "\n{label}: {} | status {} | stage {} ({}) | next: {}",
        application.id.0,
        application.status.label(),
        application.current_stage,
        application.process_stage_index,
        application.next_step
    );
}

fn render_events(events: &[CalendarEvent]) {
    for event in events {
        println!(
            "  - {} | {} | {:?}",
            event.title,
            event.date.format("%Y-%m-%d %H:%M"),
            event.status
        );
    }
}
