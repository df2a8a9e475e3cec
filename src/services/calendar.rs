use chrono::{DateTime, Duration, Utc};

use crate::models::Event;

const ICS_PRODID: &str = "-//Campus Connect//NONSGML Events Calendar//EN";

/// Events without an explicit end run two hours.
const DEFAULT_DURATION_HOURS: i64 = 2;

fn ics_timestamp(at: DateTime<Utc>) -> String {
    at.format("%Y%m%dT%H%M%SZ").to_string()
}

fn escape_text(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace(';', "\\;")
        .replace(',', "\\,")
        .replace('\n', "\\n")
}

/// Builds an iCalendar document for a single event, suitable for a
/// `text/calendar` download.
pub fn build_ics(event: &Event) -> String {
    let uid = format!("event-{}@campus-connect.local", event.id);
    let dtstamp = ics_timestamp(Utc::now());
    let dtstart = ics_timestamp(event.date);
    let dtend = ics_timestamp(event.date + Duration::hours(DEFAULT_DURATION_HOURS));

    let lines = [
        "BEGIN:VCALENDAR".to_string(),
        "VERSION:2.0".to_string(),
        format!("PRODID:{ICS_PRODID}"),
        "CALSCALE:GREGORIAN".to_string(),
        "METHOD:PUBLISH".to_string(),
        "BEGIN:VEVENT".to_string(),
        format!("UID:{uid}"),
        format!("DTSTAMP:{dtstamp}"),
        format!("DTSTART:{dtstart}"),
        format!("DTEND:{dtend}"),
        format!("SUMMARY:{}", escape_text(&event.title)),
        format!(
            "DESCRIPTION:{}",
            escape_text(event.description.as_deref().unwrap_or(""))
        ),
        format!("LOCATION:{}", escape_text(&event.location_name)),
        "END:VEVENT".to_string(),
        "END:VCALENDAR".to_string(),
        String::new(),
    ];

    lines.join("\r\n")
}
