//! Day-by-day schedule assembly.
//!
//! An itinerary request carries four independently keyed day maps.  This module
//! merges them into an ordered list of [`DaySchedule`] values: the union of all
//! date keys is sorted as plain strings, numbered sequentially, and every day is
//! split into the three [`DayPart`] buckets that the document renders.

use std::collections::BTreeSet;

use crate::model::{FlightLeg, HotelStay, ItineraryRequest};

/// Separator between the day-part label and the activity text.
const ACTIVITY_SEPARATOR: &str = " - ";

/// Fixed time-of-day buckets rendered for every day.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DayPart {
    Morning,
    Afternoon,
    Evening,
}

impl DayPart {
    /// All buckets in rendering order.
    pub const ALL: [DayPart; 3] = [DayPart::Morning, DayPart::Afternoon, DayPart::Evening];

    /// Label shown in the document and expected as activity prefix.
    pub fn label(self) -> &'static str {
        match self {
            DayPart::Morning => "Morning",
            DayPart::Afternoon => "Afternoon",
            DayPart::Evening => "Evening",
        }
    }

    /// Returns the activity text without its `"<Label> - "` prefix when the
    /// activity belongs to this bucket.
    pub fn strip_activity<'a>(self, activity: &'a str) -> Option<&'a str> {
        activity
            .strip_prefix(self.label())
            .and_then(|rest| rest.strip_prefix(ACTIVITY_SEPARATOR))
    }
}

/// A single line item within a day-part bucket.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScheduleEntry {
    /// Activity text with the bucket prefix already removed.
    Activity(String),
    Flight(FlightLeg),
    Transfer(String),
    Hotel(HotelStay),
}

/// Entries scheduled for one bucket of a day.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DayPartSchedule {
    pub part: DayPart,
    pub entries: Vec<ScheduleEntry>,
}

impl DayPartSchedule {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Everything scheduled for one date.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DaySchedule {
    /// 1-based position in the sorted date list, independent of the calendar.
    pub number: usize,
    pub date: String,
    pub parts: Vec<DayPartSchedule>,
}

impl DaySchedule {
    /// Returns the bucket for `part`.
    pub fn part(&self, part: DayPart) -> Option<&DayPartSchedule> {
        self.parts.iter().find(|schedule| schedule.part == part)
    }

    /// Heading shown above the day block, e.g. `Day 1: 2025-05-01`.
    pub fn title(&self) -> String {
        format!("Day {}: {}", self.number, self.date)
    }
}

/// Per-date view into the four day maps, with an explicit absent case for each.
struct DayInputs<'a> {
    activities: Option<&'a [String]>,
    flights: Option<&'a [FlightLeg]>,
    transfer: Option<&'a str>,
    hotel: Option<&'a HotelStay>,
}

impl<'a> DayInputs<'a> {
    fn lookup(request: &'a ItineraryRequest, date: &str) -> Self {
        Self {
            activities: request.activities.get(date).map(Vec::as_slice),
            flights: request.flights.get(date).map(Vec::as_slice),
            transfer: request
                .transfers
                .get(date)
                .map(String::as_str)
                .filter(|transfer| !transfer.is_empty()),
            hotel: request.hotels.get(date),
        }
    }

    fn entries_for(&self, part: DayPart) -> Vec<ScheduleEntry> {
        let mut entries: Vec<ScheduleEntry> = self
            .activities
            .unwrap_or_default()
            .iter()
            .filter_map(|activity| part.strip_activity(activity))
            .map(|text| ScheduleEntry::Activity(text.to_owned()))
            .collect();

        match part {
            DayPart::Morning => {
                if let Some(flights) = self.flights {
                    entries.extend(flights.iter().cloned().map(ScheduleEntry::Flight));
                }
                if let Some(transfer) = self.transfer {
                    entries.push(ScheduleEntry::Transfer(transfer.to_owned()));
                }
            }
            DayPart::Afternoon => {}
            DayPart::Evening => {
                if let Some(hotel) = self.hotel {
                    entries.push(ScheduleEntry::Hotel(hotel.clone()));
                }
            }
        }

        entries
    }
}

/// Returns the union of the date keys of all day maps in plain string order.
pub fn collect_dates(request: &ItineraryRequest) -> Vec<&str> {
    let dates: BTreeSet<&str> = request
        .activities
        .keys()
        .chain(request.flights.keys())
        .chain(request.transfers.keys())
        .chain(request.hotels.keys())
        .map(String::as_str)
        .collect();
    dates.into_iter().collect()
}

/// Builds the ordered day schedule for a request.
pub fn assemble_schedule(request: &ItineraryRequest) -> Vec<DaySchedule> {
    collect_dates(request)
        .into_iter()
        .enumerate()
        .map(|(index, date)| {
            let inputs = DayInputs::lookup(request, date);
            let parts = DayPart::ALL
                .iter()
                .map(|&part| DayPartSchedule {
                    part,
                    entries: inputs.entries_for(part),
                })
                .collect();
            DaySchedule {
                number: index + 1,
                date: date.to_owned(),
                parts,
            }
        })
        .collect()
}
