//! Content of the document sections, independent of drawing.
//!
//! Every section is described as plain text laid out on a fixed column grid.
//! [`crate::render`] turns these descriptions into `genpdf` elements.

use std::path::{Path, PathBuf};

use genpdf::Alignment;

use crate::model::{ContactInfo, ItineraryRequest};
use crate::schedule::{DayPart, DaySchedule, ScheduleEntry};
use crate::theme::Branding;

/// A column of a fixed-width table.
#[derive(Clone, Copy, Debug)]
pub struct Column {
    pub label: &'static str,
    pub width_mm: f64,
    /// Alignment of the body cells; header cells are always centered.
    pub alignment: Alignment,
}

const fn column(label: &'static str, width_mm: f64) -> Column {
    Column {
        label,
        width_mm,
        alignment: Alignment::Center,
    }
}

const fn left_column(label: &'static str, width_mm: f64) -> Column {
    Column {
        label,
        width_mm,
        alignment: Alignment::Left,
    }
}

pub const TRIP_SUMMARY_COLUMNS: [Column; 5] = [
    column("From", 36.0),
    column("Departure", 36.0),
    column("Arrival", 36.0),
    column("Destination", 36.0),
    column("Travellers", 36.0),
];

pub const FLIGHT_SUMMARY_COLUMNS: [Column; 5] = [
    column("Date", 35.0),
    column("Airline", 45.0),
    column("From", 35.0),
    column("To", 35.0),
    column("Flight No.", 35.0),
];

pub const HOTEL_BOOKING_COLUMNS: [Column; 5] = [
    column("City", 30.0),
    column("Check In", 30.0),
    column("Check Out", 30.0),
    column("Nights", 20.0),
    column("Hotel Name", 60.0),
];

pub const NOTE_COLUMNS: [Column; 2] = [left_column("Point", 50.0), left_column("Details", 120.0)];

pub const PAYMENT_COLUMNS: [Column; 2] = [column("Total Amount", 60.0), column("TCS", 60.0)];

pub const INSTALLMENT_COLUMNS: [Column; 3] = [
    left_column("Installment", 40.0),
    column("Amount", 40.0),
    column("Due Date", 40.0),
];

pub const VISA_COLUMNS: [Column; 3] = [
    column("Visa Type", 40.0),
    column("Validity", 40.0),
    column("Processing Date", 40.0),
];

/// A header row followed by body rows on a fixed column grid.
#[derive(Clone, Debug)]
pub struct Table {
    pub columns: &'static [Column],
    pub rows: Vec<Vec<String>>,
}

impl Table {
    fn new(columns: &'static [Column], rows: Vec<Vec<String>>) -> Self {
        Self { columns, rows }
    }

    /// Total width of the grid in millimetres.
    pub fn width_mm(&self) -> f64 {
        self.columns.iter().map(|column| column.width_mm).sum()
    }
}

/// A titled group of tables.
#[derive(Clone, Debug)]
pub struct TableSection {
    pub title: &'static str,
    pub tables: Vec<Table>,
}

pub fn trip_summary(request: &ItineraryRequest) -> Table {
    Table::new(
        &TRIP_SUMMARY_COLUMNS,
        vec![vec![
            request.departure_from.clone(),
            request.departure_date.clone(),
            request.arrival_date.clone(),
            request.destination.clone(),
            request.num_travellers.to_string(),
        ]],
    )
}

pub fn flight_summary(request: &ItineraryRequest) -> TableSection {
    let rows = request
        .flight_summary
        .iter()
        .map(|flight| {
            vec![
                flight.date.clone(),
                flight.airline.clone(),
                flight.from.clone(),
                flight.to.clone(),
                flight.flight_no.clone(),
            ]
        })
        .collect();
    TableSection {
        title: "Flight Summary",
        tables: vec![Table::new(&FLIGHT_SUMMARY_COLUMNS, rows)],
    }
}

pub fn hotel_bookings(request: &ItineraryRequest) -> TableSection {
    let rows = request
        .hotel_bookings
        .iter()
        .map(|booking| {
            vec![
                booking.city.clone(),
                booking.check_in.clone(),
                booking.check_out.clone(),
                booking.nights.to_string(),
                booking.hotel_name.clone(),
            ]
        })
        .collect();
    TableSection {
        title: "Hotel Bookings",
        tables: vec![Table::new(&HOTEL_BOOKING_COLUMNS, rows)],
    }
}

pub fn important_notes(request: &ItineraryRequest) -> TableSection {
    let rows = request
        .important_notes
        .iter()
        .map(|note| vec![note.point.clone(), note.detail.clone()])
        .collect();
    TableSection {
        title: "Important Notes",
        tables: vec![Table::new(&NOTE_COLUMNS, rows)],
    }
}

pub fn payment_plan(request: &ItineraryRequest) -> TableSection {
    let plan = &request.payment_plan;
    let installments = plan
        .installments
        .iter()
        .map(|installment| {
            vec![
                installment.name.clone(),
                installment.amount.clone(),
                installment.due_date.clone(),
            ]
        })
        .collect();
    TableSection {
        title: "Payment Plan",
        tables: vec![
            Table::new(
                &PAYMENT_COLUMNS,
                vec![vec![plan.total_amount.clone(), plan.tcs.clone()]],
            ),
            Table::new(&INSTALLMENT_COLUMNS, installments),
        ],
    }
}

pub fn visa_details(request: &ItineraryRequest) -> TableSection {
    let visa = &request.visa;
    TableSection {
        title: "Visa Details",
        tables: vec![Table::new(
            &VISA_COLUMNS,
            vec![vec![
                visa.visa_type.clone(),
                visa.validity.clone(),
                visa.processing_date.clone(),
            ]],
        )],
    }
}

/// Every table section following the day schedule, in document order.
pub fn summary_sections(request: &ItineraryRequest) -> Vec<TableSection> {
    vec![
        flight_summary(request),
        hotel_bookings(request),
        important_notes(request),
        payment_plan(request),
        visa_details(request),
    ]
}

/// Lines printed in the page banner, top to bottom.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BannerText {
    pub greeting: String,
    pub title: String,
    pub duration: String,
    pub icons: String,
}

pub fn banner_text(request: &ItineraryRequest, branding: &Branding) -> BannerText {
    BannerText {
        greeting: format!("Hi, {}!", request.greeting_name),
        title: format!("{} Travel Itinerary", request.destination),
        duration: format!(
            "{} Days {} Nights",
            request.duration_days, request.duration_nights
        ),
        icons: branding.icons.clone(),
    }
}

/// Lines printed in the footer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FooterText {
    tagline: String,
    generator: String,
    pub contact: String,
}

impl FooterText {
    /// The tagline line for the given page number.
    pub fn tagline(&self, page: usize) -> String {
        format!("{}   |   {}   |   Page {}", self.tagline, self.generator, page)
    }
}

pub fn footer_text(contact: &ContactInfo, branding: &Branding) -> FooterText {
    FooterText {
        tagline: branding.tagline.clone(),
        generator: branding.generator.clone(),
        contact: format!(
            "{} | {} | Phone: {} | Email: {}",
            contact.company_name, contact.address, contact.phone, contact.email
        ),
    }
}

/// Role of a line inside a day block, mapped to a text style when drawing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DayLineKind {
    PartLabel,
    Activity,
    Flight,
    Transfer,
    HotelName,
    HotelDetail,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DayLine {
    pub kind: DayLineKind,
    pub text: String,
}

impl DayLine {
    fn new(kind: DayLineKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }
}

/// Flattens one day into the lines printed below its title.
///
/// Every bucket label is printed even when the bucket is empty.
pub fn day_lines(day: &DaySchedule) -> Vec<DayLine> {
    let mut lines = Vec::new();
    for part in DayPart::ALL {
        lines.push(DayLine::new(DayLineKind::PartLabel, part.label()));
        let Some(schedule) = day.part(part) else {
            continue;
        };
        for entry in &schedule.entries {
            match entry {
                ScheduleEntry::Activity(text) => {
                    lines.push(DayLine::new(DayLineKind::Activity, format!("\u{2022} {}", text)));
                }
                ScheduleEntry::Flight(flight) => {
                    lines.push(DayLine::new(
                        DayLineKind::Flight,
                        format!(
                            "Flight {} ({} \u{2192} {} @ {})",
                            flight.flight_no, flight.from, flight.to, flight.time
                        ),
                    ));
                }
                ScheduleEntry::Transfer(text) => {
                    lines.push(DayLine::new(DayLineKind::Transfer, format!("Transfer: {}", text)));
                }
                ScheduleEntry::Hotel(hotel) => {
                    let name = format!("Hotel: {}", hotel.name);
                    lines.push(DayLine::new(DayLineKind::HotelName, name));
                    lines.push(DayLine::new(DayLineKind::HotelDetail, hotel.address.clone()));
                    lines.push(DayLine::new(
                        DayLineKind::HotelDetail,
                        format!("Check-in: {} | Check-out: {}", hotel.check_in, hotel.check_out),
                    ));
                }
            }
        }
    }
    lines
}

/// Replaces characters that would escape or break a file name component.
fn file_name_component(value: &str) -> String {
    value
        .chars()
        .map(|c| match c {
            ' ' | '/' | '\\' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect()
}

/// File name of the generated document, e.g. `itinerary_Jane_Doe_2025-05-01.pdf`.
pub fn output_file_name(request: &ItineraryRequest) -> String {
    format!(
        "itinerary_{}_{}.pdf",
        file_name_component(&request.name),
        file_name_component(&request.start_date)
    )
}

/// Full output path of the generated document inside `output_dir`.
pub fn output_path(output_dir: &Path, request: &ItineraryRequest) -> PathBuf {
    output_dir.join(output_file_name(request))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FlightLeg, FlightSummaryRow, HotelStay};
    use crate::schedule::assemble_schedule;
    use crate::theme::Theme;

    fn request_named(name: &str, start_date: &str) -> ItineraryRequest {
        ItineraryRequest {
            name: name.into(),
            start_date: start_date.into(),
            ..ItineraryRequest::default()
        }
    }

    #[test]
    fn output_path_replaces_spaces() {
        let request = request_named("Jane Doe", "2025-05-01");
        let path = output_path(Path::new("./pdfs"), &request);
        assert_eq!(path, PathBuf::from("./pdfs/itinerary_Jane_Doe_2025-05-01.pdf"));
    }

    #[test]
    fn output_name_cannot_escape_the_directory() {
        let request = request_named("../../etc/passwd", "2025/05/01");
        let name = output_file_name(&request);
        assert!(!name.contains('/'));
        assert_eq!(name, "itinerary_.._.._etc_passwd_2025_05_01.pdf");
        assert_eq!(
            output_path(Path::new("./pdfs"), &request).parent(),
            Some(Path::new("./pdfs"))
        );
    }

    #[test]
    fn identical_flight_rows_are_not_deduplicated() {
        let row = FlightSummaryRow {
            date: "2025-05-01".into(),
            airline: "Emirates".into(),
            from: "DEL".into(),
            to: "DXB".into(),
            flight_no: "EK 511".into(),
        };
        let request = ItineraryRequest {
            flight_summary: vec![row.clone(), row],
            ..ItineraryRequest::default()
        };

        let section = flight_summary(&request);
        let rows = &section.tables[0].rows;
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], rows[1]);
    }

    #[test]
    fn payment_plan_has_summary_and_installment_tables() {
        let mut request = ItineraryRequest::default();
        request.payment_plan.total_amount = "9,00,000".into();
        request.payment_plan.tcs = "Not Collected".into();

        let section = payment_plan(&request);
        assert_eq!(section.tables.len(), 2);
        assert_eq!(
            section.tables[0].rows,
            vec![vec!["9,00,000".to_owned(), "Not Collected".to_owned()]]
        );
        assert!(section.tables[1].rows.is_empty());
    }

    #[test]
    fn tables_end_inside_the_page() {
        let theme = Theme::CLASSIC;
        let (page_width, _) = theme.page_size_mm;
        let right_edge = |table: &Table| theme.side_margin_mm + table.width_mm();

        let request = ItineraryRequest::default();
        assert!(right_edge(&trip_summary(&request)) <= page_width);
        for section in summary_sections(&request) {
            for table in &section.tables {
                assert!(
                    right_edge(table) <= page_width,
                    "{} runs off the page",
                    section.title
                );
            }
        }
        // Flight Summary spans 185 mm and ends 10 mm from the right page edge.
        let flights = &flight_summary(&request).tables[0];
        assert!((right_edge(flights) - 200.0).abs() < 1e-9);
    }

    #[test]
    fn banner_and_footer_texts() {
        let mut request = request_named("Jane Doe", "2025-05-01");
        request.greeting_name = "Jane".into();
        request.destination = "Dubai".into();
        request.duration_days = 5;
        request.duration_nights = 4;
        request.contact = ContactInfo {
            company_name: "Vigovia".into(),
            address: "Bengaluru".into(),
            phone: "+91 99".into(),
            email: "trips@example.com".into(),
        };

        let branding = Branding::default();
        let banner = banner_text(&request, &branding);
        assert_eq!(banner.greeting, "Hi, Jane!");
        assert_eq!(banner.title, "Dubai Travel Itinerary");
        assert_eq!(banner.duration, "5 Days 4 Nights");

        let footer = footer_text(&request.contact, &branding);
        assert_eq!(
            footer.tagline(3),
            "PLAN.PACK.GO.   |   Generated by Vigovia   |   Page 3"
        );
        assert_eq!(
            footer.contact,
            "Vigovia | Bengaluru | Phone: +91 99 | Email: trips@example.com"
        );
    }

    #[test]
    fn day_lines_follow_bucket_order() {
        let mut request = ItineraryRequest::default();
        request.activities.insert(
            "2025-05-01".into(),
            vec!["Morning - Visit museum".into(), "Brunch - something".into()],
        );
        request.flights.insert(
            "2025-05-01".into(),
            vec![FlightLeg {
                from: "DEL".into(),
                to: "DXB".into(),
                time: "09:00".into(),
                flight_no: "EK 511".into(),
            }],
        );
        request.hotels.insert(
            "2025-05-01".into(),
            HotelStay {
                name: "Rove".into(),
                address: "Downtown".into(),
                check_in: "14:00".into(),
                check_out: "12:00".into(),
            },
        );

        let days = assemble_schedule(&request);
        let texts: Vec<String> = day_lines(&days[0]).into_iter().map(|line| line.text).collect();
        assert_eq!(
            texts,
            vec![
                "Morning",
                "\u{2022} Visit museum",
                "Flight EK 511 (DEL \u{2192} DXB @ 09:00)",
                "Afternoon",
                "Evening",
                "Hotel: Rove",
                "Downtown",
                "Check-in: 14:00 | Check-out: 12:00",
            ]
        );
    }
}
