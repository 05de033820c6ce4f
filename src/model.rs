//! Data structures describing an itinerary generation request.
//!
//! The types mirror the JSON payload accepted by the HTTP service.  Every field
//! falls back to its default value when absent or `null`, and a repeated key
//! keeps its last value, so partially filled payloads still decode.  Only
//! structurally invalid documents (wrong JSON types, malformed syntax, a
//! top-level value that is neither an object nor `null`) are rejected.
//!
//! Dates are kept as opaque strings and are never parsed: ordering is
//! lexicographic, which is chronological only for ISO formatted (`YYYY-MM-DD`)
//! values.

use std::collections::HashMap;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

/// The full record rendered into a single itinerary document.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ItineraryRequest {
    /// Traveller display name, also used to build the output file name.
    #[serde(deserialize_with = "nullable")]
    pub name: String,
    /// Name used in the greeting line of the page banner.
    #[serde(deserialize_with = "nullable")]
    pub greeting_name: String,
    #[serde(deserialize_with = "nullable")]
    pub departure_from: String,
    #[serde(deserialize_with = "nullable")]
    pub departure_date: String,
    #[serde(deserialize_with = "nullable")]
    pub arrival_date: String,
    #[serde(deserialize_with = "nullable")]
    pub destination: String,
    #[serde(deserialize_with = "nullable")]
    pub num_travellers: i64,
    /// Trip start date, also used to build the output file name.
    #[serde(deserialize_with = "nullable")]
    pub start_date: String,
    #[serde(deserialize_with = "nullable")]
    pub end_date: String,
    #[serde(deserialize_with = "nullable")]
    pub duration_nights: i64,
    #[serde(deserialize_with = "nullable")]
    pub duration_days: i64,
    #[serde(deserialize_with = "nullable_vec")]
    pub destinations: Vec<String>,

    /// Free-text activities per date, e.g. `"Morning - Visit museum"`.
    #[serde(deserialize_with = "nullable_map_of_vecs")]
    pub activities: HashMap<String, Vec<String>>,
    /// Flight legs per date.
    #[serde(deserialize_with = "nullable_map_of_vecs")]
    pub flights: HashMap<String, Vec<FlightLeg>>,
    /// A single transfer description per date.
    #[serde(deserialize_with = "nullable_map")]
    pub transfers: HashMap<String, String>,
    /// A single hotel stay per date.
    #[serde(deserialize_with = "nullable_map")]
    pub hotels: HashMap<String, HotelStay>,

    #[serde(deserialize_with = "nullable_vec")]
    pub flight_summary: Vec<FlightSummaryRow>,
    #[serde(deserialize_with = "nullable_vec")]
    pub hotel_bookings: Vec<HotelBookingRow>,
    #[serde(deserialize_with = "nullable_vec")]
    pub important_notes: Vec<NoteRow>,
    /// Accepted for completeness; not drawn in the document.
    #[serde(deserialize_with = "nullable_vec")]
    pub scope_of_service: Vec<ServiceRow>,
    /// Accepted for completeness; not drawn in the document.
    #[serde(deserialize_with = "nullable_vec")]
    pub inclusion_summary: Vec<InclusionRow>,
    #[serde(deserialize_with = "nullable")]
    pub payment_plan: PaymentPlan,
    #[serde(deserialize_with = "nullable")]
    pub visa: VisaDetails,
    #[serde(deserialize_with = "nullable")]
    pub contact: ContactInfo,
}

impl ItineraryRequest {
    /// Decodes a request from raw JSON bytes.
    ///
    /// The document is parsed into a [`serde_json::Value`] first, which folds
    /// repeated keys into their last occurrence.
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        let value: serde_json::Value = serde_json::from_slice(bytes)?;
        match value {
            serde_json::Value::Null => Ok(Self::default()),
            serde_json::Value::Object(_) => serde_json::from_value(value),
            other => Err(serde_json::Error::custom(format!(
                "expected an itinerary object, found {other}"
            ))),
        }
    }
}

/// A value that decodes `null` as `T::default()`.
struct OrDefault<T>(T);

impl<'de, T> Deserialize<'de> for OrDefault<T>
where
    T: Deserialize<'de> + Default,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<T>::deserialize(deserializer).map(|value| OrDefault(value.unwrap_or_default()))
    }
}

fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    OrDefault::<T>::deserialize(deserializer).map(|OrDefault(value)| value)
}

fn nullable_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    let items: Vec<OrDefault<T>> = nullable(deserializer)?;
    Ok(items.into_iter().map(|OrDefault(item)| item).collect())
}

fn nullable_map<'de, D, V>(deserializer: D) -> Result<HashMap<String, V>, D::Error>
where
    D: Deserializer<'de>,
    V: Deserialize<'de> + Default,
{
    let entries: HashMap<String, OrDefault<V>> = nullable(deserializer)?;
    Ok(entries
        .into_iter()
        .map(|(key, OrDefault(value))| (key, value))
        .collect())
}

fn nullable_map_of_vecs<'de, D, T>(deserializer: D) -> Result<HashMap<String, Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    let entries: HashMap<String, OrDefault<Vec<OrDefault<T>>>> = nullable(deserializer)?;
    Ok(entries
        .into_iter()
        .map(|(key, OrDefault(items))| {
            (key, items.into_iter().map(|OrDefault(item)| item).collect())
        })
        .collect())
}

/// One flight leg scheduled on a given day.
///
/// The time is free text and is not matched against the day-part buckets.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlightLeg {
    #[serde(deserialize_with = "nullable")]
    pub from: String,
    #[serde(deserialize_with = "nullable")]
    pub to: String,
    #[serde(deserialize_with = "nullable")]
    pub time: String,
    #[serde(deserialize_with = "nullable")]
    pub flight_no: String,
}

/// The hotel a traveller stays at on a given day.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HotelStay {
    #[serde(deserialize_with = "nullable")]
    pub name: String,
    #[serde(deserialize_with = "nullable")]
    pub address: String,
    #[serde(deserialize_with = "nullable")]
    pub check_in: String,
    #[serde(deserialize_with = "nullable")]
    pub check_out: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlightSummaryRow {
    #[serde(deserialize_with = "nullable")]
    pub date: String,
    #[serde(deserialize_with = "nullable")]
    pub airline: String,
    #[serde(deserialize_with = "nullable")]
    pub from: String,
    #[serde(deserialize_with = "nullable")]
    pub to: String,
    #[serde(deserialize_with = "nullable")]
    pub flight_no: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HotelBookingRow {
    #[serde(deserialize_with = "nullable")]
    pub city: String,
    #[serde(deserialize_with = "nullable")]
    pub check_in: String,
    #[serde(deserialize_with = "nullable")]
    pub check_out: String,
    #[serde(deserialize_with = "nullable")]
    pub nights: i64,
    #[serde(deserialize_with = "nullable")]
    pub hotel_name: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoteRow {
    #[serde(deserialize_with = "nullable")]
    pub point: String,
    #[serde(deserialize_with = "nullable")]
    pub detail: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceRow {
    #[serde(deserialize_with = "nullable")]
    pub service: String,
    #[serde(deserialize_with = "nullable")]
    pub detail: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InclusionRow {
    #[serde(deserialize_with = "nullable")]
    pub category: String,
    #[serde(deserialize_with = "nullable")]
    pub count: i64,
    #[serde(deserialize_with = "nullable")]
    pub detail: String,
    #[serde(deserialize_with = "nullable")]
    pub status: String,
}

/// Payment summary with its installment schedule.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaymentPlan {
    #[serde(deserialize_with = "nullable")]
    pub total_amount: String,
    /// Tax collected at source.
    #[serde(deserialize_with = "nullable")]
    pub tcs: String,
    #[serde(deserialize_with = "nullable_vec")]
    pub installments: Vec<Installment>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Installment {
    #[serde(deserialize_with = "nullable")]
    pub name: String,
    #[serde(deserialize_with = "nullable")]
    pub amount: String,
    #[serde(deserialize_with = "nullable")]
    pub due_date: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisaDetails {
    #[serde(rename = "type", deserialize_with = "nullable")]
    pub visa_type: String,
    #[serde(deserialize_with = "nullable")]
    pub validity: String,
    #[serde(deserialize_with = "nullable")]
    pub processing_date: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactInfo {
    #[serde(deserialize_with = "nullable")]
    pub company_name: String,
    #[serde(deserialize_with = "nullable")]
    pub address: String,
    #[serde(deserialize_with = "nullable")]
    pub phone: String,
    #[serde(deserialize_with = "nullable")]
    pub email: String,
}

/// Body returned to the caller once a document has been written.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItineraryResponse {
    pub message: String,
    pub file_path: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_nested_payload() {
        let json = br#"{
            "name": "Jane Doe",
            "num_travellers": 2,
            "activities": {"2025-05-01": ["Morning - Visit museum"]},
            "flights": {"2025-05-01": [{"from": "DEL", "to": "DXB", "time": "09:00", "flight_no": "EK 511"}]},
            "transfers": {"2025-05-01": "Airport pickup"},
            "hotels": {"2025-05-01": {"name": "Hotel Rio", "address": "1 Beach Rd", "check_in": "14:00", "check_out": "11:00"}},
            "visa": {"type": "Tourist", "validity": "30 days", "processing_date": "2025-04-01"}
        }"#;

        let request = ItineraryRequest::from_json_slice(json).expect("payload decodes");
        assert_eq!(request.name, "Jane Doe");
        assert_eq!(request.num_travellers, 2);
        assert_eq!(request.flights["2025-05-01"][0].flight_no, "EK 511");
        assert_eq!(request.hotels["2025-05-01"].name, "Hotel Rio");
        assert_eq!(request.visa.visa_type, "Tourist");
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let request = ItineraryRequest::from_json_slice(b"{}").expect("empty object decodes");
        assert_eq!(request, ItineraryRequest::default());
    }

    #[test]
    fn accepts_values_without_validation() {
        let request =
            ItineraryRequest::from_json_slice(br#"{"name": "", "num_travellers": -3}"#)
                .expect("negative counts are accepted");
        assert_eq!(request.num_travellers, -3);
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(ItineraryRequest::from_json_slice(b"{\"name\": ").is_err());
    }

    #[test]
    fn rejects_mismatched_types() {
        assert!(ItineraryRequest::from_json_slice(br#"{"name": 42}"#).is_err());
    }

    #[test]
    fn null_fields_decode_as_defaults() {
        let request = ItineraryRequest::from_json_slice(
            br#"{"name": null, "num_travellers": null, "activities": null,
                "visa": null, "payment_plan": {"installments": null}}"#,
        )
        .expect("null fields decode");
        assert_eq!(request, ItineraryRequest::default());
    }

    #[test]
    fn null_entries_inside_collections_decode_as_defaults() {
        let request = ItineraryRequest::from_json_slice(
            br#"{"activities": {"2025-05-01": null, "2025-05-02": ["Morning - Walk", null]},
                "flights": {"2025-05-01": [null]},
                "transfers": {"2025-05-03": null},
                "hotels": {"2025-05-04": null},
                "flight_summary": [null, {"airline": null}]}"#,
        )
        .expect("null entries decode");
        assert!(request.activities["2025-05-01"].is_empty());
        assert_eq!(request.activities["2025-05-02"], vec!["Morning - Walk", ""]);
        assert_eq!(request.flights["2025-05-01"], vec![FlightLeg::default()]);
        assert_eq!(request.transfers["2025-05-03"], "");
        assert_eq!(request.hotels["2025-05-04"], HotelStay::default());
        assert_eq!(request.flight_summary.len(), 2);
    }

    #[test]
    fn top_level_null_is_an_empty_request() {
        let request = ItineraryRequest::from_json_slice(b"null").expect("null decodes");
        assert_eq!(request, ItineraryRequest::default());
    }

    #[test]
    fn repeated_keys_keep_the_last_value() {
        let request = ItineraryRequest::from_json_slice(
            br#"{"name": "A", "name": "B", "visa": {"type": "X", "type": "Tourist"}}"#,
        )
        .expect("repeated keys decode");
        assert_eq!(request.name, "B");
        assert_eq!(request.visa.visa_type, "Tourist");
    }

    #[test]
    fn rejects_non_object_documents() {
        assert!(ItineraryRequest::from_json_slice(b"[]").is_err());
        assert!(ItineraryRequest::from_json_slice(b"\"itinerary\"").is_err());
    }
}
