// Request and result types exposed to callers of the supplier client
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// Search input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchCriteria {
    pub checkin: NaiveDate,
    pub checkout: NaiveDate,
    pub residency: String,
    pub language: String,
    pub guests: Vec<GuestRoom>,
    pub region_id: Option<String>,
    // Used when no region is given
    #[serde(default)]
    pub hotel_ids: Vec<String>,
    pub currency: Option<String>,
}

// Occupancy of one room: adult count and the age of each child
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuestRoom {
    pub adults: u8,
    #[serde(default)]
    pub children: Vec<u8>,
}

impl GuestRoom {
    pub fn adults(adults: u8) -> Self {
        Self {
            adults,
            children: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingRequest {
    // Caller-chosen order reference, reused by get_booking / cancel_booking
    pub partner_order_id: String,
    pub rate_id: String,
    pub guests: Vec<BookingGuest>,
    pub payment: Payment,
    #[serde(default = "default_language")]
    pub language: String,
}

fn default_language() -> String {
    "en".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingGuest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    #[serde(rename = "type")]
    pub payment_type: PaymentType,
}

// How the booking is paid: against the agency deposit, at the hotel, or now by card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentType {
    Deposit,
    Hotel,
    Now,
}

// Results

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Region {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub region_type: String,
    pub country_code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HotelSummary {
    pub id: String,
    pub rates: Vec<RateSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RateSummary {
    pub rate_id: String,
    pub room_name: String,
    pub meal: String,
    pub amount: f64,
    pub currency: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HotelDetails {
    pub id: String,
    pub name: String,
    pub address: String,
    pub star_rating: u8,
    pub check_in_time: Option<String>,
    pub check_out_time: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub images: Vec<String>,
    pub amenities: Vec<String>,
}

/// Outcome of a rate re-check.
///
/// `available == false` is a normal answer from the supplier (the rate went
/// stale or sold out), not a failure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AvailabilityResult {
    pub available: bool,
    pub rate_id: String,
    pub details: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookingConfirmation {
    pub partner_order_id: String,
    pub order_id: Option<String>,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookingRecord {
    pub partner_order_id: String,
    pub order_id: Option<String>,
    pub status: String,
    pub hotel_id: Option<String>,
    pub checkin: Option<NaiveDate>,
    pub checkout: Option<NaiveDate>,
    pub amount: Option<f64>,
    pub currency: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CancellationConfirmation {
    pub partner_order_id: String,
    pub status: String,
    pub amount_refunded: Option<f64>,
}
