// Wire schema of the supplier's B2B v3 JSON API.
// Requests are serialized from borrowed views of the caller's types; responses
// are decoded into these structs and then converted into `crate::models`.
use chrono::NaiveDate;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};

use crate::models::{
    BookingConfirmation, BookingRecord, CancellationConfirmation, GuestRoom, HotelDetails,
    HotelSummary, RateSummary, Region,
};

pub const MULTICOMPLETE_PATH: &str = "/api/b2b/v3/search/multicomplete/";
pub const SERP_REGION_PATH: &str = "/api/b2b/v3/search/serp/region/";
pub const SERP_HOTELS_PATH: &str = "/api/b2b/v3/search/serp/hotels/";
pub const HOTEL_INFO_PATH: &str = "/api/b2b/v3/hotel/info/";
pub const PREBOOK_PATH: &str = "/api/b2b/v3/hotel/prebook/";
pub const BOOKING_FINISH_PATH: &str = "/api/b2b/v3/hotel/order/booking/finish/";
pub const ORDER_INFO_PATH: &str = "/api/b2b/v3/hotel/order/info/";
pub const ORDER_CANCEL_PATH: &str = "/api/b2b/v3/hotel/order/cancel/";

// Error codes the supplier uses for a rate that can no longer be booked
pub const STALE_RATE_ERRORS: &[&str] = &["rate_not_found", "no_available_rates", "sold_out"];
pub const NOT_FOUND_ERRORS: &[&str] = &["not_found", "hotel_not_found", "order_not_found"];

// Every response body is wrapped in this envelope
#[derive(Debug, Deserialize)]
pub struct SupplierEnvelope {
    #[serde(default)]
    pub data: Option<serde_json::Value>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl SupplierEnvelope {
    // Supplier error code, if the envelope reports a failure
    pub fn error_code(&self) -> Option<String> {
        match (&self.error, self.status.as_deref()) {
            (Some(error), _) if !error.is_empty() => Some(error.clone()),
            (_, Some("error")) => Some("unknown_error".to_string()),
            _ => None,
        }
    }
}

// Request bodies

#[derive(Debug, Serialize)]
pub struct MulticompleteRequest<'a> {
    pub query: &'a str,
    pub language: &'a str,
}

#[derive(Debug, Serialize)]
pub struct SerpRequest<'a> {
    pub checkin: NaiveDate,
    pub checkout: NaiveDate,
    pub residency: &'a str,
    pub language: &'a str,
    pub guests: &'a [GuestRoom],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region_id: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ids: Option<&'a [&'a str]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<&'a str>,
}

#[derive(Debug, Serialize)]
pub struct HotelInfoRequest<'a> {
    pub id: &'a str,
    pub language: &'a str,
}

#[derive(Debug, Serialize)]
pub struct PrebookRequest<'a> {
    pub hash: &'a str,
}

#[derive(Debug, Serialize)]
pub struct BookingFinishRequest<'a> {
    pub partner: PartnerRef<'a>,
    pub book_hash: &'a str,
    pub language: &'a str,
    pub user: BookingUser<'a>,
    pub rooms: Vec<BookingRoom<'a>>,
    pub payment_type: PaymentTypeRef<'a>,
}

#[derive(Debug, Serialize)]
pub struct PartnerRef<'a> {
    pub partner_order_id: &'a str,
}

#[derive(Debug, Serialize)]
pub struct BookingUser<'a> {
    pub email: &'a str,
    pub phone: &'a str,
}

#[derive(Debug, Serialize)]
pub struct BookingRoom<'a> {
    pub guests: Vec<BookingRoomGuest<'a>>,
}

#[derive(Debug, Serialize)]
pub struct BookingRoomGuest<'a> {
    pub first_name: &'a str,
    pub last_name: &'a str,
}

#[derive(Debug, Serialize)]
pub struct PaymentTypeRef<'a> {
    #[serde(rename = "type")]
    pub payment_type: &'a crate::models::PaymentType,
}

#[derive(Debug, Serialize)]
pub struct OrderRequest<'a> {
    pub partner_order_id: &'a str,
}

// Response payloads (the `data` member of the envelope)

#[derive(Debug, Deserialize)]
pub struct MulticompleteData {
    #[serde(default)]
    pub regions: Vec<SupplierRegion>,
}

#[derive(Debug, Deserialize)]
pub struct SupplierRegion {
    #[serde(deserialize_with = "string_from_any")]
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub region_type: String,
    #[serde(default)]
    pub country_code: Option<String>,
}

impl From<SupplierRegion> for Region {
    fn from(item: SupplierRegion) -> Self {
        Region {
            id: item.id,
            name: item.name,
            region_type: item.region_type,
            country_code: item.country_code,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SerpData {
    #[serde(default)]
    pub hotels: Vec<SupplierHotel>,
}

#[derive(Debug, Deserialize)]
pub struct SupplierHotel {
    #[serde(deserialize_with = "string_from_any")]
    pub id: String,
    #[serde(default)]
    pub rates: Vec<SupplierRate>,
}

#[derive(Debug, Deserialize)]
pub struct SupplierRate {
    #[serde(default)]
    pub book_hash: Option<String>,
    #[serde(default)]
    pub match_hash: Option<String>,
    pub room_name: String,
    #[serde(default)]
    pub meal: String,
    pub payment_options: SupplierPaymentOptions,
}

#[derive(Debug, Deserialize)]
pub struct SupplierPaymentOptions {
    pub payment_types: Vec<SupplierPaymentType>,
}

#[derive(Debug, Deserialize)]
pub struct SupplierPaymentType {
    #[serde(deserialize_with = "f64_from_any")]
    pub amount: f64,
    pub currency_code: String,
}

impl TryFrom<SupplierHotel> for HotelSummary {
    type Error = String;

    fn try_from(item: SupplierHotel) -> Result<Self, Self::Error> {
        let mut rates = Vec::with_capacity(item.rates.len());
        for rate in item.rates {
            let rate_id = rate
                .book_hash
                .or(rate.match_hash)
                .ok_or_else(|| format!("rate of hotel {} has no hash", item.id))?;
            let price = rate
                .payment_options
                .payment_types
                .into_iter()
                .next()
                .ok_or_else(|| format!("rate {} has no payment type", rate_id))?;
            rates.push(RateSummary {
                rate_id,
                room_name: rate.room_name,
                meal: rate.meal,
                amount: price.amount,
                currency: price.currency_code,
            });
        }

        Ok(HotelSummary { id: item.id, rates })
    }
}

#[derive(Debug, Deserialize)]
pub struct HotelInfoData {
    #[serde(deserialize_with = "string_from_any")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub star_rating: u8,
    #[serde(default)]
    pub check_in_time: Option<String>,
    #[serde(default)]
    pub check_out_time: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub amenity_groups: Vec<SupplierAmenityGroup>,
}

#[derive(Debug, Deserialize)]
pub struct SupplierAmenityGroup {
    #[serde(default)]
    pub amenities: Vec<String>,
}

impl From<HotelInfoData> for HotelDetails {
    fn from(item: HotelInfoData) -> Self {
        HotelDetails {
            id: item.id,
            name: item.name,
            address: item.address,
            star_rating: item.star_rating,
            check_in_time: item.check_in_time,
            check_out_time: item.check_out_time,
            latitude: item.latitude,
            longitude: item.longitude,
            images: item.images,
            amenities: item
                .amenity_groups
                .into_iter()
                .flat_map(|group| group.amenities)
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PrebookData {
    #[serde(default)]
    pub hotels: Vec<PrebookHotel>,
}

#[derive(Debug, Deserialize)]
pub struct PrebookHotel {
    #[serde(default)]
    pub rates: Vec<serde_json::Value>,
}

impl PrebookData {
    pub fn has_rates(&self) -> bool {
        self.hotels.iter().any(|hotel| !hotel.rates.is_empty())
    }
}

#[derive(Debug, Deserialize)]
pub struct OrderData {
    #[serde(default, deserialize_with = "opt_string_from_any")]
    pub partner_order_id: Option<String>,
    #[serde(default, deserialize_with = "opt_string_from_any")]
    pub order_id: Option<String>,
    pub status: String,
    #[serde(default, deserialize_with = "opt_string_from_any")]
    pub hotel_id: Option<String>,
    #[serde(default)]
    pub checkin: Option<NaiveDate>,
    #[serde(default)]
    pub checkout: Option<NaiveDate>,
    #[serde(default, deserialize_with = "opt_f64_from_any")]
    pub amount: Option<f64>,
    #[serde(default)]
    pub currency_code: Option<String>,
}

impl OrderData {
    pub fn into_confirmation(self, requested_id: &str) -> BookingConfirmation {
        BookingConfirmation {
            partner_order_id: self
                .partner_order_id
                .unwrap_or_else(|| requested_id.to_string()),
            order_id: self.order_id,
            status: self.status,
        }
    }

    pub fn into_record(self, requested_id: &str) -> BookingRecord {
        BookingRecord {
            partner_order_id: self
                .partner_order_id
                .unwrap_or_else(|| requested_id.to_string()),
            order_id: self.order_id,
            status: self.status,
            hotel_id: self.hotel_id,
            checkin: self.checkin,
            checkout: self.checkout,
            amount: self.amount,
            currency: self.currency_code,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CancelData {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "opt_f64_from_any")]
    pub amount_refunded: Option<f64>,
}

impl CancelData {
    pub fn into_confirmation(self, requested_id: &str) -> CancellationConfirmation {
        CancellationConfirmation {
            partner_order_id: requested_id.to_string(),
            status: self.status.unwrap_or_else(|| "cancelled".to_string()),
            amount_refunded: self.amount_refunded,
        }
    }
}

// The supplier sends ids as numbers and amounts as decimal strings; accept both forms
#[derive(Deserialize)]
#[serde(untagged)]
enum TextOrNumber {
    Text(String),
    Number(serde_json::Number),
}

fn string_from_any<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match TextOrNumber::deserialize(deserializer)? {
        TextOrNumber::Text(text) => text,
        TextOrNumber::Number(number) => number.to_string(),
    })
}

fn opt_string_from_any<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(
        Option::<TextOrNumber>::deserialize(deserializer)?.map(|value| match value {
            TextOrNumber::Text(text) => text,
            TextOrNumber::Number(number) => number.to_string(),
        }),
    )
}

fn to_f64<E: de::Error>(value: TextOrNumber) -> Result<f64, E> {
    match value {
        TextOrNumber::Text(text) => text
            .trim()
            .parse::<f64>()
            .map_err(|_| E::custom(format!("invalid amount {:?}", text))),
        TextOrNumber::Number(number) => number
            .as_f64()
            .ok_or_else(|| E::custom(format!("invalid amount {}", number))),
    }
}

fn f64_from_any<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    to_f64(TextOrNumber::deserialize(deserializer)?)
}

fn opt_f64_from_any<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<TextOrNumber>::deserialize(deserializer)?
        .map(to_f64)
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_region_ids_accept_numbers_and_strings() {
        let data: MulticompleteData = serde_json::from_value(json!({
            "regions": [
                {"id": 2734, "name": "Barcelona", "type": "City", "country_code": "ES"},
                {"id": "r2", "name": "Barcelona Province", "type": "Province (State)"}
            ],
            "hotels": []
        }))
        .unwrap();

        let regions: Vec<Region> = data.regions.into_iter().map(Region::from).collect();
        assert_eq!(regions[0].id, "2734");
        assert_eq!(regions[0].country_code.as_deref(), Some("ES"));
        assert_eq!(regions[1].id, "r2");
        assert_eq!(regions[1].region_type, "Province (State)");
    }

    #[test]
    fn test_hotel_summary_prefers_book_hash() {
        let hotel: SupplierHotel = serde_json::from_value(json!({
            "id": "hotel_arts",
            "rates": [{
                "book_hash": "h-abc",
                "match_hash": "m-abc",
                "room_name": "Deluxe Double",
                "meal": "breakfast",
                "payment_options": {"payment_types": [{"amount": "240.50", "currency_code": "EUR"}]}
            }, {
                "match_hash": "m-def",
                "room_name": "Suite",
                "payment_options": {"payment_types": [{"amount": 410, "currency_code": "EUR"}]}
            }]
        }))
        .unwrap();

        let summary = HotelSummary::try_from(hotel).unwrap();
        assert_eq!(summary.rates.len(), 2);
        assert_eq!(summary.rates[0].rate_id, "h-abc");
        assert_eq!(summary.rates[0].amount, 240.5);
        assert_eq!(summary.rates[1].rate_id, "m-def");
        assert_eq!(summary.rates[1].meal, "");
        assert_eq!(summary.rates[1].amount, 410.0);
    }

    #[test]
    fn test_rate_without_hash_is_rejected() {
        let hotel: SupplierHotel = serde_json::from_value(json!({
            "id": "h1",
            "rates": [{
                "room_name": "Twin",
                "payment_options": {"payment_types": [{"amount": "10", "currency_code": "EUR"}]}
            }]
        }))
        .unwrap();

        assert!(HotelSummary::try_from(hotel).is_err());
    }

    #[test]
    fn test_bad_amount_fails_decoding() {
        let result = serde_json::from_value::<SupplierPaymentType>(json!({
            "amount": "ten euros",
            "currency_code": "EUR"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_hotel_info_flattens_amenities() {
        let info: HotelInfoData = serde_json::from_value(json!({
            "id": "hotel_arts",
            "name": "Hotel Arts",
            "address": "Carrer de la Marina 19-21",
            "star_rating": 5,
            "check_in_time": "15:00:00",
            "images": ["https://cdn.example/{size}/1.jpg"],
            "amenity_groups": [
                {"group_name": "General", "amenities": ["Pool", "Spa"]},
                {"group_name": "Rooms", "amenities": ["Air conditioning"]}
            ]
        }))
        .unwrap();

        let details = HotelDetails::from(info);
        assert_eq!(details.amenities, vec!["Pool", "Spa", "Air conditioning"]);
        assert_eq!(details.check_out_time, None);
        assert_eq!(details.star_rating, 5);
    }

    #[test]
    fn test_envelope_error_code() {
        let ok: SupplierEnvelope =
            serde_json::from_value(json!({"data": {}, "status": "ok", "error": null})).unwrap();
        assert_eq!(ok.error_code(), None);

        let failed: SupplierEnvelope =
            serde_json::from_value(json!({"data": null, "status": "error", "error": "sold_out"}))
                .unwrap();
        assert_eq!(failed.error_code().as_deref(), Some("sold_out"));

        let bare: SupplierEnvelope = serde_json::from_value(json!({"status": "error"})).unwrap();
        assert_eq!(bare.error_code().as_deref(), Some("unknown_error"));
    }

    #[test]
    fn test_order_data_falls_back_to_requested_id() {
        let order: OrderData = serde_json::from_value(json!({
            "order_id": 987654,
            "status": "processing",
            "amount": "512.00",
            "checkin": "2026-05-01",
            "checkout": "2026-05-04"
        }))
        .unwrap();

        let record = order.into_record("agency-42");
        assert_eq!(record.partner_order_id, "agency-42");
        assert_eq!(record.order_id.as_deref(), Some("987654"));
        assert_eq!(record.amount, Some(512.0));
        assert_eq!(record.checkin, NaiveDate::from_ymd_opt(2026, 5, 1));
    }
}
