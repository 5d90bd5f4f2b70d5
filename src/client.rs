// Supplier client: readiness guard, request building and response mapping
use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, instrument, warn};

use crate::config::ClientConfiguration;
use crate::error::{ClientError, SupplierError};
use crate::models::{
    AvailabilityResult, BookingConfirmation, BookingRecord, BookingRequest,
    CancellationConfirmation, HotelDetails, HotelSummary, Region, SearchCriteria,
};
use crate::supplier::{
    self, BookingFinishRequest, BookingRoom, BookingRoomGuest, BookingUser, CancelData,
    HotelInfoData, HotelInfoRequest, MulticompleteData, MulticompleteRequest, OrderData,
    OrderRequest, PartnerRef, PaymentTypeRef, PrebookData, PrebookRequest, SerpData, SerpRequest,
    SupplierEnvelope,
};
use crate::transport::{Credentials, HttpTransport, Transport, TransportRequest, TransportResponse};
use crate::validation;

/// Operations offered by the hotel supplier.
///
/// Every call is an independent request/response; implementations keep no
/// state between calls. Sequencing such as re-checking a rate before booking
/// it is up to the caller (see [`crate::booking::book_checked`]).
#[async_trait]
pub trait HotelSupplier: Send + Sync {
    fn is_ready(&self) -> bool;

    async fn search_regions(&self, query: &str, language: &str)
        -> Result<Vec<Region>, SupplierError>;

    async fn search_hotels(
        &self,
        criteria: &SearchCriteria,
    ) -> Result<Vec<HotelSummary>, SupplierError>;

    async fn get_hotel_details(
        &self,
        hotel_id: &str,
        language: &str,
    ) -> Result<HotelDetails, SupplierError>;

    async fn check_availability(&self, rate_id: &str) -> Result<AvailabilityResult, SupplierError>;

    async fn create_booking(
        &self,
        request: &BookingRequest,
    ) -> Result<BookingConfirmation, SupplierError>;

    async fn get_booking(&self, booking_id: &str) -> Result<BookingRecord, SupplierError>;

    async fn cancel_booking(
        &self,
        booking_id: &str,
    ) -> Result<CancellationConfirmation, SupplierError>;
}

// Cheap to clone; clones share the configuration and the transport
#[derive(Clone)]
pub struct SupplierClient {
    config: Arc<ClientConfiguration>,
    transport: Arc<dyn Transport>,
}

impl std::fmt::Debug for SupplierClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SupplierClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl SupplierClient {
    // Client over the default reqwest transport
    pub fn new(config: ClientConfiguration) -> Result<Self, ClientError> {
        let transport = HttpTransport::new(config.timeout_ms)?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    pub fn from_env() -> Result<Self, ClientError> {
        Self::new(ClientConfiguration::from_env()?)
    }

    pub fn with_transport(config: ClientConfiguration, transport: Arc<dyn Transport>) -> Self {
        Self {
            config: Arc::new(config),
            transport,
        }
    }

    pub fn configuration(&self) -> &ClientConfiguration {
        &self.config
    }

    // Fails fast without touching the transport when credentials are missing
    fn guard(&self, operation: &'static str) -> Result<Credentials, SupplierError> {
        if !self.config.is_ready() {
            warn!(operation, "supplier client is not configured, request not sent");
            return Err(SupplierError::not_configured());
        }
        Ok(Credentials {
            key_id: self.config.key_id.clone(),
            api_key: self.config.api_key.clone(),
        })
    }

    async fn post(
        &self,
        credentials: Credentials,
        path: &str,
        body: serde_json::Value,
    ) -> Result<TransportResponse, SupplierError> {
        let request = TransportRequest {
            url: format!("{}{}", self.config.base_url, path),
            credentials,
            body: Some(body),
        };
        let response = self.transport.send(request).await?;
        debug!(path, status = response.status, "supplier call finished");
        Ok(response)
    }
}

fn encode<B: Serialize>(body: &B) -> Result<serde_json::Value, SupplierError> {
    serde_json::to_value(body)
        .map_err(|e| SupplierError::InvalidRequest(format!("cannot encode request: {}", e)))
}

// Non-2xx: keep the supplier's error text when the body carries one
fn reject_status(response: &TransportResponse) -> SupplierError {
    let message = serde_json::from_slice::<SupplierEnvelope>(&response.body)
        .ok()
        .and_then(|envelope| envelope.error_code())
        .unwrap_or_else(|| format!("supplier returned status {}", response.status));
    warn!(status = response.status, %message, "supplier rejected request");
    SupplierError::rejected(Some(response.status), message)
}

fn open_envelope(response: &TransportResponse) -> Result<SupplierEnvelope, SupplierError> {
    serde_json::from_slice(&response.body).map_err(|e| {
        SupplierError::InvalidResponse(format!("response is not a supplier envelope: {}", e))
    })
}

fn decode_data<T: DeserializeOwned>(data: serde_json::Value) -> Result<T, SupplierError> {
    serde_json::from_value(data)
        .map_err(|e| SupplierError::InvalidResponse(format!("unexpected payload: {}", e)))
}

// Envelope of a 2xx answer that carries no supplier error
fn accepted_envelope(response: &TransportResponse) -> Result<SupplierEnvelope, SupplierError> {
    if !response.is_success() {
        return Err(reject_status(response));
    }
    let envelope = open_envelope(response)?;
    if let Some(code) = envelope.error_code() {
        warn!(%code, "supplier declined request");
        return Err(SupplierError::rejected(None, code));
    }
    Ok(envelope)
}

fn envelope_data<T: DeserializeOwned>(envelope: SupplierEnvelope) -> Result<Option<T>, SupplierError> {
    envelope
        .data
        .filter(|data| !data.is_null())
        .map(decode_data)
        .transpose()
}

// Payload of a 2xx envelope, or None when the supplier sent no data
fn optional_data<T: DeserializeOwned>(
    response: &TransportResponse,
) -> Result<Option<T>, SupplierError> {
    envelope_data(accepted_envelope(response)?)
}

fn expect_data<T: DeserializeOwned>(response: &TransportResponse) -> Result<T, SupplierError> {
    optional_data(response)?
        .ok_or_else(|| SupplierError::InvalidResponse("response has no data".to_string()))
}

// Both an HTTP 404 and a not-found code in the body read as "<what> <id> not found"
fn not_found_as(error: SupplierError, what: &str, id: &str) -> SupplierError {
    match &error {
        SupplierError::SupplierRejected {
            status_code: Some(404),
            ..
        } => SupplierError::rejected(Some(404), format!("{} {} not found", what, id)),
        SupplierError::SupplierRejected {
            status_code: None,
            message,
        } if supplier::NOT_FOUND_ERRORS.contains(&message.as_str()) => {
            SupplierError::rejected(Some(404), format!("{} {} not found", what, id))
        }
        _ => error,
    }
}

fn unavailable(rate_id: &str, details: Option<serde_json::Value>) -> AvailabilityResult {
    AvailabilityResult {
        available: false,
        rate_id: rate_id.to_string(),
        details,
    }
}

#[async_trait]
impl HotelSupplier for SupplierClient {
    fn is_ready(&self) -> bool {
        self.config.is_ready()
    }

    #[instrument(skip(self))]
    async fn search_regions(
        &self,
        query: &str,
        language: &str,
    ) -> Result<Vec<Region>, SupplierError> {
        let credentials = self.guard("search_regions")?;
        validation::require_non_empty("query", query)?;

        let body = encode(&MulticompleteRequest { query, language })?;
        let response = self
            .post(credentials, supplier::MULTICOMPLETE_PATH, body)
            .await?;
        let data: MulticompleteData = expect_data(&response)?;

        Ok(data.regions.into_iter().map(Region::from).collect())
    }

    #[instrument(skip(self, criteria), fields(region_id = ?criteria.region_id, rooms = criteria.guests.len()))]
    async fn search_hotels(
        &self,
        criteria: &SearchCriteria,
    ) -> Result<Vec<HotelSummary>, SupplierError> {
        let credentials = self.guard("search_hotels")?;
        validation::validate_search_criteria(criteria)?;

        let region_id = criteria
            .region_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty());
        // The supplier keys regions by number; send numeric ids as JSON numbers
        let (path, region_id, ids) = match region_id {
            Some(id) => (
                supplier::SERP_REGION_PATH,
                Some(match id.parse::<u64>() {
                    Ok(number) => serde_json::Value::from(number),
                    Err(_) => serde_json::Value::from(id),
                }),
                None,
            ),
            None => (
                supplier::SERP_HOTELS_PATH,
                None,
                Some(
                    criteria
                        .hotel_ids
                        .iter()
                        .map(|id| id.trim())
                        .filter(|id| !id.is_empty())
                        .collect::<Vec<_>>(),
                ),
            ),
        };

        let body = encode(&SerpRequest {
            checkin: criteria.checkin,
            checkout: criteria.checkout,
            residency: &criteria.residency,
            language: &criteria.language,
            guests: &criteria.guests,
            region_id,
            ids: ids.as_deref(),
            currency: criteria.currency.as_deref(),
        })?;
        let response = self.post(credentials, path, body).await?;
        let data: SerpData = expect_data(&response)?;

        data.hotels
            .into_iter()
            .map(|hotel| HotelSummary::try_from(hotel).map_err(SupplierError::InvalidResponse))
            .collect()
    }

    #[instrument(skip(self))]
    async fn get_hotel_details(
        &self,
        hotel_id: &str,
        language: &str,
    ) -> Result<HotelDetails, SupplierError> {
        let credentials = self.guard("get_hotel_details")?;
        validation::require_non_empty("hotel_id", hotel_id)?;

        let body = encode(&HotelInfoRequest {
            id: hotel_id,
            language,
        })?;
        let response = self
            .post(credentials, supplier::HOTEL_INFO_PATH, body)
            .await?;
        let data: HotelInfoData =
            expect_data(&response).map_err(|e| not_found_as(e, "hotel", hotel_id))?;

        Ok(data.into())
    }

    #[instrument(skip(self))]
    async fn check_availability(&self, rate_id: &str) -> Result<AvailabilityResult, SupplierError> {
        let credentials = self.guard("check_availability")?;
        validation::require_non_empty("rate_id", rate_id)?;

        let body = encode(&PrebookRequest { hash: rate_id })?;
        let response = self.post(credentials, supplier::PREBOOK_PATH, body).await?;

        // 409 is the supplier's documented answer for a stale rate
        if response.status == 409 {
            debug!(rate_id, "rate is stale");
            return Ok(unavailable(
                rate_id,
                serde_json::from_slice(&response.body).ok(),
            ));
        }
        if !response.is_success() {
            return Err(reject_status(&response));
        }

        let envelope = open_envelope(&response)?;
        if let Some(code) = envelope.error_code() {
            if supplier::STALE_RATE_ERRORS.contains(&code.as_str()) {
                debug!(rate_id, %code, "rate no longer available");
                return Ok(unavailable(rate_id, Some(serde_json::json!({ "error": code }))));
            }
            warn!(%code, "supplier declined availability check");
            return Err(SupplierError::rejected(None, code));
        }

        let data = envelope
            .data
            .filter(|data| !data.is_null())
            .ok_or_else(|| SupplierError::InvalidResponse("response has no data".to_string()))?;
        let prebook: PrebookData = decode_data(data.clone())?;

        Ok(AvailabilityResult {
            available: prebook.has_rates(),
            rate_id: rate_id.to_string(),
            details: Some(data),
        })
    }

    #[instrument(
        skip(self, request),
        fields(partner_order_id = %request.partner_order_id, rate_id = %request.rate_id)
    )]
    async fn create_booking(
        &self,
        request: &BookingRequest,
    ) -> Result<BookingConfirmation, SupplierError> {
        let credentials = self.guard("create_booking")?;
        validation::validate_booking_request(request)?;

        // The first guest doubles as the contact for the order
        let lead = &request.guests[0];
        let body = encode(&BookingFinishRequest {
            partner: PartnerRef {
                partner_order_id: &request.partner_order_id,
            },
            book_hash: &request.rate_id,
            language: &request.language,
            user: BookingUser {
                email: &lead.email,
                phone: &lead.phone,
            },
            rooms: vec![BookingRoom {
                guests: request
                    .guests
                    .iter()
                    .map(|guest| BookingRoomGuest {
                        first_name: &guest.first_name,
                        last_name: &guest.last_name,
                    })
                    .collect(),
            }],
            payment_type: PaymentTypeRef {
                payment_type: &request.payment.payment_type,
            },
        })?;
        let response = self
            .post(credentials, supplier::BOOKING_FINISH_PATH, body)
            .await?;
        let envelope = accepted_envelope(&response)?;
        let status = envelope.status.clone();
        // An accepted order is often finished asynchronously and answered with empty data
        match envelope_data::<OrderData>(envelope)? {
            Some(data) => Ok(data.into_confirmation(&request.partner_order_id)),
            None => Ok(BookingConfirmation {
                partner_order_id: request.partner_order_id.clone(),
                order_id: None,
                status: status.unwrap_or_else(|| "ok".to_string()),
            }),
        }
    }

    #[instrument(skip(self))]
    async fn get_booking(&self, booking_id: &str) -> Result<BookingRecord, SupplierError> {
        let credentials = self.guard("get_booking")?;
        validation::require_non_empty("booking_id", booking_id)?;

        let body = encode(&OrderRequest {
            partner_order_id: booking_id,
        })?;
        let response = self
            .post(credentials, supplier::ORDER_INFO_PATH, body)
            .await?;
        let data: OrderData =
            expect_data(&response).map_err(|e| not_found_as(e, "booking", booking_id))?;

        Ok(data.into_record(booking_id))
    }

    #[instrument(skip(self))]
    async fn cancel_booking(
        &self,
        booking_id: &str,
    ) -> Result<CancellationConfirmation, SupplierError> {
        let credentials = self.guard("cancel_booking")?;
        validation::require_non_empty("booking_id", booking_id)?;

        let body = encode(&OrderRequest {
            partner_order_id: booking_id,
        })?;
        let response = self
            .post(credentials, supplier::ORDER_CANCEL_PATH, body)
            .await?;
        // A successful cancellation may come back with an empty data member
        let data: Option<CancelData> =
            optional_data(&response).map_err(|e| not_found_as(e, "booking", booking_id))?;

        Ok(data
            .unwrap_or(CancelData {
                status: None,
                amount_refunded: None,
            })
            .into_confirmation(booking_id))
    }
}
