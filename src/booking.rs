// Check-then-book sequencing on top of any HotelSupplier
use tracing::{info, instrument, warn};

use crate::client::HotelSupplier;
use crate::error::SupplierError;
use crate::models::{BookingConfirmation, BookingRequest};

pub const RATE_UNAVAILABLE_MESSAGE: &str = "rate no longer available, please search again";

/// Re-checks the rate and books it only if the supplier still offers it.
///
/// Makes at most one booking attempt. A stale rate is reported as
/// [`SupplierError::SupplierRejected`] without calling `create_booking`.
#[instrument(
    skip(supplier, request),
    fields(partner_order_id = %request.partner_order_id, rate_id = %request.rate_id)
)]
pub async fn book_checked(
    supplier: &dyn HotelSupplier,
    request: &BookingRequest,
) -> Result<BookingConfirmation, SupplierError> {
    let availability = supplier.check_availability(&request.rate_id).await?;
    if !availability.available {
        warn!("rate went stale before booking");
        return Err(SupplierError::rejected(None, RATE_UNAVAILABLE_MESSAGE));
    }

    let confirmation = supplier.create_booking(request).await?;
    info!(status = %confirmation.status, "booking created");
    Ok(confirmation)
}
