// Input checks applied at the client boundary, before any request is sent
use validator::ValidateEmail;

use crate::error::SupplierError;
use crate::models::{BookingRequest, SearchCriteria};

// The supplier refuses searches for longer stays
pub const MAX_NIGHTS: i64 = 30;
pub const MAX_CHILD_AGE: u8 = 17;

pub fn require_non_empty(field: &str, value: &str) -> Result<(), SupplierError> {
    if value.trim().is_empty() {
        return Err(SupplierError::InvalidRequest(format!("{} must not be empty", field)));
    }
    Ok(())
}

pub fn validate_search_criteria(criteria: &SearchCriteria) -> Result<(), SupplierError> {
    if criteria.checkin >= criteria.checkout {
        return Err(SupplierError::InvalidRequest(format!(
            "checkin {} must be before checkout {}",
            criteria.checkin, criteria.checkout
        )));
    }

    let nights = (criteria.checkout - criteria.checkin).num_days();
    if nights > MAX_NIGHTS {
        return Err(SupplierError::InvalidRequest(format!(
            "stay of {} nights exceeds the maximum of {}",
            nights, MAX_NIGHTS
        )));
    }

    require_non_empty("residency", &criteria.residency)?;
    require_non_empty("language", &criteria.language)?;

    if criteria.guests.is_empty() {
        return Err(SupplierError::InvalidRequest(
            "at least one room of guests is required".to_string(),
        ));
    }

    for (index, room) in criteria.guests.iter().enumerate() {
        if room.adults == 0 {
            return Err(SupplierError::InvalidRequest(format!(
                "room {} has no adults",
                index + 1
            )));
        }
        if let Some(age) = room.children.iter().find(|age| **age > MAX_CHILD_AGE) {
            return Err(SupplierError::InvalidRequest(format!(
                "room {} lists a child aged {}",
                index + 1,
                age
            )));
        }
    }

    let has_region = criteria
        .region_id
        .as_deref()
        .map_or(false, |id| !id.trim().is_empty());
    let has_hotels = criteria.hotel_ids.iter().any(|id| !id.trim().is_empty());
    if !has_region && !has_hotels {
        return Err(SupplierError::InvalidRequest(
            "either region_id or hotel_ids is required".to_string(),
        ));
    }

    Ok(())
}

pub fn validate_booking_request(request: &BookingRequest) -> Result<(), SupplierError> {
    require_non_empty("partner_order_id", &request.partner_order_id)?;
    require_non_empty("rate_id", &request.rate_id)?;

    if request.guests.is_empty() {
        return Err(SupplierError::InvalidRequest(
            "at least one guest is required".to_string(),
        ));
    }

    for (index, guest) in request.guests.iter().enumerate() {
        if guest.first_name.trim().is_empty() || guest.last_name.trim().is_empty() {
            return Err(SupplierError::InvalidRequest(format!(
                "guest {} needs a first and last name",
                index + 1
            )));
        }
        if !guest.email.validate_email() {
            return Err(SupplierError::InvalidRequest(format!(
                "guest {} has an invalid email {:?}",
                index + 1,
                guest.email
            )));
        }
    }

    Ok(())
}
