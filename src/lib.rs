// Client library for the hotel supplier's B2B booking API

pub mod booking;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod supplier;
pub mod transport;
pub mod validation;

// Re-export key types for convenience
pub use booking::book_checked;
pub use client::{HotelSupplier, SupplierClient};
pub use config::ClientConfiguration;
pub use error::{ClientError, ErrorKind, SupplierError};
pub use models::{
    AvailabilityResult, BookingConfirmation, BookingGuest, BookingRecord, BookingRequest,
    CancellationConfirmation, GuestRoom, HotelDetails, HotelSummary, Payment, PaymentType,
    RateSummary, Region, SearchCriteria,
};
pub use transport::{HttpTransport, Transport, TransportRequest, TransportResponse};
