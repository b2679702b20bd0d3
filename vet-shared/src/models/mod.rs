pub mod auth;
pub mod booking;
pub mod destination;
pub mod flash_sale;
pub mod points;
pub mod route;
pub mod schedule;
pub mod seat;

pub use auth::{AuthSession, AuthUser, LoginRequest};
pub use booking::{Booking, BookingForm, BookingStatus, ConfirmBookingRequest, JourneyType, PaymentTarget};
pub use destination::{Destination, Nationality, SearchParams};
pub use flash_sale::{FlashSaleCard, DEFAULT_PROMOTION_ICON};
pub use points::{BoardingPoint, DropOffPoint};
pub use route::{Route, RouteCatalog, Vehicle};
pub use schedule::{Amenities, Schedule};
pub use seat::{SeatGender, SeatLayout, UnavailableSeat};
