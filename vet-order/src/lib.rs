pub mod auth;
pub mod booking;
pub mod confirm;
pub mod payment;

pub use auth::{AuthError, AuthService};
pub use booking::BookingService;
pub use confirm::{Confirmation, ConfirmationService, PaymentSummary};
pub use payment::PaymentService;
