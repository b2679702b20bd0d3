pub mod client;
pub mod envelope;
pub mod error;
pub mod fallback;
pub mod normalize;
pub mod outcome;
pub mod pipeline;
pub mod request;
pub mod session;
pub mod transport;

pub use client::{ApiClient, ApiResponse, RequestState};
pub use envelope::{Payload, ResponseEnvelope, UnwrapRules};
pub use error::{ApiError, ApiResult};
pub use fallback::{try_in_order, FallbackOutcome, FallbackPlan};
pub use normalize::{EntityKind, Normalize};
pub use outcome::{DataSource, Outcome, Sourced};
pub use request::{path_segment, Fields, Method, RequestEnvelope};
pub use session::{SessionError, SessionKey, SessionStorage};
pub use transport::{HttpRequest, HttpResponse, Transport, TransportError};
