pub mod destinations;
pub mod nationality;
pub mod points;
pub mod routes;
pub mod vehicles;

pub use destinations::DestinationService;
pub use nationality::NationalityService;
pub use points::{PointService, DROP_OFF_NOT_FOUND};
pub use routes::RouteService;
pub use vehicles::VehicleService;
