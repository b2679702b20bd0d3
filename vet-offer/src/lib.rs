pub mod flash_sale;
pub mod schedule;
pub mod seat;
pub mod time;

pub use flash_sale::FlashSaleService;
pub use schedule::{ScheduleQuery, ScheduleService};
pub use seat::SeatService;
