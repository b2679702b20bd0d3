pub mod app_config;
pub mod http;
pub mod session;

pub use app_config::Config;
pub use http::ReqwestTransport;
pub use session::SessionStore;
