//! Wires configuration, transport, session storage and every service into
//! one [`App`] for the front end to hold.

pub mod telemetry;
pub mod view;

use anyhow::Context;
use std::sync::Arc;
use tracing::info;
use vet_catalog::{DestinationService, NationalityService, PointService, RouteService, VehicleService};
use vet_core::{ApiClient, SessionStorage};
use vet_offer::{FlashSaleService, ScheduleService, SeatService};
use vet_order::{AuthService, BookingService, ConfirmationService, PaymentService};
use vet_store::{Config, ReqwestTransport, SessionStore};

pub use view::ViewState;

pub struct App {
    pub client: Arc<ApiClient>,
    pub session: Arc<SessionStore>,
    pub destinations: DestinationService,
    pub points: PointService,
    pub nationalities: NationalityService,
    pub routes: RouteService,
    pub vehicles: VehicleService,
    pub flash_sales: FlashSaleService,
    pub schedules: ScheduleService,
    pub seats: SeatService,
    pub bookings: BookingService,
    pub confirmations: ConfirmationService,
    pub payments: PaymentService,
    pub auth: AuthService,
}

impl App {
    /// Load layered configuration, start tracing and build the app
    pub fn load() -> anyhow::Result<Self> {
        let config = Config::load().context("Failed to load config")?;
        if telemetry::init_tracing(&config.logging.filter).is_err() {
            tracing::debug!("Tracing subscriber already installed");
        }
        Self::from_config(&config)
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let transport = ReqwestTransport::with_timeout(config.api.timeout())
            .context("Failed to build HTTP transport")?;
        let client = ApiClient::new(&config.api.base_url, config.api.token.clone(), Arc::new(transport))
            .with_context(|| format!("Invalid api.base_url: {}", config.api.base_url))?;
        let client = Arc::new(client);

        let session = Arc::new(
            SessionStore::from_config(&config.session).context("Failed to open session store")?,
        );
        let storage: Arc<dyn SessionStorage> = session.clone();

        info!(base_url = %config.api.base_url, "API client ready");

        Ok(Self {
            destinations: DestinationService::new(client.clone(), storage.clone()),
            points: PointService::new(client.clone(), storage.clone()),
            nationalities: NationalityService::new(client.clone()),
            routes: RouteService::new(),
            vehicles: VehicleService::new(client.clone()),
            flash_sales: FlashSaleService::new(client.clone()),
            schedules: ScheduleService::new(client.clone(), storage.clone()),
            seats: SeatService::new(client.clone(), storage.clone()),
            bookings: BookingService::new(client.clone()),
            confirmations: ConfirmationService::new(client.clone(), storage.clone()),
            payments: PaymentService::new(client.clone()),
            auth: AuthService::new(client.clone(), storage),
            client,
            session,
        })
    }
}
