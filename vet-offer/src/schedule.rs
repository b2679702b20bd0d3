use std::sync::Arc;
use tokio::sync::RwLock;
use vet_core::pipeline::fetch_records;
use vet_core::{
    ApiClient, Fields, Outcome, RequestEnvelope, SessionError, SessionKey, SessionStorage,
    UnwrapRules,
};
use vet_shared::models::Schedule;

pub const SCHEDULE_ENDPOINT: &str = "/schedule/listByDate";

const SCHEDULE_RULES: UnwrapRules =
    UnwrapRules::DEFAULT.failure_message("Failed to fetch schedules");

/// Filters for a schedule search
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScheduleQuery {
    pub date: String,
    pub destination_from: String,
    pub destination_to: String,
    pub nationally: String,
    pub trip_type: String,
}

impl ScheduleQuery {
    /// Query built from the persisted search filters
    pub fn from_session(session: &dyn SessionStorage) -> Self {
        let get = |key: SessionKey| session.get(key).unwrap_or_default();
        Self {
            date: get(SessionKey::DateFrom),
            destination_from: get(SessionKey::DepartureFromId),
            destination_to: get(SessionKey::DestinationToId),
            nationally: session
                .get_non_empty(SessionKey::Nationally)
                .unwrap_or_else(|| "local".to_string()),
            trip_type: get(SessionKey::Types),
        }
    }

    fn fields(&self) -> Fields {
        Fields::new()
            .with("date", self.date.as_str())
            .with("destinationFrom", self.destination_from.as_str())
            .with("destinationTo", self.destination_to.as_str())
            .with("nationally", self.nationally.as_str())
            .with("type", self.trip_type.as_str())
    }
}

pub struct ScheduleService {
    client: Arc<ApiClient>,
    session: Arc<dyn SessionStorage>,
    schedules: RwLock<Vec<Schedule>>,
}

impl ScheduleService {
    pub fn new(client: Arc<ApiClient>, session: Arc<dyn SessionStorage>) -> Self {
        Self {
            client,
            session,
            schedules: RwLock::new(Vec::new()),
        }
    }

    pub async fn fetch_schedules(&self, query: &ScheduleQuery) -> Outcome<Vec<Schedule>> {
        let request = RequestEnvelope::post(SCHEDULE_ENDPOINT).body(query.fields());
        let outcome = fetch_records(&self.client, &request, &SCHEDULE_RULES).await;
        *self.schedules.write().await = outcome.items().to_vec();
        outcome
    }

    pub async fn schedules(&self) -> Vec<Schedule> {
        self.schedules.read().await.clone()
    }

    pub async fn find_schedule(&self, id: &str) -> Option<Schedule> {
        self.schedules
            .read()
            .await
            .iter()
            .find(|s| s.id == id)
            .cloned()
    }

    /// Remember the chosen journey; seat and boarding-point lookups default to it
    pub fn choose_schedule(&self, schedule_id: &str, date: &str) -> Result<(), SessionError> {
        self.session.set(SessionKey::JourneyId, schedule_id)?;
        self.session.set(SessionKey::DateFrom, date)
    }

    pub async fn clear(&self) {
        self.schedules.write().await.clear();
    }
}
