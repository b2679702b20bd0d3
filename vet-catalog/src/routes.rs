use vet_core::Sourced;
use vet_shared::models::{Route, RouteCatalog};

/// Popular routes shown on the home page.
///
/// There is no routes endpoint yet, so the catalog is always served from the
/// built-in list and marked as degraded.
#[derive(Debug, Default)]
pub struct RouteService;

impl RouteService {
    pub fn new() -> Self {
        Self
    }

    pub fn fetch_routes(&self) -> Sourced<RouteCatalog> {
        Sourced::fallback(builtin_routes(), "no routes endpoint configured")
    }
}

const LOCAL_ROUTES: &[(&str, &str)] = &[
    ("Phnom Penh - Siem Reap", "phnom-penh-siem-reap"),
    ("Phnom Penh - Rattanakiri", "phnom-penh-rattanakiri"),
    ("Phnom Penh - Kampot", "phnom-penh-kampot"),
    ("Phnom Penh - Shianouk Ville", "phnom-penh-shianouk-ville"),
    ("Phnom Penh - Mondulkiri", "phnom-penh-mondulkiri"),
    ("Phnom Penh - Koh Kong", "phnom-penh-koh-kong"),
    ("Phnom Penh - Poi Pet", "phnom-penh-poi-pet"),
    ("Phnom Penh - Stueng Treng", "phnom-penh-stueng-treng"),
    ("Phnom Penh - Battambang", "phnom-penh-battambang"),
    ("Phnom Penh - Kampong Cham", "phnom-penh-kampong-cham"),
    ("Phnom Penh - Koh Sdach", "phnom-penh-koh-sdach"),
];

const INTERNATIONAL_ROUTES: &[(&str, &str)] = &[
    ("Phnom Penh - Bangkok", "phnom-penh-bangkok"),
    ("Poi Pet - Bangkok", "poi-pet-bangkok"),
    ("Svay Rieng - Ho Chi Minh", "svay-rieng-ho-chi-minh"),
    ("Siem Reap - Vientiane (Laos)", "siem-reap-vientiane"),
    ("Phnom Penh - Nakasang", "phnom-penh-nakasang"),
    ("Siem Reap - Don Det (4000 island)", "siem-reap-don-det"),
    ("Phnom Penh - Pakse (Laos)", "phnom-penh-pakse"),
    ("Battambang - Bangkok", "battambang-bangkok"),
    ("Bavet - Ho Chi Minh", "bavet-ho-chi-minh"),
    ("Siem Reap - Bangkok", "siem-reap-bangkok"),
    ("Phnom Penh - Trat", "phnom-penh-trat"),
    ("Phnom Penh - Ho Chi Minh", "phnom-penh-ho-chi-minh"),
];

fn numbered(routes: &[(&str, &str)]) -> Vec<Route> {
    routes
        .iter()
        .zip(1u32..)
        .map(|((name, slug), id)| Route::new(id, name, slug))
        .collect()
}

pub fn builtin_routes() -> RouteCatalog {
    RouteCatalog {
        local_routes: numbered(LOCAL_ROUTES),
        international_routes: numbered(INTERNATIONAL_ROUTES),
    }
}
