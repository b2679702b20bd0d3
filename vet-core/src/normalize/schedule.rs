use serde_json::Value;
use vet_shared::models::{Amenities, BoardingPoint, DropOffPoint, Schedule, UnavailableSeat};

use super::{
    as_list, first_present, flag, normalize_all, opt_i64, opt_number, record_id, text, to_number,
    EntityKind, Normalize,
};

impl Normalize for Schedule {
    const KIND: EntityKind = EntityKind::Schedule;

    fn normalize(raw: &Value, _position: usize) -> Self {
        let origin = text(raw, &["origin"]);
        let destination = text(raw, &["destination"]);
        let description = text(raw, &["description"]);

        let route_info = text(raw, &["description", "routeInfo"]).unwrap_or_else(|| {
            format!(
                "{} to {}",
                origin.as_deref().unwrap_or_default(),
                destination.as_deref().unwrap_or_default()
            )
        });

        let boarding_points = normalize_all::<BoardingPoint>(&as_list(first_present(
            raw,
            &["boardingPointLists", "boardingPointList"],
        )));
        let drop_off_points = normalize_all::<DropOffPoint>(&as_list(first_present(
            raw,
            &["dropOffPointLists", "dropOffPointList"],
        )));
        let unavailable_seats =
            normalize_all::<UnavailableSeat>(&as_list(raw.get("unavailableSeats")));

        let slide_photos = match raw.get("slidePhoto") {
            Some(Value::Array(photos)) => photos.clone(),
            _ => Vec::new(),
        };

        Schedule {
            id: record_id(raw, ""),
            transportation_type: text(raw, &["transportationType"]),
            transportation_photo: text(raw, &["transportationPhoto"]),
            trip_type: opt_i64(raw, "type"),
            vehicle_type: opt_i64(raw, "vehicleType"),
            schedule_type: opt_i64(raw, "scheduleType"),
            status: opt_i64(raw, "status"),

            departure: text(raw, &["departure"]),
            arrival: text(raw, &["arrival"]),
            duration: text(raw, &["duration"]),
            depart_date: text(raw, &["departDate"]),

            seat_available: opt_i64(raw, "seatAvailable"),
            total_seat: opt_i64(raw, "totalSeat"),

            price_original: to_number(raw.get("priceOriginal")),
            price: to_number(raw.get("price")),
            price_foreigner: opt_number(raw, "priceForeigner"),
            discount: opt_number(raw, "discount"),
            dis_percent: text(raw, &["disPercent"]),
            allow_price_period: opt_i64(raw, "allowPricePeriod"),

            route_info,
            transport_route_display: text(raw, &["transportRouteDisplay"]),
            nation_road: text(raw, &["nationRoad"]),
            note: text(raw, &["note"]),

            boarding_point: text(raw, &["boardingPoint"]).or_else(|| origin.clone()),
            boarding_point_id: text(raw, &["boardingPointId"]),
            boarding_point_address: text(raw, &["boardingPointAddress"]),
            boarding_point_lats: text(raw, &["boardingPointLats"]),
            boarding_point_longs: text(raw, &["boardingPointLongs"]),
            boarding_points,

            drop_off_point: text(raw, &["dropOffPoint"]).or_else(|| destination.clone()),
            drop_off_point_id: text(raw, &["dropOffPointId"]),
            drop_off_point_address: text(raw, &["dropOffPointAddress"]),
            drop_off_point_lats: text(raw, &["dropOffPointLats"]),
            drop_off_point_longs: text(raw, &["dropOffPointLongs"]),
            drop_off_points,

            seat_layout: text(raw, &["seatLayout"]),
            unavailable_seats,
            amenities: amenities(raw),
            slide_photos,

            origin,
            destination,
            description,
            raw: raw.clone(),
        }
    }

    fn record_id(&self) -> &str {
        &self.id
    }
}

fn amenities(raw: &Value) -> Amenities {
    Amenities {
        air_con: flag(raw, "airCon"),
        wifi: flag(raw, "wifi"),
        snack: flag(raw, "snack"),
        steward: flag(raw, "steward"),
        wct: flag(raw, "wct"),
    }
}
