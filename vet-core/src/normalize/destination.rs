use serde_json::Value;
use vet_shared::models::{Destination, Nationality};

use super::{record_id, text, EntityKind, Normalize};

impl Normalize for Destination {
    const KIND: EntityKind = EntityKind::Destination;

    fn normalize(raw: &Value, _position: usize) -> Self {
        let name = text(
            raw,
            &["name", "nameEn", "destinationName", "destination_name", "title", "nameKh"],
        )
        .unwrap_or_default();
        Destination {
            id: record_id(raw, &name),
            name_en: text(raw, &["nameEn", "name_en"]),
            name_cn: text(raw, &["nameCn", "name_cn"]),
            code: text(raw, &["code"]),
            raw: raw.clone(),
            name,
        }
    }

    fn record_id(&self) -> &str {
        &self.id
    }
}

impl Normalize for Nationality {
    const KIND: EntityKind = EntityKind::Nationality;

    fn normalize(raw: &Value, _position: usize) -> Self {
        let name = text(raw, &["name", "nationality", "countryName", "title", "nameEn"])
            .unwrap_or_default();
        Nationality {
            id: record_id(raw, &name),
            code: text(raw, &["code"]),
            raw: raw.clone(),
            name,
        }
    }

    fn record_id(&self) -> &str {
        &self.id
    }
}
