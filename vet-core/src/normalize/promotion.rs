use serde_json::Value;
use vet_shared::models::FlashSaleCard;

use super::{first_present, text, to_number, EntityKind, Normalize};

const DEFAULT_TITLE: &str = "Promotion";
const NO_PERIOD: &str = "-";

impl Normalize for FlashSaleCard {
    const KIND: EntityKind = EntityKind::FlashSale;

    /// Promotions without a numeric id are numbered by position, from 1.
    fn normalize(raw: &Value, position: usize) -> Self {
        let price = to_number(first_present(
            raw,
            &["promotionPrice", "promotionPriceForeigner", "newPrice", "discountPrice", "price"],
        ));
        let old_price = to_number(first_present(
            raw,
            &["oldPrice", "originalPrice", "price", "priceForeigner"],
        ));

        let id = match to_number(raw.get("id")) {
            n if n != 0.0 => format_number(n),
            _ => (position + 1).to_string(),
        };

        FlashSaleCard {
            id,
            title: text(raw, &["description", "title", "name", "promotionTitle", "routeName"])
                .unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            period: period(raw),
            price,
            old_price: if old_price > 0.0 { old_price } else { price },
            icon: text(raw, &["icon", "image", "logo"]),
            raw: raw.clone(),
        }
    }

    fn record_id(&self) -> &str {
        &self.id
    }
}

fn period(raw: &Value) -> String {
    if let Some(period) = text(raw, &["applyPeriod", "period"]) {
        return period;
    }
    let from = text(raw, &["startDate", "fromDate"]);
    let to = text(raw, &["endDate", "toDate"]);
    match (from, to) {
        (Some(from), Some(to)) => format!("{} - {}", from, to),
        (Some(only), None) | (None, Some(only)) => only,
        (None, None) => NO_PERIOD.to_string(),
    }
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
        (n as i64).to_string()
    } else {
        n.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_string_price_is_coerced() {
        let card = FlashSaleCard::normalize(&json!({"id": 5, "price": "12"}), 0);
        assert_eq!(card.id, "5");
        assert_eq!(card.price, 12.0);
        assert_eq!(card.old_price, 12.0);
        assert_eq!(card.title, "Promotion");
        assert_eq!(card.period, "-");
        assert_eq!(card.icon, None);
    }

    #[test]
    fn test_promotion_price_beats_price() {
        let raw = json!({
            "id": "7",
            "promotionPrice": 9,
            "price": 12,
            "routeName": "Phnom Penh - Kampot",
            "fromDate": "2026-04-10",
            "toDate": "2026-04-16",
            "image": "/img/kampot.png"
        });
        let card = FlashSaleCard::normalize(&raw, 0);
        assert_eq!(card.id, "7");
        assert_eq!(card.price, 9.0);
        assert_eq!(card.old_price, 12.0);
        assert_eq!(card.title, "Phnom Penh - Kampot");
        assert_eq!(card.period, "2026-04-10 - 2026-04-16");
        assert_eq!(card.icon.as_deref(), Some("/img/kampot.png"));
        assert_eq!(card.discount_percent(), 25);
    }

    #[test]
    fn test_present_but_invalid_price_is_zero() {
        // A present key wins even when it does not parse
        let card = FlashSaleCard::normalize(&json!({"promotionPrice": "n/a", "price": 10}), 2);
        assert_eq!(card.price, 0.0);
        assert_eq!(card.old_price, 10.0);
        assert_eq!(card.id, "3");
    }

    #[test]
    fn test_period_prefers_apply_period() {
        let raw = json!({"applyPeriod": "Weekends only", "startDate": "2026-01-01"});
        assert_eq!(FlashSaleCard::normalize(&raw, 0).period, "Weekends only");
        let open_ended = json!({"startDate": "2026-01-01"});
        assert_eq!(FlashSaleCard::normalize(&open_ended, 0).period, "2026-01-01");
    }
}
