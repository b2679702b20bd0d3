use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Brand image shown for promotions that carry no icon of their own
pub const DEFAULT_PROMOTION_ICON: &str = "/images/vireak-buntham.png";

/// Promotion card shown in the flash-sale carousel
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlashSaleCard {
    pub id: String,
    pub title: String,
    pub period: String,
    pub price: f64,
    pub old_price: f64,
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub raw: Value,
}

impl FlashSaleCard {
    /// Discount relative to the old price, in whole percent
    pub fn discount_percent(&self) -> u32 {
        if self.old_price <= 0.0 || self.price >= self.old_price {
            return 0;
        }
        (((self.old_price - self.price) / self.old_price) * 100.0).round() as u32
    }

    pub fn icon_or_default(&self) -> &str {
        self.icon.as_deref().unwrap_or(DEFAULT_PROMOTION_ICON)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discount_percent() {
        let card = FlashSaleCard {
            price: 9.0,
            old_price: 12.0,
            ..Default::default()
        };
        assert_eq!(card.discount_percent(), 25);

        let no_discount = FlashSaleCard {
            price: 12.0,
            old_price: 12.0,
            ..Default::default()
        };
        assert_eq!(no_discount.discount_percent(), 0);
    }

    #[test]
    fn test_icon_falls_back_to_brand_image() {
        let plain = FlashSaleCard::default();
        assert_eq!(plain.icon_or_default(), DEFAULT_PROMOTION_ICON);

        let branded = FlashSaleCard {
            icon: Some("/img/kampot.png".into()),
            ..Default::default()
        };
        assert_eq!(branded.icon_or_default(), "/img/kampot.png");
    }
}
