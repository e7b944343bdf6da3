//! 产品数据模型

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// 后端返回的产品
///
/// `id` 由后端分配，只有已持久化的产品才有。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: f64,
    pub quantity: i32,
}

impl Product {
    /// 空描述按缺失处理
    pub fn display_description(&self) -> &str {
        match self.description.as_deref() {
            Some(desc) if !desc.is_empty() => desc,
            _ => "N/A",
        }
    }

    /// 两位小数，按二进制精确值舍入，恰好居中时远离零
    pub fn display_price(&self) -> String {
        match Decimal::from_f64_retain(self.price) {
            Some(price) => format!(
                "${:.2}",
                price.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
            ),
            None => format!("${:.2}", self.price),
        }
    }
}

/// POST/PUT 请求体，四个可编辑字段整体替换
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct ProductPayload {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    pub description: String,
    #[validate(range(min = 0.0, message = "price must not be negative"))]
    pub price: f64,
    #[validate(range(min = 0, message = "quantity must not be negative"))]
    pub quantity: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_null_and_missing_description() {
        let p: Product = serde_json::from_str(
            r#"{"id":7,"name":"Widget","description":null,"price":9.5,"quantity":3}"#,
        )
        .unwrap();
        assert_eq!(p.id, Some(7));
        assert_eq!(p.description, None);
        assert_eq!(p.display_description(), "N/A");

        let p: Product =
            serde_json::from_str(r#"{"id":1,"name":"Bolt","price":1,"quantity":0}"#).unwrap();
        assert_eq!(p.description, None);
        assert_eq!(p.price, 1.0);
    }

    #[test]
    fn test_display_helpers() {
        let p = Product {
            id: Some(2),
            name: "Nut".to_string(),
            description: Some(String::new()),
            price: 9.5,
            quantity: 1,
        };
        assert_eq!(p.display_description(), "N/A");
        assert_eq!(p.display_price(), "$9.50");
    }

    #[test]
    fn test_display_price_rounds_ties_up() {
        let mut p = Product {
            id: None,
            name: "Tie".to_string(),
            description: None,
            price: 0.125,
            quantity: 0,
        };
        assert_eq!(p.display_price(), "$0.13");

        p.price = 1.125;
        assert_eq!(p.display_price(), "$1.13");

        // 1.005 的二进制值略小于 1.005
        p.price = 1.005;
        assert_eq!(p.display_price(), "$1.00");

        p.price = 2.375;
        assert_eq!(p.display_price(), "$2.38");

        p.price = 10.0;
        assert_eq!(p.display_price(), "$10.00");
    }

    #[test]
    fn test_payload_never_carries_id() {
        let payload = ProductPayload {
            name: "Widget".to_string(),
            description: String::new(),
            price: 9.5,
            quantity: 3,
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert!(json.get("id").is_none());
        assert_eq!(json["description"], "");
    }

    #[test]
    fn test_payload_constraints() {
        let mut payload = ProductPayload {
            name: "Widget".to_string(),
            description: String::new(),
            price: 0.0,
            quantity: 0,
        };
        assert!(payload.validate().is_ok());

        payload.price = -1.0;
        assert!(payload.validate().is_err());

        payload.price = 1.0;
        payload.name.clear();
        assert!(payload.validate().is_err());
    }
}
