//! 金额字段反序列化: 同时接受 JSON 数字和数字字符串

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, de::Error};
use std::str::FromStr;

fn parse_value<E: Error>(value: serde_json::Value) -> Result<Decimal, E> {
    let text = match value {
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::String(s) => s.trim().to_string(),
        other => {
            return Err(E::custom(format!(
                "expected a number or numeric string, got {other}"
            )));
        }
    };
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .map_err(|_| E::custom(format!("invalid amount '{text}'")))
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    parse_value(serde_json::Value::deserialize(deserializer)?)
}

pub fn deserialize_option<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<serde_json::Value>::deserialize(deserializer)? {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(value) => parse_value(value).map(Some),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Amounts {
        #[serde(deserialize_with = "deserialize")]
        price: Decimal,
        #[serde(default, deserialize_with = "deserialize_option")]
        fee: Option<Decimal>,
    }

    #[test]
    fn test_accepts_numbers_and_strings() {
        let a: Amounts = serde_json::from_str(r#"{"price": 12.99, "fee": "2.45"}"#).unwrap();
        assert_eq!(a.price, Decimal::new(1299, 2));
        assert_eq!(a.fee, Some(Decimal::new(245, 2)));

        let b: Amounts = serde_json::from_str(r#"{"price": "35"}"#).unwrap();
        assert_eq!(b.price, Decimal::new(35, 0));
        assert_eq!(b.fee, None);
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(serde_json::from_str::<Amounts>(r#"{"price": "abc"}"#).is_err());
        assert!(serde_json::from_str::<Amounts>(r#"{"price": true}"#).is_err());
    }
}
