//! Lenient number deserializers for request payloads
//!
//! Form-style clients send numbers as strings (`"19.99"`), so numeric
//! fields accept either a JSON number or a string holding one.

use serde::de::{self, Deserializer, Visitor};
use std::fmt;

struct F64Visitor;

impl<'de> Visitor<'de> for F64Visitor {
    type Value = Option<f64>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a number or a numeric string")
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_some<D: Deserializer<'de>>(self, d: D) -> Result<Self::Value, D::Error> {
        d.deserialize_any(self)
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        Ok(Some(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(Some(v as f64))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(Some(v as f64))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        v.trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|_| E::custom(format!("invalid number: {}", v)))
    }
}

struct I64Visitor;

impl<'de> Visitor<'de> for I64Visitor {
    type Value = Option<i64>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("an integer or an integer string")
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_some<D: Deserializer<'de>>(self, d: D) -> Result<Self::Value, D::Error> {
        d.deserialize_any(self)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(Some(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        i64::try_from(v)
            .map(Some)
            .map_err(|_| E::custom("integer out of range"))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        if v.fract() == 0.0 && v.is_finite() {
            Ok(Some(v as i64))
        } else {
            Err(E::custom(format!("expected an integer, got {}", v)))
        }
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        v.trim()
            .parse::<i64>()
            .map(Some)
            .map_err(|_| E::custom(format!("invalid integer: {}", v)))
    }
}

/// `Option<f64>` from a number, numeric string or null
pub fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_option(F64Visitor)
}

/// `Option<i64>` from an integer, integer string or null
pub fn lenient_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_option(I64Visitor)
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Probe {
        #[serde(default, deserialize_with = "super::lenient_f64")]
        price: Option<f64>,
        #[serde(default, deserialize_with = "super::lenient_i64")]
        quantity: Option<i64>,
    }

    fn probe(json: &str) -> Result<Probe, serde_json::Error> {
        serde_json::from_str(json)
    }

    #[test]
    fn test_accepts_numbers() {
        let p = probe(r#"{"price": 19.5, "quantity": 3}"#).unwrap();
        assert_eq!(p.price, Some(19.5));
        assert_eq!(p.quantity, Some(3));
    }

    #[test]
    fn test_accepts_numeric_strings() {
        let p = probe(r#"{"price": " 4.25 ", "quantity": "7"}"#).unwrap();
        assert_eq!(p.price, Some(4.25));
        assert_eq!(p.quantity, Some(7));
    }

    #[test]
    fn test_missing_and_null_are_none() {
        let p = probe(r#"{"price": null}"#).unwrap();
        assert_eq!(p.price, None);
        assert_eq!(p.quantity, None);
    }

    #[test]
    fn test_whole_float_quantity() {
        let p = probe(r#"{"quantity": 5.0}"#).unwrap();
        assert_eq!(p.quantity, Some(5));
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(probe(r#"{"price": "cheap"}"#).is_err());
        assert!(probe(r#"{"quantity": 2.5}"#).is_err());
        assert!(probe(r#"{"quantity": "many"}"#).is_err());
    }
}
