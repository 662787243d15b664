//! Serde support for scaled values
//!
//! A scaled value travels as its magnitude integer-string. Reading is lenient:
//! strings are magnitudes, JSON numbers are human quantities scaled by the
//! target schema.

use std::fmt;
use std::marker::PhantomData;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::{DecimalSchema, ScaledValue};

impl<U: DecimalSchema> Serialize for ScaledValue<U> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_bigint_string())
    }
}

impl<'de, U: DecimalSchema> Deserialize<'de> for ScaledValue<U> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ScaledValueVisitor(PhantomData))
    }
}

struct ScaledValueVisitor<U>(PhantomData<U>);

impl<'de, U: DecimalSchema> Visitor<'de> for ScaledValueVisitor<U> {
    type Value = ScaledValue<U>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        write!(formatter, "an integer string or a number for schema {}", U::NAME)
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        ScaledValue::from_bigint_string(v).map_err(E::custom)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        ScaledValue::from_decimal_string(&v.to_string()).map_err(E::custom)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        ScaledValue::from_decimal_string(&v.to_string()).map_err(E::custom)
    }

    fn visit_i128<E: de::Error>(self, v: i128) -> Result<Self::Value, E> {
        ScaledValue::from_decimal_string(&v.to_string()).map_err(E::custom)
    }

    fn visit_u128<E: de::Error>(self, v: u128) -> Result<Self::Value, E> {
        ScaledValue::from_decimal_string(&v.to_string()).map_err(E::custom)
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        ScaledValue::from_float(v).map_err(E::custom)
    }
}

/// Big integers as decimal strings, for fields of derived types
pub(crate) mod bigint_string {
    use std::str::FromStr;

    use num_bigint::BigInt;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &BigInt, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<BigInt, D::Error> {
        let text = String::deserialize(deserializer)?;
        BigInt::from_str(&text).map_err(de::Error::custom)
    }
}
