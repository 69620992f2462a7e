//! Numeric access across the BSON number types.
//!
//! Aggregation output types depend on the operators involved (`$avg` yields a
//! double, `$sum` of literals an int32), so readers go through these helpers.

use mongodb::bson::{Bson, Document};

/// Read any BSON number as `f64`.
pub fn number_as_f64(value: &Bson) -> Option<f64> {
    match value {
        Bson::Double(v) => Some(*v),
        Bson::Int32(v) => Some(f64::from(*v)),
        #[allow(clippy::cast_precision_loss)]
        Bson::Int64(v) => Some(*v as f64),
        _ => None,
    }
}

/// Read a BSON integer, or a double with no fractional part, as `i64`.
pub fn number_as_i64(value: &Bson) -> Option<i64> {
    match value {
        Bson::Int32(v) => Some(i64::from(*v)),
        Bson::Int64(v) => Some(*v),
        #[allow(clippy::cast_possible_truncation)]
        Bson::Double(v) if v.fract() == 0.0 && v.is_finite() => Some(*v as i64),
        _ => None,
    }
}

/// Look up a numeric field as `f64`.
pub fn get_f64(doc: &Document, key: &str) -> Option<f64> {
    doc.get(key).and_then(number_as_f64)
}

/// Look up an integral field as `i64`.
pub fn get_i64(doc: &Document, key: &str) -> Option<i64> {
    doc.get(key).and_then(number_as_i64)
}
