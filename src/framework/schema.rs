//! Static wire schemas.
//!
//! Each resource declares, once, the ordered list of fields that make up its external
//! representation. A [`FieldDef`] pairs the canonical wire name with a getter, and for
//! writable fields a type check and a setter. Both the delta merge engine and the field
//! selector walk this table instead of inspecting types at request time.
//!
//! ```rust
//! use catalog_api::framework::{FieldDef, WireSchema};
//!
//! #[derive(Debug, Clone, Default)]
//! struct Tag {
//!     id: i32,
//!     label: String,
//! }
//!
//! static TAG_FIELDS: [FieldDef<Tag>; 2] = [
//!     catalog_api::wire_field!(Tag, "id" => id: i32, read_only),
//!     catalog_api::wire_field!(Tag, "label" => label: String),
//! ];
//! static TAG_SCHEMA: WireSchema<Tag> = WireSchema::new(&TAG_FIELDS);
//!
//! assert!(TAG_SCHEMA.resolve("LABEL").is_some());
//! ```

use crate::framework::delta::Delta;
use crate::framework::error::{ApiError, FieldError};
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Value};

/// Conversion between a Rust field type and its JSON wire form.
pub trait WireValue: Sized {
    fn to_wire(&self) -> Value;

    fn from_wire(value: &Value) -> Result<Self, FieldError>;
}

impl WireValue for String {
    fn to_wire(&self) -> Value {
        Value::String(self.clone())
    }

    fn from_wire(value: &Value) -> Result<Self, FieldError> {
        value
            .as_str()
            .map(str::to_owned)
            .ok_or_else(|| FieldError::new("string", value))
    }
}

impl WireValue for i32 {
    fn to_wire(&self) -> Value {
        Value::from(*self)
    }

    fn from_wire(value: &Value) -> Result<Self, FieldError> {
        value
            .as_i64()
            .and_then(|n| i32::try_from(n).ok())
            .ok_or_else(|| FieldError::new("32-bit integer", value))
    }
}

impl WireValue for bool {
    fn to_wire(&self) -> Value {
        Value::Bool(*self)
    }

    fn from_wire(value: &Value) -> Result<Self, FieldError> {
        value.as_bool().ok_or_else(|| FieldError::new("boolean", value))
    }
}

impl WireValue for f64 {
    fn to_wire(&self) -> Value {
        // NaN and infinities have no JSON form.
        serde_json::Number::from_f64(*self).map_or(Value::Null, Value::Number)
    }

    fn from_wire(value: &Value) -> Result<Self, FieldError> {
        value.as_f64().ok_or_else(|| FieldError::new("number", value))
    }
}

impl WireValue for DateTime<Utc> {
    fn to_wire(&self) -> Value {
        Value::String(self.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    fn from_wire(value: &Value) -> Result<Self, FieldError> {
        value
            .as_str()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.with_timezone(&Utc))
            .ok_or_else(|| FieldError::new("RFC 3339 timestamp", value))
    }
}

impl<T: WireValue> WireValue for Option<T> {
    fn to_wire(&self) -> Value {
        self.as_ref().map_or(Value::Null, WireValue::to_wire)
    }

    fn from_wire(value: &Value) -> Result<Self, FieldError> {
        match value {
            Value::Null => Ok(None),
            other => T::from_wire(other).map(Some),
        }
    }
}

/// Type check run while a delta is parsed.
pub type CheckFn = fn(&Value) -> Result<(), FieldError>;
/// Writes an already checked value into a record.
pub type SetFn<T> = fn(&mut T, &Value) -> Result<(), FieldError>;
/// Parses a nested collection into child deltas.
pub type ChildrenFn = fn(&Value) -> Result<Vec<Delta>, ApiError>;

/// How a field participates in writes.
pub enum FieldKind<T: 'static> {
    /// A single value. `set: None` marks the field read-only: accepted in payloads, never merged.
    Scalar { check: CheckFn, set: Option<SetFn<T>> },
    /// A nested child collection, reconciled by natural key rather than merged.
    Children { parse: ChildrenFn },
}

/// One row of a [`WireSchema`].
pub struct FieldDef<T: 'static> {
    pub name: &'static str,
    pub get: fn(&T) -> Value,
    pub kind: FieldKind<T>,
}

impl<T> FieldDef<T> {
    pub fn is_writable(&self) -> bool {
        matches!(self.kind, FieldKind::Scalar { set: Some(_), .. })
    }
}

/// Canonical, ordered wire representation of one resource type.
pub struct WireSchema<T: 'static> {
    fields: &'static [FieldDef<T>],
}

impl<T> WireSchema<T> {
    pub const fn new(fields: &'static [FieldDef<T>]) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &'static [FieldDef<T>] {
        self.fields
    }

    /// Case-insensitive lookup of a client-supplied name.
    pub fn resolve(&self, name: &str) -> Option<&'static FieldDef<T>> {
        let name = name.trim();
        self.fields
            .iter()
            .find(|def| def.name.eq_ignore_ascii_case(name))
    }

    /// Every declared field, in declaration order.
    pub fn to_document(&self, record: &T) -> Map<String, Value> {
        self.fields
            .iter()
            .map(|def| (def.name.to_owned(), (def.get)(record)))
            .collect()
    }
}

/// Declares a scalar [`FieldDef`] for `record.field`.
///
/// Append `, read_only` for fields that are rendered but never written by a delta.
#[macro_export]
macro_rules! wire_field {
    ($record:ty, $name:literal => $field:ident : $ty:ty) => {
        $crate::framework::FieldDef::<$record> {
            name: $name,
            get: |r: &$record| $crate::framework::WireValue::to_wire(&r.$field),
            kind: $crate::framework::FieldKind::Scalar {
                check: |v: &::serde_json::Value| {
                    <$ty as $crate::framework::WireValue>::from_wire(v).map(|_| ())
                },
                set: Some(
                    |r: &mut $record,
                     v: &::serde_json::Value|
                     -> Result<(), $crate::framework::FieldError> {
                        r.$field = <$ty as $crate::framework::WireValue>::from_wire(v)?;
                        Ok(())
                    },
                ),
            },
        }
    };
    ($record:ty, $name:literal => $field:ident : $ty:ty, read_only) => {
        $crate::framework::FieldDef::<$record> {
            name: $name,
            get: |r: &$record| $crate::framework::WireValue::to_wire(&r.$field),
            kind: $crate::framework::FieldKind::Scalar {
                check: |v: &::serde_json::Value| {
                    <$ty as $crate::framework::WireValue>::from_wire(v).map(|_| ())
                },
                set: None,
            },
        }
    };
}
