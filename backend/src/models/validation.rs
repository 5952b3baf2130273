//! Table-driven validation of incoming JSON payloads.
//!
//! Payloads are checked against an entity's [`FieldSpec`] table before they
//! are deserialized, so every violated field is reported at once instead of
//! stopping at the first serde error. Messages follow the
//! `El campo '<field>' <violation>` convention used by all endpoints.

use chrono::{NaiveDate, NaiveTime};
use serde_json::{Map, Value};

use super::{Entity, FieldKind, FieldSpec};

const NOT_BLANK: &str = "no debe estar vacío";
const NOT_NULL: &str = "no debe ser nulo";
const NOT_TEXT: &str = "debe ser un texto";
const BAD_DATE: &str = "debe ser una fecha válida (AAAA-MM-DD)";
const BAD_TIME: &str = "debe ser una hora válida (HH:MM:SS)";
const BAD_REFERENCE: &str = "debe referenciar un id numérico";

/// Reported when the body is valid JSON but not an object.
pub const NOT_AN_OBJECT: &str = "El cuerpo de la petición debe ser un objeto JSON";

fn violation(field: &str, message: impl AsRef<str>) -> String {
    format!("El campo '{field}' {}", message.as_ref())
}

fn parse_date(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text, "%Y-%m-%d").ok()
}

fn parse_time(text: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(text, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(text, "%H:%M"))
        .ok()
}

fn check_field(spec: &FieldSpec, value: Option<&Value>) -> Option<String> {
    let value = value.filter(|v| !v.is_null());

    match spec.kind {
        FieldKind::Text => match value {
            None if spec.required => Some(NOT_BLANK.to_string()),
            None => None,
            Some(Value::String(text)) => match spec.max_len {
                _ if spec.required && text.trim().is_empty() => Some(NOT_BLANK.to_string()),
                Some(max) if text.chars().count() > max => {
                    Some(format!("el tamaño debe estar entre 0 y {max}"))
                }
                _ => None,
            },
            Some(_) => Some(NOT_TEXT.to_string()),
        },
        FieldKind::Date => match value {
            None => Some(NOT_NULL.to_string()),
            Some(Value::String(text)) if parse_date(text).is_some() => None,
            Some(_) => Some(BAD_DATE.to_string()),
        },
        FieldKind::Time => match value {
            None => Some(NOT_NULL.to_string()),
            Some(Value::String(text)) if parse_time(text).is_some() => None,
            Some(_) => Some(BAD_TIME.to_string()),
        },
        FieldKind::Reference { id_key } => match value {
            None => Some(NOT_NULL.to_string()),
            Some(Value::Object(object)) if object.get(id_key).is_some_and(|id| id.is_i64()) => {
                None
            }
            Some(_) => Some(BAD_REFERENCE.to_string()),
        },
    }
}

/// Checks `payload` against `fields`, returning one message per violated field.
pub fn validate_payload(fields: &[FieldSpec], payload: &Value) -> Result<(), Vec<String>> {
    let Some(object) = payload.as_object() else {
        return Err(vec![NOT_AN_OBJECT.to_string()]);
    };

    let errors: Vec<String> = fields
        .iter()
        .filter_map(|spec| {
            check_field(spec, object.get(spec.name)).map(|message| violation(spec.name, message))
        })
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

// Rewrites accepted time shorthands (`HH:MM`) into the canonical form.
fn normalize(fields: &[FieldSpec], object: &mut Map<String, Value>) {
    for spec in fields.iter().filter(|s| s.kind == FieldKind::Time) {
        if let Some(Value::String(text)) = object.get(spec.name) {
            if let Some(time) = parse_time(text) {
                object.insert(
                    spec.name.to_string(),
                    Value::String(time.format("%H:%M:%S").to_string()),
                );
            }
        }
    }
}

/// Validates and deserializes an entity payload.
///
/// Any client-supplied id is discarded; the store always assigns it.
pub fn parse_payload<E: Entity>(payload: Value) -> Result<E, Vec<String>> {
    validate_payload(E::FIELDS, &payload)?;

    let Value::Object(mut object) = payload else {
        return Err(vec![NOT_AN_OBJECT.to_string()]);
    };
    object.remove(E::KIND.id_column());
    normalize(E::FIELDS, &mut object);

    let mut entity: E = serde_json::from_value(Value::Object(object))
        .map_err(|e| vec![format!("El cuerpo de la petición no es válido: {e}")])?;
    entity.set_id(None);
    Ok(entity)
}
