use super::{RecordImportError, ID_KEYS};
use crate::ranking::Entity;
use serde_json::{Map, Value};
use std::io::Read;

pub(crate) fn parse_json<R: Read>(reader: R) -> Result<Vec<Entity>, RecordImportError> {
    let document: Value = serde_json::from_reader(reader)?;
    let rows = match document {
        Value::Array(rows) => rows,
        Value::Object(mut object) => match object.remove("results") {
            Some(Value::Array(rows)) => rows,
            _ => {
                return Err(RecordImportError::UnexpectedShape(
                    "object payload missing list field 'results'".to_string(),
                ))
            }
        },
        _ => {
            return Err(RecordImportError::UnexpectedShape(
                "expected an array of records or an object with 'results'".to_string(),
            ))
        }
    };

    rows.into_iter()
        .enumerate()
        .map(|(row, value)| match value {
            Value::Object(object) if object.get("metrics").is_some_and(Value::is_object) => {
                Ok(serde_json::from_value(Value::Object(object))?)
            }
            Value::Object(object) => entity_from_flat_row(row + 1, object),
            _ => Err(RecordImportError::UnexpectedShape(format!(
                "record {} is not an object",
                row + 1
            ))),
        })
        .collect()
}

fn entity_from_flat_row(
    row: usize,
    object: Map<String, Value>,
) -> Result<Entity, RecordImportError> {
    let id = ID_KEYS
        .iter()
        .find_map(|key| object.get(*key).and_then(scalar_text))
        .ok_or(RecordImportError::MissingId { row })?;

    let mut entity = Entity::new(id);
    for (key, value) in object {
        let is_id_key = ID_KEYS.contains(&key.as_str());
        match value {
            Value::Number(number) if !is_id_key => {
                if let Some(metric) = number.as_f64() {
                    entity.metrics.insert(key, metric);
                }
            }
            Value::Number(number) => {
                entity.display_fields.insert(key, number.to_string());
            }
            Value::String(text) => {
                entity.display_fields.insert(key, text);
            }
            _ => {}
        }
    }

    Ok(entity)
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) if !text.trim().is_empty() => Some(text.trim().to_string()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

pub(crate) fn parse_csv<R: Read>(reader: R) -> Result<Vec<Entity>, RecordImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers = csv_reader.headers()?.clone();
    let id_column = ID_KEYS
        .iter()
        .find_map(|key| headers.iter().position(|header| header == *key));

    let mut entities = Vec::new();
    for (idx, record) in csv_reader.records().enumerate() {
        let record = record?;
        let row = idx + 1;
        let id = id_column
            .and_then(|column| record.get(column))
            .filter(|value| !value.is_empty())
            .ok_or(RecordImportError::MissingId { row })?;

        let mut entity = Entity::new(id);
        for (header, cell) in headers.iter().zip(record.iter()) {
            if cell.is_empty() {
                continue;
            }
            let is_id_key = ID_KEYS.contains(&header);
            match cell.parse::<f64>() {
                Ok(metric) if !is_id_key && metric.is_finite() => {
                    entity.metrics.insert(header.to_string(), metric);
                }
                _ => {
                    entity
                        .display_fields
                        .insert(header.to_string(), cell.to_string());
                }
            }
        }
        entities.push(entity);
    }

    Ok(entities)
}
