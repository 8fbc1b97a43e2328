use schemars::schema::{
    InstanceType, Metadata, ObjectValidation, RootSchema, Schema, SchemaObject,
    SubschemaValidation,
};
use schemars::schema_for;
use serde_json::Value;

use crate::model::Plan;

/// Tags the rule schema spells out; any other tag parses as an unsupported rule.
const KNOWN_RULE_TAGS: &[&str] = &["text", "range", "categorical", "unique_id", "date", "unsupported"];

/// Emit the JSON Schema for plan files.
pub fn plan_json_schema() -> RootSchema {
    let mut root = schema_for!(Plan);
    if let Some(Schema::Object(rule)) = root.definitions.get_mut("ColumnRule") {
        let subschemas = rule.subschemas.get_or_insert_with(Default::default);
        let branches = match (&mut subschemas.one_of, &mut subschemas.any_of) {
            (Some(branches), _) | (None, Some(branches)) => Some(branches),
            _ => None,
        };
        if let Some(branches) = branches {
            branches.push(other_rule_schema());
        }
    }
    root
}

/// Object with a `type` tag outside [`KNOWN_RULE_TAGS`].
fn other_rule_schema() -> Schema {
    let known = SchemaObject {
        enum_values: Some(KNOWN_RULE_TAGS.iter().map(|tag| Value::from(*tag)).collect()),
        ..Default::default()
    };
    let tag = SchemaObject {
        instance_type: Some(InstanceType::String.into()),
        subschemas: Some(Box::new(SubschemaValidation {
            not: Some(Box::new(known.into())),
            ..Default::default()
        })),
        ..Default::default()
    };

    let mut object = ObjectValidation::default();
    object.required.insert("type".to_string());
    object.properties.insert("type".to_string(), tag.into());

    SchemaObject {
        metadata: Some(Box::new(Metadata {
            description: Some("Rule kind not known to this version; renders empty cells.".to_string()),
            ..Default::default()
        })),
        instance_type: Some(InstanceType::Object.into()),
        object: Some(Box::new(object)),
        ..Default::default()
    }
    .into()
}
