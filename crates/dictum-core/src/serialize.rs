//! Serialization engine: visibility-scoped dictionary builders.
//!
//! Every node in the model tree renders through one closed capability,
//! dispatching over document / embedded list / scalar rather than any
//! dynamic method lookup. Builders escalate a failed validation into an
//! error; handing back a partial mapping silently would be unsafe.

use crate::{
    document::Document,
    error::Error,
    filter,
    value::{Map, Value},
};

///
/// Visibility
/// Named projection selecting which fields a mapping may contain.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Visibility {
    Save,
    Public,
    Owner,
}

impl Document {
    /// Full persisted representation: every field with a present value,
    /// recursively expanded. Requires strict validity.
    pub fn dict_for_save(&self, json_compliant: bool) -> Result<Map, Error> {
        if !self.validate() {
            return Err(Error::validation(format!(
                "document '{}' failed validation",
                self.schema().name()
            )));
        }

        let schema = self.schema();
        let mut out = Map::new();
        for name in schema.field_names() {
            // validate() has already materialized defaults
            let Some(value) = self.stored(&name) else {
                continue;
            };
            out.insert(name, render_value(&value, Visibility::Save, json_compliant)?);
        }

        Ok(filter::apply(schema.pre_save_filters(), out))
    }

    /// Projection over the model's configured public field list.
    pub fn dict_for_public(&self, json_compliant: bool) -> Result<Map, Error> {
        let names = self.schema().public_fields().to_vec();
        self.dict_for_fields(Visibility::Public, &names, json_compliant)
    }

    /// Projection over the model's configured owner field list.
    pub fn dict_for_owner(&self, json_compliant: bool) -> Result<Map, Error> {
        let names = self.schema().owner_fields().to_vec();
        self.dict_for_fields(Visibility::Owner, &names, json_compliant)
    }

    /// Projection over an arbitrary list of field and property names.
    ///
    /// An empty list yields an empty mapping. Present declared fields
    /// recurse under the same visibility; property names are read
    /// directly; anything else is a lookup error. Absent fields are
    /// omitted, never defaulted to null. Applies the visibility's
    /// filter chain last.
    pub fn dict_for_fields<I>(
        &self,
        visibility: Visibility,
        names: I,
        json_compliant: bool,
    ) -> Result<Map, Error>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let names: Vec<String> = names
            .into_iter()
            .map(|name| name.as_ref().to_string())
            .collect();
        if names.is_empty() {
            return Ok(Map::new());
        }

        let schema = self.schema();
        if !self.is_known_valid()
            && !self.check_fields(names.iter().map(String::as_str), true)?
        {
            return Err(Error::validation(format!(
                "document '{}' failed validation for the requested fields",
                schema.name()
            )));
        }

        let mut out = Map::new();
        for name in &names {
            if schema.field(name).is_some() {
                if let Some(value) = self.stored(name) {
                    out.insert(
                        name.clone(),
                        render_value(&value, visibility, json_compliant)?,
                    );
                }
            } else if let Some(property) = schema.property(name) {
                let value = property(self);
                if !value.is_null() {
                    out.insert(name.clone(), render_scalar(&value, json_compliant));
                }
            } else {
                return Err(Error::lookup(format!(
                    "'{name}' is neither a field nor a property on schema '{}'",
                    schema.name()
                )));
            }
        }

        let filters = match visibility {
            Visibility::Save => schema.pre_save_filters(),
            Visibility::Public => schema.pre_public_filters(),
            Visibility::Owner => schema.pre_owner_filters(),
        };
        Ok(filter::apply(filters, out))
    }

    /// Render this node under a visibility; the closed recursion point
    /// used for embedded documents.
    pub fn render(&self, visibility: Visibility, json_compliant: bool) -> Result<Map, Error> {
        match visibility {
            Visibility::Save => self.dict_for_save(json_compliant),
            Visibility::Public => self.dict_for_public(json_compliant),
            Visibility::Owner => self.dict_for_owner(json_compliant),
        }
    }

    /// Current values of exactly the modified names, optionally after a
    /// partial validation pass.
    pub fn dict_for_modified_fields(&self, validate: bool) -> Result<Map, Error> {
        if validate && !self.validate_partial() {
            return Err(Error::validation(format!(
                "document '{}' failed partial validation",
                self.schema().name()
            )));
        }

        let mut out = Map::new();
        for name in self.modified_fields() {
            if let Some(value) = self.stored(&name) {
                out.insert(name, value);
            }
        }
        Ok(out)
    }
}

/// Tag dispatch: document, embedded list, or scalar.
fn render_value(value: &Value, visibility: Visibility, json_compliant: bool) -> Result<Value, Error> {
    match value {
        Value::Document(doc) => Ok(Value::Map(doc.render(visibility, json_compliant)?)),
        Value::List(list) => render_items(&list.items(), visibility, json_compliant),
        Value::Seq(items) => render_items(items, visibility, json_compliant),
        scalar => Ok(render_scalar(scalar, json_compliant)),
    }
}

fn render_items(
    items: &[Value],
    visibility: Visibility,
    json_compliant: bool,
) -> Result<Value, Error> {
    let rendered = items
        .iter()
        .map(|item| render_value(item, visibility, json_compliant))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Value::Seq(rendered))
}

fn render_scalar(value: &Value, json_compliant: bool) -> Value {
    if !json_compliant {
        return value.clone();
    }
    match value {
        Value::Timestamp(ts) => Value::Text(ts.to_rfc3339()),
        Value::Id(id) => Value::Text(id.to_string()),
        Value::Map(map) => Value::Map(
            map.iter()
                .map(|(k, v)| (k.clone(), render_scalar(v, true)))
                .collect(),
        ),
        other => other.clone(),
    }
}
