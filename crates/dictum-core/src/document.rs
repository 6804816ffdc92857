use crate::{
    error::Error,
    field::{Field, FieldDefault, FieldKind},
    list::List,
    schema::SchemaRef,
    value::{Map, Value},
};
use serde::{Serialize, Serializer};
use std::{
    cell::RefCell,
    collections::BTreeSet,
    fmt,
    rc::{Rc, Weak},
};

pub(crate) type DocLink = Rc<RefCell<DocumentInner>>;
pub(crate) type WeakDocLink = Weak<RefCell<DocumentInner>>;

///
/// DocumentInner
/// Per-instance state behind the shared handle.
///

pub(crate) struct DocumentInner {
    schema: SchemaRef,
    storage: Map,
    modified: BTreeSet<String>,
    is_valid: bool,
    parent: Option<ParentLink>,
}

/// Non-owning upward link: whom to notify, under which field name.
/// Ownership flows strictly downward.
struct ParentLink {
    doc: WeakDocLink,
    field: String,
}

/// Mark `field` modified and the validity stale on `link`, then walk the
/// parent chain marking each ancestor under the name it exposes the
/// child through.
pub(crate) fn touch(link: &DocLink, field: &str) {
    {
        let mut inner = link.borrow_mut();
        inner.modified.insert(field.to_string());
        inner.is_valid = false;
    }

    let mut current = Rc::clone(link);
    loop {
        let next = {
            let inner = current.borrow();
            inner.parent.as_ref().and_then(|parent| {
                parent.doc.upgrade().map(|doc| (doc, parent.field.clone()))
            })
        };
        let Some((doc, field)) = next else {
            break;
        };
        {
            let mut inner = doc.borrow_mut();
            inner.modified.insert(field);
            inner.is_valid = false;
        }
        current = doc;
    }
}

///
/// Document
/// One schema-bound instance. Cheap-to-clone handle; clones share state.
///
/// Single-threaded by design: the instance and its owned subtree expect
/// one logical owner at a time.
///

#[derive(Clone)]
pub struct Document {
    pub(crate) inner: DocLink,
}

impl Document {
    #[must_use]
    pub fn new(schema: &SchemaRef) -> Self {
        Self {
            inner: Rc::new(RefCell::new(DocumentInner {
                schema: Rc::clone(schema),
                storage: Map::new(),
                modified: BTreeSet::new(),
                is_valid: false,
                parent: None,
            })),
        }
    }

    /// Construct from a plain mapping of field names or aliases.
    ///
    /// Unknown keys are ignored. Embedded-document fields cascade:
    /// a mapping becomes a nested instance, an already-typed instance is
    /// adopted. List-of-embedded fields cascade per element, silently
    /// dropping entries that are neither (lenient construction policy).
    /// Construction populates storage without marking anything modified.
    pub fn from_map(schema: &SchemaRef, values: Map) -> Result<Self, Error> {
        let doc = Self::new(schema);
        doc.fill(values)?;
        Ok(doc)
    }

    fn fill(&self, values: Map) -> Result<(), Error> {
        let schema = self.schema();
        let mut seen = BTreeSet::new();

        for (key, value) in values {
            let Some(canonical) = schema.resolve(&key).map(ToString::to_string) else {
                continue;
            };
            if !seen.insert(canonical.clone()) {
                return Err(Error::config(format!(
                    "field '{canonical}' supplied more than once (alias and canonical name)",
                )));
            }
            if value.is_null() {
                continue;
            }
            let Some(field) = schema.field(&canonical) else {
                continue;
            };
            let value = self.cascade(field, value)?;
            self.inner.borrow_mut().storage.insert(canonical, value);
        }

        Ok(())
    }

    /// Construction-time adoption: recursively instantiate embedded
    /// values so the stored subtree is typed and parent-linked.
    fn cascade(&self, field: &Field, value: Value) -> Result<Value, Error> {
        match field.kind() {
            FieldKind::Document(schema) => match value {
                Value::Map(map) => {
                    let child = Self::from_map(schema, map)?;
                    child.set_parent_link(&self.downgrade(), field.name());
                    Ok(Value::Document(child))
                }
                Value::Document(child) => {
                    child.set_parent_link(&self.downgrade(), field.name());
                    Ok(Value::Document(child))
                }
                other => Ok(other),
            },
            FieldKind::List(element) => {
                let Some(items) = value.items() else {
                    return Ok(value);
                };

                let items = if let Some(nested) = element.embedded_schema() {
                    let mut kept = Vec::with_capacity(items.len());
                    for item in items {
                        match item {
                            Value::Map(map) => {
                                kept.push(Value::Document(Self::from_map(nested, map)?));
                            }
                            Value::Document(child) => kept.push(Value::Document(child)),
                            // neither a mapping nor a typed instance: dropped
                            _ => {}
                        }
                    }
                    kept
                } else {
                    items
                };

                let list = List::from_items(items);
                list.attach(self.downgrade(), field.name());
                Ok(Value::List(list))
            }
            _ => Ok(value),
        }
    }

    /// Assignment-time adoption: parent-link embedded instances and
    /// normalize plain sequences into notifying containers. Unlike
    /// construction, mappings are not cascaded; a raw mapping stored
    /// into an embedded field simply fails validation later.
    fn adopt(&self, field: &Field, value: Value) -> Value {
        match field.kind() {
            FieldKind::Document(_) => {
                if let Value::Document(child) = &value {
                    child.set_parent_link(&self.downgrade(), field.name());
                }
                value
            }
            FieldKind::List(_) => match value {
                Value::Seq(items) => {
                    let list = List::from_items(items);
                    list.attach(self.downgrade(), field.name());
                    Value::List(list)
                }
                Value::List(list) => {
                    list.attach(self.downgrade(), field.name());
                    Value::List(list)
                }
                other => other,
            },
            _ => value,
        }
    }

    /// Write a field by canonical name or alias. Marks the field
    /// modified and the validity stale here and on every ancestor.
    /// A `Null` value clears the slot.
    pub fn set(&self, name: &str, value: impl Into<Value>) -> Result<(), Error> {
        let value = value.into();
        let schema = self.schema();
        let Some(canonical) = schema.resolve(name).map(ToString::to_string) else {
            return Err(Error::lookup(format!(
                "no field or alias '{name}' on schema '{}'",
                schema.name()
            )));
        };

        if value.is_null() {
            self.inner.borrow_mut().storage.remove(&canonical);
            touch(&self.inner, &canonical);
            return Ok(());
        }

        let Some(field) = schema.field(&canonical) else {
            return Err(Error::lookup(format!(
                "no field '{canonical}' on schema '{}'",
                schema.name()
            )));
        };
        let value = self.adopt(field, value);
        self.inner
            .borrow_mut()
            .storage
            .insert(canonical.clone(), value);
        touch(&self.inner, &canonical);
        Ok(())
    }

    /// Read a field (by canonical name or alias) or a property.
    ///
    /// A declared field with no stored value materializes its default;
    /// unset list fields materialize a fresh empty container so append
    /// works immediately. Returns None for absent values and unknown
    /// names alike.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Value> {
        let schema = self.schema();
        if let Some(canonical) = schema.resolve(name) {
            let field = schema.field(canonical)?;
            return self.materialize(field);
        }
        schema.property(name).map(|property| property(self))
    }

    /// Default resolution for a declared field. Stores the resolved
    /// value on first read without marking it modified.
    pub(crate) fn materialize(&self, field: &Field) -> Option<Value> {
        if let Some(value) = self.inner.borrow().storage.get(field.name()).cloned() {
            return Some(value);
        }

        let mut resolved = field
            .default()
            .map(FieldDefault::resolve)
            .filter(|value| !value.is_null());

        // container defaults are copied by contents, never shared
        if let Some(Value::List(list)) = &resolved {
            resolved = Some(Value::Seq(list.items()));
        }
        if resolved.is_none() && field.is_list() {
            resolved = Some(Value::Seq(Vec::new()));
        }

        let value = self.adopt(field, resolved?);
        self.inner
            .borrow_mut()
            .storage
            .insert(field.name().to_string(), value.clone());
        Some(value)
    }

    /// Stored value only; never materializes defaults.
    pub(crate) fn stored(&self, name: &str) -> Option<Value> {
        self.inner.borrow().storage.get(name).cloned()
    }

    #[must_use]
    pub fn schema(&self) -> SchemaRef {
        Rc::clone(&self.inner.borrow().schema)
    }

    /// Snapshot of the raw storage mapping.
    #[must_use]
    pub fn raw(&self) -> Map {
        self.inner.borrow().storage.clone()
    }

    /// Field names mutated since construction or the last reset.
    #[must_use]
    pub fn modified_fields(&self) -> BTreeSet<String> {
        self.inner.borrow().modified.clone()
    }

    /// Reset the modified set, typically after persisting.
    pub fn clear_modified(&self) {
        self.inner.borrow_mut().modified.clear();
    }

    pub(crate) fn is_known_valid(&self) -> bool {
        self.inner.borrow().is_valid
    }

    pub(crate) fn mark_valid(&self) {
        self.inner.borrow_mut().is_valid = true;
    }

    pub(crate) fn set_parent_link(&self, doc: &WeakDocLink, field: &str) {
        self.inner.borrow_mut().parent = Some(ParentLink {
            doc: doc.clone(),
            field: field.to_string(),
        });
    }

    pub(crate) fn downgrade(&self) -> WeakDocLink {
        Rc::downgrade(&self.inner)
    }
}

impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        if Rc::ptr_eq(&self.inner, &other.inner) {
            return true;
        }
        self.schema().name() == other.schema().name() && self.raw() == other.raw()
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("schema", &self.schema().name())
            .field("storage", &self.raw())
            .finish()
    }
}

impl Serialize for Document {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.raw().serialize(serializer)
    }
}
