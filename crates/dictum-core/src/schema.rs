use crate::{
    document::Document,
    error::Error,
    field::{Field, FieldDef},
    filter::Filter,
    value::Value,
};
use std::{
    collections::{BTreeMap, BTreeSet},
    fmt,
    rc::Rc,
};

///
/// SchemaRef
/// Schemas are built once per model and shared immutably.
///

pub type SchemaRef = Rc<Schema>;

///
/// Property
/// Computed read-only attribute, addressable from visibility lists.
///

pub type Property = Rc<dyn Fn(&Document) -> Value>;

///
/// Schema
/// Field registry, alias table, and per-model serialization
/// configuration for one document type.
///

pub struct Schema {
    name: &'static str,
    fields: BTreeMap<String, Field>,
    aliases: BTreeMap<String, String>,
    properties: BTreeMap<String, Property>,
    public_fields: Vec<String>,
    owner_fields: Vec<String>,
    pre_save: Vec<Filter>,
    pre_public: Vec<Filter>,
    pre_owner: Vec<Filter>,
}

impl Schema {
    /// Start a builder for a new model type.
    #[must_use]
    pub fn build(name: &'static str) -> SchemaBuilder {
        SchemaBuilder::new(name)
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.get(name)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&String, &Field)> {
        self.fields.iter()
    }

    #[must_use]
    pub fn field_names(&self) -> Vec<String> {
        self.fields.keys().cloned().collect()
    }

    /// Canonical name for a field name or a declared alias.
    #[must_use]
    pub fn resolve<'a>(&'a self, key: &'a str) -> Option<&'a str> {
        if self.fields.contains_key(key) {
            return Some(key);
        }
        self.aliases.get(key).map(String::as_str)
    }

    /// True when `key` resolves through the alias table rather than
    /// naming a field directly.
    #[must_use]
    pub fn is_alias(&self, key: &str) -> bool {
        self.aliases.contains_key(key)
    }

    #[must_use]
    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.get(name)
    }

    #[must_use]
    pub fn public_fields(&self) -> &[String] {
        &self.public_fields
    }

    #[must_use]
    pub fn owner_fields(&self) -> &[String] {
        &self.owner_fields
    }

    #[must_use]
    pub fn pre_save_filters(&self) -> &[Filter] {
        &self.pre_save
    }

    #[must_use]
    pub fn pre_public_filters(&self) -> &[Filter] {
        &self.pre_public
    }

    #[must_use]
    pub fn pre_owner_filters(&self) -> &[Filter] {
        &self.pre_owner
    }
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("name", &self.name)
            .field("fields", &self.fields.keys().collect::<Vec<_>>())
            .field("aliases", &self.aliases)
            .finish_non_exhaustive()
    }
}

///
/// SchemaBuilder
/// Explicit model-definition-time registration. `finish` performs the
/// configuration checks; the first error wins and is returned there.
///

pub struct SchemaBuilder {
    name: &'static str,
    fields: BTreeMap<String, Field>,
    declared: BTreeSet<String>,
    properties: BTreeMap<String, Property>,
    public_fields: Vec<String>,
    owner_fields: Vec<String>,
    pre_save: Vec<Filter>,
    pre_public: Vec<Filter>,
    pre_owner: Vec<Filter>,
    error: Option<Error>,
}

impl SchemaBuilder {
    fn new(name: &'static str) -> Self {
        Self {
            name,
            fields: BTreeMap::new(),
            declared: BTreeSet::new(),
            properties: BTreeMap::new(),
            public_fields: Vec::new(),
            owner_fields: Vec::new(),
            pre_save: Vec::new(),
            pre_public: Vec::new(),
            pre_owner: Vec::new(),
            error: None,
        }
    }

    fn fail(&mut self, err: Error) {
        if self.error.is_none() {
            self.error = Some(err);
        }
    }

    /// Inherit a parent model: parent fields, properties, field lists,
    /// and filter chains come first; same-named fields declared on this
    /// builder afterwards override the parent's.
    #[must_use]
    pub fn extend(mut self, parent: &SchemaRef) -> Self {
        for (name, field) in &parent.fields {
            self.fields.insert(name.clone(), field.clone());
        }
        for (name, property) in &parent.properties {
            self.properties
                .insert(name.clone(), Rc::clone(property));
        }
        if self.public_fields.is_empty() {
            self.public_fields = parent.public_fields.clone();
        }
        if self.owner_fields.is_empty() {
            self.owner_fields = parent.owner_fields.clone();
        }
        self.pre_save.extend(parent.pre_save.iter().map(Rc::clone));
        self.pre_public
            .extend(parent.pre_public.iter().map(Rc::clone));
        self.pre_owner
            .extend(parent.pre_owner.iter().map(Rc::clone));
        self
    }

    /// Register a field under its canonical name. The name is assigned
    /// here, once; redeclaring a name within one builder is an error,
    /// overriding an inherited one is not.
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, def: FieldDef) -> Self {
        let name = name.into();
        if !self.declared.insert(name.clone()) {
            self.fail(Error::config(format!(
                "field '{name}' declared twice on schema '{}'",
                self.name
            )));
            return self;
        }
        self.fields.insert(name.clone(), Field::named(name, def));
        self
    }

    /// Register a computed read-only property.
    #[must_use]
    pub fn property(
        mut self,
        name: impl Into<String>,
        f: impl Fn(&Document) -> Value + 'static,
    ) -> Self {
        self.properties.insert(name.into(), Rc::new(f));
        self
    }

    #[must_use]
    pub fn public_fields<I>(mut self, names: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.public_fields = names.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn owner_fields<I>(mut self, names: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.owner_fields = names.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn pre_save_filter(mut self, filter: Filter) -> Self {
        self.pre_save.push(filter);
        self
    }

    #[must_use]
    pub fn pre_public_filter(mut self, filter: Filter) -> Self {
        self.pre_public.push(filter);
        self
    }

    #[must_use]
    pub fn pre_owner_filter(mut self, filter: Filter) -> Self {
        self.pre_owner.push(filter);
        self
    }

    /// Validate the configuration and freeze the schema.
    ///
    /// Alias strings must be unique across the whole inheritance chain
    /// and must not shadow a field or property name.
    pub fn finish(self) -> Result<SchemaRef, Error> {
        if let Some(err) = self.error {
            return Err(err);
        }

        let mut aliases = BTreeMap::new();
        for (name, field) in &self.fields {
            if self.properties.contains_key(name) {
                return Err(Error::config(format!(
                    "'{name}' is declared both as a field and a property on schema '{}'",
                    self.name
                )));
            }
            for alias in field.aliases() {
                if self.fields.contains_key(alias) {
                    return Err(Error::config(format!(
                        "alias '{alias}' shadows a field name on schema '{}'",
                        self.name
                    )));
                }
                if aliases.insert(alias.clone(), name.clone()).is_some() {
                    return Err(Error::config(format!(
                        "alias '{alias}' registered twice on schema '{}'",
                        self.name
                    )));
                }
            }
        }

        Ok(Rc::new(Schema {
            name: self.name,
            fields: self.fields,
            aliases,
            properties: self.properties,
            public_fields: self.public_fields,
            owner_fields: self.owner_fields,
            pre_save: self.pre_save,
            pre_public: self.pre_public,
            pre_owner: self.pre_owner,
        }))
    }
}
