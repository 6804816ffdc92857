use crate::{schema::SchemaRef, value::Value};
use std::{fmt, net::IpAddr, rc::Rc};

///
/// Pattern
/// Named syntax predicate injected into text-kinded fields.
///

#[derive(Clone, Copy, Debug)]
pub struct Pattern {
    pub name: &'static str,
    pub check: fn(&str) -> bool,
}

impl Pattern {
    #[must_use]
    pub const fn new(name: &'static str, check: fn(&str) -> bool) -> Self {
        Self { name, check }
    }
}

///
/// FieldKind
/// Closed type surface for declared fields.
///

#[derive(Clone, Debug)]
pub enum FieldKind {
    Bool,
    Int,
    Float,
    Text,
    Ip,
    Timestamp,
    Id,
    List(Box<Field>),
    Document(SchemaRef),
}

///
/// FieldDefault
///

#[derive(Clone)]
pub enum FieldDefault {
    Value(Value),
    Factory(Rc<dyn Fn() -> Value>),
}

impl FieldDefault {
    #[must_use]
    pub fn resolve(&self) -> Value {
        match self {
            Self::Value(value) => value.clone(),
            Self::Factory(factory) => factory(),
        }
    }
}

impl fmt::Debug for FieldDefault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Self::Factory(_) => f.write_str("Factory(..)"),
        }
    }
}

///
/// FieldDef
/// Unnamed field configuration under construction.
///
/// Becomes an immutable `Field` when registered on a schema builder,
/// which assigns the canonical name exactly once.
///

#[derive(Clone, Debug)]
pub struct FieldDef {
    kind: FieldKind,
    required: bool,
    default: Option<FieldDefault>,
    choices: Option<Vec<Value>>,
    aliases: Vec<String>,
    min_length: Option<usize>,
    max_length: Option<usize>,
    pattern: Option<Pattern>,
}

impl FieldDef {
    #[must_use]
    pub const fn new(kind: FieldKind) -> Self {
        Self {
            kind,
            required: false,
            default: None,
            choices: None,
            aliases: Vec::new(),
            min_length: None,
            max_length: None,
            pattern: None,
        }
    }

    /// A list field wrapping an element field.
    #[must_use]
    pub fn list(element: Self) -> Self {
        Self::new(FieldKind::List(Box::new(Field::anonymous(element))))
    }

    /// An embedded-document field bound to a nested schema.
    #[must_use]
    pub fn embedded(schema: &SchemaRef) -> Self {
        Self::new(FieldKind::Document(Rc::clone(schema)))
    }

    #[must_use]
    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    #[must_use]
    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(FieldDefault::Value(value.into()));
        self
    }

    #[must_use]
    pub fn default_with(mut self, factory: impl Fn() -> Value + 'static) -> Self {
        self.default = Some(FieldDefault::Factory(Rc::new(factory)));
        self
    }

    #[must_use]
    pub fn choices<I, T>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        self.choices = Some(values.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn alias(mut self, name: impl Into<String>) -> Self {
        self.aliases.push(name.into());
        self
    }

    /// Minimum length: characters for text kinds, elements for lists.
    #[must_use]
    pub const fn min_length(mut self, n: usize) -> Self {
        self.min_length = Some(n);
        self
    }

    /// Maximum length: characters for text kinds, elements for lists.
    #[must_use]
    pub const fn max_length(mut self, n: usize) -> Self {
        self.max_length = Some(n);
        self
    }

    #[must_use]
    pub const fn pattern(mut self, pattern: Pattern) -> Self {
        self.pattern = Some(pattern);
        self
    }
}

///
/// Field
/// Shared, immutable configuration for one named slot.
///
/// Fields never hold per-instance data; storage lives on the document.
///

#[derive(Clone, Debug)]
pub struct Field {
    name: String,
    kind: FieldKind,
    required: bool,
    default: Option<FieldDefault>,
    choices: Option<Vec<Value>>,
    aliases: Vec<String>,
    min_length: Option<usize>,
    max_length: Option<usize>,
    pattern: Option<Pattern>,
}

impl Field {
    pub(crate) fn named(name: impl Into<String>, def: FieldDef) -> Self {
        Self {
            name: name.into(),
            kind: def.kind,
            required: def.required,
            default: def.default,
            choices: def.choices,
            aliases: def.aliases,
            min_length: def.min_length,
            max_length: def.max_length,
            pattern: def.pattern,
        }
    }

    /// Element fields inside a list have no canonical name of their own.
    fn anonymous(def: FieldDef) -> Self {
        Self::named("", def)
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn kind(&self) -> &FieldKind {
        &self.kind
    }

    #[must_use]
    pub const fn required(&self) -> bool {
        self.required
    }

    #[must_use]
    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    #[must_use]
    pub const fn choices(&self) -> Option<&Vec<Value>> {
        self.choices.as_ref()
    }

    #[must_use]
    pub const fn default(&self) -> Option<&FieldDefault> {
        self.default.as_ref()
    }

    #[must_use]
    pub const fn is_list(&self) -> bool {
        matches!(self.kind, FieldKind::List(_))
    }

    #[must_use]
    pub const fn embedded_schema(&self) -> Option<&SchemaRef> {
        match &self.kind {
            FieldKind::Document(schema) => Some(schema),
            _ => None,
        }
    }

    /// Element field of a list kind.
    #[must_use]
    pub const fn element(&self) -> Option<&Self> {
        match &self.kind {
            FieldKind::List(element) => Some(element),
            _ => None,
        }
    }

    /// Pure predicate over a present value. Absence is the validation
    /// engine's concern (`required`), never this function's.
    #[must_use]
    pub fn validate(&self, value: &Value) -> bool {
        match &self.kind {
            FieldKind::Bool => matches!(value, Value::Bool(_)),
            FieldKind::Int => matches!(value, Value::Int(_)),
            FieldKind::Float => matches!(value, Value::Float(_) | Value::Int(_)),
            FieldKind::Timestamp => matches!(value, Value::Timestamp(_)),
            FieldKind::Id => matches!(value, Value::Id(_)),
            FieldKind::Text => self.validate_text(value),
            FieldKind::Ip => value
                .as_str()
                .is_some_and(|s| s.parse::<IpAddr>().is_ok()),
            FieldKind::List(element) => self.validate_list(element, value),
            FieldKind::Document(schema) => value.as_document().is_some_and(|doc| {
                Rc::ptr_eq(&doc.schema(), schema) && doc.validate()
            }),
        }
    }

    fn validate_text(&self, value: &Value) -> bool {
        let Some(s) = value.as_str() else {
            return false;
        };

        let chars = s.chars().count();
        if self.min_length.is_some_and(|min| chars < min) {
            return false;
        }
        if self.max_length.is_some_and(|max| chars > max) {
            return false;
        }

        if let Some(pattern) = &self.pattern
            && !(pattern.check)(s)
        {
            // pattern failure is tolerated only for an optional empty string
            return s.is_empty() && !self.required;
        }

        true
    }

    fn validate_list(&self, element: &Self, value: &Value) -> bool {
        let Some(items) = value.items() else {
            return false;
        };

        if self.min_length.is_some_and(|min| items.len() < min) {
            return false;
        }
        if self.max_length.is_some_and(|max| items.len() > max) {
            return false;
        }

        items.iter().all(|item| element.validate(item))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Id, Timestamp};

    fn named(def: FieldDef) -> Field {
        Field::named("f", def)
    }

    #[test]
    fn scalar_kinds() {
        let boolean = named(FieldDef::new(FieldKind::Bool));
        assert!(boolean.validate(&true.into()));
        assert!(!boolean.validate(&1.into()));

        let int = named(FieldDef::new(FieldKind::Int));
        assert!(int.validate(&4.into()));
        assert!(!int.validate(&true.into()));
        assert!(!int.validate(&4.5.into()));

        let float = named(FieldDef::new(FieldKind::Float));
        assert!(float.validate(&4.5.into()));
        assert!(float.validate(&4.into()));
        assert!(!float.validate(&"b".into()));

        let ts = named(FieldDef::new(FieldKind::Timestamp));
        assert!(ts.validate(&Timestamp::now().into()));
        assert!(!ts.validate(&3.into()));

        let id = named(FieldDef::new(FieldKind::Id));
        assert!(id.validate(&Id::generate().into()));
        assert!(!id.validate(&4.into()));
    }

    #[test]
    fn text_bounds() {
        let field = named(FieldDef::new(FieldKind::Text).min_length(3).max_length(8));
        assert!(field.validate(&"Bob".into()));
        assert!(!field.validate(&"a".into()));
        assert!(!field.validate(&"abcdefghit".into()));
        assert!(!field.validate(&4.into()));
    }

    #[test]
    fn pattern_tolerates_optional_empty() {
        fn never(_: &str) -> bool {
            false
        }
        let pattern = Pattern::new("never", never);

        let optional = named(FieldDef::new(FieldKind::Text).pattern(pattern));
        assert!(optional.validate(&"".into()));
        assert!(!optional.validate(&"x".into()));

        let required = named(FieldDef::new(FieldKind::Text).pattern(pattern).required());
        assert!(!required.validate(&"".into()));
    }

    #[test]
    fn ip_kinds() {
        let field = named(FieldDef::new(FieldKind::Ip));
        assert!(field.validate(&"194.117.200.10".into()));
        assert!(field.validate(&"::1".into()));
        assert!(field.validate(&"2a01:e35:2422:4d60:2ad2:44ff:fe94:8fb0".into()));
        assert!(!field.validate(&"939.117.200.10".into()));
        assert!(!field.validate(&"bob".into()));
    }

    #[test]
    fn list_bounds_and_elements() {
        let field = named(
            FieldDef::list(FieldDef::new(FieldKind::Int))
                .min_length(2)
                .max_length(4),
        );
        assert!(field.validate(&vec![1, 2, 3].into()));
        assert!(!field.validate(&vec![1].into()));
        assert!(!field.validate(&vec![1, 2, 3, 4, 5].into()));
        assert!(!field.validate(&Value::Seq(vec!["a".into(), "b".into()])));
        assert!(!field.validate(&"not a list".into()));
    }
}
