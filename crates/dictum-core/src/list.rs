use crate::{
    document::{self, WeakDocLink},
    value::Value,
};
use std::{cell::RefCell, fmt, rc::Rc};

///
/// List
/// Notifying container stored for declared list fields.
///
/// Cheap-to-clone handle; clones share the backing sequence. Every
/// mutation re-parents contained documents and notifies the owning
/// document exactly once. Reads never notify.
///
/// Positional operations follow clamping rules: `insert` clamps
/// out-of-bounds indices to the tail, `set` only applies to existing
/// elements, `remove` ignores invalid indices.
///

#[derive(Clone, Default)]
pub struct List {
    inner: Rc<RefCell<ListInner>>,
}

#[derive(Default)]
struct ListInner {
    items: Vec<Value>,
    owner: Option<Owner>,
}

struct Owner {
    doc: WeakDocLink,
    field: String,
}

impl List {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_items(items: Vec<Value>) -> Self {
        let list = Self::new();
        list.inner.borrow_mut().items = items;
        list
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.borrow().items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.borrow().items.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<Value> {
        self.inner.borrow().items.get(index).cloned()
    }

    /// Snapshot of the current elements.
    #[must_use]
    pub fn items(&self) -> Vec<Value> {
        self.inner.borrow().items.clone()
    }

    #[must_use]
    pub fn contains(&self, value: &Value) -> bool {
        self.inner.borrow().items.contains(value)
    }

    pub fn push(&self, value: impl Into<Value>) {
        let value = value.into();
        self.reparent(&value);
        self.inner.borrow_mut().items.push(value);
        self.notify();
    }

    /// Insert at `index`, clamped to the tail when out of bounds.
    pub fn insert(&self, index: usize, value: impl Into<Value>) {
        let value = value.into();
        self.reparent(&value);
        {
            let mut inner = self.inner.borrow_mut();
            let index = index.min(inner.items.len());
            inner.items.insert(index, value);
        }
        self.notify();
    }

    /// Replace the element at `index`; returns false without notifying
    /// when no such element exists.
    pub fn set(&self, index: usize, value: impl Into<Value>) -> bool {
        let value = value.into();
        self.reparent(&value);
        let replaced = {
            let mut inner = self.inner.borrow_mut();
            match inner.items.get_mut(index) {
                Some(slot) => {
                    *slot = value;
                    true
                }
                None => false,
            }
        };
        if replaced {
            self.notify();
        }
        replaced
    }

    /// Remove by index; invalid indices are ignored.
    pub fn remove(&self, index: usize) -> Option<Value> {
        let removed = {
            let mut inner = self.inner.borrow_mut();
            if index < inner.items.len() {
                Some(inner.items.remove(index))
            } else {
                None
            }
        };
        if removed.is_some() {
            self.notify();
        }
        removed
    }

    /// Remove the first element equal to `value`.
    pub fn remove_value(&self, value: &Value) -> bool {
        let removed = {
            let mut inner = self.inner.borrow_mut();
            inner
                .items
                .iter()
                .position(|item| item == value)
                .map(|index| inner.items.remove(index))
                .is_some()
        };
        if removed {
            self.notify();
        }
        removed
    }

    pub fn pop(&self) -> Option<Value> {
        let popped = self.inner.borrow_mut().items.pop();
        if popped.is_some() {
            self.notify();
        }
        popped
    }

    pub fn extend<I>(&self, values: I)
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        for value in &values {
            self.reparent(value);
        }
        self.inner.borrow_mut().items.extend(values);
        self.notify();
    }

    /// Replace the elements in `[start, end)` (clamped) with `values`.
    pub fn splice(&self, start: usize, end: usize, values: Vec<Value>) {
        for value in &values {
            self.reparent(value);
        }
        {
            let mut inner = self.inner.borrow_mut();
            let len = inner.items.len();
            let start = start.min(len);
            let end = end.clamp(start, len);
            inner.items.splice(start..end, values);
        }
        self.notify();
    }

    pub fn clear(&self) {
        self.inner.borrow_mut().items.clear();
        self.notify();
    }

    /// Concatenation producing a new detached container. The receiver is
    /// untouched but still reports the access as a mutation upstream.
    #[must_use]
    pub fn concat(&self, other: Vec<Value>) -> Self {
        for value in &other {
            self.reparent(value);
        }
        let mut items = self.items();
        items.extend(other);
        self.notify();
        Self::from_items(items)
    }

    /// Bind this container to its owning document and field, and point
    /// every contained document back through it. Does not notify.
    pub(crate) fn attach(&self, doc: WeakDocLink, field: &str) {
        {
            let mut inner = self.inner.borrow_mut();
            inner.owner = Some(Owner {
                doc: doc.clone(),
                field: field.to_string(),
            });
        }
        for item in self.items() {
            self.reparent(&item);
        }
    }

    /// Point document values (and documents one level inside plain
    /// sequences) back at the owner under the owning field name.
    fn reparent(&self, value: &Value) {
        let inner = self.inner.borrow();
        let Some(owner) = &inner.owner else {
            return;
        };

        match value {
            Value::Document(doc) => doc.set_parent_link(&owner.doc, &owner.field),
            Value::Seq(items) => {
                for item in items {
                    if let Value::Document(doc) = item {
                        doc.set_parent_link(&owner.doc, &owner.field);
                    }
                }
            }
            _ => {}
        }
    }

    fn notify(&self) {
        let owner = {
            let inner = self.inner.borrow();
            inner
                .owner
                .as_ref()
                .and_then(|owner| owner.doc.upgrade().map(|doc| (doc, owner.field.clone())))
        };
        if let Some((doc, field)) = owner {
            document::touch(&doc, &field);
        }
    }
}

impl PartialEq for List {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner) || self.items() == other.items()
    }
}

impl fmt::Debug for List {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.items()).finish()
    }
}

impl From<Vec<Value>> for List {
    fn from(items: Vec<Value>) -> Self {
        Self::from_items(items)
    }
}
