use crate::value::Map;
use std::rc::Rc;

///
/// Filter
/// Pure mapping transform applied after a dictionary is built.
///
/// Chains are plain ordered lists applied left to right.
///

pub type Filter = Rc<dyn Fn(Map) -> Map>;

/// Apply an ordered filter chain.
#[must_use]
pub fn apply(filters: &[Filter], map: Map) -> Map {
    filters.iter().fold(map, |map, filter| filter(map))
}

/// Build a filter from a plain function.
pub fn filter(f: impl Fn(Map) -> Map + 'static) -> Filter {
    Rc::new(f)
}

/// Composable filter renaming one key, for alias-style output shaping.
#[must_use]
pub fn rename_field(old_name: impl Into<String>, new_name: impl Into<String>) -> Filter {
    let old_name = old_name.into();
    let new_name = new_name.into();

    Rc::new(move |mut map: Map| {
        if let Some(value) = map.remove(&old_name) {
            map.insert(new_name.clone(), value);
        }
        map
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    fn sample() -> Map {
        let mut map = Map::new();
        map.insert("id".to_string(), Value::Int(2));
        map.insert("name".to_string(), Value::from("Bob"));
        map
    }

    #[test]
    fn rename_moves_the_key() {
        let renamed = rename_field("id", "_id")(sample());
        assert!(!renamed.contains_key("id"));
        assert_eq!(renamed.get("_id"), Some(&Value::Int(2)));
    }

    #[test]
    fn rename_missing_key_is_a_no_op() {
        let out = rename_field("absent", "other")(sample());
        assert_eq!(out, sample());
    }

    #[test]
    fn chain_applies_left_to_right() {
        let chain = vec![rename_field("id", "tmp"), rename_field("tmp", "_id")];
        let out = apply(&chain, sample());
        assert!(out.contains_key("_id"));
    }
}
