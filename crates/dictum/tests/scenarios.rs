//! End-to-end scenarios exercising the public surface through the
//! prelude, the way a downstream model crate would.

use dictum::prelude::*;

fn map(entries: Vec<(&str, Value)>) -> Map {
    entries
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}

fn address_schema() -> SchemaRef {
    Schema::build("address")
        .field("city", string().required())
        .field("zip", string())
        .public_fields(["city"])
        .finish()
        .unwrap()
}

fn user_schema() -> SchemaRef {
    let address = address_schema();
    Schema::build("user")
        .field("id", object_id().alias("_id"))
        .field("name", string().min_length(3).max_length(8).required())
        .field("count", integer())
        .field("address", embedded(&address))
        .field("friends", list(integer()).min_length(2).max_length(4))
        .public_fields(["name"])
        .owner_fields(["name", "count"])
        .finish()
        .unwrap()
}

#[test]
fn required_field_gates_validity() {
    let schema = Schema::build("user")
        .field("count", integer().required())
        .finish()
        .unwrap();
    let user = Document::new(&schema);

    assert!(!user.validate());
    // a partial pass ignores absence
    assert!(user.validate_partial());

    user.set("count", 2).unwrap();
    assert!(user.validate());

    user.set("count", "a string").unwrap();
    assert!(!user.validate());
    assert!(!user.validate_partial());
}

#[test]
fn string_bounds() {
    let user = Document::new(&user_schema());

    user.set("name", "Bob").unwrap();
    assert!(user.validate());

    user.set("name", "a").unwrap();
    assert!(!user.validate());

    user.set("name", "abcdefghit").unwrap();
    assert!(!user.validate());

    user.set("name", 10).unwrap();
    assert!(!user.validate());
}

#[test]
fn list_append_flips_validity_and_tracks() {
    let user = Document::new(&user_schema());
    user.set("name", "Bob").unwrap();
    user.set("friends", vec![1]).unwrap();
    assert!(!user.validate());
    user.clear_modified();

    let friends = user.get("friends").unwrap();
    friends.as_list().unwrap().push(2);
    assert!(user.validate());
    assert!(user.modified_fields().contains("friends"));

    friends.as_list().unwrap().extend(vec![3, 4, 5]);
    assert!(!user.validate());
}

#[test]
fn visibility_projections_omit_absent_fields() {
    let user = Document::new(&user_schema());
    user.set("name", "Bob").unwrap();

    let public = user.dict_for_public(false).unwrap();
    assert_eq!(public.len(), 1);
    assert_eq!(public.get("name"), Some(&Value::from("Bob")));

    // count is owner-visible but unset, so it never appears
    let owner = user.dict_for_owner(false).unwrap();
    assert_eq!(owner.len(), 1);
    assert!(!owner.contains_key("count"));
}

#[test]
fn alias_construction_and_double_supply() {
    let schema = user_schema();
    let id = Id::generate();

    let user = Document::from_map(
        &schema,
        map(vec![("_id", id.into()), ("name", "Bob".into())]),
    )
    .unwrap();
    assert_eq!(user.get("id"), Some(Value::Id(id)));
    assert!(user.modified_fields().is_empty());

    let err = Document::from_map(
        &schema,
        map(vec![("_id", id.into()), ("id", Id::generate().into())]),
    )
    .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Config);
}

#[test]
fn mixed_list_construction_is_lenient() {
    let address = address_schema();
    let schema = Schema::build("user")
        .field("stops", list(embedded(&address)))
        .finish()
        .unwrap();

    let user = Document::from_map(
        &schema,
        map(vec![(
            "stops",
            Value::Seq(vec![
                Value::Map(map(vec![("city", "Paris".into())])),
                Value::Int(7),
                Value::Text("noise".into()),
                Value::Map(map(vec![("city", "Lyon".into())])),
            ]),
        )]),
    )
    .unwrap();

    let stops = user.get("stops").unwrap();
    let items = stops.items().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(
        items[0].as_document().unwrap().get("city"),
        Some("Paris".into())
    );
    assert_eq!(
        items[1].as_document().unwrap().get("city"),
        Some("Lyon".into())
    );
}

#[test]
fn defaults_and_factories() {
    let schema = Schema::build("user")
        .field("name", string().default_value("foo"))
        .field("joined", datetime().default_with(|| Timestamp::now().into()))
        .finish()
        .unwrap();
    let user = Document::new(&schema);

    assert_eq!(user.get("name"), Some("foo".into()));
    assert!(matches!(user.get("joined"), Some(Value::Timestamp(_))));
    // defaults are not modifications
    assert!(user.modified_fields().is_empty());
    assert!(user.validate());
}

#[test]
fn choices_restrict_values() {
    let schema = Schema::build("user")
        .field("plan", string().choices(["free", "pro"]).required())
        .finish()
        .unwrap();
    let user = Document::new(&schema);

    user.set("plan", "pro").unwrap();
    assert!(user.validate());

    user.set("plan", "enterprise").unwrap();
    assert!(!user.validate());
}

#[test]
fn properties_project_and_unknown_names_raise() {
    let schema = Schema::build("user")
        .field("first", string())
        .field("last", string())
        .property("full_name", |doc| {
            match (doc.get("first"), doc.get("last")) {
                (Some(Value::Text(first)), Some(Value::Text(last))) => {
                    Value::Text(format!("{first} {last}"))
                }
                _ => Value::Null,
            }
        })
        .public_fields(["first", "full_name"])
        .finish()
        .unwrap();
    let user = Document::new(&schema);
    user.set("first", "Bob").unwrap();
    user.set("last", "Sponge").unwrap();

    assert_eq!(user.get("full_name"), Some("Bob Sponge".into()));

    let public = user.dict_for_public(false).unwrap();
    assert_eq!(public.get("full_name"), Some(&Value::from("Bob Sponge")));

    let err = user
        .dict_for_fields(Visibility::Public, ["ghost"], false)
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Lookup);
}

#[test]
fn nested_mutation_propagates_upward() {
    let user = Document::from_map(
        &user_schema(),
        map(vec![
            ("name", "Bob".into()),
            ("address", Value::Map(map(vec![("city", "Paris".into())]))),
        ]),
    )
    .unwrap();
    assert!(user.validate());

    let address = user.get("address").unwrap();
    let address = address.as_document().unwrap();
    address.set("city", Value::Null).unwrap();

    // the embedded write staled the ancestor cache too
    assert!(!user.validate());
    assert!(user.modified_fields().contains("address"));

    address.set("city", "Lyon").unwrap();
    assert!(user.validate());
}

#[test]
fn save_applies_filter_chain() {
    let address = address_schema();
    let schema = Schema::build("user")
        .field("id", object_id())
        .field("home", embedded(&address))
        .pre_save_filter(rename_field("id", "_id"))
        .finish()
        .unwrap();

    let user = Document::new(&schema);
    user.set("id", Id::generate()).unwrap();
    let home = Document::new(&address);
    home.set("city", "Paris").unwrap();
    user.set("home", home).unwrap();

    let saved = user.dict_for_save(false).unwrap();
    assert!(saved.contains_key("_id"));
    assert!(!saved.contains_key("id"));
    // embedded documents render as plain mappings
    let home = saved.get("home").unwrap().as_map().unwrap();
    assert_eq!(home.get("city"), Some(&Value::from("Paris")));
}

#[test]
fn modified_projection_after_clear() {
    let user = Document::from_map(&user_schema(), map(vec![("name", "Bob".into())])).unwrap();
    assert!(user.dict_for_modified_fields(true).unwrap().is_empty());

    user.set("count", 3).unwrap();
    let modified = user.dict_for_modified_fields(true).unwrap();
    assert_eq!(modified.len(), 1);
    assert_eq!(modified.get("count"), Some(&Value::Int(3)));

    user.clear_modified();
    assert!(user.dict_for_modified_fields(true).unwrap().is_empty());
}

#[test]
fn json_compliant_save_round_trips_through_serde() {
    let schema = Schema::build("event")
        .field("id", object_id().required())
        .field("at", datetime().required())
        .field("tags", list(string()))
        .finish()
        .unwrap();
    let event = Document::new(&schema);
    event.set("id", Id::generate()).unwrap();
    event
        .set("at", Timestamp::from_seconds(1_700_000_000))
        .unwrap();
    event.set("tags", vec!["a", "b"]).unwrap();

    let saved = event.dict_for_save(true).unwrap();
    let json = serde_json::to_value(Value::Map(saved)).unwrap();
    assert!(json.get("id").unwrap().is_string());
    assert_eq!(
        json.get("at").unwrap().as_str(),
        Some("2023-11-14T22:13:20+00:00")
    );
    assert_eq!(json.get("tags").unwrap().as_array().unwrap().len(), 2);
}

#[test]
fn builtin_network_fields() {
    let schema = Schema::build("profile")
        .field("site", url())
        .field("contact", email())
        .field("last_ip", ip_address())
        .finish()
        .unwrap();
    let profile = Document::new(&schema);

    profile.set("site", "https://example.com/about").unwrap();
    profile.set("contact", "bob@sponge.com").unwrap();
    profile.set("last_ip", "194.117.200.10").unwrap();
    assert!(profile.validate());

    profile.set("site", "not a url").unwrap();
    assert!(!profile.validate());
    profile.set("site", Value::Null).unwrap();

    profile.set("contact", "sponge.com").unwrap();
    assert!(!profile.validate());
    profile.set("contact", Value::Null).unwrap();

    profile.set("last_ip", "939.117.200.10").unwrap();
    assert!(!profile.validate());
}

#[test]
fn schema_inheritance_extends_and_overrides() {
    let base = Schema::build("document")
        .field("id", object_id().alias("_id"))
        .field("created", datetime())
        .finish()
        .unwrap();

    let schema = Schema::build("user")
        .extend(&base)
        .field("name", string().required())
        .finish()
        .unwrap();

    let user = Document::from_map(
        &schema,
        map(vec![("_id", Id::generate().into()), ("name", "Bob".into())]),
    )
    .unwrap();
    assert!(user.validate());
    assert!(user.get("id").is_some());
}
