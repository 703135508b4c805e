//! Integration tests for the two-phase binder.

use ormbind_core::overrides::{
    ColumnConfig, InMemoryOverrides, JoinTableConfig, MappingOverride, PropertyConfig,
};
use ormbind_core::schema::{
    BackReferenceKind, CascadeStrategy, InheritanceStrategy, MapKey, QualifiedName,
    SortDirection, SqlType, ValueBinding,
};
use ormbind_core::{
    BindError, BindWarning, Binder, BinderConfig, ConstraintSet, ContainerKind, EntityDescriptor,
    InMemoryConstraints, PropertyDescriptor, ValueType,
};
use pretty_assertions::assert_eq;
use std::sync::Arc;

fn person_and_pet() -> Vec<EntityDescriptor> {
    let person = EntityDescriptor::new("Person")
        .with_property(PropertyDescriptor::basic("name", ValueType::String))
        .with_property(
            PropertyDescriptor::one_to_many("pets", "Pet", ContainerKind::Set).with_other_side("owner"),
        );
    let pet = EntityDescriptor::new("Pet")
        .belongs_to("Person")
        .with_property(PropertyDescriptor::basic("name", ValueType::String))
        .with_property(PropertyDescriptor::many_to_one("owner", "Person").with_other_side("pets"));
    vec![person, pet]
}

fn person_constraints() -> Arc<InMemoryConstraints> {
    Arc::new(InMemoryConstraints::new().with("Person", "name", ConstraintSet::new().size(1, 5)))
}

fn animals() -> Vec<EntityDescriptor> {
    let animal = EntityDescriptor::new("Animal")
        .with_subclass("Dog")
        .with_subclass("Cat")
        .with_property(PropertyDescriptor::basic("name", ValueType::String));
    let dog = EntityDescriptor::new("Dog")
        .extends("Animal")
        .with_property(PropertyDescriptor::basic("barks", ValueType::Bool));
    let cat = EntityDescriptor::new("Cat")
        .extends("Animal")
        .with_property(PropertyDescriptor::basic("lives", ValueType::Int32));
    vec![animal, dog, cat]
}

fn binder_with(overrides: InMemoryOverrides) -> Binder {
    Binder::new(BinderConfig::default()).with_overrides(Arc::new(overrides))
}

// ============================================================================
// Associations
// ============================================================================

#[test]
fn test_person_and_pet() {
    let mut binder = Binder::new(BinderConfig::default()).with_constraints(person_constraints());
    let model = binder.bind(&person_and_pet()).unwrap();

    let pets = model.collection("Person.pets").unwrap();
    assert!(pets.inverse);
    assert_eq!(pets.table, Some(QualifiedName::new("pet")));
    assert_eq!(pets.key.as_ref().unwrap().columns, vec!["person_id".to_string()]);
    assert_eq!(pets.cascade, CascadeStrategy::All);

    let pet_table = model.table_named("pet").unwrap();
    let owner_column = pet_table.column("person_id").unwrap();
    assert_eq!(owner_column.sql_type, SqlType::BigInt);
    assert!(!owner_column.nullable);
    assert_eq!(
        pet_table
            .foreign_keys_to(&QualifiedName::new("person"))
            .count(),
        1
    );

    let person_table = model.table_named("person").unwrap();
    assert_eq!(person_table.column("name").unwrap().length, Some(5));
    assert_eq!(person_table.primary_key, vec!["id".to_string()]);

    let owner = binder.get_mapping("Pet").unwrap().property("owner").unwrap();
    assert_eq!(owner.cascade, CascadeStrategy::All);
    assert!(binder.warnings().is_empty());
}

#[test]
fn test_inverse_one_to_many_backref_is_read_only() {
    let mut binder = Binder::new(BinderConfig::default());
    binder.bind(&person_and_pet()).unwrap();

    let pet = binder.get_mapping("Pet").unwrap();
    assert_eq!(pet.back_references.len(), 1);
    let backref = &pet.back_references[0];
    assert_eq!(backref.name, "_Person_petsBackref");
    assert!(!backref.insertable);
    assert!(!backref.updatable);
}

#[test]
fn test_bind_twice_is_idempotent() {
    let entities = person_and_pet();
    let mut binder = Binder::new(BinderConfig::default()).with_constraints(person_constraints());

    let first = binder.bind(&entities).unwrap().clone();
    let second = binder.bind(&entities).unwrap().clone();

    assert_eq!(first, second);
    assert_eq!(binder.state().len(), 2);
}

#[test]
fn test_string_size_range_sets_length() {
    let book = EntityDescriptor::new("Book")
        .with_property(PropertyDescriptor::basic("title", ValueType::String));
    let constraints = InMemoryConstraints::new().with("Book", "title", ConstraintSet::new().size(2, 10));

    let mut binder = Binder::new(BinderConfig::default()).with_constraints(Arc::new(constraints));
    let model = binder.bind(&[book]).unwrap();

    let title = model.table_named("book").unwrap().column("title").unwrap();
    assert_eq!(title.length, Some(10));
}

#[test]
fn test_bidirectional_many_to_many_has_one_join_table() {
    let author = EntityDescriptor::new("Author").with_property(
        PropertyDescriptor::many_to_many("books", "Book", ContainerKind::Set)
            .with_other_side("authors")
            .owning(),
    );
    let book = EntityDescriptor::new("Book").with_property(
        PropertyDescriptor::many_to_many("authors", "Author", ContainerKind::Set)
            .with_other_side("books"),
    );

    let mut binder = Binder::new(BinderConfig::default());
    let model = binder.bind(&[author, book]).unwrap();

    let names: Vec<&str> = model.tables.keys().map(String::as_str).collect();
    assert_eq!(names, vec!["author", "author_books", "book"]);

    let join = model.table_named("author_books").unwrap();
    assert!(join.has_column("author_id"));
    assert!(join.has_column("book_id"));
    assert_eq!(join.foreign_keys.len(), 2);

    let books = model.collection("Author.books").unwrap();
    let authors = model.collection("Book.authors").unwrap();
    assert!(!books.inverse);
    assert!(authors.inverse);
    assert_eq!(books.table, authors.table);
    assert_eq!(authors.key.as_ref().unwrap().columns, vec!["book_id".to_string()]);
    assert!(binder.warnings().is_empty());
}

#[test]
fn test_many_to_many_without_owner_warns_once() {
    let author = EntityDescriptor::new("Author").with_property(
        PropertyDescriptor::many_to_many("books", "Book", ContainerKind::Set).with_other_side("authors"),
    );
    let book = EntityDescriptor::new("Book").with_property(
        PropertyDescriptor::many_to_many("authors", "Author", ContainerKind::Set).with_other_side("books"),
    );

    let mut binder = Binder::new(BinderConfig::default());
    let model = binder.bind(&[author, book]).unwrap();

    assert!(!model.collection("Author.books").unwrap().inverse);
    assert!(model.collection("Book.authors").unwrap().inverse);
    assert_eq!(
        binder.warnings(),
        &[BindWarning::AmbiguousManyToManyOwner {
            entity: "Author".into(),
            property: "books".into(),
            owner: "Author".into(),
        }]
    );
}

#[test]
fn test_self_reference_cascades() {
    let employee = EntityDescriptor::new("Employee")
        .with_property(PropertyDescriptor::many_to_one("manager", "Employee").nullable())
        .with_property(PropertyDescriptor::many_to_many("mentors", "Employee", ContainerKind::Set));

    let mut binder = Binder::new(BinderConfig::default());
    let model = binder.bind(&[employee]).unwrap();

    let mapping = model.mapping("Employee").unwrap();
    assert_eq!(mapping.property("manager").unwrap().cascade, CascadeStrategy::None);
    assert_eq!(mapping.property("mentors").unwrap().cascade, CascadeStrategy::SaveUpdate);

    let table = model.table_named("employee").unwrap();
    assert!(table.column("manager_id").unwrap().nullable);

    let join = model.table_named("employee_mentors").unwrap();
    assert!(join.has_column("employee_id"));
    assert!(join.has_column("employee_mentors_id"));
}

#[test]
fn test_unidirectional_one_to_many_adds_nullable_backref() {
    let order = EntityDescriptor::new("Order")
        .with_property(PropertyDescriptor::one_to_many("lines", "OrderLine", ContainerKind::Set));
    let line = EntityDescriptor::new("OrderLine")
        .with_property(PropertyDescriptor::basic("quantity", ValueType::Int32));
    let declared = line.properties.clone();

    let mut binder = Binder::new(BinderConfig::default());
    let model = binder.bind(&[order, line]).unwrap();

    let lines = model.collection("Order.lines").unwrap();
    assert!(!lines.inverse);
    let key = lines.key.as_ref().unwrap();
    assert_eq!(key.columns, vec!["order_lines_id".to_string()]);
    assert!(key.nullable);

    let line_table = model.table_named("order_line").unwrap();
    assert!(line_table.column("order_lines_id").unwrap().nullable);

    let mapping = model.mapping("OrderLine").unwrap();
    assert_eq!(mapping.back_references.len(), 1);
    assert!(mapping.back_references[0].nullable);
    assert_eq!(mapping.back_references[0].kind, BackReferenceKind::Key);

    let stored = binder.descriptors().get("OrderLine").unwrap();
    assert_eq!(stored.properties, declared);
}

#[test]
fn test_basic_collections_get_own_tables() {
    let person = EntityDescriptor::new("Person")
        .with_property(PropertyDescriptor::basic_collection(
            "nicknames",
            ValueType::String,
            ContainerKind::Set,
        ))
        .with_property(PropertyDescriptor::basic_collection(
            "attributes",
            ValueType::String,
            ContainerKind::Map,
        ));

    let mut binder = Binder::new(BinderConfig::default());
    let model = binder.bind(&[person]).unwrap();

    let nicknames = model.table_named("person_nicknames").unwrap();
    assert!(nicknames.has_column("person_id"));
    assert!(nicknames.has_column("nicknames_string"));
    assert_eq!(
        nicknames.primary_key,
        vec!["person_id".to_string(), "nicknames_string".to_string()]
    );

    let attributes = model.collection("Person.attributes").unwrap();
    assert_eq!(
        attributes.map_key,
        Some(MapKey::Column {
            column: "attributes_idx".into(),
            sql_type: SqlType::Varchar,
            length: Some(255),
        })
    );
    assert_eq!(
        model.mapping("Person").unwrap().property("nicknames").unwrap().cascade,
        CascadeStrategy::All
    );
}

#[test]
fn test_list_index_column() {
    let playlist = EntityDescriptor::new("Playlist")
        .with_property(PropertyDescriptor::one_to_many("tracks", "Track", ContainerKind::List));
    let track = EntityDescriptor::new("Track");

    let mut binder = Binder::new(BinderConfig::default());
    let model = binder.bind(&[playlist, track]).unwrap();

    let tracks = model.collection("Playlist.tracks").unwrap();
    assert_eq!(tracks.index.as_ref().unwrap().column, "tracks_idx");
    assert_eq!(tracks.index.as_ref().unwrap().base, 0);
    assert!(model.table_named("track").unwrap().has_column("tracks_idx"));
}

#[test]
fn test_list_with_join_table_adds_index_backref() {
    let overrides = InMemoryOverrides::new().with(
        "Playlist",
        MappingOverride::new().with_property(
            "tracks",
            PropertyConfig::default().with_join_table(JoinTableConfig::named("playlist_tracks")),
        ),
    );
    let playlist = EntityDescriptor::new("Playlist")
        .with_property(PropertyDescriptor::one_to_many("tracks", "Track", ContainerKind::List));
    let track = EntityDescriptor::new("Track");

    let mut binder = binder_with(overrides);
    let model = binder.bind(&[playlist, track]).unwrap();

    let tracks = model.collection("Playlist.tracks").unwrap();
    assert!(!tracks.inverse);
    assert!(!tracks.key.as_ref().unwrap().nullable);
    assert!(model.table_named("playlist_tracks").unwrap().has_column("tracks_idx"));

    let index_backrefs: Vec<_> = model
        .mapping("Track")
        .unwrap()
        .back_references
        .iter()
        .filter(|b| b.kind == BackReferenceKind::Index)
        .collect();
    assert_eq!(index_backrefs.len(), 1);
    assert_eq!(index_backrefs[0].name, "_Playlist_tracksIndexBackref");
    assert_eq!(index_backrefs[0].columns, vec!["tracks_idx".to_string()]);
    assert!(!index_backrefs[0].updatable);
}

#[test]
fn test_map_keyed_by_element_property() {
    let overrides = InMemoryOverrides::new().with(
        "Department",
        MappingOverride::new().with_property(
            "staff",
            PropertyConfig {
                map_key_property: Some("code".into()),
                ..Default::default()
            },
        ),
    );
    let department = EntityDescriptor::new("Department")
        .with_property(PropertyDescriptor::one_to_many("staff", "Employee", ContainerKind::Map));
    let employee = EntityDescriptor::new("Employee")
        .with_property(PropertyDescriptor::basic("code", ValueType::String));

    let mut binder = binder_with(overrides);
    let model = binder.bind(&[department, employee]).unwrap();

    let staff = model.collection("Department.staff").unwrap();
    assert_eq!(
        staff.map_key,
        Some(MapKey::Property {
            property: "code".into()
        })
    );
    assert!(!model.table_named("employee").unwrap().has_column("staff_idx"));
}

#[test]
fn test_many_to_one_key_ignores_target_table_override() {
    let overrides = InMemoryOverrides::new().with("Person", MappingOverride::new().with_table("people"));

    let mut binder = binder_with(overrides);
    let model = binder.bind(&person_and_pet()).unwrap();

    let pet = model.table_named("pet").unwrap();
    assert!(pet.has_column("person_id"));
    assert_eq!(pet.foreign_keys_to(&QualifiedName::new("people")).count(), 1);
    assert_eq!(
        model.collection("Person.pets").unwrap().key.as_ref().unwrap().columns,
        vec!["person_id".to_string()]
    );
}

// ============================================================================
// Components and derived properties
// ============================================================================

fn address() -> EntityDescriptor {
    EntityDescriptor::embeddable("Address")
        .with_version(PropertyDescriptor::basic("version", ValueType::Int64))
        .with_property(PropertyDescriptor::basic("id", ValueType::Int64))
        .with_property(PropertyDescriptor::basic("version", ValueType::Int64))
        .with_property(PropertyDescriptor::basic("street", ValueType::String))
}

#[test]
fn test_embedded_component_columns() {
    let person = EntityDescriptor::new("Person")
        .with_property(PropertyDescriptor::embedded("home", "Address"));

    let mut binder = Binder::new(BinderConfig::default());
    let model = binder.bind(&[person, address()]).unwrap();

    let person_table = model.table_named("person").unwrap();
    let columns: Vec<&str> = person_table.columns.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(columns, vec!["id", "home_street"]);
    assert!(model.table_named("address").is_none());
    assert!(model.mapping("Address").is_none());

    match &model.mapping("Person").unwrap().property("home").unwrap().value {
        ValueBinding::Component { class, properties } => {
            assert_eq!(class, "Address");
            let names: Vec<&str> = properties.iter().map(|p| p.name.as_str()).collect();
            assert_eq!(names, vec!["street"]);
        }
        other => panic!("expected a component, got {:?}", other),
    }
}

#[test]
fn test_collection_inside_component_warns() {
    let address = address().with_property(PropertyDescriptor::basic_collection(
        "tags",
        ValueType::String,
        ContainerKind::Set,
    ));
    let person = EntityDescriptor::new("Person")
        .with_property(PropertyDescriptor::embedded("home", "Address"));

    let mut binder = Binder::new(BinderConfig::default());
    let model = binder.bind(&[person, address]).unwrap().clone();

    assert_eq!(
        binder.warnings(),
        &[BindWarning::UnsupportedEmbeddedCollection {
            entity: "Person".into(),
            property: "home.tags".into(),
        }]
    );
    assert!(model.collections.is_empty());
    assert!(!model.table_named("person").unwrap().has_column("home_tags"));
}

#[test]
fn test_formula_property_is_derived() {
    let overrides = InMemoryOverrides::new().with(
        "Invoice",
        MappingOverride::new().with_property(
            "total",
            PropertyConfig::default().with_formula("price * quantity"),
        ),
    );
    let invoice = EntityDescriptor::new("Invoice")
        .with_property(PropertyDescriptor::basic("price", ValueType::Decimal))
        .with_property(PropertyDescriptor::basic("quantity", ValueType::Int32))
        .with_property(PropertyDescriptor::basic("total", ValueType::Decimal));

    let mut binder = binder_with(overrides);
    let model = binder.bind(&[invoice]).unwrap();

    let total = model.mapping("Invoice").unwrap().property("total").unwrap();
    assert_eq!(
        total.value,
        ValueBinding::Formula {
            expression: "price * quantity".into()
        }
    );
    assert!(total.derived);
    assert!(!total.insertable);
    assert!(!model.table_named("invoice").unwrap().has_column("total"));
}

// ============================================================================
// Inheritance
// ============================================================================

#[test]
fn test_single_table_hierarchy() {
    let mut binder = Binder::new(BinderConfig::default());
    let model = binder.bind(&animals()).unwrap();

    assert_eq!(model.tables.len(), 1);
    let root = model.mapping("Animal").unwrap().root().unwrap();
    assert_eq!(root.inheritance, Some(InheritanceStrategy::SingleTable));
    assert_eq!(root.discriminator.as_ref().unwrap().column.as_deref(), Some("class"));

    let table = model.table_named("animal").unwrap();
    let discriminators = table.columns.iter().filter(|c| c.name == "class").count();
    assert_eq!(discriminators, 1);
    assert!(table.column("barks").unwrap().nullable);
    assert!(table.column("lives").unwrap().nullable);
    assert!(!table.column("name").unwrap().nullable);

    assert_eq!(model.mapping("Dog").unwrap().discriminator_value.as_deref(), Some("Dog"));
    assert_eq!(model.mapping("Animal").unwrap().discriminator_value.as_deref(), Some("Animal"));
}

/// Single-table subclass columns stay nullable even when an override asks
/// for NOT NULL; the hierarchy rule takes precedence over the override.
#[test]
fn test_single_table_nullability_beats_override() {
    let overrides = InMemoryOverrides::new().with(
        "Dog",
        MappingOverride::new().with_property(
            "barks",
            PropertyConfig::default().with_column(ColumnConfig::named("barks").with_nullable(false)),
        ),
    );

    let mut binder = binder_with(overrides);
    let model = binder.bind(&animals()).unwrap();

    assert!(model.table_named("animal").unwrap().column("barks").unwrap().nullable);
}

#[test]
fn test_joined_hierarchy() {
    let overrides = InMemoryOverrides::new().with("Animal", MappingOverride::new().table_per_subclass());

    let mut binder = binder_with(overrides);
    let model = binder.bind(&animals()).unwrap();

    let root = model.mapping("Animal").unwrap().root().unwrap();
    assert_eq!(root.inheritance, Some(InheritanceStrategy::Joined));
    assert!(root.discriminator.is_none());
    assert!(!model.table_named("animal").unwrap().has_column("class"));

    let animal_table = QualifiedName::new("animal");
    for name in ["dog", "cat"] {
        let table = model.table_named(name).unwrap();
        assert_eq!(table.primary_key, vec!["id".to_string()]);
        let fks: Vec<_> = table.foreign_keys_to(&animal_table).collect();
        assert_eq!(fks.len(), 1);
        assert_eq!(fks[0].columns, vec!["id".to_string()]);
    }
    assert!(!model.table_named("dog").unwrap().column("barks").unwrap().nullable);
}

#[test]
fn test_conflicting_inheritance_is_fatal() {
    let overrides = InMemoryOverrides::new()
        .with("Animal", MappingOverride::new().table_per_subclass())
        .with(
            "Dog",
            MappingOverride {
                table_per_hierarchy: Some(true),
                ..Default::default()
            },
        );

    let mut binder = binder_with(overrides);
    let err = binder.bind(&animals()).unwrap_err();

    assert!(matches!(err, BindError::ConflictingInheritance { ref entity, .. } if entity == "Dog"));
    assert!(binder.model().mappings.is_empty());
    assert!(binder.state().is_empty());
}

#[test]
fn test_late_subclass_attaches_to_bound_root() {
    let animal = EntityDescriptor::new("Animal")
        .with_property(PropertyDescriptor::basic("name", ValueType::String));
    let dog = EntityDescriptor::new("Dog")
        .extends("Animal")
        .with_property(PropertyDescriptor::basic("barks", ValueType::Bool));

    let mut binder = Binder::new(BinderConfig::default());
    binder.bind(&[animal]).unwrap();
    assert!(binder.get_mapping("Animal").unwrap().root().unwrap().inheritance.is_none());

    let model = binder.bind(&[dog]).unwrap();
    let root = model.mapping("Animal").unwrap().root().unwrap();
    assert_eq!(root.inheritance, Some(InheritanceStrategy::SingleTable));
    assert!(model.table_named("animal").unwrap().has_column("class"));
    assert!(model.table_named("animal").unwrap().column("barks").unwrap().nullable);
    assert_eq!(model.mapping("Dog").unwrap().discriminator_value.as_deref(), Some("Dog"));
}

// ============================================================================
// Errors and warnings
// ============================================================================

#[test]
fn test_composite_identifier_with_unknown_part() {
    let line = EntityDescriptor::new("OrderLine")
        .with_composite_id(["orderNo", "lineNo"])
        .with_property(PropertyDescriptor::basic("orderNo", ValueType::Int64));

    let mut binder = Binder::new(BinderConfig::default());
    let err = binder.bind(&[line]).unwrap_err();

    assert_eq!(
        err,
        BindError::CompositeIdentifier {
            entity: "OrderLine".into(),
            property: "lineNo".into(),
        }
    );
    assert!(binder.model().tables.is_empty());
}

#[test]
fn test_composite_identifier_primary_key() {
    let line = EntityDescriptor::new("OrderLine")
        .with_composite_id(["orderNo", "lineNo"])
        .with_property(PropertyDescriptor::optional("orderNo", ValueType::Int64))
        .with_property(PropertyDescriptor::basic("lineNo", ValueType::Int32));

    let mut binder = Binder::new(BinderConfig::default());
    let model = binder.bind(&[line]).unwrap();

    let table = model.table_named("order_line").unwrap();
    assert_eq!(table.primary_key, vec!["order_no".to_string(), "line_no".to_string()]);
    assert!(!table.column("order_no").unwrap().nullable);
}

#[test]
fn test_unsupported_version_type_warns() {
    let doc = EntityDescriptor::new("Document")
        .with_version(PropertyDescriptor::basic("revision", ValueType::String));

    let mut binder = Binder::new(BinderConfig::default());
    let model = binder.bind(&[doc]).unwrap();

    assert!(model.mapping("Document").unwrap().root().unwrap().version.is_none());
    assert!(!model.table_named("document").unwrap().has_column("revision"));
    assert!(matches!(
        &binder.warnings()[..],
        [BindWarning::UnsupportedVersionType { property, .. }] if property == "revision"
    ));
}

#[test]
fn test_unmapped_association_target() {
    let pet = EntityDescriptor::new("Pet")
        .with_property(PropertyDescriptor::many_to_one("owner", "Person"));

    let mut binder = Binder::new(BinderConfig::default());
    let err = binder.bind(&[pet]).unwrap_err();

    assert_eq!(
        err,
        BindError::UnmappedAssociationTarget {
            entity: "Pet".into(),
            property: "owner".into(),
            target: "Person".into(),
        }
    );
    assert!(binder.get_mapping("Pet").is_none());
}

#[test]
fn test_externally_mapped_target_is_unmapped() {
    let person = EntityDescriptor::new("Person").externally_mapped();
    let pet = EntityDescriptor::new("Pet")
        .with_property(PropertyDescriptor::many_to_one("owner", "Person"));

    let mut binder = Binder::new(BinderConfig::default());

    assert!(matches!(
        binder.bind(&[person, pet]),
        Err(BindError::UnmappedAssociationTarget { .. })
    ));
}

#[test]
fn test_duplicate_table() {
    let overrides = InMemoryOverrides::new()
        .with("Invoice", MappingOverride::new().with_table("documents"))
        .with("Receipt", MappingOverride::new().with_table("documents"));

    let mut binder = binder_with(overrides);
    let err = binder
        .bind(&[EntityDescriptor::new("Invoice"), EntityDescriptor::new("Receipt")])
        .unwrap_err();

    assert_eq!(
        err,
        BindError::DuplicateTable {
            entity: "Receipt".into(),
            table: "documents".into(),
            existing: "Invoice".into(),
        }
    );
}

#[test]
fn test_collection_sort_resolution() {
    let overrides = InMemoryOverrides::new().with(
        "Person",
        MappingOverride::new().with_property(
            "pets",
            PropertyConfig::default().with_sort("name desc, owner.name, nickname"),
        ),
    );

    let mut binder = binder_with(overrides);
    let model = binder.bind(&person_and_pet()).unwrap();

    let pets = model.collection("Person.pets").unwrap();
    let order: Vec<(&str, &str, SortDirection)> = pets
        .order_by
        .iter()
        .map(|o| (o.path.as_str(), o.column.as_str(), o.direction))
        .collect();
    assert_eq!(
        order,
        vec![
            ("name", "name", SortDirection::Desc),
            ("owner.name", "name", SortDirection::Asc),
        ]
    );
    assert_eq!(pets.order_by[1].table, QualifiedName::new("person"));
    assert_eq!(pets.sort_joins.len(), 1);
    assert_eq!(pets.sort_joins[0].columns, vec!["person_id".to_string()]);

    assert_eq!(
        binder.warnings(),
        &[BindWarning::AmbiguousSortToken {
            entity: "Person".into(),
            property: "pets".into(),
            token: "nickname".into(),
        }]
    );
}

#[test]
fn test_sort_on_indexed_collection_is_ignored() {
    let overrides = InMemoryOverrides::new().with(
        "Playlist",
        MappingOverride::new().with_property("tracks", PropertyConfig::default().with_sort("title")),
    );
    let playlist = EntityDescriptor::new("Playlist")
        .with_property(PropertyDescriptor::one_to_many("tracks", "Track", ContainerKind::List));
    let track = EntityDescriptor::new("Track")
        .with_property(PropertyDescriptor::basic("title", ValueType::String));

    let mut binder = binder_with(overrides);
    let model = binder.bind(&[playlist, track]).unwrap();

    assert!(model.collection("Playlist.tracks").unwrap().order_by.is_empty());
    assert!(matches!(
        &binder.warnings()[..],
        [BindWarning::SortIgnoredForIndexedCollection { .. }]
    ));
}

#[test]
fn test_unknown_superclass() {
    let dog = EntityDescriptor::new("Dog").extends("Animal");

    let mut binder = Binder::new(BinderConfig::default());

    assert_eq!(
        binder.bind(&[dog]).unwrap_err(),
        BindError::UnknownEntity {
            entity: "Animal".into()
        }
    );
}
