mod support;

use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;
use support::{map, seeded};
use tabula::schema::Model;
use tabula::store::Store;
use tabula::value::TypeEnum;
use tabula::{
    CodecTable, Declaration, Field, Identity, Json, ModelSerializer, PolymorphicSerializer, Record,
    RecordSerializer, Schema, Type, Value,
};

fn employee(store: &dyn Store, schema: &Schema, id: i64) -> Record {
    store
        .get(schema.resolve("Employee").unwrap(), &Value::from(id))
        .unwrap()
        .unwrap()
}

#[test]
fn registry_covers_every_identified_descendant() {
    let (schema, _) = seeded();
    let serializer = PolymorphicSerializer::new(&schema, "Employee").unwrap();

    assert!(serializer.is_polymorphic());
    assert_eq!(serializer.discriminator(), Some("role"));

    let subtypes: Vec<_> = serializer
        .subtypes()
        .map(|(identity, subtype)| (identity.to_string(), subtype.model_name().to_string()))
        .collect();
    assert_eq!(
        subtypes,
        [
            ("Manager".to_string(), "Manager".to_string()),
            ("Engineer".to_string(), "Engineer".to_string()),
            (
                "Specialist Engineer".to_string(),
                "SpecialistEngineer".to_string()
            ),
        ]
    );

    // Each level keeps its own registry
    let engineer = serializer.subtype(&Identity::from("Engineer")).unwrap();
    assert!(engineer
        .subtype(&Identity::from("Specialist Engineer"))
        .is_some());
    assert!(engineer.subtype(&Identity::from("Manager")).is_none());
}

#[test]
fn dump_dispatches_on_runtime_model() {
    let (schema, store) = seeded();
    let serializer = PolymorphicSerializer::new(&schema, "Employee").unwrap();

    let manager = serializer.dump(&employee(&store, &schema, 1)).unwrap();
    assert_eq!(manager.get("level"), Some(&json!(3)));
    assert_eq!(manager.get("role"), Some(&json!("Manager")));

    let engineer = serializer.dump(&employee(&store, &schema, 2)).unwrap();
    assert_eq!(engineer.get("engineer_name"), Some(&json!("Queen of Blades")));
    assert!(!engineer.contains_key("level"));

    let specialist = serializer.dump(&employee(&store, &schema, 4)).unwrap();
    assert_eq!(specialist.get("specialization"), Some(&json!("Mechanical")));
    assert_eq!(specialist.get("specialist_id"), Some(&json!(44)));
    assert_eq!(specialist.get("engineer_name"), Some(&Json::Null));
}

#[test]
fn dump_falls_back_to_base() {
    let (schema, store) = seeded();
    let serializer = PolymorphicSerializer::new(&schema, "Employee").unwrap();
    let plain = ModelSerializer::new(&schema, "Employee").unwrap();

    let record = employee(&store, &schema, 3);
    assert_eq!(
        serializer.dump(&record).unwrap(),
        plain.dump(&record).unwrap()
    );
}

#[test]
fn load_dispatches_on_discriminator() {
    let (schema, _) = seeded();
    let serializer = PolymorphicSerializer::new(&schema, "Employee").unwrap();

    let engineer = serializer
        .load(
            &map(json!({
                "role": "Engineer",
                "firstname": "Rory",
                "engineer_name": "Swann",
            })),
            None,
            None,
        )
        .unwrap();

    assert_eq!(engineer.model(), schema.resolve("Engineer").unwrap().id);
    assert_eq!(engineer.get("engineer_name"), Some(&Value::from("Swann")));
    assert_eq!(engineer.get("role"), Some(&Value::from("Engineer")));
}

#[test]
fn load_reaches_grandchildren() {
    let (schema, _) = seeded();
    let serializer = PolymorphicSerializer::new(&schema, "Employee").unwrap();

    let specialist = serializer
        .load(
            &map(json!({
                "role": "Specialist Engineer",
                "specialist_id": 45,
                "specialization": "Nuclear",
            })),
            None,
            None,
        )
        .unwrap();

    assert_eq!(
        specialist.model(),
        schema.resolve("SpecialistEngineer").unwrap().id
    );
    assert_eq!(specialist.get("specialist_id"), Some(&Value::from(45)));
}

#[test]
fn load_falls_back_to_base() {
    let (schema, _) = seeded();
    let serializer = PolymorphicSerializer::new(&schema, "Employee").unwrap();
    let employee_id = schema.resolve("Employee").unwrap().id;

    let unknown = serializer
        .load(&map(json!({ "role": "Zealot", "firstname": "Fenix" })), None, None)
        .unwrap();
    assert_eq!(unknown.model(), employee_id);
    assert_eq!(unknown.get("role"), Some(&Value::from("Zealot")));

    let untagged = serializer
        .load(&map(json!({ "firstname": "Fenix" })), None, None)
        .unwrap();
    assert_eq!(untagged.model(), employee_id);
}

#[test]
fn mid_level_serializer_dispatches_down() {
    let (schema, store) = seeded();
    let serializer = PolymorphicSerializer::new(&schema, "Engineer").unwrap();

    assert!(serializer.is_polymorphic());
    assert_eq!(serializer.subtypes().count(), 1);

    let specialist = serializer.dump(&employee(&store, &schema, 4)).unwrap();
    assert_eq!(specialist.get("specialization"), Some(&json!("Mechanical")));

    let loaded = serializer
        .load(&map(json!({ "role": "Specialist Engineer" })), None, None)
        .unwrap();
    assert_eq!(loaded.model(), schema.resolve("SpecialistEngineer").unwrap().id);

    let loaded = serializer
        .load(&map(json!({ "role": "Engineer" })), None, None)
        .unwrap();
    assert_eq!(loaded.model(), schema.resolve("Engineer").unwrap().id);
}

#[test]
fn non_polymorphic_model() {
    let (schema, store) = seeded();
    let serializer = PolymorphicSerializer::new(&schema, "Address").unwrap();

    assert!(!serializer.is_polymorphic());
    assert_eq!(serializer.discriminator(), None);
    assert_eq!(serializer.subtypes().count(), 0);

    let address = store
        .get(schema.resolve("Address").unwrap(), &Value::from(1))
        .unwrap()
        .unwrap();
    assert_eq!(
        serializer.dump(&address).unwrap(),
        ModelSerializer::new(&schema, "Address")
            .unwrap()
            .dump(&address)
            .unwrap()
    );
}

#[test]
fn leaf_subtype_is_not_polymorphic() {
    let (schema, store) = seeded();
    let serializer = PolymorphicSerializer::new(&schema, "Manager").unwrap();

    assert!(!serializer.is_polymorphic());
    assert_eq!(serializer.discriminator(), Some("role"));
    assert_eq!(serializer.subtypes().count(), 0);

    let root = PolymorphicSerializer::new(&schema, "Employee").unwrap();
    let manager = root.subtype(&Identity::from("Manager")).unwrap();
    assert!(!manager.is_polymorphic());

    let dumped = serializer.dump(&employee(&store, &schema, 1)).unwrap();
    assert_eq!(dumped.get("level"), Some(&json!(3)));
}

#[test]
fn subtypes_inherit_the_base_declaration() {
    let (schema, store) = seeded();
    let serializer = PolymorphicSerializer::builder(&schema, "Employee")
        .field("password", Field::new().load_only())
        .field("marital_status", Field::enum_key())
        .build()
        .unwrap();

    let manager = serializer.dump(&employee(&store, &schema, 1)).unwrap();
    assert!(!manager.contains_key("password"));
    assert_eq!(manager.get("marital_status"), Some(&json!("MARRIED")));
    assert_eq!(manager.get("level"), Some(&json!(3)));
}

#[test]
fn subtypes_inherit_the_codec_table() {
    let (schema, _) = seeded();
    let serializer = PolymorphicSerializer::builder(&schema, "Employee")
        .codecs(CodecTable::empty())
        .build()
        .unwrap();

    let manager = serializer
        .load(
            &map(json!({ "role": "Manager", "admission": "2004-05-06T07:08:09" })),
            None,
            None,
        )
        .unwrap();

    assert_eq!(manager.model(), schema.resolve("Manager").unwrap().id);
    assert_eq!(manager.get("admission"), Some(&Value::from("2004-05-06T07:08:09")));
}

#[test]
fn subtype_declaration_overrides() {
    let (schema, store) = seeded();
    let serializer = PolymorphicSerializer::builder(&schema, "Employee")
        .field("password", Field::new().load_only())
        .subtype(
            "Manager",
            Declaration::new().field("level", Field::new().dump_only()),
        )
        .build()
        .unwrap();

    let manager = serializer.dump(&employee(&store, &schema, 1)).unwrap();
    assert!(!manager.contains_key("password"));
    assert_eq!(manager.get("level"), Some(&json!(3)));

    let loaded = serializer
        .load(&map(json!({ "role": "Manager", "level": 9 })), None, None)
        .unwrap();
    assert_eq!(loaded.model(), schema.resolve("Manager").unwrap().id);
    assert_eq!(loaded.get("level"), Some(&Value::Null));

    // Other subtypes are unaffected
    let engineer = serializer
        .load(
            &map(json!({ "role": "Engineer", "engineer_name": "Swann" })),
            None,
            None,
        )
        .unwrap();
    assert_eq!(engineer.get("engineer_name"), Some(&Value::from("Swann")));
}

#[test]
fn subtype_must_descend_from_the_model() {
    let (schema, _) = seeded();

    let err = PolymorphicSerializer::builder(&schema, "Engineer")
        .subtype("Manager", Declaration::new())
        .build()
        .unwrap_err();
    assert!(err.is_invalid_schema());
    assert_eq!(
        err.to_string(),
        "invalid schema: `Manager` is not a subtype of `Engineer`"
    );

    let err = PolymorphicSerializer::builder(&schema, "Employee")
        .subtype("Employee", Declaration::new())
        .build()
        .unwrap_err();
    assert!(err.is_invalid_schema());
}

#[test]
fn nested_relation_may_be_polymorphic() {
    let (schema, store) = seeded();
    let employees = PolymorphicSerializer::new(&schema, "Employee").unwrap();
    let serializer = ModelSerializer::builder(&schema, "Company")
        .field(
            "employees",
            Field::nested_list("Employee").serializer(Arc::new(employees)),
        )
        .build()
        .unwrap();

    let company = store
        .get(schema.resolve("Company").unwrap(), &Value::from(5))
        .unwrap()
        .unwrap();
    let dumped = serializer.dump(&company).unwrap();

    let levels: Vec<_> = dumped["employees"]
        .as_array()
        .unwrap()
        .iter()
        .map(|employee| employee.get("level").cloned())
        .collect();
    assert_eq!(levels, [Some(json!(3)), None, None, None]);
}

#[test]
fn enum_identities_are_normalized() {
    let kind = TypeEnum::new("VehicleKind")
        .variant("CAR", "car")
        .variant("TRUCK", "truck");

    let schema = Arc::new(
        Schema::builder()
            .model(
                Model::builder("Vehicle")
                    .primary_key("id", Type::I64)
                    .column("kind", kind.clone())
                    .discriminator("kind"),
            )
            .model(
                Model::builder("Car")
                    .extends("Vehicle")
                    .column("seats", Type::I64)
                    .identity(kind.value("CAR")),
            )
            .model(
                Model::builder("Truck")
                    .extends("Vehicle")
                    .column("payload", Type::F64)
                    .identity(kind.value("TRUCK")),
            )
            .build()
            .unwrap(),
    );

    let serializer = PolymorphicSerializer::new(&schema, "Vehicle").unwrap();
    assert!(serializer.subtype(&Identity::from("truck")).is_some());

    let truck = serializer
        .load(&map(json!({ "kind": "truck", "payload": 12.5 })), None, None)
        .unwrap();
    assert_eq!(truck.model(), schema.resolve("Truck").unwrap().id);
    assert_eq!(truck.get("kind"), kind.value("TRUCK").as_ref());

    let dumped = serializer.dump(&truck).unwrap();
    assert_eq!(dumped.get("kind"), Some(&json!("truck")));
    assert_eq!(dumped.get("payload"), Some(&json!(12.5)));
}
