#![allow(dead_code)]

use chrono::NaiveDate;
use std::sync::Arc;
use tabula::schema::{Constructor, Model};
use tabula::store::Memory;
use tabula::value::TypeEnum;
use tabula::{err, Map, Record, Schema, Type, Value};

pub fn contract_type() -> TypeEnum {
    TypeEnum::new("ContractType")
        .variant("CONTRACTOR", "Contractor")
        .variant("EMPLOYEE", "Employee")
        .variant("OTHER", "Other")
}

pub fn marital_status() -> TypeEnum {
    TypeEnum::new("MaritalStatus")
        .variant("MARRIED", "Married")
        .variant("SINGLE", "Single")
}

pub fn datetime(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> Value {
    Value::NaiveDateTime(
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, s)
            .unwrap(),
    )
}

/// Company, contact and employee models. Employees form a hierarchy
/// discriminated by the `employee_type` column, exposed as the `role`
/// attribute. `SpecialistEngineer` declares its own key, `specialist_id`.
pub fn schema() -> Arc<Schema> {
    let schema = Schema::builder()
        .model(
            Model::builder("Company")
                .primary_key("id", Type::I64)
                .column("name", Type::String)
                .column("location", Type::String)
                .has_many("employees", "Employee")
                .belongs_to("master_engineer", "SpecialistEngineer", "master_engineer_id")
                .constructor(Constructor::new(["name"], |model, args| {
                    let name = args
                        .get("name")
                        .filter(|name| !name.is_null())
                        .ok_or_else(|| err!("missing argument `name`"))?;
                    Ok(model.instantiate().with("name", name.clone()))
                })),
        )
        .model(
            Model::builder("Department")
                .primary_key("id", Type::I64)
                .column("name", Type::String),
        )
        .model(
            Model::builder("Address")
                .primary_key("id", Type::I64)
                .column("street", Type::String)
                .column("number", Type::String)
                .column("zip", Type::String)
                .column("city", Type::String)
                .column("state", Type::String),
        )
        .model(
            Model::builder("ContactType")
                .primary_key("id", Type::I64)
                .column("label", Type::String),
        )
        .model(
            Model::builder("Contact")
                .primary_key("id", Type::I64)
                .belongs_to("type", "ContactType", "type_id")
                .column("value", Type::String)
                .foreign_key("employee_id", "Employee"),
        )
        .model(
            Model::builder("Employee")
                .primary_key("id", Type::I64)
                .column("firstname", Type::String)
                .column("lastname", Type::String)
                .column("email", Type::String)
                .column("admission", Type::DateTime)
                .belongs_to("company", "Company", "company_id")
                .belongs_to("address", "Address", "address_id")
                .has_many("departments", "Department")
                .has_many("contacts", "Contact")
                .column("password", Type::String)
                .column("created_at", Type::DateTime)
                .column_named("role", "employee_type", Type::String)
                .column("_salary", Type::F64)
                .column("contract_type", contract_type())
                .column("marital_status", marital_status())
                .column("birthday", Type::Date)
                .default("admission", datetime(2000, 1, 1, 0, 0, 0))
                .default("created_at", datetime(2000, 1, 2, 0, 0, 0))
                .discriminator("employee_type")
                .identity("Employee")
                .property("full_name", Type::String, |record| {
                    let part = |name| record.get(name).and_then(Value::as_str).unwrap_or("");
                    Value::from(format!("{} {}", part("firstname"), part("lastname")))
                })
                .property("company_name", Type::String, |record| {
                    record
                        .get("company")
                        .and_then(Value::as_record)
                        .and_then(|company| company.get("name"))
                        .cloned()
                        .unwrap_or_default()
                }),
        )
        .model(
            Model::builder("Manager")
                .extends("Employee")
                .column("level", Type::I64)
                .identity("Manager"),
        )
        .model(
            Model::builder("Engineer")
                .extends("Employee")
                .column("engineer_name", Type::String)
                .identity("Engineer"),
        )
        .model(
            Model::builder("SpecialistEngineer")
                .extends("Engineer")
                .primary_key("specialist_id", Type::I64)
                .column("specialization", Type::String)
                .identity("Specialist Engineer"),
        )
        .build()
        .unwrap();

    Arc::new(schema)
}

pub fn record(schema: &Schema, model: &str) -> Record {
    schema.resolve(model).unwrap().instantiate()
}

/// Seeds one company, one address and four employees, one per model of
/// the hierarchy.
pub fn seeded() -> (Arc<Schema>, Memory) {
    let schema = schema();
    let mut store = Memory::new(schema.clone());

    let address = record(&schema, "Address")
        .with("id", 1)
        .with("street", "5 Av")
        .with("number", "943")
        .with("city", "Tarsonis")
        .with("state", "NA");

    let company = record(&schema, "Company")
        .with("id", 5)
        .with("name", "Terrans")
        .with("location", "Korhal")
        .with("master_engineer_id", 44);

    let employee = |model: &str, id: i64, first: &str, last: &str| {
        record(&schema, model)
            .with("id", id)
            .with("firstname", first)
            .with("lastname", last)
            .with("email", "some")
            .with("role", model)
            .with("company_id", 5)
            .with("company", company.clone())
            .with("address_id", 1)
            .with("address", address.clone())
            .with("password", "mypass")
            .with("_salary", 21.12)
    };

    let manager = employee("Manager", 1, "Jim", "Raynor")
        .with("_salary", 400.0)
        .with("level", 3)
        .with("contract_type", contract_type().value("CONTRACTOR"))
        .with("marital_status", marital_status().value("MARRIED"));

    let engineer = employee("Engineer", 2, "Sarah", "Kerrigan")
        .with("engineer_name", "Queen of Blades")
        .with("contract_type", contract_type().value("OTHER"))
        .with("marital_status", marital_status().value("MARRIED"));

    let plain = employee("Employee", 3, "Tychus", "Findlay")
        .with("contract_type", contract_type().value("EMPLOYEE"))
        .with("marital_status", marital_status().value("SINGLE"));

    let specialist = employee("SpecialistEngineer", 4, "Doran", "Routhe")
        .with("role", "Specialist Engineer")
        .with("specialist_id", 44)
        .with("specialization", "Mechanical")
        .with("contract_type", contract_type().value("OTHER"));

    let employees = vec![
        Value::from(manager.clone()),
        Value::from(engineer.clone()),
        Value::from(plain.clone()),
        Value::from(specialist.clone()),
    ];

    store.insert(address).unwrap();
    store
        .insert(company.with("employees", employees))
        .unwrap();
    for employee in [manager, engineer, plain, specialist] {
        store.insert(employee).unwrap();
    }

    (schema, store)
}

pub fn map(json: serde_json::Value) -> Map {
    match json {
        serde_json::Value::Object(map) => map,
        other => panic!("expected an object, got {other}"),
    }
}
