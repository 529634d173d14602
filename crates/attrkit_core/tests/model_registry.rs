use attrkit_core::{
    AttributeError, AttributeOptions, ErrorKind, ModelRegistry, Schema, Value,
    DISCRIMINATOR_ATTRIBUTE,
};
use std::collections::BTreeMap;

fn registry() -> ModelRegistry {
    let mut vehicle = Schema::root("Vehicle").unwrap();
    vehicle
        .declare("wheels", "integer", AttributeOptions::new().with_default(4))
        .unwrap();
    vehicle
        .declare("plate", "string", AttributeOptions::new())
        .unwrap();

    let mut truck = vehicle.derive("Truck").unwrap();
    truck
        .declare("payload_kg", "float", AttributeOptions::new().with_default(0.0))
        .unwrap();
    let mut bike = vehicle.derive("Bike").unwrap();
    bike.declare("electric", "boolean", AttributeOptions::new().with_default(false))
        .unwrap();

    let mut invoice = Schema::root("Invoice").unwrap();
    invoice
        .declare("total", "float", AttributeOptions::new())
        .unwrap();

    let mut registry = ModelRegistry::new();
    registry.register(vehicle).unwrap();
    registry.register(truck).unwrap();
    registry.register(bike).unwrap();
    registry.register(invoice).unwrap();
    registry
}

fn record(pairs: &[(&str, Value)]) -> BTreeMap<String, Value> {
    pairs
        .iter()
        .map(|(name, value)| (name.to_string(), value.clone()))
        .collect()
}

#[test]
fn subtype_instances_inherit_defaults() {
    let registry = registry();
    let truck = registry.instantiate("Truck").unwrap();

    assert_eq!(truck.read("wheels").unwrap(), Some(&Value::Integer(4)));
    assert_eq!(truck.read("payload_kg").unwrap(), Some(&Value::Float(0.0)));
    assert!(!truck.has_changes());
}

#[test]
fn discriminator_round_trips_through_a_flat_record() {
    let registry = registry();
    let mut truck = registry.instantiate("Truck").unwrap();
    truck.set("plate", "TRK-1").unwrap();
    truck.set("payload_kg", 1200.5).unwrap();
    truck.apply_discriminator();

    let flat = truck.values().clone();
    assert_eq!(flat.get(DISCRIMINATOR_ATTRIBUTE), Some(&Value::from("Truck")));

    let loaded = registry.hydrate("Vehicle", flat).unwrap();
    assert_eq!(loaded.model_name(), "Truck");
    assert_eq!(loaded.read("payload_kg").unwrap(), Some(&Value::Float(1200.5)));
    assert!(!loaded.has_changes());
}

#[test]
fn record_without_discriminator_hydrates_requested_model() {
    let registry = registry();
    let loaded = registry
        .hydrate("Vehicle", record(&[("plate", Value::from("CAR-9"))]))
        .unwrap();

    assert_eq!(loaded.model_name(), "Vehicle");
    assert_eq!(loaded.read("wheels").unwrap(), Some(&Value::Integer(4)));
    assert_eq!(loaded.read("plate").unwrap(), Some(&Value::from("CAR-9")));
}

#[test]
fn discriminator_outside_hierarchy_is_rejected() {
    let registry = registry();

    let err = registry
        .hydrate(
            "Truck",
            record(&[(DISCRIMINATOR_ATTRIBUTE, Value::from("Bike"))]),
        )
        .expect_err("a bike is not a truck");
    assert_eq!(
        err,
        AttributeError::NotASubtype {
            model: "Bike".to_string(),
            base: "Truck".to_string(),
        }
    );
    assert_eq!(err.kind(), ErrorKind::Registry);

    let err = registry
        .hydrate(
            "Vehicle",
            record(&[(DISCRIMINATOR_ATTRIBUTE, Value::from("Invoice"))]),
        )
        .expect_err("an invoice is not a vehicle");
    assert!(matches!(err, AttributeError::NotASubtype { .. }));
}

#[test]
fn unregistered_discriminator_is_rejected() {
    let registry = registry();
    let err = registry
        .hydrate(
            "Vehicle",
            record(&[(DISCRIMINATOR_ATTRIBUTE, Value::from("Boat"))]),
        )
        .expect_err("boat is not registered");
    assert_eq!(err, AttributeError::UnknownModel("Boat".to_string()));
}

#[test]
fn hydrated_values_are_trusted_but_later_writes_are_checked() {
    let registry = registry();
    let mut vehicle = registry
        .hydrate("Vehicle", record(&[("wheels", Value::from("six"))]))
        .unwrap();

    assert_eq!(vehicle.read("wheels").unwrap(), Some(&Value::from("six")));
    assert!(vehicle.set("wheels", "seven").is_err());
    assert!(vehicle.set("wheels", 6).unwrap());
    assert_eq!(vehicle.changed_names().collect::<Vec<_>>(), vec!["wheels"]);
}
