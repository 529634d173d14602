//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `attrkit_core` linkage with a small demo model hierarchy.
//! - Keep output deterministic for quick local sanity checks.

use attrkit_core::{
    init_logging, AttributeOptions, AttributeResult, LoggingConfig, ModelRegistry, Schema,
};
use log::warn;

fn main() {
    match LoggingConfig::from_env() {
        Ok(config) => {
            if let Err(err) = init_logging(&config) {
                eprintln!("attrkit logging disabled: {err}");
            }
        }
        Err(err) => eprintln!("attrkit logging disabled: {err}"),
    }

    println!("attrkit_core version={}", attrkit_core::core_version());
    if let Err(err) = run_demo() {
        warn!("event=cli_demo module=cli status=error error={err}");
        eprintln!("demo failed: {err}");
        std::process::exit(1);
    }
}

fn run_demo() -> AttributeResult<()> {
    let mut user = Schema::root("User")?;
    user.declare("name", "string", AttributeOptions::new())?;
    user.declare("age", "integer", AttributeOptions::new().with_default(0))?;
    let mut admin = user.derive("Admin")?;
    admin.declare("since", "timestamp", AttributeOptions::new())?;

    let mut registry = ModelRegistry::new();
    registry.register(user)?;
    registry.register(admin)?;

    for name in registry.model_names() {
        if let Some(schema) = registry.get(&name) {
            let attributes = schema.attribute_names().collect::<Vec<_>>().join(",");
            println!("model={name} attributes={attributes}");
        }
    }

    let mut instance = registry.instantiate("Admin")?;
    instance.set("age", 42)?;
    instance.apply_discriminator();
    let changed = instance.changed_names().collect::<Vec<_>>().join(",");
    println!("admin changed={changed}");
    Ok(())
}
