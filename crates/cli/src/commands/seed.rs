use crate::commands::{async_runtime, load_config, CommandResult};
use kilo_core::domain::store::StoreId;
use kilo_db::{connect_with_config, migrations, KnowledgeSeedDataset, SeedResult};
use serde_json::json;

pub fn run(store_id: i64) -> CommandResult {
    let config = match load_config("seed") {
        Ok(config) => config,
        Err(failure) => return failure,
    };
    let runtime = match async_runtime("seed") {
        Ok(runtime) => runtime,
        Err(failure) => return failure,
    };
    let store_id = StoreId(store_id);

    let result = runtime.block_on(async {
        let pool = connect_with_config(&config.database)
            .await
            .map_err(|error| ("db_connectivity", error.to_string(), 4u8))?;

        migrations::run_pending(&pool)
            .await
            .map_err(|error| ("migration", error.to_string(), 5u8))?;

        let seed_result = KnowledgeSeedDataset::load(&pool, store_id)
            .await
            .map_err(|error| ("seed_execution", error.to_string(), 5u8))?;

        let verification = KnowledgeSeedDataset::verify(&pool, store_id)
            .await
            .map_err(|error| ("seed_verification", error.to_string(), 6u8))?;

        pool.close().await;

        if verification.all_present {
            Ok(seed_result)
        } else {
            Err(("seed_verification", verification_failure_message(&verification.checks), 6u8))
        }
    });

    match result {
        Ok(seed_result) => CommandResult::success_with_data(
            "seed",
            format!("knowledge base seeded for store {}", seed_result.store_id),
            Some(summary(&seed_result)),
        ),
        Err((error_class, message, exit_code)) => {
            CommandResult::failure("seed", error_class, message, exit_code)
        }
    }
}

fn summary(seed_result: &SeedResult) -> serde_json::Value {
    json!({
        "store_id": seed_result.store_id,
        "inserted": seed_result.inserted,
        "already_present": seed_result.already_present,
    })
}

fn verification_failure_message(checks: &[(&'static str, bool)]) -> String {
    let failed_checks =
        checks.iter().filter_map(|(check, passed)| (!passed).then_some(*check)).collect::<Vec<_>>();
    if failed_checks.is_empty() {
        "Some knowledge documents failed to load".to_string()
    } else {
        format!("Seed verification failed for documents: {}", failed_checks.join(", "))
    }
}
