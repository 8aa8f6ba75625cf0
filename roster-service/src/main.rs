use roster_service::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load()?;
    init_tracing(&config)?;

    #[cfg(feature = "database")]
    if let Some(ref database) = config.database {
        let pool = roster_service::database::create_pool(database).await?;
        let store = PgStudentStore::new(pool);
        if config.roster.seed_sample_data {
            store.seed_sample_roster().await?;
        }
        return serve(config, store).await;
    }

    #[cfg(not(feature = "database"))]
    if config.database.is_some() {
        tracing::warn!("Database configured but the `database` feature is disabled; using the in-memory store");
    }

    let store = if config.roster.seed_sample_data {
        InMemoryStudentStore::with_sample_roster()
    } else {
        InMemoryStudentStore::new()
    };
    serve(config, store).await
}

async fn serve<S>(config: Config, store: S) -> Result<()>
where
    S: StudentStore + Clone + 'static,
{
    let state = AppState::new(config.clone(), store);
    Server::new(config).serve(app(state)).await
}
