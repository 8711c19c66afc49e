mod settings;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let settings = settings::Settings::new()?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "saldo={level},server={level},engine={level}",
            level = settings.app.level
        ))
        .init();

    let engine = engine::Engine::builder().build().await?;
    let addr = settings.address();
    tracing::info!(
        series_months = settings.reports.series_months,
        include_unpaid = settings.reports.include_unpaid_in_balance,
        "starting server on {addr}"
    );

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    server::run_with_listener(engine, settings.report_settings(), listener).await?;

    Ok(())
}
