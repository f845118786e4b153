use shortfront::{
    configuration::get_configuration,
    startup::Application,
    telemetry::{TelemetryGuard, get_subscriber, init_subscriber},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let configuration = get_configuration()?;

    let subscriber = get_subscriber(
        "shortfront".into(),
        "info".into(),
        configuration.telemetry.otlp_endpoint.clone(),
        std::io::stdout,
    )?;
    init_subscriber(subscriber);
    let _telemetry = TelemetryGuard::new();

    let application = Application::build(configuration).await?;
    application.run_until_stopped().await?;
    Ok(())
}
