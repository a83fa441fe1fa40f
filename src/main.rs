//! `sbhost` 바이너리 진입점.

use sbhost::application::usecases::inspect_config::SettingsReadiness;
use sbhost::interface::cli::{Cli, CliAction, run_provision};
use sbhost::interface::composition::AppComposition;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .init();

    let action = Cli::parse_action();
    let composition = AppComposition::default();

    match action {
        CliAction::InspectConfig => match composition.inspect_config_usecase().execute() {
            Ok(SettingsReadiness::Ready) => {}
            Ok(SettingsReadiness::Incomplete(_)) => std::process::exit(1),
            Err(err) => {
                eprintln!("error: {err:#}");
                std::process::exit(1);
            }
        },
        CliAction::Provision(options) => {
            // 설정 스냅샷은 프로세스 시작 시 한 번만 만든다.
            let settings = match composition.load_bus_settings() {
                Ok(settings) => settings,
                Err(err) => {
                    eprintln!("error: {err:#}");
                    std::process::exit(1);
                }
            };

            if let Err(err) = run_provision(&composition, &settings, options).await {
                eprintln!("error: {err:#}");
                std::process::exit(1);
            }
        }
    }
}
