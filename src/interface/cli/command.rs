//! CLI 명령 파싱 모듈.

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "sbhost")]
#[command(about = "Resolve Service Bus host settings and provision a message bus")]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Show effective merged config without secrets
    Config,
    /// Resolve host settings and build a bus for the given service
    Provision {
        /// Logical service name (e.g. "Order Service")
        service_name: String,

        /// Receive endpoint queue to declare (repeatable)
        #[arg(long = "queue")]
        queues: Vec<String>,

        /// Prefetch count for declared receive endpoints
        #[arg(long)]
        prefetch: Option<u16>,

        /// Run the start/stop lifecycle after provisioning
        #[arg(long)]
        start: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionOptions {
    pub service_name: String,
    pub queues: Vec<String>,
    pub prefetch_count: Option<u16>,
    pub start: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliAction {
    InspectConfig,
    Provision(ProvisionOptions),
}

impl Cli {
    pub fn parse_action() -> CliAction {
        Cli::parse().into_action()
    }

    fn into_action(self) -> CliAction {
        match self.command {
            Commands::Config => CliAction::InspectConfig,
            Commands::Provision {
                service_name,
                queues,
                prefetch,
                start,
            } => CliAction::Provision(ProvisionOptions {
                service_name,
                queues,
                prefetch_count: prefetch,
                start,
            }),
        }
    }
}
