//! CLI 인터페이스 모듈 묶음.

pub mod command;
pub mod provision;

pub use command::{Cli, CliAction, ProvisionOptions};
pub use provision::run_provision;
