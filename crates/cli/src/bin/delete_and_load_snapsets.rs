use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    snapset_cli::main_entry().await
}
