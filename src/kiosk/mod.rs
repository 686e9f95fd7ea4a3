pub mod controller;
pub mod session;
pub mod timer;

use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

use crate::core::state::AppState;
use controller::ScanController;

/// Run the attached kiosk: one line of stdin per interaction.
///
/// A line starting with ':' is a mode command (":entrada", ":salida",
/// ":clase 1"); anything else is treated as a scanned code, exactly as a
/// keyboard-wedge scanner delivers it.
pub async fn run(state: Arc<AppState>) -> Result<()> {
    let controller = ScanController::new(state);
    let _status_task = controller.spawn_status_task();

    info!("Kiosk loop started");
    println!("{}", controller.current_status());

    let stdin = BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();

    while let Some(line) = lines
        .next_line()
        .await
        .context("Failed to read from kiosk input")?
    {
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        if let Some(command) = input.strip_prefix(':') {
            println!("{}", controller.switch_mode(command.trim()));
        } else {
            let feedback = controller.handle_scan(input).await;
            println!("{}", feedback);
        }
    }

    info!("Kiosk input closed, stopping loop");
    Ok(())
}
