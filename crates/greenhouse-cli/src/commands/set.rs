//! Set command implementation.

use anyhow::{Result, anyhow};
use tracing::info;

use greenhouse_core::Gateway;
use greenhouse_types::{Actuator, ActuatorCommand};

use crate::format::{command_failed_message, command_sent_message};
use crate::style;

/// Send one actuator command and print the outcome.
///
/// Out-of-range values are rejected before any request is made.
pub async fn cmd_set<G: Gateway + ?Sized>(
    gateway: &G,
    actuator: Actuator,
    value: u32,
    quiet: bool,
    no_color: bool,
) -> Result<()> {
    let command = ActuatorCommand::new(actuator, value)?;
    info!(%command, gateway = %gateway.describe(), "Sending actuator command");

    match gateway.send_command(command).await {
        Ok(()) => {
            if !quiet {
                println!(
                    "{}",
                    style::format_success(&command_sent_message(&command), no_color)
                );
            }
            Ok(())
        }
        Err(e) => Err(anyhow!(command_failed_message(&command, &e.user_message()))),
    }
}
