//! Interactive mode for the server.
//!
//! Prompts for bind address, port and default year before starting the
//! server.

use dialoguer::{Confirm, Input};
use edustats_school_models::DEFAULT_REPORTING_YEAR;

/// Runs the server in interactive mode, prompting for configuration.
///
/// Asks for a bind address, port and default year, sets the corresponding
/// environment variables (`BIND_ADDR`, `PORT`, `EDUSTATS_DEFAULT_YEAR`),
/// and delegates to [`super::run_server`].
///
/// # Errors
///
/// Returns an `std::io::Result` error if the underlying server fails to
/// start.
#[allow(clippy::future_not_send)]
pub async fn run() -> std::io::Result<()> {
    println!("EduStats Server");
    println!();

    let bind_addr: String = Input::new()
        .with_prompt("Bind address")
        .default("127.0.0.1".to_string())
        .interact_text()
        .unwrap_or_else(|_| "127.0.0.1".to_string());

    let port: u16 = Input::new()
        .with_prompt("Port")
        .default(8080)
        .interact_text()
        .unwrap_or(8080);

    let default_year: i32 = Input::new()
        .with_prompt("Default year")
        .default(DEFAULT_REPORTING_YEAR)
        .interact_text()
        .unwrap_or(DEFAULT_REPORTING_YEAR);

    // SAFETY: no other threads exist yet and the variables are read once
    // during server startup.
    unsafe {
        std::env::set_var("BIND_ADDR", &bind_addr);
        std::env::set_var("PORT", port.to_string());
        std::env::set_var("EDUSTATS_DEFAULT_YEAR", default_year.to_string());
    }

    if !Confirm::new()
        .with_prompt(format!("Start server on {bind_addr}:{port}?"))
        .default(true)
        .interact()
        .unwrap_or(true)
    {
        println!("Cancelled.");
        return Ok(());
    }

    super::run_server().await
}
