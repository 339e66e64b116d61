//! Reads a sales transaction back from Twinfield.
//!
//! Run with `TWINFIELD_USER`, `TWINFIELD_PASSWORD` and `TWINFIELD_ORGANISATION` set:
//!
//! ```sh
//! cargo run --example get_transaction -- 001 SLS 201300095
//! ```

#[macro_use]
extern crate tracing;

use anyhow::{Context, Result};
use twinfield_rs::{Client, Credentials, TransactionKind};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let mut args = std::env::args().skip(1);
    let office = args.next().unwrap_or_else(|| "001".to_string());
    let code = args.next().unwrap_or_else(|| "SLS".to_string());
    let number: u64 = args
        .next()
        .context("usage: get_transaction <office> <code> <number>")?
        .parse()?;

    let credentials = Credentials::from_env().context("Twinfield credentials not set")?;
    let client = Client::login(&credentials).await?;

    let transactions = client
        .transactions()
        .get(TransactionKind::Sales, &code, number, &office)
        .await?;

    for transaction in &transactions {
        info!(
            "{} {:?} in {:?}: {} lines",
            code,
            transaction.number,
            transaction.period.map(|period| period.to_string()),
            transaction.lines.len()
        );
        for line in &transaction.lines {
            info!(
                "  {} {} {:?} {:?}",
                line.id, line.line_type, line.dim1, line.signed_value()
            );
        }
    }

    Ok(())
}
