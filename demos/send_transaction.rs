//! Sends a temporary sales transaction to Twinfield.

#[macro_use]
extern crate tracing;

use anyhow::{Context, Result};
use rust_decimal_macros::dec;
use time::OffsetDateTime;
use twinfield_rs::{
    Client, Credentials, DebitCredit, Destiny, LineType, Transaction, TransactionLine,
};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let office = std::env::var("TWINFIELD_OFFICE").unwrap_or_else(|_| "001".to_string());
    let credentials = Credentials::from_env().context("Twinfield credentials not set")?;
    let client = Client::login(&credentials).await?;

    let today = OffsetDateTime::now_utc().date();
    let mut transaction = Transaction::sales();
    transaction.destiny = Some(Destiny::Temporary);
    transaction.raise_warning = Some(false);
    transaction.office = Some(office);
    transaction.code = Some("SLS".to_string());
    transaction.currency = Some("EUR".to_string());
    transaction.date = Some(today);
    transaction.invoice_number = Some(format!("DEMO-{}", today.ordinal()));

    transaction
        .add_line(TransactionLine {
            dim1: Some("1300".to_string()),
            dim2: Some("1000".to_string()),
            value: Some(dec!(121.00)),
            debit_credit: Some(DebitCredit::Debit),
            ..TransactionLine::new(LineType::Total, "1")
        })?
        .add_line(TransactionLine {
            dim1: Some("8020".to_string()),
            value: Some(dec!(100.00)),
            debit_credit: Some(DebitCredit::Credit),
            description: Some("Outfit".to_string()),
            vat_code: Some("VH".to_string()),
            ..TransactionLine::new(LineType::Detail, "2")
        })?;

    match client.transactions().send(&[transaction]).await {
        Ok(response) => info!("transaction stored: {}", response.root().to_xml()?),
        Err(e) => {
            for message in e.messages() {
                error!("{}", message);
            }
            return Err(e.into());
        }
    }

    Ok(())
}
