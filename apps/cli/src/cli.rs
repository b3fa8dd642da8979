//! Command-line interface: argument definitions and command dispatch.

use anyhow::bail;
use clap::{Parser, Subcommand};
use serde_json::{json, Value};
use tally_core::{CreateInvoiceRequest, LineItemRequest, PaymentMethod};
use tally_db::Database;

use crate::seed;

#[derive(Debug, Parser)]
#[command(name = "tally")]
#[command(about = "Invoice engine: stock-checked, atomically numbered invoices")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Insert demo products into an empty catalog
    Seed {
        /// Number of products to generate
        #[arg(short, long, default_value = "50")]
        count: usize,
    },

    /// List catalog products
    Products {
        #[arg(short, long, default_value = "50")]
        limit: u32,
    },

    /// Create an invoice
    CreateInvoice {
        /// Line item as PRODUCT_ID:QUANTITY (repeatable)
        #[arg(short, long = "item", value_parser = parse_item, required = true)]
        items: Vec<LineItemRequest>,

        /// Customer name (default: Walk-in Customer)
        #[arg(short, long)]
        customer: Option<String>,

        #[arg(short, long)]
        notes: Option<String>,

        /// Payment method: cash, card or upi
        #[arg(short, long)]
        method: Option<PaymentMethod>,

        /// Mark the invoice paid (requires --method)
        #[arg(long)]
        paid: bool,
    },

    /// Show one invoice by id or invoice number
    ShowInvoice {
        /// Invoice id or number (INV-YYYYMM-NNNN)
        key: String,
    },

    /// List invoices, newest first
    Invoices {
        #[arg(short, long, default_value = "20")]
        limit: u32,
    },
}

/// Parses `PRODUCT_ID:QUANTITY`.
pub fn parse_item(raw: &str) -> Result<LineItemRequest, String> {
    let (product_id, quantity) = raw
        .rsplit_once(':')
        .ok_or_else(|| format!("expected PRODUCT_ID:QUANTITY, got '{raw}'"))?;

    let product_id = product_id.trim();
    if product_id.is_empty() {
        return Err(format!("missing product id in '{raw}'"));
    }

    let quantity: i64 = quantity
        .trim()
        .parse()
        .map_err(|_| format!("invalid quantity in '{raw}'"))?;

    Ok(LineItemRequest::new(product_id, quantity))
}

/// Runs one command and returns its JSON output.
pub async fn run(command: Command, db: &Database) -> anyhow::Result<Value> {
    let output = match command {
        Command::Seed { count } => json!(seed::seed(db, count).await?),

        Command::Products { limit } => json!(db.products().list(limit).await?),

        Command::CreateInvoice {
            items,
            customer,
            notes,
            method,
            paid,
        } => {
            let mut request = CreateInvoiceRequest::new(items);
            request.customer_name = customer;
            request.notes = notes;
            request.payment_method = method;
            request.mark_as_paid = paid;

            json!(db.invoice_engine().create_invoice(request).await?)
        }

        Command::ShowInvoice { key } => {
            let key = key.trim();
            let invoices = db.invoices();

            let found = match invoices.get_by_number(key).await? {
                Some(invoice) => Some(invoice),
                None => invoices.get_by_id(key).await?,
            };

            match found {
                Some(invoice) => json!(invoice),
                None => bail!("Invoice not found: {key}"),
            }
        }

        Command::Invoices { limit } => json!(db.invoices().list(limit).await?),
    };

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use tally_core::Product;
    use tally_db::DbConfig;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_item() {
        assert_eq!(parse_item("abc-123:4").unwrap(), LineItemRequest::new("abc-123", 4));
        assert_eq!(parse_item(" p1 : 2 ").unwrap(), LineItemRequest::new("p1", 2));

        assert!(parse_item("p1").is_err());
        assert!(parse_item(":3").is_err());
        assert!(parse_item("p1:three").is_err());
    }

    #[test]
    fn test_parse_create_invoice_args() {
        let cli = Cli::try_parse_from([
            "tally",
            "create-invoice",
            "--item",
            "p1:3",
            "--item",
            "p2:1",
            "--method",
            "card",
            "--paid",
        ])
        .unwrap();

        match cli.command {
            Command::CreateInvoice {
                items, method, paid, ..
            } => {
                assert_eq!(items.len(), 2);
                assert_eq!(method, Some(PaymentMethod::Card));
                assert!(paid);
            }
            other => panic!("unexpected command: {other:?}"),
        }

        assert!(Cli::try_parse_from(["tally", "create-invoice"]).is_err());
        assert!(Cli::try_parse_from(["tally", "create-invoice", "-i", "p1:1", "-m", "cheque"]).is_err());
    }

    #[tokio::test]
    async fn test_create_then_show_invoice() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let product = db
            .products()
            .insert(&Product::new("OFF-STA-001", "Stapler Single", 450, 4).unwrap())
            .await
            .unwrap();

        let created = run(
            Command::CreateInvoice {
                items: vec![LineItemRequest::new(&product.id, 1)],
                customer: Some("Acme Ltd".to_string()),
                notes: None,
                method: Some(PaymentMethod::Cash),
                paid: true,
            },
            &db,
        )
        .await
        .unwrap();

        assert_eq!(created["status"], "paid");
        let number = created["invoiceNumber"].as_str().unwrap().to_string();

        let shown = run(Command::ShowInvoice { key: number.clone() }, &db).await.unwrap();
        assert_eq!(shown["id"], created["id"]);

        let by_id = run(
            Command::ShowInvoice {
                key: created["id"].as_str().unwrap().to_string(),
            },
            &db,
        )
        .await
        .unwrap();
        assert_eq!(by_id["invoiceNumber"], number.as_str());

        let listed = run(Command::Invoices { limit: 10 }, &db).await.unwrap();
        assert_eq!(listed.as_array().unwrap().len(), 1);

        assert!(run(Command::ShowInvoice { key: "INV-000000-0000".to_string() }, &db)
            .await
            .is_err());
    }
}
