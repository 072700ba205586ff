//! # Customer Commands
//!
//! Registration goes through the customer form first, so a retail customer
//! is asked for a CPF and a wholesale one for a CNPJ before anything is sent.
//!
//! ```text
//! --modality wholesale --document 11.222.333/0001-81
//!        │
//!        ▼
//! FormValues { modality: WHOLESALE, cnpj: 11.222.333/0001-81, ... }
//!        │
//!        ▼
//! customer_form().validate ──fail──► "Dados inválidos" (no request)
//!        │ ok
//!        ▼
//! POST /customers
//! ```

use clap::{Args, Subcommand};

use sapore_core::fields::{customer_form, FormValues};
use sapore_core::{Customer, CustomerModality};

use crate::error::CommandResult;
use crate::output::{clip, listing, or_dash, CommandOutput};
use crate::state::AppContext;

#[derive(Debug, Subcommand)]
pub enum CustomerCommand {
    /// List every customer
    List,
    /// Show one customer
    Show { id: String },
    /// Register a customer
    Create(CustomerArgs),
    /// Replace a customer's data
    Update {
        id: String,
        #[command(flatten)]
        customer: CustomerArgs,
    },
    /// Remove a customer
    Delete { id: String },
}

#[derive(Debug, Clone, Args)]
pub struct CustomerArgs {
    #[arg(long)]
    pub name: String,

    #[arg(long, default_value = "retail", help = "retail (varejo) or wholesale (atacado)")]
    pub modality: CustomerModality,

    #[arg(long, help = "CPF for retail customers, CNPJ for wholesale ones")]
    pub document: String,

    #[arg(long)]
    pub phone: Option<String>,

    #[arg(long)]
    pub email: Option<String>,

    #[arg(long)]
    pub address: Option<String>,
}

impl CustomerArgs {
    /// The values the registration form would hold.
    pub fn form_values(&self) -> FormValues {
        let (modality, document_field) = match self.modality {
            CustomerModality::Retail => ("RETAIL", "cpf"),
            CustomerModality::Wholesale => ("WHOLESALE", "cnpj"),
        };

        let mut values = FormValues::new();
        values.insert("name".into(), self.name.clone());
        values.insert("modality".into(), modality.into());
        values.insert(document_field.into(), self.document.clone());
        for (key, value) in [
            ("phone", &self.phone),
            ("email", &self.email),
            ("address", &self.address),
        ] {
            if let Some(v) = value {
                values.insert(key.into(), v.clone());
            }
        }
        values
    }

    pub fn into_customer(self, id: Option<String>) -> CommandResult<Customer> {
        customer_form().validate(&self.form_values())?;

        let blank_to_none = |s: Option<String>| s.filter(|v| !v.trim().is_empty());
        Ok(Customer {
            id,
            name: self.name.trim().to_string(),
            document: self.document.trim().to_string(),
            phone: blank_to_none(self.phone),
            email: blank_to_none(self.email),
            address: blank_to_none(self.address),
            modality: self.modality,
        })
    }
}

fn describe(c: &Customer) -> String {
    format!(
        "{}\nModalidade: {}\nDocumento: {}\nTelefone: {}\nE-mail: {}\nEndereço: {}",
        c.name,
        c.modality.label(),
        c.document,
        or_dash(c.phone.as_deref()),
        or_dash(c.email.as_deref()),
        or_dash(c.address.as_deref()),
    )
}

pub async fn run(ctx: &AppContext, command: CustomerCommand) -> CommandResult<CommandOutput> {
    ctx.require_user()?;

    match command {
        CustomerCommand::List => {
            let customers = ctx.client.list_customers().await?;
            let text = listing("Clientes", &customers, |c| {
                format!(
                    "{:>6}  {:<32} {:<8} {}",
                    or_dash(c.id.as_deref()),
                    clip(&c.name, 32),
                    c.modality.label(),
                    c.document
                )
            });
            CommandOutput::new(text, &customers)
        }
        CustomerCommand::Show { id } => {
            let customer = ctx.client.get_customer(&id).await?;
            CommandOutput::new(describe(&customer), &customer)
        }
        CustomerCommand::Create(args) => {
            let customer = args.into_customer(None)?;
            let created = ctx.client.create_customer(&customer).await?;
            let text = format!(
                "Cliente {} cadastrado ({}).",
                created.name,
                or_dash(created.id.as_deref())
            );
            CommandOutput::new(text, &created)
        }
        CustomerCommand::Update { id, customer } => {
            let customer = customer.into_customer(Some(id.clone()))?;
            let updated = ctx.client.update_customer(&id, &customer).await?;
            CommandOutput::new(format!("Cliente {} atualizado.", updated.name), &updated)
        }
        CustomerCommand::Delete { id } => {
            ctx.client.delete_customer(&id).await?;
            Ok(CommandOutput::message(format!("Cliente {} removido.", id)))
        }
    }
}
