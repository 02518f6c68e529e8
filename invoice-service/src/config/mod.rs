use crate::error::AppError;
use config::{Config as Cfg, File};
use serde::Deserialize;
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize)]
pub struct InvoiceServiceConfig {
    #[serde(flatten)]
    pub common: CommonConfig,
    pub smtp: SmtpConfig,
    pub company: CompanyConfig,
    pub invoicing: InvoicingConfig,
}

/// Common server settings, overridable via `APP__`-prefixed environment
/// variables or an optional `configuration` file.
#[derive(Debug, Clone, Deserialize)]
pub struct CommonConfig {
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_port() -> u16 {
    8080
}

#[derive(Debug, Clone, Deserialize)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub from_email: String,
    pub from_name: String,
    pub enabled: bool,
}

/// Seller identity printed on invoices and emails.
#[derive(Debug, Clone, Deserialize)]
pub struct CompanyConfig {
    pub name: String,
    pub email: String,
    pub address: String,
    pub city: String,
    pub website: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InvoicingConfig {
    /// Location of the persisted invoice counter record.
    pub counter_path: PathBuf,
    /// Internal mailbox that receives a best-effort copy of every invoice.
    pub internal_copy_email: String,
}

impl CommonConfig {
    pub fn load() -> Result<Self, AppError> {
        let config = Cfg::builder()
            .add_source(File::with_name("configuration").required(false))
            .add_source(config::Environment::with_prefix("APP").separator("__"))
            .build()?;

        Ok(config.try_deserialize()?)
    }
}

impl InvoiceServiceConfig {
    pub fn load() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let common = CommonConfig::load()?;
        let is_prod = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string()) == "prod";

        Ok(InvoiceServiceConfig {
            common,
            smtp: SmtpConfig {
                host: get_env("SMTP_HOST", Some("smtp.gmail.com"), is_prod)?,
                port: get_env("SMTP_PORT", Some("587"), is_prod)?
                    .parse()
                    .unwrap_or(587),
                user: get_env("SMTP_USER", Some(""), is_prod)?,
                password: get_env("SMTP_PASSWORD", Some(""), is_prod)?,
                from_email: get_env("SMTP_FROM_EMAIL", Some("info@pecto.at"), is_prod)?,
                from_name: get_env("SMTP_FROM_NAME", Some("PECTO"), is_prod)?,
                enabled: env::var("SMTP_ENABLED")
                    .unwrap_or_else(|_| "false".to_string())
                    .parse()
                    .unwrap_or(false),
            },
            company: CompanyConfig {
                name: get_env("COMPANY_NAME", Some("PECTO e.U."), is_prod)?,
                email: get_env("COMPANY_EMAIL", Some("info@pecto.at"), is_prod)?,
                address: get_env("COMPANY_ADDRESS", Some("In der Wiesen 13/1/16"), is_prod)?,
                city: get_env("COMPANY_CITY", Some("1230 Wien"), is_prod)?,
                website: get_env("COMPANY_WEBSITE", Some("www.pecto.at"), is_prod)?,
            },
            invoicing: InvoicingConfig {
                counter_path: get_env("INVOICE_COUNTER_PATH", Some("invoice-counter.json"), is_prod)?
                    .into(),
                internal_copy_email: get_env(
                    "INVOICE_COPY_EMAIL",
                    Some("buchhaltung@pecto.at"),
                    is_prod,
                )?,
            },
        })
    }
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required in production but not set",
                    key
                )))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required but not set",
                    key
                )))
            }
        }
    }
}
