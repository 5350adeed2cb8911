//! Application configuration management.

use serde::Deserialize;

/// Billing engine configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct BillingConfig {
    /// Invoice run configuration.
    pub run: RunConfig,
    /// Invoice defaults applied when a lease's billing setting is silent.
    pub invoice: InvoiceConfig,
}

/// Invoice run configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct RunConfig {
    /// Maximum number of leases assembled concurrently in a batch run.
    #[serde(default = "default_worker_count")]
    pub worker_count: usize,
}

fn default_worker_count() -> usize {
    8
}

/// Invoice defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct InvoiceConfig {
    /// Payment-term days used when a billing setting carries none.
    #[serde(default = "default_payment_term_days")]
    pub default_payment_term_days: u16,
    /// Invoice number prefix used when a billing setting carries none.
    #[serde(default = "default_invoice_prefix")]
    pub default_number_prefix: String,
}

fn default_payment_term_days() -> u16 {
    14
}

fn default_invoice_prefix() -> String {
    "INV".to_string()
}

impl BillingConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();

        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(
                config::Environment::with_prefix("RENTORA")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?;

        config.try_deserialize()
    }
}

impl Default for BillingConfig {
    fn default() -> Self {
        Self {
            run: RunConfig {
                worker_count: default_worker_count(),
            },
            invoice: InvoiceConfig {
                default_payment_term_days: default_payment_term_days(),
                default_number_prefix: default_invoice_prefix(),
            },
        }
    }
}
