use invoice_service::config::{
    CommonConfig, CompanyConfig, InvoiceServiceConfig, InvoicingConfig, SmtpConfig,
};
use invoice_service::startup::Application;
use tempfile::TempDir;

pub struct TestApp {
    pub address: String,
    // Keeps the counter file alive for the lifetime of the test.
    _counter_dir: TempDir,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let counter_dir = tempfile::tempdir().expect("Failed to create temp dir");

        let config = InvoiceServiceConfig {
            // Port 0 = random port for testing
            common: CommonConfig { port: 0 },
            smtp: SmtpConfig {
                host: "smtp.test.local".to_string(),
                port: 587,
                user: "test".to_string(),
                password: "test".to_string(),
                from_email: "test@example.com".to_string(),
                from_name: "Test Service".to_string(),
                enabled: false, // Use mock
            },
            company: CompanyConfig {
                name: "PECTO e.U.".to_string(),
                email: "info@pecto.at".to_string(),
                address: "In der Wiesen 13/1/16".to_string(),
                city: "1230 Wien".to_string(),
                website: "www.pecto.at".to_string(),
            },
            invoicing: InvoicingConfig {
                counter_path: counter_dir.path().join("invoice-counter.json"),
                internal_copy_email: "buchhaltung@example.com".to_string(),
            },
        };

        let app = Application::build(config)
            .await
            .expect("Failed to build test application");
        let address = format!("http://127.0.0.1:{}", app.port());

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        Self {
            address,
            _counter_dir: counter_dir,
        }
    }
}
