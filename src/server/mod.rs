pub mod api;

use crate::config::TlsSettings;
use crate::webhook::Dispatcher;
use std::error::Error;
use std::net::SocketAddr;
use std::sync::Arc;
use log::info;

pub struct Server {
    addr: SocketAddr,
    dispatcher: Arc<Dispatcher>,
    tls: Option<TlsSettings>,
}

impl Server {
    pub fn new(addr: SocketAddr, dispatcher: Arc<Dispatcher>, tls: Option<TlsSettings>) -> Self {
        Self { addr, dispatcher, tls }
    }

    pub async fn run(&self) -> Result<(), Box<dyn Error + Send + Sync>> {
        let addr = self.addr;
        let app = api::router(Arc::clone(&self.dispatcher));

        match &self.tls {
            Some(tls) => {
                info!(
                    "TLS enabled. Loading certificate from '{}' and key from '{}'",
                    tls.cert_path,
                    tls.key_path
                );
                let _ = rustls::crypto::ring::default_provider().install_default();
                let tls_config = axum_server::tls_rustls::RustlsConfig::from_pem_file(
                    &tls.cert_path,
                    &tls.key_path
                ).await?;

                info!("Webhook server listening on: https://{}", addr);
                axum_server::bind_rustls(addr, tls_config)
                    .serve(app.into_make_service())
                    .await?;
            }
            None => {
                let listener = tokio::net::TcpListener::bind(addr).await?;
                info!("Webhook server listening on: http://{}", addr);
                axum::serve(listener, app.into_make_service()).await?;
            }
        }

        Ok(())
    }
}
