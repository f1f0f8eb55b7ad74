use std::sync::{Arc, Mutex};

use tokio::sync::oneshot;

use crate::{config::AppConfig, sparql::OntologyGateway};

/// Estado compartido entre handlers.
///
/// El gateway es un handle sin estado mutable: se construye una sola vez al
/// arrancar y cada petición vuelve a leer y parsear la ontología por su cuenta.
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub gateway: Arc<OntologyGateway>,
    pub shutdown_sender: Arc<Mutex<Option<oneshot::Sender<()>>>>,
}
