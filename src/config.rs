//! Carga y gestión de configuración de la aplicación.

use std::env;
use std::path::PathBuf;

use anyhow::Result;

/// Configuración completa de la aplicación.
///
/// La ruta de la ontología es relativa al directorio de trabajo del proceso,
/// igual que el `kelas.owl` original.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub ontology_path: PathBuf,
    pub server_addr: String,
}

impl AppConfig {
    /// Carga la configuración desde variables de entorno (usando .env si existe).
    pub fn from_env() -> Result<Self> {
        let ontology_path = env::var("ONTOLOGY_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("kelas.owl"));

        let server_addr =
            env::var("SERVER_ADDR").unwrap_or_else(|_| "127.0.0.1:3322".to_string());

        Ok(Self {
            ontology_path,
            server_addr,
        })
    }
}
