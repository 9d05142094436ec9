use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::fractal::params::Parameters;

/// Erreurs de lecture ou d'écriture d'un fichier de réglages.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("accès au fichier de réglages impossible : {0}")]
    Io(#[from] std::io::Error),
    #[error("réglages illisibles : {0}")]
    Format(#[from] serde_json::Error),
}

/// Charge un instantané de paramètres depuis un fichier JSON et
/// l'assainit avant de le retourner.
pub fn load(path: &Path) -> Result<Parameters, SettingsError> {
    let text = fs::read_to_string(path)?;
    let mut params: Parameters = serde_json::from_str(&text)?;
    params.sanitize();
    Ok(params)
}

/// Enregistre un instantané de paramètres au format JSON indenté.
pub fn save(params: &Parameters, path: &Path) -> Result<(), SettingsError> {
    let text = serde_json::to_string_pretty(params)?;
    fs::write(path, text)?;
    Ok(())
}
