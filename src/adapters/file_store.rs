//! File-backed certificate collection.
//!
//! Reads PEM bundles, single DER certificates, or directories of either.
//! Files are parsed on the first query; read and parse failures surface as
//! [`QueryError`] so callers see them through the resolver.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use der::Decode;
use parking_lot::Mutex;
use x509_cert::Certificate;

use crate::domain::collection::CertificateCollection;
use crate::domain::selector::CertSelector;
use crate::domain::x509::CertificateView;
use crate::infra::error::{InspectorError, InspectorResult, QueryError};

const PEM_PREAMBLE: &[u8] = b"-----BEGIN";

/// Extensions picked up when a directory is listed.
const CERT_FILE_EXTENSIONS: &[&str] = &["pem", "crt", "cer", "der"];

/// Parse every certificate in a PEM bundle or a single DER certificate.
pub fn parse_certificates(bytes: &[u8]) -> InspectorResult<Vec<CertificateView>> {
    let certificates = if let Some(armor) = pem_armor(bytes) {
        Certificate::load_pem_chain(armor)?
    } else {
        vec![Certificate::from_der(bytes)?]
    };
    if certificates.is_empty() {
        return Err(InspectorError::InvalidCertificate(
            "No certificates found in PEM input".to_string(),
        ));
    }
    certificates
        .into_iter()
        .map(CertificateView::from_x509)
        .collect()
}

/// Load the certificates of one file.
pub fn load_certificates(path: &Path) -> InspectorResult<Vec<CertificateView>> {
    let bytes = fs::read(path).map_err(|e| {
        InspectorError::IoError(format!("Failed to read {}: {e}", path.display()))
    })?;
    let certs = parse_certificates(&bytes).map_err(|e| match e {
        InspectorError::Asn1Error(msg) | InspectorError::InvalidCertificate(msg) => {
            InspectorError::InvalidCertificate(format!("{}: {msg}", path.display()))
        }
        other => other,
    })?;
    log::debug!("Loaded {} certificate(s) from {}", certs.len(), path.display());
    Ok(certs)
}

/// The PEM armor of `bytes` without surrounding whitespace, or `None` when
/// the input is not PEM. `load_pem_chain` rejects leading indentation.
fn pem_armor(bytes: &[u8]) -> Option<&[u8]> {
    let start = bytes.iter().position(|b| !b.is_ascii_whitespace())?;
    let end = bytes.iter().rposition(|b| !b.is_ascii_whitespace())? + 1;
    let armor = &bytes[start..end];
    armor.starts_with(PEM_PREAMBLE).then_some(armor)
}

fn is_cert_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            CERT_FILE_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
}

/// Expand directories into their certificate files, sorted by name so the
/// collection order is reproducible.
fn expand_paths(paths: &[PathBuf]) -> InspectorResult<Vec<PathBuf>> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            let mut entries = Vec::new();
            for entry in fs::read_dir(path)? {
                let entry_path = entry?.path();
                if entry_path.is_file() && is_cert_file(&entry_path) {
                    entries.push(entry_path);
                }
            }
            entries.sort();
            files.extend(entries);
        } else {
            files.push(path.clone());
        }
    }
    Ok(files)
}

/// Certificates loaded from a list of files and directories, in list order.
///
/// The parsed snapshot is kept after the first successful query, so every
/// later query sees the same certificates in the same order.
pub struct FileCertStore {
    paths: Vec<PathBuf>,
    loaded: Mutex<Option<Arc<[Arc<CertificateView>]>>>,
}

impl FileCertStore {
    #[must_use]
    pub fn new(paths: Vec<PathBuf>) -> Self {
        Self {
            paths,
            loaded: Mutex::new(None),
        }
    }

    #[must_use]
    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    fn snapshot(&self) -> InspectorResult<Arc<[Arc<CertificateView>]>> {
        let mut loaded = self.loaded.lock();
        if let Some(certs) = loaded.as_ref() {
            return Ok(Arc::clone(certs));
        }

        let mut certs = Vec::new();
        for file in expand_paths(&self.paths)? {
            certs.extend(load_certificates(&file)?.into_iter().map(Arc::new));
        }
        log::info!(
            "Loaded {} certificate(s) from {} path(s)",
            certs.len(),
            self.paths.len()
        );
        let certs: Arc<[Arc<CertificateView>]> = certs.into();
        *loaded = Some(Arc::clone(&certs));
        Ok(certs)
    }
}

impl CertificateCollection for FileCertStore {
    fn query(&self, selector: &CertSelector) -> Result<Vec<Arc<CertificateView>>, QueryError> {
        let certs = self.snapshot()?;
        Ok(certs
            .iter()
            .filter(|cert| selector.matches(cert))
            .cloned()
            .collect())
    }
}

impl std::fmt::Debug for FileCertStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileCertStore")
            .field("paths", &self.paths)
            .field("loaded", &self.loaded.lock().as_ref().map(|c| c.len()))
            .finish()
    }
}
