//! `InspectWorkflow`: load a certificate collection, resolve its roles and
//! produce a report.

use std::fmt::Write as _;
use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;

use crate::adapters::file_store::FileCertStore;
use crate::domain::collection::CertificateCollection;
use crate::domain::roles::{Role, RoleSet, RoleSetSummary};
use crate::domain::selector::CertSelector;
use crate::domain::x509::{CertificateSummary, CertificateView};
use crate::infra::error::{InspectorError, InspectorResult, ResolveError};
use crate::services::resolution_cache::ResolutionCache;

/// Outcome of inspecting one collection.
#[derive(Debug, Clone, Serialize)]
pub struct InspectionReport {
    pub certificates: Vec<CertificateSummary>,
    pub roles: RoleSetSummary,
}

impl InspectionReport {
    fn new(certificates: &[Arc<CertificateView>], roles: &RoleSet) -> Self {
        Self {
            certificates: certificates.iter().map(|c| c.summary()).collect(),
            roles: roles.summary(),
        }
    }

    fn role(&self, role: Role) -> &CertificateSummary {
        match role {
            Role::Signer => &self.roles.signer,
            Role::Recipient => &self.roles.recipient,
            Role::Issuer => &self.roles.issuer,
        }
    }

    /// Human-readable rendering; `list_certificates` adds the full inventory.
    #[must_use]
    pub fn render_text(&self, list_certificates: bool) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "Collection contains {} certificate(s)",
            self.certificates.len()
        );
        if list_certificates {
            for (i, cert) in self.certificates.iter().enumerate() {
                let _ = writeln!(
                    out,
                    "  {}. {} [issuer={}; serial={}]{}",
                    i + 1,
                    cert.subject,
                    cert.issuer,
                    cert.serial_number,
                    if cert.is_ca { " (CA)" } else { "" }
                );
            }
        }
        for role in Role::ALL {
            let cert = self.role(role);
            let _ = writeln!(
                out,
                "{:<10} {} [issuer={}; serial={}]",
                format!("{role}:"),
                cert.subject,
                cert.issuer,
                cert.serial_number
            );
        }
        out
    }

    pub fn to_json(&self) -> InspectorResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| InspectorError::ConfigurationError(format!("JSON rendering failed: {e}")))
    }
}

/// Orchestrates loading, resolution and reporting over a shared cache.
pub struct InspectWorkflow {
    cache: Arc<ResolutionCache>,
}

impl Default for InspectWorkflow {
    fn default() -> Self {
        Self::new()
    }
}

impl InspectWorkflow {
    #[must_use]
    pub fn new() -> Self {
        Self::with_cache(Arc::new(ResolutionCache::new()))
    }

    #[must_use]
    pub fn with_cache(cache: Arc<ResolutionCache>) -> Self {
        Self { cache }
    }

    #[must_use]
    pub fn cache(&self) -> &Arc<ResolutionCache> {
        &self.cache
    }

    /// Inspect certificates stored in the given files and directories.
    pub fn run_paths(&self, paths: Vec<PathBuf>) -> InspectorResult<InspectionReport> {
        if paths.is_empty() {
            return Err(InspectorError::ConfigurationError(
                "No certificate files given".to_string(),
            ));
        }
        log::info!("Inspecting {} certificate path(s)", paths.len());
        let store: Arc<dyn CertificateCollection> = Arc::new(FileCertStore::new(paths));
        self.run(&store)
    }

    /// Inspect an existing collection.
    pub fn run(
        &self,
        collection: &Arc<dyn CertificateCollection>,
    ) -> InspectorResult<InspectionReport> {
        let roles = self.cache.get_or_resolve(collection)?;
        let certificates = collection
            .query(&CertSelector::any())
            .map_err(ResolveError::from)?;
        log::info!(
            "Resolved roles: signer {}, recipient {}, issuer {}",
            roles.signer(),
            roles.recipient(),
            roles.issuer()
        );
        Ok(InspectionReport::new(&certificates, &roles))
    }
}
