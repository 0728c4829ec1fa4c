//! Certificate discovery: turns the chains listed by a profile query into
//! per-profile certificate bundles.

use crate::adapters::mss::protocol::MobileUserCertificate;
use crate::domain::certificate::{CertificateBundle, MssCertificate};
use crate::domain::constants::CERT_STATE_ACTIVE;
use crate::domain::types::SignatureProfile;
use std::collections::BTreeMap;

/// Selects usable certificate chains from a profile-query result.
///
/// A chain is considered only when it lists signature profiles and
/// certificates and its state is `ACTIVE` (a chain with no state is taken
/// as active). Certificates that fail to parse are dropped from their chain.
#[derive(Debug, Default)]
pub struct CertificateResolver {
    bundles: Vec<CertificateBundle>,
}

impl CertificateResolver {
    #[must_use]
    pub fn new(chains: &[MobileUserCertificate]) -> Self {
        let bundles = chains.iter().filter_map(Self::bundle_for).collect();
        Self { bundles }
    }

    /// Every eligible chain, in response order.
    #[must_use]
    pub fn bundles(&self) -> &[CertificateBundle] {
        &self.bundles
    }

    /// Bundles keyed by each profile they claim. A chain appears under every
    /// profile it lists; when several chains claim a profile the last wins.
    #[must_use]
    pub fn by_profile(&self) -> BTreeMap<SignatureProfile, CertificateBundle> {
        let mut map = BTreeMap::new();
        for bundle in &self.bundles {
            for profile in bundle.signature_profiles() {
                map.insert(profile.clone(), bundle.clone());
            }
        }
        map
    }

    /// Bundle for one profile, or the empty bundle.
    #[must_use]
    pub fn for_profile(&self, profile: &SignatureProfile) -> CertificateBundle {
        self.bundles
            .iter()
            .rev()
            .find(|b| b.supports(profile))
            .cloned()
            .unwrap_or_default()
    }

    fn bundle_for(chain: &MobileUserCertificate) -> Option<CertificateBundle> {
        let profiles = chain.signature_profiles.as_ref()?;
        let certs = chain.x509_certificate.as_ref()?;
        if let Some(state) = chain.state.as_deref() {
            if state != CERT_STATE_ACTIVE {
                log::debug!("Ignoring certificate chain in state {state}");
                return None;
            }
        }

        let parsed: Vec<MssCertificate> = certs
            .iter()
            .filter_map(|b64| match MssCertificate::from_base64(b64) {
                Ok(cert) => Some(cert),
                Err(e) => {
                    log::warn!("Failed to parse certificate: {}", e.message());
                    None
                }
            })
            .collect();
        if parsed.is_empty() {
            return None;
        }

        let profiles = profiles.iter().map(|p| SignatureProfile::new(p.as_str())).collect();
        Some(CertificateBundle::new(parsed).with_profiles(profiles))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine;

    const USER_CERT: &[u8] = include_bytes!("../../test-data/user.der");
    const CA_CERT: &[u8] = include_bytes!("../../test-data/ca.der");

    fn b64(der: &[u8]) -> String {
        base64::engine::general_purpose::STANDARD.encode(der)
    }

    fn chain(state: Option<&str>, certs: Vec<String>, profiles: &[&str]) -> MobileUserCertificate {
        MobileUserCertificate {
            x509_certificate: Some(certs),
            state: state.map(str::to_string),
            signature_profiles: Some(profiles.iter().map(|p| (*p).to_string()).collect()),
            ..MobileUserCertificate::default()
        }
    }

    #[test]
    fn test_revoked_chain_is_never_returned() {
        let signing = SignatureProfile::signing();
        let resolver = CertificateResolver::new(&[chain(
            Some("REVOKED"),
            vec![b64(USER_CERT)],
            &[signing.as_uri()],
        )]);
        assert!(resolver.bundles().is_empty());
        assert!(resolver.by_profile().is_empty());
        assert!(resolver.for_profile(&signing).is_empty());
    }

    #[test]
    fn test_chain_fans_out_to_every_profile() {
        let resolver = CertificateResolver::new(&[chain(
            Some("ACTIVE"),
            vec![b64(USER_CERT), b64(CA_CERT)],
            &[SignatureProfile::signing().as_uri(), SignatureProfile::authentication().as_uri()],
        )]);
        let map = resolver.by_profile();
        assert_eq!(map.len(), 2);
        let bundle = &map[&SignatureProfile::authentication()];
        assert_eq!(bundle.chain().len(), 2);
        assert_eq!(
            bundle.certificate().and_then(|c| c.subject_attribute("cn")).as_deref(),
            Some("Test User")
        );
    }

    #[test]
    fn test_incomplete_chains_are_skipped() {
        let missing_profiles = MobileUserCertificate {
            x509_certificate: Some(vec![b64(USER_CERT)]),
            state: Some("ACTIVE".into()),
            ..MobileUserCertificate::default()
        };
        let missing_certs = MobileUserCertificate {
            signature_profiles: Some(vec![SignatureProfile::signing().as_uri().to_string()]),
            ..MobileUserCertificate::default()
        };
        let resolver = CertificateResolver::new(&[missing_profiles, missing_certs]);
        assert!(resolver.bundles().is_empty());
    }

    #[test]
    fn test_unparsable_certificate_is_dropped() {
        let signing = SignatureProfile::signing();
        let resolver = CertificateResolver::new(&[
            chain(Some("ACTIVE"), vec!["bm90IGEgY2VydA==".into()], &[signing.as_uri()]),
            chain(None, vec!["bm90IGEgY2VydA==".into(), b64(USER_CERT)], &[signing.as_uri()]),
        ]);
        assert_eq!(resolver.bundles().len(), 1);
        assert_eq!(resolver.for_profile(&signing).chain().len(), 1);
    }

    #[test]
    fn test_last_matching_chain_wins() {
        let signing = SignatureProfile::signing();
        let resolver = CertificateResolver::new(&[
            chain(Some("ACTIVE"), vec![b64(CA_CERT)], &[signing.as_uri()]),
            chain(Some("ACTIVE"), vec![b64(USER_CERT)], &[signing.as_uri()]),
        ]);
        let bundle = resolver.for_profile(&signing);
        assert_eq!(bundle.certificate().map(MssCertificate::serial_hex).as_deref(), Some("1234"));
        assert_eq!(resolver.by_profile()[&signing], bundle);
        assert!(resolver.for_profile(&SignatureProfile::new("urn:other")).is_empty());
    }
}
