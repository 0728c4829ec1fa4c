//! CMS SignedData helpers for signatures returned in CMS/PKCS#7 format.

use crate::domain::certificate::MssCertificate;
use crate::infra::error::{MssError, MssResult};
use cms::cert::CertificateChoices;
use cms::content_info::ContentInfo;
use cms::signed_data::{SignedData, SignerIdentifier};
use der::asn1::ObjectIdentifier;
use der::{Decode, Encode};

/// `id-signedData` (RFC 5652).
pub const ID_SIGNED_DATA: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.113549.1.7.2");

/// Parse a DER `ContentInfo` carrying `SignedData`.
///
/// # Errors
/// Returns an internal error if the bytes are not DER, or an invalid-signature
/// error if the content type is not `id-signedData`.
pub fn parse_signed_data(bytes: &[u8]) -> MssResult<SignedData> {
    let ci = ContentInfo::from_der(bytes)
        .map_err(|e| MssError::internal(format!("Failed to parse CMS ContentInfo: {e}")))?;
    if ci.content_type != ID_SIGNED_DATA {
        return Err(MssError::invalid_signature(format!(
            "CMS content type {} is not SignedData",
            ci.content_type
        )));
    }
    let inner = ci.content.to_der()?;
    SignedData::from_der(&inner)
        .map_err(|e| MssError::internal(format!("Failed to parse CMS SignedData: {e}")))
}

/// All X.509 certificates embedded in a SignedData, in encoded order.
/// Non-X.509 certificate choices are skipped.
#[must_use]
pub fn certificates(signed_data: &SignedData) -> Vec<MssCertificate> {
    let Some(set) = signed_data.certificates.as_ref() else {
        return Vec::new();
    };
    set.0
        .iter()
        .filter_map(|choice| match choice {
            CertificateChoices::Certificate(cert) => {
                match MssCertificate::from_parsed(cert.clone()) {
                    Ok(c) => Some(c),
                    Err(e) => {
                        log::warn!("Skipping unencodable certificate in SignedData: {e}");
                        None
                    }
                }
            }
            CertificateChoices::Other(_) => None,
        })
        .collect()
}

/// Certificate of the first signer.
///
/// Matches the signer's issuer and serial number against the embedded
/// certificates; falls back to the first embedded certificate when the
/// signer is identified by key identifier or nothing matches.
#[must_use]
pub fn signer_certificate(signed_data: &SignedData) -> Option<MssCertificate> {
    let certs = certificates(signed_data);
    let signer = signed_data.signer_infos.0.iter().next();

    if let Some(SignerIdentifier::IssuerAndSerialNumber(iasn)) = signer.map(|s| &s.sid) {
        let matched = certs.iter().find(|c| {
            let tbs = &c.certificate().tbs_certificate;
            tbs.issuer == iasn.issuer && tbs.serial_number == iasn.serial_number
        });
        if let Some(cert) = matched {
            return Some(cert.clone());
        }
    }
    certs.into_iter().next()
}
