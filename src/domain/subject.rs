//! Distinguished-name attribute lookup.
//!
//! Resolves attribute names such as `cn`, `surname`, `email` or `msisdn` to
//! their object identifiers (case-insensitively) and extracts matching values
//! from an X.509 [`Name`]. The alias set is the RFC 4519 short-name table
//! extended with the aliases MSSP certificates commonly use.

use der::asn1::ObjectIdentifier;
use der::{Encode, Tag, Tagged};
use x509_cert::attr::AttributeTypeAndValue;
use x509_cert::name::Name;

pub mod oids {
    pub const COUNTRY: &str = "2.5.4.6";
    pub const COMMON_NAME: &str = "2.5.4.3";
    pub const SURNAME: &str = "2.5.4.4";
    pub const SERIAL_NUMBER: &str = "2.5.4.5";
    pub const LOCALITY: &str = "2.5.4.7";
    pub const STATE: &str = "2.5.4.8";
    pub const STREET: &str = "2.5.4.9";
    pub const ORGANIZATION: &str = "2.5.4.10";
    pub const ORGANIZATIONAL_UNIT: &str = "2.5.4.11";
    pub const TITLE: &str = "2.5.4.12";
    pub const TELEPHONE_NUMBER: &str = "2.5.4.20";
    pub const FAX: &str = "2.5.4.23";
    pub const GIVEN_NAME: &str = "2.5.4.42";
    pub const GENERATION_QUALIFIER: &str = "2.5.4.44";
    pub const DN_QUALIFIER: &str = "2.5.4.46";
    pub const PSEUDONYM: &str = "2.5.4.65";
    pub const ORGANIZATION_IDENTIFIER: &str = "2.5.4.97";
    pub const EMAIL_ADDRESS: &str = "1.2.840.113549.1.9.1";
    pub const DOMAIN_COMPONENT: &str = "0.9.2342.19200300.100.1.25";
    pub const USER_ID: &str = "0.9.2342.19200300.100.1.1";
    pub const EID_SMARTCARD_SERIAL: &str = "1.2.752.34.2.1";
    pub const IDENTIFICATION_PATH_LENGTH: &str = "1.2.246.277.1.5.4.106";
    pub const INITIAL_IDENTIFICATION_AUTHORITY: &str = "1.3.6.1.4.1.16722.101.1";
}

/// Lower-case attribute name to OID.
const LOOKUP: &[(&str, &str)] = &[
    // RFC 4519 short names
    ("businesscategory", "2.5.4.15"),
    ("c", oids::COUNTRY),
    ("cn", oids::COMMON_NAME),
    ("dc", oids::DOMAIN_COMPONENT),
    ("description", "2.5.4.13"),
    ("destinationindicator", "2.5.4.27"),
    ("distinguishedname", "2.5.4.49"),
    ("dnqualifier", oids::DN_QUALIFIER),
    ("enhancedsearchguide", "2.5.4.47"),
    ("facsimiletelephonenumber", oids::FAX),
    ("generationqualifier", oids::GENERATION_QUALIFIER),
    ("givenname", oids::GIVEN_NAME),
    ("houseidentifier", "2.5.4.51"),
    ("initials", "2.5.4.43"),
    ("internationalisdnnumber", "2.5.4.25"),
    ("l", oids::LOCALITY),
    ("member", "2.5.4.31"),
    ("name", "2.5.4.41"),
    ("o", oids::ORGANIZATION),
    ("ou", oids::ORGANIZATIONAL_UNIT),
    ("owner", "2.5.4.32"),
    ("physicaldeliveryofficename", "2.5.4.19"),
    ("postaladdress", "2.5.4.16"),
    ("postalcode", "2.5.4.17"),
    ("postofficebox", "2.5.4.18"),
    ("preferreddeliverymethod", "2.5.4.28"),
    ("registeredaddress", "2.5.4.26"),
    ("roleoccupant", "2.5.4.33"),
    ("searchguide", "2.5.4.14"),
    ("seealso", "2.5.4.34"),
    ("serialnumber", oids::SERIAL_NUMBER),
    ("sn", oids::SURNAME),
    ("st", oids::STATE),
    ("street", oids::STREET),
    ("telephonenumber", oids::TELEPHONE_NUMBER),
    ("teletexterminalidentifier", "2.5.4.22"),
    ("telexnumber", "2.5.4.21"),
    ("title", oids::TITLE),
    ("uid", oids::USER_ID),
    ("uniquemember", "2.5.4.50"),
    ("userpassword", "2.5.4.35"),
    ("x121address", "2.5.4.24"),
    ("x500uniqueidentifier", "2.5.4.45"),
    // Extended aliases
    ("organizationidentifier", oids::ORGANIZATION_IDENTIFIER),
    ("surname", oids::SURNAME),
    ("g", oids::GIVEN_NAME),
    ("gn", oids::GIVEN_NAME),
    ("generation", oids::GENERATION_QUALIFIER),
    ("s", oids::STATE),
    ("t", oids::TITLE),
    ("dnq", oids::DN_QUALIFIER),
    ("email", oids::EMAIL_ADDRESS),
    ("emailaddress", oids::EMAIL_ADDRESS),
    ("e", oids::EMAIL_ADDRESS),
    ("countryname", oids::COUNTRY),
    ("country", oids::COUNTRY),
    ("commonname", oids::COMMON_NAME),
    ("localityname", oids::LOCALITY),
    ("stateorprovincename", oids::STATE),
    ("streetaddress", oids::STREET),
    ("organizationname", oids::ORGANIZATION),
    ("organizationunitname", oids::ORGANIZATIONAL_UNIT),
    ("fax", oids::FAX),
    ("domaincomponent", oids::DOMAIN_COMPONENT),
    ("userid", oids::USER_ID),
    ("msisdn", oids::TELEPHONE_NUMBER),
    ("eidsmartcardserialnumber", oids::EID_SMARTCARD_SERIAL),
    ("cardnumber", oids::EID_SMARTCARD_SERIAL),
    ("iccid", oids::EID_SMARTCARD_SERIAL),
    ("pseudonym", oids::PSEUDONYM),
    ("pn", oids::PSEUDONYM),
    ("identificationpathlength", oids::IDENTIFICATION_PATH_LENGTH),
    ("initialidentificationauthority", oids::INITIAL_IDENTIFICATION_AUTHORITY),
];

/// OID to the symbol used when printing a name.
const SYMBOLS: &[(&str, &str)] = &[
    (oids::COUNTRY, "C"),
    (oids::COMMON_NAME, "CN"),
    (oids::SURNAME, "SURNAME"),
    (oids::SERIAL_NUMBER, "SERIALNUMBER"),
    (oids::LOCALITY, "L"),
    (oids::STATE, "ST"),
    (oids::STREET, "STREET"),
    (oids::ORGANIZATION, "O"),
    (oids::ORGANIZATIONAL_UNIT, "OU"),
    (oids::TITLE, "T"),
    (oids::TELEPHONE_NUMBER, "MSISDN"),
    (oids::FAX, "FACSIMILETELEPHONENUMBER"),
    (oids::GIVEN_NAME, "GIVENNAME"),
    (oids::GENERATION_QUALIFIER, "GENERATION"),
    (oids::DN_QUALIFIER, "DNQ"),
    (oids::PSEUDONYM, "PSEUDONYM"),
    (oids::ORGANIZATION_IDENTIFIER, "ORGANIZATIONIDENTIFIER"),
    (oids::EMAIL_ADDRESS, "EMAILADDRESS"),
    (oids::DOMAIN_COMPONENT, "DC"),
    (oids::USER_ID, "UID"),
    (oids::EID_SMARTCARD_SERIAL, "ICCID"),
    ("2.5.4.15", "BUSINESSCATEGORY"),
    ("2.5.4.13", "DESCRIPTION"),
    ("2.5.4.17", "POSTALCODE"),
    ("2.5.4.41", "NAME"),
    ("2.5.4.43", "INITIALS"),
];

/// Resolve an attribute name (or dotted OID, optionally `OID.`-prefixed) to an OID.
#[must_use]
pub fn attribute_oid(name: &str) -> Option<ObjectIdentifier> {
    let lower = name.trim().to_ascii_lowercase();
    let candidate = lower.strip_prefix("oid.").unwrap_or(&lower);

    if candidate.starts_with(|c: char| c.is_ascii_digit()) {
        return ObjectIdentifier::new(candidate).ok();
    }

    LOOKUP
        .iter()
        .find(|(alias, _)| *alias == candidate)
        .and_then(|(_, oid)| ObjectIdentifier::new(oid).ok())
}

/// Printable symbol for an OID, falling back to its dotted form.
#[must_use]
pub fn attribute_symbol(oid: &ObjectIdentifier) -> String {
    let dotted = oid.to_string();
    SYMBOLS
        .iter()
        .find(|(o, _)| *o == dotted)
        .map_or(dotted, |(_, symbol)| (*symbol).to_string())
}

/// Value of the first attribute in `name` matching `attribute`.
///
/// Returns `None` for unknown attribute names and for names that carry no
/// matching attribute.
#[must_use]
pub fn subject_attribute(name: &Name, attribute: &str) -> Option<String> {
    let oid = attribute_oid(attribute)?;
    name.0
        .iter()
        .flat_map(|rdn| rdn.0.iter())
        .find(|atv| atv.oid == oid)
        .map(attribute_value)
}

/// Render a name most-specific first (`CN=...,O=...,C=...`) using the
/// symbol table above.
#[must_use]
pub fn format_name(name: &Name) -> String {
    name.0
        .iter()
        .rev()
        .map(|rdn| {
            rdn.0
                .iter()
                .map(|atv| {
                    format!(
                        "{}={}",
                        attribute_symbol(&atv.oid),
                        escape_value(&attribute_value(atv))
                    )
                })
                .collect::<Vec<_>>()
                .join("+")
        })
        .collect::<Vec<_>>()
        .join(",")
}

/// Decode a directory-string value. Unknown string types are rendered as
/// `#` followed by the hex of their DER encoding.
fn attribute_value(atv: &AttributeTypeAndValue) -> String {
    let bytes = atv.value.value();
    match atv.value.tag() {
        Tag::Utf8String | Tag::PrintableString | Tag::Ia5String | Tag::VisibleString => {
            String::from_utf8_lossy(bytes).into_owned()
        }
        Tag::TeletexString => match std::str::from_utf8(bytes) {
            Ok(s) => s.to_string(),
            Err(_) => bytes.iter().map(|&b| char::from(b)).collect(),
        },
        Tag::BmpString => {
            let units: Vec<u16> = bytes
                .chunks_exact(2)
                .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
                .collect();
            String::from_utf16_lossy(&units)
        }
        _ => match atv.value.to_der() {
            Ok(der) => format!("#{}", hex::encode(der)),
            Err(_) => String::new(),
        },
    }
}

fn escape_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for (i, c) in value.chars().enumerate() {
        let special = matches!(c, ',' | '+' | '"' | '\\' | '<' | '>' | ';' | '=')
            || (i == 0 && (c == '#' || c == ' '));
        if special {
            out.push('\\');
        }
        out.push(c);
    }
    if out.ends_with(' ') && !out.ends_with("\\ ") {
        out.pop();
        out.push_str("\\ ");
    }
    out
}
