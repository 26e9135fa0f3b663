//! Certificate inspection over a raw TLS handshake.
//!
//! The handshake accepts any chain so expired or self-signed certificates can
//! still be reported. Handshake signatures are checked with the ring
//! provider's algorithms; only path validation is skipped.

use std::sync::Arc;
use std::time::Duration;

use rustls::client::danger::{HandshakeSignatureValid, ServerCertVerified, ServerCertVerifier};
use rustls::crypto::{verify_tls12_signature, verify_tls13_signature, WebPkiSupportedAlgorithms};
use rustls::pki_types::{CertificateDer, ServerName, UnixTime};
use rustls::{ClientConfig, DigitallySignedStruct, SignatureScheme};
use tokio::net::TcpStream;
use tokio_rustls::TlsConnector;
use x509_parser::certificate::X509Certificate;
use x509_parser::extensions::GeneralName;
use x509_parser::x509::X509Name;

use crate::domain::{CertificateInfo, UtcDateTime};
use crate::provider::{Provider, ProviderFailure, ProviderFuture};
use crate::request::TlsTarget;
use crate::ProviderId;

const SECONDS_PER_DAY: i64 = 86_400;

#[derive(Clone)]
pub struct TlsProbeAdapter {
    connector: TlsConnector,
    timeout: Duration,
}

impl TlsProbeAdapter {
    pub fn new(timeout: Duration) -> Result<Self, ProviderFailure> {
        let provider = Arc::new(rustls::crypto::ring::default_provider());
        let verifier = Arc::new(InspectOnly {
            algorithms: provider.signature_verification_algorithms,
        });
        let config = ClientConfig::builder_with_provider(provider)
            .with_safe_default_protocol_versions()
            .map_err(|error| ProviderFailure::network(format!("tls configuration rejected: {error}")))?
            .dangerous()
            .with_custom_certificate_verifier(verifier)
            .with_no_client_auth();

        Ok(Self {
            connector: TlsConnector::from(Arc::new(config)),
            timeout,
        })
    }
}

impl Provider<TlsTarget, CertificateInfo> for TlsProbeAdapter {
    fn id(&self) -> ProviderId {
        ProviderId::TlsProbe
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    /// `Ok(None)` when the peer completes the handshake without a certificate.
    fn fetch<'a>(&'a self, input: &'a TlsTarget) -> ProviderFuture<'a, CertificateInfo> {
        Box::pin(async move {
            let host = input.host.as_str();
            let server_name = ServerName::try_from(host.to_owned())
                .map_err(|error| ProviderFailure::network(format!("invalid server name {host}: {error}")))?;

            let tcp = TcpStream::connect((host, input.port))
                .await
                .map_err(|error| ProviderFailure::network(format!("connect {host}:{} failed: {error}", input.port)))?;
            let stream = self
                .connector
                .connect(server_name, tcp)
                .await
                .map_err(|error| ProviderFailure::network(format!("tls handshake with {host} failed: {error}")))?;

            let (_, session) = stream.get_ref();
            let Some(leaf) = session.peer_certificates().and_then(|chain| chain.first()) else {
                return Ok(None);
            };
            describe(leaf.as_ref(), UtcDateTime::now()).map(Some)
        })
    }
}

/// Reads the leaf certificate. `valid` means at least one whole day remains.
pub(crate) fn describe(der: &[u8], now: UtcDateTime) -> Result<CertificateInfo, ProviderFailure> {
    let (_, certificate) = x509_parser::parse_x509_certificate(der)
        .map_err(|error| ProviderFailure::unparseable(format!("certificate did not parse: {error}")))?;

    let validity = certificate.validity();
    let issued = UtcDateTime::from_any_offset(validity.not_before.to_datetime());
    let expires = UtcDateTime::from_any_offset(validity.not_after.to_datetime());
    let days_remaining = (expires.unix_timestamp() - now.unix_timestamp()).div_euclid(SECONDS_PER_DAY);

    Ok(CertificateInfo {
        valid: days_remaining > 0,
        subject_cn: first_common_name(certificate.subject()),
        issuer: issuer_label(certificate.issuer()),
        issued,
        expires,
        days_remaining,
        san: dns_names(&certificate),
    })
}

fn first_common_name(name: &X509Name<'_>) -> Option<String> {
    name.iter_common_name()
        .find_map(|attribute| attribute.as_str().ok())
        .map(str::to_owned)
}

fn issuer_label(name: &X509Name<'_>) -> Option<String> {
    name.iter_organization()
        .find_map(|attribute| attribute.as_str().ok())
        .map(str::to_owned)
        .or_else(|| first_common_name(name))
}

fn dns_names(certificate: &X509Certificate<'_>) -> Vec<String> {
    match certificate.subject_alternative_name() {
        Ok(Some(extension)) => extension
            .value
            .general_names
            .iter()
            .filter_map(|name| match name {
                GeneralName::DNSName(dns) => Some((*dns).to_owned()),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

#[derive(Debug)]
struct InspectOnly {
    algorithms: WebPkiSupportedAlgorithms,
}

impl ServerCertVerifier for InspectOnly {
    fn verify_server_cert(
        &self,
        _end_entity: &CertificateDer<'_>,
        _intermediates: &[CertificateDer<'_>],
        _server_name: &ServerName<'_>,
        _ocsp_response: &[u8],
        _now: UnixTime,
    ) -> Result<ServerCertVerified, rustls::Error> {
        Ok(ServerCertVerified::assertion())
    }

    fn verify_tls12_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        verify_tls12_signature(message, cert, dss, &self.algorithms)
    }

    fn verify_tls13_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        verify_tls13_signature(message, cert, dss, &self.algorithms)
    }

    fn supported_verify_schemes(&self) -> Vec<SignatureScheme> {
        self.algorithms.supported_schemes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{invoke, FailureKind};

    #[test]
    fn garbage_der_is_unparseable() {
        let error = describe(b"not a certificate", UtcDateTime::now()).expect_err("must fail");
        assert_eq!(error.kind(), FailureKind::Unparseable);
    }

    #[tokio::test]
    async fn refused_connection_is_a_network_failure() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
        let port = listener.local_addr().expect("addr").port();
        drop(listener);

        let adapter = TlsProbeAdapter::new(Duration::from_secs(2)).expect("config");
        let target = TlsTarget::parse("127.0.0.1", Some(&port.to_string())).expect("valid");

        let outcome = invoke::<TlsTarget, CertificateInfo, _>(&adapter, &target).await;
        assert_eq!(outcome.failure().map(ProviderFailure::kind), Some(FailureKind::Network));
    }
}
