//! 検索バックエンド向け TLS 設定
//!
//! CA 固定は rustls の ServerCertVerifier として実装する。サーバ証明書を固定 CA だけを
//! ルートにした WebPkiVerifier で検証し（ホスト名は見ない）、通ったチェーンの形を
//! `PinnedCaPolicy` で判定する。

use crate::domain::PinnedCaPolicy;
use common::error::Error;
use rustls::client::{ServerCertVerified, ServerCertVerifier, WebPkiVerifier};
use rustls::{Certificate, CertificateError, ClientConfig, RootCertStore, ServerName};
use std::sync::Arc;
use std::time::SystemTime;

/// PEM なら最初の証明書を、そうでなければ DER とみなしてそのまま返す
pub fn decode_certificate(bytes: &[u8]) -> Result<Vec<u8>, Error> {
    if !bytes.starts_with(b"-----BEGIN") {
        if bytes.is_empty() {
            return Err(Error::config("CA certificate file is empty"));
        }
        return Ok(bytes.to_vec());
    }
    let mut reader = bytes;
    rustls_pemfile::certs(&mut reader)
        .map_err(|e| Error::config(format!("Invalid PEM certificate: {}", e)))?
        .into_iter()
        .next()
        .ok_or_else(|| Error::config("No certificate found in PEM file"))
}

/// 固定 CA でサーバ証明書を検証する verifier
pub struct PinnedCaVerifier {
    chain: WebPkiVerifier,
    policy: PinnedCaPolicy,
}

impl PinnedCaVerifier {
    /// CA が証明書として読めなければ設定エラー
    pub fn new(policy: PinnedCaPolicy) -> Result<Self, Error> {
        let mut roots = RootCertStore::empty();
        roots
            .add(&Certificate(policy.ca_der().to_vec()))
            .map_err(|e| Error::config(format!("Invalid CA certificate: {:?}", e)))?;
        Ok(Self {
            chain: WebPkiVerifier::new(roots, None),
            policy,
        })
    }

    fn verify_chain(
        &self,
        end_entity: &Certificate,
        intermediates: &[Certificate],
        server_name: &ServerName,
        scts: &mut dyn Iterator<Item = &[u8]>,
        ocsp_response: &[u8],
        now: SystemTime,
    ) -> Result<(), rustls::Error> {
        match self.chain.verify_server_cert(
            end_entity,
            intermediates,
            server_name,
            scts,
            ocsp_response,
            now,
        ) {
            Ok(_) => Ok(()),
            // 名前の照合はチェーン検証の後なので、ここまで来たチェーンは固定 CA の署名済み
            Err(rustls::Error::InvalidCertificate(CertificateError::NotValidForName)) => Ok(()),
            Err(e) => Err(e),
        }
    }
}

impl ServerCertVerifier for PinnedCaVerifier {
    fn verify_server_cert(
        &self,
        end_entity: &Certificate,
        intermediates: &[Certificate],
        server_name: &ServerName,
        scts: &mut dyn Iterator<Item = &[u8]>,
        ocsp_response: &[u8],
        now: SystemTime,
    ) -> Result<ServerCertVerified, rustls::Error> {
        self.verify_chain(
            end_entity,
            intermediates,
            server_name,
            scts,
            ocsp_response,
            now,
        )?;

        let chain: Vec<&[u8]> = std::iter::once(end_entity)
            .chain(intermediates)
            .map(|c| c.0.as_slice())
            .collect();
        if self.policy.accepts(&chain) {
            Ok(ServerCertVerified::assertion())
        } else {
            Err(rustls::Error::InvalidCertificate(
                CertificateError::UnknownIssuer,
            ))
        }
    }
}

/// 固定 CA 用の rustls クライアント設定
pub fn pinned_client_config(policy: PinnedCaPolicy) -> Result<ClientConfig, Error> {
    Ok(ClientConfig::builder()
        .with_safe_defaults()
        .with_custom_certificate_verifier(Arc::new(PinnedCaVerifier::new(policy)?))
        .with_no_client_auth())
}
