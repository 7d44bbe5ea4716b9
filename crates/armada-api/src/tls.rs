//! TLS acceptor construction from PEM files.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;

use armada_types::ArmadaError;
use rustls::ServerConfig;
use rustls::pki_types::{CertificateDer, PrivateKeyDer};
use tokio_rustls::TlsAcceptor;

/// Build an acceptor from a PEM certificate chain and a PEM private key.
///
/// # Errors
///
/// [`ArmadaError::Config`] when either file is unreadable, holds no usable
/// material, or the key does not match the certificate.
pub fn load_acceptor(cert: impl AsRef<Path>, key: impl AsRef<Path>) -> Result<TlsAcceptor, ArmadaError> {
    let certs = load_certs(cert.as_ref())?;
    let key = load_key(key.as_ref())?;
    let provider = Arc::new(rustls::crypto::ring::default_provider());
    let config = ServerConfig::builder_with_provider(provider)
        .with_safe_default_protocol_versions()
        .map_err(|e| ArmadaError::Config(format!("tls protocol setup: {e}")))?
        .with_no_client_auth()
        .with_single_cert(certs, key)
        .map_err(|e| ArmadaError::Config(format!("tls certificate/key mismatch: {e}")))?;
    Ok(TlsAcceptor::from(Arc::new(config)))
}

fn open(path: &Path) -> Result<BufReader<File>, ArmadaError> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|e| ArmadaError::Config(format!("cannot open {}: {e}", path.display())))
}

fn load_certs(path: &Path) -> Result<Vec<CertificateDer<'static>>, ArmadaError> {
    let certs = rustls_pemfile::certs(&mut open(path)?)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| ArmadaError::Config(format!("bad certificate in {}: {e}", path.display())))?;
    if certs.is_empty() {
        return Err(ArmadaError::Config(format!(
            "no certificates found in {}",
            path.display()
        )));
    }
    Ok(certs)
}

fn load_key(path: &Path) -> Result<PrivateKeyDer<'static>, ArmadaError> {
    rustls_pemfile::private_key(&mut open(path)?)
        .map_err(|e| ArmadaError::Config(format!("bad private key in {}: {e}", path.display())))?
        .ok_or_else(|| ArmadaError::Config(format!("no private key found in {}", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn pem_file(contents: &str) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        f
    }

    fn fixture(name: &str) -> std::path::PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("tests/fixtures/tls")
            .join(name)
    }

    #[test]
    fn self_signed_pair_builds_an_acceptor() {
        assert!(load_acceptor(fixture("server-cert.pem"), fixture("server-key.pem")).is_ok());
    }

    #[test]
    fn key_swapped_for_certificate_is_rejected() {
        let err = load_acceptor(fixture("server-key.pem"), fixture("server-key.pem"))
            .err()
            .unwrap();
        assert!(matches!(err, ArmadaError::Config(ref msg) if msg.contains("no certificates")));
    }

    #[test]
    fn missing_files_are_config_errors() {
        let err = load_acceptor("/nonexistent/cert.pem", "/nonexistent/key.pem")
            .err()
            .unwrap();
        assert!(matches!(err, ArmadaError::Config(ref msg) if msg.contains("cannot open")));
    }

    #[test]
    fn empty_certificate_file_is_rejected() {
        let cert = pem_file("");
        let key = pem_file("");
        let err = load_acceptor(cert.path(), key.path()).err().unwrap();
        assert!(matches!(err, ArmadaError::Config(ref msg) if msg.contains("no certificates")));
    }

    #[test]
    fn key_file_without_key_is_rejected() {
        let key = pem_file("just some text\n");
        let err = load_key(key.path()).err().unwrap();
        assert!(matches!(err, ArmadaError::Config(ref msg) if msg.contains("no private key")));
    }
}
