use std::borrow::Cow;

use lopdf::Document;
use lopdf::encryption::DecryptionError;
use tracing::debug;

use crate::error::ExtractError;

fn is_password_rejection(error: &lopdf::Error) -> bool {
    matches!(
        error,
        lopdf::Error::Decryption(DecryptionError::IncorrectPassword)
    )
}

// Owner-password-only documents open with the empty user password.
pub fn prepare<'a>(pdf: &'a [u8], passphrase: Option<&str>) -> Result<Cow<'a, [u8]>, ExtractError> {
    let mut document = Document::load_mem(pdf)?;
    if !document.is_encrypted() {
        return Ok(Cow::Borrowed(pdf));
    }

    let attempt = passphrase.unwrap_or_default();
    if let Err(error) = document.decrypt(attempt) {
        return Err(match (passphrase, is_password_rejection(&error)) {
            (None, true) => ExtractError::AuthenticationRequired,
            (Some(_), true) => ExtractError::AuthenticationFailed,
            (_, false) => ExtractError::PdfLoad(error),
        });
    }
    debug!(
        with_passphrase = passphrase.is_some(),
        "decrypted protected document"
    );

    document.trailer.remove(b"Encrypt");
    let mut decrypted = Vec::with_capacity(pdf.len());
    document.save_to(&mut decrypted)?;
    Ok(Cow::Owned(decrypted))
}
