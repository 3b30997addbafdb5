//! BIP-39 mnemonic to seed conversion.
//!
//! Phrases are checked against the English wordlist and their checksum. Normalizing to NFKD is
//! left to the caller.

use crate::util::{Error, Result};
use bip39::{Language, Mnemonic};
use hmac::Hmac;
use pbkdf2::pbkdf2;
use sha2::Sha512;

/// PBKDF2 rounds used to stretch a mnemonic
pub const PBKDF2_ROUNDS: u32 = 2048;

/// Converts a mnemonic phrase and passphrase into a 64 byte seed.
///
/// PBKDF2-HMAC-SHA512 keyed with the phrase, salted with `"mnemonic"` and the passphrase.
///
/// # Errors
/// `Error::SigningError` if a word is not in the wordlist, the word count is wrong, or the
/// checksum does not match.
pub fn mnemonic_to_seed(phrase: &str, passphrase: &str) -> Result<[u8; 64]> {
    Mnemonic::parse_in_normalized(Language::English, phrase)
        .map_err(|e| Error::SigningError(format!("Invalid mnemonic: {}", e)))?;

    let salt = format!("mnemonic{}", passphrase);
    let mut seed = [0u8; 64];
    pbkdf2::<Hmac<Sha512>>(phrase.as_bytes(), salt.as_bytes(), PBKDF2_ROUNDS, &mut seed)
        .map_err(|e| Error::SigningError(e.to_string()))?;
    Ok(seed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;
    use pretty_assertions::assert_eq;

    const PHRASE: &str =
        "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

    #[test]
    fn trezor_vector() -> Result<()> {
        let seed = mnemonic_to_seed(PHRASE, "TREZOR")?;
        let expected = hex!(
            "c55257c360c07c72029aebc1b53c05ed0362ada38ead3e3e9efa3708e5349553"
            "1f09a6987599d18264c1e1c92f2cf141630c7a3c4ab7c81b2f001698e7463b04"
        );
        assert_eq!(seed.to_vec(), expected.to_vec());
        Ok(())
    }

    #[test]
    fn passphrase_changes_seed() -> Result<()> {
        assert_ne!(mnemonic_to_seed(PHRASE, "")?.to_vec(), mnemonic_to_seed(PHRASE, "TREZOR")?.to_vec());
        assert_eq!(mnemonic_to_seed(PHRASE, "x")?.to_vec(), mnemonic_to_seed(PHRASE, "x")?.to_vec());
        Ok(())
    }

    #[test]
    fn invalid_phrases() {
        // Valid words, last word breaks the checksum
        let bad_checksum =
            "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon";
        assert!(matches!(mnemonic_to_seed(bad_checksum, ""), Err(Error::SigningError(_))));

        let unknown_word =
            "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon segsign";
        assert!(matches!(mnemonic_to_seed(unknown_word, ""), Err(Error::SigningError(_))));

        assert!(matches!(mnemonic_to_seed("abandon about", ""), Err(Error::SigningError(_))));
        assert!(matches!(mnemonic_to_seed("", ""), Err(Error::SigningError(_))));
    }
}
