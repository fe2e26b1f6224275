// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! BIP-39 mnemonic generation and validation (English wordlist).

use bip39::{Language, Mnemonic};

use super::derivation::DerivationError;

/// Words in a freshly generated phrase (128 bits of entropy).
pub const WORD_COUNT: usize = 12;

/// Generate a random 12-word mnemonic from the OS RNG.
pub fn generate() -> Result<Mnemonic, DerivationError> {
    Mnemonic::generate_in(Language::English, WORD_COUNT)
        .map_err(|e| DerivationError::KeyDerivation(format!("Mnemonic generation failed: {e}")))
}

/// Parse a phrase, checking wordlist membership and the checksum.
///
/// Surrounding and repeated whitespace between words is ignored.
pub fn parse(phrase: &str) -> Result<Mnemonic, DerivationError> {
    Mnemonic::parse_in_normalized(Language::English, phrase.trim())
        .map_err(|e| DerivationError::InvalidMnemonic(e.to_string()))
}

/// Whether `phrase` is a valid BIP-39 mnemonic.
pub fn validate(phrase: &str) -> bool {
    parse(phrase).is_ok()
}
