// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Legacy Solana transaction encoding for a single System Program transfer.
//!
//! Wire layout:
//!
//! ```text
//! transaction = shortvec(signatures) || signature[64]* || message
//! message     = header[3] || shortvec(keys) || key[32]* || blockhash[32]
//!               || shortvec(instructions) || instruction*
//! instruction = program_id_index || shortvec(accounts) || index*
//!               || shortvec(data) || data
//! ```

use ed25519_dalek::{Signer, SigningKey};

/// System Program id (`11111111111111111111111111111111`).
pub const SYSTEM_PROGRAM_ID: [u8; 32] = [0u8; 32];

/// `SystemInstruction::Transfer` discriminant.
const SYSTEM_TRANSFER: u32 = 2;

/// Append a compact-u16 length.
fn write_shortvec_len(buf: &mut Vec<u8>, len: usize) {
    let mut rem = len;
    loop {
        let mut byte = (rem & 0x7f) as u8;
        rem >>= 7;
        if rem == 0 {
            buf.push(byte);
            return;
        }
        byte |= 0x80;
        buf.push(byte);
    }
}

/// Serialize the message of a `from -> to` lamport transfer.
///
/// A legacy message lists each account once, so a transfer to self carries
/// two keys (`from`, program) and references `from` twice.
pub fn transfer_message(
    from: &[u8; 32],
    to: &[u8; 32],
    lamports: u64,
    recent_blockhash: &[u8; 32],
) -> Vec<u8> {
    let mut data = Vec::with_capacity(12);
    data.extend_from_slice(&SYSTEM_TRANSFER.to_le_bytes());
    data.extend_from_slice(&lamports.to_le_bytes());

    let keys: Vec<&[u8; 32]> = if from == to {
        vec![from, &SYSTEM_PROGRAM_ID]
    } else {
        vec![from, to, &SYSTEM_PROGRAM_ID]
    };
    let program_index = (keys.len() - 1) as u8;
    let to_index = if from == to { 0 } else { 1 };

    let mut message = Vec::with_capacity(3 + 1 + keys.len() * 32 + 32 + 1 + 4 + 1 + data.len());

    // Header: 1 required signature, 0 read-only signed, 1 read-only unsigned
    // (the program id).
    message.extend_from_slice(&[1, 0, 1]);

    write_shortvec_len(&mut message, keys.len());
    for key in &keys {
        message.extend_from_slice(*key);
    }

    message.extend_from_slice(recent_blockhash);

    write_shortvec_len(&mut message, 1);
    message.push(program_index);
    write_shortvec_len(&mut message, 2);
    message.extend_from_slice(&[0, to_index]);
    write_shortvec_len(&mut message, data.len());
    message.extend_from_slice(&data);

    message
}

/// Sign `message` and wrap it into a wire transaction.
///
/// Returns the signature and the serialized transaction.
pub fn sign_transaction(signer: &SigningKey, message: &[u8]) -> ([u8; 64], Vec<u8>) {
    let signature = signer.sign(message).to_bytes();

    let mut wire = Vec::with_capacity(1 + 64 + message.len());
    write_shortvec_len(&mut wire, 1);
    wire.extend_from_slice(&signature);
    wire.extend_from_slice(message);

    (signature, wire)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ed25519_dalek::{Signature, Verifier};

    #[test]
    fn shortvec_encoding_matches_compact_u16() {
        let cases: [(usize, &[u8]); 5] = [
            (0, &[0x00]),
            (0x7f, &[0x7f]),
            (0x80, &[0x80, 0x01]),
            (0x3fff, &[0xff, 0x7f]),
            (0x4000, &[0x80, 0x80, 0x01]),
        ];
        for (len, expected) in cases {
            let mut buf = Vec::new();
            write_shortvec_len(&mut buf, len);
            assert_eq!(buf, expected, "length {len}");
        }
    }

    #[test]
    fn transfer_message_layout() {
        let from = [1u8; 32];
        let to = [2u8; 32];
        let blockhash = [9u8; 32];
        let message = transfer_message(&from, &to, 1_500_000_000, &blockhash);

        assert_eq!(&message[..3], &[1, 0, 1]);
        assert_eq!(message[3], 3);
        assert_eq!(&message[4..36], &from);
        assert_eq!(&message[36..68], &to);
        assert_eq!(&message[68..100], &SYSTEM_PROGRAM_ID);
        assert_eq!(&message[100..132], &blockhash);
        // one instruction, program index 2, accounts [0, 1], 12 data bytes
        assert_eq!(&message[132..138], &[1, 2, 2, 0, 1, 12]);
        assert_eq!(&message[138..142], &2u32.to_le_bytes());
        assert_eq!(&message[142..150], &1_500_000_000u64.to_le_bytes());
        assert_eq!(message.len(), 150);
    }

    #[test]
    fn self_transfer_lists_sender_once() {
        let from = [1u8; 32];
        let blockhash = [9u8; 32];
        let message = transfer_message(&from, &from, 42, &blockhash);

        assert_eq!(&message[..4], &[1, 0, 1, 2]);
        assert_eq!(&message[4..36], &from);
        assert_eq!(&message[36..68], &SYSTEM_PROGRAM_ID);
        assert_eq!(&message[68..100], &blockhash);
        // program index 1, accounts [0, 0]
        assert_eq!(&message[100..106], &[1, 1, 2, 0, 0, 12]);
        assert_eq!(&message[110..118], &42u64.to_le_bytes());
        assert_eq!(message.len(), 118);
    }

    #[test]
    fn signed_transaction_verifies() {
        let signer = SigningKey::from_bytes(&[7u8; 32]);
        let from = signer.verifying_key().to_bytes();
        let message = transfer_message(&from, &[3u8; 32], 1, &[0u8; 32]);

        let (signature, wire) = sign_transaction(&signer, &message);

        assert_eq!(wire[0], 1);
        assert_eq!(&wire[1..65], &signature);
        assert_eq!(&wire[65..], &message[..]);
        signer
            .verifying_key()
            .verify(&message, &Signature::from_bytes(&signature))
            .expect("signature verifies");
    }
}
