//! Disperse Script Generator
//! Renders a Miden transaction script that creates one note per share
//!
//! Every identifier is decoded up front, so a malformed recipient or asset
//! id fails the whole call before any text is produced. The output is
//! byte-for-byte stable for identical input; downstream consumers execute
//! and hash it literally.

use std::fmt::Write;
use tracing::debug;

use crate::models::errors::AppResult;
use crate::models::types::{AssetAccountId, DisperseRequest, Felt, Word};
use crate::utils::account::account_id_hex_to_felts;
use crate::utils::words::{word_hex_to_felts, word_to_operand};

/// Module imports at the top of every script
const SCRIPT_HEADER: &str = "use.miden::tx
use.miden::contracts::wallets::basic
use.miden::contracts::auth::basic->auth_tx

begin
";

/// Authentication call closing the script body
const AUTH_CALL: &str = "\tcall.auth_tx::auth_tx_rpo_falcon512\n";

const SCRIPT_FOOTER: &str = "end";

/// A share with every operand already resolved to felts
#[derive(Debug, Clone, PartialEq, Eq)]
struct NormalizedShare {
    /// Recipient word, reversed for the stack
    recipient: Word,
    /// `[asset1, asset2, 0, amount]`
    asset: Word,
}

fn resolve_asset(asset_account_id: &AssetAccountId) -> AppResult<[Felt; 2]> {
    match asset_account_id {
        AssetAccountId::Hex(hex) => account_id_hex_to_felts(hex),
        AssetAccountId::Felts(felts) => Ok(*felts),
    }
}

fn normalize(request: &DisperseRequest) -> AppResult<Vec<NormalizedShare>> {
    let [asset1, asset2] = resolve_asset(&request.asset_account_id)?;

    request
        .shares
        .iter()
        .map(|share| {
            let mut recipient = word_hex_to_felts(&share.recipient)?;
            recipient.reverse();
            Ok(NormalizedShare {
                recipient,
                asset: [asset1, asset2, 0, share.amount],
            })
        })
        .collect()
}

fn write_share(script: &mut String, share: &NormalizedShare, tag: u64) -> std::fmt::Result {
    writeln!(script, "\tpush.{}", word_to_operand(&share.recipient))?;
    script.push_str("\tpush.0\n\tpush.0\n\tpush.0\n");
    writeln!(script, "\tpush.{}", tag)?;
    script.push_str("\tcall.tx::create_note\n\n");
    writeln!(script, "\tpush.{}", word_to_operand(&share.asset))?;
    script.push_str("\tcall.basic::move_asset_to_note dropw\n");
    script.push_str("\tdropw dropw dropw drop\n\n");
    Ok(())
}

/// Generate the disperse script for a request
pub fn generate_disperse_script(request: &DisperseRequest) -> AppResult<String> {
    let shares = normalize(request)?;

    let mut script = String::with_capacity(SCRIPT_HEADER.len() + shares.len() * 256);
    script.push_str(SCRIPT_HEADER);
    for share in &shares {
        // Writing into a String cannot fail
        let _ = write_share(&mut script, share, request.tag);
    }
    script.push_str(AUTH_CALL);
    script.push_str(SCRIPT_FOOTER);

    debug!(shares = shares.len(), tag = request.tag, bytes = script.len(), "generated disperse script");
    Ok(script)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::errors::ErrorCode;
    use crate::models::types::Share;
    use crate::utils::constants::DEFAULT_TAG;

    const ASSET_ID: &str = "0x63c9d7af451fda2000fa06ce0bdefd";
    const RECIPIENT_1: &str = "0x8f13f40555b1382d890e646242466d5d088b10696a73660192980b94c0e46559";
    const RECIPIENT_2: &str = "0xc63ad6622d2b7f9cec142ac1b0e8613f534d31e1dc76941ac335b9531baf9e98";

    const EXPECTED_DISPERSE_SCRIPT: &str = "use.miden::tx
use.miden::contracts::wallets::basic
use.miden::contracts::auth::basic->auth_tx

begin
\tpush.6441806357792004242.100894942528834312.6732114268921269897.3258549309132772239
\tpush.0
\tpush.0
\tpush.0
\tpush.4177657856
\tcall.tx::create_note

\tpush.7190515427852671520.70376226209856768.0.1000000
\tcall.basic::move_asset_to_note dropw
\tdropw dropw dropw drop

\tpush.10997419871988954563.1915286432582290771.4567187342983042284.11276779465890740934
\tpush.0
\tpush.0
\tpush.0
\tpush.4177657856
\tcall.tx::create_note

\tpush.7190515427852671520.70376226209856768.0.2000000
\tcall.basic::move_asset_to_note dropw
\tdropw dropw dropw drop

\tcall.auth_tx::auth_tx_rpo_falcon512
end";

    fn two_share_request() -> DisperseRequest {
        DisperseRequest::new(
            ASSET_ID,
            vec![Share::new(RECIPIENT_1, 1_000_000), Share::new(RECIPIENT_2, 2_000_000)],
        )
    }

    #[test]
    fn test_generate_disperse_script() {
        let script = generate_disperse_script(&two_share_request()).unwrap();
        assert_eq!(script, EXPECTED_DISPERSE_SCRIPT);
    }

    #[test]
    fn test_precomputed_asset_felts_match_hex() {
        let by_felts = DisperseRequest::new(
            [7190515427852671520, 70376226209856768],
            two_share_request().shares,
        );
        assert_eq!(
            generate_disperse_script(&by_felts).unwrap(),
            EXPECTED_DISPERSE_SCRIPT
        );
    }

    #[test]
    fn test_deterministic() {
        let request = two_share_request();
        let a = generate_disperse_script(&request).unwrap();
        let b = generate_disperse_script(&request).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_custom_tag() {
        let script = generate_disperse_script(&two_share_request().with_tag(42)).unwrap();
        assert_eq!(script.matches("\tpush.42\n").count(), 2);
        assert!(!script.contains(&DEFAULT_TAG.to_string()));
    }

    #[test]
    fn test_empty_shares() {
        let script = generate_disperse_script(&DisperseRequest::new(ASSET_ID, vec![])).unwrap();
        assert_eq!(script, format!("{}{}{}", SCRIPT_HEADER, AUTH_CALL, SCRIPT_FOOTER));
    }

    #[test]
    fn test_share_order_preserved() {
        let mut request = two_share_request();
        request.shares.reverse();
        let script = generate_disperse_script(&request).unwrap();
        let first = script.find(".0.2000000").unwrap();
        let second = script.find(".0.1000000").unwrap();
        assert!(first < second);
        assert_eq!(script.matches("call.auth_tx::").count(), 1);
        assert!(script.ends_with("\tcall.auth_tx::auth_tx_rpo_falcon512\nend"));
    }

    #[test]
    fn test_malformed_recipient_fails() {
        let mut request = two_share_request();
        request.shares[1].recipient = "0x8f13".to_string();
        let err = generate_disperse_script(&request).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidLength);

        request.shares[1].recipient = RECIPIENT_2.replace('c', "x");
        let err = generate_disperse_script(&request).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidFormat);
    }

    #[test]
    fn test_malformed_asset_fails() {
        let request = DisperseRequest::new("0x63c9d7af", two_share_request().shares);
        let err = generate_disperse_script(&request).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidLength);
    }
}
