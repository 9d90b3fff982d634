//! HMAC-SHA256 signing and verification of ticket QR payloads.

use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use thiserror::Error;

use chrono::NaiveDate;
use proctor_core::enums::{ExamSession, ExamType};

type HmacSha256 = Hmac<Sha256>;

/// The examination facts a hall ticket QR code attests to.
///
/// Field order is the canonical serialization order; signing and
/// verification both serialize through this struct so the MAC input is
/// stable regardless of how the envelope JSON was formatted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TicketPayload {
    pub register_number: String,
    pub student_name: String,
    pub schedule_id: String,
    pub exam_type: ExamType,
    pub hall_number: String,
    pub seat_number: i64,
    pub exam_date: NaiveDate,
    pub session: ExamSession,
}

/// Failures while producing a signed QR string. Verification never returns
/// these; it fails closed to `false`.
#[derive(Debug, Error)]
pub enum SignError {
    #[error("Failed to serialize payload: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Signing key rejected: {0}")]
    Key(String),
}

/// Signs and verifies ticket QR payloads with a shared secret.
#[derive(Clone)]
pub struct QrSigner {
    key: Vec<u8>,
}

impl std::fmt::Debug for QrSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QrSigner").finish_non_exhaustive()
    }
}

impl QrSigner {
    #[must_use]
    pub fn new(secret: &str) -> Self {
        Self {
            key: secret.as_bytes().to_vec(),
        }
    }

    fn mac(&self) -> Result<HmacSha256, SignError> {
        HmacSha256::new_from_slice(&self.key).map_err(|e| SignError::Key(e.to_string()))
    }

    /// Hex HMAC-SHA256 over the canonical payload serialization.
    ///
    /// # Errors
    ///
    /// Returns `SignError` if the payload cannot be serialized.
    pub fn sign(&self, payload: &TicketPayload) -> Result<String, SignError> {
        let canonical = serde_json::to_string(payload)?;
        let mut mac = self.mac()?;
        mac.update(canonical.as_bytes());
        Ok(hex::encode(mac.finalize().into_bytes()))
    }

    /// Produce the full QR string: the payload fields plus a `signature`
    /// field.
    ///
    /// # Errors
    ///
    /// Returns `SignError` if the payload cannot be serialized.
    pub fn signed_qr_string(&self, payload: &TicketPayload) -> Result<String, SignError> {
        let signature = self.sign(payload)?;
        let mut value = serde_json::to_value(payload)?;
        if let Some(obj) = value.as_object_mut() {
            obj.insert(
                "signature".to_string(),
                serde_json::Value::String(signature),
            );
        }
        Ok(serde_json::to_string(&value)?)
    }

    /// Verify a scanned QR string. Fails closed: malformed JSON, a missing
    /// or non-hex signature, unknown payload shape, or a MAC mismatch all
    /// return `false`.
    #[must_use]
    pub fn verify(&self, qr: &str) -> bool {
        self.verify_and_decode(qr).is_some()
    }

    /// Verify a scanned QR string and return its payload when authentic.
    #[must_use]
    pub fn verify_and_decode(&self, qr: &str) -> Option<TicketPayload> {
        let mut value: serde_json::Value = serde_json::from_str(qr).ok()?;
        let obj = value.as_object_mut()?;
        let signature = obj.remove("signature")?;
        let signature_bytes = hex::decode(signature.as_str()?).ok()?;

        let payload: TicketPayload = serde_json::from_value(value).ok()?;
        let canonical = serde_json::to_string(&payload).ok()?;
        let mut mac = self.mac().ok()?;
        mac.update(canonical.as_bytes());
        mac.verify_slice(&signature_bytes).ok()?;
        Some(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn payload() -> TicketPayload {
        TicketPayload {
            register_number: "21CS042".to_string(),
            student_name: "A. Student".to_string(),
            schedule_id: "sch-deadbeef".to_string(),
            exam_type: ExamType::Sem,
            hall_number: "H101".to_string(),
            seat_number: 17,
            exam_date: "2025-11-10".parse().unwrap(),
            session: ExamSession::Forenoon,
        }
    }

    #[test]
    fn sign_verify_roundtrip() {
        let signer = QrSigner::new("test-secret");
        let qr = signer.signed_qr_string(&payload()).unwrap();
        assert!(signer.verify(&qr));
        assert_eq!(signer.verify_and_decode(&qr).unwrap(), payload());
    }

    #[test]
    fn tampered_field_fails() {
        let signer = QrSigner::new("test-secret");
        let qr = signer.signed_qr_string(&payload()).unwrap();
        let tampered = qr.replace("\"seatNumber\":17", "\"seatNumber\":18");
        assert_ne!(qr, tampered);
        assert!(!signer.verify(&tampered));
    }

    #[test]
    fn tampered_signature_fails() {
        let signer = QrSigner::new("test-secret");
        let qr = signer.signed_qr_string(&payload()).unwrap();
        let sig = signer.sign(&payload()).unwrap();
        let flipped = if sig.starts_with('a') {
            sig.replacen('a', "b", 1)
        } else {
            format!("a{}", &sig[1..])
        };
        let tampered = qr.replace(&sig, &flipped);
        assert!(!signer.verify(&tampered));
    }

    #[test]
    fn wrong_key_fails() {
        let signer = QrSigner::new("test-secret");
        let other = QrSigner::new("other-secret");
        let qr = signer.signed_qr_string(&payload()).unwrap();
        assert!(!other.verify(&qr));
    }

    #[test]
    fn malformed_inputs_fail_closed() {
        let signer = QrSigner::new("test-secret");
        assert!(!signer.verify(""));
        assert!(!signer.verify("not json"));
        assert!(!signer.verify("{}"));
        assert!(!signer.verify("{\"signature\": \"abcd\"}"));
        // Valid payload shape but non-hex signature.
        let mut value = serde_json::to_value(payload()).unwrap();
        value["signature"] = serde_json::Value::String("zzzz".to_string());
        assert!(!signer.verify(&value.to_string()));
    }

    #[test]
    fn verify_ignores_envelope_formatting() {
        // A re-serialized envelope with different key order still verifies,
        // because the MAC input is the canonical struct serialization.
        let signer = QrSigner::new("test-secret");
        let qr = signer.signed_qr_string(&payload()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&qr).unwrap();
        let mut reordered = serde_json::Map::new();
        let obj = value.as_object().unwrap();
        for key in obj.keys().rev() {
            reordered.insert(key.clone(), obj[key].clone());
        }
        let reserialized = serde_json::to_string(&serde_json::Value::Object(reordered)).unwrap();
        assert!(signer.verify(&reserialized));
    }
}
