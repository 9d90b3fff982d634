//! Signed QR payloads for hall tickets and the attendance scan window.
//!
//! A ticket's QR code carries a JSON envelope: the payload fields plus a
//! `signature` field holding a hex HMAC-SHA256 over the canonical payload
//! serialization. Verification recomputes the MAC with the signature field
//! excluded and compares in constant time; any parse or shape problem makes
//! verification return `false` rather than an error — the scanner fails
//! closed.

pub mod signer;
pub mod window;

pub use signer::{QrSigner, SignError, TicketPayload};
pub use window::{DEFAULT_SCAN_WINDOW_MINUTES, ScanWindow, is_scan_allowed, scan_window_status};
