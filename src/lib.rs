// #![deny(warnings)]

#![warn(unused_extern_crates)]
// Enable some groups of clippy lints.
#![deny(clippy::suspicious)]
#![deny(clippy::perf)]
// Specific lints to enforce.
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::await_holding_lock)]
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::trivially_copy_pass_by_ref)]
#![deny(clippy::disallowed_types)]
#![deny(clippy::manual_let_else)]
#![allow(clippy::unreachable)]

//! Codecs for Kerberos credential material.
//!
//! * [`keytab`] reads and writes the MIT keytab file format, byte for byte.
//! * [`proto`] holds principals, keys and the RFC 3244 change password
//!   request, along with their DER encodings.
//!
//! Nothing here performs cryptography or network IO. Buffers go in, values
//! come out, and the reverse.

mod asn1;
pub mod config;
pub(crate) mod constants;
pub mod error;
pub mod keytab;
pub mod proto;

pub use asn1::constants::{EncryptionType, PrincipalNameType};
