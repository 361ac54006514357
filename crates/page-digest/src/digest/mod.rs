//! Email digest module.
//!
//! Formats the selected pages into an HTML digest and sends it to each
//! recipient as a separate message.

mod email;
mod generator;

pub use email::{DigestMailer, EmailSender};
pub use generator::{DigestEntry, DigestGenerator, ENTRY_SEPARATOR};
