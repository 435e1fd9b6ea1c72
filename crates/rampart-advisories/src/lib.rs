//! Advisory data: OSV batch queries, the CISA KEV feed, and the
//! derivation of per-vulnerability records from raw advisory JSON.

pub mod kev;
pub mod osv;
pub mod record;

pub use kev::{ExploitFeed, KevFeed};
pub use osv::{OsvClient, OsvVulnerability, QuerySubject, VulnerabilitySource};
pub use record::derive_record;
