mod provider;
mod vercel;

pub use provider::{Credentials, DnsProvider, DnsRecord, ProviderError, RecordChange, RecordPage};
pub use vercel::{VercelProvider, VERCEL_API_BASE};
