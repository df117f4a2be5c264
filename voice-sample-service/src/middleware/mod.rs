pub mod access;
pub mod client_ip;

pub use access::{Access, AccessSecrets, AdminAccess, UserAccess, API_SECRET_HEADER};
pub use client_ip::ClientIp;
