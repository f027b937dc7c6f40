//! Issue tracker domain.
//!
//! - [`credential::Credential`]: OAuth token pair
//! - [`site::SiteInfo`]: connected site (cloud id + base URL)
//! - [`ticket::TicketRecord`] / [`ticket::IssueDraft`]: tickets and their creation payload

pub mod credential;
pub mod site;
pub mod ticket;
