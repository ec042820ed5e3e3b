//! Components. Each holds its own handle to the store, injected at construction.

pub mod content;
pub mod donation;
pub mod identity;
pub mod inquiry;
pub mod pagination;
pub mod text;
pub mod token;
pub mod validation;

pub use content::{Audience, ContentService, PostKey};
pub use donation::DonationService;
pub use identity::IdentityService;
pub use inquiry::InquiryService;
pub use pagination::{PageParams, PageRequest};
pub use token::{Claims, TokenIssuer};
pub use validation::RequestValidator;
