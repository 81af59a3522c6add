// Social link registry — normalization, validation and claim-or-detect.
//
// The store (crate::db) arbitrates who owns a link; this module decides
// what a claim outcome means for the submitting token.

pub mod error;
pub mod normalize;
pub mod verify;

pub use error::{ValidationError, VerifyError};
pub use normalize::normalize;
pub use verify::{verify_socials, VerificationResult, VerificationStatus};
