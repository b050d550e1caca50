//! Business services: OTP generation, code delivery, the signup flow, and
//! session tokens.
//!
//! Services are constructed per-request from borrowed state; none of them
//! hold connections or configuration of their own.

pub mod email;
pub mod otp;
pub mod registration;
pub mod token;

pub use email::{EmailError, LogNotifier, OtpNotifier, SmtpNotifier};
pub use registration::{RegistrationError, RegistrationService};
pub use token::{Claims, SessionIssuer};
