pub mod notifier;
pub mod repository;
pub mod verifier;

pub use notifier::{HttpNotifier, Notifier, RecordingNotifier};
pub use repository::{InMemoryPaymentRepository, PaymentRepository};
pub use verifier::{
    HttpTokenVerifier, StaticTokenVerifier, TokenVerifier, VerifiedIdentity, VerifyError,
};
