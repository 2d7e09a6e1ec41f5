//! Response generation.
//!
//! [`ResponseGenerator`] is the single "answer this inquiry" seam the turn
//! controller depends on. [`pipeline::SalesPipeline`] is the shipped
//! implementation: five role-specialised stages run in a fixed order.

pub mod pipeline;
pub mod stage;

use salesdesk_types::error::GenerationError;
use salesdesk_types::inquiry::GenerationRequest;

/// Produces one response string for an inquiry.
///
/// The caller owns timeouts and session state; a generator only answers or
/// fails.
pub trait ResponseGenerator: Send + Sync {
    fn generate(
        &self,
        request: &GenerationRequest,
    ) -> impl std::future::Future<Output = Result<String, GenerationError>> + Send;
}
