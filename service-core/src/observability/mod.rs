pub mod logging;
pub mod metrics;
pub mod security_log;
pub mod trace_context;

pub use logging::init_tracing;
pub use metrics::{init_metrics, metrics_endpoint, render_metrics};
pub use security_log::{Classification, RequestMetadata, SecurityEvent, SecurityLog};
pub use trace_context::{TracedClientExt, TracedRequest, inject_trace_context};
