//! Common test utilities for workflow integration tests.

use workflow_tests::WorkflowTestContext;

/// Start a fresh service stack for one test.
pub async fn setup() -> WorkflowTestContext {
    WorkflowTestContext::new()
        .await
        .expect("Failed to start service stack")
}
