#![allow(dead_code)]
use hrcache_core::{QueryParams, RequestContext, ResourceModel, UserId};

/// Helper to bind a model by name.
/// Panics if the name is invalid (intended for tests).
pub fn model(name: &str) -> ResourceModel {
    ResourceModel::new(name).expect("Failed to create test model")
}

/// Helper to build a request context for an authenticated user.
pub fn request(path: &str, user: u64, raw_query: &str) -> RequestContext {
    RequestContext::new(path, UserId::from(user), QueryParams::parse(raw_query))
}

/// Models used by the HR endpoints.
pub fn hr_models() -> Vec<ResourceModel> {
    ["User", "Employee", "Payment", "Vacation", "Company_Area"]
        .into_iter()
        .map(model)
        .collect()
}

/// Request shapes seen against one model's endpoints.
pub fn request_shapes(base: &str) -> Vec<RequestContext> {
    vec![
        request(base, 5, ""),
        request(base, 7, ""),
        request(base, 5, "page=2"),
        request(base, 5, "search=Ana+Mar%C3%ADa&ordering=-id"),
        request(&format!("{base}/42"), 5, ""),
        RequestContext::from_raw(base, Some("status=active&status=pending"), UserId::Anonymous),
    ]
}
