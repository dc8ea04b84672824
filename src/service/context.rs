use crate::executor::Cancellation;
use crate::query::TenantScope;

/// Trusted identity of the caller, plus the token that lets them abandon
/// the request.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub tenant: String,
    pub user_id: Option<String>,
    pub cancel: Cancellation,
}

impl RequestContext {
    pub fn new(tenant: impl Into<String>, user_id: Option<String>) -> Self {
        RequestContext {
            tenant: tenant.into(),
            user_id,
            cancel: Cancellation::new(),
        }
    }

    pub fn with_cancellation(mut self, cancel: Cancellation) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn scope(&self) -> TenantScope {
        TenantScope::new(self.tenant.clone(), self.user_id.clone())
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}
