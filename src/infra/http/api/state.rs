use std::sync::Arc;

use crate::application::admin::AdminService;
use crate::application::records::RecordService;
use crate::application::repos::HealthCheck;
use crate::domain::entities::{EventRecord, FunctionRecord};
use crate::domain::resource::OwnedResource;

#[derive(Clone)]
pub struct ApiState {
    pub events: RecordService<EventRecord>,
    pub functions: RecordService<FunctionRecord>,
    pub admin: AdminService,
    pub health: Arc<dyn HealthCheck>,
    /// `None` closes the admin routes.
    pub admin_token: Option<Arc<str>>,
}

/// Selects the record service that serves a resource type.
pub trait RoutedResource: OwnedResource {
    fn service(state: &ApiState) -> &RecordService<Self>;
}

impl RoutedResource for EventRecord {
    fn service(state: &ApiState) -> &RecordService<Self> {
        &state.events
    }
}

impl RoutedResource for FunctionRecord {
    fn service(state: &ApiState) -> &RecordService<Self> {
        &state.functions
    }
}
