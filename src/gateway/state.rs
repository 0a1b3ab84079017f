use crate::service::OrderingService;

/// Gateway shared state
#[derive(Clone)]
pub struct AppState {
    pub service: OrderingService,
}

impl AppState {
    pub fn new(service: OrderingService) -> Self {
        Self { service }
    }
}
