use std::sync::Arc;

use actix_web::{
    App, Error,
    body::MessageBody,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    http::header,
    test::TestRequest,
    web::Data,
};

use crate::{config::Config, routes, state::AppServices, store::MemoryStore};

/// App wired to a fresh in-memory store.
pub struct TestApp {
    pub store: Arc<MemoryStore>,
    pub config: Config,
    services: AppServices,
}

impl TestApp {
    pub fn new() -> Self {
        let config = Config::for_tests();
        let store = Arc::new(MemoryStore::new());
        let services = AppServices::new(store.clone(), config.leave_day_count_policy);
        Self {
            store,
            config,
            services,
        }
    }

    pub fn build(
        &self,
    ) -> App<
        impl ServiceFactory<
            ServiceRequest,
            Config = (),
            Response = ServiceResponse<impl MessageBody + use<>>,
            Error = Error,
            InitError = (),
        > + use<>,
    > {
        let config = self.config.clone();
        let services = self.services.clone();
        App::new()
            .app_data(Data::new(self.config.clone()))
            .configure(move |cfg| routes::configure(cfg, config, services))
    }

    /// The rate limiter keys on the peer address, so every request needs one.
    pub fn request(&self, req: TestRequest) -> TestRequest {
        req.peer_addr("127.0.0.1:40000".parse().unwrap())
    }
}

pub fn bearer(token: &str) -> (header::HeaderName, String) {
    (header::AUTHORIZATION, format!("Bearer {token}"))
}
