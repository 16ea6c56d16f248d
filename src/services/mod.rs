//! Client-side services: session, collection syncs and actions

pub mod catalog;
pub mod loans;
pub mod recommendations;
pub mod reviews;
pub mod session;
pub mod storage;
pub mod sync;

use std::sync::Arc;

use crate::api::Transport;

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub session: Arc<session::SessionStore>,
    pub catalog: Arc<catalog::CatalogSync>,
    pub borrowed: Arc<loans::BorrowedSync>,
    pub recommendations: Arc<recommendations::RecommendationsSync>,
    pub loans: loans::LoansService,
    pub reviews: reviews::ReviewsService,
}

impl Services {
    /// Create all services over one transport and token storage
    pub fn new(transport: Arc<dyn Transport>, storage: Arc<dyn storage::TokenStorage>) -> Self {
        let session = Arc::new(session::SessionStore::open(transport.clone(), storage));
        let borrowed = Arc::new(loans::BorrowedSync::new(
            loans::BorrowedSource,
            transport.clone(),
        ));

        Self {
            catalog: Arc::new(catalog::CatalogSync::new(
                catalog::CatalogSource,
                transport.clone(),
            )),
            recommendations: Arc::new(recommendations::RecommendationsSync::new(
                recommendations::RecommendationsSource,
                transport.clone(),
            )),
            loans: loans::LoansService::new(transport.clone(), session.clone(), borrowed.clone()),
            reviews: reviews::ReviewsService::new(transport, session.clone()),
            borrowed,
            session,
        }
    }
}
