//! Application state shared across handlers.
//!
//! Constructed once in `main` and cloned into every handler: the pool and
//! the services around it are injected, never reached through globals.

use sqlx::PgPool;

use crate::assistant::AssistantClient;
use crate::jwt::JwtService;
use crate::repositories::{
    UserRepository, blog::BlogRepository, gallery::GalleryRepository,
    inquiry::ContactRepository, inquiry::QuotationRepository, ledger::ExpenditureRepository,
    ledger::PaymentRepository, project::ProjectRepository, settings::SettingsRepository,
    ticket::TicketRepository,
};
use crate::uploads::UploadStore;

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub jwt_service: JwtService,
    pub uploads: UploadStore,
    pub assistant: AssistantClient,
    pub user_repository: UserRepository,
    pub expenditure_repository: ExpenditureRepository,
    pub payment_repository: PaymentRepository,
    pub project_repository: ProjectRepository,
    pub blog_repository: BlogRepository,
    pub ticket_repository: TicketRepository,
    pub gallery_repository: GalleryRepository,
    pub quotation_repository: QuotationRepository,
    pub contact_repository: ContactRepository,
    pub settings_repository: SettingsRepository,
}

impl AppState {
    /// Wire every repository onto the given pool.
    pub fn new(
        pool: PgPool,
        jwt_service: JwtService,
        uploads: UploadStore,
        assistant: AssistantClient,
    ) -> Self {
        Self {
            jwt_service,
            uploads,
            assistant,
            user_repository: UserRepository::new(pool.clone()),
            expenditure_repository: ExpenditureRepository::new(pool.clone()),
            payment_repository: PaymentRepository::new(pool.clone()),
            project_repository: ProjectRepository::new(pool.clone()),
            blog_repository: BlogRepository::new(pool.clone()),
            ticket_repository: TicketRepository::new(pool.clone()),
            gallery_repository: GalleryRepository::new(pool.clone()),
            quotation_repository: QuotationRepository::new(pool.clone()),
            contact_repository: ContactRepository::new(pool.clone()),
            settings_repository: SettingsRepository::new(pool.clone()),
            db_pool: pool,
        }
    }
}
