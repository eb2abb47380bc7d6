use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::db::Store;
use crate::services::{
    Argon2PasswordEncoder, ComplaintService, OrphanPhotoSweeper, PasswordEncoder, PhotoStore,
    SeaOrmComplaintService, SeaOrmStudentService, StudentService,
};

/// Services shared by the web layer, the scheduler and the CLI. Every
/// dependency is wired here explicitly and handed out as a trait object.
#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<Config>,

    pub store: Store,

    pub password_encoder: Arc<dyn PasswordEncoder>,

    pub student_service: Arc<dyn StudentService>,

    pub complaint_service: Arc<dyn ComplaintService>,

    pub photo_store: Arc<PhotoStore>,

    pub photo_sweeper: Arc<OrphanPhotoSweeper>,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        Ok(Self::with_store(config, store))
    }

    #[must_use]
    pub fn with_store(config: Config, store: Store) -> Self {
        let password_encoder: Arc<dyn PasswordEncoder> =
            Arc::new(Argon2PasswordEncoder::new(config.security.clone()));

        let student_service: Arc<dyn StudentService> = Arc::new(SeaOrmStudentService::new(
            store.clone(),
            password_encoder.clone(),
        ));

        let complaint_service: Arc<dyn ComplaintService> =
            Arc::new(SeaOrmComplaintService::new(store.clone()));

        let photo_store = Arc::new(PhotoStore::new(&config.uploads));

        let photo_sweeper = Arc::new(OrphanPhotoSweeper::new(
            store.clone(),
            &config.uploads.photo_dir,
            Duration::from_secs(config.uploads.orphan_grace_minutes * 60),
        ));

        Self {
            config: Arc::new(config),
            store,
            password_encoder,
            student_service,
            complaint_service,
            photo_store,
            photo_sweeper,
        }
    }
}
