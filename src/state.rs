use std::sync::Arc;
use tokio::sync::RwLock;

use crate::clients::directory::{HttpDirectory, SeedDirectory, StudentDirectory};
use crate::config::{Config, DirectoryMode};
use crate::db::Store;
use crate::services::{
    ActivityService, CredentialService, ResetService, SeaOrmCredentialServiceImpl,
    SeaOrmResetServiceImpl, SeaOrmSessionServiceImpl, SessionService,
};
use crate::token::TokenSigner;

#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<RwLock<Config>>,

    pub store: Store,

    pub directory: Arc<dyn StudentDirectory>,

    pub activity: ActivityService,

    pub credential_service: Arc<dyn CredentialService>,

    pub session_service: Arc<dyn SessionService>,

    pub reset_service: Arc<dyn ResetService>,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        let directory: Arc<dyn StudentDirectory> = match config.directory.mode {
            DirectoryMode::Seed => Arc::new(SeedDirectory::new(&config.directory)),
            DirectoryMode::Http => Arc::new(HttpDirectory::new(&config.directory)?),
        };

        let signer = TokenSigner::new(
            &config.security.jwt_secret,
            config.security.session_ttl_minutes,
        );

        let activity = ActivityService::new(store.clone());

        let credential_service = Arc::new(SeaOrmCredentialServiceImpl::new(
            store.clone(),
            directory.clone(),
            config.security.clone(),
        )) as Arc<dyn CredentialService>;

        let session_service = Arc::new(SeaOrmSessionServiceImpl::new(
            store.clone(),
            directory.clone(),
            activity.clone(),
            signer,
            config.security.session_ttl_minutes,
        )) as Arc<dyn SessionService>;

        let reset_service = Arc::new(SeaOrmResetServiceImpl::new(
            store.clone(),
            directory.clone(),
            config.security.clone(),
        )) as Arc<dyn ResetService>;

        Ok(Self {
            config: Arc::new(RwLock::new(config)),
            store,
            directory,
            activity,
            credential_service,
            session_service,
            reset_service,
        })
    }
}
