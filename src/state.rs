use std::sync::Arc;
use tokio::sync::RwLock;

use crate::config::Config;
use crate::db::Store;
use crate::services::{
    AuthService, CatalogService, RecipeService, SeaOrmAuthService, SeaOrmCatalogService,
    SeaOrmRecipeService, SeaOrmSocialService, SeaOrmUserService, SocialService, UserService,
};

#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<RwLock<Config>>,

    pub store: Store,

    pub auth_service: Arc<dyn AuthService>,

    pub user_service: Arc<dyn UserService>,

    pub catalog_service: Arc<dyn CatalogService>,

    pub recipe_service: Arc<dyn RecipeService>,

    pub social_service: Arc<dyn SocialService>,
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
        let config = Arc::new(RwLock::new(config));

        let auth_service = Arc::new(SeaOrmAuthService::new(store.clone()))
            as Arc<dyn AuthService>;

        let user_service = Arc::new(SeaOrmUserService::new(store.clone(), config.clone()))
            as Arc<dyn UserService>;

        let catalog_service = Arc::new(SeaOrmCatalogService::new(store.clone()))
            as Arc<dyn CatalogService>;

        let recipe_service = Arc::new(SeaOrmRecipeService::new(store.clone()))
            as Arc<dyn RecipeService>;

        let social_service = Arc::new(SeaOrmSocialService::new(store.clone()))
            as Arc<dyn SocialService>;

        Self {
            config,
            store,
            auth_service,
            user_service,
            catalog_service,
            recipe_service,
            social_service,
        }
    }
}
