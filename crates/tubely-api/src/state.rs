//! Application state shared by every handler.
//!
//! Collaborators sit behind trait objects so tests can swap in fakes for the record
//! store, object store and media tools.

use crate::auth::JwtVerifier;
use crate::services::PresignService;
use std::sync::Arc;
use tubely_core::Config;
use tubely_db::VideoRepository;
use tubely_processing::{ContainerRemuxer, MediaProber};
use tubely_storage::{LocalAssetStorage, ObjectStorage};

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub videos: Arc<dyn VideoRepository>,
    /// Public thumbnail assets
    pub assets: LocalAssetStorage,
    /// Private video objects
    pub object_storage: Arc<dyn ObjectStorage>,
    pub presigner: PresignService,
    pub prober: Arc<dyn MediaProber>,
    pub remuxer: Arc<dyn ContainerRemuxer>,
    pub jwt: JwtVerifier,
}

impl AppState {
    pub fn new(
        config: Config,
        videos: Arc<dyn VideoRepository>,
        assets: LocalAssetStorage,
        object_storage: Arc<dyn ObjectStorage>,
        prober: Arc<dyn MediaProber>,
        remuxer: Arc<dyn ContainerRemuxer>,
    ) -> Self {
        let jwt = JwtVerifier::new(config.jwt_secret());
        let presigner = PresignService::new(object_storage.clone());
        Self {
            config,
            videos,
            assets,
            object_storage,
            presigner,
            prober,
            remuxer,
            jwt,
        }
    }
}
