use std::sync::Arc;

use cuimap_service::{CuimapService, Providers, ResolverContext};

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<CuimapService>,
}
impl AppState {
	/// Loads the dictionary, index and lab-test table once; they are shared read-only by every
	/// request.
	pub async fn new(config: cuimap_config::Config) -> color_eyre::Result<Self> {
		let context = ResolverContext::load(&config).await?;
		let providers = Providers::from_config(&config)?;

		Ok(Self::from_service(CuimapService::new(config, context, providers)))
	}

	pub fn from_service(service: CuimapService) -> Self {
		Self { service: Arc::new(service) }
	}
}
