use emi_core::CatalogService;
use emi_store::RunMode;

#[derive(Clone)]
pub struct AppState {
    pub catalog: CatalogService,
    /// Error bodies carry a `stack` only outside production
    pub expose_diagnostics: bool,
}

impl AppState {
    pub fn new(catalog: CatalogService, run_mode: RunMode) -> Self {
        Self {
            catalog,
            expose_diagnostics: !run_mode.is_production(),
        }
    }
}
