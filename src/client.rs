//! The entry point callers use: single URLs, width srcsets, and resolution
//! srcsets for a configured set of CDN sources.
//!
//! [`ImageUrls`] holds an immutable snapshot of the validated configuration
//! and its [`EndpointRegistry`]. [`reconfigure`](ImageUrls::reconfigure)
//! validates a new config and swaps the whole snapshot at once; a request
//! that is already running keeps the snapshot it started with.

use crate::assemble::{self, UrlOptions};
use crate::config::CdnConfig;
use crate::error::{Error, Result};
use crate::registry::{EndpointRegistry, SourceConfig, replace_hostname};
use crate::types::{Params, VariantDescriptor};
use crate::variants::{self, VariantPlan};
use crate::widths::{BaseDimensions, Tolerance, WidthBounds, WidthSetGenerator};
use std::sync::{Arc, PoisonError, RwLock};
use tracing::debug;

/// One image request: what to fetch, from where, with which parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageRequest {
    pub path: String,
    /// Source domain to use; `None` for the default source.
    pub source: Option<String>,
    pub params: Params,
    /// Use the path as given instead of percent-encoding it.
    pub disable_path_encoding: bool,
}

impl ImageRequest {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    pub fn source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.params.insert(key.into(), value.to_string());
        self
    }

    pub fn params(mut self, params: Params) -> Self {
        self.params.extend(params);
        self
    }
}

#[derive(Debug)]
struct Snapshot {
    config: CdnConfig,
    registry: EndpointRegistry,
    hostnames: Vec<String>,
    tolerance: Tolerance,
}

impl Snapshot {
    fn build(config: CdnConfig) -> Result<Self> {
        config.validate()?;
        let registry = EndpointRegistry::from_config(&config)?;
        let tolerance = Tolerance::new(config.srcset_width_tolerance)
            .map_err(|e| Error::Configuration(e.to_string()))?;
        Ok(Self {
            hostnames: config.replaced_hostnames(),
            registry,
            tolerance,
            config,
        })
    }

    fn options(&self, request: &ImageRequest) -> UrlOptions {
        UrlOptions {
            use_https: self.config.use_https,
            include_library_param: self.config.include_library_param,
            encode_path: !request.disable_path_encoding,
        }
    }

    /// Rehome the path and resolve its source.
    fn prepare<'r>(
        &self,
        request: &'r ImageRequest,
    ) -> Result<(&'r str, &SourceConfig)> {
        if request.path.is_empty() {
            return Err(Error::InvalidArgument("path missing".into()));
        }
        let path = replace_hostname(&request.path, &self.hostnames);
        let source = self
            .registry
            .resolve_for_path(request.source.as_deref(), path)?;
        Ok((path, source))
    }

    fn describe(&self, request: &ImageRequest, plans: Vec<VariantPlan>) -> Result<Vec<VariantDescriptor>> {
        let (path, source) = self.prepare(request)?;
        let options = self.options(request);
        Ok(plans
            .into_iter()
            .map(|plan| VariantDescriptor {
                url: assemble::build_url(source, path, &plan.params, &options),
                label: plan.label,
            })
            .collect())
    }
}

/// URL builder over a validated CDN configuration.
#[derive(Debug)]
pub struct ImageUrls {
    snapshot: RwLock<Arc<Snapshot>>,
    widths: WidthSetGenerator,
}

impl ImageUrls {
    /// Validate `config` and build the registry for it.
    pub fn new(config: CdnConfig) -> Result<Self> {
        Self::with_generator(config, WidthSetGenerator::new())
    }

    /// Like [`new`](Self::new), with a caller-provided width generator (for
    /// sharing one ladder cache between several builders).
    pub fn with_generator(config: CdnConfig, widths: WidthSetGenerator) -> Result<Self> {
        let snapshot = Snapshot::build(config)?;
        Ok(Self {
            snapshot: RwLock::new(Arc::new(snapshot)),
            widths,
        })
    }

    /// Replace the configuration. On error the previous one stays active.
    pub fn reconfigure(&self, config: CdnConfig) -> Result<()> {
        let snapshot = Arc::new(Snapshot::build(config)?);
        *self.snapshot.write().unwrap_or_else(PoisonError::into_inner) = snapshot;
        debug!("configuration replaced");
        Ok(())
    }

    /// The active configuration.
    pub fn config(&self) -> CdnConfig {
        self.current().config.clone()
    }

    pub fn width_generator(&self) -> &WidthSetGenerator {
        &self.widths
    }

    fn current(&self) -> Arc<Snapshot> {
        self.snapshot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// A single URL for `request`.
    pub fn build_url(&self, request: &ImageRequest) -> Result<String> {
        let snapshot = self.current();
        let (path, source) = snapshot.prepare(request)?;
        Ok(assemble::build_url(
            source,
            path,
            &request.params,
            &snapshot.options(request),
        ))
    }

    /// A `w`-descriptor srcset for `request`.
    ///
    /// Widths come from `bounds` (explicit widths, or the standard ladder
    /// filtered to min/max); a base width adds its 1×/2×/3× multiples and,
    /// with a base height, fixes the aspect ratio of every variant.
    pub fn build_width_srcset(
        &self,
        request: &ImageRequest,
        bounds: &WidthBounds,
        base: &BaseDimensions,
    ) -> Result<Vec<VariantDescriptor>> {
        let snapshot = self.current();
        let widths = self.widths.generate(bounds, base, snapshot.tolerance)?;
        debug!(path = %request.path, variants = widths.len(), "width srcset");
        let plans = variants::width_variants(
            &widths,
            base,
            &request.params,
            snapshot.config.variable_quality,
        );
        snapshot.describe(request, plans)
    }

    /// An `x`-descriptor srcset over the configured resolutions.
    pub fn build_resolution_srcset(&self, request: &ImageRequest) -> Result<Vec<VariantDescriptor>> {
        let snapshot = self.current();
        let plans = variants::resolution_variants(
            &snapshot.config.responsive_resolutions,
            &request.params,
            snapshot.config.variable_quality,
        );
        snapshot.describe(request, plans)
    }
}
