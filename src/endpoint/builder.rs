// std
use std::iter::IntoIterator;
// self
use crate::{
	_prelude::*,
	endpoint::{ApiDescriptor, ApiRoute, DEFAULT_AUTH_PATHS},
};

/// Errors raised while constructing or validating descriptors.
#[derive(Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum ApiDescriptorError {
	/// Base URL must use HTTP or HTTPS.
	#[error("The base URL must use http or https: {url}.")]
	UnsupportedScheme {
		/// Base URL that failed validation.
		url: String,
	},
	/// Base URL cannot carry routes (e.g., `mailto:`).
	#[error("The base URL cannot be used as a base: {url}.")]
	CannotBeABase {
		/// Base URL that failed validation.
		url: String,
	},
	/// Base URL must not carry a query string or fragment.
	#[error("The base URL must not carry a query or fragment: {url}.")]
	BaseUrlHasQuery {
		/// Base URL that failed validation.
		url: String,
	},
	/// Routes are resolved relative to the base URL.
	#[error("Route {route:?} must be a non-empty relative path, got `{path}`.")]
	InvalidRoutePath {
		/// Route being overridden.
		route: ApiRoute,
		/// Offending path.
		path: String,
	},
	/// At least one auth path is required, or the refresh call itself would be authorized.
	#[error("Descriptor must declare at least one auth path.")]
	NoAuthPaths,
	/// Empty auth paths would match every URL.
	#[error("Auth paths must not be empty.")]
	EmptyAuthPath,
}

/// Builder for [`ApiDescriptor`] values.
#[derive(Debug)]
pub struct ApiDescriptorBuilder {
	/// Base URL every route resolves against.
	pub base_url: Url,
	/// Route overrides.
	pub routes: BTreeMap<ApiRoute, String>,
	/// Substrings that mark auth endpoints.
	pub auth_paths: Vec<String>,
}
impl ApiDescriptorBuilder {
	/// Creates a new builder seeded with the provided base URL and default auth paths.
	pub fn new(base_url: Url) -> Self {
		Self {
			base_url,
			routes: BTreeMap::new(),
			auth_paths: DEFAULT_AUTH_PATHS.iter().map(|p| (*p).to_owned()).collect(),
		}
	}

	/// Overrides the relative path of a single route.
	pub fn route(mut self, route: ApiRoute, path: impl Into<String>) -> Self {
		self.routes.insert(route, path.into());

		self
	}

	/// Replaces the auth path list.
	pub fn auth_paths<I, S>(mut self, paths: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.auth_paths = paths.into_iter().map(Into::into).collect();

		self
	}

	/// Consumes the builder and validates the resulting descriptor.
	pub fn build(self) -> Result<ApiDescriptor, ApiDescriptorError> {
		let mut base_url = self.base_url;

		if !base_url.path().ends_with('/') {
			let path = format!("{}/", base_url.path());

			base_url.set_path(&path);
		}

		let descriptor =
			ApiDescriptor { base_url, routes: self.routes, auth_paths: self.auth_paths };

		descriptor.validate()?;

		Ok(descriptor)
	}
}

impl ApiDescriptor {
	/// Validates invariants for the descriptor.
	fn validate(&self) -> Result<(), ApiDescriptorError> {
		validate_base_url(&self.base_url)?;

		for (route, path) in &self.routes {
			validate_route(*route, path)?;
		}

		if self.auth_paths.is_empty() {
			return Err(ApiDescriptorError::NoAuthPaths);
		}
		if self.auth_paths.iter().any(|p| p.is_empty()) {
			return Err(ApiDescriptorError::EmptyAuthPath);
		}

		Ok(())
	}
}

fn validate_base_url(url: &Url) -> Result<(), ApiDescriptorError> {
	if !matches!(url.scheme(), "http" | "https") {
		return Err(ApiDescriptorError::UnsupportedScheme { url: url.to_string() });
	}
	if url.cannot_be_a_base() {
		return Err(ApiDescriptorError::CannotBeABase { url: url.to_string() });
	}
	if url.query().is_some() || url.fragment().is_some() {
		return Err(ApiDescriptorError::BaseUrlHasQuery { url: url.to_string() });
	}

	Ok(())
}

fn validate_route(route: ApiRoute, path: &str) -> Result<(), ApiDescriptorError> {
	if path.is_empty() || path.starts_with('/') || path.contains("://") {
		Err(ApiDescriptorError::InvalidRoutePath { route, path: path.to_owned() })
	} else {
		Ok(())
	}
}
