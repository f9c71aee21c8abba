//! Backend API descriptor: base URL, route table, and the auth endpoints exempt from bearer
//! authorization.
//!
//! Routes are relative paths resolved against the base URL, so a deployment only needs to
//! change the base URL (or override individual routes through [`ApiDescriptorBuilder`]).

/// Builder API for assembling API descriptors.
pub mod builder;

pub use builder::*;

// self
use crate::{_prelude::*, error::ConfigError};

/// Default substrings that identify auth endpoints in request URLs.
pub const DEFAULT_AUTH_PATHS: [&str; 4] = ["/login/", "/register/", "/refresh/", "/logout/"];

/// Named backend routes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiRoute {
	/// `POST` credentials, receive a token pair.
	Login,
	/// `POST` a new account.
	Register,
	/// `POST` with the refresh token as bearer, receive a new access token.
	Refresh,
	/// `POST` to end the server-side session.
	Logout,
	/// Profile of the signed-in user.
	CurrentUser,
	/// Dashboard greeting and user summary.
	Dashboard,
	/// Paginated article listing; article detail lives below it.
	Articles,
	/// Articles recommended for the user.
	RecommendedArticles,
	/// Trending articles.
	TrendingArticles,
	/// Number of articles the user has opened.
	ArticleViewCount,
	/// Bookmark listing and creation; removal lives below it.
	Bookmarks,
	/// Number of bookmarks the user holds.
	BookmarkCount,
	/// Weather report with AI insights.
	Weather,
}
impl ApiRoute {
	/// Every route, in declaration order.
	pub const ALL: [Self; 13] = [
		Self::Login,
		Self::Register,
		Self::Refresh,
		Self::Logout,
		Self::CurrentUser,
		Self::Dashboard,
		Self::Articles,
		Self::RecommendedArticles,
		Self::TrendingArticles,
		Self::ArticleViewCount,
		Self::Bookmarks,
		Self::BookmarkCount,
		Self::Weather,
	];

	/// Path used when the descriptor does not override the route.
	pub const fn default_path(self) -> &'static str {
		match self {
			Self::Login => "users/login/",
			Self::Register => "users/register/",
			Self::Refresh => "users/refresh/",
			Self::Logout => "dashboard/logout/",
			Self::CurrentUser => "users/user/",
			Self::Dashboard => "dashboard/",
			Self::Articles => "dashboard/articles/",
			Self::RecommendedArticles => "dashboard/articles/recommended/",
			Self::TrendingArticles => "dashboard/articles/trending/",
			Self::ArticleViewCount => "dashboard/articles/view-count/",
			Self::Bookmarks => "dashboard/bookmarks/",
			Self::BookmarkCount => "dashboard/bookmarks/count/",
			Self::Weather => "dashboard/weather/",
		}
	}
}

/// Immutable API descriptor consumed by the authorizer and resource calls.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiDescriptor {
	/// Base URL every route resolves against; always ends with `/`.
	pub base_url: Url,
	/// Route overrides; routes missing here use [`ApiRoute::default_path`].
	pub routes: BTreeMap<ApiRoute, String>,
	/// Substrings that mark a request URL as an auth endpoint.
	pub auth_paths: Vec<String>,
}
impl ApiDescriptor {
	/// Creates a new builder for the provided base URL.
	pub fn builder(base_url: Url) -> ApiDescriptorBuilder {
		ApiDescriptorBuilder::new(base_url)
	}

	/// Builds a descriptor with default routes and auth paths.
	pub fn new(base_url: Url) -> Result<Self> {
		Ok(Self::builder(base_url).build().map_err(ConfigError::from)?)
	}

	/// Returns the relative path configured for `route`.
	pub fn path(&self, route: ApiRoute) -> &str {
		self.routes.get(&route).map(String::as_str).unwrap_or(route.default_path())
	}

	/// Resolves `route` against the base URL.
	pub fn url(&self, route: ApiRoute) -> Result<Url> {
		self.join(self.path(route))
	}

	/// Detail URL of a single article.
	pub fn article_url(&self, article_id: u64) -> Result<Url> {
		self.join(&format!("{}{article_id}/", self.path(ApiRoute::Articles)))
	}

	/// Removal URL of a single bookmark, keyed by article.
	pub fn bookmark_url(&self, article_id: u64) -> Result<Url> {
		self.join(&format!("{}{article_id}/", self.path(ApiRoute::Bookmarks)))
	}

	/// Returns `true` when `url` targets an auth endpoint (login, register, refresh, logout).
	///
	/// Matching is by substring, so the check holds whatever host or prefix the deployment
	/// uses.
	pub fn is_auth_endpoint(&self, url: &Url) -> bool {
		let target = url.as_str();

		self.auth_paths.iter().any(|path| target.contains(path.as_str()))
	}

	fn join(&self, route: &str) -> Result<Url> {
		self.base_url
			.join(route)
			.map_err(|source| ConfigError::InvalidRoute { route: route.to_owned(), source }.into())
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn descriptor() -> ApiDescriptor {
		ApiDescriptor::new(
			Url::parse("http://127.0.0.1:8000").expect("Base URL fixture should parse."),
		)
		.expect("Default descriptor should build.")
	}

	#[test]
	fn default_routes_resolve_against_base() {
		let descriptor = descriptor();

		assert_eq!(
			descriptor.url(ApiRoute::Login).expect("Login route should resolve.").as_str(),
			"http://127.0.0.1:8000/users/login/",
		);
		assert_eq!(
			descriptor.article_url(42).expect("Article route should resolve.").as_str(),
			"http://127.0.0.1:8000/dashboard/articles/42/",
		);
		assert_eq!(
			descriptor.bookmark_url(7).expect("Bookmark route should resolve.").as_str(),
			"http://127.0.0.1:8000/dashboard/bookmarks/7/",
		);
	}

	#[test]
	fn auth_endpoints_match_by_substring() {
		let descriptor = descriptor();

		for route in [ApiRoute::Login, ApiRoute::Register, ApiRoute::Refresh, ApiRoute::Logout] {
			let url = descriptor.url(route).expect("Auth route should resolve.");

			assert!(descriptor.is_auth_endpoint(&url), "{route:?} should be an auth endpoint.");
		}
		for route in ApiRoute::ALL.into_iter().filter(|r| {
			!matches!(r, ApiRoute::Login | ApiRoute::Register | ApiRoute::Refresh | ApiRoute::Logout)
		}) {
			let url = descriptor.url(route).expect("Resource route should resolve.");

			assert!(!descriptor.is_auth_endpoint(&url), "{route:?} should be protected.");
		}
	}
}
