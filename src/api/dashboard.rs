//! Dashboard greeting, profile, and per-user counters.

// self
use crate::{
	_prelude::*,
	api::Article,
	endpoint::ApiRoute,
	flows::NewsClient,
	http::{ApiRequest, ApiTransport},
};

/// Account profile.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
	/// Backend identifier.
	pub id: u64,
	/// Display name.
	pub name: String,
	/// Account email.
	pub email: String,
}

/// Payload of the dashboard landing route.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardData {
	/// Greeting rendered above the dashboard.
	pub message: String,
	/// Signed-in user.
	pub user: User,
}

#[derive(Deserialize)]
struct ViewCount {
	view_count: u64,
}

#[derive(Deserialize)]
struct BookmarkCount {
	bookmark_count: u64,
}

impl<C> NewsClient<C>
where
	C: ?Sized + ApiTransport,
{
	/// Loads the dashboard greeting and user summary.
	pub async fn dashboard(&self) -> Result<DashboardData> {
		self.fetch_json(ApiRequest::get(self.descriptor().url(ApiRoute::Dashboard)?)).await
	}

	/// Loads the signed-in user's profile.
	pub async fn current_user(&self) -> Result<User> {
		self.fetch_json(ApiRequest::get(self.descriptor().url(ApiRoute::CurrentUser)?)).await
	}

	/// Articles recommended for the signed-in user.
	pub async fn recommended_articles(&self) -> Result<Vec<Article>> {
		self.fetch_json(ApiRequest::get(self.descriptor().url(ApiRoute::RecommendedArticles)?))
			.await
	}

	/// Currently trending articles.
	pub async fn trending_articles(&self) -> Result<Vec<Article>> {
		self.fetch_json(ApiRequest::get(self.descriptor().url(ApiRoute::TrendingArticles)?)).await
	}

	/// Number of bookmarks the user holds.
	pub async fn bookmark_count(&self) -> Result<u64> {
		let count: BookmarkCount = self
			.fetch_json(ApiRequest::get(self.descriptor().url(ApiRoute::BookmarkCount)?))
			.await?;

		Ok(count.bookmark_count)
	}

	/// Number of article detail views recorded for the user.
	pub async fn view_count(&self) -> Result<u64> {
		let count: ViewCount = self
			.fetch_json(ApiRequest::get(self.descriptor().url(ApiRoute::ArticleViewCount)?))
			.await?;

		Ok(count.view_count)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn dashboard_payload_decodes() {
		let data: DashboardData = serde_json::from_str(
			r#"{"message":"Welcome to your dashboard!","user":{"id":3,"name":"Ada","email":"ada@example.com"}}"#,
		)
		.expect("Dashboard payload should decode.");

		assert_eq!(data.user.name, "Ada");
		assert_eq!(data.message, "Welcome to your dashboard!");
	}
}
