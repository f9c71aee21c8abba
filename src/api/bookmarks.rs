//! Bookmark listing, creation, and removal.

// crates.io
use http::StatusCode;
// self
use crate::{
	_prelude::*,
	endpoint::ApiRoute,
	flows::NewsClient,
	http::{ApiRequest, ApiTransport},
};

const ALREADY_BOOKMARKED: &str = "Article already bookmarked";

/// Saved article, flattened with the article fields the bookmark view needs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bookmark {
	/// Bookmark identifier.
	pub id: u64,
	/// Bookmarked article identifier.
	pub article_id: u64,
	/// Article headline.
	pub article_title: String,
	/// Article source URL.
	pub article_url: String,
	/// Article summary.
	pub article_content: String,
	/// Article lead image.
	#[serde(default)]
	pub article_media_url: Option<String>,
	/// When the bookmark was created.
	#[serde(with = "time::serde::rfc3339")]
	pub created_at: OffsetDateTime,
	/// Owner identifier.
	#[serde(default)]
	pub user: Option<u64>,
}

/// Result of [`NewsClient::add_bookmark`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BookmarkOutcome {
	/// A new bookmark was created.
	Added(Bookmark),
	/// The article was bookmarked before; nothing changed.
	AlreadyBookmarked,
}

#[derive(Serialize)]
struct NewBookmark {
	article_id: u64,
}

#[derive(Deserialize)]
struct Created {
	bookmark: Bookmark,
}

#[derive(Deserialize)]
struct Message {
	message: String,
}

impl<C> NewsClient<C>
where
	C: ?Sized + ApiTransport,
{
	/// Lists every bookmark of the signed-in user.
	pub async fn bookmarks(&self) -> Result<Vec<Bookmark>> {
		self.fetch_json(ApiRequest::get(self.descriptor().url(ApiRoute::Bookmarks)?)).await
	}

	/// Bookmarks an article. Bookmarking twice is not an error.
	pub async fn add_bookmark(&self, article_id: u64) -> Result<BookmarkOutcome> {
		let request = ApiRequest::post(self.descriptor().url(ApiRoute::Bookmarks)?)
			.json(&NewBookmark { article_id })?;

		match self.fetch_json::<Created>(request).await {
			Ok(created) => Ok(BookmarkOutcome::Added(created.bookmark)),
			Err(Error::Status(status))
				if status.status == StatusCode::BAD_REQUEST
					&& serde_json::from_str::<Message>(&status.body)
						.is_ok_and(|m| m.message == ALREADY_BOOKMARKED) =>
				Ok(BookmarkOutcome::AlreadyBookmarked),
			Err(err) => Err(err),
		}
	}

	/// Removes the bookmark held on `article_id`.
	///
	/// A 404 (no such article, or no bookmark on it) surfaces as
	/// [`Error::BookmarkNotFound`].
	pub async fn remove_bookmark(&self, article_id: u64) -> Result<()> {
		let request = ApiRequest::delete(self.descriptor().bookmark_url(article_id)?);

		match self.authorizer.dispatch(request).await {
			Ok(_) => Ok(()),
			Err(err) if err.status() == Some(StatusCode::NOT_FOUND) =>
				Err(Error::BookmarkNotFound { article_id }),
			Err(err) => Err(err),
		}
	}
}
