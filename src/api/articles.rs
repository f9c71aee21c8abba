//! Article listing, detail, and pagination helpers.

// std
use std::collections::HashSet;
// self
use crate::{
	_prelude::*,
	endpoint::ApiRoute,
	flows::NewsClient,
	http::{ApiRequest, ApiTransport},
};

/// Page size the backend applies when the query does not set one.
pub const DEFAULT_PAGE_SIZE: u32 = 9;

/// Error returned when a category label is not recognized.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
#[error("Unknown article category `{0}`.")]
pub struct UnknownCategory(pub String);

/// Article categories understood by the backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
	/// Technology news.
	Technology,
	/// Sports news.
	Sports,
	/// Entertainment news.
	Entertainment,
	/// Political news.
	Politics,
	/// Science news.
	Science,
}
impl Category {
	/// Every category, in display order.
	pub const ALL: [Self; 5] =
		[Self::Technology, Self::Sports, Self::Entertainment, Self::Politics, Self::Science];

	/// Wire label used in query strings and payloads.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Technology => "technology",
			Self::Sports => "sports",
			Self::Entertainment => "entertainment",
			Self::Politics => "politics",
			Self::Science => "science",
		}
	}
}
impl Display for Category {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
impl FromStr for Category {
	type Err = UnknownCategory;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let label = s.trim();

		Self::ALL
			.into_iter()
			.find(|category| category.as_str().eq_ignore_ascii_case(label))
			.ok_or_else(|| UnknownCategory(s.to_owned()))
	}
}

/// News article as served by the listing and detail routes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
	/// Backend identifier.
	pub id: u64,
	/// Headline.
	pub title: String,
	/// Summary or body text.
	pub content: String,
	/// Ingestion time.
	#[serde(with = "time::serde::rfc3339")]
	pub created_at: OffsetDateTime,
	/// Last modification time.
	#[serde(with = "time::serde::rfc3339")]
	pub updated_at: OffsetDateTime,
	/// Byline, when the source provides one.
	#[serde(default)]
	pub author: Option<String>,
	/// Original publication URL.
	pub source_url: String,
	/// Lead image URL.
	#[serde(default)]
	pub media_url: Option<String>,
	/// Raw category label; see [`Article::category`].
	pub category: String,
	/// Whether the signed-in user bookmarked this article.
	#[serde(default)]
	pub is_bookmarked: bool,
}
impl Article {
	/// Parsed category, or `None` for labels this client does not know.
	pub fn category(&self) -> Option<Category> {
		self.category.parse().ok()
	}
}

/// Page-number paginated listing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
	/// Total number of items across all pages.
	pub count: u64,
	/// Absolute URL of the next page.
	#[serde(default)]
	pub next: Option<String>,
	/// Absolute URL of the previous page.
	#[serde(default)]
	pub previous: Option<String>,
	/// Items on this page.
	pub results: Vec<T>,
}
impl<T> Page<T> {
	/// Number of pages needed for `count` items at `page_size` items per page.
	pub fn total_pages(&self, page_size: u32) -> u64 {
		match page_size {
			0 => 0,
			size => self.count.div_ceil(u64::from(size)),
		}
	}

	/// Returns `true` when another page follows this one.
	pub fn has_next(&self) -> bool {
		self.next.is_some()
	}
}
impl Page<Article> {
	/// Drops the listed articles from this page (e.g., ones the user already bookmarked).
	///
	/// `count` is left untouched; it still describes the server-side listing.
	pub fn without<I>(mut self, article_ids: I) -> Self
	where
		I: IntoIterator<Item = u64>,
	{
		let excluded = article_ids.into_iter().collect::<HashSet<_>>();

		self.results.retain(|article| !excluded.contains(&article.id));

		self
	}
}

/// Filters for the article listing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ArticleQuery {
	/// Restrict to one category.
	pub category: Option<Category>,
	/// One-based page number.
	pub page: u32,
	/// Items per page; the backend default applies when unset.
	pub page_size: Option<u32>,
}
impl ArticleQuery {
	/// First page, every category.
	pub fn new() -> Self {
		Self::default()
	}

	/// Restricts the listing to `category`.
	pub fn category(mut self, category: Category) -> Self {
		self.category = Some(category);

		self
	}

	/// Selects a one-based page; `0` is treated as the first page.
	pub fn page(mut self, page: u32) -> Self {
		self.page = page.max(1);

		self
	}

	/// Overrides the page size.
	pub fn page_size(mut self, page_size: u32) -> Self {
		self.page_size = Some(page_size);

		self
	}

	/// Page size the backend will apply.
	pub fn effective_page_size(&self) -> u32 {
		self.page_size.unwrap_or(DEFAULT_PAGE_SIZE)
	}

	fn pairs(&self) -> Vec<(&'static str, String)> {
		let mut pairs = vec![("page", self.page.max(1).to_string())];

		if let Some(category) = self.category {
			pairs.push(("category", category.as_str().to_owned()));
		}
		if let Some(size) = self.page_size {
			pairs.push(("page_size", size.to_string()));
		}

		pairs
	}
}
impl Default for ArticleQuery {
	fn default() -> Self {
		Self { category: None, page: 1, page_size: None }
	}
}

impl<C> NewsClient<C>
where
	C: ?Sized + ApiTransport,
{
	/// Lists articles, newest first.
	pub async fn articles(&self, query: ArticleQuery) -> Result<Page<Article>> {
		let url = self.descriptor().url(ApiRoute::Articles)?;

		self.fetch_json(ApiRequest::get(url).query(query.pairs())).await
	}

	/// Loads a single article; the backend records the view.
	pub async fn article(&self, article_id: u64) -> Result<Article> {
		self.fetch_json(ApiRequest::get(self.descriptor().article_url(article_id)?)).await
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn article(id: u64) -> Article {
		serde_json::from_value(serde_json::json!({
			"id": id,
			"title": "Quantum chips reach new milestone",
			"content": "Quantum chips reach a milestone in error correction.",
			"created_at": "2024-10-01T08:30:00.123456Z",
			"updated_at": "2024-10-01T09:00:00+00:00",
			"author": null,
			"source_url": "https://news.example.com/quantum",
			"media_url": "https://cdn.example.com/quantum.jpg",
			"category": "technology"
		}))
		.expect("Article fixture should decode.")
	}

	#[test]
	fn categories_parse_case_insensitively() {
		assert_eq!("Science".parse::<Category>(), Ok(Category::Science));
		assert_eq!(" SPORTS ".parse::<Category>(), Ok(Category::Sports));
		assert_eq!(
			"weather".parse::<Category>(),
			Err(UnknownCategory("weather".into())),
		);
	}

	#[test]
	fn articles_decode_rfc3339_timestamps() {
		let article = article(1);

		assert_eq!(article.created_at.year(), 2024);
		assert_eq!(article.category(), Some(Category::Technology));
		assert!(!article.is_bookmarked);
	}

	#[test]
	fn pages_count_and_filter() {
		let page = Page {
			count: 19,
			next: Some("http://127.0.0.1:8000/dashboard/articles/?page=2".into()),
			previous: None,
			results: vec![article(1), article(2), article(3)],
		};

		assert_eq!(page.total_pages(DEFAULT_PAGE_SIZE), 3);
		assert_eq!(page.total_pages(0), 0);
		assert!(page.has_next());

		let page = page.without([2]);

		assert_eq!(page.results.iter().map(|a| a.id).collect::<Vec<_>>(), vec![1, 3]);
		assert_eq!(page.count, 19);
	}

	#[test]
	fn queries_clamp_the_page_number() {
		let query = ArticleQuery::new().page(0).category(Category::Politics).page_size(12);

		assert_eq!(query.page, 1);
		assert_eq!(query.effective_page_size(), 12);
		assert_eq!(
			query.pairs(),
			vec![
				("page", "1".to_owned()),
				("category", "politics".to_owned()),
				("page_size", "12".to_owned()),
			],
		);
	}
}
