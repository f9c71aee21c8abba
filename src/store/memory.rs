//! Thread-safe in-memory [`CredentialStore`] implementation for local development and tests.

// self
use crate::{
	_prelude::*,
	store::{CredentialKey, CredentialStore, StoreError, StoreFuture},
};

type StoreMap = Arc<RwLock<HashMap<CredentialKey, String>>>;

/// Storage backend that keeps credentials in-process; nothing survives a restart.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore(StoreMap);
impl MemoryStore {
	/// Returns the number of stored entries.
	pub fn len(&self) -> usize {
		self.0.read().len()
	}

	/// Returns `true` when no credential is stored.
	pub fn is_empty(&self) -> bool {
		self.0.read().is_empty()
	}

	fn set_now(map: StoreMap, key: CredentialKey, value: String) -> Result<(), StoreError> {
		map.write().insert(key, value);

		Ok(())
	}

	fn get_now(map: StoreMap, key: CredentialKey) -> Option<String> {
		map.read().get(&key).cloned()
	}

	fn remove_now(map: StoreMap, key: CredentialKey) {
		map.write().remove(&key);
	}
}
impl CredentialStore for MemoryStore {
	fn get(&self, key: CredentialKey) -> StoreFuture<'_, Option<String>> {
		let map = self.0.clone();

		Box::pin(async move { Ok(Self::get_now(map, key)) })
	}

	fn set(&self, key: CredentialKey, value: String) -> StoreFuture<'_, ()> {
		let map = self.0.clone();

		Box::pin(async move { Self::set_now(map, key, value) })
	}

	fn remove(&self, key: CredentialKey) -> StoreFuture<'_, ()> {
		let map = self.0.clone();

		Box::pin(async move {
			Self::remove_now(map, key);

			Ok(())
		})
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[tokio::test]
	async fn set_get_remove_round_trip() {
		let store = MemoryStore::default();

		store
			.set(CredentialKey::AccessToken, "access-1".into())
			.await
			.expect("Memory store writes should succeed.");

		assert_eq!(
			store.get(CredentialKey::AccessToken).await.expect("Memory store reads should succeed."),
			Some("access-1".into()),
		);
		assert_eq!(
			store.get(CredentialKey::RefreshToken).await.expect("Memory store reads should succeed."),
			None,
		);

		store.remove(CredentialKey::AccessToken).await.expect("Removal should succeed.");
		store.remove(CredentialKey::AccessToken).await.expect("Repeated removal is a no-op.");

		assert!(store.is_empty());
	}

	#[tokio::test]
	async fn clones_share_state() {
		let store = MemoryStore::default();
		let clone = store.clone();

		store
			.set(CredentialKey::RefreshToken, "refresh-1".into())
			.await
			.expect("Memory store writes should succeed.");

		assert_eq!(clone.len(), 1);
	}
}
