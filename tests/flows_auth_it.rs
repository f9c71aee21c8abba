#![cfg(all(feature = "reqwest", feature = "test"))]

// crates.io
use httpmock::prelude::*;
// self
use newsdesk_client::{
	_preludet::*,
	auth::CredentialPair,
	http_types::StatusCode,
	session::SignOutReason,
	store::{CredentialKey, CredentialStore},
};

#[tokio::test]
async fn login_stores_credentials() {
	let server = MockServer::start_async().await;
	let (client, store, _) = build_reqwest_test_client(&server.base_url());
	let mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/users/login/")
				.header("content-type", "application/json")
				.body(r#"{"email":"reader@example.com","password":"correct horse"}"#);
			then.status(200)
				.header("content-type", "application/json")
				.body(r#"{"access":"T1","refresh":"R1"}"#);
		})
		.await;
	let pair = client.login("reader@example.com", "correct horse").await.expect("Login should succeed.");

	mock.assert_async().await;

	assert_eq!(pair, CredentialPair::new("T1", "R1"));
	assert_eq!(
		store.get(CredentialKey::AccessToken).await.expect("Store reads should succeed."),
		Some("T1".into()),
	);
	assert!(client.session().signed_in());
}

#[tokio::test]
async fn login_rejection_prefers_email_errors() {
	let server = MockServer::start_async().await;
	let (client, store, hook) = build_reqwest_test_client(&server.base_url());
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/users/login/");
			then.status(400)
				.header("content-type", "application/json")
				.body(r#"{"password":["This field may not be blank."],"email":["Enter a valid email address."]}"#);
		})
		.await;
	let err = client.login("not-an-email", "").await.expect_err("Login should be rejected.");

	mock.assert_async().await;

	assert!(matches!(err, Error::Validation { ref message } if message == "Enter a valid email address."));
	assert!(store.is_empty());
	assert_eq!(hook.count(), 0);
}

#[tokio::test]
async fn login_server_errors_are_not_validation_errors() {
	let server = MockServer::start_async().await;
	let (client, _, _) = build_reqwest_test_client(&server.base_url());
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/users/login/");
			then.status(503).body("Service Unavailable");
		})
		.await;
	let err = client.login("reader@example.com", "secret").await.expect_err("Login should fail.");

	mock.assert_async().await;

	assert_eq!(err.status(), Some(StatusCode::SERVICE_UNAVAILABLE));
}

#[tokio::test]
async fn register_returns_profile_without_signing_in() {
	let server = MockServer::start_async().await;
	let (client, store, _) = build_reqwest_test_client(&server.base_url());
	let mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/users/register/")
				.body(r#"{"name":"Ada","email":"ada@example.com","password":"analytical"}"#);
			then.status(201)
				.header("content-type", "application/json")
				.body(r#"{"id":7,"name":"Ada","email":"ada@example.com"}"#);
		})
		.await;
	let user = client
		.register("Ada", "ada@example.com", "analytical")
		.await
		.expect("Registration should succeed.");

	mock.assert_async().await;

	assert_eq!(user.id, 7);
	assert!(store.is_empty());
}

#[tokio::test]
async fn register_rejection_flattens_other_fields() {
	let server = MockServer::start_async().await;
	let (client, _, _) = build_reqwest_test_client(&server.base_url());
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/users/register/");
			then.status(400)
				.header("content-type", "application/json")
				.body(r#"{"name":["This field is required."],"detail":"Check the form."}"#);
		})
		.await;
	let err = client.register("", "ada@example.com", "analytical").await.expect_err("Rejected.");

	mock.assert_async().await;

	match err {
		Error::Validation { message } => {
			assert!(message.contains("This field is required."));
			assert!(message.contains("Check the form."));
		},
		other => panic!("Expected a validation error, got {other:?}."),
	}
}

#[tokio::test]
async fn logout_notifies_backend_then_clears_credentials() {
	let server = MockServer::start_async().await;
	let (client, store, hook) = build_reqwest_test_client(&server.base_url());

	seed_credentials(store.as_ref(), &CredentialPair::new("T1", "R1")).await;

	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/dashboard/logout/").header("authorization", "Bearer T1");
			then.status(200)
				.header("content-type", "application/json")
				.body(r#"{"message":"Successfully logged out"}"#);
		})
		.await;

	client.logout().await.expect("Logout should succeed.");
	mock.assert_async().await;

	assert!(store.is_empty());
	assert_eq!(hook.reasons(), vec![SignOutReason::Logout]);
}

#[tokio::test]
async fn logout_clears_credentials_when_backend_fails() {
	let server = MockServer::start_async().await;
	let (client, store, hook) = build_reqwest_test_client(&server.base_url());

	seed_credentials(store.as_ref(), &CredentialPair::new("T1", "R1")).await;

	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/dashboard/logout/");
			then.status(500);
		})
		.await;

	client.logout().await.expect("Server-side failures should not surface.");
	mock.assert_async().await;

	assert!(store.is_empty());
	assert_eq!(hook.count(), 1);
}
