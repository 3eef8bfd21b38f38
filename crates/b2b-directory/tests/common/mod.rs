//! Common test utilities for b2b-directory integration tests.

#![allow(dead_code)]

use b2b_directory::{DirectoryConfig, EntraCloudEnvironment, EntraCredentials, EntraDirectory};
use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TENANT_ID: &str = "test-tenant";

/// Test data factory for an internal member.
pub fn create_member(id: &str, prefix: &str) -> Value {
    json!({
        "id": id,
        "userPrincipalName": format!("{}@contoso.onmicrosoft.com", prefix),
        "displayName": format!("Test User {}", prefix),
        "mail": format!("{}@contoso.com", prefix),
        "companyName": "Contoso",
        "jobTitle": "Engineer",
        "department": "Engineering",
        "accountEnabled": true,
        "userType": "Member"
    })
}

/// Test data factory for an invited guest.
pub fn create_guest(id: &str, address: &str) -> Value {
    json!({
        "id": id,
        "userPrincipalName": format!("{}#EXT#@contoso.onmicrosoft.com", address.replace('@', "_")),
        "displayName": address,
        "mail": address,
        "accountEnabled": true,
        "userType": "Guest"
    })
}

/// Wraps items in an OData collection response.
pub fn create_odata_response(items: Vec<Value>, next_link: Option<&str>) -> Value {
    let mut response = json!({ "value": items });
    if let Some(link) = next_link {
        response["@odata.nextLink"] = json!(link);
    }
    response
}

/// Creates an OData error response.
pub fn create_odata_error(code: &str, message: &str) -> Value {
    json!({
        "error": {
            "code": code,
            "message": message
        }
    })
}

/// Mock server standing in for both the login authority and Graph.
pub struct MockGraphServer {
    pub server: MockServer,
}

impl MockGraphServer {
    pub async fn new() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    pub fn url(&self) -> String {
        self.server.uri()
    }

    /// Sets up the OAuth token endpoint.
    pub async fn mock_token_endpoint(&self) {
        Mock::given(method("POST"))
            .and(path(format!("/{}/oauth2/v2.0/token", TENANT_ID)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "mock-access-token",
                "token_type": "Bearer",
                "expires_in": 3600
            })))
            .mount(&self.server)
            .await;
    }

    /// Sets up a failing OAuth token endpoint.
    pub async fn mock_token_rejected(&self) {
        Mock::given(method("POST"))
            .and(path(format!("/{}/oauth2/v2.0/token", TENANT_ID)))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "error": "invalid_client",
                "error_description": "AADSTS7000215: Invalid client secret provided."
            })))
            .mount(&self.server)
            .await;
    }

    /// Directory configuration pointing at this server.
    pub fn config(&self) -> DirectoryConfig {
        DirectoryConfig::builder()
            .tenant_id(TENANT_ID)
            .cloud_environment(EntraCloudEnvironment::Custom {
                login_endpoint: self.url(),
                graph_endpoint: self.url(),
            })
            .page_size(100)
            .build()
            .expect("valid test config")
    }

    /// Connects a session against this server.
    pub async fn connect(&self) -> EntraDirectory {
        EntraDirectory::connect(self.config(), credentials(), &["User.Read.All"])
            .await
            .expect("connect to mock graph")
    }
}

pub fn credentials() -> EntraCredentials {
    EntraCredentials {
        client_id: "test-client".to_string(),
        client_secret: "test-secret".to_string().into(),
    }
}
