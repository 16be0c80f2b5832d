use reqwest::{Client, StatusCode};
use std::sync::OnceLock;
use std::time::Duration;

/// Some providers refuse requests without a browser-looking agent string.
const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/78.0.3904.97 Safari/537.36";

static HTTP_CLIENT: OnceLock<Client> = OnceLock::new();

/// Get the global HTTP client instance (reused for all requests)
fn get_http_client() -> &'static Client {
    HTTP_CLIENT.get_or_init(|| {
        Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client")
    })
}

/// Substitute the query into the URL template.
pub fn resolve_url(template: &str, query: &str) -> String {
    template.replace("{query}", query)
}

/// One download attempt. Only a 200 response yields bytes; any other
/// status and any transport-level failure (DNS, refused connection,
/// timeout) come back as `None` so the caller can keep trying.
pub async fn fetch(url: &str) -> Option<Vec<u8>> {
    let response = match get_http_client().get(url).send().await {
        Ok(response) => response,
        Err(e) => {
            eprintln!("  Request to {} failed: {}", url, e);
            return None;
        }
    };

    if response.status() != StatusCode::OK {
        eprintln!("  Server answered {} for {}", response.status(), url);
        return None;
    }

    match response.bytes().await {
        Ok(bytes) => Some(bytes.to_vec()),
        Err(e) => {
            eprintln!("  Failed to read response body: {}", e);
            None
        }
    }
}
