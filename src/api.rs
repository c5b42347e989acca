// HTTP client for the activity sign-up server and the worker loop that runs
// requests off the UI thread.
//
// The UI sends `ApiCommand`s over an mpsc channel; the worker spawns each
// command as an independent tokio task and reports the outcome back as an
// `ApiEvent`. Commands are never sequenced, cancelled, retried, or timed
// out: two in-flight mutations race and the last event applied wins.

use std::sync::mpsc::{Receiver, Sender};

use log::{debug, error};
use reqwest::StatusCode;
use serde::Deserialize;
use url::Url;

use crate::RosterboardError;
use crate::catalog::ActivityCatalog;

/// A request the UI asks the worker to perform.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiCommand {
    LoadCatalog,
    Signup { activity: String, email: String },
    Unregister { activity: String, email: String },
}

/// The outcome of a completed request, delivered back to the UI thread.
#[derive(Debug)]
pub enum ApiEvent {
    CatalogLoaded(Result<ActivityCatalog, RosterboardError>),
    SignupDone(Result<String, RosterboardError>),
    UnregisterDone {
        activity: String,
        email: String,
        result: Result<(), RosterboardError>,
    },
}

#[derive(Deserialize)]
struct SignupReply {
    #[serde(default)]
    message: String,
}

#[derive(Deserialize)]
struct ErrorReply {
    #[serde(default)]
    detail: Option<String>,
}

#[derive(Clone)]
pub struct ActivitiesClient {
    http: reqwest::Client,
    base: Url,
}

impl ActivitiesClient {
    pub fn new(server_url: &str) -> Result<Self, RosterboardError> {
        let base = Url::parse(server_url).map_err(|e| RosterboardError::InvalidServerUrl {
            url: server_url.to_string(),
            source: e,
        })?;
        if base.cannot_be_a_base() {
            return Err(RosterboardError::UnsupportedServerUrl {
                url: server_url.to_string(),
            });
        }
        Ok(Self {
            http: reqwest::Client::new(),
            base,
        })
    }

    /// GET /activities. The status is not checked on this call: whatever
    /// comes back is parsed, so an error body simply fails to parse as a
    /// catalog.
    pub async fn list_activities(&self) -> Result<ActivityCatalog, RosterboardError> {
        let body = self
            .http
            .get(self.activities_url())
            .send()
            .await
            .map_err(|e| RosterboardError::Transport { source: e })?
            .text()
            .await
            .map_err(|e| RosterboardError::Transport { source: e })?;
        serde_json::from_str(&body).map_err(|e| RosterboardError::UnexpectedResponse { source: e })
    }

    /// POST /activities/{name}/signup?email=… Returns the server-supplied
    /// confirmation message.
    pub async fn signup(&self, activity: &str, email: &str) -> Result<String, RosterboardError> {
        let url = self.signup_url(activity, email);
        let response = self
            .http
            .post(url)
            .send()
            .await
            .map_err(|e| RosterboardError::Transport { source: e })?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| RosterboardError::Transport { source: e })?;
        parse_signup_response(status, &body)
    }

    /// DELETE /activities/{name}/participants?email=… The success body is
    /// parsed (an unparseable body counts as a transport failure) but
    /// otherwise ignored.
    pub async fn unregister(&self, activity: &str, email: &str) -> Result<(), RosterboardError> {
        let url = self.unregister_url(activity, email);
        let response = self
            .http
            .delete(url)
            .send()
            .await
            .map_err(|e| RosterboardError::Transport { source: e })?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| RosterboardError::Transport { source: e })?;
        parse_unregister_response(status, &body)
    }

    fn activities_url(&self) -> Url {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .expect("server URL validated at construction")
            .pop_if_empty()
            .push("activities");
        url
    }

    fn signup_url(&self, activity: &str, email: &str) -> Url {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .expect("server URL validated at construction")
            .pop_if_empty()
            .extend(["activities", activity, "signup"]);
        url.query_pairs_mut().append_pair("email", email);
        url
    }

    fn unregister_url(&self, activity: &str, email: &str) -> Url {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .expect("server URL validated at construction")
            .pop_if_empty()
            .extend(["activities", activity, "participants"]);
        url.query_pairs_mut().append_pair("email", email);
        url
    }
}

fn parse_signup_response(status: StatusCode, body: &str) -> Result<String, RosterboardError> {
    if status.is_success() {
        let reply: SignupReply = serde_json::from_str(body)
            .map_err(|e| RosterboardError::UnexpectedResponse { source: e })?;
        Ok(reply.message)
    } else {
        let reply: ErrorReply = serde_json::from_str(body)
            .map_err(|e| RosterboardError::UnexpectedResponse { source: e })?;
        Err(RosterboardError::Rejected {
            status: status.as_u16(),
            detail: reply.detail,
        })
    }
}

fn parse_unregister_response(status: StatusCode, body: &str) -> Result<(), RosterboardError> {
    if status.is_success() {
        serde_json::from_str::<serde_json::Value>(body)
            .map_err(|e| RosterboardError::UnexpectedResponse { source: e })?;
        Ok(())
    } else {
        let reply: ErrorReply = serde_json::from_str(body)
            .map_err(|e| RosterboardError::UnexpectedResponse { source: e })?;
        Err(RosterboardError::Rejected {
            status: status.as_u16(),
            detail: reply.detail,
        })
    }
}

/// Worker loop: owns the tokio runtime and executes commands until the UI
/// drops its command sender. Each command runs as its own task so concurrent
/// requests proceed independently.
pub fn run_worker(
    client: ActivitiesClient,
    commands: Receiver<ApiCommand>,
    events: Sender<ApiEvent>,
) {
    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Could not start API worker runtime: {}", e);
            return;
        }
    };

    while let Ok(command) = commands.recv() {
        let client = client.clone();
        let events = events.clone();
        runtime.spawn(async move {
            let event = match command {
                ApiCommand::LoadCatalog => ApiEvent::CatalogLoaded(client.list_activities().await),
                ApiCommand::Signup { activity, email } => {
                    ApiEvent::SignupDone(client.signup(&activity, &email).await)
                }
                ApiCommand::Unregister { activity, email } => {
                    let result = client.unregister(&activity, &email).await;
                    ApiEvent::UnregisterDone {
                        activity,
                        email,
                        result,
                    }
                }
            };
            if events.send(event).is_err() {
                debug!("UI event receiver dropped, discarding API event");
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> ActivitiesClient {
        ActivitiesClient::new("http://localhost:8000").unwrap()
    }

    #[test]
    fn test_rejects_unparseable_server_url() {
        assert!(ActivitiesClient::new("not a url").is_err());
    }

    #[test]
    fn test_rejects_cannot_be_a_base_url() {
        let result = ActivitiesClient::new("mailto:someone@mergington.edu");
        assert!(matches!(
            result,
            Err(RosterboardError::UnsupportedServerUrl { .. })
        ));
    }

    #[test]
    fn test_signup_url_percent_encodes_path_and_query() {
        let url = client().signup_url("Chess Club", "michael@mergington.edu");
        assert_eq!(
            url.as_str(),
            "http://localhost:8000/activities/Chess%20Club/signup?email=michael%40mergington.edu"
        );
    }

    #[test]
    fn test_unregister_url_percent_encodes_path_and_query() {
        let url = client().unregister_url("Art & Design", "a+b@mergington.edu");
        assert_eq!(
            url.as_str(),
            "http://localhost:8000/activities/Art%20&%20Design/participants?email=a%2Bb%40mergington.edu"
        );
    }

    #[test]
    fn test_base_url_with_trailing_path_is_honored() {
        let client = ActivitiesClient::new("http://localhost:8000/api/").unwrap();
        let url = client.activities_url();
        assert_eq!(url.as_str(), "http://localhost:8000/api/activities");
    }

    #[test]
    fn test_signup_success_returns_message() {
        let result = parse_signup_response(StatusCode::OK, r#"{"message": "Signed up!"}"#);
        assert_eq!(result.unwrap(), "Signed up!");
    }

    #[test]
    fn test_signup_failure_carries_detail() {
        let result = parse_signup_response(StatusCode::BAD_REQUEST, r#"{"detail": "Activity full"}"#);
        match result {
            Err(RosterboardError::Rejected { status, detail }) => {
                assert_eq!(status, 400);
                assert_eq!(detail.as_deref(), Some("Activity full"));
            }
            other => panic!("Expected Rejected error, got {:?}", other),
        }
    }

    #[test]
    fn test_signup_failure_without_detail() {
        let result = parse_signup_response(StatusCode::INTERNAL_SERVER_ERROR, "{}");
        match result {
            Err(RosterboardError::Rejected { status, detail }) => {
                assert_eq!(status, 500);
                assert!(detail.is_none());
            }
            other => panic!("Expected Rejected error, got {:?}", other),
        }
    }

    #[test]
    fn test_unparseable_body_is_a_transport_failure() {
        let result = parse_signup_response(StatusCode::OK, "<html>proxy error</html>");
        assert!(result.unwrap_err().is_transport());

        let result = parse_unregister_response(StatusCode::BAD_GATEWAY, "<html>proxy error</html>");
        assert!(result.unwrap_err().is_transport());
    }

    #[test]
    fn test_unregister_success_ignores_body_content() {
        assert!(parse_unregister_response(StatusCode::OK, r#"{"message": "removed"}"#).is_ok());
        assert!(parse_unregister_response(StatusCode::OK, "{}").is_ok());
    }
}
