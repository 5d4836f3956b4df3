use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A video as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    pub id: u64,
    pub title: String,
    pub author: String,
    pub can_be_downloaded: bool,
    pub min_age_restriction: Option<u8>,
    pub created_at: String,
    pub publication_date: String,
    pub available_resolutions: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateVideo {
    pub title: String,
    pub author: String,
    pub available_resolutions: Vec<String>, // e.g. "P720"
}

/// Update payload. Unset optional fields are left out of the request body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateVideo {
    pub title: String,
    pub author: String,
    pub available_resolutions: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub can_be_downloaded: Option<bool>,
    /// `Some(None)` sends an explicit `null`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_age_restriction: Option<Option<u8>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publication_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub message: String,
    pub field: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ErrorsMessages {
    errors_messages: Vec<FieldError>,
}

/// Errors returned by [`VideoClient`].
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("video not found")]
    NotFound,

    #[error("request rejected: {}", describe(.0))]
    Rejected(Vec<FieldError>),

    #[error("unexpected status {status}: {body}")]
    Unexpected { status: StatusCode, body: String },
}

fn describe(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|err| format!("{}: {}", err.field, err.message))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Client bound to one version prefix of the API.
pub struct VideoClient {
    client: Client,
    base_url: String,
}

impl VideoClient {
    /// `server_url` like "http://localhost:5001", `prefix` like "/hometask_01/api".
    pub fn new(server_url: &str, prefix: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: format!("{}{}", server_url.trim_end_matches('/'), prefix),
        }
    }

    pub async fn list_videos(&self) -> Result<Vec<Video>, ClientError> {
        let resp = self.client.get(format!("{}/videos", self.base_url)).send().await?;
        Ok(check(resp).await?.json().await?)
    }

    /// Fetch one video; `Ok(None)` when it does not exist.
    pub async fn get_video(&self, id: u64) -> Result<Option<Video>, ClientError> {
        let resp = self
            .client
            .get(format!("{}/videos/{}", self.base_url, id))
            .send()
            .await?;
        match check(resp).await {
            Ok(resp) => Ok(Some(resp.json().await?)),
            Err(ClientError::NotFound) => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub async fn create_video(&self, video: &CreateVideo) -> Result<Video, ClientError> {
        self.create_raw(video).await
    }

    /// Post any serializable body, for exercising validation.
    pub async fn create_raw<T: Serialize + ?Sized>(&self, body: &T) -> Result<Video, ClientError> {
        let resp = self
            .client
            .post(format!("{}/videos", self.base_url))
            .json(body)
            .send()
            .await?;
        Ok(check(resp).await?.json().await?)
    }

    pub async fn update_video(&self, id: u64, update: &UpdateVideo) -> Result<(), ClientError> {
        self.update_raw(id, update).await
    }

    /// Put any serializable body, for exercising validation.
    pub async fn update_raw<T: Serialize + ?Sized>(&self, id: u64, body: &T) -> Result<(), ClientError> {
        let resp = self
            .client
            .put(format!("{}/videos/{}", self.base_url, id))
            .json(body)
            .send()
            .await?;
        check(resp).await.map(|_| ())
    }

    pub async fn delete_video(&self, id: u64) -> Result<(), ClientError> {
        let resp = self
            .client
            .delete(format!("{}/videos/{}", self.base_url, id))
            .send()
            .await?;
        check(resp).await.map(|_| ())
    }

    /// Remove every video and restart ids at 1.
    pub async fn reset(&self) -> Result<(), ClientError> {
        let resp = self
            .client
            .delete(format!("{}/testing/all-data", self.base_url))
            .send()
            .await?;
        check(resp).await.map(|_| ())
    }
}

async fn check(resp: Response) -> Result<Response, ClientError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    if status == StatusCode::NOT_FOUND {
        return Err(ClientError::NotFound);
    }

    let body = resp.text().await?;
    if status == StatusCode::BAD_REQUEST {
        if let Ok(errors) = serde_json::from_str::<ErrorsMessages>(&body) {
            return Err(ClientError::Rejected(errors.errors_messages));
        }
    }
    Err(ClientError::Unexpected { status, body })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejected_display_lists_fields() {
        let err = ClientError::Rejected(vec![
            FieldError { message: "title is required".into(), field: "title".into() },
            FieldError { message: "author must be a string".into(), field: "author".into() },
        ]);
        assert_eq!(
            err.to_string(),
            "request rejected: title: title is required, author: author must be a string"
        );
    }

    #[test]
    fn test_update_body_skips_unset_fields() {
        let update = UpdateVideo {
            title: "t".into(),
            author: "a".into(),
            available_resolutions: vec!["P144".into()],
            min_age_restriction: Some(None),
            ..Default::default()
        };
        let body = serde_json::to_value(&update).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "title": "t",
                "author": "a",
                "availableResolutions": ["P144"],
                "minAgeRestriction": null
            })
        );
    }
}
