/*
    Minimal ShotGrid REST client, just enough for the output tool:
    - resolve who is submitting and the project name for the farm job title
    - look up a PublishedFile by path
    - create a PublishedFile for a rendered image
    Every call is made once. The access token is fetched lazily and kept for the
    life of the client.
*/
use crate::domains::tracking_client::{
    EntityLink, PublishHandle, TrackingClient, TrackingContext, TrackingError,
};
use crate::models::publish::PublishRecord;
use serde::Deserialize;
use serde_json::{json, Value};
use std::cell::RefCell;
use std::path::Path;
use tracing::debug;
use url::Url;

const SEARCH_CONTENT_TYPE: &str = "application/vnd+shotgun.api3_array+json";

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct Record {
    id: i64,
    #[serde(default)]
    attributes: Value,
}

#[derive(Debug, Deserialize)]
struct ListResponse {
    data: Vec<Record>,
}

#[derive(Debug, Deserialize)]
struct SingleResponse {
    data: Record,
}

#[derive(Debug)]
pub struct ShotgridClient {
    site: Url,
    script_name: String,
    script_key: String,
    project_id: i64,
    login: String,
    token: RefCell<Option<String>>,
}

impl ShotgridClient {
    pub fn new(
        site: &str,
        script_name: impl Into<String>,
        script_key: impl Into<String>,
        project_id: i64,
        login: impl Into<String>,
    ) -> Result<Self, TrackingError> {
        let site = Url::parse(site).map_err(|e| TrackingError::Request {
            url: site.to_owned(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            site,
            script_name: script_name.into(),
            script_key: script_key.into(),
            project_id,
            login: login.into(),
            token: RefCell::new(None),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, TrackingError> {
        self.site
            .join(&format!("api/v1/{path}"))
            .map_err(|e| TrackingError::Request {
                url: path.to_owned(),
                reason: e.to_string(),
            })
    }

    fn access_token(&self) -> Result<String, TrackingError> {
        if let Some(token) = self.token.borrow().as_ref() {
            return Ok(token.clone());
        }

        let url = self.endpoint("auth/access_token")?;
        let mut response = ureq::post(url.as_str())
            .send_form([
                ("grant_type", "client_credentials"),
                ("client_id", self.script_name.as_str()),
                ("client_secret", self.script_key.as_str()),
            ])
            .map_err(|e| request_error(&url, e))?;
        let token = response
            .body_mut()
            .read_json::<TokenResponse>()
            .map_err(|e| TrackingError::Response(e.to_string()))?
            .access_token;

        *self.token.borrow_mut() = Some(token.clone());
        Ok(token)
    }

    fn search(
        &self,
        entity: &str,
        filters: Value,
        fields: &[&str],
    ) -> Result<Vec<Record>, TrackingError> {
        let url = self.endpoint(&format!("entity/{entity}/_search"))?;
        let body = json!({ "filters": filters, "fields": fields.join(",") }).to_string();
        debug!(entity, %body, "Searching tracking system");

        let mut response = ureq::post(url.as_str())
            .header("Authorization", format!("Bearer {}", self.access_token()?))
            .header("Content-Type", SEARCH_CONTENT_TYPE)
            .header("Accept", "application/json")
            .send(body.as_str())
            .map_err(|e| request_error(&url, e))?;
        response
            .body_mut()
            .read_json::<ListResponse>()
            .map(|list| list.data)
            .map_err(|e| TrackingError::Response(e.to_string()))
    }

    fn read(&self, entity: &str, id: i64, fields: &[&str]) -> Result<Record, TrackingError> {
        let mut url = self.endpoint(&format!("entity/{entity}/{id}"))?;
        url.query_pairs_mut().append_pair("fields", &fields.join(","));

        let mut response = ureq::get(url.as_str())
            .header("Authorization", format!("Bearer {}", self.access_token()?))
            .header("Accept", "application/json")
            .call()
            .map_err(|e| request_error(&url, e))?;
        response
            .body_mut()
            .read_json::<SingleResponse>()
            .map(|single| single.data)
            .map_err(|e| TrackingError::Response(e.to_string()))
    }

    fn create(&self, entity: &str, body: Value) -> Result<Record, TrackingError> {
        let url = self.endpoint(&format!("entity/{entity}"))?;
        let mut response = ureq::post(url.as_str())
            .header("Authorization", format!("Bearer {}", self.access_token()?))
            .header("Accept", "application/json")
            .send_json(&body)
            .map_err(|e| request_error(&url, e))?;
        response
            .body_mut()
            .read_json::<SingleResponse>()
            .map(|single| single.data)
            .map_err(|e| TrackingError::Response(e.to_string()))
    }

    fn publish_type_id(&self, code: &str) -> Result<i64, TrackingError> {
        self.search("published_file_types", json!([["code", "is", code]]), &["code"])?
            .first()
            .map(|record| record.id)
            .ok_or_else(|| TrackingError::UnknownPublishType(code.to_owned()))
    }
}

fn request_error(url: &Url, err: ureq::Error) -> TrackingError {
    TrackingError::Request {
        url: url.to_string(),
        reason: err.to_string(),
    }
}

fn attribute(record: &Record, name: &str) -> String {
    record.attributes[name].as_str().unwrap_or_default().to_owned()
}

/// Body of the PublishedFile created for `record`.
pub fn publish_body(record: &PublishRecord, publish_type_id: i64) -> Value {
    let path = record.path.to_string_lossy();
    json!({
        "code": record.name,
        "name": record.name,
        "path": { "local_path": path },
        "path_cache": path,
        "version_number": record.version_number,
        "published_file_type": { "type": "PublishedFileType", "id": publish_type_id },
        "project": record.context.project,
        "entity": record.context.entity,
        "created_by": record.context.user,
        "description": format!("Published by {}", record.created_by),
    })
}

impl TrackingClient for ShotgridClient {
    fn context(&self) -> Result<TrackingContext, TrackingError> {
        let project = self.read("projects", self.project_id, &["name"])?;
        let user = self
            .search("human_users", json!([["login", "is", self.login]]), &["name"])?
            .into_iter()
            .next();

        Ok(TrackingContext {
            user_display_name: user
                .as_ref()
                .map(|u| attribute(u, "name"))
                .unwrap_or_else(|| self.login.clone()),
            user: user.map(|u| EntityLink {
                kind: "HumanUser".to_owned(),
                id: u.id,
            }),
            project_name: attribute(&project, "name"),
            project: Some(EntityLink {
                kind: "Project".to_owned(),
                id: project.id,
            }),
            entity: None,
        })
    }

    fn find_publish(&self, path: &Path) -> Result<Option<PublishHandle>, TrackingError> {
        let path_text = path.to_string_lossy();
        let found = self.search(
            "published_files",
            json!([
                ["path_cache", "is", path_text],
                ["project.Project.id", "is", self.project_id]
            ]),
            &["code", "path_cache"],
        )?;
        Ok(found.first().map(|record| PublishHandle {
            id: record.id,
            path: path.to_path_buf(),
        }))
    }

    fn register_publish(&self, record: &PublishRecord) -> Result<PublishHandle, TrackingError> {
        let type_id = self.publish_type_id(&record.published_file_type)?;
        let created = self.create("published_files", publish_body(record, type_id))?;
        Ok(PublishHandle {
            id: created.id,
            path: record.path.clone(),
        })
    }
}

/// Context supplied up front, used when no tracking site is configured.
/// Publishing through it fails rather than silently doing nothing.
#[derive(Debug, Clone)]
pub struct OfflineTracking {
    context: TrackingContext,
}

impl OfflineTracking {
    pub fn new(user_display_name: impl Into<String>, project_name: impl Into<String>) -> Self {
        Self {
            context: TrackingContext {
                user_display_name: user_display_name.into(),
                user: None,
                project_name: project_name.into(),
                project: None,
                entity: None,
            },
        }
    }
}

impl TrackingClient for OfflineTracking {
    fn context(&self) -> Result<TrackingContext, TrackingError> {
        Ok(self.context.clone())
    }

    fn find_publish(&self, _: &Path) -> Result<Option<PublishHandle>, TrackingError> {
        Err(TrackingError::Offline("look up publishes".to_owned()))
    }

    fn register_publish(&self, _: &PublishRecord) -> Result<PublishHandle, TrackingError> {
        Err(TrackingError::Offline("register publishes".to_owned()))
    }
}
