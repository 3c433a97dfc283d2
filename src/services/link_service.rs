//! Link management service
//!
//! Business logic for link CRUD, shared between the admin HTTP API,
//! dashboard actions and the CLI.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::{QrlinkError, Result};
use crate::storage::{Link, LinkStore, LinkUpdate, NewLink, ScanLogStore};
use crate::utils::slug::{MAX_SLUG_LENGTH, is_storable_slug, is_valid_slug, normalize_slug};
use crate::utils::url_validator::validate_destination;

// ============ Request/Response DTOs ============

/// Request to create a new link
#[derive(Debug, Clone, Deserialize)]
pub struct CreateLinkRequest {
    pub slug: String,
    pub destination: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Filled from the authenticated admin, never from the payload
    #[serde(skip)]
    pub admin_id: Option<String>,
}

/// Request to update an existing link
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateLinkRequest {
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub destination: Option<String>,
    /// None = keep existing, Some("") = remove
    #[serde(default)]
    pub description: Option<String>,
}

/// Link row as shown in listings, with its scan total
#[derive(Debug, Clone, Serialize)]
pub struct LinkSummary {
    #[serde(flatten)]
    pub link: Link,
    pub scans: u64,
}

// ============ LinkService Implementation ============

pub struct LinkService {
    links: Arc<dyn LinkStore>,
    scans: Arc<dyn ScanLogStore>,
}

impl LinkService {
    pub fn new(links: Arc<dyn LinkStore>, scans: Arc<dyn ScanLogStore>) -> Self {
        Self { links, scans }
    }

    /// 写入前的 slug 校验，含长度上限
    fn checked_slug(slug: &str) -> Result<String> {
        let slug = slug.trim();
        if !is_storable_slug(slug) {
            return Err(QrlinkError::validation(format!(
                "Invalid slug '{}'. Only letters, digits and '-' are allowed, at most {} characters.",
                slug, MAX_SLUG_LENGTH
            )));
        }
        Ok(normalize_slug(slug))
    }

    fn checked_description(description: Option<String>) -> Option<String> {
        description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty())
    }

    pub async fn create_link(&self, req: CreateLinkRequest) -> Result<Link> {
        let slug = Self::checked_slug(&req.slug)?;
        validate_destination(&req.destination)?;

        if self.links.find_by_slug(&slug).await?.is_some() {
            return Err(QrlinkError::conflict(format!(
                "Slug '{}' already exists",
                slug
            )));
        }

        let link = self
            .links
            .create_link(NewLink {
                slug,
                destination: req.destination.trim().to_string(),
                description: Self::checked_description(req.description),
                admin_id: req.admin_id,
            })
            .await?;

        info!("LinkService: created '{}' -> '{}'", link.slug, link.destination);
        Ok(link)
    }

    pub async fn update_link(&self, id: i64, req: UpdateLinkRequest) -> Result<Link> {
        let slug = req.slug.as_deref().map(Self::checked_slug).transpose()?;
        if let Some(destination) = &req.destination {
            validate_destination(destination)?;
        }

        if let Some(slug) = &slug
            && let Some(other) = self.links.find_by_slug(slug).await?
            && other.id != id
        {
            return Err(QrlinkError::conflict(format!(
                "Slug '{}' already exists",
                slug
            )));
        }

        let update = LinkUpdate {
            slug,
            destination: req.destination.map(|d| d.trim().to_string()),
            description: req.description.map(|d| Self::checked_description(Some(d))),
        };

        let link = self.links.update_link(id, update).await?;
        info!("LinkService: updated '{}' ({})", link.slug, link.id);
        Ok(link)
    }

    /// Scan logs of a deleted link are kept
    pub async fn delete_link(&self, id: i64) -> Result<()> {
        self.links.delete_link(id).await?;
        info!("LinkService: deleted link {}", id);
        Ok(())
    }

    pub async fn get_link(&self, id: i64) -> Result<Link> {
        self.links
            .get_link(id)
            .await?
            .ok_or_else(|| QrlinkError::not_found(format!("Link {} not found", id)))
    }

    pub async fn get_link_by_slug(&self, slug: &str) -> Result<Link> {
        let slug = slug.trim();
        if !is_valid_slug(slug) {
            return Err(QrlinkError::validation(format!("Invalid slug '{}'", slug)));
        }
        let slug = normalize_slug(slug);
        self.links
            .find_by_slug(&slug)
            .await?
            .ok_or_else(|| QrlinkError::not_found(format!("Link '{}' not found", slug)))
    }

    /// All links, newest first, with scan totals
    pub async fn list_links(&self) -> Result<Vec<LinkSummary>> {
        let links = self.links.list_links().await?;
        let counts = self.scans.count_by_link().await?;

        Ok(links
            .into_iter()
            .map(|link| {
                let scans = counts.get(&link.id).copied().unwrap_or(0);
                LinkSummary { link, scans }
            })
            .collect())
    }
}
