//! Student Directory lookup.
//!
//! The directory is the system of record for student identity and
//! active/inactive status. uniauth only ever reads it: either from the
//! config-seeded roster (the default, mirroring the enrollment service's
//! dataset) or over HTTP from the enrollment service itself.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::DirectoryConfig;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Student {
    pub student_id: String,
    pub name: String,
    pub email: String,
    pub status: String,
}

impl Student {
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == "active"
    }
}

#[async_trait]
pub trait StudentDirectory: Send + Sync {
    async fn lookup(&self, student_id: &str) -> Result<Option<Student>>;

    async fn list_all(&self) -> Result<Vec<Student>>;
}

/// Roster loaded from config at process start. Matches the embedded student
/// list the enrollment service ships with.
pub struct SeedDirectory {
    students: Vec<Student>,
}

impl SeedDirectory {
    #[must_use]
    pub fn new(config: &DirectoryConfig) -> Self {
        let students = config
            .students
            .iter()
            .map(|s| Student {
                student_id: s.student_id.clone(),
                name: s.name.clone(),
                email: s.email.clone(),
                status: s.status.clone(),
            })
            .collect();

        Self { students }
    }
}

#[async_trait]
impl StudentDirectory for SeedDirectory {
    async fn lookup(&self, student_id: &str) -> Result<Option<Student>> {
        Ok(self
            .students
            .iter()
            .find(|s| s.student_id == student_id)
            .cloned())
    }

    async fn list_all(&self) -> Result<Vec<Student>> {
        Ok(self.students.clone())
    }
}

#[derive(Debug, Deserialize)]
struct DirectoryResponse<T> {
    success: bool,
    data: Option<T>,
}

/// Live lookup against the enrollment service's REST API.
pub struct HttpDirectory {
    client: Client,
    base_url: String,
}

impl HttpDirectory {
    pub fn new(config: &DirectoryConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.request_timeout_seconds))
            .user_agent("uniauth/0.1")
            .build()
            .context("Failed to build directory HTTP client")?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl StudentDirectory for HttpDirectory {
    async fn lookup(&self, student_id: &str) -> Result<Option<Student>> {
        let url = format!("{}/enrollment/students/{}", self.base_url, student_id);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .context("Directory request failed")?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let body: DirectoryResponse<Student> = response
            .error_for_status()
            .context("Directory returned an error status")?
            .json()
            .await
            .context("Failed to decode directory response")?;

        if !body.success {
            return Ok(None);
        }

        Ok(body.data)
    }

    async fn list_all(&self) -> Result<Vec<Student>> {
        let url = format!("{}/enrollment/students", self.base_url);

        let body: DirectoryResponse<Vec<Student>> = self
            .client
            .get(&url)
            .send()
            .await
            .context("Directory request failed")?
            .error_for_status()
            .context("Directory returned an error status")?
            .json()
            .await
            .context("Failed to decode directory response")?;

        Ok(body.data.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DirectoryConfig;

    #[tokio::test]
    async fn test_seed_lookup_hits_and_misses() {
        let directory = SeedDirectory::new(&DirectoryConfig::default());

        let student = directory.lookup("2024-00001").await.unwrap().unwrap();
        assert_eq!(student.name, "Juan Dela Cruz");
        assert!(student.is_active());

        let inactive = directory.lookup("2024-00003").await.unwrap().unwrap();
        assert!(!inactive.is_active());

        assert!(directory.lookup("2024-99999").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_seed_list_all() {
        let directory = SeedDirectory::new(&DirectoryConfig::default());
        let all = directory.list_all().await.unwrap();
        assert_eq!(all.len(), 4);
    }
}
