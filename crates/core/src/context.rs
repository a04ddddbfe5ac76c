//! Per-request caller context.

use crate::config::normalise_base_url;
use crate::{DiversityError, DiversityResult};
use diversity_types::TouchpointId;
use uuid::Uuid;

/// Who is calling and how to link back to them.
#[derive(Clone, Debug)]
pub struct RequestContext {
    touchpoint: TouchpointId,
    correlation_id: Uuid,
    api_base_url: Option<String>,
}

impl RequestContext {
    /// Builds a context from raw header values.
    ///
    /// # Arguments
    ///
    /// * `touchpoint` - Caller's touchpoint id; required
    /// * `api_base_url` - Base URL used to build record links in events
    /// * `correlation_id` - Caller's correlation id; a new one is generated when absent or
    ///   not a UUID
    ///
    /// # Errors
    ///
    /// Returns [`DiversityError::InvalidInput`] if the touchpoint is missing, blank or
    /// longer than ten characters, or if `api_base_url` is not an http(s) URL.
    pub fn new(
        touchpoint: Option<&str>,
        api_base_url: Option<&str>,
        correlation_id: Option<&str>,
    ) -> DiversityResult<Self> {
        let touchpoint = touchpoint
            .ok_or_else(|| DiversityError::InvalidInput("missing TouchpointId header".into()))?;
        let touchpoint = TouchpointId::new(touchpoint)
            .map_err(|e| DiversityError::InvalidInput(format!("invalid TouchpointId: {e}")))?;

        let api_base_url = api_base_url
            .filter(|url| !url.trim().is_empty())
            .map(normalise_base_url)
            .transpose()?;

        let correlation_id = match correlation_id.map(|c| Uuid::parse_str(c.trim())) {
            Some(Ok(id)) => id,
            Some(Err(_)) => {
                tracing::warn!("unable to parse DssCorrelationId, generating a new one");
                Uuid::new_v4()
            }
            None => Uuid::new_v4(),
        };

        Ok(Self {
            touchpoint,
            correlation_id,
            api_base_url,
        })
    }

    pub fn touchpoint(&self) -> &TouchpointId {
        &self.touchpoint
    }

    pub fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    pub fn api_base_url(&self) -> Option<&str> {
        self.api_base_url.as_deref()
    }
}
