//! One-shot submission request model.

use std::collections::HashMap;

use serde::Serialize;
use serde_json::{Map, Value};

/// HTTP method of a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    #[default]
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }

    /// Whether a request body is attached for this method.
    pub fn has_body(self) -> bool {
        matches!(self, HttpMethod::Post | HttpMethod::Put | HttpMethod::Patch)
    }
}

/// Value object describing a single submission. Constructed fresh per
/// submit call and never mutated after build.
#[derive(Debug, Clone)]
pub struct SubmitRequest {
    pub path: String,
    pub method: HttpMethod,
    pub custom_headers: HashMap<String, String>,
    pub custom_data: Map<String, Value>,
    pub fields_ignore: bool,
    pub file_ignore: bool,
}

impl SubmitRequest {
    /// POST request to `path` with no per-request extras.
    pub fn post(path: impl Into<String>) -> Self {
        Self::builder(path).build()
    }

    pub fn builder(path: impl Into<String>) -> SubmitRequestBuilder {
        SubmitRequestBuilder {
            request: SubmitRequest {
                path: path.into(),
                method: HttpMethod::Post,
                custom_headers: HashMap::new(),
                custom_data: Map::new(),
                fields_ignore: false,
                file_ignore: false,
            },
        }
    }
}

/// Builder for [`SubmitRequest`].
pub struct SubmitRequestBuilder {
    request: SubmitRequest,
}

impl SubmitRequestBuilder {
    pub fn with_method(mut self, method: HttpMethod) -> Self {
        self.request.method = method;
        self
    }

    /// Add one per-request header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.request
            .custom_headers
            .insert(name.into(), value.into());
        self
    }

    /// Add one per-request payload entry.
    pub fn with_data(mut self, key: impl Into<String>, value: Value) -> Self {
        self.request.custom_data.insert(key.into(), value);
        self
    }

    /// Replace the whole per-request payload map.
    pub fn with_data_map(mut self, data: Map<String, Value>) -> Self {
        self.request.custom_data = data;
        self
    }

    /// Skip field validation and omit field values from the payload.
    pub fn ignore_fields(mut self) -> Self {
        self.request.fields_ignore = true;
        self
    }

    /// Skip the file size check and omit attachments from the payload.
    pub fn ignore_files(mut self) -> Self {
        self.request.file_ignore = true;
        self
    }

    pub fn build(self) -> SubmitRequest {
        self.request
    }
}
