//! Request and response bodies of the MS-WEBSS operations that take more
//! than a single string argument.

use crate::types::{ContentTypeProperties, FieldMethod, ListProperties, MethodResult};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CreateContentTypeRequest {
    pub display_name: String,
    /// Content type id of the parent.
    pub parent_type: String,
    pub new_fields: Vec<FieldMethod>,
    pub properties: ContentTypeProperties,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UpdateContentTypeRequest {
    pub content_type_id: String,
    pub properties: ContentTypeProperties,
    pub new_fields: Vec<FieldMethod>,
    pub update_fields: Vec<FieldMethod>,
    pub delete_fields: Vec<FieldMethod>,
}

impl UpdateContentTypeRequest {
    pub fn all_methods(&self) -> impl Iterator<Item = &FieldMethod> {
        self.new_fields
            .iter()
            .chain(&self.update_fields)
            .chain(&self.delete_fields)
    }
}

/// One `Method` result per requested field method, plus the content type
/// data after the update.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UpdateContentTypeResponse {
    pub methods: Vec<MethodResult>,
    pub list_properties: ListProperties,
}

impl UpdateContentTypeResponse {
    pub fn method(&self, id: &str) -> Option<&MethodResult> {
        self.methods.iter().find(|m| m.id == id)
    }
}

/// Changes to site columns. The server applies the changes to the context
/// site and every child site.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UpdateColumnsRequest {
    pub new_fields: Vec<FieldMethod>,
    pub update_fields: Vec<FieldMethod>,
    pub delete_fields: Vec<FieldMethod>,
}

impl UpdateColumnsRequest {
    pub fn new_fields(methods: Vec<FieldMethod>) -> Self {
        Self {
            new_fields: methods,
            ..Default::default()
        }
    }

    pub fn update_fields(methods: Vec<FieldMethod>) -> Self {
        Self {
            update_fields: methods,
            ..Default::default()
        }
    }

    pub fn delete_fields(methods: Vec<FieldMethod>) -> Self {
        Self {
            delete_fields: methods,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UpdateColumnsResponse {
    pub new_fields: Vec<MethodResult>,
    pub update_fields: Vec<MethodResult>,
    pub delete_fields: Vec<MethodResult>,
}

impl UpdateColumnsResponse {
    pub fn all(&self) -> impl Iterator<Item = &MethodResult> {
        self.new_fields
            .iter()
            .chain(&self.update_fields)
            .chain(&self.delete_fields)
    }
}

/// `Success` element of the delete and XML document operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}
