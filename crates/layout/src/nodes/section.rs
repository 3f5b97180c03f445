use crate::model::RowModel;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SectionRole {
    Header,
    #[default]
    Body,
    Footer,
}

impl SectionRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            SectionRole::Header => "header",
            SectionRole::Body => "body",
            SectionRole::Footer => "footer",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SectionData {
    pub(crate) role: SectionRole,
    pub(crate) row_model: RowModel,
}

impl SectionData {
    pub fn new(role: SectionRole) -> Self {
        Self {
            role,
            row_model: RowModel::default(),
        }
    }

    pub fn role(&self) -> SectionRole {
        self.role
    }

    /// Slot layout of the section's rows, filled in by structure validation.
    pub(crate) fn row_model(&self) -> &RowModel {
        &self.row_model
    }
}
