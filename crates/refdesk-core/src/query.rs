// The fetch key of a list view and the typed filters that feed into it.

use std::collections::BTreeMap;

use refdesk_api::ListParams;
use strum::{Display, EnumIter, EnumString};

use crate::sort::SortState;

/// Everything that determines which rows a list fetch returns.
///
/// Two equal keys always describe the same request; the controller compares
/// keys to decide whether a response is still wanted.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ListQuery {
    pub page: u32,
    pub per_page: u32,
    pub sort: SortState,
    /// The committed (debounced) search term.
    pub search: String,
    /// Entity filters by wire name.
    pub filters: BTreeMap<String, String>,
}

impl ListQuery {
    pub fn to_params(&self) -> ListParams {
        ListParams {
            page: self.page,
            per_page: self.per_page,
            sort: self.sort.field.clone(),
            order: self.sort.direction,
            search: self.search.clone(),
            filters: self
                .filters
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        }
    }
}

// ── Typed filters ────────────────────────────────────────────────────

/// Phone verification filter on client and employee lists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Verification {
    #[default]
    All,
    Verified,
    Unverified,
}

impl Verification {
    pub fn wire_value(self) -> &'static str {
        match self {
            Self::All => "",
            Self::Verified => "verifieds",
            Self::Unverified => "unverifieds",
        }
    }
}

/// Account status filter on client and employee lists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Activity {
    #[default]
    All,
    Active,
    Inactive,
    Trashed,
}

impl Activity {
    pub fn wire_value(self) -> &'static str {
        match self {
            Self::All => "",
            Self::Active => "active",
            Self::Inactive => "disactive",
            Self::Trashed => "trasheds",
        }
    }
}

/// One entity-specific list filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListFilter {
    Branch(u64),
    Manager(u64),
    Orient(u64),
    Role(String),
    Verification(Verification),
    Activity(Activity),
}

impl ListFilter {
    /// Query parameter name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Branch(_) => "branch_id",
            Self::Manager(_) => "manager_id",
            Self::Orient(_) => "orient_id",
            Self::Role(_) => "role",
            Self::Verification(_) => "sortbyverified",
            Self::Activity(_) => "sortbyactivity",
        }
    }

    pub fn value(&self) -> String {
        match self {
            Self::Branch(id) | Self::Manager(id) | Self::Orient(id) => id.to_string(),
            Self::Role(name) => name.clone(),
            Self::Verification(v) => v.wire_value().to_owned(),
            Self::Activity(a) => a.wire_value().to_owned(),
        }
    }
}
