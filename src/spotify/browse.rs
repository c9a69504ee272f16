use std::str::FromStr;

use chrono::NaiveDateTime;

use crate::{
    error::ValidationError,
    spotify::{
        request::{self, RequestArgs},
        resources::Resource,
    },
    types::{Method, RequestDescriptor},
};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrowseKind {
    Categories,
    FeaturedPlaylists,
    NewReleases,
}

impl BrowseKind {
    pub fn resource(&self) -> Resource {
        match self {
            Self::Categories => Resource::Categories,
            Self::FeaturedPlaylists => Resource::FeaturedPlaylists,
            Self::NewReleases => Resource::NewReleases,
        }
    }
}

impl FromStr for BrowseKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "categories" => Ok(Self::Categories),
            "featured-playlists" => Ok(Self::FeaturedPlaylists),
            "new-releases" => Ok(Self::NewReleases),
            _ => Err(ValidationError::UnknownBrowseCategory(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BrowseArgs {
    pub kind: String,
    pub category_id: Option<String>,
    pub category_obj: Option<String>,
    pub timestamp: Option<NaiveDateTime>,
    pub country: Option<String>,
    pub locale: Option<String>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl BrowseArgs {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            ..Self::default()
        }
    }

    pub fn category(mut self, id: impl Into<String>) -> Self {
        self.category_id = Some(id.into());
        self
    }

    pub fn category_obj(mut self, obj: impl Into<String>) -> Self {
        self.category_obj = Some(obj.into());
        self
    }

    pub fn timestamp(mut self, timestamp: NaiveDateTime) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    pub fn country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }

    pub fn locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = Some(locale.into());
        self
    }

    pub fn page(self, limit: Option<u32>, offset: Option<u32>) -> Self {
        Self {
            limit,
            offset,
            ..self
        }
    }
}

/// Lowers a browse request onto its resource. Category id and object only
/// apply to `categories`, the timestamp only to `featured-playlists`; both are
/// ignored elsewhere.
pub fn build(args: &BrowseArgs) -> Result<RequestDescriptor, ValidationError> {
    let kind: BrowseKind = args.kind.parse()?;

    let mut request = RequestArgs::new().page(args.limit, args.offset);

    if kind == BrowseKind::Categories {
        if let Some(id) = args.category_id.as_deref().filter(|id| !id.is_empty()) {
            request = request.id(id);
        }
        if let Some(obj) = &args.category_obj {
            request = request.sub_object(obj.as_str());
        }
    }

    if kind == BrowseKind::FeaturedPlaylists {
        if let Some(timestamp) = args.timestamp {
            request = request.param("timestamp", timestamp.format(TIMESTAMP_FORMAT).to_string());
        }
    }

    if let Some(country) = &args.country {
        request = request.param("country", country.as_str());
    }
    if kind != BrowseKind::NewReleases {
        if let Some(locale) = &args.locale {
            request = request.param("locale", locale.as_str());
        }
    }

    request::build(Method::Get, kind.resource(), &request)
}
