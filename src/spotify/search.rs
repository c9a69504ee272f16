use crate::{
    error::ValidationError,
    spotify::{
        request::{self, RequestArgs},
        resources::Resource,
    },
    types::{Method, RequestDescriptor},
};

pub const FILTER_KEYS: [&str; 4] = ["album", "artist", "track", "year"];

pub const SEARCH_TYPES: [&str; 6] = ["album", "artist", "playlist", "track", "show", "episode"];

/// A catalog search: free text plus field filters, e.g. `artist:Muse`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchArgs {
    pub query: String,
    pub filters: Vec<(String, String)>,
    pub types: Vec<String>,
    pub market: Option<String>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl SearchArgs {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Self::default()
        }
    }

    pub fn filter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.push((key.into(), value.into()));
        self
    }

    pub fn kind(mut self, kind: impl Into<String>) -> Self {
        self.types.push(kind.into());
        self
    }

    pub fn market(mut self, market: impl Into<String>) -> Self {
        self.market = Some(market.into());
        self
    }

    pub fn page(self, limit: Option<u32>, offset: Option<u32>) -> Self {
        Self {
            limit,
            offset,
            ..self
        }
    }

    /// The unencoded `q` value: text and `key:value` filters joined by single
    /// spaces, which end up as `%20` on the wire.
    pub fn query_string(&self) -> Result<String, ValidationError> {
        let mut segments = Vec::new();

        let text = self.query.trim();
        if !text.is_empty() {
            segments.push(text.split_whitespace().collect::<Vec<_>>().join(" "));
        }

        for (key, value) in &self.filters {
            let key = key.trim().to_ascii_lowercase();
            if !FILTER_KEYS.contains(&key.as_str()) {
                return Err(ValidationError::UnknownFilterKey(key));
            }
            let value = value.trim();
            if value.is_empty() {
                continue;
            }
            segments.push(format!(
                "{}:{}",
                key,
                value.split_whitespace().collect::<Vec<_>>().join(" ")
            ));
        }

        if segments.is_empty() {
            return Err(ValidationError::EmptySearch);
        }

        Ok(segments.join(" "))
    }

    pub fn type_string(&self) -> Result<String, ValidationError> {
        let mut types: Vec<String> = Vec::new();
        for kind in &self.types {
            let kind = kind.trim().to_ascii_lowercase();
            if !SEARCH_TYPES.contains(&kind.as_str()) {
                return Err(ValidationError::UnknownSearchType(kind));
            }
            if !types.contains(&kind) {
                types.push(kind);
            }
        }

        if types.is_empty() {
            return Err(ValidationError::MissingParameter {
                resource: Resource::Search.name(),
                key: "type",
            });
        }

        Ok(types.join(","))
    }
}

pub fn build(args: &SearchArgs) -> Result<RequestDescriptor, ValidationError> {
    let query = args.query_string()?;
    let types = args.type_string()?;

    let mut request = RequestArgs::new()
        .param("q", query)
        .param("type", types)
        .page(args.limit, args.offset);
    if let Some(market) = &args.market {
        request = request.param("market", market.as_str());
    }

    request::build(Method::Get, Resource::Search, &request)
}
