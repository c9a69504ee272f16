//! Declarative shape rules for every catalog resource.
//!
//! Each [`ResourceSpec`] row says which sub-objects, ids, query keys and POST
//! actions a resource accepts. [`crate::spotify::request::build`] reads the
//! table; nothing in here performs validation itself.

use std::{fmt, str::FromStr};

use crate::{error::ValidationError, types::ResourceTableRow};

/// Largest number of ids accepted in one batch lookup.
pub const MAX_IDS: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Albums,
    Artists,
    Tracks,
    Playlists,
    Shows,
    Episodes,
    Player,
    Search,
    Categories,
    FeaturedPlaylists,
    NewReleases,
    Profile,
}

impl Resource {
    pub const ALL: [Resource; 12] = [
        Resource::Albums,
        Resource::Artists,
        Resource::Tracks,
        Resource::Playlists,
        Resource::Shows,
        Resource::Episodes,
        Resource::Player,
        Resource::Search,
        Resource::Categories,
        Resource::FeaturedPlaylists,
        Resource::NewReleases,
        Resource::Profile,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Albums => "albums",
            Self::Artists => "artists",
            Self::Tracks => "tracks",
            Self::Playlists => "playlists",
            Self::Shows => "shows",
            Self::Episodes => "episodes",
            Self::Player => "player",
            Self::Search => "search",
            Self::Categories => "categories",
            Self::FeaturedPlaylists => "featured-playlists",
            Self::NewReleases => "new-releases",
            Self::Profile => "profile",
        }
    }

    pub fn spec(&self) -> &'static ResourceSpec {
        lookup(*self)
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Resource {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        Resource::ALL
            .into_iter()
            .find(|r| r.name() == name)
            .ok_or_else(|| ValidationError::UnknownResource(s.to_string()))
    }
}

/// How a resource relates to the authenticated user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelfScope {
    /// Only reachable through explicit ids.
    Unsupported,
    /// `me/...` shorthand available next to explicit ids.
    Optional,
    /// Always scoped to the current user, e.g. the player.
    Always,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdRule {
    Forbidden,
    Optional,
    Required,
}

/// An allowed sub-resource suffix. The empty name is the bare resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubObject {
    pub name: &'static str,
    /// Whether several ids may be requested at once.
    pub batch: bool,
}

const fn sub(name: &'static str, batch: bool) -> SubObject {
    SubObject { name, batch }
}

/// Where a POST action is addressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionTarget {
    /// `me/<resource>/<action>`
    CurrentUser,
    /// `<resource>/<id>/<action>`
    Id,
    /// `users/<user>/<resource>`
    User,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Action {
    pub name: &'static str,
    pub target: ActionTarget,
    pub query_keys: &'static [&'static str],
    pub required_params: &'static [&'static str],
    pub body: BodyRule,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyRule {
    None,
    Optional,
    Required,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceSpec {
    pub resource: Resource,
    pub path: &'static str,
    pub self_path: Option<&'static str>,
    pub self_scope: SelfScope,
    /// Reachable as `users/<user>/<path>`.
    pub user_scoped: bool,
    pub ids: IdRule,
    pub id_limit: usize,
    pub sub_objects: &'static [SubObject],
    /// The sub-object replaces the root path (`audio-features/<id>`).
    pub sub_object_as_root: bool,
    /// Emitted in this order, before `limit` and `offset`.
    pub query_keys: &'static [&'static str],
    pub required_params: &'static [&'static str],
    pub paginated: bool,
    pub actions: &'static [Action],
}

impl ResourceSpec {
    pub fn name(&self) -> &'static str {
        self.resource.name()
    }

    pub fn supports_self(&self) -> bool {
        self.self_scope != SelfScope::Unsupported
    }

    pub fn sub_object(&self, name: &str) -> Option<&'static SubObject> {
        self.sub_objects.iter().find(|s| s.name == name)
    }

    pub fn action(&self, name: &str) -> Option<&'static Action> {
        self.actions.iter().find(|a| a.name == name)
    }

    pub fn table_row(&self) -> ResourceTableRow {
        let sub_objects = self
            .sub_objects
            .iter()
            .map(|s| match (s.name, s.batch) {
                ("", true) => "- (batch)".to_string(),
                ("", false) => "-".to_string(),
                (name, true) => format!("{} (batch)", name),
                (name, false) => name.to_string(),
            })
            .collect::<Vec<_>>()
            .join(", ");

        let actions = self
            .actions
            .iter()
            .map(|a| if a.name.is_empty() { "create" } else { a.name })
            .collect::<Vec<_>>()
            .join(", ");

        ResourceTableRow {
            resource: self.name().to_string(),
            path: self.path.to_string(),
            self_path: self.self_path.unwrap_or("-").to_string(),
            sub_objects,
            query_keys: self.query_keys.join(", "),
            actions,
        }
    }
}

const NO_ACTIONS: &[Action] = &[];

static REGISTRY: [ResourceSpec; 12] = [
    ResourceSpec {
        resource: Resource::Albums,
        path: "albums",
        self_path: Some("me/albums"),
        self_scope: SelfScope::Optional,
        user_scoped: false,
        ids: IdRule::Required,
        id_limit: MAX_IDS,
        sub_objects: &[sub("", true), sub("tracks", false)],
        sub_object_as_root: false,
        query_keys: &["market"],
        required_params: &[],
        paginated: true,
        actions: NO_ACTIONS,
    },
    ResourceSpec {
        resource: Resource::Artists,
        path: "artists",
        self_path: None,
        self_scope: SelfScope::Unsupported,
        user_scoped: false,
        ids: IdRule::Required,
        id_limit: MAX_IDS,
        sub_objects: &[
            sub("", true),
            sub("albums", false),
            sub("top-tracks", false),
            sub("related-artists", false),
        ],
        sub_object_as_root: false,
        query_keys: &["include_groups", "market"],
        required_params: &[],
        paginated: true,
        actions: NO_ACTIONS,
    },
    ResourceSpec {
        resource: Resource::Tracks,
        path: "tracks",
        self_path: Some("me/tracks"),
        self_scope: SelfScope::Optional,
        user_scoped: false,
        ids: IdRule::Required,
        id_limit: MAX_IDS,
        sub_objects: &[
            sub("", true),
            sub("audio-features", true),
            sub("audio-analysis", false),
        ],
        sub_object_as_root: true,
        query_keys: &["market"],
        required_params: &[],
        paginated: true,
        actions: NO_ACTIONS,
    },
    ResourceSpec {
        resource: Resource::Playlists,
        path: "playlists",
        self_path: Some("me/playlists"),
        self_scope: SelfScope::Optional,
        user_scoped: true,
        ids: IdRule::Required,
        id_limit: MAX_IDS,
        sub_objects: &[sub("", false), sub("tracks", false), sub("images", false)],
        sub_object_as_root: false,
        query_keys: &["fields", "market"],
        required_params: &[],
        paginated: true,
        actions: &[
            Action {
                name: "",
                target: ActionTarget::User,
                query_keys: &[],
                required_params: &[],
                body: BodyRule::Required,
            },
            Action {
                name: "tracks",
                target: ActionTarget::Id,
                query_keys: &["uris", "position"],
                required_params: &[],
                body: BodyRule::Optional,
            },
        ],
    },
    ResourceSpec {
        resource: Resource::Shows,
        path: "shows",
        self_path: None,
        self_scope: SelfScope::Unsupported,
        user_scoped: false,
        ids: IdRule::Required,
        id_limit: MAX_IDS,
        sub_objects: &[sub("episodes", false)],
        sub_object_as_root: false,
        query_keys: &["market"],
        required_params: &[],
        paginated: true,
        actions: NO_ACTIONS,
    },
    ResourceSpec {
        resource: Resource::Episodes,
        path: "episodes",
        self_path: Some("me/episodes"),
        self_scope: SelfScope::Optional,
        user_scoped: false,
        ids: IdRule::Required,
        id_limit: MAX_IDS,
        sub_objects: &[sub("", true)],
        sub_object_as_root: false,
        query_keys: &["market"],
        required_params: &[],
        paginated: true,
        actions: NO_ACTIONS,
    },
    ResourceSpec {
        resource: Resource::Player,
        path: "player",
        self_path: Some("me/player"),
        self_scope: SelfScope::Always,
        user_scoped: false,
        ids: IdRule::Forbidden,
        id_limit: MAX_IDS,
        sub_objects: &[
            sub("", false),
            sub("devices", false),
            sub("currently-playing", false),
            sub("recently-played", false),
        ],
        sub_object_as_root: false,
        query_keys: &["device_id", "market"],
        required_params: &[],
        paginated: true,
        actions: &[
            Action {
                name: "next",
                target: ActionTarget::CurrentUser,
                query_keys: &["device_id"],
                required_params: &[],
                body: BodyRule::None,
            },
            Action {
                name: "previous",
                target: ActionTarget::CurrentUser,
                query_keys: &["device_id"],
                required_params: &[],
                body: BodyRule::None,
            },
            Action {
                name: "queue",
                target: ActionTarget::CurrentUser,
                query_keys: &["uri", "device_id"],
                required_params: &["uri"],
                body: BodyRule::None,
            },
        ],
    },
    ResourceSpec {
        resource: Resource::Search,
        path: "search",
        self_path: None,
        self_scope: SelfScope::Unsupported,
        user_scoped: false,
        ids: IdRule::Forbidden,
        id_limit: MAX_IDS,
        sub_objects: &[sub("", false)],
        sub_object_as_root: false,
        query_keys: &["q", "type", "market"],
        required_params: &["q", "type"],
        paginated: true,
        actions: NO_ACTIONS,
    },
    ResourceSpec {
        resource: Resource::Categories,
        path: "browse/categories",
        self_path: None,
        self_scope: SelfScope::Unsupported,
        user_scoped: false,
        ids: IdRule::Optional,
        id_limit: MAX_IDS,
        sub_objects: &[sub("", false), sub("playlists", false)],
        sub_object_as_root: false,
        query_keys: &["country", "locale"],
        required_params: &[],
        paginated: true,
        actions: NO_ACTIONS,
    },
    ResourceSpec {
        resource: Resource::FeaturedPlaylists,
        path: "browse/featured-playlists",
        self_path: None,
        self_scope: SelfScope::Unsupported,
        user_scoped: false,
        ids: IdRule::Forbidden,
        id_limit: MAX_IDS,
        sub_objects: &[sub("", false)],
        sub_object_as_root: false,
        query_keys: &["timestamp", "country", "locale"],
        required_params: &[],
        paginated: true,
        actions: NO_ACTIONS,
    },
    ResourceSpec {
        resource: Resource::NewReleases,
        path: "browse/new-releases",
        self_path: None,
        self_scope: SelfScope::Unsupported,
        user_scoped: false,
        ids: IdRule::Forbidden,
        id_limit: MAX_IDS,
        sub_objects: &[sub("", false)],
        sub_object_as_root: false,
        query_keys: &["country"],
        required_params: &[],
        paginated: true,
        actions: NO_ACTIONS,
    },
    ResourceSpec {
        resource: Resource::Profile,
        path: "users",
        self_path: Some("me"),
        self_scope: SelfScope::Optional,
        user_scoped: false,
        ids: IdRule::Required,
        id_limit: MAX_IDS,
        sub_objects: &[sub("", false)],
        sub_object_as_root: false,
        query_keys: &[],
        required_params: &[],
        paginated: false,
        actions: NO_ACTIONS,
    },
];

pub fn lookup(resource: Resource) -> &'static ResourceSpec {
    REGISTRY
        .iter()
        .find(|spec| spec.resource == resource)
        .unwrap_or_else(|| unreachable!("every resource has a registry row"))
}

pub fn all() -> &'static [ResourceSpec] {
    &REGISTRY
}
