//! Turns caller arguments into a [`RequestDescriptor`].
//!
//! Everything here is pure: the registry row for a resource decides what is
//! accepted, and any violation is reported before a path is assembled.

use serde_json::Value;

use crate::{
    error::ValidationError,
    spotify::resources::{Action, ActionTarget, BodyRule, IdRule, Resource, ResourceSpec, SelfScope},
    types::{Method, RequestDescriptor},
    utils,
};

/// Arguments shared by every catalog resource.
///
/// `sub_object` names the sub-resource for GET requests and the action for
/// POST requests.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestArgs {
    pub ids: Vec<String>,
    pub sub_object: Option<String>,
    pub own: bool,
    pub user: Option<String>,
    pub params: Vec<(String, String)>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
    pub body: Option<Value>,
}

impl RequestArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.ids.push(id.into());
        self
    }

    pub fn ids<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ids.extend(ids.into_iter().map(Into::into));
        self
    }

    /// Adds every id of a comma-joined list such as `"a,b,c"`.
    pub fn id_list(mut self, ids: &str) -> Self {
        self.ids.extend(utils::split_ids(ids));
        self
    }

    pub fn sub_object(mut self, sub_object: impl Into<String>) -> Self {
        self.sub_object = Some(sub_object.into());
        self
    }

    pub fn action(self, action: impl Into<String>) -> Self {
        self.sub_object(action)
    }

    /// Scopes the request to the authenticated user (`me/...`).
    pub fn own(mut self, own: bool) -> Self {
        self.own = own;
        self
    }

    pub fn user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: u32) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn page(self, limit: Option<u32>, offset: Option<u32>) -> Self {
        Self {
            limit,
            offset,
            ..self
        }
    }

    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    fn sub_name(&self) -> &str {
        self.sub_object.as_deref().unwrap_or("").trim()
    }

    fn has_user(&self) -> bool {
        self.user.as_deref().is_some_and(|u| !u.trim().is_empty())
    }
}

/// What the request addresses once the sub-object or action is resolved.
struct Target<'a> {
    name: &'a str,
    batch: bool,
    action: Option<&'static Action>,
}

pub fn build(
    method: Method,
    resource: Resource,
    args: &RequestArgs,
) -> Result<RequestDescriptor, ValidationError> {
    let spec = resource.spec();

    check_method(spec, method)?;
    let target = resolve_target(spec, method, args)?;
    check_conflicts(spec, &target, args)?;
    check_ids(spec, &target, args)?;
    let params = collect_params(spec, &target, args)?;
    check_pagination(spec, &target, args)?;
    check_body(spec, &target, args)?;

    let mut query = Vec::new();
    let segments = resolve_path(spec, &target, args, &mut query);

    query.extend(
        params
            .into_iter()
            .map(|(k, v)| (k.to_string(), utils::encode_query_value(&v))),
    );
    if let Some(limit) = args.limit {
        query.push(("limit".to_string(), limit.to_string()));
    }
    if let Some(offset) = args.offset {
        query.push(("offset".to_string(), offset.to_string()));
    }

    Ok(RequestDescriptor {
        method,
        segments,
        query,
        body: args.body.clone(),
    })
}

fn check_method(spec: &ResourceSpec, method: Method) -> Result<(), ValidationError> {
    match method {
        Method::Get => Ok(()),
        Method::Post if !spec.actions.is_empty() => Ok(()),
        Method::Post => Err(ValidationError::UnsupportedMethod {
            resource: spec.name(),
            method: method.as_str(),
        }),
    }
}

fn resolve_target<'a>(
    spec: &ResourceSpec,
    method: Method,
    args: &'a RequestArgs,
) -> Result<Target<'a>, ValidationError> {
    let name = args.sub_name();
    match method {
        Method::Get => spec
            .sub_object(name)
            .map(|sub| Target {
                name,
                batch: sub.batch,
                action: None,
            })
            .ok_or_else(|| ValidationError::UnknownSubObject {
                resource: spec.name(),
                sub_object: name.to_string(),
            }),
        Method::Post => spec
            .action(name)
            .map(|action| Target {
                name,
                batch: false,
                action: Some(action),
            })
            .ok_or_else(|| ValidationError::UnknownAction {
                resource: spec.name(),
                action: name.to_string(),
            }),
    }
}

fn check_conflicts(
    spec: &ResourceSpec,
    target: &Target<'_>,
    args: &RequestArgs,
) -> Result<(), ValidationError> {
    let conflict = |reason| ValidationError::ConflictingArguments {
        resource: spec.name(),
        reason,
    };
    let has_ids = !args.ids.is_empty();
    let has_user = args.has_user();
    let user_action = target
        .action
        .is_some_and(|a| a.target == ActionTarget::User);

    if args.own && has_ids {
        return Err(conflict("the current-user scope cannot be combined with ids"));
    }
    if args.own && has_user {
        return Err(conflict(
            "the current-user scope cannot be combined with a user id",
        ));
    }
    if args.own && !target.name.is_empty() && spec.self_scope == SelfScope::Optional {
        return Err(conflict("the current-user scope does not take a sub-object"));
    }
    if has_user && has_ids {
        return Err(conflict("a user id cannot be combined with ids"));
    }
    if has_user && !spec.user_scoped && !user_action {
        return Err(conflict("there is no per-user listing"));
    }
    if has_user && !target.name.is_empty() && target.action.is_none() {
        return Err(conflict("a per-user listing does not take a sub-object"));
    }
    if args.own && !spec.supports_self() {
        return Err(ValidationError::SelfNotSupported {
            resource: spec.name(),
        });
    }

    Ok(())
}

fn check_ids(
    spec: &ResourceSpec,
    target: &Target<'_>,
    args: &RequestArgs,
) -> Result<(), ValidationError> {
    let resource = spec.name();
    let count = args.ids.len();

    if args.ids.iter().any(|id| id.trim().is_empty()) {
        return Err(ValidationError::EmptyId { resource });
    }
    if count > spec.id_limit {
        return Err(ValidationError::TooManyIds {
            resource,
            count,
            limit: spec.id_limit,
        });
    }
    if count > 1 && !target.batch {
        return Err(ValidationError::SingleIdOnly {
            resource,
            sub_object: target.name.to_string(),
        });
    }

    if let Some(action) = target.action {
        return match action.target {
            ActionTarget::Id if count == 0 => Err(ValidationError::MissingId { resource }),
            ActionTarget::CurrentUser if count > 0 => {
                Err(ValidationError::UnexpectedId { resource })
            }
            ActionTarget::User if count > 0 => Err(ValidationError::UnexpectedId { resource }),
            ActionTarget::User if !args.has_user() => {
                Err(ValidationError::MissingUser { resource })
            }
            _ => Ok(()),
        };
    }

    let scoped = args.own || args.has_user() || spec.self_scope == SelfScope::Always;
    match spec.ids {
        IdRule::Forbidden if count > 0 => Err(ValidationError::UnexpectedId { resource }),
        IdRule::Required if count == 0 && !scoped => Err(ValidationError::MissingId { resource }),
        _ if count == 0 && !scoped && !target.name.is_empty() => {
            Err(ValidationError::MissingId { resource })
        }
        _ => Ok(()),
    }
}

/// Keeps the non-empty params in registry order, the last value of a
/// repeated key winning.
fn collect_params(
    spec: &ResourceSpec,
    target: &Target<'_>,
    args: &RequestArgs,
) -> Result<Vec<(&'static str, String)>, ValidationError> {
    let (keys, required) = match target.action {
        Some(action) => (action.query_keys, action.required_params),
        None => (spec.query_keys, spec.required_params),
    };

    let given: Vec<(&str, &str)> = args
        .params
        .iter()
        .map(|(k, v)| (k.trim(), v.as_str()))
        .filter(|(_, v)| !v.trim().is_empty())
        .collect();

    if let Some((key, _)) = given.iter().find(|(k, _)| !keys.iter().any(|key| key == k)) {
        return Err(ValidationError::UnknownParameter {
            resource: spec.name(),
            key: key.to_string(),
        });
    }

    if let Some(key) = required
        .iter()
        .find(|key| !given.iter().any(|(k, _)| k == *key))
    {
        return Err(ValidationError::MissingParameter {
            resource: spec.name(),
            key: *key,
        });
    }

    Ok(keys
        .iter()
        .filter_map(|key| {
            given
                .iter()
                .rev()
                .find(|(k, _)| k == key)
                .map(|(_, v)| (*key, v.to_string()))
        })
        .collect())
}

fn check_pagination(
    spec: &ResourceSpec,
    target: &Target<'_>,
    args: &RequestArgs,
) -> Result<(), ValidationError> {
    let paginated = spec.paginated && target.action.is_none();
    let argument = match (args.limit, args.offset) {
        (Some(_), _) if !paginated => "limit",
        (_, Some(_)) if !paginated => "offset",
        _ => return Ok(()),
    };

    Err(ValidationError::UnsupportedArgument {
        resource: spec.name(),
        argument,
    })
}

fn check_body(
    spec: &ResourceSpec,
    target: &Target<'_>,
    args: &RequestArgs,
) -> Result<(), ValidationError> {
    let rule = target.action.map_or(BodyRule::None, |a| a.body);
    match (rule, &args.body) {
        (BodyRule::None, Some(_)) => Err(ValidationError::UnsupportedArgument {
            resource: spec.name(),
            argument: "body",
        }),
        (BodyRule::Required, None) => Err(ValidationError::MissingBody {
            resource: spec.name(),
        }),
        _ => Ok(()),
    }
}

fn resolve_path(
    spec: &ResourceSpec,
    target: &Target<'_>,
    args: &RequestArgs,
    query: &mut Vec<(String, String)>,
) -> Vec<String> {
    let root = |path: &str| -> Vec<String> { path.split('/').map(str::to_string).collect() };
    let self_path = spec.self_path.unwrap_or(spec.path);
    let ids: Vec<String> = args
        .ids
        .iter()
        .map(|id| utils::encode_form_value(id.trim()))
        .collect();
    let user = args
        .user
        .as_deref()
        .map(|u| utils::encode_form_value(u.trim()));

    let mut segments = match (target.action, user) {
        (Some(action), user) => match action.target {
            ActionTarget::CurrentUser => root(self_path),
            ActionTarget::Id => [root(spec.path), ids].concat(),
            ActionTarget::User => {
                let mut segments = vec!["users".to_string(), user.unwrap_or_default()];
                segments.extend(root(spec.path));
                segments
            }
        },
        (None, _) if args.own || spec.self_scope == SelfScope::Always => root(self_path),
        (None, Some(user)) => {
            let mut segments = vec!["users".to_string(), user];
            segments.extend(root(spec.path));
            segments
        }
        (None, None) if spec.sub_object_as_root && !target.name.is_empty() => {
            let mut segments = vec![target.name.to_string()];
            if ids.len() == 1 {
                segments.extend(ids);
            } else if !ids.is_empty() {
                query.push(("ids".to_string(), utils::encode_query_value(&ids.join(","))));
            }
            return segments;
        }
        (None, None) => {
            let mut segments = root(spec.path);
            if ids.len() == 1 {
                segments.extend(ids);
            } else if !ids.is_empty() {
                query.push(("ids".to_string(), utils::encode_query_value(&ids.join(","))));
            }
            segments
        }
    };

    if !target.name.is_empty() {
        segments.push(target.name.to_string());
    }
    segments
}
