use chrono::NaiveDate;
use serde_json::json;
use spotcat::{
    error::ValidationError,
    spotify::{
        browse::{self, BrowseArgs},
        request::{RequestArgs, build},
        resources::{self, MAX_IDS, Resource},
        search::{self, SearchArgs},
    },
    types::Method,
};

fn get(resource: Resource, args: RequestArgs) -> Result<String, ValidationError> {
    build(Method::Get, resource, &args).map(|d| d.path_and_query())
}

fn post(resource: Resource, args: RequestArgs) -> Result<String, ValidationError> {
    build(Method::Post, resource, &args).map(|d| d.path_and_query())
}

fn ids(count: usize) -> String {
    (0..count)
        .map(|i| format!("id{}", i))
        .collect::<Vec<_>>()
        .join(",")
}

#[test]
fn test_resource_names_parse() {
    for resource in Resource::ALL {
        assert_eq!(resource.name().parse::<Resource>().unwrap(), resource);
    }
    assert_eq!("Albums".parse::<Resource>().unwrap(), Resource::Albums);
    assert_eq!(
        "records".parse::<Resource>().unwrap_err(),
        ValidationError::UnknownResource("records".to_string())
    );
}

#[test]
fn test_registry_has_one_row_per_resource() {
    assert_eq!(resources::all().len(), Resource::ALL.len());
    for resource in Resource::ALL {
        assert_eq!(resource.spec().resource, resource);
        assert_eq!(resource.spec().id_limit, MAX_IDS);
    }
}

#[test]
fn test_single_album_with_paging() {
    let args = RequestArgs::new().id_list("1doe").sub_object("").page(Some(50), Some(0));
    assert_eq!(
        get(Resource::Albums, args).unwrap(),
        "albums/1doe?limit=50&offset=0"
    );
}

#[test]
fn test_album_tracks() {
    let args = RequestArgs::new().id("1doe").sub_object("tracks").param("market", "DE");
    assert_eq!(
        get(Resource::Albums, args).unwrap(),
        "albums/1doe/tracks?market=DE"
    );
}

#[test]
fn test_batch_ids_go_into_the_query() {
    let args = RequestArgs::new().id_list("a, b,c").param("market", "US");
    let descriptor = build(Method::Get, Resource::Albums, &args).unwrap();

    assert_eq!(descriptor.path(), "albums");
    assert_eq!(descriptor.query_value("ids"), Some("a,b,c"));
    assert_eq!(descriptor.query_string(), "ids=a,b,c&market=US");
}

#[test]
fn test_unknown_sub_objects_are_rejected() {
    let cases = [
        (Resource::Albums, "top-tracks"),
        (Resource::Artists, "tracks"),
        (Resource::Tracks, "images"),
        (Resource::Playlists, "albums"),
        (Resource::Shows, ""),
        (Resource::Shows, "tracks"),
        (Resource::Episodes, "tracks"),
        (Resource::Player, "queue"),
        (Resource::Categories, "tracks"),
        (Resource::Profile, "playlists"),
    ];

    for (resource, sub_object) in cases {
        let args = RequestArgs::new().id("x").sub_object(sub_object);
        assert_eq!(
            build(Method::Get, resource, &args).unwrap_err(),
            ValidationError::UnknownSubObject {
                resource: resource.name(),
                sub_object: sub_object.to_string(),
            },
            "{}/{}",
            resource,
            sub_object
        );
    }
}

#[test]
fn test_every_declared_sub_object_builds() {
    for spec in resources::all() {
        for sub in spec.sub_objects {
            let mut args = RequestArgs::new().sub_object(sub.name);
            if spec.resource == Resource::Search {
                args = args.param("q", "abc").param("type", "track");
            } else if spec.ids == resources::IdRule::Required
                || (!sub.name.is_empty() && spec.ids == resources::IdRule::Optional)
            {
                args = args.id("x");
            }
            assert!(
                build(Method::Get, spec.resource, &args).is_ok(),
                "{}/{}",
                spec.name(),
                sub.name
            );
        }
    }
}

#[test]
fn test_id_limit() {
    let at_limit = RequestArgs::new().id_list(&ids(MAX_IDS));
    let descriptor = build(Method::Get, Resource::Tracks, &at_limit).unwrap();
    assert_eq!(descriptor.path(), "tracks");
    assert_eq!(
        descriptor.query_value("ids").unwrap().split(',').count(),
        MAX_IDS
    );

    for resource in [Resource::Albums, Resource::Artists, Resource::Tracks, Resource::Episodes] {
        let over = RequestArgs::new().id_list(&ids(MAX_IDS + 1));
        assert_eq!(
            build(Method::Get, resource, &over).unwrap_err(),
            ValidationError::TooManyIds {
                resource: resource.name(),
                count: MAX_IDS + 1,
                limit: MAX_IDS,
            }
        );
    }
}

#[test]
fn test_long_ids_are_counted_not_measured() {
    let long_ids = (0..40)
        .map(|i| format!("{:0>40}", i))
        .collect::<Vec<_>>()
        .join(",");
    assert!(long_ids.len() > 1150);

    assert!(get(Resource::Tracks, RequestArgs::new().id_list(&long_ids)).is_ok());
}

#[test]
fn test_empty_ids_are_rejected() {
    assert_eq!(
        get(Resource::Albums, RequestArgs::new().id_list("a,,b")).unwrap_err(),
        ValidationError::EmptyId { resource: "albums" }
    );
}

#[test]
fn test_audio_analysis_is_single_id_only() {
    assert_eq!(
        get(
            Resource::Tracks,
            RequestArgs::new().id("t1").sub_object("audio-analysis")
        )
        .unwrap(),
        "audio-analysis/t1"
    );

    assert_eq!(
        get(
            Resource::Tracks,
            RequestArgs::new().id_list("t1,t2").sub_object("audio-analysis")
        )
        .unwrap_err(),
        ValidationError::SingleIdOnly {
            resource: "tracks",
            sub_object: "audio-analysis".to_string(),
        }
    );
}

#[test]
fn test_audio_features_replace_the_root() {
    assert_eq!(
        get(
            Resource::Tracks,
            RequestArgs::new().id_list("t1,t2").sub_object("audio-features")
        )
        .unwrap(),
        "audio-features?ids=t1,t2"
    );
    assert_eq!(
        get(
            Resource::Tracks,
            RequestArgs::new().id("t1").sub_object("audio-features")
        )
        .unwrap(),
        "audio-features/t1"
    );
}

#[test]
fn test_non_batch_sub_objects_take_one_id() {
    assert!(matches!(
        get(
            Resource::Artists,
            RequestArgs::new().id_list("a1,a2").sub_object("top-tracks")
        ),
        Err(ValidationError::SingleIdOnly { .. })
    ));
    assert!(matches!(
        get(Resource::Playlists, RequestArgs::new().id_list("p1,p2")),
        Err(ValidationError::SingleIdOnly { .. })
    ));
}

#[test]
fn test_artist_albums_with_include_groups() {
    let args = RequestArgs::new()
        .id("a1")
        .sub_object("albums")
        .param("market", "SE")
        .param("include_groups", "album,single")
        .page(Some(20), None);
    assert_eq!(
        get(Resource::Artists, args).unwrap(),
        "artists/a1/albums?include_groups=album,single&market=SE&limit=20"
    );
}

#[test]
fn test_own_scope_paths() {
    assert_eq!(
        get(Resource::Playlists, RequestArgs::new().own(true)).unwrap(),
        "me/playlists"
    );
    assert_eq!(
        get(Resource::Albums, RequestArgs::new().own(true).page(Some(10), Some(5))).unwrap(),
        "me/albums?limit=10&offset=5"
    );
    assert_eq!(get(Resource::Profile, RequestArgs::new().own(true)).unwrap(), "me");
    assert_eq!(
        get(Resource::Profile, RequestArgs::new().id("u1")).unwrap(),
        "users/u1"
    );
}

#[test]
fn test_own_playlists_with_user_is_rejected() {
    let err = get(Resource::Playlists, RequestArgs::new().own(true).user("u1")).unwrap_err();
    assert!(matches!(
        err,
        ValidationError::ConflictingArguments {
            resource: "playlists",
            ..
        }
    ));

    let err = get(Resource::Playlists, RequestArgs::new().own(true).id("p1")).unwrap_err();
    assert!(matches!(err, ValidationError::ConflictingArguments { .. }));

    let err = get(Resource::Playlists, RequestArgs::new().user("u1").id("p1")).unwrap_err();
    assert!(matches!(err, ValidationError::ConflictingArguments { .. }));
}

#[test]
fn test_user_playlists() {
    assert_eq!(
        get(
            Resource::Playlists,
            RequestArgs::new().user("u1").page(Some(50), Some(0))
        )
        .unwrap(),
        "users/u1/playlists?limit=50&offset=0"
    );

    assert!(matches!(
        get(Resource::Albums, RequestArgs::new().user("u1")),
        Err(ValidationError::ConflictingArguments { .. })
    ));
}

#[test]
fn test_playlist_tracks_with_fields() {
    let args = RequestArgs::new()
        .id("p1")
        .sub_object("tracks")
        .param("fields", "items(track(name,href))");
    assert_eq!(
        get(Resource::Playlists, args).unwrap(),
        "playlists/p1/tracks?fields=items%28track%28name,href%29%29"
    );
}

#[test]
fn test_self_scope_rules() {
    assert_eq!(
        get(Resource::Artists, RequestArgs::new().own(true)).unwrap_err(),
        ValidationError::SelfNotSupported { resource: "artists" }
    );
    assert!(matches!(
        get(Resource::Albums, RequestArgs::new().own(true).sub_object("tracks")),
        Err(ValidationError::ConflictingArguments { .. })
    ));
}

#[test]
fn test_id_presence() {
    assert_eq!(
        get(Resource::Albums, RequestArgs::new()).unwrap_err(),
        ValidationError::MissingId { resource: "albums" }
    );
    assert_eq!(
        get(Resource::Player, RequestArgs::new().id("x")).unwrap_err(),
        ValidationError::UnexpectedId { resource: "player" }
    );
    assert_eq!(
        get(Resource::Categories, RequestArgs::new().sub_object("playlists")).unwrap_err(),
        ValidationError::MissingId {
            resource: "categories"
        }
    );
}

#[test]
fn test_player_paths() {
    assert_eq!(get(Resource::Player, RequestArgs::new()).unwrap(), "me/player");
    assert_eq!(
        get(
            Resource::Player,
            RequestArgs::new().sub_object("recently-played").page(Some(10), None)
        )
        .unwrap(),
        "me/player/recently-played?limit=10"
    );
}

#[test]
fn test_player_actions() {
    assert_eq!(
        post(Resource::Player, RequestArgs::new().action("next")).unwrap(),
        "me/player/next"
    );
    assert_eq!(
        post(
            Resource::Player,
            RequestArgs::new().action("previous").param("device_id", "d1")
        )
        .unwrap(),
        "me/player/previous?device_id=d1"
    );
    assert_eq!(
        post(
            Resource::Player,
            RequestArgs::new()
                .action("queue")
                .param("uri", "spotify:track:4iV5W9uYEdYUVa79Axb7Rh")
        )
        .unwrap(),
        "me/player/queue?uri=spotify:track:4iV5W9uYEdYUVa79Axb7Rh"
    );

    assert_eq!(
        post(Resource::Player, RequestArgs::new().action("queue")).unwrap_err(),
        ValidationError::MissingParameter {
            resource: "player",
            key: "uri"
        }
    );
    assert_eq!(
        post(Resource::Player, RequestArgs::new().action("pause")).unwrap_err(),
        ValidationError::UnknownAction {
            resource: "player",
            action: "pause".to_string()
        }
    );
}

#[test]
fn test_post_is_limited_to_resources_with_actions() {
    assert_eq!(
        post(Resource::Albums, RequestArgs::new().id("a")).unwrap_err(),
        ValidationError::UnsupportedMethod {
            resource: "albums",
            method: "POST"
        }
    );
}

#[test]
fn test_playlist_actions() {
    let body = json!({ "name": "Road trip", "public": false });
    let descriptor = spotcat::spotify::request::build(
        Method::Post,
        Resource::Playlists,
        &RequestArgs::new().user("u1").body(body.clone()),
    )
    .unwrap();
    assert_eq!(descriptor.method, Method::Post);
    assert_eq!(descriptor.path(), "users/u1/playlists");
    assert_eq!(descriptor.body, Some(body));

    assert_eq!(
        post(Resource::Playlists, RequestArgs::new().user("u1")).unwrap_err(),
        ValidationError::MissingBody {
            resource: "playlists"
        }
    );
    assert_eq!(
        post(
            Resource::Playlists,
            RequestArgs::new().body(json!({ "name": "x" }))
        )
        .unwrap_err(),
        ValidationError::MissingUser {
            resource: "playlists"
        }
    );

    assert_eq!(
        post(
            Resource::Playlists,
            RequestArgs::new()
                .id("p1")
                .action("tracks")
                .param("uris", "spotify:track:a,spotify:track:b")
                .param("position", "0")
        )
        .unwrap(),
        "playlists/p1/tracks?uris=spotify:track:a,spotify:track:b&position=0"
    );
    assert_eq!(
        post(Resource::Playlists, RequestArgs::new().action("tracks")).unwrap_err(),
        ValidationError::MissingId {
            resource: "playlists"
        }
    );
}

#[test]
fn test_body_is_refused_on_get() {
    assert_eq!(
        get(Resource::Albums, RequestArgs::new().id("a").body(json!({}))).unwrap_err(),
        ValidationError::UnsupportedArgument {
            resource: "albums",
            argument: "body"
        }
    );
}

#[test]
fn test_query_parameters() {
    assert_eq!(
        get(Resource::Albums, RequestArgs::new().id("a").param("fields", "x")).unwrap_err(),
        ValidationError::UnknownParameter {
            resource: "albums",
            key: "fields".to_string()
        }
    );

    // empty values are dropped before validation
    assert_eq!(
        get(
            Resource::Albums,
            RequestArgs::new().id("a").param("market", "").param("market", "DE")
        )
        .unwrap(),
        "albums/a?market=DE"
    );
    assert_eq!(
        get(Resource::Albums, RequestArgs::new().id("a").param("market", "")).unwrap(),
        "albums/a"
    );
}

#[test]
fn test_paging_only_on_paginated_resources() {
    assert_eq!(
        get(Resource::Profile, RequestArgs::new().own(true).limit(5)).unwrap_err(),
        ValidationError::UnsupportedArgument {
            resource: "profile",
            argument: "limit"
        }
    );
    assert_eq!(
        get(Resource::Profile, RequestArgs::new().own(true).offset(5)).unwrap_err(),
        ValidationError::UnsupportedArgument {
            resource: "profile",
            argument: "offset"
        }
    );
}

#[test]
fn test_search_requires_query_or_filter() {
    let args = SearchArgs::new("").kind("track");
    assert_eq!(search::build(&args).unwrap_err(), ValidationError::EmptySearch);
}

#[test]
fn test_search_query_with_filter() {
    let args = SearchArgs::new("abc").filter("artist", "X").kind("track");
    let descriptor = search::build(&args).unwrap();

    assert_eq!(descriptor.path(), "search");
    assert!(descriptor.query_value("q").unwrap().contains("abc%20artist:X"));
    assert_eq!(descriptor.query_value("type"), Some("track"));
}

#[test]
fn test_search_full_query() {
    let args = SearchArgs::new("the  dark side")
        .filter("year", "1973")
        .kind("album")
        .kind("track")
        .kind("album")
        .market("GB")
        .page(Some(50), Some(0));

    assert_eq!(
        search::build(&args).unwrap().path_and_query(),
        "search?q=the%20dark%20side%20year:1973&type=album,track&market=GB&limit=50&offset=0"
    );
}

#[test]
fn test_search_literal_percent() {
    let args = SearchArgs::new("100% pure")
        .filter("track", "50%")
        .kind("track");

    assert_eq!(
        args.query_string().unwrap(),
        "100% pure track:50%"
    );
    assert_eq!(
        search::build(&args).unwrap().path_and_query(),
        "search?q=100%25%20pure%20track:50%25&type=track"
    );
}

#[test]
fn test_param_literal_percent() {
    let args = RequestArgs::new().id("abc").param("market", "a%b");
    let descriptor = build(Method::Get, Resource::Albums, &args).unwrap();

    assert_eq!(descriptor.query_value("market"), Some("a%25b"));
}

#[test]
fn test_search_filter_only() {
    let args = SearchArgs::new("").filter("artist", "Muse").kind("artist");
    assert_eq!(
        search::build(&args).unwrap().query_value("q"),
        Some("artist:Muse")
    );
}

#[test]
fn test_search_validation() {
    assert_eq!(
        search::build(&SearchArgs::new("abc").filter("genre", "rock").kind("track")).unwrap_err(),
        ValidationError::UnknownFilterKey("genre".to_string())
    );
    assert_eq!(
        search::build(&SearchArgs::new("abc").kind("podcast")).unwrap_err(),
        ValidationError::UnknownSearchType("podcast".to_string())
    );
    assert_eq!(
        search::build(&SearchArgs::new("abc")).unwrap_err(),
        ValidationError::MissingParameter {
            resource: "search",
            key: "type"
        }
    );
}

#[test]
fn test_search_parameters_are_required_on_the_generic_path() {
    assert_eq!(
        get(Resource::Search, RequestArgs::new().param("type", "track")).unwrap_err(),
        ValidationError::MissingParameter {
            resource: "search",
            key: "q"
        }
    );
}

#[test]
fn test_browse_categories() {
    assert_eq!(
        browse::build(&BrowseArgs::new("categories").page(Some(20), Some(0)))
            .unwrap()
            .path_and_query(),
        "browse/categories?limit=20&offset=0"
    );
    assert_eq!(
        browse::build(
            &BrowseArgs::new("categories")
                .category("party")
                .category_obj("playlists")
                .country("SE")
        )
        .unwrap()
        .path_and_query(),
        "browse/categories/party/playlists?country=SE"
    );
}

#[test]
fn test_browse_featured_playlists_timestamp() {
    let timestamp = NaiveDate::from_ymd_opt(2024, 5, 1)
        .unwrap()
        .and_hms_opt(9, 30, 0)
        .unwrap();
    let args = BrowseArgs::new("featured-playlists")
        .timestamp(timestamp)
        .category("ignored")
        .locale("sv_SE");

    assert_eq!(
        browse::build(&args).unwrap().path_and_query(),
        "browse/featured-playlists?timestamp=2024-05-01T09:30:00&locale=sv_SE"
    );
}

#[test]
fn test_browse_new_releases() {
    let args = BrowseArgs::new("new-releases")
        .country("US")
        .locale("en_US")
        .page(Some(10), None);
    assert_eq!(
        browse::build(&args).unwrap().path_and_query(),
        "browse/new-releases?country=US&limit=10"
    );
}

#[test]
fn test_browse_unknown_category() {
    assert_eq!(
        browse::build(&BrowseArgs::new("charts")).unwrap_err(),
        ValidationError::UnknownBrowseCategory("charts".to_string())
    );
}

#[test]
fn test_registry_table_rows() {
    let row = Resource::Tracks.spec().table_row();
    assert_eq!(row.resource, "tracks");
    assert_eq!(row.self_path, "me/tracks");
    assert_eq!(row.sub_objects, "- (batch), audio-features (batch), audio-analysis");

    let row = Resource::Player.spec().table_row();
    assert_eq!(row.actions, "next, previous, queue");
    assert_eq!(Resource::Playlists.spec().table_row().actions, "create, tracks");
}
