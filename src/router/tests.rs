use super::{RouteRecord, Router};
use crate::error::RouterError;
use crate::info::RouteInfo;

fn component(name: &str) -> RouteInfo {
    RouteInfo::new().with("component", name)
}

fn component_of(record: &RouteRecord) -> Option<&str> {
    record.info.get("component").and_then(|v| v.as_str())
}

fn app_router() -> Router {
    let mut router = Router::new();
    router.add("/", component("Home")).unwrap();
    router
        .mount("/", |r| -> Result<(), RouterError> {
            r.add("/foo", component("JustFoo"))?;
            r.mount("/foo", |r| -> Result<(), RouterError> {
                r.add("/static", component("StaticOne"))?;
                r.mount("/nested", |r| r.add("/:value", component("NestedValue")))?;
                r.add("/:bar", component("AndNested"))?;
                Ok(())
            })?;
            r.add("/baz", component("Baz"))?;
            r.add("/buzz", component("Buzz"))?;
            r.mount("/buzz", |r| -> Result<(), RouterError> {
                r.add("#test", component("Anchor"))?;
                r.add("#:quux", component("Hashed"))?;
                Ok(())
            })?;
            r.add("/*any", component("Fallback"))?;
            Ok(())
        })
        .unwrap();
    router
}

fn resolved(router: &Router, path: &str) -> Vec<RouteRecord> {
    let mut out = Vec::new();
    router.resolve(path, |_, result| match result {
        Ok(records) => out.extend_from_slice(records),
        Err(e) => panic!("resolve failed: {e}"),
    });
    out
}

#[test]
fn test_static_segments() {
    let router = app_router();
    assert_eq!(component_of(&router.find("/").unwrap()[0]), Some("Home"));
    assert_eq!(component_of(&router.find("/foo").unwrap()[1]), Some("JustFoo"));
    assert_eq!(
        component_of(&router.find("/foo/static").unwrap()[2]),
        Some("StaticOne")
    );
}

#[test]
fn test_param_and_splat_segments() {
    let router = app_router();
    let found = router.find("/foo/fun").unwrap();
    assert_eq!(component_of(&found[2]), Some("AndNested"));
    assert_eq!(found[2].params.get("bar"), Some("fun"));

    let found = router.find("/other").unwrap();
    assert_eq!(component_of(&found[1]), Some("Fallback"));
}

#[test]
fn test_splat_stops_the_walk() {
    let router = app_router();
    let found = router.find("/a/b/c").unwrap();
    assert_eq!(found.len(), 2);
    assert_eq!(found[1].params.get("any"), Some("a/b/c"));
}

#[test]
fn test_captures_every_level() {
    let router = app_router();
    let paths: Vec<String> = router
        .find("/foo/nested/something")
        .unwrap()
        .into_iter()
        .map(|r| r.path)
        .collect();
    assert_eq!(paths, ["/", "/foo", "/foo/nested", "/foo/nested/something"]);
}

#[test]
fn test_hash_routes_find_and_resolve_agree() {
    let router = app_router();
    let found = router.find("/buzz#bazzinga").unwrap();
    assert_eq!(found, resolved(&router, "/buzz#bazzinga"));

    let hashed = &found[2];
    assert_eq!(component_of(hashed), Some("Hashed"));
    assert_eq!(hashed.route, "/buzz#:quux");
    assert_eq!(hashed.params.get("quux"), Some("bazzinga"));
    assert_eq!(hashed.path, "/buzz#bazzinga");

    let anchor = router.find("/buzz#test").unwrap();
    assert_eq!(component_of(&anchor[2]), Some("Anchor"));
}

#[test]
fn test_unregister_segments() {
    let mut router = app_router();
    router.rm("/").unwrap();

    let root = router.find("/").unwrap();
    assert_eq!(root.len(), 1);
    assert!(root[0].info.is_empty());
    assert_eq!(root[0].route, "/");

    router.rm("/*any").unwrap();
    router.rm("/foo/:bar").unwrap();
    let found = router.find("/foo").unwrap();
    assert_eq!(found.len(), 2);
    assert_eq!(component_of(&found[1]), Some("JustFoo"));

    assert!(router.find("/foo/bar").unwrap_err().is_not_found());
    assert_eq!(
        component_of(&router.find("/foo/nested/something").unwrap()[2]),
        Some("NestedValue")
    );
}

#[test]
fn test_missing_routes_fail() {
    let mut router = app_router();
    router.rm("/*any").unwrap();
    assert!(router.find("/noop").unwrap_err().is_not_found());

    let err = router.rm("/foo/not/exists").unwrap_err();
    assert!(err.to_string().starts_with("unreachable route '/foo/not/exists'"));
}

#[test]
fn test_mount_prefix_is_scoped() {
    let mut router = Router::new();
    router.mount("/a", |r| {
        assert_eq!(r.mount_prefix(), "/a");
        r.mount("/", |r| assert_eq!(r.mount_prefix(), "/a"));
        r.mount("/b", |r| assert_eq!(r.mount_prefix(), "/a/b"));
    });
    assert_eq!(router.mount_prefix(), "");
}

#[test]
fn test_mount_prefix_popped_after_failure() {
    let mut router = Router::new();
    let result = router.mount("/a", |r| r.add("/x:y<a/b>", None));
    assert!(matches!(result, Err(RouterError::SlashInCustomExpr { .. })));
    assert_eq!(router.mount_prefix(), "");

    assert_eq!(router.add("/b", None).unwrap(), "/b");
}

#[test]
fn test_add_returns_full_path() {
    let mut router = Router::new();
    let full = router.mount("/users", |r| r.mount("/:id", |r| r.add("#tab", None)));
    assert_eq!(full.unwrap(), "/users/:id#tab");
}

#[test]
fn test_add_rejects_relative_paths() {
    let mut router = Router::new();
    for bad in ["", "foo", ":id"] {
        let err = router.add(bad, None).unwrap_err();
        assert_eq!(
            err,
            RouterError::InvalidPath {
                given: bad.to_string()
            }
        );
    }
    assert!(router.tree().is_empty());
}

#[test]
fn test_route_patterns_in_tree_order() {
    let router = app_router();
    assert_eq!(
        router.route_patterns(),
        [
            "/",
            "/buzz",
            "/buzz#test",
            "/buzz#:quux",
            "/foo",
            "/foo/static",
            "/foo/nested/:value",
            "/foo/:bar",
            "/baz",
            "/*any",
        ]
    );
}

#[test]
fn test_find_uses_configured_retries() {
    use crate::runtime_config::RuntimeConfig;

    let mut router = Router::with_config(RuntimeConfig::default().with_retries(2));
    router.add("/*_", RouteInfo::new().with("is", "catch")).unwrap();
    router.add("/:a/:b", RouteInfo::new().with("is", "nested")).unwrap();

    let found = router.find("/x/y/z").unwrap();
    assert_eq!(found.last().unwrap().route, "/*_");
    assert!(router.find_with_retries("/x/y/z", 1).is_err());
}
